use std::error::Error;
use std::io::Write;
use std::path::Path;
use std::process::ExitCode;

use quill_catalog::{Catalog, DocSet, check, verify};
use quill_client::{FileConfig, SessionArgs, SessionParams};
use quill_tl_parser::parse_schema;
use quill_tl_parser::tl::Category;

use crate::{Command, DocsCommand, SessionOpts};

type Result<T> = std::result::Result<T, Box<dyn Error>>;

pub(crate) fn run(command: Command, out: &mut impl Write) -> Result<ExitCode> {
    let clean = execute(command, out)?;
    Ok(if clean { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

/// Runs one command; `false` means it completed but found problems.
fn execute(command: Command, out: &mut impl Write) -> Result<bool> {
    match command {
        Command::Catalog { schema, namespace, types } => {
            let catalog = load_catalog(schema.as_deref())?;
            let category = if types { Category::Types } else { Category::Functions };
            print_catalog(&catalog, category, namespace.as_deref(), out)?;
            Ok(true)
        }
        Command::Docs { command: DocsCommand::Build { out: dir, schema } } => {
            let catalog = load_catalog(schema.as_deref())?;
            build_docs(&catalog, &dir, out)
        }
        Command::Docs { command: DocsCommand::Check { dir } } => check_docs(&dir, out),
        Command::Session(opts) => {
            print_session(&opts, out)?;
            Ok(true)
        }
    }
}

fn load_catalog(schema: Option<&Path>) -> Result<Catalog> {
    let Some(path) = schema else {
        return Ok(Catalog::bundled());
    };
    let text = std::fs::read_to_string(path).map_err(|e| format!("cannot read {}: {e}", path.display()))?;
    let parsed = parse_schema(&text);
    log::info!(
        "{}: {} definitions, {} unparsable",
        path.display(),
        parsed.definitions.len(),
        parsed.errors.len()
    );
    Ok(Catalog::from_schema(&parsed))
}

fn print_catalog(catalog: &Catalog, category: Category, only: Option<&str>, out: &mut impl Write) -> Result<()> {
    let namespaces = catalog.namespaces(category);
    if let Some(ns) = only {
        if !namespaces.contains(&ns) {
            return Err(format!("no {} in namespace {ns:?}", category.label()).into());
        }
    }

    match catalog.layer() {
        Some(layer) => writeln!(out, "layer {layer}")?,
        None => writeln!(out, "layer unknown")?,
    }
    for ns in namespaces.into_iter().filter(|ns| only.is_none_or(|o| o == *ns)) {
        let entries = catalog.entries(category, ns);
        writeln!(out, "{} ({})", if ns.is_empty() { "(top level)" } else { ns }, entries.len())?;
        let width = entries.iter().map(|e| e.display.len()).max().unwrap_or(0);
        for e in entries {
            writeln!(out, "  {:<width$}  {}#{:08x}", e.display, e.name, e.id)?;
        }
    }
    Ok(())
}

fn build_docs(catalog: &Catalog, dir: &Path, out: &mut impl Write) -> Result<bool> {
    let report = verify(catalog);
    let docs = DocSet::render(catalog);
    docs.write_to(dir).map_err(|e| format!("cannot write {}: {e}", dir.display()))?;
    writeln!(out, "wrote {} pages to {}", docs.len(), dir.display())?;
    writeln!(out, "{report}")?;
    Ok(report.is_clean())
}

fn check_docs(dir: &Path, out: &mut impl Write) -> Result<bool> {
    let docs = DocSet::read_from(dir).map_err(|e| format!("cannot read {}: {e}", dir.display()))?;
    if docs.is_empty() {
        return Err(format!("{} contains no pages", dir.display()).into());
    }
    let report = check(&docs);
    log::debug!("checked {} pages under {}", docs.len(), dir.display());
    writeln!(out, "{report}")?;
    Ok(report.is_clean())
}

fn print_session(opts: &SessionOpts, out: &mut impl Write) -> Result<()> {
    let file = opts.config.as_deref().map(FileConfig::load).transpose()?;
    let args = SessionArgs {
        app_version:    opts.app_version.clone(),
        device_model:   opts.device_model.clone(),
        system_version: opts.system_version.clone(),
        lang_code:      opts.lang_code.clone(),
    };
    writeln!(out, "{}", SessionParams::resolve(&args, file.as_ref()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn output(f: impl FnOnce(&mut Vec<u8>) -> Result<bool>) -> (bool, String) {
        let mut buf = Vec::new();
        let clean = f(&mut buf).unwrap();
        (clean, String::from_utf8(buf).unwrap())
    }

    #[test]
    fn catalog_filtered_to_namespace() {
        let (_, text) = output(|out| {
            execute(Command::Catalog { schema: None, namespace: Some("account".into()), types: false }, out)
        });
        assert!(text.starts_with("layer 224\naccount ("));
        assert!(text.contains("account.getAuthorizations#e320c158"));
        assert!(!text.contains("(top level)"));
    }

    #[test]
    fn unknown_namespace_is_an_error() {
        let mut buf = Vec::new();
        let cmd = Command::Catalog { schema: None, namespace: Some("nope".into()), types: false };
        assert!(execute(cmd, &mut buf).is_err());
    }

    #[test]
    fn build_then_check() {
        let dir = tempfile::tempdir().unwrap();
        let (clean, text) = output(|out| {
            execute(Command::Docs { command: DocsCommand::Build { out: dir.path().to_owned(), schema: None } }, out)
        });
        assert!(clean);
        assert!(text.starts_with("wrote "));

        let (clean, text) =
            output(|out| execute(Command::Docs { command: DocsCommand::Check { dir: dir.path().to_owned() } }, out));
        assert!(clean);
        assert!(text.starts_with("ok: "));

        std::fs::remove_file(dir.path().join("functions").join("account").join("GetAuthorizations.md")).unwrap();
        let (clean, text) =
            output(|out| execute(Command::Docs { command: DocsCommand::Check { dir: dir.path().to_owned() } }, out));
        assert!(!clean);
        assert!(text.contains("missing page: functions/account/index.md links functions/account/GetAuthorizations.md"));
    }

    #[test]
    fn session_merges_file_and_flags() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("quill.toml");
        std::fs::write(&path, "[client]\ndevice_model = \"Desk\"\napp_version = \"9\"\n").unwrap();

        let opts = SessionOpts { config: Some(path), app_version: Some("10".into()), ..Default::default() };
        let (_, text) = output(|out| execute(Command::Session(opts), out));
        assert!(text.contains("app_version    = \"10\""));
        assert!(text.contains("device_model   = \"Desk\""));
        assert!(text.contains("lang_code      = \"en\""));
    }
}
