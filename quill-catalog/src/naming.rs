//! Display names for TL identifiers.

/// Converts `some_ok_name`, `someOKName` or `req_DH_params` into
/// `SomeOkName` / `ReqDhParams`.
///
/// A leading namespace (`channels.createChannel`) is stripped. Runs of
/// capitals are folded to one word, except that the last capital of a run
/// followed by a lowercase letter starts the next word
/// (`answerWebhookJSONQuery` → `AnswerWebhookJsonQuery`).
pub fn to_pascal(name: &str) -> String {
    let name = name.rsplit('.').next().unwrap_or(name);

    let mut out = String::with_capacity(name.len());
    let mut next_upper = true;
    let mut prev_upper = false;
    let mut chars = name.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '_' {
            next_upper = true;
            prev_upper = false;
            continue;
        }
        if next_upper {
            out.push(ch.to_ascii_uppercase());
            next_upper = false;
            prev_upper = ch.is_ascii_uppercase();
        } else if ch.is_ascii_uppercase() {
            let starts_word = chars.peek().is_some_and(char::is_ascii_lowercase);
            if prev_upper && !starts_word {
                out.push(ch.to_ascii_lowercase());
            } else {
                out.push(ch);
            }
            prev_upper = true;
        } else {
            out.push(ch);
            prev_upper = false;
        }
    }
    out
}

/// `createChannel` → `create_channel`, `req_DH_params` → `req_dh_params`.
pub fn to_snake(name: &str) -> String {
    let pascal = to_pascal(name);
    let mut out = String::with_capacity(pascal.len() + 4);
    for (i, ch) in pascal.chars().enumerate() {
        if ch.is_ascii_uppercase() {
            if i > 0 {
                out.push('_');
            }
            out.push(ch.to_ascii_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}

/// `channels.CreateChannel`, or just `ReqPq` at the top level.
pub fn display_name(namespace: &[String], name: &str) -> String {
    let mut s = String::new();
    for ns in namespace {
        s.push_str(ns);
        s.push('.');
    }
    s.push_str(&to_pascal(name));
    s
}
