use quill_tl_parser::errors::ParseError;
use quill_tl_parser::{detect_layer, parse_schema, parse_tl_file, tl::Category};

#[test]
fn parses_simple_type() {
    let src = "boolFalse#bc799737 = Bool;";
    let defs: Vec<_> = parse_tl_file(src).collect::<Result<_, _>>().unwrap();
    assert_eq!(defs.len(), 1);
    assert_eq!(defs[0].name, "boolFalse");
    assert_eq!(defs[0].id, 0xbc799737);
    assert_eq!(defs[0].ty.name, "Bool");
    assert_eq!(defs[0].category, Category::Types);
}

#[test]
fn parses_function_category() {
    let src = "
---functions---
help.getConfig#c4f9186b = Config;
";
    let defs: Vec<_> = parse_tl_file(src).collect::<Result<_, _>>().unwrap();
    assert_eq!(defs.len(), 1);
    assert_eq!(defs[0].category, Category::Functions);
    assert_eq!(defs[0].name, "getConfig");
    assert_eq!(defs[0].namespace, vec!["help"]);
}

#[test]
fn types_marker_switches_back() {
    let src = "
---functions---
ping#7abe77ec ping_id:long = Pong;
---types---
pong#347773c5 msg_id:long ping_id:long = Pong;
";
    let defs: Vec<_> = parse_tl_file(src).collect::<Result<_, _>>().unwrap();
    assert_eq!(defs[0].category, Category::Functions);
    assert_eq!(defs[1].category, Category::Types);
}

#[test]
fn parses_flagged_parameter() {
    let src = "channels.createChannel#91006707 flags:# broadcast:flags.0?true \
               title:string geo_point:flags.2?InputGeoPoint = Updates;";
    let defs: Vec<_> = parse_tl_file(src).collect::<Result<_, _>>().unwrap();
    assert_eq!(defs[0].params.len(), 4);
    assert!(defs[0].params[1].ty.is_flag_bool());
    assert!(defs[0].params[3].is_optional());
    assert!(!defs[0].params[2].is_optional());
}

#[test]
fn skips_blank_lines_and_comments() {
    let src = "
// this is a comment
boolTrue#997275b5 = Bool;
// another comment

boolFalse#bc799737 = Bool;
";
    let defs: Vec<_> = parse_tl_file(src).collect::<Result<_, _>>().unwrap();
    assert_eq!(defs.len(), 2);
}

#[test]
fn multi_line_definition() {
    let src = "auth.sendCode#a677244f phone_number:string
    api_id:int api_hash:string
    settings:CodeSettings = auth.SentCode;";
    let defs: Vec<_> = parse_tl_file(src).collect::<Result<_, _>>().unwrap();
    assert_eq!(defs.len(), 1);
    assert_eq!(defs[0].params.len(), 4);
    assert_eq!(defs[0].ty.full_name(), "auth.SentCode");
}

#[test]
fn derived_id_matches_explicit() {
    let src = "
---functions---
account.getAuthorizations = account.Authorizations;
account.resetAuthorization hash:long = Bool;
";
    let defs: Vec<_> = parse_tl_file(src).collect::<Result<_, _>>().unwrap();
    assert_eq!(defs[0].id, 0xe320c158);
    assert_eq!(defs[1].id, 0xdf77f3bc);
}

#[test]
fn schema_collects_errors_with_line_numbers() {
    let src = "// LAYER 224
boolTrue#997275b5 = Bool;
broken#zz = Bool;
noType#1;
---functions---
ping#7abe77ec ping_id:long = Pong;
";
    let schema = parse_schema(src);
    assert_eq!(schema.layer, Some(224));
    assert_eq!(schema.definitions.len(), 2);
    assert_eq!(schema.functions().count(), 1);
    assert_eq!(schema.constructors().count(), 1);

    let lines: Vec<usize> = schema.errors.iter().map(|e| e.line).collect();
    assert_eq!(lines, vec![3, 4]);
    assert!(schema.errors[0].to_string().starts_with("line 3: invalid constructor id"));
}

#[test]
fn unterminated_last_definition_is_an_error() {
    let src = "---functions---\nhelp.getConfig#c4f9186b = Config;\nping#7abe77ec\n    ping_id:long = Pong\n";
    let schema = parse_schema(src);
    assert_eq!(schema.definitions.len(), 1);
    assert_eq!(schema.errors.len(), 1);
    assert_eq!(schema.errors[0].line, 3);
    assert_eq!(schema.errors[0].error, ParseError::Unterminated);

    let results: Vec<_> = parse_tl_file("foo#1 = Foo").collect();
    assert_eq!(results, vec![Err(ParseError::Unterminated)]);
}

#[test]
fn highest_layer_marker_wins() {
    let src = "// LAYER 97\nfoo#1 = Foo;\n// LAYER 224\n//LAYER x\n";
    assert_eq!(detect_layer(src), Some(224));
    assert_eq!(detect_layer("foo#1 = Foo;"), None);
}
