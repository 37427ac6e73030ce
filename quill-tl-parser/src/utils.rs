//! Constructor id derivation for definitions written without `#id`.

/// Computes the id Telegram assigns to a TL definition.
///
/// The id is the CRC32 of a normalised form of the line: the `#id` tag and
/// trailing `;` are dropped, `{X:Type}` loses its braces, `<`/`>` become a
/// space/nothing, `bytes` fields are written as `string`, and
/// `flags.N?true` fields are omitted since they carry no data.
///
/// ```
/// use quill_tl_parser::tl_id;
/// assert_eq!(tl_id("boolFalse = Bool"), 0xbc799737);
/// assert_eq!(tl_id("invokeWithLayer#da9b0d0d {X:Type} layer:int query:!X = X;"), 0xda9b0d0d);
/// ```
pub fn tl_id(definition: &str) -> u32 {
    crc32(normalize(definition).as_bytes())
}

fn normalize(definition: &str) -> String {
    let definition = definition.trim().trim_end_matches(';').trim();
    let (lhs, rhs) = match definition.split_once('=') {
        Some((l, r)) => (l.trim(), Some(r.trim())),
        None => (definition, None),
    };

    let mut parts: Vec<String> = Vec::new();
    let mut tokens = lhs.split_whitespace();

    if let Some(head) = tokens.next() {
        let name = head.split_once('#').map_or(head, |(n, _)| n);
        parts.push(name.to_owned());
    }

    for token in tokens {
        if let Some(generic) = token.strip_prefix('{') {
            parts.push(generic.trim_end_matches('}').to_owned());
            continue;
        }
        let Some((name, ty)) = token.split_once(':') else {
            parts.push(token.to_owned());
            continue;
        };
        if is_true_flag(ty) {
            continue;
        }
        let ty = match ty.split_once('?') {
            Some((cond, "bytes")) => format!("{cond}?string"),
            None if ty == "bytes" => "string".to_owned(),
            _ => ty.to_owned(),
        };
        parts.push(format!("{name}:{}", flatten_generics(&ty)));
    }

    if let Some(rhs) = rhs {
        parts.push("=".to_owned());
        parts.push(flatten_generics(rhs));
    }

    parts.join(" ")
}

/// `flags.3?true`, `flags2.0?true`
fn is_true_flag(ty: &str) -> bool {
    match ty.split_once('?') {
        Some((cond, "true")) => cond
            .split_once('.')
            .is_some_and(|(_, bit)| !bit.is_empty() && bit.bytes().all(|b| b.is_ascii_digit())),
        _ => false,
    }
}

fn flatten_generics(ty: &str) -> String {
    ty.replace('<', " ").replace('>', "")
}

/// Standard CRC-32 (ISO 3309 / ITU-T V.42).
fn crc32(data: &[u8]) -> u32 {
    let mut crc: u32 = 0xFFFF_FFFF;
    for &byte in data {
        crc ^= u32::from(byte);
        for _ in 0..8 {
            crc = if crc & 1 != 0 { (crc >> 1) ^ 0xEDB8_8320 } else { crc >> 1 };
        }
    }
    !crc
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_definition() {
        assert_eq!(tl_id("boolTrue = Bool"), 0x997275b5);
    }

    #[test]
    fn true_flags_are_dropped() {
        let def = "authorization flags:# current:flags.0?true official_app:flags.1?true \
                   hash:long device_model:string platform:string system_version:string \
                   api_id:int app_name:string app_version:string date_created:int \
                   date_active:int ip:string country:string region:string = Authorization";
        assert_eq!(tl_id(def), 0xad01d61d);
    }

    #[test]
    fn bytes_is_hashed_as_string() {
        let def = "upload.saveFilePart file_id:long file_part:int bytes:bytes = Bool";
        assert_eq!(tl_id(def), 0xb304a621);
    }

    #[test]
    fn generic_vector_arguments() {
        assert_eq!(tl_id("users.getUsers id:Vector<InputUser> = Vector<User>"), 0x0d91a548);
    }

    #[test]
    fn normalize_keeps_conditional_data_fields() {
        assert_eq!(
            normalize("a#1 flags:# x:flags.0?bytes y:flags.1?true = B;"),
            "a flags:# x:flags.0?string = B"
        );
    }
}
