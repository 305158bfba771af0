use crate::types::{TypeDescriptor, TypeSystem};

/// Minimal C declaration parser.
///
/// Understands builtin scalar names (with `signed`/`unsigned` and the
/// `<stdint.h>` spellings), trailing `*` and `[N]` declarators, and treats
/// any other base name as a named type. Qualifiers (`const`, `volatile`) are
/// dropped.
#[derive(Debug, Clone, Copy, Default)]
pub struct CTypeSystem;

impl TypeSystem for CTypeSystem {
    fn parse_declaration(&self, decl: &str) -> Option<TypeDescriptor> {
        let (rest, dims) = split_array_dims(decl.trim())?;
        let pointers = rest.chars().rev().take_while(|c| *c == '*' || c.is_whitespace());
        let pointer_depth = pointers.filter(|c| *c == '*').count();
        let base = rest.trim_end_matches(|c: char| c == '*' || c.is_whitespace());

        let words: Vec<&str> = base
            .split_whitespace()
            .filter(|w| !matches!(*w, "const" | "volatile" | "__restrict" | "restrict"))
            .collect();
        if words.is_empty() {
            return None;
        }

        let mut ty = parse_base(&words)?;
        for _ in 0..pointer_depth {
            ty = TypeDescriptor::pointer_to(ty);
        }
        for len in dims.into_iter().rev() {
            ty = TypeDescriptor::array_of(ty, len);
        }
        Some(ty)
    }
}

/// Strip trailing `[N]` groups, returning them outermost first.
fn split_array_dims(decl: &str) -> Option<(&str, Vec<u64>)> {
    let mut rest = decl;
    let mut dims = Vec::new();
    while let Some(stripped) = rest.strip_suffix(']') {
        let open = stripped.rfind('[')?;
        let len = stripped[open + 1..].trim().parse::<u64>().ok()?;
        dims.push(len);
        rest = stripped[..open].trim_end();
    }
    dims.reverse();
    Some((rest, dims))
}

fn parse_base(words: &[&str]) -> Option<TypeDescriptor> {
    if let [keyword, name] = words {
        if matches!(*keyword, "struct" | "union" | "enum" | "class") {
            return Some(TypeDescriptor::named(*name));
        }
    }

    let mut signed = true;
    let mut explicit_sign = false;
    let mut core: Vec<&str> = Vec::new();
    for w in words {
        match *w {
            "unsigned" => {
                signed = false;
                explicit_sign = true;
            }
            "signed" => explicit_sign = true,
            other => core.push(other),
        }
    }

    let ty = match core.as_slice() {
        [] if explicit_sign => TypeDescriptor::int(32, signed),
        ["void"] if !explicit_sign => TypeDescriptor::Void,
        ["bool"] | ["_Bool"] if !explicit_sign => TypeDescriptor::Bool,
        ["char"] => TypeDescriptor::int(8, signed),
        ["short"] | ["short", "int"] => TypeDescriptor::int(16, signed),
        ["int"] => TypeDescriptor::int(32, signed),
        ["long"] | ["long", "int"] => TypeDescriptor::int(64, signed),
        ["long", "long"] | ["long", "long", "int"] => TypeDescriptor::int(64, signed),
        ["float"] if !explicit_sign => TypeDescriptor::Float { bits: 32 },
        ["double"] if !explicit_sign => TypeDescriptor::Float { bits: 64 },
        ["long", "double"] if !explicit_sign => TypeDescriptor::Float { bits: 80 },
        [name] if !explicit_sign => stdint(name).unwrap_or_else(|| TypeDescriptor::named(*name)),
        _ => return None,
    };
    Some(ty)
}

/// `int32_t`, `uint8_t`, ... and their `__int32` spellings.
fn stdint(name: &str) -> Option<TypeDescriptor> {
    let (signed, digits) = if let Some(rest) = name.strip_prefix("uint") {
        (false, rest.strip_suffix("_t")?)
    } else if let Some(rest) = name.strip_prefix("int") {
        (true, rest.strip_suffix("_t")?)
    } else if let Some(rest) = name.strip_prefix("__int") {
        (true, rest)
    } else {
        return None;
    };
    match digits.parse::<u8>().ok()? {
        bits @ (8 | 16 | 32 | 64 | 128) => Some(TypeDescriptor::int(bits, signed)),
        _ => None,
    }
}
