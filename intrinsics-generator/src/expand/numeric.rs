//! Numeric type classes encoded in instruction mnemonics.
use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeClass {
    /// `I`: any integer.
    Integer,
    /// `S`
    Signed,
    /// `U`
    Unsigned,
    /// `F`
    Float,
}

const SIGNED: &[&str] = &["int16_t", "int32_t", "int64_t"];
const UNSIGNED: &[&str] = &["uint16_t", "uint32_t", "uint64_t"];
const FLOATS: &[&str] = &["float16_t", "float32_t", "float64_t"];

impl TypeClass {
    pub fn from_letter(letter: char) -> Option<Self> {
        match letter {
            'I' => Some(TypeClass::Integer),
            'S' => Some(TypeClass::Signed),
            'U' => Some(TypeClass::Unsigned),
            'F' => Some(TypeClass::Float),
            _ => None,
        }
    }

    /// Concrete HLSL scalar types of this class.
    pub fn concrete_types(self) -> Vec<&'static str> {
        match self {
            TypeClass::Integer => SIGNED.iter().chain(UNSIGNED).copied().collect(),
            TypeClass::Signed => SIGNED.to_vec(),
            TypeClass::Unsigned => UNSIGNED.to_vec(),
            TypeClass::Float => FLOATS.to_vec(),
        }
    }
}

/// A type-class letter found in a function name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Discriminator {
    pub class: TypeClass,
    pub position: usize,
}

/// First upper-case letter followed by an upper-case and a lower-case letter
/// that names a type class: `atomicIAdd` -> `I` at 6, `groupNonUniformFMul` -> `F`.
pub fn find_discriminator(name: &str) -> Option<Discriminator> {
    let bytes = name.as_bytes();
    let mut idx = 0usize;
    while idx + 2 < bytes.len() {
        let (a, b, c) = (bytes[idx], bytes[idx + 1], bytes[idx + 2]);
        if a.is_ascii_uppercase() && b.is_ascii_uppercase() && c.is_ascii_lowercase() {
            if let Some(class) = TypeClass::from_letter(a as char) {
                return Some(Discriminator {
                    class,
                    position: idx,
                });
            }
            // matches never overlap
            idx += 3;
            continue;
        }
        idx += 1;
    }
    None
}

/// New name with the discriminator letter removed.
pub fn strip_discriminator(name: &str, discriminator: Discriminator) -> String {
    let mut out = String::with_capacity(name.len());
    out.push_str(&name[..discriminator.position]);
    out.push_str(&name[discriminator.position + 1..]);
    out
}

pub fn bit_width(type_name: &str) -> Option<u32> {
    match type_name {
        "int16_t" | "uint16_t" | "float16_t" => Some(16),
        "int32_t" | "uint32_t" | "float32_t" => Some(32),
        "int64_t" | "uint64_t" | "float64_t" => Some(64),
        _ => None,
    }
}

pub fn is_integer(type_name: &str) -> bool {
    SIGNED.contains(&type_name) || UNSIGNED.contains(&type_name)
}

pub fn is_float(type_name: &str) -> bool {
    FLOATS.contains(&type_name)
}

/// Capability a scalar type needs beyond the base shader capability.
pub fn type_capability(type_name: &str) -> Option<&'static str> {
    match type_name {
        "int16_t" | "uint16_t" => Some("Int16"),
        "int64_t" | "uint64_t" => Some("Int64"),
        "float16_t" => Some("Float16"),
        "float64_t" => Some("Float64"),
        _ => None,
    }
}

/// Whether a width-specific capability name admits `type_name`.
///
/// Capabilities without a width in their name admit everything.
pub fn capability_admits(capability: &str, type_name: &str) -> bool {
    let float_width = [("Float16", 16), ("Float32", 32), ("Float64", 64)]
        .into_iter()
        .find(|(tag, _)| capability.contains(tag));
    if let Some((_, width)) = float_width {
        return is_float(type_name) && bit_width(type_name) == Some(width);
    }
    let int_width = [("Int16", 16), ("Int64", 64)]
        .into_iter()
        .find(|(tag, _)| capability.contains(tag));
    if let Some((_, width)) = int_width {
        return is_integer(type_name) && bit_width(type_name) == Some(width);
    }
    true
}
