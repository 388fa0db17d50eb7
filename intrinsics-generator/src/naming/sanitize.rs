//! Identifier helpers for grammar names.
use std::collections::HashSet;

use once_cell::sync::Lazy;

/// Words that cannot be used as HLSL parameter names.
const RESERVED_WORDS: &[&str] = &[
    "asm", "bool", "break", "buffer", "case", "cbuffer", "centroid", "class", "column_major",
    "compile", "const", "continue", "default", "discard", "do", "double", "else", "enum",
    "export", "extern", "false", "float", "for", "groupshared", "half", "if", "in", "inline",
    "inout", "int", "interface", "line", "lineadj", "linear", "matrix", "namespace",
    "nointerpolation", "noperspective", "operator", "out", "packoffset", "point", "precise",
    "register", "return", "row_major", "sample", "sampler", "shared", "sizeof", "snorm",
    "static", "struct", "switch", "tbuffer", "template", "texture", "this", "triangle", "true",
    "typedef", "typename", "uint", "uniform", "unorm", "unsigned", "using", "vector", "void",
    "volatile", "while",
];

static RESERVED: Lazy<HashSet<&'static str>> =
    Lazy::new(|| RESERVED_WORDS.iter().copied().collect());

const ESCAPE_PREFIX: char = '_';

const STRIP_CHARS: &[char] = &[',', ' ', '"', '\'', '\t', '\n', '(', ')', '{', '}', '[', ']'];

/// Remove the quoting the grammar wraps operand names in.
///
/// `"'Resident Code'"` becomes `ResidentCode`, `"'Ray-Flags'"` becomes `Ray_Flags`.
pub fn strip_name(raw: &str) -> String {
    raw.trim_matches(STRIP_CHARS)
        .chars()
        .filter(|c| !c.is_whitespace())
        .map(|c| if c == '-' { '_' } else { c })
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
        .collect()
}

pub fn lower_first(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_ascii_lowercase().to_string() + chars.as_str(),
        None => String::new(),
    }
}

pub fn is_reserved(name: &str) -> bool {
    RESERVED.contains(name)
}

pub fn escape_reserved(name: &str) -> String {
    let starts_with_digit = name.chars().next().is_some_and(|c| c.is_ascii_digit());
    if is_reserved(name) || starts_with_digit {
        format!("{ESCAPE_PREFIX}{name}")
    } else {
        name.to_string()
    }
}

/// Parameter name for a raw grammar operand name.
pub fn param_name(raw: &str) -> String {
    escape_reserved(&lower_first(&strip_name(raw)))
}

/// `OpAtomicIAdd` -> `atomicIAdd`.
pub fn function_name(opname: &str) -> String {
    lower_first(opname.strip_prefix("Op").unwrap_or(opname))
}

/// Identifier tokens of a type expression, in order of appearance.
pub fn identifiers(text: &str) -> impl Iterator<Item = &str> {
    text.split(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
        .filter(|token| !token.is_empty())
}

pub fn is_generic_letter(token: &str) -> bool {
    token.len() == 1 && token.chars().all(|c| c.is_ascii_uppercase())
}

/// Standalone single upper-case letters of a type expression, deduplicated,
/// in order of appearance.
pub fn generic_names(text: &str) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();
    for token in identifiers(text) {
        if is_generic_letter(token) && !names.iter().any(|n| n == token) {
            names.push(token.to_string());
        }
    }
    names
}
