#![allow(dead_code)]

use anyhow::{anyhow, Result};
use intrinsics_generator::grammar::Instruction;
use intrinsics_generator::{
    EnumerantTables, GenerateOptions, Generated, Generator, Grammar, Policy, TypeMap,
};
use std::path::{Path, PathBuf};

pub fn data_path(rel: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("../tests/intrinsics/data")
        .join(rel)
}

pub fn load_grammar(rel: &str) -> Result<Grammar> {
    Grammar::load(data_path(rel))
}

pub fn generate_with(
    grammar: &Grammar,
    type_map: &TypeMap,
    options: GenerateOptions,
) -> Result<Generated> {
    let policy = Policy::embedded()?;
    let enumerants = EnumerantTables::embedded()?;
    Generator::new(grammar, &policy, type_map, &enumerants, options).generate()
}

/// Mini grammar through the embedded configuration.
pub fn generate_mini() -> Result<Generated> {
    let grammar = load_grammar("mini_grammar.json")?;
    let type_map = TypeMap::embedded()?;
    generate_with(&grammar, &type_map, GenerateOptions::default())
}

/// Text after the `//! Instructions` marker.
pub fn instructions_section(text: &str) -> Result<&str> {
    text.split_once("//! Instructions\n")
        .map(|(_, rest)| rest)
        .ok_or_else(|| anyhow!("missing instructions section"))
}

/// Single instruction parsed from its grammar JSON object.
pub fn instruction(json: &str) -> Result<Instruction> {
    let grammar = Grammar::from_json_str(&format!(
        r#"{{"major_version":1,"minor_version":6,"instructions":[{json}],"operand_kinds":[]}}"#
    ))?;
    grammar
        .instructions
        .into_iter()
        .next()
        .ok_or_else(|| anyhow!("fixture has no instruction"))
}
