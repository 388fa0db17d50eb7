//! In-memory form of `spirv.core.grammar.json`.
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Clone, Deserialize)]
pub struct Grammar {
    #[serde(default)]
    pub major_version: Option<u32>,
    #[serde(default)]
    pub minor_version: Option<u32>,
    #[serde(default)]
    pub revision: Option<u32>,
    pub instructions: Vec<Instruction>,
    #[serde(default)]
    pub operand_kinds: Vec<OperandKind>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Instruction {
    pub opname: String,
    #[serde(default)]
    pub class: String,
    pub opcode: u32,
    #[serde(default)]
    pub operands: Vec<Operand>,
    #[serde(default)]
    pub capabilities: Vec<String>,
    #[serde(default)]
    pub extensions: Vec<String>,
    #[serde(default)]
    pub version: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Operand {
    pub kind: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub quantifier: Option<Quantifier>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum Quantifier {
    #[serde(rename = "?")]
    Optional,
    #[serde(rename = "*")]
    Variadic,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OperandKind {
    #[serde(default)]
    pub category: String,
    pub kind: String,
    #[serde(default)]
    pub enumerants: Vec<Enumerant>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Enumerant {
    pub enumerant: String,
    pub value: Value,
    #[serde(default)]
    pub capabilities: Vec<String>,
}

impl Grammar {
    /// Read and deserialize a grammar file. Nothing is returned on failure.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read grammar file {}", path.display()))?;
        Self::from_json_str(&contents)
            .with_context(|| format!("failed to parse grammar file {}", path.display()))
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let grammar: Grammar = serde_json::from_str(json)?;
        Ok(grammar)
    }

    pub fn operand_kind(&self, kind: &str) -> Option<&OperandKind> {
        self.operand_kinds.iter().find(|k| k.kind == kind)
    }

    pub fn instruction(&self, opname: &str) -> Option<&Instruction> {
        self.instructions.iter().find(|inst| inst.opname == opname)
    }

    /// Enumerants of an operand kind, or an empty slice when the grammar lacks it.
    pub fn enumerants(&self, kind: &str) -> &[Enumerant] {
        self.operand_kind(kind)
            .map(|k| k.enumerants.as_slice())
            .unwrap_or(&[])
    }
}

impl Instruction {
    pub fn has_result_type(&self) -> bool {
        self.operands.iter().any(|op| op.kind == "IdResultType")
    }
}

impl Operand {
    pub fn is_result_slot(&self) -> bool {
        matches!(self.kind.as_str(), "IdResult" | "IdResultType")
    }

    pub fn is_optional(&self) -> bool {
        matches!(self.quantifier, Some(Quantifier::Optional))
    }
}

impl Enumerant {
    /// Value as written in the grammar: integers in decimal, hex strings verbatim.
    pub fn display_value(&self) -> String {
        match &self.value {
            Value::String(text) => text.clone(),
            other => other.to_string(),
        }
    }
}
