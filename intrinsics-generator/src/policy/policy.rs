//! Generation policy: which instructions become declarations and how.
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;

use crate::grammar::Instruction;
use crate::numeric::TypeClass;
use crate::operands::Shape;
use crate::overload::ExpandRequest;

const DEFAULT_FIELDS: &str = include_str!("../../data/fields.json");
const SUPPORTED_VERSION: u32 = 1;

/// Enumerant sections the generator can emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
pub enum EnumerantSection {
    BuiltIn,
    ExecutionMode,
    GroupOperation,
}

impl EnumerantSection {
    /// Operand kind holding the enumerants in the grammar.
    pub fn kind(self) -> &'static str {
        match self {
            EnumerantSection::BuiltIn => "BuiltIn",
            EnumerantSection::ExecutionMode => "ExecutionMode",
            EnumerantSection::GroupOperation => "GroupOperation",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Policy {
    exclude_suffixes: Vec<String>,
    sections: Vec<EnumerantSection>,
    classes: BTreeMap<String, ClassPolicy>,
    instructions: BTreeMap<String, InstructionPolicy>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassPolicy {
    pub shapes: Vec<Shape>,
    pub only_listed: bool,
    pub type_class: Option<TypeClass>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InstructionPolicy {
    pub shapes: Option<Vec<Shape>>,
    pub result_type: Option<String>,
    pub operand_type: Option<String>,
    pub conditions: Vec<String>,
}

/// Resolved treatment of one instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Strategy {
    pub shapes: Vec<Shape>,
    pub result_type: Option<String>,
    pub operand_type: Option<String>,
    pub type_class: Option<TypeClass>,
    pub conditions: Vec<String>,
}

impl Strategy {
    pub fn requests(&self) -> impl Iterator<Item = ExpandRequest> + '_ {
        self.shapes.iter().map(|shape| ExpandRequest {
            shape: *shape,
            result_type: self.result_type.clone(),
            operand_type: self.operand_type.clone(),
            type_class: self.type_class,
            conditions: self.conditions.clone(),
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct PolicyJson {
    version: u32,
    #[serde(default)]
    exclude_suffixes: Vec<String>,
    #[serde(default)]
    enumerants: Vec<EnumerantSection>,
    #[serde(default)]
    classes: Vec<ClassPolicyJson>,
    #[serde(default)]
    instructions: Vec<InstructionPolicyJson>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ClassPolicyJson {
    class: String,
    #[serde(default)]
    shapes: Option<Vec<Shape>>,
    #[serde(default)]
    only_listed: bool,
    #[serde(default)]
    type_class: Option<TypeClass>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct InstructionPolicyJson {
    instruction: String,
    #[serde(default)]
    shapes: Option<Vec<Shape>>,
    #[serde(default)]
    result_type: Option<String>,
    #[serde(default)]
    operand_type: Option<String>,
    #[serde(default)]
    conditions: Vec<String>,
}

fn check_shapes(shapes: &Option<Vec<Shape>>, owner: &str) -> Result<()> {
    match shapes {
        Some(list) if list.is_empty() => Err(anyhow!("{owner} has an empty shapes list")),
        _ => Ok(()),
    }
}

impl Policy {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read fields file {}", path.display()))?;
        Self::from_json_str(&contents)
            .with_context(|| format!("invalid fields file {}", path.display()))
    }

    pub fn embedded() -> Result<Self> {
        Self::from_json_str(DEFAULT_FIELDS).context("invalid embedded fields file")
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let file: PolicyJson = serde_json::from_str(json)?;
        if file.version != SUPPORTED_VERSION {
            return Err(anyhow!(
                "unsupported fields version {} (expected {SUPPORTED_VERSION})",
                file.version
            ));
        }

        let mut classes = BTreeMap::new();
        for item in file.classes {
            check_shapes(&item.shapes, &format!("class {}", item.class))?;
            let policy = ClassPolicy {
                shapes: item.shapes.unwrap_or_else(|| vec![Shape::Default]),
                only_listed: item.only_listed,
                type_class: item.type_class,
            };
            if classes.insert(item.class.clone(), policy).is_some() {
                return Err(anyhow!("duplicate class policy: {}", item.class));
            }
        }

        let mut instructions = BTreeMap::new();
        for item in file.instructions {
            check_shapes(&item.shapes, &format!("instruction {}", item.instruction))?;
            let policy = InstructionPolicy {
                shapes: item.shapes,
                result_type: item.result_type,
                operand_type: item.operand_type,
                conditions: item.conditions,
            };
            if instructions.insert(item.instruction.clone(), policy).is_some() {
                return Err(anyhow!("duplicate instruction policy: {}", item.instruction));
            }
        }

        let mut sections = Vec::new();
        for section in file.enumerants {
            if sections.contains(&section) {
                return Err(anyhow!("duplicate enumerant section: {}", section.kind()));
            }
            sections.push(section);
        }

        Ok(Self {
            exclude_suffixes: file.exclude_suffixes,
            sections,
            classes,
            instructions,
        })
    }

    pub fn is_excluded(&self, name: &str) -> bool {
        self.exclude_suffixes.iter().any(|suffix| name.ends_with(suffix.as_str()))
    }

    pub fn emits(&self, section: EnumerantSection) -> bool {
        self.sections.contains(&section)
    }

    pub fn class(&self, class: &str) -> Option<&ClassPolicy> {
        self.classes.get(class)
    }

    pub fn instruction(&self, opname: &str) -> Option<&InstructionPolicy> {
        self.instructions.get(opname)
    }

    /// How `instruction` is emitted, or `None` when it is not emitted at all.
    ///
    /// An instruction entry wins over its class entry; a class marked
    /// `only_listed` emits nothing but its listed instructions.
    pub fn strategy(&self, instruction: &Instruction) -> Option<Strategy> {
        if self.is_excluded(&instruction.opname) {
            return None;
        }
        let class = self.class(&instruction.class);
        if let Some(listed) = self.instruction(&instruction.opname) {
            let shapes = listed
                .shapes
                .clone()
                .or_else(|| class.map(|c| c.shapes.clone()))
                .unwrap_or_else(|| vec![Shape::Default]);
            return Some(Strategy {
                shapes,
                result_type: listed.result_type.clone(),
                operand_type: listed.operand_type.clone(),
                type_class: class.and_then(|c| c.type_class),
                conditions: listed.conditions.clone(),
            });
        }
        class.filter(|c| !c.only_listed).map(|c| Strategy {
            shapes: c.shapes.clone(),
            result_type: None,
            operand_type: None,
            type_class: c.type_class,
            conditions: Vec::new(),
        })
    }
}
