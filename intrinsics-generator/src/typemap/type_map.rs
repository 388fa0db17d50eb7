//! Operand type mappings loaded from a type-mapping JSON file.
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;

use crate::sanitize::{is_generic_letter, strip_name};

const DEFAULT_TYPE_MAPPING: &str = include_str!("../../data/type_mapping.json");

#[derive(Debug, Clone)]
pub struct TypeMap {
    default_type: String,
    classes: BTreeMap<String, InstructionTypeMap>,
    instructions: BTreeMap<String, InstructionTypeMap>,
}

/// Mappings attached to one instruction or one instruction class.
#[derive(Debug, Clone, Default)]
pub struct InstructionTypeMap {
    pub result: Option<OperandTypeInfo>,
    pub params: Vec<OperandTypeInfo>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperandTypeInfo {
    pub kind: String,
    /// Stripped operand name; `None` matches every operand of `kind`.
    pub name: Option<String>,
    pub type_name: String,
    pub generic: Option<bool>,
    pub is_const: bool,
    pub attributes: Vec<String>,
    pub overloads: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct TypeMapJson {
    default: Option<String>,
    #[serde(default, rename = "classMappings")]
    class_mappings: Vec<ClassMappingJson>,
    #[serde(default, rename = "instructionMappings")]
    instruction_mappings: Vec<InstructionMappingJson>,
}

#[derive(Debug, Deserialize)]
struct ClassMappingJson {
    class: Option<String>,
    types: Option<Vec<TypeEntryJson>>,
}

#[derive(Debug, Deserialize)]
struct InstructionMappingJson {
    instruction: Option<String>,
    types: Option<Vec<TypeEntryJson>>,
}

#[derive(Debug, Deserialize)]
struct TypeEntryJson {
    kind: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(rename = "type")]
    type_name: String,
    #[serde(default)]
    overloads: Vec<String>,
    #[serde(default, rename = "const")]
    is_const: bool,
    #[serde(default)]
    attributes: Vec<String>,
    #[serde(default)]
    generic: Option<bool>,
}

impl TypeMap {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read type mapping file {}", path.display()))?;
        Self::from_json_str(&contents)
            .with_context(|| format!("invalid type mapping file {}", path.display()))
    }

    /// The mapping shipped with the generator.
    pub fn embedded() -> Result<Self> {
        Self::from_json_str(DEFAULT_TYPE_MAPPING).context("invalid embedded type mapping")
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let file: TypeMapJson = serde_json::from_str(json)?;
        let default_type = file
            .default
            .ok_or_else(|| anyhow!("no 'default' field in type mapping, check type mapping json file"))?;
        if is_generic_letter(&default_type) {
            return Err(anyhow!(
                "default type '{default_type}' must not be generic, check type mapping json file"
            ));
        }

        let mut classes = BTreeMap::new();
        for item in file.class_mappings {
            let key = item
                .class
                .ok_or_else(|| anyhow!("no 'class' field in class mapping, check type mapping json file"))?;
            let types = item.types.ok_or_else(|| {
                anyhow!("no 'types' field in class mapping {key}, check type mapping json file")
            })?;
            let mapping = build_instruction_map(types)
                .with_context(|| format!("class mapping {key}"))?;
            if classes.insert(key.clone(), mapping).is_some() {
                return Err(anyhow!("redefinition of class in class mappings: {key}"));
            }
        }

        let mut instructions = BTreeMap::new();
        for item in file.instruction_mappings {
            let key = item.instruction.ok_or_else(|| {
                anyhow!("no 'instruction' field in instruction mapping, check type mapping json file")
            })?;
            let types = item.types.ok_or_else(|| {
                anyhow!("no 'types' field in instruction mapping {key}, check type mapping json file")
            })?;
            let mapping = build_instruction_map(types)
                .with_context(|| format!("instruction mapping {key}"))?;
            if instructions.insert(key.clone(), mapping).is_some() {
                return Err(anyhow!("redefinition of instruction in instruction mappings: {key}"));
            }
        }

        Ok(Self {
            default_type,
            classes,
            instructions,
        })
    }

    pub fn default_type(&self) -> &str {
        &self.default_type
    }

    pub fn class_mapping(&self, class: &str) -> Option<&InstructionTypeMap> {
        self.classes.get(class)
    }

    pub fn instruction_mapping(&self, opname: &str) -> Option<&InstructionTypeMap> {
        self.instructions.get(opname)
    }
}

fn build_instruction_map(types: Vec<TypeEntryJson>) -> Result<InstructionTypeMap> {
    if types.is_empty() {
        return Err(anyhow!("'types' field is empty, check type mapping json file"));
    }
    let mut map = InstructionTypeMap::default();
    for entry in types {
        let info = OperandTypeInfo {
            name: entry.name.as_deref().map(strip_name),
            kind: entry.kind,
            type_name: entry.type_name,
            generic: entry.generic,
            is_const: entry.is_const,
            attributes: entry.attributes,
            overloads: entry.overloads,
        };
        if info.is_result() {
            if map.result.is_some() {
                return Err(anyhow!("more than one result type entry"));
            }
            map.result = Some(info);
        } else {
            map.params.push(info);
        }
    }
    Ok(map)
}

impl InstructionTypeMap {
    /// Entry for an operand: a name match beats a kind-wide entry.
    pub fn operand(&self, kind: &str, name: Option<&str>) -> Option<&OperandTypeInfo> {
        let stripped = name.map(strip_name);
        self.params
            .iter()
            .find(|info| info.kind == kind && info.name.is_some() && info.name == stripped)
            .or_else(|| {
                self.params
                    .iter()
                    .find(|info| info.kind == kind && info.name.is_none())
            })
    }
}

impl OperandTypeInfo {
    pub fn is_result(&self) -> bool {
        matches!(self.kind.as_str(), "IdResult" | "IdResultType")
    }

    /// Type text for an overload variant; entries without overloads ignore the index.
    pub fn select(&self, variant: usize) -> Result<&str> {
        if self.overloads.is_empty() {
            return Ok(&self.type_name);
        }
        self.overloads
            .get(variant)
            .map(String::as_str)
            .ok_or_else(|| {
                anyhow!(
                    "overload variant {variant} out of range for {} {} ({} variants)",
                    self.kind,
                    self.name.as_deref().unwrap_or("<result>"),
                    self.overloads.len()
                )
            })
    }

    pub fn is_generic(&self, type_name: &str) -> bool {
        self.generic.unwrap_or_else(|| is_generic_letter(type_name))
    }
}
