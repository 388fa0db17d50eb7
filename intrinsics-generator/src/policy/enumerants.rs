//! Enumerant sections: builtin variables, execution modes and group operations.
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;

use crate::grammar::Enumerant;
use crate::sanitize::{escape_reserved, lower_first};

const DEFAULT_ENUMERANTS: &str = include_str!("../../data/enumerants.json");

/// HLSL type and direction of one builtin variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuiltinVar {
    pub type_name: String,
    pub capability: Option<String>,
    pub output: bool,
}

#[derive(Debug, Clone, Default)]
pub struct EnumerantTables {
    builtins: BTreeMap<String, BuiltinVar>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct EnumerantsJson {
    version: u32,
    #[serde(default)]
    builtins: Vec<BuiltinJson>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct BuiltinJson {
    name: String,
    #[serde(rename = "type")]
    type_name: String,
    #[serde(default)]
    capability: Option<String>,
    #[serde(default)]
    output: bool,
}

impl EnumerantTables {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read enumerants file {}", path.display()))?;
        Self::from_json_str(&contents)
            .with_context(|| format!("invalid enumerants file {}", path.display()))
    }

    pub fn embedded() -> Result<Self> {
        Self::from_json_str(DEFAULT_ENUMERANTS).context("invalid embedded enumerants file")
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        let file: EnumerantsJson = serde_json::from_str(json)?;
        if file.version != 1 {
            return Err(anyhow!("unsupported enumerants version {}", file.version));
        }
        let mut builtins = BTreeMap::new();
        for item in file.builtins {
            let var = BuiltinVar {
                type_name: item.type_name,
                capability: item.capability,
                output: item.output,
            };
            if builtins.insert(item.name.clone(), var).is_some() {
                return Err(anyhow!("duplicate builtin: {}", item.name));
            }
        }
        Ok(Self { builtins })
    }

    pub fn builtin(&self, name: &str) -> Option<&BuiltinVar> {
        self.builtins.get(name)
    }
}

/// Builtin variables listed in `tables`, in grammar order.
pub fn write_builtins(out: &mut String, enumerants: &[Enumerant], tables: &EnumerantTables) {
    out.push_str("\n//! Builtins\nnamespace builtin\n{\n");
    for enumerant in enumerants {
        let name = &enumerant.enumerant;
        let Some(var) = tables.builtin(name) else {
            continue;
        };
        if let Some(cap) = &var.capability {
            out.push_str(&format!("[[vk::ext_capability(spv::Capability{cap})]]\n"));
        }
        if var.output {
            out.push_str(&format!("[[vk::ext_builtin_output(spv::BuiltIn{name})]]\n"));
            out.push_str(&format!("static {} {name};\n\n", var.type_name));
        } else {
            out.push_str(&format!("[[vk::ext_builtin_input(spv::BuiltIn{name})]]\n"));
            out.push_str(&format!("static const {} {name};\n\n", var.type_name));
        }
    }
    out.push_str("}\n");
}

pub fn write_execution_modes<F>(out: &mut String, enumerants: &[Enumerant], excluded: F)
where
    F: Fn(&str) -> bool,
{
    out.push_str("\n//! Execution Modes\nnamespace execution_mode\n{");
    for enumerant in enumerants.iter().filter(|e| !excluded(&e.enumerant)) {
        let name = &enumerant.enumerant;
        out.push_str(&format!(
            "\n\tvoid {}()\n\t{{\n\t\tvk::ext_execution_mode(spv::ExecutionMode{name});\n\t}}\n",
            escape_reserved(&lower_first(name))
        ));
    }
    out.push_str("}\n");
}

pub fn write_group_operations(out: &mut String, enumerants: &[Enumerant]) {
    out.push_str("\n//! Group Operations\nnamespace group_operation\n{\n");
    for enumerant in enumerants {
        out.push_str(&format!(
            "\tstatic const uint32_t {} = {};\n",
            enumerant.enumerant,
            enumerant.display_value()
        ));
    }
    out.push_str("}\n");
}
