//! Textual HLSL declarations.
use std::fmt;

use indexmap::IndexMap;

use crate::sanitize::{identifiers, is_generic_letter};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateParam {
    /// `typename T`
    Type(String),
    /// `uint32_t N`
    Value { ty: String, name: String },
}

impl TemplateParam {
    pub fn name(&self) -> &str {
        match self {
            TemplateParam::Type(name) => name,
            TemplateParam::Value { name, .. } => name,
        }
    }
}

impl fmt::Display for TemplateParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TemplateParam::Type(name) => write!(f, "typename {name}"),
            TemplateParam::Value { ty, name } => write!(f, "{ty} {name}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    pub attributes: Vec<String>,
    pub is_const: bool,
    pub ty: String,
    pub name: String,
    pub default: Option<String>,
}

impl Param {
    pub fn new(ty: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            attributes: Vec::new(),
            is_const: false,
            ty: ty.into(),
            name: name.into(),
            default: None,
        }
    }

    pub fn with_attribute(mut self, attribute: impl Into<String>) -> Self {
        self.attributes.push(attribute.into());
        self
    }

    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }
}

impl fmt::Display for Param {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for attribute in &self.attributes {
            write!(f, "[[{attribute}]] ")?;
        }
        if self.is_const {
            f.write_str("const ")?;
        }
        write!(f, "{} {}", self.ty, self.name)?;
        if let Some(default) = &self.default {
            write!(f, " = {default}")?;
        }
        Ok(())
    }
}

/// One fully resolved overload, ready to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub templates: Vec<TemplateParam>,
    pub capabilities: Vec<String>,
    pub extensions: Vec<String>,
    pub opname: String,
    pub name: String,
    pub conditions: Vec<String>,
    pub result: String,
    pub params: Vec<Param>,
}

impl Declaration {
    pub fn render(&self) -> String {
        let mut out = String::new();
        write_declaration(&mut out, self);
        out
    }
}

/// Append `decl` to `out` in the fixed layout: template line, capability and
/// extension annotations, the instruction binding, then the signature.
pub fn write_declaration(out: &mut String, decl: &Declaration) {
    if !decl.templates.is_empty() {
        let templates: Vec<String> = decl.templates.iter().map(ToString::to_string).collect();
        out.push_str(&format!("template<{}>\n", templates.join(", ")));
    }
    for capability in &decl.capabilities {
        out.push_str(&format!("[[vk::ext_capability(spv::Capability{capability})]]\n"));
    }
    for extension in &decl.extensions {
        out.push_str(&format!("[[vk::ext_extension(\"{extension}\")]]\n"));
    }
    out.push_str(&format!("[[vk::ext_instruction(spv::{})]]\n", decl.opname));
    if decl.conditions.is_empty() {
        out.push_str(&decl.result);
    } else {
        out.push_str(&format!(
            "enable_if_t<{}, {}>",
            decl.conditions.join(" && "),
            decl.result
        ));
    }
    let params: Vec<String> = decl.params.iter().map(ToString::to_string).collect();
    out.push_str(&format!(" {}({});\n\n", decl.name, params.join(", ")));
}

/// Template parameters of a signature, in order of first appearance.
///
/// A token becomes a parameter when it is one of `value_params`, a single
/// upper-case letter, or one of the explicitly generic `generic_names`.
pub fn collect_templates(
    result: &str,
    params: &[Param],
    generic_names: &[String],
    value_params: &[(&str, &str)],
) -> Vec<TemplateParam> {
    let mut found: IndexMap<String, TemplateParam> = IndexMap::new();
    let texts = std::iter::once(result).chain(
        params
            .iter()
            .flat_map(|param| std::iter::once(param.ty.as_str()).chain(param.default.as_deref())),
    );
    for text in texts {
        for token in identifiers(text) {
            if found.contains_key(token) {
                continue;
            }
            let param = if let Some((ty, name)) = value_params.iter().find(|(_, n)| *n == token) {
                TemplateParam::Value {
                    ty: ty.to_string(),
                    name: name.to_string(),
                }
            } else if is_generic_letter(token) || generic_names.iter().any(|g| g == token) {
                TemplateParam::Type(token.to_string())
            } else {
                continue;
            };
            found.insert(token.to_string(), param);
        }
    }
    found.into_values().collect()
}
