//! Overload expansion: one instruction to a set of declarations.
use anyhow::Result;

use crate::declaration::{collect_templates, Declaration, TemplateParam};
use crate::grammar::Instruction;
use crate::numeric::{
    capability_admits, find_discriminator, is_integer, strip_discriminator, type_capability,
    TypeClass,
};
use crate::operands::{
    build_params, ParamContext, ParamSet, Shape, SkipReason, ALIGNMENT_PARAM, POINTER_TEMPLATE,
};
use crate::resolve::{ResolvedType, TypeResolver};
use crate::sanitize::{function_name, is_generic_letter};

pub const GENERIC_TYPE: &str = "T";
pub const VECTOR_SIZE_PARAM: &str = "N";

const BASE_CAPABILITY: &str = "Shader";
const KERNEL_CAPABILITY: &str = "Kernel";

/// Per-instruction overrides picked by the generation policy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpandRequest {
    pub shape: Shape,
    pub result_type: Option<String>,
    pub operand_type: Option<String>,
    pub type_class: Option<TypeClass>,
    /// Extra `enable_if_t` terms, ahead of the ones the shape adds.
    pub conditions: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expansion {
    Declarations(Vec<Declaration>),
    /// Not meant for shaders.
    Filtered,
    Skipped(SkipReason),
}

/// Candidate element type together with the function name it is emitted as.
#[derive(Debug, Clone)]
struct Candidate {
    element: ResolvedType,
    name: String,
}

fn type_from_text(text: &str) -> ResolvedType {
    if is_generic_letter(text) {
        ResolvedType::generic(text)
    } else {
        ResolvedType::concrete(text)
    }
}

/// Capabilities an overload can be guarded by: the instruction's own minus
/// the base shader capability. `None` for kernel-only instructions.
fn capability_alternatives(instruction: &Instruction) -> Option<Vec<Option<&str>>> {
    if instruction.capabilities.len() == 1 && instruction.capabilities[0] == KERNEL_CAPABILITY {
        return None;
    }
    let caps: Vec<Option<&str>> = instruction
        .capabilities
        .iter()
        .map(String::as_str)
        .filter(|cap| *cap != BASE_CAPABILITY)
        .map(Some)
        .collect();
    if caps.is_empty() {
        Some(vec![None])
    } else {
        Some(caps)
    }
}

fn candidates(
    instruction: &Instruction,
    request: &ExpandRequest,
    resolver: &TypeResolver<'_>,
    base_name: &str,
    variant: usize,
) -> Result<Vec<Candidate>> {
    // the type letter goes whichever way the element type is chosen
    let discriminator = find_discriminator(base_name);
    let name = match discriminator {
        Some(d) => strip_discriminator(base_name, d),
        None => base_name.to_string(),
    };
    if let Some(result_type) = &request.result_type {
        return Ok(vec![Candidate {
            element: type_from_text(result_type),
            name,
        }]);
    }
    if let Some(mapped) = resolver.resolve_result(instruction, variant)? {
        return Ok(vec![Candidate {
            element: mapped,
            name,
        }]);
    }
    let class = discriminator.map(|d| d.class).or(request.type_class);
    Ok(match class {
        Some(class) => class
            .concrete_types()
            .into_iter()
            .map(|ty| Candidate {
                element: ResolvedType::concrete(ty),
                name: name.clone(),
            })
            .collect(),
        None => vec![Candidate {
            element: ResolvedType::generic(GENERIC_TYPE),
            name,
        }],
    })
}

/// The pointer type follows the value types it points at.
fn pointer_template_last(mut templates: Vec<TemplateParam>) -> Vec<TemplateParam> {
    let pointer = templates
        .iter()
        .position(|t| matches!(t, TemplateParam::Type(name) if name == POINTER_TEMPLATE));
    if let Some(index) = pointer {
        let param = templates.remove(index);
        let after_types = templates
            .iter()
            .rposition(|t| matches!(t, TemplateParam::Type(_)))
            .map_or(0, |i| i + 1);
        templates.insert(after_types, param);
    }
    templates
}

fn push_capability(caps: &mut Vec<String>, instruction: &Instruction, cap: &str) {
    if !instruction.capabilities.iter().any(|c| c == cap) && !caps.iter().any(|c| c == cap) {
        caps.push(cap.to_string());
    }
}

fn declaration_capabilities(
    instruction: &Instruction,
    shape: Shape,
    alternative: Option<&str>,
    types: &[&ResolvedType],
) -> Vec<String> {
    let mut caps: Vec<String> = alternative.map(str::to_string).into_iter().collect();
    for ty in types.iter().filter(|ty| !ty.generic) {
        if let Some(cap) = type_capability(&ty.name) {
            push_capability(&mut caps, instruction, cap);
        }
        if instruction.class == "Atomic" && is_integer(&ty.name) && ty.name.contains("64") {
            push_capability(&mut caps, instruction, "Int64Atomics");
        }
    }
    if shape == Shape::Bda {
        push_capability(&mut caps, instruction, "PhysicalStorageBufferAddresses");
    }
    caps
}

/// Expand `instruction` into declarations for one shape.
pub fn expand(
    instruction: &Instruction,
    request: &ExpandRequest,
    resolver: &TypeResolver<'_>,
) -> Result<Expansion> {
    let Some(alternatives) = capability_alternatives(instruction) else {
        return Ok(Expansion::Filtered);
    };
    let base_name = function_name(&instruction.opname);
    let suffixed = alternatives.len() > 1;
    let mut declarations = Vec::new();

    for variant in 0..resolver.variant_count(instruction) {
        for candidate in candidates(instruction, request, resolver, &base_name, variant)? {
            for alternative in &alternatives {
                let mut element = candidate.element.clone();
                let mut value_params: Vec<(&str, &str)> = Vec::new();
                if let Some(cap) = alternative {
                    // a generic element never satisfies a width-specific capability
                    let admitted_type = if element.generic { "" } else { element.name.as_str() };
                    if !capability_admits(cap, admitted_type) {
                        continue;
                    }
                    if cap.contains("Vector") {
                        element.name = format!("vector<{}, {VECTOR_SIZE_PARAM}>", element.name);
                        value_params.push(("uint32_t", VECTOR_SIZE_PARAM));
                    }
                }

                let operand_type = request
                    .operand_type
                    .as_deref()
                    .map(type_from_text)
                    .unwrap_or_else(|| element.clone());
                let result = if instruction.has_result_type() {
                    element.clone()
                } else {
                    ResolvedType::concrete("void")
                };

                let ctx = ParamContext {
                    shape: request.shape,
                    operand_type: &operand_type,
                    variant,
                };
                let ParamSet {
                    lists,
                    conditions: shape_conditions,
                    mut generic_names,
                } = match build_params(instruction, ctx, resolver)? {
                    Ok(set) => set,
                    Err(reason) => return Ok(Expansion::Skipped(reason)),
                };
                let mut conditions = request.conditions.clone();
                conditions.extend(shape_conditions);
                for ty in [&result, &operand_type] {
                    if ty.generic && !generic_names.contains(&ty.name) {
                        generic_names.push(ty.name.clone());
                    }
                }

                let name = match alternative {
                    Some(cap) if suffixed => format!("{}_{cap}", candidate.name),
                    _ => candidate.name.clone(),
                };
                let capabilities = declaration_capabilities(
                    instruction,
                    request.shape,
                    *alternative,
                    &[&candidate.element, &operand_type],
                );

                for params in lists {
                    let mut values = value_params.clone();
                    if params.iter().any(|p| p.default.as_deref() == Some(ALIGNMENT_PARAM)) {
                        values.push(("uint32_t", ALIGNMENT_PARAM));
                    }
                    let templates = pointer_template_last(collect_templates(
                        &result.name,
                        &params,
                        &generic_names,
                        &values,
                    ));
                    declarations.push(Declaration {
                        templates,
                        capabilities: capabilities.clone(),
                        extensions: instruction.extensions.clone(),
                        opname: instruction.opname.clone(),
                        name: name.clone(),
                        conditions: conditions.clone(),
                        result: result.name.clone(),
                        params,
                    });
                }
            }
        }
    }
    Ok(Expansion::Declarations(declarations))
}
