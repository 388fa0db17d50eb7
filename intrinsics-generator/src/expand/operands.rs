//! Operand to parameter rules.
use std::fmt;

use anyhow::Result;
use serde::Deserialize;

use crate::declaration::Param;
use crate::grammar::{Instruction, Operand, Quantifier};
use crate::resolve::{ResolvedType, TypeResolver};
use crate::sanitize::{escape_reserved, lower_first, param_name, strip_name};

pub const LITERAL_ATTRIBUTE: &str = "vk::ext_literal";
pub const REFERENCE_ATTRIBUTE: &str = "vk::ext_reference";
pub const LITERAL_TYPE: &str = "uint32_t";
pub const POINTER_TEMPLATE: &str = "P";
pub const POINTER_CONDITION: &str = "is_spirv_type_v<P>";
pub const ALIGNMENT_PARAM: &str = "alignment";

/// How pointer operands of an instruction are spelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Shape {
    /// `[[vk::ext_reference]] T pointer`
    #[default]
    Default,
    /// A templated pointer type `P`, constrained by `is_spirv_type_v<P>`.
    PtrTemplate,
    /// A physical storage buffer pointer.
    Bda,
}

/// Why an instruction could not be turned into declarations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    UnsupportedKind { kind: String },
    UnsupportedOperand { kind: String, name: String },
    UnsupportedQuantifier { kind: String, quantifier: String },
    RequiredAfterOptional { kind: String },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::UnsupportedKind { kind } => write!(f, "unsupported operand kind {kind}"),
            SkipReason::UnsupportedOperand { kind, name } => {
                write!(f, "unsupported operand {kind} '{name}'")
            }
            SkipReason::UnsupportedQuantifier { kind, quantifier } => {
                write!(f, "unsupported quantifier '{quantifier}' on {kind}")
            }
            SkipReason::RequiredAfterOptional { kind } => {
                write!(f, "required operand {kind} follows an optional operand")
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OperandRule {
    DefaultType,
    OperandType,
    Pointer,
    Bool,
    Scope,
    Literal,
    MemoryAccess,
}

fn operand_rule(operand: &Operand) -> std::result::Result<OperandRule, SkipReason> {
    let name = operand.name.as_deref().map(strip_name).unwrap_or_default();
    match operand.kind.as_str() {
        "IdRef" => match name.as_str() {
            "Pointer" => Ok(OperandRule::Pointer),
            "Value" | "Object" | "Comparator" | "Base" | "Insert" | "Operand" => {
                Ok(OperandRule::OperandType)
            }
            "Offset" | "Count" | "Id" | "Index" | "Mask" | "Delta" | "ClusterSize" => {
                Ok(OperandRule::DefaultType)
            }
            "Predicate" => Ok(OperandRule::Bool),
            _ => Err(SkipReason::UnsupportedOperand {
                kind: operand.kind.clone(),
                name,
            }),
        },
        "IdScope" => Ok(OperandRule::Scope),
        "IdMemorySemantics" => Ok(OperandRule::DefaultType),
        "GroupOperation" => Ok(OperandRule::Literal),
        "MemoryAccess" => Ok(OperandRule::MemoryAccess),
        _ => Err(SkipReason::UnsupportedKind {
            kind: operand.kind.clone(),
        }),
    }
}

/// Inputs shared by every operand of one signature.
#[derive(Debug, Clone, Copy)]
pub struct ParamContext<'a> {
    pub shape: Shape,
    pub operand_type: &'a ResolvedType,
    pub variant: usize,
}

/// Parameter lists of one signature: one list per optional-operand prefix.
#[derive(Debug, Clone, Default)]
pub struct ParamSet {
    pub lists: Vec<Vec<Param>>,
    pub conditions: Vec<String>,
    /// Multi-letter type names mappings flagged as generic.
    pub generic_names: Vec<String>,
}

pub fn pointer_type(shape: Shape, pointee: &str) -> String {
    match shape {
        Shape::Default => pointee.to_string(),
        Shape::PtrTemplate => POINTER_TEMPLATE.to_string(),
        Shape::Bda => format!("pointer_t<spv::StorageClassPhysicalStorageBuffer, {pointee}>"),
    }
}

fn literal(name: &str) -> Param {
    Param::new(LITERAL_TYPE, name).with_attribute(LITERAL_ATTRIBUTE)
}

/// Physical storage buffer accesses must be `Aligned`, so they only get
/// the aligned form.
fn memory_access_lists(shape: Shape, base: &[Param]) -> Vec<Vec<Param>> {
    if shape == Shape::Bda {
        let mut aligned = base.to_vec();
        aligned.push(literal("__aligned").with_default("/*Aligned*/0x00000002"));
        aligned.push(literal("__alignment").with_default(ALIGNMENT_PARAM));
        return vec![aligned];
    }
    let mut lists = vec![base.to_vec()];
    let mut with_access = base.to_vec();
    with_access.push(literal("memoryAccess"));
    lists.push(with_access.clone());
    with_access.push(literal("memoryAccessParam"));
    lists.push(with_access);
    lists
}

fn unique_name(used: &mut Vec<String>, name: String) -> String {
    let mut candidate = name.clone();
    let mut suffix = 2;
    while used.contains(&candidate) {
        candidate = format!("{name}{suffix}");
        suffix += 1;
    }
    used.push(candidate.clone());
    candidate
}

/// Build the parameter lists of `instruction`, or the reason it cannot be
/// expressed.
pub fn build_params(
    instruction: &Instruction,
    ctx: ParamContext<'_>,
    resolver: &TypeResolver<'_>,
) -> Result<std::result::Result<ParamSet, SkipReason>> {
    let mut set = ParamSet::default();
    let mut required: Vec<Param> = Vec::new();
    let mut optional: Vec<Param> = Vec::new();
    let mut memory_access = false;
    let mut used_names: Vec<String> = Vec::new();

    for operand in instruction.operands.iter().filter(|o| !o.is_result_slot()) {
        match &operand.quantifier {
            None | Some(Quantifier::Optional) => {}
            Some(Quantifier::Variadic) => {
                return Ok(Err(SkipReason::UnsupportedQuantifier {
                    kind: operand.kind.clone(),
                    quantifier: "*".into(),
                }))
            }
            Some(Quantifier::Unknown) => {
                return Ok(Err(SkipReason::UnsupportedQuantifier {
                    kind: operand.kind.clone(),
                    quantifier: "unknown".into(),
                }))
            }
        }
        let is_optional = operand.is_optional();
        if memory_access || (!is_optional && !optional.is_empty()) {
            return Ok(Err(SkipReason::RequiredAfterOptional {
                kind: operand.kind.clone(),
            }));
        }

        let raw_name = operand.name.as_deref().unwrap_or(&operand.kind);
        let param = if let Some(mapped) = resolver.resolve_operand(instruction, operand, ctx.variant)? {
            if mapped.generic && mapped.name.len() > 1 && !set.generic_names.contains(&mapped.name) {
                set.generic_names.push(mapped.name.clone());
            }
            Param {
                attributes: mapped.attributes,
                is_const: mapped.is_const,
                ty: mapped.name,
                name: unique_name(&mut used_names, param_name(raw_name)),
                default: None,
            }
        } else {
            let rule = match operand_rule(operand) {
                Ok(rule) => rule,
                Err(reason) => return Ok(Err(reason)),
            };
            let default_type = resolver.default_type();
            match rule {
                OperandRule::MemoryAccess if is_optional => {
                    memory_access = true;
                    continue;
                }
                OperandRule::MemoryAccess | OperandRule::Literal => {
                    Param::new(default_type, unique_name(&mut used_names, param_name(raw_name)))
                        .with_attribute(LITERAL_ATTRIBUTE)
                }
                OperandRule::DefaultType => {
                    Param::new(default_type, unique_name(&mut used_names, param_name(raw_name)))
                }
                OperandRule::OperandType => Param::new(
                    ctx.operand_type.name.clone(),
                    unique_name(&mut used_names, param_name(raw_name)),
                ),
                OperandRule::Bool => {
                    Param::new("bool", unique_name(&mut used_names, param_name(raw_name)))
                }
                OperandRule::Scope => {
                    let name = escape_reserved(&(strip_name(raw_name).to_lowercase() + "Scope"));
                    Param::new(default_type, unique_name(&mut used_names, name))
                }
                OperandRule::Pointer => {
                    let name = unique_name(&mut used_names, lower_first(&strip_name(raw_name)));
                    let param = Param::new(pointer_type(ctx.shape, &ctx.operand_type.name), name);
                    match ctx.shape {
                        Shape::Default => param.with_attribute(REFERENCE_ATTRIBUTE),
                        Shape::PtrTemplate => {
                            if !set.conditions.iter().any(|c| c == POINTER_CONDITION) {
                                set.conditions.push(POINTER_CONDITION.to_string());
                            }
                            param
                        }
                        Shape::Bda => param,
                    }
                }
            }
        };
        if is_optional {
            optional.push(param);
        } else {
            required.push(param);
        }
    }

    let mut current = required;
    let mut prefixes = vec![current.clone()];
    for param in optional {
        current.push(param);
        prefixes.push(current.clone());
    }
    if memory_access {
        // the access literals extend the longest prefix, which then owns it
        prefixes.pop();
        prefixes.extend(memory_access_lists(ctx.shape, &current));
    }
    set.lists = prefixes;
    Ok(Ok(set))
}
