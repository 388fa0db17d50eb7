//! Layered operand type lookup: instruction mapping, then class mapping.
use anyhow::Result;

use crate::grammar::{Instruction, Operand};
use crate::type_map::{InstructionTypeMap, OperandTypeInfo, TypeMap};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedType {
    pub name: String,
    pub generic: bool,
    pub is_const: bool,
    pub attributes: Vec<String>,
}

impl ResolvedType {
    pub fn concrete(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            generic: false,
            is_const: false,
            attributes: Vec::new(),
        }
    }

    pub fn generic(name: impl Into<String>) -> Self {
        Self {
            generic: true,
            ..Self::concrete(name)
        }
    }

    fn from_info(info: &OperandTypeInfo, variant: usize) -> Result<Self> {
        let name = info.select(variant)?;
        Ok(Self {
            name: name.to_string(),
            generic: info.is_generic(name),
            is_const: info.is_const,
            attributes: info.attributes.clone(),
        })
    }
}

#[derive(Debug, Clone, Copy)]
pub struct TypeResolver<'a> {
    type_map: &'a TypeMap,
}

impl<'a> TypeResolver<'a> {
    pub fn new(type_map: &'a TypeMap) -> Self {
        Self { type_map }
    }

    pub fn default_type(&self) -> &'a str {
        self.type_map.default_type()
    }

    /// Mapping layers for an instruction, most specific first.
    fn layers(&self, instruction: &Instruction) -> [Option<&'a InstructionTypeMap>; 2] {
        [
            self.type_map.instruction_mapping(&instruction.opname),
            self.type_map.class_mapping(&instruction.class),
        ]
    }

    fn result_info(&self, instruction: &Instruction) -> Option<&'a OperandTypeInfo> {
        self.layers(instruction)
            .into_iter()
            .flatten()
            .find_map(|layer| layer.result.as_ref())
    }

    fn operand_info(&self, instruction: &Instruction, operand: &Operand) -> Option<&'a OperandTypeInfo> {
        self.layers(instruction)
            .into_iter()
            .flatten()
            .find_map(|layer| layer.operand(&operand.kind, operand.name.as_deref()))
    }

    /// Mapped result type, if any layer maps one.
    pub fn resolve_result(
        &self,
        instruction: &Instruction,
        variant: usize,
    ) -> Result<Option<ResolvedType>> {
        self.result_info(instruction)
            .map(|info| ResolvedType::from_info(info, variant))
            .transpose()
    }

    /// Mapped operand type. `None` means the caller supplies the default.
    pub fn resolve_operand(
        &self,
        instruction: &Instruction,
        operand: &Operand,
        variant: usize,
    ) -> Result<Option<ResolvedType>> {
        self.operand_info(instruction, operand)
            .map(|info| ResolvedType::from_info(info, variant))
            .transpose()
    }

    /// Number of overload variants the mappings ask for (at least one).
    pub fn variant_count(&self, instruction: &Instruction) -> usize {
        let result = self.result_info(instruction).map(|info| info.overloads.len());
        let operands = instruction
            .operands
            .iter()
            .filter(|operand| !operand.is_result_slot())
            .filter_map(|operand| self.operand_info(instruction, operand))
            .map(|info| info.overloads.len());
        result.into_iter().chain(operands).fold(1, usize::max)
    }
}
