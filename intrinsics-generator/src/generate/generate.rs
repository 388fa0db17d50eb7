//! Whole-header generation.
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::{debug, warn};

use crate::declaration::{write_declaration, Declaration};
use crate::enumerants::{write_builtins, write_execution_modes, write_group_operations, EnumerantTables};
use crate::grammar::{Grammar, Instruction};
use crate::operands::SkipReason;
use crate::overload::{expand, Expansion};
use crate::policy::{EnumerantSection, Policy};
use crate::resolve::TypeResolver;
use crate::type_map::TypeMap;

pub const HEADER: &str = include_str!("../../data/header.hlsl");
pub const FOOTER: &str = include_str!("../../data/footer.hlsl");

#[derive(Debug, Clone, Copy, Default)]
pub struct GenerateOptions {
    /// Precede each instruction group with `// OpName (opcode N)`.
    pub comments: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedInstruction {
    pub opname: String,
    pub reason: SkipReason,
}

#[derive(Debug, Clone, Default)]
pub struct GenerationReport {
    /// Opnames that produced at least one declaration, in output order.
    pub emitted: Vec<String>,
    pub declarations: usize,
    pub filtered: Vec<String>,
    pub skipped: Vec<SkippedInstruction>,
}

#[derive(Debug, Clone)]
pub struct Generated {
    pub text: String,
    pub report: GenerationReport,
}

enum InstructionOutcome {
    Declarations(Vec<Declaration>),
    Filtered,
    Skipped(SkipReason),
}

pub struct Generator<'a> {
    grammar: &'a Grammar,
    policy: &'a Policy,
    resolver: TypeResolver<'a>,
    enumerants: &'a EnumerantTables,
    options: GenerateOptions,
}

impl<'a> Generator<'a> {
    pub fn new(
        grammar: &'a Grammar,
        policy: &'a Policy,
        type_map: &'a TypeMap,
        enumerants: &'a EnumerantTables,
        options: GenerateOptions,
    ) -> Self {
        Self {
            grammar,
            policy,
            resolver: TypeResolver::new(type_map),
            enumerants,
            options,
        }
    }

    pub fn generate(&self) -> Result<Generated> {
        let mut text = String::from(HEADER);
        let mut report = GenerationReport::default();

        if self.policy.emits(EnumerantSection::BuiltIn) {
            write_builtins(
                &mut text,
                self.grammar.enumerants(EnumerantSection::BuiltIn.kind()),
                self.enumerants,
            );
        }
        if self.policy.emits(EnumerantSection::ExecutionMode) {
            write_execution_modes(
                &mut text,
                self.grammar.enumerants(EnumerantSection::ExecutionMode.kind()),
                |name| self.policy.is_excluded(name),
            );
        }
        if self.policy.emits(EnumerantSection::GroupOperation) {
            write_group_operations(
                &mut text,
                self.grammar.enumerants(EnumerantSection::GroupOperation.kind()),
            );
        }

        text.push_str("\n//! Instructions\n");
        for instruction in &self.grammar.instructions {
            match self.instruction(instruction)? {
                None => {}
                Some(InstructionOutcome::Filtered) => {
                    debug!("filtered {}", instruction.opname);
                    report.filtered.push(instruction.opname.clone());
                }
                Some(InstructionOutcome::Skipped(reason)) => {
                    warn!("IGNORED: {} ({reason})", instruction.opname);
                    report.skipped.push(SkippedInstruction {
                        opname: instruction.opname.clone(),
                        reason,
                    });
                }
                Some(InstructionOutcome::Declarations(decls)) => {
                    if decls.is_empty() {
                        debug!("no compatible overloads for {}", instruction.opname);
                        continue;
                    }
                    debug!("emitting {} ({} declarations)", instruction.opname, decls.len());
                    if self.options.comments {
                        text.push_str(&format!(
                            "// {} (opcode {})\n",
                            instruction.opname, instruction.opcode
                        ));
                    }
                    for decl in &decls {
                        write_declaration(&mut text, decl);
                    }
                    report.declarations += decls.len();
                    report.emitted.push(instruction.opname.clone());
                }
            }
        }

        text.push_str(FOOTER);
        Ok(Generated { text, report })
    }

    /// All shapes of one instruction. A skip in any shape drops the instruction.
    fn instruction(&self, instruction: &Instruction) -> Result<Option<InstructionOutcome>> {
        let Some(strategy) = self.policy.strategy(instruction) else {
            return Ok(None);
        };
        let mut decls = Vec::new();
        for request in strategy.requests() {
            let expansion = expand(instruction, &request, &self.resolver)
                .with_context(|| format!("failed to expand {}", instruction.opname))?;
            match expansion {
                Expansion::Declarations(list) => decls.extend(list),
                Expansion::Filtered => return Ok(Some(InstructionOutcome::Filtered)),
                Expansion::Skipped(reason) => return Ok(Some(InstructionOutcome::Skipped(reason))),
            }
        }
        Ok(Some(InstructionOutcome::Declarations(decls)))
    }
}

/// Write the generated text in one step.
pub fn write_output(path: impl AsRef<Path>, text: &str) -> Result<()> {
    let path = path.as_ref();
    fs::write(path, text).with_context(|| format!("failed to write {}", path.display()))
}
