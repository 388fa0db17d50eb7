//! HLSL intrinsic declarations generated from the SPIR-V grammar.
//!
//! Reads `spirv.core.grammar.json` and writes a header of functions that
//! forward to SPIR-V instructions through the `[[vk::ext_instruction]]`
//! attribute family.
//!
//! ## Modules
//! - `grammar`: grammar file loading.
//! - `annotate`: add `hlsl_type` hints to a raw grammar document.
//! - `sanitize`: parameter and function naming.
//! - `type_map` / `resolve`: layered operand type mappings.
//! - `numeric` / `operands` / `overload`: overload expansion.
//! - `declaration`: declaration text.
//! - `policy` / `enumerants`: which instructions and enumerants are emitted.
//! - `generate`: the whole header.
//!
//! ## Usage
//! The `gen_intrinsics` binary wires these together; tests drive
//! [`Generator`] directly with in-memory inputs.
#[path = "grammar/annotate.rs"]
pub mod annotate;
#[path = "emit/declaration.rs"]
pub mod declaration;
#[path = "policy/enumerants.rs"]
pub mod enumerants;
#[path = "generate/generate.rs"]
pub mod generate;
#[path = "grammar/grammar.rs"]
pub mod grammar;
#[path = "expand/numeric.rs"]
pub mod numeric;
#[path = "expand/operands.rs"]
pub mod operands;
#[path = "expand/overload.rs"]
pub mod overload;
#[path = "policy/policy.rs"]
pub mod policy;
#[path = "typemap/resolve.rs"]
pub mod resolve;
#[path = "naming/sanitize.rs"]
pub mod sanitize;
#[path = "typemap/type_map.rs"]
pub mod type_map;

pub use annotate::annotate_grammar;
pub use declaration::{Declaration, Param, TemplateParam};
pub use enumerants::EnumerantTables;
pub use generate::{
    write_output, GenerateOptions, Generated, GenerationReport, Generator, SkippedInstruction,
};
pub use grammar::Grammar;
pub use operands::{Shape, SkipReason};
pub use overload::{expand, ExpandRequest, Expansion};
pub use policy::Policy;
pub use resolve::{ResolvedType, TypeResolver};
pub use type_map::TypeMap;
