use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};
use clap::Parser;
use intrinsics_generator::{
    write_output, EnumerantTables, GenerateOptions, Generator, Grammar, Policy, TypeMap,
};
use intrinsics_tools::init_tracing;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "gen_intrinsics", about = "Generate HLSL SPIR-V intrinsics from the SPIR-V grammar")]
struct Args {
    /// HLSL header to write
    output: PathBuf,
    /// Whitelist and policy JSON (embedded default when omitted)
    fields: Option<PathBuf>,
    /// Type mapping JSON (embedded default when omitted)
    type_map: Option<PathBuf>,
    /// SPIR-V core grammar (defaults to include/spirv/unified1/spirv.core.grammar.json in the workspace)
    #[arg(long)]
    grammar: Option<PathBuf>,
    /// Builtin variable table JSON (embedded default when omitted)
    #[arg(long)]
    enumerants: Option<PathBuf>,
    /// Debug-level diagnostics
    #[arg(short, long)]
    verbose: bool,
    /// Comment each instruction group with its opname and opcode
    #[arg(long)]
    comments: bool,
}

fn default_grammar_path() -> Result<PathBuf> {
    let workspace_root = Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .and_then(|path| path.parent())
        .ok_or_else(|| anyhow!("missing workspace root"))?;
    Ok(workspace_root.join("include/spirv/unified1/spirv.core.grammar.json"))
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let grammar_path = match args.grammar {
        Some(path) => path,
        None => default_grammar_path()?,
    };
    let grammar = Grammar::load(&grammar_path)?;
    let policy = match &args.fields {
        Some(path) => Policy::load(path)?,
        None => Policy::embedded()?,
    };
    let type_map = match &args.type_map {
        Some(path) => TypeMap::load(path)?,
        None => TypeMap::embedded()?,
    };
    let enumerants = match &args.enumerants {
        Some(path) => EnumerantTables::load(path)?,
        None => EnumerantTables::embedded()?,
    };

    let options = GenerateOptions {
        comments: args.comments,
    };
    let generated = Generator::new(&grammar, &policy, &type_map, &enumerants, options).generate()?;
    write_output(&args.output, &generated.text)?;

    let report = &generated.report;
    info!(
        "{} instructions, {} declarations, {} skipped",
        report.emitted.len(),
        report.declarations,
        report.skipped.len()
    );
    println!("Saved to '{}'", args.output.display());
    Ok(())
}
