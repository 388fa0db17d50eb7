use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use intrinsics_generator::annotate_grammar;
use intrinsics_tools::init_tracing;
use serde_json::Value;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "annotate_grammar", about = "Add hlsl_type hints to a SPIR-V grammar file")]
struct Args {
    input: PathBuf,
    output: PathBuf,
    /// Type written into every annotated operand
    #[arg(long = "type", default_value = "uint32_t")]
    default_type: String,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(false);

    let contents = fs::read_to_string(&args.input)
        .with_context(|| format!("failed to read grammar file {}", args.input.display()))?;
    let mut grammar: Value = serde_json::from_str(&contents)
        .with_context(|| format!("failed to parse grammar file {}", args.input.display()))?;
    let written = annotate_grammar(&mut grammar, &args.default_type)?;
    let pretty = serde_json::to_string_pretty(&grammar)?;
    fs::write(&args.output, pretty)
        .with_context(|| format!("failed to write {}", args.output.display()))?;
    info!("annotated {written} fields");
    println!("Saved to '{}'", args.output.display());
    Ok(())
}
