use std::fs::read_to_string;

use anyhow::{Result, anyhow};
use clap::Parser;
use log::info;
use oracle_codec::Schema;

#[derive(Parser, Debug)]
struct Args {
    #[arg(short, long)]
    schema_path: String,
}

fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();

    let text = read_to_string(&args.schema_path)
        .map_err(|e| anyhow!("failed to read schema file '{}': {e}", args.schema_path))?;
    let schema = Schema::from_json_str(&text)
        .map_err(|e| anyhow!("failed to parse schema file '{}': {e}", args.schema_path))?;

    let input = schema.input_descriptor().map_err(|e| {
        anyhow!(
            "invalid input record '{}' in schema file '{}': {e}",
            schema.input,
            args.schema_path
        )
    })?;
    let output = schema.output_descriptor().map_err(|e| {
        anyhow!(
            "invalid output record '{}' in schema file '{}': {e}",
            schema.output,
            args.schema_path
        )
    })?;
    info!("input: {input}");
    info!("output: {output}");

    Ok(())
}
