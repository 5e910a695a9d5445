use std::{fs::read_to_string, path::Path};

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use log::info;
use oracle_codec::{
    OracleRequest, OracleResponse, Schema, deserialize_request_payload,
    deserialize_response_payload,
    json::{value_from_json, value_to_json},
    peek_request_version, peek_response_version, serialize_request, serialize_response,
};

mod cli;
mod io;

use cli::{Cli, Command, IoArgs};

fn load_schema(path: &Path) -> Result<Schema> {
    let text = read_to_string(path)
        .with_context(|| format!("failed to read schema file '{}'", path.display()))?;
    let schema = Schema::from_json_str(&text)
        .with_context(|| format!("failed to parse schema file '{}'", path.display()))?;
    info!(
        "Loaded schema '{}' with input '{}' and output '{}'",
        path.display(),
        schema.input,
        schema.output
    );
    Ok(schema)
}

fn to_json_bytes(json: &serde_json::Value) -> Result<Vec<u8>> {
    let mut bytes = serde_json::to_vec_pretty(json).context("failed to render JSON output")?;
    bytes.push(b'\n');
    Ok(bytes)
}

fn encode_request(method: &str, paths: &IoArgs) -> Result<()> {
    let schema = load_schema(&paths.schema)?;
    let descriptor = schema
        .input_descriptor()
        .with_context(|| format!("invalid input record in '{}'", paths.schema.display()))?;

    let (json, source) = io::read_json(paths.input.as_deref())?;
    let args = value_from_json(&json, &descriptor)
        .with_context(|| format!("arguments from '{source}' do not match {descriptor}"))?;
    let request = OracleRequest::new(method, &args, &descriptor)
        .map_err(|e| anyhow!("failed to encode arguments from '{source}': {e}"))?;
    info!(
        "Encoded {} argument bytes for method '{method}'",
        request.args.len()
    );

    let body = serialize_request(&request).context("failed to serialize request")?;
    io::write_output(paths.output.as_deref(), &body)
}

fn decode_request(paths: &IoArgs) -> Result<()> {
    let schema = load_schema(&paths.schema)?;
    let descriptor = schema
        .input_descriptor()
        .with_context(|| format!("invalid input record in '{}'", paths.schema.display()))?;

    let (bytes, source, version) = io::read_body(paths.input.as_deref(), peek_request_version)?;
    info!("Read request body version {version} from '{source}'");
    let request = deserialize_request_payload(&bytes, version)
        .with_context(|| format!("failed to deserialize request from '{source}'"))?;
    let args = request
        .decode_args(&descriptor)
        .map_err(|e| anyhow!("failed to decode arguments of '{}': {e}", request.method))?;

    let json = serde_json::json!({
        "method": request.method,
        "args": value_to_json(&args, &descriptor).context("failed to render arguments")?,
    });
    io::write_output(paths.output.as_deref(), &to_json_bytes(&json)?)
}

fn encode_response(paths: &IoArgs) -> Result<()> {
    let schema = load_schema(&paths.schema)?;
    let descriptor = schema
        .output_descriptor()
        .with_context(|| format!("invalid output record in '{}'", paths.schema.display()))?;

    let (json, source) = io::read_json(paths.input.as_deref())?;
    let results = value_from_json(&json, &descriptor)
        .with_context(|| format!("results from '{source}' do not match {descriptor}"))?;
    let response = OracleResponse::new(&results, &descriptor)
        .map_err(|e| anyhow!("failed to encode results from '{source}': {e}"))?;
    info!("Encoded {} result bytes", response.results.len());

    let body = serialize_response(&response).context("failed to serialize response")?;
    io::write_output(paths.output.as_deref(), &body)
}

fn decode_response(paths: &IoArgs) -> Result<()> {
    let schema = load_schema(&paths.schema)?;
    let descriptor = schema
        .output_descriptor()
        .with_context(|| format!("invalid output record in '{}'", paths.schema.display()))?;

    let (bytes, source, version) = io::read_body(paths.input.as_deref(), peek_response_version)?;
    info!("Read response body version {version} from '{source}'");
    let response = deserialize_response_payload(&bytes, version)
        .with_context(|| format!("failed to deserialize response from '{source}'"))?;
    let results = response
        .decode_results(&descriptor)
        .map_err(|e| anyhow!("failed to decode results from '{source}': {e}"))?;

    let json = value_to_json(&results, &descriptor).context("failed to render results")?;
    io::write_output(paths.output.as_deref(), &to_json_bytes(&json)?)
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    match &cli.command {
        Command::EncodeRequest { method, paths } => encode_request(method, paths),
        Command::DecodeRequest { paths } => decode_request(paths),
        Command::EncodeResponse { paths } => encode_response(paths),
        Command::DecodeResponse { paths } => decode_response(paths),
    }
}
