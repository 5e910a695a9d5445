//! Input and output for the command-line tool.

use std::{
    fs::{File, read, write},
    io::{self, BufReader, Read, Write},
    path::Path,
};

use anyhow::{Context, Result};
use oracle_codec::{HEADER_SIZE, PeekError};

/// Header check run before the payload is read.
pub(crate) type PeekFn = fn(&[u8]) -> Result<u32, PeekError>;

fn source_name(path: Option<&Path>) -> String {
    match path {
        Some(path) => path.display().to_string(),
        None => "stdin".to_string(),
    }
}

/// Read a message body from a file, validating the header first.
fn read_body_from_file(path: &Path, peek: PeekFn) -> Result<(Vec<u8>, u32)> {
    let file = File::open(path)
        .with_context(|| format!("failed to open message file '{}'", path.display()))?;
    let file_size = file
        .metadata()
        .with_context(|| format!("failed to get metadata for message file '{}'", path.display()))?
        .len() as usize;
    let mut reader = BufReader::new(file);

    let mut header = [0u8; HEADER_SIZE];
    reader.read_exact(&mut header).with_context(|| {
        format!("failed to read header from message file '{}'", path.display())
    })?;
    let version =
        peek(&header).with_context(|| format!("invalid message header in '{}'", path.display()))?;

    let mut buffer = Vec::with_capacity(file_size);
    buffer.extend_from_slice(&header);
    reader
        .read_to_end(&mut buffer)
        .with_context(|| format!("failed to read message payload from '{}'", path.display()))?;
    Ok((buffer, version))
}

/// Read a message body from stdin, validating the header first.
fn read_body_from_stdin(peek: PeekFn) -> Result<(Vec<u8>, u32)> {
    let stdin = io::stdin();
    let mut handle = stdin.lock();

    let mut header = [0u8; HEADER_SIZE];
    handle
        .read_exact(&mut header)
        .context("failed to read header from stdin")?;
    let version = peek(&header).context("invalid message header from stdin")?;

    let mut buffer = Vec::new();
    buffer.extend_from_slice(&header);
    handle
        .read_to_end(&mut buffer)
        .context("failed to read message payload from stdin")?;
    Ok((buffer, version))
}

/// Read a message body from file or stdin, returning bytes, source description, and version.
pub(crate) fn read_body(path: Option<&Path>, peek: PeekFn) -> Result<(Vec<u8>, String, u32)> {
    let (bytes, version) = match path {
        Some(path) => read_body_from_file(path, peek)?,
        None => read_body_from_stdin(peek)?,
    };
    Ok((bytes, source_name(path), version))
}

/// Read a JSON document from file or stdin, returning it with its source description.
pub(crate) fn read_json(path: Option<&Path>) -> Result<(serde_json::Value, String)> {
    let source = source_name(path);
    let bytes = match path {
        Some(path) => read(path)
            .with_context(|| format!("failed to read input file '{}'", path.display()))?,
        None => {
            let mut buffer = Vec::new();
            io::stdin()
                .read_to_end(&mut buffer)
                .context("failed to read input from stdin")?;
            buffer
        }
    };
    let json = serde_json::from_slice(&bytes)
        .with_context(|| format!("failed to parse JSON from '{source}'"))?;
    Ok((json, source))
}

/// Write output bytes to a file or stdout.
pub(crate) fn write_output(output_path: Option<&Path>, bytes: &[u8]) -> Result<()> {
    match output_path {
        Some(path) => {
            write(path, bytes)
                .with_context(|| format!("failed to write output file '{}'", path.display()))?;
        }
        None => {
            io::stdout()
                .write_all(bytes)
                .context("failed to write to stdout")?;
        }
    }
    Ok(())
}
