//! Command-line argument parsing.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(about = "Encode and decode oracle request and response bodies")]
pub(crate) struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub(crate) enum Command {
    /// Encode JSON arguments into a request body.
    EncodeRequest {
        /// Oracle method name carried in the request.
        #[arg(short, long)]
        method: String,

        #[command(flatten)]
        paths: IoArgs,
    },
    /// Decode a request body into JSON `{ "method": ..., "args": ... }`.
    DecodeRequest {
        #[command(flatten)]
        paths: IoArgs,
    },
    /// Encode JSON results into a response body.
    EncodeResponse {
        #[command(flatten)]
        paths: IoArgs,
    },
    /// Decode a response body into JSON results.
    DecodeResponse {
        #[command(flatten)]
        paths: IoArgs,
    },
}

#[derive(Args, Debug)]
pub(crate) struct IoArgs {
    /// Schema file naming the input and output records.
    #[arg(short, long)]
    pub schema: PathBuf,

    /// Input file. If not specified, reads from stdin.
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Output file. If not specified, writes to stdout.
    #[arg(short = 'o', long)]
    pub output: Option<PathBuf>,
}
