//! remotecc client binary
//!
//! Offloads one preprocessed compilation unit to a remote compile
//! daemon and exits with the remote compiler's status.

use std::path::PathBuf;

use clap::Parser;
use remotecc::{compile_file, ClientConfig};
use tracing_subscriber::{fmt, EnvFilter};

/// Remote compile client
#[derive(Parser, Debug)]
#[command(name = "remotecc")]
#[command(about = "Offload one compilation unit to a remote compile daemon")]
#[command(version)]
struct Args {
    /// Compile daemon address (host:port)
    #[arg(short, long, default_value = "127.0.0.1:3632")]
    server: String,

    /// Socket read timeout in milliseconds (0 = none)
    #[arg(long, default_value = "0")]
    read_timeout_ms: u64,

    /// Socket write timeout in milliseconds (0 = none)
    #[arg(long, default_value = "0")]
    write_timeout_ms: u64,

    /// Preprocessed source file to send
    source: PathBuf,

    /// Object file to write
    object: PathBuf,

    /// Compiler command to run remotely (e.g. gcc -c -o foo.o foo.c)
    #[arg(trailing_var_arg = true, allow_hyphen_values = true, required = true)]
    command: Vec<String>,
}

fn main() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,remotecc=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    let args = Args::parse();

    let config = ClientConfig::builder()
        .server_addr(&args.server)
        .read_timeout_ms(args.read_timeout_ms)
        .write_timeout_ms(args.write_timeout_ms)
        .build();

    match compile_file(&config, &args.command, &args.source, &args.object) {
        Ok(status) => {
            if status != 0 {
                tracing::debug!("remote compiler exited with status {status}");
            }
            std::process::exit(status);
        }
        Err(e) => {
            tracing::error!("compile exchange failed: {e}");
            std::process::exit(1);
        }
    }
}
