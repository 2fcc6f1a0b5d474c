mod serve;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

/// vlist value list service.
#[derive(Parser)]
#[command(name = "vlist", version, about = "Value list HTTP service")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the vlist HTTP API server
    Serve {
        /// Port to listen on
        #[arg(long, default_value = "8080")]
        port: u16,
        /// Provision the lists index at startup instead of waiting for
        /// POST /api/lists/index
        #[arg(long)]
        create_index: bool,
        /// Path to TLS certificate PEM file (requires --tls-key)
        #[arg(long)]
        tls_cert: Option<PathBuf>,
        /// Path to TLS private key PEM file (requires --tls-cert)
        #[arg(long)]
        tls_key: Option<PathBuf>,
    },
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve {
            port,
            create_index,
            tls_cert,
            tls_key,
        } => {
            // Validate TLS flags: both must be provided or neither
            if tls_cert.is_some() != tls_key.is_some() {
                eprintln!("error: --tls-cert and --tls-key must both be provided");
                process::exit(1);
            }
            let rt = tokio::runtime::Runtime::new().expect("failed to create tokio runtime");
            if let Err(e) = rt.block_on(serve::start_server(port, create_index, tls_cert, tls_key))
            {
                eprintln!("Server error: {}", e);
                process::exit(1);
            }
        }
    }
}
