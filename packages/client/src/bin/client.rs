//! LAN chat client with private messages, file transfer and reconnection.
//!
//! Connects to a relay, logs in with the given username and sends lines
//! typed at the prompt. Received files are written to the download directory.
//! Automatically reconnects on disconnection (max 5 attempts with 5 second interval).
//!
//! Run with:
//! ```not_rust
//! cargo run --bin lanchat-client -- --username alice
//! cargo run --bin lanchat-client -- -u bob -H 192.168.0.10 -p 5000
//! ```

use std::path::PathBuf;

use clap::Parser;

use lanchat_client::run_client;
use lanchat_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "lanchat-client")]
#[command(about = "LAN chat client with private messages and file transfer", long_about = None)]
struct Args {
    /// Username shown to other users
    #[arg(short = 'u', long)]
    username: String,

    /// Relay host
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Relay port
    #[arg(short = 'p', long, default_value_t = 5000)]
    port: u16,

    /// Directory where received files are saved
    #[arg(short = 'd', long, default_value = "downloads")]
    download_dir: PathBuf,
}

#[tokio::main]
async fn main() {
    setup_logger(env!("CARGO_BIN_NAME"), "warn");

    let args = Args::parse();
    let addr = format!("{}:{}", args.host, args.port);

    if let Err(e) = run_client(addr, args.username, args.download_dir).await {
        tracing::error!("Client error: {}", e);
        std::process::exit(1);
    }
}
