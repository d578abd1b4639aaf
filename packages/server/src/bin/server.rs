//! LAN chat relay server.
//!
//! Accepts client connections, keeps track of who is online and relays
//! text messages and file transfers to everyone or to one named user.
//!
//! Run with:
//! ```not_rust
//! cargo run --bin lanchat-server
//! cargo run --bin lanchat-server -- --host 0.0.0.0 --port 5000
//! ```

use clap::Parser;
use lanchat_server::{
    ui::{Server, state::AppState},
    usecase::new_shared_registry,
};
use lanchat_shared::logger::setup_logger;

#[derive(Parser, Debug)]
#[command(name = "lanchat-server")]
#[command(about = "LAN chat relay with broadcast and private messages", long_about = None)]
struct Args {
    /// Host address to bind the server to
    #[arg(short = 'H', long, default_value = "127.0.0.1")]
    host: String,

    /// Port number to bind the server to
    #[arg(short = 'p', long, default_value = "5000")]
    port: u16,
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    setup_logger(env!("CARGO_BIN_NAME"), "debug");

    let args = Args::parse();

    // Initialize dependencies in order:
    // 1. Registry (in-memory, process lifetime only)
    // 2. UseCases sharing the registry
    // 3. Server
    let registry = new_shared_registry();
    let state = AppState::from_registry(registry);
    let server = Server::new(state);

    if let Err(e) = server.run(args.host, args.port).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
