//! Connection acceptor.

use std::{future::Future, net::SocketAddr, sync::Arc};

use tokio::net::{TcpListener, TcpStream};

use super::{handler::handle_connection, signal::shutdown_signal, state::AppState};

/// TCP chat relay server
///
/// Accepts connections and spawns one task per connection. The login
/// handshake runs inside that task, so a slow client never stalls the
/// accept loop.
///
/// # Example
///
/// ```ignore
/// let server = Server::new(AppState::from_registry(new_shared_registry()));
/// server.run("127.0.0.1".to_string(), 5000).await?;
/// ```
pub struct Server {
    state: Arc<AppState>,
}

impl Server {
    /// Create a new Server instance
    pub fn new(state: AppState) -> Self {
        Self {
            state: Arc::new(state),
        }
    }

    /// Bind to `host:port` and serve until Ctrl+C or SIGTERM
    ///
    /// # Errors
    ///
    /// Returns an error if the server fails to bind to the specified address.
    pub async fn run(self, host: String, port: u16) -> Result<(), Box<dyn std::error::Error>> {
        let bind_addr = format!("{}:{}", host, port);
        let listener = TcpListener::bind(&bind_addr).await?;

        tracing::info!("Chat relay listening on {}", listener.local_addr()?);
        tracing::info!("Press Ctrl+C to shutdown gracefully");

        self.serve(listener, shutdown_signal()).await;

        tracing::info!("Server shutdown complete");
        Ok(())
    }

    /// Accept connections on `listener` until `shutdown` resolves
    ///
    /// A failed accept is logged and the loop continues.
    pub async fn serve<F>(self, listener: TcpListener, shutdown: F)
    where
        F: Future<Output = ()> + Send,
    {
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                _ = &mut shutdown => break,
                accepted = listener.accept() => self.handle_accept_result(accepted),
            }
        }

        let count = self.state.user_list_usecase.count().await;
        let online = self.state.user_list_usecase.snapshot().await;
        tracing::info!(
            "Stopped accepting connections; {} online at shutdown: [{}]",
            count,
            online.joined_user_list().unwrap_or_default()
        );
    }

    fn handle_accept_result(&self, result: std::io::Result<(TcpStream, SocketAddr)>) {
        match result {
            Ok((stream, peer)) => {
                tracing::info!("New client connected: {}", peer);
                let state = Arc::clone(&self.state);
                tokio::spawn(handle_connection(stream, peer, state));
            }
            Err(e) => tracing::warn!("Failed to accept connection: {}", e),
        }
    }
}
