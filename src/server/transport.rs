//! TCP transport: one request/response exchange per connection.
//!
//! Framing follows the wire contract: the client writes its JSON request and
//! half-closes the write side, the server reads to EOF, routes, writes the
//! response string, and drops the socket. A payload that fails to decode is a
//! connection-level failure and never reaches the router.

use std::sync::{Arc, Mutex};

use anyhow::{anyhow, Context, Result};
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::{TcpListener, TcpStream},
};

use crate::{
    domain::registry::ChatRegistry,
    server::{request::Request, router},
};

pub type SharedRegistry = Arc<Mutex<ChatRegistry>>;

pub async fn bind(host: &str, port: u16) -> Result<TcpListener> {
    TcpListener::bind((host, port))
        .await
        .with_context(|| format!("failed to bind {host}:{port}"))
}

/// Accepts connections until the task is dropped, serving each in its own
/// task against the shared registry.
pub async fn serve(listener: TcpListener, registry: SharedRegistry) -> Result<()> {
    let local_addr = listener
        .local_addr()
        .context("listener address unavailable")?;
    tracing::info!(addr = %local_addr, "server listening");

    loop {
        let (stream, peer) = listener
            .accept()
            .await
            .context("failed to accept connection")?;
        let registry = Arc::clone(&registry);
        tokio::spawn(async move {
            if let Err(error) = handle_connection(stream, registry).await {
                tracing::error!(%peer, error = ?error, "connection failed");
            }
        });
    }
}

async fn handle_connection(mut stream: TcpStream, registry: SharedRegistry) -> Result<()> {
    let peer = stream.peer_addr().context("peer address unavailable")?;
    tracing::info!(%peer, "start serving");

    let mut raw = Vec::new();
    stream
        .read_to_end(&mut raw)
        .await
        .context("failed to read request")?;
    let request: Request = serde_json::from_slice(&raw).context("failed to decode request")?;
    tracing::info!(
        %peer,
        client = %request.client_name,
        endpoint = %request.endpoint,
        "received request"
    );

    let response = {
        let mut registry = registry
            .lock()
            .map_err(|_| anyhow!("registry lock poisoned"))?;
        router::route(&mut registry, &request)
    };

    stream
        .write_all(response.as_bytes())
        .await
        .context("failed to write response")?;
    stream
        .shutdown()
        .await
        .context("failed to close connection")?;
    tracing::info!(%peer, "stop serving");
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::domain::registry::ChatSettings;

    use super::*;

    async fn spawn_server() -> (std::net::SocketAddr, SharedRegistry) {
        let registry = Arc::new(Mutex::new(ChatRegistry::new(ChatSettings::default())));
        let listener = bind("127.0.0.1", 0).await.expect("listener must bind");
        let addr = listener.local_addr().expect("listener address");
        tokio::spawn(serve(listener, Arc::clone(&registry)));
        (addr, registry)
    }

    async fn exchange(addr: std::net::SocketAddr, payload: &[u8]) -> String {
        let mut stream = TcpStream::connect(addr).await.expect("client must connect");
        stream.write_all(payload).await.expect("request must send");
        stream.shutdown().await.expect("write side must close");
        let mut response = String::new();
        stream
            .read_to_string(&mut response)
            .await
            .expect("response must arrive");
        response
    }

    #[tokio::test]
    async fn serves_connect_request_end_to_end() {
        let (addr, registry) = spawn_server().await;

        let payload = serde_json::to_vec(&Request::connect("alice")).expect("request must encode");
        let response = exchange(addr, &payload).await;

        assert_eq!(response, "OK");
        assert!(registry
            .lock()
            .expect("registry lock must not be poisoned")
            .contains_user("alice"));
    }

    #[tokio::test]
    async fn undecodable_payload_never_reaches_the_registry() {
        let (addr, registry) = spawn_server().await;

        let response = exchange(addr, b"not json at all").await;

        assert_eq!(response, "");
        assert_eq!(
            registry
                .lock()
                .expect("registry lock must not be poisoned")
                .users()
                .count(),
            0
        );
    }
}
