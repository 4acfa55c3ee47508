//! Test utilities for psacc-client
//!
//! [`TestServer`] serves an axum router on an ephemeral loopback port and
//! hands back a [`PsaccClient`] bound to it, so suites can run against a
//! stand-in for the remote service (or against this bridge's own API) over
//! real HTTP.

use std::net::SocketAddr;
use std::time::Duration;

use axum::Router;
use psacc_core::{ApiError, ApiResult};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use crate::PsaccClient;

/// A served router; the server task is aborted on drop
pub struct TestServer {
    pub addr: SocketAddr,
    pub client: PsaccClient,
    task: JoinHandle<()>,
}

impl TestServer {
    /// Serve `router` with a client using short test timeouts
    pub async fn start(router: Router) -> ApiResult<Self> {
        Self::start_with_timeout(router, Duration::from_secs(5), Duration::from_secs(2)).await
    }

    /// Serve `router` with a client using the given timeouts
    pub async fn start_with_timeout(
        router: Router,
        timeout: Duration,
        connect_timeout: Duration,
    ) -> ApiResult<Self> {
        let bind_error = |e: std::io::Error| ApiError::connection(format!("Test server bind: {}", e));
        let listener = TcpListener::bind("127.0.0.1:0").await.map_err(bind_error)?;
        let addr = listener.local_addr().map_err(bind_error)?;

        // The listener is already bound, so early connections queue until
        // the task starts accepting.
        let task = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, router).await {
                tracing::warn!(error = %e, "Test server stopped");
            }
        });

        let client = PsaccClient::with_config(&format!("http://{}", addr), timeout, connect_timeout)?;
        Ok(Self { addr, client, task })
    }

    pub fn base_url(&self) -> String {
        self.client.api_url().to_string()
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Address nothing listens on: an ephemeral port that is bound, then released
pub async fn unused_addr() -> std::io::Result<SocketAddr> {
    TcpListener::bind("127.0.0.1:0").await?.local_addr()
}

/// Poll `condition` every 10 ms until it holds or `timeout` passes
pub async fn wait_for<F, Fut>(condition: F, timeout: Duration) -> bool
where
    F: Fn() -> Fut,
    Fut: std::future::Future<Output = bool>,
{
    let deadline = tokio::time::Instant::now() + timeout;
    loop {
        if condition().await {
            return true;
        }
        if tokio::time::Instant::now() >= deadline {
            return false;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_client_targets_server() {
        let server = TestServer::start(Router::new()).await.unwrap();
        assert_eq!(server.base_url(), format!("http://{}", server.addr));
    }

    #[tokio::test]
    async fn test_wait_for_gives_up() {
        assert!(!wait_for(|| async { false }, Duration::from_millis(30)).await);
        assert!(wait_for(|| async { true }, Duration::from_millis(30)).await);
    }
}
