//! Helpers for exercising clients against an in-process [`axum`] server.
use std::net::SocketAddr;
use std::sync::Once;

use gcp_auth_provider::Credential;
use tokio::task::JoinHandle;

pub const TEST_TOKEN: &str = "test-token";

/// A credential that hands out [`TEST_TOKEN`] without touching the network.
pub fn emulator_credential() -> Credential {
    Credential::emulator(TEST_TOKEN)
}

pub fn init_tracing() {
    static INIT: Once = Once::new();

    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_test_writer()
            .with_max_level(tracing::Level::DEBUG)
            .try_init();
    });
}

/// Serves a [`axum::Router`] on an ephemeral local port until dropped.
#[derive(Debug)]
pub struct MockServer {
    addr: SocketAddr,
    handle: JoinHandle<()>,
}

impl MockServer {
    pub async fn start(router: axum::Router) -> Self {
        init_tracing();

        let listener = match tokio::net::TcpListener::bind("127.0.0.1:0").await {
            Ok(listener) => listener,
            Err(error) => panic!("failed to bind mock server: {error}"),
        };
        let addr = match listener.local_addr() {
            Ok(addr) => addr,
            Err(error) => panic!("mock server has no local addr: {error}"),
        };

        let handle = tokio::spawn(async move {
            if let Err(error) = axum::serve(listener, router).await {
                tracing::error!(message = "mock server exited", ?error);
            }
        });

        Self { addr, handle }
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// `http://127.0.0.1:<port>`, with no trailing slash.
    pub fn root(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.addr)
    }
}

impl Drop for MockServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
