//! Test server harness.

use sigcheck::MockSimilarityModel;
use sigcheck_server::gateway::{HandlerState, create_router_with_state};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tempfile::TempDir;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

const STARTUP_WAIT_TIMEOUT_SECS: u64 = 5;
const STARTUP_POLL_INTERVAL_MS: u64 = 50;
const TEST_UPLOAD_LIMIT: usize = 4 * 1024 * 1024;

pub struct TestServerConfig {
    pub port: u16,
    pub upload_dir: Option<PathBuf>,
    pub max_upload_bytes: usize,
    pub model: MockSimilarityModel,
}

impl Default for TestServerConfig {
    fn default() -> Self {
        Self {
            port: 0,
            upload_dir: None,
            max_upload_bytes: TEST_UPLOAD_LIMIT,
            model: MockSimilarityModel::pixel_distance(),
        }
    }
}

impl TestServerConfig {
    pub fn with_model(mut self, model: MockSimilarityModel) -> Self {
        self.model = model;
        self
    }

    pub fn with_upload_limit(mut self, bytes: usize) -> Self {
        self.max_upload_bytes = bytes;
        self
    }
}

pub struct TestServer {
    pub addr: SocketAddr,
    upload_dir: PathBuf,
    _server_handle: JoinHandle<()>,
    shutdown_tx: Option<oneshot::Sender<()>>,
    _temp_dir: Option<TempDir>,
}

impl TestServer {
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn upload_dir(&self) -> &Path {
        &self.upload_dir
    }

    /// Number of entries currently staged in the upload directory.
    pub fn staged_uploads(&self) -> usize {
        std::fs::read_dir(&self.upload_dir)
            .map(|entries| entries.count())
            .unwrap_or(0)
    }

    pub async fn shutdown(mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

pub async fn find_available_port() -> std::io::Result<u16> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    Ok(addr.port())
}

pub async fn wait_for_server_ready(
    addr: SocketAddr,
    timeout: Duration,
    interval: Duration,
) -> Result<(), ServerStartupError> {
    let start = std::time::Instant::now();

    loop {
        if start.elapsed() > timeout {
            return Err(ServerStartupError::Timeout);
        }

        match tokio::net::TcpStream::connect(addr).await {
            Ok(_) => return Ok(()),
            Err(_) => {
                tokio::time::sleep(interval).await;
            }
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ServerStartupError {
    #[error("Server failed to start within timeout")]
    Timeout,
    #[error("Failed to bind to address: {0}")]
    BindError(#[from] std::io::Error),
}

/// Spawns a server backed by a [`MockSimilarityModel`] on a local port.
///
/// Without an explicit `upload_dir`, uploads are staged in a fresh temporary
/// directory that lives as long as the returned [`TestServer`].
pub async fn spawn_test_server(config: TestServerConfig) -> Result<TestServer, ServerStartupError> {
    let port = if config.port == 0 {
        find_available_port().await?
    } else {
        config.port
    };

    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    let listener = TcpListener::bind(addr).await?;
    let local_addr = listener.local_addr()?;

    let (upload_dir, _temp_dir) = match config.upload_dir {
        Some(path) => (path, None),
        None => {
            let temp_dir = TempDir::new()?;
            (temp_dir.path().to_path_buf(), Some(temp_dir))
        }
    };

    let state = HandlerState::new(config.model, upload_dir.clone(), config.max_upload_bytes);
    let app = create_router_with_state(state);

    let (shutdown_tx, shutdown_rx) = oneshot::channel();

    let server_handle = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async {
                let _ = shutdown_rx.await;
            })
            .await
            .unwrap();
    });

    wait_for_server_ready(
        local_addr,
        Duration::from_secs(STARTUP_WAIT_TIMEOUT_SECS),
        Duration::from_millis(STARTUP_POLL_INTERVAL_MS),
    )
    .await?;

    Ok(TestServer {
        addr: local_addr,
        upload_dir,
        _server_handle: server_handle,
        shutdown_tx: Some(shutdown_tx),
        _temp_dir,
    })
}
