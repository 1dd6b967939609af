use std::{
    collections::HashMap,
    net::SocketAddr,
    path::{Path, PathBuf},
    sync::{Arc, Mutex, PoisonError, RwLock},
};

use async_trait::async_trait;
use axum::{
    Router,
    extract::{Path as UrlPath, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::get,
};
use tokio::{net::TcpListener, task::JoinHandle};
use tracing::{debug, info, warn};
use url::Url;

use super::MediaError;

/// Makes local artwork files retrievable over HTTP.
#[async_trait]
pub trait ArtServer: Send + Sync {
    /// Start serving if not already running and return the base URL.
    ///
    /// # Errors
    ///
    /// Returns `MediaError::ArtServer` if the listener cannot be bound.
    async fn start(&self) -> Result<String, MediaError>;

    /// Register a local file, starting the server on first use.
    ///
    /// # Errors
    ///
    /// Returns `MediaError::ArtServer` if the file is missing or the server
    /// cannot start.
    async fn register_file(&self, path: &Path) -> Result<String, MediaError>;

    /// Stop serving. Registered files stay known for a later restart.
    fn stop(&self);
}

/// Local path of a `file://` locator. Other schemes, remote hosts and
/// locators without a file name yield `None`.
pub fn file_url_path(locator: &str) -> Option<PathBuf> {
    let url = Url::parse(locator).ok()?;
    if url.scheme() != "file" {
        return None;
    }
    url.to_file_path()
        .ok()
        .filter(|path| path.file_name().is_some())
}

#[derive(Debug, Default)]
struct ArtRegistry {
    by_id: HashMap<u64, PathBuf>,
    by_path: HashMap<PathBuf, u64>,
    next_id: u64,
}

impl ArtRegistry {
    fn register(&mut self, path: &Path) -> u64 {
        if let Some(id) = self.by_path.get(path) {
            return *id;
        }

        self.next_id += 1;
        let id = self.next_id;
        self.by_id.insert(id, path.to_path_buf());
        self.by_path.insert(path.to_path_buf(), id);
        id
    }
}

type SharedRegistry = Arc<RwLock<ArtRegistry>>;

struct RunningServer {
    base_url: String,
    task: JoinHandle<()>,
}

/// Loopback HTTP server for local artwork, started lazily.
///
/// Files are served at `<base>/art/<n>`; the same path always maps to the
/// same URL, so repeated reports of one cover stay equal.
pub struct LocalArtServer {
    bind_addr: SocketAddr,
    files: SharedRegistry,
    running: Mutex<Option<RunningServer>>,
}

impl LocalArtServer {
    /// Server that will bind `bind_addr` on first use
    pub fn new(bind_addr: SocketAddr) -> Self {
        Self {
            bind_addr,
            files: Arc::new(RwLock::new(ArtRegistry::default())),
            running: Mutex::new(None),
        }
    }

    fn base_url(&self) -> Option<String> {
        self.running
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .map(|running| running.base_url.clone())
    }
}

#[async_trait]
impl ArtServer for LocalArtServer {
    async fn start(&self) -> Result<String, MediaError> {
        if let Some(base_url) = self.base_url() {
            return Ok(base_url);
        }

        let listener = TcpListener::bind(self.bind_addr)
            .await
            .map_err(|e| MediaError::ArtServer(format!("bind {}: {e}", self.bind_addr)))?;
        let local_addr = listener
            .local_addr()
            .map_err(|e| MediaError::ArtServer(e.to_string()))?;
        let base_url = format!("http://{local_addr}");

        let mut running = self.running.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(existing) = running.as_ref() {
            return Ok(existing.base_url.clone());
        }

        let app = Router::new()
            .route("/art/{id}", get(serve_art))
            .with_state(Arc::clone(&self.files));
        let task = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                warn!(error = %e, "Artwork server stopped");
            }
        });

        info!(%base_url, "Artwork server listening");
        *running = Some(RunningServer {
            base_url: base_url.clone(),
            task,
        });
        Ok(base_url)
    }

    async fn register_file(&self, path: &Path) -> Result<String, MediaError> {
        let is_file = tokio::fs::metadata(path)
            .await
            .map(|meta| meta.is_file())
            .unwrap_or(false);
        if !is_file {
            return Err(MediaError::ArtServer(format!(
                "{} is not a readable file",
                path.display()
            )));
        }

        let base_url = self.start().await?;
        let id = self
            .files
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .register(path);

        Ok(format!("{base_url}/art/{id}"))
    }

    fn stop(&self) {
        let running = self
            .running
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(running) = running {
            running.task.abort();
            info!(base_url = %running.base_url, "Artwork server stopped");
        }
    }
}

impl Drop for LocalArtServer {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn serve_art(State(files): State<SharedRegistry>, UrlPath(id): UrlPath<u64>) -> Response {
    let path = files
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .by_id
        .get(&id)
        .cloned();
    let Some(path) = path else {
        return StatusCode::NOT_FOUND.into_response();
    };

    match tokio::fs::read(&path).await {
        Ok(bytes) => ([(header::CONTENT_TYPE, content_type(&path))], bytes).into_response(),
        Err(e) => {
            debug!(path = %path.display(), error = %e, "Artwork file unreadable");
            StatusCode::NOT_FOUND.into_response()
        }
    }
}

fn content_type(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);

    match extension.as_deref() {
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("svg") => "image/svg+xml",
        _ => "application/octet-stream",
    }
}
