//! Development server with on-demand post generation
//!
//! The generated site is served from the public directory. A post page that
//! has not been generated yet is answered with the loading page while the
//! post is fetched and written in the background; the loading page refreshes
//! itself until the real page exists.

use anyhow::Result;
use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode, Uri},
    response::{Html, IntoResponse, Response},
    Router,
};
use percent_encoding::percent_decode_str;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::error::ContentError;
use crate::generator::{is_safe_segment, post_file, Generator};
use crate::Blog;

/// Progress of a post generated on demand
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FallbackStatus {
    Pending,
    Missing,
}

/// Server state
struct ServerState {
    public_dir: PathBuf,
    root: String,
    generator: Generator,
    fallback: bool,
    /// At most one generation per uid; never held across an await
    posts: Mutex<HashMap<String, FallbackStatus>>,
}

impl ServerState {
    fn new(blog: &Blog, fallback: bool) -> Result<Self> {
        Ok(Self {
            public_dir: blog.public_dir.clone(),
            root: blog.config.root.clone(),
            generator: Generator::new(blog)?,
            fallback,
            posts: Mutex::new(HashMap::new()),
        })
    }

    /// Strip the site root from a request path
    fn site_path<'a>(&self, path: &'a str) -> Option<&'a str> {
        let root = self.root.trim_end_matches('/');
        path.strip_prefix(root)
            .filter(|rest| rest.is_empty() || rest.starts_with('/'))
    }

    /// Uid of a post page request, if the path is one
    fn post_uid(&self, site_path: &str) -> Option<String> {
        let rest = site_path.trim_start_matches('/').strip_prefix("post/")?;
        let segment = match rest.split_once('/') {
            Some((segment, "")) | Some((segment, "index.html")) => segment,
            Some(_) => return None,
            None => rest,
        };
        let uid = percent_decode_str(segment).decode_utf8().ok()?.into_owned();
        is_safe_segment(&uid).then_some(uid)
    }
}

/// Start the development server
pub async fn start(blog: &Blog, ip: &str, port: u16, fallback: bool, open: bool) -> Result<()> {
    let state = Arc::new(ServerState::new(blog, fallback)?);
    let app = router(state);

    // Parse address - handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    let url = format!("http://{}:{}{}", ip, port, blog.config.root);
    println!("Server running at {}", url);
    if fallback {
        println!("Posts without a generated page are fetched on first request.");
    }
    println!("Press Ctrl+C to stop.");

    if open {
        if let Err(e) = open_browser(&url) {
            tracing::warn!("Failed to open browser: {}", e);
        }
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn router(state: Arc<ServerState>) -> Router {
    Router::new()
        .fallback(fallback_handler)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

/// Serve generated files, generating missing post pages on demand
async fn fallback_handler(
    State(state): State<Arc<ServerState>>,
    mut request: Request<Body>,
) -> Response {
    let path = request.uri().path().to_string();
    let Some(site_path) = state.site_path(&path) else {
        return (StatusCode::NOT_FOUND, "Not found").into_response();
    };

    let on_disk = state.public_dir.join(site_path.trim_start_matches('/'));
    if state.fallback && !on_disk.is_file() {
        if let Some(uid) = state.post_uid(site_path) {
            if !state.public_dir.join(post_file(&uid)).exists() {
                return post_fallback(state.clone(), uid).await;
            }
        }
    }

    // ServeDir resolves paths from the public directory itself
    if site_path != path {
        let rewritten = match request.uri().query() {
            Some(query) => format!("{}?{}", site_path, query),
            None => site_path.to_string(),
        };
        match rewritten.parse::<Uri>() {
            Ok(uri) => *request.uri_mut() = uri,
            Err(_) => return (StatusCode::BAD_REQUEST, "Bad request").into_response(),
        }
    }

    let mut service = ServeDir::new(&state.public_dir).append_index_html_on_directories(true);
    match service.try_call(request).await {
        Ok(response) => response.into_response(),
        Err(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Server error").into_response(),
    }
}

/// Answer a request for a post that has no page yet
async fn post_fallback(state: Arc<ServerState>, uid: String) -> Response {
    let status = {
        let mut posts = state.posts.lock().await;
        match posts.get(&uid).copied() {
            Some(status) => Some(status),
            None => {
                posts.insert(uid.clone(), FallbackStatus::Pending);
                None
            }
        }
    };

    match status {
        Some(FallbackStatus::Missing) => (StatusCode::NOT_FOUND, "Not found").into_response(),
        Some(FallbackStatus::Pending) => loading_response(&state),
        None => {
            tracing::info!("Generating post {} on demand", uid);
            tokio::spawn(generate_in_background(state.clone(), uid));
            loading_response(&state)
        }
    }
}

async fn generate_in_background(state: Arc<ServerState>, uid: String) {
    let result = state.generator.generate_post(&uid).await;

    let mut posts = state.posts.lock().await;
    match result {
        Ok(path) => {
            tracing::info!("Generated {:?}", path);
            posts.remove(&uid);
        }
        Err(e) => match e.downcast_ref::<ContentError>() {
            Some(ContentError::NotFound { .. }) => {
                tracing::info!("Post {} does not exist", uid);
                posts.insert(uid, FallbackStatus::Missing);
            }
            _ => {
                // Dropped so the next request tries again
                tracing::error!("Failed to generate post {}: {:#}", uid, e);
                posts.remove(&uid);
            }
        },
    }
}

fn loading_response(state: &ServerState) -> Response {
    match state.generator.render_loading() {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            tracing::error!("Failed to render loading page: {:#}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Server error").into_response()
        }
    }
}

/// Open a URL in the default browser
fn open_browser(url: &str) -> Result<()> {
    #[cfg(target_os = "macos")]
    {
        std::process::Command::new("open").arg(url).spawn()?;
    }

    #[cfg(target_os = "linux")]
    {
        std::process::Command::new("xdg-open").arg(url).spawn()?;
    }

    #[cfg(target_os = "windows")]
    {
        std::process::Command::new("cmd")
            .args(["/c", "start", url])
            .spawn()?;
    }

    Ok(())
}
