#![allow(dead_code)]

use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex};
use axum::Router;
use axum::extract::{Path as UrlPath, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use tempfile::TempDir;
use tokio::task::JoinHandle;

#[derive(Clone, Default)]
struct Site {
    files: Arc<HashMap<String, Vec<u8>>>,
    requests: Arc<Mutex<Vec<String>>>,
}

/// Minimal stand-in for the live deployment, bound to an ephemeral port.
pub struct FixtureServer {
    pub base_url: String,
    requests: Arc<Mutex<Vec<String>>>,
    handle: JoinHandle<()>,
}

impl FixtureServer {
    /// Serves `files` at `/<name>`. A file named `index.html` is also served
    /// at `/`.
    pub async fn start(files: &[(&str, &str)]) -> Self {
        let site = Site {
            files: Arc::new(
                files
                    .iter()
                    .map(|(name, body)| (name.to_string(), body.as_bytes().to_vec()))
                    .collect(),
            ),
            requests: Arc::new(Mutex::new(Vec::new())),
        };
        let requests = Arc::clone(&site.requests);

        let app = Router::new()
            .route("/", get(index))
            .route("/:name", get(asset))
            .with_state(site);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{}", addr),
            requests,
            handle,
        }
    }

    /// Asset names requested so far, in order.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }
}

impl Drop for FixtureServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn index(State(site): State<Site>) -> Response {
    serve(&site, "index.html")
}

async fn asset(State(site): State<Site>, UrlPath(name): UrlPath<String>) -> Response {
    serve(&site, &name)
}

fn serve(site: &Site, name: &str) -> Response {
    site.requests.lock().unwrap().push(name.to_string());

    match site.files.get(name) {
        Some(body) => {
            let content_type = if name.ends_with(".js") {
                "application/javascript"
            } else if name.ends_with(".html") {
                "text/html; charset=utf-8"
            } else {
                "application/json"
            };
            (StatusCode::OK, [(header::CONTENT_TYPE, content_type)], body.clone()).into_response()
        }
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

pub fn build_dir(files: &[(&str, &str)]) -> TempDir {
    let dir = TempDir::new().unwrap();
    write_files(dir.path(), files);
    dir
}

pub fn write_files(root: &Path, files: &[(&str, &str)]) {
    for (name, content) in files {
        fs::write(root.join(name), content).unwrap();
    }
}
