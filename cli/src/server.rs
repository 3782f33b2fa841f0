//! Upload server: zip in, progress polling, zip out.

use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use axum::extract::{DefaultBodyLimit, Multipart, State};
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;

use enexport::{BatchConverter, BatchProgress, Error, Workspace};

/// Largest accepted upload.
const MAX_UPLOAD_BYTES: usize = 512 * 1024 * 1024;

/// Name of the packed archive handed out by `/download`.
const DOWNLOAD_NAME: &str = "exports.zip";

const UPLOAD_PAGE_HTML: &str = r#"<!DOCTYPE html>
<html>
<head><meta charset="utf-8"><title>DOCX to ENEX</title></head>
<body>
<h1>DOCX to ENEX</h1>
<form id="upload" action="/upload" method="post" enctype="multipart/form-data">
  <input type="file" name="file" accept=".zip">
  <button type="submit">Convert</button>
</form>
<pre id="status"></pre>
<p><a href="/download">Download exports.zip</a></p>
<script>
const form = document.getElementById('upload');
const status = document.getElementById('status');
form.addEventListener('submit', async (e) => {
  e.preventDefault();
  const res = await fetch('/upload', { method: 'POST', body: new FormData(form) });
  status.textContent = JSON.stringify(await res.json());
  const timer = setInterval(async () => {
    const p = await (await fetch('/progress')).json();
    status.textContent = JSON.stringify(p, null, 2);
    if (p.done) clearInterval(timer);
  }, 1000);
});
</script>
</body>
</html>
"#;

struct ServerState {
    converter: BatchConverter,
    workspace: Workspace,
    work_dir: PathBuf,
    // Serializes workspace mutations between upload and download.
    workspace_lock: Mutex<()>,
}

#[derive(Serialize)]
struct UploadResponse {
    status: &'static str,
    total_files: usize,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

fn error_response(status: StatusCode, error: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: error.into(),
        }),
    )
        .into_response()
}

fn batch_error_response(e: Error) -> Response {
    match e {
        Error::Busy => error_response(StatusCode::CONFLICT, e.to_string()),
        Error::Archive(_) => error_response(StatusCode::BAD_REQUEST, e.to_string()),
        _ => {
            log::error!("Request failed: {}", e);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
        }
    }
}

/// Build the router over a converter and a workspace root.
fn router(converter: BatchConverter, work_dir: PathBuf) -> Router {
    let state = Arc::new(ServerState {
        converter,
        workspace: Workspace::new(&work_dir),
        work_dir,
        workspace_lock: Mutex::new(()),
    });

    Router::new()
        .route("/", get(serve_upload_page))
        .route("/upload", post(handle_upload))
        .route("/progress", get(handle_progress))
        .route("/download", get(handle_download))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .with_state(state)
}

/// Run the upload server until the process is stopped.
pub async fn serve(
    bind: &str,
    converter: BatchConverter,
    work_dir: PathBuf,
) -> Result<(), Box<dyn std::error::Error>> {
    let addr: SocketAddr = bind.parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    log::info!("Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, router(converter, work_dir)).await?;
    Ok(())
}

async fn serve_upload_page() -> Html<&'static str> {
    Html(UPLOAD_PAGE_HTML)
}

async fn handle_upload(
    State(state): State<Arc<ServerState>>,
    mut multipart: Multipart,
) -> Response {
    let mut upload: Option<(String, Vec<u8>)> = None;

    while let Ok(Some(field)) = multipart.next_field().await {
        if field.name() != Some("file") {
            continue;
        }
        let filename = field.file_name().unwrap_or_default().to_string();
        match field.bytes().await {
            Ok(bytes) => upload = Some((filename, bytes.to_vec())),
            Err(e) => {
                log::warn!("Failed to read upload bytes: {}", e);
                return error_response(StatusCode::BAD_REQUEST, "Failed to read file data.");
            }
        }
    }

    let Some((filename, bytes)) = upload else {
        return error_response(StatusCode::BAD_REQUEST, "No file provided.");
    };
    if !is_zip_name(&filename) {
        return error_response(StatusCode::BAD_REQUEST, "Please upload a .zip archive.");
    }

    let task_state = Arc::clone(&state);
    let result =
        tokio::task::spawn_blocking(move || start_batch(&task_state, &bytes)).await;

    match result {
        Ok(Ok(total_files)) => Json(UploadResponse {
            status: "Processing started",
            total_files,
        })
        .into_response(),
        Ok(Err(e)) => batch_error_response(e),
        Err(e) => error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
    }
}

async fn handle_progress(State(state): State<Arc<ServerState>>) -> Json<BatchProgress> {
    Json(state.converter.progress())
}

async fn handle_download(State(state): State<Arc<ServerState>>) -> Response {
    let task_state = Arc::clone(&state);
    let result = tokio::task::spawn_blocking(move || pack_exports(&task_state)).await;

    match result {
        Ok(Ok(bytes)) => (
            [
                (header::CONTENT_TYPE, "application/zip".to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{}\"", DOWNLOAD_NAME),
                ),
            ],
            bytes,
        )
            .into_response(),
        Ok(Err(e)) => batch_error_response(e),
        Err(e) => error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
    }
}

/// Reset the workspace, unpack the upload and submit a background batch.
///
/// Returns the number of documents in the batch.
fn start_batch(state: &ServerState, archive: &[u8]) -> enexport::Result<usize> {
    let _guard = state.workspace_lock.lock().unwrap_or_else(|e| e.into_inner());
    if state.converter.is_busy() {
        return Err(Error::Busy);
    }

    state.workspace.reset()?;
    let upload_path = state.work_dir.join("upload.zip");
    fs::write(&upload_path, archive)?;
    let extracted = state.workspace.extract(&upload_path);
    fs::remove_file(&upload_path)?;
    extracted?;

    let job = state
        .converter
        .submit(state.workspace.imports(), state.workspace.exports())?;
    Ok(job.total())
}

/// Pack the converted notes, reset the workspace and return the archive.
fn pack_exports(state: &ServerState) -> enexport::Result<Vec<u8>> {
    let _guard = state.workspace_lock.lock().unwrap_or_else(|e| e.into_inner());
    if state.converter.is_busy() {
        return Err(Error::Busy);
    }

    let archive = state.work_dir.join(DOWNLOAD_NAME);
    state.workspace.pack(&archive)?;
    let bytes = fs::read(&archive)?;
    fs::remove_file(&archive)?;
    Ok(bytes)
}

fn is_zip_name(name: &str) -> bool {
    Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("zip"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use enexport::ConvertOptions;

    fn test_state(root: &Path) -> ServerState {
        ServerState {
            converter: BatchConverter::docx(ConvertOptions::default()),
            workspace: Workspace::new(root),
            work_dir: root.to_path_buf(),
            workspace_lock: Mutex::new(()),
        }
    }

    #[test]
    fn test_is_zip_name() {
        assert!(is_zip_name("notes.zip"));
        assert!(is_zip_name("NOTES.ZIP"));
        assert!(!is_zip_name("notes.docx"));
        assert!(!is_zip_name("zip"));
        assert!(!is_zip_name(""));
    }

    #[test]
    fn test_start_batch_rejects_invalid_archive() {
        let tmp = tempfile::tempdir().unwrap();
        let state = test_state(tmp.path());

        let result = start_batch(&state, b"not a zip");
        assert!(matches!(result, Err(Error::Archive(_))));
        assert!(!tmp.path().join("upload.zip").exists());
    }

    #[test]
    fn test_pack_exports_without_batch() {
        let tmp = tempfile::tempdir().unwrap();
        let state = test_state(tmp.path());
        state.workspace.reset().unwrap();
        fs::write(state.workspace.exports().join("Note.enex"), "<en-export/>").unwrap();

        let bytes = pack_exports(&state).unwrap();
        assert_eq!(&bytes[..2], b"PK");
        assert!(!tmp.path().join(DOWNLOAD_NAME).exists());
        assert_eq!(fs::read_dir(state.workspace.exports()).unwrap().count(), 0);
    }
}
