/// HTTP routing
///
/// - /ws       WebSocket upgrade (live channel feed + commands)
/// - /pdf/:name PDF documents (listing fallback when the name is unknown)
/// - /          static web UI files
use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use tower_http::services::ServeDir;

use crate::{
    documents,
    logger::{self, LogTag},
    webserver::{state::AppState, ws::connection},
};

/// Build the application router
pub fn create_router(state: AppState) -> Router {
    let web_root = state.web_root.as_ref().clone();

    Router::new()
        .route("/ws", get(connection::ws_handler))
        .route("/pdf/:name", get(serve_pdf))
        .fallback_service(ServeDir::new(web_root))
        .with_state(state)
}

/// Serve one PDF document by name
///
/// Only names the directory enumeration yields are served, so a crafted
/// path cannot escape the documents directory. An unknown name answers
/// with the listing instead, a failed enumeration with 500.
async fn serve_pdf(Path(name): Path<String>, State(state): State<AppState>) -> Response {
    logger::debug(LogTag::Documents, &format!("PDF requested: {}", name));

    let names = match documents::list_documents(&state.docs_dir) {
        Ok(names) => names,
        Err(e) => {
            logger::warning(
                LogTag::Documents,
                &format!("Document listing failed: {:#}", e),
            );
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Error reading documents directory",
            )
                .into_response();
        }
    };

    if !names.iter().any(|n| *n == name) {
        return Json(serde_json::json!({ "pdfs": names })).into_response();
    }

    match tokio::fs::read(state.docs_dir.join(&name)).await {
        Ok(bytes) => ([(header::CONTENT_TYPE, "application/pdf")], bytes).into_response(),
        Err(e) => {
            logger::warning(
                LogTag::Documents,
                &format!("Failed to read document {}: {}", name, e),
            );
            (StatusCode::NOT_FOUND, "Document not found").into_response()
        }
    }
}
