mod error;
mod models;
mod services;

use axum::{
    Router,
    extract::{Path, Query, State},
    response::{Html, IntoResponse, Json},
    routing::{delete, get, post, put},
};
use http::header::CONTENT_TYPE;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::Mutex;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing_subscriber::{EnvFilter, fmt};
use uuid::Uuid;

use error::{ApiError, Result};
use models::SessionSnapshot;
use services::library::Library;
use services::session::EditorSession;

#[derive(Clone)]
struct AppState {
    library: Library,
    session: Arc<Mutex<EditorSession>>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let library_dir = std::env::var("CHAPTERIZE_LIBRARY_DIR")
        .unwrap_or_else(|_| "./input-txt".to_string());
    let addr = std::env::var("CHAPTERIZE_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());

    let state = AppState {
        library: Library::new(&library_dir),
        session: Arc::new(Mutex::new(EditorSession::new())),
    };

    // Build our application with a route
    let app = Router::new()
        .route("/", get(index))
        .route("/health", get(health_check))
        .route("/api/files", get(list_files))
        .route("/api/file", get(read_file))
        .route("/api/import", post(import_manuscript))
        .route("/api/session", get(session_state))
        .route("/api/chapters/select", post(select_chapter))
        .route("/api/chapters/content", put(update_content))
        .route("/api/chapters/marker", post(insert_split_marker))
        .route("/api/chapters/split", post(split_chapter))
        .route("/api/chapters/merge", post(merge_with_next))
        .route("/api/chapters/undo", post(undo_edit))
        .route("/api/chapters/:id", delete(delete_chapter))
        .with_state(state)
        // Add CORS layer
        .layer(
            CorsLayer::new()
                .allow_origin(tower_http::cors::Any)
                .allow_methods(tower_http::cors::AllowMethods::any())
                .allow_headers(tower_http::cors::AllowHeaders::any()),
        )
        .layer(TraceLayer::new_for_http());

    // Run our application
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!(library_dir = %library_dir, "Listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}

async fn index() -> Html<&'static str> {
    Html(
        r#"
    <!DOCTYPE html>
    <html>
    <head>
        <title>Novel Chapter Management Service</title>
        <meta charset="utf-8">
        <style>
            body { font-family: Arial, sans-serif; margin: 40px; }
            .info-box { background-color: #f0f8ff; padding: 20px; border-radius: 8px; margin: 20px 0; }
            .endpoint { background-color: #f5f5f5; padding: 10px; margin: 10px 0; border-radius: 4px; font-family: monospace; }
        </style>
    </head>
    <body>
        <h1>Novel Chapter Management Service</h1>

        <div class="info-box">
            <h2>Service Information</h2>
            <p>Pick a plain-text manuscript from the library to automatically divide it into chapters,
            then edit the chapter list: split, merge, delete, and undo.</p>
        </div>

        <h2>Available Endpoints:</h2>
        <div class="endpoint">GET / - This information page</div>
        <div class="endpoint">GET /health - Health check</div>
        <div class="endpoint">GET /api/files - List importable manuscripts</div>
        <div class="endpoint">GET /api/file?filename=... - Raw manuscript text</div>
        <div class="endpoint">POST /api/import - Import a manuscript into the editing session</div>
        <div class="endpoint">GET /api/session - Current chapter list and selection</div>
        <div class="endpoint">POST /api/chapters/select - Select a chapter</div>
        <div class="endpoint">PUT /api/chapters/content - Replace a chapter's content</div>
        <div class="endpoint">POST /api/chapters/marker - Insert a split marker at the cursor</div>
        <div class="endpoint">POST /api/chapters/split - Split the selected chapter at its markers</div>
        <div class="endpoint">POST /api/chapters/merge - Merge the selected chapter with the next</div>
        <div class="endpoint">POST /api/chapters/undo - Undo the last content edit</div>
        <div class="endpoint">DELETE /api/chapters/:id - Delete a chapter</div>
    </body>
    </html>
    "#,
    )
}

async fn health_check() -> &'static str {
    "OK"
}

#[derive(Serialize)]
struct FileListResponse {
    files: Vec<models::FileEntry>,
}

async fn list_files(State(state): State<AppState>) -> Result<Json<FileListResponse>> {
    let files = state.library.list()?;
    Ok(Json(FileListResponse { files }))
}

#[derive(Deserialize)]
struct FileQuery {
    filename: Option<String>,
}

async fn read_file(
    State(state): State<AppState>,
    Query(query): Query<FileQuery>,
) -> Result<impl IntoResponse> {
    let filename = query.filename.ok_or(ApiError::MissingParameter("filename"))?;
    let content = state.library.read(&filename)?;
    Ok(([(CONTENT_TYPE, "text/plain; charset=utf-8")], content))
}

#[derive(Deserialize)]
struct ImportRequest {
    filename: String,
}

async fn import_manuscript(
    State(state): State<AppState>,
    Json(request): Json<ImportRequest>,
) -> Result<Json<SessionSnapshot>> {
    let text = state.library.read(&request.filename)?;
    let mut session = state.session.lock().await;
    session.import(&text);
    Ok(Json(session.snapshot()))
}

async fn session_state(State(state): State<AppState>) -> Json<SessionSnapshot> {
    Json(state.session.lock().await.snapshot())
}

#[derive(Deserialize)]
struct SelectRequest {
    id: Uuid,
}

async fn select_chapter(
    State(state): State<AppState>,
    Json(request): Json<SelectRequest>,
) -> Json<SessionSnapshot> {
    let mut session = state.session.lock().await;
    session.select(request.id);
    Json(session.snapshot())
}

#[derive(Deserialize)]
struct UpdateContentRequest {
    id: Uuid,
    content: String,
    cursor: Option<usize>,
}

async fn update_content(
    State(state): State<AppState>,
    Json(request): Json<UpdateContentRequest>,
) -> Json<SessionSnapshot> {
    let mut session = state.session.lock().await;
    session.update_content(request.id, &request.content, request.cursor);
    Json(session.snapshot())
}

#[derive(Deserialize)]
struct MarkerRequest {
    offset: usize,
}

#[derive(Serialize)]
struct MarkerResponse {
    cursor: Option<usize>,
    session: SessionSnapshot,
}

async fn insert_split_marker(
    State(state): State<AppState>,
    Json(request): Json<MarkerRequest>,
) -> Json<MarkerResponse> {
    let mut session = state.session.lock().await;
    let cursor = session.insert_split_marker(request.offset);
    Json(MarkerResponse {
        cursor,
        session: session.snapshot(),
    })
}

async fn split_chapter(State(state): State<AppState>) -> Json<SessionSnapshot> {
    let mut session = state.session.lock().await;
    session.split_selected();
    Json(session.snapshot())
}

async fn merge_with_next(State(state): State<AppState>) -> Json<SessionSnapshot> {
    let mut session = state.session.lock().await;
    session.merge_with_next();
    Json(session.snapshot())
}

#[derive(Serialize)]
struct UndoResponse {
    content: Option<String>,
    session: SessionSnapshot,
}

async fn undo_edit(State(state): State<AppState>) -> Json<UndoResponse> {
    let mut session = state.session.lock().await;
    let content = session.undo();
    Json(UndoResponse {
        content,
        session: session.snapshot(),
    })
}

async fn delete_chapter(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Json<SessionSnapshot> {
    let mut session = state.session.lock().await;
    session.delete(id);
    Json(session.snapshot())
}
