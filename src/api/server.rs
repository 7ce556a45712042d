use std::sync::Arc;
use std::time::Duration;

use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use rust_embed::Embed;
use serde::Deserialize;
use tower_http::services::ServeFile;

use crate::overlay::Surface;
use crate::stream::SelectError;
use crate::terminal::{Terminal, ToolAction};
use crate::view::{Action, RenderedView, SearchType, ViewState};

const LONG_POLL_TIMEOUT: Duration = Duration::from_secs(25);

#[derive(Embed)]
#[folder = "src/assets/"]
struct Assets;

#[derive(Clone)]
pub struct AppState {
    pub terminal: Arc<Terminal>,
}

impl AppState {
    pub fn new(terminal: Terminal) -> Self {
        Self {
            terminal: Arc::new(terminal),
        }
    }

    fn render(&self, state: &ViewState) -> Json<RenderedView> {
        Json(state.render(self.terminal.map_url()))
    }
}

#[derive(Deserialize)]
struct QueryBody {
    query: String,
}

#[derive(Deserialize)]
struct SearchTypeBody {
    search_type: SearchType,
}

#[derive(Deserialize)]
struct PageBody {
    page: usize,
}

#[derive(Deserialize)]
struct WaitQuery {
    version: u64,
}

#[derive(Deserialize)]
struct LaserMoveBody {
    x: f64,
    y: f64,
    width: f64,
    height: f64,
}

pub fn router(state: AppState) -> Router {
    let mut app = Router::new()
        .route("/", get(index_handler))
        .route("/assets/{*path}", get(static_handler))
        .route("/api/view", get(view_handler))
        .route("/api/view/wait", get(wait_handler))
        .route("/api/query", post(query_handler))
        .route("/api/search-type", post(search_type_handler))
        .route("/api/search", post(search_handler))
        .route("/api/page", post(page_handler))
        .route("/api/cameras/{id}/select", post(select_handler))
        .route("/api/camera/close", post(close_handler))
        .route("/api/tools/toggle", post(tools_toggle_handler))
        .route("/api/tools/{tool}", post(tool_handler))
        .route("/api/detection/toggle", post(detection_toggle_handler))
        .route("/api/detection/frame", get(detection_frame_handler))
        .route("/api/laser/toggle", post(laser_toggle_handler))
        .route("/api/laser/move", post(laser_move_handler))
        .route("/api/surface", post(surface_handler))
        .route("/api/banner/dismiss", post(dismiss_handler));

    if let Some(path) = state.terminal.catalog_file() {
        app = app.route_service("/cameras.json", ServeFile::new(path));
    }

    app.with_state(state)
}

pub async fn start_server(state: AppState, port: u16) -> Result<(), std::io::Error> {
    let app = router(state);

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("starting HTTP server on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await
}

async fn index_handler() -> impl IntoResponse {
    match Assets::get("index.html") {
        Some(content) => Html(content.data.to_vec()).into_response(),
        None => (StatusCode::NOT_FOUND, "index.html not found").into_response(),
    }
}

async fn static_handler(Path(path): Path<String>) -> impl IntoResponse {
    match Assets::get(&path) {
        Some(content) => {
            let mime = mime_guess::from_path(&path).first_or_octet_stream();
            (
                [(header::CONTENT_TYPE, mime.as_ref())],
                content.data.to_vec(),
            )
                .into_response()
        }
        None => (StatusCode::NOT_FOUND, "not found").into_response(),
    }
}

async fn apply(state: &AppState, action: Action) -> Json<RenderedView> {
    let next = state.terminal.dispatch(action).await;
    state.render(&next)
}

async fn view_handler(State(state): State<AppState>) -> impl IntoResponse {
    state.render(&state.terminal.snapshot())
}

async fn wait_handler(
    State(state): State<AppState>,
    Query(query): Query<WaitQuery>,
) -> impl IntoResponse {
    let next = state
        .terminal
        .wait_for_change(query.version, LONG_POLL_TIMEOUT)
        .await;
    state.render(&next)
}

async fn query_handler(
    State(state): State<AppState>,
    Json(body): Json<QueryBody>,
) -> impl IntoResponse {
    apply(&state, Action::SetQuery(body.query)).await
}

async fn search_type_handler(
    State(state): State<AppState>,
    Json(body): Json<SearchTypeBody>,
) -> impl IntoResponse {
    apply(&state, Action::SetSearchType(body.search_type)).await
}

async fn search_handler(State(state): State<AppState>) -> impl IntoResponse {
    apply(&state, Action::SubmitSearch).await
}

async fn page_handler(
    State(state): State<AppState>,
    Json(body): Json<PageBody>,
) -> impl IntoResponse {
    apply(&state, Action::SetPage(body.page)).await
}

async fn select_handler(State(state): State<AppState>, Path(id): Path<u64>) -> Response {
    match state.terminal.select_camera(id).await {
        Ok(next) => state.render(&next).into_response(),
        Err(SelectError::UnknownCamera(_)) => {
            (StatusCode::NOT_FOUND, "camera not found").into_response()
        }
        Err(SelectError::Superseded) => (
            StatusCode::CONFLICT,
            state.render(&state.terminal.snapshot()),
        )
            .into_response(),
        Err(_) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            state.render(&state.terminal.snapshot()),
        )
            .into_response(),
    }
}

async fn close_handler(State(state): State<AppState>) -> impl IntoResponse {
    apply(&state, Action::CloseCamera).await
}

async fn tools_toggle_handler(State(state): State<AppState>) -> impl IntoResponse {
    apply(&state, Action::ToggleTools).await
}

async fn tool_handler(State(state): State<AppState>, Path(tool): Path<ToolAction>) -> StatusCode {
    state.terminal.tool(tool);
    StatusCode::NO_CONTENT
}

async fn detection_toggle_handler(State(state): State<AppState>) -> impl IntoResponse {
    apply(&state, Action::ToggleDetection).await
}

async fn detection_frame_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.terminal.detection_frame().await)
}

async fn laser_toggle_handler(State(state): State<AppState>) -> impl IntoResponse {
    apply(&state, Action::ToggleLaser).await
}

async fn laser_move_handler(
    State(state): State<AppState>,
    Json(body): Json<LaserMoveBody>,
) -> Response {
    let surface = Surface::new(body.width, body.height);
    match state.terminal.laser_move(surface, body.x, body.y).await {
        Some(update) => Json(update).into_response(),
        None => StatusCode::NO_CONTENT.into_response(),
    }
}

async fn surface_handler(State(state): State<AppState>, Json(body): Json<Surface>) -> StatusCode {
    state.terminal.set_surface(Surface::new(body.width, body.height));
    StatusCode::NO_CONTENT
}

async fn dismiss_handler(State(state): State<AppState>) -> impl IntoResponse {
    apply(&state, Action::DismissBanner).await
}
