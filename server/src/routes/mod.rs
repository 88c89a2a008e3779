use std::sync::Arc;

use rocket::{
    Request, State, delete, get,
    http::Status,
    post,
    response::{self, Responder, status},
    serde::json::Json,
};
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

use minesweeper_common::{
    models::{Dots, Pos},
    protocol::{
        AckResponse, BoardResponse, ConfigureRequest, CreateResponse, ErrorBody, ErrorKind,
        SweptResponse,
    },
};

use crate::{
    config::Rules,
    error::EngineError,
    logic::Engine,
    session::{Sessions, add_session, find_session, remove_session},
};

/// Engine failure translated for the HTTP boundary.
#[derive(Debug)]
pub struct ApiError {
    status: Status,
    body: ErrorBody,
}

impl ApiError {
    fn unknown_session(id: &str) -> Self {
        Self {
            status: Status::NotFound,
            body: ErrorBody {
                kind: ErrorKind::UnknownSession,
                message: format!("No session with ID {id}"),
            },
        }
    }
}

impl From<EngineError> for ApiError {
    fn from(error: EngineError) -> Self {
        let (status, kind) = match error {
            EngineError::InvalidDimension { .. } => {
                (Status::UnprocessableEntity, ErrorKind::InvalidDimension)
            }
            EngineError::OutOfBounds { .. } => (Status::UnprocessableEntity, ErrorKind::OutOfBounds),
            EngineError::GameOver => (Status::Conflict, ErrorKind::GameOver),
            EngineError::InvalidState => (Status::Conflict, ErrorKind::InvalidState),
        };
        Self {
            status,
            body: ErrorBody {
                kind,
                message: error.to_string(),
            },
        }
    }
}

impl<'r> Responder<'r, 'static> for ApiError {
    fn respond_to(self, request: &'r Request<'_>) -> response::Result<'static> {
        status::Custom(self.status, Json(self.body)).respond_to(request)
    }
}

fn session(sessions: &State<Sessions>, id: &str) -> Result<Arc<Mutex<Engine>>, ApiError> {
    find_session(sessions, id).ok_or_else(|| {
        warn!("Request for non-existent session: {}", id);
        ApiError::unknown_session(id)
    })
}

fn board_response(engine: &Engine, dots: Dots) -> BoardResponse {
    BoardResponse {
        status: engine.status(),
        mines_left: engine.mines_left(),
        dots,
    }
}

#[post("/games")]
#[instrument(level = "trace", skip(sessions, rules))]
pub fn create_game(
    sessions: &State<Sessions>,
    rules: &State<Rules>,
) -> status::Created<Json<CreateResponse>> {
    let id = add_session(sessions, Engine::new(rules.inner().clone()));
    status::Created::new(format!("/games/{id}")).body(Json(CreateResponse { id }))
}

#[get("/games/<id>")]
pub async fn show_game(id: &str, sessions: &State<Sessions>) -> Result<Json<BoardResponse>, ApiError> {
    let session = session(sessions, id)?;
    let engine = session.lock().await;
    Ok(Json(board_response(&engine, engine.dots().unwrap_or_default())))
}

#[post("/games/<id>/configure", data = "<request>")]
pub async fn configure(
    id: &str,
    request: Json<ConfigureRequest>,
    sessions: &State<Sessions>,
) -> Result<Json<BoardResponse>, ApiError> {
    let (width, height) = request.board.dimensions();
    info!(
        "Configuring session {}: {}x{} ({:?})",
        id, width, height, request.density
    );
    let session = session(sessions, id)?;
    let mut engine = session.lock().await;
    let dots = engine.configure(width, height, request.density)?;
    Ok(Json(board_response(&engine, dots)))
}

#[post("/games/<id>/sweep", data = "<pos>")]
pub async fn sweep(
    id: &str,
    pos: Json<Pos>,
    sessions: &State<Sessions>,
) -> Result<Json<SweptResponse>, ApiError> {
    debug!("Sweeping ({}, {}) in session {}", pos.x, pos.y, id);
    let session = session(sessions, id)?;
    let mut engine = session.lock().await;
    let (swept, dots) = engine.sweep(pos.0)?;
    Ok(Json(SweptResponse {
        swept,
        status: engine.status(),
        mines_left: engine.mines_left(),
        dots,
    }))
}

#[post("/games/<id>/flag", data = "<pos>")]
pub async fn flag(
    id: &str,
    pos: Json<Pos>,
    sessions: &State<Sessions>,
) -> Result<Json<BoardResponse>, ApiError> {
    debug!("Flagging ({}, {}) in session {}", pos.x, pos.y, id);
    let session = session(sessions, id)?;
    let mut engine = session.lock().await;
    let dots = engine.flag(pos.0)?;
    Ok(Json(board_response(&engine, dots)))
}

#[post("/games/<id>/new")]
pub async fn new_game(id: &str, sessions: &State<Sessions>) -> Result<Json<AckResponse>, ApiError> {
    let session = session(sessions, id)?;
    session.lock().await.reset();
    info!("Session {} reset", id);
    Ok(Json(AckResponse { ok: true }))
}

#[delete("/games/<id>")]
pub fn delete_game(id: &str, sessions: &State<Sessions>) -> Result<Status, ApiError> {
    if remove_session(sessions, id) {
        Ok(Status::NoContent)
    } else {
        Err(ApiError::unknown_session(id))
    }
}
