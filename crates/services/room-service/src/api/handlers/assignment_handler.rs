//! Room-management handlers.

use axum::{
    extract::{Extension, Path, State},
    response::Json,
    routing::{get, patch},
    Router,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use common::{AppError, AppResult};
use domain::{AssignedOccupant, Board, Container};

use crate::api::extractors::CheckedJson;
use crate::api::state::AppState;
use crate::service::Session;

const MSG_INVALID_USER_ID: &str = "Invalid user ID";
const MSG_INVALID_ROOM_ID: &str = "Invalid room ID";

/// Room assignment request. A missing or null `room_id` means unassigned.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct AssignRoomRequest {
    /// Target room, or null for the unassigned pool
    #[serde(default)]
    #[validate(length(equal = 36, message = "Invalid room ID"))]
    #[schema(example = "3f1c2b8e-6a0d-4a51-9d8e-2f6f3c1f0a77")]
    pub room_id: Option<String>,
}

impl AssignRoomRequest {
    fn target(&self) -> AppResult<Container> {
        match self.room_id.as_deref() {
            None => Ok(Container::Unassigned),
            Some(raw) => Uuid::parse_str(raw)
                .map(Container::Room)
                .map_err(|_| AppError::validation(MSG_INVALID_ROOM_ID)),
        }
    }
}

/// Routes that require an authenticated session
pub fn room_management_routes() -> Router<AppState> {
    Router::new()
        .route("/room-management", get(get_board))
        .route("/users/:id/room", patch(assign_room))
}

/// Rooms with occupants plus unassigned users (operators only)
#[utoipa::path(
    get,
    path = "/room-management",
    tag = "Room management",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Rooms ordered by name with occupants, plus unassigned users", body = Board),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - operators only")
    )
)]
pub async fn get_board(
    Extension(session): Extension<Session>,
    State(state): State<AppState>,
) -> AppResult<Json<Board>> {
    let operator = state.assignments.authorize(&session).await?;
    let board = state.assignments.board(&operator).await?;
    Ok(Json(board))
}

/// Assign a user to a room, or back to unassigned (operators only)
#[utoipa::path(
    patch,
    path = "/users/{id}/room",
    tag = "Room management",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "User ID")
    ),
    request_body = AssignRoomRequest,
    responses(
        (status = 200, description = "Updated assignment", body = AssignedOccupant),
        (status = 400, description = "CAPACITY_EXCEEDED or VALIDATION_ERROR"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - operators only"),
        (status = 404, description = "User or room not found")
    )
)]
pub async fn assign_room(
    Extension(session): Extension<Session>,
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<CheckedJson<AssignRoomRequest>, AppError>,
) -> AppResult<Json<AssignedOccupant>> {
    // Input is only judged once the caller is known to be an operator
    let operator = state.assignments.authorize(&session).await?;

    let occupant_id =
        Uuid::parse_str(&id).map_err(|_| AppError::validation(MSG_INVALID_USER_ID))?;
    let CheckedJson(payload) = body?;
    let target = payload.target()?;

    let assigned = state
        .assignments
        .assign(&operator, occupant_id, target)
        .await?;

    Ok(Json(assigned))
}
