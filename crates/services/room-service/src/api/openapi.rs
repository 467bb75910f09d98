//! OpenAPI documentation.

use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};

use crate::api::handlers::assignment_handler::AssignRoomRequest;
use crate::api::handlers::health_handler::{Health, HealthReport};
use domain::{AssignedOccupant, Board, Occupant, Role, Room, RoomWithOccupants};

/// API documentation struct.
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::api::handlers::assignment_handler::get_board,
        crate::api::handlers::assignment_handler::assign_room,
        crate::api::handlers::health_handler::health_check,
    ),
    components(
        schemas(
            AssignRoomRequest,
            AssignedOccupant,
            Board,
            Health,
            HealthReport,
            Occupant,
            Role,
            Room,
            RoomWithOccupants,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Room management", description = "Capacity-checked room assignment"),
        (name = "health", description = "Liveness probe"),
    )
)]
pub struct ApiDoc;

/// Security scheme modifier.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}
