//! HTTP client for the room service.

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::json;
use uuid::Uuid;

use common::{ErrorResponse, CODE_CAPACITY_EXCEEDED};
use domain::{AssignedOccupant, Board, Container, MSG_ASSIGNMENT_FAILED, MSG_ROOM_FULL};

use crate::config::BoardConfig;
use crate::gateway::{AssignmentGateway, GatewayError};

/// Room service client backed by reqwest.
pub struct RoomClient {
    http: Client,
    base_url: String,
    token: Option<String>,
}

impl RoomClient {
    pub fn new(config: &BoardConfig) -> Result<Self, GatewayError> {
        let http = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| GatewayError::Transport(e.to_string()))?;

        Ok(Self {
            http,
            base_url: config.server_url.trim_end_matches('/').to_string(),
            token: config.access_token.clone(),
        })
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self.http.request(method, format!("{}{}", self.base_url, path));
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send<T: DeserializeOwned>(builder: RequestBuilder) -> Result<T, GatewayError> {
        let response = builder
            .send()
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))?;
        Self::decode(response).await
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, GatewayError> {
        let status = response.status();
        if status.is_success() {
            return response
                .json::<T>()
                .await
                .map_err(|e| GatewayError::Transport(e.to_string()));
        }

        let body = response.json::<ErrorResponse>().await.ok();
        Err(classify(status, body))
    }
}

/// Map a non-success response onto a gateway error.
fn classify(status: StatusCode, body: Option<ErrorResponse>) -> GatewayError {
    let (code, message) = body
        .map(|b| (b.error.code, b.error.message))
        .unwrap_or_default();
    let or = |fallback: &str| {
        if message.is_empty() {
            fallback.to_string()
        } else {
            message.clone()
        }
    };

    match status {
        StatusCode::UNAUTHORIZED => GatewayError::Unauthenticated,
        StatusCode::FORBIDDEN => GatewayError::Forbidden,
        StatusCode::NOT_FOUND => GatewayError::NotFound(or("Not found")),
        StatusCode::BAD_REQUEST if code == CODE_CAPACITY_EXCEEDED => {
            GatewayError::CapacityExceeded(or(MSG_ROOM_FULL))
        }
        s if s.is_client_error() => GatewayError::Validation(or(MSG_ASSIGNMENT_FAILED)),
        s => GatewayError::Server {
            status: s.as_u16(),
            message: or(MSG_ASSIGNMENT_FAILED),
        },
    }
}

#[async_trait]
impl AssignmentGateway for RoomClient {
    async fn fetch_board(&self) -> Result<Board, GatewayError> {
        Self::send(self.request(Method::GET, "/room-management")).await
    }

    async fn assign(
        &self,
        occupant_id: Uuid,
        target: Container,
    ) -> Result<AssignedOccupant, GatewayError> {
        let path = format!("/users/{}/room", occupant_id);
        let body = json!({ "room_id": target.room_id() });
        Self::send(self.request(Method::PATCH, &path).json(&body)).await
    }
}
