//! Actor identification middleware
//!
//! Every stock-affecting call records who performed it. Authentication and
//! authorization happen upstream of this service; the caller forwards the
//! already-authorized actor as an opaque UUID in the `X-Actor-Id` header.

use axum::{
    extract::Request,
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};

use crate::error::{ErrorDetail, ErrorResponse};

pub const ACTOR_HEADER: &str = "x-actor-id";

/// Identity of the acting operator, as supplied by the caller
#[derive(Clone, Copy, Debug)]
pub struct ActorId(pub uuid::Uuid);

/// Middleware that requires a well-formed `X-Actor-Id` header
pub async fn actor_middleware(mut request: Request, next: Next) -> Response {
    let header = request
        .headers()
        .get(ACTOR_HEADER)
        .and_then(|h| h.to_str().ok());

    let actor_id = match header.map(uuid::Uuid::parse_str) {
        Some(Ok(id)) => id,
        Some(Err(_)) => return bad_actor_response("X-Actor-Id header is not a valid UUID"),
        None => return bad_actor_response("Missing X-Actor-Id header"),
    };

    request.extensions_mut().insert(ActorId(actor_id));

    next.run(request).await
}

fn bad_actor_response(message: &str) -> Response {
    let error = ErrorResponse {
        error: ErrorDetail {
            code: "MISSING_ACTOR".to_string(),
            message_en: message.to_string(),
            message_es: "Falta el encabezado X-Actor-Id o no es válido".to_string(),
            field: None,
            shortfalls: None,
        },
    };

    (StatusCode::BAD_REQUEST, Json(error)).into_response()
}

/// Extractor for the acting operator
/// Use this in handlers to get the current actor
#[derive(Clone, Copy, Debug)]
pub struct CurrentActor(pub ActorId);

#[axum::async_trait]
impl<S> axum::extract::FromRequestParts<S> for CurrentActor
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, Json<ErrorResponse>);

    async fn from_request_parts(
        parts: &mut axum::http::request::Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<ActorId>()
            .copied()
            .map(CurrentActor)
            .ok_or_else(|| {
                let error = ErrorResponse {
                    error: ErrorDetail {
                        code: "MISSING_ACTOR".to_string(),
                        message_en: "Actor identification required".to_string(),
                        message_es: "Se requiere identificar al operador".to_string(),
                        field: None,
                        shortfalls: None,
                    },
                };
                (StatusCode::BAD_REQUEST, Json(error))
            })
    }
}

impl CurrentActor {
    pub fn id(&self) -> uuid::Uuid {
        self.0 .0
    }
}
