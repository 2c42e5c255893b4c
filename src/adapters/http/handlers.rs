use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::{Method, StatusCode, Uri},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use std::any::Any;

use crate::adapters::http::server::AppState;
use crate::core::orchestrator::CreateError;
use crate::core::stream::{InvalidStream, StreamDefinition};

/// The error envelope every failure shares: `{error, statusCode}`.
#[derive(Serialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(rename = "statusCode")]
    pub status_code: u16,
}

impl ErrorBody {
    pub fn response(status: StatusCode, error: impl Into<String>) -> Response {
        (
            status,
            Json(Self {
                error: error.into(),
                status_code: status.as_u16(),
            }),
        )
            .into_response()
    }
}

#[derive(Serialize)]
struct MessageBody {
    message: &'static str,
    #[serde(rename = "statusCode")]
    status_code: u16,
}

fn message(text: &'static str) -> Response {
    (
        StatusCode::OK,
        Json(MessageBody {
            message: text,
            status_code: 200,
        }),
    )
        .into_response()
}

#[derive(Serialize)]
struct VersionBody {
    version: &'static str,
    #[serde(rename = "statusCode")]
    status_code: u16,
}

pub async fn version() -> Response {
    (
        StatusCode::OK,
        Json(VersionBody {
            version: env!("CARGO_PKG_VERSION"),
            status_code: 200,
        }),
    )
        .into_response()
}

#[derive(Serialize)]
struct StreamListBody {
    streams: Vec<StreamDefinition>,
    #[serde(rename = "statusCode")]
    status_code: u16,
}

pub async fn list_streams(State(state): State<AppState>) -> Response {
    match state.reconciler.list_streams().await {
        Ok(streams) => (
            StatusCode::OK,
            Json(StreamListBody {
                streams,
                status_code: 200,
            }),
        )
            .into_response(),
        Err(err) => {
            tracing::error!("could not list streams: {err}");
            ErrorBody::response(StatusCode::INTERNAL_SERVER_ERROR, "Could not list streams")
        }
    }
}

#[derive(Deserialize)]
pub struct CreateStreamRequest {
    name: Option<String>,
    listen: Option<String>,
    target: Option<String>,
}

pub async fn create_stream(
    State(state): State<AppState>,
    payload: Result<Json<CreateStreamRequest>, JsonRejection>,
) -> Response {
    let Ok(Json(payload)) = payload else {
        return ErrorBody::response(StatusCode::BAD_REQUEST, "Invalid request");
    };
    let (Some(name), Some(listen), Some(target)) = (payload.name, payload.listen, payload.target)
    else {
        return ErrorBody::response(StatusCode::BAD_REQUEST, "Invalid request");
    };

    let def = StreamDefinition {
        name,
        listen,
        target,
    };
    match state.reconciler.create_stream(def).await {
        Ok(()) => message("Stream created"),
        Err(CreateError::Invalid(InvalidStream::Name(_))) => {
            ErrorBody::response(StatusCode::BAD_REQUEST, "Invalid name")
        }
        Err(CreateError::Invalid(InvalidStream::Listen(_))) => {
            ErrorBody::response(StatusCode::BAD_REQUEST, "Invalid listen")
        }
        Err(CreateError::Invalid(InvalidStream::Target(_))) => {
            ErrorBody::response(StatusCode::BAD_REQUEST, "Invalid target")
        }
        Err(CreateError::ConfigRejected) => {
            ErrorBody::response(StatusCode::INTERNAL_SERVER_ERROR, "Nginx configuration failed")
        }
        Err(CreateError::Store(err)) => {
            tracing::error!("could not create stream: {err}");
            ErrorBody::response(StatusCode::INTERNAL_SERVER_ERROR, "Could not create stream")
        }
    }
}

pub async fn delete_stream(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Response {
    match state.reconciler.delete_stream(&name).await {
        Ok(()) => message("Stream deleted"),
        Err(err) => {
            tracing::error!(stream = %name, "could not delete stream: {err}");
            ErrorBody::response(StatusCode::INTERNAL_SERVER_ERROR, "Could not delete stream")
        }
    }
}

pub async fn not_found(method: Method, uri: Uri) -> Response {
    ErrorBody::response(
        StatusCode::NOT_FOUND,
        format!("{method} {} not found", uri.path()),
    )
}

/// Last-resort handler for panicking routes, wired through
/// `CatchPanicLayer`. Typed errors never come through here.
pub fn handle_panic(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        (*s).to_string()
    } else {
        "unhandled internal error".to_string()
    };
    tracing::error!("request handler panicked: {detail}");
    ErrorBody::response(StatusCode::INTERNAL_SERVER_ERROR, detail)
}
