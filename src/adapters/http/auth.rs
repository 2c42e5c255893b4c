use axum::{
    extract::{Request, State},
    http::{StatusCode, header},
    middleware::Next,
    response::Response,
};
use subtle::ConstantTimeEq;

use crate::adapters::http::handlers::ErrorBody;
use crate::adapters::http::server::AppState;

/// Every route, including the fallback, sits behind this check: the
/// `authorization` header must equal the configured token exactly.
pub async fn require_token(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let presented = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok());

    let authorized = presented.is_some_and(|token| constant_time_compare(token, &state.api_token));

    if authorized {
        next.run(request).await
    } else {
        ErrorBody::response(StatusCode::UNAUTHORIZED, "Unauthorized")
    }
}

fn constant_time_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.as_bytes().ct_eq(b.as_bytes()).into()
}
