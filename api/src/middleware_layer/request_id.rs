use axum::{
    extract::Request,
    http::{HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};
use chrono::Utc;
use tracing::debug;

pub static X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

/// Echoes the caller's `X-Request-Id` or assigns a fresh one.
pub async fn request_id(req: Request, next: Next) -> Response {
    let incoming = req
        .headers()
        .get(&X_REQUEST_ID)
        .and_then(|h| h.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string);

    let method = req.method().clone();
    let path = req.uri().path().to_string();

    let mut res = next.run(req).await;

    let id = incoming.unwrap_or_else(generate_id);
    if let Ok(v) = HeaderValue::from_str(&id) {
        res.headers_mut().insert(X_REQUEST_ID.clone(), v);
    }
    debug!(request_id = %id, %method, %path, status = %res.status(), "request completed");
    res
}

fn generate_id() -> String {
    let now = Utc::now();
    let nanos = now
        .timestamp_nanos_opt()
        .unwrap_or_else(|| now.timestamp_micros() * 1000);
    format!("req-{nanos}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_ids_are_valid_header_values() {
        let id = generate_id();
        assert!(id.starts_with("req-"));
        assert!(HeaderValue::from_str(&id).is_ok());
    }
}
