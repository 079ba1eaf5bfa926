//! Metrics middleware - tracks HTTP request metrics

use axum::{extract::Request, middleware::Next, response::Response};
use std::time::Instant;

use crate::metrics::{
    sanitize_path, HTTP_REQUESTS_IN_FLIGHT, HTTP_REQUESTS_TOTAL, HTTP_REQUEST_DURATION_SECONDS,
    HTTP_RESPONSE_SIZE_BYTES,
};

pub async fn metrics_middleware(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = req.method().to_string();
    let path = sanitize_path(req.uri().path());

    let in_flight = HTTP_REQUESTS_IN_FLIGHT.with_label_values(&[&method, &path]);
    in_flight.inc();

    let response = next.run(req).await;

    let status = response.status().as_u16().to_string();
    HTTP_REQUESTS_TOTAL
        .with_label_values(&[&method, &path, &status])
        .inc();
    HTTP_REQUEST_DURATION_SECONDS
        .with_label_values(&[&method, &path])
        .observe(start.elapsed().as_secs_f64());

    if let Some(content_length) = response
        .headers()
        .get("content-length")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<f64>().ok())
    {
        HTTP_RESPONSE_SIZE_BYTES
            .with_label_values(&[&method, &path, &status])
            .observe(content_length);
    }

    in_flight.dec();
    response
}
