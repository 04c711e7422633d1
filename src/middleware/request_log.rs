//! Request/response logging middleware.
//!
//! Logs every request with a random hex identifier so the request line
//! and the completion line can be correlated in the log stream. Mounted
//! in production, or anywhere via the LOGGER_MIDDLEWARE flag.

use std::net::SocketAddr;
use std::time::Instant;

use axum::{
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::Response,
};
use rand::Rng;

use crate::state::AppState;

/// Request logging middleware function.
///
/// # Log Lines
///
/// One line when the request arrives (client address, method, path,
/// query, headers when LOGGER_MIDDLEWARE_SHOW_HEADERS is set) and one
/// when the response is ready (status, duration), both carrying the
/// request id and client address.
///
/// The client address comes from the connection info attached by
/// `into_make_service_with_connect_info`; "unknown" when absent (e.g.
/// in tests that call the router directly).
pub async fn request_log_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    // Random 8-byte identifier, hex encoded
    let request_id = format!("{:016x}", rand::rng().random::<u64>());

    let client = client_addr(&request);
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let query = request.uri().query().unwrap_or("<no parameters>").to_string();

    if state.config.logger_middleware_show_headers {
        tracing::info!(
            request_id = %request_id,
            client = %client,
            %method,
            path = %path,
            query = %query,
            headers = ?request.headers(),
            "request received"
        );
    } else {
        tracing::info!(
            request_id = %request_id,
            client = %client,
            %method,
            path = %path,
            query = %query,
            "request received"
        );
    }

    let start = Instant::now();
    let response = next.run(request).await;
    let duration_ms = start.elapsed().as_millis();

    tracing::info!(
        request_id = %request_id,
        client = %client,
        %method,
        path = %path,
        status = %response.status(),
        duration_ms,
        "request completed"
    );

    response
}

/// The peer address for a request, or "unknown" when no connection
/// info is attached.
fn client_addr(request: &Request) -> String {
    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    #[test]
    fn client_addr_reads_connect_info() {
        let mut request = Request::new(Body::empty());
        request
            .extensions_mut()
            .insert(ConnectInfo(SocketAddr::from(([127, 0, 0, 1], 52431))));

        assert_eq!(client_addr(&request), "127.0.0.1:52431");
    }

    #[test]
    fn client_addr_falls_back_to_unknown() {
        let request = Request::new(Body::empty());
        assert_eq!(client_addr(&request), "unknown");
    }
}
