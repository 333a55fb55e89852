//! Inbound Request Context
//!
//! Axum middleware that makes the caller's address available to every
//! intercepted call made while the request is being handled.

use std::future::Future;
use std::net::SocketAddr;

use axum::{
    body::Body,
    extract::ConnectInfo,
    http::Request,
    middleware::Next,
    response::Response,
};

tokio::task_local! {
    static INBOUND_REQUEST: InboundRequest;
}

/// Transport details of the HTTP request being served on this task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InboundRequest {
    /// Peer socket address; absent when the server was not started with
    /// connect info (e.g. in-process `oneshot` calls).
    pub remote_addr: Option<SocketAddr>,
}

impl InboundRequest {
    pub fn new(remote_addr: Option<SocketAddr>) -> Self {
        Self { remote_addr }
    }

    /// Runs `fut` with this request bound to the current task.
    pub async fn scope<F>(self, fut: F) -> F::Output
    where
        F: Future,
    {
        INBOUND_REQUEST.scope(self, fut).await
    }

    /// Request being served on this task, if any.
    pub fn current() -> Option<InboundRequest> {
        INBOUND_REQUEST.try_with(|req| *req).ok()
    }

    /// IP of the current inbound request's peer, if known.
    pub fn current_remote_ip() -> Option<String> {
        Self::current()
            .and_then(|req| req.remote_addr)
            .map(|addr| addr.ip().to_string())
    }
}

/// Binds the request's peer address for the rest of the middleware stack.
pub async fn capture_inbound_request(request: Request<Body>, next: Next) -> Response {
    let remote_addr = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr);

    InboundRequest::new(remote_addr)
        .scope(next.run(request))
        .await
}
