//! Correlation middleware.
//!
//! # Responsibilities
//! - Snapshot headers, query and url-encoded form fields into a [`RequestContext`]
//! - Assign a fresh id when no source carries one
//! - Run the handler with the context installed as the task-local source
//! - Echo the id in the configured response header
//!
//! # Design Decisions
//! - Only `application/x-www-form-urlencoded` bodies are buffered; the body is
//!   handed back to the handler unchanged
//! - Work spawned onto other tasks does not inherit the context

use std::sync::Arc;

use axum::{
    body::{Body, Bytes},
    extract::State,
    http::{header, HeaderMap, HeaderName, HeaderValue, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use http_body_util::{BodyExt, LengthLimitError, Limited};

use crate::config::AppConfig;
use crate::correlation::{CorrelationId, CorrelationResolver, CorrelationSource, TaskLocalContext};
use crate::http::context::RequestContext;

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Settings shared by every invocation of the middleware.
#[derive(Debug, Clone)]
pub struct CorrelationState {
    pub resolver: CorrelationResolver,
    pub response_header: HeaderName,
    pub max_form_bytes: usize,
}

impl CorrelationState {
    pub fn from_config(config: &AppConfig) -> Result<Self, axum::http::header::InvalidHeaderName> {
        Ok(Self {
            resolver: CorrelationResolver::new(config.correlation.sources.clone()),
            response_header: HeaderName::from_bytes(config.correlation.response_header.as_bytes())?,
            max_form_bytes: config.server.max_form_bytes,
        })
    }
}

pub async fn correlation_middleware(
    State(state): State<Arc<CorrelationState>>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let (parts, body) = req.into_parts();

    let (form, body) = if is_form(&parts.headers) {
        match read_form(body, state.max_form_bytes).await {
            Ok(bytes) => (Some(bytes.clone()), Body::from(bytes)),
            Err(rejection) => return rejection.into_response(),
        }
    } else {
        (None, body)
    };

    let context = Arc::new(RequestContext::new(
        parts.headers.clone(),
        parts.uri.query(),
        form.as_deref(),
    ));

    let mut correlation_id = state.resolver.resolve(context.as_ref());
    if correlation_id.is_empty() {
        correlation_id = CorrelationId::new_v4();
        tracing::debug!(correlation_id = %correlation_id, path = %parts.uri.path(), "Assigned correlation id");
    }
    if let Ok(value) = HeaderValue::from_str(&correlation_id.to_string()) {
        context.set_response_header(state.response_header.clone(), value);
    }

    let mut req = Request::from_parts(parts, body);
    req.extensions_mut().insert(context.clone());

    let source: Arc<dyn CorrelationSource> = context.clone();
    let mut response = TaskLocalContext::scope(source, next.run(req)).await;

    for (name, value) in context.response_headers().iter() {
        if !response.headers().contains_key(name) {
            response.headers_mut().insert(name.clone(), value.clone());
        }
    }

    response
}

/// Buffer a form body of at most `limit` bytes.
///
/// Exceeding the limit is a 413; any other read failure is a 400.
async fn read_form(body: Body, limit: usize) -> Result<Bytes, (StatusCode, &'static str)> {
    match Limited::new(body, limit).collect().await {
        Ok(collected) => Ok(collected.to_bytes()),
        Err(e) if e.is::<LengthLimitError>() => {
            tracing::warn!(limit, "Form body exceeds limit");
            Err((StatusCode::PAYLOAD_TOO_LARGE, "Form body too large"))
        }
        Err(e) => {
            tracing::warn!(error = %e, "Form body could not be read");
            Err((StatusCode::BAD_REQUEST, "Form body could not be read"))
        }
    }
}

fn is_form(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.trim_start().to_ascii_lowercase().starts_with(FORM_CONTENT_TYPE))
        .unwrap_or(false)
}
