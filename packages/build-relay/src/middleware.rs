//! Request correlation middleware.
//!
//! Push requests arriving through Cloud Run or Cloud Functions carry an
//! `X-Cloud-Trace-Context: TRACE_ID/SPAN_ID;o=OPTIONS` header. Its trace id
//! is used as the correlation id so relay logs line up with the platform's
//! request logs; otherwise an explicit `x-request-id` is honoured, and only
//! then is a fresh id generated.

use axum::extract::Request;
use axum::http::{HeaderMap, HeaderValue};
use axum::middleware::Next;
use axum::response::Response;

const CLOUD_TRACE_HEADER: &str = "x-cloud-trace-context";
const REQUEST_ID_HEADER: &str = "x-request-id";

/// Correlation id for one push request, extractable from `Request::extensions()`.
#[derive(Clone, Debug, Default)]
pub struct RequestId(pub String);

impl RequestId {
    /// Pick the correlation id a request already carries, if any.
    pub fn from_headers(headers: &HeaderMap) -> Option<Self> {
        let header = |name: &str| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::trim)
                .filter(|v| !v.is_empty())
        };

        let trace_id = header(CLOUD_TRACE_HEADER)
            .and_then(|ctx| ctx.split(['/', ';']).next())
            .filter(|id| !id.is_empty() && id.chars().all(|c| c.is_ascii_hexdigit()));

        trace_id
            .or_else(|| header(REQUEST_ID_HEADER))
            .map(|id| RequestId(id.to_string()))
    }

    fn generate() -> Self {
        use rand::Rng;
        RequestId(format!("relay-{:016x}", rand::thread_rng().gen::<u64>()))
    }
}

/// Attach a [`RequestId`] to the request and echo it as `x-request-id`.
pub async fn inject_request_id(mut request: Request, next: Next) -> Response {
    let request_id =
        RequestId::from_headers(request.headers()).unwrap_or_else(RequestId::generate);
    let echoed = HeaderValue::from_str(&request_id.0).ok();

    request.extensions_mut().insert(request_id);
    let mut response = next.run(request).await;

    if let Some(val) = echoed {
        response.headers_mut().insert(REQUEST_ID_HEADER, val);
    }
    response
}
