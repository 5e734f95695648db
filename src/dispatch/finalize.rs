//! Response finalization.
//!
//! # Responsibilities
//! - Replace malformed responses with an InternalServerError
//! - Merge computed headers (content type, cache control, CORS)
//! - Let headers the handler set win over computed ones
//!
//! # Design Decisions
//! - Error responses are never cacheable: TTL is forced to 0
//! - Header collisions are resolved case-insensitively

use crate::http::{
    Event, HeaderMap, Response, CACHE_CONTROL, CONTENT_TYPE, INVALID_RESPONSE_DETAIL,
    JSON_CONTENT_TYPE,
};
use crate::security::CorsPolicy;

/// Normalize a handler or middleware response before it leaves the router.
///
/// `event` is `None` only when the inbound event could not be normalized;
/// such responses carry no CORS headers.
pub fn finalize(
    response: Response,
    cache_ttl: u32,
    cors: &CorsPolicy,
    event: Option<&Event>,
) -> Response {
    let mut response = if response.validate() {
        response
    } else {
        tracing::warn!(
            status = response.status_code,
            description = %response.status_description,
            "Discarding invalid response"
        );
        Response::internal_server_error(INVALID_RESPONSE_DETAIL)
    };

    let ttl = if response.is_error() { 0 } else { cache_ttl };

    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE.to_string(), vec![JSON_CONTENT_TYPE.to_string()]);
    headers.insert(CACHE_CONTROL.to_string(), vec![format!("max-age={}", ttl)]);
    if let Some(event) = event {
        headers.extend(cors.headers_for(event.origin(), event.inbound()));
    }

    if let Some(own) = response.multi_value_headers.take() {
        for (name, values) in own {
            headers.retain(|existing, _| !existing.eq_ignore_ascii_case(&name));
            headers.insert(name, values);
        }
    }

    response.multi_value_headers = Some(headers);
    response
}
