//! Security response headers with config-driven defaults.

use axum::extract::{Request, State};
use axum::http::{HeaderName, HeaderValue, header};
use axum::middleware::Next;
use axum::response::Response;

use keystone_core::config::app::SecurityHeadersConfig;

use crate::state::AppState;

const PERMISSIONS_POLICY: HeaderName = HeaderName::from_static("permissions-policy");

/// Attach security headers to every response, without overwriting headers
/// a handler already set.
pub async fn security_headers(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let config = state.config.server.security.clone();
    let mut response = next.run(request).await;
    if !config.enabled {
        return response;
    }
    apply(&config, &mut response);
    response
}

fn apply(config: &SecurityHeadersConfig, response: &mut Response) {
    let headers = response.headers_mut();

    if config.hsts_enabled && !headers.contains_key(header::STRICT_TRANSPORT_SECURITY) {
        let value = format!(
            "max-age={}; includeSubDomains; preload",
            config.hsts_max_age_seconds
        );
        if let Ok(value) = HeaderValue::from_str(&value) {
            headers.insert(header::STRICT_TRANSPORT_SECURITY, value);
        }
    }

    if !headers.contains_key(header::X_CONTENT_TYPE_OPTIONS) {
        headers.insert(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        );
    }

    if config.frame_deny && !headers.contains_key(header::X_FRAME_OPTIONS) {
        headers.insert(header::X_FRAME_OPTIONS, HeaderValue::from_static("DENY"));
    }

    if !headers.contains_key(header::REFERRER_POLICY) {
        if let Ok(value) = HeaderValue::from_str(&config.referrer_policy) {
            headers.insert(header::REFERRER_POLICY, value);
        }
    }

    if !headers.contains_key(&PERMISSIONS_POLICY) {
        if let Ok(value) = HeaderValue::from_str(&config.permissions_policy) {
            headers.insert(&PERMISSIONS_POLICY, value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use axum::response::IntoResponse;

    #[test]
    fn defaults_set_all_headers() {
        let config = SecurityHeadersConfig::default();
        let mut response = StatusCode::OK.into_response();
        apply(&config, &mut response);
        let headers = response.headers();
        assert_eq!(
            headers[header::STRICT_TRANSPORT_SECURITY],
            "max-age=63072000; includeSubDomains; preload"
        );
        assert_eq!(headers[header::X_CONTENT_TYPE_OPTIONS], "nosniff");
        assert_eq!(headers[header::X_FRAME_OPTIONS], "DENY");
        assert_eq!(headers[header::REFERRER_POLICY], "no-referrer");
        assert_eq!(
            headers[&PERMISSIONS_POLICY],
            "geolocation=(), microphone=(), camera=()"
        );
    }

    #[test]
    fn existing_headers_are_not_overwritten() {
        let config = SecurityHeadersConfig::default();
        let mut response = StatusCode::OK.into_response();
        response.headers_mut().insert(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("SAMEORIGIN"),
        );
        apply(&config, &mut response);
        assert_eq!(response.headers()[header::X_FRAME_OPTIONS], "SAMEORIGIN");
    }

    #[test]
    fn hsts_can_be_disabled() {
        let config = SecurityHeadersConfig {
            hsts_enabled: false,
            ..SecurityHeadersConfig::default()
        };
        let mut response = StatusCode::OK.into_response();
        apply(&config, &mut response);
        assert!(
            !response
                .headers()
                .contains_key(header::STRICT_TRANSPORT_SECURITY)
        );
    }
}
