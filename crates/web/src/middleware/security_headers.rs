//! Security headers middleware for XSS, clickjacking, and isolation protection.
//!
//! Adds restrictive security headers to all responses. Pages only load
//! same-origin scripts, styles and images; the chat widget talks to
//! `/api/chat` on the same origin.

use axum::{
    extract::{Request, State},
    http::{
        HeaderMap, HeaderName, HeaderValue,
        header::{
            CACHE_CONTROL, CONTENT_SECURITY_POLICY, REFERRER_POLICY, STRICT_TRANSPORT_SECURITY,
            X_CONTENT_TYPE_OPTIONS, X_FRAME_OPTIONS,
        },
    },
    middleware::Next,
    response::Response,
};

use crate::state::AppState;

/// Content Security Policy shared by every page.
const CSP: &str = "default-src 'none'; \
     script-src 'self'; \
     style-src 'self'; \
     font-src 'self'; \
     img-src 'self' data:; \
     connect-src 'self'; \
     frame-src 'none'; \
     object-src 'none'; \
     base-uri 'self'; \
     form-action 'self'; \
     frame-ancestors 'none'";

/// Extra directive for deployments served over HTTPS.
const CSP_UPGRADE: &str = "; upgrade-insecure-requests";

/// Features the app never uses.
const PERMISSIONS_POLICY: &str = "accelerometer=(), \
     camera=(), \
     display-capture=(), \
     geolocation=(), \
     gyroscope=(), \
     microphone=(), \
     payment=(), \
     usb=()";

/// Add security headers to all responses.
///
/// HSTS and `upgrade-insecure-requests` are only sent when the public base
/// URL is HTTPS, so local HTTP development keeps working.
pub async fn security_headers_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let mut response = next.run(request).await;
    apply_security_headers(response.headers_mut(), state.config().is_secure());
    response
}

fn apply_security_headers(headers: &mut HeaderMap, secure: bool) {
    headers.insert(X_FRAME_OPTIONS, HeaderValue::from_static("DENY"));
    headers.insert(X_CONTENT_TYPE_OPTIONS, HeaderValue::from_static("nosniff"));
    headers.insert(REFERRER_POLICY, HeaderValue::from_static("same-origin"));

    let csp = if secure {
        HeaderValue::from_str(&format!("{CSP}{CSP_UPGRADE}"))
    } else {
        HeaderValue::from_str(CSP)
    };
    if let Ok(value) = csp {
        headers.insert(CONTENT_SECURITY_POLICY, value);
    }

    headers.insert(
        HeaderName::from_static("permissions-policy"),
        HeaderValue::from_static(PERMISSIONS_POLICY),
    );

    // Pages carry per-session cart and wallet data; static files set their own
    if !headers.contains_key(CACHE_CONTROL) {
        headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-store, max-age=0"));
    }

    headers.insert(
        HeaderName::from_static("cross-origin-opener-policy"),
        HeaderValue::from_static("same-origin"),
    );
    headers.insert(
        HeaderName::from_static("cross-origin-resource-policy"),
        HeaderValue::from_static("same-origin"),
    );

    if secure {
        headers.insert(
            STRICT_TRANSPORT_SECURITY,
            HeaderValue::from_static("max-age=63072000; includeSubDomains"),
        );
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_http_headers() {
        let mut headers = HeaderMap::new();
        apply_security_headers(&mut headers, false);

        assert_eq!(headers.get(X_FRAME_OPTIONS).unwrap(), "DENY");
        let csp = headers.get(CONTENT_SECURITY_POLICY).unwrap().to_str().unwrap();
        assert!(csp.contains("frame-ancestors 'none'"));
        assert!(!csp.contains("upgrade-insecure-requests"));
        assert!(headers.get(STRICT_TRANSPORT_SECURITY).is_none());
    }

    #[test]
    fn test_https_headers() {
        let mut headers = HeaderMap::new();
        apply_security_headers(&mut headers, true);

        let csp = headers.get(CONTENT_SECURITY_POLICY).unwrap().to_str().unwrap();
        assert!(csp.ends_with("upgrade-insecure-requests"));
        assert!(headers.get(STRICT_TRANSPORT_SECURITY).is_some());
    }

    #[test]
    fn test_existing_cache_control_is_kept() {
        let mut headers = HeaderMap::new();
        headers.insert(CACHE_CONTROL, HeaderValue::from_static("public, max-age=3600"));
        apply_security_headers(&mut headers, false);
        assert_eq!(headers.get(CACHE_CONTROL).unwrap(), "public, max-age=3600");
    }
}
