use axum::{extract::Request, http::header, middleware::Next, response::IntoResponse};

/// Policy for rendered pages: local scripts and styles, the icon CDN, and
/// remote `https:` images (disease illustrations are hot-linked).
pub const PAGE_CONTENT_SECURITY_POLICY: &str = "default-src 'self'; \
     script-src 'self' 'unsafe-inline'; \
     style-src 'self' 'unsafe-inline' https://cdnjs.cloudflare.com; \
     font-src 'self' https://cdnjs.cloudflare.com; \
     img-src 'self' https: data:; \
     connect-src 'self'; \
     frame-ancestors 'none'";

/// Policy for JSON endpoints: nothing may be loaded from a response.
pub const API_CONTENT_SECURITY_POLICY: &str = "default-src 'none'; frame-ancestors 'none'";

pub async fn security_headers_middleware(req: Request, next: Next) -> impl IntoResponse {
    let is_api_route = req.uri().path().starts_with("/api/");

    let mut response = next.run(req).await;
    let headers = response.headers_mut();

    headers.insert(
        header::X_CONTENT_TYPE_OPTIONS,
        header::HeaderValue::from_static("nosniff"),
    );
    headers.insert(
        header::X_FRAME_OPTIONS,
        header::HeaderValue::from_static("DENY"),
    );
    headers.insert(
        header::STRICT_TRANSPORT_SECURITY,
        header::HeaderValue::from_static("max-age=31536000; includeSubDomains"),
    );
    headers.insert(
        header::REFERRER_POLICY,
        header::HeaderValue::from_static("same-origin"),
    );

    let policy = if is_api_route {
        API_CONTENT_SECURITY_POLICY
    } else {
        PAGE_CONTENT_SECURITY_POLICY
    };
    headers.insert(
        header::CONTENT_SECURITY_POLICY,
        header::HeaderValue::from_static(policy),
    );

    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Router, body::Body, middleware::from_fn, routing::get};
    use tower::ServiceExt;

    async fn csp_for(uri: &str) -> String {
        let app = Router::new()
            .route("/", get(|| async { "page" }))
            .route("/api/chat", get(|| async { "{}" }))
            .layer(from_fn(security_headers_middleware));

        let response = app
            .oneshot(axum::http::Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();

        response.headers()[header::CONTENT_SECURITY_POLICY]
            .to_str()
            .unwrap()
            .to_string()
    }

    #[tokio::test]
    async fn pages_allow_remote_images() {
        assert!(csp_for("/").await.contains("img-src 'self' https: data:"));
    }

    #[tokio::test]
    async fn api_routes_get_strict_policy() {
        assert_eq!(csp_for("/api/chat").await, API_CONTENT_SECURITY_POLICY);
    }
}
