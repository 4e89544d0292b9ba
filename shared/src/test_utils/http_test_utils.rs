use axum::body::Body;
use http::{Request, Response};
use http_body_util::BodyExt;

/// Builds a JSON POST request, optionally stamped with an `x-forwarded-for` address
pub fn create_rsvp_request(uri: &str, forwarded_for: Option<&str>, body: impl Into<String>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header("Content-Type", "application/json");
    if let Some(ip) = forwarded_for {
        builder = builder.header("x-forwarded-for", ip);
    }
    builder.body(Body::from(body.into())).unwrap()
}

/// Collects a response body and parses it as JSON
pub async fn response_to_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
