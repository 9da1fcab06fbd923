use axum::{
    extract::Request,
    http::{HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

pub async fn set_request_id(mut request: Request, next: Next) -> Response {
    let header_name = HeaderName::from_static("x-request-id");
    let request_id = Uuid::new_v4().to_string();

    if let Ok(value) = HeaderValue::from_str(&request_id) {
        request
            .headers_mut()
            .insert(header_name.clone(), value.clone());
        let mut response = next.run(request).await;
        response.headers_mut().insert(header_name, value);
        return response;
    }

    next.run(request).await
}
