use axum::{
    http::header,
    response::{IntoResponse, Response},
};

use crate::error::ApiError;

/// Gives error responses built outside our handlers (unmatched methods,
/// request timeouts) the same JSON body as `ApiError`.
pub async fn json_error_body(response: Response) -> Response {
    let status = response.status();
    if !(status.is_client_error() || status.is_server_error())
        || response.headers().contains_key(header::CONTENT_TYPE)
    {
        return response;
    }

    let mut rewritten = ApiError::from_status(status).into_response();
    for (name, value) in response.headers() {
        if name != header::CONTENT_LENGTH {
            rewritten.headers_mut().append(name.clone(), value.clone());
        }
    }
    rewritten
}
