use actix_web::{
    dev::ServiceResponse,
    http::header::CONTENT_TYPE,
    middleware::{ErrorHandlerResponse, ErrorHandlers},
    ResponseError, Result,
};

use crate::api::error::ApiError;

/// Replaces any 500 that did not come from an [`ApiError`] with the generic
/// JSON envelope, so internal details never reach the caller.
pub fn unhandled_errors<B: 'static>() -> ErrorHandlers<B> {
    ErrorHandlers::new().default_handler_server(render_unhandled)
}

fn render_unhandled<B>(res: ServiceResponse<B>) -> Result<ErrorHandlerResponse<B>> {
    let is_json = res
        .response()
        .headers()
        .get(CONTENT_TYPE)
        .map_or(false, |v| v.as_bytes().starts_with(b"application/json"));

    if is_json {
        return Ok(ErrorHandlerResponse::Response(res.map_into_left_body()));
    }

    let (req, _) = res.into_parts();
    let response = ApiError::Internal.error_response();
    Ok(ErrorHandlerResponse::Response(
        ServiceResponse::new(req, response).map_into_right_body(),
    ))
}
