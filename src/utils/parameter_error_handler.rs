//! 请求参数解析失败时统一返回 ApiResponse 格式的 400

use actix_web::error::{InternalError, JsonPayloadError, PathError, QueryPayloadError};
use actix_web::{Error, HttpRequest, HttpResponse};
use tracing::debug;

use crate::models::{ApiResponse, ErrorCode};

fn bad_request(message: String) -> Error {
    debug!("Rejected request parameters: {}", message);
    let response =
        HttpResponse::BadRequest().json(ApiResponse::error_empty(ErrorCode::BadRequest, &message));
    InternalError::from_response(message, response).into()
}

pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> Error {
    bad_request(format!("Invalid JSON body: {err}"))
}

pub fn query_error_handler(err: QueryPayloadError, _req: &HttpRequest) -> Error {
    bad_request(format!("Invalid query parameters: {err}"))
}

pub fn path_error_handler(err: PathError, _req: &HttpRequest) -> Error {
    bad_request(format!("Invalid path parameters: {err}"))
}
