use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{NoteService, ensure_subject_exists, error_response};
use crate::grading::GradeConfigResolver;
use crate::models::notes::responses::NoteConfigDto;
use crate::models::{ApiResponse, ErrorCode};

pub async fn get_note_config(
    service: &NoteService,
    request: &HttpRequest,
    subject_id: i64,
) -> ActixResult<HttpResponse> {
    if subject_id <= 0 {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::BadRequest,
            "Valid subject ID is required",
        )));
    }

    let storage = service.get_storage(request);
    if let Err(resp) = ensure_subject_exists(&storage, subject_id).await {
        return Ok(resp);
    }

    match GradeConfigResolver::new(&*storage)
        .resolve_with_source(subject_id)
        .await
    {
        Ok((stored, config)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            NoteConfigDto::new(&stored, &config),
            "Note configuration retrieved successfully",
        ))),
        Err(e) => Ok(error_response(&e)),
    }
}
