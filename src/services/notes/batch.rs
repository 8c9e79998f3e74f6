use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{NoteService, ensure_subject_exists, error_response};
use crate::config::AppConfig;
use crate::grading::{GradeEngine, StudentScoreUpdate};
use crate::models::notes::requests::BatchUpdateNotesRequest;
use crate::models::notes::responses::BatchUpdateNotesResponse;
use crate::models::{ApiResponse, ErrorCode};

pub async fn batch_update_notes(
    service: &NoteService,
    request: &HttpRequest,
    batch: BatchUpdateNotesRequest,
) -> ActixResult<HttpResponse> {
    if batch.matiere_id <= 0 {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::BadRequest,
            "Valid subject ID is required",
        )));
    }

    if batch.notes.is_empty() {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::NoteUpdateEmpty,
            "At least one note update is required",
        )));
    }

    let max_batch_size = AppConfig::get().grading.max_batch_size;
    if batch.notes.len() > max_batch_size {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::BatchTooLarge,
            format!(
                "Too many note updates: {} (maximum {})",
                batch.notes.len(),
                max_batch_size
            ),
        )));
    }

    let storage = service.get_storage(request);
    if let Err(resp) = ensure_subject_exists(&storage, batch.matiere_id).await {
        return Ok(resp);
    }

    let updates: Vec<StudentScoreUpdate> = batch
        .notes
        .iter()
        .map(|note| note.to_student_update())
        .collect();

    let engine = GradeEngine::new(&*storage, &*storage);
    match engine.batch_update(batch.matiere_id, &updates).await {
        Ok(result) => {
            let message = if result.failed() == 0 {
                "Batch update completed successfully".to_string()
            } else {
                format!("Batch update completed with {} error(s)", result.failed())
            };
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                BatchUpdateNotesResponse::from(&result),
                message,
            )))
        }
        Err(e) => Ok(error_response(&e)),
    }
}
