use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::{NoteService, ensure_subject_exists, error_response};
use crate::grading::GradeEngine;
use crate::models::notes::requests::UpdateStudentNoteRequest;
use crate::models::notes::responses::{NoteDto, UpdateStudentNoteResponse};
use crate::models::{ApiResponse, ErrorCode};

pub async fn update_student_note(
    service: &NoteService,
    request: &HttpRequest,
    update: UpdateStudentNoteRequest,
) -> ActixResult<HttpResponse> {
    if update.etudiant_id <= 0 {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::BadRequest,
            "Valid student ID is required",
        )));
    }

    let subject_id = match update.matiere_id {
        Some(id) if id > 0 => id,
        _ => {
            return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
                ErrorCode::BadRequest,
                "Valid subject ID is required",
            )));
        }
    };

    let storage = service.get_storage(request);
    if let Err(resp) = ensure_subject_exists(&storage, subject_id).await {
        return Ok(resp);
    }

    let engine = GradeEngine::new(&*storage, &*storage);
    match engine
        .update_student(subject_id, &update.to_student_update())
        .await
    {
        Ok(record) => {
            info!(
                "Note updated for student {} in subject {}",
                record.student_id, record.subject_id
            );
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                UpdateStudentNoteResponse {
                    note: NoteDto::from(&record),
                },
                "Note updated successfully",
            )))
        }
        Err(e) => Ok(error_response(&e)),
    }
}
