pub mod batch;
pub mod config;
pub mod export;
pub mod list;
pub mod update;

use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;
use tracing::error;

use crate::errors::NoteSystemError;
use crate::models::notes::requests::{
    BatchUpdateNotesRequest, ExportNotesQuery, GetStudentNotesQuery, UpdateStudentNoteRequest,
};
use crate::models::{ApiResponse, ErrorCode};
use crate::storage::Storage;

pub struct NoteService {
    storage: Option<Arc<dyn Storage>>,
}

impl NoteService {
    pub fn new_lazy() -> Self {
        Self { storage: None }
    }

    pub(crate) fn get_storage(&self, request: &HttpRequest) -> Arc<dyn Storage> {
        if let Some(storage) = &self.storage {
            storage.clone()
        } else {
            request
                .app_data::<actix_web::web::Data<Arc<dyn Storage>>>()
                .expect("Storage not found in app data")
                .get_ref()
                .clone()
        }
    }

    // 获取班级在某科目下的全部成绩及统计
    pub async fn list_student_notes(
        &self,
        request: &HttpRequest,
        query: GetStudentNotesQuery,
    ) -> ActixResult<HttpResponse> {
        list::list_student_notes(self, request, query).await
    }

    // 导出班级成绩
    pub async fn export_notes(
        &self,
        request: &HttpRequest,
        query: ExportNotesQuery,
    ) -> ActixResult<HttpResponse> {
        export::export_notes(self, request, query).await
    }

    // 更新单个学生的成绩
    pub async fn update_student_note(
        &self,
        request: &HttpRequest,
        update: UpdateStudentNoteRequest,
    ) -> ActixResult<HttpResponse> {
        update::update_student_note(self, request, update).await
    }

    // 批量更新成绩
    pub async fn batch_update_notes(
        &self,
        request: &HttpRequest,
        batch: BatchUpdateNotesRequest,
    ) -> ActixResult<HttpResponse> {
        batch::batch_update_notes(self, request, batch).await
    }

    // 获取科目成绩配置
    pub async fn get_note_config(
        &self,
        request: &HttpRequest,
        subject_id: i64,
    ) -> ActixResult<HttpResponse> {
        config::get_note_config(self, request, subject_id).await
    }
}

/// 领域错误到 HTTP 响应的映射
pub(crate) fn error_response(err: &NoteSystemError) -> HttpResponse {
    match err {
        NoteSystemError::ConfigurationNotFound(msg) => HttpResponse::NotFound()
            .json(ApiResponse::error_empty(ErrorCode::NoteConfigNotFound, msg)),
        NoteSystemError::InvalidConfiguration(msg) => HttpResponse::UnprocessableEntity()
            .json(ApiResponse::error_empty(ErrorCode::NoteConfigInvalid, msg)),
        NoteSystemError::InvalidScoreRange(msg) => HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::NoteScoreOutOfRange, msg)),
        NoteSystemError::Validation(msg) => HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::ValidationFailed, msg)),
        NoteSystemError::NotFound(msg) => HttpResponse::NotFound()
            .json(ApiResponse::error_empty(ErrorCode::NotFound, msg)),
        NoteSystemError::StorageFailure(msg) => {
            error!("Storage failure: {}", msg);
            HttpResponse::InternalServerError()
                .json(ApiResponse::error_empty(ErrorCode::StorageFailure, msg))
        }
        other => {
            error!("{}", other);
            HttpResponse::InternalServerError().json(ApiResponse::error_empty(
                ErrorCode::InternalServerError,
                other.format_simple(),
            ))
        }
    }
}

/// 科目不存在或查询失败时返回对应响应
pub(crate) async fn ensure_subject_exists(
    storage: &Arc<dyn Storage>,
    subject_id: i64,
) -> Result<(), HttpResponse> {
    match storage.get_subject_by_id(subject_id).await {
        Ok(Some(_)) => Ok(()),
        Ok(None) => Err(HttpResponse::NotFound().json(ApiResponse::error_empty(
            ErrorCode::SubjectNotFound,
            "Subject not found",
        ))),
        Err(e) => Err(error_response(&e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;

    #[test]
    fn test_error_status_mapping() {
        let cases = [
            (NoteSystemError::configuration_not_found("x"), StatusCode::NOT_FOUND),
            (
                NoteSystemError::invalid_configuration("x"),
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (NoteSystemError::invalid_score_range("x"), StatusCode::BAD_REQUEST),
            (NoteSystemError::not_found("x"), StatusCode::NOT_FOUND),
            (
                NoteSystemError::storage_failure("x"),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                NoteSystemError::database_connection("x"),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, status) in cases {
            assert_eq!(error_response(&err).status(), status, "{err}");
        }
    }
}
