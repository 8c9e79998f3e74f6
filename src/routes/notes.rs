use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::models::notes::requests::{
    BatchUpdateNotesRequest, ExportNotesQuery, GetStudentNotesQuery, UpdateStudentNoteRequest,
};
use crate::services::NoteService;

// 懒加载的全局 NOTE_SERVICE 实例
static NOTE_SERVICE: Lazy<NoteService> = Lazy::new(NoteService::new_lazy);

// HTTP处理程序
pub async fn list_student_notes(
    req: HttpRequest,
    query: web::Query<GetStudentNotesQuery>,
) -> ActixResult<HttpResponse> {
    NOTE_SERVICE
        .list_student_notes(&req, query.into_inner())
        .await
}

pub async fn export_notes(
    req: HttpRequest,
    query: web::Query<ExportNotesQuery>,
) -> ActixResult<HttpResponse> {
    NOTE_SERVICE.export_notes(&req, query.into_inner()).await
}

pub async fn update_student_note(
    req: HttpRequest,
    update: web::Json<UpdateStudentNoteRequest>,
) -> ActixResult<HttpResponse> {
    NOTE_SERVICE
        .update_student_note(&req, update.into_inner())
        .await
}

pub async fn batch_update_notes(
    req: HttpRequest,
    batch: web::Json<BatchUpdateNotesRequest>,
) -> ActixResult<HttpResponse> {
    NOTE_SERVICE
        .batch_update_notes(&req, batch.into_inner())
        .await
}

pub async fn get_note_config(
    req: HttpRequest,
    matiere_id: web::Path<i64>,
) -> ActixResult<HttpResponse> {
    NOTE_SERVICE
        .get_note_config(&req, matiere_id.into_inner())
        .await
}

// 配置路由
pub fn configure_notes_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1/notes")
            .route("/students", web::get().to(list_student_notes))
            .route("/export", web::get().to(export_notes))
            .route("/update", web::put().to(update_student_note))
            .route("/batch", web::post().to(batch_update_notes))
            .route("/config/{matiere_id}", web::get().to(get_note_config)),
    );
}
