use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use std::sync::Arc;
use tracing::info;

use super::{NoteService, error_response};
use crate::grading::{
    GradeConfigResolver, GradeConfiguration, GradeEngine, GradeRecord, compute_class_statistics,
};
use crate::models::notes::entities::{Class, NoteConfig, Student, Subject};
use crate::models::notes::requests::GetStudentNotesQuery;
use crate::models::notes::responses::{
    GetStudentNotesResponse, NoteConfigDto, NotesStatisticsDto, StudentNoteDto,
    SubjectWithConfigDto,
};
use crate::models::{ApiResponse, ErrorCode};
use crate::storage::Storage;

/// 某科目下一个班级的完整成绩视图
pub(crate) struct ClassNotes {
    pub subject: Subject,
    pub class: Class,
    pub stored_config: NoteConfig,
    pub config: GradeConfiguration,
    pub roster: Vec<(Student, GradeRecord)>,
}

/// 校验 ID，查找科目、班级与配置，并读取一次班级名单及成绩
pub(crate) async fn load_class_notes(
    storage: &Arc<dyn Storage>,
    subject_id: i64,
    class_id: i64,
) -> Result<ClassNotes, HttpResponse> {
    if subject_id <= 0 {
        return Err(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::BadRequest,
            "Valid subject ID is required",
        )));
    }
    if class_id <= 0 {
        return Err(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::BadRequest,
            "Valid class ID is required",
        )));
    }

    let subject = match storage.get_subject_by_id(subject_id).await {
        Ok(Some(subject)) => subject,
        Ok(None) => {
            return Err(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::SubjectNotFound,
                "Subject not found",
            )));
        }
        Err(e) => return Err(error_response(&e)),
    };

    let class = match storage.get_class_by_id(class_id).await {
        Ok(Some(class)) => class,
        Ok(None) => {
            return Err(HttpResponse::NotFound().json(ApiResponse::error_empty(
                ErrorCode::ClassNotFound,
                "Class not found",
            )));
        }
        Err(e) => return Err(error_response(&e)),
    };

    let (stored_config, config) = GradeConfigResolver::new(&**storage)
        .resolve_with_source(subject.id)
        .await
        .map_err(|e| error_response(&e))?;

    let roster = GradeEngine::new(&**storage, &**storage)
        .class_roster(&config, class.id)
        .await
        .map_err(|e| error_response(&e))?;

    Ok(ClassNotes {
        subject,
        class,
        stored_config,
        config,
        roster,
    })
}

pub async fn list_student_notes(
    service: &NoteService,
    request: &HttpRequest,
    query: GetStudentNotesQuery,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let notes = match load_class_notes(&storage, query.matiere_id, query.classe_id).await {
        Ok(notes) => notes,
        Err(resp) => return Ok(resp),
    };

    let records: Vec<GradeRecord> = notes.roster.iter().map(|(_, record)| *record).collect();
    let statistics = compute_class_statistics(&records);

    let students: Vec<StudentNoteDto> = notes
        .roster
        .into_iter()
        .map(|(student, record)| StudentNoteDto::new(student, Some(&record)))
        .collect();

    info!(
        "Listed {} students for subject {} in class {}",
        students.len(),
        notes.subject.id,
        notes.class.id
    );

    let response = GetStudentNotesResponse {
        subject: SubjectWithConfigDto::new(
            notes.subject,
            NoteConfigDto::new(&notes.stored_config, &notes.config),
        ),
        class_name: notes.class.full_identifier(),
        students,
        statistics: NotesStatisticsDto::from(&statistics),
    };

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        response,
        "Student notes retrieved successfully",
    )))
}
