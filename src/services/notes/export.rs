//! 班级成绩导出（CSV）

use actix_web::http::header;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use chrono::NaiveDate;
use tracing::info;

use super::list::load_class_notes;
use super::{NoteService, error_response};
use crate::errors::{NoteSystemError, Result};
use crate::grading::final_grade::PASS_THRESHOLD;
use crate::grading::{GradeRecord, round_half_up};
use crate::models::notes::entities::Student;
use crate::models::notes::requests::ExportNotesQuery;
use crate::models::{ApiResponse, ErrorCode};

// 导出表中的成绩状态
fn export_status(final_grade: Option<f64>) -> &'static str {
    match final_grade {
        None => "Non noté",
        Some(grade) if grade >= 16.0 => "Excellent",
        Some(grade) if grade >= 12.0 => "Bien",
        Some(grade) if grade >= PASS_THRESHOLD => "Passable",
        Some(_) => "Insuffisant",
    }
}

fn score_cell(score: Option<f64>) -> String {
    score.map(|v| v.to_string()).unwrap_or_default()
}

/// 班级名单渲染为 CSV，未启用 TP 时不输出 TP 列
pub(crate) fn render_notes_csv(
    has_tp_component: bool,
    roster: &[(Student, GradeRecord)],
) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    let mut header = vec!["Prénom", "Nom", "Numéro étudiant", "Email", "Note CC"];
    if has_tp_component {
        header.push("Note TP");
    }
    header.extend(["Note DV", "Note Finale", "Statut"]);
    writer.write_record(&header)?;

    for (student, record) in roster {
        let final_grade = record.derived.final_grade.map(|g| round_half_up(g, 2));

        let mut row = vec![
            student.first_name.clone(),
            student.last_name.clone(),
            student.student_number.clone(),
            student.email.clone(),
            score_cell(record.scores.cc),
        ];
        if has_tp_component {
            row.push(score_cell(record.scores.tp));
        }
        row.push(score_cell(record.scores.dv));
        row.push(score_cell(final_grade));
        row.push(export_status(final_grade).to_string());
        writer.write_record(&row)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| NoteSystemError::serialization(format!("CSV flush failed: {e}")))?;
    String::from_utf8(bytes)
        .map_err(|e| NoteSystemError::serialization(format!("CSV is not valid UTF-8: {e}")))
}

// 文件名只保留 ASCII 字母数字、'-' 与 '_'
fn export_filename(subject_name: &str, class_name: &str, date: NaiveDate) -> String {
    let clean = |s: &str| -> String {
        s.chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                    c
                } else {
                    '_'
                }
            })
            .collect()
    };
    format!(
        "notes_{}_{}_{}.csv",
        clean(subject_name),
        clean(class_name),
        date.format("%Y-%m-%d")
    )
}

pub async fn export_notes(
    service: &NoteService,
    request: &HttpRequest,
    query: ExportNotesQuery,
) -> ActixResult<HttpResponse> {
    if !query.format().eq_ignore_ascii_case("csv") {
        return Ok(HttpResponse::BadRequest().json(ApiResponse::error_empty(
            ErrorCode::BadRequest,
            format!("Unsupported export format: {}", query.format()),
        )));
    }

    let storage = service.get_storage(request);
    let notes = match load_class_notes(&storage, query.matiere_id, query.classe_id).await {
        Ok(notes) => notes,
        Err(resp) => return Ok(resp),
    };

    let body = match render_notes_csv(notes.config.has_tp_component(), &notes.roster) {
        Ok(body) => body,
        Err(e) => return Ok(error_response(&e)),
    };

    let filename = export_filename(
        &notes.subject.name,
        &notes.class.full_identifier(),
        chrono::Utc::now().date_naive(),
    );
    info!(
        "Exported {} students for subject {} in class {}",
        notes.roster.len(),
        notes.subject.id,
        notes.class.id
    );

    Ok(HttpResponse::Ok()
        .content_type("text/csv; charset=utf-8")
        .insert_header((
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{filename}\""),
        ))
        .insert_header((header::CACHE_CONTROL, "no-cache"))
        .body(body))
}
