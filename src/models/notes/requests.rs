use serde::Deserialize;
use ts_rs::TS;

use crate::grading::{FieldUpdate, ScoreUpdate, StudentScoreUpdate};

// 字段存在即 Some，显式 null 得到 Some(None)，省略由 `default` 得到 None
mod three_state {
    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
    where
        T: Deserialize<'de>,
        D: Deserializer<'de>,
    {
        Option::<T>::deserialize(deserializer).map(Some)
    }
}

#[derive(Debug, Clone, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "notes.ts")]
pub struct GetStudentNotesQuery {
    pub matiere_id: i64,
    pub classe_id: i64,
}

// 导出班级成绩，目前只支持 csv
#[derive(Debug, Clone, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "notes.ts")]
pub struct ExportNotesQuery {
    pub matiere_id: i64,
    pub classe_id: i64,
    #[serde(default)]
    #[ts(optional)]
    pub format: Option<String>,
}

impl ExportNotesQuery {
    pub fn format(&self) -> &str {
        self.format.as_deref().unwrap_or("csv")
    }
}

// 单个学生的成绩更新
//
// 三个分项均为三态：省略表示不修改，null 表示清空，数值表示设置。
// 在批量请求中 `matiereId` 以外层为准，条目内的值会被忽略。
#[derive(Debug, Clone, Default, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "notes.ts")]
pub struct UpdateStudentNoteRequest {
    pub etudiant_id: i64,
    #[serde(default)]
    #[ts(optional)]
    pub matiere_id: Option<i64>,
    #[serde(rename = "noteCC", default, with = "three_state")]
    #[ts(optional, type = "number | null")]
    pub note_cc: Option<Option<f64>>,
    #[serde(rename = "noteTP", default, with = "three_state")]
    #[ts(optional, type = "number | null")]
    pub note_tp: Option<Option<f64>>,
    #[serde(rename = "noteDV", default, with = "three_state")]
    #[ts(optional, type = "number | null")]
    pub note_dv: Option<Option<f64>>,
}

impl UpdateStudentNoteRequest {
    pub fn score_update(&self) -> ScoreUpdate {
        ScoreUpdate {
            cc: FieldUpdate::from_request(self.note_cc),
            tp: FieldUpdate::from_request(self.note_tp),
            dv: FieldUpdate::from_request(self.note_dv),
        }
    }

    pub fn to_student_update(&self) -> StudentScoreUpdate {
        StudentScoreUpdate {
            student_id: self.etudiant_id,
            scores: self.score_update(),
        }
    }
}

// 批量更新某科目的成绩
#[derive(Debug, Clone, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "notes.ts")]
pub struct BatchUpdateNotesRequest {
    pub matiere_id: i64,
    pub notes: Vec<UpdateStudentNoteRequest>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_three_state_fields() {
        let req: UpdateStudentNoteRequest = serde_json::from_str(
            r#"{"etudiantId": 12, "matiereId": 3, "noteCC": 14.5, "noteTP": null}"#,
        )
        .unwrap();

        assert_eq!(req.etudiant_id, 12);
        assert_eq!(req.matiere_id, Some(3));
        assert_eq!(req.note_cc, Some(Some(14.5)));
        assert_eq!(req.note_tp, Some(None));
        assert_eq!(req.note_dv, None);

        let update = req.score_update();
        assert_eq!(update.cc, FieldUpdate::Set(14.5));
        assert_eq!(update.tp, FieldUpdate::Clear);
        assert_eq!(update.dv, FieldUpdate::Unchanged);
    }

    #[test]
    fn test_batch_items_without_subject() {
        let req: BatchUpdateNotesRequest = serde_json::from_str(
            r#"{"matiereId": 7, "notes": [{"etudiantId": 1, "noteDV": 11}, {"etudiantId": 2}]}"#,
        )
        .unwrap();

        assert_eq!(req.matiere_id, 7);
        assert_eq!(req.notes.len(), 2);
        assert_eq!(req.notes[0].matiere_id, None);

        let second = req.notes[1].to_student_update();
        assert_eq!(second.student_id, 2);
        assert_eq!(second.scores, ScoreUpdate::default());
    }

    #[test]
    fn test_score_fields_exported_as_optional_nullable() {
        let decl = UpdateStudentNoteRequest::decl();
        assert!(decl.contains("noteCC?: number | null"), "{decl}");
        assert!(decl.contains("noteTP?: number | null"), "{decl}");
        assert!(decl.contains("noteDV?: number | null"), "{decl}");
    }

    #[test]
    fn test_export_format_defaults_to_csv() {
        let query: ExportNotesQuery =
            serde_json::from_str(r#"{"matiereId": 5, "classeId": 9}"#).unwrap();
        assert_eq!(query.format(), "csv");

        let query: ExportNotesQuery =
            serde_json::from_str(r#"{"matiereId": 5, "classeId": 9, "format": "xlsx"}"#).unwrap();
        assert_eq!(query.format(), "xlsx");
    }

    #[test]
    fn test_query_uses_camel_case() {
        let query: GetStudentNotesQuery =
            serde_json::from_str(r#"{"matiereId": 5, "classeId": 9}"#).unwrap();
        assert_eq!(query.matiere_id, 5);
        assert_eq!(query.classe_id, 9);
    }
}
