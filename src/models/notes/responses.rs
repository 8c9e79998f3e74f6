use serde::Serialize;
use ts_rs::TS;

use super::entities::{NoteConfig, Student, Subject};
use crate::grading::{
    BatchResult, ClassStatistics, DominantComponent, GradeConfiguration, GradeRecord, LetterGrade,
    round_half_up,
};

// 学生在某科目下的成绩
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "notes.ts")]
pub struct NoteDto {
    pub etudiant_id: i64,
    pub matiere_id: i64,
    #[serde(rename = "noteCC")]
    pub note_cc: Option<f64>,
    #[serde(rename = "noteTP")]
    pub note_tp: Option<f64>,
    #[serde(rename = "noteDV")]
    pub note_dv: Option<f64>,
    // 保留两位小数
    pub note_finale: Option<f64>,
    pub grade_letter: LetterGrade,
    pub is_passed: bool,
    pub completion_percentage: u8,
}

impl From<&GradeRecord> for NoteDto {
    fn from(record: &GradeRecord) -> Self {
        Self {
            etudiant_id: record.student_id,
            matiere_id: record.subject_id,
            note_cc: record.scores.cc,
            note_tp: record.scores.tp,
            note_dv: record.scores.dv,
            note_finale: record.derived.final_grade.map(|g| round_half_up(g, 2)),
            grade_letter: record.derived.letter_grade,
            is_passed: record.derived.is_passed,
            completion_percentage: record.derived.completion_percentage,
        }
    }
}

// 科目成绩权重配置
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "notes.ts")]
pub struct NoteConfigDto {
    pub id: i64,
    pub matiere_id: i64,
    #[serde(rename = "pourcentageCC")]
    pub pourcentage_cc: f64,
    #[serde(rename = "pourcentageTP")]
    pub pourcentage_tp: f64,
    #[serde(rename = "pourcentageDV")]
    pub pourcentage_dv: f64,
    #[serde(rename = "hasTPComponent")]
    pub has_tp_component: bool,
    pub dominant_component: DominantComponent,
}

impl NoteConfigDto {
    pub fn new(stored: &NoteConfig, config: &GradeConfiguration) -> Self {
        Self {
            id: stored.id,
            matiere_id: config.subject_id(),
            pourcentage_cc: config.pourcentage_cc(),
            pourcentage_tp: config.pourcentage_tp(),
            pourcentage_dv: config.pourcentage_dv(),
            has_tp_component: config.has_tp_component(),
            dominant_component: config.dominant_component(),
        }
    }
}

// 科目及其权重配置
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "notes.ts")]
pub struct SubjectWithConfigDto {
    pub id: i64,
    pub nommatiere: String,
    pub description: Option<String>,
    pub coefficient: f64,
    pub note_config: NoteConfigDto,
}

impl SubjectWithConfigDto {
    pub fn new(subject: Subject, note_config: NoteConfigDto) -> Self {
        Self {
            id: subject.id,
            nommatiere: subject.name,
            description: subject.description,
            coefficient: subject.coefficient,
            note_config,
        }
    }
}

// 学生及其成绩，尚未录入任何分数时 note 为 null
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "notes.ts")]
pub struct StudentNoteDto {
    pub student_id: i64,
    pub student_firstname: String,
    pub student_lastname: String,
    pub student_email: String,
    pub student_numero: String,
    pub age: i32,
    pub note: Option<NoteDto>,
}

impl StudentNoteDto {
    pub fn new(student: Student, record: Option<&GradeRecord>) -> Self {
        let age = student.age();
        Self {
            student_id: student.id,
            student_firstname: student.first_name,
            student_lastname: student.last_name,
            student_email: student.email,
            student_numero: student.student_number,
            age,
            note: record
                .filter(|r| !r.scores.is_empty())
                .map(NoteDto::from),
        }
    }
}

// 班级统计，比率以整数百分比表示
#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "notes.ts")]
pub struct NotesStatisticsDto {
    pub total_students: usize,
    pub students_with_notes: usize,
    pub average_grade: Option<f64>,
    pub pass_rate: u8,
    pub completion_rate: u8,
}

impl From<&ClassStatistics> for NotesStatisticsDto {
    fn from(stats: &ClassStatistics) -> Self {
        let percent = |rate: f64| round_half_up(rate * 100.0, 0) as u8;
        Self {
            total_students: stats.total_students,
            students_with_notes: stats.students_with_notes,
            average_grade: stats.average_grade.map(|g| round_half_up(g, 2)),
            pass_rate: percent(stats.pass_rate),
            completion_rate: percent(stats.completion_rate),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "notes.ts")]
pub struct GetStudentNotesResponse {
    pub subject: SubjectWithConfigDto,
    pub class_name: String,
    pub students: Vec<StudentNoteDto>,
    pub statistics: NotesStatisticsDto,
}

#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "notes.ts")]
pub struct UpdateStudentNoteResponse {
    pub note: NoteDto,
}

#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "notes.ts")]
pub struct BatchResultsDto {
    pub successful: usize,
    pub failed: usize,
    pub errors: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export, export_to = "notes.ts")]
pub struct BatchUpdateNotesResponse {
    pub results: BatchResultsDto,
}

impl From<&BatchResult> for BatchUpdateNotesResponse {
    fn from(result: &BatchResult) -> Self {
        Self {
            results: BatchResultsDto {
                successful: result.successful(),
                failed: result.failed(),
                errors: result.error_messages(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grading::ComponentScores;

    fn config() -> GradeConfiguration {
        GradeConfiguration::new(3, 40.0, 20.0, 40.0, true).unwrap()
    }

    #[test]
    fn test_note_dto_field_names() {
        let record = GradeRecord::compute(
            8,
            ComponentScores::new(Some(16.0), Some(14.0), Some(18.0)),
            &config(),
        )
        .unwrap();

        let json = serde_json::to_value(NoteDto::from(&record)).unwrap();
        assert_eq!(json["etudiantId"], 8);
        assert_eq!(json["matiereId"], 3);
        assert_eq!(json["noteCC"], 16.0);
        assert_eq!(json["noteFinale"], 16.4);
        assert_eq!(json["gradeLetter"], "A");
        assert_eq!(json["isPassed"], true);
        assert_eq!(json["completionPercentage"], 100);
    }

    #[test]
    fn test_note_config_dto() {
        let stored = NoteConfig {
            id: 11,
            subject_id: 3,
            pourcentage_cc: 40.0,
            pourcentage_tp: 20.0,
            pourcentage_dv: 40.0,
            has_tp_component: true,
        };
        let json = serde_json::to_value(NoteConfigDto::new(&stored, &config())).unwrap();

        assert_eq!(json["id"], 11);
        assert_eq!(json["pourcentageCC"], 40.0);
        assert_eq!(json["hasTPComponent"], true);
        assert_eq!(json["dominantComponent"], "balanced");
    }

    #[test]
    fn test_statistics_as_percentages() {
        let stats = ClassStatistics {
            total_students: 5,
            students_with_notes: 3,
            average_grade: Some(11.466_666),
            pass_rate: 2.0 / 3.0,
            completion_rate: 1.0 / 3.0,
        };
        let dto = NotesStatisticsDto::from(&stats);

        assert_eq!(dto.pass_rate, 67);
        assert_eq!(dto.completion_rate, 33);
        assert_eq!(dto.average_grade, Some(11.47));
    }

    #[test]
    fn test_student_without_scores_has_null_note() {
        let student = Student {
            id: 2,
            first_name: "Yao".to_string(),
            last_name: "Kouassi".to_string(),
            email: "yao.kouassi@example.com".to_string(),
            class_id: 1,
            student_number: "ETU-2024-002".to_string(),
            birth_date: None,
        };
        let empty = GradeRecord::empty(2, 3);

        let dto = StudentNoteDto::new(student, Some(&empty));
        assert_eq!(dto.note, None);
        assert_eq!(dto.age, 0);
    }
}
