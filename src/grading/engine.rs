//! 成绩聚合引擎：单条更新、批量更新与班级统计
//!
//! 引擎本身不持有任何状态，配置和分数每次都从注入的存储中读取。

use std::fmt;
use tracing::{info, warn};

use super::config::{GradeConfigResolver, GradeConfiguration};
use super::record::GradeRecord;
use super::scores::ScoreUpdate;
use super::statistics::{ClassStatistics, compute_class_statistics};
use crate::errors::{NoteSystemError, Result};
use crate::models::notes::entities::Student;
use crate::storage::{GradeConfigurationStore, GradeRecordStore};

/// 针对单个学生的分数更新
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StudentScoreUpdate {
    pub student_id: i64,
    pub scores: ScoreUpdate,
}

/// 批量更新中单条失败的原因
#[derive(Debug, Clone, PartialEq)]
pub struct BatchItemError {
    pub student_id: i64,
    pub error: NoteSystemError,
}

impl fmt::Display for BatchItemError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Student {}: {}", self.student_id, self.error.message())
    }
}

pub type BatchItemOutcome = std::result::Result<GradeRecord, BatchItemError>;

/// 批量更新结果，`outcomes` 与输入顺序一一对应
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchResult {
    pub outcomes: Vec<BatchItemOutcome>,
}

impl BatchResult {
    pub fn successful(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_ok()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_err()).count()
    }

    pub fn errors(&self) -> impl Iterator<Item = &BatchItemError> {
        self.outcomes.iter().filter_map(|o| o.as_ref().err())
    }

    pub fn error_messages(&self) -> Vec<String> {
        self.errors().map(ToString::to_string).collect()
    }

    pub fn records(&self) -> impl Iterator<Item = &GradeRecord> {
        self.outcomes.iter().filter_map(|o| o.as_ref().ok())
    }
}

pub struct GradeEngine<'a, C: ?Sized, R: ?Sized> {
    configs: &'a C,
    records: &'a R,
}

impl<'a, C, R> GradeEngine<'a, C, R>
where
    C: GradeConfigurationStore + ?Sized,
    R: GradeRecordStore + ?Sized,
{
    pub fn new(configs: &'a C, records: &'a R) -> Self {
        Self { configs, records }
    }

    pub async fn resolve_config(&self, subject_id: i64) -> Result<GradeConfiguration> {
        GradeConfigResolver::new(self.configs)
            .resolve(subject_id)
            .await
    }

    /// 更新单个学生的成绩，任何错误都直接返回给调用方
    pub async fn update_student(
        &self,
        subject_id: i64,
        update: &StudentScoreUpdate,
    ) -> Result<GradeRecord> {
        let config = self.resolve_config(subject_id).await?;
        self.apply_update(&config, update).await
    }

    /// 批量更新
    ///
    /// 配置只解析一次，解析失败则整批中止。之后逐条处理，
    /// 单条失败（分数越界、学生不存在、存储错误）只记录在结果中，不影响其余条目。
    pub async fn batch_update(
        &self,
        subject_id: i64,
        updates: &[StudentScoreUpdate],
    ) -> Result<BatchResult> {
        let config = self.resolve_config(subject_id).await?;

        let mut outcomes = Vec::with_capacity(updates.len());
        for update in updates {
            let outcome = self
                .apply_update(&config, update)
                .await
                .map_err(|error| {
                    warn!(
                        "Batch note update failed for student {} in subject {}: {}",
                        update.student_id, subject_id, error
                    );
                    BatchItemError {
                        student_id: update.student_id,
                        error,
                    }
                });
            outcomes.push(outcome);
        }

        let result = BatchResult { outcomes };
        info!(
            "Batch note update for subject {} finished: {} successful, {} failed",
            subject_id,
            result.successful(),
            result.failed()
        );
        Ok(result)
    }

    /// 班级名单上每个学生及其成绩记录，未提交成绩的学生补齐为空记录
    ///
    /// 名单与分数来自同一次读取，学生列表和统计不会出现不一致。
    pub async fn class_roster(
        &self,
        config: &GradeConfiguration,
        class_id: i64,
    ) -> Result<Vec<(Student, GradeRecord)>> {
        let subject_id = config.subject_id();
        self.records
            .get_roster_with_scores(subject_id, class_id)
            .await?
            .into_iter()
            .map(|entry| {
                let record = match entry.scores {
                    Some(scores) => GradeRecord::compute(entry.student.id, scores, config)?,
                    None => GradeRecord::empty(entry.student.id, subject_id),
                };
                Ok((entry.student, record))
            })
            .collect()
    }

    pub async fn class_records(
        &self,
        config: &GradeConfiguration,
        class_id: i64,
    ) -> Result<Vec<GradeRecord>> {
        Ok(self
            .class_roster(config, class_id)
            .await?
            .into_iter()
            .map(|(_, record)| record)
            .collect())
    }

    pub async fn class_statistics(&self, subject_id: i64, class_id: i64) -> Result<ClassStatistics> {
        let config = self.resolve_config(subject_id).await?;
        let records = self.class_records(&config, class_id).await?;
        Ok(compute_class_statistics(&records))
    }

    async fn apply_update(
        &self,
        config: &GradeConfiguration,
        update: &StudentScoreUpdate,
    ) -> Result<GradeRecord> {
        update.scores.validate()?;

        if !self.records.student_exists(update.student_id).await? {
            return Err(NoteSystemError::not_found("Student not found"));
        }

        let current = self
            .records
            .get_component_scores(update.student_id, config.subject_id())
            .await?
            .unwrap_or_default();

        let record = GradeRecord::compute(update.student_id, update.scores.apply_to(current), config)?;
        self.records.upsert_grade_record(&record).await?;
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grading::final_grade::LetterGrade;
    use crate::grading::scores::{ComponentScores, FieldUpdate};
    use crate::storage::memory::MemoryStorage;

    const SUBJECT: i64 = 10;
    const CLASS: i64 = 3;
    const OTHER_CLASS: i64 = 99;

    fn storage_with_config() -> MemoryStorage {
        let storage = MemoryStorage::new();
        storage.put_config(SUBJECT, 40.0, 20.0, 40.0, true);
        for student_id in 1..=7 {
            storage.put_student(student_id, OTHER_CLASS);
        }
        storage
    }

    fn set_all(student_id: i64, cc: f64, tp: f64, dv: f64) -> StudentScoreUpdate {
        StudentScoreUpdate {
            student_id,
            scores: ScoreUpdate {
                cc: FieldUpdate::Set(cc),
                tp: FieldUpdate::Set(tp),
                dv: FieldUpdate::Set(dv),
            },
        }
    }

    #[tokio::test]
    async fn test_batch_with_one_invalid_score() {
        let storage = storage_with_config();
        let engine = GradeEngine::new(&storage, &storage);

        let updates = vec![
            set_all(1, 12.0, 14.0, 10.0),
            set_all(2, 25.0, 14.0, 10.0),
            set_all(3, 8.0, 9.0, 11.0),
            set_all(4, 16.0, 14.0, 18.0),
        ];

        let result = engine.batch_update(SUBJECT, &updates).await.unwrap();
        assert_eq!(result.successful(), 3);
        assert_eq!(result.failed(), 1);
        assert_eq!(
            result.error_messages(),
            vec!["Student 2: CC note must be between 0 and 20".to_string()]
        );

        // 结果顺序与输入一致
        assert!(result.outcomes[0].is_ok());
        assert!(result.outcomes[1].is_err());
        assert!(result.outcomes[2].is_ok());
        assert!(result.outcomes[3].is_ok());

        // 三条合法记录已经写入存储
        assert!(storage.stored_scores(1, SUBJECT).is_some());
        assert!(storage.stored_scores(2, SUBJECT).is_none());
        assert!(storage.stored_scores(3, SUBJECT).is_some());
        assert_eq!(
            storage.stored_scores(4, SUBJECT),
            Some(ComponentScores::new(Some(16.0), Some(14.0), Some(18.0)))
        );
        assert_eq!(storage.upsert_count(), 3);
    }

    #[tokio::test]
    async fn test_batch_aborts_without_config() {
        let storage = MemoryStorage::new();
        let engine = GradeEngine::new(&storage, &storage);

        let err = engine
            .batch_update(SUBJECT, &[set_all(1, 10.0, 10.0, 10.0)])
            .await
            .unwrap_err();
        assert_eq!(err.code(), "E007");
        assert_eq!(storage.upsert_count(), 0);
    }

    #[tokio::test]
    async fn test_batch_aborts_on_invalid_config() {
        let storage = MemoryStorage::new();
        storage.put_config(SUBJECT, 50.0, 0.0, 49.0, false);
        let engine = GradeEngine::new(&storage, &storage);

        let err = engine
            .batch_update(SUBJECT, &[set_all(1, 10.0, 10.0, 10.0)])
            .await
            .unwrap_err();
        assert!(err.is_configuration_error());
        assert_eq!(storage.upsert_count(), 0);
    }

    #[tokio::test]
    async fn test_storage_failure_is_isolated_to_item() {
        let storage = storage_with_config();
        storage.fail_upserts_for(2);
        let engine = GradeEngine::new(&storage, &storage);

        let result = engine
            .batch_update(
                SUBJECT,
                &[set_all(1, 10.0, 10.0, 10.0), set_all(2, 10.0, 10.0, 10.0)],
            )
            .await
            .unwrap();

        assert_eq!(result.successful(), 1);
        let errors: Vec<_> = result.errors().collect();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].student_id, 2);
        assert_eq!(errors[0].error.code(), "E003");
    }

    #[tokio::test]
    async fn test_unknown_student_fails_only_its_item() {
        let storage = storage_with_config();
        let engine = GradeEngine::new(&storage, &storage);

        let result = engine
            .batch_update(
                SUBJECT,
                &[set_all(1, 10.0, 10.0, 10.0), set_all(404, 10.0, 10.0, 10.0)],
            )
            .await
            .unwrap();

        assert_eq!(result.successful(), 1);
        assert_eq!(
            result.error_messages(),
            vec!["Student 404: Student not found".to_string()]
        );
        assert!(storage.stored_scores(404, SUBJECT).is_none());
    }

    #[tokio::test]
    async fn test_omitted_fields_keep_stored_values() {
        let storage = storage_with_config();
        storage.put_scores(7, SUBJECT, ComponentScores::new(Some(12.0), Some(15.0), None));
        let engine = GradeEngine::new(&storage, &storage);

        let update = StudentScoreUpdate {
            student_id: 7,
            scores: ScoreUpdate {
                cc: FieldUpdate::Unchanged,
                tp: FieldUpdate::Clear,
                dv: FieldUpdate::Set(18.0),
            },
        };

        let record = engine.update_student(SUBJECT, &update).await.unwrap();
        assert_eq!(
            record.scores,
            ComponentScores::new(Some(12.0), None, Some(18.0))
        );
        // (12*40 + 18*40) / 80
        assert!((record.derived.final_grade.unwrap() - 15.0).abs() < 1e-9);
        assert_eq!(record.derived.letter_grade, LetterGrade::B);
        assert_eq!(record.derived.completion_percentage, 80);
        assert_eq!(storage.stored_scores(7, SUBJECT), Some(record.scores));
    }

    #[tokio::test]
    async fn test_single_update_surfaces_range_error() {
        let storage = storage_with_config();
        let engine = GradeEngine::new(&storage, &storage);

        let err = engine
            .update_student(SUBJECT, &set_all(1, 10.0, 21.0, 10.0))
            .await
            .unwrap_err();
        assert_eq!(err.code(), "E009");
        assert_eq!(storage.upsert_count(), 0);
    }

    #[tokio::test]
    async fn test_same_student_twice_applies_in_order() {
        let storage = storage_with_config();
        let engine = GradeEngine::new(&storage, &storage);

        let first = set_all(5, 10.0, 10.0, 10.0);
        let second = StudentScoreUpdate {
            student_id: 5,
            scores: ScoreUpdate {
                dv: FieldUpdate::Set(20.0),
                ..Default::default()
            },
        };

        let result = engine.batch_update(SUBJECT, &[first, second]).await.unwrap();
        assert_eq!(result.successful(), 2);
        assert_eq!(
            storage.stored_scores(5, SUBJECT),
            Some(ComponentScores::new(Some(10.0), Some(10.0), Some(20.0)))
        );
    }

    #[tokio::test]
    async fn test_class_statistics_over_roster() {
        let storage = storage_with_config();
        storage.put_student(1, CLASS);
        storage.put_student(2, CLASS);
        storage.put_student(3, CLASS);
        storage.put_scores(1, SUBJECT, ComponentScores::new(Some(16.0), Some(14.0), Some(18.0)));
        storage.put_scores(2, SUBJECT, ComponentScores::new(Some(6.0), None, None));
        let engine = GradeEngine::new(&storage, &storage);

        let stats = engine.class_statistics(SUBJECT, CLASS).await.unwrap();
        assert_eq!(stats.total_students, 3);
        assert_eq!(stats.students_with_notes, 2);
        assert!((stats.average_grade.unwrap() - 11.2).abs() < 1e-9);
        assert!((stats.pass_rate - 0.5).abs() < 1e-9);
        assert!((stats.completion_rate - 0.5).abs() < 1e-9);
    }

    #[tokio::test]
    async fn test_class_statistics_without_any_notes() {
        let storage = storage_with_config();
        storage.put_student(1, CLASS);
        storage.put_student(2, CLASS);
        let engine = GradeEngine::new(&storage, &storage);

        let stats = engine.class_statistics(SUBJECT, CLASS).await.unwrap();
        assert_eq!(stats.total_students, 2);
        assert_eq!(stats.students_with_notes, 0);
        assert_eq!(stats.average_grade, None);
        assert_eq!(stats.pass_rate, 0.0);
        assert_eq!(stats.completion_rate, 0.0);
    }

    #[tokio::test]
    async fn test_class_roster_pairs_students_with_records() {
        let storage = storage_with_config();
        storage.put_student(1, CLASS);
        storage.put_student(2, CLASS);
        storage.put_scores(2, SUBJECT, ComponentScores::new(Some(12.0), None, Some(14.0)));
        let engine = GradeEngine::new(&storage, &storage);
        let config = engine.resolve_config(SUBJECT).await.unwrap();

        let roster = engine.class_roster(&config, CLASS).await.unwrap();
        assert_eq!(roster.len(), 2);
        for (student, record) in &roster {
            assert_eq!(student.id, record.student_id);
            assert_eq!(student.class_id, CLASS);
        }
        assert!(!roster[0].1.has_notes());
        assert_eq!(roster[1].1.derived.letter_grade, LetterGrade::C);
    }
}
