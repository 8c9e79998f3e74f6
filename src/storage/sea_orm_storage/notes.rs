//! 学生成绩存储操作

use std::collections::HashMap;

use super::SeaOrmStorage;
use crate::entity::note_finales::{ActiveModel, Column, Entity as NoteFinales};
use crate::errors::{NoteSystemError, Result};
use crate::grading::{ComponentScores, GradeRecord};
use crate::storage::RosterEntry;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
use tracing::debug;

impl SeaOrmStorage {
    /// 班级名单及每名学生在该科目下已存储的分数
    pub async fn get_roster_with_scores_impl(
        &self,
        subject_id: i64,
        class_id: i64,
    ) -> Result<Vec<RosterEntry>> {
        let students = self.list_students_by_class_impl(class_id).await?;
        if students.is_empty() {
            return Ok(Vec::new());
        }

        let student_ids: Vec<i64> = students.iter().map(|s| s.id).collect();
        let notes = NoteFinales::find()
            .filter(Column::SubjectId.eq(subject_id))
            .filter(Column::StudentId.is_in(student_ids))
            .all(&self.db)
            .await
            .map_err(|e| NoteSystemError::storage_failure(format!("查询班级成绩失败: {e}")))?;

        let mut scores_by_student: HashMap<i64, ComponentScores> = notes
            .into_iter()
            .map(|m| (m.student_id, m.component_scores()))
            .collect();

        Ok(students
            .into_iter()
            .map(|s| RosterEntry {
                scores: scores_by_student.remove(&s.id),
                student: s,
            })
            .collect())
    }

    /// 学生在某科目下当前存储的分数
    pub async fn get_component_scores_impl(
        &self,
        student_id: i64,
        subject_id: i64,
    ) -> Result<Option<ComponentScores>> {
        let result = NoteFinales::find()
            .filter(Column::StudentId.eq(student_id))
            .filter(Column::SubjectId.eq(subject_id))
            .one(&self.db)
            .await
            .map_err(|e| NoteSystemError::storage_failure(format!("查询成绩失败: {e}")))?;

        Ok(result.map(|m| m.component_scores()))
    }

    /// 按 (学生, 科目) 写入成绩，已存在则整体覆盖
    pub async fn upsert_grade_record_impl(&self, record: &GradeRecord) -> Result<()> {
        let now = chrono::Utc::now().timestamp();

        let existing = NoteFinales::find()
            .filter(Column::StudentId.eq(record.student_id))
            .filter(Column::SubjectId.eq(record.subject_id))
            .one(&self.db)
            .await
            .map_err(|e| NoteSystemError::storage_failure(format!("查询成绩失败: {e}")))?;

        let mut model = ActiveModel {
            student_id: Set(record.student_id),
            subject_id: Set(record.subject_id),
            note_cc: Set(record.scores.cc),
            note_tp: Set(record.scores.tp),
            note_dv: Set(record.scores.dv),
            note_finale: Set(record.derived.final_grade),
            updated_at: Set(now),
            ..Default::default()
        };

        match existing {
            Some(existing) => {
                model.id = Set(existing.id);
                model
                    .update(&self.db)
                    .await
                    .map_err(|e| NoteSystemError::storage_failure(format!("更新成绩失败: {e}")))?;
            }
            None => {
                model
                    .insert(&self.db)
                    .await
                    .map_err(|e| NoteSystemError::storage_failure(format!("创建成绩失败: {e}")))?;
            }
        }

        debug!(
            "Stored note for student {} in subject {}",
            record.student_id, record.subject_id
        );
        Ok(())
    }
}
