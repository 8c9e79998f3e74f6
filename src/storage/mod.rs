use std::sync::Arc;

use async_trait::async_trait;

use crate::errors::Result;
use crate::grading::{ComponentScores, GradeRecord};
use crate::models::notes::entities::{Class, NoteConfig, Student, Subject};

#[cfg(test)]
pub(crate) mod memory;
pub mod sea_orm_storage;

/// 班级名单中的一名学生及其已存储的分数
#[derive(Debug, Clone, PartialEq)]
pub struct RosterEntry {
    pub student: Student,
    /// 没有成绩记录时为 None
    pub scores: Option<ComponentScores>,
}

/// 科目权重配置的读取
#[async_trait]
pub trait GradeConfigurationStore: Send + Sync {
    // 获取科目的成绩配置
    async fn get_note_config_by_subject(&self, subject_id: i64) -> Result<Option<NoteConfig>>;
}

/// 成绩记录的读写
#[async_trait]
pub trait GradeRecordStore: Send + Sync {
    // 班级名单及每人在该科目下的分数
    async fn get_roster_with_scores(
        &self,
        subject_id: i64,
        class_id: i64,
    ) -> Result<Vec<RosterEntry>>;
    // 学生在某科目下当前存储的分数
    async fn get_component_scores(
        &self,
        student_id: i64,
        subject_id: i64,
    ) -> Result<Option<ComponentScores>>;
    // 学生是否存在
    async fn student_exists(&self, student_id: i64) -> Result<bool>;
    // 按 (学生, 科目) 插入或覆盖成绩记录
    async fn upsert_grade_record(&self, record: &GradeRecord) -> Result<()>;
}

#[async_trait]
pub trait Storage: GradeConfigurationStore + GradeRecordStore {
    // 通过ID获取科目信息
    async fn get_subject_by_id(&self, subject_id: i64) -> Result<Option<Subject>>;
    // 通过ID获取班级信息
    async fn get_class_by_id(&self, class_id: i64) -> Result<Option<Class>>;
    // 列出班级学生，按姓、名排序
    async fn list_students_by_class(&self, class_id: i64) -> Result<Vec<Student>>;
}

pub async fn create_storage() -> Result<Arc<dyn Storage>> {
    let storage = sea_orm_storage::SeaOrmStorage::new_async().await?;
    Ok(Arc::new(storage))
}
