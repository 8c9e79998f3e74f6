//! 科目、班级与学生的只读查询

use super::SeaOrmStorage;
use crate::entity::classes::Entity as Classes;
use crate::entity::students::{Column as StudentColumn, Entity as Students};
use crate::entity::subjects::Entity as Subjects;
use crate::errors::{NoteSystemError, Result};
use crate::models::notes::entities::{Class, Student, Subject};
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder};

impl SeaOrmStorage {
    /// 通过 ID 获取科目
    pub async fn get_subject_by_id_impl(&self, subject_id: i64) -> Result<Option<Subject>> {
        let result = Subjects::find_by_id(subject_id)
            .one(&self.db)
            .await
            .map_err(|e| NoteSystemError::storage_failure(format!("查询科目失败: {e}")))?;

        Ok(result.map(|m| m.into_subject()))
    }

    /// 通过 ID 获取班级
    pub async fn get_class_by_id_impl(&self, class_id: i64) -> Result<Option<Class>> {
        let result = Classes::find_by_id(class_id)
            .one(&self.db)
            .await
            .map_err(|e| NoteSystemError::storage_failure(format!("查询班级失败: {e}")))?;

        Ok(result.map(|m| m.into_class()))
    }

    /// 列出班级学生（按姓、名排序）
    pub async fn list_students_by_class_impl(&self, class_id: i64) -> Result<Vec<Student>> {
        let students = Students::find()
            .filter(StudentColumn::ClassId.eq(class_id))
            .order_by_asc(StudentColumn::LastName)
            .order_by_asc(StudentColumn::FirstName)
            .order_by_asc(StudentColumn::Id)
            .all(&self.db)
            .await
            .map_err(|e| NoteSystemError::storage_failure(format!("查询班级学生失败: {e}")))?;

        Ok(students.into_iter().map(|m| m.into_student()).collect())
    }

    pub async fn student_exists_impl(&self, student_id: i64) -> Result<bool> {
        let count = Students::find()
            .filter(StudentColumn::Id.eq(student_id))
            .count(&self.db)
            .await
            .map_err(|e| NoteSystemError::storage_failure(format!("查询学生失败: {e}")))?;

        Ok(count > 0)
    }
}
