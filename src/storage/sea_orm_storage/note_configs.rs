//! 成绩配置存储操作

use super::SeaOrmStorage;
use crate::entity::note_configs::{Column, Entity as NoteConfigs};
use crate::errors::{NoteSystemError, Result};
use crate::models::notes::entities::NoteConfig;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter};

impl SeaOrmStorage {
    /// 通过科目 ID 获取成绩配置
    pub async fn get_note_config_by_subject_impl(
        &self,
        subject_id: i64,
    ) -> Result<Option<NoteConfig>> {
        let result = NoteConfigs::find()
            .filter(Column::SubjectId.eq(subject_id))
            .one(&self.db)
            .await
            .map_err(|e| NoteSystemError::storage_failure(format!("查询成绩配置失败: {e}")))?;

        Ok(result.map(|m| m.into_note_config()))
    }
}
