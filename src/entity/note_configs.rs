//! 科目成绩权重配置实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "note_configs")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub subject_id: i64,
    pub pourcentage_cc: f64,
    pub pourcentage_tp: f64,
    pub pourcentage_dv: f64,
    pub has_tp_component: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::subjects::Entity",
        from = "Column::SubjectId",
        to = "super::subjects::Column::Id"
    )]
    Subject,
}

impl Related<super::subjects::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Subject.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_note_config(self) -> crate::models::notes::entities::NoteConfig {
        crate::models::notes::entities::NoteConfig {
            id: self.id,
            subject_id: self.subject_id,
            pourcentage_cc: self.pourcentage_cc,
            pourcentage_tp: self.pourcentage_tp,
            pourcentage_dv: self.pourcentage_dv,
            has_tp_component: self.has_tp_component,
        }
    }
}
