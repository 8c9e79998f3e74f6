//! 科目实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "subjects")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub coefficient: f64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_one = "super::note_configs::Entity")]
    NoteConfig,
    #[sea_orm(has_many = "super::note_finales::Entity")]
    NoteFinales,
}

impl Related<super::note_configs::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::NoteConfig.def()
    }
}

impl Related<super::note_finales::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::NoteFinales.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_subject(self) -> crate::models::notes::entities::Subject {
        crate::models::notes::entities::Subject {
            id: self.id,
            name: self.name,
            description: self.description,
            coefficient: self.coefficient,
        }
    }
}
