//! 预导入模块，方便使用

pub use super::classes::{ActiveModel as ClassActiveModel, Entity as Classes, Model as ClassModel};
pub use super::note_configs::{
    ActiveModel as NoteConfigActiveModel, Entity as NoteConfigs, Model as NoteConfigModel,
};
pub use super::note_finales::{
    ActiveModel as NoteFinaleActiveModel, Entity as NoteFinales, Model as NoteFinaleModel,
};
pub use super::students::{
    ActiveModel as StudentActiveModel, Entity as Students, Model as StudentModel,
};
pub use super::subjects::{
    ActiveModel as SubjectActiveModel, Entity as Subjects, Model as SubjectModel,
};
