//! SeaORM 实体定义
//!
//! 这些实体用于数据库操作，与 models 模块中的业务实体分离。
//! Storage 层使用这些实体读写数据，再转换为 models 或 grading 中的类型。

pub mod prelude;

pub mod classes;
pub mod note_configs;
pub mod note_finales;
pub mod students;
pub mod subjects;
