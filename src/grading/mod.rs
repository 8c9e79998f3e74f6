//! 成绩聚合
//!
//! - `config`: 科目权重配置与解析
//! - `scores`: 分项分数与更新意图
//! - `final_grade`: 最终成绩、等级、完成度
//! - `record`: 成绩记录
//! - `statistics`: 班级统计
//! - `engine`: 单条/批量更新与统计入口

pub mod config;
pub mod engine;
pub mod final_grade;
pub mod record;
pub mod scores;
pub mod statistics;

pub use config::{DominantComponent, GradeConfigResolver, GradeConfiguration};
pub use engine::{BatchItemError, BatchItemOutcome, BatchResult, GradeEngine, StudentScoreUpdate};
pub use final_grade::{GradeDerived, LetterGrade, compute_final_grade};
pub use record::GradeRecord;
pub use scores::{Component, ComponentScores, FieldUpdate, ScoreUpdate};
pub use statistics::{ClassStatistics, compute_class_statistics};

/// 四舍五入（.5 向上），仅用于非负数的展示
pub fn round_half_up(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor + 0.5).floor() / factor
}
