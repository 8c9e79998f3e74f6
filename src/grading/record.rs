use super::config::GradeConfiguration;
use super::final_grade::{GradeDerived, compute_final_grade};
use super::scores::ComponentScores;
use crate::errors::Result;

/// 学生在某科目下的成绩记录
///
/// 不可变值：每次提交都会根据完整分数重新生成一条新记录。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradeRecord {
    pub student_id: i64,
    pub subject_id: i64,
    pub scores: ComponentScores,
    pub derived: GradeDerived,
}

impl GradeRecord {
    pub fn compute(
        student_id: i64,
        scores: ComponentScores,
        config: &GradeConfiguration,
    ) -> Result<Self> {
        Ok(Self {
            student_id,
            subject_id: config.subject_id(),
            scores,
            derived: compute_final_grade(&scores, config)?,
        })
    }

    /// 尚未提交任何成绩的学生
    pub fn empty(student_id: i64, subject_id: i64) -> Self {
        Self {
            student_id,
            subject_id,
            scores: ComponentScores::default(),
            derived: GradeDerived::empty(),
        }
    }

    /// 至少有一个启用分项已录入
    pub fn has_notes(&self) -> bool {
        self.derived.final_grade.is_some()
    }
}
