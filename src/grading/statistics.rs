//! 班级成绩统计

use super::record::GradeRecord;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassStatistics {
    pub total_students: usize,
    pub students_with_notes: usize,
    /// 仅统计有最终成绩的学生，没有则为 None
    pub average_grade: Option<f64>,
    /// 比例，取值 [0, 1]
    pub pass_rate: f64,
    /// 比例，取值 [0, 1]
    pub completion_rate: f64,
}

/// 汇总班级名单上的成绩记录
///
/// 名单中每个学生一条记录，未提交成绩的学生应以 `GradeRecord::empty` 补齐。
/// 及格率与完成率的分母均为已有成绩的学生数，为 0 时两者都为 0。
pub fn compute_class_statistics(records: &[GradeRecord]) -> ClassStatistics {
    let mut students_with_notes = 0usize;
    let mut passed = 0usize;
    let mut completed = 0usize;
    let mut sum = 0.0;

    for record in records {
        let Some(final_grade) = record.derived.final_grade else {
            continue;
        };
        students_with_notes += 1;
        sum += final_grade;
        if record.derived.is_passed {
            passed += 1;
        }
        if record.derived.completion_percentage == 100 {
            completed += 1;
        }
    }

    let (average_grade, pass_rate, completion_rate) = if students_with_notes > 0 {
        let denom = students_with_notes as f64;
        (
            Some(sum / denom),
            passed as f64 / denom,
            completed as f64 / denom,
        )
    } else {
        (None, 0.0, 0.0)
    };

    ClassStatistics {
        total_students: records.len(),
        students_with_notes,
        average_grade,
        pass_rate,
        completion_rate,
    }
}
