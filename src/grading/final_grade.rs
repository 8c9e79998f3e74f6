//! 最终成绩、等级、及格与完成度计算

use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use super::config::GradeConfiguration;
use super::round_half_up;
use super::scores::ComponentScores;
use crate::errors::Result;

pub const PASS_THRESHOLD: f64 = 10.0;

/// 字母等级
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "notes.ts")]
pub enum LetterGrade {
    A,
    B,
    C,
    D,
    F,
    #[serde(rename = "N/A")]
    NotAvailable,
}

impl LetterGrade {
    /// 按两位小数四舍五入后的最终成绩划分等级
    pub fn from_final_grade(final_grade: Option<f64>) -> Self {
        let Some(grade) = final_grade else {
            return LetterGrade::NotAvailable;
        };

        let grade = round_half_up(grade, 2);
        if grade >= 16.0 {
            LetterGrade::A
        } else if grade >= 14.0 {
            LetterGrade::B
        } else if grade >= 12.0 {
            LetterGrade::C
        } else if grade >= PASS_THRESHOLD {
            LetterGrade::D
        } else {
            LetterGrade::F
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LetterGrade::A => "A",
            LetterGrade::B => "B",
            LetterGrade::C => "C",
            LetterGrade::D => "D",
            LetterGrade::F => "F",
            LetterGrade::NotAvailable => "N/A",
        }
    }
}

impl fmt::Display for LetterGrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 由原始分数推导出的字段
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradeDerived {
    /// 未经舍入的加权成绩，没有任何有效分数时为 None
    pub final_grade: Option<f64>,
    pub letter_grade: LetterGrade,
    pub is_passed: bool,
    pub completion_percentage: u8,
}

impl GradeDerived {
    pub fn empty() -> Self {
        Self {
            final_grade: None,
            letter_grade: LetterGrade::NotAvailable,
            is_passed: false,
            completion_percentage: 0,
        }
    }
}

/// 计算最终成绩
///
/// 只统计已启用且已录入的分项，并按这些分项的权重重新归一化到 20 分制；
/// 未录入的分项既不计入分子也不计入分母。
pub fn compute_final_grade(
    scores: &ComponentScores,
    config: &GradeConfiguration,
) -> Result<GradeDerived> {
    scores.validate()?;

    let mut weighted_sum = 0.0;
    let mut present_weight = 0.0;
    let mut active_weight = 0.0;
    let mut present: Vec<f64> = Vec::with_capacity(3);
    let mut missing_active = false;

    for component in config.active_components() {
        let weight = config.weight(component);
        active_weight += weight;
        match scores.get(component) {
            Some(score) => {
                weighted_sum += score * weight;
                present_weight += weight;
                present.push(score);
            }
            None => missing_active = true,
        }
    }

    if present.is_empty() {
        return Ok(GradeDerived::empty());
    }

    let final_grade = if present_weight > 0.0 {
        weighted_sum / present_weight
    } else {
        // 已录入的分项权重全为 0 时按等权平均
        present.iter().sum::<f64>() / present.len() as f64
    };

    let completion = if !missing_active {
        100
    } else if active_weight > 0.0 {
        // 缺少任何启用分项时完成度不能达到 100
        (round_half_up(100.0 * present_weight / active_weight, 0) as u8).min(99)
    } else {
        0
    };

    Ok(GradeDerived {
        final_grade: Some(final_grade),
        letter_grade: LetterGrade::from_final_grade(Some(final_grade)),
        is_passed: round_half_up(final_grade, 2) >= PASS_THRESHOLD,
        completion_percentage: completion,
    })
}
