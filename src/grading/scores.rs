//! 成绩分项（CC / TP / DV）与更新意图

use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::errors::{NoteSystemError, Result};

pub const MIN_SCORE: f64 = 0.0;
pub const MAX_SCORE: f64 = 20.0;

/// 成绩分项
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export, export_to = "notes.ts")]
pub enum Component {
    #[serde(rename = "CC")]
    Cc, // 平时成绩
    #[serde(rename = "TP")]
    Tp, // 实践
    #[serde(rename = "DV")]
    Dv, // 期末考试
}

impl Component {
    pub const ALL: [Component; 3] = [Component::Cc, Component::Tp, Component::Dv];

    pub fn as_str(&self) -> &'static str {
        match self {
            Component::Cc => "CC",
            Component::Tp => "TP",
            Component::Dv => "DV",
        }
    }
}

impl fmt::Display for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 校验单个分数：必须是 [0, 20] 内的有限数值
pub fn validate_score(component: Component, value: f64) -> Result<()> {
    if !value.is_finite() || !(MIN_SCORE..=MAX_SCORE).contains(&value) {
        return Err(NoteSystemError::invalid_score_range(format!(
            "{component} note must be between 0 and 20"
        )));
    }
    Ok(())
}

/// 学生在某科目下的三项原始分数，`None` 表示尚未录入（区别于 0 分）
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ComponentScores {
    pub cc: Option<f64>,
    pub tp: Option<f64>,
    pub dv: Option<f64>,
}

impl ComponentScores {
    pub fn new(cc: Option<f64>, tp: Option<f64>, dv: Option<f64>) -> Self {
        Self { cc, tp, dv }
    }

    pub fn get(&self, component: Component) -> Option<f64> {
        match component {
            Component::Cc => self.cc,
            Component::Tp => self.tp,
            Component::Dv => self.dv,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.cc.is_none() && self.tp.is_none() && self.dv.is_none()
    }

    /// 按 CC、TP、DV 顺序校验，返回第一个越界分项的错误
    pub fn validate(&self) -> Result<()> {
        for component in Component::ALL {
            if let Some(value) = self.get(component) {
                validate_score(component, value)?;
            }
        }
        Ok(())
    }
}

/// 单个分项的更新意图
///
/// 请求中省略的字段为 `Unchanged`，显式传 `null` 为 `Clear`。
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum FieldUpdate {
    #[default]
    Unchanged,
    Clear,
    Set(f64),
}

impl FieldUpdate {
    /// 由双层 Option 的请求字段转换：外层 None 为省略，内层 None 为 null
    pub fn from_request(value: Option<Option<f64>>) -> Self {
        match value {
            None => FieldUpdate::Unchanged,
            Some(None) => FieldUpdate::Clear,
            Some(Some(v)) => FieldUpdate::Set(v),
        }
    }

    fn apply(self, current: Option<f64>) -> Option<f64> {
        match self {
            FieldUpdate::Unchanged => current,
            FieldUpdate::Clear => None,
            FieldUpdate::Set(v) => Some(v),
        }
    }
}

/// 一次提交中针对某学生的分数更新
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScoreUpdate {
    pub cc: FieldUpdate,
    pub tp: FieldUpdate,
    pub dv: FieldUpdate,
}

impl ScoreUpdate {
    /// 把三个分项都设置为给定值（`None` 即清空）
    pub fn replace_all(scores: ComponentScores) -> Self {
        let to_field = |v: Option<f64>| v.map_or(FieldUpdate::Clear, FieldUpdate::Set);
        Self {
            cc: to_field(scores.cc),
            tp: to_field(scores.tp),
            dv: to_field(scores.dv),
        }
    }

    fn field(&self, component: Component) -> FieldUpdate {
        match component {
            Component::Cc => self.cc,
            Component::Tp => self.tp,
            Component::Dv => self.dv,
        }
    }

    /// 只校验请求中显式给出的分数
    pub fn validate(&self) -> Result<()> {
        for component in Component::ALL {
            if let FieldUpdate::Set(value) = self.field(component) {
                validate_score(component, value)?;
            }
        }
        Ok(())
    }

    /// 合并到当前已存储的分数上，得到新的完整分数
    pub fn apply_to(&self, current: ComponentScores) -> ComponentScores {
        ComponentScores {
            cc: self.cc.apply(current.cc),
            tp: self.tp.apply(current.tp),
            dv: self.dv.apply(current.dv),
        }
    }
}
