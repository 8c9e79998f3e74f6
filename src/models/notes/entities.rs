use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 科目
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "notes.ts")]
pub struct Subject {
    pub id: i64,
    // 科目名称
    pub name: String,
    pub description: Option<String>,
    // 科目系数
    pub coefficient: f64,
}

// 班级
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "notes.ts")]
pub struct Class {
    pub id: i64,
    pub name: String,
    // 教学楼
    pub bloc: String,
    // 班号
    pub class_number: i32,
    pub max_students: i32,
}

impl Class {
    /// 形如 `L3-2 (B)` 的完整班级标识
    pub fn full_identifier(&self) -> String {
        format!("{}-{} ({})", self.name, self.class_number, self.bloc)
    }
}

// 学生
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "notes.ts")]
pub struct Student {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub class_id: i64,
    // 学号
    pub student_number: String,
    pub birth_date: Option<NaiveDate>,
}

impl Student {
    /// 截至 `today` 的周岁，未登记出生日期时为 0
    pub fn age_on(&self, today: NaiveDate) -> i32 {
        let Some(birth) = self.birth_date else {
            return 0;
        };

        let mut age = today.year() - birth.year();
        if (today.month(), today.day()) < (birth.month(), birth.day()) {
            age -= 1;
        }
        age
    }

    pub fn age(&self) -> i32 {
        self.age_on(chrono::Utc::now().date_naive())
    }
}

// 科目成绩权重配置（存储原样，未经校验）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "notes.ts")]
pub struct NoteConfig {
    pub id: i64,
    pub subject_id: i64,
    pub pourcentage_cc: f64,
    pub pourcentage_tp: f64,
    pub pourcentage_dv: f64,
    pub has_tp_component: bool,
}
