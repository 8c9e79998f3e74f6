//! 测试用内存存储

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;

use super::{GradeConfigurationStore, GradeRecordStore, RosterEntry, Storage};
use crate::errors::{NoteSystemError, Result};
use crate::grading::{ComponentScores, GradeRecord};
use crate::models::notes::entities::{Class, NoteConfig, Student, Subject};

#[derive(Default)]
struct Inner {
    subjects: HashMap<i64, Subject>,
    classes: HashMap<i64, Class>,
    students: BTreeMap<i64, Student>,
    configs: HashMap<i64, NoteConfig>,
    records: HashMap<(i64, i64), GradeRecord>,
    failing_students: HashSet<i64>,
    upserts: usize,
}

#[derive(Default)]
pub(crate) struct MemoryStorage {
    inner: Mutex<Inner>,
}

impl MemoryStorage {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().unwrap()
    }

    pub(crate) fn put_config(
        &self,
        subject_id: i64,
        pourcentage_cc: f64,
        pourcentage_tp: f64,
        pourcentage_dv: f64,
        has_tp_component: bool,
    ) {
        let mut inner = self.lock();
        let id = inner.configs.len() as i64 + 1;
        inner.configs.insert(
            subject_id,
            NoteConfig {
                id,
                subject_id,
                pourcentage_cc,
                pourcentage_tp,
                pourcentage_dv,
                has_tp_component,
            },
        );
    }

    pub(crate) fn put_subject(&self, subject_id: i64, name: &str) {
        self.lock().subjects.insert(
            subject_id,
            Subject {
                id: subject_id,
                name: name.to_string(),
                description: None,
                coefficient: 1.0,
            },
        );
    }

    pub(crate) fn put_class(&self, class_id: i64, name: &str, bloc: &str, class_number: i32) {
        self.lock().classes.insert(
            class_id,
            Class {
                id: class_id,
                name: name.to_string(),
                bloc: bloc.to_string(),
                class_number,
                max_students: 35,
            },
        );
    }

    /// 同一学生再次放入时会覆盖其所在班级
    pub(crate) fn put_student(&self, student_id: i64, class_id: i64) {
        self.lock().students.insert(
            student_id,
            Student {
                id: student_id,
                first_name: format!("Prenom{student_id}"),
                last_name: format!("Nom{student_id}"),
                email: format!("etudiant{student_id}@example.com"),
                class_id,
                student_number: format!("ETU-{student_id:04}"),
                birth_date: None,
            },
        );
    }

    /// 直接写入已存储的分数，不经过成绩计算
    pub(crate) fn put_scores(&self, student_id: i64, subject_id: i64, scores: ComponentScores) {
        let mut record = GradeRecord::empty(student_id, subject_id);
        record.scores = scores;
        self.lock().records.insert((student_id, subject_id), record);
    }

    /// 该学生之后的写入都会失败
    pub(crate) fn fail_upserts_for(&self, student_id: i64) {
        self.lock().failing_students.insert(student_id);
    }

    pub(crate) fn stored_scores(&self, student_id: i64, subject_id: i64) -> Option<ComponentScores> {
        self.lock()
            .records
            .get(&(student_id, subject_id))
            .map(|r| r.scores)
    }

    pub(crate) fn stored_record(&self, student_id: i64, subject_id: i64) -> Option<GradeRecord> {
        self.lock().records.get(&(student_id, subject_id)).copied()
    }

    pub(crate) fn upsert_count(&self) -> usize {
        self.lock().upserts
    }
}

#[async_trait]
impl GradeConfigurationStore for MemoryStorage {
    async fn get_note_config_by_subject(&self, subject_id: i64) -> Result<Option<NoteConfig>> {
        Ok(self.lock().configs.get(&subject_id).cloned())
    }
}

#[async_trait]
impl GradeRecordStore for MemoryStorage {
    async fn get_roster_with_scores(
        &self,
        subject_id: i64,
        class_id: i64,
    ) -> Result<Vec<RosterEntry>> {
        let inner = self.lock();
        Ok(inner
            .students
            .values()
            .filter(|s| s.class_id == class_id)
            .map(|s| RosterEntry {
                student: s.clone(),
                scores: inner.records.get(&(s.id, subject_id)).map(|r| r.scores),
            })
            .collect())
    }

    async fn get_component_scores(
        &self,
        student_id: i64,
        subject_id: i64,
    ) -> Result<Option<ComponentScores>> {
        Ok(self.stored_scores(student_id, subject_id))
    }

    async fn student_exists(&self, student_id: i64) -> Result<bool> {
        Ok(self.lock().students.contains_key(&student_id))
    }

    async fn upsert_grade_record(&self, record: &GradeRecord) -> Result<()> {
        let mut inner = self.lock();
        if inner.failing_students.contains(&record.student_id) {
            return Err(NoteSystemError::storage_failure(format!(
                "写入成绩失败: student {}",
                record.student_id
            )));
        }
        inner
            .records
            .insert((record.student_id, record.subject_id), *record);
        inner.upserts += 1;
        Ok(())
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn get_subject_by_id(&self, subject_id: i64) -> Result<Option<Subject>> {
        Ok(self.lock().subjects.get(&subject_id).cloned())
    }

    async fn get_class_by_id(&self, class_id: i64) -> Result<Option<Class>> {
        Ok(self.lock().classes.get(&class_id).cloned())
    }

    async fn list_students_by_class(&self, class_id: i64) -> Result<Vec<Student>> {
        Ok(self
            .lock()
            .students
            .values()
            .filter(|s| s.class_id == class_id)
            .cloned()
            .collect())
    }
}
