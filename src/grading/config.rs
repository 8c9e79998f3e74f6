//! 科目成绩权重配置及其解析

use serde::{Deserialize, Serialize};
use tracing::debug;
use ts_rs::TS;

use super::scores::Component;
use crate::errors::{NoteSystemError, Result};
use crate::models::notes::entities::NoteConfig;
use crate::storage::GradeConfigurationStore;

/// 存储为两位小数，比较时允许的误差
const WEIGHT_TOLERANCE: f64 = 0.01;

/// 主导项的权重必须高于该值
const DOMINANT_THRESHOLD: f64 = 40.0;

/// 权重最高的分项
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "notes.ts")]
pub enum DominantComponent {
    #[serde(rename = "CC")]
    Cc,
    #[serde(rename = "TP")]
    Tp,
    #[serde(rename = "DV")]
    Dv,
    #[serde(rename = "balanced")]
    Balanced,
}

/// 已校验的科目权重配置
///
/// 构造即校验：三项权重各在 [0, 100] 且合计 100；
/// 未启用 TP 时 TP 权重必须为 0。
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradeConfiguration {
    subject_id: i64,
    pourcentage_cc: f64,
    pourcentage_tp: f64,
    pourcentage_dv: f64,
    has_tp_component: bool,
}

impl GradeConfiguration {
    pub fn new(
        subject_id: i64,
        pourcentage_cc: f64,
        pourcentage_tp: f64,
        pourcentage_dv: f64,
        has_tp_component: bool,
    ) -> Result<Self> {
        if subject_id <= 0 {
            return Err(NoteSystemError::invalid_configuration(
                "Subject ID must be positive",
            ));
        }

        for (component, weight) in [
            (Component::Cc, pourcentage_cc),
            (Component::Tp, pourcentage_tp),
            (Component::Dv, pourcentage_dv),
        ] {
            if !weight.is_finite() || !(0.0..=100.0).contains(&weight) {
                return Err(NoteSystemError::invalid_configuration(format!(
                    "{component} percentage must be between 0 and 100, got {weight}"
                )));
            }
        }

        let total = pourcentage_cc + pourcentage_tp + pourcentage_dv;
        if (total - 100.0).abs() > WEIGHT_TOLERANCE {
            return Err(NoteSystemError::invalid_configuration(format!(
                "Total percentage must equal 100, got {total}"
            )));
        }

        if !has_tp_component && pourcentage_tp != 0.0 {
            return Err(NoteSystemError::invalid_configuration(format!(
                "TP percentage must be 0 when the subject has no TP component, got {pourcentage_tp}"
            )));
        }

        Ok(Self {
            subject_id,
            pourcentage_cc,
            pourcentage_tp,
            pourcentage_dv,
            has_tp_component,
        })
    }

    /// 无 TP 的标准配置：DV = 100 - CC
    pub fn standard(subject_id: i64, pourcentage_cc: f64) -> Result<Self> {
        Self::new(
            subject_id,
            pourcentage_cc,
            0.0,
            100.0 - pourcentage_cc,
            false,
        )
    }

    /// 含 TP 的配置：DV = 100 - CC - TP
    pub fn with_tp(subject_id: i64, pourcentage_cc: f64, pourcentage_tp: f64) -> Result<Self> {
        Self::new(
            subject_id,
            pourcentage_cc,
            pourcentage_tp,
            100.0 - pourcentage_cc - pourcentage_tp,
            true,
        )
    }

    pub fn subject_id(&self) -> i64 {
        self.subject_id
    }

    pub fn pourcentage_cc(&self) -> f64 {
        self.pourcentage_cc
    }

    pub fn pourcentage_tp(&self) -> f64 {
        self.pourcentage_tp
    }

    pub fn pourcentage_dv(&self) -> f64 {
        self.pourcentage_dv
    }

    pub fn has_tp_component(&self) -> bool {
        self.has_tp_component
    }

    pub fn weight(&self, component: Component) -> f64 {
        match component {
            Component::Cc => self.pourcentage_cc,
            Component::Tp => self.pourcentage_tp,
            Component::Dv => self.pourcentage_dv,
        }
    }

    /// CC 和 DV 总是参与计算，TP 仅在启用时参与
    pub fn is_active(&self, component: Component) -> bool {
        match component {
            Component::Tp => self.has_tp_component,
            Component::Cc | Component::Dv => true,
        }
    }

    pub fn active_components(&self) -> impl Iterator<Item = Component> + '_ {
        Component::ALL
            .into_iter()
            .filter(move |c| self.is_active(*c))
    }

    /// 主导项：权重严格大于其余两项且高于 40%，否则为 balanced
    pub fn dominant_component(&self) -> DominantComponent {
        let (cc, tp, dv) = (self.pourcentage_cc, self.pourcentage_tp, self.pourcentage_dv);
        let dominant = if cc > tp && cc > dv {
            Some((DominantComponent::Cc, cc))
        } else if tp > cc && tp > dv {
            Some((DominantComponent::Tp, tp))
        } else if dv > cc && dv > tp {
            Some((DominantComponent::Dv, dv))
        } else {
            None
        };

        match dominant {
            Some((component, weight)) if weight > DOMINANT_THRESHOLD => component,
            _ => DominantComponent::Balanced,
        }
    }
}

impl TryFrom<&NoteConfig> for GradeConfiguration {
    type Error = NoteSystemError;

    fn try_from(stored: &NoteConfig) -> Result<Self> {
        Self::new(
            stored.subject_id,
            stored.pourcentage_cc,
            stored.pourcentage_tp,
            stored.pourcentage_dv,
            stored.has_tp_component,
        )
    }
}

/// 从配置存储中解析科目的权重规则
pub struct GradeConfigResolver<'a, S: ?Sized> {
    store: &'a S,
}

impl<'a, S> GradeConfigResolver<'a, S>
where
    S: GradeConfigurationStore + ?Sized,
{
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// 解析科目配置
    ///
    /// 没有配置记录时返回 `ConfigurationNotFound`；
    /// 存储的数据不满足约束时返回 `InvalidConfiguration`，不做任何修正。
    pub async fn resolve(&self, subject_id: i64) -> Result<GradeConfiguration> {
        self.resolve_with_source(subject_id)
            .await
            .map(|(_, config)| config)
    }

    /// 同 `resolve`，同时返回存储中的原始记录
    pub async fn resolve_with_source(
        &self,
        subject_id: i64,
    ) -> Result<(NoteConfig, GradeConfiguration)> {
        let stored = self
            .store
            .get_note_config_by_subject(subject_id)
            .await?
            .ok_or_else(|| {
                NoteSystemError::configuration_not_found(format!(
                    "Note configuration not found for subject {subject_id}"
                ))
            })?;

        let config = GradeConfiguration::try_from(&stored)?;
        debug!(
            "Resolved note config for subject {}: CC={} TP={} DV={}",
            subject_id, config.pourcentage_cc, config.pourcentage_tp, config.pourcentage_dv
        );
        Ok((stored, config))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::memory::MemoryStorage;

    #[test]
    fn test_weights_must_sum_to_100() {
        assert!(GradeConfiguration::new(1, 40.0, 20.0, 40.0, true).is_ok());

        let low = GradeConfiguration::new(1, 40.0, 20.0, 39.0, true).unwrap_err();
        assert_eq!(low.code(), "E008");
        assert!(low.message().contains("got 99"));

        let high = GradeConfiguration::new(1, 40.0, 20.0, 41.0, true).unwrap_err();
        assert_eq!(high.code(), "E008");
    }

    #[test]
    fn test_two_decimal_weights_accepted() {
        assert!(GradeConfiguration::new(1, 33.33, 33.33, 33.34, true).is_ok());
    }

    #[test]
    fn test_tp_weight_without_tp_component_is_rejected() {
        let err = GradeConfiguration::new(1, 40.0, 20.0, 40.0, false).unwrap_err();
        assert!(err.is_configuration_error());
        assert!(err.message().contains("TP percentage must be 0"));
    }

    #[test]
    fn test_out_of_range_weight_is_rejected() {
        assert!(GradeConfiguration::new(1, 120.0, 0.0, -20.0, false).is_err());
        assert!(GradeConfiguration::new(1, f64::NAN, 50.0, 50.0, true).is_err());
        assert!(GradeConfiguration::new(0, 50.0, 0.0, 50.0, false).is_err());
    }

    #[test]
    fn test_factories() {
        let standard = GradeConfiguration::standard(3, 40.0).unwrap();
        assert_eq!(standard.pourcentage_dv(), 60.0);
        assert!(!standard.has_tp_component());

        let with_tp = GradeConfiguration::with_tp(3, 30.0, 30.0).unwrap();
        assert_eq!(with_tp.pourcentage_dv(), 40.0);
        assert!(with_tp.has_tp_component());

        assert!(GradeConfiguration::with_tp(3, 70.0, 40.0).is_err());
    }

    #[test]
    fn test_dominant_component() {
        let cfg = |cc, tp, dv| GradeConfiguration::new(1, cc, tp, dv, true).unwrap();

        assert_eq!(cfg(50.0, 20.0, 30.0).dominant_component(), DominantComponent::Cc);
        assert_eq!(cfg(20.0, 50.0, 30.0).dominant_component(), DominantComponent::Tp);
        assert_eq!(cfg(30.0, 20.0, 50.0).dominant_component(), DominantComponent::Dv);
        assert_eq!(cfg(41.0, 29.0, 30.0).dominant_component(), DominantComponent::Cc);
        // 并列最高视为 balanced
        assert_eq!(cfg(40.0, 20.0, 40.0).dominant_component(), DominantComponent::Balanced);
        assert_eq!(cfg(45.0, 45.0, 10.0).dominant_component(), DominantComponent::Balanced);
        // 最高项未超过 40% 也视为 balanced
        assert_eq!(cfg(33.0, 34.0, 33.0).dominant_component(), DominantComponent::Balanced);
        assert_eq!(cfg(40.0, 30.0, 30.0).dominant_component(), DominantComponent::Balanced);
    }

    #[test]
    fn test_all_equal_weights_are_balanced() {
        let cfg = GradeConfiguration::new(1, 100.0 / 3.0, 100.0 / 3.0, 100.0 / 3.0, true).unwrap();
        assert_eq!(cfg.dominant_component(), DominantComponent::Balanced);
    }

    #[test]
    fn test_active_components() {
        let no_tp = GradeConfiguration::standard(1, 40.0).unwrap();
        assert_eq!(
            no_tp.active_components().collect::<Vec<_>>(),
            vec![Component::Cc, Component::Dv]
        );

        let with_tp = GradeConfiguration::with_tp(1, 40.0, 20.0).unwrap();
        assert_eq!(with_tp.active_components().count(), 3);
    }

    #[tokio::test]
    async fn test_resolve_missing_config() {
        let storage = MemoryStorage::new();
        let err = GradeConfigResolver::new(&storage)
            .resolve(42)
            .await
            .unwrap_err();
        assert_eq!(err.code(), "E007");
    }

    #[tokio::test]
    async fn test_resolve_rejects_corrupt_config() {
        let storage = MemoryStorage::new();
        storage.put_config(7, 40.0, 20.0, 40.0, false);

        let err = GradeConfigResolver::new(&storage)
            .resolve(7)
            .await
            .unwrap_err();
        assert_eq!(err.code(), "E008");
    }

    #[tokio::test]
    async fn test_resolve_valid_config() {
        let storage = MemoryStorage::new();
        storage.put_config(7, 40.0, 20.0, 40.0, true);

        let config = GradeConfigResolver::new(&storage).resolve(7).await.unwrap();
        assert_eq!(config.subject_id(), 7);
        assert_eq!(config.weight(Component::Tp), 20.0);
    }
}
