// ==========================================
// 考勤表客户端 - 出勤阈值
// ==========================================
// 四个分界点: excellent ≥ good ≥ moderate ≥ atRisk，取值 0~100，最多 3 位小数
// 约束仅在保存设置时校验（validate），结构上不强制
// ==========================================

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 阈值上限
pub const THRESHOLD_MAX: f64 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AttendanceThresholds {
    pub excellent: f64,
    pub good: f64,
    pub moderate: f64,
    #[serde(rename = "atRisk")]
    pub at_risk: f64,
}

impl Default for AttendanceThresholds {
    fn default() -> Self {
        Self {
            excellent: 95.0,
            good: 90.0,
            moderate: 85.0,
            at_risk: 85.0,
        }
    }
}

/// 阈值校验错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ThresholdError {
    #[error("阈值超出范围: {field}={value}（应在 0.000 ~ 100.000 之间）")]
    OutOfRange { field: &'static str, value: f64 },

    #[error("excellent 阈值必须大于 good 阈值")]
    ExcellentNotAboveGood,

    #[error("good 阈值必须大于 moderate 阈值")]
    GoodNotAboveModerate,

    #[error("moderate 阈值必须大于或等于 atRisk 阈值")]
    ModerateBelowAtRisk,
}

impl ThresholdError {
    /// 对应的 i18n 消息键
    pub fn message_key(&self) -> &'static str {
        match self {
            ThresholdError::OutOfRange { .. } => "validation.threshold_range",
            ThresholdError::ExcellentNotAboveGood => "validation.threshold_excellent_good",
            ThresholdError::GoodNotAboveModerate => "validation.threshold_good_moderate",
            ThresholdError::ModerateBelowAtRisk => "validation.threshold_moderate_at_risk",
        }
    }
}

/// 保留 3 位小数
pub fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}

impl AttendanceThresholds {
    pub fn new(excellent: f64, good: f64, moderate: f64, at_risk: f64) -> Self {
        Self {
            excellent,
            good,
            moderate,
            at_risk,
        }
    }

    /// 各分界点统一保留 3 位小数
    pub fn normalized(&self) -> Self {
        Self {
            excellent: round3(self.excellent),
            good: round3(self.good),
            moderate: round3(self.moderate),
            at_risk: round3(self.at_risk),
        }
    }

    /// 保存前校验
    ///
    /// # 规则
    /// 1. 每个值在 [0, 100]
    /// 2. excellent > good > moderate ≥ atRisk
    pub fn validate(&self) -> Result<(), ThresholdError> {
        let fields = [
            ("excellent", self.excellent),
            ("good", self.good),
            ("moderate", self.moderate),
            ("atRisk", self.at_risk),
        ];
        for (field, value) in fields {
            if !value.is_finite() || !(0.0..=THRESHOLD_MAX).contains(&value) {
                return Err(ThresholdError::OutOfRange { field, value });
            }
        }

        if self.excellent <= self.good {
            return Err(ThresholdError::ExcellentNotAboveGood);
        }
        if self.good <= self.moderate {
            return Err(ThresholdError::GoodNotAboveModerate);
        }
        if self.moderate < self.at_risk {
            return Err(ThresholdError::ModerateBelowAtRisk);
        }
        Ok(())
    }
}
