// ==========================================
// 考勤表客户端 - 阈值分级
// ==========================================
// 规则（按降序，命中即返回）:
//   pct ≥ excellent → Excellent
//   pct ≥ good      → Good
//   pct ≥ moderate  → Moderate
//   其他            → At Risk
// 分级基于 3 位小数的出勤率（与显示值一致）
// ==========================================

use crate::domain::thresholds::{round3, AttendanceThresholds};
use crate::domain::types::StatusTier;

#[derive(Debug, Clone, Copy, Default)]
pub struct ThresholdClassifier;

impl ThresholdClassifier {
    pub fn new() -> Self {
        Self
    }

    pub fn classify(&self, percentage: f64, thresholds: &AttendanceThresholds) -> StatusTier {
        classify(percentage, thresholds)
    }
}

/// 出勤率 → 分级
pub fn classify(percentage: f64, thresholds: &AttendanceThresholds) -> StatusTier {
    let pct = round3(percentage);
    if pct >= thresholds.excellent {
        StatusTier::Excellent
    } else if pct >= thresholds.good {
        StatusTier::Good
    } else if pct >= thresholds.moderate {
        StatusTier::Moderate
    } else {
        StatusTier::AtRisk
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_boundaries() {
        let t = AttendanceThresholds::default();
        assert_eq!(classify(100.0, &t), StatusTier::Excellent);
        assert_eq!(classify(95.0, &t), StatusTier::Excellent);
        assert_eq!(classify(94.999, &t), StatusTier::Good);
        assert_eq!(classify(90.0, &t), StatusTier::Good);
        assert_eq!(classify(85.0, &t), StatusTier::Moderate);
        assert_eq!(classify(84.9, &t), StatusTier::AtRisk);
        assert_eq!(classify(0.0, &t), StatusTier::AtRisk);
    }

    #[test]
    fn test_classifies_displayed_value() {
        // 94.99996 显示为 95.000，应判为 Excellent
        let t = AttendanceThresholds::default();
        assert_eq!(classify(94.99996, &t), StatusTier::Excellent);
    }

    #[test]
    fn test_monotonic_under_ordered_thresholds() {
        let t = AttendanceThresholds::new(92.5, 80.0, 61.25, 50.0);
        let mut previous = StatusTier::AtRisk;
        for step in 0..=1000 {
            let pct = step as f64 / 10.0;
            let tier = classify(pct, &t);
            assert!(tier >= previous, "pct={} tier={:?} previous={:?}", pct, tier, previous);
            previous = tier;
        }
        assert_eq!(previous, StatusTier::Excellent);
    }
}
