use crate::model::Stakeholder;

/// Completion picture for a company's funding phase, derived from its
/// stakeholder list. "Ready" means paid AND trustlined; `all_ready` gates
/// the distribute action.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FundingSummary {
    pub total: usize,
    pub paid: usize,
    pub trustlined: usize,
    pub ready: usize,
    pub paid_percent: f64,
    pub trustline_percent: f64,
    pub ready_percent: f64,
    pub all_ready: bool,
}

impl FundingSummary {
    pub fn from_stakeholders(stakeholders: &[Stakeholder]) -> Self {
        let total = stakeholders.len();
        let paid = stakeholders.iter().filter(|s| s.has_paid).count();
        let trustlined = stakeholders.iter().filter(|s| s.has_trustline).count();
        let ready = stakeholders.iter().filter(|s| s.is_ready()).count();
        Self {
            total,
            paid,
            trustlined,
            ready,
            paid_percent: percent_of(paid, total),
            trustline_percent: percent_of(trustlined, total),
            ready_percent: percent_of(ready, total),
            all_ready: stakeholders.iter().all(Stakeholder::is_ready),
        }
    }

    /// Whether the distribute action should be offered: every stakeholder in
    /// a non-empty list is paid and trustlined.
    pub fn can_distribute(&self) -> bool {
        self.total > 0 && self.all_ready
    }
}

/// 100 * count / total, with an empty list reading as 0 rather than NaN.
fn percent_of(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        100.0 * count as f64 / total as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sh(paid: bool, trustline: bool) -> Stakeholder {
        Stakeholder {
            wallet_address: "rDrr8Lh4hgPu8yqrJ7x7ZMW74HzJvKsNS7".into(),
            required_rlusd: 1000.0,
            has_paid: paid,
            has_trustline: trustline,
            tokens_distributed: false,
            status: None,
        }
    }

    #[test]
    fn canonical_two_one_one_split() {
        let list = [sh(true, true), sh(true, false), sh(false, false)];
        let summary = FundingSummary::from_stakeholders(&list);
        assert_eq!(summary.paid, 2);
        assert_eq!(summary.trustlined, 1);
        assert_eq!(summary.ready, 1);
        assert!((summary.paid_percent - 100.0 * 2.0 / 3.0).abs() < 1e-9);
        assert!((summary.trustline_percent - 100.0 / 3.0).abs() < 1e-9);
        assert!((summary.ready_percent - 100.0 / 3.0).abs() < 1e-9);
        assert!(!summary.all_ready);
        assert!(!summary.can_distribute());
    }

    #[test]
    fn empty_list_yields_zero_percentages() {
        let summary = FundingSummary::from_stakeholders(&[]);
        assert_eq!(summary.total, 0);
        assert_eq!(summary.paid_percent, 0.0);
        assert_eq!(summary.trustline_percent, 0.0);
        assert_eq!(summary.ready_percent, 0.0);
        assert!(summary.ready_percent.is_finite());
        // Vacuously all ready, but distribution stays gated.
        assert!(summary.all_ready);
        assert!(!summary.can_distribute());
    }

    #[test]
    fn ready_never_exceeds_paid_or_trustlined() {
        let cases: &[&[Stakeholder]] = &[
            &[sh(true, true), sh(true, true)],
            &[sh(true, false), sh(false, true)],
            &[sh(false, false)],
            &[sh(true, true), sh(false, true), sh(true, false), sh(true, true)],
        ];
        for list in cases {
            let s = FundingSummary::from_stakeholders(list);
            assert!(s.ready <= s.paid.min(s.trustlined));
            assert!(s.ready_percent >= 0.0 && s.ready_percent <= 100.0);
        }
    }

    #[test]
    fn all_ready_enables_distribution() {
        let list = [sh(true, true), sh(true, true)];
        let summary = FundingSummary::from_stakeholders(&list);
        assert!(summary.all_ready);
        assert!(summary.can_distribute());
        assert_eq!(summary.ready_percent, 100.0);
    }
}
