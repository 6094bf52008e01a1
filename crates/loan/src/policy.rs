use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One step of the CGPA bonus ladder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CgpaTier {
    pub min_cgpa: f64,
    pub bonus: u32,
}

/// Additive loan ceiling rule. Amounts are in lakh, thresholds in INR.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoanPolicy {
    pub base_amount: u32,
    pub max_amount: u32,
    /// Checked highest first; only the first tier reached applies.
    pub cgpa_tiers: Vec<CgpaTier>,
    /// Assets strictly above this earn `asset_bonus`.
    pub asset_threshold: f64,
    pub asset_bonus: u32,
    /// Deposits strictly above this earn `deposit_bonus`.
    pub deposit_threshold: f64,
    pub deposit_bonus: u32,
}

impl Default for LoanPolicy {
    fn default() -> Self {
        Self {
            base_amount: 5,
            max_amount: 100,
            cgpa_tiers: vec![
                CgpaTier { min_cgpa: 9.0, bonus: 10 },
                CgpaTier { min_cgpa: 8.0, bonus: 7 },
                CgpaTier { min_cgpa: 7.0, bonus: 4 },
            ],
            asset_threshold: 2_500_000.0,
            asset_bonus: 10,
            deposit_threshold: 1_000_000.0,
            deposit_bonus: 5,
        }
    }
}

impl LoanPolicy {
    pub fn cgpa_bonus(&self, cgpa: f64) -> u32 {
        let mut tiers: Vec<&CgpaTier> = self.cgpa_tiers.iter().collect();
        tiers.sort_by(|a, b| b.min_cgpa.total_cmp(&a.min_cgpa));
        tiers
            .into_iter()
            .find(|t| cgpa >= t.min_cgpa)
            .map_or(0, |t| t.bonus)
    }

    /// Loan ceiling in lakh, capped at `max_amount`.
    pub fn ceiling(&self, cgpa: f64, total_assets: f64, fixed_deposits: f64) -> Decimal {
        let mut amount = self.base_amount.saturating_add(self.cgpa_bonus(cgpa));
        if total_assets > self.asset_threshold {
            amount = amount.saturating_add(self.asset_bonus);
        }
        if fixed_deposits > self.deposit_threshold {
            amount = amount.saturating_add(self.deposit_bonus);
        }
        Decimal::from(amount.min(self.max_amount))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lakh(n: u32) -> Decimal {
        Decimal::from(n)
    }

    #[test]
    fn top_cgpa_tier_without_financial_boost() {
        let p = LoanPolicy::default();
        assert_eq!(p.ceiling(9.2, 2_500_000.0, 0.0), lakh(15));
    }

    #[test]
    fn cgpa_tiers() {
        let p = LoanPolicy::default();
        assert_eq!(p.ceiling(9.0, 0.0, 0.0), lakh(15));
        assert_eq!(p.ceiling(8.5, 0.0, 0.0), lakh(12));
        assert_eq!(p.ceiling(7.0, 0.0, 0.0), lakh(9));
        assert_eq!(p.ceiling(6.9, 0.0, 0.0), lakh(5));
    }

    #[test]
    fn financial_boosts_need_strictly_greater() {
        let p = LoanPolicy::default();
        assert_eq!(p.ceiling(0.0, 2_500_001.0, 0.0), lakh(15));
        assert_eq!(p.ceiling(0.0, 0.0, 1_000_000.0), lakh(5));
        assert_eq!(p.ceiling(0.0, 0.0, 1_000_001.0), lakh(10));
        assert_eq!(p.ceiling(9.5, 5_000_000.0, 2_000_000.0), lakh(30));
    }

    #[test]
    fn ceiling_is_capped() {
        let p = LoanPolicy { base_amount: 95, ..LoanPolicy::default() };
        assert_eq!(p.ceiling(9.5, 5_000_000.0, 2_000_000.0), lakh(100));

        let p = LoanPolicy { max_amount: 12, ..LoanPolicy::default() };
        assert_eq!(p.ceiling(9.2, 0.0, 0.0), lakh(12));
    }

    #[test]
    fn oversized_bonuses_saturate_then_cap() {
        let p = LoanPolicy {
            base_amount: u32::MAX,
            asset_bonus: u32::MAX,
            deposit_bonus: u32::MAX,
            ..LoanPolicy::default()
        };
        assert_eq!(p.ceiling(9.5, 5_000_000.0, 2_000_000.0), lakh(100));

        let p = LoanPolicy { max_amount: u32::MAX, base_amount: u32::MAX - 1, ..LoanPolicy::default() };
        assert_eq!(p.ceiling(9.5, 0.0, 0.0), Decimal::from(u32::MAX));
    }

    #[test]
    fn unsorted_tiers_still_pick_highest_reached() {
        let p = LoanPolicy {
            cgpa_tiers: vec![
                CgpaTier { min_cgpa: 7.0, bonus: 4 },
                CgpaTier { min_cgpa: 9.0, bonus: 10 },
            ],
            ..LoanPolicy::default()
        };
        assert_eq!(p.cgpa_bonus(9.1), 10);
        assert_eq!(p.cgpa_bonus(8.0), 4);
    }

    #[test]
    fn policy_from_partial_toml() {
        let p: LoanPolicy = toml::from_str("max_amount = 50\nasset_threshold = 2000000.0").unwrap();
        assert_eq!(p.max_amount, 50);
        assert_eq!(p.asset_threshold, 2_000_000.0);
        assert_eq!(p.base_amount, 5);
        assert_eq!(p.cgpa_tiers.len(), 3);
    }
}
