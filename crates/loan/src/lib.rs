pub mod application;
pub mod classifier;
pub mod policy;
pub mod schemes;

pub use application::{Exam, LoanApplication, FEATURE_COUNT};
pub use classifier::{LoanClassifier, ModelError, RandomForestModel};
pub use policy::{CgpaTier, LoanPolicy};
pub use schemes::{find_suitable, LoanScheme, LOAN_SCHEMES};

use rust_decimal::Decimal;
use serde::Serialize;

#[derive(Debug, thiserror::Error)]
pub enum LoanError {
    #[error("Invalid {field}: {value} (expected {min} to {max})")]
    InvalidInput {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
    #[error(transparent)]
    Model(#[from] ModelError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LoanStatus {
    Approved,
    Rejected,
}

impl std::fmt::Display for LoanStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoanStatus::Approved => write!(f, "Approved"),
            LoanStatus::Rejected => write!(f, "Rejected"),
        }
    }
}

/// Outcome of an eligibility check. `amount` is in lakh.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoanDecision {
    pub status: LoanStatus,
    pub amount: Option<Decimal>,
    pub schemes: Vec<String>,
}

impl LoanDecision {
    pub fn rejected() -> Self {
        Self { status: LoanStatus::Rejected, amount: None, schemes: Vec::new() }
    }

    pub fn is_approved(&self) -> bool {
        self.status == LoanStatus::Approved
    }
}

/// Validate the application, ask the classifier, and on approval derive the
/// ceiling and the schemes that cover it.
pub fn predict_loan_eligibility(
    classifier: &impl LoanClassifier,
    application: &LoanApplication,
    policy: &LoanPolicy,
) -> Result<LoanDecision, LoanError> {
    application.validate()?;

    if !classifier.predict(&application.features()) {
        tracing::info!(exam = %application.exam, "loan application rejected");
        return Ok(LoanDecision::rejected());
    }

    let amount = policy.ceiling(
        application.cgpa,
        application.total_assets,
        application.fixed_deposits,
    );
    let schemes: Vec<String> = find_suitable(amount)
        .into_iter()
        .map(|s| s.name.to_string())
        .collect();
    tracing::info!(%amount, schemes = schemes.len(), "loan application approved");

    Ok(LoanDecision { status: LoanStatus::Approved, amount: Some(amount), schemes })
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(bool);

    impl LoanClassifier for Fixed {
        fn predict(&self, _: &[f64; FEATURE_COUNT]) -> bool {
            self.0
        }
    }

    fn applicant() -> LoanApplication {
        LoanApplication {
            marks_10th: 95.0,
            marks_12th: 91.0,
            cgpa: 9.2,
            parents_credit_score: 800.0,
            student_credit_score: 700.0,
            total_assets: 2_500_000.0,
            fixed_deposits: 0.0,
            exam: Exam::Jee,
            exam_rank: 820.0,
        }
    }

    #[test]
    fn approval_derives_amount_and_schemes() {
        let d = predict_loan_eligibility(&Fixed(true), &applicant(), &LoanPolicy::default()).unwrap();
        assert!(d.is_approved());
        assert_eq!(d.amount, Some(Decimal::from(15)));
        assert!(d.schemes.contains(&"Dena Bank Vidya Lakshmi".to_string()));
        assert!(!d.schemes.contains(&"SBI Student Loan Scheme".to_string()));
    }

    #[test]
    fn twelve_lakh_lists_covering_schemes() {
        let a = LoanApplication { cgpa: 8.4, total_assets: 0.0, ..applicant() };
        let d = predict_loan_eligibility(&Fixed(true), &a, &LoanPolicy::default()).unwrap();
        assert_eq!(d.amount, Some(Decimal::from(12)));
        let expected: Vec<String> = LOAN_SCHEMES
            .iter()
            .filter(|s| s.covers(Decimal::from(12)))
            .map(|s| s.name.to_string())
            .collect();
        assert_eq!(d.schemes, expected);
    }

    #[test]
    fn rejection_has_no_amount_or_schemes() {
        let d = predict_loan_eligibility(&Fixed(false), &applicant(), &LoanPolicy::default()).unwrap();
        assert_eq!(d, LoanDecision::rejected());
    }

    #[test]
    fn invalid_input_is_rejected_before_prediction() {
        let a = LoanApplication { parents_credit_score: 1000.0, ..applicant() };
        let err = predict_loan_eligibility(&Fixed(true), &a, &LoanPolicy::default()).unwrap_err();
        assert!(matches!(err, LoanError::InvalidInput { field: "parents' credit score", .. }));
    }

    #[test]
    fn works_with_loaded_forest() {
        let json = r#"{"n_features": 8, "trees": [{"nodes": [
            {"feature": 2, "threshold": 7.0, "left": 1, "right": 2}, {"class": 0}, {"class": 1}
        ]}]}"#;
        let model = RandomForestModel::from_json(json).unwrap();
        let d = predict_loan_eligibility(&model, &applicant(), &LoanPolicy::default()).unwrap();
        assert_eq!(d.status, LoanStatus::Approved);

        let weak = LoanApplication { cgpa: 6.5, ..applicant() };
        let d = predict_loan_eligibility(&model, &weak, &LoanPolicy::default()).unwrap();
        assert_eq!(d.status, LoanStatus::Rejected);
    }

    #[test]
    fn decision_serializes() {
        let d = predict_loan_eligibility(&Fixed(true), &applicant(), &LoanPolicy::default()).unwrap();
        let json = serde_json::to_value(&d).unwrap();
        assert_eq!(json["status"], "Approved");
        assert!(json["schemes"].is_array());
    }
}
