use serde::{Deserialize, Serialize};
use std::fmt;

use crate::LoanError;

/// Number of model inputs.
pub const FEATURE_COUNT: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Exam {
    Jee,
    Sat,
    Cat,
    Neet,
}

impl fmt::Display for Exam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Exam::Jee => write!(f, "JEE"),
            Exam::Sat => write!(f, "SAT"),
            Exam::Cat => write!(f, "CAT"),
            Exam::Neet => write!(f, "NEET"),
        }
    }
}

impl std::str::FromStr for Exam {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "JEE" => Ok(Exam::Jee),
            "SAT" => Ok(Exam::Sat),
            "CAT" => Ok(Exam::Cat),
            "NEET" => Ok(Exam::Neet),
            other => Err(format!("Unknown exam: '{other}'")),
        }
    }
}

/// Applicant details as entered in the loan form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanApplication {
    /// Percent, 0–100.
    pub marks_10th: f64,
    /// Percent, 0–100.
    pub marks_12th: f64,
    /// 0–10.
    pub cgpa: f64,
    /// 300–900.
    pub parents_credit_score: f64,
    /// 300–900.
    pub student_credit_score: f64,
    /// INR.
    pub total_assets: f64,
    /// INR.
    pub fixed_deposits: f64,
    pub exam: Exam,
    pub exam_rank: f64,
}

impl LoanApplication {
    /// Reject values outside the form's accepted ranges.
    pub fn validate(&self) -> Result<(), LoanError> {
        check_range("10th grade marks", self.marks_10th, 0.0, 100.0)?;
        check_range("12th grade marks", self.marks_12th, 0.0, 100.0)?;
        check_range("CGPA", self.cgpa, 0.0, 10.0)?;
        check_range("parents' credit score", self.parents_credit_score, 300.0, 900.0)?;
        check_range("student's credit score", self.student_credit_score, 300.0, 900.0)?;
        check_range("total assets", self.total_assets, 0.0, f64::MAX)?;
        check_range("fixed deposits", self.fixed_deposits, 0.0, f64::MAX)?;
        check_range("exam rank", self.exam_rank, 0.0, f64::MAX)?;
        Ok(())
    }

    /// Model input, in training column order.
    pub fn features(&self) -> [f64; FEATURE_COUNT] {
        [
            self.marks_10th,
            self.marks_12th,
            self.cgpa,
            self.parents_credit_score,
            self.student_credit_score,
            self.total_assets,
            self.fixed_deposits,
            self.exam_rank,
        ]
    }
}

fn check_range(field: &'static str, value: f64, min: f64, max: f64) -> Result<(), LoanError> {
    if value.is_finite() && (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(LoanError::InvalidInput { field, value, min, max })
    }
}
