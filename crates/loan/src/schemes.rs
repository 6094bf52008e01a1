use rust_decimal::Decimal;

/// An education loan product and the amounts (lakh) it covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoanScheme {
    pub name: &'static str,
    /// Tenths of a lakh.
    min_tenths: i64,
    max_lakh: i64,
}

impl LoanScheme {
    const fn new(name: &'static str, min_tenths: i64, max_lakh: i64) -> Self {
        Self { name, min_tenths, max_lakh }
    }

    pub fn min(&self) -> Decimal {
        Decimal::new(self.min_tenths, 1)
    }

    pub fn max(&self) -> Decimal {
        Decimal::from(self.max_lakh)
    }

    /// Inclusive on both ends.
    pub fn covers(&self, amount: Decimal) -> bool {
        self.min() <= amount && amount <= self.max()
    }
}

pub const LOAN_SCHEMES: &[LoanScheme] = &[
    LoanScheme::new("SBI Student Loan Scheme", 0, 10),
    LoanScheme::new("SBI Global Ed-Vantage Scheme", 200, 150),
    LoanScheme::new("HDFC Bank Education Loan", 0, 20),
    LoanScheme::new("ICICI Bank Education Loan", 0, 100),
    LoanScheme::new("Axis Bank Education Loan", 5, 75),
    LoanScheme::new("PNB Udaan", 0, 20),
    LoanScheme::new("Bank of Baroda Baroda Gyan", 0, 10),
    LoanScheme::new("Bank of Baroda Baroda Scholar", 0, 20),
    LoanScheme::new("Canara Bank Vidya Turant", 0, 40),
    LoanScheme::new("Union Bank of India Education Loan", 0, 30),
    LoanScheme::new("IDBI Bank Education Loan", 0, 20),
    LoanScheme::new("Kotak Mahindra Bank Education Loan", 0, 20),
    LoanScheme::new("Federal Bank Special Vidya Loan", 0, 20),
    LoanScheme::new("Indian Overseas Bank Vidya Jyoti", 0, 30),
    LoanScheme::new("UCO Bank Education Loan", 0, 20),
    LoanScheme::new("Dena Bank Vidya Lakshmi", 0, 15),
    LoanScheme::new("HSBC India Education Loan", 0, 100),
    LoanScheme::new("Standard Chartered Bank Education Loan", 0, 150),
    LoanScheme::new("IDFC FIRST Bank Education Loan", 0, 20),
    LoanScheme::new("RBL Bank Education Loan", 0, 10),
    LoanScheme::new("IndusInd Bank Education Loan", 0, 15),
    LoanScheme::new("Avanse Education Loan", 5, 500),
    LoanScheme::new("InCred Education Loan", 0, 100),
    LoanScheme::new("Auxilo Finserve Education Loan", 0, 100),
    LoanScheme::new("MPOWER Financing Education Loan", 0, 100),
];

/// Every scheme whose range contains `amount`, in table order.
pub fn find_suitable(amount: Decimal) -> Vec<&'static LoanScheme> {
    LOAN_SCHEMES.iter().filter(|s| s.covers(amount)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(amount: Decimal) -> Vec<&'static str> {
        find_suitable(amount).into_iter().map(|s| s.name).collect()
    }

    #[test]
    fn twelve_lakh_matches_every_covering_scheme() {
        let got = names(Decimal::from(12));
        let expected: Vec<_> = LOAN_SCHEMES
            .iter()
            .filter(|s| s.min() <= Decimal::from(12) && Decimal::from(12) <= s.max())
            .map(|s| s.name)
            .collect();
        assert_eq!(got, expected);
        assert_eq!(got.len(), 21);
        assert!(!got.contains(&"SBI Student Loan Scheme"));
        assert!(!got.contains(&"SBI Global Ed-Vantage Scheme"));
        assert!(got.contains(&"Dena Bank Vidya Lakshmi"));
        assert!(got.contains(&"Axis Bank Education Loan"));
    }

    #[test]
    fn bounds_are_inclusive() {
        assert!(names(Decimal::from(10)).contains(&"RBL Bank Education Loan"));
        assert!(names(Decimal::from(20)).contains(&"SBI Global Ed-Vantage Scheme"));
        assert!(names(Decimal::new(5, 1)).contains(&"Avanse Education Loan"));
        assert!(!names(Decimal::new(4, 1)).contains(&"Avanse Education Loan"));
    }

    #[test]
    fn large_amount_narrows_to_few_schemes() {
        assert_eq!(
            names(Decimal::from(200)),
            vec!["Avanse Education Loan"]
        );
        assert!(names(Decimal::from(501)).is_empty());
    }

    #[test]
    fn table_has_twenty_five_products() {
        assert_eq!(LOAN_SCHEMES.len(), 25);
        assert!(LOAN_SCHEMES.iter().all(|s| s.min() <= s.max()));
    }
}
