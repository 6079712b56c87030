//! Load loan portfolios from CSV
//!
//! Accepts both the Spanish column values used by the upstream credit
//! database ("EFECTIVA", "MENSUAL", ...) and their English equivalents.

use super::{Compounding, Currency, LoanTerms, RateType};
use chrono::NaiveDate;
use csv::Reader;
use std::error::Error;
use std::path::Path;

/// Default portfolio CSV shipped with the repository
pub const DEFAULT_PORTFOLIO_PATH: &str = "data/sample_portfolio.csv";

/// Raw CSV row matching the portfolio file columns
#[derive(Debug, serde::Deserialize)]
struct CsvRow {
    #[serde(rename = "LoanID")]
    loan_id: u32,
    #[serde(rename = "Currency")]
    currency: String,
    #[serde(rename = "Principal")]
    principal: f64,
    #[serde(rename = "TermMonths")]
    term_months: u32,
    #[serde(rename = "AnnualRate")]
    annual_rate_pct: f64,
    #[serde(rename = "RateType")]
    rate_type: String,
    #[serde(rename = "Compounding")]
    compounding: String,
    #[serde(rename = "TotalGrace")]
    total_grace: u32,
    #[serde(rename = "PartialGrace")]
    partial_grace: u32,
    #[serde(rename = "DisbursementDate")]
    disbursement_date: String,
}

impl CsvRow {
    fn to_loan(self) -> Result<LoanTerms, Box<dyn Error>> {
        let currency = match self.currency.to_uppercase().as_str() {
            "PEN" => Currency::PEN,
            "USD" => Currency::USD,
            other => return Err(format!("Unknown Currency: {}", other).into()),
        };

        let rate_type = match self.rate_type.to_uppercase().as_str() {
            "EFECTIVA" | "EFFECTIVE" => RateType::Effective,
            "NOMINAL" => RateType::Nominal,
            other => return Err(format!("Unknown RateType: {}", other).into()),
        };

        // Unknown compounding falls back to monthly rather than rejecting
        // the row, matching the upstream default.
        let compounding = match self.compounding.to_uppercase().as_str() {
            "MENSUAL" | "MONTHLY" => Compounding::Monthly,
            "TRIMESTRAL" | "QUARTERLY" => Compounding::Quarterly,
            "SEMESTRAL" | "SEMIANNUAL" => Compounding::Semiannual,
            "ANUAL" | "ANNUAL" => Compounding::Annual,
            _ => Compounding::Monthly,
        };

        let disbursement_date = if self.disbursement_date.trim().is_empty() {
            None
        } else {
            Some(NaiveDate::parse_from_str(self.disbursement_date.trim(), "%Y-%m-%d")?)
        };

        Ok(LoanTerms {
            loan_id: self.loan_id,
            currency,
            principal: self.principal,
            term_months: self.term_months,
            annual_rate_pct: self.annual_rate_pct,
            rate_type,
            compounding,
            total_grace_months: self.total_grace,
            partial_grace_months: self.partial_grace,
            disbursement_date,
        })
    }
}

/// Load all loans from a CSV file
pub fn load_loans<P: AsRef<Path>>(path: P) -> Result<Vec<LoanTerms>, Box<dyn Error>> {
    let mut reader = Reader::from_path(path)?;
    let mut loans = Vec::new();

    for result in reader.deserialize() {
        let row: CsvRow = result?;
        let loan = row.to_loan()?;
        loans.push(loan);
    }

    Ok(loans)
}

/// Load loans from any reader (e.g., string buffer, network stream)
pub fn load_loans_from_reader<R: std::io::Read>(reader: R) -> Result<Vec<LoanTerms>, Box<dyn Error>> {
    let mut csv_reader = Reader::from_reader(reader);
    let mut loans = Vec::new();

    for result in csv_reader.deserialize() {
        let row: CsvRow = result?;
        let loan = row.to_loan()?;
        loans.push(loan);
    }

    Ok(loans)
}

/// Load loans from the default sample portfolio location
pub fn load_default_portfolio() -> Result<Vec<LoanTerms>, Box<dyn Error>> {
    load_loans(DEFAULT_PORTFOLIO_PATH)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
LoanID,Currency,Principal,TermMonths,AnnualRate,RateType,Compounding,TotalGrace,PartialGrace,DisbursementDate
1,PEN,280000,240,7.5,EFECTIVA,MENSUAL,0,0,2024-03-01
2,USD,95000,120,8.0,NOMINAL,TRIMESTRAL,6,0,
3,PEN,60000,60,11.5,nominal,quarterly,0,3,2024-07-15
";

    #[test]
    fn test_load_from_reader() {
        let loans = load_loans_from_reader(SAMPLE.as_bytes()).expect("Failed to parse portfolio");
        assert_eq!(loans.len(), 3);

        let l1 = &loans[0];
        assert_eq!(l1.loan_id, 1);
        assert_eq!(l1.currency, Currency::PEN);
        assert_eq!(l1.rate_type, RateType::Effective);
        assert_eq!(l1.disbursement_date, NaiveDate::from_ymd_opt(2024, 3, 1));

        let l2 = &loans[1];
        assert_eq!(l2.currency, Currency::USD);
        assert_eq!(l2.compounding, Compounding::Quarterly);
        assert_eq!(l2.total_grace_months, 6);
        assert_eq!(l2.disbursement_date, None);

        // Lowercase English values parse too
        let l3 = &loans[2];
        assert_eq!(l3.rate_type, RateType::Nominal);
        assert_eq!(l3.compounding, Compounding::Quarterly);
    }

    #[test]
    fn test_unknown_compounding_defaults_to_monthly() {
        let csv = "\
LoanID,Currency,Principal,TermMonths,AnnualRate,RateType,Compounding,TotalGrace,PartialGrace,DisbursementDate
9,PEN,50000,36,10.0,NOMINAL,BIWEEKLY,0,0,
";
        let loans = load_loans_from_reader(csv.as_bytes()).unwrap();
        assert_eq!(loans[0].compounding, Compounding::Monthly);
    }

    #[test]
    fn test_unknown_rate_type_rejected() {
        let csv = "\
LoanID,Currency,Principal,TermMonths,AnnualRate,RateType,Compounding,TotalGrace,PartialGrace,DisbursementDate
9,PEN,50000,36,10.0,FLAT,MENSUAL,0,0,
";
        assert!(load_loans_from_reader(csv.as_bytes()).is_err());
    }
}
