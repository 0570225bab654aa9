//! Loading transactions from CSV and JSON files
//!
//! CSV files need a header row. Columns are matched by name, ignoring case:
//! `name`, `amount`, `date` and `category` are required, `id` and
//! `description` are optional. Amounts keep the sign written in the file.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::{ReaderBuilder, StringRecord};
use tracing::debug;

use crate::error::{Error, Result};
use crate::models::{Budget, Transaction};

/// Supported file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Csv,
    Json,
}

impl FileFormat {
    /// Guess the format from a file extension
    pub fn from_path(path: &Path) -> Result<Self> {
        match path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .as_deref()
        {
            Some("csv") => Ok(Self::Csv),
            Some("json") => Ok(Self::Json),
            _ => Err(Error::InvalidData(format!(
                "Unsupported file type for {} (expected .csv or .json)",
                path.display()
            ))),
        }
    }
}

/// Column positions resolved from the header row
struct Columns {
    id: Option<usize>,
    name: usize,
    amount: usize,
    date: usize,
    category: usize,
    description: Option<usize>,
}

impl Columns {
    fn from_headers(headers: &StringRecord) -> Result<Self> {
        let find = |wanted: &str| {
            headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(wanted))
        };
        let require = |wanted: &str| {
            find(wanted)
                .ok_or_else(|| Error::InvalidData(format!("CSV is missing a '{}' column", wanted)))
        };

        Ok(Self {
            id: find("id"),
            name: require("name")?,
            amount: require("amount")?,
            date: require("date")?,
            category: require("category")?,
            description: find("description"),
        })
    }
}

/// Parse transactions from CSV data
pub fn parse_csv<R: Read>(reader: R) -> Result<Vec<Transaction>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let columns = Columns::from_headers(rdr.headers()?)?;
    let mut transactions = Vec::new();

    for (row, result) in rdr.records().enumerate() {
        let record = result?;
        // Header is line 1
        let line = row + 2;
        let field = |index: usize, what: &str| {
            record
                .get(index)
                .ok_or_else(|| Error::InvalidData(format!("Line {}: missing {}", line, what)))
        };

        let amount = parse_amount(field(columns.amount, "amount")?)
            .map_err(|e| Error::InvalidData(format!("Line {}: {}", line, e)))?;

        transactions.push(Transaction {
            id: columns
                .id
                .and_then(|i| record.get(i))
                .unwrap_or_default()
                .to_string(),
            name: field(columns.name, "name")?.to_string(),
            amount,
            date: field(columns.date, "date")?.to_string(),
            category: field(columns.category, "category")?.to_string(),
            description: columns
                .description
                .and_then(|i| record.get(i))
                .filter(|d| !d.is_empty())
                .map(str::to_string),
        });
    }

    debug!(count = transactions.len(), "Parsed CSV transactions");
    Ok(transactions)
}

/// Parse an amount, accepting currency symbols, thousands separators and
/// accounting-style parentheses for negatives
pub fn parse_amount(s: &str) -> Result<f64> {
    let trimmed = s.trim();
    let (negative, body) = if trimmed.starts_with('(') && trimmed.ends_with(')') {
        (true, &trimmed[1..trimmed.len() - 1])
    } else {
        (false, trimmed)
    };

    let cleaned: String = body
        .chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, '.' | '-' | '+'))
        .collect();

    let value: f64 = cleaned
        .parse()
        .map_err(|_| Error::InvalidData(format!("Invalid amount: {}", s)))?;

    if !value.is_finite() {
        return Err(Error::InvalidData(format!("Invalid amount: {}", s)));
    }

    Ok(if negative { -value.abs() } else { value })
}

/// Load a transaction list from a `.csv` file or a `.json` array
pub fn load_transactions(path: &Path) -> Result<Vec<Transaction>> {
    let file = File::open(path)?;
    match FileFormat::from_path(path)? {
        FileFormat::Csv => parse_csv(file),
        FileFormat::Json => Ok(serde_json::from_reader(file)?),
    }
}

/// Load budgets from a `.json` array or a `.csv` file with
/// `category,amount[,period][,id]` columns
pub fn load_budgets(path: &Path) -> Result<Vec<Budget>> {
    let file = File::open(path)?;
    let budgets: Vec<Budget> = match FileFormat::from_path(path)? {
        FileFormat::Csv => ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(file)
            .deserialize()
            .collect::<std::result::Result<_, _>>()?,
        FileFormat::Json => serde_json::from_reader(file)?,
    };
    debug!(count = budgets.len(), path = %path.display(), "Loaded budgets");
    Ok(budgets)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_csv_by_header_name() {
        let data = "\
date,category,amount,name,description
2025-01-05,Food,12.50,Lunch,with team
2025-01-06,Transportation,3.00,Bus,
";
        let txs = parse_csv(data.as_bytes()).unwrap();
        assert_eq!(txs.len(), 2);
        assert_eq!(txs[0].name, "Lunch");
        assert_eq!(txs[0].amount, 12.5);
        assert_eq!(txs[0].description.as_deref(), Some("with team"));
        assert!(txs[1].description.is_none());
        assert!(txs[1].id.is_empty());
    }

    #[test]
    fn test_parse_csv_keeps_sign_and_ids() {
        let data = "ID,Name,Amount,Date,Category\nx1,Salary,\"$3,000.00\",2025-01-01,Salary\nx2,Rent,(1200),2025-01-02,Housing\n";
        let txs = parse_csv(data.as_bytes()).unwrap();
        assert_eq!(txs[0].id, "x1");
        assert_eq!(txs[0].amount, 3000.0);
        assert_eq!(txs[1].amount, -1200.0);
    }

    #[test]
    fn test_parse_csv_missing_column() {
        let data = "name,amount,date\nLunch,10,2025-01-01\n";
        let err = parse_csv(data.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("category"));
    }

    #[test]
    fn test_parse_csv_bad_amount_reports_line() {
        let data = "name,amount,date,category\nLunch,ten,2025-01-01,Food\n";
        let err = parse_csv(data.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("Line 2"));
    }

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("42").unwrap(), 42.0);
        assert_eq!(parse_amount("-5.25").unwrap(), -5.25);
        assert_eq!(parse_amount("₹1,250.50").unwrap(), 1250.5);
        assert_eq!(parse_amount("(10.00)").unwrap(), -10.0);
        assert!(parse_amount("").is_err());
        assert!(parse_amount("abc").is_err());
    }

    #[test]
    fn test_file_format_from_path() {
        assert_eq!(
            FileFormat::from_path(Path::new("a/b.CSV")).unwrap(),
            FileFormat::Csv
        );
        assert_eq!(
            FileFormat::from_path(Path::new("ledger.json")).unwrap(),
            FileFormat::Json
        );
        assert!(FileFormat::from_path(Path::new("notes.txt")).is_err());
    }

    #[test]
    fn test_load_transactions_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("expenses.json");
        std::fs::write(
            &path,
            r#"[{"name": "Lunch", "amount": 10, "date": "2025-01-01", "category": "Food"}]"#,
        )
        .unwrap();
        let txs = load_transactions(&path).unwrap();
        assert_eq!(txs.len(), 1);
        assert_eq!(txs[0].category, "Food");
    }

    #[test]
    fn test_load_budgets_csv_and_json() {
        let dir = tempfile::tempdir().unwrap();
        let csv_path = dir.path().join("budgets.csv");
        std::fs::write(&csv_path, "category,amount,period\nFood,500,monthly\nBills,200,weekly\n")
            .unwrap();
        let budgets = load_budgets(&csv_path).unwrap();
        assert_eq!(budgets.len(), 2);
        assert_eq!(budgets[0], Budget::monthly("Food", 500.0));
        assert_eq!(budgets[1].period, crate::models::BudgetPeriod::Weekly);

        let json_path = dir.path().join("budgets.json");
        std::fs::write(&json_path, r#"[{"category": "Food", "amount": 300}]"#).unwrap();
        let budgets = load_budgets(&json_path).unwrap();
        assert_eq!(budgets[0].amount, 300.0);
        assert!(budgets[0].id.is_empty());
    }
}
