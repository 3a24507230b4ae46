use std::fs::File;
use std::path::Path;
use std::sync::LazyLock;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord};
use money::Decimal;
use regex::Regex;

use crate::category::Category;
use crate::transaction::{content_hash, Transaction};
use crate::ImportLog;

/// Currency marker the LBB export uses for Amazon loyalty points instead of
/// an ISO code.
pub const POINTS_CURRENCY: &str = "A";

// A loose match first, then the two known line layouts. The newer exports
// dropped the ".DE" country suffix, so that variant is tried first. Do not
// add further variants without a ledger-level decision; these lines must
// stay distinguishable from ordinary purchases.
static POINTS_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[+-] .* AMAZON(\.DE)? PUNKTE").unwrap());
static POINTS_NEW: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([+-]) (\d+)\.0 AMAZON PUNKTE$").unwrap());
static POINTS_OLD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([+-]) (\d+)\.0 AMAZON\.DE PUNKTE$").unwrap());

/// One row of the Landesbank Berlin credit card export (Amazon cards).
#[derive(Debug, Clone)]
pub struct LbbTransaction {
    card_number: String,
    date: NaiveDate,
    valuta_date: NaiveDate,
    merchant: String,
    amount: Decimal,
    currency: String,
}

impl Transaction for LbbTransaction {
    fn id(&self) -> String {
        content_hash(self)
    }

    fn category(&self) -> Category {
        Category::default()
    }

    fn date(&self) -> NaiveDate {
        self.date
    }

    fn valuta_date(&self) -> NaiveDate {
        self.valuta_date
    }

    fn local_account(&self) -> &str {
        &self.card_number
    }

    fn remote_account(&self) -> &str {
        ""
    }

    fn remote_name(&self) -> String {
        self.merchant.clone()
    }

    fn reference_text(&self) -> String {
        String::new()
    }

    fn amount(&self) -> Decimal {
        self.amount
    }

    fn currency(&self) -> &str {
        &self.currency
    }
}

fn parse_date(text: &str, log: &mut dyn ImportLog) -> NaiveDate {
    match NaiveDate::parse_from_str(text, "%d.%m.%Y") {
        Ok(date) => date,
        Err(err) => {
            log.warn(format!("lbb: could not parse date '{text}': {err}"));
            NaiveDate::default()
        }
    }
}

fn parse_record(record: &StringRecord, log: &mut dyn ImportLog) -> Option<LbbTransaction> {
    let card_number = record.get(0).unwrap_or("").to_string();
    let valuta_date = parse_date(record.get(1).unwrap_or(""), log);
    let date = parse_date(record.get(2).unwrap_or(""), log);
    let subject = record.get(3).unwrap_or("");

    if POINTS_LINE.is_match(subject) {
        let trimmed = subject.trim();
        let captures = POINTS_NEW
            .captures(trimmed)
            .or_else(|| POINTS_OLD.captures(trimmed));
        let Some(captures) = captures else {
            log.warn(format!("lbb: unrecognized points line '{subject}'"));
            return None;
        };
        let points: i64 = match captures[2].parse() {
            Ok(points) => points,
            Err(err) => {
                log.warn(format!("lbb: bad points value in '{subject}': {err}"));
                return None;
            }
        };
        let mut amount = Decimal::from_minor_units(points * 100);
        if &captures[1] == "-" {
            amount = -amount;
        }
        return Some(LbbTransaction {
            card_number,
            date,
            valuta_date,
            merchant: "AMAZON PUNKTE".to_string(),
            amount,
            currency: POINTS_CURRENCY.to_string(),
        });
    }

    // Ordinary purchase; the amount column uses a comma as the decimal
    // separator.
    let amount_text = record.get(6).unwrap_or("").replacen(',', ".", 1);
    let amount: Decimal = match amount_text.parse() {
        Ok(amount) => amount,
        Err(err) => {
            log.warn(format!(
                "lbb: dropping record with bad amount '{amount_text}': {err}"
            ));
            return None;
        }
    };
    Some(LbbTransaction {
        card_number,
        date,
        valuta_date,
        merchant: subject.to_string(),
        amount,
        currency: "EUR".to_string(),
    })
}

/// Parses a headerless semicolon CSV exported by the Landesbank Berlin for
/// their Amazon credit cards, in file order.
///
/// The export mixes a summary section into the file; only rows whose first
/// column starts with a digit are transaction rows.
pub fn parse_file<P: AsRef<Path>>(path: P, log: &mut dyn ImportLog) -> Result<Vec<LbbTransaction>> {
    let path = path.as_ref();
    let file = File::open(path).with_context(|| format!("cannot open {}", path.display()))?;
    let mut reader = ReaderBuilder::new()
        .delimiter(b';')
        .has_headers(false)
        .flexible(true)
        .from_reader(file);

    let mut transactions = Vec::new();
    for record in reader.records() {
        let record =
            record.with_context(|| format!("cannot read record in {}", path.display()))?;
        let first = record.get(0).unwrap_or("");
        if !first.starts_with(|c: char| c.is_ascii_digit()) {
            continue;
        }
        if let Some(transaction) = parse_record(&record, log) {
            transactions.push(transaction);
        }
    }
    Ok(transactions)
}
