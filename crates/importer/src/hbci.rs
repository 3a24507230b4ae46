use std::collections::HashMap;
use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord};
use money::Decimal;

use crate::category::Category;
use crate::transaction::{content_hash, MultilineTransaction, Transaction};
use crate::ImportLog;

/// One row of an `aqbanking-cli listtrans` export. Name and purpose come
/// split over numbered columns, so both are kept as line sequences.
#[derive(Debug, Clone)]
pub struct HbciTransaction {
    local_account: String,
    remote_account: String,
    remote_names: Vec<String>,
    purposes: Vec<String>,
    amount: Decimal,
    currency: String,
    date: NaiveDate,
    valuta_date: NaiveDate,
}

impl Transaction for HbciTransaction {
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
        &self.local_account
    }

    fn remote_account(&self) -> &str {
        &self.remote_account
    }

    fn remote_name(&self) -> String {
        self.remote_names.concat()
    }

    fn reference_text(&self) -> String {
        self.purposes.concat()
    }

    fn amount(&self) -> Decimal {
        self.amount
    }

    fn currency(&self) -> &str {
        &self.currency
    }
}

impl MultilineTransaction for HbciTransaction {
    fn remote_names(&self) -> &[String] {
        &self.remote_names
    }

    fn purposes(&self) -> &[String] {
        &self.purposes
    }
}

fn field<'a>(columns: &HashMap<String, usize>, record: &'a StringRecord, name: &str) -> &'a str {
    columns
        .get(name)
        .and_then(|&index| record.get(index))
        .unwrap_or("")
}

/// Collects `base`, `base1`, `base2`, ... by probing numeric suffixes until
/// a column is missing. A present-but-empty value is skipped without
/// stopping the probe.
fn collect_lines(
    columns: &HashMap<String, usize>,
    record: &StringRecord,
    base: &str,
) -> Vec<String> {
    let mut lines = vec![field(columns, record, base).to_string()];
    for suffix in 1.. {
        let Some(&index) = columns.get(&format!("{base}{suffix}")) else {
            break;
        };
        let value = record.get(index).unwrap_or("");
        if !value.is_empty() {
            lines.push(value.to_string());
        }
    }
    lines
}

fn parse_date(text: &str, log: &mut dyn ImportLog) -> NaiveDate {
    match NaiveDate::parse_from_str(text, "%Y/%m/%d") {
        Ok(date) => date,
        Err(err) => {
            // Best effort: keep the record, report the broken date.
            log.warn(format!("hbci: could not parse date '{text}': {err}"));
            NaiveDate::default()
        }
    }
}

/// Parses a semicolon CSV generated by `aqbanking-cli listtrans` into
/// transactions in file order.
///
/// The header row is mandatory; a file whose header cannot be read aborts
/// the import. Records with an unparseable amount are dropped with a log
/// entry, records with an unparseable date are kept with the zero date.
pub fn parse_file<P: AsRef<Path>>(
    path: P,
    log: &mut dyn ImportLog,
) -> Result<Vec<HbciTransaction>> {
    let path = path.as_ref();
    let file = File::open(path).with_context(|| format!("cannot open {}", path.display()))?;
    let mut reader = ReaderBuilder::new()
        .delimiter(b';')
        .has_headers(true)
        .flexible(true)
        .from_reader(file);

    let headers = reader
        .headers()
        .with_context(|| format!("cannot read header row of {}", path.display()))?
        .clone();
    let mut columns: HashMap<String, usize> = HashMap::new();
    for (index, name) in headers.iter().enumerate() {
        columns.insert(name.to_string(), index);
    }

    let mut transactions = Vec::new();
    for record in reader.records() {
        let record =
            record.with_context(|| format!("cannot read record in {}", path.display()))?;

        let amount_text = field(&columns, &record, "value_value");
        let amount: Decimal = match amount_text.parse() {
            Ok(amount) => amount,
            Err(err) => {
                log.warn(format!(
                    "hbci: dropping record with bad amount '{amount_text}': {err}"
                ));
                continue;
            }
        };

        transactions.push(HbciTransaction {
            local_account: field(&columns, &record, "localAccountNumber").to_string(),
            remote_account: field(&columns, &record, "remoteAccountNumber").to_string(),
            remote_names: collect_lines(&columns, &record, "remoteName"),
            purposes: collect_lines(&columns, &record, "purpose"),
            amount,
            currency: field(&columns, &record, "value_currency").to_string(),
            date: parse_date(field(&columns, &record, "date"), log),
            valuta_date: parse_date(field(&columns, &record, "valutadate"), log),
        });
    }
    Ok(transactions)
}
