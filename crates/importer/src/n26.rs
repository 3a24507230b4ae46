use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate};
use money::Decimal;
use serde::Deserialize;

use crate::category::Category;
use crate::transaction::Transaction;

/// One object of an N26 API transaction dump. The dump carries many more
/// fields; only the ones surfaced by the `Transaction` view (plus the
/// pending flag) are deserialized.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct N26Transaction {
    id: String,
    amount: Decimal,
    currency_code: String,
    #[serde(rename = "visibleTS")]
    visible_ts: i64,
    #[serde(rename = "createdTS")]
    created_ts: i64,
    account_id: String,
    #[serde(default)]
    category: String,
    #[serde(default)]
    merchant_name: String,
    #[serde(default)]
    partner_name: String,
    #[serde(default)]
    partner_iban: String,
    #[serde(default)]
    reference_text: String,
    #[serde(default)]
    pending: bool,
}

impl N26Transaction {
    /// Whether the bank still lists this transaction as pending.
    pub fn is_pending(&self) -> bool {
        self.pending
    }
}

fn date_from_millis(millis: i64) -> NaiveDate {
    DateTime::from_timestamp(millis / 1000, 0)
        .map(|timestamp| timestamp.date_naive())
        .unwrap_or_default()
}

impl Transaction for N26Transaction {
    /// The dump carries a native identifier, so no content hash is needed.
    fn id(&self) -> String {
        self.id.clone()
    }

    fn category(&self) -> Category {
        Category::from_source_tag(&self.category)
    }

    fn date(&self) -> NaiveDate {
        date_from_millis(self.visible_ts)
    }

    fn valuta_date(&self) -> NaiveDate {
        date_from_millis(self.created_ts)
    }

    fn local_account(&self) -> &str {
        &self.account_id
    }

    fn remote_account(&self) -> &str {
        &self.partner_iban
    }

    /// Prefers the SEPA partner name over the card merchant name.
    fn remote_name(&self) -> String {
        if !self.partner_name.is_empty() {
            self.partner_name.clone()
        } else if !self.merchant_name.is_empty() {
            self.merchant_name.clone()
        } else {
            String::new()
        }
    }

    fn reference_text(&self) -> String {
        self.reference_text.clone()
    }

    fn amount(&self) -> Decimal {
        self.amount
    }

    fn currency(&self) -> &str {
        &self.currency_code
    }
}

/// Parses an N26 JSON dump (one array of transaction objects).
///
/// The dump lists the newest transaction first; the result is reversed so
/// callers see them oldest first, like the CSV importers.
pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Vec<N26Transaction>> {
    let path = path.as_ref();
    let file = File::open(path).with_context(|| format!("cannot open {}", path.display()))?;
    let mut transactions: Vec<N26Transaction> = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("invalid transaction dump {}", path.display()))?;
    // TODO: skip records that are still pending; needs a dump containing
    // one to confirm they are safe to drop.
    transactions.reverse();
    Ok(transactions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_json(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    const DUMP: &str = r#"[
        {
            "id": "aa3f0fb8",
            "userId": "u-1",
            "type": "PT",
            "amount": -12.5,
            "currencyCode": "EUR",
            "visibleTS": 1577923200000,
            "createdTS": 1578009600000,
            "merchantName": "REWE MARKT",
            "accountId": "acct-1",
            "category": "micro-v2-food-groceries",
            "pending": false
        },
        {
            "id": "bb5e12c0",
            "amount": 1500.0,
            "currencyCode": "EUR",
            "visibleTS": 1577836800000,
            "createdTS": 1577836800000,
            "accountId": "acct-1",
            "category": "micro-v2-income",
            "partnerName": "EMPLOYER GMBH",
            "partnerIban": "DE02120300000000202051",
            "referenceText": "Salary"
        }
    ]"#;

    #[test]
    fn test_result_order_is_reversed() {
        let file = write_json(DUMP);
        let transactions = parse_file(file.path()).unwrap();
        assert_eq!(transactions.len(), 2);
        // The dump lists the newer aa3f0fb8 first, the result must not.
        assert_eq!(transactions[0].id(), "bb5e12c0");
        assert_eq!(transactions[1].id(), "aa3f0fb8");
    }

    #[test]
    fn test_field_mapping() {
        let file = write_json(DUMP);
        let transactions = parse_file(file.path()).unwrap();
        let salary = &transactions[0];
        assert_eq!(salary.local_account(), "acct-1");
        assert_eq!(salary.remote_account(), "DE02120300000000202051");
        assert_eq!(salary.remote_name(), "EMPLOYER GMBH");
        assert_eq!(salary.reference_text(), "Salary");
        assert_eq!(salary.amount(), Decimal::from_minor_units(150000));
        assert_eq!(salary.currency(), "EUR");
        assert_eq!(salary.category(), Category::Income);
        assert_eq!(salary.date(), NaiveDate::from_ymd_opt(2020, 1, 1).unwrap());
        assert_eq!(
            salary.valuta_date(),
            NaiveDate::from_ymd_opt(2020, 1, 1).unwrap()
        );
        assert!(!salary.is_pending());

        let groceries = &transactions[1];
        assert_eq!(groceries.amount(), Decimal::from_minor_units(-1250));
        assert_eq!(groceries.category(), Category::FoodGroceries);
        assert_eq!(groceries.date(), NaiveDate::from_ymd_opt(2020, 1, 2).unwrap());
        assert_eq!(
            groceries.valuta_date(),
            NaiveDate::from_ymd_opt(2020, 1, 3).unwrap()
        );
    }

    #[test]
    fn test_remote_name_prefers_partner_over_merchant() {
        let file = write_json(
            r#"[{
                "id": "x",
                "amount": -1.0,
                "currencyCode": "EUR",
                "visibleTS": 0,
                "createdTS": 0,
                "accountId": "acct-1",
                "merchantName": "MERCHANT",
                "partnerName": "PARTNER"
            }]"#,
        );
        let transactions = parse_file(file.path()).unwrap();
        assert_eq!(transactions[0].remote_name(), "PARTNER");
    }

    #[test]
    fn test_missing_names_give_empty_remote_name() {
        let file = write_json(
            r#"[{
                "id": "x",
                "amount": -1.0,
                "currencyCode": "EUR",
                "visibleTS": 0,
                "createdTS": 0,
                "accountId": "acct-1"
            }]"#,
        );
        let transactions = parse_file(file.path()).unwrap();
        assert_eq!(transactions[0].remote_name(), "");
        assert_eq!(transactions[0].remote_account(), "");
        assert_eq!(transactions[0].reference_text(), "");
    }

    #[test]
    fn test_unknown_category_is_not_an_error() {
        let file = write_json(
            r#"[{
                "id": "x",
                "amount": -1.0,
                "currencyCode": "EUR",
                "visibleTS": 0,
                "createdTS": 0,
                "accountId": "acct-1",
                "category": "micro-v2-unknown-tag"
            }]"#,
        );
        let transactions = parse_file(file.path()).unwrap();
        assert_eq!(transactions[0].category(), Category::Miscellaneous);
    }

    #[test]
    fn test_malformed_dump_is_fatal() {
        let file = write_json(r#"{"not": "an array"}"#);
        assert!(parse_file(file.path()).is_err());
    }
}
