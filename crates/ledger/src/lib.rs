//! Rendering of normalized transactions into the plain-text ledger entry
//! format:
//!
//! ```text
//! YYYY/MM/DD[=YYYY/MM/DD] <description>
//!     <account>  <amount> <currency>[ @ <amount> <currency>]
//! ```

use std::io::{self, Write};

use chrono::NaiveDate;
use money::Decimal;

/// One account movement inside a ledger entry.
#[derive(Debug, Clone, Default)]
pub struct Posting {
    pub account: String,
    pub value: Decimal,
    pub currency: String,
    /// Secondary valuation, e.g. the original amount of a foreign-currency
    /// purchase. Rendered as an `@` clause when non-zero.
    pub at_value: Decimal,
    pub at_currency: String,
}

/// A ledger entry: a date line followed by indented postings.
#[derive(Debug, Clone, Default)]
pub struct Entry {
    pub date: NaiveDate,
    pub valuta_date: NaiveDate,
    pub description: String,
    pub postings: Vec<Posting>,
}

impl Entry {
    pub fn write_to<W: Write>(&self, w: &mut W) -> io::Result<()> {
        // 1970-01-01 is the placeholder for dates the import could not
        // deliver; the `=` form is only worth printing for two real,
        // different dates.
        let zero = NaiveDate::default();
        if self.date != zero && self.valuta_date != zero && self.date != self.valuta_date {
            write!(
                w,
                "{}={}",
                self.date.format("%Y/%m/%d"),
                self.valuta_date.format("%Y/%m/%d")
            )?;
        } else if self.date != zero {
            write!(w, "{}", self.date.format("%Y/%m/%d"))?;
        } else if self.valuta_date != zero {
            write!(w, "{}", self.valuta_date.format("%Y/%m/%d"))?;
        } else {
            write!(w, "{}", zero.format("%Y/%m/%d"))?;
        }
        writeln!(w, " {}", self.description)?;

        for posting in &self.postings {
            if posting.at_value.is_zero() {
                writeln!(
                    w,
                    "    {}  {} {}",
                    posting.account, posting.value, posting.currency
                )?;
            } else {
                writeln!(
                    w,
                    "    {}  {} {} @ {} {}",
                    posting.account,
                    posting.value,
                    posting.currency,
                    posting.at_value,
                    posting.at_currency
                )?;
            }
        }
        writeln!(w)
    }
}
