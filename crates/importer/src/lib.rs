//! Importers that normalize heterogeneous bank export files (HBCI CSV, LBB
//! credit card CSV, N26 JSON) into one transaction representation with a
//! stable identity per record, so overlapping export windows can be
//! imported repeatedly without creating duplicates.

pub mod category;
pub mod hbci;
pub mod lbb;
pub mod n26;
pub mod transaction;

pub use category::Category;
pub use transaction::{content_hash, MultilineTransaction, Transaction};

use std::path::Path;

use anyhow::Result;
use chrono::NaiveDate;
use money::Decimal;

/// Side channel for recoverable import problems (bad dates, dropped
/// records). Injected so callers decide where warnings go and tests can
/// assert on them.
pub trait ImportLog {
    fn warn(&mut self, message: String);
}

/// Production sink: warnings go to stderr.
pub struct StderrLog;

impl ImportLog for StderrLog {
    fn warn(&mut self, message: String) {
        eprintln!("{message}");
    }
}

/// Collecting sink for tests.
impl ImportLog for Vec<String> {
    fn warn(&mut self, message: String) {
        self.push(message);
    }
}

/// The supported export formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Hbci,
    Lbb,
    N26,
}

impl Source {
    pub fn from_name(name: &str) -> Option<Source> {
        match name {
            "hbci" => Some(Source::Hbci),
            "lbb" => Some(Source::Lbb),
            "n26" => Some(Source::N26),
            _ => None,
        }
    }
}

/// A transaction from any of the supported sources. One variant per
/// format; downstream code works against the `Transaction` trait and never
/// needs to know which.
#[derive(Debug, Clone)]
pub enum Record {
    Hbci(hbci::HbciTransaction),
    Lbb(lbb::LbbTransaction),
    N26(n26::N26Transaction),
}

impl Transaction for Record {
    fn id(&self) -> String {
        match self {
            Record::Hbci(t) => t.id(),
            Record::Lbb(t) => t.id(),
            Record::N26(t) => t.id(),
        }
    }

    fn category(&self) -> Category {
        match self {
            Record::Hbci(t) => t.category(),
            Record::Lbb(t) => t.category(),
            Record::N26(t) => t.category(),
        }
    }

    fn date(&self) -> NaiveDate {
        match self {
            Record::Hbci(t) => t.date(),
            Record::Lbb(t) => t.date(),
            Record::N26(t) => t.date(),
        }
    }

    fn valuta_date(&self) -> NaiveDate {
        match self {
            Record::Hbci(t) => t.valuta_date(),
            Record::Lbb(t) => t.valuta_date(),
            Record::N26(t) => t.valuta_date(),
        }
    }

    fn local_account(&self) -> &str {
        match self {
            Record::Hbci(t) => t.local_account(),
            Record::Lbb(t) => t.local_account(),
            Record::N26(t) => t.local_account(),
        }
    }

    fn remote_account(&self) -> &str {
        match self {
            Record::Hbci(t) => t.remote_account(),
            Record::Lbb(t) => t.remote_account(),
            Record::N26(t) => t.remote_account(),
        }
    }

    fn remote_name(&self) -> String {
        match self {
            Record::Hbci(t) => t.remote_name(),
            Record::Lbb(t) => t.remote_name(),
            Record::N26(t) => t.remote_name(),
        }
    }

    fn reference_text(&self) -> String {
        match self {
            Record::Hbci(t) => t.reference_text(),
            Record::Lbb(t) => t.reference_text(),
            Record::N26(t) => t.reference_text(),
        }
    }

    fn amount(&self) -> Decimal {
        match self {
            Record::Hbci(t) => t.amount(),
            Record::Lbb(t) => t.amount(),
            Record::N26(t) => t.amount(),
        }
    }

    fn currency(&self) -> &str {
        match self {
            Record::Hbci(t) => t.currency(),
            Record::Lbb(t) => t.currency(),
            Record::N26(t) => t.currency(),
        }
    }
}

/// Parses one export file of the given format. Importers share no state;
/// independent files may be parsed concurrently by the caller.
pub fn parse_file<P: AsRef<Path>>(
    source: Source,
    path: P,
    log: &mut dyn ImportLog,
) -> Result<Vec<Record>> {
    Ok(match source {
        Source::Hbci => hbci::parse_file(path, log)?
            .into_iter()
            .map(Record::Hbci)
            .collect(),
        Source::Lbb => lbb::parse_file(path, log)?
            .into_iter()
            .map(Record::Lbb)
            .collect(),
        Source::N26 => n26::parse_file(path)?
            .into_iter()
            .map(Record::N26)
            .collect(),
    })
}
