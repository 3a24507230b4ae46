use std::collections::HashSet;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::Parser;
use importer::{Record, Source, StderrLog, Transaction};
use ledger::{Entry, Posting};
use money::Decimal;

/// Convert bank export files into plain-text ledger entries.
#[derive(Parser)]
#[command(name = "bank2ledger")]
struct Args {
    /// Export format: hbci, lbb or n26
    format: String,
    /// Export files, imported in the given order
    files: Vec<PathBuf>,
}

fn entry_for(record: &Record) -> Entry {
    let mut description = record.remote_name();
    let reference = record.reference_text();
    if !reference.is_empty() {
        if !description.is_empty() {
            description.push(' ');
        }
        description.push_str(&reference);
    }
    Entry {
        date: record.date(),
        valuta_date: record.valuta_date(),
        description,
        postings: vec![Posting {
            account: record.local_account().to_string(),
            value: record.amount(),
            currency: record.currency().to_string(),
            at_value: Decimal::ZERO,
            at_currency: String::new(),
        }],
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    let Some(source) = Source::from_name(&args.format) else {
        bail!("unknown format '{}', expected hbci, lbb or n26", args.format);
    };
    if args.files.is_empty() {
        bail!("no export files given");
    }

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    let mut log = StderrLog;
    // Export windows overlap between downloads; the identity is what makes
    // re-importing them safe.
    let mut seen: HashSet<String> = HashSet::new();

    for path in &args.files {
        for record in importer::parse_file(source, path, &mut log)? {
            if !seen.insert(record.id()) {
                continue;
            }
            entry_for(&record).write_to(&mut out)?;
        }
    }
    out.flush()?;
    Ok(())
}
