use chrono::NaiveDate;
use money::Decimal;
use sha1::{Digest, Sha1};

use crate::category::Category;

/// The normalized view every imported record exposes, regardless of which
/// bank export it came from. All accessors are pure.
pub trait Transaction {
    /// A stable identifier used to filter out duplicates when overlapping
    /// export windows are imported more than once.
    ///
    /// Sources without a native identifier implement this with
    /// [`content_hash`].
    fn id(&self) -> String;

    /// Spending category; the default for sources that carry none.
    fn category(&self) -> Category;

    /// Day the transaction occurred. `NaiveDate::default()` (1970-01-01)
    /// stands in for a date the source failed to deliver.
    fn date(&self) -> NaiveDate;

    /// Settlement (valuta) day, distinct from `date`.
    fn valuta_date(&self) -> NaiveDate;

    /// IBAN or other identifier of the local account. For credit card
    /// records this is a card number.
    fn local_account(&self) -> &str;

    /// IBAN of the other side, empty when the source has none (typical for
    /// card payments).
    fn remote_account(&self) -> &str;

    /// Name of the other side. When matching keywords for categorization,
    /// check both this and `reference_text`; exports sometimes drop spaces,
    /// so compare with and without them.
    fn remote_name(&self) -> String;

    /// Free-text purpose of the transaction.
    fn reference_text(&self) -> String;

    /// Signed amount in the source's own sign convention (negative is an
    /// outflow). Never normalized across sources.
    fn amount(&self) -> Decimal;

    /// Multi-letter currency code like `EUR`. The credit-card source also
    /// emits the synthetic points marker `A` for loyalty-point lines.
    fn currency(&self) -> &str;
}

/// A transaction whose name and purpose fields arrive split over several
/// lines. The flat `remote_name`/`reference_text` accessors return the
/// lines joined with no separator, so consumers that only want the flat
/// view never need to know the source format.
pub trait MultilineTransaction: Transaction {
    fn remote_names(&self) -> &[String];

    fn purposes(&self) -> &[String];
}

/// Content hash identity for sources without native transaction IDs.
///
/// The seven semantic fields are serialized canonically (dates as
/// `%Y-%m-%d`, the amount via its `Display` form) and fed to SHA-1 in a
/// fixed order with no delimiter; field boundaries do not need to be
/// recoverable, only the aggregate digest. Records agreeing in all seven
/// fields collapse to one identity, which is exactly the dedup behavior
/// wanted here.
pub fn content_hash<T: Transaction + ?Sized>(transaction: &T) -> String {
    let mut hasher = Sha1::new();
    hasher.update(transaction.date().format("%Y-%m-%d").to_string());
    hasher.update(transaction.valuta_date().format("%Y-%m-%d").to_string());
    hasher.update(transaction.local_account());
    hasher.update(transaction.remote_name());
    hasher.update(transaction.remote_account());
    hasher.update(transaction.reference_text());
    hasher.update(transaction.amount().to_string());
    hex::encode(hasher.finalize())
}
