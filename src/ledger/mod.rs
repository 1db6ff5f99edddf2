//! Ledger domain models, the recurrence engine, and the in-memory store.

pub mod budget;
pub mod category;
#[allow(clippy::module_inception)]
pub mod ledger;
pub mod recurrence;
pub mod recurring;
pub mod time;
pub mod transaction;

pub use budget::Budget;
pub use category::{Category, CategoryKind, DEFAULT_CATEGORIES};
pub use ledger::Ledger;
pub use recurrence::{Frequency, RecurrencePreset, RecurrenceRule};
pub use recurring::{Materialize, RecurrenceEngine, TailRegeneration, MAX_GENERATED_OCCURRENCES};
pub use time::{month_start, DateWindow};
pub use transaction::Transaction;
