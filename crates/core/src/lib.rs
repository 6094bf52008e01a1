pub mod document;
pub mod money;
pub mod transaction;

pub use document::{DocumentType, FieldMap, FieldValue};
pub use money::Money;
pub use transaction::{sort_chronologically, TransactionRecord, TransactionType, UNKNOWN_COUNTERPARTY};
