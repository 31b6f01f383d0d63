pub mod money;
pub mod transaction;

pub use money::Milliunits;
pub use transaction::TransactionRecord;
