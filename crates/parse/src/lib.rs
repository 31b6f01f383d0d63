pub mod clock;
pub mod engine;
pub mod error;
pub mod matcher;
pub mod normalize;
pub mod payee;

pub use clock::{Clock, FixedClock, SystemClock};
pub use engine::ParseEngine;
pub use error::ParseError;
pub use matcher::{builtin_rules, CaptureSet, FieldBinding, FieldMap, FormatMatch, FormatRule, FormatTable};
pub use payee::{builtin_payees, NormalizedPayee, PayeeMatch, PayeeRule, PayeeTable};
