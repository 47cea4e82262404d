pub mod amount;
pub mod link;
pub mod transaction;

pub use amount::Amount;
pub use link::{LinkToken, PaymentLink};
pub use transaction::{Transaction, TransactionId, TransactionStatus};
