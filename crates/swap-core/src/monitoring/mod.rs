//! Monitoring of submitted transactions.

pub mod confirmation;

pub use confirmation::{ConfirmationPoller, Sleeper, TokioSleeper};
