//! Utility functions for conversions and display formatting.

pub mod conversion;
pub mod formatting;

pub use conversion::{parse_address, scale_down, u256_to_bigint};
pub use formatting::{truncate_id, with_0x_prefix, without_0x_prefix};
