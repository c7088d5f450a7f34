//! Pool fee tiers.
//!
//! Liquidity for a token pair is split across pools that charge different
//! swap fees. The quoter addresses a pool by its fee in hundredths of a basis
//! point, so only the three values below are valid.

use crate::abi::AbiError;
use alloy_primitives::aliases::U24;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Fee class of a liquidity pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub enum FeeTier {
	/// 0.05% pools.
	Low,
	/// 0.30% pools.
	Medium,
	/// 1.00% pools.
	High,
}

/// Order in which the tier-selection policies query pools (not numeric).
pub const FEE_TIER_ORDER: [FeeTier; 3] = [FeeTier::Medium, FeeTier::High, FeeTier::Low];

/// Chain walked by the retrying single-hop quote after a revert.
pub static FEE_TIER_FALLBACK: [FeeTier; 3] = [FeeTier::Medium, FeeTier::High, FeeTier::Low];

impl FeeTier {
	/// Raw fee in hundredths of a basis point, as passed to the quoter.
	pub const fn as_u32(self) -> u32 {
		match self {
			FeeTier::Low => 500,
			FeeTier::Medium => 3000,
			FeeTier::High => 10000,
		}
	}

	/// The fee as the quoter's `uint24` argument.
	pub fn as_u24(self) -> U24 {
		U24::saturating_from(self.as_u32())
	}

	/// Remaining fallback tiers, starting at `self`.
	///
	/// A tier that is not part of the chain yields an empty slice.
	pub fn fallback_from(self) -> &'static [FeeTier] {
		match FEE_TIER_FALLBACK.iter().position(|tier| *tier == self) {
			Some(idx) => &FEE_TIER_FALLBACK[idx..],
			None => &[],
		}
	}
}

impl TryFrom<u32> for FeeTier {
	type Error = AbiError;

	fn try_from(value: u32) -> Result<Self, Self::Error> {
		match value {
			500 => Ok(FeeTier::Low),
			3000 => Ok(FeeTier::Medium),
			10000 => Ok(FeeTier::High),
			other => Err(AbiError::UnknownFeeTier(other)),
		}
	}
}

impl From<FeeTier> for u32 {
	fn from(tier: FeeTier) -> Self {
		tier.as_u32()
	}
}

impl fmt::Display for FeeTier {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.as_u32())
	}
}
