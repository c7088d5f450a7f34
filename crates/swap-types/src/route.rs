//! Route plans and quotes.
//!
//! A route is one or two hops through fee-tiered pools. Two-hop routes go
//! through the intermediate asset (the network's wrapped native token).

use crate::fee::FeeTier;
use alloy_primitives::{Address, U256};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Errors raised when assembling a route plan.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RouteError {
	#[error("Route must have one or two legs, got {0}")]
	InvalidLegCount(usize),
	#[error("Route legs do not chain: {0} != {1}")]
	Disconnected(Address, Address),
}

/// One hop through one pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteLeg {
	pub token_in: Address,
	pub token_out: Address,
	pub fee_tier: FeeTier,
}

impl RouteLeg {
	pub fn new(token_in: Address, token_out: Address, fee_tier: FeeTier) -> Self {
		Self {
			token_in,
			token_out,
			fee_tier,
		}
	}
}

impl fmt::Display for RouteLeg {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{} -[{}]-> {}", self.token_in, self.fee_tier, self.token_out)
	}
}

/// Ordered legs of a quote: one for a direct pool, two through the
/// intermediate asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutePlan {
	legs: Vec<RouteLeg>,
}

impl RoutePlan {
	pub fn direct(leg: RouteLeg) -> Self {
		Self { legs: vec![leg] }
	}

	pub fn two_hop(first: RouteLeg, second: RouteLeg) -> Result<Self, RouteError> {
		Self::from_legs(vec![first, second])
	}

	pub fn from_legs(legs: Vec<RouteLeg>) -> Result<Self, RouteError> {
		if legs.is_empty() || legs.len() > 2 {
			return Err(RouteError::InvalidLegCount(legs.len()));
		}
		if let [first, second] = legs.as_slice() {
			if first.token_out != second.token_in {
				return Err(RouteError::Disconnected(first.token_out, second.token_in));
			}
		}
		Ok(Self { legs })
	}

	pub fn legs(&self) -> &[RouteLeg] {
		&self.legs
	}

	pub fn is_direct(&self) -> bool {
		self.legs.len() == 1
	}

	/// Fee tiers used, in hop order.
	pub fn fee_tiers(&self) -> Vec<FeeTier> {
		self.legs.iter().map(|leg| leg.fee_tier).collect()
	}
}

/// Output of a single-pool quote, in the output token's base units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
	pub amount_out: U256,
	pub fee_tier: FeeTier,
}

#[cfg(test)]
mod tests {
	use super::*;

	fn addr(byte: u8) -> Address {
		Address::repeat_byte(byte)
	}

	#[test]
	fn test_two_hop_must_chain() {
		let first = RouteLeg::new(addr(1), addr(2), FeeTier::Medium);
		let second = RouteLeg::new(addr(2), addr(3), FeeTier::Low);
		let plan = RoutePlan::two_hop(first, second).unwrap();
		assert!(!plan.is_direct());
		assert_eq!(plan.fee_tiers(), vec![FeeTier::Medium, FeeTier::Low]);

		let broken = RouteLeg::new(addr(9), addr(3), FeeTier::Low);
		assert_eq!(
			RoutePlan::two_hop(first, broken),
			Err(RouteError::Disconnected(addr(2), addr(9)))
		);
	}

	#[test]
	fn test_leg_count_bounds() {
		assert_eq!(
			RoutePlan::from_legs(vec![]),
			Err(RouteError::InvalidLegCount(0))
		);
		let leg = RouteLeg::new(addr(1), addr(1), FeeTier::High);
		assert_eq!(
			RoutePlan::from_legs(vec![leg; 3]),
			Err(RouteError::InvalidLegCount(3))
		);
		assert!(RoutePlan::direct(leg).is_direct());
	}
}
