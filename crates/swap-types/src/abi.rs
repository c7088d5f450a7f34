//! Fixed-layout ABI codec for the quoter contract.
//!
//! The quoting path never goes through generated bindings: the call payload
//! is assembled word by word and the return value is read straight from the
//! first 32-byte word. Every argument occupies exactly one word, so a quote
//! call is always `4 + 32 * 5` bytes long.

use crate::fee::FeeTier;
use crate::utils::without_0x_prefix;
use alloy_primitives::aliases::U24;
use alloy_primitives::{keccak256, Address, U256};
use num_bigint::BigUint;
use thiserror::Error;

/// Signature of the single-pool exact-input quote function.
pub const QUOTE_EXACT_INPUT_SINGLE: &str =
	"quoteExactInputSingle(address,address,uint24,uint256,uint160)";

/// Length of an encoded quote call: selector plus five argument words.
pub const QUOTE_CALL_LEN: usize = 4 + 32 * 5;

const WORD: usize = 32;

/// Errors raised while encoding call data or decoding return data.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AbiError {
	/// The input to decode was empty.
	#[error("Encoding error: empty input")]
	EmptyInput,
	/// Hex text with an odd number of digits.
	#[error("Encoding error: odd-length hex string ({0} digits)")]
	OddLength(usize),
	/// Hex text containing non-hex characters.
	#[error("Encoding error: invalid hex: {0}")]
	InvalidHex(String),
	/// Amount wider than a 256-bit word.
	#[error("Encoding error: amount needs {0} bytes, at most 32 allowed")]
	AmountOverflow(usize),
	/// Fee value outside the supported tier set.
	#[error("Encoding error: unsupported fee tier {0}")]
	UnknownFeeTier(u32),
	/// Payload length does not match the fixed layout.
	#[error("Encoding error: expected {expected} bytes, got {actual}")]
	InvalidLength { expected: usize, actual: usize },
	/// Payload does not start with the expected function selector.
	#[error("Encoding error: unexpected selector 0x{0}")]
	SelectorMismatch(String),
	/// Non-zero bytes where a word must be left-padded with zeros.
	#[error("Encoding error: dirty padding in word {0}")]
	DirtyPadding(usize),
}

/// Returns the 4-byte selector of [`QUOTE_EXACT_INPUT_SINGLE`].
pub fn quote_selector() -> [u8; 4] {
	let hash = keccak256(QUOTE_EXACT_INPUT_SINGLE.as_bytes());
	[hash[0], hash[1], hash[2], hash[3]]
}

/// Call-data builder that only ever appends whole 32-byte words.
///
/// After the selector every push adds exactly one word, so
/// `len() == 4 + 32 * words()` holds at all times.
#[derive(Debug, Clone)]
pub struct WordBuffer {
	buf: Vec<u8>,
	words: usize,
}

impl WordBuffer {
	pub fn new(selector: [u8; 4]) -> Self {
		let mut buf = Vec::with_capacity(QUOTE_CALL_LEN);
		buf.extend_from_slice(&selector);
		Self { buf, words: 0 }
	}

	pub fn push_word(&mut self, word: [u8; WORD]) {
		self.buf.extend_from_slice(&word);
		self.words += 1;
	}

	/// Appends an address left-padded with 12 zero bytes.
	pub fn push_address(&mut self, addr: &Address) {
		let mut word = [0u8; WORD];
		word[12..].copy_from_slice(addr.as_slice());
		self.push_word(word);
	}

	/// Appends a `uint24` as a big-endian value right-aligned in a word.
	pub fn push_uint24(&mut self, value: U24) {
		let mut word = [0u8; WORD];
		word[WORD - 3..].copy_from_slice(&value.to_be_bytes::<3>());
		self.push_word(word);
	}

	pub fn push_u256(&mut self, value: U256) {
		self.push_word(value.to_be_bytes::<WORD>());
	}

	pub fn push_zero(&mut self) {
		self.push_word([0u8; WORD]);
	}

	pub fn words(&self) -> usize {
		self.words
	}

	pub fn len(&self) -> usize {
		self.buf.len()
	}

	pub fn is_empty(&self) -> bool {
		self.buf.is_empty()
	}

	pub fn finish(self) -> Vec<u8> {
		self.buf
	}
}

/// Encodes a single-pool exact-input quote call.
///
/// Layout: selector, `token_in`, `token_out`, fee tier as `uint24`,
/// `amount_in` as `uint256`, and a zero price limit.
pub fn encode_quote_call(
	token_in: &Address,
	token_out: &Address,
	fee_tier: FeeTier,
	amount_in: U256,
) -> Vec<u8> {
	let mut buf = WordBuffer::new(quote_selector());
	buf.push_address(token_in);
	buf.push_address(token_out);
	buf.push_uint24(fee_tier.as_u24());
	buf.push_u256(amount_in);
	buf.push_zero();
	buf.finish()
}

/// Same as [`encode_quote_call`] for an unbounded amount.
///
/// Fails when `amount_in` needs more than 256 bits.
pub fn encode_quote_call_checked(
	token_in: &Address,
	token_out: &Address,
	fee_tier: FeeTier,
	amount_in: &BigUint,
) -> Result<Vec<u8>, AbiError> {
	let bytes = amount_in.to_bytes_be();
	if bytes.len() > WORD {
		return Err(AbiError::AmountOverflow(bytes.len()));
	}
	Ok(encode_quote_call(
		token_in,
		token_out,
		fee_tier,
		U256::from_be_slice(&bytes),
	))
}

/// Fields of a decoded quote call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuoteCall {
	pub token_in: Address,
	pub token_out: Address,
	pub fee_tier: FeeTier,
	pub amount_in: U256,
}

/// Parses a payload produced by [`encode_quote_call`].
pub fn decode_quote_call(data: &[u8]) -> Result<QuoteCall, AbiError> {
	if data.len() != QUOTE_CALL_LEN {
		return Err(AbiError::InvalidLength {
			expected: QUOTE_CALL_LEN,
			actual: data.len(),
		});
	}
	if data[..4] != quote_selector() {
		return Err(AbiError::SelectorMismatch(hex::encode(&data[..4])));
	}

	let word = |idx: usize| &data[4 + idx * WORD..4 + (idx + 1) * WORD];
	let address_at = |idx: usize| -> Result<Address, AbiError> {
		let w = word(idx);
		if w[..12].iter().any(|b| *b != 0) {
			return Err(AbiError::DirtyPadding(idx));
		}
		Ok(Address::from_slice(&w[12..]))
	};

	let fee_word = word(2);
	if fee_word[..29].iter().any(|b| *b != 0) {
		return Err(AbiError::DirtyPadding(2));
	}
	let fee = u32::from_be_bytes([0, fee_word[29], fee_word[30], fee_word[31]]);

	if word(4).iter().any(|b| *b != 0) {
		return Err(AbiError::DirtyPadding(4));
	}

	Ok(QuoteCall {
		token_in: address_at(0)?,
		token_out: address_at(1)?,
		fee_tier: FeeTier::try_from(fee)?,
		amount_in: U256::from_be_slice(word(3)),
	})
}

/// Decodes a hex-encoded `uint256` return value.
///
/// Accepts an optional `0x`/`0X` prefix. Empty input and malformed hex are
/// errors, never zero.
pub fn decode_amount(text: &str) -> Result<U256, AbiError> {
	let digits = without_0x_prefix(text);
	if digits.is_empty() {
		return Err(AbiError::EmptyInput);
	}
	if digits.len() % 2 != 0 {
		return Err(AbiError::OddLength(digits.len()));
	}
	let bytes = hex::decode(digits).map_err(|e| AbiError::InvalidHex(e.to_string()))?;
	decode_amount_bytes(&bytes)
}

/// Decodes a big-endian `uint256` from raw return data.
///
/// The reply must hold at least one whole word. Only the first word is
/// read; quoters that return extra values (gas estimates, tick counts) are
/// handled transparently.
pub fn decode_amount_bytes(bytes: &[u8]) -> Result<U256, AbiError> {
	if bytes.is_empty() {
		return Err(AbiError::EmptyInput);
	}
	match bytes.get(..WORD) {
		Some(word) => Ok(U256::from_be_slice(word)),
		None => Err(AbiError::InvalidLength {
			expected: WORD,
			actual: bytes.len(),
		}),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use alloy_primitives::address;

	const WETH: Address = address!("c02aaa39b223fe8d0a0e5c4f27ead9083c756cc2");
	const USDC: Address = address!("a0b86991c6218b36c1d19d4a2e9eb0ce3606eb48");

	#[test]
	fn test_quote_selector() {
		assert_eq!(hex::encode(quote_selector()), "f7729d43");
	}

	#[test]
	fn test_word_buffer_alignment() {
		let mut buf = WordBuffer::new([0xde, 0xad, 0xbe, 0xef]);
		assert_eq!(buf.len(), 4);
		assert_eq!(buf.words(), 0);

		buf.push_address(&WETH);
		buf.push_uint24(U24::from(3000u32));
		buf.push_u256(U256::MAX);
		buf.push_zero();

		assert_eq!(buf.words(), 4);
		assert_eq!(buf.len(), 4 + 32 * buf.words());
	}

	#[test]
	fn test_push_uint24_fills_low_bytes() {
		let mut buf = WordBuffer::new([0; 4]);
		buf.push_uint24(U24::MAX);
		buf.push_uint24(FeeTier::High.as_u24());

		let data = buf.finish();
		assert_eq!(&data[4..33], &[0u8; 29]);
		assert_eq!(&data[33..36], &[0xff, 0xff, 0xff]);
		// 10000 == 0x002710
		assert_eq!(&data[65..68], &[0x00, 0x27, 0x10]);
	}

	#[test]
	fn test_encode_quote_call_layout() {
		let amount = U256::from(1_000_000_000_000_000_000u128);
		let data = encode_quote_call(&WETH, &USDC, FeeTier::Medium, amount);

		assert_eq!(data.len(), QUOTE_CALL_LEN);
		assert_eq!(data.len(), 164);
		assert_eq!(data[..4], quote_selector());
		assert_eq!(&data[4..16], &[0u8; 12]);
		assert_eq!(&data[16..36], WETH.as_slice());
		assert_eq!(&data[48..68], USDC.as_slice());
		// 3000 == 0x000bb8, right-aligned in the third word.
		assert_eq!(&data[97..100], &[0x00, 0x0b, 0xb8]);
		assert_eq!(&data[132..164], &[0u8; 32]);

		let decoded = decode_quote_call(&data).unwrap();
		assert_eq!(
			decoded,
			QuoteCall {
				token_in: WETH,
				token_out: USDC,
				fee_tier: FeeTier::Medium,
				amount_in: amount,
			}
		);
	}

	#[test]
	fn test_encode_quote_call_checked_overflow() {
		let fits = BigUint::from_bytes_be(&[0xff; 32]);
		let data = encode_quote_call_checked(&WETH, &USDC, FeeTier::High, &fits).unwrap();
		assert_eq!(decode_quote_call(&data).unwrap().amount_in, U256::MAX);

		let too_wide = BigUint::from_bytes_be(&[0x01; 33]);
		assert_eq!(
			encode_quote_call_checked(&WETH, &USDC, FeeTier::High, &too_wide),
			Err(AbiError::AmountOverflow(33))
		);
	}

	#[test]
	fn test_decode_quote_call_rejects_bad_payloads() {
		let data = encode_quote_call(&WETH, &USDC, FeeTier::Low, U256::from(7));

		assert!(matches!(
			decode_quote_call(&data[..100]),
			Err(AbiError::InvalidLength { actual: 100, .. })
		));

		let mut wrong_selector = data.clone();
		wrong_selector[0] ^= 0xff;
		assert!(matches!(
			decode_quote_call(&wrong_selector),
			Err(AbiError::SelectorMismatch(_))
		));

		let mut dirty = data;
		dirty[4] = 1;
		assert_eq!(decode_quote_call(&dirty), Err(AbiError::DirtyPadding(0)));
	}

	#[test]
	fn test_decode_amount_inverts_word_encoding() {
		for value in [
			U256::ZERO,
			U256::from(1),
			U256::from(250_000_000u64),
			U256::from(u128::MAX),
			U256::MAX,
		] {
			let text = format!("0x{}", hex::encode(value.to_be_bytes::<32>()));
			assert_eq!(decode_amount(&text).unwrap(), value);
		}
	}

	#[test]
	fn test_decode_amount_prefix_is_optional() {
		let word = hex::encode(U256::from(42).to_be_bytes::<32>());
		assert_eq!(decode_amount(&word).unwrap(), U256::from(42));
		assert_eq!(
			decode_amount(&format!("0X{}", word)).unwrap(),
			U256::from(42)
		);
	}

	#[test]
	fn test_decode_amount_rejects_malformed_input() {
		assert_eq!(decode_amount(""), Err(AbiError::EmptyInput));
		assert_eq!(decode_amount("0x"), Err(AbiError::EmptyInput));
		assert_eq!(decode_amount("0x123"), Err(AbiError::OddLength(3)));
		assert!(matches!(
			decode_amount("0xzz"),
			Err(AbiError::InvalidHex(_))
		));
	}

	#[test]
	fn test_decode_amount_reads_first_word_only() {
		let mut data = U256::from(99).to_be_bytes::<32>().to_vec();
		data.extend_from_slice(&U256::from(12345).to_be_bytes::<32>());
		assert_eq!(decode_amount_bytes(&data).unwrap(), U256::from(99));
		assert_eq!(decode_amount_bytes(&[]), Err(AbiError::EmptyInput));
	}

	#[test]
	fn test_decode_amount_rejects_partial_word() {
		assert_eq!(
			decode_amount("0x01"),
			Err(AbiError::InvalidLength {
				expected: 32,
				actual: 1
			})
		);
		// A bare `Error(string)` selector is not an amount.
		assert_eq!(
			decode_amount_bytes(&[0x08, 0xc3, 0x79, 0xa0]),
			Err(AbiError::InvalidLength {
				expected: 32,
				actual: 4
			})
		);
		assert!(matches!(
			decode_amount_bytes(&[0u8; 31]),
			Err(AbiError::InvalidLength { actual: 31, .. })
		));
	}
}
