//! Serde adapters that put `BigDecimal` amounts on the wire as JSON numbers.

use crate::constants::{AMOUNT_SCALE, MAX_AMOUNT};
use bigdecimal::{BigDecimal, ToPrimitive, Zero};
use serde::{de, ser, Deserialize, Deserializer, Serializer};
use std::str::FromStr;

#[derive(Deserialize)]
#[serde(untagged)]
enum RawAmount {
	Number(f64),
	Text(String),
}

fn parse<E: de::Error>(raw: RawAmount) -> Result<BigDecimal, E> {
	match raw {
		RawAmount::Number(value) if value.is_finite() => {
			BigDecimal::from_str(&value.to_string()).map_err(E::custom)
		},
		RawAmount::Number(value) => Err(E::custom(format!("amount is not finite: {}", value))),
		RawAmount::Text(text) => BigDecimal::from_str(text.trim()).map_err(E::custom),
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AmountError {
	#[error("amount cannot be negative")]
	Negative,

	#[error("amount cannot have more than 2 decimal places")]
	TooPrecise,

	#[error("amount must be below 1000000000000")]
	TooLarge,
}

/// Accepts amounts the storage column holds exactly: non-negative, at most
/// [`AMOUNT_SCALE`] decimal places and below [`MAX_AMOUNT`].
pub fn validate(amount: &BigDecimal) -> Result<(), AmountError> {
	if amount < &BigDecimal::zero() {
		return Err(AmountError::Negative);
	}
	let (_, scale) = amount.normalized().as_bigint_and_exponent();
	if scale > AMOUNT_SCALE {
		return Err(AmountError::TooPrecise);
	}
	if amount >= &BigDecimal::from(MAX_AMOUNT) {
		return Err(AmountError::TooLarge);
	}
	Ok(())
}

/// Converts an amount to `f64` for arithmetic and display. `NaN` when out of range.
pub fn to_f64(amount: &BigDecimal) -> f64 {
	amount.to_f64().unwrap_or(f64::NAN)
}

pub mod amount {
	use super::*;

	pub fn serialize<S: Serializer>(value: &BigDecimal, serializer: S) -> Result<S::Ok, S::Error> {
		match value.to_f64() {
			Some(number) => serializer.serialize_f64(number),
			None => Err(ser::Error::custom("amount out of range")),
		}
	}

	pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<BigDecimal, D::Error> {
		parse(RawAmount::deserialize(deserializer)?)
	}
}

pub mod optional_amount {
	use super::*;

	pub fn serialize<S: Serializer>(
		value: &Option<BigDecimal>,
		serializer: S,
	) -> Result<S::Ok, S::Error> {
		match value {
			Some(value) => amount::serialize(value, serializer),
			None => serializer.serialize_none(),
		}
	}

	pub fn deserialize<'de, D: Deserializer<'de>>(
		deserializer: D,
	) -> Result<Option<BigDecimal>, D::Error> {
		Option::<RawAmount>::deserialize(deserializer)?.map(parse).transpose()
	}
}
