//! Batch and item identifier generation.

// self
use crate::_prelude::*;

/// Identifiers attached to one payout batch.
///
/// Each id is `<prefix>_<unix millis>_<128 random bits in hex>`. The millisecond part keeps ids
/// sortable by submission time; the random part keeps two batches minted in the same millisecond
/// apart.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PayoutIds {
	/// `sender_batch_id` value.
	pub batch_id: String,
	/// `sender_item_id` value.
	pub item_id: String,
}
impl PayoutIds {
	/// Mints identifiers for the current instant.
	pub fn generate() -> Self {
		Self::at(OffsetDateTime::now_utc())
	}

	/// Mints identifiers stamped with `now`.
	pub fn at(now: OffsetDateTime) -> Self {
		let millis = now.unix_timestamp_nanos() / 1_000_000;

		Self { batch_id: mint("batch", millis), item_id: mint("item", millis) }
	}
}

fn mint(prefix: &str, millis: i128) -> String {
	format!("{prefix}_{millis}_{:032x}", rand::random::<u128>())
}
