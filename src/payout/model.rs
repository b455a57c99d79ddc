//! Inbound request, provider payload, and relay result types.

// crates.io
use serde::{
	Deserializer,
	de::{MapAccess, Visitor},
};
use serde_json::Value;
// self
use crate::{_prelude::*, error::ValidationError, payout::PayoutIds};

/// Subject line of the notification email the provider sends to the receiver.
pub const EMAIL_SUBJECT: &str = "You have a payout!";
/// Note attached to every payout item.
pub const ITEM_NOTE: &str = "Thanks for using our service!";

/// Inbound cashout request as posted by callers.
///
/// Only a JSON object is accepted; the three fields are read by name and kept as the caller sent
/// them, whatever their JSON type. Presence follows JSON truthiness: absent, `null`, `false`, `""`,
/// and `0` count as missing. Unknown keys are ignored and a repeated key keeps its last value.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PayoutRequest {
	/// Receiver's email address.
	pub receiver_email: Option<Value>,
	/// Amount in major units, passed to the provider untouched.
	pub amount: Option<Value>,
	/// Currency code, passed to the provider untouched.
	pub currency: Option<Value>,
}
impl PayoutRequest {
	/// Creates a fully populated request.
	pub fn new(
		receiver_email: impl Into<Value>,
		amount: impl Into<Value>,
		currency: impl Into<Value>,
	) -> Self {
		Self {
			receiver_email: Some(receiver_email.into()),
			amount: Some(amount.into()),
			currency: Some(currency.into()),
		}
	}

	/// Checks that every field is present and truthy.
	pub fn validate(self) -> Result<ValidatedPayout, ValidationError> {
		let Self { receiver_email, amount, currency } = self;
		let present = |value: Option<Value>| value.filter(is_truthy);

		match (present(receiver_email), present(amount), present(currency)) {
			(Some(receiver_email), Some(amount), Some(currency)) =>
				Ok(ValidatedPayout { receiver_email, amount, currency }),
			(receiver_email, amount, currency) => {
				let fields = [
					("receiverEmail", receiver_email.is_none()),
					("amount", amount.is_none()),
					("currency", currency.is_none()),
				]
				.into_iter()
				.filter_map(|(name, missing)| missing.then_some(name))
				.collect();

				Err(ValidationError::MissingFields { fields })
			},
		}
	}
}
impl<'de> Deserialize<'de> for PayoutRequest {
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: Deserializer<'de>,
	{
		deserializer.deserialize_map(PayoutRequestVisitor)
	}
}

struct PayoutRequestVisitor;
impl<'de> Visitor<'de> for PayoutRequestVisitor {
	type Value = PayoutRequest;

	fn expecting(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("a JSON object")
	}

	fn visit_map<A>(self, mut map: A) -> Result<Self::Value, A::Error>
	where
		A: MapAccess<'de>,
	{
		let mut request = PayoutRequest::default();

		while let Some(key) = map.next_key::<String>()? {
			let value = map.next_value::<Value>()?;
			let slot = match key.as_str() {
				"receiverEmail" => &mut request.receiver_email,
				"amount" => &mut request.amount,
				"currency" => &mut request.currency,
				_ => continue,
			};

			*slot = Some(value);
		}

		Ok(request)
	}
}

/// Payout request that passed the presence check.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidatedPayout {
	/// Receiver's email address.
	pub receiver_email: Value,
	/// Amount in major units.
	pub amount: Value,
	/// Currency code.
	pub currency: Value,
}

/// Provider-facing batch payload carrying exactly one item.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PayoutBatch {
	/// Batch header.
	pub sender_batch_header: SenderBatchHeader,
	/// The single payout item.
	pub items: [PayoutItem; 1],
}
impl PayoutBatch {
	/// Wraps one validated payout in a batch using the provided identifiers.
	pub fn single(payout: ValidatedPayout, ids: PayoutIds) -> Self {
		let ValidatedPayout { receiver_email, amount, currency } = payout;

		Self {
			sender_batch_header: SenderBatchHeader {
				sender_batch_id: ids.batch_id,
				email_subject: EMAIL_SUBJECT.into(),
			},
			items: [PayoutItem {
				recipient_type: RecipientType::Email,
				amount: PayoutAmount { value: amount, currency },
				receiver: receiver_email,
				note: ITEM_NOTE.into(),
				sender_item_id: ids.item_id,
			}],
		}
	}
}

/// Batch header metadata.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SenderBatchHeader {
	/// Caller-generated batch identifier.
	pub sender_batch_id: String,
	/// Notification email subject.
	pub email_subject: String,
}

/// One payout line.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PayoutItem {
	/// How `receiver` should be interpreted.
	pub recipient_type: RecipientType,
	/// Amount and currency.
	pub amount: PayoutAmount,
	/// Receiver address.
	pub receiver: Value,
	/// Note shown to the receiver.
	pub note: String,
	/// Caller-generated item identifier.
	pub sender_item_id: String,
}

/// Receiver address kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RecipientType {
	/// Receiver is an email address.
	Email,
}

/// Amount value with its currency.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PayoutAmount {
	/// Amount in major units.
	pub value: Value,
	/// Currency code.
	pub currency: Value,
}

/// Success body of the payout endpoint; only the batch header is read.
#[derive(Clone, Debug, Deserialize)]
pub struct PayoutBatchResponse {
	/// Provider batch header.
	pub batch_header: BatchHeader,
}

/// Provider batch header.
#[derive(Clone, Debug, Deserialize)]
pub struct BatchHeader {
	/// Provider-assigned batch identifier.
	pub payout_batch_id: String,
	/// Provider batch status, e.g. `PENDING`.
	#[serde(default)]
	pub batch_status: Option<String>,
}

/// Outcome of a payout submission that reached the provider.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PayoutResult {
	/// Provider accepted the batch.
	Accepted {
		/// Provider-assigned batch identifier.
		payout_batch_id: String,
	},
	/// Provider answered with status >= 400; status and JSON body are relayed verbatim.
	Rejected {
		/// Provider HTTP status.
		status: u16,
		/// Provider JSON body, byte-for-byte.
		body: String,
	},
}

fn is_truthy(value: &Value) -> bool {
	match value {
		Value::Null => false,
		Value::Bool(flag) => *flag,
		Value::Number(number) => number.as_f64().is_none_or(|n| n != 0.0),
		Value::String(text) => !text.is_empty(),
		Value::Array(_) | Value::Object(_) => true,
	}
}
