//! Single-endpoint cashout relay: validate a payout request, exchange client credentials for a
//! bearer token, submit a one-item PayPal payout batch, and relay the provider's answer.

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod config;
pub mod error;
pub mod http;
pub mod obs;
pub mod payout;
pub mod server;
pub mod token;

mod _prelude {
	pub use std::{
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		pin::Pin,
		sync::Arc,
	};

	pub use parking_lot::Mutex;
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use serde::{Deserialize, Serialize};
	pub use thiserror::Error as ThisError;
	pub use time::OffsetDateTime;
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

pub use reqwest;
pub use url;
// Used by the binary only.
use {color_eyre as _, dotenvy as _, tracing_subscriber as _};
#[cfg(test)] use {base64 as _, httpmock as _};
