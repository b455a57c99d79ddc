//! Process configuration built once at startup and shared by reference.
//!
//! | Variable           | Default                            |
//! |--------------------|------------------------------------|
//! | `PAYPAL_CLIENT_ID` | `YOUR_PAYPAL_CLIENT_ID`            |
//! | `PAYPAL_SECRET`    | `YOUR_PAYPAL_SECRET`               |
//! | `PAYPAL_API_BASE`  | `https://api-m.sandbox.paypal.com` |
//! | `CASHOUT_ADDR`     | `127.0.0.1:4000`                   |
//!
//! Unset or empty credentials fall back to the placeholders, which the live provider rejects.

// std
use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4};
// self
use crate::{_prelude::*, auth::ClientSecret, error::ConfigError};

/// Placeholder client id used when `PAYPAL_CLIENT_ID` is unset.
pub const PLACEHOLDER_CLIENT_ID: &str = "YOUR_PAYPAL_CLIENT_ID";
/// Placeholder secret used when `PAYPAL_SECRET` is unset.
pub const PLACEHOLDER_CLIENT_SECRET: &str = "YOUR_PAYPAL_SECRET";
/// PayPal sandbox REST base URL.
pub const SANDBOX_API_BASE: &str = "https://api-m.sandbox.paypal.com";
/// Default listen address.
pub const DEFAULT_LISTEN_ADDR: SocketAddr =
	SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::LOCALHOST, 4000));

const TOKEN_PATH: &str = "/v1/oauth2/token";
const PAYOUTS_PATH: &str = "/v1/payments/payouts";

/// Provider endpoints derived from the API base URL.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProviderEndpoints {
	/// OAuth2 token endpoint.
	pub token: Url,
	/// Batch payout endpoint.
	pub payouts: Url,
}
impl ProviderEndpoints {
	/// Resolves both endpoints below `base`, keeping any path prefix it carries.
	pub fn from_base(base: &str) -> Result<Self, ConfigError> {
		let trimmed = base.trim_end_matches('/');
		let token = parse_url(format!("{trimmed}{TOKEN_PATH}"))?;
		let payouts = parse_url(format!("{trimmed}{PAYOUTS_PATH}"))?;

		Ok(Self { token, payouts })
	}
}

/// Explicit configuration passed into the token provider and the payout relay.
#[derive(Clone, Debug)]
pub struct RelayConfig {
	/// OAuth2 client identifier.
	pub client_id: String,
	/// OAuth2 client secret.
	pub client_secret: ClientSecret,
	/// Provider endpoints.
	pub endpoints: ProviderEndpoints,
	/// Socket address the HTTP surface binds to.
	pub listen_addr: SocketAddr,
}
impl RelayConfig {
	/// Creates a configuration against the provided API base URL.
	pub fn new(
		client_id: impl Into<String>,
		client_secret: impl Into<String>,
		api_base: &str,
	) -> Result<Self, ConfigError> {
		Ok(Self {
			client_id: client_id.into(),
			client_secret: ClientSecret::new(client_secret),
			endpoints: ProviderEndpoints::from_base(api_base)?,
			listen_addr: DEFAULT_LISTEN_ADDR,
		})
	}

	/// Overrides the listen address.
	pub fn with_listen_addr(mut self, addr: SocketAddr) -> Self {
		self.listen_addr = addr;

		self
	}

	/// Reads the process environment.
	pub fn from_env() -> Result<Self, ConfigError> {
		Self::from_lookup(|key| std::env::var(key).ok())
	}

	/// Builds the configuration from an arbitrary variable lookup.
	pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
	where
		F: Fn(&str) -> Option<String>,
	{
		let read = |key: &str| lookup(key).filter(|value| !value.is_empty());
		let client_id = read("PAYPAL_CLIENT_ID").unwrap_or_else(|| PLACEHOLDER_CLIENT_ID.into());
		let client_secret =
			read("PAYPAL_SECRET").unwrap_or_else(|| PLACEHOLDER_CLIENT_SECRET.into());
		let api_base = read("PAYPAL_API_BASE").unwrap_or_else(|| SANDBOX_API_BASE.into());
		let mut config = Self::new(client_id, client_secret, &api_base)?;

		if let Some(raw) = read("CASHOUT_ADDR") {
			let addr = raw
				.parse::<SocketAddr>()
				.map_err(|source| ConfigError::InvalidListenAddr { value: raw.clone(), source })?;

			config = config.with_listen_addr(addr);
		}

		Ok(config)
	}

	/// Returns true when either credential is still a placeholder.
	pub fn uses_placeholder_credentials(&self) -> bool {
		self.client_id == PLACEHOLDER_CLIENT_ID
			|| self.client_secret.expose() == PLACEHOLDER_CLIENT_SECRET
	}
}

fn parse_url(value: String) -> Result<Url, ConfigError> {
	Url::parse(&value).map_err(|source| ConfigError::InvalidUrl { value, source })
}
