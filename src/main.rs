//! Cashout relay binary.
//!
//! Loads `.env`, installs the tracing subscriber, builds [`RelayConfig`] from the environment, and
//! serves `POST /cashout` until Ctrl-C.
//!
//! # Environment variables
//!
//! | Variable           | Default                            | Description                     |
//! |--------------------|------------------------------------|---------------------------------|
//! | `PAYPAL_CLIENT_ID` | `YOUR_PAYPAL_CLIENT_ID`            | OAuth client id                 |
//! | `PAYPAL_SECRET`    | `YOUR_PAYPAL_SECRET`               | OAuth client secret             |
//! | `PAYPAL_API_BASE`  | `https://api-m.sandbox.paypal.com` | Provider REST base URL          |
//! | `CASHOUT_ADDR`     | `127.0.0.1:4000`                   | Listen address                  |
//! | `RUST_LOG`         | `info`                             | Log filter (tracing-subscriber) |

// std
use std::sync::Arc;
// crates.io
use color_eyre::Result;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;
// self
use cashout_relay::{config::RelayConfig, payout::PayoutRelay, server};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let dotenv = dotenvy::dotenv();
	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

	tracing_subscriber::fmt().with_env_filter(filter).init();

	if let Err(e) = dotenv {
		if !e.not_found() {
			tracing::warn!(error = %e, "ignoring unreadable .env file");
		}
	}

	let config = RelayConfig::from_env()?;

	if config.uses_placeholder_credentials() {
		tracing::warn!(
			"PAYPAL_CLIENT_ID or PAYPAL_SECRET is unset; the provider will reject the token exchange"
		);
	}

	let relay = Arc::new(PayoutRelay::new(&config)?);
	let listener = TcpListener::bind(config.listen_addr).await?;

	tracing::info!(addr = %listener.local_addr()?, "cashout relay listening");

	server::serve(listener, relay, shutdown_signal()).await?;

	tracing::info!("cashout relay stopped");

	Ok(())
}

async fn shutdown_signal() {
	if let Err(e) = tokio::signal::ctrl_c().await {
		tracing::error!(error = %e, "failed to listen for Ctrl-C; serving until killed");

		std::future::pending::<()>().await;
	}
}
