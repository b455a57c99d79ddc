//! HTTP surface: `POST /cashout` and `GET /health` behind a permissive CORS layer.

// crates.io
use axum::{
	Json, Router,
	extract::{State, rejection::JsonRejection},
	http::{StatusCode, header},
	response::{IntoResponse, Response},
	routing::{get, post},
};
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
// self
use crate::{
	_prelude::*,
	payout::{PayoutRelay, PayoutRequest, PayoutResult},
};

/// Message returned with `400` when a required field is missing.
pub const MISSING_FIELDS_MESSAGE: &str = "Missing required fields";
/// Message returned with `500` for every internal failure.
pub const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";

/// Shared handler state.
#[derive(Clone, Debug)]
pub struct AppState {
	relay: Arc<PayoutRelay>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CashoutAccepted<'a> {
	success: bool,
	payout_batch_id: &'a str,
}

#[derive(Serialize)]
struct ErrorBody {
	error: &'static str,
}

/// Builds the relay router.
pub fn router(relay: Arc<PayoutRelay>) -> Router {
	Router::new()
		.route("/health", get(health))
		.route("/cashout", post(cashout))
		.layer(CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any))
		.with_state(AppState { relay })
}

/// Serves the router on an already bound listener until the future is dropped or `shutdown`
/// resolves.
pub async fn serve<F>(
	listener: TcpListener,
	relay: Arc<PayoutRelay>,
	shutdown: F,
) -> std::io::Result<()>
where
	F: Future<Output = ()> + Send + 'static,
{
	axum::serve(listener, router(relay)).with_graceful_shutdown(shutdown).await
}

async fn health() -> &'static str {
	"OK"
}

async fn cashout(
	State(state): State<AppState>,
	payload: Result<Json<PayoutRequest>, JsonRejection>,
) -> Response {
	let request = match payload {
		Ok(Json(request)) => request,
		Err(rejection) => {
			tracing::debug!(%rejection, "unreadable cashout body treated as empty");

			PayoutRequest::default()
		},
	};

	match state.relay.submit_payout(request).await {
		Ok(result) => result.into_response(),
		Err(err) => err.into_response(),
	}
}

impl IntoResponse for PayoutResult {
	fn into_response(self) -> Response {
		match self {
			PayoutResult::Accepted { payout_batch_id } =>
				Json(CashoutAccepted { success: true, payout_batch_id: &payout_batch_id })
					.into_response(),
			PayoutResult::Rejected { status, body } => {
				let status = StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY);

				(status, [(header::CONTENT_TYPE, "application/json")], body).into_response()
			},
		}
	}
}

impl IntoResponse for Error {
	fn into_response(self) -> Response {
		if self.is_client_error() {
			tracing::debug!(error = %self, "rejecting cashout request");

			return (StatusCode::BAD_REQUEST, Json(ErrorBody { error: MISSING_FIELDS_MESSAGE }))
				.into_response();
		}

		tracing::error!(error = %self, detail = ?self, "cashout failed");

		(StatusCode::INTERNAL_SERVER_ERROR, Json(ErrorBody { error: INTERNAL_ERROR_MESSAGE }))
			.into_response()
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use axum::body::to_bytes;
	// self
	use super::*;
	use crate::error::{AuthError, ValidationError};

	async fn body_text(response: Response) -> String {
		let bytes = to_bytes(response.into_body(), usize::MAX)
			.await
			.expect("Response body should be readable.");

		String::from_utf8(bytes.to_vec()).expect("Response body should be UTF-8.")
	}

	#[tokio::test]
	async fn validation_error_maps_to_fixed_400() {
		let err: Error = ValidationError::MissingFields { fields: vec!["currency"] }.into();
		let response = err.into_response();

		assert_eq!(response.status(), StatusCode::BAD_REQUEST);
		assert_eq!(body_text(response).await, r#"{"error":"Missing required fields"}"#);
	}

	#[tokio::test]
	async fn internal_errors_hide_detail() {
		let err: Error =
			AuthError::Rejected { status: Some(401), reason: "invalid_client".into() }.into();
		let response = err.into_response();

		assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
		assert_eq!(body_text(response).await, r#"{"error":"Internal server error"}"#);
	}

	#[tokio::test]
	async fn rejected_result_is_relayed_verbatim() {
		let body = r#"{"name":"VALIDATION_ERROR", "details":[]}"#;
		let response = PayoutResult::Rejected { status: 422, body: body.into() }.into_response();

		assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
		assert_eq!(
			response.headers().get(header::CONTENT_TYPE).and_then(|value| value.to_str().ok()),
			Some("application/json")
		);
		assert_eq!(body_text(response).await, body);
	}

	#[tokio::test]
	async fn accepted_result_uses_camel_case() {
		let response =
			PayoutResult::Accepted { payout_batch_id: "PB123".into() }.into_response();

		assert_eq!(response.status(), StatusCode::OK);
		assert_eq!(body_text(response).await, r#"{"success":true,"payoutBatchId":"PB123"}"#);
	}
}
