use crate::checks;
use crate::registry::Registry;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, warn};

const GENERIC_FAILURE: &str = "An error has occurred";

/// Check and health routes. Metrics are layered on by the server.
pub fn router(registry: Arc<Registry>) -> Router {
    Router::new()
        .route("/", get(check_endpoint))
        .route("/health", get(healthcheck))
        .with_state(registry)
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

type Params = HashMap<String, String>;

pub(crate) async fn check_endpoint(
    State(registry): State<Arc<Registry>>,
    Query(params): Query<Params>,
) -> Response {
    let Some(action) = params.get("action").map(String::as_str) else {
        warn!("check requested without an action");
        return bad_request(GENERIC_FAILURE);
    };

    let answer = match action {
        "verify_receiver" => answer_receiver(&registry, &params),
        "verify_sender" => answer_sender(&registry, &params),
        "verify_date_correct" => required(&params, "date", "Missing argument date1")
            .map(|date| checks::date_correct(date, Utc::now()).to_string()),
        "verify_date_passed" => required(&params, "date", "Missing argument date2")
            .map(|date| checks::date_passed(date, Utc::now()).to_string()),
        "verify_priority" => required(&params, "priority", "Missing argument priority")
            .map(|priority| checks::priority_answer(&registry, priority)),
        _ => Err(GENERIC_FAILURE),
    };

    match answer {
        Ok(body) => {
            info!(action, answer = body.as_str(), "check answered");
            (StatusCode::OK, body).into_response()
        }
        Err(message) => {
            warn!(action, reason = message, "check refused");
            bad_request(message)
        }
    }
}

fn answer_receiver(registry: &Registry, params: &Params) -> Result<String, &'static str> {
    let bic = required(params, "receiverBIC", "Missing argument receiver BIC")?;
    let iban = required(params, "receiverIBAN", "Missing argument receiver IBAN")?;
    Ok(checks::receiver_valid(registry, bic, iban).to_string())
}

fn answer_sender(registry: &Registry, params: &Params) -> Result<String, &'static str> {
    let bic = required(params, "senderBIC", "Missing argument sender BIC")?;
    let iban = required(params, "senderIBAN", "Missing argument sender IBAN")?;
    Ok(checks::sender_valid(registry, bic, iban).to_string())
}

fn required<'a>(
    params: &'a Params,
    name: &str,
    missing: &'static str,
) -> Result<&'a str, &'static str> {
    params.get(name).map(String::as_str).ok_or(missing)
}

fn bad_request(message: &'static str) -> Response {
    (StatusCode::BAD_REQUEST, message).into_response()
}
