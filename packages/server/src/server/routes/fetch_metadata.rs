use axum::{
    extract::{Extension, RawQuery},
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use link_metadata::{backfill_links, BackfillError, BackfillOptions, BatchOutcome, LinkFailure};
use serde::Serialize;
use serde_json::json;

use crate::server::app::AppState;

const STORE_NOT_CONFIGURED: &str = "SUPABASE_URL or SB_PUBLISHABLE_KEY not configured";

/// Query parameters, first value per key.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct FetchMetadataParams {
    pub limit: Option<String>,
    pub link_id: Option<String>,
}

impl FetchMetadataParams {
    /// Read params from a raw query string. Repeated keys keep the first value.
    pub fn from_query(query: Option<&str>) -> Self {
        let mut params = Self::default();
        let Some(query) = query else {
            return params;
        };

        for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
            let slot = match key.as_ref() {
                "limit" => &mut params.limit,
                "link_id" => &mut params.link_id,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value.into_owned());
            }
        }

        params
    }
}

/// Body returned when there was nothing to process.
#[derive(Debug, Serialize)]
pub struct NothingToDoResponse {
    processed: usize,
    updated: usize,
    errors: Vec<LinkFailure>,
    message: &'static str,
}

/// Error responses for the backfill endpoint.
#[derive(Debug)]
pub enum ApiError {
    MethodNotAllowed,
    InvalidParameter(&'static str),
    Backfill(BackfillError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::MethodNotAllowed => (
                StatusCode::METHOD_NOT_ALLOWED,
                json!({ "error": "Method not allowed" }),
            ),
            ApiError::InvalidParameter(name) => (
                StatusCode::BAD_REQUEST,
                json!({ "error": format!("Invalid {} parameter", name) }),
            ),
            ApiError::Backfill(BackfillError::Selection(e)) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "error": "Failed to query links", "details": e.to_string() }),
            ),
            ApiError::Backfill(BackfillError::Cancelled) => (
                StatusCode::SERVICE_UNAVAILABLE,
                json!({ "error": "Request cancelled" }),
            ),
            ApiError::Backfill(e @ BackfillError::Configuration(_)) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "error": e.to_string() }),
            ),
        };

        (status, Json(body)).into_response()
    }
}

/// Parse query params into run options.
///
/// Empty values count as absent; anything else must be a non-negative
/// integer. `limit` is ignored when `link_id` is given.
pub fn parse_options(params: &FetchMetadataParams) -> Result<BackfillOptions, ApiError> {
    if let Some(raw) = non_empty(&params.link_id) {
        let link_id = raw
            .parse::<i64>()
            .ok()
            .filter(|id| *id >= 0)
            .ok_or(ApiError::InvalidParameter("link_id"))?;
        return Ok(BackfillOptions::for_link(link_id));
    }

    match non_empty(&params.limit) {
        Some(raw) => raw
            .parse::<usize>()
            .map(BackfillOptions::with_limit)
            .map_err(|_| ApiError::InvalidParameter("limit")),
        None => Ok(BackfillOptions::default()),
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Run one backfill batch
///
/// Accepts GET and POST; the body is ignored. Per-link failures are reported
/// in the 200 response, only configuration and selection failures are 500s.
pub async fn fetch_metadata_handler(
    method: Method,
    Extension(state): Extension<AppState>,
    RawQuery(query): RawQuery,
) -> Result<Response, ApiError> {
    if method != Method::GET && method != Method::POST {
        return Err(ApiError::MethodNotAllowed);
    }

    let options = parse_options(&FetchMetadataParams::from_query(query.as_deref()))?;
    tracing::info!(
        limit = options.limit.unwrap_or(state.backfill.default_limit),
        link_id = ?options.link_id,
        "Backfill requested"
    );

    let Some(store) = state.store.as_deref() else {
        tracing::error!("No link store configured");
        return Err(ApiError::Backfill(BackfillError::Configuration(
            STORE_NOT_CONFIGURED.to_string(),
        )));
    };

    let outcome = backfill_links(
        store,
        state.extractor.as_ref(),
        &options,
        &state.backfill,
        &state.shutdown,
    )
    .await
    .map_err(|e| {
        tracing::error!(error = %e, "Backfill failed");
        ApiError::Backfill(e)
    })?;

    Ok(outcome_response(outcome))
}

fn outcome_response(outcome: BatchOutcome) -> Response {
    if outcome.is_empty() {
        return Json(NothingToDoResponse {
            processed: 0,
            updated: 0,
            errors: Vec::new(),
            message: "All links have set values",
        })
        .into_response();
    }

    Json(outcome).into_response()
}
