//! AWS Lambda handler for plan cost calculations
//!
//! Accepts a calculate-costs request as the POST body of a Lambda Function URL
//! invocation and returns every plan's annual cost plus a recommendation.
//!
//! The catalog is read once per cold start from `PLAN_CATALOG_PATH` (built-in
//! catalog when unset) and shared across invocations.

use aws_lambda_events::lambda_function_urls::{LambdaFunctionUrlRequest, LambdaFunctionUrlResponse};
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use plan_advisor::plans::load_configured_catalog;
use plan_advisor::report::ErrorResponse;
use plan_advisor::{AdvisorError, CalculateCostsRequest, CalculateCostsResponse, RecommendationEngine};
use std::sync::Arc;

/// Status code and JSON body for one request
fn process_body(engine: &RecommendationEngine, body: Option<&str>) -> (i64, String) {
    let body = match body {
        Some(body) if !body.trim().is_empty() => body,
        _ => return error_body(400, "Invalid request", "request body is empty"),
    };

    match calculate(engine, body) {
        Ok(response) => match serde_json::to_string(&response) {
            Ok(json) => (200, json),
            Err(e) => error_body(500, "Failed to calculate costs", &e.to_string()),
        },
        Err(e) if e.is_client_error() => error_body(400, "Invalid request", &e.to_string()),
        Err(e) => {
            log::error!("Cost calculation failed: {}", e);
            error_body(500, "Failed to calculate costs", &e.to_string())
        }
    }
}

fn calculate(engine: &RecommendationEngine, body: &str) -> Result<CalculateCostsResponse, AdvisorError> {
    let request = CalculateCostsRequest::from_json(body)?;
    let preferences = request.preferences();
    let comparison = engine.generate_recommendation(
        &request.family_composition,
        &request.health_profile,
        Some(&preferences),
    )?;
    CalculateCostsResponse::build(&comparison, engine.catalog())
}

fn error_body(status: i64, error: &str, details: &str) -> (i64, String) {
    let body = serde_json::to_string(&ErrorResponse::new(error, details))
        .unwrap_or_else(|_| format!(r#"{{"error":"{}"}}"#, error));
    (status, body)
}

fn response(status: i64, body: Option<String>) -> Result<LambdaFunctionUrlResponse, Error> {
    let mut response = LambdaFunctionUrlResponse {
        status_code: status,
        headers: Default::default(),
        body,
        is_base64_encoded: false,
        cookies: Vec::new(),
    };
    response.headers.insert("content-type", "application/json".parse()?);
    response.headers.insert("access-control-allow-origin", "*".parse()?);
    response.headers.insert("access-control-allow-methods", "POST, OPTIONS".parse()?);
    response.headers.insert("access-control-allow-headers", "Content-Type".parse()?);
    Ok(response)
}

/// Lambda handler function
async fn handler(
    engine: &RecommendationEngine,
    event: LambdaEvent<LambdaFunctionUrlRequest>,
) -> Result<LambdaFunctionUrlResponse, Error> {
    let start = std::time::Instant::now();
    let request = event.payload;

    // CORS preflight
    if request.request_context.http.method.as_deref() == Some("OPTIONS") {
        return response(200, None);
    }

    if request.is_base64_encoded {
        let (status, body) = error_body(400, "Invalid request", "binary request bodies are not supported");
        return response(status, Some(body));
    }

    let (status, body) = process_body(engine, request.body.as_deref());
    log::info!("Request {} completed with {} in {:?}", event.context.request_id, status, start.elapsed());
    response(status, Some(body))
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    env_logger::init();

    let catalog = load_configured_catalog()?;
    log::info!("Serving {} plans", catalog.len());
    let engine = Arc::new(RecommendationEngine::with_catalog(catalog));

    run(service_fn(move |event: LambdaEvent<LambdaFunctionUrlRequest>| {
        let engine = Arc::clone(&engine);
        async move { handler(&engine, event).await }
    }))
    .await
}
