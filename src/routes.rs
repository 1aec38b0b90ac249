// src/routes.rs
use log::info;
use std::convert::Infallible;
use std::sync::Arc;
use warp::reject::Rejection;
use warp::{Filter, Reply};

use crate::handlers::compare::{
    get_comparison_chart, get_comparison_data, get_comparison_encoded, CompareState,
};
use crate::handlers::error::ApiError;
use crate::models::CompareQuery;
use crate::services::provider::QuoteProvider;

async fn handle_rejection(err: Rejection) -> Result<impl Reply, Infallible> {
    let code;
    let error_code;
    let message;

    if err.is_not_found() {
        code = warp::http::StatusCode::NOT_FOUND;
        error_code = "not_found";
        message = "Not Found".to_string();
    } else if let Some(api_error) = err.find::<ApiError>() {
        code = api_error.status;
        error_code = api_error.code;
        message = api_error.message.clone();
    } else if err.find::<warp::reject::InvalidQuery>().is_some() {
        code = warp::http::StatusCode::BAD_REQUEST;
        error_code = "invalid_request";
        message = "Malformed query string".to_string();
    } else if err.find::<warp::reject::MethodNotAllowed>().is_some() {
        code = warp::http::StatusCode::METHOD_NOT_ALLOWED;
        error_code = "method_not_allowed";
        message = "Method Not Allowed".to_string();
    } else {
        code = warp::http::StatusCode::INTERNAL_SERVER_ERROR;
        error_code = "internal_error";
        message = "Internal Server Error".to_string();
    }

    Ok(warp::reply::with_status(
        warp::reply::json(&serde_json::json!({
            "error": message,
            "code": error_code,
        })),
        code,
    ))
}

pub fn routes<P>(
    state: Arc<CompareState<P>>,
) -> impl Filter<Extract = impl Reply, Error = Infallible> + Clone
where
    P: QuoteProvider + 'static,
{
    info!("Configuring routes...");

    let state_filter = warp::any().map(move || state.clone());

    let chart_route = warp::path!("api" / "v1" / "compare")
        .and(warp::get())
        .and(warp::query::<CompareQuery>())
        .and(state_filter.clone())
        .and_then(get_comparison_chart::<P>);

    let data_route = warp::path!("api" / "v1" / "compare" / "data")
        .and(warp::get())
        .and(warp::query::<CompareQuery>())
        .and(state_filter.clone())
        .and_then(get_comparison_data::<P>);

    let encoded_route = warp::path!("api" / "v1" / "compare" / "encoded")
        .and(warp::get())
        .and(warp::query::<CompareQuery>())
        .and(state_filter.clone())
        .and_then(get_comparison_encoded::<P>);

    let health_route = warp::path!("health")
        .and(warp::get())
        .map(|| "ok");

    info!("All routes configured successfully.");

    chart_route
        .or(data_route)
        .or(encoded_route)
        .or(health_route)
        .recover(handle_rejection)
}
