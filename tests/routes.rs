use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde_json::Value;
use std::sync::Arc;
use warp::http::StatusCode;

use spcomp::handlers::compare::CompareState;
use spcomp::handlers::error::ApiError;
use spcomp::models::Quote;
use spcomp::routes::routes;
use spcomp::services::compare::Comparer;
use spcomp::services::provider::QuoteProvider;
use spcomp::services::tradier::history_window;
use spcomp::CompareError;

/// Serves fixed closes; `BROKE` fails like an unreachable provider and `BAD` like a garbled payload.
struct FixedQuotes;

#[async_trait]
impl QuoteProvider for FixedQuotes {
    async fn fetch(&self, symbol: &str, days: u32) -> Result<Vec<Quote>, CompareError> {
        history_window(chrono::Utc::now().date_naive(), days)?;
        let closes: &[f64] = match symbol {
            "ACME" => &[100.0, 110.0, 99.0],
            "OLD" => &[10.0, 11.0, 12.0, 13.0, 14.0, 15.0],
            "ZERO" => &[10.0, 0.0, 10.0],
            "VOO" => &[50.0, 50.0, 51.0, 52.0, 53.0],
            "NOSUCH" => {
                return Err(CompareError::ProviderData(
                    "Tradier returned no history for NOSUCH".into(),
                ))
            }
            "BROKE" => return Err(CompareError::Provider("connection refused".into())),
            "BAD" => return Err(CompareError::ProviderData("Response was invalid json".into())),
            _ => return Err(CompareError::Provider("Tradier returned a 400".into())),
        };
        Ok(closes
            .iter()
            .map(|c| Quote::from_close("2024-01-02", *c))
            .collect())
    }
}

fn state() -> Arc<CompareState<FixedQuotes>> {
    Arc::new(CompareState {
        comparer: Comparer::new(FixedQuotes),
        default_days: 365,
    })
}

async fn get(path: &str) -> (StatusCode, String, String) {
    let resp = warp::test::request()
        .method("GET")
        .path(path)
        .reply(&routes(state()))
        .await;
    let content_type = resp
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    let body = String::from_utf8(resp.body().to_vec()).unwrap();
    (resp.status(), content_type, body)
}

fn error_code(body: &str) -> String {
    let json: Value = serde_json::from_str(body).unwrap();
    json["code"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn chart_is_served_as_svg() {
    let (status, content_type, body) = get("/api/v1/compare?symbol=acme&days=30").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type, "image/svg+xml");
    assert!(body.contains("ACME: Returns against the S&amp;P, 3 trading days"));
}

#[tokio::test]
async fn data_route_returns_aligned_series() {
    let (status, _, body) = get("/api/v1/compare/data?symbol=ACME").await;
    assert_eq!(status, StatusCode::OK);

    let json: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["symbol"], "ACME");
    assert_eq!(json["benchmark"], "VOO");
    assert_eq!(json["days"], 365);
    for key in ["returns", "index", "diffs"] {
        assert_eq!(json[key].as_array().unwrap().len(), 3, "{}", key);
    }
    assert_eq!(json["returns"][0], 0.0);
}

#[tokio::test]
async fn encoded_route_wraps_chart_in_base64() {
    let (status, _, body) = get("/api/v1/compare/encoded?symbol=ACME&days=10").await;
    assert_eq!(status, StatusCode::OK);

    let json: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["statusCode"], 200);
    assert_eq!(json["isBase64Encoded"], true);
    assert_eq!(json["headers"]["Content-Type"], "image/svg+xml");
    let chart = STANDARD.decode(json["body"].as_str().unwrap()).unwrap();
    assert!(String::from_utf8(chart).unwrap().starts_with("<svg"));
}

#[tokio::test]
async fn request_validation_errors_are_bad_requests() {
    let (status, _, body) = get("/api/v1/compare").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.contains("Must include 'symbol' query parameter"));

    let (status, _, body) = get("/api/v1/compare?symbol=ACME&days=0").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_code(&body), "invalid_request");
}

#[tokio::test]
async fn oversized_windows_are_rejected_not_panicking() {
    for days in ["36501", "100000000"] {
        let (status, _, body) = get(&format!("/api/v1/compare/data?symbol=ACME&days={}", days)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "days={}", days);
        assert!(body.contains("'days' parameter must be a positive numeric value"));
    }

    // Past the request layer, the provider's date window reports the same as bad input.
    let err = Comparer::new(FixedQuotes).compare("ACME", u32::MAX).await.unwrap_err();
    assert!(matches!(err, CompareError::InvalidInput(_)), "{:?}", err);
    assert_eq!(ApiError::from(&err).status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unknown_symbol_is_a_provider_failure() {
    let (status, _, body) = get("/api/v1/compare/data?symbol=NOSUCH").await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(error_code(&body), "provider_data_error");
}

#[tokio::test]
async fn each_failure_kind_has_its_own_code() {
    let cases = [
        ("BROKE", StatusCode::BAD_GATEWAY, "provider_error"),
        ("BAD", StatusCode::BAD_GATEWAY, "provider_data_error"),
        ("ZERO", StatusCode::UNPROCESSABLE_ENTITY, "computation_error"),
        ("OLD", StatusCode::UNPROCESSABLE_ENTITY, "incomparable_series"),
    ];
    for (symbol, expected_status, expected_code) in cases {
        let (status, _, body) = get(&format!("/api/v1/compare/data?symbol={}", symbol)).await;
        assert_eq!(status, expected_status, "{}", symbol);
        assert_eq!(error_code(&body), expected_code, "{}", symbol);
    }
}

#[tokio::test]
async fn provider_details_stay_internal() {
    let (_, _, body) = get("/api/v1/compare?symbol=BROKE").await;
    assert!(!body.contains("connection refused"));
}

#[tokio::test]
async fn health_and_unknown_routes() {
    let (status, _, body) = get("/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "ok");

    let (status, _, body) = get("/api/v1/nothing").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(error_code(&body), "not_found");
}
