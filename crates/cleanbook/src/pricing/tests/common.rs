use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::response::Response;
use serde_json::{json, Value};

use crate::pricing::{
    CancellationContext, HomeAttributes, JobQuoteRequest, PricingConfig, PricingFetchError,
    PricingSource,
};

pub(super) fn standard_config() -> PricingConfig {
    PricingConfig::standard()
}

pub(super) fn quote_request(beds: f64, baths: f64, window: Option<&str>) -> JobQuoteRequest {
    JobQuoteRequest {
        home: HomeAttributes::new(beds, baths),
        time_window: window.map(str::to_string),
        sheets: false,
        towels: false,
    }
}

pub(super) fn cancellation_context(
    price: f64,
    days_until_appointment: f64,
    has_cleaner_assigned: bool,
) -> CancellationContext {
    CancellationContext {
        price,
        original_price: None,
        days_until_appointment,
        has_cleaner_assigned,
        discount_applied: false,
        incentive_cleaner_percent: None,
    }
}

/// Snapshot as the pricing service returns it, with decimal columns as strings.
pub(super) fn live_payload() -> Value {
    json!({
        "pricing": {
            "basePrice": "165.00",
            "extraBedBathFee": "55.00",
            "halfBathFee": "30.00",
            "linens": { "sheetFeePerBed": "30.00", "towelFee": "5.00", "faceClothFee": "2.00" },
            "timeWindows": {
                "anytime": { "surcharge": 0, "label": "Anytime" },
                "10-3": { "surcharge": 25, "label": "10am - 3pm" },
                "11-4": 25,
                "12-2": { "surcharge": 35 },
                "8-11": { "surcharge": 40, "label": "Early bird" }
            },
            "cancellation": {
                "fee": "30.00",
                "windowDays": 7,
                "homeownerPenaltyDays": 3,
                "refundPercentage": "0.50"
            },
            "platform": {
                "feePercent": "0.12",
                "businessOwnerFeePercent": 0,
                "multiCleanerPlatformFeePercent": "0.15"
            }
        },
        "source": "database"
    })
}

/// Source that always answers with the same payload.
pub(super) struct StaticSource {
    payload: Option<Value>,
    calls: AtomicUsize,
}

impl StaticSource {
    pub(super) fn new(payload: Option<Value>) -> Self {
        Self {
            payload,
            calls: AtomicUsize::new(0),
        }
    }

    pub(super) fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PricingSource for StaticSource {
    async fn fetch(&self) -> Result<Option<Value>, PricingFetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.payload.clone())
    }
}

/// Source whose fetch always rejects.
pub(super) struct FailingSource;

#[async_trait]
impl PricingSource for FailingSource {
    async fn fetch(&self) -> Result<Option<Value>, PricingFetchError> {
        Err(PricingFetchError::Unavailable("connection refused".to_string()))
    }
}

pub(super) fn json_request(method: Method, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("request builds")
}

pub(super) fn empty_request(method: Method, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .expect("request builds")
}

pub(super) async fn read_json(response: Response) -> (StatusCode, Value) {
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body readable");
    let value = serde_json::from_slice(&bytes).expect("valid json body");
    (status, value)
}

pub(super) fn approx_eq(left: f64, right: f64) -> bool {
    (left - right).abs() < 1e-9
}
