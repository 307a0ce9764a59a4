//! HTTP client for the FinPilot API gateway
//!
//! Every tool goes through [`GatewayClient::send`], which owns header
//! injection, timeout selection and the classification of failures into
//! [`GatewayError`]. The client holds only immutable data and can be shared
//! across concurrent tool calls behind an `Arc`.

use crate::config::Settings;
use crate::error::{FinPilotError, GatewayError, GENERIC_FAILURE_MESSAGE};
use crate::models::{
    CreditHealthRequest, CreditReportRequest, FinancialPlanRequest, LoanOptimizationRequest,
    PortfolioRequest,
};
use crate::Result;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use reqwest::{Client, Method};
use serde::Serialize;
use serde_json::{json, Value};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

pub const API_KEY_HEADER: &str = "x-api-key";

const USER_AGENT_VALUE: &str = concat!("finpilot-mcp/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeoutClass {
    Standard,
    /// Operations that carry base64 documents.
    Upload,
}

/// The fixed set of gateway endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GatewayOperation {
    AnalyzeCreditReport,
    CreditHealth,
    AnalyzePortfolio,
    OptimizeLoans,
    CreateFinancialPlan,
}

impl GatewayOperation {
    pub const ALL: [GatewayOperation; 5] = [
        GatewayOperation::AnalyzeCreditReport,
        GatewayOperation::CreditHealth,
        GatewayOperation::AnalyzePortfolio,
        GatewayOperation::OptimizeLoans,
        GatewayOperation::CreateFinancialPlan,
    ];

    pub fn method(&self) -> Method {
        match self {
            GatewayOperation::CreditHealth => Method::GET,
            _ => Method::POST,
        }
    }

    pub fn path(&self) -> &'static str {
        match self {
            GatewayOperation::AnalyzeCreditReport => "/v1/credit/analyze",
            GatewayOperation::CreditHealth => "/v1/credit/health",
            GatewayOperation::AnalyzePortfolio => "/v1/portfolio/analyze",
            GatewayOperation::OptimizeLoans => "/v1/loans/optimize",
            GatewayOperation::CreateFinancialPlan => "/v1/plan/create",
        }
    }

    pub fn timeout_class(&self) -> TimeoutClass {
        match self {
            GatewayOperation::AnalyzeCreditReport | GatewayOperation::AnalyzePortfolio => {
                TimeoutClass::Upload
            }
            _ => TimeoutClass::Standard,
        }
    }
}

/// A single outbound call, built per invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct GatewayRequest {
    pub method: Method,
    pub path: &'static str,
    pub body: Option<Value>,
    pub timeout: Duration,
}

pub struct GatewayClient {
    http: Client,
    base_url: String,
    headers: HeaderMap,
    request_timeout: Duration,
    upload_timeout: Duration,
}

impl GatewayClient {
    pub fn new(settings: &Settings) -> Result<Self> {
        // No idle connections are kept, so calls never share a connection.
        let http = Client::builder().pool_max_idle_per_host(0).build()?;

        Ok(Self {
            http,
            base_url: settings.effective_gateway_url(),
            headers: build_headers(settings)?,
            request_timeout: settings.request_timeout,
            upload_timeout: settings.upload_timeout,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn timeout_for(&self, class: TimeoutClass) -> Duration {
        match class {
            TimeoutClass::Standard => self.request_timeout,
            TimeoutClass::Upload => self.upload_timeout,
        }
    }

    /// Resolve method, path and timeout for an operation.
    pub fn prepare(&self, operation: GatewayOperation, body: Value) -> GatewayRequest {
        GatewayRequest {
            method: operation.method(),
            path: operation.path(),
            body: Some(body),
            timeout: self.timeout_for(operation.timeout_class()),
        }
    }

    /// Issue one request and classify the outcome.
    pub async fn send(&self, request: GatewayRequest) -> std::result::Result<Value, GatewayError> {
        let url = format!("{}{}", self.base_url, request.path);
        let started = Instant::now();

        debug!(
            method = %request.method,
            path = request.path,
            timeout_ms = request.timeout.as_millis() as u64,
            "Calling FinPilot gateway"
        );

        let mut builder = self
            .http
            .request(request.method.clone(), &url)
            .headers(self.headers.clone())
            .timeout(request.timeout);
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let outcome = match builder.send().await {
            Ok(response) => {
                let status = response.status().as_u16();
                match response.bytes().await {
                    Ok(bytes) => classify_response(status, &bytes),
                    Err(e) => Err(classify_transport_error(&e)),
                }
            }
            Err(e) => Err(classify_transport_error(&e)),
        };

        let elapsed_ms = started.elapsed().as_millis() as u64;
        match &outcome {
            Ok(_) => debug!(path = request.path, elapsed_ms, "Gateway call succeeded"),
            Err(e) => warn!(
                path = request.path,
                elapsed_ms,
                status = e.status_code(),
                error = %e,
                "Gateway call failed"
            ),
        }

        outcome
    }

    /// Serialize a request model and send it. The model's serde
    /// attributes define the wire body.
    async fn call<B: Serialize>(
        &self,
        operation: GatewayOperation,
        body: &B,
    ) -> std::result::Result<Value, GatewayError> {
        let body = serde_json::to_value(body).map_err(|e| GatewayError::TransportFailure {
            detail: format!("failed to encode request body: {}", e),
        })?;
        self.send(self.prepare(operation, body)).await
    }

    pub async fn analyze_credit_report(
        &self,
        request: &CreditReportRequest,
    ) -> std::result::Result<Value, GatewayError> {
        self.call(GatewayOperation::AnalyzeCreditReport, request).await
    }

    /// Without a user id the gateway answers for the authenticated user.
    pub async fn get_credit_health(
        &self,
        request: &CreditHealthRequest,
    ) -> std::result::Result<Value, GatewayError> {
        self.call(GatewayOperation::CreditHealth, request).await
    }

    pub async fn analyze_portfolio(
        &self,
        request: &PortfolioRequest,
    ) -> std::result::Result<Value, GatewayError> {
        self.call(GatewayOperation::AnalyzePortfolio, request).await
    }

    pub async fn optimize_loans(
        &self,
        request: &LoanOptimizationRequest,
    ) -> std::result::Result<Value, GatewayError> {
        self.call(GatewayOperation::OptimizeLoans, request).await
    }

    pub async fn create_financial_plan(
        &self,
        request: &FinancialPlanRequest,
    ) -> std::result::Result<Value, GatewayError> {
        self.call(GatewayOperation::CreateFinancialPlan, request).await
    }
}

/// Headers sent with every request. A bearer token wins over an API key.
pub fn build_headers(settings: &Settings) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_VALUE));

    if let Some(token) = &settings.jwt_token {
        headers.insert(AUTHORIZATION, secret_header(&format!("Bearer {}", token))?);
    } else if let Some(key) = &settings.api_key {
        headers.insert(HeaderName::from_static(API_KEY_HEADER), secret_header(key)?);
    }

    Ok(headers)
}

fn secret_header(value: &str) -> Result<HeaderValue> {
    let mut header = HeaderValue::from_str(value).map_err(|_| {
        FinPilotError::ConfigError("credential contains characters not allowed in a header".to_string())
    })?;
    header.set_sensitive(true);
    Ok(header)
}

fn classify_transport_error(err: &reqwest::Error) -> GatewayError {
    if err.is_timeout() {
        GatewayError::Timeout {
            detail: err.to_string(),
        }
    } else {
        GatewayError::TransportFailure {
            detail: err.to_string(),
        }
    }
}

/// Map a received status and body to a payload or a rejection.
pub fn classify_response(status: u16, body: &[u8]) -> std::result::Result<Value, GatewayError> {
    if status >= 400 {
        let details = if body.is_empty() {
            json!({})
        } else {
            serde_json::from_slice::<Value>(body)
                .unwrap_or_else(|_| json!({ "raw": String::from_utf8_lossy(body) }))
        };
        let message = details
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or(GENERIC_FAILURE_MESSAGE)
            .to_string();
        return Err(GatewayError::RemoteRejection {
            status,
            message,
            details,
        });
    }

    if body.is_empty() {
        return Ok(Value::Null);
    }

    serde_json::from_slice(body).map_err(|e| GatewayError::MalformedResponse {
        status,
        detail: e.to_string(),
    })
}
