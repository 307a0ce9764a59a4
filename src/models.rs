//! Core data models: gateway request bodies and the tool result envelope

use serde::{Deserialize, Serialize};
use serde_json::Value;

//
// ================= Gateway request bodies =================
//
// These structs are the wire bodies sent to the gateway. Optional fields
// serialize as explicit `null`; the gateway may treat an omitted key
// differently from a null one.
//

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CreditReportRequest {
    pub pdf_base64: String,
    #[serde(default)]
    pub bureau: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CreditHealthRequest {
    #[serde(default, skip_serializing_if = "is_blank")]
    pub user_id: Option<String>,
}

/// Credit health omits the key entirely when no usable id was given.
fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, str::is_empty)
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PortfolioRequest {
    #[serde(default)]
    pub cas_pdf_base64: Option<String>,
    #[serde(default)]
    pub portfolio_data: Option<Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct LoanOptimizationRequest {
    #[serde(default)]
    pub loans: Option<Vec<Value>>,
    #[serde(default)]
    pub user_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FinancialPlanRequest {
    pub goals: Vec<Value>,
    pub current_situation: Value,
    #[serde(default)]
    pub user_id: Option<String>,
}

//
// ================= Tool I/O =================
//

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolInput {
    pub tool_name: String,
    pub parameters: Value,
}

/// Uniform result of every tool invocation.
///
/// Serializes as `{"status": "success", "data": ...}` or
/// `{"status": "error", "error": "..."}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ToolEnvelope {
    Success { data: Value },
    Error { error: String },
}

impl ToolEnvelope {
    pub fn success(data: Value) -> Self {
        ToolEnvelope::Success { data }
    }

    pub fn error(message: impl Into<String>) -> Self {
        ToolEnvelope::Error {
            error: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ToolEnvelope::Success { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_optional_fields_serialize_as_null() {
        let body = serde_json::to_value(CreditReportRequest {
            pdf_base64: "JVBERi0=".to_string(),
            bureau: None,
        })
        .unwrap();
        assert_eq!(body, json!({"pdf_base64": "JVBERi0=", "bureau": null}));

        let body = serde_json::to_value(LoanOptimizationRequest::default()).unwrap();
        assert_eq!(body, json!({"loans": null, "user_id": null}));
    }

    #[test]
    fn test_credit_health_omits_missing_user() {
        let body = serde_json::to_value(CreditHealthRequest::default()).unwrap();
        assert_eq!(body, json!({}));

        let empty = CreditHealthRequest {
            user_id: Some(String::new()),
        };
        assert_eq!(serde_json::to_value(empty).unwrap(), json!({}));

        let named = CreditHealthRequest {
            user_id: Some("user-42".to_string()),
        };
        assert_eq!(serde_json::to_value(named).unwrap(), json!({"user_id": "user-42"}));
    }

    #[test]
    fn test_envelope_shape() {
        let ok = serde_json::to_value(ToolEnvelope::success(json!({"score": 780}))).unwrap();
        assert_eq!(ok, json!({"status": "success", "data": {"score": 780}}));

        let err = serde_json::to_value(ToolEnvelope::error("API Error 404: not found")).unwrap();
        assert_eq!(err, json!({"status": "error", "error": "API Error 404: not found"}));
    }
}
