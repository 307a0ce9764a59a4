//! Tool trait and registry
//!
//! Tools are thin adapters: they decode their arguments, make one gateway
//! call and hand back the gateway payload untouched. The registry is the
//! boundary where every outcome, including a panicking handler, becomes a
//! [`ToolEnvelope`].

use crate::error::FinPilotError;
use crate::gateway::GatewayClient;
use crate::models::{ToolEnvelope, ToolInput};
use crate::Result;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};
use uuid::Uuid;

pub mod definitions;

pub use definitions::{
    AnalyzeCreditReportTool, AnalyzePortfolioTool, CreateFinancialPlanTool, GetCreditHealthTool,
    OptimizeLoansTool,
};

/// Trait for a single tool
#[async_trait::async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &'static str;
    fn description(&self) -> &'static str;
    /// JSON Schema describing the tool arguments.
    fn input_schema(&self) -> Value;
    async fn execute(&self, input: &ToolInput) -> Result<Value>;
}

/// Tool registry for looking up and executing tools
pub struct ToolRegistry {
    tools: BTreeMap<String, Arc<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            tools: BTreeMap::new(),
        }
    }

    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        self.tools.insert(tool.name().to_string(), tool);
    }

    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.get(name).cloned()
    }

    /// Registered tools in name order.
    pub fn list(&self) -> Vec<Arc<dyn Tool>> {
        self.tools.values().cloned().collect()
    }

    /// Run a tool and wrap the outcome in the uniform envelope.
    ///
    /// Never fails: unknown tools, bad arguments, gateway errors and
    /// panics all come back as `ToolEnvelope::Error`.
    pub async fn call(&self, name: &str, arguments: Value) -> ToolEnvelope {
        let call_id = Uuid::new_v4();

        let Some(tool) = self.get(name) else {
            warn!(%call_id, tool = name, "Unknown tool requested");
            return ToolEnvelope::error(FinPilotError::ToolNotFound(name.to_string()).to_string());
        };

        info!(%call_id, tool = name, "Executing tool");
        let started = Instant::now();

        let input = ToolInput {
            tool_name: name.to_string(),
            parameters: arguments,
        };
        // Run in its own task so a panic surfaces as a JoinError.
        let handle = tokio::spawn(async move { tool.execute(&input).await });
        let result = match handle.await {
            Ok(result) => result,
            Err(e) => Err(FinPilotError::ToolAborted(e.to_string())),
        };

        let elapsed_ms = started.elapsed().as_millis() as u64;
        match result {
            Ok(data) => {
                info!(%call_id, tool = name, elapsed_ms, "Tool succeeded");
                ToolEnvelope::success(data)
            }
            Err(e) => {
                warn!(%call_id, tool = name, elapsed_ms, error = %e, "Tool failed");
                ToolEnvelope::error(e.to_string())
            }
        }
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Decode tool arguments into a typed request. Missing arguments mean `{}`.
pub(crate) fn parse_params<T: DeserializeOwned>(input: &ToolInput) -> Result<T> {
    let parameters = match &input.parameters {
        Value::Null => Value::Object(Default::default()),
        Value::Object(_) => input.parameters.clone(),
        _ => {
            return Err(FinPilotError::InvalidToolInput(
                "tool arguments must be a JSON object".to_string(),
            ))
        }
    };

    serde_json::from_value(parameters).map_err(|e| {
        FinPilotError::InvalidToolInput(format!("{}: {}", input.tool_name, e))
    })
}

/// Create the registry with the five gateway-backed tools.
pub fn create_default_registry(client: Arc<GatewayClient>) -> ToolRegistry {
    let mut registry = ToolRegistry::new();

    registry.register(Arc::new(AnalyzeCreditReportTool::new(client.clone())));
    registry.register(Arc::new(GetCreditHealthTool::new(client.clone())));
    registry.register(Arc::new(AnalyzePortfolioTool::new(client.clone())));
    registry.register(Arc::new(OptimizeLoansTool::new(client.clone())));
    registry.register(Arc::new(CreateFinancialPlanTool::new(client)));

    registry
}
