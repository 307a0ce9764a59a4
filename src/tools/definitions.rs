//! The five gateway-backed tools

use super::{parse_params, Tool};
use crate::gateway::GatewayClient;
use crate::models::{
    CreditHealthRequest, CreditReportRequest, FinancialPlanRequest, LoanOptimizationRequest,
    PortfolioRequest, ToolInput,
};
use crate::Result;
use serde_json::{json, Value};
use std::sync::Arc;

pub struct AnalyzeCreditReportTool {
    client: Arc<GatewayClient>,
}

impl AnalyzeCreditReportTool {
    pub fn new(client: Arc<GatewayClient>) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl Tool for AnalyzeCreditReportTool {
    fn name(&self) -> &'static str {
        "analyze_credit_report"
    }

    fn description(&self) -> &'static str {
        "Analyze a credit report from CIBIL, Experian, or Equifax. Returns the credit score \
         and its factors, a loan summary with optimization opportunities, payment history \
         and DPD analysis, and high-rate loan swap recommendations."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "pdf_base64": {
                    "type": "string",
                    "description": "Base64 encoded PDF content of the credit report"
                },
                "bureau": {
                    "type": ["string", "null"],
                    "description": "Credit bureau (cibil, experian, equifax); auto-detected if omitted"
                }
            },
            "required": ["pdf_base64"]
        })
    }

    async fn execute(&self, input: &ToolInput) -> Result<Value> {
        let request: CreditReportRequest = parse_params(input)?;
        Ok(self.client.analyze_credit_report(&request).await?)
    }
}

pub struct GetCreditHealthTool {
    client: Arc<GatewayClient>,
}

impl GetCreditHealthTool {
    pub fn new(client: Arc<GatewayClient>) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl Tool for GetCreditHealthTool {
    fn name(&self) -> &'static str {
        "get_credit_health"
    }

    fn description(&self) -> &'static str {
        "Get the current credit health summary: credit score and trend, total debt and EMI \
         burden, credit utilization, recent changes and alerts."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "user_id": {
                    "type": ["string", "null"],
                    "description": "User ID; the authenticated user when omitted"
                }
            }
        })
    }

    async fn execute(&self, input: &ToolInput) -> Result<Value> {
        let request: CreditHealthRequest = parse_params(input)?;
        Ok(self.client.get_credit_health(&request).await?)
    }
}

pub struct AnalyzePortfolioTool {
    client: Arc<GatewayClient>,
}

impl AnalyzePortfolioTool {
    pub fn new(client: Arc<GatewayClient>) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl Tool for AnalyzePortfolioTool {
    fn name(&self) -> &'static str {
        "analyze_portfolio"
    }

    fn description(&self) -> &'static str {
        "Analyze an investment portfolio from a CAS statement or direct data. Returns holdings \
         breakdown, asset allocation, performance metrics (returns, XIRR), rebalancing and \
         tax optimization recommendations."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "cas_pdf_base64": {
                    "type": ["string", "null"],
                    "description": "Base64 encoded CAS PDF (NSDL/CDSL consolidated account statement)"
                },
                "portfolio_data": {
                    "type": ["object", "null"],
                    "description": "Direct portfolio data, as an alternative to the PDF"
                }
            }
        })
    }

    async fn execute(&self, input: &ToolInput) -> Result<Value> {
        let request: PortfolioRequest = parse_params(input)?;
        Ok(self.client.analyze_portfolio(&request).await?)
    }
}

pub struct OptimizeLoansTool {
    client: Arc<GatewayClient>,
}

impl OptimizeLoansTool {
    pub fn new(client: Arc<GatewayClient>) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl Tool for OptimizeLoansTool {
    fn name(&self) -> &'static str {
        "optimize_loans"
    }

    fn description(&self) -> &'static str {
        "Get loan optimization recommendations: LAMF swap opportunities, refinancing, \
         prepayment analysis and potential annual savings."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "loans": {
                    "type": ["array", "null"],
                    "items": {"type": "object"},
                    "description": "Loans with details (outstanding, apr, emi, tenure)"
                },
                "user_id": {
                    "type": ["string", "null"],
                    "description": "User ID; the authenticated user's loans when omitted"
                }
            }
        })
    }

    async fn execute(&self, input: &ToolInput) -> Result<Value> {
        let request: LoanOptimizationRequest = parse_params(input)?;
        Ok(self.client.optimize_loans(&request).await?)
    }
}

pub struct CreateFinancialPlanTool {
    client: Arc<GatewayClient>,
}

impl CreateFinancialPlanTool {
    pub fn new(client: Arc<GatewayClient>) -> Self {
        Self { client }
    }
}

#[async_trait::async_trait]
impl Tool for CreateFinancialPlanTool {
    fn name(&self) -> &'static str {
        "create_financial_plan"
    }

    fn description(&self) -> &'static str {
        "Create a comprehensive financial plan from goals and the current situation: goal-wise \
         allocation, investment recommendations, insurance requirements, tax strategies and \
         monthly action items."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "goals": {
                    "type": "array",
                    "items": {"type": "object"},
                    "description": "Financial goals, each {name, target_amount, target_date, priority}"
                },
                "current_situation": {
                    "type": "object",
                    "description": "Current status {income, expenses, assets, liabilities, risk_profile}"
                },
                "user_id": {
                    "type": ["string", "null"],
                    "description": "User ID"
                }
            },
            "required": ["goals", "current_situation"]
        })
    }

    async fn execute(&self, input: &ToolInput) -> Result<Value> {
        let request: FinancialPlanRequest = parse_params(input)?;
        Ok(self.client.create_financial_plan(&request).await?)
    }
}
