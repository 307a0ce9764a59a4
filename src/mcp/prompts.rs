//! Prompt templates

use crate::mcp::error::McpError;
use crate::mcp::protocol::{ContentBlock, Prompt, PromptArgument, PromptGetResult, PromptMessage};
use serde_json::{Map, Value};

pub const FINANCIAL_ADVISOR_PROMPT: &str = "financial_advisor_prompt";

pub fn get_all_prompts() -> Vec<Prompt> {
    vec![Prompt {
        name: FINANCIAL_ADVISOR_PROMPT.to_string(),
        description: Some("Frame a user's question for a certified financial advisor".to_string()),
        arguments: vec![PromptArgument {
            name: "user_query".to_string(),
            description: Some("The user's financial question or concern".to_string()),
            required: true,
        }],
    }]
}

pub fn get_prompt(
    name: &str,
    arguments: Option<Map<String, Value>>,
) -> Result<PromptGetResult, McpError> {
    if name != FINANCIAL_ADVISOR_PROMPT {
        return Err(McpError::PromptNotFound(name.to_string()));
    }

    let user_query = arguments
        .as_ref()
        .and_then(|args| args.get("user_query"))
        .and_then(Value::as_str)
        .ok_or_else(|| McpError::InvalidParams("missing required argument: user_query".to_string()))?;

    Ok(PromptGetResult {
        description: Some("Financial advisor prompt".to_string()),
        messages: vec![PromptMessage {
            role: "user".to_string(),
            content: ContentBlock::Text {
                text: financial_advisor_prompt(user_query),
            },
        }],
    })
}

pub fn financial_advisor_prompt(user_query: &str) -> String {
    format!(
        r#"You are a certified financial advisor helping a user with: {user_query}

Provide:
1. Clear analysis of their situation
2. Actionable recommendations
3. Potential risks and considerations
4. Next steps

Use FinPilot tools to:
- Analyze credit reports for debt optimization
- Review portfolio for investment recommendations
- Evaluate loan consolidation opportunities
- Create comprehensive financial plans

Be professional, empathetic, and prioritize the user's financial wellbeing.
"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_renders_user_query() {
        let mut args = Map::new();
        args.insert("user_query".to_string(), json!("Should I prepay my home loan?"));

        let result = get_prompt(FINANCIAL_ADVISOR_PROMPT, Some(args)).unwrap();
        let ContentBlock::Text { text } = &result.messages[0].content;
        assert!(text.contains("helping a user with: Should I prepay my home loan?"));
    }

    #[test]
    fn test_missing_argument() {
        assert!(matches!(
            get_prompt(FINANCIAL_ADVISOR_PROMPT, None),
            Err(McpError::InvalidParams(_))
        ));
    }

    #[test]
    fn test_unknown_prompt() {
        assert!(matches!(get_prompt("tax_evasion", None), Err(McpError::PromptNotFound(_))));
    }
}
