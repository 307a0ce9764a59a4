//! User data resources
//!
//! The gateway does not serve profile or portfolio snapshots yet, so these
//! resources only report whether the server is authenticated.

use crate::config::{ENV_API_KEY, ENV_JWT_TOKEN};
use crate::mcp::error::McpError;
use crate::mcp::protocol::{Resource, ResourceContents};

pub const PROFILE_URI: &str = "user://profile";
pub const PORTFOLIO_URI: &str = "user://portfolio";

const TEXT_PLAIN: &str = "text/plain";

pub fn list_resources() -> Vec<Resource> {
    vec![
        Resource {
            uri: PROFILE_URI.to_string(),
            name: "User profile".to_string(),
            description: Some("Authenticated user's financial profile".to_string()),
            mime_type: Some(TEXT_PLAIN.to_string()),
        },
        Resource {
            uri: PORTFOLIO_URI.to_string(),
            name: "User portfolio".to_string(),
            description: Some("Authenticated user's investment portfolio".to_string()),
            mime_type: Some(TEXT_PLAIN.to_string()),
        },
    ]
}

pub fn read_resource(uri: &str, has_credentials: bool) -> Result<ResourceContents, McpError> {
    let subject = match uri {
        PROFILE_URI => "profile",
        PORTFOLIO_URI => "portfolio",
        other => return Err(McpError::ResourceNotFound(other.to_string())),
    };

    let text = if has_credentials {
        format!("User {} is not yet available from the FinPilot gateway.", subject)
    } else {
        no_auth_notice()
    };

    Ok(ResourceContents {
        uri: uri.to_string(),
        mime_type: Some(TEXT_PLAIN.to_string()),
        text,
    })
}

fn no_auth_notice() -> String {
    format!(
        "No authentication configured. Set {} or {} environment variable.",
        ENV_API_KEY, ENV_JWT_TOKEN
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_without_credentials() {
        let contents = read_resource(PROFILE_URI, false).unwrap();
        assert!(contents.text.starts_with("No authentication configured"));
        assert_eq!(contents.uri, PROFILE_URI);
    }

    #[test]
    fn test_read_with_credentials() {
        let contents = read_resource(PORTFOLIO_URI, true).unwrap();
        assert!(contents.text.contains("portfolio"));
        assert!(!contents.text.contains("No authentication"));
    }

    #[test]
    fn test_unknown_uri() {
        assert!(matches!(
            read_resource("user://secrets", true),
            Err(McpError::ResourceNotFound(_))
        ));
    }
}
