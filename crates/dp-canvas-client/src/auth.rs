//! Authentication headers for the Canvas REST API

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};

/// Bearer-token authentication for a Canvas instance.
#[derive(Debug, Clone, Default)]
pub struct AuthConfig {
    token: String,
}

impl AuthConfig {
    /// Create an auth config from an access token string.
    pub fn bearer(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }

    /// Headers sent with every Canvas request: the Bearer authorization plus
    /// the JSON content negotiation pair.
    pub fn headers(&self) -> Result<HeaderMap, Box<dyn std::error::Error + Send + Sync>> {
        let mut headers = HeaderMap::new();
        headers.insert(
            HeaderName::from_static("authorization"),
            HeaderValue::from_str(&format!("Bearer {}", self.token))?,
        );
        headers.insert(
            HeaderName::from_static("content-type"),
            HeaderValue::from_static("application/json"),
        );
        headers.insert(
            HeaderName::from_static("accept"),
            HeaderValue::from_static("application/json"),
        );
        Ok(headers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bearer_auth_headers() {
        let auth = AuthConfig::bearer("canvas-token");
        let headers = auth.headers().unwrap();

        assert_eq!(headers.get("authorization").unwrap(), "Bearer canvas-token");
        assert_eq!(headers.get("accept").unwrap(), "application/json");
    }
}
