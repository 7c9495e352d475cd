use serde::{Deserialize, Serialize};

pub const HEALTHY: &str = "healthy";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

/// Backend reachability as last observed. Only `Healthy` allows submitting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HealthStatus {
    #[default]
    Unknown,
    Healthy,
    Unhealthy,
}

impl HealthStatus {
    pub fn from_reported(status: &str) -> Self {
        if status == HEALTHY {
            HealthStatus::Healthy
        } else {
            HealthStatus::Unhealthy
        }
    }

    pub fn is_healthy(&self) -> bool {
        matches!(self, HealthStatus::Healthy)
    }
}

impl From<&HealthResponse> for HealthStatus {
    fn from(response: &HealthResponse) -> Self {
        HealthStatus::from_reported(&response.status)
    }
}

/// Failure body. FastAPI sends a string `detail` for handled errors and a
/// list of issues for request validation errors.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub detail: Option<serde_json::Value>,
}

impl ErrorBody {
    pub fn message(&self) -> Option<String> {
        match &self.detail {
            Some(serde_json::Value::String(s)) if !s.trim().is_empty() => Some(s.clone()),
            _ => None,
        }
    }
}

/// Extracts a displayable `detail` from a raw failure body, if it has one.
pub fn parse_error_detail(body: &str) -> Option<String> {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.message())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_health_status_from_reported() {
        assert_eq!(HealthStatus::from_reported("healthy"), HealthStatus::Healthy);
        assert_eq!(HealthStatus::from_reported("Healthy"), HealthStatus::Unhealthy);
        assert_eq!(HealthStatus::from_reported("degraded"), HealthStatus::Unhealthy);
        assert_eq!(HealthStatus::default(), HealthStatus::Unknown);
        assert!(!HealthStatus::Unknown.is_healthy());
    }

    #[test]
    fn test_parse_error_detail() {
        assert_eq!(
            parse_error_detail(r#"{"detail": "quota exceeded"}"#).as_deref(),
            Some("quota exceeded")
        );
        assert_eq!(parse_error_detail(""), None);
        assert_eq!(parse_error_detail("<html>Bad Gateway</html>"), None);
        assert_eq!(parse_error_detail(r#"{"error": "boom"}"#), None);
        assert_eq!(
            parse_error_detail(r#"{"detail": [{"loc": ["body", "theme"], "msg": "too long"}]}"#),
            None
        );
    }
}
