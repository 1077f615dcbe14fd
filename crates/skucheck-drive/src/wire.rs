//! Listing and error documents returned by the files endpoint.

use serde::Deserialize;
use serde_json::Value;
use skucheck_core::{EnumerationError, RemoteFile};

/// Structured reasons that mean the API is off for this key or out of quota.
const QUOTA_REASONS: &[&str] = &[
    "accessNotConfigured",
    "dailyLimitExceeded",
    "quotaExceeded",
    "rateLimitExceeded",
    "userRateLimitExceeded",
];

const SERVICE_DISABLED: &str = "SERVICE_DISABLED";

#[derive(Debug, Deserialize)]
pub(crate) struct FileList {
    #[serde(default)]
    pub(crate) files: Vec<WireFile>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WireFile {
    id: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    mime_type: String,
    #[serde(default)]
    size: Option<String>,
    #[serde(default)]
    thumbnail_link: Option<String>,
}

impl From<WireFile> for RemoteFile {
    fn from(file: WireFile) -> Self {
        Self {
            id: file.id,
            name: file.name,
            mime_type: file.mime_type,
            size: file.size.and_then(|size| size.trim().parse().ok()),
            thumbnail_link: file.thumbnail_link,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct ErrorEnvelope {
    #[serde(default)]
    error: ErrorBody,
}

#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    errors: Vec<ErrorItem>,
    #[serde(default)]
    details: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct ErrorItem {
    #[serde(default)]
    reason: Option<String>,
}

impl ErrorBody {
    fn first_reason(&self) -> Option<&str> {
        self.errors
            .iter()
            .find_map(|item| item.reason.as_deref())
            .filter(|reason| !reason.is_empty())
    }

    fn quota_reason(&self) -> Option<String> {
        let listed = self
            .errors
            .iter()
            .filter_map(|item| item.reason.as_deref())
            .find(|reason| QUOTA_REASONS.contains(reason));
        if let Some(reason) = listed {
            return Some(reason.to_string());
        }
        self.details
            .iter()
            .any(|detail| detail.get("reason").and_then(Value::as_str) == Some(SERVICE_DISABLED))
            .then(|| SERVICE_DISABLED.to_string())
    }
}

/// Map a permission-class failure body to its enumeration error.
pub(crate) fn permission_failure(body: &str) -> EnumerationError {
    let envelope: ErrorEnvelope = serde_json::from_str(body).unwrap_or_default();
    match envelope.error.quota_reason() {
        Some(reason) => EnumerationError::QuotaOrApiDisabled { reason },
        None => EnumerationError::AccessDenied {
            reason: envelope.error.first_reason().map(str::to_string),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn size_string_becomes_bytes() -> anyhow::Result<()> {
        let list: FileList = serde_json::from_value(json!({
            "files": [
                { "id": "a", "name": "a.jpg", "mimeType": "image/jpeg", "size": "2048" },
                { "id": "b", "name": "b.jpg", "mimeType": "image/jpeg", "size": "n/a" },
                { "id": "c" }
            ]
        }))?;
        let files: Vec<RemoteFile> = list.files.into_iter().map(RemoteFile::from).collect();
        assert_eq!(files[0].size, Some(2048));
        assert_eq!(files[1].size, None);
        assert_eq!(files[2].name, "");
        Ok(())
    }

    #[test]
    fn api_disabled_reason_is_distinguished() {
        let body = json!({"error": {"errors": [{"reason": "accessNotConfigured"}]}}).to_string();
        assert_eq!(
            permission_failure(&body),
            EnumerationError::QuotaOrApiDisabled {
                reason: "accessNotConfigured".to_string()
            }
        );
    }

    #[test]
    fn service_disabled_detail_is_distinguished() {
        let body = json!({
            "error": {
                "errors": [{"reason": "forbidden"}],
                "details": [{"@type": "type.googleapis.com/google.rpc.ErrorInfo", "reason": "SERVICE_DISABLED"}]
            }
        })
        .to_string();
        assert_eq!(
            permission_failure(&body),
            EnumerationError::QuotaOrApiDisabled {
                reason: "SERVICE_DISABLED".to_string()
            }
        );
    }

    #[test]
    fn other_permission_failures_are_access_denied() {
        let body = json!({"error": {"errors": [{"reason": "insufficientFilePermissions"}]}})
            .to_string();
        assert_eq!(
            permission_failure(&body),
            EnumerationError::AccessDenied {
                reason: Some("insufficientFilePermissions".to_string())
            }
        );
        assert_eq!(
            permission_failure("<html>forbidden</html>"),
            EnumerationError::AccessDenied { reason: None }
        );
    }
}
