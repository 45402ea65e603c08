//! Cloud Build event schema.
//!
//! Decoding is forward-compatible: unknown fields are dropped, and a missing
//! or ill-typed field falls back to its default instead of failing the whole
//! event. Only a payload that is not a JSON object is rejected.

use serde::de::{DeserializeOwned, Deserializer};
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;

/// Build lifecycle status as published by Cloud Build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BuildStatus {
    #[default]
    Unknown,
    Pending,
    Queued,
    Working,
    Success,
    Failure,
    InternalError,
    Timeout,
    Cancelled,
    Expired,
}

impl BuildStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BuildStatus::Unknown => "STATUS_UNKNOWN",
            BuildStatus::Pending => "PENDING",
            BuildStatus::Queued => "QUEUED",
            BuildStatus::Working => "WORKING",
            BuildStatus::Success => "SUCCESS",
            BuildStatus::Failure => "FAILURE",
            BuildStatus::InternalError => "INTERNAL_ERROR",
            BuildStatus::Timeout => "TIMEOUT",
            BuildStatus::Cancelled => "CANCELLED",
            BuildStatus::Expired => "EXPIRED",
        }
    }

    /// Look up a status by its canonical name. Unrecognised names map to `Unknown`.
    pub fn from_name(name: &str) -> Self {
        match name {
            "PENDING" => BuildStatus::Pending,
            "QUEUED" => BuildStatus::Queued,
            "WORKING" => BuildStatus::Working,
            "SUCCESS" => BuildStatus::Success,
            "FAILURE" => BuildStatus::Failure,
            "INTERNAL_ERROR" => BuildStatus::InternalError,
            "TIMEOUT" => BuildStatus::Timeout,
            "CANCELLED" => BuildStatus::Cancelled,
            "EXPIRED" => BuildStatus::Expired,
            _ => BuildStatus::Unknown,
        }
    }

    /// Look up a status by its protobuf enum number.
    pub fn from_code(code: i64) -> Self {
        match code {
            10 => BuildStatus::Pending,
            1 => BuildStatus::Queued,
            2 => BuildStatus::Working,
            3 => BuildStatus::Success,
            4 => BuildStatus::Failure,
            5 => BuildStatus::InternalError,
            6 => BuildStatus::Timeout,
            7 => BuildStatus::Cancelled,
            9 => BuildStatus::Expired,
            _ => BuildStatus::Unknown,
        }
    }

    /// Statuses that never produce a notification.
    pub fn is_in_progress(&self) -> bool {
        matches!(self, BuildStatus::Queued | BuildStatus::Working)
    }
}

impl fmt::Display for BuildStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for BuildStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Value::deserialize(deserializer)? {
            Value::String(name) => BuildStatus::from_name(&name),
            Value::Number(n) => n.as_i64().map_or(BuildStatus::Unknown, BuildStatus::from_code),
            _ => BuildStatus::Unknown,
        })
    }
}

/// A decoded Cloud Build resource. Every field is optional.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BuildEvent {
    #[serde(deserialize_with = "lenient")]
    pub id: String,
    #[serde(deserialize_with = "lenient")]
    pub project_id: String,
    #[serde(deserialize_with = "lenient")]
    pub status: BuildStatus,
    #[serde(deserialize_with = "lenient")]
    pub log_url: String,
    #[serde(deserialize_with = "lenient")]
    pub source: Source,
    #[serde(deserialize_with = "lenient")]
    pub substitutions: HashMap<String, String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Source {
    #[serde(deserialize_with = "lenient")]
    pub repo_source: Option<RepoSource>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RepoSource {
    #[serde(deserialize_with = "lenient")]
    pub repo_name: String,
    #[serde(deserialize_with = "lenient")]
    pub branch_name: String,
}

impl BuildEvent {
    /// Decode the bytes carried in a push message's `data` field.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, crate::Error> {
        let value: Value = serde_json::from_slice(bytes)
            .map_err(|e| crate::Error::DecodeBuildEvent(e.to_string()))?;
        if !value.is_object() {
            return Err(crate::Error::DecodeBuildEvent(
                "build event must be a JSON object".into(),
            ));
        }
        BuildEvent::deserialize(value).map_err(|e| crate::Error::DecodeBuildEvent(e.to_string()))
    }

    /// Repository name from the repo source, else the trigger's `REPO_NAME` substitution.
    pub fn repo_name(&self) -> &str {
        let direct = self.source.repo_source.as_ref().map(|r| r.repo_name.as_str());
        self.or_substitution(direct, "REPO_NAME")
    }

    /// Branch name from the repo source, else the trigger's `BRANCH_NAME` substitution.
    pub fn branch_name(&self) -> &str {
        let direct = self.source.repo_source.as_ref().map(|r| r.branch_name.as_str());
        self.or_substitution(direct, "BRANCH_NAME")
    }

    fn or_substitution<'a>(&'a self, direct: Option<&'a str>, key: &str) -> &'a str {
        direct
            .filter(|v| !v.is_empty())
            .or_else(|| self.substitutions.get(key).map(String::as_str))
            .unwrap_or("")
    }
}

/// Deserialize `T`, falling back to `T::default()` when the value has the wrong shape.
pub(crate) fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(T::deserialize(value).unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_full_event() {
        let event = BuildEvent::from_slice(
            br#"{
                "id": "b-1",
                "projectId": "proj",
                "status": "FAILURE",
                "logUrl": "https://console.cloud.google.com/cloud-build/builds/b-1",
                "source": { "repoSource": { "repoName": "myrepo", "branchName": "main" } },
                "steps": [{ "name": "gcr.io/cloud-builders/docker" }],
                "createTime": "2021-02-26T19:13:55.749Z"
            }"#,
        )
        .unwrap();
        assert_eq!(event.id, "b-1");
        assert_eq!(event.project_id, "proj");
        assert_eq!(event.status, BuildStatus::Failure);
        assert_eq!(event.repo_name(), "myrepo");
        assert_eq!(event.branch_name(), "main");
    }

    #[test]
    fn test_numeric_status() {
        let event = BuildEvent::from_slice(br#"{"status": 2}"#).unwrap();
        assert_eq!(event.status, BuildStatus::Working);
        let event = BuildEvent::from_slice(br#"{"status": 10}"#).unwrap();
        assert_eq!(event.status, BuildStatus::Pending);
    }

    #[test]
    fn test_unrecognised_status_is_unknown() {
        let event = BuildEvent::from_slice(br#"{"status": "PAUSED"}"#).unwrap();
        assert_eq!(event.status, BuildStatus::Unknown);
        assert_eq!(event.status.to_string(), "STATUS_UNKNOWN");
        assert!(!event.status.is_in_progress());
    }

    #[test]
    fn test_empty_object_decodes_to_defaults() {
        let event = BuildEvent::from_slice(b"{}").unwrap();
        assert_eq!(event.status, BuildStatus::Unknown);
        assert_eq!(event.repo_name(), "");
        assert_eq!(event.branch_name(), "");
        assert_eq!(event.log_url, "");
    }

    #[test]
    fn test_ill_typed_fields_are_tolerated() {
        let event = BuildEvent::from_slice(
            br#"{
                "status": "SUCCESS",
                "logUrl": 17,
                "source": "not-an-object",
                "substitutions": ["x"]
            }"#,
        )
        .unwrap();
        assert_eq!(event.status, BuildStatus::Success);
        assert_eq!(event.log_url, "");
        assert!(event.source.repo_source.is_none());
        assert!(event.substitutions.is_empty());
    }

    #[test]
    fn test_substitutions_fallback() {
        let event = BuildEvent::from_slice(
            br#"{
                "status": "SUCCESS",
                "substitutions": { "REPO_NAME": "gh-repo", "BRANCH_NAME": "dev" }
            }"#,
        )
        .unwrap();
        assert_eq!(event.repo_name(), "gh-repo");
        assert_eq!(event.branch_name(), "dev");
    }

    #[test]
    fn test_repo_source_wins_over_substitutions() {
        let event = BuildEvent::from_slice(
            br#"{
                "source": { "repoSource": { "repoName": "csr-repo", "branchName": "main" } },
                "substitutions": { "REPO_NAME": "gh-repo", "BRANCH_NAME": "dev" }
            }"#,
        )
        .unwrap();
        assert_eq!(event.repo_name(), "csr-repo");
        assert_eq!(event.branch_name(), "main");
    }

    #[test]
    fn test_non_object_payload_is_rejected() {
        let payloads: [&[u8]; 4] = [b"Hello Cloud Pub/Sub!", b"[1,2]", b"\"SUCCESS\"", b""];
        for payload in payloads {
            let err = BuildEvent::from_slice(payload).unwrap_err();
            assert!(matches!(err, crate::Error::DecodeBuildEvent(_)));
        }
    }

    #[test]
    fn test_in_progress_set() {
        assert!(BuildStatus::Queued.is_in_progress());
        assert!(BuildStatus::Working.is_in_progress());
        for status in [
            BuildStatus::Unknown,
            BuildStatus::Pending,
            BuildStatus::Success,
            BuildStatus::Failure,
            BuildStatus::InternalError,
            BuildStatus::Timeout,
            BuildStatus::Cancelled,
            BuildStatus::Expired,
        ] {
            assert!(!status.is_in_progress(), "{status} must notify");
        }
    }
}
