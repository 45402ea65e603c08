//! Pub/Sub push envelope.
//!
//! The push subscription wraps every published message in a small JSON
//! document. Only `message.data` is required; the attributes Cloud Build
//! attaches (`buildId`, `status`) are kept for logging but never drive the
//! relay decision.

use crate::build_event::lenient;
use base64::{engine::general_purpose::STANDARD as B64, Engine};
use serde::Deserialize;

/// Outer push delivery.
#[derive(Debug, Clone, Deserialize)]
pub struct PushEnvelope {
    pub message: PushMessage,
    #[serde(default, deserialize_with = "lenient")]
    pub subscription: String,
}

/// The published message carried by the envelope.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PushMessage {
    #[serde(default, deserialize_with = "lenient")]
    pub attributes: MessageAttributes,
    /// Base64 (standard alphabet, padded) build event JSON.
    pub data: String,
    #[serde(default, alias = "message_id", deserialize_with = "lenient")]
    pub message_id: String,
    #[serde(default, alias = "publish_time", deserialize_with = "lenient")]
    pub publish_time: Option<String>,
}

/// Attributes set by Cloud Build on its status topic. Informational only.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MessageAttributes {
    #[serde(default, rename = "buildId", alias = "buildID", deserialize_with = "lenient")]
    pub build_id: String,
    #[serde(default, deserialize_with = "lenient")]
    pub status: String,
}

impl PushEnvelope {
    pub fn from_slice(body: &[u8]) -> Result<Self, crate::Error> {
        serde_json::from_slice(body).map_err(|e| crate::Error::MalformedEnvelope(e.to_string()))
    }
}

impl PushMessage {
    /// Decode the opaque `data` blob.
    pub fn decode_data(&self) -> Result<Vec<u8>, crate::Error> {
        B64.decode(self.data.trim())
            .map_err(|e| crate::Error::MalformedPayload(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PUSH_BODY: &str = r#"{
        "message": {
            "attributes": { "buildId": "abcd-efgh", "status": "SUCCESS" },
            "data": "SGVsbG8gQ2xvdWQgUHViL1N1YiEgSGVyZSBpcyBteSBtZXNzYWdlIQ==",
            "message_id": "136969346945",
            "publishTime": "2021-02-26T19:13:55.749Z"
        },
        "subscription": "projects/myproject/subscriptions/mysubscription"
    }"#;

    #[test]
    fn test_parse_push_envelope() {
        let envelope = PushEnvelope::from_slice(PUSH_BODY.as_bytes()).unwrap();
        assert_eq!(
            envelope.subscription,
            "projects/myproject/subscriptions/mysubscription"
        );
        assert_eq!(envelope.message.attributes.build_id, "abcd-efgh");
        assert_eq!(envelope.message.attributes.status, "SUCCESS");
        assert_eq!(envelope.message.message_id, "136969346945");
        assert_eq!(
            envelope.message.publish_time.as_deref(),
            Some("2021-02-26T19:13:55.749Z")
        );
        assert_eq!(
            envelope.message.decode_data().unwrap(),
            b"Hello Cloud Pub/Sub! Here is my message!"
        );
    }

    #[test]
    fn test_optional_fields_default() {
        let envelope = PushEnvelope::from_slice(br#"{"message":{"data":""}}"#).unwrap();
        assert!(envelope.subscription.is_empty());
        assert!(envelope.message.attributes.build_id.is_empty());
        assert!(envelope.message.publish_time.is_none());
        assert!(envelope.message.decode_data().unwrap().is_empty());
    }

    #[test]
    fn test_camel_case_message_id() {
        let envelope =
            PushEnvelope::from_slice(br#"{"message":{"data":"","messageId":"42"}}"#).unwrap();
        assert_eq!(envelope.message.message_id, "42");
    }

    #[test]
    fn test_null_informational_fields_default() {
        let envelope = PushEnvelope::from_slice(
            br#"{"message":{"data":"e30=","attributes":null,"messageId":null,"publishTime":null},"subscription":null}"#,
        )
        .unwrap();
        assert!(envelope.subscription.is_empty());
        assert!(envelope.message.attributes.build_id.is_empty());
        assert!(envelope.message.message_id.is_empty());
        assert!(envelope.message.publish_time.is_none());
        assert_eq!(envelope.message.decode_data().unwrap(), b"{}");

        let envelope = PushEnvelope::from_slice(
            br#"{"message":{"data":"e30=","attributes":{"buildId":null,"status":null}}}"#,
        )
        .unwrap();
        assert!(envelope.message.attributes.status.is_empty());
    }

    #[test]
    fn test_null_data_is_malformed_envelope() {
        let err = PushEnvelope::from_slice(br#"{"message":{"data":null}}"#).unwrap_err();
        assert!(matches!(err, crate::Error::MalformedEnvelope(_)));
    }

    #[test]
    fn test_invalid_json_is_malformed_envelope() {
        let err = PushEnvelope::from_slice(b"not json").unwrap_err();
        assert!(matches!(err, crate::Error::MalformedEnvelope(_)));
    }

    #[test]
    fn test_missing_data_is_malformed_envelope() {
        let err = PushEnvelope::from_slice(br#"{"message":{"attributes":{}}}"#).unwrap_err();
        assert!(matches!(err, crate::Error::MalformedEnvelope(_)));

        let err = PushEnvelope::from_slice(br#"{"subscription":"s"}"#).unwrap_err();
        assert!(matches!(err, crate::Error::MalformedEnvelope(_)));
    }

    #[test]
    fn test_invalid_base64_is_malformed_payload() {
        let envelope =
            PushEnvelope::from_slice(br#"{"message":{"data":"%%%not-base64%%%"}}"#).unwrap();
        let err = envelope.message.decode_data().unwrap_err();
        assert!(matches!(err, crate::Error::MalformedPayload(_)));
    }
}
