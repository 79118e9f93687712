//! Result envelope shared by every agent and graph operation.

use serde::{Deserialize, Serialize};

/// Why an operation fell back to its degraded payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Degradation {
    /// No completion provider is configured.
    CompletionDisabled,
    /// The provider call failed or returned nothing.
    NoResponse,
    /// The provider answered but the answer could not be used.
    MalformedResponse,
}

impl std::fmt::Display for Degradation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Degradation::CompletionDisabled => write!(f, "completion_disabled"),
            Degradation::NoResponse => write!(f, "no_response"),
            Degradation::MalformedResponse => write!(f, "malformed_response"),
        }
    }
}

/// Either the model-produced payload or a usable fallback with the reason.
///
/// The payload is present in both arms. Serializes as the payload's fields
/// plus `success` and, when degraded, `reason`.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome<T> {
    Ok(T),
    Degraded { payload: T, reason: Degradation },
}

impl<T> Outcome<T> {
    pub fn degraded(payload: T, reason: Degradation) -> Self {
        Outcome::Degraded { payload, reason }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, Outcome::Ok(_))
    }

    pub fn reason(&self) -> Option<Degradation> {
        match self {
            Outcome::Ok(_) => None,
            Outcome::Degraded { reason, .. } => Some(*reason),
        }
    }

    pub fn payload(&self) -> &T {
        match self {
            Outcome::Ok(payload) | Outcome::Degraded { payload, .. } => payload,
        }
    }

    pub fn into_payload(self) -> T {
        match self {
            Outcome::Ok(payload) | Outcome::Degraded { payload, .. } => payload,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        match self {
            Outcome::Ok(payload) => Outcome::Ok(f(payload)),
            Outcome::Degraded { payload, reason } => Outcome::Degraded {
                payload: f(payload),
                reason,
            },
        }
    }

    /// Keep this payload but adopt `other`'s degradation if this one is ok.
    pub fn degrade_with(self, other: Option<Degradation>) -> Self {
        match (self, other) {
            (Outcome::Ok(payload), Some(reason)) => Outcome::Degraded { payload, reason },
            (outcome, _) => outcome,
        }
    }
}

#[derive(Serialize)]
struct Envelope<'a, T> {
    #[serde(flatten)]
    payload: &'a T,
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<Degradation>,
}

impl<T: Serialize> Serialize for Outcome<T> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        Envelope {
            payload: self.payload(),
            success: self.is_ok(),
            reason: self.reason(),
        }
        .serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Serialize)]
    struct Adjusted {
        adjusted_content: String,
        target_tone: String,
    }

    #[test]
    fn test_ok_envelope() {
        let outcome = Outcome::Ok(Adjusted {
            adjusted_content: "Hi".to_string(),
            target_tone: "casual".to_string(),
        });
        assert_eq!(
            serde_json::to_value(&outcome).unwrap(),
            json!({"adjusted_content": "Hi", "target_tone": "casual", "success": true})
        );
    }

    #[test]
    fn test_degraded_envelope() {
        let outcome = Outcome::degraded(
            Adjusted {
                adjusted_content: "original".to_string(),
                target_tone: "calm".to_string(),
            },
            Degradation::CompletionDisabled,
        );
        assert_eq!(
            serde_json::to_value(&outcome).unwrap(),
            json!({
                "adjusted_content": "original",
                "target_tone": "calm",
                "success": false,
                "reason": "completion_disabled"
            })
        );
    }

    #[test]
    fn test_degrade_with() {
        let ok: Outcome<u8> = Outcome::Ok(1);
        assert_eq!(ok.clone().degrade_with(None), Outcome::Ok(1));
        assert_eq!(
            ok.degrade_with(Some(Degradation::NoResponse)).reason(),
            Some(Degradation::NoResponse)
        );

        let degraded = Outcome::degraded(2u8, Degradation::MalformedResponse);
        assert_eq!(
            degraded
                .degrade_with(Some(Degradation::NoResponse))
                .reason(),
            Some(Degradation::MalformedResponse)
        );
    }
}
