//! Decision response interpretation.
//!
//! The deployment decides which of two wire formats applies:
//!
//! - **Proxy**: the status code is the decision. `200` allows; anything else
//!   rejects with the body text as the reason.
//! - **Native**: an OPA document, `{"result": {"<key>": [reasons...]}}`. An
//!   empty list allows; otherwise the first reason rejects. The HTTP status is
//!   not consulted.
//!
//! The format is never guessed from the payload. A native body arriving in
//! proxy mode is treated as proxy text, and the reverse is a malformed
//! response.

use pipeguard_types::ResponseMode;
use serde_json::Value;

use crate::client::RawDecision;
use crate::document::{FieldError, array_field, as_object, object_field, to_text};
use crate::error::{GateError, Result, ValidationRejected};

/// Terminal result of a gate evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateOutcome {
    /// The write may proceed.
    Allow,
    /// The write is blocked for the given reason.
    Reject(String),
}

impl GateOutcome {
    /// Whether the write may proceed.
    pub fn is_allowed(&self) -> bool {
        matches!(self, GateOutcome::Allow)
    }

    /// The rejection reason, if any.
    pub fn reason(&self) -> Option<&str> {
        match self {
            GateOutcome::Allow => None,
            GateOutcome::Reject(reason) => Some(reason),
        }
    }

    /// Convert to a `Result` for the save pathway.
    pub fn into_result(self) -> std::result::Result<(), ValidationRejected> {
        match self {
            GateOutcome::Allow => Ok(()),
            GateOutcome::Reject(reason) => Err(ValidationRejected { reason }),
        }
    }
}

impl From<GateError> for GateOutcome {
    fn from(err: GateError) -> Self {
        GateOutcome::Reject(err.to_string())
    }
}

/// Interpret `response` under `mode`, reading `decision_key` in native mode.
pub fn interpret(mode: ResponseMode, decision_key: &str, response: &RawDecision) -> GateOutcome {
    match decide(mode, decision_key, response) {
        Ok(()) => GateOutcome::Allow,
        Err(err) => err.into(),
    }
}

/// Like [`interpret`], keeping the error kind.
pub fn decide(mode: ResponseMode, decision_key: &str, response: &RawDecision) -> Result<()> {
    match mode {
        ResponseMode::Proxy if response.status == 200 => Ok(()),
        ResponseMode::Proxy => Err(GateError::PolicyDenied(response.body.clone())),
        ResponseMode::Native => decide_native(decision_key, &response.body),
    }
}

fn decide_native(decision_key: &str, body: &str) -> Result<()> {
    let doc: Value = serde_json::from_str(body).map_err(|e| {
        GateError::MalformedResponse(format!("the OPA response is not valid JSON: {e}"))
    })?;
    let doc = as_object(&doc).map_err(|_| {
        GateError::MalformedResponse("the OPA response is not a JSON object".into())
    })?;

    let result = object_field(doc, "result").map_err(|e| malformed("result", e))?;
    let reasons = array_field(result, decision_key).map_err(|e| malformed(decision_key, e))?;

    match reasons.first() {
        None => Ok(()),
        Some(first) => Err(GateError::PolicyDenied(to_text(first))),
    }
}

fn malformed(field: &str, err: FieldError) -> GateError {
    let message = match err {
        FieldError::Absent => format!("there is no '{field}' field in the OPA response"),
        FieldError::WrongShape { expected } => {
            format!("the '{field}' field in the OPA response is not an {expected}")
        }
    };
    GateError::MalformedResponse(message)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(status: u16, body: &str) -> RawDecision {
        RawDecision {
            status,
            body: body.into(),
        }
    }

    fn native(body: &str) -> GateOutcome {
        interpret(ResponseMode::Native, "deny", &raw(200, body))
    }

    // ── Proxy ─────────────────────────────────────────────────────────

    #[test]
    fn proxy_200_allows() {
        let outcome = interpret(ResponseMode::Proxy, "deny", &raw(200, "ok"));
        assert_eq!(outcome, GateOutcome::Allow);
    }

    #[test]
    fn proxy_non_200_rejects_with_body_verbatim() {
        let outcome = interpret(ResponseMode::Proxy, "deny", &raw(403, "not permitted"));
        assert_eq!(outcome, GateOutcome::Reject("not permitted".into()));
    }

    #[test]
    fn proxy_other_2xx_still_rejects() {
        let outcome = interpret(ResponseMode::Proxy, "deny", &raw(204, "no content"));
        assert_eq!(outcome.reason(), Some("no content"));
    }

    #[test]
    fn proxy_ignores_native_body() {
        let outcome = interpret(
            ResponseMode::Proxy,
            "deny",
            &raw(200, r#"{"result":{"deny":["blocked"]}}"#),
        );
        assert!(outcome.is_allowed());
    }

    // ── Native ────────────────────────────────────────────────────────

    #[test]
    fn native_empty_list_allows() {
        assert_eq!(native(r#"{"result":{"deny":[]}}"#), GateOutcome::Allow);
    }

    #[test]
    fn native_first_reason_rejects() {
        let outcome = native(r#"{"result":{"deny":["missing owner tag","second"]}}"#);
        assert_eq!(outcome, GateOutcome::Reject("missing owner tag".into()));
    }

    #[test]
    fn native_ignores_status() {
        let outcome = interpret(
            ResponseMode::Native,
            "deny",
            &raw(500, r#"{"result":{"deny":[]}}"#),
        );
        assert!(outcome.is_allowed());
    }

    #[test]
    fn native_missing_result() {
        assert_eq!(
            native("{}").reason(),
            Some("there is no 'result' field in the OPA response")
        );
    }

    #[test]
    fn native_missing_decision_key() {
        assert_eq!(
            native(r#"{"result":{"allow":true}}"#).reason(),
            Some("there is no 'deny' field in the OPA response")
        );
    }

    #[test]
    fn native_wrong_shapes() {
        assert_eq!(
            native(r#"{"result":[]}"#).reason(),
            Some("the 'result' field in the OPA response is not an object")
        );
        assert_eq!(
            native(r#"{"result":{"deny":"nope"}}"#).reason(),
            Some("the 'deny' field in the OPA response is not an array")
        );
    }

    #[test]
    fn native_non_json_body() {
        let outcome = native("<html>bad gateway</html>");
        assert!(
            outcome
                .reason()
                .unwrap()
                .starts_with("the OPA response is not valid JSON")
        );
        assert_eq!(
            native("[1,2]").reason(),
            Some("the OPA response is not a JSON object")
        );
    }

    #[test]
    fn native_non_string_reason_rendered() {
        assert_eq!(native(r#"{"result":{"deny":[7]}}"#).reason(), Some("7"));
    }

    #[test]
    fn native_custom_decision_key() {
        let outcome = interpret(
            ResponseMode::Native,
            "violations",
            &raw(200, r#"{"result":{"violations":["no prod deploys on friday"]}}"#),
        );
        assert_eq!(outcome.reason(), Some("no prod deploys on friday"));
    }

    #[test]
    fn decide_keeps_error_kind() {
        let err = decide(ResponseMode::Native, "deny", &raw(200, "{}")).unwrap_err();
        assert!(matches!(err, GateError::MalformedResponse(_)));
        let err = decide(ResponseMode::Proxy, "deny", &raw(401, "no")).unwrap_err();
        assert!(matches!(err, GateError::PolicyDenied(_)));
    }

    #[test]
    fn outcome_into_result() {
        assert!(GateOutcome::Allow.into_result().is_ok());
        let err = GateOutcome::Reject("nope".into()).into_result().unwrap_err();
        assert_eq!(err.reason, "nope");
    }
}
