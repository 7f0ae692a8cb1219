//! The two concerns wrapped around every transport call: credential
//! attachment on the way out and failure classification on the way back.

use super::error::{ApiError, FailureKind, FALLBACK_MESSAGE};
use crate::session::Session;
use reqwest::{RequestBuilder, StatusCode};
use serde_json::Value;

/// Add `Authorization: Bearer <credential>` when a credential is stored.
pub fn attach_credential(request: RequestBuilder, session: &Session) -> RequestBuilder {
    match session.credential() {
        Some(token) => request.bearer_auth(token),
        None => request,
    }
}

/// Map an error response to the failure taxonomy.
///
/// 401 is the only status that invalidates the session.
pub fn classify_failure(status: StatusCode, body: &[u8]) -> ApiError {
    if status == StatusCode::UNAUTHORIZED {
        return ApiError::Unauthorized;
    }

    let message = server_message(body).unwrap_or_else(|| FALLBACK_MESSAGE.to_string());
    ApiError::request_failed(message, Some(status.as_u16()), FailureKind::Status)
}

/// Map a transport-level failure (no usable response) to the taxonomy.
pub fn classify_transport_error(error: &reqwest::Error) -> ApiError {
    if let Some(status) = error.status() {
        return classify_failure(status, &[]);
    }

    let kind = if error.is_timeout() {
        FailureKind::Timeout
    } else if error.is_connect() {
        FailureKind::Connect
    } else {
        FailureKind::Transport
    };
    ApiError::request_failed(FALLBACK_MESSAGE, None, kind)
}

/// Decode a success body. Empty bodies become `null`; non-JSON bodies are
/// passed through as a string.
pub fn decode_payload(body: &[u8]) -> Value {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Value::Null;
    }
    serde_json::from_slice(body)
        .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(body).into_owned()))
}

/// Non-empty string `message` field of a JSON error body
fn server_message(body: &[u8]) -> Option<String> {
    let value: Value = serde_json::from_slice(body).ok()?;
    value
        .get("message")
        .and_then(Value::as_str)
        .filter(|m| !m.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::MemoryCredentialStore;
    use reqwest::header::AUTHORIZATION;

    fn build(session: &Session) -> reqwest::Request {
        let request = reqwest::Client::new().get("http://localhost/api/customers");
        attach_credential(request, session).build().unwrap()
    }

    #[test]
    fn test_attach_credential_when_stored() {
        let session = Session::from_store(MemoryCredentialStore::with_token("abc.def"));
        let request = build(&session);
        assert_eq!(
            request.headers().get(AUTHORIZATION).unwrap(),
            "Bearer abc.def"
        );
    }

    #[test]
    fn test_no_header_without_credential() {
        let session = Session::from_store(MemoryCredentialStore::new());
        let request = build(&session);
        assert!(request.headers().get(AUTHORIZATION).is_none());
    }

    #[test]
    fn test_classify_401_as_unauthorized() {
        let err = classify_failure(StatusCode::UNAUTHORIZED, br#"{"message":"expired"}"#);
        assert_eq!(err, ApiError::Unauthorized);
    }

    #[test]
    fn test_classify_uses_server_message() {
        let err = classify_failure(
            StatusCode::CONFLICT,
            br#"{"status":409,"error":"Conflict","message":"Table already booked"}"#,
        );
        assert_eq!(err.user_message(), "Table already booked");
        assert_eq!(err.status(), Some(409));
    }

    #[test]
    fn test_server_message_is_shown_verbatim() {
        let err = classify_failure(StatusCode::BAD_REQUEST, br#"{"message":"  X  "}"#);
        assert_eq!(err.user_message(), "  X  ");

        let err = classify_failure(StatusCode::BAD_REQUEST, br#"{"message":" "}"#);
        assert_eq!(err.user_message(), " ");
    }

    #[test]
    fn test_classify_falls_back_without_message() {
        let bodies: [&[u8]; 5] = [
            b"",
            b"<html>oops</html>",
            br#"{"error":"x"}"#,
            br#"{"message":""}"#,
            br#"{"message":12}"#,
        ];
        for body in bodies {
            let err = classify_failure(StatusCode::INTERNAL_SERVER_ERROR, body);
            assert_eq!(err.user_message(), FALLBACK_MESSAGE);
        }
    }

    #[test]
    fn test_403_is_not_a_session_failure() {
        let err = classify_failure(StatusCode::FORBIDDEN, b"");
        assert!(!err.is_unauthorized());
    }

    #[test]
    fn test_decode_payload() {
        assert_eq!(decode_payload(b""), Value::Null);
        assert_eq!(decode_payload(b"  \n"), Value::Null);
        assert_eq!(decode_payload(br#"[{"id":1}]"#), serde_json::json!([{"id": 1}]));
        assert_eq!(decode_payload(b"ok"), Value::String("ok".to_string()));
    }
}
