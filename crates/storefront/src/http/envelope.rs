//! Response envelope decoding and status classification.

use serde::Deserialize;
use serde::de::DeserializeOwned;

use super::transport::RawResponse;
use crate::error::ApiError;

/// The uniform wrapper every endpoint returns.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope<T> {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub status_code: Option<u16>,
    #[serde(default)]
    pub message: Option<String>,
    pub data: Option<T>,
}

/// Just the message, for error bodies whose `data` shape is unknown.
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

/// Extract the message from an error body, if it is JSON at all.
fn error_message(body: &str) -> Option<String> {
    serde_json::from_str::<ErrorEnvelope>(body)
        .ok()
        .and_then(|e| e.message.or(e.error))
        .filter(|m| !m.trim().is_empty())
}

/// Decode a response into its `data` payload, classifying failures.
///
/// - 2xx with `success: true` yields `data` (possibly absent);
/// - 2xx with `success: false` is treated as a rejection;
/// - 401 is [`ApiError::Unauthorized`];
/// - other 4xx is [`ApiError::Rejected`] with the envelope message;
/// - everything else is [`ApiError::Server`].
///
/// # Errors
///
/// Returns the classified [`ApiError`].
pub fn decode<T: DeserializeOwned>(response: &RawResponse) -> Result<Option<T>, ApiError> {
    match response.status {
        200..=299 => {
            if response.body.trim().is_empty() {
                return Ok(None);
            }
            let envelope: Envelope<T> = serde_json::from_str(&response.body)?;
            if envelope.success {
                Ok(envelope.data)
            } else {
                Err(ApiError::Rejected {
                    status: envelope.status_code.unwrap_or(response.status),
                    message: envelope.message,
                })
            }
        }
        401 => Err(ApiError::Unauthorized {
            message: error_message(&response.body),
        }),
        400..=499 => Err(ApiError::Rejected {
            status: response.status,
            message: error_message(&response.body),
        }),
        status => Err(ApiError::Server {
            status,
            message: error_message(&response.body),
        }),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Payload {
        value: u32,
    }

    #[test]
    fn test_decode_success() {
        let response = RawResponse::new(
            200,
            r#"{"success":true,"statusCode":200,"message":"ok","data":{"value":7}}"#,
        );
        let data: Option<Payload> = decode(&response).unwrap();
        assert_eq!(data, Some(Payload { value: 7 }));
    }

    #[test]
    fn test_decode_success_without_data() {
        let response = RawResponse::new(200, r#"{"success":true,"statusCode":200}"#);
        let data: Option<Payload> = decode(&response).unwrap();
        assert_eq!(data, None);

        let empty: Option<Payload> = decode(&RawResponse::new(204, "")).unwrap();
        assert_eq!(empty, None);
    }

    #[test]
    fn test_decode_validation_failure_keeps_message() {
        let response = RawResponse::new(
            400,
            r#"{"success":false,"statusCode":400,"message":"Quantity exceeds stock"}"#,
        );
        let err = decode::<Payload>(&response).unwrap_err();
        assert!(matches!(
            &err,
            ApiError::Rejected { status: 400, message: Some(m) } if m == "Quantity exceeds stock"
        ));
        assert_eq!(err.user_message(), "Quantity exceeds stock");
    }

    #[test]
    fn test_decode_unauthorized() {
        let err = decode::<Payload>(&RawResponse::new(401, "")).unwrap_err();
        assert!(matches!(err, ApiError::Unauthorized { message: None }));
    }

    #[test]
    fn test_decode_server_error_with_html_body() {
        let err = decode::<Payload>(&RawResponse::new(502, "<html>Bad gateway</html>")).unwrap_err();
        assert!(matches!(err, ApiError::Server { status: 502, message: None }));
    }

    #[test]
    fn test_decode_success_false_on_2xx() {
        let response = RawResponse::new(
            200,
            r#"{"success":false,"statusCode":409,"message":"Already in wishlist"}"#,
        );
        let err = decode::<Payload>(&response).unwrap_err();
        assert!(matches!(err, ApiError::Rejected { status: 409, .. }));
    }

    #[test]
    fn test_decode_garbage_on_2xx() {
        let err = decode::<Payload>(&RawResponse::new(200, "nope")).unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
    }
}
