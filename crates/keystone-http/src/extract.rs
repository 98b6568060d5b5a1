//! Request-body extraction with validation.

use axum::Json;
use axum::extract::{FromRequest, Request};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::failure::{Failure, FieldViolation};

/// JSON body extractor that funnels both deserialization and validation
/// failures into [`Failure::Validation`].
///
/// Missing required fields are reported as `"Field required"`. serde stops
/// at the first missing field, so a body missing several required fields
/// surfaces them one request at a time; `validator` rule failures arrive
/// together and keep their declared messages. Anything the deserializer
/// cannot attribute to a field is reported under `"body"`.
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = Failure;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<serde_json::Value>::from_request(req, state)
            .await
            .map_err(|_| {
                Failure::Validation(vec![FieldViolation::new("body", "Invalid JSON body")])
            })?;

        let parsed: T = serde_json::from_value(value).map_err(|err| {
            let message = err.to_string();
            let violation = match missing_field(&message) {
                Some(field) => FieldViolation::new(field, "Field required"),
                None => FieldViolation::new("body", "Invalid request body"),
            };
            Failure::Validation(vec![violation])
        })?;

        parsed.validate()?;
        Ok(Self(parsed))
    }
}

/// Extract the field name from serde's `missing field \`name\`` message.
fn missing_field(message: &str) -> Option<&str> {
    message
        .split("missing field `")
        .nth(1)
        .and_then(|rest| rest.split('`').next())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_field_is_extracted_from_serde_messages() {
        assert_eq!(
            missing_field("missing field `email` at line 1 column 2"),
            Some("email")
        );
        assert_eq!(missing_field("invalid type: integer `3`"), None);
    }

    #[test]
    fn serde_surfaces_one_missing_field_per_pass() {
        #[derive(Debug, serde::Deserialize)]
        #[allow(dead_code)]
        struct Form {
            first: String,
            second: String,
        }

        let err = serde_json::from_value::<Form>(serde_json::json!({})).unwrap_err();
        assert_eq!(missing_field(&err.to_string()), Some("first"));
    }
}
