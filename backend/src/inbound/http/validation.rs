//! Shared validation helpers for inbound HTTP adapters.

use actix_web::error::{JsonPayloadError, QueryPayloadError};
use actix_web::{HttpRequest, web};
use serde_json::json;

use crate::domain::{
    Error, FeeAmount, FeeAmountValidationError, MobileNumber, MobileNumberError, YesNo,
};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    MissingField,
    InvalidMobileNo,
    InvalidYesNo,
    InvalidFeeAmount,
    MalformedBody,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::MissingField => "missing_field",
            ErrorCode::InvalidMobileNo => "invalid_mobile_no",
            ErrorCode::InvalidYesNo => "invalid_yes_no",
            ErrorCode::InvalidFeeAmount => "invalid_fee_amount",
            ErrorCode::MalformedBody => "malformed_body",
        }
    }
}

/// Newtype wrapper for HTTP field names to provide type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    pub(crate) fn as_str(&self) -> &'static str {
        self.0
    }
}

/// Builder for validation errors with field context.
struct ValidationError {
    field: String,
    message: String,
}

impl ValidationError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }

    fn with_code(self, code: ErrorCode) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field,
            "code": code.as_str(),
        }))
    }

    fn with_value(self, code: ErrorCode, value: impl Into<String>) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field,
            "value": value.into(),
            "code": code.as_str(),
        }))
    }
}

pub(crate) fn missing_field_error(field: FieldName) -> Error {
    let field = field.as_str();
    ValidationError::new(field, format!("missing required field: {field}"))
        .with_code(ErrorCode::MissingField)
}

/// Require a present, non-blank text value. Surrounding whitespace is
/// trimmed.
pub(crate) fn require_text(value: Option<String>, field: FieldName) -> Result<String, Error> {
    match value.map(|raw| raw.trim().to_owned()) {
        Some(text) if !text.is_empty() => Ok(text),
        _ => Err(missing_field_error(field)),
    }
}

pub(crate) fn parse_mobile_no(value: &str, field: FieldName) -> Result<MobileNumber, Error> {
    MobileNumber::normalize(value).map_err(|_: MobileNumberError| {
        let field = field.as_str();
        ValidationError::new(field, format!("{field} must contain at least one digit"))
            .with_value(ErrorCode::InvalidMobileNo, value)
    })
}

/// A JSON number that cannot stand for a phone number: fractional, negative
/// or too large to decode exactly.
pub(crate) fn inexact_mobile_no_error(value: &str, field: FieldName) -> Error {
    let field = field.as_str();
    ValidationError::new(
        field,
        format!("{field} must be a whole number or a string of digits"),
    )
    .with_value(ErrorCode::InvalidMobileNo, value)
}

pub(crate) fn parse_yes_no(value: &str, field: FieldName) -> Result<YesNo, Error> {
    value.parse::<YesNo>().map_err(|err| {
        let field = field.as_str();
        ValidationError::new(field, format!("{field} must be Yes or No"))
            .with_value(ErrorCode::InvalidYesNo, err.value())
    })
}

pub(crate) fn parse_fee_amount(value: &str, field: FieldName) -> Result<FeeAmount, Error> {
    FeeAmount::new(value).map_err(|err| {
        let field = field.as_str();
        match err {
            FeeAmountValidationError::Empty => missing_field_error(FieldName::new(field)),
            FeeAmountValidationError::NotDecimal => {
                ValidationError::new(field, format!("{field} must be a decimal amount"))
                    .with_value(ErrorCode::InvalidFeeAmount, value)
            }
        }
    })
}

fn malformed_body_error(message: String) -> Error {
    Error::invalid_request(message).with_details(json!({
        "code": ErrorCode::MalformedBody.as_str(),
    }))
}

/// JSON extractor configuration that reports malformed bodies through the
/// shared error envelope.
pub(crate) fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err: JsonPayloadError, _req: &HttpRequest| {
        malformed_body_error(format!("invalid JSON body: {err}")).into()
    })
}

/// Query extractor configuration mirroring [`json_config`].
pub(crate) fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err: QueryPayloadError, _req: &HttpRequest| {
        malformed_body_error(format!("invalid query string: {err}")).into()
    })
}
