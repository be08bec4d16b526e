//! Shared validation helpers for inbound HTTP adapters.

use actix_web::{HttpRequest, error::JsonPayloadError, web};
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::domain::{CatalogueItemRef, Error, Price, PriceValidationError, RentalValidationError};

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    MissingField,
    InvalidBody,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::MissingField => "missing_field",
            ErrorCode::InvalidBody => "invalid_body",
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

pub(crate) fn missing_field_error(field: FieldName) -> Error {
    let field = field.as_str();
    Error::invalid_request(format!("missing required field: {field}")).with_details(json!({
        "field": field,
        "code": ErrorCode::MissingField.as_str(),
    }))
}

/// Unwrap a required body field or report it as missing.
pub(crate) fn require<T>(value: Option<T>, field: FieldName) -> Result<T, Error> {
    value.ok_or_else(|| missing_field_error(field))
}

/// A JSON number or a numeric string.
///
/// Browser forms often submit numbers as strings, so both forms are accepted
/// and handed to the domain parsers as text.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum NumericInput {
    Number(serde_json::Number),
    Text(String),
}

impl NumericInput {
    fn as_text(&self) -> String {
        match self {
            Self::Number(number) => number.to_string(),
            Self::Text(text) => text.clone(),
        }
    }
}

pub(crate) fn parse_price(value: &NumericInput) -> Result<Price, PriceValidationError> {
    match value {
        NumericInput::Text(text) if text.trim().is_empty() => Err(PriceValidationError::NotANumber),
        other => Price::parse(&other.as_text()),
    }
}

pub(crate) fn parse_item_ref(value: &NumericInput) -> Result<CatalogueItemRef, RentalValidationError> {
    CatalogueItemRef::parse(&value.as_text())
}

/// Map body deserialisation failures onto `invalid_request`.
pub(crate) fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    debug!(error = %err, "rejected request body");
    let message = match &err {
        JsonPayloadError::ContentType => "request body must be application/json".to_owned(),
        JsonPayloadError::Deserialize(inner) => format!("invalid request body: {inner}"),
        _ => "invalid request body".to_owned(),
    };
    Error::invalid_request(message)
        .with_details(json!({ "code": ErrorCode::InvalidBody.as_str() }))
        .into()
}

/// JSON extractor configuration shared by every API scope.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(json_error_handler)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode as DomainErrorCode;
    use rstest::rstest;
    use rust_decimal::Decimal;

    fn input(raw: &str) -> NumericInput {
        serde_json::from_str(raw).expect("numeric input")
    }

    #[rstest]
    #[case("15", Decimal::new(15, 0))]
    #[case("0.01", Decimal::new(1, 2))]
    #[case("\"12.50\"", Decimal::new(125, 1))]
    fn prices_accept_numbers_and_strings(#[case] raw: &str, #[case] expected: Decimal) {
        assert_eq!(parse_price(&input(raw)).expect("price").amount(), expected);
    }

    #[rstest]
    #[case("0", PriceValidationError::NotPositive)]
    #[case("-5", PriceValidationError::NotPositive)]
    #[case("\"abc\"", PriceValidationError::NotANumber)]
    #[case("\"  \"", PriceValidationError::NotANumber)]
    fn prices_reject_non_positive_and_garbage(
        #[case] raw: &str,
        #[case] expected: PriceValidationError,
    ) {
        assert_eq!(parse_price(&input(raw)).expect_err("invalid"), expected);
    }

    #[rstest]
    #[case("7", Some(7))]
    #[case("\"42\"", Some(42))]
    #[case("0", None)]
    #[case("1.5", None)]
    #[case("\"seven\"", None)]
    fn item_refs_must_be_positive_integers(#[case] raw: &str, #[case] expected: Option<i64>) {
        assert_eq!(
            parse_item_ref(&input(raw)).ok().map(CatalogueItemRef::get),
            expected
        );
    }

    #[rstest]
    fn missing_fields_name_the_field() {
        let error = require::<String>(None, FieldName::new("title")).expect_err("missing");
        assert_eq!(error.code(), DomainErrorCode::InvalidRequest);
        assert_eq!(
            error.details(),
            Some(&json!({"field": "title", "code": "missing_field"}))
        );
    }
}
