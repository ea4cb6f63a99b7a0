//! The JSON shapes for transactions entering and leaving the API.

use std::str::FromStr;

use axum::{
    Json,
    extract::{FromRequest, Request, rejection::JsonRejection},
    http::StatusCode,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use time::OffsetDateTime;

use crate::{
    Error, FieldError, FieldErrorKind, ValidationErrors,
    transaction::{Category, NewTransaction, Transaction},
};

/// A validated request to create a transaction.
///
/// Used as an extractor, it rejects the request with a 422 response listing every invalid
/// field before the handler runs.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionCreate {
    /// The value of the transaction, exactly as the client wrote it.
    pub amount: Decimal,
    /// The label describing what kind of transaction this is.
    pub category: Category,
    /// Free text about the transaction.
    pub note: Option<String>,
}

impl TransactionCreate {
    /// Translate into the domain's description of a new transaction.
    pub fn into_new_transaction(self) -> NewTransaction {
        Transaction::build(self.amount, self.category).note(self.note)
    }
}

impl TryFrom<Value> for TransactionCreate {
    type Error = ValidationErrors;

    /// Validate a JSON body.
    ///
    /// `amount` may be a JSON string or number, `category` must be a non-empty string and
    /// `note` may be a string, null or absent. Unknown fields are ignored.
    fn try_from(value: Value) -> Result<Self, Self::Error> {
        let Value::Object(mut fields) = value else {
            return Err(ValidationErrors::from(vec![FieldError::body(
                FieldErrorKind::JsonInvalid,
                "Input should be a valid JSON object",
            )]));
        };

        let mut errors = ValidationErrors::default();

        let amount = take_required(&mut fields, "amount", &mut errors)
            .and_then(|value| collect(parse_amount(&value), &mut errors));
        let category = take_required(&mut fields, "category", &mut errors)
            .and_then(|value| collect(parse_category(value), &mut errors));
        let note = collect(parse_note(fields.remove("note")), &mut errors);

        match (amount, category, note) {
            (Some(amount), Some(category), Some(note)) if errors.is_empty() => Ok(Self {
                amount,
                category,
                note,
            }),
            _ => Err(errors),
        }
    }
}

impl<S> FromRequest<S> for TransactionCreate
where
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request(request: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(body) = Json::<Value>::from_request(request, state)
            .await
            .map_err(rejection_to_error)?;

        TransactionCreate::try_from(body).map_err(|errors| {
            tracing::debug!("rejected transaction: {errors}");
            Error::Validation(errors)
        })
    }
}

fn rejection_to_error(rejection: JsonRejection) -> Error {
    match rejection {
        JsonRejection::MissingJsonContentType(rejection) => {
            Error::UnsupportedMediaType(rejection.body_text())
        }
        rejection if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE => {
            tracing::debug!("rejected transaction: {}", rejection.body_text());
            Error::PayloadTooLarge
        }
        rejection => Error::Validation(ValidationErrors::from(vec![FieldError::body(
            FieldErrorKind::JsonInvalid,
            rejection.body_text(),
        )])),
    }
}

fn take_required(
    fields: &mut Map<String, Value>,
    field: &str,
    errors: &mut ValidationErrors,
) -> Option<Value> {
    let value = fields.remove(field);

    if value.is_none() {
        errors.push(FieldError::new(field, FieldErrorKind::Missing));
    }

    value
}

fn collect<T>(result: Result<T, FieldError>, errors: &mut ValidationErrors) -> Option<T> {
    result.map_err(|error| errors.push(error)).ok()
}

fn parse_amount(value: &Value) -> Result<Decimal, FieldError> {
    let text = match value {
        Value::String(text) => text.trim().to_owned(),
        // With `arbitrary_precision`, JSON numbers keep the digits the client sent.
        Value::Number(number) => number.to_string(),
        _ => return Err(FieldError::new("amount", FieldErrorKind::DecimalParsing)),
    };

    parse_decimal(&text).ok_or_else(|| FieldError::new("amount", FieldErrorKind::DecimalParsing))
}

/// Parse `text` without rounding: inputs with more precision than a [Decimal] holds are
/// rejected rather than silently changed.
fn parse_decimal(text: &str) -> Option<Decimal> {
    if text.contains('_') {
        return None;
    }

    match text.split_once(['e', 'E']) {
        Some((mantissa, _)) => parse_scientific(text, mantissa),
        None => Decimal::from_str_exact(text).ok(),
    }
}

/// [Decimal::from_scientific] rounds away digits that do not fit, so the result must keep every
/// significant digit of `mantissa`.
fn parse_scientific(text: &str, mantissa: &str) -> Option<Decimal> {
    let mantissa = Decimal::from_str_exact(mantissa).ok()?;
    let value = Decimal::from_scientific(text).ok()?;

    (significant_digits(value) == significant_digits(mantissa)).then_some(value)
}

/// The unscaled digits of `value` with trailing zeros removed, e.g. `15` for both `1.50` and
/// `150`.
fn significant_digits(value: Decimal) -> i128 {
    let mut digits = value.mantissa();

    while digits != 0 && digits % 10 == 0 {
        digits /= 10;
    }

    digits
}

fn parse_category(value: Value) -> Result<Category, FieldError> {
    match value {
        Value::String(text) => Category::from_str(&text)
            .map_err(|_| FieldError::new("category", FieldErrorKind::StringTooShort)),
        _ => Err(FieldError::new("category", FieldErrorKind::StringType)),
    }
}

fn parse_note(value: Option<Value>) -> Result<Option<String>, FieldError> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(text)) => Ok(Some(text)),
        Some(_) => Err(FieldError::new("note", FieldErrorKind::StringType)),
    }
}

/// A transaction as returned by the API.
///
/// `amount` is serialized as a decimal string, `created_at` as RFC 3339.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionRead {
    /// The unique ID of the transaction.
    pub id: String,
    /// The value of the transaction.
    pub amount: Decimal,
    /// The label describing what kind of transaction this is.
    pub category: String,
    /// Free text about the transaction, `null` if none was given.
    pub note: Option<String>,
    /// When the transaction was recorded, in UTC.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl From<Transaction> for TransactionRead {
    fn from(transaction: Transaction) -> Self {
        Self {
            id: transaction.id().to_string(),
            amount: transaction.amount(),
            category: transaction.category().to_string(),
            note: transaction.note().map(ToOwned::to_owned),
            created_at: transaction.created_at(),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use rust_decimal::Decimal;
    use serde_json::{Value, json};
    use time::OffsetDateTime;

    use crate::{
        FieldErrorKind, ValidationErrors,
        transaction::{
            Category, Transaction, TransactionCreate, TransactionId, TransactionRead,
        },
    };

    fn kinds(errors: &ValidationErrors) -> Vec<(Option<&str>, FieldErrorKind)> {
        errors
            .iter()
            .map(|error| (error.field(), error.kind))
            .collect()
    }

    #[test]
    fn accepts_amount_as_string() {
        let got = TransactionCreate::try_from(json!({
            "amount": "12.345",
            "category": "Food",
            "note": "lunch",
        }))
        .unwrap();

        assert_eq!(got.amount.to_string(), "12.345");
        assert_eq!(got.category.as_ref(), "Food");
        assert_eq!(got.note.as_deref(), Some("lunch"));
    }

    #[test]
    fn accepts_amount_as_number() {
        let got = TransactionCreate::try_from(json!({"amount": 12.345, "category": "Food"}))
            .unwrap();

        assert_eq!(got.amount.to_string(), "12.345");
    }

    #[test]
    fn accepts_integer_and_scientific_amounts() {
        let integer = TransactionCreate::try_from(json!({"amount": -40, "category": "Fuel"}))
            .unwrap();
        let scientific =
            TransactionCreate::try_from(json!({"amount": "1.5e2", "category": "Fuel"})).unwrap();

        assert_eq!(integer.amount, Decimal::from(-40));
        assert_eq!(scientific.amount, Decimal::from(150));
    }

    #[test]
    fn scientific_amounts_are_written_out_in_full() {
        let got = TransactionCreate::try_from(json!({"amount": "1.5e2", "category": "Fuel"}))
            .unwrap();
        let small = TransactionCreate::try_from(json!({"amount": "25E-3", "category": "Fuel"}))
            .unwrap();

        assert_eq!(got.amount.to_string(), "150");
        assert_eq!(small.amount.to_string(), "0.025");
    }

    #[test]
    fn long_number_amounts_keep_every_digit() {
        let body: Value =
            serde_json::from_str(r#"{"amount": 1234567890.123456789, "category": "Food"}"#)
                .unwrap();

        let got = TransactionCreate::try_from(body).unwrap();

        assert_eq!(got.amount.to_string(), "1234567890.123456789");
    }

    #[test]
    fn number_amounts_that_do_not_fit_are_rejected() {
        let body: Value = serde_json::from_str(
            r#"{"amount": 1.2345678901234567890123456789012, "category": "Food"}"#,
        )
        .unwrap();

        let errors = TransactionCreate::try_from(body).unwrap_err();

        assert_eq!(
            kinds(&errors),
            vec![(Some("amount"), FieldErrorKind::DecimalParsing)]
        );
    }

    #[test]
    fn keeps_trailing_zeros() {
        let got =
            TransactionCreate::try_from(json!({"amount": "12.50", "category": "Food"})).unwrap();

        assert_eq!(got.amount.to_string(), "12.50");
    }

    #[test]
    fn missing_note_and_null_note_are_none() {
        let missing =
            TransactionCreate::try_from(json!({"amount": "1", "category": "Food"})).unwrap();
        let null =
            TransactionCreate::try_from(json!({"amount": "1", "category": "Food", "note": null}))
                .unwrap();

        assert_eq!(missing.note, None);
        assert_eq!(null.note, None);
    }

    #[test]
    fn ignores_unknown_fields() {
        let got = TransactionCreate::try_from(
            json!({"amount": "1", "category": "Food", "currency": "NZD"}),
        );

        assert!(got.is_ok());
    }

    #[test]
    fn reports_every_missing_field() {
        let errors = TransactionCreate::try_from(json!({})).unwrap_err();

        assert_eq!(
            kinds(&errors),
            vec![
                (Some("amount"), FieldErrorKind::Missing),
                (Some("category"), FieldErrorKind::Missing),
            ]
        );
    }

    #[test]
    fn rejects_non_decimal_amounts() {
        for amount in [
            json!("abc"),
            json!(""),
            json!("1_000"),
            json!(true),
            json!(null),
            json!(["1"]),
            json!("123456789012345678901234567890.5"),
            json!("1.2345678901234567890123456789012e0"),
            json!("1e-40"),
            json!("1_0e2"),
        ] {
            let errors =
                TransactionCreate::try_from(json!({"amount": amount, "category": "Food"}))
                    .unwrap_err();

            assert_eq!(
                kinds(&errors),
                vec![(Some("amount"), FieldErrorKind::DecimalParsing)],
                "amount {amount} should be rejected"
            );
        }
    }

    #[test]
    fn rejects_bad_categories() {
        let blank =
            TransactionCreate::try_from(json!({"amount": "1", "category": "   "})).unwrap_err();
        let number = TransactionCreate::try_from(json!({"amount": "1", "category": 7})).unwrap_err();

        assert_eq!(
            kinds(&blank),
            vec![(Some("category"), FieldErrorKind::StringTooShort)]
        );
        assert_eq!(
            kinds(&number),
            vec![(Some("category"), FieldErrorKind::StringType)]
        );
    }

    #[test]
    fn category_is_kept_as_sent() {
        let got =
            TransactionCreate::try_from(json!({"amount": "1", "category": "  Food "})).unwrap();

        assert_eq!(got.category.as_ref(), "  Food ");
    }

    #[test]
    fn rejects_non_string_note() {
        let errors =
            TransactionCreate::try_from(json!({"amount": "1", "category": "Food", "note": 3}))
                .unwrap_err();

        assert_eq!(kinds(&errors), vec![(Some("note"), FieldErrorKind::StringType)]);
    }

    #[test]
    fn rejects_non_object_bodies() {
        for body in [json!([1, 2]), json!("amount"), Value::Null] {
            let errors = TransactionCreate::try_from(body).unwrap_err();

            assert_eq!(kinds(&errors), vec![(None, FieldErrorKind::JsonInvalid)]);
        }
    }

    #[test]
    fn translates_to_new_transaction() {
        let create = TransactionCreate {
            amount: Decimal::from_str("2.5").unwrap(),
            category: Category::new_unchecked("Bus"),
            note: Some("to work".to_owned()),
        };

        let got = create.into_new_transaction();

        assert_eq!(
            got,
            Transaction::build(Decimal::from_str("2.5").unwrap(), Category::new_unchecked("Bus"))
                .note(Some("to work".to_owned()))
        );
    }

    #[test]
    fn read_is_a_projection_of_the_transaction() {
        let created_at = OffsetDateTime::UNIX_EPOCH;
        let transaction = Transaction::from_parts(
            TransactionId::new_unchecked("abc"),
            Transaction::build(
                Decimal::from_str("12.345").unwrap(),
                Category::new_unchecked("Food"),
            ),
            created_at,
        );

        let got = serde_json::to_value(TransactionRead::from(transaction)).unwrap();

        assert_eq!(
            got,
            json!({
                "id": "abc",
                "amount": "12.345",
                "category": "Food",
                "note": null,
                "created_at": "1970-01-01T00:00:00Z",
            })
        );
    }
}
