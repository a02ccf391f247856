use shared::{
    domain::PaymentField,
    error::{ApiError, ErrorCode},
    protocol::{OrderReceipt, PaymentForm},
};
use storage::{NewPayment, Storage};
use tracing::info;

#[derive(Clone)]
pub struct ApiContext {
    pub storage: Storage,
}

/// Parses a raw request body as a payment form, whatever content type the
/// client declared.
pub fn parse_payment_form(body: &[u8]) -> Result<PaymentForm, ApiError> {
    serde_json::from_slice(body).map_err(|e| {
        ApiError::new(
            ErrorCode::MalformedPayload,
            format!("invalid payment body: {e}"),
        )
    })
}

/// Converts a numeric form field to an integer. Surrounding whitespace is
/// ignored and a blank value counts as zero.
pub fn coerce_numeric(field: PaymentField, text: &str) -> Result<i64, ApiError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(0);
    }
    if !trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ApiError::new(
            ErrorCode::Validation,
            format!("{field} is not a number"),
        ));
    }
    trimmed.parse::<i64>().map_err(|_| {
        ApiError::new(
            ErrorCode::Validation,
            format!("{field} does not fit in a 64-bit integer"),
        )
    })
}

/// Converts the amount to a number the way a JavaScript `Number` would: any
/// finite decimal, including fractions and digit strings past `i64::MAX`.
/// A blank value counts as zero.
pub fn coerce_amount(text: &str) -> Result<f64, ApiError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(0.0);
    }
    match trimmed.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(ApiError::new(
            ErrorCode::Validation,
            format!("{} is not a number", PaymentField::Amount),
        )),
    }
}

pub fn new_payment_from_form(form: &PaymentForm) -> Result<NewPayment, ApiError> {
    Ok(NewPayment {
        card_number: coerce_numeric(PaymentField::CardNumber, &form.card_number)?,
        expiration_date: form.expiration_date.clone(),
        cvv: coerce_numeric(PaymentField::Cvv, &form.cvv)?,
        amount: coerce_amount(&form.amount)?,
    })
}

pub async fn send_payment(ctx: &ApiContext, form: &PaymentForm) -> Result<OrderReceipt, ApiError> {
    let payment = new_payment_from_form(form)?;
    let payment_id = ctx
        .storage
        .insert_payment(&payment)
        .await
        .map_err(storage_failure)?;

    info!(payment_id = %payment_id, amount = payment.amount, "payment persisted");

    Ok(OrderReceipt {
        request_id: payment_id.0,
        amount: payment.amount,
    })
}

fn storage_failure(err: anyhow::Error) -> ApiError {
    ApiError::new(ErrorCode::Storage, format!("{err:#}"))
}
