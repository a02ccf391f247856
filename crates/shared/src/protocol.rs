use serde::{Deserialize, Serialize};

use crate::domain::PaymentField;

pub const SEND_PAYMENT_ROUTE: &str = "/api/sendPayment";

pub fn send_payment_route() -> &'static str {
    SEND_PAYMENT_ROUTE
}

/// Payment details exactly as typed into the storefront form.
///
/// Every field stays text until the backend converts it, so partial input
/// such as a ten-digit card number is representable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentForm {
    pub card_number: String,
    pub expiration_date: String,
    pub cvv: String,
    pub amount: String,
}

impl PaymentForm {
    pub fn get(&self, field: PaymentField) -> &str {
        match field {
            PaymentField::CardNumber => &self.card_number,
            PaymentField::ExpirationDate => &self.expiration_date,
            PaymentField::Cvv => &self.cvv,
            PaymentField::Amount => &self.amount,
        }
    }

    pub fn set(&mut self, field: PaymentField, value: impl Into<String>) {
        let slot = match field {
            PaymentField::CardNumber => &mut self.card_number,
            PaymentField::ExpirationDate => &mut self.expiration_date,
            PaymentField::Cvv => &mut self.cvv,
            PaymentField::Amount => &mut self.amount,
        };
        *slot = value.into();
    }
}

/// Success body of the payment route. `amount` is any JSON number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderReceipt {
    pub request_id: String,
    pub amount: f64,
}
