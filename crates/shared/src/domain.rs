use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PaymentId(pub String);

impl PaymentId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PaymentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PaymentField {
    CardNumber,
    ExpirationDate,
    Cvv,
    Amount,
}

impl PaymentField {
    pub const ALL: [PaymentField; 4] = [
        PaymentField::CardNumber,
        PaymentField::ExpirationDate,
        PaymentField::Cvv,
        PaymentField::Amount,
    ];

    /// Wire name of the field, as it appears in the payment form body.
    pub fn as_str(self) -> &'static str {
        match self {
            PaymentField::CardNumber => "cardNumber",
            PaymentField::ExpirationDate => "expirationDate",
            PaymentField::Cvv => "cvv",
            PaymentField::Amount => "amount",
        }
    }
}

impl fmt::Display for PaymentField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
