//! Format rules for the payment form fields.
//!
//! Rules only look at the current text of a field. Digits are ASCII `0-9`.

use std::sync::OnceLock;

use regex::Regex;

use crate::{domain::PaymentField, protocol::PaymentForm};

fn card_number_regex() -> &'static Regex {
    static CARD_NUMBER_REGEX: OnceLock<Regex> = OnceLock::new();
    CARD_NUMBER_REGEX.get_or_init(|| Regex::new(r"^[0-9]{16}$").expect("card number regex"))
}

fn expiration_date_regex() -> &'static Regex {
    static EXPIRATION_DATE_REGEX: OnceLock<Regex> = OnceLock::new();
    EXPIRATION_DATE_REGEX
        .get_or_init(|| Regex::new(r"^[0-9]{2}/[0-9]{4}$").expect("expiration date regex"))
}

fn cvv_regex() -> &'static Regex {
    static CVV_REGEX: OnceLock<Regex> = OnceLock::new();
    CVV_REGEX.get_or_init(|| Regex::new(r"^[0-9]{0,3}$").expect("cvv regex"))
}

fn amount_regex() -> &'static Regex {
    static AMOUNT_REGEX: OnceLock<Regex> = OnceLock::new();
    AMOUNT_REGEX.get_or_init(|| Regex::new(r"^[0-9]+$").expect("amount regex"))
}

pub fn is_valid_card_number(text: &str) -> bool {
    card_number_regex().is_match(text)
}

pub fn is_valid_expiration_date(text: &str) -> bool {
    expiration_date_regex().is_match(text)
}

/// An empty cvv is accepted.
pub fn is_valid_cvv(text: &str) -> bool {
    cvv_regex().is_match(text)
}

/// Digits only, and the value must be greater than zero. Length is unbounded,
/// so positivity is decided on the digits rather than a parsed integer.
pub fn is_valid_amount(text: &str) -> bool {
    amount_regex().is_match(text) && text.bytes().any(|b| b != b'0')
}

pub fn is_field_valid(field: PaymentField, text: &str) -> bool {
    match field {
        PaymentField::CardNumber => is_valid_card_number(text),
        PaymentField::ExpirationDate => is_valid_expiration_date(text),
        PaymentField::Cvv => is_valid_cvv(text),
        PaymentField::Amount => is_valid_amount(text),
    }
}

pub fn failing_fields(form: &PaymentForm) -> Vec<PaymentField> {
    PaymentField::ALL
        .into_iter()
        .filter(|field| !is_field_valid(*field, form.get(*field)))
        .collect()
}

pub fn is_form_valid(form: &PaymentForm) -> bool {
    PaymentField::ALL
        .into_iter()
        .all(|field| is_field_valid(field, form.get(field)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn card_number_requires_exactly_sixteen_digits() {
        assert!(is_valid_card_number("4111111111111111"));
        assert!(!is_valid_card_number("411111111111111"));
        assert!(!is_valid_card_number("41111111111111112"));
        assert!(!is_valid_card_number("4111 1111 1111 11"));
        assert!(!is_valid_card_number(""));
        assert!(!is_valid_card_number("411111111111111a"));
    }

    #[test]
    fn card_number_rejects_non_ascii_digits() {
        assert!(!is_valid_card_number("٤١١١١١١١١١١١١١١١"));
    }

    #[test]
    fn expiration_date_is_two_digits_slash_four_digits() {
        assert!(is_valid_expiration_date("12/2031"));
        assert!(is_valid_expiration_date("09/2027"));
        assert!(!is_valid_expiration_date("9/2027"));
        assert!(!is_valid_expiration_date("09/27"));
        assert!(!is_valid_expiration_date("09-2027"));
        assert!(!is_valid_expiration_date("09/2027 "));
    }

    #[test]
    fn cvv_accepts_zero_to_three_digits() {
        assert!(is_valid_cvv(""));
        assert!(is_valid_cvv("1"));
        assert!(is_valid_cvv("123"));
        assert!(!is_valid_cvv("1234"));
        assert!(!is_valid_cvv("12a"));
    }

    #[test]
    fn amount_must_be_positive_digits() {
        assert!(is_valid_amount("4"));
        assert!(is_valid_amount("0004"));
        assert!(is_valid_amount("100000000000000000000000"));
        assert!(!is_valid_amount("0"));
        assert!(!is_valid_amount("000"));
        assert!(!is_valid_amount(""));
        assert!(!is_valid_amount("-4"));
        assert!(!is_valid_amount("4.5"));
    }

    #[test]
    fn failing_fields_lists_every_broken_field_in_order() {
        let form = PaymentForm {
            card_number: "123".into(),
            expiration_date: "12/2031".into(),
            cvv: "1234".into(),
            amount: "0".into(),
        };
        assert_eq!(
            failing_fields(&form),
            vec![
                PaymentField::CardNumber,
                PaymentField::Cvv,
                PaymentField::Amount
            ]
        );
        assert!(!is_form_valid(&form));
    }
}
