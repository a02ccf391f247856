//! Payment form state machine.
//!
//! Field text is validated continuously to drive `submit_enabled`, and again
//! on every submit. Only a submit that passes all four rules reaches the
//! transport. Invalid flags are set by rejected submits and wiped by the next
//! edit to any field.

use std::sync::Arc;

use shared::{
    domain::PaymentField,
    protocol::{OrderReceipt, PaymentForm},
    validation::{failing_fields, is_form_valid},
};
use tracing::{debug, info, warn};

use crate::{
    error::ClientError,
    notifier::{OrderConfirmation, ResponseNotifier},
    transport::PaymentTransport,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InvalidFlags {
    pub card_number: bool,
    pub expiration_date: bool,
    pub cvv: bool,
    pub amount: bool,
}

impl InvalidFlags {
    pub fn get(&self, field: PaymentField) -> bool {
        match field {
            PaymentField::CardNumber => self.card_number,
            PaymentField::ExpirationDate => self.expiration_date,
            PaymentField::Cvv => self.cvv,
            PaymentField::Amount => self.amount,
        }
    }

    fn flag(&mut self, field: PaymentField) {
        match field {
            PaymentField::CardNumber => self.card_number = true,
            PaymentField::ExpirationDate => self.expiration_date = true,
            PaymentField::Cvv => self.cvv = true,
            PaymentField::Amount => self.amount = true,
        }
    }

    pub fn any(&self) -> bool {
        PaymentField::ALL.into_iter().any(|field| self.get(field))
    }

    pub fn flagged(&self) -> Vec<PaymentField> {
        PaymentField::ALL
            .into_iter()
            .filter(|field| self.get(*field))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// Validation failed; nothing was sent.
    Blocked { invalid: Vec<PaymentField> },
    Confirmed(OrderConfirmation),
    /// Backend answered with a non-success status. Nothing is shown to the
    /// user unless a rejection hook is installed.
    Rejected { status: u16 },
    /// No usable response: the request never completed or the success body
    /// did not parse.
    Failed { reason: String },
}

pub type RejectionHook = Arc<dyn Fn(u16) + Send + Sync>;

/// Sends validated snapshots and publishes confirmations.
///
/// Cheap to clone, so a dispatch can run on its own task while the form keeps
/// accepting edits. There is no guard against overlapping dispatches: each
/// call sends its own request.
#[derive(Clone)]
pub struct Submitter {
    transport: Arc<dyn PaymentTransport>,
    notifier: ResponseNotifier,
    on_rejected: Option<RejectionHook>,
}

impl Submitter {
    pub fn new(transport: Arc<dyn PaymentTransport>, notifier: ResponseNotifier) -> Self {
        Self {
            transport,
            notifier,
            on_rejected: None,
        }
    }

    pub fn with_rejection_hook(mut self, hook: impl Fn(u16) + Send + Sync + 'static) -> Self {
        self.on_rejected = Some(Arc::new(hook));
        self
    }

    pub fn notifier(&self) -> &ResponseNotifier {
        &self.notifier
    }

    pub async fn dispatch(&self, form: PaymentForm) -> SubmitOutcome {
        let body = match serde_json::to_string(&form).map_err(ClientError::from) {
            Ok(body) => body,
            Err(err) => {
                warn!(error = %err, "failed to serialize payment form");
                return SubmitOutcome::Failed {
                    reason: err.to_string(),
                };
            }
        };

        let response = match self.transport.send_payment(body).await {
            Ok(response) => response,
            Err(err) => {
                warn!(error = %err, "payment request did not complete");
                return SubmitOutcome::Failed {
                    reason: err.to_string(),
                };
            }
        };

        if !response.is_success() {
            debug!(status = response.status, "payment rejected by backend");
            if let Some(hook) = &self.on_rejected {
                hook(response.status);
            }
            return SubmitOutcome::Rejected {
                status: response.status,
            };
        }

        match serde_json::from_str::<OrderReceipt>(&response.body).map_err(ClientError::from) {
            Ok(receipt) => {
                let confirmation = OrderConfirmation::from(receipt);
                info!(
                    request_id = %confirmation.request_id,
                    amount = confirmation.amount,
                    "order confirmed"
                );
                self.notifier.on_confirmation(confirmation.clone());
                SubmitOutcome::Confirmed(confirmation)
            }
            Err(err) => {
                warn!(error = %err, "payment succeeded with unreadable receipt");
                SubmitOutcome::Failed {
                    reason: err.to_string(),
                }
            }
        }
    }
}

pub struct FormController {
    input: PaymentForm,
    invalid: InvalidFlags,
    submit_enabled: bool,
    submitter: Submitter,
}

impl FormController {
    pub fn new(submitter: Submitter) -> Self {
        let input = PaymentForm::default();
        let submit_enabled = is_form_valid(&input);
        Self {
            input,
            invalid: InvalidFlags::default(),
            submit_enabled,
            submitter,
        }
    }

    pub fn input(&self) -> &PaymentForm {
        &self.input
    }

    pub fn invalid_flags(&self) -> InvalidFlags {
        self.invalid
    }

    pub fn is_submit_enabled(&self) -> bool {
        self.submit_enabled
    }

    pub fn submitter(&self) -> &Submitter {
        &self.submitter
    }

    /// Any edit clears every invalid flag, not only the edited field's.
    pub fn edit(&mut self, field: PaymentField, text: impl Into<String>) {
        self.input.set(field, text);
        if self.invalid.any() {
            self.invalid = InvalidFlags::default();
        }
        self.submit_enabled = is_form_valid(&self.input);
    }

    /// Re-validates the current text and flags every failing field. Returns
    /// a snapshot to send when all fields pass, otherwise the failing fields.
    /// Flags of passing fields are left as they were.
    pub fn prepare_submission(&mut self) -> Result<PaymentForm, Vec<PaymentField>> {
        let failing = failing_fields(&self.input);
        if failing.is_empty() {
            return Ok(self.input.clone());
        }
        for field in &failing {
            self.invalid.flag(*field);
        }
        debug!(fields = ?failing, "submit blocked by invalid fields");
        Err(failing)
    }

    pub async fn submit(&mut self) -> SubmitOutcome {
        match self.prepare_submission() {
            Ok(form) => self.submitter.dispatch(form).await,
            Err(invalid) => SubmitOutcome::Blocked { invalid },
        }
    }
}
