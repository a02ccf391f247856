use std::sync::Arc;

pub mod error;
pub mod form;
pub mod notifier;
pub mod settings;
pub mod transport;

pub use error::ClientError;
pub use form::{FormController, InvalidFlags, RejectionHook, SubmitOutcome, Submitter};
pub use notifier::{OrderConfirmation, ResponseNotifier};
pub use settings::ClientSettings;
pub use transport::{HttpPaymentTransport, PaymentTransport, TransportResponse};

/// Owner of the payment form and the confirmation it feeds. The notifier is
/// handed to the form's submitter here rather than looked up globally.
pub struct Storefront {
    pub form: FormController,
    pub notifier: ResponseNotifier,
}

impl Storefront {
    pub fn new(transport: Arc<dyn PaymentTransport>) -> Self {
        Self::with_submitter(|notifier| Submitter::new(transport, notifier))
    }

    pub fn with_submitter(build: impl FnOnce(ResponseNotifier) -> Submitter) -> Self {
        let notifier = ResponseNotifier::new();
        let form = FormController::new(build(notifier.clone()));
        Self { form, notifier }
    }

    pub fn connect(settings: &ClientSettings) -> Result<Self, ClientError> {
        let transport = HttpPaymentTransport::new(&settings.public_host)?;
        Ok(Self::new(Arc::new(transport)))
    }
}

#[cfg(test)]
#[path = "tests/form_tests.rs"]
mod form_tests;

#[cfg(test)]
#[path = "tests/transport_tests.rs"]
mod transport_tests;
