use async_trait::async_trait;
use reqwest::Client;
use shared::protocol::SEND_PAYMENT_ROUTE;
use tracing::debug;
use url::Url;

use crate::error::ClientError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportResponse {
    pub status: u16,
    pub body: String,
}

impl TransportResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Carries one serialized payment form to the backend.
///
/// `Err` means no response was received at all; any HTTP status, including
/// failures, comes back as `Ok`.
#[async_trait]
pub trait PaymentTransport: Send + Sync {
    async fn send_payment(&self, body: String) -> Result<TransportResponse, ClientError>;
}

pub fn payment_endpoint(public_host: &str) -> Result<Url, ClientError> {
    let host = public_host.trim().trim_end_matches('/');
    Ok(Url::parse(&format!("{host}{SEND_PAYMENT_ROUTE}"))?)
}

pub struct HttpPaymentTransport {
    http: Client,
    endpoint: Url,
}

impl HttpPaymentTransport {
    pub fn new(public_host: &str) -> Result<Self, ClientError> {
        Self::with_client(Client::new(), public_host)
    }

    pub fn with_client(http: Client, public_host: &str) -> Result<Self, ClientError> {
        Ok(Self {
            http,
            endpoint: payment_endpoint(public_host)?,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl PaymentTransport for HttpPaymentTransport {
    async fn send_payment(&self, body: String) -> Result<TransportResponse, ClientError> {
        debug!(endpoint = %self.endpoint, "posting payment");
        let res = self.http.post(self.endpoint.clone()).body(body).send().await?;
        let status = res.status().as_u16();
        let body = res.text().await?;
        Ok(TransportResponse { status, body })
    }
}
