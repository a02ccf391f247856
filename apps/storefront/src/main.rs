use anyhow::Result;
use clap::Parser;
use client_core::{ClientSettings, Storefront, SubmitOutcome};
use shared::domain::PaymentField;
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Orders coffee through the storefront backend.
#[derive(Parser, Debug)]
struct Args {
    /// Backend host; defaults to STOREFRONT_PUBLIC_HOST or the local server.
    #[arg(long)]
    server_url: Option<String>,
    #[arg(long, default_value = "")]
    card_number: String,
    /// MM/YYYY
    #[arg(long, default_value = "")]
    expiration_date: String,
    #[arg(long, default_value = "")]
    cvv: String,
    /// Cups of coffee.
    #[arg(long, default_value = "")]
    amount: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
    let args = Args::parse();

    let mut settings = ClientSettings::from_env();
    if let Some(server_url) = args.server_url {
        settings.public_host = server_url;
    }

    let mut storefront = Storefront::connect(&settings)?;
    storefront.form.edit(PaymentField::CardNumber, args.card_number);
    storefront
        .form
        .edit(PaymentField::ExpirationDate, args.expiration_date);
    storefront.form.edit(PaymentField::Cvv, args.cvv);
    storefront.form.edit(PaymentField::Amount, args.amount);

    match storefront.form.submit().await {
        SubmitOutcome::Blocked { invalid } => {
            for field in invalid {
                println!("invalid: {field}");
            }
        }
        SubmitOutcome::Confirmed(_) => {
            if let Some(dialog) = storefront.notifier.render() {
                println!("{dialog}");
            }
            storefront.notifier.dismiss();
        }
        // The form gives no feedback when the backend refuses an order.
        SubmitOutcome::Rejected { status } => debug!(status, "order not confirmed"),
        SubmitOutcome::Failed { .. } => {}
    }

    Ok(())
}
