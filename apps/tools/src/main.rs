use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use shared::domain::PaymentId;
use storage::Storage;

#[derive(Parser, Debug)]
struct Cli {
    #[arg(long, default_value = "sqlite://./data/storefront.db")]
    database_url: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Most recent payments first.
    List {
        #[arg(long, default_value_t = 20)]
        limit: u32,
    },
    Show {
        payment_id: String,
    },
    Count,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let storage = Storage::new(&cli.database_url).await?;

    match cli.command {
        Command::List { limit } => {
            for payment in storage.list_payments(limit).await? {
                println!(
                    "{} amount={} expires={} created_at={}",
                    payment.payment_id,
                    payment.amount,
                    payment.expiration_date,
                    payment.created_at.to_rfc3339()
                );
            }
        }
        Command::Show { payment_id } => {
            let Some(payment) = storage.load_payment(&PaymentId(payment_id.clone())).await? else {
                bail!("payment {payment_id} not found");
            };
            println!("{}", serde_json::to_string_pretty(&payment)?);
        }
        Command::Count => {
            println!("{}", storage.count_payments().await?);
        }
    }

    Ok(())
}
