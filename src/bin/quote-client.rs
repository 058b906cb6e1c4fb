use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use fx_quote_service::client::{write_quote_file, QuoteClient};
use fx_quote_service::config::ObservabilityConfig;
use fx_quote_service::observability::logging::init_logging;

#[derive(Parser)]
#[command(name = "quote-client")]
#[command(about = "Fetch the current dollar quote from the quote service and save it", long_about = None)]
struct Cli {
    #[arg(short, long, default_value = "http://localhost:8080/cotacao")]
    url: String,

    /// Deadline for the whole request, in milliseconds.
    #[arg(short, long, default_value_t = 300)]
    timeout_ms: u64,

    #[arg(short, long, default_value = "cotacao.txt")]
    output: PathBuf,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(&ObservabilityConfig::default());

    let client = QuoteClient::new(&cli.url, Duration::from_millis(cli.timeout_ms));

    let bid = match client.fetch_quote().await {
        Ok(bid) => bid,
        Err(e) => {
            tracing::error!(url = %cli.url, error = %e, "Error fetching dolar price");
            return;
        }
    };

    println!("Dolar price: {}", bid);

    if let Err(e) = write_quote_file(&cli.output, &bid).await {
        tracing::error!(
            path = %cli.output.display(),
            error = %e,
            "Error saving dolar price on file"
        );
        return;
    }

    tracing::info!(path = %cli.output.display(), "Dolar price saved successfully");
}
