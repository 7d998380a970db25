// SPDX-License-Identifier: MIT

use anyhow::Result;
use clap::{Parser, Subcommand};
use dotenvy::dotenv;
use tracing_subscriber::EnvFilter;

use fx_rates::config::load_config;
use fx_rates::db::create_db_pool;
use fx_rates::{ExchangeError, ExchangeRateService, HttpRateSource, SqliteRateStore};

#[derive(Parser)]
#[command(name = "fx-rates", about = "Query currency exchange rates")]
struct Cli {
    /// Print results as JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Full rate table for a base currency
    Rates { base: String },
    /// Rate for a single currency pair
    Pair { from: String, to: String },
    /// List the supported currencies
    Currencies,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let config = load_config()?;

    let pool = create_db_pool(&config.database_url).await?;
    let store = SqliteRateStore::new(pool);
    let source = HttpRateSource::new(config.api_key.clone(), config.base_url.clone());
    let service = ExchangeRateService::new(store, source, config.cache_minutes);

    match cli.command {
        Command::Rates { base } => match service.get_exchange_rates(&base).await {
            Ok(quote) => {
                if cli.json {
                    println!("{}", serde_json::to_string_pretty(&quote)?);
                } else {
                    println!("Rates for {} (as of {}):", quote.base_currency, quote.last_updated);
                    for entry in &quote.rates {
                        println!("  {}  {:<24} {}", entry.currency_code, entry.currency_name, entry.rate);
                    }
                }
            }
            Err(e) => report(e),
        },
        Command::Pair { from, to } => match service.get_currency_pair_rate(&from, &to).await {
            Ok(pair) => {
                if cli.json {
                    println!("{}", serde_json::to_string_pretty(&pair)?);
                } else {
                    println!(
                        "1 {} ({}) = {} {} ({}) as of {}",
                        pair.from, pair.from_name, pair.rate, pair.to, pair.to_name, pair.last_updated
                    );
                }
            }
            Err(e) => report(e),
        },
        Command::Currencies => {
            let listed = service.list_supported_currencies();
            if cli.json {
                println!("{}", serde_json::to_string_pretty(&listed)?);
            } else {
                for currency in &listed.currencies {
                    println!("  {}  {}", currency.code, currency.name);
                }
                println!("{} supported currencies", listed.count);
            }
        }
    }

    Ok(())
}

fn report(err: ExchangeError) {
    match err {
        ExchangeError::Validation(messages) => {
            for message in messages {
                eprintln!("invalid request: {}", message);
            }
        }
        ExchangeError::Operational(message) => eprintln!("error: {}", message),
    }
    std::process::exit(1);
}
