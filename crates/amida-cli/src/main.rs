//! Amida binary
//!
//! Build a straight ladder from the command line and print its dynamism trace.

use amida_cli::{render_text, run, RunConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing on stderr so stdout stays machine-readable
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "amida_cli=info,amida_dynamism=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = RunConfig::from_args(std::env::args().skip(1))?;
    tracing::debug!(?config, "parsed arguments");

    let summary = run(&config)?;

    if config.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print!("{}", render_text(&summary));
    }

    Ok(())
}
