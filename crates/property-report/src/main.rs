//! property-report: print the portfolio roll-up, transaction totals and ROI projections.
//!
//! Usage:
//!   cargo run -p property-report
//!   cargo run -p property-report -- --property 12
//!   cargo run -p property-report -- --json

use property_client::ApiClient;
use property_report::{PortfolioReport, ReportArgs, ReportConfig, USAGE};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ReportConfig::from_env()?;

    let json_logging = std::env::var("RUST_LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "property_report=info,property_client=info".into());

    // Logs go to stderr so --json output stays parseable.
    if json_logging {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }

    let args = ReportArgs::parse(std::env::args().skip(1))?;
    if args.help {
        println!("{}", USAGE);
        return Ok(());
    }

    let client = ApiClient::from_config(config.client.clone())?;
    let report = PortfolioReport::build(&client, args.property.as_ref()).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", report.render_text(&config.format));
    }

    tracing::info!(properties = report.properties.len(), "Report complete");
    Ok(())
}
