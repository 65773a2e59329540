use anyhow::{Context, Result};
use property_client::ClientConfig;
use property_core::CurrencyFormat;

/// Report settings: API access plus output locale.
#[derive(Debug, Clone)]
pub struct ReportConfig {
    pub client: ClientConfig,
    pub format: CurrencyFormat,
}

impl ReportConfig {
    /// Reads `.env` first, then the environment. REPORT_LOCALE is `pt-BR` unless set.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let client = ClientConfig::from_env()?;
        let format = match std::env::var("REPORT_LOCALE") {
            Ok(locale) => locale
                .parse::<CurrencyFormat>()
                .with_context(|| format!("REPORT_LOCALE={}", locale))?,
            Err(_) => CurrencyFormat::default(),
        };

        Ok(Self { client, format })
    }
}
