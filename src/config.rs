use crate::core::scheduler::{BookingAnchor, SchedulerSettings};
use dotenv::dotenv;
use once_cell::sync::Lazy;
use std::env;

pub struct Config {
    pub port: u16,
    pub log_level: String,
    pub cron_secret: String,
    pub booking_concurrency: usize,
    pub booking_anchor: BookingAnchor,
    /// Problems found while reading the environment, reported once logging is up.
    pub warnings: Vec<String>,
}

impl core::fmt::Debug for Config {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Config")
            .field("port", &self.port)
            .field("log_level", &self.log_level)
            .field("cron_secret", &"<redacted>")
            .field("booking_concurrency", &self.booking_concurrency)
            .field("booking_anchor", &self.booking_anchor)
            .finish()
    }
}

impl Config {
    fn from_env() -> Self {
        dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub(crate) fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut warnings = Vec::new();

        let booking_anchor = match lookup("BOOKING_ANCHOR").map(|v| v.parse::<BookingAnchor>()) {
            None => BookingAnchor::default(),
            Some(Ok(anchor)) => anchor,
            Some(Err(error)) => {
                warnings.push(format!("BOOKING_ANCHOR ignored, using `period`: {}", error));
                BookingAnchor::default()
            }
        };

        Self {
            port: lookup("PORT").and_then(|v| v.parse().ok()).unwrap_or(3000),
            log_level: lookup("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
            // Empty disables the booking trigger.
            cron_secret: lookup("CRON_SECRET").unwrap_or_default(),
            booking_concurrency: lookup("BOOKING_CONCURRENCY")
                .and_then(|v| v.parse().ok())
                .filter(|n| *n > 0)
                .unwrap_or(8),
            booking_anchor,
            warnings,
        }
    }

    pub fn scheduler_settings(&self) -> SchedulerSettings {
        SchedulerSettings {
            anchor: self.booking_anchor,
            concurrency: self.booking_concurrency,
        }
    }
}

pub static CONFIG: Lazy<Config> = Lazy::new(Config::from_env);
