use anyhow::Result;
use std::env;

use chrono::Duration;

use crate::tracker::DEFAULT_GRACE_MINUTES;
use crate::utils::time::TimeSourcePolicy;

#[derive(Debug, Clone)]
pub struct Config {
    pub discord_token: String,
    pub time_source: TimeSourcePolicy,
    pub grace_minutes: i64,
    pub geocoder_url: Option<String>,
    pub employee_csv: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();

        let discord_token = env::var("DISCORD_TOKEN")
            .map_err(|_| anyhow::anyhow!("DISCORD_TOKEN environment variable is required"))?;

        let time_source = match env::var("TIME_SOURCE") {
            Ok(value) => TimeSourcePolicy::parse(&value)?,
            Err(_) => TimeSourcePolicy::LocalNaive,
        };

        let grace_minutes = match env::var("GRACE_PERIOD_MINUTES") {
            Ok(value) => value
                .parse::<i64>()
                .ok()
                .filter(|minutes| *minutes >= 0)
                .ok_or_else(|| {
                    anyhow::anyhow!("GRACE_PERIOD_MINUTES must be a non-negative whole number")
                })?,
            Err(_) => DEFAULT_GRACE_MINUTES,
        };

        let geocoder_url = env::var("GEOCODER_URL").ok();
        let employee_csv = env::var("EMPLOYEE_CSV").ok();

        Ok(Config {
            discord_token,
            time_source,
            grace_minutes,
            geocoder_url,
            employee_csv,
        })
    }

    pub fn grace(&self) -> Duration {
        Duration::minutes(self.grace_minutes)
    }
}
