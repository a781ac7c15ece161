pub mod commands;
pub mod handlers;

use std::sync::Arc;

use crate::config::Config;
use crate::geo::{Geocoder, HttpGeocoder};
use crate::tracker::AttendanceTracker;
use crate::utils::time::TimeSourcePolicy;
use anyhow::Result;
use poise::serenity_prelude as serenity;

pub type Error = Box<dyn std::error::Error + Send + Sync>;
pub type Context<'a> = poise::Context<'a, Data, Error>;

#[derive(Clone)]
pub struct Data {
    pub tracker: Arc<AttendanceTracker>,
    pub time_source: TimeSourcePolicy,
    pub geocoder: Arc<Geocoder>,
}

pub async fn create_bot(config: Config, tracker: Arc<AttendanceTracker>) -> Result<serenity::Client> {
    let geocoder = match &config.geocoder_url {
        Some(url) => Geocoder::Http(HttpGeocoder::new(url.clone())?),
        None if config.time_source == TimeSourcePolicy::Geolocated => {
            anyhow::bail!("TIME_SOURCE=geolocated requires GEOCODER_URL")
        }
        None => Geocoder::Disabled,
    };

    let data = Data {
        tracker,
        time_source: config.time_source,
        geocoder: Arc::new(geocoder),
    };

    let intents = serenity::GatewayIntents::non_privileged();

    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: vec![
                commands::employees::register(),
                commands::employees::set_timezone(),
                commands::employees::import_employees(),
                commands::employees::employees(),
                commands::attendance::clock_in(),
                commands::attendance::clock_out(),
                commands::reports::attendance(),
                commands::reports::late_today(),
                commands::reports::not_clocked_in(),
            ],
            event_handler: |ctx, event, framework, data| {
                Box::pin(handlers::event_handler(ctx, event, framework, data))
            },
            ..Default::default()
        })
        .setup(|ctx, _ready, framework| {
            Box::pin(async move {
                poise::builtins::register_globally(ctx, &framework.options().commands).await?;
                Ok(data)
            })
        })
        .build();

    let client = serenity::ClientBuilder::new(&config.discord_token, intents)
        .framework(framework)
        .await?;

    Ok(client)
}
