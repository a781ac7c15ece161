//! Optional reverse-geocoding collaborator. Best effort: a failed or slow
//! lookup degrades to "Unknown" and never blocks a clock-in.

use std::time::Duration;

use serde::Deserialize;

use crate::error::TrackerError;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

pub const UNKNOWN_COUNTRY: &str = "Unknown";

pub enum Geocoder {
    Disabled,
    Http(HttpGeocoder),
}

impl Geocoder {
    pub async fn country_or_unknown(&self, latitude: f64, longitude: f64) -> String {
        match self {
            Geocoder::Disabled => UNKNOWN_COUNTRY.to_string(),
            Geocoder::Http(geocoder) => match geocoder.country(latitude, longitude).await {
                Ok(country) => country,
                Err(e) => {
                    tracing::warn!("Reverse geocoding failed: {}", e);
                    UNKNOWN_COUNTRY.to_string()
                }
            },
        }
    }
}

/// Client for a Nominatim-compatible `/reverse` endpoint.
pub struct HttpGeocoder {
    client: reqwest::Client,
    endpoint: String,
}

#[derive(Debug, Deserialize)]
struct ReverseResponse {
    address: Option<Address>,
}

#[derive(Debug, Deserialize)]
struct Address {
    country: Option<String>,
}

impl HttpGeocoder {
    pub fn new(endpoint: String) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!("attendance-bot/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { client, endpoint })
    }

    pub async fn country(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<String, TrackerError> {
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("format", "jsonv2".to_string()),
                ("lat", latitude.to_string()),
                ("lon", longitude.to_string()),
            ])
            .send()
            .await
            .map_err(|e| TrackerError::LocationUnavailable(e.to_string()))?
            .error_for_status()
            .map_err(|e| TrackerError::LocationUnavailable(e.to_string()))?;

        let body: ReverseResponse = response
            .json()
            .await
            .map_err(|e| TrackerError::LocationUnavailable(e.to_string()))?;

        body.address
            .and_then(|address| address.country)
            .ok_or_else(|| TrackerError::LocationUnavailable("no country in response".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn disabled_geocoder_degrades_to_unknown() {
        let geocoder = Geocoder::Disabled;
        assert_eq!(geocoder.country_or_unknown(35.68, 139.69).await, "Unknown");
    }

    #[tokio::test]
    async fn unreachable_endpoint_degrades_to_unknown() {
        // Reserved TEST-NET address, nothing listens there.
        let geocoder = Geocoder::Http(
            HttpGeocoder::new("http://192.0.2.1/reverse".to_string()).unwrap(),
        );
        assert_eq!(geocoder.country_or_unknown(35.68, 139.69).await, "Unknown");
    }
}
