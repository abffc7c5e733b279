/// Forward search and reverse lookup against a Nominatim-compatible service

use reqwest::{Client, StatusCode};
use serde::Deserialize;

use crate::error::GatewayError;

/// A search hit: where it is and what it is called
#[derive(Debug, Clone, PartialEq)]
pub struct Place {
    pub latitude: f64,
    pub longitude: f64,
    pub label: String,
}

#[derive(Debug, Clone)]
pub struct Geocoder {
    client: Client,
    base_url: String,
}

impl Geocoder {
    pub fn new(base_url: &str, user_agent: &str) -> Result<Self, GatewayError> {
        let client = Client::builder().user_agent(user_agent).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Best match for a free-text query, or None if nothing matched
    pub async fn search(&self, query: &str) -> Result<Option<Place>, GatewayError> {
        let response = self
            .client
            .get(format!("{}/search", self.base_url))
            .query(&[("format", "json"), ("q", query)])
            .send()
            .await?;
        let status = response.status();
        let body = response.text().await?;
        decode_search(status, &body)
    }

    /// Address label for a coordinate, or None if the service has nothing there
    pub async fn reverse(&self, latitude: f64, longitude: f64) -> Result<Option<String>, GatewayError> {
        let response = self
            .client
            .get(format!("{}/reverse", self.base_url))
            .query(&[
                ("format", "json".to_string()),
                ("lat", latitude.to_string()),
                ("lon", longitude.to_string()),
                ("zoom", "18".to_string()),
                ("addressdetails", "1".to_string()),
            ])
            .send()
            .await?;
        let status = response.status();
        let body = response.text().await?;
        decode_reverse(status, &body)
    }
}

#[derive(Deserialize)]
struct SearchHit {
    lat: String,
    lon: String,
    display_name: String,
}

#[derive(Deserialize)]
struct ReverseHit {
    #[serde(default)]
    display_name: Option<String>,
}

pub fn decode_search(status: StatusCode, body: &str) -> Result<Option<Place>, GatewayError> {
    if !status.is_success() {
        return Err(GatewayError::Status(status.as_u16()));
    }

    let hits: Vec<SearchHit> = serde_json::from_str(body)?;
    let Some(hit) = hits.into_iter().next() else {
        return Ok(None);
    };

    let latitude = hit
        .lat
        .parse::<f64>()
        .map_err(|e| GatewayError::Decode(format!("latitude {:?}: {}", hit.lat, e)))?;
    let longitude = hit
        .lon
        .parse::<f64>()
        .map_err(|e| GatewayError::Decode(format!("longitude {:?}: {}", hit.lon, e)))?;

    Ok(Some(Place {
        latitude,
        longitude,
        label: hit.display_name,
    }))
}

pub fn decode_reverse(status: StatusCode, body: &str) -> Result<Option<String>, GatewayError> {
    if !status.is_success() {
        return Err(GatewayError::Status(status.as_u16()));
    }

    let hit: ReverseHit = serde_json::from_str(body)?;
    Ok(hit.display_name.filter(|name| !name.is_empty()))
}
