/// HTTP client for the gallery server
///
/// Wraps the four server resources: image list, upload, location list and
/// per-location mutations. Response bodies are decoded by the plain
/// functions at the bottom so they can be tested without a server.

use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::Deserialize;

use crate::error::GatewayError;
use crate::state::data::{ImageRecord, LocationRecord};
use crate::state::history::LocationMutation;
use crate::state::selection::UploadRequest;

#[derive(Debug, Clone)]
pub struct Gateway {
    client: Client,
    base_url: String,
}

impl Gateway {
    pub fn new(base_url: &str, user_agent: &str) -> Result<Self, GatewayError> {
        let client = Client::builder().user_agent(user_agent).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// `GET /api/images`
    pub async fn list_images(&self) -> Result<Vec<ImageRecord>, GatewayError> {
        let response = self.client.get(self.url("/api/images")).send().await?;
        let status = response.status();
        let body = response.text().await?;
        decode_images(status, &body)
    }

    /// `GET /api/locations`
    pub async fn list_locations(&self) -> Result<Vec<LocationRecord>, GatewayError> {
        let response = self.client.get(self.url("/api/locations")).send().await?;
        let status = response.status();
        let body = response.text().await?;
        decode_locations(status, &body)
    }

    /// `POST /api/upload` as multipart: file, lat, lng, location_name
    pub async fn upload(&self, request: &UploadRequest) -> Result<(), GatewayError> {
        log::info!(
            "⬆️  Uploading {} ({} bytes) at {}",
            request.file.filename,
            request.file.bytes.len(),
            request.point.label
        );

        let response = self.upload_request(request)?.send().await?;
        let status = response.status();
        let body = response.text().await?;
        decode_upload(status, &body)
    }

    /// Send one location mutation and wait for the server's acknowledgment
    pub async fn mutate_location(&self, mutation: &LocationMutation) -> Result<(), GatewayError> {
        let response = self.location_request(mutation).send().await?;
        let status = response.status();
        let body = response.text().await?;
        decode_ack(status, &body)
    }

    fn upload_request(&self, request: &UploadRequest) -> Result<RequestBuilder, GatewayError> {
        let file = Part::bytes(request.file.bytes.clone())
            .file_name(request.file.filename.clone())
            .mime_str(&request.file.mime)?;
        let form = upload_fields(request)
            .into_iter()
            .fold(Form::new().part("file", file), |form, (name, value)| form.text(name, value));

        Ok(self.client.post(self.url("/api/upload")).multipart(form))
    }

    fn location_request(&self, mutation: &LocationMutation) -> RequestBuilder {
        match mutation {
            LocationMutation::Save(location) => {
                self.client.post(self.url("/api/locations")).json(location)
            }
            LocationMutation::Touch { id } | LocationMutation::SetFavorite { id, .. } => {
                let body = mutation.update_body().unwrap_or_default();
                self.client
                    .put(self.url(&format!("/api/locations/{id}")))
                    .json(&body)
            }
            LocationMutation::Delete { id } => {
                self.client.delete(self.url(&format!("/api/locations/{id}")))
            }
        }
    }
}

/// Text parts sent alongside the file
fn upload_fields(request: &UploadRequest) -> [(&'static str, String); 3] {
    [
        ("lat", request.point.latitude.to_string()),
        ("lng", request.point.longitude.to_string()),
        ("location_name", request.point.label.clone()),
    ]
}

#[derive(Deserialize)]
struct ImageList {
    images: Vec<ImageRecord>,
}

#[derive(Deserialize)]
struct LocationList {
    locations: Vec<LocationRecord>,
}

/// Body of upload and mutation responses; unknown fields are ignored
#[derive(Deserialize)]
struct Ack {
    #[serde(default)]
    success: Option<bool>,
    #[serde(default)]
    error: Option<String>,
}

fn check_status(status: StatusCode) -> Result<(), GatewayError> {
    if status.is_success() {
        Ok(())
    } else {
        Err(GatewayError::Status(status.as_u16()))
    }
}

pub fn decode_images(status: StatusCode, body: &str) -> Result<Vec<ImageRecord>, GatewayError> {
    check_status(status)?;
    let list: ImageList = serde_json::from_str(body)?;
    Ok(list.images)
}

pub fn decode_locations(status: StatusCode, body: &str) -> Result<Vec<LocationRecord>, GatewayError> {
    check_status(status)?;
    let list: LocationList = serde_json::from_str(body)?;
    Ok(list.locations)
}

/// Upload succeeds unless the body carries an `error` field or the status
/// is an error without one.
/// A success status with a body that is not JSON is not a confirmation.
pub fn decode_upload(status: StatusCode, body: &str) -> Result<(), GatewayError> {
    let ack: Ack = match serde_json::from_str(body) {
        Ok(ack) => ack,
        Err(err) => {
            check_status(status)?;
            return Err(err.into());
        }
    };
    if let Some(error) = ack.error {
        return Err(GatewayError::Server(error));
    }
    check_status(status)
}

/// Location mutations must answer `{success: true}`
pub fn decode_ack(status: StatusCode, body: &str) -> Result<(), GatewayError> {
    let ack: Ack = match serde_json::from_str(body) {
        Ok(ack) => ack,
        Err(err) => {
            check_status(status)?;
            return Err(err.into());
        }
    };

    match (ack.success, ack.error) {
        (Some(true), _) => Ok(()),
        (_, Some(error)) => Err(GatewayError::Server(error)),
        (Some(false), None) => Err(GatewayError::Server("The server rejected the request.".to_string())),
        (None, None) => {
            check_status(status)?;
            Err(GatewayError::Decode("missing success flag".to_string()))
        }
    }
}
