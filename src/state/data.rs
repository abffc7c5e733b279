/// Shared data structures for the application state
///
/// These structs represent the data model that flows between
/// the gallery server and the UI layer.

use serde::{Deserialize, Serialize};

/// Label used when a point is picked without a known place name
pub const DEFAULT_POINT_LABEL: &str = "Custom location";

/// The place a photo was taken
#[derive(Debug, Clone, PartialEq)]
pub struct Point {
    pub latitude: f64,
    pub longitude: f64,
    /// Human-readable place name (reverse lookup, search result, or placeholder)
    pub label: String,
}

impl Point {
    pub fn new(latitude: f64, longitude: f64, label: Option<String>) -> Self {
        Self {
            latitude,
            longitude,
            label: label.unwrap_or_else(|| DEFAULT_POINT_LABEL.to_string()),
        }
    }
}

/// A user-chosen file held in memory until it is uploaded or cleared
#[derive(Clone, PartialEq)]
pub struct StagedFile {
    /// Filename only (e.g., "IMG_0042.jpg")
    pub filename: String,
    /// MIME type detected from the extension or the file contents
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl StagedFile {
    pub fn is_image(&self) -> bool {
        self.mime.starts_with("image/")
    }
}

// Raw bytes would flood the logs
impl std::fmt::Debug for StagedFile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StagedFile")
            .field("filename", &self.filename)
            .field("mime", &self.mime)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Represents a single uploaded image as listed by `GET /api/images`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ImageRecord {
    /// Unique server ID
    pub id: i64,
    /// Original filename as uploaded
    pub filename: String,
    /// Image bytes encoded as base64 (None if the server did not inline them)
    #[serde(rename = "base64", default)]
    pub encoded: Option<String>,
    pub location_name: String,
    #[serde(rename = "lat")]
    pub latitude: f64,
    #[serde(rename = "lng")]
    pub longitude: f64,
    /// Compact capture time written by the server, "YYYYMMDD_HHMMSS"
    pub timestamp: String,
}

/// A previously used or saved location as listed by `GET /api/locations`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LocationRecord {
    pub id: i64,
    pub location_name: String,
    #[serde(rename = "lat")]
    pub latitude: f64,
    #[serde(rename = "lng")]
    pub longitude: f64,
    /// How many times the location was used (always >= 1)
    pub use_count: u32,
    #[serde(default)]
    pub is_favorite: bool,
    #[serde(default)]
    pub last_used: Option<String>,
}

impl LocationRecord {
    pub fn to_point(&self) -> Point {
        Point::new(self.latitude, self.longitude, Some(self.location_name.clone()))
    }
}

/// Body of `POST /api/locations`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewLocation {
    pub lat: f64,
    pub lng: f64,
    pub location_name: String,
    pub is_favorite: bool,
}

impl NewLocation {
    pub fn from_point(point: &Point, is_favorite: bool) -> Self {
        Self {
            lat: point.latitude,
            lng: point.longitude,
            location_name: point.label.clone(),
            is_favorite,
        }
    }
}

/// Body of `PUT /api/locations/{id}`
///
/// An empty body (`{}`) asks the server to bump `use_count`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LocationUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_favorite: Option<bool>,
}
