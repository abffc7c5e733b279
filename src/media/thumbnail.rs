/// Gallery thumbnails
///
/// The server inlines each image as base64; the grid and the detail view
/// share one handle per image so iced uploads the texture once.

use std::collections::HashMap;

use base64::Engine as _;
use iced::widget::image::Handle;

/// Decode a batch of `(image id, payload)` pairs off the UI thread.
/// Unreadable payloads are logged and left out.
pub async fn decode_all(payloads: Vec<(i64, String)>) -> HashMap<i64, Handle> {
    if payloads.is_empty() {
        return HashMap::new();
    }

    // Spawn blocking task for CPU-bound decoding
    match tokio::task::spawn_blocking(move || decode_all_blocking(payloads)).await {
        Ok(decoded) => decoded,
        Err(err) => {
            log::error!("❌ Thumbnail decoding failed: {err}");
            HashMap::new()
        }
    }
}

fn decode_all_blocking(payloads: Vec<(i64, String)>) -> HashMap<i64, Handle> {
    let total = payloads.len();
    let decoded: HashMap<i64, Handle> = payloads
        .into_iter()
        .filter_map(|(id, encoded)| {
            let handle = decode_embedded(&encoded);
            if handle.is_none() {
                log::warn!("⚠️  Image {id} has an unreadable payload");
            }
            handle.map(|handle| (id, handle))
        })
        .collect();

    log::debug!("🖼️  Decoded {}/{} thumbnails", decoded.len(), total);
    decoded
}

/// Decode an inlined payload into an image handle.
/// Returns None if the payload is not valid base64.
pub fn decode_embedded(encoded: &str) -> Option<Handle> {
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(encoded.trim())
        .ok()?;

    if bytes.is_empty() {
        return None;
    }

    Some(Handle::from_bytes(bytes))
}
