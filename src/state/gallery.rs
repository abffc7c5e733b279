/// The gallery of uploaded images
///
/// Holds the image list fetched from `GET /api/images`. The list is never
/// patched locally: every upload is followed by a full reload.

use std::collections::HashMap;

use iced::widget::image::Handle;

use super::data::ImageRecord;
use super::display::{format_capture_time, truncate_label};
use super::reload::{LoadState, Reloadable, Ticket};
use crate::error::GatewayError;

/// One clickable cell of the gallery grid
#[derive(Debug, Clone, PartialEq)]
pub struct GalleryTile {
    pub id: i64,
    pub filename: String,
    /// Location name cut to the label limit
    pub label: String,
}

/// What the gallery panel should show
#[derive(Debug, Clone, PartialEq)]
pub enum GalleryView {
    Loading,
    Empty,
    Failed(String),
    Tiles(Vec<GalleryTile>),
}

/// Everything the detail view needs for one image
#[derive(Debug, Clone, PartialEq)]
pub struct ImageDetail {
    pub record: ImageRecord,
    /// Capture time as "YYYY-MM-DD HH:MM:SS"
    pub taken_at: String,
}

#[derive(Debug, Default)]
pub struct Gallery {
    images: Reloadable<ImageRecord>,
    /// Decoded image handles for the current list, keyed by image ID
    thumbnails: HashMap<i64, Handle>,
}

impl Gallery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin_reload(&mut self) -> Ticket {
        self.images.begin()
    }

    pub fn is_reloading(&self) -> bool {
        self.images.in_flight()
    }

    /// Replace the cached list with a fetch result.
    /// Returns false if the result was superseded by a newer reload.
    ///
    /// Thumbnails of images that left the list are dropped; new ones are
    /// decoded later from `take_payloads`.
    pub fn apply_reload(&mut self, ticket: Ticket, result: Result<Vec<ImageRecord>, GatewayError>) -> bool {
        let failure = result.as_ref().err().cloned();
        if !self.images.apply(ticket, result) {
            log::debug!("Dropped stale gallery response");
            return false;
        }

        match failure {
            Some(err) => log::error!("❌ Error loading gallery: {err}"),
            None => log::info!("🖼️  Gallery holds {} images", self.images.items().len()),
        }

        let images = self.images.items();
        self.thumbnails.retain(|id, _| images.iter().any(|image| image.id == *id));
        true
    }

    /// Move out the inlined payloads of images that have no thumbnail yet.
    /// Images never change under the same id, so decoded ones are reused.
    pub fn take_payloads(&mut self) -> Vec<(i64, String)> {
        let thumbnails = &self.thumbnails;
        self.images
            .items_mut()
            .iter_mut()
            .filter(|image| !thumbnails.contains_key(&image.id))
            .filter_map(|image| image.encoded.take().map(|encoded| (image.id, encoded)))
            .collect()
    }

    /// Attach decoded thumbnails if they belong to the current list
    pub fn apply_thumbnails(&mut self, ticket: Ticket, decoded: HashMap<i64, Handle>) -> bool {
        if !self.images.is_current(ticket) {
            log::debug!("Dropped thumbnails of a superseded gallery reload");
            return false;
        }
        self.thumbnails.extend(decoded);
        true
    }

    /// Whether the current list has an image with this id
    pub fn contains(&self, id: i64) -> bool {
        self.images.items().iter().any(|image| image.id == id)
    }

    pub fn render(&self) -> GalleryView {
        match self.images.state() {
            LoadState::Pending => GalleryView::Loading,
            LoadState::Failed(reason) => GalleryView::Failed(reason.clone()),
            LoadState::Ready(images) if images.is_empty() => GalleryView::Empty,
            LoadState::Ready(images) => GalleryView::Tiles(
                images
                    .iter()
                    .map(|image| GalleryTile {
                        id: image.id,
                        filename: image.filename.clone(),
                        label: truncate_label(&image.location_name),
                    })
                    .collect(),
            ),
        }
    }

    /// Resolve a clicked tile back to its record.
    ///
    /// Tiles are only rendered from the current list, so a miss means the
    /// view and the cache disagree; it is logged and otherwise ignored.
    pub fn open(&self, id: i64) -> Option<ImageDetail> {
        let Some(record) = self.images.items().iter().find(|image| image.id == id) else {
            log::warn!("⚠️  Gallery has no image with id {id}");
            return None;
        };

        Some(ImageDetail {
            record: record.clone(),
            taken_at: format_capture_time(&record.timestamp),
        })
    }

    pub fn thumbnail(&self, id: i64) -> Option<&Handle> {
        self.thumbnails.get(&id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: i64, location: &str) -> ImageRecord {
        ImageRecord {
            id,
            filename: format!("IMG_{id:04}.jpg"),
            encoded: None,
            location_name: location.to_string(),
            latitude: 48.8584,
            longitude: 2.2945,
            timestamp: "20240501_101502".to_string(),
        }
    }

    fn loaded(images: Vec<ImageRecord>) -> Gallery {
        let mut gallery = Gallery::new();
        let ticket = gallery.begin_reload();
        assert!(gallery.apply_reload(ticket, Ok(images)));
        gallery
    }

    #[test]
    fn test_loading_before_first_reload() {
        assert_eq!(Gallery::new().render(), GalleryView::Loading);
    }

    #[test]
    fn test_empty_placeholder() {
        assert_eq!(loaded(vec![]).render(), GalleryView::Empty);
    }

    #[test]
    fn test_tiles_truncate_location() {
        let gallery = loaded(vec![
            record(1, "Eiffel Tower"),
            record(2, "Champ de Mars, 5 Avenue Anatole France, Paris"),
        ]);

        let GalleryView::Tiles(tiles) = gallery.render() else {
            panic!("expected tiles");
        };
        assert_eq!(tiles.len(), 2);
        assert_eq!(tiles[0].label, "Eiffel Tower");
        assert_eq!(tiles[1].label, "Champ de Mars, 5 Avenue Anatol...");
    }

    #[test]
    fn test_reload_is_idempotent() {
        let images = vec![record(1, "Eiffel Tower"), record(2, "Louvre")];
        let mut gallery = loaded(images.clone());
        let first = gallery.render();

        let ticket = gallery.begin_reload();
        gallery.apply_reload(ticket, Ok(images));

        assert_eq!(gallery.render(), first);
    }

    #[test]
    fn test_failure_shows_error_not_stale_tiles() {
        let mut gallery = loaded(vec![record(1, "Eiffel Tower")]);
        let ticket = gallery.begin_reload();
        gallery.apply_reload(ticket, Err(GatewayError::Transport("connection refused".to_string())));

        assert_eq!(
            gallery.render(),
            GalleryView::Failed("network error: connection refused".to_string())
        );
        assert!(gallery.open(1).is_none());
    }

    #[test]
    fn test_out_of_order_reloads() {
        let mut gallery = Gallery::new();
        let older = gallery.begin_reload();
        let newer = gallery.begin_reload();

        gallery.apply_reload(newer, Ok(vec![record(2, "Louvre")]));
        assert!(!gallery.apply_reload(older, Ok(vec![record(1, "Eiffel Tower")])));

        assert!(gallery.open(2).is_some());
        assert!(gallery.open(1).is_none());
    }

    #[test]
    fn test_open_formats_timestamp() {
        let gallery = loaded(vec![record(5, "Eiffel Tower")]);
        let detail = gallery.open(5).unwrap();
        assert_eq!(detail.taken_at, "2024-05-01 10:15:02");
        assert_eq!(detail.record.id, 5);
    }

    #[test]
    fn test_open_missing_is_noop() {
        let gallery = loaded(vec![record(5, "Eiffel Tower")]);
        assert!(gallery.open(99).is_none());
    }

    #[test]
    fn test_payloads_taken_once() {
        let mut with_payload = record(1, "Eiffel Tower");
        with_payload.encoded = Some("aGVsbG8=".to_string());
        let mut gallery = loaded(vec![with_payload, record(2, "Louvre")]);

        assert_eq!(gallery.take_payloads(), vec![(1, "aGVsbG8=".to_string())]);
        assert!(gallery.take_payloads().is_empty());
    }

    #[test]
    fn test_thumbnails_survive_reload_of_same_image() {
        let mut with_payload = record(1, "Eiffel Tower");
        with_payload.encoded = Some("aGVsbG8=".to_string());
        let mut gallery = Gallery::new();
        let ticket = gallery.begin_reload();
        gallery.apply_reload(ticket, Ok(vec![with_payload.clone(), record(2, "Louvre")]));

        let decoded = HashMap::from([(1, Handle::from_bytes(vec![1, 2, 3]))]);
        assert!(gallery.apply_thumbnails(ticket, decoded));
        assert!(gallery.thumbnail(1).is_some());

        // Image 1 comes back with its payload but is not decoded again
        let ticket = gallery.begin_reload();
        gallery.apply_reload(ticket, Ok(vec![with_payload, record(3, "Orsay")]));
        assert!(gallery.take_payloads().is_empty());
        assert!(gallery.thumbnail(1).is_some());
    }

    #[test]
    fn test_thumbnails_of_removed_images_dropped() {
        let mut gallery = loaded(vec![record(1, "Eiffel Tower")]);
        let ticket = gallery.begin_reload();
        gallery.apply_reload(ticket, Ok(vec![record(1, "Eiffel Tower")]));
        gallery.apply_thumbnails(ticket, HashMap::from([(1, Handle::from_bytes(vec![1]))]));

        let ticket = gallery.begin_reload();
        gallery.apply_reload(ticket, Ok(vec![record(2, "Louvre")]));
        assert!(gallery.thumbnail(1).is_none());
        assert!(!gallery.contains(1));
        assert!(gallery.contains(2));
    }

    #[test]
    fn test_stale_thumbnails_dropped() {
        let mut gallery = Gallery::new();
        let older = gallery.begin_reload();
        gallery.apply_reload(older, Ok(vec![record(1, "Eiffel Tower")]));
        let newer = gallery.begin_reload();

        let decoded = HashMap::from([(1, Handle::from_bytes(vec![1]))]);
        assert!(!gallery.apply_thumbnails(older, decoded));
        assert!(gallery.thumbnail(1).is_none());
        assert!(gallery.apply_reload(newer, Ok(vec![record(1, "Eiffel Tower")])));
    }

    #[test]
    fn test_stale_failure_does_not_replace_list() {
        let mut gallery = Gallery::new();
        let older = gallery.begin_reload();
        let newer = gallery.begin_reload();
        gallery.apply_reload(newer, Ok(vec![record(1, "Eiffel Tower")]));

        assert!(!gallery.apply_reload(older, Err(GatewayError::Status(500))));
        assert!(gallery.contains(1));
    }
}
