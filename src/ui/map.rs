/// Map viewport state
///
/// A `MapView` is an equirectangular viewport: a center, a zoom level and at
/// most one marker. The canvas program in `canvas.rs` draws it; every change
/// clears the geometry cache so the next frame redraws.

use cgmath::Vector2;
use iced::widget::canvas::Cache;
use iced::{Point, Size};

/// Zoom of the pick map at startup (whole world)
pub const WORLD_ZOOM: f64 = 2.0;
/// Zoom used when jumping to a searched or reused place
pub const PLACE_ZOOM: f64 = 13.0;
const MIN_ZOOM: f64 = 1.0;
const MAX_ZOOM: f64 = 19.0;
/// Pixels covering 360 degrees of longitude at zoom 0
const TILE_SIZE: f64 = 256.0;

pub struct MapView {
    /// Center in degrees, x = longitude, y = latitude
    center: Vector2<f64>,
    zoom: f64,
    marker: Option<Vector2<f64>>,
    cache: Cache,
}

impl MapView {
    pub fn new(latitude: f64, longitude: f64, zoom: f64) -> Self {
        Self {
            center: Vector2::new(wrap_longitude(longitude), clamp_latitude(latitude)),
            zoom: zoom.clamp(MIN_ZOOM, MAX_ZOOM),
            marker: None,
            cache: Cache::new(),
        }
    }

    /// The whole world, centered on (0, 0)
    pub fn world() -> Self {
        Self::new(0.0, 0.0, WORLD_ZOOM)
    }

    pub fn set_view(&mut self, latitude: f64, longitude: f64, zoom: f64) {
        self.center = Vector2::new(wrap_longitude(longitude), clamp_latitude(latitude));
        self.zoom = zoom.clamp(MIN_ZOOM, MAX_ZOOM);
        self.cache.clear();
    }

    /// Move the single marker, creating it on first use
    pub fn place_marker(&mut self, latitude: f64, longitude: f64) {
        self.marker = Some(Vector2::new(longitude, latitude));
        self.cache.clear();
    }

    /// (latitude, longitude) of the view center
    pub fn center(&self) -> (f64, f64) {
        (self.center.y, self.center.x)
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    /// (latitude, longitude) of the marker, if one was placed
    pub fn marker(&self) -> Option<(f64, f64)> {
        self.marker.map(|m| (m.y, m.x))
    }

    pub fn zoom_by(&mut self, delta: f32) {
        self.zoom = (self.zoom + delta as f64).clamp(MIN_ZOOM, MAX_ZOOM);
        self.cache.clear();
    }

    /// Shift the view by a screen-space drag (pixels)
    pub fn pan_by(&mut self, delta: Vector2<f32>) {
        let dpp = self.degrees_per_pixel();
        self.center.x = wrap_longitude(self.center.x - delta.x as f64 * dpp);
        self.center.y = clamp_latitude(self.center.y + delta.y as f64 * dpp);
        self.cache.clear();
    }

    /// Ask for a full redraw, e.g. after the map became visible or resized
    pub fn invalidate_size(&mut self) {
        self.cache.clear();
    }

    pub fn degrees_per_pixel(&self) -> f64 {
        360.0 / (TILE_SIZE * 2f64.powf(self.zoom))
    }

    /// Screen position of a coordinate inside a canvas of `size`
    pub fn project(&self, latitude: f64, longitude: f64, size: Size) -> Point {
        let dpp = self.degrees_per_pixel();
        let x = (longitude - self.center.x) / dpp + size.width as f64 / 2.0;
        let y = (self.center.y - latitude) / dpp + size.height as f64 / 2.0;
        Point::new(x as f32, y as f32)
    }

    /// Coordinate under a screen position, as (latitude, longitude)
    pub fn unproject(&self, position: Point, size: Size) -> (f64, f64) {
        let dpp = self.degrees_per_pixel();
        let longitude = self.center.x + (position.x as f64 - size.width as f64 / 2.0) * dpp;
        let latitude = self.center.y - (position.y as f64 - size.height as f64 / 2.0) * dpp;
        (clamp_latitude(latitude), wrap_longitude(longitude))
    }

    pub(crate) fn cache(&self) -> &Cache {
        &self.cache
    }
}

impl std::fmt::Debug for MapView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MapView")
            .field("center", &self.center())
            .field("zoom", &self.zoom)
            .field("marker", &self.marker())
            .finish()
    }
}

/// Map shown next to an opened gallery image.
///
/// Created on the first open and only repositioned afterwards.
#[derive(Debug, Default)]
pub struct DetailMap {
    view: Option<MapView>,
    created: usize,
}

impl DetailMap {
    pub fn show(&mut self, latitude: f64, longitude: f64) {
        match self.view.as_mut() {
            Some(view) => view.set_view(latitude, longitude, PLACE_ZOOM),
            None => {
                self.created += 1;
                log::debug!("🗺️  Creating detail map #{}", self.created);
                self.view = Some(MapView::new(latitude, longitude, PLACE_ZOOM));
            }
        }

        if let Some(view) = self.view.as_mut() {
            view.place_marker(latitude, longitude);
            // The panel was hidden until now
            view.invalidate_size();
        }
    }

    pub fn view(&self) -> Option<&MapView> {
        self.view.as_ref()
    }

    #[cfg(test)]
    pub fn instances_created(&self) -> usize {
        self.created
    }
}

fn clamp_latitude(latitude: f64) -> f64 {
    latitude.clamp(-90.0, 90.0)
}

fn wrap_longitude(longitude: f64) -> f64 {
    if (-180.0..=180.0).contains(&longitude) {
        longitude
    } else {
        (longitude + 180.0).rem_euclid(360.0) - 180.0
    }
}
