/// User interface pieces
///
/// - `map.rs` - map viewport state (center, zoom, marker) and the lazily created detail map
/// - `canvas.rs` - canvas program drawing a viewport and turning clicks into picks
/// - `panels.rs` - widget trees for the selection, upload, gallery, history and detail panels

pub mod canvas;
pub mod map;
pub mod panels;
