/// State management module
///
/// This module handles all application state, including:
/// - Shared data structures (data.rs)
/// - Request sequencing for server-backed lists (reload.rs)
/// - The selected point and staged file (selection.rs)
/// - The uploaded image gallery (gallery.rs)
/// - The location history (history.rs)
/// - Display formatting for labels and dates (display.rs)
/// - The transient status line (status.rs)

pub mod data;
pub mod display;
pub mod gallery;
pub mod history;
pub mod reload;
pub mod selection;
pub mod status;
