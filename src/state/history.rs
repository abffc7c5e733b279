/// Location history
///
/// Holds the list of previously used and favorited locations. Every
/// mutation goes to the server first; once the server acknowledges it, the
/// whole list is fetched again. Nothing is patched locally.

use super::data::{LocationRecord, LocationUpdate, NewLocation, Point};
use super::display::{format_last_used, truncate_label};
use super::reload::{LoadState, Reloadable, Ticket};
use crate::error::GatewayError;

/// Maximum number of entries shown in the history panel
pub const HISTORY_LIMIT: usize = 10;

/// A change to the server's location list
#[derive(Debug, Clone, PartialEq)]
pub enum LocationMutation {
    /// Create or upsert from the selected point (`POST /api/locations`)
    Save(NewLocation),
    /// Bump the use count (`PUT /api/locations/{id}` with `{}`)
    Touch { id: i64 },
    SetFavorite { id: i64, is_favorite: bool },
    Delete { id: i64 },
}

impl LocationMutation {
    /// PUT body for the update variants
    pub fn update_body(&self) -> Option<LocationUpdate> {
        match self {
            LocationMutation::Touch { .. } => Some(LocationUpdate::default()),
            LocationMutation::SetFavorite { is_favorite, .. } => Some(LocationUpdate {
                is_favorite: Some(*is_favorite),
            }),
            _ => None,
        }
    }

    /// Notice shown once the server accepted the change
    pub fn success_notice(&self) -> Option<&'static str> {
        match self {
            LocationMutation::Save(location) if location.is_favorite => Some("Location saved to favorites."),
            LocationMutation::Save(_) => Some("Location saved to history."),
            LocationMutation::Delete { .. } => Some("Location removed from history."),
            _ => None,
        }
    }
}

/// One row of the history panel
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryEntry {
    pub id: i64,
    pub label: String,
    pub last_used: String,
    pub use_count: u32,
    pub is_favorite: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum HistoryView {
    Loading,
    Empty,
    Failed(String),
    Entries(Vec<HistoryEntry>),
}

#[derive(Debug, Default)]
pub struct History {
    locations: Reloadable<LocationRecord>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin_reload(&mut self) -> Ticket {
        self.locations.begin()
    }

    pub fn is_reloading(&self) -> bool {
        self.locations.in_flight()
    }

    pub fn apply_reload(
        &mut self,
        ticket: Ticket,
        result: Result<Vec<LocationRecord>, GatewayError>,
    ) -> bool {
        let failure = result.as_ref().err().cloned();
        if !self.locations.apply(ticket, result) {
            log::debug!("Dropped stale history response");
            return false;
        }

        match failure {
            Some(err) => log::error!("❌ Error loading location history: {err}"),
            None => log::info!("📍 History holds {} locations", self.locations.items().len()),
        }
        true
    }

    /// Server order is kept as-is; only the first `HISTORY_LIMIT` are shown
    pub fn render(&self) -> HistoryView {
        match self.locations.state() {
            LoadState::Pending => HistoryView::Loading,
            LoadState::Failed(reason) => HistoryView::Failed(reason.clone()),
            LoadState::Ready(locations) if locations.is_empty() => HistoryView::Empty,
            LoadState::Ready(locations) => HistoryView::Entries(
                locations
                    .iter()
                    .take(HISTORY_LIMIT)
                    .map(|location| HistoryEntry {
                        id: location.id,
                        label: truncate_label(&location.location_name),
                        last_used: format_last_used(location.last_used.as_deref()),
                        use_count: location.use_count,
                        is_favorite: location.is_favorite,
                    })
                    .collect(),
            ),
        }
    }

    pub fn get(&self, id: i64) -> Option<&LocationRecord> {
        let found = self.locations.items().iter().find(|location| location.id == id);
        if found.is_none() {
            log::warn!("⚠️  History has no location with id {id}");
        }
        found
    }

    /// Point to select plus the use-count bump for a reused location
    pub fn reuse(&self, id: i64) -> Option<(Point, LocationMutation)> {
        let location = self.get(id)?;
        Some((location.to_point(), LocationMutation::Touch { id }))
    }

    pub fn remove(&self, id: i64) -> Option<LocationMutation> {
        self.get(id).map(|location| LocationMutation::Delete { id: location.id })
    }

    /// Flip the favorite flag relative to the cached record
    pub fn toggle_favorite(&self, id: i64) -> Option<LocationMutation> {
        self.get(id).map(|location| LocationMutation::SetFavorite {
            id: location.id,
            is_favorite: !location.is_favorite,
        })
    }

    /// Save the selected point. Nothing to do without a selection.
    pub fn save(point: Option<&Point>, is_favorite: bool) -> Option<LocationMutation> {
        point.map(|point| LocationMutation::Save(NewLocation::from_point(point, is_favorite)))
    }

    /// Settle a mutation. An acknowledged change starts a reload and returns
    /// its ticket; a failed one leaves the list alone and returns the message.
    pub fn acknowledge(
        &mut self,
        mutation: &LocationMutation,
        result: Result<(), GatewayError>,
    ) -> Result<Ticket, String> {
        match result {
            Ok(()) => {
                log::info!("✅ Location change accepted: {mutation:?}");
                Ok(self.begin_reload())
            }
            Err(err) => {
                log::error!("❌ Location change rejected: {err}");
                Err(err.to_string())
            }
        }
    }
}
