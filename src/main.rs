use std::collections::HashMap;
use std::path::PathBuf;

use iced::event::{self, Event};
use iced::widget::image::Handle;
use iced::widget::{column, container, row, scrollable, text, Column};
use iced::{window, Element, Length, Subscription, Task, Theme};
use rfd::FileDialog;

mod config;
mod error;
mod gateway;
mod geocode;
mod media;
mod state;
mod ui;

use config::AppConfig;
use error::GatewayError;
use gateway::Gateway;
use geocode::{Geocoder, Place};
use state::data::{ImageRecord, LocationRecord, StagedFile};
use state::gallery::{Gallery, ImageDetail};
use state::history::{History, LocationMutation};
use state::reload::Ticket;
use state::selection::Selection;
use state::status::{StatusKind, StatusLine};
use ui::map::{DetailMap, MapView, PLACE_ZOOM};
use ui::panels;

/// Extensions offered by the file picker
const IMAGE_EXTENSIONS: [&str; 8] = ["jpg", "jpeg", "png", "gif", "webp", "bmp", "tif", "tiff"];

/// Main application state
struct GeoGallery {
    config: AppConfig,
    gateway: Gateway,
    geocoder: Geocoder,
    /// The pick map; owns the single selection marker
    map: MapView,
    selection: Selection,
    gallery: Gallery,
    history: History,
    /// Image shown in the detail view, if open
    detail: Option<ImageDetail>,
    detail_map: DetailMap,
    search_query: String,
    status: StatusLine,
}

/// Application messages (events)
#[derive(Debug, Clone)]
pub enum Message {
    /// A click on the pick map (no drag)
    MapPicked { latitude: f64, longitude: f64 },
    MapPanned(cgmath::Vector2<f32>),
    MapZoomed(f32),
    /// Reverse lookup finished for the selection with this ticket
    ReverseResolved(Ticket, Result<Option<String>, GatewayError>),

    SearchChanged(String),
    SearchSubmitted,
    SearchResolved(Result<Option<Place>, GatewayError>),

    /// User clicked "Choose image..."
    PickFile,
    /// A file was dropped onto the window
    FileDropped(PathBuf),
    FileLoaded(Result<StagedFile, String>),
    PreviewReady(Ticket, Result<Handle, String>),
    ClearFile,

    Upload,
    UploadFinished(Ticket, Result<(), GatewayError>),

    ReloadGallery,
    GalleryLoaded(Ticket, Result<Vec<ImageRecord>, GatewayError>),
    /// Thumbnails decoded for the gallery reload with this ticket
    ThumbnailsDecoded(Ticket, HashMap<i64, Handle>),
    OpenImage(i64),
    CloseImage,

    ReloadHistory,
    HistoryLoaded(Ticket, Result<Vec<LocationRecord>, GatewayError>),
    SaveLocation { favorite: bool },
    ReuseLocation(i64),
    DeleteLocation(i64),
    ToggleFavorite(i64),
    /// The server answered a location change
    LocationMutated(LocationMutation, Result<(), GatewayError>),

    /// The display interval of a status message ended
    StatusExpired(Ticket),
}

impl GeoGallery {
    /// Create the application and kick off the first gallery and history loads
    fn new(config: AppConfig, gateway: Gateway, geocoder: Geocoder) -> (Self, Task<Message>) {
        let mut app = GeoGallery {
            config,
            gateway,
            geocoder,
            map: MapView::world(),
            selection: Selection::new(),
            gallery: Gallery::new(),
            history: History::new(),
            detail: None,
            detail_map: DetailMap::default(),
            search_query: String::new(),
            status: StatusLine::default(),
        };

        let startup = Task::batch([app.reload_gallery(), app.reload_history()]);
        (app, startup)
    }

    /// Handle application messages and update state
    fn update(&mut self, message: Message) -> Task<Message> {
        match message {
            Message::MapPicked { latitude, longitude } => {
                let ticket = self.select_point(latitude, longitude, None);
                let geocoder = self.geocoder.clone();
                Task::perform(
                    async move { geocoder.reverse(latitude, longitude).await },
                    move |result| Message::ReverseResolved(ticket, result),
                )
            }
            Message::MapPanned(delta) => {
                self.map.pan_by(delta);
                Task::none()
            }
            Message::MapZoomed(delta) => {
                self.map.zoom_by(delta);
                Task::none()
            }
            Message::ReverseResolved(ticket, result) => {
                match result {
                    Ok(Some(label)) => {
                        if !self.selection.set_reverse_lookup_label(ticket, label) {
                            log::debug!("Dropped reverse lookup for an old selection");
                        }
                    }
                    Ok(None) => log::debug!("No address at the selected point"),
                    Err(err) => log::warn!("⚠️  Reverse lookup failed: {err}"),
                }
                Task::none()
            }

            Message::SearchChanged(query) => {
                self.search_query = query;
                Task::none()
            }
            Message::SearchSubmitted => {
                let query = self.search_query.trim().to_string();
                if query.is_empty() {
                    return Task::none();
                }

                log::info!("🔍 Searching for {query:?}");
                let geocoder = self.geocoder.clone();
                Task::perform(
                    async move { geocoder.search(&query).await },
                    Message::SearchResolved,
                )
            }
            Message::SearchResolved(result) => match result {
                Ok(Some(place)) => {
                    self.map.set_view(place.latitude, place.longitude, PLACE_ZOOM);
                    self.select_point(place.latitude, place.longitude, Some(place.label));
                    Task::none()
                }
                Ok(None) => self.show_status("Location not found. Try another search.", StatusKind::Error),
                Err(err) => {
                    log::error!("❌ Error searching for location: {err}");
                    self.show_status("Error searching for location.", StatusKind::Error)
                }
            },

            Message::PickFile => {
                // Show the native file picker dialog
                let mut dialog = FileDialog::new()
                    .set_title("Select a Photo")
                    .add_filter("Images", &IMAGE_EXTENSIONS);
                if let Some(pictures) = dirs::picture_dir() {
                    dialog = dialog.set_directory(pictures);
                }

                match dialog.pick_file() {
                    Some(path) => load_file(path),
                    None => Task::none(),
                }
            }
            Message::FileDropped(path) => {
                log::info!("📥 File dropped: {}", path.display());
                load_file(path)
            }
            Message::FileLoaded(Ok(file)) => self.stage_file(file),
            Message::FileLoaded(Err(err)) => {
                log::error!("❌ {err}");
                self.show_status(err, StatusKind::Error)
            }
            Message::PreviewReady(ticket, result) => {
                match result {
                    Ok(handle) => {
                        if !self.selection.set_preview(ticket, handle) {
                            log::debug!("Dropped preview for a file that is no longer staged");
                        }
                    }
                    Err(err) => log::warn!("⚠️  Preview failed: {err}"),
                }
                Task::none()
            }
            Message::ClearFile => {
                self.selection.clear_staged_file();
                Task::none()
            }

            Message::Upload => match self.selection.begin_upload() {
                Ok(request) => {
                    let ticket = request.file_ticket;
                    let gateway = self.gateway.clone();
                    let upload = Task::perform(
                        async move { gateway.upload(&request).await },
                        move |result| Message::UploadFinished(ticket, result),
                    );
                    Task::batch([self.show_status("Uploading image...", StatusKind::Info), upload])
                }
                Err(err) => self.show_status(err.to_string(), StatusKind::Error),
            },
            Message::UploadFinished(ticket, result) => match self.selection.finish_upload(ticket, result) {
                Ok(()) => {
                    log::info!("✅ Upload complete");
                    Task::batch([
                        self.show_status("Image uploaded successfully!", StatusKind::Success),
                        self.reload_gallery(),
                    ])
                }
                Err(message) => {
                    log::error!("❌ Upload rejected: {message}");
                    self.show_status(message, StatusKind::Error)
                }
            },

            Message::ReloadGallery => self.reload_gallery(),
            Message::GalleryLoaded(ticket, result) => {
                if !self.gallery.apply_reload(ticket, result) {
                    return Task::none();
                }

                // Re-resolve the open image; close it if it left the gallery
                if let Some(id) = self.detail.as_ref().map(|detail| detail.record.id) {
                    self.detail = if self.gallery.contains(id) {
                        self.gallery.open(id)
                    } else {
                        log::info!("Image {id} is no longer in the gallery, closing it");
                        None
                    };
                }

                let payloads = self.gallery.take_payloads();
                if payloads.is_empty() {
                    return Task::none();
                }
                Task::perform(media::thumbnail::decode_all(payloads), move |decoded| {
                    Message::ThumbnailsDecoded(ticket, decoded)
                })
            }
            Message::ThumbnailsDecoded(ticket, decoded) => {
                self.gallery.apply_thumbnails(ticket, decoded);
                Task::none()
            }
            Message::OpenImage(id) => {
                if let Some(detail) = self.gallery.open(id) {
                    self.detail_map.show(detail.record.latitude, detail.record.longitude);
                    self.detail = Some(detail);
                }
                Task::none()
            }
            Message::CloseImage => {
                self.detail = None;
                Task::none()
            }

            Message::ReloadHistory => self.reload_history(),
            Message::HistoryLoaded(ticket, result) => {
                self.history.apply_reload(ticket, result);
                Task::none()
            }
            Message::SaveLocation { favorite } => match History::save(self.selection.point(), favorite) {
                Some(mutation) => self.mutate_location(mutation),
                None => Task::none(),
            },
            Message::ReuseLocation(id) => match self.history.reuse(id) {
                Some((point, mutation)) => {
                    self.map.set_view(point.latitude, point.longitude, PLACE_ZOOM);
                    self.select_point(point.latitude, point.longitude, Some(point.label));
                    self.mutate_location(mutation)
                }
                None => Task::none(),
            },
            Message::DeleteLocation(id) => match self.history.remove(id) {
                Some(mutation) => self.mutate_location(mutation),
                None => Task::none(),
            },
            Message::ToggleFavorite(id) => match self.history.toggle_favorite(id) {
                Some(mutation) => self.mutate_location(mutation),
                None => Task::none(),
            },
            Message::LocationMutated(mutation, result) => match self.history.acknowledge(&mutation, result) {
                Ok(ticket) => {
                    let reload = self.fetch_history(ticket);
                    match mutation.success_notice() {
                        Some(notice) => Task::batch([self.show_status(notice, StatusKind::Success), reload]),
                        None => reload,
                    }
                }
                Err(message) => self.show_status(message, StatusKind::Error),
            },

            Message::StatusExpired(ticket) => {
                self.status.expire(ticket);
                Task::none()
            }
        }
    }

    /// Build the user interface
    fn view(&self) -> Element<'_, Message> {
        let controls: Column<Message> = column![
            text("GeoGallery").size(32),
            panels::search_bar(&self.search_query),
            panels::pick_map(&self.map),
            panels::selection_summary(&self.selection),
            panels::upload_panel(&self.selection),
            panels::status_line(&self.status),
        ]
        .spacing(16)
        .padding(20);

        let main_panel = match &self.detail {
            Some(detail) => panels::detail_panel(
                detail,
                self.gallery.thumbnail(detail.record.id),
                self.detail_map.view(),
            ),
            None => panels::gallery_panel(&self.gallery),
        };

        let browse = column![main_panel, panels::history_panel(&self.history)]
            .spacing(20)
            .padding(20)
            .width(Length::Fill)
            .height(Length::Fill);

        container(row![
            scrollable(controls).width(Length::Fixed(480.0)),
            browse,
        ])
        .width(Length::Fill)
        .height(Length::Fill)
        .into()
    }

    /// Files dropped onto the window are staged like picked ones
    fn subscription(&self) -> Subscription<Message> {
        event::listen_with(|event, _status, _window| match event {
            Event::Window(window::Event::FileDropped(path)) => Some(Message::FileDropped(path)),
            _ => None,
        })
    }

    /// Set the application theme
    fn theme(&self) -> Theme {
        Theme::Dark
    }

    /// Single selection path: moves the marker and replaces the selected point
    fn select_point(&mut self, latitude: f64, longitude: f64, label: Option<String>) -> Ticket {
        self.map.place_marker(latitude, longitude);
        self.selection.select_point(latitude, longitude, label)
    }

    fn stage_file(&mut self, file: StagedFile) -> Task<Message> {
        let bytes = file.bytes.clone();
        match self.selection.stage_file(file) {
            Ok(ticket) => Task::perform(media::preview::render_preview(bytes), move |result| {
                Message::PreviewReady(ticket, result)
            }),
            Err(err) => {
                log::warn!("⚠️  Refused file: {err:?}");
                self.show_status(err.to_string(), StatusKind::Error)
            }
        }
    }

    /// Show a status message and schedule its removal
    fn show_status(&mut self, message: impl Into<String>, kind: StatusKind) -> Task<Message> {
        let ticket = self.status.show(message, kind);
        let timeout = self.config.status_timeout;
        Task::perform(
            async move { tokio::time::sleep(timeout).await },
            move |_| Message::StatusExpired(ticket),
        )
    }

    fn reload_gallery(&mut self) -> Task<Message> {
        let ticket = self.gallery.begin_reload();
        let gateway = self.gateway.clone();
        Task::perform(
            async move { gateway.list_images().await },
            move |result| Message::GalleryLoaded(ticket, result),
        )
    }

    fn reload_history(&mut self) -> Task<Message> {
        let ticket = self.history.begin_reload();
        self.fetch_history(ticket)
    }

    fn fetch_history(&self, ticket: Ticket) -> Task<Message> {
        let gateway = self.gateway.clone();
        Task::perform(
            async move { gateway.list_locations().await },
            move |result| Message::HistoryLoaded(ticket, result),
        )
    }

    fn mutate_location(&self, mutation: LocationMutation) -> Task<Message> {
        log::info!("📍 Sending location change: {mutation:?}");
        let gateway = self.gateway.clone();
        Task::perform(
            async move {
                let result = gateway.mutate_location(&mutation).await;
                (mutation, result)
            },
            |(mutation, result)| Message::LocationMutated(mutation, result),
        )
    }
}

/// Read a picked or dropped file in the background
fn load_file(path: PathBuf) -> Task<Message> {
    Task::perform(media::source::load_staged_file(path), Message::FileLoaded)
}

fn main() -> iced::Result {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = AppConfig::from_env();
    let clients = Gateway::new(&config.server_url, &config.user_agent).and_then(|gateway| {
        let geocoder = Geocoder::new(&config.geocoder_url, &config.user_agent)?;
        Ok((gateway, geocoder))
    });
    let (gateway, geocoder) = match clients {
        Ok(clients) => clients,
        Err(err) => {
            log::error!("❌ Failed to set up HTTP clients: {err}");
            std::process::exit(1);
        }
    };

    log::info!("🌍 GeoGallery starting against {}", config.server_url);

    iced::application("GeoGallery", GeoGallery::update, GeoGallery::view)
        .subscription(GeoGallery::subscription)
        .theme(GeoGallery::theme)
        .window_size((1280.0, 860.0))
        .centered()
        .run_with(move || GeoGallery::new(config, gateway, geocoder))
}
