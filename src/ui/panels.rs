/// Widget trees for each panel of the main window
///
/// Every function here is a pure projection of state into widgets; all
/// interaction comes back as `Message`s.

use iced::widget::image::Handle;
use iced::widget::{
    button, column, container, horizontal_space, row, scrollable, text, text_input, Canvas, Column,
    Image,
};
use iced::{Alignment, Color, ContentFit, Element, Length};
use iced_aw::Wrap;

use crate::state::display::format_coordinates;
use crate::state::gallery::{Gallery, GalleryView, ImageDetail};
use crate::state::history::{History, HistoryView};
use crate::state::selection::Selection;
use crate::state::status::{StatusKind, StatusLine};
use crate::ui::canvas::MapCanvas;
use crate::ui::map::MapView;
use crate::Message;

const TILE_SIZE: f32 = 160.0;
const MUTED: Color = Color { r: 0.6, g: 0.6, b: 0.6, a: 1.0 };
const SUCCESS: Color = Color { r: 0.35, g: 0.8, b: 0.45, a: 1.0 };
const ERROR: Color = Color { r: 0.95, g: 0.4, b: 0.35, a: 1.0 };
const FAVORITE: Color = Color { r: 0.98, g: 0.78, b: 0.25, a: 1.0 };

pub fn search_bar(query: &str) -> Element<'_, Message> {
    row![
        text_input("Search for a place...", query)
            .on_input(Message::SearchChanged)
            .on_submit(Message::SearchSubmitted)
            .padding(8),
        button("Search").on_press(Message::SearchSubmitted).padding(8),
    ]
    .spacing(8)
    .into()
}

/// The pick map: click to select, drag to pan, scroll to zoom
pub fn pick_map(map: &MapView) -> Element<'_, Message> {
    Canvas::new(MapCanvas {
        view: map,
        interactive: true,
    })
    .width(Length::Fill)
    .height(Length::Fixed(360.0))
    .into()
}

/// Selected point plus the save-to-history actions
pub fn selection_summary(selection: &Selection) -> Element<'_, Message> {
    let (name, coordinates) = match selection.point() {
        Some(point) => (
            point.label.as_str(),
            format_coordinates(point.latitude, point.longitude),
        ),
        None => ("None", "--, --".to_string()),
    };
    let has_point = selection.point().is_some();

    column![
        text("Selected location").size(18),
        text(name),
        text(coordinates).color(MUTED),
        row![
            button("Save location")
                .on_press_maybe(has_point.then_some(Message::SaveLocation { favorite: false })),
            button("Save as favorite")
                .on_press_maybe(has_point.then_some(Message::SaveLocation { favorite: true })),
        ]
        .spacing(8),
    ]
    .spacing(6)
    .into()
}

/// File chooser / preview and the upload button
pub fn upload_panel(selection: &Selection) -> Element<'_, Message> {
    let staged: Element<'_, Message> = match selection.staged_file() {
        Some(file) => {
            let preview: Element<'_, Message> = match selection.preview() {
                Some(handle) => Image::new(handle.clone())
                    .width(Length::Fixed(TILE_SIZE))
                    .height(Length::Fixed(TILE_SIZE))
                    .content_fit(ContentFit::Contain)
                    .into(),
                None => text("Rendering preview...").color(MUTED).into(),
            };

            row![
                preview,
                column![
                    text(&file.filename),
                    text(&file.mime).color(MUTED),
                    button("Remove").on_press(Message::ClearFile),
                ]
                .spacing(6),
            ]
            .spacing(12)
            .align_y(Alignment::Center)
            .into()
        }
        None => column![
            button("Choose image...").on_press(Message::PickFile).padding(10),
            text("or drop a file onto the window").color(MUTED),
        ]
        .spacing(6)
        .into(),
    };

    let upload_label = if selection.is_uploading() {
        "Uploading..."
    } else {
        "Upload"
    };

    column![
        text("Photo").size(18),
        staged,
        button(upload_label)
            .on_press_maybe(selection.upload_enabled().then_some(Message::Upload))
            .padding(10),
    ]
    .spacing(8)
    .into()
}

pub fn status_line(status: &StatusLine) -> Element<'_, Message> {
    match status.current() {
        Some((message, kind)) => {
            let color = match kind {
                StatusKind::Info => MUTED,
                StatusKind::Success => SUCCESS,
                StatusKind::Error => ERROR,
            };
            text(message).color(color).into()
        }
        None => text("").into(),
    }
}

/// Title row with a refresh button that shows when a reload is running
fn panel_header(title: &str, refresh: Message, reloading: bool) -> Element<'_, Message> {
    let label = if reloading { "Refreshing..." } else { "Refresh" };
    row![
        text(title).size(20),
        horizontal_space(),
        button(label).on_press(refresh),
    ]
    .align_y(Alignment::Center)
    .into()
}

fn placeholder<'a>(message: String) -> Element<'a, Message> {
    container(text(message).color(MUTED))
        .padding(20)
        .width(Length::Fill)
        .center_x(Length::Fill)
        .into()
}

/// Grid of uploaded images
pub fn gallery_panel(gallery: &Gallery) -> Element<'_, Message> {
    let body: Element<'_, Message> = match gallery.render() {
        GalleryView::Loading => placeholder("Loading images...".to_string()),
        GalleryView::Empty => placeholder("No images yet. Upload some!".to_string()),
        GalleryView::Failed(reason) => placeholder(format!("Error loading images: {reason}")),
        GalleryView::Tiles(tiles) => {
            let cells: Vec<Element<'_, Message>> = tiles
                .into_iter()
                .map(|tile| {
                    let picture: Element<'_, Message> = match gallery.thumbnail(tile.id) {
                        Some(handle) => Image::new(handle.clone())
                            .width(Length::Fixed(TILE_SIZE))
                            .height(Length::Fixed(TILE_SIZE))
                            .content_fit(ContentFit::Cover)
                            .into(),
                        None => container(text(tile.filename).color(MUTED))
                            .width(Length::Fixed(TILE_SIZE))
                            .height(Length::Fixed(TILE_SIZE))
                            .center_x(Length::Fixed(TILE_SIZE))
                            .center_y(Length::Fixed(TILE_SIZE))
                            .into(),
                    };

                    button(column![picture, text(tile.label).size(12)].spacing(4))
                        .on_press(Message::OpenImage(tile.id))
                        .padding(4)
                        .into()
                })
                .collect();

            scrollable(Wrap::with_elements(cells).spacing(10.0).line_spacing(10.0))
                .height(Length::Fill)
                .into()
        }
    };

    column![panel_header("Gallery", Message::ReloadGallery, gallery.is_reloading()), body]
        .spacing(10)
        .height(Length::FillPortion(3))
        .into()
}

/// The ten most relevant locations with their actions
pub fn history_panel<'a>(history: &'a History) -> Element<'a, Message> {
    let body: Element<'a, Message> = match history.render() {
        HistoryView::Loading => placeholder("Loading history...".to_string()),
        HistoryView::Empty => placeholder("No saved locations yet.".to_string()),
        HistoryView::Failed(reason) => placeholder(format!("Error loading history: {reason}")),
        HistoryView::Entries(entries) => {
            let rows = entries.into_iter().map(|entry| -> Element<'a, Message> {
                let star = if entry.is_favorite { "★" } else { "☆" };
                let details = format!("Last used {} · used {}×", entry.last_used, entry.use_count);

                row![
                    button(text(star).color(FAVORITE)).on_press(Message::ToggleFavorite(entry.id)),
                    column![text(entry.label), text(details).size(12).color(MUTED)].spacing(2),
                    horizontal_space(),
                    button("Use").on_press(Message::ReuseLocation(entry.id)),
                    button("Delete").on_press(Message::DeleteLocation(entry.id)),
                ]
                .spacing(8)
                .align_y(Alignment::Center)
                .into()
            });

            scrollable(Column::with_children(rows).spacing(6))
                .height(Length::Fill)
                .into()
        }
    };

    column![panel_header("Location history", Message::ReloadHistory, history.is_reloading()), body]
        .spacing(10)
        .height(Length::FillPortion(2))
        .into()
}

/// Full view of one gallery image with its map
pub fn detail_panel<'a>(
    detail: &'a ImageDetail,
    image: Option<&'a Handle>,
    map: Option<&'a MapView>,
) -> Element<'a, Message> {
    let record = &detail.record;

    let picture: Element<'a, Message> = match image {
        Some(handle) => Image::new(handle.clone())
            .width(Length::Fill)
            .height(Length::Fixed(320.0))
            .content_fit(ContentFit::Contain)
            .into(),
        None => placeholder("Image data unavailable".to_string()),
    };

    let map: Element<'a, Message> = match map {
        Some(view) => Canvas::new(MapCanvas {
            view,
            interactive: false,
        })
        .width(Length::Fill)
        .height(Length::Fixed(220.0))
        .into(),
        None => placeholder("Map unavailable".to_string()),
    };

    column![
        row![
            text(&record.filename).size(20),
            horizontal_space(),
            button("Close").on_press(Message::CloseImage),
        ]
        .align_y(Alignment::Center),
        picture,
        text(&record.location_name),
        text(format_coordinates(record.latitude, record.longitude)).color(MUTED),
        text(&detail.taken_at).color(MUTED),
        map,
    ]
    .spacing(8)
    .height(Length::FillPortion(3))
    .into()
}
