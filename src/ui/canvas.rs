use iced::widget::canvas::{self, Frame, Path, Program, Stroke};
use iced::mouse::{self, Cursor};
use iced::{Color, Point, Rectangle, Renderer, Size, Theme};

use crate::ui::map::MapView;
use crate::Message;

/// Pointer travel (pixels) below which a press/release counts as a click
const DRAG_THRESHOLD: f32 = 4.0;
/// Graticule spacings in degrees, coarsest first
const GRID_STEPS: [f64; 9] = [30.0, 10.0, 5.0, 1.0, 0.5, 0.1, 0.05, 0.01, 0.005];
/// Minimum on-screen distance between graticule lines
const MIN_GRID_SPACING: f64 = 60.0;

const OCEAN: Color = Color { r: 0.11, g: 0.16, b: 0.22, a: 1.0 };
const WORLD: Color = Color { r: 0.16, g: 0.23, b: 0.30, a: 1.0 };
const GRID: Color = Color { r: 1.0, g: 1.0, b: 1.0, a: 0.15 };
const AXIS: Color = Color { r: 1.0, g: 1.0, b: 1.0, a: 0.4 };
const MARKER: Color = Color { r: 0.91, g: 0.30, b: 0.24, a: 1.0 };

/// Canvas program drawing a map viewport
///
/// On the pick map, wheel zooms, drag pans and a click picks a point.
/// The detail map is display-only.
pub struct MapCanvas<'a> {
    pub view: &'a MapView,
    pub interactive: bool,
}

impl<'a> Program<Message> for MapCanvas<'a> {
    type State = DragState;

    fn draw(
        &self,
        _state: &Self::State,
        renderer: &Renderer,
        _theme: &Theme,
        bounds: Rectangle,
        _cursor: Cursor,
    ) -> Vec<canvas::Geometry> {
        let geometry = self
            .view
            .cache()
            .draw(renderer, bounds.size(), |frame| draw_view(self.view, frame));

        vec![geometry]
    }

    fn update(
        &self,
        state: &mut Self::State,
        event: canvas::Event,
        bounds: Rectangle,
        cursor: Cursor,
    ) -> (canvas::event::Status, Option<Message>) {
        if !self.interactive {
            return (canvas::event::Status::Ignored, None);
        }

        match event {
            // Mouse wheel for zooming
            canvas::Event::Mouse(mouse::Event::WheelScrolled { delta }) => {
                if cursor.is_over(bounds) {
                    let zoom_delta = match delta {
                        mouse::ScrollDelta::Lines { y, .. } => y * 0.5,
                        mouse::ScrollDelta::Pixels { y, .. } => y * 0.01,
                    };
                    return (canvas::event::Status::Captured, Some(Message::MapZoomed(zoom_delta)));
                }
            }

            // Mouse button press - remember where it started
            canvas::Event::Mouse(mouse::Event::ButtonPressed(mouse::Button::Left)) => {
                if cursor.is_over(bounds) {
                    if let Some(pos) = cursor.position() {
                        state.pressed_at = Some(pos);
                        state.last_position = Some(pos);
                        state.is_dragging = false;
                        return (canvas::event::Status::Captured, None);
                    }
                }
            }

            // Mouse button release - a press that never moved is a pick
            canvas::Event::Mouse(mouse::Event::ButtonReleased(mouse::Button::Left)) => {
                let was_click = state.pressed_at.is_some() && !state.is_dragging;
                *state = DragState::default();

                if was_click {
                    if let Some(pos) = cursor.position_in(bounds) {
                        let (latitude, longitude) = self.view.unproject(pos, bounds.size());
                        return (
                            canvas::event::Status::Captured,
                            Some(Message::MapPicked { latitude, longitude }),
                        );
                    }
                }
            }

            // Mouse move - pan once the pointer has travelled far enough
            canvas::Event::Mouse(mouse::Event::CursorMoved { .. }) => {
                if let (Some(start), Some(last), Some(current)) =
                    (state.pressed_at, state.last_position, cursor.position())
                {
                    if !state.is_dragging && start.distance(current) < DRAG_THRESHOLD {
                        return (canvas::event::Status::Captured, None);
                    }
                    state.is_dragging = true;
                    state.last_position = Some(current);

                    let delta = cgmath::Vector2::new(current.x - last.x, current.y - last.y);
                    return (canvas::event::Status::Captured, Some(Message::MapPanned(delta)));
                }
            }

            _ => {}
        }

        (canvas::event::Status::Ignored, None)
    }

    fn mouse_interaction(&self, state: &Self::State, bounds: Rectangle, cursor: Cursor) -> mouse::Interaction {
        if state.is_dragging {
            mouse::Interaction::Grabbing
        } else if self.interactive && cursor.is_over(bounds) {
            mouse::Interaction::Crosshair
        } else {
            mouse::Interaction::default()
        }
    }
}

/// State for drag interactions
#[derive(Debug, Clone, Default)]
pub struct DragState {
    pub pressed_at: Option<Point>,
    pub last_position: Option<Point>,
    pub is_dragging: bool,
}

fn draw_view(view: &MapView, frame: &mut Frame) {
    let size = frame.size();
    frame.fill_rectangle(Point::ORIGIN, size, OCEAN);

    // Valid coordinate range
    let top_left = view.project(90.0, -180.0, size);
    let bottom_right = view.project(-90.0, 180.0, size);
    frame.fill_rectangle(
        top_left,
        Size::new(bottom_right.x - top_left.x, bottom_right.y - top_left.y),
        WORLD,
    );

    draw_graticule(view, frame, size);

    if let Some((latitude, longitude)) = view.marker() {
        let center = view.project(latitude, longitude, size);
        let pin = Path::circle(center, 6.0);
        frame.fill(&pin, MARKER);
        frame.stroke(&pin, Stroke::default().with_color(Color::WHITE).with_width(2.0));
    }
}

fn draw_graticule(view: &MapView, frame: &mut Frame, size: Size) {
    let dpp = view.degrees_per_pixel();
    let step = GRID_STEPS
        .iter()
        .copied()
        .rev()
        .find(|step| step / dpp >= MIN_GRID_SPACING)
        .unwrap_or(GRID_STEPS[0]);

    let (north, west) = view.unproject(Point::ORIGIN, size);
    let (south, east) = view.unproject(Point::new(size.width, size.height), size);

    // Meridians; a view wrapping the antimeridian just draws what fits
    let (west, east) = if west <= east { (west, east) } else { (-180.0, 180.0) };
    let mut longitude = (west / step).floor() * step;
    while longitude <= east {
        let x = view.project(0.0, longitude, size).x;
        let color = if longitude.abs() < step / 2.0 { AXIS } else { GRID };
        frame.stroke(
            &Path::line(Point::new(x, 0.0), Point::new(x, size.height)),
            Stroke::default().with_color(color).with_width(1.0),
        );
        longitude += step;
    }

    let mut latitude = (south / step).floor() * step;
    while latitude <= north {
        let y = view.project(latitude, 0.0, size).y;
        let color = if latitude.abs() < step / 2.0 { AXIS } else { GRID };
        frame.stroke(
            &Path::line(Point::new(0.0, y), Point::new(size.width, y)),
            Stroke::default().with_color(color).with_width(1.0),
        );
        latitude += step;
    }
}
