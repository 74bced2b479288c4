//! Render-surface capabilities the editor drives, and the raw input it receives.
//!
//! The editor does not draw. It asks the surface for geometry, coordinate
//! lookups and hit-tests, and pushes window changes back through
//! [`RenderSurface::set_extremes_silently`].

use std::time::Instant;

use crate::data_types::{DeviceId, Viewport};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Middle,
    Right,
}

impl MouseButton {
    /// Maps a DOM `MouseEvent.button` code.
    pub fn from_code(code: i16) -> Option<Self> {
        match code {
            0 => Some(MouseButton::Left),
            1 => Some(MouseButton::Middle),
            2 => Some(MouseButton::Right),
            _ => None,
        }
    }

    /// Buttons that pan the chart in every mode.
    pub fn pans(self) -> bool {
        matches!(self, MouseButton::Middle | MouseButton::Right)
    }
}

/// Pointer position in page coordinates, before normalization.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ScreenPoint {
    pub x: f64,
    pub y: f64,
}

impl ScreenPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Pointer position relative to the plot area, in pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ChartPoint {
    pub x: f64,
    pub y: f64,
}

impl ChartPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: ChartPoint) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerEvent {
    pub position: ScreenPoint,
    /// Button pressed or released; `None` for plain moves.
    pub button: Option<MouseButton>,
    pub at: Instant,
}

impl PointerEvent {
    pub fn new(position: ScreenPoint, button: Option<MouseButton>, at: Instant) -> Self {
        Self { position, button, at }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WheelEvent {
    pub position: ScreenPoint,
    /// Negative scrolls up (zoom in).
    pub delta_y: f64,
    pub at: Instant,
}

/// Closest series point found by a hit-test.
#[derive(Clone, Debug, PartialEq)]
pub struct SeriesHit {
    pub device_id: DeviceId,
    pub timestamp: i64,
    pub distance_px: f64,
}

/// How the host must wire native events while a mode is active.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InputPolicy {
    /// Native box-selection of the surface stays on.
    pub native_box_selection: bool,
    /// Pointer down/move/up are captured before the surface sees them.
    pub capture_pointer: bool,
    /// `selectstart` / `dragstart` defaults are prevented.
    pub suppress_native_drag: bool,
}

pub trait RenderSurface {
    /// Current axis extremes, `None` before the first layout.
    fn extremes(&self) -> Option<Viewport>;

    /// Width of the plot area in pixels.
    fn plot_width(&self) -> f64;

    /// Maps a page position into plot-local coordinates.
    fn normalize(&self, position: ScreenPoint) -> ChartPoint;

    /// Time value under a plot-local x coordinate.
    fn time_at(&self, chart_x: f64) -> i64;

    /// Metric value under a plot-local y coordinate.
    fn value_at(&self, chart_y: f64) -> f64;

    /// Nearest series point within `max_distance_px`.
    fn nearest_series(&self, at: ChartPoint, max_distance_px: f64) -> Option<SeriesHit>;

    /// Sets the extremes without emitting the surface's own extremes-changed
    /// notification (or marking the change as programmatic).
    fn set_extremes_silently(&mut self, viewport: Option<Viewport>);

    fn set_box_selection_enabled(&mut self, enabled: bool);
}
