use crate::data_types::Viewport;

/// ViewController holds the arithmetic of viewport interactions (zoom, pan,
/// extremes correction) independently of any render surface to facilitate testing.
pub struct ViewController;

impl ViewController {
    /// Wheel zoom anchored at `anchor` (a time value).
    ///
    /// `zoom_in` shrinks the width by `step`, otherwise it grows by `step`.
    /// The new width is clamped to `[min_width, data span]`, centered on the
    /// anchor and shifted back inside `data`.
    pub fn zoom_at(
        current: Viewport,
        anchor: f64,
        zoom_in: bool,
        step: f64,
        min_width: i64,
        data: Viewport,
    ) -> Viewport {
        let factor = if zoom_in { 1.0 - step } else { 1.0 + step };
        let max_width = data.span().max(1) as f64;
        let min_width = (min_width as f64).min(max_width);
        let width = (current.span() as f64 * factor).clamp(min_width, max_width);

        let min = anchor - width / 2.0;
        Self::clamp_width_preserving(min, min + width, data)
    }

    /// Pan by a pixel delta. Dragging right moves the window back in time.
    ///
    /// When an edge hits the data boundary, the delta is reduced for both edges
    /// so the width never changes.
    pub fn pan(start: Viewport, delta_pixels: f64, plot_width: f64, data: Viewport) -> Viewport {
        if plot_width <= 0.0 {
            return start;
        }
        if start.span() >= data.span() {
            return data;
        }
        let mut delta = -(delta_pixels / plot_width) * start.span() as f64;

        if start.min as f64 + delta < data.min as f64 {
            delta = (data.min - start.min) as f64;
        }
        if start.max as f64 + delta > data.max as f64 {
            delta = (data.max - start.max) as f64;
        }

        let delta = delta.round() as i64;
        Viewport::new(start.min + delta, start.max + delta)
    }

    /// Keeps the width of `[min, max]` and moves it inside `data`.
    /// Wider than `data` collapses to `data`.
    pub fn clamp_width_preserving(min: f64, max: f64, data: Viewport) -> Viewport {
        let width = max - min;
        if width >= data.span() as f64 {
            return data;
        }
        let (mut min, mut max) = (min, max);
        if min < data.min as f64 {
            min = data.min as f64;
            max = min + width;
        } else if max > data.max as f64 {
            max = data.max as f64;
            min = max - width;
        }
        Viewport::new(min.round() as i64, max.round() as i64).shift_into(data)
    }

    /// Corrects extremes reported by the render surface: each edge is clamped
    /// into `data`; a result narrower than `min_width` is re-centered at
    /// `min_width` and clamped again.
    pub fn reconcile(reported: Viewport, data: Viewport, min_width: i64) -> Viewport {
        let clamped = reported.clamp_edges(data);
        if clamped.span() >= min_width {
            return clamped;
        }
        if data.span() <= min_width {
            return data;
        }
        let half = min_width as f64 / 2.0;
        let center = clamped.center();
        Self::clamp_width_preserving(center - half, center + half, data)
    }

    /// Maps a pixel position to a value in a given domain.
    pub fn map_pixels_to_value(
        pixels: f64,
        total_pixels: f64,
        min_val: f64,
        max_val: f64,
        invert: bool,
    ) -> f64 {
        if total_pixels <= 0.0 {
            return min_val;
        }
        let pct = (pixels / total_pixels).clamp(0.0, 1.0);
        let effective_pct = if invert { 1.0 - pct } else { pct };
        min_val + (max_val - min_val) * effective_pct
    }

    /// Inverse of [`ViewController::map_pixels_to_value`].
    pub fn map_value_to_pixels(
        value: f64,
        total_pixels: f64,
        min_val: f64,
        max_val: f64,
        invert: bool,
    ) -> f64 {
        let span = max_val - min_val;
        if span.abs() < f64::EPSILON {
            return 0.0;
        }
        let pct = (value - min_val) / span;
        let effective_pct = if invert { 1.0 - pct } else { pct };
        effective_pct * total_pixels
    }
}
