use super::ChartView;
use crate::container::DataContainer;
use crate::data_types::Viewport;
use crate::surface::RenderSurface;
use crate::view_controller::ViewController;

/// Re-entrancy guard for programmatic extremes changes.
///
/// Engaged with the extremes we just pushed to the surface. The next report
/// disengages it; if it carries exactly those extremes it is our own echo and
/// is dropped.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ExtremesGuard {
    engaged: bool,
    expected: Option<Viewport>,
}

impl ExtremesGuard {
    pub fn engage(&mut self, expected: Option<Viewport>) {
        self.engaged = true;
        self.expected = expected;
    }

    /// Returns true if `reported` is the echo of the last programmatic change.
    pub fn swallow(&mut self, reported: Option<Viewport>) -> bool {
        if !self.engaged {
            return false;
        }
        self.engaged = false;
        self.expected.take() == reported
    }

    pub fn is_engaged(&self) -> bool {
        self.engaged
    }
}

impl ChartView {
    /// Extremes reported by the surface after its own pan/zoom or the navigator.
    ///
    /// Out-of-bounds or too-narrow windows are corrected with a single silent
    /// set-extremes call. Returns the window now in effect, `None` for the
    /// full extent or for a dropped echo.
    pub fn on_extremes_changed<C: DataContainer + ?Sized>(
        &mut self,
        reported: Option<Viewport>,
        container: &C,
        surface: &mut dyn RenderSurface,
    ) -> Option<Viewport> {
        if self.guard.swallow(reported) {
            tracing::debug!(?reported, "extremes echo ignored");
            return None;
        }
        let Some(reported) = reported else {
            self.viewport = None;
            return None;
        };
        let Some(bounds) = container.data_bounds() else {
            self.viewport = Some(reported);
            return Some(reported);
        };

        let corrected = ViewController::reconcile(reported, bounds, self.config.lod.min_bucket_ms);
        if corrected != reported {
            tracing::debug!(?reported, ?corrected, "extremes corrected");
            self.guard.engage(Some(corrected));
            surface.set_extremes_silently(Some(corrected));
        }
        self.viewport = Some(corrected);
        Some(corrected)
    }

    pub fn extremes_guard(&self) -> &ExtremesGuard {
        &self.guard
    }
}
