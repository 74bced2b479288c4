//! curve_chart: interactive editing engine for dense temperature/humidity
//! time series.
//!
//! The crate does not draw. A host plotting surface implements
//! [`RenderSurface`], a host store implements [`DataContainer`], and
//! [`ChartView`] ties them together: level-of-detail reduction, wheel zoom and
//! pan, basic/drag/magic-pen editing, snapshot undo and cache persistence.

pub mod chart_view;
pub mod commit;
pub mod config;
pub mod container;
pub mod data_types;
pub mod decimation;
pub mod edit;
pub mod error;
pub mod history;
pub mod modes;
pub mod persistence;
pub mod stats;
pub mod surface;
pub mod utils;
pub mod view_controller;

pub use chart_view::{ChartView, ContextMenu, InputOutcome, KeyCommand, MenuAction, MenuEntry};
pub use commit::CommitOutcome;
pub use config::EditorConfig;
pub use container::{DataContainer, DeviceDataStore, DeviceRegistry};
pub use data_types::{
    Clipboard, Dataset, DatasetKey, DeviceDataMap, DeviceId, Metric, SelectionRange, TimeSeriesPoint,
    Viewport,
};
pub use decimation::reduce;
pub use error::{EditError, Notice, Severity};
pub use history::History;
pub use modes::{Mode, ModeKind};
pub use persistence::{CacheStats, CommitReport, DatasetCache, MemoryCache, PendingWrites, PersistenceBridge};
pub use stats::DatasetStats;
pub use surface::{ChartPoint, MouseButton, PointerEvent, RenderSurface, ScreenPoint, SeriesHit, WheelEvent};
pub use view_controller::ViewController;
