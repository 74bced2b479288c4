//! Shared fixtures: a scripted render surface, series builders and caches.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Instant;

use futures::future::{BoxFuture, FutureExt};

use curve_chart::persistence::{CacheStats, DatasetCache, MemoryCache};
use curve_chart::{
    ChartPoint, ChartView, Dataset, DatasetKey, DeviceDataStore, EditorConfig, MouseButton,
    PersistenceBridge, PointerEvent, RenderSurface, ScreenPoint, SeriesHit, TimeSeriesPoint,
    ViewController, Viewport, WheelEvent,
};

/// 2024-01-01T00:00:00Z
pub const BASE: i64 = 1_704_067_200_000;
pub const SECOND: i64 = 1_000;
pub const MINUTE: i64 = 60 * SECOND;
pub const HOUR: i64 = 60 * MINUTE;

pub fn at(h: i64, m: i64, s: i64) -> i64 {
    BASE + h * HOUR + m * MINUTE + s * SECOND
}

pub fn point(device: &str, timestamp: i64, temperature: f64, humidity: f64) -> TimeSeriesPoint {
    TimeSeriesPoint::new(device, timestamp, temperature, humidity)
}

/// `count` points spaced `step` ms apart, readings from `f(index)`.
pub fn series(
    device: &str,
    start: i64,
    step: i64,
    count: usize,
    f: impl Fn(usize) -> (f64, f64),
) -> Vec<TimeSeriesPoint> {
    (0..count)
        .map(|i| {
            let (t, h) = f(i);
            point(device, start + i as i64 * step, t, h)
        })
        .collect()
}

pub fn store(devices: Vec<(&str, Vec<TimeSeriesPoint>)>) -> DeviceDataStore {
    let mut store = DeviceDataStore::new();
    for (device, points) in devices {
        store.insert(device, Dataset::from_points(points));
    }
    store
}

pub fn view() -> ChartView {
    ChartView::new(EditorConfig::default(), PersistenceBridge::in_memory("task-1"))
}

/// Plot area of 1000 x 500 px at page offset (10, 20). The y axis spans 0..100.
pub struct FakeSurface {
    pub extremes: Option<Viewport>,
    pub full_extent: Viewport,
    pub width: f64,
    pub height: f64,
    pub offset: ScreenPoint,
    pub value_range: (f64, f64),
    pub next_hit: Option<SeriesHit>,
    pub silent_sets: Vec<Option<Viewport>>,
    pub box_selection: bool,
}

impl FakeSurface {
    pub fn new(full_extent: Viewport) -> Self {
        Self {
            extremes: Some(full_extent),
            full_extent,
            width: 1000.0,
            height: 500.0,
            offset: ScreenPoint::new(10.0, 20.0),
            value_range: (0.0, 100.0),
            next_hit: None,
            silent_sets: Vec::new(),
            box_selection: true,
        }
    }

    pub fn hit(&mut self, device: &str, timestamp: i64, distance_px: f64) {
        self.next_hit = Some(SeriesHit {
            device_id: device.to_string(),
            timestamp,
            distance_px,
        });
    }

    fn window(&self) -> Viewport {
        self.extremes.unwrap_or(self.full_extent)
    }

    /// Page x of a time value under the current extremes.
    pub fn page_x(&self, timestamp: i64) -> f64 {
        let w = self.window();
        self.offset.x + ViewController::map_value_to_pixels(timestamp as f64, self.width, w.min as f64, w.max as f64, false)
    }

    /// Page y of a metric value.
    pub fn page_y(&self, value: f64) -> f64 {
        let (lo, hi) = self.value_range;
        self.offset.y + ViewController::map_value_to_pixels(value, self.height, lo, hi, true)
    }
}

impl RenderSurface for FakeSurface {
    fn extremes(&self) -> Option<Viewport> {
        self.extremes
    }

    fn plot_width(&self) -> f64 {
        self.width
    }

    fn normalize(&self, position: ScreenPoint) -> ChartPoint {
        ChartPoint::new(position.x - self.offset.x, position.y - self.offset.y)
    }

    fn time_at(&self, chart_x: f64) -> i64 {
        let w = self.window();
        ViewController::map_pixels_to_value(chart_x, self.width, w.min as f64, w.max as f64, false).round() as i64
    }

    fn value_at(&self, chart_y: f64) -> f64 {
        let (lo, hi) = self.value_range;
        ViewController::map_pixels_to_value(chart_y, self.height, lo, hi, true)
    }

    fn nearest_series(&self, _at: ChartPoint, max_distance_px: f64) -> Option<SeriesHit> {
        self.next_hit
            .clone()
            .filter(|hit| hit.distance_px <= max_distance_px)
    }

    fn set_extremes_silently(&mut self, viewport: Option<Viewport>) {
        self.extremes = viewport;
        self.silent_sets.push(viewport);
    }

    fn set_box_selection_enabled(&mut self, enabled: bool) {
        self.box_selection = enabled;
    }
}

pub fn down(x: f64, y: f64, button: MouseButton, at: Instant) -> PointerEvent {
    PointerEvent::new(ScreenPoint::new(x, y), Some(button), at)
}

pub fn moved(x: f64, y: f64, at: Instant) -> PointerEvent {
    PointerEvent::new(ScreenPoint::new(x, y), None, at)
}

pub fn wheel(x: f64, y: f64, delta_y: f64) -> WheelEvent {
    WheelEvent {
        position: ScreenPoint::new(x, y),
        delta_y,
        at: Instant::now(),
    }
}

/// Cache whose writes fail for one device.
pub struct FailingCache {
    pub inner: MemoryCache,
    pub failing_device: String,
}

impl FailingCache {
    pub fn new(failing_device: &str) -> Arc<Self> {
        Arc::new(Self {
            inner: MemoryCache::new(),
            failing_device: failing_device.to_string(),
        })
    }
}

impl DatasetCache for FailingCache {
    fn save(&self, key: DatasetKey, dataset: Dataset) -> BoxFuture<'static, eyre::Result<()>> {
        if key.device_id == self.failing_device {
            let device = key.device_id.clone();
            return async move { Err(eyre::eyre!("quota exceeded writing {device}")) }.boxed();
        }
        self.inner.save(key, dataset)
    }

    fn load(&self, key: DatasetKey) -> BoxFuture<'static, eyre::Result<Option<Dataset>>> {
        self.inner.load(key)
    }

    fn stats(&self) -> CacheStats {
        self.inner.stats()
    }
}
