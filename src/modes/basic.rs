//! Basic mode: minute-aligned selection, copy/paste with time shift, averaging.
//!
//! Planning functions here never touch the container. They read the current
//! map and return the replacement datasets; committing them is the caller's job.

use std::collections::BTreeMap;

use crate::data_types::{
    Clipboard, CopiedSeries, Dataset, DeviceDataMap, DeviceId, Metric, SelectionRange,
    TimeSeriesPoint,
};
use crate::edit::{overwrite_range, paste_onto};
use crate::error::{EditError, Notice};
use crate::utils::date_formatter::format_range;
use crate::utils::round_to;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct BasicState {
    pub selection: Option<SelectionRange>,
    pub clipboard: Option<Clipboard>,
}

/// Result of the read-only average.
#[derive(Clone, Debug, PartialEq)]
pub struct AverageReport {
    pub range: SelectionRange,
    pub device_filter: Option<DeviceId>,
    pub count: usize,
    pub temperature: Option<f64>,
    pub humidity: Option<f64>,
    pub notice: Notice,
}

#[derive(Default)]
struct Accumulator {
    temperature_sum: f64,
    temperature_count: usize,
    humidity_sum: f64,
    humidity_count: usize,
}

impl Accumulator {
    fn add(&mut self, p: &TimeSeriesPoint) {
        if p.temperature.is_finite() {
            self.temperature_sum += p.temperature;
            self.temperature_count += 1;
        }
        if p.humidity.is_finite() {
            self.humidity_sum += p.humidity;
            self.humidity_count += 1;
        }
    }

    fn count(&self, metric: Metric) -> usize {
        match metric {
            Metric::Temperature => self.temperature_count,
            Metric::Humidity => self.humidity_count,
        }
    }

    fn temperature(&self) -> Option<f64> {
        (self.temperature_count > 0).then(|| self.temperature_sum / self.temperature_count as f64)
    }

    fn humidity(&self) -> Option<f64> {
        (self.humidity_count > 0).then(|| self.humidity_sum / self.humidity_count as f64)
    }
}

impl BasicState {
    /// Stores the minute-snapped selection for a raw box-select.
    pub fn select(&mut self, raw_min: i64, raw_max: i64) -> Option<SelectionRange> {
        self.selection = SelectionRange::from_raw(raw_min, raw_max);
        self.selection
    }

    pub fn clear_selection(&mut self) {
        self.selection = None;
    }

    pub fn remove_clipboard(&mut self) {
        self.clipboard = None;
    }

    /// Copies the selected points of every rendered device, or of `device_filter` only.
    /// Clears the selection on success.
    pub fn copy(
        &mut self,
        data: &DeviceDataMap,
        rendered: &[DeviceId],
        device_filter: Option<&str>,
    ) -> Result<Notice, EditError> {
        let range = self.selection.ok_or(EditError::NoSelection)?;
        let series = gather(data, rendered, range, device_filter);
        if series.is_empty() {
            return Err(EditError::EmptySelection);
        }

        let clipboard = Clipboard {
            series,
            single_device_id: device_filter.map(str::to_string),
        };
        let notice = Notice::success(format!(
            "Copied {} points from {} device(s)",
            clipboard.point_count(),
            clipboard.series.len()
        ));
        self.clipboard = Some(clipboard);
        self.selection = None;
        Ok(notice)
    }

    /// Builds the datasets that result from pasting the clipboard at `target_timestamp`.
    ///
    /// A single-device copy goes onto `target_device` (required). A multi-device
    /// copy must be dropped on a blank area and goes back onto each recorded
    /// device that is still rendered; the others are skipped.
    pub fn plan_paste(
        &self,
        data: &DeviceDataMap,
        rendered: &[DeviceId],
        target_device: Option<&str>,
        target_timestamp: i64,
    ) -> Result<Vec<(DeviceId, Dataset)>, EditError> {
        let clipboard = self
            .clipboard
            .as_ref()
            .filter(|c| !c.is_empty())
            .ok_or(EditError::EmptyClipboard)?;
        let anchor = clipboard.anchor().ok_or(EditError::EmptyClipboard)?;
        let offset = target_timestamp - anchor.timestamp;

        if clipboard.single_device_id.is_some() {
            let target: DeviceId = target_device.ok_or(EditError::TargetRequired)?.to_string();
            let copied = clipboard
                .series
                .iter()
                .find(|s| !s.points.is_empty())
                .ok_or(EditError::EmptyClipboard)?;
            let existing = data.get(&target).cloned().unwrap_or_default();
            let pasted = paste_onto(&existing, &target, &copied.points, offset, target_timestamp);
            return Ok(vec![(target, pasted)]);
        }

        if target_device.is_some() {
            return Err(EditError::TargetMustBeBlank);
        }

        let updates = clipboard
            .series
            .iter()
            .filter(|s| !s.points.is_empty() && rendered.contains(&s.device_id))
            .map(|s| {
                let existing = data.get(&s.device_id).cloned().unwrap_or_default();
                let pasted = paste_onto(&existing, &s.device_id, &s.points, offset, target_timestamp);
                (s.device_id.clone(), pasted)
            })
            .collect();
        Ok(updates)
    }

    /// Mean temperature and humidity over the selection, each over its finite values.
    pub fn compute_average(
        &self,
        data: &DeviceDataMap,
        rendered: &[DeviceId],
        device_filter: Option<&str>,
        decimals: u32,
    ) -> Result<AverageReport, EditError> {
        let range = self.selection.ok_or(EditError::NoSelection)?;
        let series = gather(data, rendered, range, device_filter);
        if series.is_empty() {
            return Err(EditError::EmptySelection);
        }

        let mut acc = Accumulator::default();
        let mut count = 0;
        for p in series.iter().flat_map(|s| s.points.iter()) {
            acc.add(p);
            count += 1;
        }

        let temperature = acc.temperature().map(|v| round_to(v, decimals));
        let humidity = acc.humidity().map(|v| round_to(v, decimals));
        let fmt = |v: Option<f64>, metric: Metric| match v {
            Some(v) => format!("{v:.prec$} {}", metric.unit(), prec = decimals as usize),
            None => "n/a".to_string(),
        };
        let scope = device_filter.map(|d| format!(" of {d}")).unwrap_or_default();
        let notice = Notice::info(format!(
            "Average{scope} over {} ({count} points): temperature {}, humidity {}",
            format_range(range.start, range.end),
            fmt(temperature, Metric::Temperature),
            fmt(humidity, Metric::Humidity),
        ));

        Ok(AverageReport {
            range,
            device_filter: device_filter.map(str::to_string),
            count,
            temperature,
            humidity,
            notice,
        })
    }

    /// Averages every rendered device per `bucket_ms` window of the selection and
    /// writes one point per window onto `target`, replacing its selected points.
    pub fn plan_average_copy(
        &self,
        data: &DeviceDataMap,
        rendered: &[DeviceId],
        known_devices: &[DeviceId],
        target: &str,
        metric: Metric,
        bucket_ms: i64,
    ) -> Result<(DeviceId, Dataset), EditError> {
        let range = self.selection.ok_or(EditError::NoSelection)?;
        if !known_devices.iter().any(|d| d == target) {
            return Err(EditError::UnknownDevice(target.to_string()));
        }

        let bucket_ms = bucket_ms.max(1);
        let mut buckets: BTreeMap<i64, Accumulator> = BTreeMap::new();
        let mut matched = 0usize;
        for series in gather(data, rendered, range, None) {
            for p in &series.points {
                let key = p.timestamp.div_euclid(bucket_ms) * bucket_ms;
                buckets.entry(key).or_default().add(p);
                matched += 1;
            }
        }
        if matched < 2 {
            return Err(EditError::InsufficientData);
        }

        let target: DeviceId = target.to_string();
        let averaged: Vec<TimeSeriesPoint> = buckets
            .iter()
            .filter(|(_, acc)| acc.count(metric) > 0)
            .map(|(&key, acc)| {
                TimeSeriesPoint::new(
                    target.clone(),
                    key,
                    acc.temperature().unwrap_or(0.0),
                    acc.humidity().unwrap_or(0.0),
                )
            })
            .collect();
        if averaged.is_empty() {
            return Err(EditError::NoValidBuckets);
        }

        let existing = data.get(&target).cloned().unwrap_or_default();
        let merged = overwrite_range(&existing, range.start, range.end, averaged);
        Ok((target, merged))
    }
}

/// Points inside `range`, grouped per device in render order. Devices with
/// nothing in range are left out.
fn gather(
    data: &DeviceDataMap,
    rendered: &[DeviceId],
    range: SelectionRange,
    device_filter: Option<&str>,
) -> Vec<CopiedSeries> {
    let devices: Vec<&str> = match device_filter {
        Some(d) => vec![d],
        None => rendered.iter().map(String::as_str).collect(),
    };

    devices
        .into_iter()
        .filter_map(|device_id| {
            let points = data.get(device_id)?.range(range.start, range.end).to_vec();
            (!points.is_empty()).then(|| CopiedSeries {
                device_id: device_id.to_string(),
                points,
            })
        })
        .collect()
}
