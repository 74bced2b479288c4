//! The container owns the per-device datasets; the editor only reads them and
//! hands back replacements.

use std::collections::BTreeSet;

use crate::data_types::{Dataset, DeviceDataMap, DeviceId, Viewport};

/// Read-only list of devices known to the task.
pub trait DeviceRegistry {
    fn known_devices(&self) -> Vec<DeviceId>;

    fn is_known(&self, device_id: &str) -> bool {
        self.known_devices().iter().any(|d| d == device_id)
    }
}

/// Owner of the shared [`DeviceDataMap`].
pub trait DataContainer: DeviceRegistry {
    fn data(&self) -> &DeviceDataMap;

    /// Devices whose curves are currently drawn.
    fn rendered_devices(&self) -> Vec<DeviceId> {
        self.data().keys().cloned().collect()
    }

    /// Replaces one device's dataset and schedules a re-render.
    /// Called several times in a row for multi-device operations.
    fn apply_update(&mut self, device_id: &DeviceId, dataset: Dataset);

    /// Time extent of the rendered devices.
    fn data_bounds(&self) -> Option<Viewport> {
        let data = self.data();
        self.rendered_devices()
            .iter()
            .filter_map(|id| data.get(id))
            .filter_map(|ds| Some(Viewport::new(ds.first_timestamp()?, ds.last_timestamp()?)))
            .reduce(|a, b| a.union(b))
    }
}

/// In-memory container: a device map, a device registry and a hidden set.
///
/// A dataset replaced by an empty one is removed from the map.
#[derive(Clone, Debug, Default)]
pub struct DeviceDataStore {
    data: DeviceDataMap,
    devices: Vec<DeviceId>,
    hidden: BTreeSet<DeviceId>,
    revision: u64,
}

impl DeviceDataStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a device and its data. Points are sorted on the way in.
    pub fn insert(&mut self, device_id: impl Into<DeviceId>, dataset: impl Into<Dataset>) {
        let device_id = device_id.into();
        self.register(device_id.clone());
        let dataset = dataset.into();
        if dataset.is_empty() {
            self.data.remove(&device_id);
        } else {
            self.data.insert(device_id, dataset);
        }
        self.revision += 1;
    }

    /// Registers a device without data.
    pub fn register(&mut self, device_id: impl Into<DeviceId>) {
        let device_id = device_id.into();
        if !self.devices.contains(&device_id) {
            self.devices.push(device_id);
        }
    }

    pub fn set_hidden(&mut self, device_id: &str, hidden: bool) {
        if hidden {
            self.hidden.insert(device_id.to_string());
        } else {
            self.hidden.remove(device_id);
        }
        self.revision += 1;
    }

    pub fn dataset(&self, device_id: &str) -> Option<&Dataset> {
        self.data.get(device_id)
    }

    /// Bumped on every change; hosts compare it to decide when to re-render.
    pub fn revision(&self) -> u64 {
        self.revision
    }
}

impl DeviceRegistry for DeviceDataStore {
    fn known_devices(&self) -> Vec<DeviceId> {
        self.devices.clone()
    }
}

impl DataContainer for DeviceDataStore {
    fn data(&self) -> &DeviceDataMap {
        &self.data
    }

    fn rendered_devices(&self) -> Vec<DeviceId> {
        self.data
            .keys()
            .filter(|id| !self.hidden.contains(*id))
            .cloned()
            .collect()
    }

    fn apply_update(&mut self, device_id: &DeviceId, dataset: Dataset) {
        self.register(device_id.clone());
        if dataset.is_empty() {
            self.data.remove(device_id);
        } else {
            self.data.insert(device_id.clone(), dataset);
        }
        self.revision += 1;
    }
}
