//! Commit pipeline shared by every mutating operation and by undo/redo.

use crate::container::DataContainer;
use crate::data_types::{Dataset, DeviceDataMap, DeviceId, Metric};
use crate::error::Notice;
use crate::history::History;
use crate::persistence::{PendingWrites, PersistenceBridge};
use crate::stats::DatasetStats;

/// Result of a committed mutation. The in-memory map is already updated;
/// `persistence` resolves once the cache writes settled.
#[derive(Debug)]
pub struct CommitOutcome {
    pub notice: Notice,
    pub changed: Vec<DeviceId>,
    pub stats: Vec<DatasetStats>,
    pub persistence: PendingWrites,
}

/// Snapshots the pre-mutation map, then applies and persists `updates`.
/// An empty update set changes nothing and records no snapshot.
pub(crate) fn commit<C: DataContainer + ?Sized>(
    history: &mut History,
    bridge: &PersistenceBridge,
    container: &mut C,
    updates: Vec<(DeviceId, Dataset)>,
    metric: Metric,
    notice: Notice,
) -> CommitOutcome {
    if updates.is_empty() {
        return apply(bridge, container, updates, metric, notice);
    }
    history.push(container.data().clone());
    tracing::info!(devices = updates.len(), history = history.len(), "{}", notice.message);
    apply(bridge, container, updates, metric, notice)
}

/// Makes the container match `snapshot` exactly: every device in it is written
/// back, devices absent from it are emptied.
pub(crate) fn restore<C: DataContainer + ?Sized>(
    bridge: &PersistenceBridge,
    container: &mut C,
    snapshot: DeviceDataMap,
    metric: Metric,
    notice: Notice,
) -> CommitOutcome {
    let mut updates: Vec<(DeviceId, Dataset)> = snapshot
        .iter()
        .map(|(id, ds)| (id.clone(), ds.clone()))
        .collect();
    for id in container.data().keys() {
        if !snapshot.contains_key(id) {
            updates.push((id.clone(), Dataset::empty()));
        }
    }
    apply(bridge, container, updates, metric, notice)
}

fn apply<C: DataContainer + ?Sized>(
    bridge: &PersistenceBridge,
    container: &mut C,
    updates: Vec<(DeviceId, Dataset)>,
    metric: Metric,
    notice: Notice,
) -> CommitOutcome {
    for (device_id, dataset) in &updates {
        container.apply_update(device_id, dataset.clone());
    }
    let persistence = bridge.write_all(&updates);
    let stats = updates
        .iter()
        .map(|(device_id, dataset)| DatasetStats::compute(device_id, dataset, metric))
        .collect();

    CommitOutcome {
        notice,
        changed: updates.into_iter().map(|(device_id, _)| device_id).collect(),
        stats,
        persistence,
    }
}
