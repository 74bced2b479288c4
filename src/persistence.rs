//! Persistence Bridge: the only path to the dataset cache.
//!
//! Writes are issued together, at commit time, and never awaited by the
//! editor. The returned [`PendingWrites`] only tells the host when all of them
//! settled and what the cache looks like afterwards; dropping it loses the
//! report, not the writes.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use futures::channel::oneshot;
use futures::future::{self, BoxFuture, FutureExt};
use futures::task::{Spawn, SpawnExt};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::container::DataContainer;
use crate::data_types::{Dataset, DatasetKey, DeviceId, TimeSeriesPoint};
use crate::error::Notice;

/// Size of the cache, refreshed after every batch of writes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheStats {
    pub entries: usize,
    pub points: usize,
    pub approx_bytes: usize,
}

/// Keyed dataset storage. Writes are idempotent and last-write-wins.
pub trait DatasetCache: Send + Sync {
    /// Issues the write before returning. The future only reports completion
    /// and may be dropped without cancelling the write.
    fn save(&self, key: DatasetKey, dataset: Dataset) -> BoxFuture<'static, eyre::Result<()>>;

    fn load(&self, key: DatasetKey) -> BoxFuture<'static, eyre::Result<Option<Dataset>>>;

    fn stats(&self) -> CacheStats;
}

/// Process-lifetime cache backed by a shared map.
#[derive(Clone, Default)]
pub struct MemoryCache {
    entries: Arc<RwLock<HashMap<DatasetKey, Dataset>>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &DatasetKey) -> Option<Dataset> {
        self.entries.read().get(key).cloned()
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl DatasetCache for MemoryCache {
    fn save(&self, key: DatasetKey, dataset: Dataset) -> BoxFuture<'static, eyre::Result<()>> {
        self.entries.write().insert(key, dataset);
        future::ready(Ok(())).boxed()
    }

    fn load(&self, key: DatasetKey) -> BoxFuture<'static, eyre::Result<Option<Dataset>>> {
        let entries = self.entries.clone();
        async move { Ok(entries.read().get(&key).cloned()) }.boxed()
    }

    fn stats(&self) -> CacheStats {
        let entries = self.entries.read();
        let points: usize = entries.values().map(|d| d.len()).sum();
        let key_bytes: usize = entries
            .keys()
            .map(|k| k.task_id.len() + k.device_id.len())
            .sum();
        CacheStats {
            entries: entries.len(),
            points,
            approx_bytes: points * std::mem::size_of::<TimeSeriesPoint>() + key_bytes,
        }
    }
}

/// Outcome of one batch of cache writes.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CommitReport {
    pub written: Vec<DeviceId>,
    pub failed: Vec<(DeviceId, String)>,
    pub cache: CacheStats,
}

impl CommitReport {
    pub fn is_ok(&self) -> bool {
        self.failed.is_empty()
    }

    /// The generic retry notice if any write failed.
    pub fn notice(&self) -> Option<Notice> {
        (!self.is_ok()).then(Notice::retry)
    }
}

/// Completion of a batch of writes already issued. Dropping it gives up the
/// report, never the writes.
pub struct PendingWrites(BoxFuture<'static, CommitReport>);

impl PendingWrites {
    pub fn ready(report: CommitReport) -> Self {
        Self(future::ready(report).boxed())
    }
}

impl Future for PendingWrites {
    type Output = CommitReport;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        self.get_mut().0.poll_unpin(cx)
    }
}

impl std::fmt::Debug for PendingWrites {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("PendingWrites")
    }
}

#[derive(Clone)]
pub struct PersistenceBridge {
    task_id: String,
    cache: Arc<dyn DatasetCache>,
    spawner: Option<Arc<dyn Spawn + Send + Sync>>,
}

impl PersistenceBridge {
    pub fn new(task_id: impl Into<String>, cache: Arc<dyn DatasetCache>) -> Self {
        Self {
            task_id: task_id.into(),
            cache,
            spawner: None,
        }
    }

    /// Runs the completion of every batch on `spawner`, so failures are logged
    /// even when nobody polls the [`PendingWrites`].
    pub fn with_spawner(mut self, spawner: Arc<dyn Spawn + Send + Sync>) -> Self {
        self.spawner = Some(spawner);
        self
    }

    /// Bridge over a fresh [`MemoryCache`].
    pub fn in_memory(task_id: impl Into<String>) -> Self {
        Self::new(task_id, Arc::new(MemoryCache::new()))
    }

    pub fn task_id(&self) -> &str {
        &self.task_id
    }

    pub fn key(&self, device_id: &str) -> DatasetKey {
        DatasetKey::new(self.task_id.clone(), device_id)
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Issues one write per device at once. A failed device does not affect
    /// the others.
    pub fn write_all(&self, updates: &[(DeviceId, Dataset)]) -> PendingWrites {
        if updates.is_empty() {
            return PendingWrites::ready(CommitReport {
                cache: self.cache.stats(),
                ..Default::default()
            });
        }

        let writes: Vec<_> = updates
            .iter()
            .map(|(device_id, dataset)| {
                let device_id = device_id.clone();
                self.cache
                    .save(self.key(&device_id), dataset.clone())
                    .map(move |res| (device_id, res))
            })
            .collect();
        let cache = self.cache.clone();
        let settle = async move {
            let mut report = CommitReport::default();
            for (device_id, res) in future::join_all(writes).await {
                match res {
                    Ok(()) => report.written.push(device_id),
                    Err(e) => {
                        tracing::warn!(device = %device_id, error = %e, "cache write failed");
                        report.failed.push((device_id, format!("{e:#}")));
                    }
                }
            }
            report.cache = cache.stats();
            report
        };

        let Some(spawner) = &self.spawner else {
            return PendingWrites(settle.boxed());
        };
        let (tx, rx) = oneshot::channel();
        let spawned = spawner.spawn(async move {
            // The host may have dropped the receiver.
            let _ = tx.send(settle.await);
        });
        if let Err(e) = spawned {
            tracing::warn!(error = %e, "cannot spawn cache writes");
        }
        let devices: Vec<DeviceId> = updates.iter().map(|(device_id, _)| device_id.clone()).collect();
        let cache = self.cache.clone();
        PendingWrites(
            async move {
                rx.await.unwrap_or_else(|_| CommitReport {
                    written: Vec::new(),
                    failed: devices
                        .into_iter()
                        .map(|device_id| (device_id, "write task dropped".to_string()))
                        .collect(),
                    cache: cache.stats(),
                })
            }
            .boxed(),
        )
    }

    pub fn load(&self, device_id: &str) -> BoxFuture<'static, eyre::Result<Option<Dataset>>> {
        self.cache.load(self.key(device_id))
    }

    /// Loads cached datasets of `devices`. Missing entries are skipped; read
    /// errors are logged and skipped. Returned datasets are sorted and cleaned.
    pub async fn load_all(&self, devices: &[DeviceId]) -> Vec<(DeviceId, Dataset)> {
        let loads = devices.iter().map(|device_id| {
            let device_id = device_id.clone();
            self.load(&device_id).map(move |res| (device_id, res))
        });

        let mut loaded = Vec::new();
        for (device_id, res) in future::join_all(loads).await {
            match res {
                Ok(Some(dataset)) => loaded.push((device_id, Dataset::sanitized(dataset.to_vec()))),
                Ok(None) => {}
                Err(e) => tracing::warn!(device = %device_id, error = %e, "cache read failed"),
            }
        }
        loaded
    }

    /// Loads cached datasets into `container`. Returns how many devices were restored.
    pub async fn hydrate<C: DataContainer + ?Sized>(&self, container: &mut C, devices: &[DeviceId]) -> usize {
        let loaded = self.load_all(devices).await;
        let count = loaded.len();
        for (device_id, dataset) in loaded {
            container.apply_update(&device_id, dataset);
        }
        tracing::info!(task = %self.task_id, devices = count, "restored datasets from cache");
        count
    }
}
