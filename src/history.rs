use std::collections::VecDeque;

use crate::data_types::DeviceDataMap;

/// Bounded undo/redo stacks of full [`DeviceDataMap`] snapshots.
///
/// Snapshots are persistent maps whose datasets share storage with the live
/// map, so ten retained snapshots only cost the devices that actually changed.
#[derive(Clone, Debug)]
pub struct History {
    undo: VecDeque<DeviceDataMap>,
    redo: VecDeque<DeviceDataMap>,
    depth: usize,
}

impl History {
    pub fn new(depth: usize) -> Self {
        let depth = depth.max(1);
        Self {
            undo: VecDeque::with_capacity(depth + 1),
            redo: VecDeque::new(),
            depth,
        }
    }

    /// Records the state right before a mutation. Evicts the oldest snapshot
    /// past `depth` and invalidates redo.
    pub fn push(&mut self, before: DeviceDataMap) {
        self.undo.push_back(before);
        while self.undo.len() > self.depth {
            self.undo.pop_front();
        }
        self.redo.clear();
    }

    /// Pops the latest snapshot; `current` becomes redoable.
    pub fn undo(&mut self, current: DeviceDataMap) -> Option<DeviceDataMap> {
        let snapshot = self.undo.pop_back()?;
        Self::push_bounded(&mut self.redo, current, self.depth);
        Some(snapshot)
    }

    /// Pops the latest undone state; `current` becomes undoable again.
    pub fn redo(&mut self, current: DeviceDataMap) -> Option<DeviceDataMap> {
        let snapshot = self.redo.pop_back()?;
        Self::push_bounded(&mut self.undo, current, self.depth);
        Some(snapshot)
    }

    fn push_bounded(stack: &mut VecDeque<DeviceDataMap>, map: DeviceDataMap, depth: usize) {
        stack.push_back(map);
        while stack.len() > depth {
            stack.pop_front();
        }
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    pub fn len(&self) -> usize {
        self.undo.len()
    }

    pub fn is_empty(&self) -> bool {
        self.undo.is_empty()
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Undo snapshots, oldest first.
    pub fn snapshots(&self) -> impl Iterator<Item = &DeviceDataMap> {
        self.undo.iter()
    }

    pub fn clear(&mut self) {
        self.undo.clear();
        self.redo.clear();
    }
}

impl Default for History {
    fn default() -> Self {
        Self::new(10)
    }
}
