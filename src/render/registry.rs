use super::charts::{ChartSlot, ChartSpec};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// A drawn chart. `id` is unique per registry, so a redraw is visible to
/// clients as a new id in the same slot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartInstance {
    pub id: u64,
    pub slot: ChartSlot,
    pub created_at: DateTime<Utc>,
    pub spec: ChartSpec,
}

/// Slot → live instance. At most one instance per slot.
#[derive(Debug, Default)]
pub struct ChartRegistry {
    instances: BTreeMap<ChartSlot, ChartInstance>,
    next_id: u64,
}

impl ChartRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Destroy whatever occupies `slot`, then install a fresh instance.
    /// Returns the destroyed instance.
    pub fn replace(&mut self, slot: ChartSlot, spec: ChartSpec) -> Option<ChartInstance> {
        let destroyed = self.destroy(slot);

        if !spec.is_consistent() {
            warn!(
                "Chart for slot {} has series whose length differs from its {} label(s)",
                slot,
                spec.labels.len()
            );
        }

        self.next_id += 1;
        let instance = ChartInstance {
            id: self.next_id,
            slot,
            created_at: Utc::now(),
            spec,
        };
        debug!("Created chart instance {} for slot {}", instance.id, slot);
        self.instances.insert(slot, instance);

        destroyed
    }

    pub fn destroy(&mut self, slot: ChartSlot) -> Option<ChartInstance> {
        let destroyed = self.instances.remove(&slot);
        if let Some(old) = &destroyed {
            debug!("Destroyed chart instance {} for slot {}", old.id, slot);
        }
        destroyed
    }

    /// Tear down every slot; returns how many instances were destroyed.
    pub fn clear(&mut self) -> usize {
        let count = self.instances.len();
        for slot in ChartSlot::ALL {
            self.destroy(slot);
        }
        count
    }

    pub fn get(&self, slot: ChartSlot) -> Option<&ChartInstance> {
        self.instances.get(&slot)
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// Live instances in slot order.
    pub fn instances(&self) -> Vec<ChartInstance> {
        self.instances.values().cloned().collect()
    }
}
