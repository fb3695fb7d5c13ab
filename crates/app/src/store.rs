//! Device store: the in-memory map of device statuses.
//!
//! The store is owned by the [`ActionScheduler`](crate::scheduler::ActionScheduler),
//! which is the only writer. Each write happens inside one critical section,
//! so readers always observe whole snapshots.

use std::collections::BTreeMap;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use voxhub_domain::device::{DeviceId, DeviceState, DeviceStatus};
use voxhub_domain::time::Timestamp;

#[derive(Debug, Default)]
pub struct DeviceStore {
    devices: RwLock<BTreeMap<DeviceId, DeviceState>>,
}

impl DeviceStore {
    /// Seed the store with known devices and their initial status.
    #[must_use]
    pub fn with_devices(
        devices: impl IntoIterator<Item = (DeviceId, DeviceStatus)>,
        ts: Timestamp,
    ) -> Self {
        let devices = devices
            .into_iter()
            .map(|(id, status)| (id.clone(), DeviceState::new(id, status, ts)))
            .collect();
        Self {
            devices: RwLock::new(devices),
        }
    }

    /// All devices, ordered by id.
    #[must_use]
    pub fn snapshot(&self) -> Vec<DeviceState> {
        self.read().values().cloned().collect()
    }

    #[must_use]
    pub fn get(&self, id: &DeviceId) -> Option<DeviceState> {
        self.read().get(id).cloned()
    }

    /// Set a device's status, registering the device when it is unknown.
    /// Returns the committed state.
    pub(crate) fn apply(&self, id: &DeviceId, status: DeviceStatus, ts: Timestamp) -> DeviceState {
        let mut devices = self.write();
        let state = devices
            .entry(id.clone())
            .or_insert_with(|| DeviceState::new(id.clone(), status, ts));
        state.set_status(status, ts);
        state.clone()
    }

    fn read(&self) -> RwLockReadGuard<'_, BTreeMap<DeviceId, DeviceState>> {
        self.devices.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, BTreeMap<DeviceId, DeviceState>> {
        self.devices.write().unwrap_or_else(PoisonError::into_inner)
    }
}
