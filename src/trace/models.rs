//! Trace container model.
//!
//! These structs sit between the decoded `XSpace` and the JSON writer. Ids
//! are kept in `BTreeMap`s so metadata is always emitted in ascending order.

use std::collections::BTreeMap;

/// A timeline row within a device (a JSON `tid`).
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Resource {
    pub id: u32,
    pub name: String,
}

/// A group of resources (a JSON `pid`), one per converted plane.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Device {
    pub id: u32,
    pub name: String,
    pub resources: BTreeMap<u32, Resource>,
}

/// A complete event with picosecond timing.
///
/// # Fields
/// - `device_id`: Owning device (references `Device.id`)
/// - `resource_id`: Owning resource (references `Resource.id`)
/// - `timestamp_ps`: Absolute start time in picoseconds
/// - `duration_ps`: Duration in picoseconds
/// - `args`: Stat name to rendered value
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TraceEvent {
    pub device_id: u32,
    pub resource_id: u32,
    pub name: String,
    pub timestamp_ps: u64,
    pub duration_ps: u64,
    pub args: BTreeMap<String, String>,
}

/// Devices and events produced from one session.
#[derive(Clone, Debug, Default)]
pub struct TraceContainer {
    devices: BTreeMap<u32, Device>,
    events: Vec<TraceEvent>,
}

impl TraceContainer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a device. The first registration of an id wins its name.
    pub fn add_device(&mut self, id: u32, name: &str) -> &mut Device {
        self.devices.entry(id).or_insert_with(|| Device {
            id,
            name: name.to_string(),
            resources: BTreeMap::new(),
        })
    }

    /// Register a resource on a device, creating an unnamed device if needed.
    pub fn add_resource(&mut self, device_id: u32, resource_id: u32, name: &str) {
        self.add_device(device_id, "")
            .resources
            .entry(resource_id)
            .or_insert_with(|| Resource {
                id: resource_id,
                name: name.to_string(),
            });
    }

    pub fn push_event(&mut self, event: TraceEvent) {
        self.events.push(event);
    }

    pub fn devices(&self) -> &BTreeMap<u32, Device> {
        &self.devices
    }

    pub fn events(&self) -> &[TraceEvent] {
        &self.events
    }

    /// Keep at most `max_events` events, preferring the earliest ones.
    ///
    /// Returns the number of events dropped. When nothing has to be dropped
    /// the original event order is left untouched.
    pub fn cap_events(&mut self, max_events: usize) -> usize {
        if self.events.len() <= max_events {
            return 0;
        }
        let dropped = self.events.len() - max_events;
        self.events.sort_by_key(|e| e.timestamp_ps);
        self.events.truncate(max_events);
        dropped
    }
}
