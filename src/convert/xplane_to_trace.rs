//! XPlane to trace container conversion implementation
//!
//! Each plane becomes a device, each line a resource on that device and
//! each event a complete trace event. Event names, display names and stat
//! names are resolved through the plane's metadata tables.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::protos::xplane::{XEvent, XLine, XPlane, XSpace, XStat};
use crate::trace::constants::{
    FIRST_DEVICE_ID, HOST_THREADS_DEVICE_ID, HOST_THREADS_PLANE_NAME, LAST_DEVICE_ID,
    LONG_NAME_ARG, OPAQUE_BYTES, STEP_NAME_STAT,
};
use crate::trace::{TraceContainer, TraceEvent};
use crate::utils::{non_negative, ns_to_ps};

/// Convert every plane of `space` into a single trace container.
///
/// Planes are visited in order. Metadata ids that do not resolve produce
/// empty names rather than errors, so a partially written session still
/// converts.
pub fn xspace_to_trace_container(space: &XSpace) -> TraceContainer {
    let mut container = TraceContainer::new();
    let device_ids = assign_device_ids(&space.planes);
    for (plane, device_id) in space.planes.iter().zip(device_ids) {
        convert_xplane(device_id, plane, &mut container);
    }
    container
}

/// Preferred device id (JSON `pid`) for a plane.
///
/// `None` when the plane id falls outside `FIRST_DEVICE_ID..=LAST_DEVICE_ID`
/// once offset; such planes get a free id from [`assign_device_ids`].
pub fn plane_device_id(plane: &XPlane) -> Option<u32> {
    if plane.name == HOST_THREADS_PLANE_NAME {
        return Some(HOST_THREADS_DEVICE_ID);
    }
    u32::try_from(plane.id)
        .ok()
        .and_then(|id| id.checked_add(FIRST_DEVICE_ID))
        .filter(|id| *id <= LAST_DEVICE_ID)
}

/// One distinct device id per plane, in plane order.
///
/// Planes keep their preferred id when no earlier plane claimed it. The
/// rest (duplicate ids, out of range ids, a second host plane) take the
/// lowest free id, never the host id.
pub fn assign_device_ids(planes: &[XPlane]) -> Vec<u32> {
    let mut used = BTreeSet::new();
    let preferred: Vec<Option<u32>> = planes
        .iter()
        .map(|plane| plane_device_id(plane).filter(|id| used.insert(*id)))
        .collect();

    let mut next = FIRST_DEVICE_ID;
    preferred
        .into_iter()
        .map(|id| {
            id.unwrap_or_else(|| {
                while next == HOST_THREADS_DEVICE_ID || !used.insert(next) {
                    next += 1;
                }
                next
            })
        })
        .collect()
}

/// Line id used for grouping: `display_id` when set, otherwise `id`.
fn line_key(line: &XLine) -> i64 {
    if line.display_id != 0 {
        line.display_id
    } else {
        line.id
    }
}

/// Preferred resource id (JSON `tid`) for a line, if its id fits a `tid`.
pub fn line_resource_id(line: &XLine) -> Option<u32> {
    u32::try_from(line_key(line)).ok()
}

/// One resource id per line of `plane`, in line order.
///
/// Lines sharing a display id share a resource. Lines whose id does not fit
/// in 32 bits try the low 32 bits, then the lowest free id, so they never
/// merge with an unrelated line.
pub fn assign_resource_ids(plane: &XPlane) -> Vec<u32> {
    let mut by_key: HashMap<i64, u32> = HashMap::new();
    let mut used = BTreeSet::new();
    for line in &plane.lines {
        if let Some(id) = line_resource_id(line) {
            by_key.insert(line_key(line), id);
            used.insert(id);
        }
    }

    let mut next = 0u32;
    plane
        .lines
        .iter()
        .map(|line| {
            let key = line_key(line);
            *by_key.entry(key).or_insert_with(|| {
                let truncated = key as u32;
                if used.insert(truncated) {
                    return truncated;
                }
                while !used.insert(next) {
                    next += 1;
                }
                next
            })
        })
        .collect()
}

/// Name a line is displayed under.
pub fn line_display_name(line: &XLine) -> &str {
    if line.display_name.is_empty() {
        &line.name
    } else {
        &line.display_name
    }
}

fn convert_xplane(device_id: u32, plane: &XPlane, container: &mut TraceContainer) {
    container.add_device(device_id, &plane.name);

    let resource_ids = assign_resource_ids(plane);
    for (line, &resource_id) in plane.lines.iter().zip(&resource_ids) {
        container.add_resource(device_id, resource_id, line_display_name(line));
    }

    for (line, &resource_id) in plane.lines.iter().zip(&resource_ids) {
        let line_start_ps = ns_to_ps(line.timestamp_ns);
        for event in &line.events {
            container.push_event(convert_xevent(
                device_id,
                resource_id,
                line_start_ps,
                plane,
                event,
            ));
        }
    }
}

fn convert_xevent(
    device_id: u32,
    resource_id: u32,
    line_start_ps: i64,
    plane: &XPlane,
    event: &XEvent,
) -> TraceEvent {
    let metadata = plane.event_metadata.get(&event.metadata_id);
    let mut args = BTreeMap::new();

    let mut name = match metadata {
        Some(md) if !md.display_name.is_empty() => {
            args.insert(LONG_NAME_ARG.to_string(), md.name.clone());
            md.display_name.clone()
        }
        Some(md) => md.name.clone(),
        None => String::new(),
    };

    // Aggregated events (num_occurrences) have no offset of their own.
    let offset_ps = if event.has_offset_ps() {
        event.offset_ps()
    } else {
        0
    };

    let metadata_stats = metadata.map(|md| md.stats.as_slice()).unwrap_or_default();
    for stat in metadata_stats.iter().chain(event.stats.iter()) {
        let Some(value) = stat_value_string(plane, stat) else {
            continue;
        };
        let key = stat_name(plane, stat.metadata_id);
        if key == STEP_NAME_STAT {
            name = value.clone();
        }
        args.insert(key.to_string(), value);
    }

    TraceEvent {
        device_id,
        resource_id,
        name,
        timestamp_ps: non_negative(line_start_ps.saturating_add(offset_ps)),
        duration_ps: non_negative(event.duration_ps),
        args,
    }
}

fn stat_name(plane: &XPlane, metadata_id: i64) -> &str {
    plane
        .stat_metadata
        .get(&metadata_id)
        .map(|md| md.name.as_str())
        .unwrap_or_default()
}

/// Render a stat value the way it appears in event args.
///
/// Returns `None` for stats with no value set.
pub fn stat_value_string(plane: &XPlane, stat: &XStat) -> Option<String> {
    if stat.has_double_value() {
        Some(stat.double_value().to_string())
    } else if stat.has_uint64_value() {
        Some(stat.uint64_value().to_string())
    } else if stat.has_int64_value() {
        Some(stat.int64_value().to_string())
    } else if stat.has_str_value() {
        Some(stat.str_value().to_string())
    } else if stat.has_bytes_value() {
        Some(OPAQUE_BYTES.to_string())
    } else if stat.has_ref_value() {
        // Ref values index the stat metadata table by id.
        let id = i64::try_from(stat.ref_value()).ok()?;
        Some(stat_name(plane, id).to_string())
    } else {
        None
    }
}
