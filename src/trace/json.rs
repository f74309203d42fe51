//! JSON trace-event serialization.
//!
//! Produces the object form of the Trace Event Format:
//!
//! ```text
//! {"displayTimeUnit":"ns","metadata":{"highres-ticks":true},"traceEvents":[...]}
//! ```
//!
//! Device and resource names become `process_name`/`thread_name` metadata
//! records, followed by one complete (`"ph":"X"`) record per event.

use anyhow::{Context, Result};
use serde::Serialize;
use std::collections::BTreeMap;

use super::models::{TraceContainer, TraceEvent};
use crate::utils::ps_to_us;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonTrace<'a> {
    display_time_unit: &'static str,
    metadata: JsonTraceMetadata,
    trace_events: Vec<JsonTraceEvent<'a>>,
}

#[derive(Serialize)]
struct JsonTraceMetadata {
    #[serde(rename = "highres-ticks")]
    highres_ticks: bool,
}

#[derive(Serialize)]
#[serde(untagged)]
enum MetadataArgs<'a> {
    Name { name: &'a str },
    SortIndex { sort_index: u32 },
}

#[derive(Serialize)]
#[serde(tag = "ph")]
enum JsonTraceEvent<'a> {
    #[serde(rename = "M")]
    Metadata {
        pid: u32,
        #[serde(skip_serializing_if = "Option::is_none")]
        tid: Option<u32>,
        name: &'static str,
        args: MetadataArgs<'a>,
    },
    #[serde(rename = "X")]
    Complete {
        pid: u32,
        tid: u32,
        ts: f64,
        dur: f64,
        name: &'a str,
        #[serde(skip_serializing_if = "no_args")]
        args: &'a BTreeMap<String, String>,
    },
}

fn no_args(args: &&BTreeMap<String, String>) -> bool {
    args.is_empty()
}

impl<'a> From<&'a TraceEvent> for JsonTraceEvent<'a> {
    fn from(event: &'a TraceEvent) -> Self {
        JsonTraceEvent::Complete {
            pid: event.device_id,
            tid: event.resource_id,
            ts: ps_to_us(event.timestamp_ps),
            dur: ps_to_us(event.duration_ps),
            name: &event.name,
            args: &event.args,
        }
    }
}

fn metadata_events(container: &TraceContainer) -> Vec<JsonTraceEvent<'_>> {
    let mut records = Vec::new();
    for (&pid, device) in container.devices() {
        if !device.name.is_empty() {
            records.push(JsonTraceEvent::Metadata {
                pid,
                tid: None,
                name: "process_name",
                args: MetadataArgs::Name { name: &device.name },
            });
        }
        records.push(JsonTraceEvent::Metadata {
            pid,
            tid: None,
            name: "process_sort_index",
            args: MetadataArgs::SortIndex { sort_index: pid },
        });

        for (&tid, resource) in &device.resources {
            if !resource.name.is_empty() {
                records.push(JsonTraceEvent::Metadata {
                    pid,
                    tid: Some(tid),
                    name: "thread_name",
                    args: MetadataArgs::Name {
                        name: &resource.name,
                    },
                });
            }
            records.push(JsonTraceEvent::Metadata {
                pid,
                tid: Some(tid),
                name: "thread_sort_index",
                args: MetadataArgs::SortIndex { sort_index: tid },
            });
        }
    }
    records
}

/// Serialize `container` to a JSON trace-event document.
///
/// With `pretty` the output is indented; otherwise it is a single line.
pub fn to_json(container: &TraceContainer, pretty: bool) -> Result<String> {
    let mut trace_events = metadata_events(container);
    trace_events.extend(container.events().iter().map(JsonTraceEvent::from));

    let trace = JsonTrace {
        display_time_unit: "ns",
        metadata: JsonTraceMetadata {
            highres_ticks: true,
        },
        trace_events,
    };

    let json = if pretty {
        serde_json::to_string_pretty(&trace)
    } else {
        serde_json::to_string(&trace)
    };
    json.context("Failed to serialize trace events to JSON")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    fn parse(container: &TraceContainer) -> Value {
        serde_json::from_str(&to_json(container, false).unwrap()).unwrap()
    }

    #[test]
    fn test_empty_container() {
        let json = parse(&TraceContainer::new());

        assert_eq!(json["displayTimeUnit"], "ns");
        assert_eq!(json["metadata"]["highres-ticks"], true);
        assert_eq!(json["traceEvents"], Value::Array(vec![]));
    }

    #[test]
    fn test_metadata_records() {
        let mut container = TraceContainer::new();
        container.add_device(1, "/device:GPU:0");
        container.add_resource(1, 2, "Stream #2");
        container.add_resource(1, 3, "");

        let json = parse(&container);
        let events = json["traceEvents"].as_array().unwrap();
        let names: Vec<&str> = events.iter().map(|e| e["name"].as_str().unwrap()).collect();
        assert_eq!(
            names,
            vec![
                "process_name",
                "process_sort_index",
                "thread_name",
                "thread_sort_index",
                "thread_sort_index",
            ]
        );
        assert!(events.iter().all(|e| e["ph"] == "M"));
        assert_eq!(events[0]["args"]["name"], "/device:GPU:0");
        assert!(events[0].get("tid").is_none());
        assert_eq!(events[2]["tid"], 2);
        assert_eq!(events[4]["args"]["sort_index"], 3);
    }

    #[test]
    fn test_complete_event() {
        let mut container = TraceContainer::new();
        let mut args = BTreeMap::new();
        args.insert("long_name".to_string(), "fusion.1 = add()".to_string());
        container.push_event(TraceEvent {
            device_id: 501,
            resource_id: 7,
            name: "fusion.1".to_string(),
            timestamp_ps: 1_500_000,
            duration_ps: 250_000,
            args,
        });
        container.push_event(TraceEvent {
            device_id: 501,
            resource_id: 7,
            name: "bare".to_string(),
            ..TraceEvent::default()
        });

        let json = parse(&container);
        let events = json["traceEvents"].as_array().unwrap();
        assert_eq!(events.len(), 2);

        let event = &events[0];
        assert_eq!(event["ph"], "X");
        assert_eq!(event["pid"], 501);
        assert_eq!(event["tid"], 7);
        assert_eq!(event["ts"].as_f64(), Some(1.5));
        assert_eq!(event["dur"].as_f64(), Some(0.25));
        assert_eq!(event["name"], "fusion.1");
        assert_eq!(event["args"]["long_name"], "fusion.1 = add()");

        assert!(events[1].get("args").is_none());
    }

    #[test]
    fn test_pretty_output_is_equivalent() {
        let mut container = TraceContainer::new();
        container.add_device(1, "dev");
        container.push_event(TraceEvent {
            device_id: 1,
            name: "ev".to_string(),
            ..TraceEvent::default()
        });

        let pretty = to_json(&container, true).unwrap();
        assert!(pretty.contains('\n'));
        let compact = to_json(&container, false).unwrap();
        assert!(!compact.contains('\n'));

        let a: Value = serde_json::from_str(&pretty).unwrap();
        let b: Value = serde_json::from_str(&compact).unwrap();
        assert_eq!(a, b);
    }
}
