//! Shared agent state published by the remote supply chain agent.
//!
//! The console only ever holds read-only snapshots of this state. Every
//! stage of the agent pipeline fills in its own subset of
//! [`WorkflowState`]; fields that a stage has not produced yet are absent.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::lenient;

/// Snapshot of the agent session state, keyed by agent name upstream.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AgentState {
    /// Absent until the orchestrator starts the pipeline.
    #[serde(
        default,
        deserialize_with = "lenient::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub workflow_state: Option<WorkflowState>,
}

impl AgentState {
    /// Decode a snapshot, treating anything that is not an object as empty.
    pub fn from_value(value: Value) -> Self {
        lenient::from_value(value).unwrap_or_default()
    }

    /// Whether the pipeline has started.
    pub fn is_started(&self) -> bool {
        self.workflow_state.is_some()
    }
}

/// Accumulated results of the supply chain pipeline stages.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkflowState {
    // Identification
    #[serde(
        default,
        deserialize_with = "lenient::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub product_sku: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub region: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub event_type: Option<String>,

    // Demand stage
    #[serde(
        default,
        deserialize_with = "lenient::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub spike_detected: Option<bool>,
    #[serde(
        default,
        deserialize_with = "lenient::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub peak_demand: Option<f64>,
    #[serde(
        default,
        deserialize_with = "lenient::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub total_7day_demand: Option<f64>,
    /// Forecast confidence; producers use either a 0-1 or a 0-100 scale.
    #[serde(
        default,
        deserialize_with = "lenient::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub confidence: Option<f64>,

    // Inventory stage
    #[serde(
        default,
        deserialize_with = "lenient::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub stock_levels: Option<BTreeMap<String, f64>>,
    #[serde(
        default,
        deserialize_with = "lenient::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub gap_size: Option<f64>,
    #[serde(
        default,
        deserialize_with = "lenient::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub reorder_needed: Option<bool>,

    // Vendor stage
    #[serde(
        default,
        deserialize_with = "lenient::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub po_number: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub vendor_name: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub delivery_date: Option<String>,

    // Routing stage
    #[serde(
        default,
        deserialize_with = "lenient::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub transfers: Option<Vec<Value>>,
    #[serde(
        default,
        deserialize_with = "lenient::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub routes: Option<Vec<Value>>,

    // Alerting stage
    #[serde(
        default,
        deserialize_with = "lenient::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub alert_severity: Option<String>,

    /// Catalog written by `list_all_products`.
    #[serde(
        default,
        deserialize_with = "lenient::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub products: Option<Vec<Value>>,

    /// One entry per completed tool invocation, in chronological order.
    #[serde(default, deserialize_with = "trace")]
    pub execution_trace: Vec<TraceEntry>,
}

impl WorkflowState {
    /// Whether `tool` appears at least once in the execution trace.
    pub fn has_run(&self, tool: &str) -> bool {
        self.execution_trace.iter().any(|entry| entry.tool == tool)
    }

    /// Number of planned routes, zero when routing has not happened.
    ///
    /// Every element counts, whatever its shape.
    pub fn route_count(&self) -> usize {
        self.routes.as_ref().map_or(0, Vec::len)
    }
}

/// A single completed tool invocation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TraceEntry {
    /// Agent that invoked the tool.
    #[serde(default, deserialize_with = "lenient::string")]
    pub agent: String,
    /// Tool name.
    #[serde(default, deserialize_with = "lenient::string")]
    pub tool: String,
    #[serde(default)]
    pub input: Value,
    #[serde(default)]
    pub output: Value,
    #[serde(
        default,
        deserialize_with = "lenient::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub timestamp: Option<String>,
}

impl TraceEntry {
    /// Create an entry without a timestamp.
    pub fn new(agent: impl Into<String>, tool: impl Into<String>, output: Value) -> Self {
        Self {
            agent: agent.into(),
            tool: tool.into(),
            input: Value::Null,
            output,
            timestamp: None,
        }
    }

    /// Builder method to set the timestamp.
    pub fn with_timestamp(mut self, timestamp: impl Into<String>) -> Self {
        self.timestamp = Some(timestamp.into());
        self
    }

    /// Decode one trace element.
    ///
    /// Elements that are not objects keep their slot in the trace, with the
    /// raw value carried as output.
    pub fn from_value(value: Value) -> Self {
        if value.is_object() {
            if let Ok(entry) = serde_json::from_value(value.clone()) {
                return entry;
            }
        }
        Self {
            output: value,
            ..Self::default()
        }
    }
}

fn trace<'de, D>(deserializer: D) -> Result<Vec<TraceEntry>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Array(items) => items.into_iter().map(TraceEntry::from_value).collect(),
        _ => Vec::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_absent_workflow_state() {
        let state = AgentState::from_value(json!({}));
        assert!(!state.is_started());

        let state = AgentState::from_value(json!({ "workflow_state": null }));
        assert!(!state.is_started());
    }

    #[test]
    fn test_non_object_snapshot_is_empty() {
        assert_eq!(AgentState::from_value(json!("garbage")), AgentState::default());
        assert_eq!(AgentState::from_value(json!([1, 2])), AgentState::default());
        let state = AgentState::from_value(json!({ "workflow_state": 5 }));
        assert!(state.workflow_state.is_none());
    }

    #[test]
    fn test_partial_workflow_state() {
        let state = AgentState::from_value(json!({
            "workflow_state": {
                "product_sku": "WJ-DNM-BLK-M",
                "region": "Delhi",
                "peak_demand": 144,
                "confidence": 0.87,
                "reorder_needed": false,
                "execution_trace": []
            }
        }));
        let wf = state.workflow_state.unwrap();
        assert_eq!(wf.product_sku.as_deref(), Some("WJ-DNM-BLK-M"));
        assert_eq!(wf.peak_demand, Some(144.0));
        assert_eq!(wf.confidence, Some(0.87));
        assert_eq!(wf.reorder_needed, Some(false));
        assert!(wf.gap_size.is_none());
        assert!(wf.execution_trace.is_empty());
    }

    #[test]
    fn test_wrong_shapes_decode_as_absent() {
        let wf: WorkflowState = serde_json::from_value(json!({
            "peak_demand": "lots",
            "reorder_needed": "yes",
            "routes": { "not": "a list" },
            "stock_levels": [1, 2, 3],
            "vendor_name": "Fashion Hub Delhi"
        }))
        .unwrap();
        assert!(wf.peak_demand.is_none());
        assert!(wf.reorder_needed.is_none());
        assert!(wf.routes.is_none());
        assert!(wf.stock_levels.is_none());
        assert_eq!(wf.vendor_name.as_deref(), Some("Fashion Hub Delhi"));
        assert_eq!(wf.route_count(), 0);
    }

    #[test]
    fn test_trace_keeps_every_entry_in_order() {
        let wf: WorkflowState = serde_json::from_value(json!({
            "execution_trace": [
                {
                    "agent": "DemandAgent",
                    "tool": "forecast_demand",
                    "input": {},
                    "output": { "peak_demand": 10 },
                    "timestamp": "2026-01-01T00:00:00"
                },
                "not an object",
                { "agent": 7, "tool": "optimize_inventory", "output": null },
                { "agent": "DemandAgent", "tool": "forecast_demand", "output": {} }
            ]
        }))
        .unwrap();

        let tools: Vec<&str> = wf.execution_trace.iter().map(|e| e.tool.as_str()).collect();
        assert_eq!(
            tools,
            vec!["forecast_demand", "", "optimize_inventory", "forecast_demand"]
        );
        assert_eq!(
            wf.execution_trace[0].timestamp.as_deref(),
            Some("2026-01-01T00:00:00")
        );
        assert_eq!(wf.execution_trace[1].output, json!("not an object"));
        assert_eq!(wf.execution_trace[2].agent, "");
        assert!(wf.has_run("optimize_inventory"));
        assert!(!wf.has_run("send_supply_alerts"));
    }

    #[test]
    fn test_route_count_includes_odd_elements() {
        let wf: WorkflowState = serde_json::from_value(json!({
            "routes": [{ "a": 1 }, "x"]
        }))
        .unwrap();
        assert_eq!(wf.routes.as_ref().map(Vec::len), Some(2));
        assert_eq!(wf.route_count(), 2);
    }

    #[test]
    fn test_trace_not_a_list() {
        let wf: WorkflowState =
            serde_json::from_value(json!({ "execution_trace": "oops" })).unwrap();
        assert!(wf.execution_trace.is_empty());
    }
}
