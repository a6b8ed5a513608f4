//! The fixed five-stage supply chain pipeline.

use serde::{Deserialize, Serialize};

use crate::state::WorkflowState;
use crate::tool::ToolName;

/// One named stage of the pipeline, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    Demand,
    Inventory,
    Vendor,
    Routing,
    Alert,
}

impl Step {
    /// All steps in pipeline order.
    pub const ALL: [Step; 5] = [
        Step::Demand,
        Step::Inventory,
        Step::Vendor,
        Step::Routing,
        Step::Alert,
    ];

    /// Display label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Demand => "Demand",
            Self::Inventory => "Inventory",
            Self::Vendor => "Vendor",
            Self::Routing => "Routing",
            Self::Alert => "Alert",
        }
    }

    /// Canonical tool whose execution completes this step.
    pub fn tool(&self) -> ToolName {
        match self {
            Self::Demand => ToolName::ForecastDemand,
            Self::Inventory => ToolName::OptimizeInventory,
            Self::Vendor => ToolName::NegotiateWithVendor,
            Self::Routing => ToolName::PlanDeliveryRoute,
            Self::Alert => ToolName::SendSupplyAlerts,
        }
    }

    /// 1-based position in the pipeline.
    pub fn ordinal(&self) -> usize {
        Self::ALL
            .iter()
            .position(|step| step == self)
            .map_or(0, |index| index + 1)
    }

    /// Returns true once the step's tool has run at least once.
    ///
    /// Re-running a tool never moves a step back to pending.
    pub fn is_completed(&self, state: &WorkflowState) -> bool {
        state.has_run(self.tool().as_str())
    }
}

impl std::fmt::Display for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Steps whose tool appears in the execution trace, in pipeline order.
pub fn completed_steps(state: &WorkflowState) -> Vec<Step> {
    Step::ALL
        .into_iter()
        .filter(|step| step.is_completed(state))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::TraceEntry;
    use serde_json::json;

    fn state_with(tools: &[&str]) -> WorkflowState {
        WorkflowState {
            execution_trace: tools
                .iter()
                .map(|tool| TraceEntry::new("Agent", *tool, json!({})))
                .collect(),
            ..WorkflowState::default()
        }
    }

    #[test]
    fn test_only_demand_completed() {
        let state = state_with(&["forecast_demand"]);
        assert_eq!(completed_steps(&state), vec![Step::Demand]);
        for step in &Step::ALL[1..] {
            assert!(!step.is_completed(&state), "{} should be pending", step);
        }
    }

    #[test]
    fn test_empty_trace_nothing_completed() {
        assert!(completed_steps(&WorkflowState::default()).is_empty());
    }

    #[test]
    fn test_rerun_does_not_regress() {
        let state = state_with(&["forecast_demand", "optimize_inventory", "forecast_demand"]);
        assert_eq!(completed_steps(&state), vec![Step::Demand, Step::Inventory]);
    }

    #[test]
    fn test_out_of_order_trace_reported_in_pipeline_order() {
        let state = state_with(&["send_supply_alerts", "get_warehouse_status", "forecast_demand"]);
        assert_eq!(completed_steps(&state), vec![Step::Demand, Step::Alert]);
    }

    #[test]
    fn test_ordinals() {
        assert_eq!(Step::Demand.ordinal(), 1);
        assert_eq!(Step::Alert.ordinal(), 5);
        assert_eq!(Step::Vendor.tool().as_str(), "negotiate_with_vendor");
    }
}
