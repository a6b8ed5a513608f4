//! Tool names and decoded tool call payloads.
//!
//! Payloads come from the remote agent as loosely typed JSON. They are
//! decoded here, once, into [`ToolPayload`] so that renderers match on
//! variants instead of poking at raw values.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::lenient;

/// Tools exposed by the supply chain agents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolName {
    ForecastDemand,
    OptimizeInventory,
    TransferToAgent,
    NegotiateWithVendor,
    PlanDeliveryRoute,
    SendSupplyAlerts,
    ListAllProducts,
    GetWarehouseStatus,
}

impl ToolName {
    pub const ALL: [ToolName; 8] = [
        ToolName::ForecastDemand,
        ToolName::OptimizeInventory,
        ToolName::TransferToAgent,
        ToolName::NegotiateWithVendor,
        ToolName::PlanDeliveryRoute,
        ToolName::SendSupplyAlerts,
        ToolName::ListAllProducts,
        ToolName::GetWarehouseStatus,
    ];

    /// Wire name of the tool.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ForecastDemand => "forecast_demand",
            Self::OptimizeInventory => "optimize_inventory",
            Self::TransferToAgent => "transfer_to_agent",
            Self::NegotiateWithVendor => "negotiate_with_vendor",
            Self::PlanDeliveryRoute => "plan_delivery_route",
            Self::SendSupplyAlerts => "send_supply_alerts",
            Self::ListAllProducts => "list_all_products",
            Self::GetWarehouseStatus => "get_warehouse_status",
        }
    }
}

impl fmt::Display for ToolName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ToolName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|tool| tool.as_str() == s)
            .ok_or_else(|| format!("unknown tool: {}", s))
    }
}

#[derive(Debug, Default, Deserialize)]
struct ForecastDemandArgs {
    #[serde(default, deserialize_with = "lenient::option")]
    product_sku: Option<String>,
    #[serde(default, deserialize_with = "lenient::option")]
    region: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct TransferToAgentArgs {
    #[serde(default, deserialize_with = "lenient::option")]
    agent_name: Option<String>,
}

/// A tool call's arguments and result, decoded per tool.
#[derive(Debug, Clone, PartialEq)]
pub enum ToolPayload {
    ForecastDemand {
        product_sku: Option<String>,
        region: Option<String>,
        result: Option<Value>,
    },
    OptimizeInventory {
        result: Option<Value>,
    },
    TransferToAgent {
        agent_name: Option<String>,
    },
    NegotiateWithVendor {
        result: Option<Value>,
    },
    PlanDeliveryRoute {
        result: Option<Value>,
    },
    SendSupplyAlerts {
        result: Option<Value>,
    },
    ListAllProducts {
        products: Vec<Value>,
        result: Option<Value>,
    },
    /// A tool without a dedicated decoding.
    Unrecognized {
        name: String,
        args: Value,
        result: Option<Value>,
    },
}

impl ToolPayload {
    /// Decode a call to `name`. Never fails: missing or malformed fields
    /// become `None`, unknown tools become [`ToolPayload::Unrecognized`].
    pub fn decode(name: &str, args: &Value, result: Option<&Value>) -> Self {
        let result = result.filter(|value| !value.is_null()).cloned();

        match name.parse::<ToolName>() {
            Ok(ToolName::ForecastDemand) => {
                let args: ForecastDemandArgs =
                    lenient::from_value(args.clone()).unwrap_or_default();
                Self::ForecastDemand {
                    product_sku: args.product_sku,
                    region: args.region,
                    result,
                }
            }
            Ok(ToolName::OptimizeInventory) => Self::OptimizeInventory { result },
            Ok(ToolName::TransferToAgent) => {
                let args: TransferToAgentArgs =
                    lenient::from_value(args.clone()).unwrap_or_default();
                Self::TransferToAgent {
                    agent_name: args.agent_name,
                }
            }
            Ok(ToolName::NegotiateWithVendor) => Self::NegotiateWithVendor { result },
            Ok(ToolName::PlanDeliveryRoute) => Self::PlanDeliveryRoute { result },
            Ok(ToolName::SendSupplyAlerts) => Self::SendSupplyAlerts { result },
            Ok(ToolName::ListAllProducts) => Self::ListAllProducts {
                products: normalize_products(result.as_ref()),
                result,
            },
            Ok(ToolName::GetWarehouseStatus) | Err(_) => Self::Unrecognized {
                name: name.to_string(),
                args: args.clone(),
                result,
            },
        }
    }

    /// The raw result carried by this payload, if any.
    pub fn result(&self) -> Option<&Value> {
        match self {
            Self::ForecastDemand { result, .. }
            | Self::OptimizeInventory { result }
            | Self::NegotiateWithVendor { result }
            | Self::PlanDeliveryRoute { result }
            | Self::SendSupplyAlerts { result }
            | Self::ListAllProducts { result, .. }
            | Self::Unrecognized { result, .. } => result.as_ref(),
            Self::TransferToAgent { .. } => None,
        }
    }
}

/// Normalize a product listing result into a sequence.
///
/// Accepts a bare array or an object with a `products` array. Anything
/// else, including an absent result, yields an empty sequence.
pub fn normalize_products(result: Option<&Value>) -> Vec<Value> {
    match result {
        Some(Value::Array(items)) => items.clone(),
        Some(Value::Object(map)) => match map.get("products") {
            Some(Value::Array(items)) => items.clone(),
            _ => Vec::new(),
        },
        _ => Vec::new(),
    }
}
