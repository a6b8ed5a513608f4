//! Tool result renderers.
//!
//! The chat surface asks the [`ToolRendererRegistry`] for a card once per
//! tool call it displays. Tools without a registered renderer return `None`
//! and the surface falls back to its default one-line rendering.

use std::fmt;

use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use serde_json::{json, Map, Value};

use supplynet_core::{ToolName, ToolPayload};

use crate::utils::{or_placeholder, pretty_json};
use crate::widgets::card::Card;

pub const DEMAND_FORECAST_TITLE: &str = "📈 Demand Forecast";
pub const INVENTORY_TITLE: &str = "📦 Inventory Optimization";
pub const TRANSFER_TITLE: &str = "🔄 Agent transfered";
pub const VENDOR_TITLE: &str = "🏭 Vendor Order";
pub const ROUTING_TITLE: &str = "🚚 Delivery Routing";
pub const ALERT_TITLE: &str = "🚨 Alert Sent";
pub const CATALOG_TITLE: &str = "📦 Product Catalog";

/// Render function: `(args, result) -> Card`.
///
/// Must be total: renderers substitute placeholders for anything missing.
pub type RenderFn = Box<dyn Fn(&Value, Option<&Value>) -> Card + Send + Sync>;

/// Declared tool parameter. Documentation only, never enforced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterSpec {
    pub name: String,
    /// Type tag such as `string`, `number` or `object[]`.
    pub type_tag: String,
    pub required: bool,
}

impl ParameterSpec {
    pub fn new(name: impl Into<String>, type_tag: impl Into<String>, required: bool) -> Self {
        Self {
            name: name.into(),
            type_tag: type_tag.into(),
            required,
        }
    }

    /// A required parameter.
    pub fn required(name: impl Into<String>, type_tag: impl Into<String>) -> Self {
        Self::new(name, type_tag, true)
    }
}

/// A registered renderer for one tool name.
pub struct ToolRenderer {
    name: String,
    description: String,
    parameters: Vec<ParameterSpec>,
    render: RenderFn,
}

impl fmt::Debug for ToolRenderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolRenderer")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("parameters", &self.parameters)
            .finish()
    }
}

impl ToolRenderer {
    pub fn new<F>(
        name: impl Into<String>,
        description: impl Into<String>,
        parameters: Vec<ParameterSpec>,
        render: F,
    ) -> Self
    where
        F: Fn(&Value, Option<&Value>) -> Card + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            description: description.into(),
            parameters,
            render: Box::new(render),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn parameters(&self) -> &[ParameterSpec] {
        &self.parameters
    }

    /// Render one call.
    pub fn render(&self, args: &Value, result: Option<&Value>) -> Card {
        (self.render)(args, result)
    }

    /// JSON-schema shaped description of the declared parameters.
    pub fn parameters_schema(&self) -> Value {
        let mut properties = Map::new();
        for param in &self.parameters {
            properties.insert(param.name.clone(), type_tag_schema(&param.type_tag));
        }
        let required: Vec<&str> = self
            .parameters
            .iter()
            .filter(|param| param.required)
            .map(|param| param.name.as_str())
            .collect();

        json!({
            "type": "object",
            "description": self.description,
            "properties": properties,
            "required": required,
        })
    }
}

fn type_tag_schema(type_tag: &str) -> Value {
    match type_tag.strip_suffix("[]") {
        Some(item) => json!({ "type": "array", "items": { "type": item } }),
        None => json!({ "type": type_tag }),
    }
}

/// Registry mapping tool names to renderers, in registration order.
#[derive(Debug, Default)]
pub struct ToolRendererRegistry {
    renderers: Vec<ToolRenderer>,
}

impl ToolRendererRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a renderer, replacing any earlier one with the same name.
    pub fn register(&mut self, renderer: ToolRenderer) -> &mut Self {
        match self
            .renderers
            .iter_mut()
            .find(|existing| existing.name == renderer.name)
        {
            Some(existing) => *existing = renderer,
            None => self.renderers.push(renderer),
        }
        self
    }

    /// Builder-style registration.
    pub fn with(mut self, renderer: ToolRenderer) -> Self {
        self.register(renderer);
        self
    }

    pub fn get(&self, name: &str) -> Option<&ToolRenderer> {
        self.renderers.iter().find(|renderer| renderer.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Registered tool names, in registration order.
    pub fn names(&self) -> Vec<&str> {
        self.renderers
            .iter()
            .map(|renderer| renderer.name.as_str())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.renderers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.renderers.is_empty()
    }

    /// Render a call, or `None` when no renderer is registered for `name`.
    pub fn render(&self, name: &str, args: &Value, result: Option<&Value>) -> Option<Card> {
        self.get(name).map(|renderer| renderer.render(args, result))
    }

    /// Parameter schema of a registered tool.
    pub fn parameters_schema(&self, name: &str) -> Option<Value> {
        self.get(name).map(ToolRenderer::parameters_schema)
    }

    /// Registry with a renderer for every supply chain tool the agents
    /// expose to the conversation.
    pub fn supply_chain() -> Self {
        Self::new()
            .with(ToolRenderer::new(
                ToolName::ForecastDemand.as_str(),
                "Demand forecasting tool",
                vec![
                    ParameterSpec::required("product_sku", "string"),
                    ParameterSpec::required("region", "string"),
                ],
                |args, result| render_payload(ToolName::ForecastDemand, args, result),
            ))
            .with(ToolRenderer::new(
                ToolName::OptimizeInventory.as_str(),
                "Inventory optimization",
                vec![
                    ParameterSpec::required("product_sku", "string"),
                    ParameterSpec::required("region", "string"),
                    ParameterSpec::required("forecasted_demand", "number"),
                ],
                |args, result| render_payload(ToolName::OptimizeInventory, args, result),
            ))
            .with(ToolRenderer::new(
                ToolName::TransferToAgent.as_str(),
                "Agent transfered",
                vec![ParameterSpec::required("agent_name", "string")],
                |args, result| render_payload(ToolName::TransferToAgent, args, result),
            ))
            .with(ToolRenderer::new(
                ToolName::NegotiateWithVendor.as_str(),
                "Vendor negotiation",
                vec![
                    ParameterSpec::required("product_sku", "string"),
                    ParameterSpec::required("quantity", "number"),
                ],
                |args, result| render_payload(ToolName::NegotiateWithVendor, args, result),
            ))
            .with(ToolRenderer::new(
                ToolName::PlanDeliveryRoute.as_str(),
                "Route planning",
                vec![ParameterSpec::required("transfers", "object[]")],
                |args, result| render_payload(ToolName::PlanDeliveryRoute, args, result),
            ))
            .with(ToolRenderer::new(
                ToolName::SendSupplyAlerts.as_str(),
                "Supply alerts",
                vec![
                    ParameterSpec::required("event_description", "string"),
                    ParameterSpec::required("region", "string"),
                ],
                |args, result| render_payload(ToolName::SendSupplyAlerts, args, result),
            ))
            .with(ToolRenderer::new(
                ToolName::ListAllProducts.as_str(),
                "List all products in the supply chain",
                Vec::new(),
                |args, result| render_payload(ToolName::ListAllProducts, args, result),
            ))
    }
}

fn render_payload(tool: ToolName, args: &Value, result: Option<&Value>) -> Card {
    let payload = ToolPayload::decode(tool.as_str(), args, result);
    match payload {
        ToolPayload::ForecastDemand {
            product_sku,
            region,
            result,
        } => {
            let bold = Style::default().add_modifier(Modifier::BOLD);
            let mut body = vec![Line::from(vec![
                Span::raw("SKU: "),
                Span::styled(or_placeholder(product_sku), bold),
                Span::raw(" | Region: "),
                Span::styled(or_placeholder(region), bold),
            ])];
            body.extend(json_lines(result.as_ref()));
            Card::new(DEMAND_FORECAST_TITLE, body)
        }
        ToolPayload::OptimizeInventory { result } => {
            Card::new(INVENTORY_TITLE, json_lines(result.as_ref()))
        }
        ToolPayload::TransferToAgent { agent_name } => Card::new(
            TRANSFER_TITLE,
            vec![Line::from(vec![
                Span::raw("Agent: "),
                Span::styled(
                    or_placeholder(agent_name),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
            ])],
        ),
        ToolPayload::NegotiateWithVendor { result } => {
            Card::new(VENDOR_TITLE, json_lines(result.as_ref()))
        }
        ToolPayload::PlanDeliveryRoute { result } => {
            Card::new(ROUTING_TITLE, json_lines(result.as_ref()))
        }
        ToolPayload::SendSupplyAlerts { result } => {
            Card::new(ALERT_TITLE, json_lines(result.as_ref()))
        }
        ToolPayload::ListAllProducts { products, result } => {
            let mut body = vec![Line::from(format!("Products: {}", products.len()))];
            body.extend(json_lines(result.as_ref()));
            Card::new(CATALOG_TITLE, body)
        }
        ToolPayload::Unrecognized { name, result, .. } => {
            Card::new(format!("🔧 {}", name), json_lines(result.as_ref()))
        }
    }
}

fn json_lines(value: Option<&Value>) -> Vec<Line<'static>> {
    pretty_json(value).into_iter().map(Line::from).collect()
}
