//! Workflow debugger: a pure projection of the shared agent state.
//!
//! [`WorkflowView::project`] derives everything shown from one snapshot and
//! nothing else, so the same snapshot always yields the same view. The
//! [`WorkflowDebugger`] widget only lays that view out; the expansion state
//! of timeline entries belongs to the caller.

use ratatui::layout::Rect;
use ratatui::style::Modifier;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;
use unicode_width::UnicodeWidthStr;

use supplynet_core::{AgentState, Step, WorkflowState};

use crate::theme::Theme;
use crate::utils::{number_or_placeholder, or_placeholder, pad_to_width, pretty_json, truncate};
use crate::widgets::card::CardState;

pub const WAITING_MESSAGE: &str = "Waiting for workflow to start...";
pub const WORKFLOW_TITLE: &str = "Supply Chain Workflow";
pub const TIMELINE_TITLE: &str = "Execution Timeline";

/// Everything the debugger shows for one snapshot.
#[derive(Debug, Clone, PartialEq)]
pub enum WorkflowView {
    /// The pipeline has not started.
    Waiting,
    Active(WorkflowProjection),
}

/// Projection of a started workflow.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowProjection {
    /// `SKU <sku> · <region> · <event>` summary.
    pub context: String,
    pub spike_detected: bool,
    pub steps: Vec<StepMarker>,
    pub panels: Vec<SummaryPanel>,
    pub timeline: Vec<TimelineEntry>,
}

/// One indexed marker in the pipeline row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StepMarker {
    pub step: Step,
    pub ordinal: usize,
    pub completed: bool,
}

/// Titled block of `label: value` rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SummaryPanel {
    pub title: &'static str,
    pub rows: Vec<String>,
}

/// One execution trace entry as displayed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimelineEntry {
    pub agent: String,
    pub tool: String,
    pub timestamp: Option<String>,
    /// Pretty-printed output, shown under "View details".
    pub details: Vec<String>,
}

/// Display for `reorder_needed`: true, explicit false and absent are
/// three different outputs.
pub fn reorder_label(reorder_needed: Option<bool>) -> &'static str {
    match reorder_needed {
        Some(true) => "Yes",
        Some(false) => "No",
        None => "-",
    }
}

impl WorkflowView {
    /// Project a snapshot. Pure: reads the snapshot, writes nothing.
    pub fn project(state: &AgentState) -> Self {
        match &state.workflow_state {
            None => Self::Waiting,
            Some(wf) => Self::Active(WorkflowProjection::from_state(wf)),
        }
    }

    pub fn is_waiting(&self) -> bool {
        matches!(self, Self::Waiting)
    }

    /// Number of timeline entries.
    pub fn timeline_len(&self) -> usize {
        match self {
            Self::Waiting => 0,
            Self::Active(projection) => projection.timeline.len(),
        }
    }

    /// Completed steps out of the pipeline length.
    pub fn progress(&self) -> (usize, usize) {
        match self {
            Self::Waiting => (0, Step::ALL.len()),
            Self::Active(projection) => (
                projection.steps.iter().filter(|m| m.completed).count(),
                projection.steps.len(),
            ),
        }
    }
}

impl WorkflowProjection {
    fn from_state(wf: &WorkflowState) -> Self {
        let steps = Step::ALL
            .into_iter()
            .map(|step| StepMarker {
                step,
                ordinal: step.ordinal(),
                completed: step.is_completed(wf),
            })
            .collect();

        let panels = vec![
            SummaryPanel {
                title: "📈 Demand",
                rows: vec![
                    format!("Peak: {} units", number_or_placeholder(wf.peak_demand)),
                    format!("7 Day: {}", number_or_placeholder(wf.total_7day_demand)),
                    format!("Confidence: {}", number_or_placeholder(wf.confidence)),
                ],
            },
            SummaryPanel {
                title: "📦 Inventory",
                rows: vec![
                    format!("Gap: {}", number_or_placeholder(wf.gap_size)),
                    format!("Reorder: {}", reorder_label(wf.reorder_needed)),
                ],
            },
            SummaryPanel {
                title: "🏭 Vendor",
                rows: vec![
                    format!("PO: {}", or_placeholder(wf.po_number.as_deref())),
                    format!("Vendor: {}", or_placeholder(wf.vendor_name.as_deref())),
                ],
            },
            SummaryPanel {
                title: "🚚 Routing",
                rows: vec![
                    format!("Routes: {}", wf.route_count()),
                    format!("Status: {}", or_placeholder(wf.alert_severity.as_deref())),
                ],
            },
        ];

        let timeline = wf
            .execution_trace
            .iter()
            .map(|entry| TimelineEntry {
                agent: entry.agent.clone(),
                tool: entry.tool.clone(),
                timestamp: entry.timestamp.clone(),
                details: pretty_json(Some(&entry.output)),
            })
            .collect();

        Self {
            context: format!(
                "SKU {} · {} · {}",
                or_placeholder(wf.product_sku.as_deref()),
                or_placeholder(wf.region.as_deref()),
                or_placeholder(wf.event_type.as_deref()),
            ),
            spike_detected: wf.spike_detected == Some(true),
            steps,
            panels,
            timeline,
        }
    }
}

/// Widget laying out a [`WorkflowView`].
#[derive(Debug, Clone)]
pub struct WorkflowDebugger<'a> {
    view: &'a WorkflowView,
    /// Expansion state per timeline entry; missing entries are collapsed.
    entry_states: &'a [CardState],
    selected: Option<usize>,
    /// Scroll offset (usize::MAX = follow the selection).
    scroll: usize,
    focused: bool,
    theme: Theme,
}

impl<'a> WorkflowDebugger<'a> {
    pub fn new(view: &'a WorkflowView) -> Self {
        Self {
            view,
            entry_states: &[],
            selected: None,
            scroll: usize::MAX,
            focused: false,
            theme: Theme::default(),
        }
    }

    /// Set per-entry expansion state.
    pub fn entry_states(mut self, states: &'a [CardState]) -> Self {
        self.entry_states = states;
        self
    }

    /// Highlight a timeline entry.
    pub fn selected(mut self, selected: Option<usize>) -> Self {
        self.selected = selected;
        self
    }

    /// Set the scroll offset (in lines). `usize::MAX` keeps the selected
    /// entry in view, or the top when nothing is selected.
    pub fn scroll(mut self, offset: usize) -> Self {
        self.scroll = offset;
        self
    }

    /// Set whether the widget is focused.
    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    /// Set the theme.
    pub fn theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    /// All lines of the debugger for the given inner width.
    pub fn lines(&self, width: usize) -> Vec<Line<'static>> {
        self.build(width).0
    }

    /// Lines plus the index of the selected timeline entry's header line.
    fn build(&self, width: usize) -> (Vec<Line<'static>>, Option<usize>) {
        let projection = match self.view {
            WorkflowView::Waiting => {
                let waiting = Line::from(Span::styled(WAITING_MESSAGE, self.theme.muted_style()));
                return (vec![waiting], None);
            }
            WorkflowView::Active(projection) => projection,
        };

        let mut lines = Vec::new();

        let mut context = vec![Span::styled(
            projection.context.clone(),
            self.theme.muted_style(),
        )];
        if projection.spike_detected {
            context.push(Span::raw("  "));
            context.push(Span::styled("▲ spike", self.theme.warning_style()));
        }
        lines.push(Line::from(context));
        lines.push(Line::from(""));

        lines.push(self.pipeline_line(projection));
        lines.push(Line::from(""));

        lines.extend(self.panel_lines(projection, width));
        lines.push(Line::from(""));

        lines.push(Line::from(Span::styled(TIMELINE_TITLE, self.theme.bold())));
        let timeline_start = lines.len();
        let (timeline, selected_line) = self.timeline_lines(projection, width);
        lines.extend(timeline);

        (lines, selected_line.map(|line| timeline_start + line))
    }

    fn pipeline_line(&self, projection: &WorkflowProjection) -> Line<'static> {
        let mut spans = Vec::new();
        for (i, marker) in projection.steps.iter().enumerate() {
            if i > 0 {
                spans.push(Span::styled(" ── ", self.theme.muted_style()));
            }
            let (badge, style) = if marker.completed {
                (
                    format!("(✓{})", marker.ordinal),
                    self.theme.success_style().add_modifier(Modifier::BOLD),
                )
            } else {
                (format!("({})", marker.ordinal), self.theme.muted_style())
            };
            spans.push(Span::styled(badge, style));
            spans.push(Span::raw(format!(" {}", marker.step.label())));
        }
        Line::from(spans)
    }

    /// Panels two per row; a single column when the area is narrow.
    fn panel_lines(&self, projection: &WorkflowProjection, width: usize) -> Vec<Line<'static>> {
        let column_width = width / 2;
        let widest = projection
            .panels
            .iter()
            .flat_map(|panel| {
                let rows = panel.rows.iter().map(|row| row.width());
                std::iter::once(panel.title.width()).chain(rows)
            })
            .max()
            .unwrap_or(0);

        let mut lines = Vec::new();

        if column_width < widest + 2 {
            for panel in &projection.panels {
                lines.push(Line::from(Span::styled(panel.title, self.theme.bold())));
                for row in &panel.rows {
                    lines.push(Line::from(format!("  {}", row)));
                }
            }
            return lines;
        }

        for pair in projection.panels.chunks(2) {
            let left = &pair[0];
            let right = pair.get(1);

            lines.push(Line::from(vec![
                Span::styled(pad_to_width(left.title, column_width), self.theme.bold()),
                Span::styled(
                    right.map(|panel| panel.title).unwrap_or_default(),
                    self.theme.bold(),
                ),
            ]));

            let height = left.rows.len().max(right.map_or(0, |panel| panel.rows.len()));
            for row in 0..height {
                let left_text = left.rows.get(row).map(String::as_str).unwrap_or("");
                let right_text = right
                    .and_then(|panel| panel.rows.get(row))
                    .cloned()
                    .unwrap_or_default();
                lines.push(Line::from(vec![
                    Span::raw(pad_to_width(&format!("  {}", left_text), column_width)),
                    Span::raw(format!("  {}", right_text)),
                ]));
            }
        }

        lines
    }

    fn timeline_lines(
        &self,
        projection: &WorkflowProjection,
        width: usize,
    ) -> (Vec<Line<'static>>, Option<usize>) {
        let mut lines = Vec::new();
        let mut selected_line = None;

        for (i, entry) in projection.timeline.iter().enumerate() {
            let expanded = self
                .entry_states
                .get(i)
                .map_or(false, CardState::is_expanded);
            let selected = self.selected == Some(i);

            let agent_style = if selected {
                selected_line = Some(lines.len());
                self.theme.selected_style()
            } else {
                self.theme.bold()
            };
            let agent = if entry.agent.is_empty() {
                "-".to_string()
            } else {
                truncate(&entry.agent, width.saturating_sub(4))
            };

            let mut header = vec![Span::styled(agent, agent_style)];
            if let Some(timestamp) = &entry.timestamp {
                header.push(Span::raw("  "));
                header.push(Span::styled(timestamp.clone(), self.theme.muted_style()));
            }
            lines.push(Line::from(header));

            lines.push(Line::from(vec![
                Span::raw("  🔧 "),
                Span::styled(entry.tool.clone(), self.theme.tool_style()),
            ]));

            let glyph = if expanded { "▾" } else { "▸" };
            lines.push(Line::from(Span::styled(
                format!("  {} View details", glyph),
                self.theme.muted_style(),
            )));
            if expanded {
                for detail in &entry.details {
                    lines.push(Line::from(format!("    {}", detail)));
                }
            }
        }

        (lines, selected_line)
    }

    /// Render the widget.
    pub fn render(self, frame: &mut Frame, area: Rect) {
        let border_style = if self.focused {
            self.theme.focused_border()
        } else {
            self.theme.unfocused_border()
        };

        let visible_height = area.height.saturating_sub(2) as usize;
        let text_width = area.width.saturating_sub(2) as usize;

        let (all_lines, selected_line) = self.build(text_width);
        let max_scroll = all_lines.len().saturating_sub(visible_height);
        let scroll_offset = match (self.scroll, selected_line) {
            (usize::MAX, Some(line)) => line.saturating_sub(visible_height / 3).min(max_scroll),
            (usize::MAX, None) => 0,
            (offset, _) => offset.min(max_scroll),
        };

        let lines: Vec<Line> = all_lines
            .into_iter()
            .skip(scroll_offset)
            .take(visible_height)
            .collect();

        let (done, total) = self.view.progress();
        let title = format!(" {} [{}/{}] ", WORKFLOW_TITLE, done, total);

        let paragraph = Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style)
                .title(title),
        );

        frame.render_widget(paragraph, area);
    }
}
