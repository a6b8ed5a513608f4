//! Main render function for the console.

use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::Frame;

use supplynet_tui_components::{
    ChatWidget, Footer, Header, HeaderStat, InputBox, StatusIndicator, WorkflowDebugger,
};

use crate::app::App;
use crate::event::FeedStatus;
use crate::state::Focus;

const HELP: &str = concat!(
    "q/Esc quit | Tab focus | ↑↓ select | ",
    "Enter/Space expand | w workflow | p pause"
);

/// Render the entire UI.
pub fn render(frame: &mut Frame, app: &App) {
    let [header_area, body_area, footer_area] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Fill(1),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    render_header(frame, header_area, app);

    if app.state.show_workflow {
        let [chat_area, workflow_area] =
            Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)])
                .areas(body_area);
        render_chat(frame, chat_area, app);
        render_workflow(frame, workflow_area, app);
    } else {
        render_chat(frame, body_area, app);
    }

    Footer::new(HELP)
        .status(app.state.status_message.as_deref())
        .theme(app.theme.clone())
        .render(frame, footer_area);
}

fn render_header(frame: &mut Frame, area: Rect, app: &App) {
    let status = match app.state.feed_status {
        FeedStatus::Streaming | FeedStatus::Following => {
            StatusIndicator::success(app.state.feed_status.label())
        }
        FeedStatus::Paused => StatusIndicator::warning(app.state.feed_status.label()),
        FeedStatus::Idle | FeedStatus::Ended => {
            StatusIndicator::new(app.state.feed_status.label(), app.theme.muted)
        }
    };

    let (done, total) = app.state.workflow.progress();
    Header::new(&app.config.title)
        .status(status)
        .stat(HeaderStat::new("Steps", format!("{}/{}", done, total)))
        .stat(HeaderStat::new(
            "Trace",
            app.state.workflow.timeline_len().to_string(),
        ))
        .theme(app.theme.clone())
        .render(frame, area);
}

fn render_chat(frame: &mut Frame, area: Rect, app: &App) {
    let [transcript_area, input_area] =
        Layout::vertical([Constraint::Fill(1), Constraint::Length(3)]).areas(area);

    ChatWidget::new(&app.state.transcript, &app.registry)
        .title(app.config.chat_title.as_str())
        .instructions(&app.config.instructions)
        .greeting(&app.config.greeting)
        .card_states(&app.state.card_states)
        .selected_card(app.state.selected_card)
        .focused(app.state.focus == Focus::Chat)
        .theme(app.theme.clone())
        .render(frame, transcript_area);

    InputBox::new(&app.state.input)
        .cursor(app.state.input_cursor)
        .placeholder(&app.config.placeholder)
        .focused(app.state.focus == Focus::Input)
        .theme(app.theme.clone())
        .render(frame, input_area);
}

fn render_workflow(frame: &mut Frame, area: Rect, app: &App) {
    WorkflowDebugger::new(&app.state.workflow)
        .entry_states(&app.state.trace_states)
        .selected(app.state.selected_trace)
        .scroll(app.state.workflow_scroll)
        .focused(app.state.focus == Focus::Workflow)
        .theme(app.theme.clone())
        .render(frame, area);
}
