//! Shared presentation helpers: status line, toasts, badges, cards.

use crate::app::{Toast, ToastKind};
use ledgerwatch_core::model::Stakeholder;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style, Stylize};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

/// Bottom status line: the most recent toast wins, the key help otherwise.
pub fn render_status_line(frame: &mut Frame, area: Rect, toast: Option<&Toast>, help: &str) {
    let line = match toast {
        Some(toast) => {
            let style = match toast.kind {
                ToastKind::Info => Style::new().fg(Color::Green),
                ToastKind::Error => Style::new().fg(Color::Red),
            };
            Line::from(vec![
                Span::styled(
                    match toast.kind {
                        ToastKind::Info => " ✓ ",
                        ToastKind::Error => " ✗ ",
                    },
                    style,
                ),
                Span::styled(toast.text.clone(), style),
                Span::raw("  (x to dismiss)").dim(),
            ])
        }
        None => Line::from(help).dim(),
    };
    frame.render_widget(Paragraph::new(line), area);
}

/// Colored status badge text for a stakeholder row.
pub fn stakeholder_badge(stakeholder: &Stakeholder) -> Span<'static> {
    let label = stakeholder.status_label();
    let color = if stakeholder.tokens_distributed {
        Color::Green
    } else if stakeholder.is_ready() {
        Color::Yellow
    } else {
        Color::Red
    };
    Span::styled(label, Style::new().fg(color))
}

pub fn yes_no(flag: bool) -> Span<'static> {
    if flag {
        Span::styled("yes", Style::new().fg(Color::Green))
    } else {
        Span::styled("no", Style::new().fg(Color::Red))
    }
}

/// Bordered card with a dim title, content rendered inside.
pub fn card(title: &str) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .title(Line::from(title.to_string()).dim())
}

/// Centered placeholder for loading and empty states.
pub fn render_notice(frame: &mut Frame, area: Rect, text: &str) {
    let block = Block::default().borders(Borders::ALL);
    let inner = block.inner(area);
    frame.render_widget(block, area);
    let paragraph = Paragraph::new(Line::from(text.to_string()).dim().centered());
    frame.render_widget(paragraph, inner);
}
