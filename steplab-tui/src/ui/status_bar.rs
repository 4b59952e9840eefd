//! Bottom status bar: symbol, anchor, position, last price, status message.

use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::app::{AppState, StatusLevel};

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let theme = &app.theme;
    let session = app.session();
    let view = app.view();

    let position = match app.state().entry() {
        Some(entry) => format!("{} from {:.2}", entry.direction, entry.price),
        None => "flat".to_string(),
    };
    let last = view
        .last_price
        .map(|p| format!("{p:.2}"))
        .unwrap_or_else(|| "n/a".to_string());

    let mut spans = vec![
        Span::styled(
            format!(
                " {} | anchor {} | {} | last {}",
                session.series().symbol(),
                session.anchor().format("%Y-%m-%d %H:%M"),
                position,
                last,
            ),
            theme.muted_style(),
        ),
        Span::raw(" | "),
    ];

    if let Some((msg, level)) = &app.status_message {
        let color = match level {
            StatusLevel::Info => theme.accent,
            StatusLevel::Warning => theme.warning,
        };
        spans.push(Span::styled(msg.as_str(), Style::default().fg(color)));
    } else {
        spans.push(Span::styled("? help  q quit", theme.muted_style()));
    }

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}
