//! Button bar: Long / Short / Next Step with the step counter.

use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::app::{AppState, Button};

pub fn render(f: &mut Frame, area: Rect, app: &AppState) {
    let theme = &app.theme;
    let state = app.state();
    // Entry buttons stay pressable but do nothing once a position exists.
    let entry_locked = state.entry().is_some() || state.pending().is_some();

    let button = |key: &str, button: Button, color, disabled: bool| {
        let style = if disabled {
            theme.disabled_style()
        } else {
            Style::default().fg(color).add_modifier(Modifier::BOLD)
        };
        Span::styled(format!(" [{key}] {} ", button.label()), style)
    };

    let mut spans = vec![
        button("l", Button::Long, theme.positive, entry_locked),
        Span::raw("  "),
        button("s", Button::Short, theme.negative, entry_locked),
        Span::raw("  "),
        button("n", Button::NextStep, theme.accent, app.next_step_disabled()),
        Span::raw("   "),
        Span::styled(
            format!(
                "Step {}/{}",
                state.step_count(),
                app.session().rules().step_cap
            ),
            theme.muted_style(),
        ),
    ];

    if let Some(entry) = state.entry() {
        spans.push(Span::raw("   "));
        spans.push(Span::styled(
            format!("{} @ {:.2}", entry.direction, entry.price),
            Style::default().fg(theme.direction_color(entry.direction)),
        ));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.accent_style())
        .title(" StepLab ")
        .title_style(theme.accent_bold());

    f.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}
