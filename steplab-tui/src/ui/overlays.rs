//! Help overlay.

use ratatui::layout::Rect;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

use crate::theme::Theme;
use crate::ui::centered_rect;

pub fn render_help(f: &mut Frame, area: Rect, theme: &Theme) {
    let popup = centered_rect(70, 80, area);
    f.render_widget(Clear, popup);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.accent_style())
        .title(" Help ")
        .title_style(theme.accent_bold());

    let mut lines: Vec<Line> = Vec::new();
    section(&mut lines, theme, "Keys");
    key(&mut lines, theme, "l", "Open a long position at the last price");
    key(&mut lines, theme, "s", "Open a short position at the last price");
    key(&mut lines, theme, "n / Enter / Space", "Advance the window one step");
    key(&mut lines, theme, "?", "Toggle this help");
    key(&mut lines, theme, "q / Ctrl-C", "Quit");
    lines.push(Line::from(""));
    section(&mut lines, theme, "Rules");
    lines.push(Line::from(Span::styled(
        "  One entry per session. Next Step slides the window forward until the step limit.",
        theme.muted_style(),
    )));

    let para = Paragraph::new(lines).block(block).wrap(Wrap { trim: true });
    f.render_widget(para, popup);
}

fn section<'a>(lines: &mut Vec<Line<'a>>, theme: &Theme, title: &str) {
    lines.push(Line::from(Span::styled(title.to_string(), theme.accent_bold())));
}

fn key<'a>(lines: &mut Vec<Line<'a>>, theme: &Theme, keys: &str, desc: &str) {
    lines.push(Line::from(vec![
        Span::styled(format!("  {:>18}  ", keys), theme.accent_style()),
        Span::styled(desc.to_string(), theme.muted_style()),
    ]));
}
