//! Top-level UI layout: button bar, chart, P&L line, status bar.

pub mod button_bar;
pub mod overlays;
pub mod status_bar;

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::app::{AppState, Overlay};
use crate::panels::CandleChartPanel;

/// Draw the entire UI.
pub fn draw(f: &mut Frame, app: &AppState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(f.area());

    button_bar::render(f, chunks[0], app);
    f.render_widget(CandleChartPanel::new(app.chart(), &app.theme), chunks[1]);
    render_pnl(f, chunks[2], app);
    status_bar::render(f, chunks[3], app);

    if app.overlay == Overlay::Help {
        overlays::render_help(f, chunks[1], &app.theme);
    }
}

/// Profit/loss line, coloured by sign. Blank until there is something to show.
fn render_pnl(f: &mut Frame, area: Rect, app: &AppState) {
    let view = app.view();
    let line = match view.pnl {
        Some(pnl) => Line::from(Span::styled(
            format!(" {}", view.pnl_text()),
            Style::default()
                .fg(app.theme.pnl_color(pnl.profit))
                .add_modifier(Modifier::BOLD),
        )),
        None => Line::from(""),
    };
    f.render_widget(Paragraph::new(line), area);
}

/// Compute a centered rect for overlays.
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::Button;
    use crate::test_helpers::test_session;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn screen(app: &AppState) -> String {
        let backend = TestBackend::new(100, 30);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| draw(f, app)).unwrap();
        let buf = terminal.backend().buffer().clone();
        let mut text = String::new();
        for y in 0..buf.area.height {
            for x in 0..buf.area.width {
                text.push_str(buf.cell((x, y)).unwrap().symbol());
            }
            text.push('\n');
        }
        text
    }

    #[test]
    fn initial_screen_has_buttons_and_no_pnl() {
        let app = AppState::new(test_session());
        let text = screen(&app);
        assert!(text.contains("[l] Long"));
        assert!(text.contains("[s] Short"));
        assert!(text.contains("[n] Next Step"));
        assert!(text.contains("Step 0/5"));
        assert!(!text.contains("Profit/Loss"));
        assert!(text.contains("BTC-USD"));
    }

    #[test]
    fn pnl_line_appears_after_next_step() {
        let mut app = AppState::new(test_session());
        app.press(Button::Long);
        app.press(Button::NextStep);
        let text = screen(&app);
        assert!(text.contains("Profit/Loss: $"));
        assert!(text.contains("Entry Price"));
        assert!(text.contains("Step 1/5"));
    }

    #[test]
    fn help_overlay_lists_keys() {
        let mut app = AppState::new(test_session());
        app.toggle_help();
        let text = screen(&app);
        assert!(text.contains("Keys"));
        assert!(text.contains("Open a long position"));
    }
}
