use std::time::Duration;

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::Line;
use ratatui::widgets::Paragraph;

use innersight_engine::App;

use crate::theme::{Glyphs, Palette, spinner_frame, styles};

const SPINNER_INTERVAL: Duration = Duration::from_millis(80);

pub fn draw(frame: &mut Frame, app: &App, area: Rect, palette: &Palette, _glyphs: &Glyphs) {
    let tick = (app.screen_elapsed().as_millis() / SPINNER_INTERVAL.as_millis()) as usize;
    let spinner = spinner_frame(tick, app.ui_options());

    let mut lines = vec![
        Line::styled(spinner, Style::default().fg(palette.accent)),
        Line::from(""),
        Line::styled("Cultivating Clarity...", styles::heading(palette)),
    ];
    let state = app.state();
    if let (Some(signal), Some(modulator)) = (state.selected_signal(), state.selected_modulator())
    {
        lines.push(Line::styled(
            format!("Merging {modulator} with {signal}"),
            styles::eyebrow(palette),
        ));
    }

    let height = lines.len() as u16;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Fill(1),
            Constraint::Length(height),
            Constraint::Fill(1),
        ])
        .split(area);

    frame.render_widget(
        Paragraph::new(lines).alignment(Alignment::Center),
        chunks[1],
    );
}
