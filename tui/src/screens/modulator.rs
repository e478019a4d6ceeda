//! Modulator selection: a numbered list conditioned on the chosen signal.

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use innersight_engine::App;

use crate::theme::{Glyphs, Palette, styles};

pub fn draw(frame: &mut Frame, app: &App, area: Rect, palette: &Palette, glyphs: &Glyphs) {
    let modulators = app.catalog().modulators();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Eyebrow
            Constraint::Length(1), // Question
            Constraint::Length(1), // Spacer
            Constraint::Min(1),    // List
            Constraint::Length(1), // Key hints
        ])
        .split(area);

    if let Some(signal) = app.state().selected_signal() {
        frame.render_widget(
            Paragraph::new(format!("Dynamic: {signal}"))
                .style(styles::eyebrow(palette))
                .alignment(Alignment::Center),
            chunks[0],
        );
    }
    frame.render_widget(
        Paragraph::new("And what's the emotional texture?")
            .style(styles::heading(palette))
            .alignment(Alignment::Center),
        chunks[1],
    );

    let cursor = app.modulator_cursor();
    let mut lines = Vec::with_capacity(modulators.len() * 3);
    for (i, modulator) in modulators.iter().enumerate() {
        let selected = i == cursor;
        let marker = if selected { glyphs.selected } else { " " };
        let name_style = if selected {
            Style::default()
                .fg(palette.accent)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(palette.text_primary)
        };
        lines.push(Line::from(vec![
            Span::styled(format!("{marker} {}. ", i + 1), name_style),
            Span::styled(modulator.name(), name_style),
        ]));
        lines.push(Line::from(Span::styled(
            format!("     {}", modulator.description()),
            Style::default().fg(palette.text_muted),
        )));
        lines.push(Line::from(""));
    }

    // Keep the list left-aligned in a centred column.
    let list_width = lines
        .iter()
        .map(Line::width)
        .max()
        .unwrap_or(0)
        .min(usize::from(chunks[3].width)) as u16;
    let list_area = Rect {
        x: chunks[3].x + (chunks[3].width - list_width) / 2,
        width: list_width,
        ..chunks[3]
    };
    frame.render_widget(Paragraph::new(lines), list_area);

    let hint = format!(
        "{} move   Enter select   1-{} pick   Esc back   q quit",
        glyphs.arrows_vertical,
        modulators.len()
    );
    frame.render_widget(
        Paragraph::new(hint)
            .style(styles::key_hint(palette))
            .alignment(Alignment::Center),
        chunks[4],
    );
}
