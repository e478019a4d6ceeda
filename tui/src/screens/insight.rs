//! Insight card. Sections appear one at a time as the card is revealed.

use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Padding, Paragraph, Wrap};

use innersight_engine::{App, Insight};

use crate::theme::{Glyphs, Palette, styles};

/// Readable line length for the card body.
const MAX_CARD_WIDTH: u16 = 72;

pub fn draw(frame: &mut Frame, app: &App, area: Rect, palette: &Palette, glyphs: &Glyphs) {
    let Some(insight) = app.state().insight() else {
        return;
    };

    let width = area.width.min(MAX_CARD_WIDTH);
    let card = Rect {
        x: area.x + (area.width - width) / 2,
        width,
        ..area
    };

    let mut lines = card_lines(insight, app.revealed_sections(), palette, glyphs);
    if app.can_begin_again() {
        lines.push(Line::from(""));
        lines.push(
            Line::from(vec![
                Span::styled("Begin Again", styles::call_to_action(palette)),
                Span::styled("  (Enter)", styles::key_hint(palette)),
            ])
            .alignment(Alignment::Center),
        );
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(palette.border))
        .style(Style::default().bg(palette.bg_card))
        .padding(Padding::new(2, 2, 1, 1));

    frame.render_widget(
        Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: false }),
        card,
    );
}

fn card_lines<'a>(
    insight: &'a Insight,
    revealed: usize,
    palette: &Palette,
    glyphs: &Glyphs,
) -> Vec<Line<'a>> {
    let body = Style::default().fg(palette.text_secondary);
    let label = Style::default()
        .fg(palette.accent)
        .add_modifier(Modifier::BOLD);

    let mut lines = Vec::new();
    if revealed >= 1 {
        lines.push(
            Line::styled(insight.title.as_str(), styles::heading(palette))
                .alignment(Alignment::Center),
        );
        lines.push(Line::from(""));
    }
    if revealed >= 2 {
        lines.push(Line::styled(
            format!(
                "{}{}{}",
                glyphs.quote_open, insight.reflection, glyphs.quote_close
            ),
            body.add_modifier(Modifier::ITALIC),
        ));
        lines.push(Line::from(""));
    }
    if revealed >= 3 {
        lines.push(Line::styled("Action", label));
        lines.push(Line::styled(insight.action_cue.as_str(), body));
        lines.push(Line::from(""));
    }
    if revealed >= 4 {
        lines.push(Line::styled("Journal Prompt", label));
        lines.push(Line::styled(insight.journal_prompt.as_str(), body));
    }
    lines
}
