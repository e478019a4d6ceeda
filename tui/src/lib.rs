//! TUI rendering for Innersight using ratatui.

mod input;
mod screens;
mod theme;

pub use input::{Action, FINE_SCROLL_STEP, InputPump, apply_action, handle_events, map_key};
pub use theme::{Glyphs, Palette, glyphs, palette, spinner_frame, styles};

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Margin, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Paragraph},
};

use innersight_engine::{App, Screen};

/// Number of steps shown in the header progress indicator.
const STEPS: usize = 3;

/// Main draw function
pub fn draw(frame: &mut Frame, app: &mut App) {
    let options = app.ui_options();
    let palette = palette(options);
    let glyphs = glyphs(options);

    let bg_block = Block::default().style(Style::default().bg(palette.bg));
    frame.render_widget(bg_block, frame.area());

    let area = frame.area().inner(Margin {
        horizontal: 2,
        vertical: 1,
    });
    if area.width == 0 || area.height == 0 {
        return;
    }

    // The header steps aside while the insight is being composed.
    let body = if app.screen() == Screen::Loading {
        area
    } else {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // Header
                Constraint::Length(1), // Spacer
                Constraint::Min(1),    // Screen
            ])
            .split(area);
        draw_header(frame, app, chunks[0], &palette, &glyphs);
        chunks[2]
    };

    screens::draw(frame, app, body, &palette, &glyphs);
}

fn draw_header(frame: &mut Frame, app: &App, area: Rect, palette: &Palette, glyphs: &Glyphs) {
    let screen = app.screen();

    if matches!(screen, Screen::ModulatorSelection | Screen::InsightCard) {
        let back = Line::from(vec![
            Span::styled(glyphs.back, styles::call_to_action(palette)),
            Span::styled(" Back", styles::key_hint(palette)),
        ]);
        frame.render_widget(Paragraph::new(back), area);
    }

    frame.render_widget(
        Paragraph::new(Span::styled("Innersight", styles::heading(palette)))
            .alignment(Alignment::Center),
        area,
    );

    let step = screen.step();
    let mut segments = Vec::with_capacity(STEPS * 2);
    for i in 1..=STEPS {
        if i > 1 {
            segments.push(Span::raw(" "));
        }
        let (glyph, color) = if i <= step {
            (glyphs.step_done, palette.accent)
        } else {
            (glyphs.step_todo, palette.text_disabled)
        };
        segments.push(Span::styled(glyph, Style::default().fg(color)));
    }
    frame.render_widget(
        Paragraph::new(Line::from(segments)).alignment(Alignment::Right),
        area,
    );
}
