//! Signal selection: a horizontally looping carousel of dynamics.

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, Padding, Paragraph, Wrap};

use innersight_engine::{App, Signal, VisibleItem};

use crate::theme::{Glyphs, Palette, styles};

/// Cards never grow taller than this.
const CARD_HEIGHT: u16 = 8;
/// Columns left empty between neighbouring cards.
const GUTTER: f32 = 1.0;

pub fn draw(frame: &mut Frame, app: &mut App, area: Rect, palette: &Palette, glyphs: &Glyphs) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Title
            Constraint::Length(1), // Spacer
            Constraint::Min(3),    // Carousel
            Constraint::Length(1), // Spacer
            Constraint::Length(1), // Call to action
            Constraint::Length(1), // Dots
            Constraint::Length(1), // Key hints
        ])
        .split(area);

    frame.render_widget(
        Paragraph::new("What's the primary dynamic?")
            .style(styles::heading(palette))
            .alignment(Alignment::Center),
        chunks[0],
    );

    // Geometry is recomputed from the width actually rendered.
    app.measure_carousel(chunks[2].width);
    draw_carousel(frame, app, chunks[2], palette);

    if let Some(signal) = app.carousel().select_active() {
        let cta = Line::from(vec![
            Span::styled(format!("Select {}", signal.name()), styles::call_to_action(palette)),
            Span::styled("  (Enter)", styles::key_hint(palette)),
        ]);
        frame.render_widget(Paragraph::new(cta).alignment(Alignment::Center), chunks[4]);
    }

    draw_dots(frame, app, chunks[5], palette, glyphs);

    let hint = format!("{} browse   Enter select   q quit", glyphs.arrows_horizontal);
    frame.render_widget(
        Paragraph::new(hint)
            .style(styles::key_hint(palette))
            .alignment(Alignment::Center),
        chunks[6],
    );
}

fn draw_carousel(frame: &mut Frame, app: &App, area: Rect, palette: &Palette) {
    let carousel = app.carousel();
    let Some(item_width) = carousel.item_width() else {
        return;
    };

    let height = area.height.min(CARD_HEIGHT);
    let band = Rect {
        x: area.x,
        y: area.y + (area.height - height) / 2,
        width: area.width,
        height,
    };

    for item in carousel.visible_items() {
        let Some(signal) = carousel.items().get(item.index) else {
            continue;
        };
        if let Some(slot) = card_slot(band, &item, item_width) {
            draw_card(frame, signal, slot, item.is_active, palette);
        }
    }
}

/// Where a card lands once clipped to the band.
struct CardSlot {
    rect: Rect,
    clipped_left: bool,
    clipped_right: bool,
}

fn card_slot(band: Rect, item: &VisibleItem, item_width: f32) -> Option<CardSlot> {
    let band_width = f32::from(band.width);
    let left = item.center - item_width / 2.0 + GUTTER;
    let right = item.center + item_width / 2.0 - GUTTER;

    let x0 = left.max(0.0).round() as u16;
    let x1 = right.min(band_width).round() as u16;
    if x1 <= x0.saturating_add(1) {
        return None;
    }

    Some(CardSlot {
        rect: Rect {
            x: band.x + x0,
            y: band.y,
            width: x1 - x0,
            height: band.height,
        },
        clipped_left: left < 0.0,
        clipped_right: right > band_width,
    })
}

fn draw_card(frame: &mut Frame, signal: &Signal, slot: CardSlot, active: bool, palette: &Palette) {
    let (fg, border) = if active {
        (palette.text_primary, palette.accent)
    } else {
        (palette.text_disabled, palette.text_disabled)
    };

    let mut borders = Borders::TOP | Borders::BOTTOM;
    if !slot.clipped_left {
        borders |= Borders::LEFT;
    }
    if !slot.clipped_right {
        borders |= Borders::RIGHT;
    }

    let block = Block::default()
        .borders(borders)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(border))
        .style(Style::default().bg(palette.bg_card))
        .padding(Padding::horizontal(1));

    let name_style = if active {
        Style::default().fg(fg).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(fg)
    };
    let lines = vec![
        Line::from(Span::styled(signal.name(), name_style)),
        Line::from(""),
        Line::from(Span::styled(
            signal.description(),
            Style::default().fg(if active { palette.text_secondary } else { fg }),
        )),
    ];

    frame.render_widget(
        Paragraph::new(lines)
            .block(block)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true }),
        slot.rect,
    );
}

fn draw_dots(frame: &mut Frame, app: &App, area: Rect, palette: &Palette, glyphs: &Glyphs) {
    let active = app.carousel().active_index();
    let mut spans = Vec::new();
    for i in 0..app.carousel().len() {
        if i > 0 {
            spans.push(Span::raw(" "));
        }
        if Some(i) == active {
            spans.push(Span::styled(glyphs.dot_active, Style::default().fg(palette.accent)));
        } else {
            spans.push(Span::styled(glyphs.dot_inactive, styles::dimmed(palette)));
        }
    }
    frame.render_widget(
        Paragraph::new(Line::from(spans)).alignment(Alignment::Center),
        area,
    );
}
