pub mod insight;
pub mod loading;
pub mod modulator;
pub mod signal;

use ratatui::Frame;
use ratatui::layout::Rect;

use innersight_engine::{App, Screen};

use crate::theme::{Glyphs, Palette};

pub fn draw(frame: &mut Frame, app: &mut App, area: Rect, palette: &Palette, glyphs: &Glyphs) {
    match app.screen() {
        Screen::SignalSelection => signal::draw(frame, app, area, palette, glyphs),
        Screen::ModulatorSelection => modulator::draw(frame, app, area, palette, glyphs),
        Screen::Loading => loading::draw(frame, app, area, palette, glyphs),
        Screen::InsightCard => insight::draw(frame, app, area, palette, glyphs),
    }
}
