use ratatui::style::{Color, Style};
use ratatui::style::Stylize;

const PHASE_COLORS: [Color; 7] = [
    Color::Red,
    Color::LightRed,
    Color::Yellow,
    Color::Green,
    Color::Cyan,
    Color::Blue,
    Color::Magenta,
];

pub fn title_style() -> Style { Style::default().fg(Color::Cyan).bold() }
pub fn hint_style() -> Style { Style::default().fg(Color::DarkGray) }
pub fn status_style() -> Style { Style::default().fg(Color::Yellow).bold() }
pub fn footer_style() -> Style { Style::default().fg(Color::Gray) }

/// Badge colour for a phase; phases past the palette reuse the last colour.
pub fn phase_color(phase: u32) -> Color {
    PHASE_COLORS[(phase as usize).min(PHASE_COLORS.len() - 1)]
}

pub fn phase_style(phase: u32) -> Style { Style::default().fg(Color::Black).bg(phase_color(phase)).bold() }
