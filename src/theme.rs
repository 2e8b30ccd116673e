use std::sync::OnceLock;

use ratatui::style::{Color, Modifier, Style};
use serde::Deserialize;

use crate::booking::ChannelClass;

static THEME: OnceLock<Theme> = OnceLock::new();

/// Install the theme built from the config file. Only the first call wins.
pub fn init(theme: Theme) {
    let _ = THEME.set(theme);
}

/// Get the active theme, falling back to the default when none was installed.
pub fn current() -> &'static Theme {
    THEME.get_or_init(Theme::default)
}

// Const fallbacks used in places that need compile-time styles
pub const DIM_STYLE: Style = Style::new().fg(Color::DarkGray);

#[derive(Debug, Clone)]
pub struct Theme {
    pub name: String,
    pub today: Style,
    pub selected: Style,
    pub header: Style,
    pub dim: Style,
    pub border: Style,
    pub status: Style,
    pub error: Style,
    pub airbnb: Color,
    pub booking: Color,
    pub direct: Color,
    pub other: Color,
}

/// The handful of colours a preset is built from.
struct Palette {
    name: &'static str,
    text: Color,
    muted: Color,
    surface: Color,
    today: Color,
    selected: Color,
    error: Color,
    airbnb: Color,
    booking: Color,
    direct: Color,
    other: Color,
}

impl From<Palette> for Theme {
    fn from(p: Palette) -> Self {
        Self {
            name: p.name.to_string(),
            today: Style::default().fg(Color::Black).bg(p.today),
            selected: Style::default().fg(Color::Black).bg(p.selected),
            header: Style::default().fg(p.text).add_modifier(Modifier::BOLD),
            dim: Style::default().fg(p.muted),
            border: Style::default().fg(p.surface),
            status: Style::default().fg(p.text).bg(p.surface),
            error: Style::default().fg(p.error).add_modifier(Modifier::BOLD),
            airbnb: p.airbnb,
            booking: p.booking,
            direct: p.direct,
            other: p.other,
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        let mut theme = Theme::from(Palette {
            name: "default",
            text: Color::White,
            muted: Color::DarkGray,
            surface: Color::DarkGray,
            today: Color::Yellow,
            selected: Color::Cyan,
            error: Color::LightRed,
            airbnb: Color::Rgb(255, 90, 95),
            booking: Color::Rgb(0, 53, 128),
            direct: Color::Rgb(16, 185, 129),
            other: Color::Rgb(102, 126, 234),
        });
        theme.border = Style::default().fg(Color::Gray);
        theme
    }
}

impl Theme {
    /// Get a built-in preset by name. Unknown names give the default theme.
    pub fn preset(name: &str) -> Self {
        match name {
            "dracula" => Palette {
                name: "dracula",
                text: Color::Rgb(248, 248, 242),
                muted: Color::Rgb(98, 114, 164),
                surface: Color::Rgb(68, 71, 90),
                today: Color::Rgb(189, 147, 249),
                selected: Color::Rgb(139, 233, 253),
                error: Color::Rgb(255, 85, 85),
                airbnb: Color::Rgb(255, 121, 198),
                booking: Color::Rgb(98, 114, 164),
                direct: Color::Rgb(80, 250, 123),
                other: Color::Rgb(189, 147, 249),
            }
            .into(),
            "gruvbox" => Palette {
                name: "gruvbox",
                text: Color::Rgb(235, 219, 178),
                muted: Color::Rgb(146, 131, 116),
                surface: Color::Rgb(80, 73, 69),
                today: Color::Rgb(250, 189, 47),
                selected: Color::Rgb(131, 165, 152),
                error: Color::Rgb(251, 73, 52),
                airbnb: Color::Rgb(251, 73, 52),
                booking: Color::Rgb(69, 133, 136),
                direct: Color::Rgb(152, 151, 26),
                other: Color::Rgb(177, 98, 134),
            }
            .into(),
            "nord" => Palette {
                name: "nord",
                text: Color::Rgb(229, 233, 240),
                muted: Color::Rgb(76, 86, 106),
                surface: Color::Rgb(67, 76, 94),
                today: Color::Rgb(235, 203, 139),
                selected: Color::Rgb(136, 192, 208),
                error: Color::Rgb(191, 97, 106),
                airbnb: Color::Rgb(191, 97, 106),
                booking: Color::Rgb(94, 129, 172),
                direct: Color::Rgb(163, 190, 140),
                other: Color::Rgb(180, 142, 173),
            }
            .into(),
            _ => Self::default(),
        }
    }

    /// Background colour of a booking bar.
    pub fn channel_color(&self, class: ChannelClass) -> Color {
        match class {
            ChannelClass::Airbnb => self.airbnb,
            ChannelClass::Booking => self.booking,
            ChannelClass::Direct => self.direct,
            ChannelClass::Other => self.other,
        }
    }
}

// ── TOML config types ──

/// The `[theme]` table of the config file. Colours are `#rrggbb` or a
/// terminal colour name; unparsable values are ignored.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct ThemeConfig {
    pub preset: Option<String>,
    pub today_fg: Option<String>,
    pub today_bg: Option<String>,
    pub selected_fg: Option<String>,
    pub selected_bg: Option<String>,
    pub header_fg: Option<String>,
    pub dim_fg: Option<String>,
    pub border_fg: Option<String>,
    pub status_fg: Option<String>,
    pub status_bg: Option<String>,
    pub airbnb: Option<String>,
    pub booking: Option<String>,
    pub direct: Option<String>,
    pub other: Option<String>,
}

impl ThemeConfig {
    pub fn into_theme(self) -> Theme {
        let mut theme = self
            .preset
            .as_deref()
            .map(Theme::preset)
            .unwrap_or_default();

        restyle(&mut theme.today, self.today_fg.as_deref(), self.today_bg.as_deref());
        restyle(&mut theme.selected, self.selected_fg.as_deref(), self.selected_bg.as_deref());
        restyle(&mut theme.header, self.header_fg.as_deref(), None);
        restyle(&mut theme.dim, self.dim_fg.as_deref(), None);
        restyle(&mut theme.border, self.border_fg.as_deref(), None);
        restyle(&mut theme.status, self.status_fg.as_deref(), self.status_bg.as_deref());

        recolor(&mut theme.airbnb, self.airbnb.as_deref());
        recolor(&mut theme.booking, self.booking.as_deref());
        recolor(&mut theme.direct, self.direct.as_deref());
        recolor(&mut theme.other, self.other.as_deref());

        theme
    }
}

fn restyle(style: &mut Style, fg: Option<&str>, bg: Option<&str>) {
    if let Some(c) = fg.and_then(parse_color) {
        *style = style.fg(c);
    }
    if let Some(c) = bg.and_then(parse_color) {
        *style = style.bg(c);
    }
}

fn recolor(color: &mut Color, value: Option<&str>) {
    if let Some(c) = value.and_then(parse_color) {
        *color = c;
    }
}

/// Parse a color string: hex "#rrggbb", or named colors.
fn parse_color(s: &str) -> Option<Color> {
    let s = s.trim();
    if s.starts_with('#') && s.len() == 7 {
        let r = u8::from_str_radix(&s[1..3], 16).ok()?;
        let g = u8::from_str_radix(&s[3..5], 16).ok()?;
        let b = u8::from_str_radix(&s[5..7], 16).ok()?;
        return Some(Color::Rgb(r, g, b));
    }
    match s.to_lowercase().as_str() {
        "black" => Some(Color::Black),
        "red" => Some(Color::Red),
        "green" => Some(Color::Green),
        "yellow" => Some(Color::Yellow),
        "blue" => Some(Color::Blue),
        "magenta" => Some(Color::Magenta),
        "cyan" => Some(Color::Cyan),
        "white" => Some(Color::White),
        "gray" | "grey" => Some(Color::Gray),
        "darkgray" | "darkgrey" => Some(Color::DarkGray),
        "lightred" => Some(Color::LightRed),
        "lightgreen" => Some(Color::LightGreen),
        "lightyellow" => Some(Color::LightYellow),
        "lightblue" => Some(Color::LightBlue),
        "lightmagenta" => Some(Color::LightMagenta),
        "lightcyan" => Some(Color::LightCyan),
        _ => None,
    }
}
