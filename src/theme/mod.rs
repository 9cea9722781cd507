mod context;

pub use context::ThemeContext;

use std::fmt;
use std::sync::LazyLock;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb
{
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb
{
    pub const fn new(r: u8, g: u8, b: u8) -> Self
    {
        Self { r, g, b }
    }

    /// Accepts `#RRGGBB` or `RRGGBB`, case-insensitive.
    pub fn parse_hex(value: &str) -> Option<Self>
    {
        let hex = value.trim();
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if hex.len() != 6 || !hex.chars().all(|ch| ch.is_ascii_hexdigit()) {
            return None;
        }
        let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&hex[range], 16).ok();
        Some(Self {
            r: channel(0..2)?,
            g: channel(2..4)?,
            b: channel(4..6)?,
        })
    }

    pub fn to_hex(self) -> String
    {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    pub fn fg(self) -> String
    {
        format!("\x1b[38;2;{};{};{}m", self.r, self.g, self.b)
    }

    pub fn bg(self) -> String
    {
        format!("\x1b[48;2;{};{};{}m", self.r, self.g, self.b)
    }
}

impl fmt::Display for Rgb
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        f.write_str(&self.to_hex())
    }
}

/// Presentation attributes shared by every game. Games read it, never write it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Theme
{
    pub name: String,
    pub background: Rgb,
    pub primary: Rgb,
    pub secondary: Rgb,
    pub text: Rgb,
    pub font_family: String,
    pub glyph: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ThemeField
{
    Background,
    Primary,
    Secondary,
    Text,
    Font,
    Glyph,
}

impl ThemeField
{
    pub const ALL: [ThemeField; 6] = [
        ThemeField::Background,
        ThemeField::Primary,
        ThemeField::Secondary,
        ThemeField::Text,
        ThemeField::Font,
        ThemeField::Glyph,
    ];

    pub fn label(self) -> &'static str
    {
        match self {
            ThemeField::Background => "Background color",
            ThemeField::Primary => "Primary color",
            ThemeField::Secondary => "Secondary color",
            ThemeField::Text => "Text color",
            ThemeField::Font => "Font family",
            ThemeField::Glyph => "Decorative glyph",
        }
    }

    pub fn is_color(self) -> bool
    {
        !matches!(self, ThemeField::Font | ThemeField::Glyph)
    }

    pub fn value(self, theme: &Theme) -> String
    {
        match self {
            ThemeField::Background => theme.background.to_hex(),
            ThemeField::Primary => theme.primary.to_hex(),
            ThemeField::Secondary => theme.secondary.to_hex(),
            ThemeField::Text => theme.text.to_hex(),
            ThemeField::Font => theme.font_family.clone(),
            ThemeField::Glyph => theme.glyph.clone(),
        }
    }

    /// Writes `value` into `theme`. Colour fields only change on a parseable
    /// hex colour; returns whether the theme changed.
    pub fn set(self, theme: &mut Theme, value: &str) -> bool
    {
        let slot = match self {
            ThemeField::Background => &mut theme.background,
            ThemeField::Primary => &mut theme.primary,
            ThemeField::Secondary => &mut theme.secondary,
            ThemeField::Text => &mut theme.text,
            ThemeField::Font => {
                theme.font_family = value.to_string();
                return true;
            }
            ThemeField::Glyph => {
                theme.glyph = value.to_string();
                return true;
            }
        };
        match Rgb::parse_hex(value) {
            Some(color) => {
                *slot = color;
                true
            }
            None => false,
        }
    }
}

pub const DEFAULT_THEME: &str = "Classic";
pub const CREATOR_DEFAULT_THEME: &str = "Minimalist";

struct Entry
{
    name: &'static str,
    background: &'static str,
    primary: &'static str,
    secondary: &'static str,
    text: &'static str,
    font: &'static str,
    glyph: &'static str,
}

const ENTRIES: &[Entry] = &[
    Entry { name: "Classic", background: "#FFFFFF", primary: "#3498db", secondary: "#2ecc71", text: "#333333", font: "system-ui, sans-serif", glyph: "🎮" },
    Entry { name: "Valentines", background: "#FFE4E1", primary: "#FF69B4", secondary: "#FF1493", text: "#8B008B", font: "system-ui, sans-serif", glyph: "💘" },
    Entry { name: "Dark", background: "#121212", primary: "#BB86FC", secondary: "#03DAC6", text: "#FFFFFF", font: "system-ui, sans-serif", glyph: "🌙" },
    Entry { name: "Neon", background: "#000000", primary: "#00FF00", secondary: "#FF00FF", text: "#FFFFFF", font: "system-ui, sans-serif", glyph: "✨" },
    Entry { name: "Pastel", background: "#F0F4F8", primary: "#B5EAD7", secondary: "#FFB7B2", text: "#666666", font: "system-ui, sans-serif", glyph: "🍬" },
    Entry { name: "Halloween", background: "#1A1A1A", primary: "#FF6B00", secondary: "#8B00FF", text: "#FFFFFF", font: "system-ui, sans-serif", glyph: "🎃" },
    Entry { name: "Valentines Card", background: "#FFC0CB", primary: "#FF69B4", secondary: "#FFD1DC", text: "#8B0000", font: "'Dancing Script', cursive", glyph: "💝" },
    Entry { name: "Cute", background: "#FFFAF0", primary: "#FFD700", secondary: "#FFA07A", text: "#FF69B4", font: "'Comic Sans MS', cursive", glyph: "🌸" },
    Entry { name: "Birthday", background: "#FFF8DC", primary: "#FF4500", secondary: "#FFD700", text: "#8A2BE2", font: "'Fredoka One', sans-serif", glyph: "🎂" },
    Entry { name: "Retro", background: "#2E2E2E", primary: "#FF6347", secondary: "#40E0D0", text: "#FFD700", font: "'Press Start 2P', cursive", glyph: "👾" },
    Entry { name: "Futuristic", background: "#000000", primary: "#00FFFF", secondary: "#FF00FF", text: "#FFFFFF", font: "'Orbitron', sans-serif", glyph: "🤖" },
    Entry { name: "Funky", background: "#FF4500", primary: "#32CD32", secondary: "#FFD700", text: "#FFFFFF", font: "'Pacifico', cursive", glyph: "🎵" },
    Entry { name: "Dark Gothic", background: "#1C1C1C", primary: "#4B0082", secondary: "#696969", text: "#8B0000", font: "'Old English Text MT', serif", glyph: "🦇" },
    Entry { name: "Oceanic", background: "#1E3A5F", primary: "#00CED1", secondary: "#4682B4", text: "#FFFFFF", font: "'Montserrat', sans-serif", glyph: "🌊" },
    Entry { name: "Neon Cyberpunk", background: "#0D0221", primary: "#FF00FF", secondary: "#00FFFF", text: "#FFFFFF", font: "'Orbitron', sans-serif", glyph: "⚡" },
    Entry { name: "Fairy Tale", background: "#FFF0F5", primary: "#FFD700", secondary: "#FF69B4", text: "#8B008B", font: "'Caveat', cursive", glyph: "🧚" },
    Entry { name: "Minimalist", background: "#FFFFFF", primary: "#808080", secondary: "#D3D3D3", text: "#000000", font: "'Roboto', sans-serif", glyph: "◻️" },
    Entry { name: "Jungle Adventure", background: "#013220", primary: "#228B22", secondary: "#8B4513", text: "#F5F5DC", font: "'Indie Flower', cursive", glyph: "🌴" },
    Entry { name: "Space Galaxy", background: "#000033", primary: "#800080", secondary: "#FFD700", text: "#FFFFFF", font: "'Audiowide', sans-serif", glyph: "🌠" },
    Entry { name: "Christmas", background: "#006400", primary: "#FF0000", secondary: "#FFD700", text: "#FFFFFF", font: "'Raleway', sans-serif", glyph: "🎄" },
    Entry { name: "Vintage Paper", background: "#F5DEB3", primary: "#8B4513", secondary: "#D2B48C", text: "#5C4033", font: "'Playfair Display', serif", glyph: "📜" },
];

static CATALOG: LazyLock<Vec<Theme>> = LazyLock::new(|| {
    ENTRIES
        .iter()
        .map(|entry| Theme {
            name: entry.name.to_string(),
            background: hex_or_black(entry.background),
            primary: hex_or_black(entry.primary),
            secondary: hex_or_black(entry.secondary),
            text: hex_or_black(entry.text),
            font_family: entry.font.to_string(),
            glyph: entry.glyph.to_string(),
        })
        .collect()
});

fn hex_or_black(value: &str) -> Rgb
{
    Rgb::parse_hex(value).unwrap_or(Rgb::new(0, 0, 0))
}

/// The fixed theme catalog in display order.
pub fn catalog() -> &'static [Theme]
{
    &CATALOG
}

/// Starting theme for new creator drafts.
pub fn creator_default() -> &'static Theme
{
    find(CREATOR_DEFAULT_THEME).unwrap_or(&CATALOG[0])
}

pub fn find(name: &str) -> Option<&'static Theme>
{
    let wanted = name.trim();
    catalog()
        .iter()
        .find(|theme| theme.name.eq_ignore_ascii_case(wanted))
}
