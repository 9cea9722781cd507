use crate::theme::{Rgb, Theme};

const RESET: &str = "\x1b[0m";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Cell
{
    pub text: String,
    pub fg: Option<Rgb>,
    pub bg: Option<Rgb>,
}

impl Cell
{
    pub fn new(text: impl Into<String>, fg: Option<Rgb>, bg: Option<Rgb>) -> Self
    {
        Self {
            text: text.into(),
            fg,
            bg,
        }
    }
}

/// A grid of styled cells rendered to ANSI truecolor lines.
pub struct Canvas
{
    width: usize,
    rows: Vec<Vec<Cell>>,
}

impl Canvas
{
    pub fn new(width: usize, height: usize, fill: Cell) -> Self
    {
        Self {
            width,
            rows: vec![vec![fill; width]; height],
        }
    }

    pub fn set(&mut self, x: usize, y: usize, cell: Cell)
    {
        if x < self.width {
            if let Some(row) = self.rows.get_mut(y) {
                row[x] = cell;
            }
        }
    }

    #[cfg(test)]
    pub fn get(&self, x: usize, y: usize) -> Option<&Cell>
    {
        self.rows.get(y).and_then(|row| row.get(x))
    }

    pub fn into_lines(self) -> Vec<String>
    {
        self.rows.iter().map(|row| render_row(row)).collect()
    }
}

/// Emits colour escapes only where the style changes along the row.
pub fn render_row(row: &[Cell]) -> String
{
    let mut line = String::with_capacity(row.len() * 4 + 16);
    let mut active: Option<(Option<Rgb>, Option<Rgb>)> = None;
    for cell in row {
        let style = (cell.fg, cell.bg);
        if active != Some(style) {
            line.push_str(RESET);
            if let Some(fg) = cell.fg {
                line.push_str(&fg.fg());
            }
            if let Some(bg) = cell.bg {
                line.push_str(&bg.bg());
            }
            active = Some(style);
        }
        line.push_str(&cell.text);
    }
    line.push_str(RESET);
    line
}

/// One line of text in the theme's text colour over its background.
pub fn themed_line(theme: &Theme, text: &str) -> String
{
    format!("{}{}{}{}", theme.background.bg(), theme.text.fg(), text, RESET)
}

pub fn accent_line(theme: &Theme, text: &str) -> String
{
    format!("{}{}{}{}", theme.primary.bg(), theme.background.fg(), text, RESET)
}

/// Title, status and font lines shared by every game screen.
pub fn header(theme: &Theme, title: &str, status: &str) -> Vec<String>
{
    vec![
        themed_line(theme, &format!(" {} {} {} ", theme.glyph, title, theme.glyph)),
        themed_line(theme, &format!(" {status} ")),
        themed_line(theme, &format!(" Theme: {}  Font: {} ", theme.name, theme.font_family)),
        String::new(),
    ]
}
