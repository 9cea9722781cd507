mod run;

pub use run::run;

use crate::games::paint;
use crate::games::{self, Direction, Game, GameInput, GameKind};
use crate::term;
use crate::theme::{self, Rgb, Theme, ThemeContext, ThemeField};
use crossterm::event::{KeyCode, KeyEvent};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::Instant;

const GRID_COLUMNS: usize = 3;

pub enum View
{
    Browsing
    {
        highlight: usize,
    },
    Playing
    {
        game: Box<dyn Game>,
        cursor: usize,
    },
}

/// Field picker state of the open customizer overlay.
pub struct Customizer
{
    field: usize,
    buffer: String,
}

impl Customizer
{
    pub fn field(&self) -> ThemeField
    {
        ThemeField::ALL[self.field]
    }

    pub fn buffer(&self) -> &str
    {
        &self.buffer
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Flow
{
    Continue,
    Quit,
}

/// Top-level controller: game grid, active game and theme customizer.
pub struct Shell
{
    context: ThemeContext,
    view: View,
    customizer: Option<Customizer>,
    rng: StdRng,
}

impl Shell
{
    pub fn new(theme: &'static Theme, rng: StdRng) -> Self
    {
        Self {
            context: ThemeContext::new(theme),
            view: View::Browsing { highlight: 0 },
            customizer: None,
            rng,
        }
    }

    pub fn theme(&self) -> &Theme
    {
        self.context.current()
    }

    #[cfg(test)]
    pub fn context(&self) -> &ThemeContext
    {
        &self.context
    }

    #[cfg(test)]
    pub fn view(&self) -> &View
    {
        &self.view
    }

    #[cfg(test)]
    pub fn customizer(&self) -> Option<&Customizer>
    {
        self.customizer.as_ref()
    }

    pub fn active_game(&self) -> Option<&dyn Game>
    {
        match &self.view {
            View::Playing { game, .. } => Some(game.as_ref()),
            View::Browsing { .. } => None,
        }
    }

    pub fn select_game(&mut self, kind: GameKind, now: Instant) -> bool
    {
        if self.customizer.is_some() || matches!(self.view, View::Playing { .. }) {
            return false;
        }
        let rng = StdRng::seed_from_u64(self.rng.r#gen());
        self.view = View::Playing {
            game: games::start(kind, rng, now),
            cursor: 0,
        };
        true
    }

    /// Leaves the active game and hands back the session, already disposed.
    pub fn back(&mut self) -> Option<Box<dyn Game>>
    {
        let View::Playing { game, .. } = &self.view else {
            return None;
        };
        let kind = game.kind();
        let highlight = GameKind::ALL.iter().position(|&k| k == kind).unwrap_or(0);
        let View::Playing { mut game, .. } = std::mem::replace(&mut self.view, View::Browsing { highlight }) else {
            return None;
        };
        game.dispose();
        tracing::info!(game = kind.name(), "left game");
        Some(game)
    }

    /// Picks a catalog theme. A custom theme, if any, stays in force.
    pub fn select_theme(&mut self, name: &str) -> bool
    {
        let changed = self.context.select(name);
        if changed {
            tracing::info!(theme = %self.context.selected().name, custom = self.context.is_custom(), "theme selected");
        }
        changed
    }

    pub fn discard_custom(&mut self) -> bool
    {
        let dropped = self.context.discard_custom();
        if dropped {
            tracing::info!(theme = %self.context.current().name, "custom theme discarded");
        }
        dropped
    }

    /// Cycles through the catalog relative to the selected entry.
    pub fn step_theme(&mut self, forward: bool)
    {
        let catalog = theme::catalog();
        let current = catalog
            .iter()
            .position(|entry| entry.name == self.context.selected().name)
            .unwrap_or(0);
        let next = if forward {
            (current + 1) % catalog.len()
        } else {
            (current + catalog.len() - 1) % catalog.len()
        };
        self.select_theme(&catalog[next].name);
    }

    pub fn customize(&mut self) -> bool
    {
        if !matches!(self.view, View::Browsing { .. }) {
            return false;
        }
        self.context.customize();
        let field = 0;
        self.customizer = Some(Customizer {
            field,
            buffer: ThemeField::ALL[field].value(self.context.current()),
        });
        tracing::info!(base = %self.context.selected().name, "customizing theme");
        true
    }

    /// Commits one field edit to the live custom theme.
    pub fn edit_custom(&mut self, field: ThemeField, value: &str) -> bool
    {
        if self.customizer.is_none() {
            return false;
        }
        self.context.edit(field, value)
    }

    pub fn close_customizer(&mut self)
    {
        self.customizer = None;
    }

    pub fn poll(&mut self, now: Instant)
    {
        if let View::Playing { game, .. } = &mut self.view {
            game.poll(now);
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent, now: Instant) -> Flow
    {
        if term::is_interrupt(&key) {
            return Flow::Quit;
        }
        if self.customizer.is_some() {
            self.customizer_key(key);
            return Flow::Continue;
        }
        if matches!(self.view, View::Playing { .. }) {
            self.playing_key(key, now)
        } else {
            self.browsing_key(key, now)
        }
    }

    fn browsing_key(&mut self, key: KeyEvent, now: Instant) -> Flow
    {
        let View::Browsing { highlight } = &mut self.view else {
            return Flow::Continue;
        };
        let count = GameKind::ALL.len();
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => return Flow::Quit,
            KeyCode::Left => *highlight = (*highlight + count - 1) % count,
            KeyCode::Right => *highlight = (*highlight + 1) % count,
            KeyCode::Up => *highlight = highlight.saturating_sub(GRID_COLUMNS),
            KeyCode::Down => *highlight = (*highlight + GRID_COLUMNS).min(count - 1),
            KeyCode::Enter | KeyCode::Char(' ') => {
                let kind = GameKind::ALL[*highlight];
                self.select_game(kind, now);
            }
            KeyCode::Char(ch @ '1'..='5') => {
                let kind = GameKind::ALL[ch as usize - '1' as usize];
                self.select_game(kind, now);
            }
            KeyCode::Char('t') => self.step_theme(true),
            KeyCode::Char('T') => self.step_theme(false),
            KeyCode::Char('c') => {
                self.customize();
            }
            KeyCode::Char('x') => {
                self.discard_custom();
            }
            _ => {}
        }
        Flow::Continue
    }

    fn playing_key(&mut self, key: KeyEvent, now: Instant) -> Flow
    {
        let View::Playing { game, cursor } = &mut self.view else {
            return Flow::Continue;
        };
        let direction = match key.code {
            KeyCode::Up => Some(Direction::Up),
            KeyCode::Down => Some(Direction::Down),
            KeyCode::Left => Some(Direction::Left),
            KeyCode::Right => Some(Direction::Right),
            _ => None,
        };

        match (key.code, direction, game.grid()) {
            (_, Some(direction), Some((cols, rows))) => {
                *cursor = move_cursor(*cursor, direction, cols, rows);
            }
            (_, Some(direction), None) => game.handle_input(GameInput::Arrow(direction), now),
            (KeyCode::Enter | KeyCode::Char(' '), _, Some(_)) => {
                game.handle_input(GameInput::Select(*cursor), now);
            }
            (KeyCode::Char(ch @ '1'..='9'), _, Some((cols, rows))) if cols * rows <= 9 => {
                let index = ch as usize - '1' as usize;
                *cursor = index;
                game.handle_input(GameInput::Select(index), now);
            }
            (KeyCode::Char('r'), _, _) => {
                game.reset(now);
                tracing::info!(game = game.kind().name(), "game reset");
            }
            (KeyCode::Esc | KeyCode::Char('b'), _, _) => {
                self.back();
            }
            (KeyCode::Char('q'), _, _) => return Flow::Quit,
            _ => {}
        }
        Flow::Continue
    }

    fn customizer_key(&mut self, key: KeyEvent)
    {
        let Some(editor) = self.customizer.as_mut() else {
            return;
        };
        let count = ThemeField::ALL.len();
        match key.code {
            KeyCode::Esc | KeyCode::Enter => {
                self.close_customizer();
                return;
            }
            KeyCode::Up | KeyCode::Down | KeyCode::Tab => {
                editor.field = if key.code == KeyCode::Up {
                    (editor.field + count - 1) % count
                } else {
                    (editor.field + 1) % count
                };
                editor.buffer = editor.field().value(self.context.current());
                return;
            }
            KeyCode::Backspace => {
                editor.buffer.pop();
            }
            KeyCode::Char(ch) => editor.buffer.push(ch),
            _ => return,
        }
        let field = editor.field();
        let value = editor.buffer.clone();
        self.edit_custom(field, &value);
    }

    pub fn render(&self) -> Vec<String>
    {
        let theme = self.theme();
        let mut lines = match &self.view {
            View::Browsing { highlight } => render_selection(&self.context, *highlight),
            View::Playing { game, cursor } => {
                let cursor = game.grid().map(|_| *cursor);
                let mut lines = game.render(theme, cursor);
                lines.push(String::new());
                let controls = if game.is_over() {
                    "Finished! r plays again, Esc back to games, q quits"
                } else if game.grid().is_some() {
                    "Arrows move, Enter selects, r resets, Esc back to games, q quits"
                } else {
                    "Arrows steer, r restarts, Esc back to games, q quits"
                };
                lines.push(paint::themed_line(theme, controls));
                lines
            }
        };
        if let Some(editor) = &self.customizer {
            lines.extend(render_customizer(theme, editor));
        }
        lines
    }
}

fn move_cursor(cursor: usize, direction: Direction, cols: usize, rows: usize) -> usize
{
    let (mut col, mut row) = (cursor % cols, cursor / cols);
    match direction {
        Direction::Up => row = row.saturating_sub(1),
        Direction::Down => row = (row + 1).min(rows - 1),
        Direction::Left => col = col.saturating_sub(1),
        Direction::Right => col = (col + 1).min(cols - 1),
    }
    row * cols + col
}

fn render_selection(context: &ThemeContext, highlight: usize) -> Vec<String>
{
    let theme = context.current();
    let theme_line = if context.is_custom() {
        format!(
            " Theme: {} over {}  (t/T to change, c to customize, x drops custom) ",
            theme.name,
            context.selected().name
        )
    } else {
        format!(" Theme: {}  (t/T to change, c to customize) ", theme.name)
    };
    let mut lines = vec![
        paint::themed_line(theme, &format!(" {} Game Selection {} ", theme.glyph, theme.glyph)),
        paint::themed_line(theme, &theme_line),
        String::new(),
    ];
    for (row, chunk) in GameKind::ALL.chunks(GRID_COLUMNS).enumerate() {
        let mut line = String::new();
        for (col, kind) in chunk.iter().enumerate() {
            let idx = row * GRID_COLUMNS + col;
            let label = format!(" {}. {:<14}", idx + 1, kind.name());
            if idx == highlight {
                line.push_str(&paint::themed_line(theme, &format!(">{label}<")));
            } else {
                line.push_str(&paint::accent_line(theme, &format!(" {label} ")));
            }
            line.push(' ');
        }
        lines.push(line);
        lines.push(String::new());
    }
    let described = GameKind::ALL[highlight.min(GameKind::ALL.len() - 1)];
    lines.push(paint::themed_line(theme, &format!(" {} ", described.description())));
    lines.push(paint::themed_line(theme, " Arrows pick, Enter plays, q quits "));
    lines
}

fn render_customizer(theme: &Theme, editor: &Customizer) -> Vec<String>
{
    let mut lines = vec![
        String::new(),
        paint::accent_line(theme, " Customize Theme "),
    ];
    for field in ThemeField::ALL {
        let value = field.value(theme);
        let swatch = if field.is_color() {
            Rgb::parse_hex(&value).map(|color| format!("{}    \x1b[0m", color.bg())).unwrap_or_default()
        } else {
            String::new()
        };
        let marker = if field == editor.field() { ">" } else { " " };
        lines.push(format!("{marker} {:<17} {:<28} {swatch}", field.label(), value));
    }
    lines.push(format!("  Editing: {}_", editor.buffer()));
    lines.push("  Up/Down pick a field, type to edit (applies live), Enter/Esc closes".to_string());
    lines
}
