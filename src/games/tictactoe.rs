use super::paint::{self, Canvas, Cell};
use super::{Game, GameInput, GameKind};
use crate::theme::{Rgb, Theme};
use std::fmt;
use std::time::Instant;

const LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    [0, 4, 8],
    [2, 4, 6],
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mark
{
    X,
    O,
}

impl fmt::Display for Mark
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        f.write_str(match self {
            Mark::X => "X",
            Mark::O => "O",
        })
    }
}

pub struct TicTacToe
{
    board: [Option<Mark>; 9],
    x_is_next: bool,
    winner: Option<Mark>,
}

impl TicTacToe
{
    pub fn new() -> Self
    {
        Self {
            board: [None; 9],
            x_is_next: true,
            winner: None,
        }
    }

    #[cfg(test)]
    pub fn board(&self) -> &[Option<Mark>; 9]
    {
        &self.board
    }

    #[cfg(test)]
    pub fn winner(&self) -> Option<Mark>
    {
        self.winner
    }

    pub fn next_player(&self) -> Mark
    {
        if self.x_is_next { Mark::X } else { Mark::O }
    }

    pub fn is_draw(&self) -> bool
    {
        self.winner.is_none() && self.board.iter().all(Option::is_some)
    }

    /// Places the next mark at `index`. Returns whether the move was legal.
    pub fn play(&mut self, index: usize) -> bool
    {
        if self.winner.is_some() || index >= self.board.len() || self.board[index].is_some() {
            return false;
        }
        self.board[index] = Some(self.next_player());
        self.x_is_next = !self.x_is_next;
        self.winner = calculate_winner(&self.board);
        if let Some(winner) = self.winner {
            tracing::info!(%winner, "tic-tac-toe won");
        }
        true
    }
}

impl Default for TicTacToe
{
    fn default() -> Self
    {
        Self::new()
    }
}

/// First of the eight lines holding three equal marks.
pub fn calculate_winner(board: &[Option<Mark>; 9]) -> Option<Mark>
{
    LINES.iter().find_map(|&[a, b, c]| match board[a] {
        Some(mark) if board[b] == Some(mark) && board[c] == Some(mark) => Some(mark),
        _ => None,
    })
}

impl Game for TicTacToe
{
    fn kind(&self) -> GameKind
    {
        GameKind::TicTacToe
    }

    fn handle_input(&mut self, input: GameInput, _now: Instant)
    {
        if let GameInput::Select(index) = input {
            self.play(index);
        }
    }

    fn tick(&mut self) {}

    fn poll(&mut self, _now: Instant) {}

    fn reset(&mut self, _now: Instant)
    {
        *self = Self::new();
    }

    fn dispose(&mut self) {}

    fn is_over(&self) -> bool
    {
        self.winner.is_some() || self.is_draw()
    }

    fn status(&self) -> String
    {
        match self.winner {
            Some(winner) => format!("Winner: {winner}! Press r to reset"),
            None if self.is_draw() => "Draw! Press r to reset".to_string(),
            None => format!("Next Player: {}", self.next_player()),
        }
    }

    fn grid(&self) -> Option<(usize, usize)>
    {
        Some((3, 3))
    }

    fn render(&self, theme: &Theme, cursor: Option<usize>) -> Vec<String>
    {
        let mut lines = paint::header(theme, "Tic-Tac-Toe", &self.status());
        let white = Rgb::new(255, 255, 255);
        let mut canvas = Canvas::new(3, 3, Cell::new("", None, None));
        for (idx, slot) in self.board.iter().enumerate() {
            let (fg, bg) = match slot {
                Some(Mark::X) => (white, theme.primary),
                Some(Mark::O) => (theme.secondary, theme.primary),
                None => (theme.text, theme.background),
            };
            let mark = slot.map(|mark| mark.to_string()).unwrap_or_else(|| " ".to_string());
            let text = if cursor == Some(idx) {
                format!("[{mark}]")
            } else {
                format!(" {mark} ")
            };
            canvas.set(idx % 3, idx / 3, Cell::new(text, Some(fg), Some(bg)));
        }
        lines.extend(canvas.into_lines());
        lines
    }
}
