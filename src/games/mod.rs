pub mod catch;
pub mod memory;
pub mod paint;
pub mod puzzle;
pub mod snake;
pub mod tictactoe;

use crate::theme::Theme;
use rand::rngs::StdRng;
use std::time::Instant;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GameKind
{
    Snake,
    TicTacToe,
    MemoryMatch,
    Catch,
    Puzzle,
}

impl GameKind
{
    pub const ALL: [GameKind; 5] = [
        GameKind::Snake,
        GameKind::TicTacToe,
        GameKind::MemoryMatch,
        GameKind::Catch,
        GameKind::Puzzle,
    ];

    pub fn name(self) -> &'static str
    {
        match self {
            GameKind::Snake => "Snake",
            GameKind::TicTacToe => "Tic-Tac-Toe",
            GameKind::MemoryMatch => "Memory Match",
            GameKind::Catch => "Catch",
            GameKind::Puzzle => "Puzzle",
        }
    }

    pub fn slug(self) -> &'static str
    {
        match self {
            GameKind::Snake => "snake",
            GameKind::TicTacToe => "tictactoe",
            GameKind::MemoryMatch => "memory",
            GameKind::Catch => "catch",
            GameKind::Puzzle => "puzzle",
        }
    }

    pub fn description(self) -> &'static str
    {
        match self {
            GameKind::Snake => "Eat the food, avoid the walls and yourself",
            GameKind::TicTacToe => "Two players, three in a row wins",
            GameKind::MemoryMatch => "Flip cards and find every pair",
            GameKind::Catch => "Slide the paddle under the falling object",
            GameKind::Puzzle => "Slide the tiles back into order",
        }
    }

    /// Accepts display names, slugs and the names used by shared game links.
    pub fn from_name(name: &str) -> Option<Self>
    {
        let key: String = name
            .chars()
            .filter(|ch| ch.is_ascii_alphanumeric())
            .map(|ch| ch.to_ascii_lowercase())
            .collect();
        match key.as_str() {
            "snake" => Some(GameKind::Snake),
            "tictactoe" | "ttt" => Some(GameKind::TicTacToe),
            "memorymatch" | "memory" | "matchmaking" => Some(GameKind::MemoryMatch),
            "catch" | "catchgame" => Some(GameKind::Catch),
            "puzzle" | "puzzlegame" | "slidingpuzzle" => Some(GameKind::Puzzle),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction
{
    Up,
    Down,
    Left,
    Right,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameInput
{
    Arrow(Direction),
    /// A click on the cell, tile or card at this index.
    Select(usize),
}

/// One live game session. Sessions read the theme only while rendering.
pub trait Game
{
    fn kind(&self) -> GameKind;

    fn handle_input(&mut self, input: GameInput, now: Instant);

    /// Advances the automatic movement by one step.
    fn tick(&mut self);

    /// Fires any timers that are due at `now`.
    fn poll(&mut self, now: Instant);

    fn reset(&mut self, now: Instant);

    /// Cancels every outstanding timer. The session stays renderable.
    fn dispose(&mut self);

    fn is_over(&self) -> bool;

    fn status(&self) -> String;

    /// Columns and rows of a clickable grid, for cursor-driven games.
    fn grid(&self) -> Option<(usize, usize)>
    {
        None
    }

    fn render(&self, theme: &Theme, cursor: Option<usize>) -> Vec<String>;
}

pub struct GameDescriptor
{
    pub kind: GameKind,
    pub name: &'static str,
    pub description: &'static str,
}

pub fn registry() -> Vec<GameDescriptor>
{
    GameKind::ALL
        .iter()
        .map(|&kind| GameDescriptor {
            kind,
            name: kind.name(),
            description: kind.description(),
        })
        .collect()
}

pub fn start(kind: GameKind, rng: StdRng, now: Instant) -> Box<dyn Game>
{
    tracing::info!(game = kind.name(), "starting game session");
    match kind {
        GameKind::Snake => Box::new(snake::Snake::new(rng, now)),
        GameKind::TicTacToe => Box::new(tictactoe::TicTacToe::new()),
        GameKind::MemoryMatch => Box::new(memory::MemoryMatch::new(rng)),
        GameKind::Catch => Box::new(catch::Catch::new(rng, now)),
        GameKind::Puzzle => Box::new(puzzle::Puzzle::new(rng)),
    }
}

#[cfg(test)]
mod tests
{
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn names_round_trip_through_from_name()
    {
        for kind in GameKind::ALL {
            assert_eq!(GameKind::from_name(kind.name()), Some(kind));
            assert_eq!(GameKind::from_name(kind.slug()), Some(kind));
        }
    }

    #[test]
    fn creator_names_resolve()
    {
        assert_eq!(GameKind::from_name("Tic Tac Toe"), Some(GameKind::TicTacToe));
        assert_eq!(GameKind::from_name("Catch Game"), Some(GameKind::Catch));
        assert_eq!(GameKind::from_name("Match Making"), Some(GameKind::MemoryMatch));
        assert_eq!(GameKind::from_name("Puzzle Game"), Some(GameKind::Puzzle));
        assert_eq!(GameKind::from_name("chess"), None);
    }

    #[test]
    fn start_builds_each_kind()
    {
        let now = Instant::now();
        for kind in GameKind::ALL {
            let game = start(kind, StdRng::seed_from_u64(7), now);
            assert_eq!(game.kind(), kind);
            assert!(!game.is_over());
        }
        assert_eq!(registry().len(), 5);
    }
}
