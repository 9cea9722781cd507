use super::paint::{self, Canvas, Cell};
use super::{Game, GameInput, GameKind};
use crate::theme::{Rgb, Theme};
use crate::timer::Timeout;
use rand::seq::SliceRandom;
use rand::Rng;
use std::time::{Duration, Instant};

pub const SYMBOLS: [&str; 8] = ["❤️", "🌹", "💘", "🍫", "💕", "🎁", "💌", "🦄"];
pub const FLIP_BACK_DELAY: Duration = Duration::from_millis(1000);
const COLUMNS: usize = 4;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Card
{
    pub symbol: &'static str,
    pub flipped: bool,
    pub matched: bool,
}

pub struct MemoryMatch<R>
{
    rng: R,
    cards: Vec<Card>,
    first: Option<usize>,
    moves: u32,
    flip_back: Timeout<(usize, usize)>,
}

impl<R: Rng> MemoryMatch<R>
{
    pub fn new(rng: R) -> Self
    {
        let mut game = Self {
            rng,
            cards: Vec::new(),
            first: None,
            moves: 0,
            flip_back: Timeout::new(),
        };
        game.deal();
        game
    }

    fn deal(&mut self)
    {
        let mut symbols: Vec<&'static str> = SYMBOLS.iter().chain(SYMBOLS.iter()).copied().collect();
        symbols.shuffle(&mut self.rng);
        self.cards = symbols
            .into_iter()
            .map(|symbol| Card {
                symbol,
                flipped: false,
                matched: false,
            })
            .collect();
        self.first = None;
        self.moves = 0;
        self.flip_back.cancel_all();
    }

    #[cfg(test)]
    pub fn cards(&self) -> &[Card]
    {
        &self.cards
    }

    #[cfg(test)]
    pub fn moves(&self) -> u32
    {
        self.moves
    }

    #[cfg(test)]
    pub fn first_revealed(&self) -> Option<usize>
    {
        self.first
    }

    #[cfg(test)]
    pub fn has_pending_flip_back(&self) -> bool
    {
        !self.flip_back.is_empty()
    }

    pub fn is_complete(&self) -> bool
    {
        self.cards.iter().all(|card| card.matched)
    }

    /// Returns whether the click flipped a card.
    pub fn click(&mut self, index: usize, now: Instant) -> bool
    {
        if self.is_complete() {
            return false;
        }
        let Some(card) = self.cards.get_mut(index) else {
            return false;
        };
        if card.flipped || card.matched {
            return false;
        }
        card.flipped = true;
        self.moves += 1;

        match self.first.take() {
            None => self.first = Some(index),
            Some(first) => {
                if self.cards[first].symbol == self.cards[index].symbol {
                    self.cards[first].matched = true;
                    self.cards[index].matched = true;
                    if self.is_complete() {
                        tracing::info!(moves = self.moves, "memory match complete");
                    }
                } else {
                    self.flip_back.schedule(now, FLIP_BACK_DELAY, (first, index));
                }
            }
        }
        true
    }
}

impl<R: Rng> Game for MemoryMatch<R>
{
    fn kind(&self) -> GameKind
    {
        GameKind::MemoryMatch
    }

    fn handle_input(&mut self, input: GameInput, now: Instant)
    {
        if let GameInput::Select(index) = input {
            self.click(index, now);
        }
    }

    fn tick(&mut self) {}

    fn poll(&mut self, now: Instant)
    {
        for (a, b) in self.flip_back.take_due(now) {
            self.cards[a].flipped = false;
            self.cards[b].flipped = false;
        }
    }

    fn reset(&mut self, _now: Instant)
    {
        self.deal();
    }

    fn dispose(&mut self)
    {
        self.flip_back.cancel_all();
    }

    fn is_over(&self) -> bool
    {
        self.is_complete()
    }

    fn status(&self) -> String
    {
        if self.is_complete() {
            format!("Congratulations! You won in {} moves! Press r to play again", self.moves)
        } else {
            format!("Moves: {}", self.moves)
        }
    }

    fn grid(&self) -> Option<(usize, usize)>
    {
        Some((COLUMNS, self.cards.len().div_ceil(COLUMNS)))
    }

    fn render(&self, theme: &Theme, cursor: Option<usize>) -> Vec<String>
    {
        let mut lines = paint::header(theme, "Memory Match", &self.status());
        let white = Rgb::new(255, 255, 255);
        let rows = self.cards.len().div_ceil(COLUMNS);
        let mut canvas = Canvas::new(COLUMNS, rows, Cell::new("", None, None));
        for (idx, card) in self.cards.iter().enumerate() {
            let face_up = card.flipped || card.matched;
            let bg = if card.matched {
                theme.secondary
            } else if card.flipped {
                theme.primary
            } else {
                theme.background
            };
            let fg = if face_up { white } else { theme.text };
            let face = if face_up { card.symbol } else { "? " };
            let text = if cursor == Some(idx) {
                format!(">{face}<")
            } else {
                format!(" {face} ")
            };
            canvas.set(idx % COLUMNS, idx / COLUMNS, Cell::new(text, Some(fg), Some(bg)));
        }
        lines.extend(canvas.into_lines());
        lines
    }
}
