use super::paint::{self, Canvas, Cell};
use super::{Game, GameInput, GameKind};
use crate::theme::Theme;
use rand::seq::SliceRandom;
use rand::Rng;
use std::time::Instant;

pub const SIZE: usize = 4;
pub const TILES: usize = SIZE * SIZE;

pub struct Puzzle<R>
{
    rng: R,
    tiles: [u8; TILES],
    moves: u32,
}

impl<R: Rng> Puzzle<R>
{
    pub fn new(mut rng: R) -> Self
    {
        let tiles = shuffled(&mut rng);
        Self {
            rng,
            tiles,
            moves: 0,
        }
    }

    /// Starts from a fixed arrangement. `tiles` must be a permutation of 0..16.
    #[cfg(test)]
    pub fn with_tiles(rng: R, tiles: [u8; TILES]) -> Option<Self>
    {
        if !is_permutation(&tiles) {
            return None;
        }
        Some(Self {
            rng,
            tiles,
            moves: 0,
        })
    }

    #[cfg(test)]
    pub fn tiles(&self) -> &[u8; TILES]
    {
        &self.tiles
    }

    #[cfg(test)]
    pub fn moves(&self) -> u32
    {
        self.moves
    }

    pub fn blank(&self) -> usize
    {
        self.tiles.iter().position(|&tile| tile == 0).unwrap_or(0)
    }

    pub fn is_solved(&self) -> bool
    {
        self.tiles.iter().enumerate().all(|(idx, &tile)| tile as usize == idx)
    }

    pub fn can_move(&self, index: usize) -> bool
    {
        index < TILES && is_adjacent(index, self.blank())
    }

    /// Slides the tile at `index` into the blank. Returns whether it moved.
    pub fn slide(&mut self, index: usize) -> bool
    {
        if self.is_solved() || !self.can_move(index) {
            return false;
        }
        let blank = self.blank();
        self.tiles.swap(index, blank);
        self.moves += 1;
        if self.is_solved() {
            tracing::info!(moves = self.moves, "puzzle solved");
        }
        true
    }
}

/// Exactly one step up, down, left or right on the 4x4 grid.
pub fn is_adjacent(a: usize, b: usize) -> bool
{
    let (ar, ac) = (a / SIZE, a % SIZE);
    let (br, bc) = (b / SIZE, b % SIZE);
    ar.abs_diff(br) + ac.abs_diff(bc) == 1
}

#[cfg(test)]
fn is_permutation(tiles: &[u8; TILES]) -> bool
{
    let mut seen = [false; TILES];
    for &tile in tiles {
        let slot = tile as usize;
        if slot >= TILES || seen[slot] {
            return false;
        }
        seen[slot] = true;
    }
    true
}

/// A solvable, unsolved arrangement.
///
/// Uniform shuffles are unsolvable half the time; swapping two numbered tiles
/// flips the permutation parity back into the reachable half.
fn shuffled(rng: &mut impl Rng) -> [u8; TILES]
{
    let mut tiles: [u8; TILES] = std::array::from_fn(|idx| idx as u8);
    loop {
        tiles.shuffle(rng);
        if !is_solvable(&tiles) {
            let numbered: Vec<usize> = (0..TILES).filter(|&idx| tiles[idx] != 0).take(2).collect();
            tiles.swap(numbered[0], numbered[1]);
        }
        let solved = tiles.iter().enumerate().all(|(idx, &tile)| tile as usize == idx);
        if !solved {
            return tiles;
        }
    }
}

/// The solved board keeps the blank at index 0. Every slide is one
/// transposition and moves the blank one step, so a board is reachable iff the
/// inversions among numbered tiles match the blank's row in parity.
fn is_solvable(tiles: &[u8; TILES]) -> bool
{
    let numbered: Vec<u8> = tiles.iter().copied().filter(|&tile| tile != 0).collect();
    let mut inversions = 0;
    for i in 0..numbered.len() {
        for j in (i + 1)..numbered.len() {
            if numbered[i] > numbered[j] {
                inversions += 1;
            }
        }
    }
    let blank = tiles.iter().position(|&tile| tile == 0).unwrap_or(0);
    (inversions + blank / SIZE) % 2 == 0
}

impl<R: Rng> Game for Puzzle<R>
{
    fn kind(&self) -> GameKind
    {
        GameKind::Puzzle
    }

    fn handle_input(&mut self, input: GameInput, _now: Instant)
    {
        if let GameInput::Select(index) = input {
            self.slide(index);
        }
    }

    fn tick(&mut self) {}

    fn poll(&mut self, _now: Instant) {}

    fn reset(&mut self, _now: Instant)
    {
        self.tiles = shuffled(&mut self.rng);
        self.moves = 0;
    }

    fn dispose(&mut self) {}

    fn is_over(&self) -> bool
    {
        self.is_solved()
    }

    fn status(&self) -> String
    {
        if self.is_solved() {
            format!("Moves: {}  Congratulations! Puzzle Solved! Press r for a new puzzle", self.moves)
        } else {
            format!("Moves: {}", self.moves)
        }
    }

    fn grid(&self) -> Option<(usize, usize)>
    {
        Some((SIZE, SIZE))
    }

    fn render(&self, theme: &Theme, cursor: Option<usize>) -> Vec<String>
    {
        let mut lines = paint::header(theme, "Sliding Puzzle", &self.status());
        let mut canvas = Canvas::new(SIZE, SIZE, Cell::new("", None, None));
        for (idx, &tile) in self.tiles.iter().enumerate() {
            let label = if tile == 0 { "  ".to_string() } else { format!("{tile:>2}") };
            let text = if cursor == Some(idx) {
                format!("[{label}]")
            } else {
                format!(" {label} ")
            };
            let cell = if tile == 0 {
                Cell::new(text, Some(theme.text), Some(theme.background))
            } else {
                Cell::new(text, Some(theme.background), Some(theme.primary))
            };
            canvas.set(idx % SIZE, idx / SIZE, cell);
        }
        lines.extend(canvas.into_lines());
        lines
    }
}

#[cfg(test)]
mod tests
{
    use super::*;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const BLANK_LAST: [u8; TILES] = [1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 0];
    const SOLVED: [u8; TILES] = [0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15];

    fn puzzle(tiles: [u8; TILES]) -> Puzzle<StdRng>
    {
        Puzzle::with_tiles(StdRng::seed_from_u64(0), tiles).expect("valid permutation")
    }

    #[test]
    fn adjacent_click_is_accepted_and_far_click_rejected()
    {
        let mut game = puzzle(BLANK_LAST);
        assert!(game.slide(14));
        assert_eq!(game.moves(), 1);
        assert_eq!(game.blank(), 14);
        assert!(!game.slide(0));
        assert_eq!(game.moves(), 1);
    }

    #[test]
    fn diagonal_and_wrapping_moves_are_rejected()
    {
        let mut game = puzzle(BLANK_LAST);
        assert!(!game.slide(10));
        // 12 and 11 are consecutive indices but on different rows.
        let mut wrap = BLANK_LAST;
        wrap.swap(15, 12);
        let mut game_wrap = puzzle(wrap);
        assert!(!game_wrap.slide(11));
        assert!(game_wrap.slide(8));
        assert!(!game.slide(15));
    }

    #[test]
    fn solved_board_ignores_clicks()
    {
        let mut game = puzzle(SOLVED);
        assert!(game.is_solved());
        assert!(game.is_over());
        assert!(!game.slide(1));
        assert_eq!(game.moves(), 0);
    }

    #[test]
    fn sliding_into_identity_solves()
    {
        let mut almost = SOLVED;
        almost.swap(0, 1);
        let mut game = puzzle(almost);
        assert!(!game.is_solved());
        assert!(game.slide(0));
        assert!(game.is_solved());
    }

    #[test]
    fn with_tiles_rejects_non_permutations()
    {
        let mut bad = SOLVED;
        bad[3] = 2;
        assert!(Puzzle::with_tiles(StdRng::seed_from_u64(0), bad).is_none());
    }

    #[test]
    fn fresh_puzzles_are_solvable_and_unsolved()
    {
        let mut rng = StdRng::seed_from_u64(99);
        for _ in 0..200 {
            let tiles = shuffled(&mut rng);
            assert!(is_permutation(&tiles));
            assert!(is_solvable(&tiles));
            assert_ne!(tiles, SOLVED);
        }
        assert!(is_solvable(&SOLVED));
        let mut swapped = SOLVED;
        swapped.swap(1, 2);
        assert!(!is_solvable(&swapped));
    }

    proptest! {
        #[test]
        fn clicks_keep_a_permutation(seed in any::<u64>(), clicks in proptest::collection::vec(0usize..20, 0..100)) {
            let mut game = Puzzle::new(StdRng::seed_from_u64(seed));
            for index in clicks {
                let blank = game.blank();
                let moves = game.moves();
                let solved = game.is_solved();
                let accepted = game.slide(index);
                prop_assert!(is_permutation(game.tiles()));
                prop_assert_eq!(accepted, !solved && index < TILES && is_adjacent(index, blank));
                prop_assert_eq!(game.moves(), moves + u32::from(accepted));
                let identity = game.tiles().iter().enumerate().all(|(idx, &tile)| tile as usize == idx);
                prop_assert_eq!(game.is_solved(), identity);
            }
        }
    }
}
