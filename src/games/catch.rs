use super::paint::{self, Canvas, Cell};
use super::{Direction, Game, GameInput, GameKind};
use crate::theme::Theme;
use crate::timer::Interval;
use rand::Rng;
use std::time::{Duration, Instant};

pub const FIELD_WIDTH: i32 = 400;
pub const FIELD_HEIGHT: i32 = 400;
pub const PADDLE_WIDTH: i32 = 50;
pub const PADDLE_HEIGHT: i32 = 10;
pub const OBJECT_SIZE: i32 = 20;
pub const PADDLE_STEP: i32 = 20;
pub const FALL_STEP: i32 = 5;
pub const TICK: Duration = Duration::from_millis(50);
const PADDLE_START: i32 = FIELD_WIDTH / 2 - PADDLE_WIDTH / 2;

// Terminal cells per field unit when drawing.
const CELL_W: i32 = 10;
const CELL_H: i32 = 20;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Falling
{
    pub x: i32,
    pub y: i32,
}

pub struct Catch<R>
{
    rng: R,
    paddle_x: i32,
    object: Falling,
    score: u32,
    over: bool,
    timer: Interval,
}

impl<R: Rng> Catch<R>
{
    pub fn new(mut rng: R, now: Instant) -> Self
    {
        let object = spawn(&mut rng);
        let mut timer = Interval::new(TICK);
        timer.start(now);
        Self {
            rng,
            paddle_x: PADDLE_START,
            object,
            score: 0,
            over: false,
            timer,
        }
    }

    #[cfg(test)]
    pub fn paddle_x(&self) -> i32
    {
        self.paddle_x
    }

    #[cfg(test)]
    pub fn object(&self) -> Falling
    {
        self.object
    }

    #[cfg(test)]
    pub fn score(&self) -> u32
    {
        self.score
    }

    #[cfg(test)]
    fn drop_at(&mut self, object: Falling)
    {
        self.object = object;
    }

    fn overlaps_paddle(&self) -> bool
    {
        let object = self.object;
        object.y + OBJECT_SIZE >= FIELD_HEIGHT - PADDLE_HEIGHT
            && object.x + OBJECT_SIZE >= self.paddle_x
            && object.x <= self.paddle_x + PADDLE_WIDTH
    }
}

fn spawn(rng: &mut impl Rng) -> Falling
{
    Falling {
        x: rng.gen_range(0..=FIELD_WIDTH - OBJECT_SIZE),
        y: -OBJECT_SIZE,
    }
}

impl<R: Rng> Game for Catch<R>
{
    fn kind(&self) -> GameKind
    {
        GameKind::Catch
    }

    fn handle_input(&mut self, input: GameInput, _now: Instant)
    {
        if self.over {
            return;
        }
        match input {
            GameInput::Arrow(Direction::Left) => {
                self.paddle_x = (self.paddle_x - PADDLE_STEP).max(0);
            }
            GameInput::Arrow(Direction::Right) => {
                self.paddle_x = (self.paddle_x + PADDLE_STEP).min(FIELD_WIDTH - PADDLE_WIDTH);
            }
            _ => {}
        }
    }

    fn tick(&mut self)
    {
        if self.over {
            return;
        }
        self.object.y += FALL_STEP;
        if self.overlaps_paddle() {
            self.score += 1;
            self.object = spawn(&mut self.rng);
        } else if self.object.y > FIELD_HEIGHT {
            self.over = true;
            self.timer.cancel();
            tracing::info!(score = self.score, "catch missed");
        }
    }

    fn poll(&mut self, now: Instant)
    {
        for _ in 0..self.timer.fire(now) {
            self.tick();
        }
    }

    fn reset(&mut self, now: Instant)
    {
        self.score = 0;
        self.over = false;
        self.paddle_x = PADDLE_START;
        self.object = spawn(&mut self.rng);
        self.timer.start(now);
    }

    fn dispose(&mut self)
    {
        self.timer.cancel();
    }

    fn is_over(&self) -> bool
    {
        self.over
    }

    fn status(&self) -> String
    {
        if self.over {
            format!("Score: {}  Game Over! Press r to restart", self.score)
        } else {
            format!("Score: {}", self.score)
        }
    }

    fn render(&self, theme: &Theme, _cursor: Option<usize>) -> Vec<String>
    {
        let mut lines = paint::header(theme, "Catch Game", &self.status());
        let cols = (FIELD_WIDTH / CELL_W) as usize;
        let rows = (FIELD_HEIGHT / CELL_H) as usize;
        let mut canvas = Canvas::new(cols, rows, Cell::new(" ", None, Some(theme.background)));

        if self.object.y + OBJECT_SIZE > 0 && self.object.y < FIELD_HEIGHT {
            let top = (self.object.y.max(0) / CELL_H) as usize;
            let left = (self.object.x / CELL_W) as usize;
            let span = (OBJECT_SIZE / CELL_W) as usize;
            for dx in 0..span {
                canvas.set(left + dx, top, Cell::new(" ", None, Some(theme.secondary)));
            }
        }

        let left = (self.paddle_x / CELL_W) as usize;
        let span = (PADDLE_WIDTH / CELL_W) as usize;
        for dx in 0..span {
            canvas.set(left + dx, rows - 1, Cell::new("▄", Some(theme.primary), Some(theme.background)));
        }

        lines.push(paint::accent_line(theme, &" ".repeat(cols)));
        lines.extend(canvas.into_lines());
        lines.push(paint::accent_line(theme, &" ".repeat(cols)));
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

    fn game() -> Catch<StdRng>
    {
        Catch::new(StdRng::seed_from_u64(42), Instant::now())
    }

    #[test]
    fn object_spawns_above_the_field()
    {
        let game = game();
        assert_eq!(game.object().y, -OBJECT_SIZE);
        assert!((0..=FIELD_WIDTH - OBJECT_SIZE).contains(&game.object().x));
        assert_eq!(game.paddle_x(), 175);
    }

    #[test]
    fn paddle_catch_scores_and_respawns()
    {
        let mut game = game();
        game.drop_at(Falling { x: 180, y: 365 });
        game.tick();
        assert_eq!(game.score(), 1);
        assert_eq!(game.object().y, -OBJECT_SIZE);
        assert!(!game.is_over());
    }

    #[test]
    fn miss_ends_game_past_bottom_edge()
    {
        let mut game = game();
        game.drop_at(Falling { x: 0, y: 390 });
        game.tick();
        assert!(!game.is_over());
        game.tick();
        game.tick();
        assert!(game.is_over());
        assert_eq!(game.score(), 0);

        let paddle = game.paddle_x();
        game.handle_input(GameInput::Arrow(Direction::Left), Instant::now());
        assert_eq!(game.paddle_x(), paddle);
    }

    #[test]
    fn reset_restores_paddle_and_score()
    {
        let start = Instant::now();
        let mut game = game();
        game.handle_input(GameInput::Arrow(Direction::Right), start);
        game.drop_at(Falling { x: 0, y: 401 });
        game.tick();
        assert!(game.is_over());
        game.reset(start);
        assert!(!game.is_over());
        assert_eq!(game.paddle_x(), 175);
        assert_eq!(game.object().y, -OBJECT_SIZE);
    }

    #[test]
    fn timer_drives_falling_until_disposed()
    {
        let start = Instant::now();
        let mut game = Catch::new(StdRng::seed_from_u64(1), start);
        game.poll(start + Duration::from_millis(100));
        assert_eq!(game.object().y, -OBJECT_SIZE + 2 * FALL_STEP);
        game.dispose();
        game.poll(start + Duration::from_secs(3));
        assert_eq!(game.object().y, -OBJECT_SIZE + 2 * FALL_STEP);
    }

    #[test]
    fn resuming_after_a_stall_does_not_drop_the_object_instantly()
    {
        let start = Instant::now();
        let mut game = Catch::new(StdRng::seed_from_u64(1), start);
        game.poll(start + Duration::from_secs(60));
        assert!(!game.is_over());
        assert_eq!(game.object().y, -OBJECT_SIZE + crate::timer::MAX_CATCH_UP as i32 * FALL_STEP);
    }

    proptest! {
        #[test]
        fn paddle_stays_in_bounds(moves in proptest::collection::vec(any::<bool>(), 0..200)) {
            let start = Instant::now();
            let mut game = game();
            for left in moves {
                let direction = if left { Direction::Left } else { Direction::Right };
                game.handle_input(GameInput::Arrow(direction), start);
                prop_assert!(game.paddle_x() >= 0);
                prop_assert!(game.paddle_x() <= FIELD_WIDTH - PADDLE_WIDTH);
            }
        }
    }
}
