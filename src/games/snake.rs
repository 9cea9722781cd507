use super::paint::{self, Canvas, Cell};
use super::{Direction, Game, GameInput, GameKind};
use crate::theme::Theme;
use crate::timer::Interval;
use rand::Rng;
use std::collections::VecDeque;
use std::time::{Duration, Instant};

pub const GRID: i32 = 20;
pub const TICK: Duration = Duration::from_millis(200);
const START: Point = Point { x: 10, y: 10 };
const FIRST_FOOD: Point = Point { x: 15, y: 15 };

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Point
{
    pub x: i32,
    pub y: i32,
}

impl Point
{
    fn step(self, direction: Direction) -> Self
    {
        match direction {
            Direction::Up => Point { x: self.x, y: self.y - 1 },
            Direction::Down => Point { x: self.x, y: self.y + 1 },
            Direction::Left => Point { x: self.x - 1, y: self.y },
            Direction::Right => Point { x: self.x + 1, y: self.y },
        }
    }

    fn in_bounds(self) -> bool
    {
        (0..GRID).contains(&self.x) && (0..GRID).contains(&self.y)
    }
}

pub struct Snake<R>
{
    rng: R,
    body: VecDeque<Point>,
    direction: Direction,
    food: Point,
    score: u32,
    over: bool,
    timer: Interval,
}

impl<R: Rng> Snake<R>
{
    pub fn new(rng: R, now: Instant) -> Self
    {
        let mut timer = Interval::new(TICK);
        timer.start(now);
        Self {
            rng,
            body: VecDeque::from([START]),
            direction: Direction::Right,
            food: FIRST_FOOD,
            score: 0,
            over: false,
            timer,
        }
    }

    #[cfg(test)]
    pub fn len(&self) -> usize
    {
        self.body.len()
    }

    pub fn head(&self) -> Point
    {
        self.body[0]
    }

    #[cfg(test)]
    pub fn food(&self) -> Point
    {
        self.food
    }

    #[cfg(test)]
    pub fn score(&self) -> u32
    {
        self.score
    }

    #[cfg(test)]
    pub fn direction(&self) -> Direction
    {
        self.direction
    }

    #[cfg(test)]
    fn place_food(&mut self, food: Point)
    {
        self.food = food;
    }

    // Food may land on the body; occupancy is not checked.
    fn random_food(&mut self) -> Point
    {
        Point {
            x: self.rng.gen_range(0..GRID),
            y: self.rng.gen_range(0..GRID),
        }
    }
}

impl<R: Rng> Game for Snake<R>
{
    fn kind(&self) -> GameKind
    {
        GameKind::Snake
    }

    fn handle_input(&mut self, input: GameInput, _now: Instant)
    {
        if self.over {
            return;
        }
        if let GameInput::Arrow(direction) = input {
            self.direction = direction;
        }
    }

    fn tick(&mut self)
    {
        if self.over {
            return;
        }
        let head = self.head().step(self.direction);
        // The tail still counts here: it has not moved yet.
        if !head.in_bounds() || self.body.contains(&head) {
            self.over = true;
            self.timer.cancel();
            tracing::info!(score = self.score, "snake crashed");
            return;
        }

        self.body.push_front(head);
        if head == self.food {
            self.score += 1;
            self.food = self.random_food();
        } else {
            self.body.pop_back();
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
        self.body = VecDeque::from([START]);
        self.direction = Direction::Right;
        self.food = self.random_food();
        self.score = 0;
        self.over = false;
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
        let mut lines = paint::header(theme, "Snake Game", &self.status());
        let empty = Cell::new("  ", None, Some(theme.background));
        let mut canvas = Canvas::new(GRID as usize + 2, GRID as usize + 2, empty);
        let border = Cell::new("  ", None, Some(theme.primary));
        for i in 0..(GRID as usize + 2) {
            canvas.set(i, 0, border.clone());
            canvas.set(i, GRID as usize + 1, border.clone());
            canvas.set(0, i, border.clone());
            canvas.set(GRID as usize + 1, i, border.clone());
        }
        let cell_at = |point: Point| (point.x as usize + 1, point.y as usize + 1);

        let (fx, fy) = cell_at(self.food);
        canvas.set(fx, fy, Cell::new("  ", None, Some(theme.secondary)));
        for segment in &self.body {
            let (x, y) = cell_at(*segment);
            canvas.set(x, y, Cell::new("  ", None, Some(theme.primary)));
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

    fn snake() -> Snake<StdRng>
    {
        Snake::new(StdRng::seed_from_u64(1), Instant::now())
    }

    #[test]
    fn moves_right_by_default()
    {
        let mut game = snake();
        game.tick();
        assert_eq!(game.head(), Point { x: 11, y: 10 });
        assert_eq!(game.len(), 1);
    }

    #[test]
    fn eating_grows_and_scores()
    {
        let mut game = snake();
        game.place_food(Point { x: 11, y: 10 });
        game.tick();
        assert_eq!(game.len(), 2);
        assert_eq!(game.score(), 1);
        let food = game.food();
        assert!(food.in_bounds());
    }

    #[test]
    fn wall_collision_ends_game()
    {
        let mut game = snake();
        game.handle_input(GameInput::Arrow(Direction::Up), Instant::now());
        for _ in 0..10 {
            game.tick();
        }
        assert!(!game.is_over());
        assert_eq!(game.head(), Point { x: 10, y: 0 });
        game.tick();
        assert!(game.is_over());
        assert_eq!(game.head(), Point { x: 10, y: 0 });
    }

    #[test]
    fn reversing_into_the_body_ends_game()
    {
        let mut game = snake();
        game.place_food(Point { x: 11, y: 10 });
        game.tick();
        game.handle_input(GameInput::Arrow(Direction::Left), Instant::now());
        game.tick();
        assert!(game.is_over());
    }

    #[test]
    fn input_after_game_over_is_ignored_until_reset()
    {
        let start = Instant::now();
        let mut game = snake();
        game.handle_input(GameInput::Arrow(Direction::Left), start);
        for _ in 0..11 {
            game.tick();
        }
        assert!(game.is_over());
        game.handle_input(GameInput::Arrow(Direction::Down), start);
        assert_eq!(game.direction(), Direction::Left);

        game.reset(start);
        assert!(!game.is_over());
        assert_eq!(game.score(), 0);
        assert_eq!(game.head(), START);
        assert_eq!(game.direction(), Direction::Right);
    }

    #[test]
    fn poll_ticks_once_per_period_and_stops_after_dispose()
    {
        let start = Instant::now();
        let mut game = Snake::new(StdRng::seed_from_u64(3), start);
        game.poll(start + Duration::from_millis(450));
        assert_eq!(game.head(), Point { x: 12, y: 10 });

        game.dispose();
        game.poll(start + Duration::from_secs(5));
        assert_eq!(game.head(), Point { x: 12, y: 10 });
    }

    #[test]
    fn render_uses_theme_colors()
    {
        let theme = crate::theme::find("Neon").expect("theme");
        let lines = snake().render(theme, None);
        let joined = lines.join("\n");
        assert!(joined.contains(&theme.primary.bg()));
        assert!(joined.contains(&theme.secondary.bg()));
        assert!(joined.contains("Score: 0"));
    }

    proptest! {
        #[test]
        fn length_changes_only_when_eating(moves in proptest::collection::vec(0u8..4, 1..60), seed in any::<u64>()) {
            let start = Instant::now();
            let mut game = Snake::new(StdRng::seed_from_u64(seed), start);
            for step in moves {
                let direction = match step {
                    0 => Direction::Up,
                    1 => Direction::Down,
                    2 => Direction::Left,
                    _ => Direction::Right,
                };
                game.handle_input(GameInput::Arrow(direction), start);
                let len = game.len();
                let score = game.score();
                let will_eat = game.head().step(game.direction()) == game.food();
                game.tick();
                if game.is_over() {
                    prop_assert_eq!(game.len(), len);
                    break;
                }
                if will_eat {
                    prop_assert_eq!(game.len(), len + 1);
                    prop_assert_eq!(game.score(), score + 1);
                } else {
                    prop_assert_eq!(game.len(), len);
                    prop_assert_eq!(game.score(), score);
                }
            }
        }
    }
}
