use super::{Flow, Shell};
use crate::config::AppConfig;
use crate::error::AppError;
use crate::games::GameKind;
use crate::term::{self, TerminalGuard};
use crate::theme;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::time::{Duration, Instant};

const FRAME_MS: u64 = 33;

/// Runs the selection screen. With `game` set, that game opens immediately.
pub fn run(config: &AppConfig, game: Option<GameKind>, theme_name: Option<&str>) -> Result<(), AppError>
{
    let theme_name = theme_name.unwrap_or(&config.default_theme);
    let theme = theme::find(theme_name)
        .ok_or_else(|| AppError::Usage(format!("Unknown theme '{theme_name}'. Run `themes` to list them.")))?;

    let mut shell = Shell::new(theme, StdRng::from_entropy());
    let mut term = TerminalGuard::enter()?;
    tracing::info!(theme = %theme.name, "shell started");

    if let Some(kind) = game {
        shell.select_game(kind, Instant::now());
    }

    let mut last_frame: Option<Instant> = None;
    loop {
        let now = Instant::now();
        for key in term::pending_keys()? {
            if shell.handle_key(key, now) == Flow::Quit {
                if let Some(game) = shell.active_game() {
                    tracing::info!(game = game.kind().name(), status = %game.status(), "quit mid-game");
                }
                shell.back();
                tracing::info!("shell closed");
                return Ok(());
            }
        }

        shell.poll(now);

        if last_frame.is_none_or(|frame| frame.elapsed() >= Duration::from_millis(FRAME_MS)) {
            term.draw(&shell.render())?;
            last_frame = Some(Instant::now());
        }

        std::thread::sleep(Duration::from_millis(1));
    }
}
