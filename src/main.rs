mod config;
mod creator;
mod error;
mod games;
mod logging;
mod shell;
mod term;
mod theme;
mod timer;

use config::AppConfig;
use creator::store::JsonlRecordStore;
use error::AppError;
use games::GameKind;
use std::env;

fn main()
{
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), AppError>
{
    let mut args = env::args().skip(1);
    let command = args.next();
    let rest: Vec<String> = args.collect();

    match command.as_deref() {
        Some("-h") | Some("--help") => {
            print_help();
            Ok(())
        }
        Some("list") => {
            list_games();
            Ok(())
        }
        Some("themes") => {
            list_themes();
            Ok(())
        }
        cmd if opens_session(cmd) => {
            let config = AppConfig::load()?;
            logging::init(&config.log_file)?;
            tracing::debug!(?config, "configuration loaded");
            run_session(command.as_deref(), &rest, &config)
        }
        Some(other) => Err(AppError::Usage(format!("Unknown command '{other}'. Run with --help."))),
        None => unreachable!("opens_session(None) is true"),
    }
}

/// Commands that open the shell or the creator; only these load config and log.
fn opens_session(command: Option<&str>) -> bool
{
    matches!(command, None | Some("play") | Some("create") | Some("open"))
}

fn run_session(command: Option<&str>, rest: &[String], config: &AppConfig) -> Result<(), AppError>
{
    match command {
        Some("play") => {
            let (kind, theme) = parse_play(rest)?;
            shell::run(config, Some(kind), theme)
        }
        Some("create") => creator::run(config),
        Some("open") => {
            let [token] = rest else {
                return Err(AppError::Usage("Usage: mini-games open <token>".to_string()));
            };
            open_shared(config, token)
        }
        _ => shell::run(config, None, None),
    }
}

fn parse_play(args: &[String]) -> Result<(GameKind, Option<&str>), AppError>
{
    let mut kind = None;
    let mut theme = None;
    for arg in args {
        if let Some(name) = arg.strip_prefix("--theme=") {
            theme = Some(name);
        } else if kind.is_none() {
            kind = Some(
                GameKind::from_name(arg)
                    .ok_or_else(|| AppError::Usage(format!("Unknown game '{arg}'. Run `list` to see them.")))?,
            );
        } else {
            return Err(AppError::Usage(format!("Unexpected argument '{arg}'.")));
        }
    }
    let kind = kind.ok_or_else(|| AppError::Usage("Usage: mini-games play <game> [--theme=NAME]".to_string()))?;
    Ok((kind, theme))
}

fn open_shared(config: &AppConfig, token: &str) -> Result<(), AppError>
{
    let store = JsonlRecordStore::new(&config.store_dir);
    let record = creator::lookup(&store, token)?;
    let kind = GameKind::from_name(&record.game)
        .ok_or_else(|| AppError::Usage(format!("Shared game '{}' is not available.", record.game)))?;
    tracing::info!(%token, game = %record.game, theme = %record.theme, "opening shared game");
    if let Some(img) = &record.img {
        println!("Shared with image {}", config.store_dir.join(img).display());
    }
    shell::run(config, Some(kind), Some(record.theme.as_str()))
}

fn list_games()
{
    println!("Available games:");
    for game in games::registry() {
        println!("  {:<10} {:<14} - {}", game.kind.slug(), game.name, game.description);
    }
}

fn list_themes()
{
    println!("Available themes:");
    for theme in theme::catalog() {
        println!("  {} {:<20} {}", theme.glyph, theme.name, theme.font_family);
    }
}

fn print_help()
{
    println!("mini-games");
    println!("\nUsage:");
    println!("  mini-games                         pick a game and theme interactively");
    println!("  mini-games list");
    println!("  mini-games themes");
    println!("  mini-games play <game> [--theme=NAME]");
    println!("  mini-games create                  build a shareable game");
    println!("  mini-games open <token>            play a shared game");
    println!("\nKeys:");
    println!("  arrows/enter move and select, t/T cycle themes, c customize, x drop custom,");
    println!("  r restart, Esc or b back, q quit.");
    println!("\nConfig:");
    println!("  ./mini-games.toml or $MINI_GAMES_CONFIG (default_theme, share_origin, store_dir, log_file).");
    println!("  MINI_GAMES_ORIGIN and MINI_GAMES_STORE override share_origin and store_dir.");
    println!("  RUST_LOG sets the log filter.");
}
