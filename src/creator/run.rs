use super::store::{FsBlobStore, JsonlRecordStore};
use super::CreatorDraft;
use crate::config::AppConfig;
use crate::error::AppError;
use crate::games::GameKind;
use crate::theme;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::io::{self, BufRead, Write};
use std::path::Path;

const FAILURE_NOTICE: &str = "Failed to create game. Please try again.";

#[derive(Debug, PartialEq, Eq)]
enum Command<'a>
{
    Theme(&'a str),
    Themes,
    Image(&'a str),
    NoImage,
    Game(&'a str),
    Games,
    Show,
    Submit,
    Help,
    Quit,
    Unknown(&'a str),
}

fn parse(line: &str) -> Command<'_>
{
    let line = line.trim();
    let (word, arg) = match line.split_once(char::is_whitespace) {
        Some((word, arg)) => (word, arg.trim()),
        None => (line, ""),
    };
    match word.to_ascii_lowercase().as_str() {
        "theme" if !arg.is_empty() => Command::Theme(arg),
        "themes" | "theme" => Command::Themes,
        "image" if !arg.is_empty() => Command::Image(arg),
        "noimage" => Command::NoImage,
        "game" if !arg.is_empty() => Command::Game(arg),
        "games" | "game" => Command::Games,
        "show" | "" => Command::Show,
        "submit" | "create" => Command::Submit,
        "help" | "?" => Command::Help,
        "quit" | "q" | "exit" => Command::Quit,
        _ => Command::Unknown(line),
    }
}

/// Interactive game creator on stdin/stdout.
pub fn run(config: &AppConfig) -> Result<(), AppError>
{
    let mut blobs = FsBlobStore::new(config.store_dir.clone());
    let mut records = JsonlRecordStore::new(&config.store_dir);
    let mut rng = StdRng::from_entropy();
    let mut draft = CreatorDraft::new();

    println!("Create a game");
    print_help();
    println!();
    print_draft(&draft);

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("> ");
        io::stdout().flush()?;
        let Some(line) = lines.next() else {
            return Ok(());
        };
        let line = line?;

        match parse(&line) {
            Command::Theme(name) => {
                if draft.choose_theme(name) {
                    println!("Theme set to {}.", draft.theme().name);
                } else {
                    println!("Unknown theme '{name}'. Type `themes` to list them.");
                }
            }
            Command::Themes => {
                for theme in theme::catalog() {
                    let marker = if theme.name == draft.theme().name { "*" } else { " " };
                    println!(" {marker} {} {}", theme.glyph, theme.name);
                }
            }
            Command::Image(path) => match draft.attach_image(Path::new(path)) {
                Ok(image) => println!("Attached {}", image.thumbnail()),
                Err(err) => println!("{err}"),
            },
            Command::NoImage => {
                draft.clear_image();
                println!("Image removed.");
            }
            Command::Game(name) => {
                if draft.choose_game(name) {
                    println!("Game set to {}.", draft.game().name());
                } else {
                    println!("Unknown game '{name}'. Type `games` to list them.");
                }
            }
            Command::Games => {
                for kind in GameKind::ALL {
                    let marker = if kind == draft.game() { "*" } else { " " };
                    println!(" {marker} {:<12} - {}", kind.name(), kind.description());
                }
            }
            Command::Show => print_draft(&draft),
            Command::Submit => match draft.submit(&mut blobs, &mut records, config, &mut rng) {
                Ok(submission) => {
                    println!();
                    for line in &submission.preview {
                        println!("{line}\x1b[0m");
                    }
                    println!();
                    println!("Game created! Share this link:");
                    println!("  {}", submission.url);
                    println!("Open it here with `open {}`.", submission.token);
                }
                Err(err) => {
                    tracing::error!(error = %err, "game creation failed");
                    println!("{FAILURE_NOTICE}");
                }
            },
            Command::Help => print_help(),
            Command::Quit => return Ok(()),
            Command::Unknown(text) => println!("Unknown command '{text}'. Type `help`."),
        }
    }
}

fn print_draft(draft: &CreatorDraft)
{
    let theme = draft.theme();
    println!("Theme: {} {}", theme.glyph, theme.name);
    println!(
        "  background {}  primary {}  secondary {}  text {}",
        theme.background, theme.primary, theme.secondary, theme.text
    );
    println!("  font {}", theme.font_family);
    println!("Game:  {}", draft.game().name());
    match draft.image() {
        Some(image) => println!("Image: {}", image.thumbnail()),
        None => println!("Image: none"),
    }
    if let Some(link) = draft.link() {
        println!("Link:  {link}");
    }
}

fn print_help()
{
    println!("Commands:");
    println!("  theme <name>   pick a theme        themes   list themes");
    println!("  game <name>    pick a game         games    list games");
    println!("  image <path>   attach an image     noimage  remove it");
    println!("  show           show the draft      submit   create the game");
    println!("  quit");
}
