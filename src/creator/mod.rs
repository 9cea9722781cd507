mod run;
pub mod store;
pub mod upload;

pub use run::run;

use crate::config::AppConfig;
use crate::error::{StoreError, SubmitError, UploadError};
use crate::games::{self, GameKind};
use crate::theme::{self, Theme};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::path::Path;
use std::time::Instant;
use store::{BlobStore, GameRecord, RecordStore};
use upload::ImageUpload;

const TOKEN_LEN: usize = 9;
const TOKEN_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// The game being put together, before and after submission.
pub struct CreatorDraft
{
    theme: Theme,
    game: GameKind,
    image: Option<ImageUpload>,
    link: Option<String>,
}

/// What a successful submission hands back to the user.
pub struct Submission
{
    pub token: String,
    pub url: String,
    pub preview: Vec<String>,
}

impl CreatorDraft
{
    pub fn new() -> Self
    {
        Self {
            theme: theme::creator_default().clone(),
            game: GameKind::Snake,
            image: None,
            link: None,
        }
    }

    pub fn theme(&self) -> &Theme
    {
        &self.theme
    }

    pub fn game(&self) -> GameKind
    {
        self.game
    }

    pub fn image(&self) -> Option<&ImageUpload>
    {
        self.image.as_ref()
    }

    pub fn link(&self) -> Option<&str>
    {
        self.link.as_deref()
    }

    /// Replaces the draft theme wholesale with a catalog entry.
    pub fn choose_theme(&mut self, name: &str) -> bool
    {
        match theme::find(name) {
            Some(theme) => {
                self.theme = theme.clone();
                true
            }
            None => false,
        }
    }

    pub fn choose_game(&mut self, name: &str) -> bool
    {
        match GameKind::from_name(name) {
            Some(kind) => {
                self.game = kind;
                true
            }
            None => false,
        }
    }

    /// Validates and attaches an image. On error the draft keeps its old image.
    pub fn attach_image(&mut self, path: &Path) -> Result<&ImageUpload, UploadError>
    {
        let image = ImageUpload::from_path(path)?;
        tracing::info!(name = image.name(), content_type = image.content_type(), "image attached");
        Ok(self.image.insert(image))
    }

    #[cfg(test)]
    pub fn attach_bytes(&mut self, name: &str, bytes: Vec<u8>) -> Result<&ImageUpload, UploadError>
    {
        let image = ImageUpload::from_bytes(name, bytes)?;
        Ok(self.image.insert(image))
    }

    pub fn clear_image(&mut self)
    {
        self.image = None;
    }

    /// Uploads the image (if any), stores the record and builds the share link.
    /// Any failure leaves the draft untouched so the user can retry.
    pub fn submit(
        &mut self,
        blobs: &mut dyn BlobStore,
        records: &mut dyn RecordStore,
        config: &AppConfig,
        rng: &mut impl Rng,
    ) -> Result<Submission, SubmitError>
    {
        let img = match &self.image {
            Some(image) => Some(
                blobs
                    .upload(image.bytes(), image.content_type())
                    .map_err(SubmitError::Upload)?,
            ),
            None => None,
        };

        let token = share_token(rng);
        let record = GameRecord {
            theme: self.theme.name.clone(),
            pass: token.clone(),
            game: self.game.name().to_string(),
            img,
        };
        let record_id = records.insert(&record).map_err(SubmitError::Insert)?;

        let url = config.share_url(&token);
        self.link = Some(url.clone());
        tracing::info!(%record_id, game = %record.game, theme = %record.theme, %url, "game created");

        Ok(Submission {
            token,
            url,
            preview: preview(self.game, &self.theme, rng),
        })
    }
}

impl Default for CreatorDraft
{
    fn default() -> Self
    {
        Self::new()
    }
}

/// Reads back the game shared under `token`.
pub fn lookup(records: &dyn RecordStore, token: &str) -> Result<GameRecord, StoreError>
{
    records
        .find(token.trim())?
        .ok_or_else(|| StoreError::NotFound(token.trim().to_string()))
}

/// Nine random lowercase base36 characters.
pub fn share_token(rng: &mut impl Rng) -> String
{
    (0..TOKEN_LEN)
        .map(|_| TOKEN_ALPHABET[rng.gen_range(0..TOKEN_ALPHABET.len())] as char)
        .collect()
}

/// A fresh session of `kind`, disposed before it is drawn so it never moves.
pub fn preview(kind: GameKind, theme: &Theme, rng: &mut impl Rng) -> Vec<String>
{
    let mut game = games::start(kind, StdRng::seed_from_u64(rng.r#gen()), Instant::now());
    game.dispose();
    game.render(theme, None)
}

#[cfg(test)]
mod tests
{
    use super::*;
    use std::io;

    #[derive(Default)]
    struct MemoryBlobs
    {
        stored: Vec<(Vec<u8>, String)>,
        fail: bool,
    }

    impl BlobStore for MemoryBlobs
    {
        fn upload(&mut self, bytes: &[u8], content_type: &str) -> Result<String, StoreError>
        {
            if self.fail {
                return Err(StoreError::Io(io::Error::other("bucket offline")));
            }
            self.stored.push((bytes.to_vec(), content_type.to_string()));
            Ok(format!("images/{}.png", self.stored.len()))
        }
    }

    #[derive(Default)]
    struct MemoryRecords
    {
        rows: Vec<GameRecord>,
        fail: bool,
    }

    impl RecordStore for MemoryRecords
    {
        fn insert(&mut self, record: &GameRecord) -> Result<String, StoreError>
        {
            if self.fail {
                return Err(StoreError::Io(io::Error::other("table locked")));
            }
            self.rows.push(record.clone());
            Ok(self.rows.len().to_string())
        }

        fn find(&self, pass: &str) -> Result<Option<GameRecord>, StoreError>
        {
            Ok(self.rows.iter().find(|row| row.pass == pass).cloned())
        }
    }

    fn config(origin: &str) -> AppConfig
    {
        AppConfig {
            share_origin: origin.to_string(),
            ..AppConfig::default()
        }
    }

    fn png() -> Vec<u8>
    {
        let mut bytes = b"\x89PNG\r\n\x1a\n".to_vec();
        bytes.extend_from_slice(&[0; 32]);
        bytes
    }

    #[test]
    fn defaults_to_minimalist_snake()
    {
        let draft = CreatorDraft::new();
        assert_eq!(draft.theme().name, "Minimalist");
        assert_eq!(draft.game(), GameKind::Snake);
        assert!(draft.image().is_none() && draft.link().is_none());
    }

    #[test]
    fn choosing_theme_replaces_it_wholesale()
    {
        let mut draft = CreatorDraft::new();
        assert!(draft.choose_theme("oceanic"));
        assert_eq!(draft.theme(), theme::find("Oceanic").expect("oceanic"));
        assert!(!draft.choose_theme("Plaid"));
        assert_eq!(draft.theme().name, "Oceanic");
        assert!(draft.choose_game("Match Making"));
        assert_eq!(draft.game(), GameKind::MemoryMatch);
        assert!(!draft.choose_game("Chess"));
    }

    #[test]
    fn oversized_upload_leaves_draft_image_unset()
    {
        let mut draft = CreatorDraft::new();
        let mut big = png();
        big.resize(6 * 1024 * 1024, 0);
        let err = draft.attach_bytes("big.png", big).err().expect("rejected");
        assert!(matches!(err, UploadError::TooLarge { .. }));
        assert!(draft.image().is_none());

        draft.attach_bytes("ok.png", png()).expect("accepted");
        assert!(draft.attach_bytes("doc.txt", b"text".to_vec()).is_err());
        assert_eq!(draft.image().map(|image| image.name()), Some("ok.png"));
    }

    #[test]
    fn submit_uploads_image_and_records_game()
    {
        let mut rng = StdRng::seed_from_u64(3);
        let mut blobs = MemoryBlobs::default();
        let mut records = MemoryRecords::default();
        let mut draft = CreatorDraft::new();
        draft.choose_theme("Retro");
        draft.choose_game("Puzzle Game");
        draft.attach_bytes("me.png", png()).expect("image");

        let submission = draft
            .submit(&mut blobs, &mut records, &config("https://games.test/"), &mut rng)
            .expect("submitted");
        assert_eq!(submission.token.len(), 9);
        assert!(submission.token.bytes().all(|b| TOKEN_ALPHABET.contains(&b)));
        assert_eq!(submission.url, format!("https://games.test/play/{}", submission.token));
        assert_eq!(draft.link(), Some(submission.url.as_str()));
        assert_eq!(blobs.stored[0].1, "image/png");
        assert_eq!(
            records.rows[0],
            GameRecord {
                theme: "Retro".to_string(),
                pass: submission.token.clone(),
                game: "Puzzle".to_string(),
                img: Some("images/1.png".to_string()),
            }
        );
        assert!(submission.preview.join("\n").contains("Sliding Puzzle"));
    }

    #[test]
    fn submit_without_image_stores_no_path()
    {
        let mut rng = StdRng::seed_from_u64(4);
        let mut blobs = MemoryBlobs::default();
        let mut records = MemoryRecords::default();
        let mut draft = CreatorDraft::new();
        draft.submit(&mut blobs, &mut records, &config("https://x.test"), &mut rng).expect("ok");
        assert!(blobs.stored.is_empty());
        assert_eq!(records.rows[0].img, None);
        assert_eq!(records.rows[0].game, "Snake");
    }

    #[test]
    fn failures_keep_the_draft_for_retry()
    {
        let mut rng = StdRng::seed_from_u64(5);
        let mut blobs = MemoryBlobs {
            fail: true,
            ..Default::default()
        };
        let mut records = MemoryRecords::default();
        let mut draft = CreatorDraft::new();
        draft.attach_bytes("me.png", png()).expect("image");

        let err = draft.submit(&mut blobs, &mut records, &config("https://x.test"), &mut rng).err().expect("fails");
        assert!(matches!(err, SubmitError::Upload(_)));
        assert!(records.rows.is_empty());
        assert!(draft.link().is_none() && draft.image().is_some());

        blobs.fail = false;
        records.fail = true;
        let err = draft.submit(&mut blobs, &mut records, &config("https://x.test"), &mut rng).err().expect("fails");
        assert!(matches!(err, SubmitError::Insert(_)));
        assert!(draft.link().is_none());

        records.fail = false;
        assert!(draft.submit(&mut blobs, &mut records, &config("https://x.test"), &mut rng).is_ok());
        assert_eq!(records.rows.len(), 1);
    }

    #[test]
    fn submitted_games_can_be_looked_up()
    {
        let mut rng = StdRng::seed_from_u64(6);
        let mut blobs = MemoryBlobs::default();
        let mut records = MemoryRecords::default();
        let mut draft = CreatorDraft::new();
        draft.choose_game("Catch Game");
        let submission = draft
            .submit(&mut blobs, &mut records, &config("https://x.test"), &mut rng)
            .expect("submitted");

        let record = lookup(&records, &format!(" {} ", submission.token)).expect("found");
        assert_eq!(record.game, "Catch");
        assert_eq!(record.theme, "Minimalist");
        assert!(matches!(lookup(&records, "000000000"), Err(StoreError::NotFound(_))));
    }

    #[test]
    fn preview_never_advances()
    {
        let theme = theme::find("Christmas").expect("theme");
        let mut rng = StdRng::seed_from_u64(8);
        let lines = preview(GameKind::Snake, theme, &mut rng);
        assert!(lines.join("\n").contains("Score: 0"));
        assert!(lines[0].contains(&theme.glyph));
    }
}
