use crate::error::UploadError;
use std::fs::File;
use std::io::Read;
use std::path::Path;

pub const MAX_IMAGE_BYTES: u64 = 5 * 1024 * 1024;

const SNIFF_LEN: usize = 16;

/// An image accepted into a draft, held in memory until submission.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ImageUpload
{
    name: String,
    content_type: String,
    bytes: Vec<u8>,
}

impl ImageUpload
{
    pub fn from_path(path: &Path) -> Result<Self, UploadError>
    {
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let unreadable = |err: std::io::Error| UploadError::Unreadable {
            name: name.clone(),
            reason: err.to_string(),
        };

        let mut file = File::open(path).map_err(unreadable)?;
        let size = file.metadata().map_err(unreadable)?.len();
        let mut head = [0u8; SNIFF_LEN];
        let read = file.read(&mut head).map_err(unreadable)?;
        check(&name, content_type(&name, &head[..read]), size)?;

        let mut bytes = Vec::with_capacity(size as usize);
        bytes.extend_from_slice(&head[..read]);
        file.read_to_end(&mut bytes).map_err(unreadable)?;
        Self::from_bytes(name, bytes)
    }

    pub fn from_bytes(name: impl Into<String>, bytes: Vec<u8>) -> Result<Self, UploadError>
    {
        let name = name.into();
        let mime = content_type(&name, &bytes);
        check(&name, mime.clone(), bytes.len() as u64)?;
        Ok(Self {
            name,
            content_type: mime,
            bytes,
        })
    }

    pub fn name(&self) -> &str
    {
        &self.name
    }

    pub fn content_type(&self) -> &str
    {
        &self.content_type
    }

    pub fn bytes(&self) -> &[u8]
    {
        &self.bytes
    }

    /// One-line stand-in for the uploaded picture.
    pub fn thumbnail(&self) -> String
    {
        format!(
            "[{}: {}, {:.1} KB]",
            self.name,
            self.content_type,
            self.bytes.len() as f64 / 1024.0
        )
    }
}

fn check(name: &str, mime: String, size: u64) -> Result<(), UploadError>
{
    if !mime.starts_with("image/") {
        return Err(UploadError::NotAnImage {
            name: name.to_string(),
            mime,
        });
    }
    if size > MAX_IMAGE_BYTES {
        return Err(UploadError::TooLarge {
            name: name.to_string(),
            size,
        });
    }
    Ok(())
}

/// Magic bytes first, file extension second.
pub fn content_type(name: &str, head: &[u8]) -> String
{
    sniff(head)
        .or_else(|| from_extension(name))
        .unwrap_or("application/octet-stream")
        .to_string()
}

fn sniff(head: &[u8]) -> Option<&'static str>
{
    if head.starts_with(b"\x89PNG\r\n\x1a\n") {
        Some("image/png")
    } else if head.starts_with(&[0xFF, 0xD8, 0xFF]) {
        Some("image/jpeg")
    } else if head.starts_with(b"GIF87a") || head.starts_with(b"GIF89a") {
        Some("image/gif")
    } else if head.len() >= 12 && &head[..4] == b"RIFF" && &head[8..12] == b"WEBP" {
        Some("image/webp")
    } else if head.starts_with(b"BM") {
        Some("image/bmp")
    } else if head.starts_with(b"%PDF") {
        Some("application/pdf")
    } else if head.starts_with(b"PK\x03\x04") {
        Some("application/zip")
    } else {
        None
    }
}

fn from_extension(name: &str) -> Option<&'static str>
{
    let ext = Path::new(name).extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        "bmp" => Some("image/bmp"),
        "svg" => Some("image/svg+xml"),
        "txt" => Some("text/plain"),
        "json" => Some("application/json"),
        _ => None,
    }
}

/// File extension used when storing an image of this type.
pub fn extension_for(content_type: &str) -> &'static str
{
    match content_type {
        "image/png" => "png",
        "image/jpeg" => "jpg",
        "image/gif" => "gif",
        "image/webp" => "webp",
        "image/bmp" => "bmp",
        "image/svg+xml" => "svg",
        _ => "bin",
    }
}
