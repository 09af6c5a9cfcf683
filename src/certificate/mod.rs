//! Certificate rendering: template selection, name centering and caching.

mod text;

pub use text::{center_offset, TextLayout};

use std::io::{Cursor, ErrorKind};
use std::path::{Path, PathBuf};

use image::{ImageFormat, Rgba, RgbaImage};
use rusttype::Font;
use thiserror::Error;
use tracing::{debug, info};

use crate::config::Config;
use crate::storage::{CacheKey, CertificateStore};

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("certificate template not found at {}", .0.display())]
    MissingTemplate(PathBuf),

    #[error("font file not found at {}", .0.display())]
    MissingFont(PathBuf),

    #[error("invalid event: {0}")]
    InvalidEvent(String),

    #[error("unexpected error generating certificate: {0}")]
    Unexpected(String),
}

impl From<std::io::Error> for RenderError {
    fn from(e: std::io::Error) -> Self {
        RenderError::Unexpected(e.to_string())
    }
}

impl From<image::ImageError> for RenderError {
    fn from(e: image::ImageError) -> Self {
        RenderError::Unexpected(e.to_string())
    }
}

/// Events that have their own certificate artwork.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    AimlBootcamp,
    DsaBootcamp,
}

impl Event {
    pub const ALL: [Event; 2] = [Event::AimlBootcamp, Event::DsaBootcamp];

    pub fn label(self) -> &'static str {
        match self {
            Event::AimlBootcamp => "AIML Bootcamp",
            Event::DsaBootcamp => "DSA Bootcamp",
        }
    }

    /// Case-insensitive match on the event label.
    pub fn parse(label: &str) -> Option<Self> {
        let label = label.trim();
        Self::ALL
            .into_iter()
            .find(|event| event.label().eq_ignore_ascii_case(label))
    }
}

/// Background images, one per known event plus the no-event default.
#[derive(Debug, Clone)]
pub struct TemplateSet {
    pub default: PathBuf,
    pub aiml: PathBuf,
    pub dsa: PathBuf,
}

impl TemplateSet {
    pub fn path_for(&self, event: Option<Event>) -> &Path {
        match event {
            None => &self.default,
            Some(Event::AimlBootcamp) => &self.aiml,
            Some(Event::DsaBootcamp) => &self.dsa,
        }
    }
}

#[derive(Debug, Clone)]
pub struct FontSettings {
    pub path: PathBuf,
    pub size: f32,
    pub color: Rgba<u8>,
}

pub struct CertificateRenderer {
    store: CertificateStore,
    templates: TemplateSet,
    font: FontSettings,
}

impl CertificateRenderer {
    pub fn new(store: CertificateStore, templates: TemplateSet, font: FontSettings) -> Self {
        Self {
            store,
            templates,
            font,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            CertificateStore::new(&config.certificate_folder),
            TemplateSet {
                default: config.default_template.clone(),
                aiml: config.aiml_template.clone(),
                dsa: config.dsa_template.clone(),
            },
            FontSettings {
                path: config.font_path.clone(),
                size: config.font_size,
                color: config.text_color,
            },
        )
    }

    pub fn store(&self) -> &CertificateStore {
        &self.store
    }

    /// Returns the certificate for `name` (and `event`), rendering it only if
    /// no file exists yet for the sanitized key.
    pub fn render(&self, name: &str, event: Option<&str>) -> Result<PathBuf, RenderError> {
        let key = CacheKey::new(name, event);
        if let Some(path) = self.store.lookup(&key) {
            debug!("Certificate cache hit: {}", path.display());
            return Ok(path);
        }

        let event = event
            .map(|label| Event::parse(label).ok_or_else(|| RenderError::InvalidEvent(label.to_string())))
            .transpose()?;
        let template_path = self.templates.path_for(event);

        let template = read_or(template_path, RenderError::MissingTemplate)?;
        let font = read_or(&self.font.path, RenderError::MissingFont)?;

        let template = image::load_from_memory(&template)?.to_rgba8();
        let font = Font::try_from_vec(font).ok_or_else(|| {
            RenderError::Unexpected(format!("unreadable font {}", self.font.path.display()))
        })?;

        let png = self.compose(template, &font, name)?;
        let path = self.store.store(&key, &png)?;
        info!(
            "Rendered certificate for {:?} ({}) at {}",
            name,
            event.map_or("no event", Event::label),
            path.display()
        );
        Ok(path)
    }

    fn compose(&self, mut image: RgbaImage, font: &Font<'_>, name: &str) -> Result<Vec<u8>, RenderError> {
        let layout = TextLayout::new(font, self.font.size, name);
        if let Some(bounds) = layout.bounds() {
            let (dx, dy) = center_offset(image.width(), image.height(), bounds);
            debug!("Placing {:?} at {:?}", name, bounds.translate(dx, dy));
            layout.draw(&mut image, dx, dy, self.font.color);
        }

        let mut png = Vec::new();
        image.write_to(&mut Cursor::new(&mut png), ImageFormat::Png)?;
        Ok(png)
    }
}

fn read_or(path: &Path, missing: fn(PathBuf) -> RenderError) -> Result<Vec<u8>, RenderError> {
    std::fs::read(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => missing(path.to_path_buf()),
        _ => RenderError::from(e),
    })
}
