//! vitae
//!
//! A renderer for JSON Resume documents that delegates presentation to
//! pluggable theme packages discovered at runtime.
//!
//! # Features
//!
//! - **Theme Resolution**: walks up from a working directory to find
//!   installed `jsonresume-theme-*` packages, dedupes them, and loads their
//!   entry points through an embedded JavaScript interpreter
//! - **Narrow Plugin Contract**: a theme is anything implementing [`Theme`];
//!   the loader is swappable via [`ThemeLoader`] so tests never touch a real
//!   package tree
//! - **PDF Backend** (feature `pdf`): captures the rendered HTML with
//!   headless Chrome
//!
//! # Example
//!
//! ```no_run
//! use vitae::resolver::ThemeResolver;
//!
//! # fn main() -> vitae::Result<()> {
//! let resume = serde_json::json!({ "basics": { "name": "Ada" } });
//!
//! let resolver = ThemeResolver::new(std::env::current_dir().unwrap());
//! let themes = resolver.resolve(None)?;
//! let theme = themes.first().ok_or(vitae::Error::NoThemeFound)?;
//!
//! let html = vitae::render(&resume, theme.module.as_ref())?;
//! println!("{}", html.as_text().unwrap_or_default());
//! # Ok(())
//! # }
//! ```

use std::path::{Path, PathBuf};

pub mod error;
pub use error::{Error, Result, ValidationIssue};

pub mod document;
pub mod js;
pub mod pdf;
pub mod render;
pub mod resolver;
pub mod validate;

pub use render::render;

/// A resume document.
///
/// Opaque to the core: it is handed to the theme as-is. Only the optional
/// `meta.theme` hint and `meta.pdfRenderOptions` overrides are ever read.
pub type Resume = serde_json::Value;

/// Output produced by a theme's render capability.
///
/// The content is never interpreted; themes usually produce HTML text, the
/// PDF backend produces bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderedOutput {
    Text(String),
    Binary(Vec<u8>),
}

impl RenderedOutput {
    /// The output as text, if it is text
    pub fn as_text(&self) -> Option<&str> {
        match self {
            RenderedOutput::Text(s) => Some(s),
            RenderedOutput::Binary(_) => None,
        }
    }

    /// The output as raw bytes, regardless of kind
    pub fn into_bytes(self) -> Vec<u8> {
        match self {
            RenderedOutput::Text(s) => s.into_bytes(),
            RenderedOutput::Binary(b) => b,
        }
    }
}

impl From<String> for RenderedOutput {
    fn from(s: String) -> Self {
        RenderedOutput::Text(s)
    }
}

impl From<Vec<u8>> for RenderedOutput {
    fn from(b: Vec<u8>) -> Self {
        RenderedOutput::Binary(b)
    }
}

/// Core trait for theme implementations.
///
/// A theme is an independently distributed plugin exposing one required
/// capability: turning a resume into rendered output. The production
/// implementation is [`js::JsTheme`]; tests substitute in-memory fakes.
pub trait Theme {
    /// Render the resume. Must not mutate it; a deterministic theme renders
    /// the same document to the same output on every call.
    fn render(&self, resume: &Resume) -> Result<RenderedOutput>;

    /// Rendering options the theme wants applied during PDF capture.
    ///
    /// Consumed only by the PDF backend; document-level overrides in
    /// `meta.pdfRenderOptions` take precedence over these.
    fn pdf_options(&self) -> Option<serde_json::Value> {
        None
    }
}

/// Loads a theme module from its resolved entry point.
///
/// The seam between resolution and evaluation: the resolver discovers entry
/// points on disk and hands each one to a loader exactly once. Substituting
/// the loader lets tests resolve against real directory trees without
/// evaluating any JavaScript.
pub trait ThemeLoader {
    fn load(&self, path: &Path) -> Result<Box<dyn Theme>>;
}

/// A theme discovered by the resolver and loaded through a [`ThemeLoader`].
///
/// `name` is the trailing dash-segment of the package's distribution name
/// (`jsonresume-theme-even` → `even`). `path` is the canonicalized entry
/// point and is unique within one resolution result.
pub struct LoadedTheme {
    pub name: String,
    pub path: PathBuf,
    pub module: Box<dyn Theme>,
}

impl std::fmt::Debug for LoadedTheme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoadedTheme")
            .field("name", &self.name)
            .field("path", &self.path)
            .finish()
    }
}
