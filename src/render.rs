//! Render invocation: one call into a loaded theme, failure translated into
//! the uniform [`Error::ThemeRender`].

use crate::{Error, RenderedOutput, Result, Resume, Theme};

/// Invoke `theme`'s render capability with `resume`.
///
/// The resume is passed through opaquely; the output is not interpreted or
/// transformed. Any failure inside the plugin becomes [`Error::ThemeRender`]
/// carrying the original message. Never retries: rendering is assumed
/// deterministic, so a failure is terminal for this invocation.
pub fn render(resume: &Resume, theme: &dyn Theme) -> Result<RenderedOutput> {
    theme.render(resume).map_err(|e| match e {
        Error::ThemeRender(_) => e,
        other => Error::ThemeRender(other.to_string()),
    })
}
