//! PDF capture of rendered HTML through headless Chrome.
//!
//! Gated behind the `pdf` feature; a build without it reports every capture
//! as unavailable, which is also what a missing or unlaunchable browser
//! produces. The browser instance is released on every exit path by drop.

use crate::{Resume, Theme};

#[cfg(feature = "pdf")]
use crate::Result;

/// Print options for the capture: the theme's `pdfRenderOptions` overlaid
/// with `meta.pdfRenderOptions` from the resume, document overrides winning.
#[cfg_attr(not(feature = "pdf"), allow(dead_code))]
fn merged_pdf_options(theme: &dyn Theme, resume: &Resume) -> serde_json::Map<String, serde_json::Value> {
    let mut merged = serde_json::Map::new();

    for source in [
        theme.pdf_options(),
        resume.pointer("/meta/pdfRenderOptions").cloned(),
    ]
    .into_iter()
    .flatten()
    {
        match source {
            serde_json::Value::Object(map) => merged.extend(map),
            other => log::warn!("ignoring non-object pdfRenderOptions: {}", other),
        }
    }

    merged
}

#[cfg(feature = "pdf")]
mod backend {
    use super::merged_pdf_options;
    use crate::{Error, Result, Resume, Theme};
    use base64::Engine as Base64Engine;
    use headless_chrome::types::PrintToPdfOptions;
    use headless_chrome::{Browser, LaunchOptions};
    use std::ffi::OsStr;

    pub fn capture(
        html: &str,
        resume: &Resume,
        theme: &dyn Theme,
        launch_args: &[String],
    ) -> Result<Vec<u8>> {
        let args: Vec<&OsStr> = launch_args.iter().map(OsStr::new).collect();
        let launch_options = LaunchOptions::default_builder()
            .headless(true)
            .args(args)
            .build()
            .map_err(|e| Error::PdfUnavailable(format!("failed to build launch options: {}", e)))?;

        let browser = Browser::new(launch_options)
            .map_err(|e| Error::PdfUnavailable(format!("failed to launch browser: {}", e)))?;
        let tab = browser.new_tab()?;

        let url = format!(
            "data:text/html;base64,{}",
            base64::engine::general_purpose::STANDARD.encode(html)
        );
        tab.navigate_to(&url)?;
        tab.wait_until_navigated()?;

        let options = print_options(&merged_pdf_options(theme, resume));
        let pdf = tab.print_to_pdf(Some(options))?;
        Ok(pdf)
    }

    /// Map the merged JSON options onto Chrome's print settings. Unknown
    /// keys are ignored, matching how the original options object behaves.
    fn print_options(opts: &serde_json::Map<String, serde_json::Value>) -> PrintToPdfOptions {
        let bool_opt = |key: &str| opts.get(key).and_then(|v| v.as_bool());
        let f64_opt = |key: &str| opts.get(key).and_then(|v| v.as_f64());
        let string_opt = |key: &str| opts.get(key).and_then(|v| v.as_str()).map(str::to_string);

        PrintToPdfOptions {
            landscape: bool_opt("landscape"),
            display_header_footer: bool_opt("displayHeaderFooter"),
            print_background: bool_opt("printBackground"),
            scale: f64_opt("scale"),
            paper_width: f64_opt("paperWidth"),
            paper_height: f64_opt("paperHeight"),
            margin_top: f64_opt("marginTop"),
            margin_bottom: f64_opt("marginBottom"),
            margin_left: f64_opt("marginLeft"),
            margin_right: f64_opt("marginRight"),
            page_ranges: string_opt("pageRanges"),
            header_template: string_opt("headerTemplate"),
            footer_template: string_opt("footerTemplate"),
            prefer_css_page_size: bool_opt("preferCssPageSize"),
            ..Default::default()
        }
    }
}

/// Capture `html` as a PDF, honoring theme- and document-supplied options
/// and passing `launch_args` through to the browser.
#[cfg(feature = "pdf")]
pub fn capture(
    html: &str,
    resume: &Resume,
    theme: &dyn Theme,
    launch_args: &[String],
) -> Result<Vec<u8>> {
    backend::capture(html, resume, theme, launch_args)
}

#[cfg(not(feature = "pdf"))]
pub fn capture(
    _html: &str,
    _resume: &Resume,
    _theme: &dyn Theme,
    _launch_args: &[String],
) -> crate::Result<Vec<u8>> {
    Err(crate::Error::PdfUnavailable(
        "vitae was built without the `pdf` feature".to_string(),
    ))
}
