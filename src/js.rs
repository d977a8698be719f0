//! JavaScript theme backend: evaluates a theme package's CommonJS entry
//! point with the embedded Boa interpreter.
//!
//! A theme module is expected to export `render(resume)` and may export
//! `pdfRenderOptions`. Loading evaluates the module once in a throwaway
//! context to verify the export surface; each render evaluates it again in a
//! fresh context, so themes see no state between invocations and rendering
//! stays deterministic.

use crate::{Error, RenderedOutput, Result, Resume, Theme, ThemeLoader};
use boa_engine::{Context, JsValue, Source};
use std::path::{Path, PathBuf};

/// Shim giving the module a CommonJS-shaped environment
const MODULE_PRELUDE: &str = "const module = { exports: {} };\nconst exports = module.exports;\n";

/// Loads [`JsTheme`]s. This is the production [`ThemeLoader`].
pub struct JsThemeLoader;

impl ThemeLoader for JsThemeLoader {
    fn load(&self, path: &Path) -> Result<Box<dyn Theme>> {
        Ok(Box::new(JsTheme::load(path)?))
    }
}

/// A theme whose render capability lives in a JavaScript module
pub struct JsTheme {
    path: PathBuf,
    source: String,
    pdf_options: Option<serde_json::Value>,
}

impl JsTheme {
    /// Load and probe the module at `path`.
    ///
    /// The probe evaluates the module and checks that `module.exports.render`
    /// is callable; anything the script throws at load time surfaces as
    /// [`Error::ThemeLoad`] naming the attempted path.
    pub fn load(path: &Path) -> Result<Self> {
        let load_err = |message: String| Error::ThemeLoad {
            name: path.display().to_string(),
            message,
        };

        let source = std::fs::read_to_string(path).map_err(|e| load_err(e.to_string()))?;

        let probe = format!(
            "{}{}\n;JSON.stringify({{ render: typeof module.exports.render === \"function\", \
             pdfRenderOptions: module.exports.pdfRenderOptions || null }})",
            MODULE_PRELUDE, source
        );

        let mut ctx = Context::default();
        let value = ctx
            .eval(Source::from_bytes(probe.as_bytes()))
            .map_err(|e| load_err(format!("script thrown: {}", e)))?;
        let surface = value
            .to_string(&mut ctx)
            .map_err(|e| load_err(format!("script thrown: {}", e)))?
            .to_std_string_escaped();
        let surface: serde_json::Value =
            serde_json::from_str(&surface).map_err(|e| load_err(e.to_string()))?;

        if surface.get("render").and_then(|v| v.as_bool()) != Some(true) {
            return Err(load_err("module does not export a render function".to_string()));
        }

        let pdf_options = match surface.get("pdfRenderOptions") {
            None | Some(serde_json::Value::Null) => None,
            Some(opts) => Some(opts.clone()),
        };

        Ok(Self {
            path: path.to_path_buf(),
            source,
            pdf_options,
        })
    }

    /// Entry point this theme was loaded from
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Theme for JsTheme {
    fn render(&self, resume: &Resume) -> Result<RenderedOutput> {
        let resume_json = serde_json::to_string(resume)
            .map_err(|e| Error::ThemeRender(e.to_string()))?;

        // Route the call through Promise.resolve so synchronous themes,
        // promise-returning themes, and synchronous throws all settle into
        // the same two globals, then drain the job queue.
        let script = format!(
            "{}{}\n\
             ;globalThis.__vitae_result = undefined;\n\
             globalThis.__vitae_error = undefined;\n\
             Promise.resolve().then(function () {{ return module.exports.render({}); }}).then(\n\
               function (out) {{ globalThis.__vitae_result = typeof out === \"string\" ? out : JSON.stringify(out); }},\n\
               function (err) {{ globalThis.__vitae_error = String(err instanceof Error ? err.message : err); }}\n\
             );",
            MODULE_PRELUDE, self.source, resume_json
        );

        let mut ctx = Context::default();
        ctx.eval(Source::from_bytes(script.as_bytes()))
            .map_err(|e| Error::ThemeRender(format!("script thrown: {}", e)))?;
        let _ = ctx.run_jobs();

        if let Some(message) = read_global(&mut ctx, "__vitae_error")? {
            return Err(Error::ThemeRender(message));
        }
        match read_global(&mut ctx, "__vitae_result")? {
            Some(out) => Ok(RenderedOutput::Text(out)),
            None => Err(Error::ThemeRender(
                "theme render produced no result".to_string(),
            )),
        }
    }

    fn pdf_options(&self) -> Option<serde_json::Value> {
        self.pdf_options.clone()
    }
}

/// Read a global set by the render script; `undefined` means unset
fn read_global(ctx: &mut Context, name: &str) -> Result<Option<String>> {
    let value: JsValue = ctx
        .eval(Source::from_bytes(format!("globalThis.{}", name).as_bytes()))
        .map_err(|e| Error::ThemeRender(format!("script thrown: {}", e)))?;
    if value.is_undefined() {
        return Ok(None);
    }
    let s = value
        .to_string(ctx)
        .map_err(|e| Error::ThemeRender(format!("script thrown: {}", e)))?
        .to_std_string_escaped();
    Ok(Some(s))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;

    fn write_theme(dir: &Path, source: &str) -> PathBuf {
        let path = dir.join("index.js");
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(source.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_renders_string_from_resume() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_theme(
            dir.path(),
            "module.exports = { render: function (resume) { return resume.basics.name; } };",
        );

        let theme = JsTheme::load(&path).unwrap();
        let resume = json!({ "basics": { "name": "Ada" } });
        let out = theme.render(&resume).unwrap();
        assert_eq!(out.as_text(), Some("Ada"));
    }

    #[test]
    fn test_repeated_renders_are_identical() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_theme(
            dir.path(),
            "module.exports = { render: function (r) { return \"<h1>\" + r.basics.name + \"</h1>\"; } };",
        );

        let theme = JsTheme::load(&path).unwrap();
        let resume = json!({ "basics": { "name": "Ada" } });
        let a = theme.render(&resume).unwrap();
        let b = theme.render(&resume).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_promise_returning_render() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_theme(
            dir.path(),
            "module.exports = { render: function (r) { return Promise.resolve(\"async \" + r.basics.name); } };",
        );

        let theme = JsTheme::load(&path).unwrap();
        let resume = json!({ "basics": { "name": "Ada" } });
        let out = theme.render(&resume).unwrap();
        assert_eq!(out.as_text(), Some("async Ada"));
    }

    #[test]
    fn test_non_string_output_is_stringified() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_theme(
            dir.path(),
            "module.exports = { render: function (r) { return { ok: true }; } };",
        );

        let theme = JsTheme::load(&path).unwrap();
        let out = theme.render(&json!({})).unwrap();
        assert_eq!(out.as_text(), Some("{\"ok\":true}"));
    }

    #[test]
    fn test_throwing_render_preserves_message() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_theme(
            dir.path(),
            "module.exports = { render: function () { throw new Error(\"template exploded\"); } };",
        );

        let theme = JsTheme::load(&path).unwrap();
        match theme.render(&json!({})) {
            Err(Error::ThemeRender(msg)) => assert!(msg.contains("template exploded")),
            other => panic!("expected ThemeRender, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_module_without_render_fails_to_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_theme(dir.path(), "module.exports = { colors: [\"red\"] };");

        match JsTheme::load(&path) {
            Err(Error::ThemeLoad { name, message }) => {
                assert!(name.contains("index.js"));
                assert!(message.contains("render"));
            }
            _ => panic!("expected ThemeLoad"),
        }
    }

    #[test]
    fn test_broken_module_fails_to_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_theme(dir.path(), "throw new Error(\"bad module\");");

        assert!(matches!(
            JsTheme::load(&path),
            Err(Error::ThemeLoad { .. })
        ));
    }

    #[test]
    fn test_pdf_options_are_captured() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_theme(
            dir.path(),
            "module.exports = {\n\
               render: function () { return \"\"; },\n\
               pdfRenderOptions: { landscape: true, printBackground: true }\n\
             };",
        );

        let theme = JsTheme::load(&path).unwrap();
        let opts = theme.pdf_options().unwrap();
        assert_eq!(opts["landscape"], json!(true));
        assert_eq!(opts["printBackground"], json!(true));
    }
}
