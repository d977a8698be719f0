//! Theme resolution: locating installed theme packages and loading them.
//!
//! Resolution walks upward from a search root until it finds a directory
//! holding `node_modules`, matches the theme naming conventions inside it,
//! dedupes the hits by their resolved entry point, and loads each survivor
//! exactly once through a [`ThemeLoader`]. The loader is injected so tests
//! can resolve against real directory trees without evaluating JavaScript.

use crate::js::JsThemeLoader;
use crate::{Error, LoadedTheme, Result, Resume, ThemeLoader};
use log::debug;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Package name prefix for unscoped and arbitrarily-scoped themes
const THEME_PREFIX: &str = "jsonresume-theme-";

/// Reserved scope whose packages use the short `theme-` prefix
const RESERVED_SCOPE: &str = "@jsonresume";

/// Determine which theme name to resolve, if any.
///
/// Precedence: an explicit identifier (the `--theme` flag) beats the
/// `meta.theme` hint embedded in the resume, which beats none (wildcard
/// match). A hint may carry its package prefix (`theme-even` or
/// `jsonresume-theme-even`); the prefix is stripped before matching.
pub fn theme_filter(explicit: Option<&str>, resume: &Resume) -> Option<String> {
    let hint = explicit
        .map(str::to_string)
        .or_else(|| {
            resume
                .pointer("/meta/theme")
                .and_then(|v| v.as_str())
                .map(str::to_string)
        })?;

    let name = hint
        .strip_prefix(THEME_PREFIX)
        .or_else(|| hint.strip_prefix("theme-"))
        .unwrap_or(&hint);

    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}

/// Resolves theme packages installed under the nearest `node_modules`.
///
/// Candidates are discovered per naming convention, in convention order,
/// sorted lexicographically within each convention, so the first result is
/// deterministic across platforms.
pub struct ThemeResolver {
    search_root: PathBuf,
    loader: Box<dyn ThemeLoader>,
}

impl ThemeResolver {
    /// Create a resolver that evaluates theme entry points with the embedded
    /// JavaScript interpreter
    pub fn new(search_root: impl Into<PathBuf>) -> Self {
        Self::with_loader(search_root, Box::new(JsThemeLoader))
    }

    /// Create a resolver with a custom loader
    pub fn with_loader(search_root: impl Into<PathBuf>, loader: Box<dyn ThemeLoader>) -> Self {
        Self {
            search_root: search_root.into(),
            loader,
        }
    }

    /// Resolve installed themes, optionally narrowed to one name.
    ///
    /// Returns every matching theme in deterministic order, fully loaded.
    /// Zero matches is an empty vector, not an error; the caller decides
    /// whether that is fatal. A package that matched on disk but fails to
    /// load propagates [`Error::ThemeLoad`].
    pub fn resolve(&self, filter: Option<&str>) -> Result<Vec<LoadedTheme>> {
        let search_root = self.find_search_root()?;
        let node_modules = search_root.join("node_modules");

        // In fringe cases (files mounted as virtual directories) the walk can
        // succeed even though neither path is a real directory.
        if !node_modules.is_dir() && !search_root.is_dir() {
            return Err(Error::InvalidSearchRoot(search_root));
        }

        let filter = filter.unwrap_or("*");
        let mut seen = HashSet::new();
        let mut themes = Vec::new();

        for dir in find_theme_dirs(&node_modules, filter) {
            let (name, path) = describe_package(&dir, &search_root)?;
            if !seen.insert(path.clone()) {
                continue;
            }
            debug!("loading theme {} from {}", name, path.display());
            let module = self.loader.load(&path)?;
            themes.push(LoadedTheme { name, path, module });
        }

        debug!(
            "resolved {} theme(s) under {}",
            themes.len(),
            node_modules.display()
        );
        Ok(themes)
    }

    /// Walk ancestors of the search root until one contains `node_modules`
    fn find_search_root(&self) -> Result<PathBuf> {
        for dir in self.search_root.ancestors() {
            if dir.join("node_modules").exists() {
                return Ok(dir.to_path_buf());
            }
        }
        Err(Error::SearchRootNotFound(self.search_root.clone()))
    }
}

/// Match the three theme naming conventions inside `node_modules`:
/// `jsonresume-theme-<name>`, `@<scope>/jsonresume-theme-<name>`, and
/// `@jsonresume/theme-<name>`. A match is a directory holding a
/// `package.json`.
fn find_theme_dirs(node_modules: &Path, filter: &str) -> Vec<PathBuf> {
    let mut dirs = Vec::new();

    for name in sorted_entries(node_modules) {
        if matches_convention(&name, THEME_PREFIX, filter) {
            push_if_package(&mut dirs, node_modules.join(&name));
        }
    }

    for scope in sorted_entries(node_modules) {
        if !scope.starts_with('@') {
            continue;
        }
        let scope_dir = node_modules.join(&scope);
        for name in sorted_entries(&scope_dir) {
            if matches_convention(&name, THEME_PREFIX, filter) {
                push_if_package(&mut dirs, scope_dir.join(&name));
            }
        }
    }

    let reserved = node_modules.join(RESERVED_SCOPE);
    for name in sorted_entries(&reserved) {
        if matches_convention(&name, "theme-", filter) {
            push_if_package(&mut dirs, reserved.join(&name));
        }
    }

    dirs
}

fn matches_convention(entry: &str, prefix: &str, filter: &str) -> bool {
    match entry.strip_prefix(prefix) {
        Some(suffix) if !suffix.is_empty() => filter == "*" || suffix == filter,
        _ => false,
    }
}

fn push_if_package(dirs: &mut Vec<PathBuf>, dir: PathBuf) {
    if dir.join("package.json").is_file() {
        dirs.push(dir);
    }
}

/// Directory entry names, sorted for deterministic resolver order.
/// An unreadable or missing directory yields no entries.
fn sorted_entries(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .map(|entries| {
            entries
                .filter_map(|e| e.ok())
                .filter_map(|e| e.file_name().into_string().ok())
                .collect()
        })
        .unwrap_or_default();
    names.sort();
    names
}

/// The fields of `package.json` resolution cares about
#[derive(serde::Deserialize)]
struct PackageDescriptor {
    name: Option<String>,
    #[serde(default = "default_entry")]
    main: String,
}

fn default_entry() -> String {
    "index.js".to_string()
}

/// Read a matched package's descriptor and resolve its short name and entry
/// point. The entry path is canonicalized so the same package reached via
/// two conventions dedups to one candidate.
fn describe_package(dir: &Path, search_root: &Path) -> Result<(String, PathBuf)> {
    let load_err = |message: String| Error::ThemeLoad {
        name: dir
            .strip_prefix(search_root.join("node_modules"))
            .unwrap_or(dir)
            .display()
            .to_string(),
        message,
    };

    let raw = std::fs::read_to_string(dir.join("package.json"))
        .map_err(|e| load_err(format!("could not read package.json: {}", e)))?;
    let descriptor: PackageDescriptor = serde_json::from_str(&raw)
        .map_err(|e| load_err(format!("invalid package.json: {}", e)))?;

    let package_name = descriptor
        .name
        .or_else(|| {
            dir.file_name()
                .and_then(|n| n.to_str())
                .map(str::to_string)
        })
        .ok_or_else(|| load_err("package has no name".to_string()))?;

    let path = dir.join(&descriptor.main).canonicalize().map_err(|e| {
        load_err(format!(
            "entry point {} not resolvable: {}",
            descriptor.main, e
        ))
    })?;

    Ok((short_name(&package_name), path))
}

/// The trailing dash-segment of a distribution name:
/// `@jsonresume/theme-even` and `jsonresume-theme-even` both yield `even`.
fn short_name(package_name: &str) -> String {
    package_name
        .rsplit('-')
        .next()
        .unwrap_or(package_name)
        .to_string()
}
