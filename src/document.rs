//! The open template/user document pair.
//!
//! [`ConfigDocument`] is the crate's public surface: it owns the template
//! line buffer (the structural skeleton reused verbatim on save), the
//! merged typed settings, the recognized-name vocabulary, and the per-name
//! documentation. All parsing and rendering is delegated to the pure
//! [`parse`](crate::parse) and [`write`](crate::write) pipelines; this
//! module only does the file I/O around them.
//!
//! A document is strictly single-threaded and synchronous: both files are
//! read fully into memory before any state changes, and a failed load
//! leaves the previous state untouched. Saving writes the destination in
//! one shot and is not atomic — an interrupted write leaves a partial file.

use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use tracing::debug;

use crate::error::FirmfigError;
use crate::parse;
use crate::value::SettingsMap;
use crate::write;

/// A loaded firmware configuration: one generic template merged with one
/// user file.
#[derive(Debug, Default)]
pub struct ConfigDocument {
    template_lines: Vec<String>,
    values: SettingsMap,
    names: Vec<String>,
    help: IndexMap<String, String>,
    file: Option<PathBuf>,
}

impl ConfigDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load and merge a template/user pair.
    ///
    /// The template is read first; on any open failure the error names the
    /// offending path and the document keeps its previous state. On success
    /// the document's current file becomes `user_path`.
    pub fn load(&mut self, template_path: &Path, user_path: &Path) -> Result<(), FirmfigError> {
        let template = read_lines(template_path)?;
        let user = read_lines(user_path)?;

        let merged = parse::merge_passes(&template, &user);

        self.template_lines = template;
        self.values = merged.values;
        self.names = merged.names;
        self.help = merged.help;
        self.file = Some(user_path.to_path_buf());

        debug!(path = %user_path.display(), "configuration loaded");
        Ok(())
    }

    /// Regenerate the user file at `path` from the template skeleton.
    ///
    /// `values` of `None` means "save exactly what is currently loaded".
    /// After a successful write, the in-memory settings reflect what was
    /// actually persisted (supplied keys with no template line are dropped)
    /// and the document's current file becomes `path`.
    pub fn save(&mut self, path: &Path, values: Option<&SettingsMap>) -> Result<(), FirmfigError> {
        if !self.is_loaded() {
            return Err(FirmfigError::NoDocument);
        }

        let supplied = match values {
            Some(v) => v.clone(),
            None => self.values.clone(),
        };

        let mut mirror = self.values.clone();
        let rendered = write::render_document(&self.template_lines, &supplied, &mut mirror);

        fs::write(path, rendered).map_err(|source| FirmfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        self.values = mirror;
        self.file = Some(path.to_path_buf());

        debug!(path = %path.display(), "configuration saved");
        Ok(())
    }

    /// Snapshot copy of the merged settings.
    pub fn values(&self) -> SettingsMap {
        self.values.clone()
    }

    /// Recognized setting names, in template order.
    pub fn recognized_names(&self) -> &[String] {
        &self.names
    }

    /// Documentation text per setting name.
    pub fn help_text(&self) -> &IndexMap<String, String> {
        &self.help
    }

    pub fn is_loaded(&self) -> bool {
        self.file.is_some()
    }

    /// The current user file, set on successful load or save.
    pub fn path(&self) -> Option<&Path> {
        self.file.as_deref()
    }
}

fn read_lines(path: &Path) -> Result<Vec<String>, FirmfigError> {
    let content = fs::read_to_string(path).map_err(|source| FirmfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(content.lines().map(str::to_string).collect())
}
