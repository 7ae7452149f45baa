//! A directory-backed collection of compiled templates.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::{debug, trace};
use walkdir::WalkDir;

use crate::value::Value;
use crate::{render, Error, Result, Template};

/// Renders nested deeper than this many includes are abandoned; the failed
/// include emits nothing, like any other include failure, so a cycle of
/// includes terminates instead of recursing forever.
const MAX_INCLUDE_DEPTH: usize = 64;

/// A collection of templates compiled from the files in a directory.
///
/// Templates are keyed by their path relative to the library root, with `/`
/// separators on every platform, so `nested/t3.txt` names the same template
/// everywhere. `$(include …)` commands are resolved against the same library
/// using these names.
pub struct Library {
    directory: PathBuf,
    recursive: bool,
    ignore_bad_templates: bool,
    templates: BTreeMap<String, Template>,
}

impl Default for Library {
    /// An empty library with nothing to reload.
    fn default() -> Self {
        Self {
            directory: PathBuf::new(),
            recursive: false,
            ignore_bad_templates: true,
            templates: BTreeMap::new(),
        }
    }
}

impl Library {
    /// Build a library from every regular file in `directory`.
    ///
    /// When `recursive` is false only the files directly in `directory` are
    /// compiled. When `ignore_bad_templates` is true, files that fail to
    /// compile are dropped from the library; otherwise the failure is
    /// returned.
    pub fn new(
        directory: impl Into<PathBuf>,
        recursive: bool,
        ignore_bad_templates: bool,
    ) -> Result<Self> {
        let mut library = Self {
            directory: directory.into(),
            recursive,
            ignore_bad_templates,
            templates: BTreeMap::new(),
        };
        library.reload(false)?;
        Ok(library)
    }

    /// Re-scan the directory, compiling new and changed files.
    ///
    /// If `discard` is true the existing templates are dropped first;
    /// otherwise they are kept and re-scanned files replace them.
    pub fn reload(&mut self, discard: bool) -> Result<()> {
        if discard {
            self.templates.clear();
        }

        let mut walk = WalkDir::new(&self.directory);
        if !self.recursive {
            walk = walk.max_depth(1);
        }
        for entry in walk {
            let entry = entry.map_err(io::Error::from)?;
            if !entry.file_type().is_file() {
                continue;
            }
            self.add_template(entry.path())?;
        }
        Ok(())
    }

    /// Lookup a template by name.
    pub fn get_template(&self, name: &str) -> Option<&Template> {
        self.templates.get(name)
    }

    /// The names of the templates currently in the library.
    pub fn template_names(&self) -> impl Iterator<Item = &str> {
        self.templates.keys().map(String::as_str)
    }

    /// Render the named template using the provided serializable value.
    #[cfg(feature = "serde")]
    pub fn render<S>(&self, name: &str, ctx: S) -> Result<String>
    where
        S: serde::Serialize,
    {
        self.render_from(name, &crate::value::to_value(ctx)?)
    }

    /// Render the named template using an already-built [`Value`].
    pub fn render_from(&self, name: &str, globals: &Value) -> Result<String> {
        self.render_at(name, globals, 0)
    }

    fn render_at(&self, name: &str, globals: &Value, depth: usize) -> Result<String> {
        if depth > MAX_INCLUDE_DEPTH {
            return Err(Error::invalid("maximum include depth exceeded"));
        }

        let template = self
            .templates
            .get(name)
            .ok_or_else(|| Error::not_found(name))?;

        // Includes render against the same bindings; any failure inside an
        // include emits nothing for that include.
        let include = |target: &str, out: &mut String| {
            if let Ok(text) = self.render_at(target, globals, depth + 1) {
                out.push_str(&text);
            }
        };

        render::template_with(template.program(), globals, &include)
    }

    fn add_template(&mut self, path: &Path) -> Result<()> {
        let name = self.template_name(path);

        let bytes = fs::read(path)?;
        let source = match String::from_utf8(bytes) {
            Ok(source) => source,
            Err(_) if self.ignore_bad_templates => {
                debug!("ignoring non-UTF-8 template `{name}`");
                return Ok(());
            }
            Err(_) => return Err(Error::invalid("template is not valid UTF-8")),
        };

        match Template::compile(&source) {
            Ok(template) => {
                trace!("compiled template `{name}`");
                self.templates.insert(name, template);
            }
            Err(err) if self.ignore_bad_templates => {
                debug!("ignoring invalid template `{name}`: {err}");
            }
            Err(err) => return Err(err),
        }
        Ok(())
    }

    /// The template name for a file: its path relative to the library root,
    /// joined with forward slashes.
    fn template_name(&self, path: &Path) -> String {
        let rel = path.strip_prefix(&self.directory).unwrap_or(path);
        rel.iter()
            .map(|part| part.to_string_lossy())
            .collect::<Vec<_>>()
            .join("/")
    }
}

impl fmt::Debug for Library {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Library")
            .field("directory", &self.directory)
            .field("recursive", &self.recursive)
            .field("templates", &self.templates.keys())
            .finish_non_exhaustive()
    }
}
