//! A minimal text templating engine.
//!
//! A template is a text document interleaved with command forms delimited by
//! `$(` … `)`. Compiling a template translates it into a compact program of
//! 16-bit instructions; rendering executes that program against a set of
//! named values and produces a string. A [`Library`] wraps a directory of
//! template files and resolves `$(include …)` commands between them.
//!
//! # Syntax
//!
//! | Form | Meaning |
//! |------|---------|
//! | `$(name)` | substitute the value bound to `name` |
//! | `$(if name)…$(end)` | render the body iff `name` is bound |
//! | `$(for item in items)…$(end)` | render the body once per element of `items` |
//! | `$(include other.txt)` | splice in another template from the library |
//! | `\$(` | a literal `$(` |
//!
//! `$(if …)` tests presence, not truthiness: a name bound to `false` still
//! renders the body, and an unbound name renders nothing. Inside a `for`
//! body the loop variable shadows any binding of the same name and is
//! visible only there. A name that is unbound substitutes as the empty
//! string.
//!
//! # Examples
//!
//! Compile a template and render it with bindings built by the
//! [`value!`] macro.
//!
//! ```
//! let template = fae::Template::compile("Hello, $(place)!")?;
//! let result = template.render(fae::value! { place: "Mars" })?;
//! assert_eq!(result, "Hello, Mars!");
//! # Ok::<(), fae::Error>(())
//! ```
//!
//! Any [`serde::Serialize`] type works as bindings.
//!
//! ```
//! #[derive(serde::Serialize)]
//! struct Context {
//!     names: Vec<String>,
//! }
//!
//! let ctx = Context {
//!     names: vec!["Ferris".into(), "Fae".into()],
//! };
//!
//! let result = fae::Template::compile("$(for n in names)$(n) $(end)")?.render(&ctx)?;
//! assert_eq!(result, "Ferris Fae ");
//! # Ok::<(), fae::Error>(())
//! ```
//!
//! Build a [`Library`] from a directory of template files and render them by
//! relative path.
//!
//! ```no_run
//! let library = fae::Library::new("templates/", true, true)?;
//! let result = library.render("index.txt", fae::value! { title: "Home" })?;
//! # Ok::<(), fae::Error>(())
//! ```

mod compile;
mod error;
mod library;
mod macros;
mod render;
mod types;
pub mod value;

use std::sync::Arc;

pub use crate::error::Error;
pub use crate::library::Library;
#[cfg(feature = "serde")]
pub use crate::value::to_value;
pub use crate::value::Value;

use crate::types::program::Program;

/// A type alias for results in this crate.
pub type Result<T> = std::result::Result<T, Error>;

/// A compiled template.
///
/// The compiled program is immutable and behind an [`Arc`], so cloning a
/// template is cheap and a template can be rendered from multiple threads at
/// once.
#[derive(Debug, Clone, Default)]
pub struct Template {
    source: String,
    program: Arc<Program>,
}

impl Template {
    /// Compile a template from source.
    ///
    /// # Errors
    ///
    /// If the source contains an unrecognized or malformed command, an
    /// unclosed block, or an `$(end)` with no open block.
    pub fn compile(source: &str) -> Result<Self> {
        let program = compile::program(source)?;
        Ok(Self {
            source: source.to_owned(),
            program: Arc::new(program),
        })
    }

    /// Returns the original template source.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Render the template using the provided serializable value.
    ///
    /// A standalone template has no library to resolve includes against, so
    /// `$(include …)` commands render as nothing; use
    /// [`Library::render`] to resolve them.
    #[cfg(feature = "serde")]
    pub fn render<S>(&self, ctx: S) -> Result<String>
    where
        S: serde::Serialize,
    {
        self.render_from(&value::to_value(ctx)?)
    }

    /// Render the template using an already-built [`Value`].
    pub fn render_from(&self, globals: &Value) -> Result<String> {
        render::template(&self.program, globals)
    }

    pub(crate) fn program(&self) -> &Program {
        &self.program
    }
}
