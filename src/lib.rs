//! Round-trip reader and writer for firmware configuration headers.
//!
//! Firmware configuration lives in a C header written in a small macro
//! dialect: `#define NAME value` settings, feature toggles expressed as
//! commented/uncommented macros, a grouped homing declaration, and
//! delimited documentation blocks. Firmfig reads a *generic template* (the
//! vendor file defining every recognized setting and its documentation)
//! together with a *user file* (a previously saved, possibly older or
//! hand-edited configuration), merges them into one typed settings map,
//! and can later regenerate a user file that still compiles as firmware
//! source and diffs minimally against the original.
//!
//! ```ignore
//! let mut doc = ConfigDocument::new();
//! doc.load(Path::new("printer.generic.h"), Path::new("printer.h"))?;
//!
//! let mut settings = doc.values();
//! settings.insert("BAUD".into(), SettingValue::Scalar {
//!     text: "250000".into(),
//!     enabled: true,
//! });
//! doc.save(Path::new("printer.h"), Some(&settings))?;
//! ```
//!
//! # Why a template/user pair
//!
//! The two files are independent, imperfect documents. The template is
//! authoritative about *which* settings exist and what they mean; the user
//! file is authoritative about *values*, but may be stale (written against
//! an older template) or hand-edited into odd shapes. Firmfig reconciles
//! them deliberately:
//!
//! - The template pass establishes the full vocabulary and a default for
//!   every setting. A name the template never declares is not a setting —
//!   values parsed for it anywhere are discarded.
//! - Every boolean default is then forced to `false`: the template's
//!   example truthiness is never trusted, only the user file may enable a
//!   toggle. A recognized toggle absent from the user file is therefore
//!   disabled, which is exactly what an older user file should mean.
//! - The user pass overwrites defaults in file order, last declaration
//!   winning — except that a boolean-shaped line never overwrites an
//!   established value-typed setting (such lines are stray edits, and the
//!   typed value is kept).
//!
//! # Not a preprocessor
//!
//! Firmfig recognizes a fixed, small set of line shapes and treats every
//! other line as opaque passthrough text. It does not evaluate
//! expressions, expand macros, or understand C. The shapes live in one
//! grammar table; see the `grammar` module. A single malformed line never
//! fails a load — the document loads from whatever classifies, and only
//! file I/O errors are fatal.
//!
//! # The typed value model
//!
//! Every merged setting is one [`SettingValue`]:
//!
//! | variant | source shape |
//! |---------|--------------|
//! | `Boolean` | bare `#define NAME`, `//` toggles it off |
//! | `Scalar` | `#define NAME value` with free-text value |
//! | `QuotedList` | `#define NAME "a" "b"` (one literal → 1-element list) |
//! | `HomingOptionSet` | repeated `HOMING_OPTION(name)` lines, deduplicated |
//! | `HomingStep` | the four arguments of `DEFINE_HOMING(a, b, c, d)`, under `HOMING_STEP1`..`4` |
//!
//! # Saving
//!
//! [`ConfigDocument::save`] replays the template lines verbatim, rewriting
//! only the lines whose shape it recognizes: value and boolean defines are
//! re-rendered from the supplied settings (comment-prefixed when
//! disabled), and the homing block is regenerated from the four step
//! values. Everything else — prose, blank lines, documentation — is copied
//! through untouched, so a diff against the original shows only the value
//! changes.
//!
//! The in-memory settings are updated to mirror what was *actually*
//! written: a supplied key with no matching template line is silently
//! dropped, and a template key missing from the supplied settings warns
//! and keeps its original line. Passing `None` for the settings saves
//! exactly what is currently loaded.
//!
//! Saving is resilient the same way loading is: per-key problems degrade
//! to `tracing` warnings, and only an unopenable destination fails the
//! operation. Writes are not atomic — an interrupted save leaves a partial
//! file.
//!
//! # Error handling
//!
//! All fallible operations return [`FirmfigError`]. File-access failures
//! carry the offending path (the template is checked first, so the caller
//! can always tell which of the pair was at fault), and a failed load
//! leaves the document's previous state untouched.

pub mod error;
pub mod value;

mod document;
mod grammar;
mod helptext;
mod parse;
mod write;

#[cfg(test)]
mod fixtures;

pub use document::ConfigDocument;
pub use error::FirmfigError;
pub use value::{SettingValue, SettingsMap};
