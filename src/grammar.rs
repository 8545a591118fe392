//! The fixed line-shape grammar of the header dialect.
//!
//! Everything here is data: one compiled pattern per recognized line shape,
//! the output formats the writer renders substituted lines through, and the
//! small exception tables. The reader and writer dispatch over these
//! patterns but contain no pattern knowledge of their own, so extending the
//! dialect (a new shape, a new passthrough key) is an edit to this module
//! only.
//!
//! A `//` prefix on any declaration marks it disabled; the declaration
//! shapes therefore come in a comment-tolerant form (used for shape
//! dispatch) with [`COMMENT_PREFIX`] deciding the enabled flag separately.

use std::sync::LazyLock;

use regex::Regex;

/// Comment-tolerant `#define NAME` prefix. This is the registration shape:
/// every declaration form starts with it, so matching it against template
/// lines yields the full vocabulary of recognized names.
pub static NAME_REGISTRATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(?://+\s*)?#define\s+(\w+)").expect("name pattern"));

/// `#define NAME value...` with free-text value, optionally `//`-prefixed.
pub static VALUE_DEFINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?://+\s*)?#define\s+(\w+)\s+(\S.*?)\s*$").expect("value define pattern")
});

/// `#define NAME "a" "b" ...` — one or more quoted literals as the value.
pub static QUOTED_DEFINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"^\s*(?://+\s*)?#define\s+(\w+)\s+("[^"]*"(?:\s*"[^"]*")*)\s*$"#)
        .expect("quoted define pattern")
});

/// One quoted literal inside a quoted define's value position.
pub static QUOTED_ITEM: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""([^"]*)""#).expect("quoted item pattern"));

/// Bare `#define NAME` with no value payload, optionally `//`-prefixed.
pub static BOOL_DEFINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(?://+\s*)?#define\s+(\w+)\s*$").expect("bool pattern"));

/// A candidate homing option, repeatable: `HOMING_OPTION(name)`.
pub static HOMING_OPTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*HOMING_OPTION\s*\(\s*(\w+)\s*\)\s*$").expect("homing option pattern")
});

/// The grouped homing declaration, searched anywhere in the joined line.
/// The captured argument string must decompose via [`HOMING_ARGS`].
pub static HOMING_GROUP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"DEFINE_HOMING\s*\(([^)]*)\)").expect("homing group pattern"));

/// Exactly four comma-separated arguments inside a homing group.
pub static HOMING_ARGS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(\w+)\s*,\s*(\w+)\s*,\s*(\w+)\s*,\s*(\w+)\s*$").expect("homing args pattern")
});

/// Start marker of the homing block. The writer regenerates everything
/// between the markers from the current step values.
pub static HOMING_BLOCK_START: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*//\s*DEFINE_HOMING\s+start\s*$").expect("homing start pattern")
});

/// End marker of the homing block.
pub static HOMING_BLOCK_END: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^\s*//\s*DEFINE_HOMING\s+end\s*$").expect("homing end pattern")
});

/// Start of a documentation block: `/** \def NAME [NAME...]`. All listed
/// names receive the block's text.
pub static DOC_BLOCK_START: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^/\*\*\s+\\def\s+(\w+(?:\s+\w+)*)\s*$").expect("doc start pattern")
});

/// End of a documentation block.
pub static DOC_BLOCK_END: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*\*/").expect("doc end pattern"));

/// Line-comment prefix. A declaration matching this is disabled.
pub static COMMENT_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*//").expect("comment pattern"));

/// Key under which the accumulated homing options are stored.
pub const HOMING_OPTS_KEY: &str = "HOMING_OPTS";

/// Synthetic keys for the four grouped homing arguments, in order.
pub const HOMING_STEP_KEYS: [&str; 4] = [
    "HOMING_STEP1",
    "HOMING_STEP2",
    "HOMING_STEP3",
    "HOMING_STEP4",
];

/// Keys whose template line is emitted unchanged when the key is absent
/// from the settings handed to the writer. The authoritative value for
/// these lives outside the document (CANNED_CYCLE comes from the printer
/// metadata file), so a missing entry is expected, not a caller mistake.
const PASSTHROUGH_KEYS: [&str; 1] = ["CANNED_CYCLE"];

pub fn is_passthrough(name: &str) -> bool {
    PASSTHROUGH_KEYS.contains(&name)
}

pub fn format_value_define(name: &str, value: &str) -> String {
    format!("#define {name} {value}")
}

pub fn format_bool_define(name: &str) -> String {
    format!("#define {name}")
}

pub fn format_homing_group(steps: &[String; 4]) -> String {
    format!(
        "DEFINE_HOMING({}, {}, {}, {})",
        steps[0], steps[1], steps[2], steps[3]
    )
}

/// Whether a raw line ends in a continuation backslash. The caller joins it
/// with the following line (backslash dropped) before classification.
pub fn has_continuation(line: &str) -> bool {
    line.trim_end().ends_with('\\')
}
