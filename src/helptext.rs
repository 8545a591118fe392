//! Normalization of documentation-block text.
//!
//! Doc blocks arrive as line-wrapped prose with a two-space continuation
//! indent. Normalization unwraps each paragraph onto one logical line while
//! keeping deliberate structure:
//!
//! - a blank line followed by the standard indent separates paragraphs and
//!   survives as a double line break;
//! - a four-space indent marks a list item and is promoted to its own
//!   paragraph with the indent kept;
//! - every remaining indented line break is a soft wrap and collapses to a
//!   single space.

use std::sync::LazyLock;

use regex::Regex;

/// A soft-wrapped continuation: newline, the two-space indent, then text.
/// Anchoring on the non-space keeps deeper (list) indents out of reach.
static SOFT_WRAP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n  (\S)").expect("soft wrap pattern"));

/// Normalize the raw gathered text of one documentation block.
pub fn normalize(raw: &str) -> String {
    let text = raw.trim();
    let text = text.replace("\n\n  ", "\n\n");
    let text = text.replace("\n    ", "\n\n    ");
    SOFT_WRAP.replace_all(&text, " $1").into_owned()
}
