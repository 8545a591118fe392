//! Regeneration of a user file from the template skeleton.
//!
//! The template lines are replayed verbatim except for four substitution
//! rules, evaluated per line in order:
//!
//! 1. Homing block: the start marker is kept, one fresh grouped declaration
//!    is emitted from the four step values, and everything up to the end
//!    marker is suppressed.
//! 2. Value define: re-rendered through the fixed value format from the
//!    supplied settings, `//`-prefixed when disabled.
//! 3. Boolean define: re-rendered through the fixed boolean format,
//!    `//`-prefixed when disabled.
//! 4. Anything else passes through unmodified.
//!
//! Rendering is pure: it takes pre-loaded template lines and returns the
//! new file content, recording every substitution it actually made into
//! `mirror` so the document's in-memory map ends up reflecting what was
//! persisted rather than what the caller asked for. A supplied key with no
//! matching template line produces no output and no mirror entry; a
//! template line whose key is missing from the supplied settings degrades
//! to a warning and passes through unchanged. Diagnostics never fail a
//! save.

use tracing::warn;

use crate::grammar;
use crate::value::{SettingValue, SettingsMap};

/// Replay `template` with the substitution rules applied from `values`.
/// Returns the full new file content, trailing newline included.
pub fn render_document(
    template: &[String],
    values: &SettingsMap,
    mirror: &mut SettingsMap,
) -> String {
    let mut out = String::new();
    let mut skipping_homing = false;

    for line in template {
        if skipping_homing {
            if grammar::HOMING_BLOCK_END.is_match(line) {
                push_line(&mut out, line);
                skipping_homing = false;
            }
            continue;
        }

        if grammar::HOMING_BLOCK_START.is_match(line) {
            push_line(&mut out, line);
            match homing_steps(values) {
                Some(steps) => {
                    push_line(&mut out, &grammar::format_homing_group(&steps));
                    for (i, key) in grammar::HOMING_STEP_KEYS.iter().enumerate() {
                        mirror.insert(
                            key.to_string(),
                            SettingValue::HomingStep {
                                index: i as u8 + 1,
                                text: steps[i].clone(),
                            },
                        );
                    }
                    skipping_homing = true;
                }
                None => {
                    // Degrade to replaying the template block verbatim.
                    warn!("homing steps missing from the supplied settings; keeping template block");
                }
            }
            continue;
        }

        if let Some(caps) = grammar::VALUE_DEFINE.captures(line) {
            let name = &caps[1];
            match values.get(name) {
                Some(value) => match value.value_text() {
                    Some(text) => {
                        if !value.enabled() {
                            out.push_str("//");
                        }
                        push_line(&mut out, &grammar::format_value_define(name, &text));
                        mirror.insert(name.to_string(), value.clone());
                    }
                    None => {
                        warn!(key = %name, "value-less setting supplied for a value line; leaving it unchanged");
                        push_line(&mut out, line);
                    }
                },
                None if grammar::is_passthrough(name) => {
                    push_line(&mut out, line);
                }
                None => {
                    warn!(key = %name, "value key not found in the supplied settings");
                    push_line(&mut out, line);
                }
            }
            continue;
        }

        if let Some(caps) = grammar::BOOL_DEFINE.captures(line) {
            let name = &caps[1];
            match values.get(name) {
                Some(value) => {
                    if !value.enabled() {
                        out.push_str("//");
                    }
                    push_line(&mut out, &grammar::format_bool_define(name));
                    mirror.insert(name.to_string(), value.clone());
                }
                None => {
                    warn!(key = %name, "boolean key not found in the supplied settings");
                    push_line(&mut out, line);
                }
            }
            continue;
        }

        push_line(&mut out, line);
    }

    out
}

fn push_line(out: &mut String, line: &str) {
    out.push_str(line);
    out.push('\n');
}

/// The four homing step values, in order, or `None` if any is missing.
fn homing_steps(values: &SettingsMap) -> Option<[String; 4]> {
    let mut steps: [String; 4] = Default::default();
    for (i, key) in grammar::HOMING_STEP_KEYS.iter().enumerate() {
        match values.get(*key) {
            Some(SettingValue::HomingStep { text, .. }) => steps[i] = text.clone(),
            _ => return None,
        }
    }
    Some(steps)
}
