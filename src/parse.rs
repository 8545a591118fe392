//! The two-pass template/user merge.
//!
//! Operates on pre-loaded line buffers with no I/O, so the full pipeline is
//! testable with synthetic inputs. Steps:
//!
//! 1. Template pass — establishes the vocabulary (every `#define` name
//!    seen), gathers documentation blocks, accumulates homing options and
//!    steps, and records each setting's default value.
//! 2. Force every boolean default to `false`. The generic template's
//!    example truthiness is never trusted; only the user file may enable a
//!    toggle.
//! 3. User pass — the same per-line classification over the user file,
//!    overwriting the defaults. Documentation blocks are recognized only to
//!    be skipped, and names the template never declared are ignored.
//!
//! Each pass is a small state machine: `Normal` or `GatheringDoc`, plus a
//! continuation accumulator that joins backslash-terminated lines before
//! any classification. Within a pass, declarations apply strictly in file
//! order and the last one for a name wins — except that a boolean-shaped
//! line never overwrites an established value-typed setting (such lines are
//! stray hand edits, and the typed value is kept).

use indexmap::IndexMap;
use tracing::debug;

use crate::grammar;
use crate::helptext;
use crate::value::{SettingValue, SettingsMap};

/// Everything the merge produces: the typed settings, the recognized names
/// in template order, and the per-name documentation.
#[derive(Debug, Clone, Default)]
pub struct MergedConfig {
    pub values: SettingsMap,
    pub names: Vec<String>,
    pub help: IndexMap<String, String>,
}

impl MergedConfig {
    fn is_recognized(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }
}

/// Per-pass line-classification state. No state survives across passes.
enum PassState {
    Normal,
    GatheringDoc { keys: String, text: String },
}

/// Merge a template/user line pair into a [`MergedConfig`].
pub fn merge_passes(template: &[String], user: &[String]) -> MergedConfig {
    let mut merged = MergedConfig::default();

    template_pass(template, &mut merged);

    // Items missing from the user configuration must default to disabled.
    for value in merged.values.values_mut() {
        if let SettingValue::Boolean(enabled) = value {
            *enabled = false;
        }
    }

    user_pass(user, &mut merged);

    debug!(
        values = merged.values.len(),
        names = merged.names.len(),
        help = merged.help.len(),
        "template and user configuration merged"
    );
    merged
}

fn template_pass(lines: &[String], out: &mut MergedConfig) {
    let mut state = PassState::Normal;
    let mut pending = String::new();

    for raw in lines {
        if let PassState::GatheringDoc { keys, text } = &mut state {
            if grammar::DOC_BLOCK_END.is_match(raw) {
                let body = helptext::normalize(text);
                for key in keys.split_whitespace() {
                    out.help.insert(key.to_string(), body.clone());
                }
                state = PassState::Normal;
            } else {
                text.push_str(raw);
                text.push('\n');
            }
            continue;
        }

        if let Some(caps) = grammar::DOC_BLOCK_START.captures(raw) {
            state = PassState::GatheringDoc {
                keys: caps[1].to_string(),
                text: String::new(),
            };
            continue;
        }

        let Some(line) = join_continuation(raw, &mut pending) else {
            continue;
        };

        if classify_option(&line, &mut out.values) {
            continue;
        }
        if classify_homing(&line, &mut out.values) {
            continue;
        }
        register_name(&line, out);
        classify_value(&line, out);
    }
}

fn user_pass(lines: &[String], out: &mut MergedConfig) {
    let mut in_doc = false;
    let mut pending = String::new();

    for raw in lines {
        // Doc blocks in the user file are consumed without re-parsing.
        if in_doc {
            if grammar::DOC_BLOCK_END.is_match(raw) {
                in_doc = false;
            }
            continue;
        }
        if grammar::DOC_BLOCK_START.is_match(raw) {
            in_doc = true;
            continue;
        }

        let Some(line) = join_continuation(raw, &mut pending) else {
            continue;
        };

        if classify_option(&line, &mut out.values) {
            continue;
        }
        if classify_homing(&line, &mut out.values) {
            continue;
        }
        classify_value(&line, out);
    }
}

/// Handle line continuations. A line ending in a backslash is accumulated
/// (backslash dropped, no space inserted) and `None` is returned; otherwise
/// the line — prefixed by any accumulated run — is returned whole.
fn join_continuation(raw: &str, pending: &mut String) -> Option<String> {
    if grammar::has_continuation(raw) {
        let trimmed = raw.trim_end();
        pending.push_str(&trimmed[..trimmed.len() - 1]);
        return None;
    }
    if pending.is_empty() {
        Some(raw.to_string())
    } else {
        let mut line = std::mem::take(pending);
        line.push_str(raw);
        Some(line)
    }
}

/// A repeatable `HOMING_OPTION(name)` line: append to the option set if
/// new. Returns whether the line was consumed.
fn classify_option(line: &str, values: &mut SettingsMap) -> bool {
    let Some(caps) = grammar::HOMING_OPTION.captures(line) else {
        return false;
    };
    let option = caps[1].to_string();
    let entry = values
        .entry(grammar::HOMING_OPTS_KEY.to_string())
        .or_insert_with(|| SettingValue::HomingOptionSet(Vec::new()));
    if let SettingValue::HomingOptionSet(options) = entry
        && !options.contains(&option)
    {
        options.push(option);
    }
    true
}

/// A grouped homing declaration: decompose the argument string into exactly
/// four parts and store them under the synthetic step names. A group whose
/// argument string does not decompose is treated as no match at all — the
/// line falls through to the define rules.
fn classify_homing(line: &str, values: &mut SettingsMap) -> bool {
    let Some(caps) = grammar::HOMING_GROUP.captures(line) else {
        return false;
    };
    let Some(args) = grammar::HOMING_ARGS.captures(&caps[1]) else {
        debug!(line, "homing group without exactly four arguments; ignored");
        return false;
    };
    for (i, key) in grammar::HOMING_STEP_KEYS.iter().enumerate() {
        values.insert(
            key.to_string(),
            SettingValue::HomingStep {
                index: i as u8 + 1,
                text: args[i + 1].to_string(),
            },
        );
    }
    true
}

/// Template pass only: any `#define NAME` (commented or not, with or
/// without a value) adds the name to the vocabulary.
fn register_name(line: &str, out: &mut MergedConfig) {
    if let Some(caps) = grammar::NAME_REGISTRATION.captures(line) {
        let name = &caps[1];
        if !out.is_recognized(name) {
            out.names.push(name.to_string());
        }
    }
}

/// The value-line classifier. Tries the three mutually exclusive define
/// sub-forms in order (quoted list, plain value, boolean); returns whether
/// the line was consumed. Names outside the vocabulary are left alone.
fn classify_value(line: &str, out: &mut MergedConfig) -> bool {
    let enabled = !grammar::COMMENT_PREFIX.is_match(line);

    if let Some(caps) = grammar::QUOTED_DEFINE.captures(line) {
        let name = &caps[1];
        if out.is_recognized(name) {
            let items: Vec<String> = grammar::QUOTED_ITEM
                .captures_iter(&caps[2])
                .map(|c| c[1].to_string())
                .collect();
            out.values.insert(
                name.to_string(),
                SettingValue::QuotedList { items, enabled },
            );
            return true;
        }
    }

    if let Some(caps) = grammar::VALUE_DEFINE.captures(line) {
        let name = &caps[1];
        if out.is_recognized(name) {
            out.values.insert(
                name.to_string(),
                SettingValue::Scalar {
                    text: caps[2].to_string(),
                    enabled,
                },
            );
            return true;
        }
    }

    if let Some(caps) = grammar::BOOL_DEFINE.captures(line) {
        let name = &caps[1];
        // A boolean line for a name that already holds a value is most
        // likely a misconfigured manual edit; the typed value wins.
        let value_typed = out
            .values
            .get(name)
            .is_some_and(SettingValue::is_value_typed);
        if out.is_recognized(name) && !value_typed {
            out.values
                .insert(name.to_string(), SettingValue::Boolean(enabled));
            return true;
        }
    }

    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::test::{template_lines, user_lines};

    fn lines(src: &[&str]) -> Vec<String> {
        src.iter().map(|s| s.to_string()).collect()
    }

    fn merge(template: &[&str], user: &[&str]) -> MergedConfig {
        merge_passes(&lines(template), &lines(user))
    }

    #[test]
    fn template_names_are_registered_in_order() {
        let merged = merge(
            &["#define ALPHA 1", "//#define BETA", "#define GAMMA 3"],
            &[],
        );
        assert_eq!(merged.names, vec!["ALPHA", "BETA", "GAMMA"]);
    }

    #[test]
    fn booleans_default_to_disabled_after_the_template_pass() {
        // Enabled in the template, absent from the user file.
        let merged = merge(&["#define USB_SERIAL"], &[]);
        assert_eq!(
            merged.values.get("USB_SERIAL"),
            Some(&SettingValue::Boolean(false))
        );
    }

    #[test]
    fn user_file_enables_a_boolean() {
        let merged = merge(&["//#define USB_SERIAL"], &["#define USB_SERIAL"]);
        assert_eq!(
            merged.values.get("USB_SERIAL"),
            Some(&SettingValue::Boolean(true))
        );
    }

    #[test]
    fn user_value_overrides_template_default() {
        let merged = merge(&["#define BAUD 115200"], &["#define BAUD 57600"]);
        assert_eq!(
            merged.values.get("BAUD"),
            Some(&SettingValue::Scalar {
                text: "57600".into(),
                enabled: true
            })
        );
    }

    #[test]
    fn commented_value_is_disabled() {
        let merged = merge(&["#define BAUD 115200"], &["//#define BAUD 57600"]);
        assert_eq!(
            merged.values.get("BAUD"),
            Some(&SettingValue::Scalar {
                text: "57600".into(),
                enabled: false
            })
        );
    }

    #[test]
    fn names_absent_from_the_user_file_keep_template_defaults() {
        let merged = merge(&["#define BAUD 115200"], &["#define OTHER 1"]);
        assert_eq!(
            merged.values.get("BAUD"),
            Some(&SettingValue::Scalar {
                text: "115200".into(),
                enabled: true
            })
        );
    }

    #[test]
    fn unrecognized_user_names_are_ignored() {
        let merged = merge(&["#define BAUD 115200"], &["#define INVENTED 42"]);
        assert!(!merged.values.contains_key("INVENTED"));
        assert!(!merged.names.iter().any(|n| n == "INVENTED"));
    }

    #[test]
    fn last_declaration_wins_within_a_pass() {
        let merged = merge(&["#define BAUD 9600", "#define BAUD 115200"], &[]);
        assert_eq!(
            merged.values.get("BAUD"),
            Some(&SettingValue::Scalar {
                text: "115200".into(),
                enabled: true
            })
        );
    }

    #[test]
    fn boolean_line_never_overwrites_a_value() {
        let merged = merge(&["#define BAUD 115200", "#define BAUD"], &[]);
        assert_eq!(
            merged.values.get("BAUD"),
            Some(&SettingValue::Scalar {
                text: "115200".into(),
                enabled: true
            })
        );
    }

    #[test]
    fn boolean_guard_applies_across_passes() {
        let merged = merge(&["#define BAUD 115200"], &["#define BAUD"]);
        assert!(merged.values.get("BAUD").unwrap().is_value_typed());
    }

    #[test]
    fn quoted_list_keeps_source_order() {
        let merged = merge(&[r#"#define GREETING "a" "b" "c""#], &[]);
        assert_eq!(
            merged.values.get("GREETING"),
            Some(&SettingValue::QuotedList {
                items: vec!["a".into(), "b".into(), "c".into()],
                enabled: true
            })
        );
    }

    #[test]
    fn single_quoted_string_is_a_one_element_list() {
        let merged = merge(&[r#"#define GREETING "hi""#], &[]);
        assert_eq!(
            merged.values.get("GREETING"),
            Some(&SettingValue::QuotedList {
                items: vec!["hi".into()],
                enabled: true
            })
        );
    }

    #[test]
    fn user_quoted_override_replaces_not_unions() {
        let merged = merge(
            &[r#"#define GREETING "a" "b" "c""#],
            &[r#"#define GREETING "only""#],
        );
        assert_eq!(
            merged.values.get("GREETING"),
            Some(&SettingValue::QuotedList {
                items: vec!["only".into()],
                enabled: true
            })
        );
    }

    #[test]
    fn homing_group_populates_four_steps() {
        let merged = merge(&["DEFINE_HOMING(x_min, y_min, z_min, none)"], &[]);
        for (i, key) in grammar::HOMING_STEP_KEYS.iter().enumerate() {
            match merged.values.get(*key) {
                Some(SettingValue::HomingStep { index, .. }) => {
                    assert_eq!(*index, i as u8 + 1);
                }
                other => panic!("expected HomingStep for {key}, got {other:?}"),
            }
        }
        assert_eq!(
            merged.values.get("HOMING_STEP3"),
            Some(&SettingValue::HomingStep {
                index: 3,
                text: "z_min".into()
            })
        );
    }

    #[test]
    fn user_homing_group_overrides_template_order() {
        let merged = merge(
            &["DEFINE_HOMING(x_min, y_min, z_min, none)"],
            &["DEFINE_HOMING(z_min, y_min, x_min, none)"],
        );
        assert_eq!(
            merged.values.get("HOMING_STEP1"),
            Some(&SettingValue::HomingStep {
                index: 1,
                text: "z_min".into()
            })
        );
    }

    #[test]
    fn malformed_homing_group_records_nothing() {
        let merged = merge(&["DEFINE_HOMING(x_min, y_min)"], &[]);
        assert!(!merged.values.contains_key("HOMING_STEP1"));
    }

    #[test]
    fn options_deduplicate_and_keep_first_seen_order() {
        let merged = merge(
            &[
                "HOMING_OPTION(x_min)",
                "HOMING_OPTION(y_min)",
                "HOMING_OPTION(x_min)",
            ],
            &["HOMING_OPTION(y_min)", "HOMING_OPTION(none)"],
        );
        assert_eq!(
            merged.values.get(grammar::HOMING_OPTS_KEY),
            Some(&SettingValue::HomingOptionSet(vec![
                "x_min".into(),
                "y_min".into(),
                "none".into()
            ]))
        );
    }

    #[test]
    fn continuation_joins_before_classification() {
        let merged = merge(&["#define LONG \\", "VALUE"], &[]);
        assert_eq!(
            merged.values.get("LONG"),
            Some(&SettingValue::Scalar {
                text: "VALUE".into(),
                enabled: true
            })
        );
    }

    #[test]
    fn chained_continuations_accumulate() {
        let merged = merge(&["#define CHAIN \\", "AB\\", "CD"], &[]);
        assert_eq!(
            merged.values.get("CHAIN"),
            Some(&SettingValue::Scalar {
                text: "ABCD".into(),
                enabled: true
            })
        );
    }

    #[test]
    fn doc_block_documents_every_listed_name() {
        let merged = merge(
            &[
                r"/** \def BAUD BAUD_HALF_DUPLEX",
                "  Speed of the serial",
                "  link.",
                "*/",
                "#define BAUD 115200",
                "//#define BAUD_HALF_DUPLEX",
            ],
            &[],
        );
        let text = "Speed of the serial link.";
        assert_eq!(merged.help.get("BAUD").map(String::as_str), Some(text));
        assert_eq!(
            merged.help.get("BAUD_HALF_DUPLEX").map(String::as_str),
            Some(text)
        );
    }

    #[test]
    fn doc_block_contents_are_not_classified() {
        // A define-shaped line inside a doc block must not enter the map.
        let merged = merge(
            &[
                r"/** \def REAL",
                "  Example: #define FAKE 99",
                "*/",
                "#define REAL 1",
            ],
            &[],
        );
        assert!(!merged.values.contains_key("FAKE"));
        assert!(merged.values.contains_key("REAL"));
    }

    #[test]
    fn user_doc_blocks_are_skipped_without_effect() {
        let merged = merge(
            &["#define BAUD 115200"],
            &[
                r"/** \def BAUD",
                "  #define BAUD 9600",
                "*/",
                "#define BAUD 57600",
            ],
        );
        assert_eq!(
            merged.values.get("BAUD"),
            Some(&SettingValue::Scalar {
                text: "57600".into(),
                enabled: true
            })
        );
    }

    #[test]
    fn fixture_pair_merges_expected_vocabulary() {
        let merged = merge_passes(&template_lines(), &user_lines());
        assert!(merged.names.iter().any(|n| n == "BAUD"));
        assert!(merged.names.iter().any(|n| n == "MOTHERBOARD"));
        assert!(merged.values.contains_key(grammar::HOMING_OPTS_KEY));
        assert!(merged.help.contains_key("BAUD"));
        // User file enabled the toggle; template alone would say false.
        assert_eq!(
            merged.values.get("USB_SERIAL"),
            Some(&SettingValue::Boolean(true))
        );
    }
}
