use std::fmt;

use serde::Deserialize;

/// User-facing strings, replaceable for translation.
///
/// Templates use named placeholders, `{value}`, `{choices}`, `{switch}` and
/// so on; each field lists the ones it receives. Missing fields fall back to
/// English when a catalog is deserialized.
///
/// The first three strings are for help output. Parsing never reads them;
/// they travel with the catalog so a help renderer can be translated along
/// with the errors.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Messages {
    /// Heading for the subcommand list in help output.
    pub sub_commands: String,
    /// Heading for the option list in help output.
    pub options: String,
    /// Description shown next to the help switches.
    pub help_description: String,

    /// `{value}`
    pub cannot_parse_boolean: String,
    /// `{value}`, `{error}`
    pub cannot_parse_integer: String,
    /// `{value}`
    pub cannot_parse_float: String,
    /// `{value}`, `{error}`
    pub cannot_parse_duration: String,
    /// `{value}`, `{choices}`
    pub should_be_a_valid_choice: String,
    /// `{kind}`
    pub needs_a_value: String,

    /// `{name}`, `{error}`
    pub while_parsing_value: String,
    /// `{switch}`
    pub no_such_switch: String,
    /// `{switch}`
    pub expected_a_value: String,
    /// `{switch}`
    pub takes_no_value: String,
    /// `{switch}`, `{cluster}`
    pub cannot_cluster: String,
    /// `{argument}`
    pub unexpected_argument: String,
    /// `{name}`
    pub required_argument: String,
}

impl Default for Messages {
    fn default() -> Messages {
        Messages {
            sub_commands: "Sub-Commands".into(),
            options: "Options".into(),
            help_description: "See this list of options".into(),

            cannot_parse_boolean: "Cannot convert \"{value}\" to a boolean".into(),
            cannot_parse_integer: "Cannot convert \"{value}\" to an integer: {error}".into(),
            cannot_parse_float: "Cannot convert \"{value}\" to a float".into(),
            cannot_parse_duration: "Cannot parse \"{value}\" as a time duration: {error}".into(),
            should_be_a_valid_choice: "Not a valid choice: \"{value}\". Should be one of: {choices}"
                .into(),
            needs_a_value: "Need a {kind} value".into(),

            while_parsing_value: "While parsing value for {name}: {error}".into(),
            no_such_switch: "No such switch: {switch}".into(),
            expected_a_value: "Expected a value after {switch}".into(),
            takes_no_value: "Switch {switch} does not take a value".into(),
            cannot_cluster: "Cannot use {switch} in the switch group {cluster}".into(),
            unexpected_argument: "Unexpected argument: {argument}".into(),
            required_argument: "Expected a required '{name}' argument".into(),
        }
    }
}

/// Substitutes each `{key}` in `template`. Unknown placeholders are left as
/// they are.
pub(crate) fn fill(template: &str, args: &[(&str, &dyn fmt::Display)]) -> String {
    let mut res = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(start) = rest.find('{') {
        res.push_str(&rest[..start]);
        let after = &rest[start + 1..];
        let hit = after.find('}').and_then(|end| {
            let key = &after[..end];
            args.iter().find(|(k, _)| *k == key).map(|(_, v)| (end, v))
        });
        match hit {
            Some((end, value)) => {
                res.push_str(&value.to_string());
                rest = &after[end + 1..];
            }
            None => {
                res.push('{');
                rest = after;
            }
        }
    }
    res.push_str(rest);
    res
}
