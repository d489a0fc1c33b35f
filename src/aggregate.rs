//! Applies scanned events to the destinations, then carries inherited
//! switch values down to the triggered command.
use crate::{
    messages::fill, scan::Event, value::Snapshot, Command, Messages, ParseError, ParseErrorKind,
};

#[derive(Debug, Default)]
pub(crate) struct Outcome {
    /// Child indices from the root to the triggered command.
    pub(crate) path: Vec<usize>,
    pub(crate) error: Option<ParseError>,
    pub(crate) help_requested: bool,
}

enum Pending {
    Switch { index: usize, label: String },
    Positional { index: usize },
}

pub(crate) fn aggregate(root: &mut Command, m: &Messages, events: Vec<Event>) -> Outcome {
    let mut outcome = Outcome::default();
    let mut cmd = root;
    let mut pending = None;
    let mut positional_values = 0;

    for event in events {
        match event {
            Event::Descend(index) => {
                let name = cmd.children[index].name.clone();
                cmd.command_seen.insert(name);
                outcome.path.push(index);
                cmd = &mut cmd.children[index];
                pending = None;
                positional_values = 0;
                tracing::debug!(command = %cmd.name, "descended");
            }
            Event::Switch { index, label } => {
                let bound = &cmd.switches[index];
                cmd.seen.insert(bound.binding.field.clone());
                if bound.switch_arity() == 0 {
                    if let Err(err) = bound.binding.seen_without_value(m, cmd.values.as_values()) {
                        outcome.error = Some(while_parsing(m, &label, err));
                        return outcome;
                    }
                    tracing::trace!(switch = %label, field = %bound.binding.field, "set flag");
                }
                pending = Some(Pending::Switch { index, label });
            }
            Event::Positional { index } => {
                cmd.seen.insert(cmd.positionals[index].binding.field.clone());
                pending = Some(Pending::Positional { index });
            }
            Event::Value(text) => {
                let (bound, label) = match &pending {
                    Some(Pending::Switch { index, label }) => (&cmd.switches[*index], label.clone()),
                    Some(Pending::Positional { index }) => {
                        positional_values += 1;
                        let bound = &cmd.positionals[*index];
                        (bound, bound.arg.pretty_name())
                    }
                    // The scanner emits values only after a switch or a positional.
                    None => continue,
                };
                if let Err(err) = bound.binding.parse(m, cmd.values.as_values(), &text) {
                    outcome.error = Some(while_parsing(m, &label, err));
                    return outcome;
                }
                tracing::trace!(arg = %label, field = %bound.binding.field, value = %text, "bound");
            }
            Event::Help => {
                outcome.help_requested = true;
                return outcome;
            }
            Event::Error(err) => {
                outcome.error = Some(err);
                return outcome;
            }
        }
    }

    if positional_values < cmd.num_required_positional {
        let name = cmd
            .positionals
            .iter()
            .find(|it| it.arity.required() > 0)
            .map(|it| it.arg.pretty_name())
            .unwrap_or_default();
        let msg = fill(&m.required_argument, &[("name", &name)]);
        outcome.error = Some(ParseError::new(ParseErrorKind::MissingPositional, msg));
    }
    outcome
}

fn while_parsing(m: &Messages, name: &str, err: ParseError) -> ParseError {
    let msg = fill(&m.while_parsing_value, &[("name", &name), ("error", &err)]);
    ParseError::new(err.kind(), msg)
}

/// Walks `path` from the root. An `inherit` switch seen at one level sets
/// its copy in the next level unless that copy was seen itself, and so on
/// down to the triggered command.
pub(crate) fn propagate(root: &mut Command, path: &[usize]) {
    let mut carried: Vec<(String, Snapshot)> = Vec::new();
    let mut cmd = root;
    let mut steps = path.iter();
    loop {
        for (field, snapshot) in carried.drain(..) {
            if cmd.seen.contains(&field) {
                continue;
            }
            let Some(bound) =
                cmd.switches.iter().find(|it| it.arg.inherits() && it.binding.field == field)
            else {
                continue;
            };
            if bound.binding.restore(cmd.values.as_values(), snapshot) {
                tracing::debug!(command = %cmd.name, %field, "inherited value");
                cmd.seen.insert(field);
            }
        }

        let Some(&index) = steps.next() else { break };
        for bound in &cmd.switches {
            if bound.arg.inherits() && cmd.seen.contains(&bound.binding.field) {
                if let Some(snapshot) = bound.binding.snapshot(cmd.values.as_values()) {
                    carried.push((bound.binding.field.clone(), snapshot));
                }
            }
        }
        cmd = &mut cmd.children[index];
    }
}
