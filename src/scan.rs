//! Turns the token list into a flat list of events against the command tree.
//!
//! The scanner only reads the tree. Values are converted and stored later,
//! by [`aggregate`](crate::aggregate), so that a scan error leaves every
//! destination untouched by the events after it.
use crate::{messages::fill, Arity, Command, Messages, ParseError, ParseErrorKind};

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Event {
    /// Entered the child at this index of the active command.
    Descend(usize),
    /// A switch of the active command, as it was spelled.
    Switch { index: usize, label: String },
    Positional { index: usize },
    /// A value for the last switch or positional.
    Value(String),
    Help,
    Error(ParseError),
}

enum State {
    Argument,
    Option,
    Values { switch: String, remaining: usize },
    Positional,
}

/// Where positional filling stands in the active command.
#[derive(Default)]
struct Cursor {
    index: usize,
    /// Values taken by the positional at `index`.
    filled: usize,
    /// Values taken by all positionals.
    evaluated: usize,
}

struct Scanner<'a> {
    cmd: &'a Command,
    help: &'a [String],
    m: &'a Messages,
    args: &'a [String],
    pos: usize,
    cursor: Cursor,
    after_double_dash: bool,
    events: Vec<Event>,
}

pub(crate) fn scan(root: &Command, help: &[String], m: &Messages, args: &[String]) -> Vec<Event> {
    let mut scanner = Scanner {
        cmd: root,
        help,
        m,
        args,
        pos: 0,
        cursor: Cursor::default(),
        after_double_dash: false,
        events: Vec::new(),
    };
    let mut state = Some(State::Argument);
    while let Some(it) = state {
        state = match it {
            State::Argument => scanner.argument(),
            State::Option => scanner.option(),
            State::Values { switch, remaining } => scanner.value(switch, remaining),
            State::Positional => scanner.positional(),
        };
    }
    scanner.events
}

impl Scanner<'_> {
    fn emit(&mut self, event: Event) {
        tracing::trace!(?event, "scanned");
        self.events.push(event);
    }

    fn is_help(&self, switch: &str) -> bool {
        self.help.iter().any(|it| it == switch)
    }

    fn help_requested(&mut self) -> Option<State> {
        self.emit(Event::Help);
        None
    }

    fn fail(&mut self, kind: ParseErrorKind, msg: String) -> Option<State> {
        self.emit(Event::Error(ParseError::new(kind, msg)));
        None
    }

    fn argument(&mut self) -> Option<State> {
        let args = self.args;
        let Some(token) = args.get(self.pos) else {
            return self.finish();
        };
        if !self.after_double_dash {
            let cmd = self.cmd;
            if let Some(index) = cmd.children.iter().position(|it| it.name == *token) {
                self.emit(Event::Descend(index));
                self.cmd = &cmd.children[index];
                self.cursor = Cursor::default();
                self.pos += 1;
                return Some(State::Argument);
            }
            if token == "--" {
                self.after_double_dash = true;
                self.pos += 1;
                return Some(State::Argument);
            }
            if token.len() > 1 && token.starts_with('-') {
                return Some(State::Option);
            }
        }
        if self.cursor.index < self.cmd.positionals.len() {
            return Some(State::Positional);
        }
        let msg = fill(&self.m.unexpected_argument, &[("argument", token)]);
        self.fail(ParseErrorKind::UnexpectedArgument, msg)
    }

    fn option(&mut self) -> Option<State> {
        let args = self.args;
        let token = &args[self.pos];
        self.pos += 1;
        let (name, attached) = match token.split_once('=') {
            Some((name, value)) => (name, Some(value)),
            None => (token.as_str(), None),
        };
        if self.is_help(name) {
            return self.help_requested();
        }
        let cmd = self.cmd;
        if let Some(index) = cmd.switches.iter().position(|it| it.arg.spells(name)) {
            return self.matched(index, name, attached);
        }
        if !token.starts_with("--") && token.chars().count() > 2 {
            return self.cluster(token);
        }
        let msg = fill(&self.m.no_such_switch, &[("switch", &name)]);
        self.fail(ParseErrorKind::UnknownSwitch, msg)
    }

    fn matched(&mut self, index: usize, label: &str, attached: Option<&str>) -> Option<State> {
        let arity = self.cmd.switches[index].switch_arity();
        if arity == 0 && attached.is_some() {
            let msg = fill(&self.m.takes_no_value, &[("switch", &label)]);
            return self.fail(ParseErrorKind::UnexpectedValue, msg);
        }
        self.emit(Event::Switch { index, label: label.to_string() });
        match attached {
            Some(value) => {
                self.emit(Event::Value(value.to_string()));
                self.expect_values(label, arity - 1)
            }
            None => self.expect_values(label, arity),
        }
    }

    fn expect_values(&self, switch: &str, remaining: usize) -> Option<State> {
        if remaining == 0 {
            Some(State::Argument)
        } else {
            Some(State::Values { switch: switch.to_string(), remaining })
        }
    }

    /// `-abc` with no switch spelled so: either bare short switches grouped
    /// together, or a numeric short switch with its value glued on. A help
    /// spelling anywhere in a group of bare switches asks for help.
    fn cluster(&mut self, token: &str) -> Option<State> {
        let rest = &token[1..];
        let first = rest.chars().next()?;
        let label = format!("-{first}");
        if self.is_help(&label) {
            return self.help_requested();
        }
        let cmd = self.cmd;
        let Some(index) = cmd.switches.iter().position(|it| it.arg.spells(&label)) else {
            let msg = fill(&self.m.no_such_switch, &[("switch", &token)]);
            return self.fail(ParseErrorKind::UnknownSwitch, msg);
        };
        let bound = &cmd.switches[index];
        let glued = &rest[first.len_utf8()..];
        let arity = bound.switch_arity();
        if arity > 0 {
            if !bound.binding.takes_adjoined() {
                return self.bad_cluster(&label, token);
            }
            self.emit(Event::Switch { index, label: label.clone() });
            self.emit(Event::Value(glued.to_string()));
            return self.expect_values(&label, arity - 1);
        }

        let mut group = vec![(index, label)];
        for c in glued.chars() {
            let label = format!("-{c}");
            if self.is_help(&label) {
                return self.help_requested();
            }
            match cmd.switches.iter().position(|it| it.arg.spells(&label) && it.switch_arity() == 0)
            {
                Some(index) => group.push((index, label)),
                None => return self.bad_cluster(&label, token),
            }
        }
        for (index, label) in group {
            self.emit(Event::Switch { index, label });
        }
        Some(State::Argument)
    }

    fn bad_cluster(&mut self, switch: &str, cluster: &str) -> Option<State> {
        let msg = fill(&self.m.cannot_cluster, &[("switch", &switch), ("cluster", &cluster)]);
        self.fail(ParseErrorKind::BadCluster, msg)
    }

    fn value(&mut self, switch: String, remaining: usize) -> Option<State> {
        let args = self.args;
        let Some(token) = args.get(self.pos) else {
            let msg = fill(&self.m.expected_a_value, &[("switch", &switch)]);
            return self.fail(ParseErrorKind::MissingValue, msg);
        };
        self.pos += 1;
        self.emit(Event::Value(token.clone()));
        if remaining > 1 {
            Some(State::Values { switch, remaining: remaining - 1 })
        } else {
            Some(State::Argument)
        }
    }

    fn positional(&mut self) -> Option<State> {
        let args = self.args;
        let index = self.cursor.index;
        let arity = self.cmd.positionals[index].arity;
        self.emit(Event::Positional { index });
        self.emit(Event::Value(args[self.pos].clone()));
        self.pos += 1;
        self.cursor.filled += 1;
        self.cursor.evaluated += 1;
        match arity {
            Arity::Exactly(n) if self.cursor.filled < n => (),
            Arity::OneOrMore | Arity::ZeroOrMore => {
                // Everything left belongs to the list, dashes included.
                while let Some(token) = args.get(self.pos) {
                    self.emit(Event::Value(token.clone()));
                    self.pos += 1;
                    self.cursor.evaluated += 1;
                }
            }
            Arity::Exactly(_) | Arity::ZeroOrOne => {
                self.cursor.index += 1;
                self.cursor.filled = 0;
            }
        }
        Some(State::Argument)
    }

    fn finish(&mut self) -> Option<State> {
        let cmd = self.cmd;
        if self.cursor.evaluated >= cmd.num_required_positional {
            return None;
        }
        let pending = &cmd.positionals[self.cursor.index.min(cmd.positionals.len())..];
        let missing = pending.iter().find(|it| it.arity.required() > 0).or(pending.first());
        let name = missing.map(|it| it.arg.pretty_name()).unwrap_or_default();
        let msg = fill(&self.m.required_argument, &[("name", &name)]);
        self.fail(ParseErrorKind::MissingPositional, msg)
    }
}
