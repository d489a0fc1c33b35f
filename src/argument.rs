use std::{fmt, str::FromStr};

use crate::{value::Binding, BuildError, Choices, Storage, Values};

/// How many values an argument consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Exactly(usize),
    /// `?`
    ZeroOrOne,
    /// `+`
    OneOrMore,
    /// `*`
    ZeroOrMore,
}

impl Arity {
    /// `+` or `*`: the argument has no upper bound.
    pub fn is_unbounded(self) -> bool {
        matches!(self, Arity::OneOrMore | Arity::ZeroOrMore)
    }

    /// Any of `?`, `+` or `*`.
    pub fn is_glob(self) -> bool {
        !matches!(self, Arity::Exactly(_))
    }

    pub(crate) fn required(self) -> usize {
        match self {
            Arity::Exactly(n) => n,
            Arity::OneOrMore => 1,
            Arity::ZeroOrOne | Arity::ZeroOrMore => 0,
        }
    }

    pub(crate) fn max(self) -> Option<usize> {
        match self {
            Arity::Exactly(n) => Some(n),
            Arity::ZeroOrOne => Some(1),
            Arity::OneOrMore | Arity::ZeroOrMore => None,
        }
    }
}

impl FromStr for Arity {
    type Err = String;

    fn from_str(s: &str) -> Result<Arity, String> {
        match s {
            "?" => Ok(Arity::ZeroOrOne),
            "+" => Ok(Arity::OneOrMore),
            "*" => Ok(Arity::ZeroOrMore),
            _ => s
                .parse::<usize>()
                .map(Arity::Exactly)
                .map_err(|_| format!("invalid arity {s:?}, expected a count, `?`, `+` or `*`")),
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arity::Exactly(n) => write!(f, "{n}"),
            Arity::ZeroOrOne => f.write_str("?"),
            Arity::OneOrMore => f.write_str("+"),
            Arity::ZeroOrMore => f.write_str("*"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Spelling {
    Switches(Vec<String>),
    Positional(String),
}

/// The declaration of one switch or positional argument.
///
/// Built with [`Argument::switch`] or [`Argument::positional`] and the
/// builder methods, then handed to [`Command::add`](crate::Command::add).
/// Once registered, [`get_dest`](Argument::get_dest) and
/// [`get_arity`](Argument::get_arity) report the resolved field and the
/// effective arity.
#[derive(Debug, Clone, PartialEq)]
pub struct Argument {
    spelling: Spelling,
    help: String,
    metavar: Option<String>,
    dest: Option<String>,
    arity: Option<Arity>,
    inherit: bool,
    choices: Option<Choices>,
}

impl Argument {
    /// A switch argument spelled as any of `spellings`, `-v`, `--verbose`.
    pub fn switch<I, S>(spellings: I) -> Argument
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let spellings = spellings.into_iter().map(Into::into).collect();
        Argument::new(Spelling::Switches(spellings))
    }

    /// A positional argument. `name` is shown in help and errors and, unless
    /// [`dest`](Argument::dest) overrides it, names the destination field.
    pub fn positional(name: impl Into<String>) -> Argument {
        Argument::new(Spelling::Positional(name.into()))
    }

    fn new(spelling: Spelling) -> Argument {
        Argument {
            spelling,
            help: String::new(),
            metavar: None,
            dest: None,
            arity: None,
            inherit: false,
            choices: None,
        }
    }

    pub fn help(mut self, help: impl Into<String>) -> Argument {
        self.help = help.into();
        self
    }

    pub fn metavar(mut self, metavar: impl Into<String>) -> Argument {
        self.metavar = Some(metavar.into());
        self
    }

    /// Names the destination field explicitly, either as the field itself
    /// (`dry_run`) or in any spelling [`field_name`] understands (`DryRun`).
    pub fn dest(mut self, dest: impl Into<String>) -> Argument {
        self.dest = Some(dest.into());
        self
    }

    pub fn arity(mut self, arity: Arity) -> Argument {
        self.arity = Some(arity);
        self
    }

    /// Copies the switch into every sub-command added afterwards, and the
    /// value parsed at the parent into the triggered sub-command.
    pub fn inherit(mut self) -> Argument {
        self.inherit = true;
        self
    }

    pub fn choices(mut self, choices: impl Into<Choices>) -> Argument {
        self.choices = Some(choices.into());
        self
    }

    pub fn switches(&self) -> &[String] {
        match &self.spelling {
            Spelling::Switches(it) => it,
            Spelling::Positional(_) => &[],
        }
    }

    pub fn is_positional(&self) -> bool {
        matches!(self.spelling, Spelling::Positional(_))
    }

    /// The positional name, `None` for switches.
    pub fn get_name(&self) -> Option<&str> {
        match &self.spelling {
            Spelling::Switches(_) => None,
            Spelling::Positional(it) => Some(it),
        }
    }

    pub fn get_help(&self) -> &str {
        &self.help
    }

    pub fn get_metavar(&self) -> Option<&str> {
        self.metavar.as_deref()
    }

    pub fn get_dest(&self) -> Option<&str> {
        self.dest.as_deref()
    }

    pub fn get_arity(&self) -> Option<Arity> {
        self.arity
    }

    pub fn inherits(&self) -> bool {
        self.inherit
    }

    pub fn get_choices(&self) -> Option<&Choices> {
        self.choices.as_ref()
    }

    /// The name used in errors: the positional name, or the switches joined
    /// with `/`.
    pub fn pretty_name(&self) -> String {
        match &self.spelling {
            Spelling::Switches(it) => it.join("/"),
            Spelling::Positional(it) => it.clone(),
        }
    }

    pub(crate) fn spells(&self, switch: &str) -> bool {
        self.switches().iter().any(|it| it == switch)
    }

    pub(crate) fn check_spelling(&self) -> Result<(), BuildError> {
        match &self.spelling {
            Spelling::Switches(switches) => {
                if switches.is_empty() {
                    return Err(BuildError::NoSwitches);
                }
                for (index, switch) in switches.iter().enumerate() {
                    if switch.is_empty() {
                        return Err(BuildError::EmptySwitch { index });
                    }
                    if !switch.starts_with('-') {
                        return Err(BuildError::SwitchPrefix { spelling: switch.clone() });
                    }
                }
            }
            Spelling::Positional(name) => {
                if name.is_empty() || name.starts_with('-') {
                    return Err(BuildError::PositionalName { name: name.clone() });
                }
            }
        }
        Ok(())
    }

    /// Finds the destination field and records it in `dest`.
    pub(crate) fn bind(&mut self, values: &mut dyn Values) -> Result<Binding, BuildError> {
        let mut binding = match &self.dest {
            Some(dest) => {
                let field = field_name(dest);
                Binding::resolve(values, &field).ok_or_else(|| BuildError::UnknownField {
                    arg: self.pretty_name(),
                    field: dest.clone(),
                })?
            }
            None => {
                let candidates: Vec<String> = match &self.spelling {
                    Spelling::Switches(it) => it.iter().map(|it| field_name(it)).collect(),
                    Spelling::Positional(it) => vec![field_name(it)],
                };
                candidates
                    .iter()
                    .find_map(|field| Binding::resolve(values, field))
                    .ok_or_else(|| BuildError::NoDestination {
                        arg: self.pretty_name(),
                        tried: candidates.clone(),
                    })?
            }
        };
        if let Some(choices) = &self.choices {
            binding.set_choices(choices.clone()).map_err(|expected| {
                BuildError::ChoicesOfWrongType { arg: self.pretty_name(), expected }
            })?;
        }
        self.dest = Some(binding.field.clone());
        Ok(binding)
    }

    /// Fills in the arity left unset and checks it against the field.
    pub(crate) fn settle_arity(&mut self, binding: &Binding) -> Result<Arity, BuildError> {
        let arg = self.pretty_name();
        let arity = match (&self.spelling, self.arity) {
            (Spelling::Positional(_), None) => Arity::Exactly(1),
            (Spelling::Switches(_), None) => Arity::Exactly(binding.default_arity()),
            (Spelling::Switches(_), Some(arity)) if arity.is_glob() => {
                return Err(BuildError::GlobOnSwitch { arg, arity: arity.to_string() })
            }
            (_, Some(arity)) => arity,
        };
        let needs_list = match arity {
            Arity::Exactly(0) if self.is_positional() || !binding.is_flag() => {
                return Err(BuildError::ZeroArity { arg });
            }
            Arity::Exactly(n) => n > 1,
            Arity::OneOrMore | Arity::ZeroOrMore => true,
            Arity::ZeroOrOne => false,
        };
        if needs_list && binding.storage == Storage::Scalar {
            return Err(BuildError::NeedsList { arg, arity: arity.to_string() });
        }
        self.arity = Some(arity);
        Ok(arity)
    }
}

/// Turns a switch spelling or a name into a Rust field identifier.
///
/// Leading dashes are dropped, words split at `-`, `.`, `_` and at camel
/// case humps, then lowercased and joined with `_`: `--no-checkout` becomes
/// `no_checkout`, `PosInt` becomes `pos_int`, `HTTPPort` becomes `http_port`.
pub fn field_name(spelling: &str) -> String {
    let chars: Vec<char> = spelling.trim_start_matches('-').chars().collect();
    let mut res = String::with_capacity(chars.len() + 4);
    let mut prev: Option<char> = None;
    let mut word_break = false;
    for (i, &c) in chars.iter().enumerate() {
        if matches!(c, '-' | '.' | '_') {
            word_break = true;
            prev = None;
            continue;
        }
        if !c.is_ascii_alphanumeric() {
            continue;
        }
        let hump = c.is_ascii_uppercase()
            && match prev {
                Some(p) if p.is_ascii_lowercase() || p.is_ascii_digit() => true,
                Some(p) if p.is_ascii_uppercase() => {
                    chars.get(i + 1).map_or(false, |next| next.is_ascii_lowercase())
                }
                _ => false,
            };
        if (word_break || hump) && !res.is_empty() {
            res.push('_');
        }
        word_break = false;
        res.push(c.to_ascii_lowercase());
        prev = Some(c);
    }
    res
}
