use thiserror::Error;

use crate::Kind;

/// A mistake in how the command tree was declared.
///
/// These are programming errors, not user input errors: the declarations are
/// fixed in the program, so a build that fails once fails every time.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    #[error("switch #{index} of an argument is an empty string")]
    EmptySwitch { index: usize },
    #[error("switch {spelling:?} should begin with '-'")]
    SwitchPrefix { spelling: String },
    #[error("argument has no switches")]
    NoSwitches,
    #[error("the name of positional argument {name:?} cannot be empty or begin with '-'")]
    PositionalName { name: String },
    #[error("{spelling} is already used by a switch argument in command {command}")]
    DuplicateSwitch { spelling: String, command: String },
    #[error("{name} is already used by a positional argument in command {command}")]
    DuplicatePositional { name: String, command: String },
    #[error("sub-command {name} already exists in {command}")]
    DuplicateChild { name: String, command: String },
    #[error("command name {name:?} cannot be empty or begin with '-'")]
    CommandName { name: String },
    #[error(
        "cannot add argument {arg} because its inherit flag is set \
         and command {command} already has sub-commands"
    )]
    InheritAfterChildren { arg: String, command: String },
    #[error("positional argument {arg} cannot be inherited")]
    InheritPositional { arg: String },
    #[error("could not find destination field for argument {arg}, given as {field}")]
    UnknownField { arg: String, field: String },
    #[error("could not find destination field for argument {arg}; checked {}", .tried.join(","))]
    NoDestination { arg: String, tried: Vec<String> },
    #[error("argument {arg}: choices should be a list of {expected}")]
    ChoicesOfWrongType { arg: String, expected: Kind },
    #[error("switch argument {arg} cannot take a {arity:?} number of values")]
    GlobOnSwitch { arg: String, arity: String },
    #[error("argument {arg} needs a value, it cannot take zero values")]
    ZeroArity { arg: String },
    #[error("argument {arg} takes {arity} values, so its destination must be a list")]
    NeedsList { arg: String, arity: String },
    #[error(
        "cannot add positional argument {arg} after argument {previous}, \
         which takes an unlimited number of values"
    )]
    PositionalAfterUnbounded { arg: String, previous: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// A switch that no argument of the active command spells.
    UnknownSwitch,
    /// A switch given a value it does not take.
    UnexpectedValue,
    /// Input ended before a switch got all of its values.
    MissingValue,
    /// A short switch grouped with characters that are not short switches.
    BadCluster,
    /// A value that does not convert to the bound kind.
    InvalidValue,
    /// A value outside the registered choices.
    InvalidChoice,
    /// A bare token with no positional slot left to take it.
    UnexpectedArgument,
    /// Input ended with required positionals unfilled.
    MissingPositional,
}

/// A user input error. `Display` is the message, already rendered through
/// the parser's [`Messages`](crate::Messages).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{msg}")]
pub struct ParseError {
    kind: ParseErrorKind,
    msg: String,
}

impl ParseError {
    pub(crate) fn new(kind: ParseErrorKind, msg: String) -> ParseError {
        ParseError { kind, msg }
    }

    pub fn kind(&self) -> ParseErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.msg
    }
}
