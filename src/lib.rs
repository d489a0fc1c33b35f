//! Binds a flat list of command line tokens to the typed fields of a
//! destination struct.
//!
//! A parser is a tree of [`Command`]s, each owning a destination object that
//! implements [`Values`] (usually through `#[derive(Values)]`). Switch and
//! positional [`Argument`]s are registered on a command and resolve their
//! destination field once, at registration time. Parsing walks the tokens,
//! fills the fields of every command on the way to the triggered one, and
//! copies `inherit`ed switches down the chain.
//!
//! ```
//! use argbind::{Argument, ArgumentParser, Arity, Command, Values};
//!
//! #[derive(Default, Values)]
//! struct Opts {
//!     verbose: bool,
//!     jobs: i32,
//!     names: Vec<String>,
//! }
//!
//! let mut ap = ArgumentParser::new(Command::new("demo", Opts::default()));
//! ap.add(Argument::switch(["-v", "--verbose"])).unwrap();
//! ap.add(Argument::switch(["-j", "--jobs"])).unwrap();
//! ap.add(Argument::positional("names").arity(Arity::OneOrMore)).unwrap();
//!
//! let res = ap.parse_argv(["-v", "-j4", "a", "b"]);
//! assert!(res.error.is_none());
//! let opts = res.triggered.values::<Opts>().unwrap();
//! assert!(opts.verbose);
//! assert_eq!(opts.jobs, 4);
//! assert_eq!(opts.names, ["a", "b"]);
//! ```

extern crate self as argbind;

mod aggregate;
mod argument;
mod command;
mod duration;
mod error;
mod messages;
mod parser;
mod scan;
mod value;

pub use argbind_macros::Values;

pub use crate::{
    argument::{field_name, Argument, Arity},
    command::{Callback, Command},
    duration::{Duration, ParseDurationError},
    error::{BuildError, ParseError, ParseErrorKind},
    messages::Messages,
    parser::{ArgumentParser, ParseResult},
    value::{Choices, FieldMut, Kind, Storage, Values},
};

pub type Result<T, E = BuildError> = std::result::Result<T, E>;
