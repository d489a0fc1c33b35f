//! Typed storage slots and the logic that converts tokens into them.
//!
//! A destination object hands out [`FieldMut`]s by identifier. An argument
//! resolves its identifier once, when it is registered, and keeps a
//! [`Binding`] recording the field's kind, its storage and any choices.
//! Scalars are overwritten on every value; lists are appended to.
use std::fmt;

use crate::{messages::fill, Duration, Messages, ParseError, ParseErrorKind};

/// A destination object: hands out its fields by identifier.
///
/// Usually derived; see [`derive@crate::Values`]. Identifiers are the Rust
/// field names (`no_checkout`), which is what [`field_name`](crate::field_name)
/// derives from switch spellings and positional names.
pub trait Values {
    fn field(&mut self, id: &str) -> Option<FieldMut<'_>>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Storage {
    Scalar,
    List,
}

macro_rules! kinds {
    ($($kind:ident, $list:ident: $ty:ty = $parse:ident, $name:literal;)*) => {
        /// A mutable borrow of one bindable field.
        #[derive(Debug)]
        pub enum FieldMut<'a> {
            $($kind(&'a mut $ty), $list(&'a mut Vec<$ty>),)*
        }

        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        pub enum Kind {
            $($kind,)*
        }

        /// The values an argument accepts, of the same kind as its field.
        #[derive(Debug, Clone, PartialEq)]
        pub enum Choices {
            $($kind(Vec<$ty>),)*
        }

        /// An owned copy of a field.
        #[derive(Debug, Clone, PartialEq)]
        pub(crate) enum Snapshot {
            $($kind($ty), $list(Vec<$ty>),)*
        }

        impl FieldMut<'_> {
            pub fn kind(&self) -> Kind {
                match self {
                    $(FieldMut::$kind(_) | FieldMut::$list(_) => Kind::$kind,)*
                }
            }

            pub fn storage(&self) -> Storage {
                match self {
                    $(FieldMut::$kind(_) => Storage::Scalar, FieldMut::$list(_) => Storage::List,)*
                }
            }

            pub(crate) fn snapshot(&self) -> Snapshot {
                match self {
                    $(
                        FieldMut::$kind(it) => Snapshot::$kind((**it).clone()),
                        FieldMut::$list(it) => Snapshot::$list(it.to_vec()),
                    )*
                }
            }

            pub(crate) fn restore(self, snapshot: Snapshot) -> bool {
                match (self, snapshot) {
                    $(
                        (FieldMut::$kind(it), Snapshot::$kind(value)) => *it = value,
                        (FieldMut::$list(it), Snapshot::$list(value)) => *it = value,
                    )*
                    _ => return false,
                }
                true
            }
        }

        impl fmt::Display for Kind {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                let name = match self {
                    $(Kind::$kind => $name,)*
                };
                f.write_str(name)
            }
        }

        impl Choices {
            pub fn kind(&self) -> Kind {
                match self {
                    $(Choices::$kind(_) => Kind::$kind,)*
                }
            }
        }

        impl fmt::Display for Choices {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                match self {
                    $(Choices::$kind(it) => f.write_str(&join(it)),)*
                }
            }
        }

        $(
            impl<'a> From<&'a mut $ty> for FieldMut<'a> {
                fn from(it: &'a mut $ty) -> FieldMut<'a> {
                    FieldMut::$kind(it)
                }
            }

            impl<'a> From<&'a mut Vec<$ty>> for FieldMut<'a> {
                fn from(it: &'a mut Vec<$ty>) -> FieldMut<'a> {
                    FieldMut::$list(it)
                }
            }

            impl From<Vec<$ty>> for Choices {
                fn from(it: Vec<$ty>) -> Choices {
                    Choices::$kind(it)
                }
            }

            impl<const N: usize> From<[$ty; N]> for Choices {
                fn from(it: [$ty; N]) -> Choices {
                    Choices::$kind(it.to_vec())
                }
            }

            impl Item for $ty {
                fn from_text(m: &Messages, text: &str) -> Result<$ty, String> {
                    $parse(m, text)
                }

                fn choices(choices: &Choices) -> Option<&[$ty]> {
                    match choices {
                        Choices::$kind(it) => Some(it),
                        _ => None,
                    }
                }

                fn slot(field: FieldMut<'_>) -> Option<Slot<'_, $ty>> {
                    match field {
                        FieldMut::$kind(it) => Some(Slot::One(it)),
                        FieldMut::$list(it) => Some(Slot::Many(it)),
                        _ => None,
                    }
                }
            }
        )*
    };
}

kinds! {
    Bool, BoolList: bool = parse_bool, "bool";
    Str, StrList: String = parse_str, "string";
    Int, IntList: i32 = parse_i32, "integer";
    Int64, Int64List: i64 = parse_i64, "int64";
    Float, FloatList: f64 = parse_f64, "float";
    Duration, DurationList: Duration = parse_duration, "duration";
}

impl<const N: usize> From<[&str; N]> for Choices {
    fn from(it: [&str; N]) -> Choices {
        Choices::Str(it.iter().map(|it| it.to_string()).collect())
    }
}

impl From<Vec<&str>> for Choices {
    fn from(it: Vec<&str>) -> Choices {
        Choices::Str(it.into_iter().map(String::from).collect())
    }
}

enum Slot<'a, T> {
    One(&'a mut T),
    Many(&'a mut Vec<T>),
}

trait Item: Sized + Clone + PartialEq + fmt::Display {
    fn from_text(m: &Messages, text: &str) -> Result<Self, String>;
    fn choices(choices: &Choices) -> Option<&[Self]>;
    fn slot(field: FieldMut<'_>) -> Option<Slot<'_, Self>>;
}

fn join<T: fmt::Display>(items: &[T]) -> String {
    items.iter().map(|it| it.to_string()).collect::<Vec<_>>().join(", ")
}

fn parse_bool(m: &Messages, text: &str) -> Result<bool, String> {
    match text {
        "1" | "t" | "T" | "true" | "TRUE" | "True" => Ok(true),
        "0" | "f" | "F" | "false" | "FALSE" | "False" => Ok(false),
        _ => Err(fill(&m.cannot_parse_boolean, &[("value", &text)])),
    }
}

fn parse_str(_: &Messages, text: &str) -> Result<String, String> {
    Ok(text.to_string())
}

/// Decimal, or hex with `0x`, or octal with `0o` or a leading `0`.
fn int_from_text(text: &str) -> Result<i64, std::num::ParseIntError> {
    if let Some(hex) = text.strip_prefix("0x").filter(|it| !it.is_empty()) {
        i64::from_str_radix(hex, 16)
    } else if let Some(oct) = text.strip_prefix("0o").filter(|it| !it.is_empty()) {
        i64::from_str_radix(oct, 8)
    } else if text.len() > 1 && text.starts_with('0') {
        i64::from_str_radix(&text[1..], 8)
    } else {
        text.parse()
    }
}

fn parse_i64(m: &Messages, text: &str) -> Result<i64, String> {
    int_from_text(text)
        .map_err(|err| fill(&m.cannot_parse_integer, &[("value", &text), ("error", &err)]))
}

fn parse_i32(m: &Messages, text: &str) -> Result<i32, String> {
    let wide = parse_i64(m, text)?;
    i32::try_from(wide)
        .map_err(|err| fill(&m.cannot_parse_integer, &[("value", &text), ("error", &err)]))
}

fn parse_f64(m: &Messages, text: &str) -> Result<f64, String> {
    text.parse().map_err(|_| fill(&m.cannot_parse_float, &[("value", &text)]))
}

fn parse_duration(m: &Messages, text: &str) -> Result<Duration, String> {
    text.parse::<Duration>()
        .map_err(|err| fill(&m.cannot_parse_duration, &[("value", &text), ("error", &err)]))
}

/// How an argument reaches its field.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Binding {
    pub(crate) field: String,
    pub(crate) kind: Kind,
    pub(crate) storage: Storage,
    pub(crate) choices: Option<Choices>,
}

impl Binding {
    pub(crate) fn resolve(dest: &mut dyn Values, field: &str) -> Option<Binding> {
        let slot = dest.field(field)?;
        Some(Binding {
            field: field.to_string(),
            kind: slot.kind(),
            storage: slot.storage(),
            choices: None,
        })
    }

    pub(crate) fn is_flag(&self) -> bool {
        self.kind == Kind::Bool && self.storage == Storage::Scalar
    }

    /// Values a switch takes when its arity is not given.
    pub(crate) fn default_arity(&self) -> usize {
        if self.is_flag() {
            0
        } else {
            1
        }
    }

    /// Whether a short switch of this kind may carry its value glued on,
    /// as in `-j4`.
    pub(crate) fn takes_adjoined(&self) -> bool {
        matches!(self.kind, Kind::Int | Kind::Int64 | Kind::Float)
    }

    /// Fails with the kind the choices should have had.
    pub(crate) fn set_choices(&mut self, choices: Choices) -> Result<(), Kind> {
        if choices.kind() != self.kind {
            return Err(self.kind);
        }
        self.choices = Some(choices);
        Ok(())
    }

    /// Converts `text`, checks it against the choices, and stores it.
    pub(crate) fn parse(
        &self,
        m: &Messages,
        dest: &mut dyn Values,
        text: &str,
    ) -> Result<(), ParseError> {
        match self.kind {
            Kind::Bool => self.store::<bool>(m, dest, text),
            Kind::Str => self.store::<String>(m, dest, text),
            Kind::Int => self.store::<i32>(m, dest, text),
            Kind::Int64 => self.store::<i64>(m, dest, text),
            Kind::Float => self.store::<f64>(m, dest, text),
            Kind::Duration => self.store::<Duration>(m, dest, text),
        }
    }

    fn store<T: Item>(
        &self,
        m: &Messages,
        dest: &mut dyn Values,
        text: &str,
    ) -> Result<(), ParseError> {
        let value =
            T::from_text(m, text).map_err(|msg| ParseError::new(ParseErrorKind::InvalidValue, msg))?;
        if let Some(choices) = self.choices.as_ref().and_then(T::choices) {
            if !choices.contains(&value) {
                let msg = fill(
                    &m.should_be_a_valid_choice,
                    &[("value", &text), ("choices", &join(choices))],
                );
                return Err(ParseError::new(ParseErrorKind::InvalidChoice, msg));
            }
        }
        match dest.field(&self.field).and_then(T::slot) {
            Some(Slot::One(it)) => *it = value,
            Some(Slot::Many(it)) => it.push(value),
            None => return Err(self.vanished()),
        }
        Ok(())
    }

    /// The argument appeared with no value after it; only a scalar bool
    /// accepts that, and becomes `true`.
    pub(crate) fn seen_without_value(
        &self,
        m: &Messages,
        dest: &mut dyn Values,
    ) -> Result<(), ParseError> {
        if !self.is_flag() {
            let msg = fill(&m.needs_a_value, &[("kind", &self.kind)]);
            return Err(ParseError::new(ParseErrorKind::MissingValue, msg));
        }
        match dest.field(&self.field) {
            Some(FieldMut::Bool(it)) => {
                *it = true;
                Ok(())
            }
            _ => Err(self.vanished()),
        }
    }

    pub(crate) fn snapshot(&self, dest: &mut dyn Values) -> Option<Snapshot> {
        dest.field(&self.field).map(|it| it.snapshot())
    }

    pub(crate) fn restore(&self, dest: &mut dyn Values, snapshot: Snapshot) -> bool {
        dest.field(&self.field).map_or(false, |it| it.restore(snapshot))
    }

    fn vanished(&self) -> ParseError {
        let msg = format!("destination field `{}` is no longer available", self.field);
        ParseError::new(ParseErrorKind::InvalidValue, msg)
    }
}
