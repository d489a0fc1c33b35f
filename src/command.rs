use std::{any::Any, collections::HashSet, fmt};

use crate::{value::Binding, Argument, Arity, BuildError, Values};

/// Invoked by [`ParseResult::run`](crate::ParseResult::run) with the
/// triggered command.
pub type Callback = Box<dyn Fn(&Command) -> anyhow::Result<()>>;

pub(crate) trait Destination: Values {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
    fn as_values(&mut self) -> &mut dyn Values;
}

impl<T: Values + 'static> Destination for T {
    fn as_any(&self) -> &dyn Any {
        self
    }
    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
    fn as_values(&mut self) -> &mut dyn Values {
        self
    }
}

/// A registered argument with its resolved field.
pub(crate) struct Bound {
    pub(crate) arg: Argument,
    pub(crate) binding: Binding,
    pub(crate) arity: Arity,
}

impl Bound {
    /// Values a switch consumes. Switch arities are always exact.
    pub(crate) fn switch_arity(&self) -> usize {
        self.arity.required()
    }
}

/// A node of the command tree: its arguments, its sub-commands and the
/// destination object their values land in.
pub struct Command {
    pub(crate) name: String,
    description: String,
    epilog: String,
    pub(crate) values: Box<dyn Destination>,
    callback: Option<Callback>,
    pub(crate) children: Vec<Command>,
    pub(crate) switches: Vec<Bound>,
    pub(crate) positionals: Vec<Bound>,
    pub(crate) num_required_positional: usize,
    /// `None` once an unbounded positional is registered.
    pub(crate) num_max_positional: Option<usize>,
    pub(crate) seen: HashSet<String>,
    pub(crate) command_seen: HashSet<String>,
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("name", &self.name)
            .field("switches", &self.switch_arguments().collect::<Vec<_>>())
            .field("positionals", &self.positional_arguments().collect::<Vec<_>>())
            .field("children", &self.children)
            .finish_non_exhaustive()
    }
}

impl Command {
    pub fn new(name: impl Into<String>, values: impl Values + 'static) -> Command {
        Command {
            name: name.into(),
            description: String::new(),
            epilog: String::new(),
            values: Box::new(values),
            callback: None,
            children: Vec::new(),
            switches: Vec::new(),
            positionals: Vec::new(),
            num_required_positional: 0,
            num_max_positional: Some(0),
            seen: HashSet::new(),
            command_seen: HashSet::new(),
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Command {
        self.description = description.into();
        self
    }

    pub fn epilog(mut self, epilog: impl Into<String>) -> Command {
        self.epilog = epilog.into();
        self
    }

    pub fn callback(mut self, f: impl Fn(&Command) -> anyhow::Result<()> + 'static) -> Command {
        self.callback = Some(Box::new(f));
        self
    }

    /// Registers an argument, resolving its destination field against this
    /// command's values.
    pub fn add(&mut self, arg: Argument) -> Result<(), BuildError> {
        arg.check_spelling()?;
        if arg.inherits() {
            if arg.is_positional() {
                return Err(BuildError::InheritPositional { arg: arg.pretty_name() });
            }
            if !self.children.is_empty() {
                return Err(BuildError::InheritAfterChildren {
                    arg: arg.pretty_name(),
                    command: self.name.clone(),
                });
            }
        }
        self.insert(arg)
    }

    /// Adds an argument copied from an ancestor here and in every existing
    /// descendant.
    fn inherit_into(&mut self, arg: &Argument) -> Result<(), BuildError> {
        self.insert(arg.clone())?;
        for child in &mut self.children {
            child.inherit_into(arg)?;
        }
        Ok(())
    }

    fn insert(&mut self, mut arg: Argument) -> Result<(), BuildError> {
        if let Some(name) = arg.get_name() {
            if self.positional_arguments().any(|it| it.get_name() == Some(name)) {
                return Err(BuildError::DuplicatePositional {
                    name: name.to_string(),
                    command: self.name.clone(),
                });
            }
            if let Some(previous) = self.positionals.last() {
                if previous.arity.is_unbounded() {
                    return Err(BuildError::PositionalAfterUnbounded {
                        arg: arg.pretty_name(),
                        previous: previous.arg.pretty_name(),
                    });
                }
            }
        }
        for spelling in arg.switches() {
            if self.switches.iter().any(|it| it.arg.spells(spelling)) {
                return Err(BuildError::DuplicateSwitch {
                    spelling: spelling.clone(),
                    command: self.name.clone(),
                });
            }
        }

        let binding = arg.bind(self.values.as_values())?;
        let arity = arg.settle_arity(&binding)?;
        tracing::trace!(
            command = %self.name,
            arg = %arg.pretty_name(),
            field = %binding.field,
            %arity,
            "registered argument"
        );
        let bound = Bound { arg, binding, arity };
        if bound.arg.is_positional() {
            self.num_required_positional += arity.required();
            self.num_max_positional = match (self.num_max_positional, arity.max()) {
                (Some(total), Some(max)) => Some(total + max),
                _ => None,
            };
            self.positionals.push(bound);
        } else {
            self.switches.push(bound);
        }
        Ok(())
    }

    /// Adds a sub-command and copies this command's `inherit` switches into
    /// it and into any sub-commands it already has. The copies bind to each
    /// command's own destination, which must have fields of the same names.
    pub fn add_child(&mut self, mut child: Command) -> Result<&mut Command, BuildError> {
        if child.name.is_empty() || child.name.starts_with('-') {
            return Err(BuildError::CommandName { name: child.name });
        }
        if self.children.iter().any(|it| it.name == child.name) {
            return Err(BuildError::DuplicateChild { name: child.name, command: self.name.clone() });
        }
        for bound in self.switches.iter().filter(|it| it.arg.inherits()) {
            child.inherit_into(&bound.arg)?;
        }
        tracing::debug!(command = %self.name, child = %child.name, "added sub-command");
        let index = self.children.len();
        self.children.push(child);
        Ok(&mut self.children[index])
    }

    pub fn get_name(&self) -> &str {
        &self.name
    }

    pub fn get_description(&self) -> &str {
        &self.description
    }

    pub fn get_epilog(&self) -> &str {
        &self.epilog
    }

    pub fn children(&self) -> &[Command] {
        &self.children
    }

    pub fn child(&self, name: &str) -> Option<&Command> {
        self.children.iter().find(|it| it.name == name)
    }

    pub fn child_mut(&mut self, name: &str) -> Option<&mut Command> {
        self.children.iter_mut().find(|it| it.name == name)
    }

    pub fn switch_arguments(&self) -> impl Iterator<Item = &Argument> + '_ {
        self.switches.iter().map(|it| &it.arg)
    }

    pub fn positional_arguments(&self) -> impl Iterator<Item = &Argument> + '_ {
        self.positionals.iter().map(|it| &it.arg)
    }

    pub fn num_required_positional(&self) -> usize {
        self.num_required_positional
    }

    /// `None` when a positional takes an unbounded number of values.
    pub fn num_max_positional(&self) -> Option<usize> {
        self.num_max_positional
    }

    /// Whether the last parse gave a value, or a bare switch, for the field
    /// `dest`. Inherited values count.
    pub fn seen(&self, dest: &str) -> bool {
        self.seen.contains(dest)
    }

    /// Whether the last parse descended into the sub-command `name`.
    pub fn command_seen(&self, name: &str) -> bool {
        self.command_seen.contains(name)
    }

    pub fn has_callback(&self) -> bool {
        self.callback.is_some()
    }

    pub fn values<T: 'static>(&self) -> Option<&T> {
        self.values.as_any().downcast_ref()
    }

    pub fn values_mut<T: 'static>(&mut self) -> Option<&mut T> {
        self.values.as_any_mut().downcast_mut()
    }

    pub(crate) fn call(&self) -> Option<anyhow::Result<()>> {
        self.callback.as_ref().map(|f| f(self))
    }

    pub(crate) fn reset_seen(&mut self) {
        self.seen.clear();
        self.command_seen.clear();
        for child in &mut self.children {
            child.reset_seen();
        }
    }
}
