use crate::{aggregate, scan, Argument, BuildError, Command, Messages, ParseError};

/// The entry point: a root [`Command`] plus the settings shared by the whole
/// tree.
#[derive(Debug)]
pub struct ArgumentParser {
    /// Used for every error message.
    pub messages: Messages,
    /// Spellings that stop parsing and request help at any level.
    pub help_switches: Vec<String>,
    root: Command,
}

/// What a parse produced. Holds the command tree borrowed, so the triggered
/// command's values can be read directly.
#[derive(Debug)]
pub struct ParseResult<'a> {
    /// The deepest command reached.
    pub triggered: &'a Command,
    /// The commands above `triggered`, root first.
    pub ancestors: Vec<&'a Command>,
    pub error: Option<ParseError>,
    /// A help switch was given. Parsing stopped there.
    pub help_requested: bool,
}

impl ArgumentParser {
    pub fn new(root: Command) -> ArgumentParser {
        ArgumentParser {
            messages: Messages::default(),
            help_switches: vec!["-h".to_string(), "--help".to_string()],
            root,
        }
    }

    pub fn with_messages(mut self, messages: Messages) -> ArgumentParser {
        self.messages = messages;
        self
    }

    pub fn root(&self) -> &Command {
        &self.root
    }

    pub fn root_mut(&mut self) -> &mut Command {
        &mut self.root
    }

    pub fn add(&mut self, arg: Argument) -> Result<(), BuildError> {
        self.root.add(arg)
    }

    pub fn add_child(&mut self, child: Command) -> Result<&mut Command, BuildError> {
        self.root.add_child(child)
    }

    /// Parses the process arguments, program name excluded.
    pub fn parse_env(&mut self) -> ParseResult<'_> {
        self.parse_argv(std::env::args().skip(1))
    }

    /// Parses `argv`, which must not include the program name.
    ///
    /// Destination fields keep whatever they held before: scalars given on
    /// the command line are overwritten, lists are appended to. What was
    /// seen is reset on every call.
    pub fn parse_argv<I>(&mut self, argv: I) -> ParseResult<'_>
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        let argv: Vec<String> = argv.into_iter().map(Into::into).collect();
        self.root.reset_seen();

        let events = scan::scan(&self.root, &self.help_switches, &self.messages, &argv);
        let outcome = aggregate::aggregate(&mut self.root, &self.messages, events);
        if outcome.error.is_none() && !outcome.help_requested {
            aggregate::propagate(&mut self.root, &outcome.path);
        }

        let mut triggered = &self.root;
        let mut ancestors = Vec::with_capacity(outcome.path.len());
        for &index in &outcome.path {
            ancestors.push(triggered);
            triggered = &triggered.children[index];
        }
        match &outcome.error {
            Some(err) => tracing::debug!(command = %triggered.name, %err, "parse failed"),
            None => tracing::debug!(
                command = %triggered.name,
                help = outcome.help_requested,
                "parsed"
            ),
        }
        ParseResult {
            triggered,
            ancestors,
            error: outcome.error,
            help_requested: outcome.help_requested,
        }
    }
}

impl ParseResult<'_> {
    /// Neither an error nor a help request.
    pub fn is_ok(&self) -> bool {
        self.error.is_none() && !self.help_requested
    }

    /// Runs the triggered command's callback after a successful parse.
    /// `None` if the parse failed, asked for help, or the command has no
    /// callback.
    pub fn run(&self) -> Option<anyhow::Result<()>> {
        if !self.is_ok() {
            return None;
        }
        self.triggered.call()
    }
}
