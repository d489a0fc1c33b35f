use anyhow::Context;
use argbind::{Argument, ArgumentParser, Command, Messages, Values};

#[derive(Debug, Default, Values)]
struct RootOptions {
    debug: bool,
    verbose: bool,
}

#[derive(Debug, Default, Values)]
struct ThingOptions {
    #[argbind(flatten)]
    root: RootOptions,
    name: String,
    reason: String,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let mut ap = match build() {
        Ok(it) => it,
        Err(err) => {
            eprintln!("{err}");
            std::process::exit(2)
        }
    };

    let messages = ap.messages.clone();
    let help_switches = ap.help_switches.join(", ");
    let res = ap.parse_env();
    if res.help_requested {
        print_usage(&messages, &help_switches, res.triggered, &res.ancestors);
        return;
    }
    if let Some(err) = &res.error {
        eprintln!("{err}");
        std::process::exit(1)
    }
    match res.run() {
        Some(Ok(())) => (),
        Some(Err(err)) => {
            eprintln!("error: {err:#}");
            std::process::exit(1)
        }
        None => print_usage(&messages, &help_switches, res.triggered, &res.ancestors),
    }
}

fn build() -> argbind::Result<ArgumentParser> {
    let root = Command::new("twolevels", RootOptions::default())
        .description("This is an example program");
    let mut ap = ArgumentParser::new(root);
    ap.add(Argument::switch(["--debug"]).inherit().help("Set debug mode"))?;
    ap.add(Argument::switch(["-v", "--verbose"]).inherit().help("Set verbose mode"))?;

    for (name, verb) in [("open", "opening"), ("close", "closing")] {
        let cmd = Command::new(name, ThingOptions::default())
            .description(format!("{} something", capitalize(name)))
            .callback(move |cmd| report(name, cmd));
        let cmd = ap.add_child(cmd)?;
        cmd.add(Argument::switch(["-r", "--reason"]).help(format!("Why you are {verb} this")))?;
        cmd.add(Argument::positional("name").help(format!("The thing you are {verb}")))?;
    }
    Ok(ap)
}

fn report(name: &str, cmd: &Command) -> anyhow::Result<()> {
    let opts = cmd.values::<ThingOptions>().context("unexpected values type")?;
    println!("({name}) Verbose is {}", opts.root.verbose);
    println!("({name}) Debug is {}", opts.root.debug);
    println!("({name}) Reason is {}", opts.reason);
    println!("({name}) Name is {}", opts.name);
    Ok(())
}

fn print_usage(m: &Messages, help_switches: &str, cmd: &Command, ancestors: &[&Command]) {
    let mut path: Vec<&str> = ancestors.iter().map(|it| it.get_name()).collect();
    path.push(cmd.get_name());
    println!("usage: {}", path.join(" "));
    if !cmd.get_description().is_empty() {
        println!("\n{}", cmd.get_description());
    }
    println!("\n{}:", m.options);
    println!("  {:<20} {}", help_switches, m.help_description);
    for arg in cmd.switch_arguments().chain(cmd.positional_arguments()) {
        println!("  {:<20} {}", arg.pretty_name(), arg.get_help());
    }
    if !cmd.children().is_empty() {
        println!("\n{}:", m.sub_commands);
        for child in cmd.children() {
            println!("  {:<20} {}", child.get_name(), child.get_description());
        }
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
