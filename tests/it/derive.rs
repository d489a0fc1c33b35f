use std::collections::HashMap;

use argbind::{Argument, ArgumentParser, Arity, BuildError, Command, Values};
use expect_test::expect;

use crate::check;

#[derive(Debug, Default, Values)]
struct Common {
    verbose: bool,
    #[argbind(rename = "log_level")]
    level: i32,
}

#[derive(Debug, Default, Values)]
struct Opts {
    #[argbind(flatten)]
    common: Common,
    r#type: String,
    #[argbind(rename = "files")]
    inputs: Vec<String>,
    #[argbind(skip)]
    cache: HashMap<String, usize>,
}

fn parser() -> ArgumentParser {
    let mut ap = ArgumentParser::new(Command::new("prog", Opts::default()));
    ap.add(Argument::switch(["-v", "--verbose"])).unwrap();
    ap.add(Argument::switch(["--log-level"])).unwrap();
    ap.add(Argument::switch(["-t", "--type"])).unwrap();
    ap.add(Argument::positional("files").arity(Arity::ZeroOrMore)).unwrap();
    ap
}

#[test]
fn fields_are_found_by_key() {
    check::<Opts>(
        parser(),
        "-v --log-level 3 --type fast a b",
        expect![[r#"
            Opts {
                common: Common {
                    verbose: true,
                    level: 3,
                },
                type: "fast",
                inputs: [
                    "a",
                    "b",
                ],
                cache: {},
            }
        "#]],
    );
}

#[test]
fn skipped_and_renamed_fields_are_hidden() {
    let mut ap = ArgumentParser::new(Command::new("prog", Opts::default()));
    assert!(matches!(
        ap.add(Argument::switch(["--cache"])),
        Err(BuildError::NoDestination { .. })
    ));
    assert!(matches!(
        ap.add(Argument::switch(["--level"]).dest("level")),
        Err(BuildError::UnknownField { .. })
    ));
    assert!(matches!(
        ap.add(Argument::positional("inputs")),
        Err(BuildError::NoDestination { .. })
    ));
}

#[test]
fn flattened_struct_stands_alone() {
    let mut ap = ArgumentParser::new(Command::new("prog", Common::default()));
    ap.add(Argument::switch(["--log-level"])).unwrap();
    check::<Common>(
        ap,
        "--log-level=-2",
        expect![[r#"
            Common {
                verbose: false,
                level: -2,
            }
        "#]],
    );
}

#[test]
fn field_lookup() {
    let mut opts = Opts::default();
    assert!(opts.field("verbose").is_some());
    assert!(opts.field("log_level").is_some());
    assert!(opts.field("type").is_some());
    assert!(opts.field("r#type").is_none());
    assert!(opts.field("inputs").is_none());
    assert!(opts.field("cache").is_none());
}
