use argbind::{Argument, ArgumentParser, Arity, Command, Duration, ParseErrorKind, Values};
use expect_test::expect;

use crate::{check, parse};

#[derive(Debug, Default, Values)]
struct Opts {
    bool1: bool,
    bool2: bool,
    int1: i32,
    int64: i64,
    string1: String,
    float1: f64,
    timeout: Duration,
    strings: Vec<String>,
}

fn parser() -> ArgumentParser {
    let mut ap = ArgumentParser::new(Command::new("prog", Opts::default()));
    for switch in ["--bool1", "--bool2", "--int1", "--int64", "--string1", "--float1", "--timeout"] {
        ap.add(Argument::switch([switch])).unwrap();
    }
    ap
}

#[test]
fn smoke() {
    check::<Opts>(
        parser(),
        "--bool1 --int1 0x10 --int64 -9000000000 --string1 hello --float1 1.5 --timeout 1m30s",
        expect![[r#"
            Opts {
                bool1: true,
                bool2: false,
                int1: 16,
                int64: -9000000000,
                string1: "hello",
                float1: 1.5,
                timeout: Duration(
                    90000000000,
                ),
                strings: [],
            }
        "#]],
    );
}

#[test]
fn attached_value_is_the_same_as_the_next_token() {
    let joined: Opts = parse(parser(), &["--string1=foo", "--int1=010"]).unwrap();
    let split: Opts = parse(parser(), &["--string1", "foo", "--int1", "010"]).unwrap();
    assert_eq!(joined.string1, "foo");
    assert_eq!(joined.int1, 8);
    assert_eq!((split.string1, split.int1), (joined.string1, joined.int1));

    let opts: Opts = parse(parser(), &["--string1=a=b"]).unwrap();
    assert_eq!(opts.string1, "a=b");
    let opts: Opts = parse(parser(), &["--string1="]).unwrap();
    assert_eq!(opts.string1, "");
}

#[test]
fn scalars_are_overwritten() {
    let opts: Opts = parse(parser(), &["--int1", "1", "--int1", "2"]).unwrap();
    assert_eq!(opts.int1, 2);
}

#[test]
fn value_may_look_like_a_switch() {
    let opts: Opts = parse(parser(), &["--string1", "--bool1"]).unwrap();
    assert_eq!(opts.string1, "--bool1");
    assert!(!opts.bool1);
}

#[test]
fn errors() {
    check::<Opts>(
        parser(),
        "--int1 x",
        expect![[
            r#"While parsing value for --int1: Cannot convert "x" to an integer: invalid digit found in string"#
        ]],
    );
    check::<Opts>(
        parser(),
        "--float1 abc",
        expect![[r#"While parsing value for --float1: Cannot convert "abc" to a float"#]],
    );
    check::<Opts>(
        parser(),
        "--timeout 5",
        expect![[
            r#"While parsing value for --timeout: Cannot parse "5" as a time duration: missing unit in duration "5""#
        ]],
    );
    check::<Opts>(parser(), "--bool3", expect![[r#"No such switch: --bool3"#]]);
    check::<Opts>(parser(), "--int1", expect![[r#"Expected a value after --int1"#]]);
    check::<Opts>(
        parser(),
        "--bool1=true",
        expect![[r#"Switch --bool1 does not take a value"#]],
    );
    check::<Opts>(parser(), "stray", expect![[r#"Unexpected argument: stray"#]]);
}

#[test]
fn error_kinds() {
    let mut ap = parser();
    let res = ap.parse_argv(["--int1", "x"]);
    assert_eq!(res.error.as_ref().map(|it| it.kind()), Some(ParseErrorKind::InvalidValue));

    let res = ap.parse_argv(["--nope"]);
    assert_eq!(res.error.as_ref().map(|it| it.kind()), Some(ParseErrorKind::UnknownSwitch));
}

#[test]
fn boolean_with_explicit_value() {
    let mut ap = ArgumentParser::new(Command::new("prog", Opts::default()));
    ap.add(Argument::switch(["--bool1"]).arity(Arity::Exactly(1))).unwrap();

    let opts: Opts = parse(ap, &["--bool1", "true"]).unwrap();
    assert!(opts.bool1);

    let mut ap = ArgumentParser::new(Command::new("prog", Opts { bool1: true, ..Opts::default() }));
    ap.add(Argument::switch(["--bool1"]).arity(Arity::Exactly(1))).unwrap();
    let opts: Opts = parse(ap, &["--bool1=False"]).unwrap();
    assert!(!opts.bool1);

    let mut ap = ArgumentParser::new(Command::new("prog", Opts::default()));
    ap.add(Argument::switch(["--bool1"]).arity(Arity::Exactly(1))).unwrap();
    check::<Opts>(
        ap,
        "--bool1 maybe",
        expect![[r#"While parsing value for --bool1: Cannot convert "maybe" to a boolean"#]],
    );
}

#[test]
fn switch_with_several_values() {
    fn parser() -> ArgumentParser {
        let mut ap = ArgumentParser::new(Command::new("prog", Opts::default()));
        ap.add(Argument::switch(["--strings"]).arity(Arity::Exactly(2))).unwrap();
        ap.add(Argument::switch(["--bool1"])).unwrap();
        ap
    }

    let opts: Opts = parse(parser(), &["--strings", "22", "33", "--bool1"]).unwrap();
    assert_eq!(opts.strings, ["22", "33"]);
    assert!(opts.bool1);

    let opts: Opts = parse(parser(), &["--strings=22", "33"]).unwrap();
    assert_eq!(opts.strings, ["22", "33"]);

    let opts: Opts = parse(parser(), &["--strings", "a", "b", "--strings", "c", "d"]).unwrap();
    assert_eq!(opts.strings, ["a", "b", "c", "d"]);

    check::<Opts>(parser(), "--strings a", expect![[r#"Expected a value after --strings"#]]);
}

#[test]
fn destination_fields_survive_between_parses() {
    let mut ap = parser();
    assert!(ap.parse_argv(["--bool1", "--int1", "3"]).error.is_none());
    let res = ap.parse_argv(["--string1", "x"]);
    assert!(res.error.is_none());
    assert!(!res.triggered.seen("bool1"));
    assert!(res.triggered.seen("string1"));

    let opts = res.triggered.values::<Opts>().unwrap();
    assert!(opts.bool1);
    assert_eq!(opts.int1, 3);
    assert_eq!(opts.string1, "x");
}

#[test]
fn custom_messages() {
    let messages: argbind::Messages =
        serde_json::from_str(r#"{ "no_such_switch": "Option inconnue : {switch}" }"#).unwrap();
    let ap = parser().with_messages(messages);
    check::<Opts>(ap, "--bogus", expect![[r#"Option inconnue : --bogus"#]]);
}
