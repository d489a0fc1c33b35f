use argbind::{Argument, ArgumentParser, Arity, Command, Duration, ParseErrorKind, Values};
use expect_test::expect;

use crate::{check, parse};

#[derive(Debug, Default, Values)]
struct Opts {
    bool1: bool,
    strings: Vec<String>,

    pos_int: i32,
    pos_int1: i32,
    pos_int2: i32,
    pos_string: String,
    pos_float: f64,

    pos_bool_slice: Vec<bool>,
    pos_int_slice: Vec<i32>,
    pos_string_slice: Vec<String>,
    pos_duration_slice: Vec<Duration>,
}

fn parser(positionals: Vec<Argument>) -> ArgumentParser {
    let mut ap = ArgumentParser::new(Command::new("prog", Opts::default()));
    ap.add(Argument::switch(["--bool1"])).unwrap();
    for arg in positionals {
        ap.add(arg).unwrap();
    }
    ap
}

fn glob(name: &str, arity: Arity) -> Argument {
    Argument::positional(name).arity(arity)
}

#[test]
fn single_values() {
    let err = parse::<Opts>(
        parser(vec![
            Argument::positional("PosInt"),
            Argument::positional("PosFloat"),
            Argument::positional("PosString"),
        ]),
        &["-12", "2.5", "hi"],
    )
    .unwrap_err();
    assert_eq!(err, "No such switch: -12");

    let opts: Opts = parse(
        parser(vec![
            Argument::positional("PosInt"),
            Argument::positional("PosFloat"),
            Argument::positional("PosString"),
        ]),
        &["12", "2.5", "hi"],
    )
    .unwrap();
    assert_eq!((opts.pos_int, opts.pos_float, opts.pos_string.as_str()), (12, 2.5, "hi"));
}

#[test]
fn fixed_count_list() {
    let ap = parser(vec![glob("PosDurationSlice", Arity::Exactly(2))]);
    check::<Opts>(
        ap,
        "1s --bool1 2ms",
        expect![[r#"
            Opts {
                bool1: true,
                strings: [],
                pos_int: 0,
                pos_int1: 0,
                pos_int2: 0,
                pos_string: "",
                pos_float: 0.0,
                pos_bool_slice: [],
                pos_int_slice: [],
                pos_string_slice: [],
                pos_duration_slice: [
                    Duration(
                        1000000000,
                    ),
                    Duration(
                        2000000,
                    ),
                ],
            }
        "#]],
    );

    let ap = parser(vec![glob("PosDurationSlice", Arity::Exactly(2))]);
    check::<Opts>(ap, "1s", expect![[r#"Expected a required 'PosDurationSlice' argument"#]]);
}

#[test]
fn one_or_more() {
    let ap = || parser(vec![glob("PosIntSlice", Arity::OneOrMore)]);

    check::<Opts>(ap(), "", expect![[r#"Expected a required 'PosIntSlice' argument"#]]);

    let opts: Opts = parse(ap(), &["1"]).unwrap();
    assert_eq!(opts.pos_int_slice, [1]);

    let opts: Opts = parse(ap(), &["1", "0x2", "3"]).unwrap();
    assert_eq!(opts.pos_int_slice, [1, 2, 3]);

    check::<Opts>(
        ap(),
        "1 two",
        expect![[
            r#"While parsing value for PosIntSlice: Cannot convert "two" to an integer: invalid digit found in string"#
        ]],
    );
}

#[test]
fn names_fill_in_order() {
    let ap = parser(vec![Argument::positional("names").dest("strings").arity(Arity::OneOrMore)]);
    let opts: Opts = parse(ap, &["foo", "bar", "baz"]).unwrap();
    assert_eq!(opts.strings, ["foo", "bar", "baz"]);
}

#[test]
fn zero_or_more() {
    let ap = || parser(vec![glob("PosStringSlice", Arity::ZeroOrMore)]);

    let mut p = ap();
    let res = p.parse_argv(Vec::<String>::new());
    assert!(res.error.is_none());
    assert!(!res.triggered.seen("pos_string_slice"));

    let opts: Opts = parse(ap(), &["a", "b"]).unwrap();
    assert_eq!(opts.pos_string_slice, ["a", "b"]);
}

#[test]
fn zero_or_one() {
    let ap = || parser(vec![glob("PosInt", Arity::ZeroOrOne)]);

    let mut p = ap();
    let res = p.parse_argv(Vec::<String>::new());
    assert!(res.error.is_none());
    assert!(!res.triggered.seen("pos_int"));
    assert_eq!(res.triggered.values::<Opts>().unwrap().pos_int, 0);

    let mut p = ap();
    let res = p.parse_argv(["22"]);
    assert!(res.error.is_none());
    assert!(res.triggered.seen("pos_int"));
    assert_eq!(res.triggered.values::<Opts>().unwrap().pos_int, 22);

    let mut p = ap();
    let res = p.parse_argv(["22", "33"]);
    let err = res.error.unwrap();
    assert_eq!(err.kind(), ParseErrorKind::UnexpectedArgument);
    assert_eq!(err.to_string(), "Unexpected argument: 33");
}

#[test]
fn optional_before_required() {
    let ap = || parser(vec![glob("PosInt", Arity::ZeroOrOne), Argument::positional("PosInt1")]);

    let opts: Opts = parse(ap(), &["22", "33"]).unwrap();
    assert_eq!((opts.pos_int, opts.pos_int1), (22, 33));

    // Greedy: the only value goes to the optional slot.
    let opts: Opts = parse(ap(), &["22"]).unwrap();
    assert_eq!((opts.pos_int, opts.pos_int1), (22, 0));

    check::<Opts>(ap(), "", expect![[r#"Expected a required 'PosInt1' argument"#]]);
}

#[test]
fn optional_chains() {
    let ap = parser(vec![
        glob("PosInt", Arity::ZeroOrOne),
        glob("PosInt1", Arity::ZeroOrOne),
        Argument::positional("PosInt2"),
    ]);
    let opts: Opts = parse(ap, &["22", "33", "44"]).unwrap();
    assert_eq!((opts.pos_int, opts.pos_int1, opts.pos_int2), (22, 33, 44));

    let ap = parser(vec![
        glob("PosInt", Arity::ZeroOrOne),
        glob("PosInt1", Arity::ZeroOrOne),
        glob("PosInt2", Arity::ZeroOrOne),
    ]);
    let opts: Opts = parse(ap, &["22", "33", "44"]).unwrap();
    assert_eq!((opts.pos_int, opts.pos_int1, opts.pos_int2), (22, 33, 44));

    let ap = parser(vec![glob("PosInt", Arity::ZeroOrOne), glob("PosInt1", Arity::ZeroOrOne)]);
    check::<Opts>(ap, "22 33 44", expect![[r#"Unexpected argument: 44"#]]);
}

#[test]
fn optional_then_list() {
    for arity in [Arity::ZeroOrMore, Arity::OneOrMore] {
        let ap = parser(vec![glob("PosInt", Arity::ZeroOrOne), glob("PosIntSlice", arity)]);
        let opts: Opts = parse(ap, &["22", "33", "44"]).unwrap();
        assert_eq!(opts.pos_int, 22);
        assert_eq!(opts.pos_int_slice, [33, 44]);
    }
}

#[test]
fn switches_around_positionals() {
    let ap = parser(vec![Argument::positional("PosString")]);
    let opts: Opts = parse(ap, &["x", "--bool1"]).unwrap();
    assert!(opts.bool1);
    assert_eq!(opts.pos_string, "x");

    // Once a list starts, it takes everything.
    let ap = parser(vec![glob("PosStringSlice", Arity::OneOrMore)]);
    let opts: Opts = parse(ap, &["x", "--bool1"]).unwrap();
    assert!(!opts.bool1);
    assert_eq!(opts.pos_string_slice, ["x", "--bool1"]);
}

#[test]
fn double_dash_and_lone_dash() {
    let ap = parser(vec![glob("PosStringSlice", Arity::ZeroOrMore)]);
    let opts: Opts = parse(ap, &["--bool1", "--", "--bool1", "-"]).unwrap();
    assert!(opts.bool1);
    assert_eq!(opts.pos_string_slice, ["--bool1", "-"]);

    let ap = parser(vec![Argument::positional("PosString")]);
    let opts: Opts = parse(ap, &["-"]).unwrap();
    assert_eq!(opts.pos_string, "-");
}

#[test]
fn switch_values_before_list() {
    let ap = || {
        let mut ap = parser(vec![glob("PosStringSlice", Arity::OneOrMore)]);
        ap.add(Argument::switch(["--strings"]).arity(Arity::Exactly(2))).unwrap();
        ap
    };

    let opts: Opts = parse(ap(), &["--strings", "22", "33", "44", "55"]).unwrap();
    assert_eq!(opts.strings, ["22", "33"]);
    assert_eq!(opts.pos_string_slice, ["44", "55"]);

    let opts: Opts = parse(ap(), &["--strings=22", "33", "44", "55"]).unwrap();
    assert_eq!(opts.strings, ["22", "33"]);
    assert_eq!(opts.pos_string_slice, ["44", "55"]);

    let opts: Opts =
        parse(ap(), &["--strings", "22", "33", "--strings", "44", "55", "x"]).unwrap();
    assert_eq!(opts.strings, ["22", "33", "44", "55"]);
    assert_eq!(opts.pos_string_slice, ["x"]);
}

#[test]
fn boolean_list() {
    let ap = parser(vec![glob("PosBoolSlice", Arity::ZeroOrOne)]);
    let opts: Opts = parse(ap, &["t"]).unwrap();
    assert_eq!(opts.pos_bool_slice, [true]);

    let ap = parser(vec![glob("PosBoolSlice", Arity::ZeroOrOne)]);
    check::<Opts>(ap, "t f", expect![[r#"Unexpected argument: f"#]]);
}
