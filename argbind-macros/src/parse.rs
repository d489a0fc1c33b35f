use std::mem;

#[cfg(not(test))]
use proc_macro::{Delimiter, Spacing, TokenStream, TokenTree};
#[cfg(test)]
use proc_macro2::{Delimiter, Spacing, TokenStream, TokenTree};

use crate::ast;

type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug)]
pub(crate) struct Error {
    pub(crate) msg: String,
}

pub(crate) fn parse(ts: TokenStream) -> Result<ast::Values> {
    let mut p = Parser::new(ts);
    values(&mut p)
}

macro_rules! format_err {
    ($($tt:tt)*) => {
        Error { msg: format!($($tt)*) }
    };
}

macro_rules! bail {
    ($($tt:tt)*) => {
        return Err(format_err!($($tt)*))
    };
}

fn values(p: &mut Parser) -> Result<ast::Values> {
    while p.at_punct('#') {
        if attr(p, &mut ast::FieldOpts::default())? {
            bail!("`#[argbind(...)]` goes on fields, not on the struct")
        }
    }
    visibility(p);
    if p.at_keyword("enum") || p.at_keyword("union") {
        bail!("`Values` can only be derived for structs")
    }
    p.expect_keyword("struct")?;
    let name = p.expect_ident()?;
    if p.at_punct('<') {
        bail!("`Values` cannot be derived for generic struct `{}`", name)
    }
    if p.at_delim(Delimiter::Parenthesis) {
        bail!("`Values` needs named fields, `{}` is a tuple struct", name)
    }

    let mut fields: Vec<ast::Field> = Vec::new();
    if !p.eat_punct(';') {
        p.enter_delim(Delimiter::Brace)?;
        while !p.end() {
            if let Some(field) = field(p)? {
                if fields.iter().any(|it| it.key == field.key) {
                    bail!("two fields answer to `{}`", field.key)
                }
                fields.push(field);
            }
        }
        p.exit_delim()?;
    }
    Ok(ast::Values { name, fields })
}

fn field(p: &mut Parser) -> Result<Option<ast::Field>> {
    let mut opts = ast::FieldOpts::default();
    while p.at_punct('#') {
        attr(p, &mut opts)?;
    }
    visibility(p);
    let ident = p.expect_ident()?;
    p.expect_punct(':')?;
    skip_ty(p);

    if opts.skip {
        return Ok(None);
    }
    if opts.flatten && opts.rename.is_some() {
        bail!("`{}`: `flatten` and `rename` don't mix", ident)
    }
    let key = match opts.rename {
        Some(it) => it,
        None => ident.trim_start_matches("r#").to_string(),
    };
    Ok(Some(ast::Field { ident, key, flatten: opts.flatten }))
}

/// Parses one `#[...]`. Returns `true` if it was ours.
fn attr(p: &mut Parser, opts: &mut ast::FieldOpts) -> Result<bool> {
    p.expect_punct('#')?;
    p.enter_delim(Delimiter::Bracket)?;
    if !p.eat_keyword("argbind") {
        p.skip_rest();
        p.exit_delim()?;
        return Ok(false);
    }
    p.enter_delim(Delimiter::Parenthesis)?;
    while !p.end() {
        let key = p.expect_ident()?;
        match key.as_str() {
            "skip" => opts.skip = true,
            "flatten" => opts.flatten = true,
            "rename" => {
                p.expect_punct('=')?;
                opts.rename = Some(p.expect_string()?);
            }
            _ => bail!("unknown argbind option `{}`", key),
        }
        if !p.eat_punct(',') {
            break;
        }
    }
    p.exit_delim()?;
    p.exit_delim()?;
    Ok(true)
}

fn visibility(p: &mut Parser) {
    if p.eat_keyword("pub") && p.at_delim(Delimiter::Parenthesis) {
        p.ts.pop();
    }
}

/// Skips a field type up to and including the next top-level `,`.
fn skip_ty(p: &mut Parser) {
    let mut depth = 0usize;
    let mut arrow = false;
    while let Some(tt) = p.ts.pop() {
        if let TokenTree::Punct(punct) = &tt {
            match punct.as_char() {
                ',' if depth == 0 => break,
                '<' => depth += 1,
                '>' if !arrow => depth = depth.saturating_sub(1),
                _ => (),
            }
            arrow = punct.as_char() == '-' && punct.spacing() == Spacing::Joint;
        } else {
            arrow = false;
        }
    }
}

struct Parser {
    stack: Vec<Vec<TokenTree>>,
    ts: Vec<TokenTree>,
}

impl Parser {
    fn new(ts: TokenStream) -> Self {
        let mut ts = ts.into_iter().collect::<Vec<_>>();
        ts.reverse();
        Self { stack: Vec::new(), ts }
    }

    fn at_delim(&mut self, delimiter: Delimiter) -> bool {
        match self.ts.last() {
            Some(TokenTree::Group(g)) => g.delimiter() == delimiter,
            _ => false,
        }
    }
    fn enter_delim(&mut self, delimiter: Delimiter) -> Result<()> {
        match self.ts.pop() {
            Some(TokenTree::Group(g)) if g.delimiter() == delimiter => {
                let mut ts = g.stream().into_iter().collect::<Vec<_>>();
                ts.reverse();
                let ts = mem::replace(&mut self.ts, ts);
                self.stack.push(ts);
            }
            _ => bail!("expected `{}`", open(delimiter)),
        }
        Ok(())
    }
    fn exit_delim(&mut self) -> Result<()> {
        if !self.end() {
            bail!("unexpected `{}`", self.ts.last().map(|it| it.to_string()).unwrap_or_default())
        }
        match self.stack.pop() {
            Some(ts) => self.ts = ts,
            None => bail!("unbalanced delimiters"),
        }
        Ok(())
    }
    fn skip_rest(&mut self) {
        self.ts.clear();
    }
    fn end(&mut self) -> bool {
        self.ts.last().is_none()
    }

    fn expect_keyword(&mut self, kw: &str) -> Result<()> {
        if !self.eat_keyword(kw) {
            bail!("expected `{}`", kw)
        }
        Ok(())
    }
    fn eat_keyword(&mut self, kw: &str) -> bool {
        if self.at_keyword(kw) {
            self.ts.pop();
            true
        } else {
            false
        }
    }
    fn at_keyword(&mut self, kw: &str) -> bool {
        match self.ts.last() {
            Some(TokenTree::Ident(ident)) => ident.to_string() == kw,
            _ => false,
        }
    }

    fn expect_ident(&mut self) -> Result<String> {
        match self.ts.pop() {
            Some(TokenTree::Ident(ident)) => Ok(ident.to_string()),
            Some(tt) => bail!("expected an identifier, got `{}`", tt),
            None => bail!("expected an identifier"),
        }
    }

    fn expect_punct(&mut self, punct: char) -> Result<()> {
        if !self.eat_punct(punct) {
            bail!("expected `{}`", punct)
        }
        Ok(())
    }
    fn eat_punct(&mut self, punct: char) -> bool {
        if self.at_punct(punct) {
            self.ts.pop();
            true
        } else {
            false
        }
    }
    fn at_punct(&mut self, punct: char) -> bool {
        match self.ts.last() {
            Some(TokenTree::Punct(p)) => p.as_char() == punct,
            _ => false,
        }
    }

    fn expect_string(&mut self) -> Result<String> {
        match self.ts.pop() {
            Some(TokenTree::Literal(lit)) => {
                let text = lit.to_string();
                match text.strip_prefix('"').and_then(|it| it.strip_suffix('"')) {
                    Some(it) if it.contains('\\') => {
                        bail!("`rename` does not support escape sequences: {}", text)
                    }
                    Some(it) => Ok(it.to_string()),
                    None => bail!("expected a string, got `{}`", text),
                }
            }
            _ => bail!("expected a string"),
        }
    }
}

fn open(delimiter: Delimiter) -> &'static str {
    match delimiter {
        Delimiter::Parenthesis => "(",
        Delimiter::Brace => "{",
        Delimiter::Bracket => "[",
        Delimiter::None => "group",
    }
}
