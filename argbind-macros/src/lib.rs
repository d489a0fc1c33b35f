mod ast;
mod emit;
mod parse;

/// Implements `argbind::Values` for a struct with named fields.
///
/// Field attributes: `#[argbind(skip)]`, `#[argbind(rename = "id")]` and
/// `#[argbind(flatten)]`, which forwards unknown identifiers to the field.
#[cfg(not(test))]
#[proc_macro_derive(Values, attributes(argbind))]
pub fn derive_values(ts: proc_macro::TokenStream) -> proc_macro::TokenStream {
    let text = match parse::parse(ts) {
        Ok(values) => emit::emit(&values),
        Err(err) => format!("::core::compile_error!({:?});", err.msg),
    };
    text.parse().unwrap()
}

#[cfg(test)]
pub fn compile(src: &str) -> String {
    use proc_macro2::TokenStream;

    let ts = src.parse::<TokenStream>().unwrap();
    match parse::parse(ts) {
        Ok(values) => emit::emit(&values),
        Err(err) => format!("error: {}", err.msg),
    }
}
