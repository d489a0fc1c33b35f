#[derive(Debug)]
pub(crate) struct Values {
    pub(crate) name: String,
    pub(crate) fields: Vec<Field>,
}

#[derive(Debug)]
pub(crate) struct Field {
    pub(crate) ident: String,
    /// The identifier `Values::field` answers to.
    pub(crate) key: String,
    pub(crate) flatten: bool,
}

#[derive(Debug, Default)]
pub(crate) struct FieldOpts {
    pub(crate) skip: bool,
    pub(crate) flatten: bool,
    pub(crate) rename: Option<String>,
}
