use std::fmt::Write;

use crate::ast;

macro_rules! w {
    ($($tt:tt)*) => {
        drop(write!($($tt)*))
    };
}

const SOME: &str = "::core::option::Option::Some";
const NONE: &str = "::core::option::Option::None";

pub(crate) fn emit(values: &ast::Values) -> String {
    let mut buf = String::new();

    w!(buf, "#[automatically_derived]\n");
    w!(buf, "impl ::argbind::Values for {} {{\n", values.name);
    w!(
        buf,
        "    fn field(&mut self, id: &str) -> ::core::option::Option<::argbind::FieldMut<'_>> {{\n"
    );
    w!(buf, "        match id {{\n");
    for field in values.fields.iter().filter(|it| !it.flatten) {
        w!(
            buf,
            "            {:?} => {SOME}(::argbind::FieldMut::from(&mut self.{})),\n",
            field.key,
            field.ident
        );
    }
    w!(buf, "            _ => {{\n");
    for field in values.fields.iter().filter(|it| it.flatten) {
        w!(
            buf,
            "                if let {SOME}(it) = ::argbind::Values::field(&mut self.{}, id) {{\n",
            field.ident
        );
        w!(buf, "                    return {SOME}(it);\n");
        w!(buf, "                }}\n");
    }
    w!(buf, "                {NONE}\n");
    w!(buf, "            }}\n");
    w!(buf, "        }}\n");
    w!(buf, "    }}\n");
    w!(buf, "}}\n");

    buf
}
