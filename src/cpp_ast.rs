//! Defines the small subset of C++ declarations that silly-packer emits, so
//! generated headers can be composed out of pieces and stay readable.

use std::fmt::{self, Write};

trait FmtCpp {
    fn fmt_cpp(&self, output: &mut CppStream<'_>) -> fmt::Result;
}

macro_rules! proxy_display {
    ( $target: ty ) => {
        impl fmt::Display for $target {
            fn fmt(&self, output: &mut fmt::Formatter) -> fmt::Result {
                let mut stream = CppStream::new(output);
                FmtCpp::fmt_cpp(self, &mut stream)
            }
        }
    };
}

/// A whole header file: include guard, includes and an optional namespace
/// wrapping every item.
pub(crate) struct Header {
    pub guard: String,
    pub includes: Vec<String>,
    pub namespace: Option<String>,
    pub items: Vec<Item>,
}

impl FmtCpp for Header {
    fn fmt_cpp(&self, output: &mut CppStream<'_>) -> fmt::Result {
        writeln!(output, "#ifndef {}", self.guard)?;
        writeln!(output, "#define {}", self.guard)?;
        writeln!(output)?;

        for include in &self.includes {
            writeln!(output, "#include <{}>", include)?;
        }

        if let Some(namespace) = &self.namespace {
            writeln!(output)?;
            writeln!(output, "namespace {} {{", namespace)?;
        }

        for item in &self.items {
            writeln!(output)?;
            item.fmt_cpp(output)?;
            writeln!(output)?;
        }

        if let Some(namespace) = &self.namespace {
            writeln!(output)?;
            writeln!(output, "}} // namespace {}", namespace)?;
        }

        writeln!(output)?;
        writeln!(output, "#endif // {}", self.guard)
    }
}

proxy_display!(Header);

pub(crate) enum Item {
    Struct(Struct),
    Enum(Enum),
    Variable(Variable),
    Function(Function),
}

impl FmtCpp for Item {
    fn fmt_cpp(&self, output: &mut CppStream<'_>) -> fmt::Result {
        match self {
            Self::Struct(inner) => inner.fmt_cpp(output),
            Self::Enum(inner) => inner.fmt_cpp(output),
            Self::Variable(inner) => inner.fmt_cpp(output),
            Self::Function(inner) => inner.fmt_cpp(output),
        }
    }
}

proxy_display!(Item);

impl From<Struct> for Item {
    fn from(value: Struct) -> Self {
        Self::Struct(value)
    }
}

impl From<Enum> for Item {
    fn from(value: Enum) -> Self {
        Self::Enum(value)
    }
}

impl From<Variable> for Item {
    fn from(value: Variable) -> Self {
        Self::Variable(value)
    }
}

impl From<Function> for Item {
    fn from(value: Function) -> Self {
        Self::Function(value)
    }
}

/// A plain aggregate. Fields are `(type, name)` pairs.
pub(crate) struct Struct {
    pub name: String,
    pub fields: Vec<(String, String)>,
}

impl FmtCpp for Struct {
    fn fmt_cpp(&self, output: &mut CppStream<'_>) -> fmt::Result {
        writeln!(output, "struct {} {{", self.name)?;
        output.indent();

        for (ty, name) in &self.fields {
            writeln!(output, "{} {};", ty, name)?;
        }

        output.dedent();
        write!(output, "}};")
    }
}

/// An unscoped enum with explicit values.
pub(crate) struct Enum {
    pub name: String,
    pub variants: Vec<(String, u64)>,
}

impl FmtCpp for Enum {
    fn fmt_cpp(&self, output: &mut CppStream<'_>) -> fmt::Result {
        writeln!(output, "enum {} {{", self.name)?;
        output.indent();

        for (name, value) in &self.variants {
            writeln!(output, "{} = {},", name, value)?;
        }

        output.dedent();
        write!(output, "}};")
    }
}

/// An `inline constexpr` variable.
pub(crate) struct Variable {
    pub ty: String,
    pub name: String,
    pub value: Expr,
}

impl FmtCpp for Variable {
    fn fmt_cpp(&self, output: &mut CppStream<'_>) -> fmt::Result {
        write!(output, "inline constexpr {} {} = ", self.ty, self.name)?;
        self.value.fmt_cpp(output)?;
        write!(output, ";")
    }
}

/// An inline function. The body is written one statement per line; nested
/// blocks carry their own leading tabs.
pub(crate) struct Function {
    pub signature: String,
    pub body: Vec<String>,
}

impl FmtCpp for Function {
    fn fmt_cpp(&self, output: &mut CppStream<'_>) -> fmt::Result {
        writeln!(output, "inline {} {{", self.signature)?;
        output.indent();

        for line in &self.body {
            writeln!(output, "{}", line)?;
        }

        output.dedent();
        write!(output, "}}")
    }
}

pub(crate) enum Expr {
    Int(u64),

    /// A string literal. Quotes, backslashes and anything outside printable
    /// ASCII are escaped.
    Str(String),

    /// Code that is emitted untouched.
    Raw(String),

    /// `type{a, b, c}` on a single line.
    Construct(String, Vec<Expr>),

    /// `{.name = value, ...}` on a single line.
    Designated(Vec<(String, Expr)>),

    /// A braced initializer list with one entry per line.
    List(Vec<Expr>),

    /// A braced byte array, wrapped at a fixed number of bytes per line.
    Bytes(Vec<u8>),
}

const BYTES_PER_LINE: usize = 16;

impl FmtCpp for Expr {
    fn fmt_cpp(&self, output: &mut CppStream<'_>) -> fmt::Result {
        match self {
            Self::Int(value) => write!(output, "{}", value),
            Self::Str(value) => write_string_literal(output, value),
            Self::Raw(value) => write!(output, "{}", value),
            Self::Construct(ty, args) => {
                write!(output, "{}{{", ty)?;

                for (index, arg) in args.iter().enumerate() {
                    if index > 0 {
                        write!(output, ", ")?;
                    }
                    arg.fmt_cpp(output)?;
                }

                write!(output, "}}")
            }
            Self::Designated(fields) => {
                write!(output, "{{")?;

                for (index, (name, value)) in fields.iter().enumerate() {
                    if index > 0 {
                        write!(output, ", ")?;
                    }
                    write!(output, ".{} = ", name)?;
                    value.fmt_cpp(output)?;
                }

                write!(output, "}}")
            }
            Self::List(entries) => {
                if entries.is_empty() {
                    return write!(output, "{{}}");
                }

                writeln!(output, "{{")?;
                output.indent();

                for entry in entries {
                    entry.fmt_cpp(output)?;
                    writeln!(output, ",")?;
                }

                output.dedent();
                write!(output, "}}")
            }
            Self::Bytes(bytes) => {
                if bytes.is_empty() {
                    return write!(output, "{{}}");
                }

                writeln!(output, "{{")?;
                output.indent();

                for row in bytes.chunks(BYTES_PER_LINE) {
                    for (index, byte) in row.iter().enumerate() {
                        if index > 0 {
                            write!(output, " ")?;
                        }
                        write!(output, "{},", byte)?;
                    }
                    writeln!(output)?;
                }

                output.dedent();
                write!(output, "}}")
            }
        }
    }
}

proxy_display!(Expr);

impl From<u64> for Expr {
    fn from(value: u64) -> Self {
        Self::Int(value)
    }
}

impl From<u32> for Expr {
    fn from(value: u32) -> Self {
        Self::Int(value.into())
    }
}

fn write_string_literal(output: &mut CppStream<'_>, value: &str) -> fmt::Result {
    write!(output, "\"")?;

    for byte in value.bytes() {
        match byte {
            b'"' => write!(output, "\\\"")?,
            b'\\' => write!(output, "\\\\")?,
            b' '..=b'~' => output.write_char(byte as char)?,

            // Octal escapes never swallow the characters that follow, unlike
            // hex escapes.
            _ => write!(output, "\\{:03o}", byte)?,
        }
    }

    write!(output, "\"")
}

/// Tracks nesting depth and tabs out every line written at that depth.
/// Blank lines are left without trailing indentation.
struct CppStream<'a> {
    depth: usize,
    at_line_start: bool,
    inner: &'a mut (dyn fmt::Write + 'a),
}

impl fmt::Write for CppStream<'_> {
    fn write_str(&mut self, value: &str) -> fmt::Result {
        for (index, line) in value.split('\n').enumerate() {
            if index > 0 {
                self.inner.write_char('\n')?;
                self.at_line_start = true;
            }

            if line.is_empty() {
                continue;
            }

            if self.at_line_start {
                for _ in 0..self.depth {
                    self.inner.write_char('\t')?;
                }
                self.at_line_start = false;
            }

            self.inner.write_str(line)?;
        }

        Ok(())
    }
}

impl<'a> CppStream<'a> {
    fn new(inner: &'a mut (dyn fmt::Write + 'a)) -> Self {
        CppStream {
            depth: 0,
            at_line_start: true,
            inner,
        }
    }

    fn indent(&mut self) {
        self.depth += 1;
    }

    fn dedent(&mut self) {
        assert!(self.depth > 0, "unbalanced dedent");
        self.depth -= 1;
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn struct_fields_are_indented() {
        let item = Item::from(Struct {
            name: "sprite_info".to_owned(),
            fields: vec![
                ("unsigned int".to_owned(), "x".to_owned()),
                ("unsigned int".to_owned(), "y".to_owned()),
            ],
        });

        assert_eq!(
            item.to_string(),
            "struct sprite_info {\n\tunsigned int x;\n\tunsigned int y;\n};"
        );
    }

    #[test]
    fn enum_values_are_explicit() {
        let item = Item::from(Enum {
            name: "sprite_indices".to_owned(),
            variants: vec![("hero".to_owned(), 0), ("max_index".to_owned(), 0)],
        });

        assert_eq!(
            item.to_string(),
            "enum sprite_indices {\n\thero = 0,\n\tmax_index = 0,\n};"
        );
    }

    #[test]
    fn nested_lists_indent_each_level() {
        let item = Item::from(Variable {
            ty: "std::array<sprite_info, 2>".to_owned(),
            name: "sprites".to_owned(),
            value: Expr::List(vec![
                Expr::Construct("sprite_info".to_owned(), vec![0u32.into(), 1u32.into()]),
                Expr::Construct("sprite_info".to_owned(), vec![2u32.into(), 3u32.into()]),
            ]),
        });

        assert_eq!(
            item.to_string(),
            "inline constexpr std::array<sprite_info, 2> sprites = {\n\
             \tsprite_info{0, 1},\n\
             \tsprite_info{2, 3},\n\
             };"
        );
    }

    #[test]
    fn designated_initializer() {
        let value = Expr::Designated(vec![
            ("width".to_owned(), 256u32.into()),
            ("height".to_owned(), 128u32.into()),
        ]);

        assert_eq!(value.to_string(), "{.width = 256, .height = 128}");
    }

    #[test]
    fn bytes_wrap() {
        let value = Expr::Bytes((0..20).collect());

        assert_eq!(
            value.to_string(),
            "{\n\
             \t0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15,\n\
             \t16, 17, 18, 19,\n\
             }"
        );
    }

    #[test]
    fn empty_collections() {
        assert_eq!(Expr::Bytes(Vec::new()).to_string(), "{}");
        assert_eq!(Expr::List(Vec::new()).to_string(), "{}");
    }

    #[test]
    fn string_escapes() {
        assert_eq!(Expr::Str("hero.png".to_owned()).to_string(), "\"hero.png\"");
        assert_eq!(
            Expr::Str("a\"b\\c".to_owned()).to_string(),
            "\"a\\\"b\\\\c\""
        );
        assert_eq!(Expr::Str("é".to_owned()).to_string(), "\"\\303\\251\"");
    }

    #[test]
    fn function_body_is_indented() {
        let item = Item::from(Function {
            signature: "constexpr int answer()".to_owned(),
            body: vec![
                "if (true) {".to_owned(),
                "\treturn 42;".to_owned(),
                "}".to_owned(),
                "return 0;".to_owned(),
            ],
        });

        assert_eq!(
            item.to_string(),
            "inline constexpr int answer() {\n\tif (true) {\n\t\treturn 42;\n\t}\n\treturn 0;\n}"
        );
    }

    #[test]
    fn blank_lines_are_not_indented() {
        let item = Item::from(Function {
            signature: "void f()".to_owned(),
            body: vec!["a();".to_owned(), "".to_owned(), "b();".to_owned()],
        });

        assert_eq!(item.to_string(), "inline void f() {\n\ta();\n\n\tb();\n}");
    }

    #[test]
    fn header_layout() {
        let header = Header {
            guard: "SILLY_PACKER_GENERATED_TEST_H".to_owned(),
            includes: vec!["array".to_owned(), "cstdint".to_owned()],
            namespace: Some("game".to_owned()),
            items: vec![Variable {
                ty: "unsigned int".to_owned(),
                name: "count".to_owned(),
                value: Expr::Int(3),
            }
            .into()],
        };

        assert_eq!(
            header.to_string(),
            "#ifndef SILLY_PACKER_GENERATED_TEST_H\n\
             #define SILLY_PACKER_GENERATED_TEST_H\n\
             \n\
             #include <array>\n\
             #include <cstdint>\n\
             \n\
             namespace game {\n\
             \n\
             inline constexpr unsigned int count = 3;\n\
             \n\
             } // namespace game\n\
             \n\
             #endif // SILLY_PACKER_GENERATED_TEST_H\n"
        );
    }
}
