use core::fmt;

/// The type of a variable an expression may reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display, strum::IntoStaticStr)]
pub enum VariableType {
    #[strum(serialize = "lib.Request")]
    Request,

    #[strum(serialize = "lib.Response")]
    Response,

    #[strum(serialize = "string")]
    String,
}

/// A named, typed field of an object type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    pub name: &'static str,
    pub ty: &'static str,
}

/// A record type whose fields expressions reach with dotted access (`request.url.host`).
#[derive(Debug)]
pub struct ObjectType {
    pub name: &'static str,
    pub fields: &'static [Field],
}

impl ObjectType {
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }
}

impl fmt::Display for ObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fields: Vec<String> = self.fields.iter().map(|field| format!("{}: {}", field.name, field.ty)).collect();
        write!(f, "{} {{ {} }}", self.name, fields.join(", "))
    }
}

const fn field(name: &'static str, ty: &'static str) -> Field {
    Field { name, ty }
}

pub static URL_TYPE: ObjectType = ObjectType {
    name: "lib.UrlType",
    fields: &[
        field("scheme", "string"),
        field("host", "string"),
        field("path", "string"),
        field("query", "string"),
        field("fragment", "string"),
    ],
};

pub static REQUEST_TYPE: ObjectType = ObjectType {
    name: "lib.Request",
    fields: &[
        field("url", "lib.UrlType"),
        field("method", "string"),
        field("headers", "map(string, string)"),
        field("content_type", "string"),
        field("body", "bytes"),
    ],
};

pub static RESPONSE_TYPE: ObjectType = ObjectType {
    name: "lib.Response",
    fields: &[
        field("url", "lib.UrlType"),
        field("status", "int"),
        field("headers", "map(string, string)"),
        field("content_type", "string"),
        field("body", "bytes"),
    ],
};

pub static OBJECT_TYPES: &[&ObjectType] = &[&URL_TYPE, &REQUEST_TYPE, &RESPONSE_TYPE];

/// Functions and macros the expression engine provides on its own.
pub const ENGINE_FUNCTIONS: &[&str] = &[
    "all",
    "bytes",
    "contains",
    "double",
    "duration",
    "endsWith",
    "exists",
    "exists_one",
    "filter",
    "getDate",
    "getDayOfMonth",
    "getDayOfWeek",
    "getDayOfYear",
    "getFullYear",
    "getHours",
    "getMilliseconds",
    "getMinutes",
    "getMonth",
    "getSeconds",
    "has",
    "int",
    "map",
    "matches",
    "max",
    "min",
    "size",
    "startsWith",
    "string",
    "timestamp",
    "uint",
];

/// Words CEL reserves, which can never name a variable.
pub const RESERVED_WORDS: &[&str] = &[
    "as",
    "break",
    "const",
    "continue",
    "else",
    "false",
    "for",
    "function",
    "if",
    "import",
    "in",
    "let",
    "loop",
    "namespace",
    "null",
    "package",
    "return",
    "true",
    "var",
    "void",
    "while",
];
