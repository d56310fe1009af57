//! Builtin functions callable from rule expressions
//!
//! Every builtin is a [`Builtin`]: a name plus a table of typed [`Overload`]s. The
//! expression engine hands each call over as a list of values (the receiver first, when
//! the call is written `a.f(b)`), and [`Builtin::call`] picks the overload whose parameter
//! kinds match. Bytes and string variants of the same operation are separate overloads;
//! no value is ever coerced from one kind to the other.
//!
//! The underlying operations are plain Rust functions re-exported from this module so
//! they can be used, and tested, without the engine.

mod builtin;
mod bytes;
mod encoding;
mod function_error;
mod hash;
mod random;
mod text;

pub use builtin::{Builtin, Overload, ValueKind, kind_name};
pub use bytes::{bcontains, bmatchs};
pub use encoding::{base64_decode, base64_encode, urldecode, urlencode};
pub use function_error::FunctionError;
pub use hash::md5_hex;
pub use random::{random_int, random_lowercase};
pub use text::substr;

use builtin::{bytes_arg, int_arg, string_arg, string_value, text_or_bytes_arg};
use cel_interpreter::extractors::Arguments;
use cel_interpreter::{Context, ExecutionError, FunctionContext, Value};

pub static BCONTAINS: Builtin = Builtin {
    name: "bcontains",
    overloads: &[Overload {
        id: "bytes_bcontains_bytes",
        params: &[ValueKind::Bytes, ValueKind::Bytes],
        result: ValueKind::Bool,
        imp: |args| {
            let haystack = bytes_arg("bcontains", args, 0)?;
            let needle = bytes_arg("bcontains", args, 1)?;
            Ok(Value::Bool(bcontains(haystack, needle)))
        },
    }],
};

pub static BMATCHS: Builtin = Builtin {
    name: "bmatchs",
    overloads: &[Overload {
        id: "string_bmatchs_bytes",
        params: &[ValueKind::String, ValueKind::Bytes],
        result: ValueKind::Bool,
        imp: |args| {
            let pattern = string_arg("bmatchs", args, 0)?;
            let haystack = bytes_arg("bmatchs", args, 1)?;
            Ok(Value::Bool(bmatchs(pattern, haystack)?))
        },
    }],
};

pub static MD5: Builtin = Builtin {
    name: "md5",
    overloads: &[Overload {
        id: "md5_string",
        params: &[ValueKind::String],
        result: ValueKind::String,
        imp: |args| Ok(string_value(md5_hex(string_arg("md5", args, 0)?.as_bytes()))),
    }],
};

pub static RANDOM_INT: Builtin = Builtin {
    name: "randomInt",
    overloads: &[Overload {
        id: "randomInt_int_int",
        params: &[ValueKind::Int, ValueKind::Int],
        result: ValueKind::Int,
        imp: |args| {
            let range = int_arg("randomInt", args, 0)?;
            let offset = int_arg("randomInt", args, 1)?;
            Ok(Value::Int(random_int(range, offset)?))
        },
    }],
};

pub static RANDOM_LOWERCASE: Builtin = Builtin {
    name: "randomLowercase",
    overloads: &[Overload {
        id: "randomLowercase_int",
        params: &[ValueKind::Int],
        result: ValueKind::String,
        imp: |args| Ok(string_value(random_lowercase(int_arg("randomLowercase", args, 0)?)?)),
    }],
};

pub static BASE64: Builtin = Builtin {
    name: "base64",
    overloads: &[
        Overload {
            id: "base64_string",
            params: &[ValueKind::String],
            result: ValueKind::String,
            imp: |args| Ok(string_value(base64_encode(text_or_bytes_arg("base64", args, 0)?))),
        },
        Overload {
            id: "base64_bytes",
            params: &[ValueKind::Bytes],
            result: ValueKind::String,
            imp: |args| Ok(string_value(base64_encode(text_or_bytes_arg("base64", args, 0)?))),
        },
    ],
};

pub static BASE64_DECODE: Builtin = Builtin {
    name: "base64Decode",
    overloads: &[
        Overload {
            id: "base64Decode_string",
            params: &[ValueKind::String],
            result: ValueKind::String,
            imp: |args| Ok(string_value(base64_decode(text_or_bytes_arg("base64Decode", args, 0)?)?)),
        },
        Overload {
            id: "base64Decode_bytes",
            params: &[ValueKind::Bytes],
            result: ValueKind::String,
            imp: |args| Ok(string_value(base64_decode(text_or_bytes_arg("base64Decode", args, 0)?)?)),
        },
    ],
};

pub static URLENCODE: Builtin = Builtin {
    name: "urlencode",
    overloads: &[
        Overload {
            id: "urlencode_string",
            params: &[ValueKind::String],
            result: ValueKind::String,
            imp: |args| Ok(string_value(urlencode(text_or_bytes_arg("urlencode", args, 0)?))),
        },
        Overload {
            id: "urlencode_bytes",
            params: &[ValueKind::Bytes],
            result: ValueKind::String,
            imp: |args| Ok(string_value(urlencode(text_or_bytes_arg("urlencode", args, 0)?))),
        },
    ],
};

pub static URLDECODE: Builtin = Builtin {
    name: "urldecode",
    overloads: &[
        Overload {
            id: "urldecode_string",
            params: &[ValueKind::String],
            result: ValueKind::String,
            imp: |args| Ok(string_value(urldecode(text_or_bytes_arg("urldecode", args, 0)?)?)),
        },
        Overload {
            id: "urldecode_bytes",
            params: &[ValueKind::Bytes],
            result: ValueKind::String,
            imp: |args| Ok(string_value(urldecode(text_or_bytes_arg("urldecode", args, 0)?)?)),
        },
    ],
};

pub static SUBSTR: Builtin = Builtin {
    name: "substr",
    overloads: &[Overload {
        id: "substr_string_int_int",
        params: &[ValueKind::String, ValueKind::Int, ValueKind::Int],
        result: ValueKind::String,
        imp: |args| {
            let s = string_arg("substr", args, 0)?;
            let start = int_arg("substr", args, 1)?;
            let length = int_arg("substr", args, 2)?;
            Ok(string_value(substr(s, start, length)?))
        },
    }],
};

/// Call `builtin` with the receiver of a method-style call (if any) followed by the arguments.
fn invoke(builtin: &Builtin, ftx: &FunctionContext, args: &[Value]) -> Result<Value, ExecutionError> {
    let mut all = Vec::with_capacity(args.len() + 1);
    all.extend(ftx.this.iter().cloned());
    all.extend_from_slice(args);

    builtin.call(&all).map_err(|e| ExecutionError::function_error(builtin.name, e))
}

macro_rules! builtin_handlers {
    ($($builtin:ident => $handler:ident),* $(,)?) => {
        $(
            fn $handler(ftx: &FunctionContext, Arguments(args): Arguments) -> Result<Value, ExecutionError> {
                invoke(&$builtin, ftx, &args)
            }
        )*

        /// Every builtin, in declaration order.
        pub static BUILTINS: &[&Builtin] = &[$(&$builtin),*];

        /// Make every builtin callable from programs executed against `context`.
        pub fn register(context: &mut Context<'_>) {
            $(context.add_function($builtin.name, $handler);)*
        }
    };
}

builtin_handlers! {
    BCONTAINS => bcontains_handler,
    BMATCHS => bmatchs_handler,
    MD5 => md5_handler,
    RANDOM_INT => random_int_handler,
    RANDOM_LOWERCASE => random_lowercase_handler,
    BASE64 => base64_handler,
    BASE64_DECODE => base64_decode_handler,
    URLENCODE => urlencode_handler,
    URLDECODE => urldecode_handler,
    SUBSTR => substr_handler,
}

/// Look up a builtin by the name expressions call it with.
#[must_use]
pub fn builtin(name: &str) -> Option<&'static Builtin> {
    BUILTINS.iter().copied().find(|b| b.name == name)
}
