use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::capability::{Source, Target, Value};
use crate::duration;
use crate::error::{BoxError, Cause};
use crate::resolve::terminal;

/// Invalid boolean text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid boolean syntax")]
pub struct ParseBoolError;

/// Canonical boolean spellings.
pub fn parse_bool(raw: &str) -> Result<bool, ParseBoolError> {
    match raw {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Ok(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Ok(false),
        _ => Err(ParseBoolError),
    }
}

macro_rules! scalars {
    ($($variant:ident($ty:ty) => $name:literal,)*) => {
        /// Built-in scalar kinds, recognized by exact type.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum ScalarKind {
            $($variant,)*
        }

        impl ScalarKind {
            /// Display name used in help text.
            pub fn name(self) -> &'static str {
                match self {
                    $(ScalarKind::$variant => $name,)*
                }
            }
        }

        pub enum ScalarMut<'a> {
            $($variant(&'a mut $ty),)*
        }

        pub enum ScalarRef<'a> {
            $($variant(&'a $ty),)*
        }

        impl ScalarMut<'_> {
            pub fn kind(&self) -> ScalarKind {
                match self {
                    $(ScalarMut::$variant(_) => ScalarKind::$variant,)*
                }
            }
        }

        impl ScalarRef<'_> {
            pub fn kind(&self) -> ScalarKind {
                match self {
                    $(ScalarRef::$variant(_) => ScalarKind::$variant,)*
                }
            }
        }

        $(
            impl Value for $ty {
                fn target(&mut self) -> Target<'_> {
                    Target::Scalar(ScalarMut::$variant(self))
                }

                fn source(&self) -> Source<'_> {
                    Source::Scalar(ScalarRef::$variant(self))
                }

                fn materialize() -> Option<Self> {
                    Some(<$ty>::default())
                }
            }

            terminal!($ty);
        )*
    };
}

scalars! {
    Text(String) => "string",
    Bool(bool) => "bool",
    I8(i8) => "i8",
    I16(i16) => "i16",
    I32(i32) => "i32",
    I64(i64) => "i64",
    Isize(isize) => "isize",
    U8(u8) => "u8",
    U16(u16) => "u16",
    U32(u32) => "u32",
    U64(u64) => "u64",
    Usize(usize) => "usize",
    F32(f32) => "f32",
    F64(f64) => "f64",
    Duration(Duration) => "duration",
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl ScalarMut<'_> {
    /// Parse `raw` with the kind's grammar and store the result.
    ///
    /// The destination is only written after a successful parse.
    pub fn parse(self, raw: &str) -> Result<(), Cause> {
        let kind = self.kind();
        match self {
            ScalarMut::Text(v) => *v = raw.to_owned(),
            ScalarMut::Bool(v) => *v = parse_bool(raw).map_err(|e| failure(kind, raw, e))?,
            ScalarMut::Duration(v) => {
                *v = duration::parse(raw).map_err(|e| failure(kind, raw, e))?
            }
            ScalarMut::I8(v) => *v = parse_number(kind, raw)?,
            ScalarMut::I16(v) => *v = parse_number(kind, raw)?,
            ScalarMut::I32(v) => *v = parse_number(kind, raw)?,
            ScalarMut::I64(v) => *v = parse_number(kind, raw)?,
            ScalarMut::Isize(v) => *v = parse_number(kind, raw)?,
            ScalarMut::U8(v) => *v = parse_number(kind, raw)?,
            ScalarMut::U16(v) => *v = parse_number(kind, raw)?,
            ScalarMut::U32(v) => *v = parse_number(kind, raw)?,
            ScalarMut::U64(v) => *v = parse_number(kind, raw)?,
            ScalarMut::Usize(v) => *v = parse_number(kind, raw)?,
            ScalarMut::F32(v) => *v = parse_number(kind, raw)?,
            ScalarMut::F64(v) => *v = parse_number(kind, raw)?,
        }
        Ok(())
    }
}

impl fmt::Display for ScalarRef<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScalarRef::Text(v) => f.write_str(v),
            ScalarRef::Bool(v) => write!(f, "{v}"),
            ScalarRef::Duration(v) => f.write_str(&duration::format(**v)),
            ScalarRef::I8(v) => write!(f, "{v}"),
            ScalarRef::I16(v) => write!(f, "{v}"),
            ScalarRef::I32(v) => write!(f, "{v}"),
            ScalarRef::I64(v) => write!(f, "{v}"),
            ScalarRef::Isize(v) => write!(f, "{v}"),
            ScalarRef::U8(v) => write!(f, "{v}"),
            ScalarRef::U16(v) => write!(f, "{v}"),
            ScalarRef::U32(v) => write!(f, "{v}"),
            ScalarRef::U64(v) => write!(f, "{v}"),
            ScalarRef::Usize(v) => write!(f, "{v}"),
            ScalarRef::F32(v) => write!(f, "{v}"),
            ScalarRef::F64(v) => write!(f, "{v}"),
        }
    }
}

fn parse_number<T>(kind: ScalarKind, raw: &str) -> Result<T, Cause>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    raw.parse().map_err(|e| failure(kind, raw, e))
}

fn failure(kind: ScalarKind, raw: &str, source: impl Into<BoxError>) -> Cause {
    Cause::ParseFailure {
        kind,
        raw: raw.to_owned(),
        source: source.into(),
    }
}
