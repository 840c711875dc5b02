use std::borrow::Cow;
use std::fmt;

use crate::error::BoxError;
use crate::scalar::{ScalarKind, ScalarMut, ScalarRef};
use crate::sequence::{SequenceSource, SequenceTarget};

/// Recognized shape of a destination type.
///
/// Classification is structural and fixed per type:
/// - built-in scalars by exact type
/// - custom types by the hooks they declare, ranked
///   `TextCodec` > `Setter` > `Callback`
/// - `Vec<E>` as a sequence of `E`'s capability
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Capability {
    Scalar(ScalarKind),
    TextCodec,
    Setter,
    Callback { is_bool: bool },
    Sequence(Box<Capability>),
    Unsupported,
}

impl Capability {
    /// Whether "no value supplied" should read as a boolean flag.
    pub fn is_bool_like(&self) -> bool {
        match self {
            Capability::Scalar(kind) => *kind == ScalarKind::Bool,
            Capability::Callback { is_bool } => *is_bool,
            Capability::Sequence(element) => element.is_bool_like(),
            _ => false,
        }
    }
}

/// Paired text decode/encode hooks.
pub trait TextCodec {
    fn decode_text(&mut self, text: &[u8]) -> Result<(), BoxError>;
    fn encode_text(&self) -> Result<Vec<u8>, BoxError>;
}

/// Set from a string, rendered through `Display`.
pub trait Setter: fmt::Display {
    fn set(&mut self, raw: &str) -> Result<(), BoxError>;
}

/// Argument handed to a [`Callback`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallbackArg<'a> {
    Text(&'a str),
    Bool(bool),
}

/// Single-argument function destination.
///
/// Boolean callbacks receive an already parsed `CallbackArg::Bool`.
pub trait Callback {
    fn is_bool(&self) -> bool;
    fn call(&mut self, arg: CallbackArg<'_>) -> Result<(), BoxError>;
}

/// Mutable access to a destination, tagged by its conversion strategy.
pub enum Target<'a> {
    Scalar(ScalarMut<'a>),
    TextCodec(&'a mut dyn TextCodec),
    Setter(&'a mut dyn Setter),
    Callback(&'a mut dyn Callback),
    Sequence(&'a mut dyn SequenceTarget),
    Unsupported,
}

/// Shared access to a destination, tagged like [`Target`].
pub enum Source<'a> {
    Scalar(ScalarRef<'a>),
    TextCodec(&'a dyn TextCodec),
    Setter(&'a dyn Setter),
    Callback(&'a dyn Callback),
    Sequence(&'a dyn SequenceSource),
    Unsupported,
}

impl Source<'_> {
    pub fn capability(&self) -> Capability {
        match self {
            Source::Scalar(scalar) => Capability::Scalar(scalar.kind()),
            Source::TextCodec(_) => Capability::TextCodec,
            Source::Setter(_) => Capability::Setter,
            Source::Callback(callback) => Capability::Callback {
                is_bool: callback.is_bool(),
            },
            Source::Sequence(sequence) => {
                Capability::Sequence(Box::new(sequence.element_capability()))
            }
            Source::Unsupported => Capability::Unsupported,
        }
    }
}

/// A terminal destination: something a raw token converts into.
///
/// Implemented for the built-in scalars, `Vec<E>`, [`OnSet`](crate::OnSet) /
/// [`OnSetBool`](crate::OnSetBool), and custom types via `#[derive(Value)]`.
pub trait Value {
    fn target(&mut self) -> Target<'_>;

    fn source(&self) -> Source<'_>;

    /// Explicit display name for help text. `None` uses the capability's name.
    fn type_name(&self) -> Option<Cow<'static, str>> {
        None
    }

    /// Explicit default text for help text. `None` renders the value.
    fn default_text(&self) -> Option<String> {
        None
    }

    /// Rust type identity, attached to conversion errors.
    fn type_identity(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Fresh value used when an empty indirection layer has to be filled.
    /// `None` means the type cannot be produced from nothing.
    fn materialize() -> Option<Self>
    where
        Self: Sized,
    {
        None
    }
}

pub fn classify(value: &dyn Value) -> Capability {
    value.source().capability()
}

/// Strip module paths from a `std::any::type_name` string.
///
/// `alloc::vec::Vec<core::option::Option<i32>>` becomes `Vec<Option<i32>>`.
pub(crate) fn short_type_name(full: &str) -> String {
    fn push_last(out: &mut String, segment: &str) {
        out.push_str(segment.rsplit("::").next().unwrap_or(segment));
    }

    let mut out = String::with_capacity(full.len());
    let mut start = 0;
    for (i, c) in full.char_indices() {
        if matches!(c, '<' | '>' | ',' | ' ' | '(' | ')' | '[' | ']' | '&' | ';') {
            push_last(&mut out, &full[start..i]);
            out.push(c);
            start = i + c.len_utf8();
        }
    }
    push_last(&mut out, &full[start..]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_type_name_strips_paths() {
        assert_eq!(
            short_type_name("alloc::vec::Vec<core::option::Option<i32>>"),
            "Vec<Option<i32>>"
        );
        assert_eq!(short_type_name("u8"), "u8");
        assert_eq!(short_type_name("(a::B, c::D)"), "(B, D)");
    }

    #[test]
    fn bool_likeness_follows_sequence_elements() {
        assert!(Capability::Scalar(ScalarKind::Bool).is_bool_like());
        assert!(Capability::Callback { is_bool: true }.is_bool_like());
        assert!(!Capability::Callback { is_bool: false }.is_bool_like());
        let sequence_of = |kind| Capability::Sequence(Box::new(Capability::Scalar(kind)));
        assert!(sequence_of(ScalarKind::Bool).is_bool_like());
        assert!(!sequence_of(ScalarKind::I32).is_bool_like());
        assert!(!Capability::TextCodec.is_bool_like());
    }
}
