//! String-to-value conversion for command-line style destinations.
//!
//! A destination is a terminal [`Value`] behind zero or more `Option<_>` /
//! `Box<_>` layers. [`convert`] resolves the layers, dispatches on the
//! terminal's [`Capability`] and writes the parsed value, allocating empty
//! layers only when something was produced. [`render`], [`type_name`] and
//! [`default_text`] go the other way for help output.
//!
//! ```
//! let mut port: Option<Box<u16>> = None;
//! vtype::convert(&mut port, "8080").unwrap();
//! assert_eq!(port.as_deref(), Some(&8080));
//!
//! let mut tags: Vec<String> = Vec::new();
//! let mut binding = vtype::Binding::with_config(
//!     &mut tags,
//!     vtype::SequenceConfig::default().split_each(),
//! );
//! binding.convert("a,b").unwrap();
//! binding.convert("c").unwrap();
//! assert_eq!(binding.render().unwrap(), "a,b,c");
//! ```

extern crate self as vtype;

pub mod binding;
pub mod callback;
pub mod capability;
pub mod convert;
pub mod duration;
pub mod error;
pub mod render;
pub mod resolve;
pub mod scalar;
pub mod sequence;

pub use vtype_derive::Value;

pub use binding::Binding;
pub use callback::{OnSet, OnSetBool};
pub use capability::{
    Callback, CallbackArg, Capability, Setter, Source, Target, TextCodec, Value, classify,
};
pub use convert::{convert, convert_with};
pub use error::{BoxError, Cause, ConfigError, ConvertError, ErrorKind};
pub use render::{
    capability_of, default_text, default_text_with, is_bool_like, render, render_with, type_name,
    type_name_with,
};
pub use resolve::Handle;
pub use scalar::ScalarKind;
pub use sequence::{AccumulateMode, Accumulator, SequenceConfig, SplitMode};
