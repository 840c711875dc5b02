//! Rendering a destination back to text, and the introspection used by help
//! output: display name, default text, boolean-likeness.

use std::any;

use crate::capability::{self, Capability, Source, Value, short_type_name};
use crate::error::{Cause, ConvertError, ErrorKind};
use crate::resolve::Handle;
use crate::sequence::{self, SequenceConfig};

/// Render the value behind `handle` with the default sequence configuration.
pub fn render<H: Handle + ?Sized>(handle: &H) -> Result<String, ConvertError> {
    render_with(handle, &SequenceConfig::default())
}

/// Render the value behind `handle`. An empty layer renders as `""`.
pub fn render_with<H: Handle + ?Sized>(
    handle: &H,
    config: &SequenceConfig,
) -> Result<String, ConvertError> {
    match handle.resolve_ref() {
        Some(value) => render_value(value, config),
        None => Ok(String::new()),
    }
}

pub(crate) fn render_value(
    value: &dyn Value,
    config: &SequenceConfig,
) -> Result<String, ConvertError> {
    let fail = |cause| ConvertError::new(short_type_name(value.type_identity()), cause);

    match value.source() {
        Source::Scalar(scalar) => Ok(scalar.to_string()),
        Source::TextCodec(codec) => {
            let bytes = codec
                .encode_text()
                .map_err(|e| fail(Cause::CodecFailure(e)))?;
            String::from_utf8(bytes).map_err(|e| fail(Cause::CodecFailure(e.into())))
        }
        Source::Setter(setter) => Ok(setter.to_string()),
        Source::Callback(_) => Ok(String::new()),
        Source::Sequence(seq) => Ok(sequence::render(config, seq)),
        Source::Unsupported => Err(fail(Cause::UnsupportedType)),
    }
}

pub fn default_text<H: Handle + ?Sized>(handle: &H) -> String {
    default_text_with(handle, &SequenceConfig::default())
}

/// Best-effort text of the current value, for help output. Never fails:
/// render errors become their message, unsupported types render empty.
pub fn default_text_with<H: Handle + ?Sized>(handle: &H, config: &SequenceConfig) -> String {
    let Some(value) = handle.resolve_ref() else {
        return String::new();
    };
    if let Some(text) = value.default_text() {
        return text;
    }
    match render_value(value, config) {
        Ok(text) => text,
        Err(e) if e.kind() == ErrorKind::Unsupported => String::new(),
        Err(e) => e.to_string(),
    }
}

pub fn type_name<H: Handle + ?Sized>(handle: &H) -> String {
    type_name_with(handle, &SequenceConfig::default())
}

/// Display name of the destination for help output.
///
/// Empty layers are named after a freshly materialized terminal, or the bare
/// Rust type when the terminal has no fresh form.
pub fn type_name_with<H: Handle + ?Sized>(handle: &H, config: &SequenceConfig) -> String {
    if let Some(value) = handle.resolve_ref() {
        return value_type_name(value, config);
    }
    match <H::Terminal as Value>::materialize() {
        Some(probe) => value_type_name(&probe, config),
        None => short_type_name(any::type_name::<H::Terminal>()),
    }
}

pub(crate) fn value_type_name(value: &dyn Value, config: &SequenceConfig) -> String {
    if let Some(name) = value.type_name() {
        return name.into_owned();
    }
    match value.source() {
        Source::Scalar(scalar) => scalar.kind().name().to_owned(),
        Source::TextCodec(_) | Source::Setter(_) => "value".to_owned(),
        Source::Callback(callback) if callback.is_bool() => "bool".to_owned(),
        Source::Callback(_) => "value".to_owned(),
        Source::Sequence(seq) => sequence::type_name(config, seq),
        Source::Unsupported => short_type_name(value.type_identity()),
    }
}

/// Capability of the terminal behind `handle`.
pub fn capability_of<H: Handle + ?Sized>(handle: &H) -> Capability {
    if let Some(value) = handle.resolve_ref() {
        return capability::classify(value);
    }
    match <H::Terminal as Value>::materialize() {
        Some(probe) => capability::classify(&probe),
        None => Capability::Unsupported,
    }
}

/// Whether the destination reads as a flag that needs no explicit value.
pub fn is_bool_like<H: Handle + ?Sized>(handle: &H) -> bool {
    capability_of(handle).is_bool_like()
}
