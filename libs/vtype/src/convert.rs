use crate::capability::{CallbackArg, Target, Value, short_type_name};
use crate::error::{Cause, ConvertError};
use crate::resolve::{self, Handle, Slot};
use crate::scalar::{self, ScalarKind};
use crate::sequence::{self, Accumulator};

/// Convert `raw` into the destination behind `handle`.
///
/// Sequence destinations get a fresh [`Accumulator`] with the default
/// configuration, so every call clears them. Use [`convert_with`] or a
/// [`Binding`](crate::Binding) to append across calls.
pub fn convert<H: Handle + ?Sized>(handle: &mut H, raw: &str) -> Result<(), ConvertError> {
    convert_with(handle, raw, &mut Accumulator::default())
}

/// Convert `raw` into the destination behind `handle`, threading `accumulator`
/// across calls for sequence destinations.
///
/// Empty indirection layers are only allocated once the conversion has
/// produced something to store in them.
pub fn convert_with<H: Handle + ?Sized>(
    handle: &mut H,
    raw: &str,
    accumulator: &mut Accumulator,
) -> Result<(), ConvertError> {
    let resolved = resolve::resolve(handle);
    tracing::trace!(
        depth = resolved.chain.depth(),
        vacant = resolved.chain.is_vacant(),
        "resolved destination"
    );
    match resolved.slot {
        Slot::Occupied(value) => hydrate(value, raw, accumulator).result,
        Slot::Vacant(vacancy) => {
            let Some(mut scratch) = <H::Terminal as Value>::materialize() else {
                return Err(ConvertError::new(
                    short_type_name(std::any::type_name::<H::Terminal>()),
                    Cause::NotIndirectable,
                ));
            };

            let step = hydrate(&mut scratch, raw, accumulator);
            if step.wrote {
                tracing::debug!(
                    depth = resolved.chain.depth(),
                    "allocating vacant indirection layers"
                );
                vacancy.fill(scratch);
            }
            step.result
        }
    }
}

/// Result of one dispatch, plus whether the value was written to.
struct Step {
    wrote: bool,
    result: Result<(), ConvertError>,
}

impl Step {
    fn done(result: Result<(), ConvertError>) -> Self {
        Self {
            wrote: result.is_ok(),
            result,
        }
    }

    fn failed(err: ConvertError) -> Self {
        Self {
            wrote: false,
            result: Err(err),
        }
    }
}

/// Dispatch on the value's capability and convert `raw` into it.
fn hydrate(value: &mut dyn Value, raw: &str, accumulator: &mut Accumulator) -> Step {
    let identity = value.type_identity();
    let fail = |cause: Cause| ConvertError::new(short_type_name(identity), cause);

    match value.target() {
        Target::Scalar(slot) => {
            tracing::trace!(kind = %slot.kind(), "converting scalar");
            Step::done(slot.parse(raw).map_err(fail))
        }
        Target::TextCodec(codec) => {
            tracing::trace!(type_name = identity, "converting via text codec");
            Step::done(
                codec
                    .decode_text(raw.as_bytes())
                    .map_err(|e| fail(Cause::CodecFailure(e))),
            )
        }
        Target::Setter(setter) => {
            tracing::trace!(type_name = identity, "converting via setter");
            Step::done(setter.set(raw).map_err(|e| fail(Cause::SetterFailure(e))))
        }
        Target::Callback(callback) => {
            tracing::trace!(is_bool = callback.is_bool(), "invoking callback");
            let arg = if callback.is_bool() {
                match scalar::parse_bool(raw) {
                    Ok(b) => CallbackArg::Bool(b),
                    Err(e) => {
                        return Step::failed(fail(Cause::ParseFailure {
                            kind: ScalarKind::Bool,
                            raw: raw.to_owned(),
                            source: e.into(),
                        }));
                    }
                }
            } else {
                CallbackArg::Text(raw)
            };
            Step::done(
                callback
                    .call(arg)
                    .map_err(|e| fail(Cause::CallbackFailure(e))),
            )
        }
        Target::Sequence(target) => {
            tracing::trace!(
                type_name = identity,
                started = accumulator.is_started(),
                "accumulating sequence"
            );
            let result = sequence::accumulate(accumulator, &mut *target, raw);
            // A sequence counts as written once it holds an element, even when
            // a later chunk of the same call failed.
            Step {
                wrote: !target.is_empty(),
                result,
            }
        }
        Target::Unsupported => Step::failed(fail(Cause::UnsupportedType)),
    }
}
