use crate::convert;
use crate::error::ConvertError;
use crate::render;
use crate::resolve::Handle;
use crate::sequence::{Accumulator, SequenceConfig};

/// A destination handle paired with its accumulation state.
///
/// Repeated [`convert`](Binding::convert) calls on one binding append to
/// sequence destinations (unless configured to replace); a fresh binding
/// starts over.
pub struct Binding<'a, H: Handle + ?Sized> {
    handle: &'a mut H,
    accumulator: Accumulator,
}

impl<'a, H: Handle + ?Sized> Binding<'a, H> {
    pub fn new(handle: &'a mut H) -> Self {
        Self::with_config(handle, SequenceConfig::default())
    }

    pub fn with_config(handle: &'a mut H, config: SequenceConfig) -> Self {
        Self {
            handle,
            accumulator: Accumulator::new(config),
        }
    }

    pub fn convert(&mut self, raw: &str) -> Result<(), ConvertError> {
        convert::convert_with(&mut *self.handle, raw, &mut self.accumulator)
    }

    pub fn render(&self) -> Result<String, ConvertError> {
        render::render_with(&*self.handle, self.accumulator.config())
    }

    pub fn default_text(&self) -> String {
        render::default_text_with(&*self.handle, self.accumulator.config())
    }

    pub fn type_name(&self) -> String {
        render::type_name_with(&*self.handle, self.accumulator.config())
    }

    pub fn is_bool_like(&self) -> bool {
        render::is_bool_like(&*self.handle)
    }

    pub fn accumulator(&self) -> &Accumulator {
        &self.accumulator
    }

    pub fn handle(&self) -> &H {
        &*self.handle
    }
}
