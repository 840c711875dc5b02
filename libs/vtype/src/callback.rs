use crate::capability::{Callback, CallbackArg, Source, Target, Value};
use crate::error::BoxError;
use crate::resolve::{Chain, Handle, Slot};
use crate::scalar;

/// Callback destination taking the raw string.
pub struct OnSet<F> {
    f: F,
}

impl<F> OnSet<F>
where
    F: FnMut(&str) -> Result<(), BoxError>,
{
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> Callback for OnSet<F>
where
    F: FnMut(&str) -> Result<(), BoxError>,
{
    fn is_bool(&self) -> bool {
        false
    }

    fn call(&mut self, arg: CallbackArg<'_>) -> Result<(), BoxError> {
        match arg {
            CallbackArg::Text(raw) => (self.f)(raw),
            CallbackArg::Bool(b) => (self.f)(if b { "true" } else { "false" }),
        }
    }
}

/// Callback destination taking a boolean; the raw string is parsed first.
pub struct OnSetBool<F> {
    f: F,
}

impl<F> OnSetBool<F>
where
    F: FnMut(bool) -> Result<(), BoxError>,
{
    pub fn new(f: F) -> Self {
        Self { f }
    }
}

impl<F> Callback for OnSetBool<F>
where
    F: FnMut(bool) -> Result<(), BoxError>,
{
    fn is_bool(&self) -> bool {
        true
    }

    fn call(&mut self, arg: CallbackArg<'_>) -> Result<(), BoxError> {
        match arg {
            CallbackArg::Bool(b) => (self.f)(b),
            CallbackArg::Text(raw) => (self.f)(scalar::parse_bool(raw)?),
        }
    }
}

macro_rules! callback_value {
    ($($name:ident($arg:ty);)*) => {$(
        impl<F> Value for $name<F>
        where
            F: FnMut($arg) -> Result<(), BoxError>,
        {
            fn target(&mut self) -> Target<'_> {
                Target::Callback(self)
            }

            fn source(&self) -> Source<'_> {
                Source::Callback(self)
            }
        }

        impl<F> Handle for $name<F>
        where
            F: FnMut($arg) -> Result<(), BoxError>,
        {
            type Terminal = Self;

            const DEPTH: usize = 0;

            fn resolve_into<'a>(&'a mut self, _chain: &mut Chain) -> Slot<'a, Self> {
                Slot::Occupied(self)
            }

            fn resolve_ref(&self) -> Option<&Self> {
                Some(self)
            }

            fn wrap(terminal: Self) -> Self {
                terminal
            }
        }
    )*};
}

callback_value! {
    OnSet(&str);
    OnSetBool(bool);
}
