//! Indirection resolution.
//!
//! A handle is a terminal [`Value`] wrapped in zero or more layers:
//! - `Option<_>`: nullable, may be empty
//! - `Box<_>`: owned, always holds storage
//!
//! Resolution is split in two phases. [`resolve`] walks the layers and never
//! allocates; an empty `Option` stops the walk with a [`Vacancy`]. Filling the
//! vacancy is the write phase: missing layers are built innermost first and
//! attached to the empty layer. Input that produces nothing leaves every layer
//! as it was found.

use crate::capability::Value;

/// One traversed indirection layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layer {
    /// `Box<_>`.
    Owned,
    /// `Option<_>` holding storage.
    Occupied,
    /// `Option<_>` found empty. Always the last layer of a chain.
    Vacant,
}

/// Layers traversed by [`resolve`], outermost first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Chain {
    layers: Vec<Layer>,
}

impl Chain {
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Number of layers traversed.
    pub fn depth(&self) -> usize {
        self.layers.len()
    }

    pub fn is_vacant(&self) -> bool {
        self.layers.last() == Some(&Layer::Vacant)
    }

    fn push(&mut self, layer: Layer) {
        self.layers.push(layer);
    }
}

/// Pending write into the first empty layer of a handle.
pub struct Vacancy<'a, T> {
    fill: Box<dyn FnOnce(T) + 'a>,
}

impl<'a, T> Vacancy<'a, T> {
    fn new(fill: impl FnOnce(T) + 'a) -> Self {
        Self {
            fill: Box::new(fill),
        }
    }

    /// Allocate the missing layers around `value` and attach them.
    pub fn fill(self, value: T) {
        (self.fill)(value)
    }
}

/// Deepest reachable point of a handle.
pub enum Slot<'a, T> {
    Occupied(&'a mut T),
    Vacant(Vacancy<'a, T>),
}

pub struct Resolved<'a, T> {
    pub slot: Slot<'a, T>,
    pub chain: Chain,
}

/// Destination handle: a terminal value behind a statically known number of
/// indirection layers.
pub trait Handle {
    type Terminal: Value;

    /// Indirection layers between the handle and its terminal.
    const DEPTH: usize;

    /// Walk inward, recording each layer. Never allocates.
    fn resolve_into<'a>(&'a mut self, chain: &mut Chain) -> Slot<'a, Self::Terminal>;

    /// Read-only walk. `None` if some layer is empty.
    fn resolve_ref(&self) -> Option<&Self::Terminal>;

    /// Build every layer of this handle around `terminal`.
    fn wrap(terminal: Self::Terminal) -> Self
    where
        Self: Sized;
}

pub fn resolve<H: Handle + ?Sized>(handle: &mut H) -> Resolved<'_, H::Terminal> {
    let mut chain = Chain::default();
    let slot = handle.resolve_into(&mut chain);
    Resolved { slot, chain }
}

impl<X: Handle> Handle for Option<X> {
    type Terminal = X::Terminal;

    const DEPTH: usize = X::DEPTH + 1;

    fn resolve_into<'a>(&'a mut self, chain: &mut Chain) -> Slot<'a, X::Terminal> {
        match self {
            Some(inner) => {
                chain.push(Layer::Occupied);
                inner.resolve_into(chain)
            }
            None => {
                chain.push(Layer::Vacant);
                Slot::Vacant(Vacancy::new(move |terminal| {
                    *self = Some(X::wrap(terminal));
                }))
            }
        }
    }

    fn resolve_ref(&self) -> Option<&X::Terminal> {
        self.as_ref().and_then(X::resolve_ref)
    }

    fn wrap(terminal: X::Terminal) -> Self {
        Some(X::wrap(terminal))
    }
}

impl<X: Handle> Handle for Box<X> {
    type Terminal = X::Terminal;

    const DEPTH: usize = X::DEPTH + 1;

    fn resolve_into<'a>(&'a mut self, chain: &mut Chain) -> Slot<'a, X::Terminal> {
        chain.push(Layer::Owned);
        (**self).resolve_into(chain)
    }

    fn resolve_ref(&self) -> Option<&X::Terminal> {
        (**self).resolve_ref()
    }

    fn wrap(terminal: X::Terminal) -> Self {
        Box::new(X::wrap(terminal))
    }
}

/// Implement [`Handle`] for terminal types (depth 0).
macro_rules! terminal {
    ($($ty:ty),* $(,)?) => {$(
        impl $crate::resolve::Handle for $ty {
            type Terminal = Self;

            const DEPTH: usize = 0;

            fn resolve_into<'a>(
                &'a mut self,
                _chain: &mut $crate::resolve::Chain,
            ) -> $crate::resolve::Slot<'a, Self> {
                $crate::resolve::Slot::Occupied(self)
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

pub(crate) use terminal;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn depth_is_static() {
        assert_eq!(<i32 as Handle>::DEPTH, 0);
        assert_eq!(<Option<i32> as Handle>::DEPTH, 1);
        assert_eq!(<Option<Box<Option<Box<i32>>>> as Handle>::DEPTH, 4);
    }

    #[test]
    fn resolve_does_not_allocate() {
        let mut handle: Option<Box<Option<i32>>> = None;
        let resolved = resolve(&mut handle);
        assert_eq!(resolved.chain.layers(), &[Layer::Vacant]);
        assert!(resolved.chain.is_vacant());
        drop(resolved);
        assert!(handle.is_none());
    }

    #[test]
    fn fill_builds_missing_layers() {
        let mut handle: Option<Box<Option<i32>>> = Some(Box::new(None));
        let Resolved { slot, chain } = resolve(&mut handle);
        assert_eq!(
            chain.layers(),
            &[Layer::Occupied, Layer::Owned, Layer::Vacant]
        );
        match { slot } {
            Slot::Vacant(vacancy) => vacancy.fill(7),
            Slot::Occupied(_) => panic!("expected a vacancy"),
        }
        assert_eq!(handle, Some(Box::new(Some(7))));
    }

    #[test]
    fn occupied_chain_reaches_terminal() {
        let mut handle = Some(Some(Box::new(1u8)));
        let Resolved { slot, chain } = resolve(&mut handle);
        assert_eq!(chain.depth(), 3);
        match { slot } {
            Slot::Occupied(v) => *v = 2,
            Slot::Vacant(_) => panic!("expected a value"),
        }
        assert_eq!(handle.resolve_ref(), Some(&2));
    }
}
