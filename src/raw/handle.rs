use core::num::NonZero;

#[cfg(test)]
type RawHandle = u16;
#[cfg(not(test))]
type RawHandle = u32;

/// A link to a node slot in the [`Arena`](super::arena::Arena).
///
/// Child and parent links are `Option<Handle>`, with `None` standing for the
/// absent node: an empty child slot or the root's parent, at height -1. The
/// `NonZero` niche keeps such a link, and the public `NodeRef` wrapping one,
/// as small as a bare index. Builds store a `u32`; tests use a `u16` so the
/// node-count limit can be reached.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
#[repr(transparent)]
pub(crate) struct Handle(NonZero<RawHandle>);

impl Handle {
    pub(crate) const MAX: usize = (RawHandle::MAX - 1) as usize;

    /// Handle of the node stored at slot `index`. Slot 0 maps to raw value 1.
    #[inline]
    pub(crate) const fn from_index(index: usize) -> Self {
        assert!(index <= Self::MAX, "`Handle::from_index()` - `index` > `Handle::MAX`!");
        #[allow(clippy::cast_possible_truncation)]
        match NonZero::new((index + 1) as RawHandle) {
            Some(raw) => Self(raw),
            None => unreachable!(),
        }
    }

    #[inline]
    pub(crate) const fn to_index(self) -> usize {
        (self.0.get() - 1) as usize
    }
}
