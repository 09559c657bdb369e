use std::cell::RefCell;
use std::rc::Rc;

use crate::error::MaskError;
use crate::filter::{AlphaMaskFilter, AlphaMaskFilterHandle};
use crate::mask_data::SpriteMask;

/// Alpha mask filters indexed by sprite-mask nesting depth.
///
/// Slots are keyed by depth, not by mask, so a frame that nests the same way as the
/// previous one reuses every filter. The pool only grows; [`AlphaMaskPool::reset`] is the
/// single way to drop slots.
#[derive(Debug, Default)]
pub(crate) struct AlphaMaskPool {
    entries: Vec<AlphaMaskFilterHandle>,
    cursor: usize,
}

impl AlphaMaskPool {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Current nesting depth of sprite masks.
    pub(crate) fn depth(&self) -> usize {
        self.cursor
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn get(&self, depth: usize) -> Result<&AlphaMaskFilterHandle, MaskError> {
        self.entries.get(depth).ok_or(MaskError::PoolIndex {
            depth,
            len: self.entries.len(),
        })
    }

    /// Returns the filter at the cursor bound to `mask`, creating it the first time this
    /// depth is reached.
    pub(crate) fn acquire(&mut self, mask: SpriteMask) -> AlphaMaskFilterHandle {
        while self.entries.len() <= self.cursor {
            tracing::debug!(depth = self.entries.len(), "growing alpha mask pool");
            self.entries
                .push(Rc::new(RefCell::new(AlphaMaskFilter::new(mask))));
        }

        let filter = &self.entries[self.cursor];
        filter.borrow_mut().bind(mask);
        Rc::clone(filter)
    }

    pub(crate) fn advance(&mut self) {
        self.cursor += 1;
    }

    /// Moves the cursor one level up. Fails without touching the cursor when it is at zero.
    pub(crate) fn retreat(&mut self) -> Result<(), MaskError> {
        self.cursor = self
            .cursor
            .checked_sub(1)
            .ok_or(MaskError::UnbalancedStack {
                technique: crate::MaskTechnique::Sprite,
            })?;
        Ok(())
    }

    /// Drops every slot. Used when the graphics context is lost or the manager is destroyed.
    pub(crate) fn reset(&mut self) {
        self.entries.clear();
        self.cursor = 0;
    }
}
