use super::*;
use crate::context::MaskContext;
use crate::mask_data::ShapeMask;

impl MaskManager {
    // Batched draws still in flight were recorded against the previous stencil state, so
    // the batch is flushed before every stencil change.
    pub(super) fn push_stencil_mask(&mut self, ctx: &mut MaskContext<'_>, shape: &ShapeMask) {
        ctx.batch.stop();
        ctx.stencil.push_stencil(shape);
    }

    pub(super) fn pop_stencil_mask(&mut self, ctx: &mut MaskContext<'_>) {
        ctx.batch.stop();
        ctx.stencil.pop_stencil();
    }
}
