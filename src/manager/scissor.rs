use super::*;
use crate::context::MaskContext;
use crate::geometry::physical_scissor_rect;
use crate::mask_data::{RenderableGuard, ShapeMask};

impl MaskManager {
    pub(super) fn push_scissor_mask(&mut self, ctx: &mut MaskContext<'_>, shape: &mut ShapeMask) {
        let bounds = RenderableGuard::new(shape).bounds();

        let target_id = ctx.render_target.id();
        let target_size = ctx.render_target.size();
        let rect = match bounds {
            Some(bounds) => {
                physical_scissor_rect(&bounds, ctx.render_target.scale_factor(), target_size)
            }
            None => ScissorRect::default(),
        };

        let state = self.targets.entry(target_id).or_default();
        let clipped = match state.scissor_stack.last() {
            Some(current) => current.intersect(&rect),
            None => rect,
        };
        if clipped.is_empty() {
            tracing::warn!(render_target = %target_id, ?rect, "scissor mask clips everything");
        }
        state.scissor_stack.push(clipped);

        let origin = ctx.graphics.scissor_origin();
        ctx.graphics
            .enable_scissor(clipped.to_origin(origin, target_size.1));
    }

    pub(super) fn pop_scissor_mask(&mut self, ctx: &mut MaskContext<'_>) -> Result<(), MaskError> {
        let target_id = ctx.render_target.id();
        let target_size = ctx.render_target.size();

        let restored = match self.targets.get_mut(&target_id) {
            Some(state) if state.scissor_active() => {
                state.scissor_stack.pop();
                Some(state.scissor_stack.last().copied())
            }
            _ => None,
        };
        let Some(previous) = restored else {
            return Err(self.fault(MaskError::UnbalancedStack {
                technique: MaskTechnique::Scissor,
            }));
        };

        match previous {
            Some(previous) => {
                let origin = ctx.graphics.scissor_origin();
                ctx.graphics
                    .enable_scissor(previous.to_origin(origin, target_size.1));
            }
            None => {
                self.targets.remove(&target_id);
                ctx.graphics.disable_scissor(target_size);
            }
        }

        Ok(())
    }
}
