use super::*;
use crate::context::{MaskContext, MaskTarget};
use crate::geometry::{is_axis_aligned, rotation_degrees};
use crate::mask_data::{MaskData, ShapeType};

/// Chooses how a mask is applied when it is pushed.
///
/// Texture masks always go through the alpha mask filter. Shape masks use the scissor test
/// only when it is enabled, no stencil mask is active on the target, the shape is a
/// rectangle and its rotation is a multiple of 90 degrees. Everything else uses the stencil.
pub fn select_push_technique(
    mask: &MaskData,
    scissor_enabled: bool,
    stencil_depth: usize,
) -> MaskTechnique {
    match mask {
        MaskData::Sprite(_) => MaskTechnique::Sprite,
        MaskData::Shape(shape) => {
            if scissor_enabled && stencil_depth == 0 && shape.shape_type() == ShapeType::Rectangle
            {
                if is_axis_aligned(rotation_degrees(&shape.world_transform)) {
                    MaskTechnique::Scissor
                } else {
                    MaskTechnique::Stencil
                }
            } else {
                MaskTechnique::Stencil
            }
        }
    }
}

/// Chooses which stack a mask is popped from.
///
/// Unlike [`select_push_technique`] this looks only at what is active now: a non-texture
/// mask pops the stencil whenever the stencil stack is non-empty, and the scissor otherwise.
pub fn select_pop_technique(mask: &MaskData, stencil_depth: usize) -> MaskTechnique {
    match mask {
        MaskData::Sprite(_) => MaskTechnique::Sprite,
        MaskData::Shape(_) if stencil_depth == 0 => MaskTechnique::Scissor,
        MaskData::Shape(_) => MaskTechnique::Stencil,
    }
}

impl MaskManager {
    /// Restricts subsequent draws into `target` to the visible region of `mask`.
    ///
    /// Every push has to be matched by a [`MaskManager::pop_mask`] with the same mask data,
    /// in strict last-in-first-out order.
    pub fn push_mask(
        &mut self,
        ctx: &mut MaskContext<'_>,
        target: &mut dyn MaskTarget,
        mask: &mut MaskData,
    ) -> Result<MaskTechnique, MaskError> {
        if let Err(error) = mask.validate() {
            return Err(self.fault(error));
        }

        let technique =
            select_push_technique(mask, self.config.scissor_enabled, ctx.stencil.depth());

        tracing::trace!(
            %technique,
            render_target = %ctx.render_target.id(),
            stencil_depth = ctx.stencil.depth(),
            alpha_mask_depth = self.alpha_mask_pool.depth(),
            "push mask"
        );

        match (technique, mask) {
            (MaskTechnique::Sprite, MaskData::Sprite(sprite)) => {
                self.push_sprite_mask(ctx, target, sprite)
            }
            (MaskTechnique::Scissor, MaskData::Shape(shape)) => self.push_scissor_mask(ctx, shape),
            (MaskTechnique::Stencil, MaskData::Shape(shape)) => self.push_stencil_mask(ctx, shape),
            // select_push_technique maps textures to Sprite and shapes to Scissor or Stencil.
            (technique, _) => unreachable!("{technique} chosen for a mask it cannot apply"),
        }

        Ok(technique)
    }

    /// Removes the innermost mask pushed with [`MaskManager::push_mask`].
    pub fn pop_mask(
        &mut self,
        ctx: &mut MaskContext<'_>,
        mask: &MaskData,
    ) -> Result<MaskTechnique, MaskError> {
        let technique = select_pop_technique(mask, ctx.stencil.depth());

        tracing::trace!(
            %technique,
            render_target = %ctx.render_target.id(),
            stencil_depth = ctx.stencil.depth(),
            alpha_mask_depth = self.alpha_mask_pool.depth(),
            "pop mask"
        );

        match technique {
            MaskTechnique::Sprite => self.pop_sprite_mask(ctx)?,
            MaskTechnique::Scissor => self.pop_scissor_mask(ctx)?,
            MaskTechnique::Stencil => self.pop_stencil_mask(ctx),
        }

        Ok(technique)
    }
}
