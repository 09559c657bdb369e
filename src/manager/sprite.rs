use super::*;
use crate::context::{MaskContext, MaskTarget};
use crate::mask_data::SpriteMask;

impl MaskManager {
    pub(super) fn push_sprite_mask(
        &mut self,
        ctx: &mut MaskContext<'_>,
        target: &mut dyn MaskTarget,
        sprite: &SpriteMask,
    ) {
        let filter = self.alpha_mask_pool.acquire(*sprite);

        target.set_filter_area(sprite.bounds());
        ctx.filters
            .push_filter(target, std::slice::from_ref(&filter));

        self.alpha_mask_pool.advance();
    }

    pub(super) fn pop_sprite_mask(&mut self, ctx: &mut MaskContext<'_>) -> Result<(), MaskError> {
        if self.alpha_mask_pool.depth() == 0 {
            return Err(self.fault(MaskError::UnbalancedStack {
                technique: MaskTechnique::Sprite,
            }));
        }

        ctx.filters.pop_filter();
        self.alpha_mask_pool.retreat()
    }
}
