//! Interfaces of the systems the mask manager drives.
//!
//! The manager never touches ambient GPU state. Every push and pop receives a
//! [`MaskContext`] holding the render target and the peer stacks it is allowed to mutate.

use crate::filter::AlphaMaskFilterHandle;
use crate::geometry::{ScissorOrigin, ScissorRect};
use crate::id::RenderTargetId;
use crate::mask_data::ShapeMask;
use crate::MathRect;

/// The render target that masked content is drawn into.
pub trait RenderTarget {
    fn id(&self) -> RenderTargetId;

    /// Size of the target in physical pixels.
    fn size(&self) -> (u32, u32);

    /// Ratio between physical pixels and the logical units mask bounds are expressed in.
    fn scale_factor(&self) -> f64 {
        1.0
    }
}

/// The drawable being masked.
pub trait MaskTarget {
    /// Restricts the area a filter pass applied to this drawable has to cover.
    fn set_filter_area(&mut self, area: MathRect);
}

/// Hardware scissor test of the active graphics context.
///
/// Both commands are idempotent: enabling twice with the same rect, or disabling an
/// already disabled test, has no further effect.
pub trait GraphicsContext {
    fn scissor_origin(&self) -> ScissorOrigin {
        ScissorOrigin::BottomLeft
    }

    /// Enables the scissor test with a rect already expressed in this context's origin.
    fn enable_scissor(&mut self, rect: ScissorRect);

    fn disable_scissor(&mut self, target_size: (u32, u32));
}

/// Nested stencil masks of a render target.
pub trait StencilStack {
    fn push_stencil(&mut self, mask: &ShapeMask);

    fn pop_stencil(&mut self);

    /// Number of stencil masks currently pushed.
    fn depth(&self) -> usize;
}

/// Shader filter pipeline.
pub trait FilterStack {
    fn push_filter(&mut self, target: &mut dyn MaskTarget, filters: &[AlphaMaskFilterHandle]);

    fn pop_filter(&mut self);
}

/// The currently active draw batcher.
pub trait DrawBatch {
    /// Flushes in-flight batched draws.
    fn stop(&mut self);
}

/// Explicit handle to everything a mask strategy may touch.
pub struct MaskContext<'a> {
    pub render_target: &'a dyn RenderTarget,
    pub graphics: &'a mut dyn GraphicsContext,
    pub stencil: &'a mut dyn StencilStack,
    pub filters: &'a mut dyn FilterStack,
    pub batch: &'a mut dyn DrawBatch,
}

impl<'a> MaskContext<'a> {
    pub fn new(
        render_target: &'a dyn RenderTarget,
        graphics: &'a mut dyn GraphicsContext,
        stencil: &'a mut dyn StencilStack,
        filters: &'a mut dyn FilterStack,
        batch: &'a mut dyn DrawBatch,
    ) -> Self {
        Self {
            render_target,
            graphics,
            stencil,
            filters,
            batch,
        }
    }
}

/// wgpu has no scissor enable flag; a render pass always clips to its scissor rect,
/// so disabling means resetting it to cover the whole target.
impl GraphicsContext for wgpu::RenderPass<'_> {
    fn scissor_origin(&self) -> ScissorOrigin {
        ScissorOrigin::TopLeft
    }

    fn enable_scissor(&mut self, rect: ScissorRect) {
        self.set_scissor_rect(rect.x, rect.y, rect.width, rect.height);
    }

    fn disable_scissor(&mut self, target_size: (u32, u32)) {
        self.set_scissor_rect(0, 0, target_size.0, target_size.1);
    }
}
