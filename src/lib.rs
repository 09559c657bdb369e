//! Mask strategy selection for GPU-accelerated 2D rendering.
//!
//! [`MaskManager`] decides, for every mask pushed during scene traversal, whether the
//! cheapest correct clip is a scissor rectangle, a stencil mask or an alpha mask filter,
//! and keeps pushes and pops symmetric across those three stacks.
//!
//! The stencil stack, the filter pipeline, the draw batcher and the graphics context are
//! owned by the renderer and reached through the traits in [`MaskContext`].

pub use lyon;
pub use wgpu;

mod context;
mod error;
mod filter;
mod geometry;
mod id;
mod manager;
mod mask_data;
mod pool;
mod system;

pub type MathRect = lyon::math::Box2D;

pub use context::{
    DrawBatch, FilterStack, GraphicsContext, MaskContext, MaskTarget, RenderTarget, StencilStack,
};
pub use error::MaskError;
pub use filter::{AlphaMaskFilter, AlphaMaskFilterHandle, AlphaMaskUniforms, ALPHA_MASK_FS};
pub use geometry::{
    is_axis_aligned, physical_scissor_rect, rotation_degrees, ScissorOrigin, ScissorRect,
};
pub use id::{RenderTargetId, TextureId};
pub use manager::{
    select_pop_technique, select_push_technique, MaskManager, MaskManagerConfig, MaskTechnique,
};
pub use mask_data::{MaskData, MaskGeometry, RenderableGuard, ShapeMask, ShapeType, SpriteMask};
pub use system::RendererSystem;
