//! Alpha mask filter used for texture-based masks.
//!
//! The filter pipeline runs [`ALPHA_MASK_FS`] over the filter area of the masked target and
//! multiplies the rendered color by the alpha of the mask texture. The mask manager only
//! binds the current [`SpriteMask`] into a pooled filter; compiling and executing the pass is
//! the filter pipeline's job.

use std::cell::RefCell;
use std::rc::Rc;

use crate::mask_data::SpriteMask;
use lyon::math::Transform;

/// Shared handle to a pooled filter. Pool slots hand out clones of the same handle.
pub type AlphaMaskFilterHandle = Rc<RefCell<AlphaMaskFilter>>;

/// Fragment shader of the alpha mask pass.
///
/// Group 0 is the filter input provided by the filter pipeline, group 1 holds the
/// [`AlphaMaskUniforms`] followed by the mask texture and its sampler.
pub const ALPHA_MASK_FS: &str = r#"
@group(0) @binding(0) var t_input: texture_2d<f32>;
@group(0) @binding(1) var s_input: sampler;

struct AlphaMaskUniforms {
    mask_matrix: mat3x3<f32>,
    mask_bounds: vec4<f32>,
};

@group(1) @binding(0) var<uniform> mask: AlphaMaskUniforms;
@group(1) @binding(1) var t_mask: texture_2d<f32>;
@group(1) @binding(2) var s_mask: sampler;

@fragment
fn fs_alpha_mask(
    @builtin(position) frag_coord: vec4<f32>,
    @location(0) uv: vec2<f32>,
) -> @location(0) vec4<f32> {
    let color = textureSample(t_input, s_input, uv);
    let mask_uv = (mask.mask_matrix * vec3<f32>(frag_coord.xy, 1.0)).xy;
    let mask_texel = textureSample(t_mask, s_mask, clamp(mask_uv, vec2<f32>(0.0), vec2<f32>(1.0)));
    let inside = all(mask_uv >= vec2<f32>(0.0)) && all(mask_uv <= vec2<f32>(1.0));
    return color * select(0.0, mask_texel.a, inside);
}
"#;

/// Uniform block of [`ALPHA_MASK_FS`].
///
/// `mask_matrix` holds the three columns of a `mat3x3<f32>`, each padded to a `vec4`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct AlphaMaskUniforms {
    pub mask_matrix: [[f32; 4]; 3],
    /// `min.x, min.y, max.x, max.y` of the mask bounds in logical units.
    pub mask_bounds: [f32; 4],
}

#[derive(Debug)]
pub struct AlphaMaskFilter {
    mask: SpriteMask,
    bind_count: u64,
}

impl AlphaMaskFilter {
    pub fn new(mask: SpriteMask) -> Self {
        Self {
            mask,
            bind_count: 0,
        }
    }

    /// Points the filter at a new mask. Called on every reuse of a pooled filter.
    pub fn bind(&mut self, mask: SpriteMask) {
        self.mask = mask;
        self.bind_count += 1;
    }

    pub fn mask(&self) -> &SpriteMask {
        &self.mask
    }

    /// How many times this filter has been bound to a mask.
    pub fn bind_count(&self) -> u64 {
        self.bind_count
    }

    pub fn fragment_shader(&self) -> &'static str {
        ALPHA_MASK_FS
    }

    /// Uniforms mapping physical fragment coordinates to mask texture coordinates.
    ///
    /// Returns `None` when the mask's world transform is not invertible, in which case the
    /// mask covers no area.
    pub fn uniforms(&self, scale_factor: f64) -> Option<AlphaMaskUniforms> {
        let inverse = self.mask.world_transform.inverse()?;
        let inv_scale = 1.0 / scale_factor as f32;
        let (width, height) = self.mask.texture_size;

        let m = Transform::scale(inv_scale, inv_scale)
            .then(&inverse)
            .then_scale(1.0 / width as f32, 1.0 / height as f32);

        let bounds = self.mask.bounds;
        Some(AlphaMaskUniforms {
            mask_matrix: [
                [m.m11, m.m12, 0.0, 0.0],
                [m.m21, m.m22, 0.0, 0.0],
                [m.m31, m.m32, 1.0, 0.0],
            ],
            mask_bounds: [bounds.min.x, bounds.min.y, bounds.max.x, bounds.max.y],
        })
    }
}
