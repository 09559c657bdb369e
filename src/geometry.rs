use crate::MathRect;

/// A scissor rectangle in physical pixels.
///
/// Internally rectangles use a top-left origin, like the scene. They are converted with
/// [`ScissorRect::to_origin`] right before being handed to a [`crate::GraphicsContext`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ScissorRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Where the vertical axis of a backend's scissor coordinates starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScissorOrigin {
    /// GL-style framebuffer coordinates, y grows upwards.
    #[default]
    BottomLeft,
    /// wgpu/Vulkan/Metal-style coordinates, same orientation as the scene.
    TopLeft,
}

impl ScissorRect {
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Intersect two scissor rects, returning the overlapping region.
    /// If the rects don't overlap, returns a zero-size rect.
    pub fn intersect(&self, other: &ScissorRect) -> ScissorRect {
        let a_right = self.x + self.width;
        let a_bottom = self.y + self.height;
        let b_right = other.x + other.width;
        let b_bottom = other.y + other.height;

        let left = self.x.max(other.x);
        let top = self.y.max(other.y);
        let right = a_right.min(b_right);
        let bottom = a_bottom.min(b_bottom);

        ScissorRect {
            x: left,
            y: top,
            width: right.saturating_sub(left),
            height: bottom.saturating_sub(top),
        }
    }

    /// Converts a top-left based rect into the coordinate system of the backend.
    ///
    /// For [`ScissorOrigin::BottomLeft`] the vertical origin becomes
    /// `target_height - y - height`.
    pub fn to_origin(&self, origin: ScissorOrigin, target_height: u32) -> ScissorRect {
        match origin {
            ScissorOrigin::TopLeft => *self,
            ScissorOrigin::BottomLeft => ScissorRect {
                y: target_height.saturating_sub(self.y + self.height),
                ..*self
            },
        }
    }
}

/// Rotation component of a 2D affine transform, quantized to the nearest whole degree.
#[inline]
pub fn rotation_degrees(transform: &lyon::math::Transform) -> i32 {
    transform.m12.atan2(transform.m11).to_degrees().round() as i32
}

/// True when a quantized rotation keeps an axis-aligned rect axis-aligned.
#[inline]
pub fn is_axis_aligned(rotation_degrees: i32) -> bool {
    rotation_degrees.rem_euclid(90) == 0
}

/// Converts logical world-space bounds into a physical scissor rect, clamped to the target.
pub fn physical_scissor_rect(
    bounds: &MathRect,
    scale_factor: f64,
    physical_size: (u32, u32),
) -> ScissorRect {
    let sf = scale_factor as f32;
    let px_min_x = ((bounds.min.x * sf).floor().max(0.0) as u32).min(physical_size.0);
    let px_min_y = ((bounds.min.y * sf).floor().max(0.0) as u32).min(physical_size.1);
    let px_max_x = (bounds.max.x * sf).ceil().clamp(0.0, physical_size.0 as f32) as u32;
    let px_max_y = (bounds.max.y * sf).ceil().clamp(0.0, physical_size.1 as f32) as u32;

    ScissorRect {
        x: px_min_x,
        y: px_min_y,
        width: px_max_x.saturating_sub(px_min_x),
        height: px_max_y.saturating_sub(px_min_y),
    }
}
