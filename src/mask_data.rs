//! Mask descriptions handed to [`crate::MaskManager`] for a single push/pop pair.
//!
//! A mask is either a texture whose alpha channel restricts drawing ([`SpriteMask`]) or a
//! shape whose filled area does ([`ShapeMask`]). Shape masks are further split into
//! rectangles, which may be clipped with the scissor test, and arbitrary polygons, which
//! always need the stencil buffer.
//!
//! # Examples
//!
//! ```rust
//! use grafo_mask::{MaskData, ShapeMask, ShapeType};
//! use grafo_mask::lyon::math::{point, Box2D, Transform};
//!
//! let mask = ShapeMask::rect(
//!     Box2D::new(point(10.0, 20.0), point(110.0, 70.0)),
//!     Transform::identity(),
//! );
//! assert_eq!(mask.shape_type(), ShapeType::Rectangle);
//!
//! let mask_data = MaskData::from(mask);
//! assert!(mask_data.texture().is_none());
//! ```

use std::ops::Deref;

use crate::error::MaskError;
use crate::id::TextureId;
use crate::MathRect;
use lyon::math::Transform;

/// Geometry of a shape mask, in the shape's local space.
#[derive(Debug, Clone)]
pub enum MaskGeometry {
    /// An axis-aligned rectangle in local space.
    Rect(MathRect),
    /// An arbitrary filled path.
    Polygon(lyon::path::Path),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeType {
    Rectangle,
    Polygon,
}

/// A texture-based alpha mask.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpriteMask {
    pub texture: TextureId,
    /// Size of the mask texture in texels.
    pub texture_size: (u32, u32),
    /// Places the texture's `(0, 0)..texture_size` quad in the scene.
    pub world_transform: Transform,
    /// World-space bounds of the mask, used as the filter area of the masked target.
    pub bounds: MathRect,
}

impl SpriteMask {
    /// Creates a sprite mask whose bounds are the transformed texture quad.
    pub fn new(texture: TextureId, texture_size: (u32, u32), world_transform: Transform) -> Self {
        let local = MathRect::new(
            lyon::math::point(0.0, 0.0),
            lyon::math::point(texture_size.0 as f32, texture_size.1 as f32),
        );
        Self {
            texture,
            texture_size,
            world_transform,
            bounds: world_transform.outer_transformed_box(&local),
        }
    }

    pub fn bounds(&self) -> MathRect {
        self.bounds
    }

    fn validate(&self) -> Result<(), MaskError> {
        if self.texture_size.0 == 0 || self.texture_size.1 == 0 {
            return Err(MaskError::InvalidMaskData(format!(
                "sprite mask texture {} has zero size",
                self.texture
            )));
        }
        if !transform_is_finite(&self.world_transform) {
            return Err(MaskError::InvalidMaskData(format!(
                "sprite mask texture {} has a non-finite world transform",
                self.texture
            )));
        }
        if !(self.bounds.min.x.is_finite()
            && self.bounds.min.y.is_finite()
            && self.bounds.max.x.is_finite()
            && self.bounds.max.y.is_finite())
        {
            return Err(MaskError::InvalidMaskData(format!(
                "sprite mask texture {} has non-finite bounds",
                self.texture
            )));
        }
        Ok(())
    }
}

/// A shape-based mask.
#[derive(Debug, Clone)]
pub struct ShapeMask {
    pub geometry: MaskGeometry,
    pub world_transform: Transform,
    /// Masks are usually not drawn themselves, so they are not renderable outside of a
    /// [`RenderableGuard`] scope.
    pub renderable: bool,
}

impl ShapeMask {
    pub fn new(geometry: MaskGeometry, world_transform: Transform) -> Self {
        Self {
            geometry,
            world_transform,
            renderable: false,
        }
    }

    pub fn rect(rect: MathRect, world_transform: Transform) -> Self {
        Self::new(MaskGeometry::Rect(rect), world_transform)
    }

    pub fn polygon(path: lyon::path::Path, world_transform: Transform) -> Self {
        Self::new(MaskGeometry::Polygon(path), world_transform)
    }

    pub fn shape_type(&self) -> ShapeType {
        match self.geometry {
            MaskGeometry::Rect(_) => ShapeType::Rectangle,
            MaskGeometry::Polygon(_) => ShapeType::Polygon,
        }
    }

    /// World-space bounds of the transformed geometry.
    ///
    /// Returns `None` while the mask is not renderable, matching how non-renderable
    /// nodes are skipped by bounds computation in the scene graph.
    pub fn bounds(&self) -> Option<MathRect> {
        if !self.renderable {
            return None;
        }

        let bounds = match &self.geometry {
            MaskGeometry::Rect(rect) => self.world_transform.outer_transformed_box(rect),
            MaskGeometry::Polygon(path) => {
                let transformed = path.clone().transformed(&self.world_transform);
                lyon::algorithms::aabb::bounding_box(&transformed)
            }
        };

        Some(bounds)
    }

    fn validate(&self) -> Result<(), MaskError> {
        if !transform_is_finite(&self.world_transform) {
            return Err(MaskError::InvalidMaskData(
                "shape mask has a non-finite world transform".to_string(),
            ));
        }
        match &self.geometry {
            MaskGeometry::Rect(rect) => {
                if !(rect.min.x.is_finite()
                    && rect.min.y.is_finite()
                    && rect.max.x.is_finite()
                    && rect.max.y.is_finite())
                {
                    return Err(MaskError::InvalidMaskData(
                        "shape mask rectangle has non-finite coordinates".to_string(),
                    ));
                }
            }
            MaskGeometry::Polygon(path) => {
                if path.iter().next().is_none() {
                    return Err(MaskError::InvalidMaskData(
                        "shape mask polygon has no path events".to_string(),
                    ));
                }
            }
        }
        Ok(())
    }
}

/// Forces a shape mask renderable for the lifetime of the guard.
///
/// The previous value of the flag is restored when the guard is dropped, including on early
/// returns and unwinding.
pub struct RenderableGuard<'a> {
    shape: &'a mut ShapeMask,
    previous: bool,
}

impl<'a> RenderableGuard<'a> {
    pub fn new(shape: &'a mut ShapeMask) -> Self {
        let previous = shape.renderable;
        shape.renderable = true;
        Self { shape, previous }
    }
}

impl Deref for RenderableGuard<'_> {
    type Target = ShapeMask;

    fn deref(&self) -> &ShapeMask {
        self.shape
    }
}

impl Drop for RenderableGuard<'_> {
    fn drop(&mut self) {
        self.shape.renderable = self.previous;
    }
}

/// What a push/pop pair clips to.
#[derive(Debug, Clone)]
pub enum MaskData {
    Sprite(SpriteMask),
    Shape(ShapeMask),
}

impl MaskData {
    pub fn texture(&self) -> Option<TextureId> {
        match self {
            MaskData::Sprite(sprite) => Some(sprite.texture),
            MaskData::Shape(_) => None,
        }
    }

    pub fn world_transform(&self) -> &Transform {
        match self {
            MaskData::Sprite(sprite) => &sprite.world_transform,
            MaskData::Shape(shape) => &shape.world_transform,
        }
    }

    /// Rejects masks that carry no usable texture or shape information.
    pub fn validate(&self) -> Result<(), MaskError> {
        match self {
            MaskData::Sprite(sprite) => sprite.validate(),
            MaskData::Shape(shape) => shape.validate(),
        }
    }
}

impl From<SpriteMask> for MaskData {
    fn from(sprite: SpriteMask) -> Self {
        MaskData::Sprite(sprite)
    }
}

impl From<ShapeMask> for MaskData {
    fn from(shape: ShapeMask) -> Self {
        MaskData::Shape(shape)
    }
}

fn transform_is_finite(transform: &Transform) -> bool {
    transform.to_array().iter().all(|value| value.is_finite())
}
