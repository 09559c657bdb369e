use grafo_mask::lyon::math::{point, vector, Angle, Box2D, Transform};
use grafo_mask::{
    MaskData, MaskError, MaskManager, MaskTechnique, ShapeMask, SpriteMask, TextureId,
};

use crate::backend::{RecordingBackend, TestDrawable};

pub const TARGET_WIDTH: u32 = 800;
pub const TARGET_HEIGHT: u32 = 600;

const AVATAR_TEXTURE_ID: u64 = 100;
const GLOW_TEXTURE_ID: u64 = 101;

// ── Mask builders ────────────────────────────────────────────────────────────

/// Axis-aligned rectangle mask covering `x..x+width, y..y+height` in world space.
pub fn rect_mask(x: f32, y: f32, width: f32, height: f32) -> MaskData {
    MaskData::from(ShapeMask::rect(
        Box2D::new(point(0.0, 0.0), point(width, height)),
        Transform::translation(x, y),
    ))
}

/// Rectangle mask rotated by `degrees` around its top-left corner, then moved to `(x, y)`.
pub fn rotated_rect_mask(x: f32, y: f32, width: f32, height: f32, degrees: f32) -> MaskData {
    MaskData::from(ShapeMask::rect(
        Box2D::new(point(0.0, 0.0), point(width, height)),
        Transform::rotation(Angle::degrees(degrees)).then_translate(vector(x, y)),
    ))
}

/// Right triangle with its right angle at `(x, y)`.
pub fn triangle_mask(x: f32, y: f32, size: f32) -> MaskData {
    let mut builder = grafo_mask::lyon::path::Path::builder();
    builder.begin(point(0.0, 0.0));
    builder.line_to(point(size, 0.0));
    builder.line_to(point(0.0, size));
    builder.close();
    MaskData::from(ShapeMask::polygon(
        builder.build(),
        Transform::translation(x, y),
    ))
}

pub fn sprite_mask(texture: u64, x: f32, y: f32, texture_size: (u32, u32)) -> MaskData {
    MaskData::from(SpriteMask::new(
        TextureId(texture),
        texture_size,
        Transform::translation(x, y),
    ))
}

// ── Scene graph ──────────────────────────────────────────────────────────────

pub struct SceneNode {
    pub label: &'static str,
    pub mask: Option<MaskData>,
}

impl SceneNode {
    fn group(label: &'static str) -> Self {
        Self { label, mask: None }
    }

    fn masked(label: &'static str, mask: MaskData) -> Self {
        Self {
            label,
            mask: Some(mask),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Push,
    Pop,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SceneEvent {
    pub label: &'static str,
    pub phase: Phase,
    pub technique: MaskTechnique,
}

/// Builds a scene that exercises every technique, nested scissors, and stencil taking
/// over once it is active.
///
/// ```text
/// root
/// ├── panel          axis-aligned rect      scissor
/// │   ├── inner      axis-aligned rect      scissor (intersected with panel)
/// │   │   └── badge  triangle               stencil
/// │   │       └── chip  axis-aligned rect   stencil (stencil already active)
/// │   └── avatar     texture                sprite
/// │       └── glow   texture                sprite (second pool slot)
/// ├── tilted         rect rotated 30°       stencil
/// └── card           rect rotated 90°       scissor
/// ```
pub fn build_clip_scene() -> easy_tree::Tree<SceneNode> {
    let mut tree = easy_tree::Tree::new();

    let root = tree.add_node(SceneNode::group("root"));

    let panel = tree.add_child(
        root,
        SceneNode::masked("panel", rect_mask(0.0, 0.0, 400.0, 300.0)),
    );
    let inner = tree.add_child(
        panel,
        SceneNode::masked("inner", rect_mask(100.0, 100.0, 400.0, 150.0)),
    );
    let badge = tree.add_child(
        inner,
        SceneNode::masked("badge", triangle_mask(120.0, 120.0, 40.0)),
    );
    tree.add_child(
        badge,
        SceneNode::masked("chip", rect_mask(125.0, 125.0, 10.0, 10.0)),
    );
    let avatar = tree.add_child(
        panel,
        SceneNode::masked("avatar", sprite_mask(AVATAR_TEXTURE_ID, 20.0, 20.0, (64, 64))),
    );
    tree.add_child(
        avatar,
        SceneNode::masked("glow", sprite_mask(GLOW_TEXTURE_ID, 10.0, 10.0, (84, 84))),
    );

    tree.add_child(
        root,
        SceneNode::masked("tilted", rotated_rect_mask(500.0, 300.0, 100.0, 50.0, 30.0)),
    );
    tree.add_child(
        root,
        SceneNode::masked("card", rotated_rect_mask(500.0, 100.0, 100.0, 50.0, 90.0)),
    );

    tree
}

/// The push/pop sequence [`build_clip_scene`] must produce.
pub fn clip_scene_expected_events() -> Vec<SceneEvent> {
    use MaskTechnique::{Scissor, Sprite, Stencil};
    use Phase::{Pop, Push};

    [
        ("panel", Push, Scissor),
        ("inner", Push, Scissor),
        ("badge", Push, Stencil),
        ("chip", Push, Stencil),
        ("chip", Pop, Stencil),
        ("badge", Pop, Stencil),
        ("inner", Pop, Scissor),
        ("avatar", Push, Sprite),
        ("glow", Push, Sprite),
        ("glow", Pop, Sprite),
        ("avatar", Pop, Sprite),
        ("panel", Pop, Scissor),
        ("tilted", Push, Stencil),
        ("tilted", Pop, Stencil),
        ("card", Push, Scissor),
        ("card", Pop, Scissor),
    ]
    .into_iter()
    .map(|(label, phase, technique)| SceneEvent {
        label,
        phase,
        technique,
    })
    .collect()
}

struct TraversalState<'a> {
    manager: &'a mut MaskManager,
    backend: &'a mut RecordingBackend,
    drawable: TestDrawable,
    events: Vec<SceneEvent>,
    error: Option<MaskError>,
}

/// Walks the scene depth-first, pushing each node's mask before its children and popping it
/// after them.
pub fn run_scene(
    tree: &mut easy_tree::Tree<SceneNode>,
    manager: &mut MaskManager,
    backend: &mut RecordingBackend,
) -> Result<Vec<SceneEvent>, MaskError> {
    let mut state = TraversalState {
        manager,
        backend,
        drawable: TestDrawable::default(),
        events: Vec::new(),
        error: None,
    };

    let pre_fn = |_node_id: usize, node: &mut SceneNode, state: &mut TraversalState| {
        if state.error.is_some() {
            return;
        }
        let Some(mask) = node.mask.as_mut() else {
            return;
        };
        let mut ctx = state.backend.context();
        match state.manager.push_mask(&mut ctx, &mut state.drawable, mask) {
            Ok(technique) => state.events.push(SceneEvent {
                label: node.label,
                phase: Phase::Push,
                technique,
            }),
            Err(error) => state.error = Some(error),
        }
    };

    let post_fn = |_node_id: usize, node: &mut SceneNode, state: &mut TraversalState| {
        if state.error.is_some() {
            return;
        }
        let Some(mask) = node.mask.as_ref() else {
            return;
        };
        let mut ctx = state.backend.context();
        match state.manager.pop_mask(&mut ctx, mask) {
            Ok(technique) => state.events.push(SceneEvent {
                label: node.label,
                phase: Phase::Pop,
                technique,
            }),
            Err(error) => state.error = Some(error),
        }
    };

    tree.traverse_mut(pre_fn, post_fn, &mut state);

    match state.error {
        Some(error) => Err(error),
        None => Ok(state.events),
    }
}
