pub mod backend;
pub mod expectations;
pub mod scene;

pub use backend::{CommandLog, RecordedCommand, RecordingBackend, TestDrawable};
pub use expectations::{check_commands, check_scene_events};
pub use scene::{
    build_clip_scene, clip_scene_expected_events, rect_mask, rotated_rect_mask, run_scene,
    sprite_mask, triangle_mask, Phase, SceneEvent, SceneNode, TARGET_HEIGHT, TARGET_WIDTH,
};
