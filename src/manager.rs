use std::fmt;

use ahash::{HashMap, HashMapExt};
use smallvec::SmallVec;

use crate::error::MaskError;
use crate::filter::AlphaMaskFilterHandle;
use crate::geometry::ScissorRect;
use crate::id::RenderTargetId;
use crate::pool::AlphaMaskPool;
use crate::system::RendererSystem;

mod dispatch;
mod scissor;
mod sprite;
mod stencil;

pub use dispatch::{select_pop_technique, select_push_technique};

/// The clipping mechanism a mask was routed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MaskTechnique {
    /// Axis-aligned rectangle clipped by the hardware scissor test.
    Scissor,
    /// Arbitrary shape clipped through the stencil stack.
    Stencil,
    /// Texture alpha applied by a pooled filter pass.
    Sprite,
}

impl fmt::Display for MaskTechnique {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MaskTechnique::Scissor => write!(f, "scissor"),
            MaskTechnique::Stencil => write!(f, "stencil"),
            MaskTechnique::Sprite => write!(f, "sprite mask"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaskManagerConfig {
    /// Allows axis-aligned rectangle masks to use the scissor test instead of the stencil.
    pub scissor_enabled: bool,
    /// Panic on contract violations instead of logging them and carrying on.
    pub strict_faults: bool,
}

impl Default for MaskManagerConfig {
    fn default() -> Self {
        Self {
            scissor_enabled: true,
            strict_faults: cfg!(debug_assertions),
        }
    }
}

/// Scissor clips currently applied to one render target, innermost last.
#[derive(Debug, Default)]
pub(crate) struct MaskStackState {
    scissor_stack: SmallVec<[ScissorRect; 4]>,
}

impl MaskStackState {
    fn scissor_active(&self) -> bool {
        !self.scissor_stack.is_empty()
    }
}

/// Picks a clipping technique for every mask and keeps push/pop symmetric across the
/// scissor test, the stencil stack and the filter stack.
pub struct MaskManager {
    config: MaskManagerConfig,
    alpha_mask_pool: AlphaMaskPool,
    targets: HashMap<RenderTargetId, MaskStackState>,
}

impl Default for MaskManager {
    fn default() -> Self {
        Self::new()
    }
}

impl MaskManager {
    pub fn new() -> Self {
        Self::with_config(MaskManagerConfig::default())
    }

    pub fn with_config(config: MaskManagerConfig) -> Self {
        Self {
            config,
            alpha_mask_pool: AlphaMaskPool::new(),
            targets: HashMap::new(),
        }
    }

    pub fn config(&self) -> MaskManagerConfig {
        self.config
    }

    pub fn scissor_enabled(&self) -> bool {
        self.config.scissor_enabled
    }

    pub fn set_scissor_enabled(&mut self, scissor_enabled: bool) {
        self.config.scissor_enabled = scissor_enabled;
    }

    pub fn strict_faults(&self) -> bool {
        self.config.strict_faults
    }

    pub fn set_strict_faults(&mut self, strict_faults: bool) {
        self.config.strict_faults = strict_faults;
    }

    /// Number of sprite masks currently pushed.
    pub fn alpha_mask_depth(&self) -> usize {
        self.alpha_mask_pool.depth()
    }

    /// Number of pooled alpha mask filters, i.e. the deepest sprite-mask nesting seen so far.
    pub fn alpha_mask_pool_len(&self) -> usize {
        self.alpha_mask_pool.len()
    }

    pub fn alpha_mask_pool_entry(&self, depth: usize) -> Result<AlphaMaskFilterHandle, MaskError> {
        self.alpha_mask_pool.get(depth).cloned()
    }

    pub fn scissor_active(&self, target: RenderTargetId) -> bool {
        self.targets
            .get(&target)
            .is_some_and(MaskStackState::scissor_active)
    }

    pub fn scissor_depth(&self, target: RenderTargetId) -> usize {
        self.targets
            .get(&target)
            .map_or(0, |state| state.scissor_stack.len())
    }

    /// Number of render targets with a scissor clip currently applied.
    pub fn scissored_target_count(&self) -> usize {
        self.targets.len()
    }

    /// The scissor rect currently applied to `target`, in top-left physical pixels.
    pub fn current_scissor(&self, target: RenderTargetId) -> Option<ScissorRect> {
        self.targets
            .get(&target)
            .and_then(|state| state.scissor_stack.last().copied())
    }

    /// Reports a contract violation. Panics when strict faults are on, otherwise hands the
    /// error back so the caller can turn the operation into a no-op.
    fn fault(&self, error: MaskError) -> MaskError {
        tracing::error!(%error, "mask stack fault");
        if self.config.strict_faults {
            panic!("{error}");
        }
        error
    }
}

impl RendererSystem for MaskManager {
    fn on_context_change(&mut self) {
        tracing::debug!(
            pool_len = self.alpha_mask_pool.len(),
            targets = self.targets.len(),
            "graphics context changed, dropping mask state"
        );
        self.alpha_mask_pool.reset();
        self.targets.clear();
    }

    fn destroy(&mut self) {
        self.alpha_mask_pool.reset();
        self.targets.clear();
        self.targets.shrink_to_fit();
    }
}
