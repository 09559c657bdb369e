use crate::MaskTechnique;

/// Contract violations detected by the mask manager.
///
/// None of these are recoverable runtime conditions: they mean the caller broke the
/// push/pop discipline or passed unusable mask data.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MaskError {
    /// `pop_mask` was called without a matching push on the stack it resolved to.
    #[error("pop_mask called without a matching push on the {technique} stack")]
    UnbalancedStack { technique: MaskTechnique },
    /// The mask data carries neither a usable texture nor usable shape information.
    #[error("invalid mask data: {0}")]
    InvalidMaskData(String),
    /// An alpha mask pool slot was addressed outside of the pool.
    #[error("alpha mask pool index {depth} is out of range (pool size {len})")]
    PoolIndex { depth: usize, len: usize },
}
