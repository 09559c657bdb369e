/// Lifecycle hooks shared by the renderer's subsystems.
pub trait RendererSystem {
    /// Called after the graphics context was lost and recreated. GPU-side handles held by
    /// the system are no longer valid.
    fn on_context_change(&mut self);

    /// Releases everything the system holds. The system is not used afterwards.
    fn destroy(&mut self);
}
