use std::cell::RefCell;
use std::rc::Rc;

use grafo_mask::{
    AlphaMaskFilterHandle, DrawBatch, FilterStack, GraphicsContext, MaskContext, MaskTarget,
    MathRect, RenderTarget, RenderTargetId, ScissorOrigin, ScissorRect, ShapeMask, StencilStack,
    TextureId,
};

/// A command issued to one of the collaborators, in issue order.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordedCommand {
    BatchStop,
    /// Stencil depth after the push.
    StencilPush { depth: usize },
    /// Stencil depth after the pop.
    StencilPop { depth: usize },
    FilterPush { texture: TextureId, filter_count: usize },
    FilterPop,
    /// Rect as received by the graphics context, i.e. already in its origin.
    ScissorEnable(ScissorRect),
    ScissorDisable,
}

pub type CommandLog = Rc<RefCell<Vec<RecordedCommand>>>;

pub struct TestRenderTarget {
    pub id: RenderTargetId,
    pub size: (u32, u32),
    pub scale_factor: f64,
}

impl RenderTarget for TestRenderTarget {
    fn id(&self) -> RenderTargetId {
        self.id
    }

    fn size(&self) -> (u32, u32) {
        self.size
    }

    fn scale_factor(&self) -> f64 {
        self.scale_factor
    }
}

pub struct RecordingGraphics {
    log: CommandLog,
    pub origin: ScissorOrigin,
    /// Current scissor rect, `None` while the test is disabled.
    pub scissor: Option<ScissorRect>,
}

impl GraphicsContext for RecordingGraphics {
    fn scissor_origin(&self) -> ScissorOrigin {
        self.origin
    }

    fn enable_scissor(&mut self, rect: ScissorRect) {
        self.scissor = Some(rect);
        self.log.borrow_mut().push(RecordedCommand::ScissorEnable(rect));
    }

    fn disable_scissor(&mut self, _target_size: (u32, u32)) {
        self.scissor = None;
        self.log.borrow_mut().push(RecordedCommand::ScissorDisable);
    }
}

pub struct RecordingStencil {
    log: CommandLog,
    depth: usize,
}

impl StencilStack for RecordingStencil {
    fn push_stencil(&mut self, _mask: &ShapeMask) {
        self.depth += 1;
        self.log
            .borrow_mut()
            .push(RecordedCommand::StencilPush { depth: self.depth });
    }

    fn pop_stencil(&mut self) {
        self.depth = self
            .depth
            .checked_sub(1)
            .expect("stencil popped more often than pushed");
        self.log
            .borrow_mut()
            .push(RecordedCommand::StencilPop { depth: self.depth });
    }

    fn depth(&self) -> usize {
        self.depth
    }
}

pub struct RecordingFilters {
    log: CommandLog,
    /// Filters currently pushed, innermost last.
    pub stack: Vec<AlphaMaskFilterHandle>,
    /// Every filter pushed since the last `take_commands`, in push order.
    pub history: Vec<AlphaMaskFilterHandle>,
}

impl FilterStack for RecordingFilters {
    fn push_filter(&mut self, _target: &mut dyn MaskTarget, filters: &[AlphaMaskFilterHandle]) {
        let texture = filters
            .first()
            .map(|filter| filter.borrow().mask().texture)
            .expect("filter push without filters");
        self.log.borrow_mut().push(RecordedCommand::FilterPush {
            texture,
            filter_count: filters.len(),
        });
        for filter in filters {
            self.stack.push(Rc::clone(filter));
            self.history.push(Rc::clone(filter));
        }
    }

    fn pop_filter(&mut self) {
        self.stack.pop().expect("filter popped more often than pushed");
        self.log.borrow_mut().push(RecordedCommand::FilterPop);
    }
}

pub struct RecordingBatch {
    log: CommandLog,
    pub stops: usize,
}

impl DrawBatch for RecordingBatch {
    fn stop(&mut self) {
        self.stops += 1;
        self.log.borrow_mut().push(RecordedCommand::BatchStop);
    }
}

/// In-memory stand-ins for every collaborator of the mask manager, sharing one command log.
pub struct RecordingBackend {
    pub target: TestRenderTarget,
    pub graphics: RecordingGraphics,
    pub stencil: RecordingStencil,
    pub filters: RecordingFilters,
    pub batch: RecordingBatch,
    log: CommandLog,
}

impl RecordingBackend {
    pub fn new(target_id: u64, size: (u32, u32)) -> Self {
        let log = CommandLog::default();
        Self {
            target: TestRenderTarget {
                id: RenderTargetId(target_id),
                size,
                scale_factor: 1.0,
            },
            graphics: RecordingGraphics {
                log: Rc::clone(&log),
                origin: ScissorOrigin::BottomLeft,
                scissor: None,
            },
            stencil: RecordingStencil {
                log: Rc::clone(&log),
                depth: 0,
            },
            filters: RecordingFilters {
                log: Rc::clone(&log),
                stack: Vec::new(),
                history: Vec::new(),
            },
            batch: RecordingBatch {
                log: Rc::clone(&log),
                stops: 0,
            },
            log,
        }
    }

    pub fn with_scale_factor(mut self, scale_factor: f64) -> Self {
        self.target.scale_factor = scale_factor;
        self
    }

    pub fn with_origin(mut self, origin: ScissorOrigin) -> Self {
        self.graphics.origin = origin;
        self
    }

    pub fn target_id(&self) -> RenderTargetId {
        self.target.id
    }

    pub fn context(&mut self) -> MaskContext<'_> {
        MaskContext::new(
            &self.target,
            &mut self.graphics,
            &mut self.stencil,
            &mut self.filters,
            &mut self.batch,
        )
    }

    pub fn commands(&self) -> Vec<RecordedCommand> {
        self.log.borrow().clone()
    }

    /// Returns the recorded commands and clears the log along with the filter history.
    pub fn take_commands(&mut self) -> Vec<RecordedCommand> {
        self.filters.history.clear();
        std::mem::take(&mut *self.log.borrow_mut())
    }
}

/// A drawable that remembers the filter area it was given.
#[derive(Debug, Default)]
pub struct TestDrawable {
    pub filter_area: Option<MathRect>,
}

impl MaskTarget for TestDrawable {
    fn set_filter_area(&mut self, area: MathRect) {
        self.filter_area = Some(area);
    }
}
