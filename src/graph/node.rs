/// Context passed to nodes during rendering.
///
/// - sample_rate: audio sample rate (e.g., 48000.0)
/// - frame: engine clock at the first sample of the block
#[derive(Debug, Clone, Copy)]
pub struct RenderCtx {
    pub sample_rate: f32,
    pub frame: u64,
}

impl RenderCtx {
    pub fn new(sample_rate: f32) -> Self {
        Self {
            sample_rate,
            frame: 0,
        }
    }

    pub fn at_frame(self, frame: u64) -> Self {
        Self { frame, ..self }
    }

    /// Seconds elapsed on the engine clock at the start of the block.
    pub fn time(&self) -> f64 {
        self.frame as f64 / self.sample_rate as f64
    }
}

/// Core trait for stereo processing stages in the effects graph.
///
/// Nodes process a block in place. Left and right always have equal length.
pub trait GraphNode: Send {
    fn render_block(&mut self, left: &mut [f32], right: &mut [f32], ctx: &RenderCtx);

    /// Clear internal state (delay lines, filter memories, LFO phase).
    ///
    /// Default implementation does nothing (stateless nodes).
    fn reset(&mut self) {}
}

/// Allow boxed graph nodes to be used as graph nodes (for dynamic dispatch)
impl GraphNode for Box<dyn GraphNode> {
    fn render_block(&mut self, left: &mut [f32], right: &mut [f32], ctx: &RenderCtx) {
        (**self).render_block(left, right, ctx)
    }

    fn reset(&mut self) {
        (**self).reset()
    }
}
