use crate::graph::node::{GraphNode, RenderCtx};

use super::{
    processors::{self, Effect},
    EffectKind, EffectParams,
};

/// One slot in the rack: a processor plus the state the user sees.
pub struct EffectUnit {
    kind: EffectKind,
    enabled: bool,
    params: EffectParams,
    processor: Box<dyn Effect>,
}

impl EffectUnit {
    pub fn new(kind: EffectKind, sample_rate: f32) -> Self {
        Self {
            kind,
            enabled: false,
            params: EffectParams::default_for(kind),
            processor: processors::build(kind, sample_rate),
        }
    }

    pub fn kind(&self) -> EffectKind {
        self.kind
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Returns true when the flag actually changed. A unit coming back on
    /// starts from clean state so stale tails don't burst out.
    pub fn set_enabled(&mut self, enabled: bool) -> bool {
        if self.enabled == enabled {
            return false;
        }
        if enabled {
            self.processor.reset();
        }
        self.enabled = enabled;
        true
    }

    pub fn params(&self) -> &EffectParams {
        &self.params
    }

    /// Records for another kind are refused.
    pub fn set_params(&mut self, params: EffectParams) -> bool {
        if params.kind() != self.kind {
            return false;
        }
        self.params = params.clamped();
        self.processor.configure(&self.params);
        true
    }

    pub fn process(&mut self, left: &mut [f32], right: &mut [f32], ctx: &RenderCtx) {
        self.processor.render_block(left, right, ctx);
    }

    pub fn reset(&mut self) {
        self.processor.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effects::params::DelayParams;

    #[test]
    fn test_params_are_clamped_and_kind_checked() {
        let mut unit = EffectUnit::new(EffectKind::Delay, 48_000.0);
        assert!(unit.set_params(EffectParams::Delay(DelayParams {
            time: 5.0,
            feedback: -1.0,
            wet: 0.3,
        })));
        assert_eq!(
            unit.params(),
            &EffectParams::Delay(DelayParams {
                time: 1.0,
                feedback: 0.0,
                wet: 0.3,
            })
        );

        assert!(!unit.set_params(EffectParams::default_for(EffectKind::Reverb)));
        assert_eq!(unit.params().kind(), EffectKind::Delay);
    }

    #[test]
    fn test_toggling_reports_changes_only() {
        let mut unit = EffectUnit::new(EffectKind::Chorus, 48_000.0);
        assert!(!unit.is_enabled());
        assert!(unit.set_enabled(true));
        assert!(!unit.set_enabled(true));
        assert!(unit.set_enabled(false));
    }
}
