use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::trace;

use super::effects::{Effect, EffectCtx, Progress};

/// Active effects of one unit, in execution order.
///
/// The per-tick pass walks the queue front to back.  Sequential effects
/// run one at a time: the first one that is still busy holds back every
/// sequential effect queued after it.  Concurrent effects tick on every
/// pass wherever they sit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EffectQueue {
    effects: SmallVec<[Effect; 8]>,
}

impl EffectQueue {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn add_effect(&mut self, effect: Effect) {
        self.effects.push(effect);
    }

    /// Queue `effect` ahead of everything already waiting.
    #[inline]
    pub fn add_effect_to_top(&mut self, effect: Effect) {
        self.effects.insert(0, effect);
    }

    #[inline]
    pub fn reset_effects(&mut self) {
        self.effects.clear();
    }

    /// Run `effect`'s one-shot setup now, outside the tick cadence.
    #[inline]
    pub fn execute(&self, effect: Effect, ctx: &mut EffectCtx) {
        effect.apply(ctx);
    }

    /// Drop every queued instance of `effect`.  Returns `true` if any was queued.
    pub fn remove_effect(&mut self, effect: Effect) -> bool {
        let before = self.effects.len();
        self.effects.retain(|e| *e != effect);
        self.effects.len() != before
    }

    /// One tick pass.
    pub fn update_effects(&mut self, ctx: &mut EffectCtx) {
        let mut blocked = false;
        let mut i = 0;
        while i < self.effects.len() {
            let effect = self.effects[i];
            if blocked && !effect.is_concurrent() {
                i += 1;
                continue;
            }
            match effect.tick(ctx) {
                Progress::Complete => {
                    trace!(effect = effect.name(), "effect complete");
                    self.effects.remove(i);
                }
                Progress::Continue => {
                    blocked |= !effect.is_concurrent();
                    i += 1;
                }
            }
        }
    }

    /// First effect that is not concurrent, i.e. the running step of the sequence.
    #[inline]
    pub fn next_sequential(&self) -> Option<Effect> {
        self.iter().find(|e| !e.is_concurrent())
    }

    #[inline]
    pub fn contains(&self, effect: Effect) -> bool {
        self.effects.contains(&effect)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.effects.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.effects.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Effect> + '_ {
        self.effects.iter().copied()
    }

    /// Registry names in queue order.
    pub fn names(&self) -> Vec<&'static str> {
        self.iter().map(Effect::name).collect()
    }
}
