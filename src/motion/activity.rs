use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use glam::Vec2;

/// One requested action, owned by whoever issued it (AI, player orders).
///
/// The motion manager only reads the destination and calls [`kill`]
/// once the unit has stopped on it.
///
/// [`kill`]: Activity::kill
pub trait Activity: Send + Sync {
    /// Where the unit should go / face.  `None` when the activity has no
    /// meaningful target (e.g. its target unit is gone).
    fn target(&self) -> Option<Vec2>;

    /// The action is finished.
    fn kill(&mut self);
}

/// Go to / face a fixed point.
///
/// Clones share the killed flag, so the issuer can keep a clone to watch
/// for completion after handing the original to a motion manager.
#[derive(Debug, Clone)]
pub struct PointActivity {
    target: Vec2,
    killed: Arc<AtomicBool>,
}

impl PointActivity {
    pub fn new(target: Vec2) -> Self {
        Self {
            target,
            killed: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn is_killed(&self) -> bool {
        self.killed.load(Ordering::Acquire)
    }
}

impl Activity for PointActivity {
    fn target(&self) -> Option<Vec2> {
        Some(self.target)
    }

    fn kill(&mut self) {
        self.killed.store(true, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_the_kill() {
        let watcher = PointActivity::new(Vec2::new(3.0, 4.0));
        let mut handed_out = watcher.clone();
        assert_eq!(handed_out.target(), Some(Vec2::new(3.0, 4.0)));
        assert!(!watcher.is_killed());
        handed_out.kill();
        assert!(watcher.is_killed());
    }
}
