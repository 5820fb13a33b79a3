use std::borrow::Cow;

/// Unit type id the entity was spawned from.
///
/// Motion data lives in two further components: the sprite-facing
/// [`Body`](crate::motion::Body) and its
/// [`MotionManager`](crate::motion::MotionManager).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Class(pub Cow<'static, str>);

impl Class {
    #[inline]
    pub fn id(&self) -> &str {
        &self.0
    }
}
