/// Options for [`Emitter::with_options`](crate::Emitter::with_options).
#[derive(Debug, Clone, Default)]
pub struct EmitterOptions {
    /// Listener count per event above which a possible-leak warning is
    /// logged. Registration is never refused. `None` disables the check.
    pub max_listeners: Option<usize>,
}

impl EmitterOptions {
    pub fn max_listeners(mut self, limit: usize) -> Self {
        self.max_listeners = Some(limit);
        self
    }
}
