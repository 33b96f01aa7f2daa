use std::collections::VecDeque;

/// Work deferred to the next paint frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameTask {
    /// Resolve the latest pointer position against the hover index.
    HoverQuery,
}

/// Single-threaded queue of tasks waiting for the next frame.
///
/// The host drains it once per frame. Tasks scheduled while a frame runs wait for the next one.
#[derive(Debug, Default)]
pub struct FrameQueue {
    tasks: VecDeque<FrameTask>,
}

impl FrameQueue {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, task: FrameTask) {
        self.tasks.push_back(task);
    }

    /// Drops every pending occurrence of `task`. Returns `true` if one was pending.
    pub fn cancel(&mut self, task: FrameTask) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|t| *t != task);
        self.tasks.len() != before
    }

    /// Takes the tasks of the current frame.
    pub fn take_frame(&mut self) -> Vec<FrameTask> {
        self.tasks.drain(..).collect()
    }

    #[must_use]
    pub fn is_pending(&self, task: FrameTask) -> bool {
        self.tasks.contains(&task)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}
