use super::base_task::Task;
use std::collections::VecDeque;

/// FIFO queue of autopilot tasks. The front element is the active task.
///
/// Only the autopilot on the simulation thread touches the queue, so unlike a
/// shared schedule it carries no lock.
#[derive(Debug, Default)]
pub(crate) struct TaskQueue {
    /// The queued tasks, front first.
    queue: VecDeque<Task>,
}

impl TaskQueue {
    /// Creates a new, empty `TaskQueue`.
    pub fn new() -> Self { Self { queue: VecDeque::new() } }

    /// Adds a new task to the back of the queue.
    pub fn push(&mut self, task: Task) { self.queue.push_back(task); }

    /// Inserts a task in front of all others, making it the active one.
    pub fn push_front(&mut self, task: Task) { self.queue.push_front(task); }

    /// Removes and returns the task at the front of the queue.
    ///
    /// # Returns
    /// - An `Option<Task>` containing the removed task, or `None` if the queue is empty.
    pub fn pop(&mut self) -> Option<Task> { self.queue.pop_front() }

    /// Returns a reference to the active task without removing it.
    pub fn front(&self) -> Option<&Task> { self.queue.front() }

    /// Returns the number of queued tasks, including the active one.
    pub fn len(&self) -> usize { self.queue.len() }

    /// Checks if the task queue is empty.
    pub fn is_empty(&self) -> bool { self.queue.is_empty() }

    /// Clears all tasks from the queue.
    pub fn clear(&mut self) { self.queue.clear(); }

    /// Iterates over the queued tasks, front first.
    pub fn iter(&self) -> impl Iterator<Item = &Task> { self.queue.iter() }
}
