pub(crate) mod base_task;
pub(crate) mod task_queue;

pub use base_task::Task;
