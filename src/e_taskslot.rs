use crate::e_eventdispatcher::TaskSink;
use crate::e_types::Task;
use log::debug;

/// Category passed along with every flushed task.
pub const TASK_CATEGORY: usize = 1;

/// The single pending-task slot every parser owns.
///
/// A parser is either `Idle` or holds exactly one `Pending` task together with
/// the number of output lines folded into it so far.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TaskSlot {
    #[default]
    Idle,
    Pending { task: Task, line_span: usize },
}

impl TaskSlot {
    pub fn is_pending(&self) -> bool {
        matches!(self, TaskSlot::Pending { .. })
    }

    pub fn task(&self) -> Option<&Task> {
        match self {
            TaskSlot::Idle => None,
            TaskSlot::Pending { task, .. } => Some(task),
        }
    }

    pub fn line_span(&self) -> Option<usize> {
        match self {
            TaskSlot::Idle => None,
            TaskSlot::Pending { line_span, .. } => Some(*line_span),
        }
    }

    /// Makes `task` the pending task with a span of one line.
    ///
    /// Whatever was pending before is replaced; callers flush first.
    pub fn start(&mut self, task: Task) {
        *self = TaskSlot::Pending { task, line_span: 1 };
    }

    /// Extends the pending task by one line. Returns `false` when idle.
    pub fn continue_with(&mut self, text: &str, trim_end: bool) -> bool {
        match self {
            TaskSlot::Idle => false,
            TaskSlot::Pending { task, line_span } => {
                task.append_line(text);
                if trim_end {
                    task.trim_description_end();
                }
                *line_span += 1;
                true
            }
        }
    }

    /// Hands the pending task to `sink` and goes back to idle. No-op when idle.
    pub fn flush<S: TaskSink + ?Sized>(&mut self, sink: &mut S) {
        if let TaskSlot::Pending { task, line_span } = std::mem::take(self) {
            debug!(
                "flushing {} task spanning {} line(s): {}",
                task.task_type,
                line_span,
                task.summary()
            );
            sink.add_task(task, line_span, TASK_CATEGORY);
        }
    }
}
