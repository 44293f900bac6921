use std::fmt;

/// Severity of a parsed build message.
///
/// Only `warning` and `error` keywords map to a real severity; `note:` lines and
/// additional-information lines carry `Unknown`.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "uses_serde", derive(serde::Serialize))]
#[cfg_attr(feature = "uses_serde", serde(rename_all = "lowercase"))]
pub enum TaskType {
    #[default]
    Unknown,
    Warning,
    Error,
}

impl TaskType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskType::Unknown => "unknown",
            TaskType::Warning => "warning",
            TaskType::Error => "error",
        }
    }
}

impl fmt::Display for TaskType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a task points to in the sources.
///
/// # Example
/// ```
/// use e_msvc_tasks::TaskLocation;
///
/// let loc = TaskLocation::file_line("main.cpp", 7);
/// assert_eq!(loc.file_path(), Some("main.cpp"));
/// assert_eq!(loc.line_number(), Some(7));
/// assert_eq!(TaskLocation::Unspecified.file_path(), None);
/// ```
#[derive(Debug, Clone, Hash, PartialEq, Eq, Default)]
#[cfg_attr(feature = "uses_serde", derive(serde::Serialize))]
#[cfg_attr(feature = "uses_serde", serde(tag = "kind", rename_all = "snake_case"))]
pub enum TaskLocation {
    /// Link-stage, command-line and nmake/jom messages.
    #[default]
    Unspecified,
    File {
        path: String,
    },
    FileLine {
        path: String,
        line: u32,
    },
    /// A line number whose file part was empty, e.g. `(42) : error ...`.
    Line {
        line: u32,
    },
}

impl TaskLocation {
    pub fn file(path: impl Into<String>) -> Self {
        TaskLocation::File { path: path.into() }
    }

    pub fn file_line(path: impl Into<String>, line: u32) -> Self {
        TaskLocation::FileLine {
            path: path.into(),
            line,
        }
    }

    pub fn line(line: u32) -> Self {
        TaskLocation::Line { line }
    }

    pub fn file_path(&self) -> Option<&str> {
        match self {
            TaskLocation::Unspecified | TaskLocation::Line { .. } => None,
            TaskLocation::File { path } | TaskLocation::FileLine { path, .. } => Some(path),
        }
    }

    pub fn line_number(&self) -> Option<u32> {
        match self {
            TaskLocation::FileLine { line, .. } | TaskLocation::Line { line } => Some(*line),
            _ => None,
        }
    }
}

impl fmt::Display for TaskLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskLocation::Unspecified => Ok(()),
            TaskLocation::File { path } => write!(f, "{}", path),
            TaskLocation::FileLine { path, line } => write!(f, "{}({})", path, line),
            TaskLocation::Line { line } => write!(f, "({})", line),
        }
    }
}

/// One structured build message.
///
/// The description is a sequence of lines joined by `\n`. Parsers grow it while
/// the task is pending; once a task reaches a [`crate::TaskSink`] nothing
/// touches it again.
#[derive(Debug, Clone, Hash, PartialEq, Eq, Default)]
#[cfg_attr(feature = "uses_serde", derive(serde::Serialize))]
pub struct Task {
    pub task_type: TaskType,
    pub description: String,
    pub location: TaskLocation,
}

impl Task {
    /// Builds a task the way compile-line matches produce them.
    pub fn compile(
        task_type: TaskType,
        description: impl Into<String>,
        location: TaskLocation,
    ) -> Self {
        Task {
            task_type,
            description: description.into(),
            location,
        }
    }

    pub fn file_path(&self) -> Option<&str> {
        self.location.file_path()
    }

    pub fn line_number(&self) -> Option<u32> {
        self.location.line_number()
    }

    /// The first description line, i.e. the message without its continuation.
    pub fn summary(&self) -> &str {
        self.description.lines().next().unwrap_or("")
    }

    pub fn description_lines(&self) -> impl Iterator<Item = &str> {
        self.description.split('\n')
    }

    /// Appends a continuation line.
    pub fn append_line(&mut self, text: &str) {
        self.description.push('\n');
        self.description.push_str(text);
    }

    pub fn trim_description_end(&mut self) {
        let len = self.description.trim_end().len();
        self.description.truncate(len);
    }
}

/// A task as handed to the sink, together with the number of raw output lines
/// it was assembled from.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "uses_serde", derive(serde::Serialize))]
pub struct EmittedTask {
    pub task: Task,
    pub line_span: usize,
    pub category: usize,
}

/// Output channel a line arrived on.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, clap::ValueEnum)]
pub enum Channel {
    Stdout,
    Stderr,
}

impl Channel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Channel::Stdout => "stdout",
            Channel::Stderr => "stderr",
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
