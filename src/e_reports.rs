use crate::e_config::OutputFormat;
use crate::e_types::{EmittedTask, Task, TaskLocation, TaskType};
use anyhow::Result;
use comfy_table::{Cell, ContentArrangement, Row, Table};
use nu_ansi_term::{Color, Style};
use std::fmt;

/// Counts of emitted tasks by severity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaskSummary {
    pub errors: usize,
    pub warnings: usize,
    pub other: usize,
}

impl TaskSummary {
    pub fn from_tasks(tasks: &[EmittedTask]) -> Self {
        tasks
            .iter()
            .fold(TaskSummary::default(), |mut summary, emitted| {
                match emitted.task.task_type {
                    TaskType::Error => summary.errors += 1,
                    TaskType::Warning => summary.warnings += 1,
                    TaskType::Unknown => summary.other += 1,
                }
                summary
            })
    }

    pub fn total(&self) -> usize {
        self.errors + self.warnings + self.other
    }
}

impl fmt::Display for TaskSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn plural(n: usize, word: &str) -> String {
            if n == 1 {
                format!("{} {}", n, word)
            } else {
                format!("{} {}s", n, word)
            }
        }
        write!(
            f,
            "{}, {}, {} other",
            plural(self.errors, "error"),
            plural(self.warnings, "warning"),
            self.other
        )
    }
}

fn severity_style(task_type: TaskType) -> Style {
    match task_type {
        TaskType::Error => Color::Red.bold(),
        TaskType::Warning => Color::Yellow.bold(),
        TaskType::Unknown => Color::Cyan.normal(),
    }
}

/// `path(line): error: message`, continuation lines indented below.
pub fn format_task(task: &Task, color: bool) -> String {
    let severity = if color {
        severity_style(task.task_type)
            .paint(task.task_type.as_str())
            .to_string()
    } else {
        task.task_type.as_str().to_string()
    };

    let mut lines = task.description_lines();
    let first = lines.next().unwrap_or_default();
    let mut text = match task.location {
        TaskLocation::Unspecified => format!("{}: {}", severity, first),
        _ => format!("{}: {}: {}", task.location, severity, first),
    };
    for line in lines {
        text.push_str("\n    ");
        text.push_str(line);
    }
    text
}

pub fn render_text(tasks: &[EmittedTask], color: bool) -> String {
    tasks
        .iter()
        .map(|emitted| format_task(&emitted.task, color))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn render_table(tasks: &[EmittedTask]) -> String {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_width(120);
    table.set_header(Row::from(vec![
        Cell::new("#"),
        Cell::new("type"),
        Cell::new("location"),
        Cell::new("lines"),
        Cell::new("description"),
    ]));
    for (index, emitted) in tasks.iter().enumerate() {
        table.add_row(Row::from(vec![
            Cell::new(index + 1),
            Cell::new(emitted.task.task_type.as_str()),
            Cell::new(emitted.task.location.to_string()),
            Cell::new(emitted.line_span),
            Cell::new(&emitted.task.description),
        ]));
    }
    table.to_string()
}

#[cfg(feature = "uses_serde")]
pub fn render_json(tasks: &[EmittedTask]) -> Result<String> {
    Ok(serde_json::to_string_pretty(tasks)?)
}

pub fn render(format: OutputFormat, tasks: &[EmittedTask], color: bool) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(render_text(tasks, color)),
        OutputFormat::Table => Ok(render_table(tasks)),
        #[cfg(feature = "uses_serde")]
        OutputFormat::Json => render_json(tasks),
        #[cfg(not(feature = "uses_serde"))]
        OutputFormat::Json => anyhow::bail!("JSON output requires the `uses_serde` feature"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn emitted(task_type: TaskType, description: &str, location: TaskLocation) -> EmittedTask {
        EmittedTask {
            task: Task::compile(task_type, description, location),
            line_span: description.split('\n').count(),
            category: 1,
        }
    }

    #[test]
    fn plain_text_lines() {
        let tasks = vec![
            emitted(
                TaskType::Error,
                "C2440: bad\nwith",
                TaskLocation::file_line("main.cpp", 19),
            ),
            emitted(TaskType::Warning, "D9002 : ignoring", TaskLocation::Unspecified),
            emitted(TaskType::Unknown, "see main.obj", TaskLocation::file("main.obj")),
        ];
        assert_eq!(
            render_text(&tasks, false),
            "main.cpp(19): error: C2440: bad\n    with\nwarning: D9002 : ignoring\nmain.obj: unknown: see main.obj"
        );
    }

    #[test]
    fn line_only_location_is_shown() {
        let task = Task::compile(TaskType::Error, "C1234: bad thing", TaskLocation::line(42));
        assert_eq!(format_task(&task, false), "(42): error: C1234: bad thing");
    }

    #[test]
    fn colored_text_wraps_severity() {
        let task = Task::compile(TaskType::Error, "boom", TaskLocation::Unspecified);
        let text = format_task(&task, true);
        assert!(text.contains("\u{1b}["));
        assert!(text.ends_with(": boom"));
    }

    #[test]
    fn summary_counts() {
        let tasks = vec![
            emitted(TaskType::Error, "a", TaskLocation::Unspecified),
            emitted(TaskType::Error, "b", TaskLocation::Unspecified),
            emitted(TaskType::Warning, "c", TaskLocation::Unspecified),
        ];
        let summary = TaskSummary::from_tasks(&tasks);
        assert_eq!(summary.total(), 3);
        assert_eq!(summary.to_string(), "2 errors, 1 warning, 0 other");
    }

    #[test]
    fn table_lists_every_task() {
        let tasks = vec![emitted(
            TaskType::Warning,
            "unused",
            TaskLocation::file_line("a.cpp", 3),
        )];
        let table = render_table(&tasks);
        assert!(table.contains("a.cpp(3)"));
        assert!(table.contains("unused"));
    }

    #[cfg(feature = "uses_serde")]
    #[test]
    fn json_carries_location_and_span() {
        let tasks = vec![emitted(
            TaskType::Error,
            "LNK1120: 1 unresolved externals",
            TaskLocation::file("app.exe"),
        )];
        let json = render_json(&tasks).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value[0]["task"]["task_type"], "error");
        assert_eq!(value[0]["task"]["location"]["kind"], "file");
        assert_eq!(value[0]["task"]["location"]["path"], "app.exe");
        assert_eq!(value[0]["line_span"], 1);
    }
}
