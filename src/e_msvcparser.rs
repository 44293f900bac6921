//! Parser for `cl`, `LINK`, nmake and jom output.

use crate::e_eventdispatcher::{OutputHandler, OutputParser};
use crate::e_patterns::{
    nmake_jom_message, normalize_path_name, parse_file_name, task_type, MSVC_ADDITIONAL_INFO_RE,
    MSVC_COMPILE_RE, MSVC_CONTINUATION_INDENT,
};
use crate::e_taskslot::TaskSlot;
use crate::e_types::{Task, TaskLocation, TaskType};
use log::trace;

/// Turns MSVC tool chain output into tasks.
///
/// Compile lines (`foo.cpp(42) : error C1234: ...`) are recognized on both
/// channels. On stdout, MSVC also prints 8-space indented follow-up lines:
/// those naming a file and line become separate `Unknown` tasks, all others
/// extend the pending task.
///
/// # Example
/// ```
/// use e_msvc_tasks::{MsvcParser, OutputCollector, OutputParser, TaskType};
///
/// let mut parser = MsvcParser::new();
/// let mut out = OutputCollector::new();
/// parser.std_output("foo.cpp(42) : error C1234: bad thing", &mut out);
/// parser.flush(&mut out);
///
/// let task = &out.tasks[0].task;
/// assert_eq!(task.task_type, TaskType::Error);
/// assert_eq!(task.description, "C1234: bad thing");
/// assert_eq!(task.file_path(), Some("foo.cpp"));
/// assert_eq!(task.line_number(), Some(42));
/// ```
#[derive(Debug, Default)]
pub struct MsvcParser {
    slot: TaskSlot,
}

impl MsvcParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// The task currently being assembled, if any.
    pub fn pending(&self) -> Option<&Task> {
        self.slot.task()
    }

    /// Flushes, then tries the compile-line pattern.
    ///
    /// The flush happens whether or not the line matches: any line reaching
    /// this point ends the pending task.
    fn process_compile_line(&mut self, line: &str, out: &mut dyn OutputHandler) -> bool {
        self.slot.flush(out);

        let Some(caps) = MSVC_COMPILE_RE.captures(line) else {
            return false;
        };
        let location = parse_file_name(caps.get(1).map_or("", |m| m.as_str()));
        let kind = task_type(caps.get(2).map_or("", |m| m.as_str()));
        let code = caps.get(3).map_or("", |m| m.as_str());
        let message = caps.get(4).map_or("", |m| m.as_str()).trim();
        trace!("msvc: compile line ({}) at {:?}", kind, location);
        self.slot
            .start(Task::compile(kind, format!("{}{}", code, message), location));
        true
    }

    fn process_nmake_jom_line(&mut self, line: &str, out: &mut dyn OutputHandler) -> bool {
        match nmake_jom_message(line) {
            Some(task) => {
                trace!("msvc: nmake/jom message: {}", task.description);
                self.slot.flush(out);
                self.slot.start(task);
                true
            }
            None => false,
        }
    }
}

impl OutputParser for MsvcParser {
    fn id(&self) -> &'static str {
        "msvc"
    }

    fn std_output(&mut self, line: &str, out: &mut dyn OutputHandler) {
        let additional_info = MSVC_ADDITIONAL_INFO_RE.captures(line);

        if additional_info.is_none() {
            if let Some(rest) = line.strip_prefix(MSVC_CONTINUATION_INDENT) {
                if !self.slot.continue_with(rest, true) {
                    trace!("msvc: dropping indented line without a pending task");
                }
                return;
            }
        }

        if self.process_compile_line(line, out) {
            return;
        }
        if self.process_nmake_jom_line(line, out) {
            return;
        }
        if let Some(caps) = additional_info {
            let prefix = caps.get(1).map_or("", |m| m.as_str());
            let mut description = format!(
                "{}{}",
                prefix,
                caps.get(4).map_or("", |m| m.as_str()).trim()
            );
            if !prefix.is_empty() {
                // Remove trailing quote
                description.pop();
            }
            let path = normalize_path_name(caps.get(2).map_or("", |m| m.as_str()));
            let location = match caps.get(3).and_then(|m| m.as_str().parse::<u32>().ok()) {
                Some(line_number) => TaskLocation::file_line(path, line_number),
                None => TaskLocation::file(path),
            };
            trace!("msvc: additional information at {:?}", location);
            self.slot
                .start(Task::compile(TaskType::Unknown, description, location));
            return;
        }
        out.forward_stdout(line);
    }

    fn std_error(&mut self, line: &str, out: &mut dyn OutputHandler) {
        if self.process_compile_line(line, out) {
            return;
        }
        // Jom outputs errors to stderr
        if self.process_nmake_jom_line(line, out) {
            return;
        }
        out.forward_stderr(line);
    }

    fn flush(&mut self, out: &mut dyn OutputHandler) {
        self.slot.flush(out);
    }
}
