//! Parser for clang-cl output.
//!
//! The compiler errors look similar to MSVC, except that the column number is
//! also given and there are no 4-digit CXXXX error numbers. They are written to
//! stderr, followed by the offending source line and a `^~~~` marker:
//!
//! ```text
//! .\qwindowsgdinativeinterface.cpp(48,3) :  error: unknown type name 'errr'
//!   errr
//!   ^
//! ```

use crate::e_eventdispatcher::{OutputHandler, OutputParser};
use crate::e_patterns::{
    is_clang_code_marker, nmake_jom_message, parse_file_name, task_type, CLANG_CL_COMPILE_RE,
};
use crate::e_taskslot::TaskSlot;
use crate::e_types::Task;
use log::trace;

#[derive(Debug, Default)]
pub struct ClangClParser {
    slot: TaskSlot,
}

impl ClangClParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending(&self) -> Option<&Task> {
        self.slot.task()
    }

    /// nmake/jom messages are complete on one line and are emitted at once.
    fn emit_nmake_jom_message(&mut self, line: &str, out: &mut dyn OutputHandler) -> bool {
        let Some(task) = nmake_jom_message(line) else {
            return false;
        };
        trace!("clang-cl: nmake/jom message: {}", task.description);
        self.slot.flush(out);
        self.slot.start(task);
        self.slot.flush(out);
        true
    }
}

impl OutputParser for ClangClParser {
    fn id(&self) -> &'static str {
        "clang-cl"
    }

    fn std_output(&mut self, line: &str, out: &mut dyn OutputHandler) {
        if self.emit_nmake_jom_message(line, out) {
            return;
        }
        out.forward_stdout(line);
    }

    fn std_error(&mut self, line_in: &str, out: &mut dyn OutputHandler) {
        // Strip \r\n.
        let line = line_in.trim_end();

        if self.emit_nmake_jom_message(line, out) {
            return;
        }

        // Finish a sequence of warnings/errors: "2 warnings generated."
        if line.starts_with(|c: char| c.is_ascii_digit()) && line.ends_with("generated.") {
            trace!("clang-cl: end of sequence: {}", line);
            self.slot.flush(out);
            return;
        }

        // A new error message may be preceded by "In file included from " lines.
        if line.starts_with("In file included from ") {
            self.slot.flush(out);
            return;
        }

        if let Some(caps) = CLANG_CL_COMPILE_RE.captures(line) {
            self.slot.flush(out);
            let location = parse_file_name(caps.get(1).map_or("", |m| m.as_str()));
            let kind = task_type(caps.get(2).map_or("", |m| m.as_str()));
            let message = caps.get(3).map_or("", |m| m.as_str()).trim();
            trace!("clang-cl: compile line ({}) at {:?}", kind, location);
            self.slot.start(Task::compile(kind, message, location));
            return;
        }

        if self.slot.is_pending() {
            let trimmed = line.trim();
            if is_clang_code_marker(trimmed) {
                self.slot.flush(out);
            } else {
                self.slot.continue_with(trimmed, false);
            }
            return;
        }

        out.forward_stderr(line_in);
    }

    fn flush(&mut self, out: &mut dyn OutputHandler) {
        self.slot.flush(out);
    }
}
