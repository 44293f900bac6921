#![allow(dead_code)]
use e_msvc_tasks::{Channel, OutputCollector, OutputParser, Task, TaskLocation, TaskType};
use std::fs;
use std::io::Result as IoResult;
use std::path::{Path, PathBuf};

/// Feeds `input` line by line on `channel`, then flushes, the way a build
/// host drives a parser.
pub fn parse_lines(parser: &mut dyn OutputParser, channel: Channel, input: &str) -> OutputCollector {
    let mut out = OutputCollector::new();
    for line in input.split('\n') {
        match channel {
            Channel::Stdout => parser.std_output(line, &mut out),
            Channel::Stderr => parser.std_error(line, &mut out),
        }
    }
    parser.flush(&mut out);
    out
}

/// Shorthand for the tasks the tests expect.
pub fn compile_task(task_type: TaskType, description: &str, file: Option<(&str, Option<u32>)>) -> Task {
    let location = match file {
        None => TaskLocation::Unspecified,
        Some((path, None)) => TaskLocation::file(path),
        Some((path, Some(line))) => TaskLocation::file_line(path, line),
    };
    Task::compile(task_type, description, location)
}

/// Writes a log file into `dir` and returns its path.
pub fn write_log(dir: &Path, name: &str, contents: &str) -> IoResult<PathBuf> {
    let path = dir.join(name);
    fs::write(&path, contents)?;
    Ok(path)
}
