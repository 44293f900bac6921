//! Fixed line patterns and the helpers shared by the MSVC and clang-cl parsers.
//!
//! Every pattern is a constant string plus a lazily compiled [`Regex`]. The
//! patterns never come from user input, so a pattern that fails to compile is
//! a programming error and panics on first use.

use crate::e_types::{Task, TaskLocation, TaskType};
use once_cell::sync::Lazy;
use regex::Regex;

// As of MSVC 2015: "foo.cpp(42) :" -> "foo.cpp(42):"
macro_rules! file_pos_pattern {
    () => {
        r"^(?:\d+>)?(cl|LINK|.+[^ ]) ?: "
    };
}

/// Location prefix shared by both compile-line patterns.
///
/// Capture 1 is the location field: `cl`, `LINK`, or anything not ending in a
/// space (`foo.cpp(42)`, `main.obj`, `.\x.cpp(48,3)`). An optional `N>` project
/// prefix from multi-process builds is skipped.
pub const FILE_POS_PATTERN: &str = file_pos_pattern!();

/// MSVC compile line.
///
/// Captures:
/// 1. location field
/// 2. `warning` or `error`, empty for `note:` lines
/// 3. message code with its trailing separator, e.g. `C4716: ` or `D9002 : `
/// 4. message
pub const MSVC_COMPILE_PATTERN: &str = concat!(
    file_pos_pattern!(),
    r".*(?:(warning|error) ([A-Z]+\d{4} ?: )|note: )(.*)$"
);

/// Indented follow-up lines MSVC prints below a diagnostic, e.g.
/// `        x.h(39) : see declaration of 'X'` or
/// `        could be 'C:\y.h(83) : unsigned __int64 UINT64'`.
///
/// Captures:
/// 1. `could be ` or `or `, when the line lists a candidate in quotes
/// 2. file
/// 3. line
/// 4. message, still carrying the closing quote when capture 1 is set
pub const MSVC_ADDITIONAL_INFO_PATTERN: &str =
    r"^        (?:(could be |or )\s*')?(.*)\((\d+)\) : (.*)$";

/// clang-cl compile line, e.g. `.\x.cpp(48,3) :  error: unknown type name 'errr'`.
///
/// Captures:
/// 1. location field
/// 2. `warning` or `error`
/// 3. message
pub const CLANG_CL_COMPILE_PATTERN: &str =
    concat!(file_pos_pattern!(), r" ?(warning|error): (.*)$");

/// Eight-space indentation MSVC uses for continuation lines on stdout.
pub const MSVC_CONTINUATION_INDENT: &str = "        ";

pub static MSVC_COMPILE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(MSVC_COMPILE_PATTERN).expect("invalid MSVC compile pattern"));

pub static MSVC_ADDITIONAL_INFO_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(MSVC_ADDITIONAL_INFO_PATTERN).expect("invalid MSVC additional information pattern")
});

pub static CLANG_CL_COMPILE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(CLANG_CL_COMPILE_PATTERN).expect("invalid clang-cl compile pattern")
});

/// Splits a location field into a normalized path and an optional line number.
///
/// `LINK` and `cl` fields carry no location. A trailing `(N)` or `(N,C)` is
/// taken as line (and column, which is dropped); when the parenthesized part is
/// not a number the whole field is the path. A line with an empty file part
/// is kept on its own.
///
/// # Example
/// ```
/// use e_msvc_tasks::e_patterns::parse_file_name;
/// use e_msvc_tasks::TaskLocation;
///
/// assert_eq!(parse_file_name("main.cpp(54)"), TaskLocation::file_line("main.cpp", 54));
/// assert_eq!(parse_file_name(".\\gdi.cpp(48,3)"), TaskLocation::file_line("gdi.cpp", 48));
/// assert_eq!(parse_file_name("main.obj"), TaskLocation::file("main.obj"));
/// assert_eq!(parse_file_name("LINK"), TaskLocation::Unspecified);
/// ```
pub fn parse_file_name(input: &str) -> TaskLocation {
    if input.is_empty() || input.starts_with("LINK") || input.starts_with("cl") {
        return TaskLocation::Unspecified;
    }

    let mut file_name = input;
    let mut line_number = None;
    if let Some(inner_end) = input.strip_suffix(')') {
        if let Some(pos) = inner_end.rfind('(') {
            // clang-cl gives a column too: "foo.cpp(34,1)" as opposed to MSVC "foo.cpp(34)".
            let inner = &inner_end[pos + 1..];
            let digits = inner.split(',').next().unwrap_or_default();
            if let Ok(n) = digits.parse::<u32>() {
                file_name = &input[..pos];
                line_number = Some(n);
            }
        }
    }

    let path = normalize_path_name(file_name);
    match (path.is_empty(), line_number) {
        (true, Some(line)) => TaskLocation::Line { line },
        (true, None) => TaskLocation::Unspecified,
        (false, Some(line)) => TaskLocation::FileLine { path, line },
        (false, None) => TaskLocation::File { path },
    }
}

/// Normalizes a path reported by the tool chain.
///
/// Backslashes become `/`, repeated separators collapse, `.` segments go away
/// and `..` folds into a preceding named segment. A leading `/`, `//` (UNC) or
/// drive letter is kept.
pub fn normalize_path_name(path: &str) -> String {
    if path.is_empty() {
        return String::new();
    }
    let unified = path.replace('\\', "/");
    let (prefix, rest) = if let Some(rest) = unified.strip_prefix("//") {
        ("//", rest)
    } else if let Some(rest) = unified.strip_prefix('/') {
        ("/", rest)
    } else {
        ("", unified.as_str())
    };

    let mut segments: Vec<&str> = Vec::new();
    for segment in rest.split('/') {
        match segment {
            "" | "." => {}
            ".." => match segments.last() {
                Some(last) if *last == ".." => segments.push(".."),
                Some(last) if segments.len() == 1 && is_drive(last) => {}
                Some(_) => {
                    segments.pop();
                }
                None if prefix.is_empty() => segments.push(".."),
                None => {}
            },
            _ => segments.push(segment),
        }
    }

    let normalized = format!("{}{}", prefix, segments.join("/"));
    if normalized.is_empty() {
        ".".to_string()
    } else {
        normalized
    }
}

fn is_drive(segment: &str) -> bool {
    let bytes = segment.as_bytes();
    bytes.len() == 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':'
}

/// Maps a captured severity keyword to a [`TaskType`].
pub fn task_type(category: &str) -> TaskType {
    match category {
        "warning" => TaskType::Warning,
        "error" => TaskType::Error,
        _ => TaskType::Unknown,
    }
}

/// Recognizes nmake/jom messages: `Error: ...` or `Warning: ...` at the very
/// start of the line.
///
/// # Example
/// ```
/// use e_msvc_tasks::e_patterns::nmake_jom_message;
/// use e_msvc_tasks::TaskType;
///
/// let task = nmake_jom_message("Error: dependent 'main.h' does not exist.").unwrap();
/// assert_eq!(task.task_type, TaskType::Error);
/// assert_eq!(task.description, "dependent 'main.h' does not exist.");
/// assert!(nmake_jom_message("error: lower case").is_none());
/// ```
pub fn nmake_jom_message(line: &str) -> Option<Task> {
    let (task_type, rest) = if let Some(rest) = line.strip_prefix("Error:") {
        (TaskType::Error, rest)
    } else if let Some(rest) = line.strip_prefix("Warning:") {
        (TaskType::Warning, rest)
    } else {
        return None;
    };
    Some(Task::compile(
        task_type,
        rest.trim(),
        TaskLocation::Unspecified,
    ))
}

/// Checks for a code marker `~~~~ ^ ~~~~~~~~~~~~` underlining the code above it.
/// An empty line counts as a marker.
pub fn is_clang_code_marker(trimmed_line: &str) -> bool {
    trimmed_line.chars().all(|c| matches!(c, ' ' | '^' | '~'))
}
