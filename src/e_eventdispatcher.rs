//! Seams between a parser and its host.
//!
//! The host feeds raw output into a [`LineDispatcher`], which splits it into
//! lines per channel and calls an [`OutputParser`]. Parsers report finished
//! tasks through [`TaskSink`] and hand back lines they do not recognize through
//! [`OutputForwarder`].

use crate::e_types::{Channel, EmittedTask, Task};
use log::trace;
use std::fmt;

/// Receives tasks as parsers flush them.
pub trait TaskSink {
    fn add_task(&mut self, task: Task, line_span: usize, category: usize);
}

/// Default handling for lines no parser claimed.
pub trait OutputForwarder {
    fn forward_stdout(&mut self, line: &str);
    fn forward_stderr(&mut self, line: &str);
}

/// Everything a parser needs from its host.
pub trait OutputHandler: TaskSink + OutputForwarder {}

impl<T: TaskSink + OutputForwarder + ?Sized> OutputHandler for T {}

/// A line-at-a-time build output parser.
///
/// Each instance owns one pending-task slot, so calls must be serialized;
/// separate instances are independent and may live on different threads.
pub trait OutputParser: Send {
    /// Stable identifier, e.g. `"msvc"`.
    fn id(&self) -> &'static str;

    /// Handles one stdout line, newline already stripped.
    fn std_output(&mut self, line: &str, out: &mut dyn OutputHandler);

    /// Handles one stderr line, newline already stripped.
    fn std_error(&mut self, line: &str, out: &mut dyn OutputHandler);

    /// Emits the pending task, if any.
    fn flush(&mut self, out: &mut dyn OutputHandler);
}

/// Host that simply records everything it is given.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutputCollector {
    pub tasks: Vec<EmittedTask>,
    pub stdout_lines: Vec<String>,
    pub stderr_lines: Vec<String>,
}

impl OutputCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// The collected tasks without their span information.
    pub fn task_list(&self) -> Vec<Task> {
        self.tasks.iter().map(|emitted| emitted.task.clone()).collect()
    }
}

impl TaskSink for OutputCollector {
    fn add_task(&mut self, task: Task, line_span: usize, category: usize) {
        self.tasks.push(EmittedTask {
            task,
            line_span,
            category,
        });
    }
}

impl OutputForwarder for OutputCollector {
    fn forward_stdout(&mut self, line: &str) {
        self.stdout_lines.push(line.to_string());
    }

    fn forward_stderr(&mut self, line: &str) {
        self.stderr_lines.push(line.to_string());
    }
}

/// Runs several parsers as one: a line the first parser forwards is offered
/// to the second, and so on. Lines the last parser forwards reach the host.
#[derive(Default)]
pub struct ParserChain {
    parsers: Vec<Box<dyn OutputParser>>,
}

impl fmt::Debug for ParserChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParserChain")
            .field("parsers", &self.ids())
            .finish()
    }
}

impl ParserChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, parser: Box<dyn OutputParser>) -> Self {
        self.push(parser);
        self
    }

    pub fn push(&mut self, parser: Box<dyn OutputParser>) {
        self.parsers.push(parser);
    }

    pub fn len(&self) -> usize {
        self.parsers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parsers.is_empty()
    }

    pub fn ids(&self) -> Vec<&'static str> {
        self.parsers.iter().map(|p| p.id()).collect()
    }
}

/// Handler given to parser *i*: tasks go straight to the host, forwarded
/// lines go to parser *i + 1*.
struct ChainLink<'a> {
    rest: &'a mut [Box<dyn OutputParser>],
    out: &'a mut dyn OutputHandler,
}

impl TaskSink for ChainLink<'_> {
    fn add_task(&mut self, task: Task, line_span: usize, category: usize) {
        self.out.add_task(task, line_span, category);
    }
}

impl OutputForwarder for ChainLink<'_> {
    fn forward_stdout(&mut self, line: &str) {
        match self.rest.split_first_mut() {
            Some((next, rest)) => next.std_output(
                line,
                &mut ChainLink {
                    rest,
                    out: &mut *self.out,
                },
            ),
            None => self.out.forward_stdout(line),
        }
    }

    fn forward_stderr(&mut self, line: &str) {
        match self.rest.split_first_mut() {
            Some((next, rest)) => next.std_error(
                line,
                &mut ChainLink {
                    rest,
                    out: &mut *self.out,
                },
            ),
            None => self.out.forward_stderr(line),
        }
    }
}

impl OutputParser for ParserChain {
    fn id(&self) -> &'static str {
        "chain"
    }

    fn std_output(&mut self, line: &str, out: &mut dyn OutputHandler) {
        ChainLink {
            rest: &mut self.parsers,
            out,
        }
        .forward_stdout(line);
    }

    fn std_error(&mut self, line: &str, out: &mut dyn OutputHandler) {
        ChainLink {
            rest: &mut self.parsers,
            out,
        }
        .forward_stderr(line);
    }

    fn flush(&mut self, out: &mut dyn OutputHandler) {
        for parser in self.parsers.iter_mut() {
            parser.flush(&mut *out);
        }
    }
}

/// The line source: splits raw output chunks into lines per channel.
///
/// Chunks do not need to end on a line boundary; the trailing partial line of
/// each channel is kept until more text arrives or [`LineDispatcher::finish`]
/// is called. Only `\n` separates lines, a `\r` before it stays part of the line.
///
/// # Example
/// ```
/// use e_msvc_tasks::{Channel, LineDispatcher, MsvcParser, OutputCollector};
///
/// let mut dispatcher = LineDispatcher::new(Box::new(MsvcParser::new()));
/// let mut out = OutputCollector::new();
/// dispatcher.feed(Channel::Stdout, "main.cpp(7): error C2733: bad", &mut out);
/// dispatcher.feed(Channel::Stdout, " thing\n", &mut out);
/// dispatcher.finish(&mut out);
/// assert_eq!(out.tasks.len(), 1);
/// assert_eq!(out.tasks[0].task.description, "C2733: bad thing");
/// ```
pub struct LineDispatcher {
    parser: Box<dyn OutputParser>,
    stdout_pending: String,
    stderr_pending: String,
}

impl fmt::Debug for LineDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LineDispatcher")
            .field("parser", &self.parser.id())
            .field("stdout_pending", &self.stdout_pending)
            .field("stderr_pending", &self.stderr_pending)
            .finish()
    }
}

impl LineDispatcher {
    pub fn new(parser: Box<dyn OutputParser>) -> Self {
        LineDispatcher {
            parser,
            stdout_pending: String::new(),
            stderr_pending: String::new(),
        }
    }

    pub fn parser_id(&self) -> &'static str {
        self.parser.id()
    }

    /// Feeds a raw chunk of output; every complete line is dispatched.
    pub fn feed(&mut self, channel: Channel, chunk: &str, out: &mut dyn OutputHandler) {
        let (buffer, parser) = match channel {
            Channel::Stdout => (&mut self.stdout_pending, &mut self.parser),
            Channel::Stderr => (&mut self.stderr_pending, &mut self.parser),
        };
        buffer.push_str(chunk);
        while let Some(pos) = buffer.find('\n') {
            let line: String = buffer.drain(..=pos).collect();
            Self::dispatch_to(&mut **parser, channel, &line[..pos], out);
        }
    }

    /// Dispatches a line that is already split off.
    pub fn dispatch(&mut self, channel: Channel, line: &str, out: &mut dyn OutputHandler) {
        Self::dispatch_to(&mut *self.parser, channel, line, out);
    }

    /// Dispatches the partial line buffered for `channel`, if any, so the next
    /// chunk starts a new line.
    pub fn end_line(&mut self, channel: Channel, out: &mut dyn OutputHandler) {
        let rest = match channel {
            Channel::Stdout => std::mem::take(&mut self.stdout_pending),
            Channel::Stderr => std::mem::take(&mut self.stderr_pending),
        };
        if !rest.is_empty() {
            Self::dispatch_to(&mut *self.parser, channel, &rest, out);
        }
    }

    /// End of stream: dispatches leftover partial lines and flushes the parser.
    ///
    /// The dispatcher can be fed again afterwards; the next stream starts
    /// with no pending task.
    pub fn finish(&mut self, out: &mut dyn OutputHandler) {
        self.end_line(Channel::Stdout, out);
        self.end_line(Channel::Stderr, out);
        self.parser.flush(out);
    }

    fn dispatch_to(
        parser: &mut dyn OutputParser,
        channel: Channel,
        line: &str,
        out: &mut dyn OutputHandler,
    ) {
        trace!("{}[{}] {:?}", parser.id(), channel, line);
        match channel {
            Channel::Stdout => parser.std_output(line, out),
            Channel::Stderr => parser.std_error(line, out),
        }
    }
}
