//! # e-msvc-tasks
//!
//! Reads captured MSVC / clang-cl / nmake / jom output and prints the
//! diagnostics it contains as structured tasks.
//!
//! ## Quick Start
//! ```sh
//! cl /c main.cpp > build.log
//! e-msvc-tasks build.log
//! clang-cl /c main.cpp 2> build.err
//! e-msvc-tasks -p clang-cl -c stderr build.err
//! ```

use anyhow::Result;
use clap::Parser;
use e_msvc_tasks::e_cli::read_log;
use e_msvc_tasks::e_reports::{render, TaskSummary};
use e_msvc_tasks::prelude::*;
use e_msvc_tasks::{Cli, Settings};
use std::path::PathBuf;

/// Collects tasks and optionally echoes lines no parser recognized.
struct ConsoleHost {
    tasks: Vec<EmittedTask>,
    passthrough: bool,
}

impl TaskSink for ConsoleHost {
    fn add_task(&mut self, task: Task, line_span: usize, category: usize) {
        self.tasks.push(EmittedTask {
            task,
            line_span,
            category,
        });
    }
}

impl OutputForwarder for ConsoleHost {
    fn forward_stdout(&mut self, line: &str) {
        if self.passthrough {
            println!("{}", line);
        }
    }

    fn forward_stderr(&mut self, line: &str) {
        if self.passthrough {
            eprintln!("{}", line);
        }
    }
}

pub fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("off")).init();

    let cli = Cli::parse();
    let mut settings = Settings::discover(cli.config.as_deref())?;
    settings.apply_cli(&cli);

    let mut dispatcher = LineDispatcher::new(settings.build_parser());
    let mut host = ConsoleHost {
        tasks: Vec::new(),
        passthrough: settings.passthrough,
    };

    let mut logs: Vec<(PathBuf, Channel)> = cli
        .input_paths()
        .into_iter()
        .map(|path| (path, settings.channel))
        .collect();
    if let Some(path) = cli.stderr_log.clone() {
        logs.push((path, Channel::Stderr));
    }

    // Each log is a stream of its own: no line or task spans two files.
    for (path, channel) in &logs {
        info!("parsing {} as {} with {}", path.display(), channel, dispatcher.parser_id());
        let text = read_log(path)?;
        dispatcher.feed(*channel, &text, &mut host);
        dispatcher.finish(&mut host);
    }

    let rendered = render(settings.format, &host.tasks, settings.color)?;
    if !rendered.is_empty() {
        println!("{}", rendered);
    }

    let summary = TaskSummary::from_tasks(&host.tasks);
    eprintln!("{}", summary);
    debug!("{} task(s) emitted", summary.total());

    if settings.fail_on_error && summary.errors > 0 {
        std::process::exit(1);
    }
    Ok(())
}
