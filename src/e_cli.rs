use crate::e_config::{OutputFormat, ParserKind};
use crate::e_types::Channel;
use anyhow::{Context, Result};
use clap::Parser;
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Turns MSVC, clang-cl, nmake and jom build output into structured tasks.",
    long_about = None
)]
pub struct Cli {
    /// Build logs to parse. Reads stdin when none are given or for `-`.
    pub inputs: Vec<PathBuf>,

    #[arg(
        long,
        short = 'p',
        value_enum,
        value_delimiter = ',',
        help = "Parsers to run, in order (default: msvc)."
    )]
    pub parser: Vec<ParserKind>,

    #[arg(
        long,
        short = 'c',
        value_enum,
        help = "Channel the inputs were captured from (default: stdout)."
    )]
    pub channel: Option<Channel>,

    #[arg(long = "stderr-log", help = "Additional log captured from stderr.")]
    pub stderr_log: Option<PathBuf>,

    #[arg(long, short = 'f', value_enum, help = "Output format (default: text).")]
    pub format: Option<OutputFormat>,

    #[arg(long, help = "Echo lines no parser recognized.")]
    pub passthrough: bool,

    #[arg(long = "no-color", help = "Disable colored output.")]
    pub no_color: bool,

    #[arg(long = "fail-on-error", help = "Exit with status 1 if any error task was found.")]
    pub fail_on_error: bool,

    #[arg(long, help = "Config file (default: ./e-msvc-tasks.toml if present).")]
    pub config: Option<PathBuf>,
}

impl Cli {
    /// Inputs to read on the main channel; `-` stands for stdin.
    pub fn input_paths(&self) -> Vec<PathBuf> {
        if self.inputs.is_empty() {
            vec![PathBuf::from("-")]
        } else {
            self.inputs.clone()
        }
    }
}

/// Reads a captured log. Build tools on Windows do not reliably write UTF-8,
/// so invalid sequences are replaced rather than rejected.
pub fn read_log(path: &Path) -> Result<String> {
    let bytes = if path == Path::new("-") {
        let mut buf = Vec::new();
        io::stdin()
            .read_to_end(&mut buf)
            .context("failed to read stdin")?;
        buf
    } else {
        fs::read(path).with_context(|| format!("failed to read {}", path.display()))?
    };
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
