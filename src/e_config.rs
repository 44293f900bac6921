use crate::e_clangclparser::ClangClParser;
use crate::e_cli::Cli;
use crate::e_eventdispatcher::{OutputParser, ParserChain};
use crate::e_msvcparser::MsvcParser;
use crate::e_types::Channel;
use anyhow::{bail, Context, Result};
use log::{debug, info};
use std::fs;
use std::path::Path;
use toml::{Table, Value};

/// Config file looked up in the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "e-msvc-tasks.toml";

/// Which tool chain's output to expect.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, clap::ValueEnum)]
pub enum ParserKind {
    Msvc,
    ClangCl,
}

impl ParserKind {
    pub fn id(&self) -> &'static str {
        match self {
            ParserKind::Msvc => "msvc",
            ParserKind::ClangCl => "clang-cl",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        match id {
            "msvc" => Some(ParserKind::Msvc),
            "clang-cl" => Some(ParserKind::ClangCl),
            _ => None,
        }
    }

    pub fn build(&self) -> Box<dyn OutputParser> {
        match self {
            ParserKind::Msvc => Box::new(MsvcParser::new()),
            ParserKind::ClangCl => Box::new(ClangClParser::new()),
        }
    }
}

#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Table,
    Json,
}

impl OutputFormat {
    pub fn from_id(id: &str) -> Option<Self> {
        match id {
            "text" => Some(OutputFormat::Text),
            "table" => Some(OutputFormat::Table),
            "json" => Some(OutputFormat::Json),
            _ => None,
        }
    }
}

/// Effective settings: defaults, overridden by the config file, overridden by
/// the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub parsers: Vec<ParserKind>,
    pub channel: Channel,
    pub format: OutputFormat,
    pub passthrough: bool,
    pub color: bool,
    pub fail_on_error: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            parsers: vec![ParserKind::Msvc],
            channel: Channel::Stdout,
            format: OutputFormat::Text,
            passthrough: false,
            color: true,
            fail_on_error: false,
        }
    }
}

impl Settings {
    /// Parses the TOML config format.
    ///
    /// # Example
    /// ```
    /// use e_msvc_tasks::e_config::{OutputFormat, ParserKind, Settings};
    /// use e_msvc_tasks::Channel;
    ///
    /// let settings = Settings::from_toml_str(
    ///     "parsers = [\"clang-cl\"]\nchannel = \"stderr\"\nformat = \"table\"\n",
    /// )
    /// .unwrap();
    /// assert_eq!(settings.parsers, vec![ParserKind::ClangCl]);
    /// assert_eq!(settings.channel, Channel::Stderr);
    /// assert_eq!(settings.format, OutputFormat::Table);
    /// assert!(settings.color);
    /// ```
    pub fn from_toml_str(contents: &str) -> Result<Settings> {
        let table: Table = contents.parse::<Table>().context("invalid TOML")?;
        let mut settings = Settings::default();

        if let Some(value) = table.get("parsers") {
            let ids: Vec<&str> = match value {
                Value::String(id) => vec![id.as_str()],
                Value::Array(items) => items
                    .iter()
                    .map(|item| match item {
                        Value::String(id) => Ok(id.as_str()),
                        other => {
                            bail!("`parsers` entries must be strings, found {}", other.type_str())
                        }
                    })
                    .collect::<Result<_>>()?,
                other => bail!("`parsers` must be a string or an array, found {}", other.type_str()),
            };
            let mut parsers = Vec::new();
            for id in ids {
                match ParserKind::from_id(id) {
                    Some(kind) => parsers.push(kind),
                    None => bail!("unknown parser `{}` (expected `msvc` or `clang-cl`)", id),
                }
            }
            if parsers.is_empty() {
                bail!("`parsers` must name at least one parser");
            }
            settings.parsers = parsers;
        }

        if let Some(channel) = string_key(&table, "channel")? {
            settings.channel = match channel {
                "stdout" => Channel::Stdout,
                "stderr" => Channel::Stderr,
                other => bail!("unknown channel `{}` (expected `stdout` or `stderr`)", other),
            };
        }

        if let Some(format) = string_key(&table, "format")? {
            settings.format = match OutputFormat::from_id(format) {
                Some(format) => format,
                None => bail!("unknown format `{}` (expected `text`, `table` or `json`)", format),
            };
        }

        if let Some(flag) = bool_key(&table, "passthrough")? {
            settings.passthrough = flag;
        }
        if let Some(flag) = bool_key(&table, "color")? {
            settings.color = flag;
        }
        if let Some(flag) = bool_key(&table, "fail_on_error")? {
            settings.fail_on_error = flag;
        }
        Ok(settings)
    }

    pub fn load(path: &Path) -> Result<Settings> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        Settings::from_toml_str(&contents)
            .with_context(|| format!("invalid config {}", path.display()))
    }

    /// Loads `explicit` if given, else `e-msvc-tasks.toml` from the working
    /// directory if present, else the defaults.
    pub fn discover(explicit: Option<&Path>) -> Result<Settings> {
        if let Some(path) = explicit {
            info!("using config {}", path.display());
            return Settings::load(path);
        }
        let local = Path::new(DEFAULT_CONFIG_FILE);
        if local.is_file() {
            info!("using config {}", local.display());
            return Settings::load(local);
        }
        debug!("no config file, using defaults");
        Ok(Settings::default())
    }

    /// Command-line flags win over file values.
    pub fn apply_cli(&mut self, cli: &Cli) {
        if !cli.parser.is_empty() {
            self.parsers = cli.parser.clone();
        }
        if let Some(channel) = cli.channel {
            self.channel = channel;
        }
        if let Some(format) = cli.format {
            self.format = format;
        }
        if cli.passthrough {
            self.passthrough = true;
        }
        if cli.no_color {
            self.color = false;
        }
        if cli.fail_on_error {
            self.fail_on_error = true;
        }
        debug!("effective settings: {:?}", self);
    }

    /// One parser, or a [`ParserChain`] in configured order.
    pub fn build_parser(&self) -> Box<dyn OutputParser> {
        match self.parsers.as_slice() {
            [single] => single.build(),
            kinds => Box::new(
                kinds
                    .iter()
                    .fold(ParserChain::new(), |chain, kind| chain.with(kind.build())),
            ),
        }
    }
}

fn string_key<'a>(table: &'a Table, key: &str) -> Result<Option<&'a str>> {
    match table.get(key) {
        None => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.as_str())),
        Some(other) => bail!("`{}` must be a string, found {}", key, other.type_str()),
    }
}

fn bool_key(table: &Table, key: &str) -> Result<Option<bool>> {
    match table.get(key) {
        None => Ok(None),
        Some(Value::Boolean(b)) => Ok(Some(*b)),
        Some(other) => bail!("`{}` must be a boolean, found {}", key, other.type_str()),
    }
}
