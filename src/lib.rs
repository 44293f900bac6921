#![doc = include_str!("../README.md")]

// Re-export the types a host needs
pub mod prelude {
    pub use crate::e_eventdispatcher::{
        LineDispatcher, OutputCollector, OutputForwarder, OutputHandler, OutputParser,
        ParserChain, TaskSink,
    };
    pub use crate::e_types::{Channel, EmittedTask, Task, TaskLocation, TaskType};
    pub use log::{debug, error, info, log_enabled, trace, Level};
}

pub mod e_types;
pub use e_types::*;
pub mod e_patterns;
pub mod e_taskslot;
pub use e_taskslot::TaskSlot;
pub mod e_eventdispatcher;
pub use e_eventdispatcher::{
    LineDispatcher, OutputCollector, OutputForwarder, OutputHandler, OutputParser, ParserChain,
    TaskSink,
};
pub mod e_msvcparser;
pub use e_msvcparser::MsvcParser;
pub mod e_clangclparser;
pub use e_clangclparser::ClangClParser;
pub mod e_cli;
pub use e_cli::Cli;
pub mod e_config;
pub use e_config::{OutputFormat, ParserKind, Settings};
pub mod e_reports;
