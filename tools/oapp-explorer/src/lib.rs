//! OApp Explorer command-line tool.
//!
//! ```text
//! oapp-explorer crawl 30101_0x... --depth 3 --output crawl.json
//! oapp-explorer analyze crawl.json
//! oapp-explorer layout crawl.json --center 30110_0x...
//! oapp-explorer defaults --limit 20
//! ```
//!
//! Every subcommand prints JSON on stdout; logs go to stderr.

pub mod cli;
pub mod commands;
