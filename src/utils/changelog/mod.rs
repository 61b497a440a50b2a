// changelog document model, parser and the operations built on them

pub mod operations;
pub mod parser;
pub mod types;

pub use operations::{
    AddOutcome, add_entry, new_changelog, release_latest, render_versions, select_versions,
};
pub use parser::{BulletPhase, LineKind, ParserState, classify, parse, parse_file};
pub use types::{Changelog, Link, LogItem, UNRELEASED_DATE, VersionLog};
