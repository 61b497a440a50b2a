pub mod error;
pub mod utils;

pub use error::*;
pub use utils::changelog::{
    AddOutcome, BulletPhase, Changelog, LineKind, Link, LogItem, ParserState, UNRELEASED_DATE,
    VersionLog, add_entry, classify, new_changelog, parse, parse_file, release_latest,
    render_versions, select_versions,
};
pub use utils::config::{CONFIG_FILE_NAME, ChangelogToolConfig};
pub use utils::git_ops::{GitOps, ensure_clean_work_tree};
pub use utils::manifest::read_project_version;
pub use utils::text::{DEFAULT_LINE_WIDTH, UNBOUNDED, wrap, wrap_marked};
pub use utils::version::{VersionBump, calculate_next_version};
