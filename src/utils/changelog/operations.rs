// mutations behind the init, add, release and show commands

use super::types::{Changelog, VersionLog};
use crate::error::{Error, Result};
use crate::utils::version::VersionBump;
use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, info};

/// message of the single entry in a freshly created changelog
pub const FIRST_ENTRY: &str = "New project!";

/// result of appending an entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AddOutcome {
    /// version the entry was added to
    pub version: String,
    /// true when the version was created for this entry
    pub created: bool,
}

/// a changelog with one unreleased version and a single entry
pub fn new_changelog(version: impl Into<String>) -> Changelog {
    let mut changelog = Changelog::new();
    let mut log = VersionLog::new(version);
    log.add(FIRST_ENTRY);
    changelog.versions.push(log);
    changelog
}

/// append `message` to the newest unreleased version
///
/// when the newest version already has a release date a new version is
/// started first, numbered according to `bump`
pub fn add_entry(changelog: &mut Changelog, message: &str, bump: VersionBump) -> Result<AddOutcome> {
    let message = message.trim();
    if message.is_empty() {
        return Err(Error::validation("a changelog entry needs a message"));
    }

    let latest = changelog.latest().ok_or(Error::EmptyChangelog)?;
    let created = latest.is_released();

    let log = if created {
        let log = changelog.new_version(bump)?;
        info!(version = %log.version, "creating new version");
        log
    } else {
        changelog.latest_mut().ok_or(Error::EmptyChangelog)?
    };

    log.add(message);
    debug!(version = %log.version, items = log.items.len(), "added entry");

    Ok(AddOutcome {
        version: log.version.clone(),
        created,
    })
}

/// stamp `date` on the newest version
///
/// a version that already has a date is only re-stamped with `force`
pub fn release_latest(changelog: &mut Changelog, date: NaiveDate, force: bool) -> Result<&VersionLog> {
    let log = changelog.latest_mut().ok_or(Error::EmptyChangelog)?;

    if log.is_released() && !force {
        return Err(Error::AlreadyReleased {
            version: log.version.clone(),
        });
    }

    log.release(date);
    info!(version = %log.version, date = %date, "releasing");
    Ok(&*log)
}

/// pick the versions the `show` command prints
pub fn select_versions<'a>(
    changelog: &'a Changelog,
    version: Option<&str>,
    all: bool,
) -> Result<Vec<&'a VersionLog>> {
    if all {
        return Ok(changelog.versions.iter().collect());
    }

    match version {
        Some(version) => Ok(vec![changelog.get(version)?]),
        None => Ok(vec![changelog.latest().ok_or(Error::EmptyChangelog)?]),
    }
}

/// render selected versions the way `show` prints them
pub fn render_versions(versions: &[&VersionLog], width: usize) -> String {
    versions
        .iter()
        .map(|log| log.render(width))
        .collect::<Vec<_>>()
        .join("\n\n")
}
