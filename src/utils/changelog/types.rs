// changelog data structures and their canonical text form

use crate::error::{Error, Result};
use crate::utils::text::{DEFAULT_LINE_WIDTH, UNBOUNDED, wrap, wrap_marked};
use crate::utils::version::{VersionBump, calculate_next_version};
use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;
use tracing::debug;

/// date mask rendered for versions that have not been released yet
pub const UNRELEASED_DATE: &str = "????-??-??";

pub const DEFAULT_TITLE: &str = "Changelog";

static DATE_SHAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}$").expect("valid date pattern"));

fn line_width(line_wrap: bool) -> usize {
    if line_wrap {
        DEFAULT_LINE_WIDTH
    } else {
        UNBOUNDED
    }
}

/// a single bullet entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogItem {
    pub message: String,
}

impl LogItem {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn render(&self, width: usize) -> String {
        wrap_marked("* ", &self.message, 2, width)
    }

    pub fn output(&self, line_wrap: bool) -> String {
        self.render(line_width(line_wrap))
    }
}

impl fmt::Display for LogItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.output(true))
    }
}

/// a named link reference, rendered once at the end of the document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub name: String,
    pub href: String,
    pub title: Option<String>,
}

impl Link {
    pub fn new(name: impl Into<String>, href: impl Into<String>, title: Option<String>) -> Self {
        Self {
            name: name.into(),
            href: href.into(),
            title,
        }
    }

    /// continuation lines line up with the text after `[name]: `
    pub fn render(&self, width: usize) -> String {
        let mut line = self.href.clone();
        if let Some(title) = &self.title {
            line.push_str(&format!(" \"{}\"", title));
        }
        let marker = format!("[{}]: ", self.name);
        wrap_marked(&marker, &line, self.name.chars().count() + 4, width)
    }
}

impl fmt::Display for Link {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(DEFAULT_LINE_WIDTH))
    }
}

/// one version block of the changelog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionLog {
    pub version: String,
    /// `YYYY-MM-DD`, or `None` while unreleased
    pub date: Option<String>,
    pub preface: Option<String>,
    pub postface: Option<String>,
    pub items: Vec<LogItem>,
}

impl VersionLog {
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            date: None,
            preface: None,
            postface: None,
            items: Vec::new(),
        }
    }

    pub fn add(&mut self, message: impl Into<String>) -> &mut LogItem {
        self.items.push(LogItem::new(message));
        let last = self.items.len() - 1;
        &mut self.items[last]
    }

    pub fn is_released(&self) -> bool {
        self.date.is_some()
    }

    /// set the release date from a `YYYY-MM-DD` string
    pub fn set_date(&mut self, date: &str) -> Result<()> {
        if !DATE_SHAPE.is_match(date) {
            return Err(Error::validation(format!(
                "release dates must have the format YYYY-MM-DD, got \"{}\"",
                date
            )));
        }
        self.date = Some(date.to_string());
        Ok(())
    }

    pub fn release(&mut self, date: NaiveDate) {
        self.date = Some(date.format("%Y-%m-%d").to_string());
    }

    /// `1.0.0 (2023-02-08)` or `1.0.0 (????-??-??)`
    pub fn heading(&self) -> String {
        format!(
            "{} ({})",
            self.version,
            self.date.as_deref().unwrap_or(UNRELEASED_DATE)
        )
    }

    pub fn render(&self, width: usize) -> String {
        let heading = self.heading();
        let mut out = format!("{}\n{}\n", heading, "-".repeat(heading.chars().count()));

        if let Some(preface) = self.preface.as_deref().filter(|p| !p.is_empty()) {
            out.push('\n');
            out.push_str(&wrap(preface, 0, width));
            out.push('\n');
        }

        out.push('\n');
        let items: Vec<String> = self.items.iter().map(|item| item.render(width)).collect();
        out.push_str(&items.join("\n"));
        out.push('\n');

        if let Some(postface) = self.postface.as_deref().filter(|p| !p.is_empty()) {
            out.push('\n');
            out.push_str(&wrap(postface, 0, width));
            out.push('\n');
        }

        out
    }

    pub fn output(&self, line_wrap: bool) -> String {
        self.render(line_width(line_wrap))
    }
}

impl fmt::Display for VersionLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.output(true))
    }
}

/// a complete changelog document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Changelog {
    pub title: String,
    /// newest first; never re-sorted
    pub versions: Vec<VersionLog>,
    pub links: Vec<Link>,
}

impl Default for Changelog {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            versions: Vec::new(),
            links: Vec::new(),
        }
    }
}

impl Changelog {
    pub fn new() -> Self {
        Self::default()
    }

    /// insert a version log as the most recent one
    pub fn add(&mut self, version: VersionLog) -> &mut VersionLog {
        self.versions.insert(0, version);
        &mut self.versions[0]
    }

    /// add an unreleased version whose number follows the most recent one
    pub fn new_version(&mut self, bump: VersionBump) -> Result<&mut VersionLog> {
        let last = self.versions.first().ok_or(Error::EmptyChangelog)?;
        let next = calculate_next_version(&last.version, bump)?;
        debug!(previous = %last.version, next = %next, %bump, "adding version");
        Ok(self.add(VersionLog::new(next)))
    }

    /// first version log whose version string equals `version`
    pub fn get(&self, version: &str) -> Result<&VersionLog> {
        self.versions
            .iter()
            .find(|log| log.version == version)
            .ok_or_else(|| Error::NotFound {
                version: version.to_string(),
            })
    }

    pub fn latest(&self) -> Option<&VersionLog> {
        self.versions.first()
    }

    pub fn latest_mut(&mut self) -> Option<&mut VersionLog> {
        self.versions.first_mut()
    }

    pub fn render(&self, width: usize) -> String {
        let mut out = format!(
            "{}\n{}\n\n",
            self.title,
            "=".repeat(self.title.chars().count())
        );

        let versions: Vec<String> = self.versions.iter().map(|v| v.render(width)).collect();
        out.push_str(&versions.join("\n\n"));

        if !self.links.is_empty() {
            let links: Vec<String> = self.links.iter().map(|l| l.render(width)).collect();
            out.push('\n');
            out.push_str(&links.join("\n"));
            out.push('\n');
        }

        out
    }

    pub fn output(&self, line_wrap: bool) -> String {
        self.render(line_width(line_wrap))
    }
}

impl fmt::Display for Changelog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.output(true))
    }
}
