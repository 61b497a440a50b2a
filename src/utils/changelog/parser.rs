// changelog parser

use super::types::{Changelog, Link, UNRELEASED_DATE, VersionLog};
use crate::error::{Error, Result};
use regex::Regex;
use std::fs;
use std::path::Path;
use std::sync::LazyLock;
use tracing::debug;

static TITLE_UNDERLINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^=+$").expect("valid title underline pattern"));

static HEADING_UNDERLINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-+$").expect("valid heading underline pattern"));

static VERSION_HEADING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^([0-9.]{3,}(?:-(?:alpha|beta)\.[0-9]+)?) \(([0-9]{4}-[0-9]{2}-[0-9]{2}|\?\?\?\?-\?\?-\?\?)\)$",
    )
    .expect("valid version heading pattern")
});

static LINK_REFERENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\[([^\]]+)\]:(.*)$").expect("valid link reference pattern"));

// two leading non-word characters continue a link reference
static LINK_CONTINUATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\W{2}").expect("valid link continuation pattern"));

const TITLE_FORMAT: &str = "Line 1 and 2 of the changelog must be in the format \"Changelog\\n=====\". We did not find all equals signs on the second line.";
const HEADING_FORMAT: &str = "A version title must have the format \"1.0.0 (YYYY-MM-DD)\" or \"1.0.0 (????-??-??)\" for unreleased versions.";
const LINK_FORMAT: &str =
    "A link reference must have the format '[name]: https://example.org/ \"Optional title\"'.";

/// what a single source line means to the parser
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind<'a> {
    /// the line is followed by a `-----` underline
    VersionHeading,
    /// text after the `* ` marker
    Bullet(&'a str),
    /// indented text continuing the previous bullet
    Continuation(&'a str),
    LinkReference,
    Blank,
    Text(&'a str),
}

/// classify `line`, looking ahead at the line that follows it
pub fn classify<'a>(line: &'a str, next: Option<&str>) -> LineKind<'a> {
    if next.is_some_and(|next| HEADING_UNDERLINE.is_match(next)) {
        LineKind::VersionHeading
    } else if let Some(message) = line.strip_prefix("* ") {
        LineKind::Bullet(message.trim())
    } else if line.starts_with("  ") && !line.trim().is_empty() {
        LineKind::Continuation(line.trim())
    } else if LINK_REFERENCE.is_match(line) {
        LineKind::LinkReference
    } else if line.trim().is_empty() {
        LineKind::Blank
    } else {
        LineKind::Text(line.trim())
    }
}

/// whether free text belongs before or after a version's bullet list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BulletPhase {
    #[default]
    BeforeFirstBullet,
    AfterBulletsSeen,
}

/// scan state carried from one line to the next
///
/// `active_version` and `active_bullet` are indexes into the changelog
/// being built.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParserState {
    pub active_version: Option<usize>,
    pub active_bullet: Option<usize>,
    pub phase: BulletPhase,
}

impl ParserState {
    pub fn new() -> Self {
        Self::default()
    }

    fn active_log<'c>(&self, changelog: &'c mut Changelog) -> Option<&'c mut VersionLog> {
        self.active_version
            .and_then(|idx| changelog.versions.get_mut(idx))
    }

    /// append a version and make it the active context
    pub fn start_version(&mut self, changelog: &mut Changelog, log: VersionLog) {
        changelog.versions.push(log);
        self.active_version = Some(changelog.versions.len() - 1);
        self.active_bullet = None;
        self.phase = BulletPhase::BeforeFirstBullet;
    }

    pub fn push_bullet(
        &mut self,
        changelog: &mut Changelog,
        message: &str,
        line_number: usize,
        line: &str,
    ) -> Result<()> {
        let log = self.active_log(changelog).ok_or_else(|| {
            Error::format(
                line_number,
                line,
                "Found a bullet point outside of a version heading.",
            )
        })?;

        log.add(message);
        self.active_bullet = Some(log.items.len() - 1);
        self.phase = BulletPhase::AfterBulletsSeen;
        Ok(())
    }

    pub fn continue_bullet(
        &mut self,
        changelog: &mut Changelog,
        text: &str,
        line_number: usize,
        line: &str,
    ) -> Result<()> {
        let bullet = self.active_bullet;
        let item = self
            .active_log(changelog)
            .zip(bullet)
            .and_then(|(log, idx)| log.items.get_mut(idx))
            .ok_or_else(|| {
                Error::format(
                    line_number,
                    line,
                    "Found an indented line without a preceding bullet point.",
                )
            })?;

        if !item.message.is_empty() {
            item.message.push(' ');
        }
        item.message.push_str(text);
        Ok(())
    }

    /// route free text to the preface or postface of the active version
    pub fn push_text(
        &mut self,
        changelog: &mut Changelog,
        text: &str,
        line_number: usize,
        line: &str,
    ) -> Result<()> {
        let phase = self.phase;
        let log = self.active_log(changelog).ok_or_else(|| {
            Error::format(
                line_number,
                line,
                "Found text outside of a version heading.",
            )
        })?;

        let target = match phase {
            BulletPhase::BeforeFirstBullet => &mut log.preface,
            BulletPhase::AfterBulletsSeen => &mut log.postface,
        };
        *target = Some(match target.take() {
            Some(existing) => format!("{} {}", existing, text),
            None => text.to_string(),
        });
        Ok(())
    }
}

fn parse_version_heading(line: &str, line_number: usize) -> Result<VersionLog> {
    let captures = VERSION_HEADING
        .captures(line)
        .ok_or_else(|| Error::format(line_number, line, HEADING_FORMAT))?;

    let mut log = VersionLog::new(&captures[1]);
    if &captures[2] != UNRELEASED_DATE {
        log.date = Some(captures[2].to_string());
    }
    Ok(log)
}

/// parse a link reference that has already been folded onto one line
fn parse_link_reference(reference: &str, line_number: usize) -> Result<Link> {
    let invalid = || Error::format(line_number, reference, LINK_FORMAT);

    let captures = LINK_REFERENCE.captures(reference).ok_or_else(invalid)?;
    let name = &captures[1];
    let rest = captures[2].trim();

    let (href, remainder) = match rest.split_once(char::is_whitespace) {
        Some((href, remainder)) => (href, remainder.trim()),
        None => (rest, ""),
    };
    if href.is_empty() {
        return Err(invalid());
    }

    let title = if remainder.is_empty() {
        None
    } else {
        let inner = remainder
            .strip_prefix('"')
            .and_then(|r| r.strip_suffix('"'))
            .ok_or_else(invalid)?;
        Some(inner.to_string())
    };

    Ok(Link::new(name, href, title))
}

/// parse changelog text
pub fn parse(input: &str) -> Result<Changelog> {
    let lines: Vec<&str> = input.lines().collect();

    let title = lines.first().copied().unwrap_or_default();
    let underline = lines.get(1).copied().unwrap_or_default();
    if !TITLE_UNDERLINE.is_match(underline) {
        return Err(Error::format(2, underline, TITLE_FORMAT));
    }

    let mut changelog = Changelog {
        title: title.to_string(),
        versions: Vec::new(),
        links: Vec::new(),
    };
    let mut state = ParserState::new();

    let mut idx = 2;
    while idx < lines.len() {
        let line = lines[idx];
        let line_number = idx + 1;

        match classify(line, lines.get(idx + 1).copied()) {
            LineKind::VersionHeading => {
                let log = parse_version_heading(line, line_number)?;
                state.start_version(&mut changelog, log);
                // skip the underline
                idx += 1;
            }
            LineKind::Bullet(message) => {
                state.push_bullet(&mut changelog, message, line_number, line)?;
            }
            LineKind::Continuation(text) => {
                state.continue_bullet(&mut changelog, text, line_number, line)?;
            }
            LineKind::LinkReference => {
                let mut reference = line.trim_end().to_string();
                while let Some(next) = lines
                    .get(idx + 1)
                    .filter(|next| LINK_CONTINUATION.is_match(next))
                {
                    reference.push(' ');
                    reference.push_str(next.trim());
                    idx += 1;
                }
                changelog
                    .links
                    .push(parse_link_reference(&reference, line_number)?);
            }
            LineKind::Blank => {}
            LineKind::Text(text) => {
                state.push_text(&mut changelog, text, line_number, line)?;
            }
        }

        idx += 1;
    }

    debug!(
        versions = changelog.versions.len(),
        links = changelog.links.len(),
        "parsed changelog"
    );

    Ok(changelog)
}

/// read and parse a changelog file
pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Changelog> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| Error::FileReadError {
        path: path.to_path_buf(),
        source: e,
    })?;

    debug!(path = %path.display(), "reading changelog");
    parse(&content)
}
