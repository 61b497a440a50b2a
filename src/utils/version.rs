// next-version calculation

use crate::error::{Error, Result};
use semver::Version;
use serde::{Deserialize, Serialize};
use std::fmt;

/// which part of a version a new changelog entry bumps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VersionBump {
    #[default]
    Patch,
    Minor,
    Major,
}

impl fmt::Display for VersionBump {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VersionBump::Patch => write!(f, "patch"),
            VersionBump::Minor => write!(f, "minor"),
            VersionBump::Major => write!(f, "major"),
        }
    }
}

impl std::str::FromStr for VersionBump {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "patch" => Ok(VersionBump::Patch),
            "minor" => Ok(VersionBump::Minor),
            "major" => Ok(VersionBump::Major),
            _ => Err(format!(
                "invalid change type: {}, use 'patch', 'minor' or 'major'",
                s
            )),
        }
    }
}

/// compute the version that follows `version`
///
/// only plain `MAJOR.MINOR.PATCH` versions can be increased; pre-release
/// and build suffixes are rejected even though the changelog parser
/// accepts them in headings.
pub fn calculate_next_version(version: &str, bump: VersionBump) -> Result<String> {
    let invalid = || {
        Error::validation(format!(
            "cannot calculate the next version for \"{}\": only versions in the format MAJOR.MINOR.PATCH can be increased automatically",
            version
        ))
    };

    let current = Version::parse(version).map_err(|_| invalid())?;
    if !current.pre.is_empty() || !current.build.is_empty() {
        return Err(invalid());
    }

    let next = match bump {
        VersionBump::Patch => current
            .patch
            .checked_add(1)
            .map(|patch| Version::new(current.major, current.minor, patch)),
        VersionBump::Minor => current
            .minor
            .checked_add(1)
            .map(|minor| Version::new(current.major, minor, 0)),
        VersionBump::Major => current
            .major
            .checked_add(1)
            .map(|major| Version::new(major, 0, 0)),
    }
    .ok_or_else(|| {
        Error::validation(format!(
            "cannot calculate the next {} version for \"{}\": the number is too large",
            bump, version
        ))
    })?;

    Ok(next.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_patch_bump() {
        assert_eq!(
            calculate_next_version("0.2.0", VersionBump::Patch).unwrap(),
            "0.2.1"
        );
    }

    #[test]
    fn test_minor_bump_resets_patch() {
        assert_eq!(
            calculate_next_version("1.4.7", VersionBump::Minor).unwrap(),
            "1.5.0"
        );
    }

    #[test]
    fn test_major_bump_resets_rest() {
        assert_eq!(
            calculate_next_version("1.4.7", VersionBump::Major).unwrap(),
            "2.0.0"
        );
    }

    #[test]
    fn test_rejects_prerelease() {
        let err = calculate_next_version("1.0.0-beta.1", VersionBump::Patch).unwrap_err();
        assert!(matches!(err, Error::Validation { .. }));
    }

    #[test]
    fn test_rejects_other_shapes() {
        for version in ["1.0", "1.0.0.1", "v1.0.0", "", "1.0.0+build"] {
            assert!(
                calculate_next_version(version, VersionBump::Patch).is_err(),
                "{} should be rejected",
                version
            );
        }
    }

    #[test]
    fn test_rejects_bump_past_largest_number() {
        let max = u64::MAX;
        for (version, bump) in [
            (format!("0.0.{}", max), VersionBump::Patch),
            (format!("0.{}.3", max), VersionBump::Minor),
            (format!("{}.2.3", max), VersionBump::Major),
        ] {
            let err = calculate_next_version(&version, bump).unwrap_err();
            assert!(matches!(err, Error::Validation { .. }), "{}", version);
        }

        // only the bumped part has to have room
        assert_eq!(
            calculate_next_version(&format!("1.{}.0", max), VersionBump::Major).unwrap(),
            "2.0.0"
        );
    }

    #[test]
    fn test_bump_from_str() {
        assert_eq!("MINOR".parse::<VersionBump>(), Ok(VersionBump::Minor));
        assert!("huge".parse::<VersionBump>().is_err());
        assert_eq!(VersionBump::default(), VersionBump::Patch);
    }
}
