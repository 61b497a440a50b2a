use std::fmt;
use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug)]
pub enum Error {
    /// the changelog text does not follow the expected grammar
    Format {
        line: usize,
        content: String,
        reason: String,
    },
    NotFound {
        version: String,
    },
    Validation {
        reason: String,
    },
    EmptyChangelog,
    AlreadyReleased {
        version: String,
    },
    ChangelogExists {
        path: PathBuf,
    },
    ChangelogMissing {
        path: PathBuf,
    },
    DirtyWorkTree {
        path: PathBuf,
    },
    RepositoryNotFound {
        path: PathBuf,
    },
    GitError(Box<dyn std::error::Error + Send + Sync>),
    GitDiscoverError(Box<gix::discover::Error>),
    FileReadError {
        path: PathBuf,
        source: std::io::Error,
    },
    FileWriteError {
        path: PathBuf,
        source: std::io::Error,
    },
    TomlParseError {
        path: PathBuf,
        source: toml::de::Error,
    },
    JsonParseError {
        path: PathBuf,
        source: serde_json::Error,
    },
    IoError(std::io::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Format {
                line,
                content,
                reason,
            } => {
                write!(
                    f,
                    "parse error on line {}: {} We found: \"{}\"",
                    line, reason, content
                )
            }
            Error::NotFound { version } => {
                write!(f, "couldn't find version {} in the changelog", version)
            }
            Error::Validation { reason } => {
                write!(f, "{}", reason)
            }
            Error::EmptyChangelog => {
                write!(f, "the changelog does not contain any versions")
            }
            Error::AlreadyReleased { version } => {
                write!(
                    f,
                    "previous version \"{}\" already had a release date",
                    version
                )
            }
            Error::ChangelogExists { path } => {
                write!(f, "a file named {} already exists", path.display())
            }
            Error::ChangelogMissing { path } => {
                write!(f, "{} not found", path.display())
            }
            Error::DirtyWorkTree { path } => {
                write!(
                    f,
                    "the git work tree at {} has uncommitted changes (use --force to release anyway)",
                    path.display()
                )
            }
            Error::RepositoryNotFound { path } => {
                write!(f, "git repository not found in path: {}", path.display())
            }
            Error::GitError(err) => {
                write!(f, "git error: {}", err)
            }
            Error::GitDiscoverError(err) => {
                write!(f, "git discover error: {}", err)
            }
            Error::FileReadError { path, source } => {
                write!(f, "failed to read file: {} ({})", path.display(), source)
            }
            Error::FileWriteError { path, source } => {
                write!(f, "failed to write file: {} ({})", path.display(), source)
            }
            Error::TomlParseError { path, source } => {
                write!(
                    f,
                    "failed to parse toml file: {} ({})",
                    path.display(),
                    source
                )
            }
            Error::JsonParseError { path, source } => {
                write!(
                    f,
                    "failed to parse json file: {} ({})",
                    path.display(),
                    source
                )
            }
            Error::IoError(err) => {
                write!(f, "io error: {}", err)
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::FileReadError { source, .. } => Some(source),
            Error::FileWriteError { source, .. } => Some(source),
            Error::TomlParseError { source, .. } => Some(source),
            Error::JsonParseError { source, .. } => Some(source),
            Error::GitError(err) => Some(err.as_ref()),
            Error::GitDiscoverError(err) => Some(err.as_ref()),
            Error::IoError(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::IoError(err)
    }
}

impl From<gix::discover::Error> for Error {
    fn from(err: gix::discover::Error) -> Self {
        Error::GitDiscoverError(Box::new(err))
    }
}

impl Error {
    pub fn from_git_error<T: std::error::Error + Send + Sync + 'static>(err: T) -> Self {
        Error::GitError(Box::new(err))
    }

    pub fn format(line: usize, content: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::Format {
            line,
            content: content.into(),
            reason: reason.into(),
        }
    }

    pub fn validation(reason: impl Into<String>) -> Self {
        Error::Validation {
            reason: reason.into(),
        }
    }
}
