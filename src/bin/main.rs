use anyhow::{Context, Result};
use changelog_tool::utils::logging;
use changelog_tool::{
    Changelog, ChangelogToolConfig, Error, UNBOUNDED, VersionBump, add_entry,
    ensure_clean_work_tree, new_changelog, parse_file, read_project_version, release_latest,
    render_versions, select_versions,
};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{info, warn};

/// version used by `init` when the project has no manifest
const FALLBACK_VERSION: &str = "0.0.1";

#[derive(Parser)]
#[command(name = "changelog")]
#[command(version, about = "manipulate your changelog file", long_about = None)]
#[command(propagate_version = true)]
#[command(after_help = "The changelog follows a specific markdown format. Run 'changelog init' to \
see an example of it.")]
struct Cli {
    /// project directory (defaults to current directory)
    #[arg(short = 'C', long = "dir", default_value = ".", global = true)]
    dir: PathBuf,

    /// changelog file, relative to the project directory
    #[arg(long, global = true)]
    file: Option<PathBuf>,

    /// output format (json or human)
    #[arg(short, long, default_value = "human", global = true)]
    format: OutputFormat,

    /// log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Debug)]
enum OutputFormat {
    Json,
    Human,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "human" => Ok(OutputFormat::Human),
            _ => Err(format!(
                "invalid output format: {}, use 'json' or 'human'",
                s
            )),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// create a new, empty changelog
    Init,

    /// add a new line to the changelog
    Add {
        /// the entry text
        #[arg(value_name = "MESSAGE")]
        words: Vec<String>,

        /// the entry text (alternative to the positional form)
        #[arg(short, long, conflicts_with = "words")]
        message: Option<String>,

        /// start a patch release if a new version is needed
        #[arg(long, conflicts_with_all = ["minor", "major"])]
        patch: bool,

        /// start a minor release if a new version is needed
        #[arg(long, conflicts_with = "major")]
        minor: bool,

        /// start a major release if a new version is needed
        #[arg(long)]
        major: bool,
    },

    /// mark the current version as released today
    Release {
        /// release even if the work tree is dirty or the version already has a date
        #[arg(long)]
        force: bool,
    },

    /// rewrite the changelog in the standard format
    Format,

    /// show the latest version, a specific version, or all of them
    Show {
        /// version to show
        #[arg(id = "version_arg", value_name = "VERSION")]
        version: Option<String>,

        /// show all versions
        #[arg(long, conflicts_with = "version_arg")]
        all: bool,

        /// do not wrap long lines
        #[arg(long)]
        nowrap: bool,
    },

    /// list all versions in the changelog
    List,
}

/// the changelog file a command works on
struct Project {
    dir: PathBuf,
    config: ChangelogToolConfig,
    changelog_path: PathBuf,
    label: String,
}

impl Project {
    fn open(dir: &Path, file: Option<&Path>) -> Self {
        let config = ChangelogToolConfig::load_or_default(dir);
        let (changelog_path, label) = match file {
            Some(file) => (dir.join(file), file.display().to_string()),
            None => (config.changelog_path(dir), config.file_name.clone()),
        };

        Self {
            dir: dir.to_path_buf(),
            config,
            changelog_path,
            label,
        }
    }

    fn load(&self) -> Result<Changelog> {
        if !self.changelog_path.is_file() {
            return Err(Error::ChangelogMissing {
                path: self.changelog_path.clone(),
            }
            .into());
        }
        Ok(parse_file(&self.changelog_path)?)
    }

    fn save(&self, changelog: &Changelog) -> Result<()> {
        std::fs::write(
            &self.changelog_path,
            changelog.render(self.config.line_width),
        )
        .map_err(|e| Error::FileWriteError {
            path: self.changelog_path.clone(),
            source: e,
        })?;

        info!(path = %self.changelog_path.display(), "changelog written");
        Ok(())
    }

    fn print_saved(&self, changelog: &Changelog) {
        println!(
            "{} changelogs saved to {}",
            changelog.versions.len(),
            self.label
        );
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {:#}", err);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let project = Project::open(&cli.dir, cli.file.as_deref());

    match cli.command {
        Commands::Init => handle_init(&project),
        Commands::Add {
            words,
            message,
            patch,
            minor,
            major,
        } => {
            let message = message.unwrap_or_else(|| words.join(" "));
            let bump = if major {
                VersionBump::Major
            } else if minor {
                VersionBump::Minor
            } else if patch {
                VersionBump::Patch
            } else {
                project.config.default_bump
            };
            handle_add(&project, &cli.format, &message, bump)
        }
        Commands::Release { force } => handle_release(&project, force),
        Commands::Format => handle_format(&project),
        Commands::Show {
            version,
            all,
            nowrap,
        } => handle_show(&project, &cli.format, version.as_deref(), all, nowrap),
        Commands::List => handle_list(&project, &cli.format),
    }
}

fn handle_init(project: &Project) -> Result<()> {
    if project.changelog_path.exists() {
        return Err(Error::ChangelogExists {
            path: project.changelog_path.clone(),
        }
        .into());
    }

    let version = read_project_version(&project.dir)
        .context("failed to read the project version")?
        .unwrap_or_else(|| {
            warn!(
                "no Cargo.toml or package.json version found, starting at {}",
                FALLBACK_VERSION
            );
            FALLBACK_VERSION.to_string()
        });

    let changelog = new_changelog(version);
    project.save(&changelog)?;
    println!("{} created", project.label);

    Ok(())
}

fn handle_add(
    project: &Project,
    format: &OutputFormat,
    message: &str,
    bump: VersionBump,
) -> Result<()> {
    if message.trim().is_empty() {
        anyhow::bail!("a message must be specified with the \"add\" command");
    }

    let mut changelog = project.load()?;
    let outcome = add_entry(&mut changelog, message, bump)?;
    project.save(&changelog)?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&outcome)?);
        }
        OutputFormat::Human => {
            if outcome.created {
                println!("Creating new version: {}", outcome.version);
            }
            project.print_saved(&changelog);
        }
    }

    Ok(())
}

fn handle_release(project: &Project, force: bool) -> Result<()> {
    let mut changelog = project.load()?;

    if project.config.require_clean_work_tree && !force {
        ensure_clean_work_tree(&project.dir, &project.changelog_path)?;
    }

    let today = chrono::Utc::now().date_naive();
    let released = release_latest(&mut changelog, today, force)?;
    println!("Releasing {}", released.version);

    project.save(&changelog)?;
    project.print_saved(&changelog);

    Ok(())
}

fn handle_format(project: &Project) -> Result<()> {
    let changelog = project.load()?;
    project.save(&changelog)?;
    project.print_saved(&changelog);

    Ok(())
}

fn handle_show(
    project: &Project,
    format: &OutputFormat,
    version: Option<&str>,
    all: bool,
    nowrap: bool,
) -> Result<()> {
    let changelog = project.load()?;
    let versions = select_versions(&changelog, version, all)?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&versions)?);
        }
        OutputFormat::Human => {
            let width = if nowrap {
                UNBOUNDED
            } else {
                project.config.line_width
            };
            println!("{}", render_versions(&versions, width));
        }
    }

    Ok(())
}

fn handle_list(project: &Project, format: &OutputFormat) -> Result<()> {
    let changelog = project.load()?;

    match format {
        OutputFormat::Json => {
            let output: Vec<_> = changelog
                .versions
                .iter()
                .map(|log| {
                    serde_json::json!({
                        "version": log.version,
                        "date": log.date,
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Human => {
            for log in &changelog.versions {
                println!("{}", log.version);
            }
        }
    }

    Ok(())
}
