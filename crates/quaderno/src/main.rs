use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use tracing::{info, warn, Level};
use tracing_subscriber::{fmt, EnvFilter};

use sfoglia::theme::{stored_theme, THEME_KEY};
use sfoglia::{EffectsProfile, PreferenceStore, Theme};

mod config;
mod content;
mod db;
mod headless;
mod html;
mod types;
mod watch;

use config::Settings;
use db::SqliteStore;
use html::Look;

#[derive(Parser, Debug)]
#[command(name = "quaderno")]
#[command(about = "Build and inspect static study-guide sites")]
#[command(version)]
struct Args {
    #[command(subcommand)]
    command: Commands,

    /// Output directory for generated files [env: QUADERNO_OUTPUT, default: site]
    #[arg(short, long, global = true)]
    output: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", global = true)]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Render the site from a guide file
    Build {
        /// Path to the guide JSON file
        guide: PathBuf,

        /// Rebuild whenever the guide file changes
        #[arg(long)]
        watch: bool,

        /// Page effects profile baked into the generated pages
        #[arg(long, value_enum, default_value = "basic")]
        effects: EffectsArg,
    },

    /// Run chapter search queries without a browser, in order
    Search {
        /// Path to the guide JSON file
        guide: PathBuf,

        /// Queries, applied one after another like successive keystrokes
        #[arg(required = true)]
        queries: Vec<String>,
    },

    /// Inspect or change the stored theme preference
    Theme {
        #[command(subcommand)]
        action: ThemeAction,
    },

    /// Validate guide content
    Check {
        /// Path to the guide JSON file
        guide: PathBuf,
    },
}

#[derive(Subcommand, Debug)]
enum ThemeAction {
    /// Print the stored theme
    Show,
    /// Switch between light and dark
    Toggle,
    /// Store a specific theme
    Set {
        #[arg(value_enum)]
        theme: ThemeArg,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum ThemeArg {
    Light,
    Dark,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum EffectsArg {
    Basic,
    Enhanced,
}

impl From<EffectsArg> for EffectsProfile {
    fn from(arg: EffectsArg) -> Self {
        match arg {
            EffectsArg::Basic => EffectsProfile::Basic,
            EffectsArg::Enhanced => EffectsProfile::Enhanced,
        }
    }
}

impl From<ThemeArg> for Theme {
    fn from(arg: ThemeArg) -> Self {
        match arg {
            ThemeArg::Light => Theme::Light,
            ThemeArg::Dark => Theme::Dark,
        }
    }
}

fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_max_level(Level::TRACE)
        .init();
}

fn main() -> Result<()> {
    let args = Args::parse();

    init_tracing(&args.log_level);

    let settings = Settings::from_env().with_output(args.output);

    match args.command {
        Commands::Build {
            guide,
            watch: watch_changes,
            effects,
        } => {
            let effects = effects.into();
            build(&guide, &settings, effects)?;
            if watch_changes {
                watch::watch_guide(&guide, || build(&guide, &settings, effects))?;
            }
        }
        Commands::Search { guide, queries } => {
            let guide = content::load_guide(&guide)?;
            for report in headless::run_queries(&guide, &queries) {
                println!("> {:?}", report.query);
                for slug in &report.visible {
                    if let Some(chapter) = guide.chapters.iter().find(|c| &c.slug == slug) {
                        println!("  {:>2}. {}", chapter.number, chapter.title);
                    }
                }
                if let Some(notice) = &report.notice {
                    println!("  {notice}");
                }
                info!(
                    query = %report.query,
                    visible = report.visible.len(),
                    total = guide.chapters.len(),
                    "Query applied"
                );
            }
        }
        Commands::Theme { action } => {
            let store = SqliteStore::open(&settings.db_path)?;
            let theme = match action {
                ThemeAction::Show => stored_theme(&store),
                ThemeAction::Toggle => save_theme(&store, stored_theme(&store).toggled())?,
                ThemeAction::Set { theme } => save_theme(&store, theme.into())?,
            };
            println!("{} {}", theme.icon(), theme);
            if let Some(updated_at) = db::preference_updated_at(store.connection(), THEME_KEY)? {
                info!(updated_at = %updated_at, "Theme preference");
            }
        }
        Commands::Check { guide: path } => {
            let guide = content::load_guide(&path)?;
            let issues = content::validate(&guide);
            if issues.is_empty() {
                info!(
                    chapters = guide.chapters.len(),
                    file = %path.display(),
                    "Guide is valid"
                );
            } else {
                for issue in &issues {
                    warn!(issue = %issue, "Content issue");
                }
                anyhow::bail!("{} content issue(s) in {}", issues.len(), path.display());
            }
        }
    }

    Ok(())
}

fn build(guide_path: &Path, settings: &Settings, effects: EffectsProfile) -> Result<()> {
    let guide = content::load_valid_guide(guide_path)?;

    // A missing or unreadable preference store must not block a build
    let theme = match SqliteStore::open(&settings.db_path) {
        Ok(store) => stored_theme(&store),
        Err(e) => {
            warn!(error = %format!("{e:#}"), "Using default theme");
            Theme::default()
        }
    };

    let generated_at = chrono::Local::now().format("%Y-%m-%d %H:%M").to_string();
    let look = Look { theme, effects };
    let written = html::generate_site(&guide, &settings.output_dir, look, &generated_at)
        .context("Failed to generate site")?;

    info!(
        pages = written.len(),
        theme = %theme,
        effects = effects.as_str(),
        output = %settings.output_dir.display(),
        "Site built"
    );
    Ok(())
}

fn save_theme(store: &SqliteStore, theme: Theme) -> Result<Theme> {
    store
        .save(THEME_KEY, theme.as_str())
        .context("Failed to store theme")?;
    Ok(theme)
}
