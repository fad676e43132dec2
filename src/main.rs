use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};

use stream_playlist::builder::compile_playlist;
use stream_playlist::config::{self, SortConfig, SortOverrides, CONFIG_FILE_NAME};
use stream_playlist::filter::EpisodeFilter;
use stream_playlist::library::LibrarySnapshot;
use stream_playlist::log::parse_log_level;
use stream_playlist::ordering::EpisodeOrder;
use stream_playlist::show_order::ShowOrder;
use stream_playlist::switch::{ChangeShow, Rotate};
use stream_playlist::{log_debug, log_error, log_info, log_warn};

#[derive(Parser)]
#[command(name = "stream-playlist", about = "Interleave episodes from many shows into one playlist")]
struct Cli {
    /// Project root directory (defaults to current directory)
    #[arg(long, default_value = ".")]
    root: PathBuf,

    /// Path to config file (defaults to {root}/stream-playlist.toml).
    /// When specified, the library path resolves from the config file's
    /// parent directory.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log verbosity level (quiet, error, warn, info, debug)
    #[arg(long, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a default stream-playlist.toml
    Init,
    /// Compile a playlist and print its episode ids in play order
    Compile(CompileArgs),
    /// List every sort option with its label and default
    Options,
}

#[derive(clap::Args)]
struct CompileArgs {
    /// Library snapshot (JSON); overrides [library].path
    #[arg(long)]
    library: Option<PathBuf>,
    /// Playlist to compile; defaults to [library].playlist, else every episode
    #[arg(long)]
    playlist: Option<String>,
    /// Maximum number of episodes
    #[arg(long, allow_negative_numbers = true)]
    limit: Option<i64>,
    /// Seed for the random strategies
    #[arg(long)]
    seed: Option<u64>,
    /// Episode filter (repeatable); replaces configured filters
    #[arg(long = "filter", action = clap::ArgAction::Append)]
    filters: Vec<String>,
    #[arg(long)]
    episode_order: Option<String>,
    #[arg(long)]
    show_order: Option<String>,
    #[arg(long)]
    change_show: Option<String>,
    #[arg(long)]
    rotate: Option<String>,
    /// Reverse shows and/or episodes (repeatable); replaces configured values
    #[arg(long, action = clap::ArgAction::Append)]
    reverse: Vec<String>,
    /// Only draw from these websites (repeatable); replaces configured values
    #[arg(long = "website", action = clap::ArgAction::Append)]
    websites: Vec<String>,
    /// Print a JSON summary instead of one id per line
    #[arg(long)]
    json: bool,
}

fn main() {
    let cli = Cli::parse();

    match parse_log_level(&cli.log_level) {
        Ok(level) => stream_playlist::log::set_log_level(level),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }

    let root = &cli.root;

    let config_base = match &cli.config {
        Some(p) => p.parent().unwrap_or(Path::new(".")).to_path_buf(),
        None => root.to_path_buf(),
    };

    let result = match cli.command {
        Commands::Init => handle_init(root),
        Commands::Compile(args) => handle_compile(root, cli.config.as_deref(), &config_base, args),
        Commands::Options => {
            print_options();
            Ok(())
        }
    };

    if let Err(e) = result {
        log_error!("Error: {}", e);
        std::process::exit(1);
    }
}

fn handle_init(root: &Path) -> Result<(), String> {
    let config_path = root.join(CONFIG_FILE_NAME);
    if config_path.exists() {
        println!("{} already exists, leaving it unchanged", config_path.display());
        return Ok(());
    }

    fs::create_dir_all(root).map_err(|e| format!("Failed to create {}: {}", root.display(), e))?;
    fs::write(&config_path, config::default_config_toml())
        .map_err(|e| format!("Failed to write {}: {}", config_path.display(), e))?;

    println!("Created {}", config_path.display());
    Ok(())
}

fn handle_compile(
    root: &Path,
    config_path: Option<&Path>,
    config_base: &Path,
    args: CompileArgs,
) -> Result<(), String> {
    let mut config = config::load_config_from(config_path, root)?;
    config.sort.apply_overrides(&args.overrides());
    let options = config::validate(&config.sort)?;

    let library_path =
        config::resolve_library_path(config_base, &config.library, args.library.as_deref());
    log_debug!("[pre] Loading library {}", library_path.display());
    let snapshot = LibrarySnapshot::load(&library_path)?;

    let playlist = args.playlist.or_else(|| config.library.playlist.clone());
    let episodes = match &playlist {
        Some(name) => snapshot.playlist_episodes(name)?,
        None => snapshot.episodes(),
    };
    if episodes.is_empty() {
        match &playlist {
            Some(name) => log_warn!("Playlist '{}' has no episodes", name),
            None => log_warn!("The library has no episodes"),
        }
    }
    let shows = snapshot.show_index();
    log_info!(
        "Compiling {} ({} episodes, show order {}, episode order {})",
        playlist.as_deref().unwrap_or("entire library"),
        episodes.len(),
        options.show_order,
        options.episode_order
    );

    let summary = compile_playlist(&episodes, &shows, &options)?;

    if args.json {
        let json = serde_json::to_string_pretty(&summary)
            .map_err(|e| format!("Failed to serialize summary: {}", e))?;
        println!("{}", json);
    } else {
        for id in &summary.episode_ids {
            println!("{}", id);
        }
    }

    Ok(())
}

impl CompileArgs {
    fn overrides(&self) -> SortOverrides {
        SortOverrides {
            filters: self.filters.clone(),
            episode_order: self.episode_order.clone(),
            show_order: self.show_order.clone(),
            change_show: self.change_show.clone(),
            rotate: self.rotate.clone(),
            reverse: self.reverse.clone(),
            websites: self.websites.clone(),
            limit: self.limit,
            seed: self.seed,
        }
    }
}

fn print_options() {
    let defaults = SortConfig::default();

    print_axis(
        "filters",
        "(none)",
        EpisodeFilter::ALL.iter().map(|f| (f.name(), f.label())),
    );
    print_axis(
        "episode_order",
        &defaults.episode_order,
        EpisodeOrder::ALL.iter().map(|o| (o.name(), o.label())),
    );
    print_axis(
        "show_order",
        &defaults.show_order,
        ShowOrder::ALL.iter().map(|o| (o.name(), o.label())),
    );
    print_axis(
        "change_show",
        &defaults.change_show,
        ChangeShow::ALL.iter().map(|c| (c.name(), c.label())),
    );
    print_axis(
        "rotate",
        &defaults.rotate,
        Rotate::ALL.iter().map(|r| (r.name(), r.label())),
    );
    print_axis(
        "reverse",
        "(none)",
        [("shows", "Shows".to_string()), ("episodes", "Episodes".to_string())].into_iter(),
    );
    println!("limit (default {})", defaults.limit);
}

fn print_axis<'a>(
    axis: &str,
    default: &str,
    values: impl Iterator<Item = (&'a str, String)>,
) {
    println!("{} (default {})", axis, default);
    for (name, label) in values {
        let marker = if name == default { "*" } else { " " };
        println!("  {} {:<24} {}", marker, name, label);
    }
}
