use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand};
use colored::Colorize;
use console::Emoji;
use indicatif::{ProgressBar, ProgressStyle};
use log::{LevelFilter, debug};

use pocketcasts::{Client, Episode, PlayingStatus, Podcast, SortOrder};

// Emoji with fallback for terminals without Unicode support
static MICROPHONE: Emoji<'_, '_> = Emoji("🎙️  ", "");
static HEADPHONES: Emoji<'_, '_> = Emoji("🎧 ", "[i] ");
static STAR: Emoji<'_, '_> = Emoji("⭐ ", "* ");
static NOTES: Emoji<'_, '_> = Emoji("📝 ", "");

/// Group name for mutually exclusive logging options.
const ARGS_GROUP_LOGGING: &str = "logging";

/// Browse a Pocket Casts account from the terminal
#[derive(Parser, Debug)]
#[command(name = "pocketcasts")]
#[command(about = "Browse a Pocket Casts account from the terminal")]
#[command(version)]
struct Args {
    /// Account email address
    #[arg(long, env = "POCKETCASTS_EMAIL")]
    email: String,

    /// Account password
    #[arg(long, env = "POCKETCASTS_PASSWORD", hide_env_values = true)]
    password: String,

    /// Suppress everything except results, warnings and errors
    #[arg(short, long, default_value_t = false, group = ARGS_GROUP_LOGGING)]
    quiet: bool,

    /// Enable verbose logging, specify twice for trace logging
    #[arg(short, long, action = ArgAction::Count, group = ARGS_GROUP_LOGGING)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Most popular podcasts
    Charts,
    /// Featured podcasts
    Featured,
    /// Trending podcasts
    Trending,
    /// Search the podcast directory
    Search { term: String },
    /// Show a podcast
    Podcast { uuid: String },
    /// List the recent episodes of a podcast
    Episodes {
        uuid: String,
        /// List oldest episodes first
        #[arg(long)]
        oldest_first: bool,
    },
    /// Show the notes of an episode
    Notes { episode: String },
    /// Subscribed podcasts
    Subscriptions,
    /// New episodes of subscribed podcasts
    NewReleases,
    /// Episodes in progress
    InProgress,
    /// Starred episodes
    Starred,
    /// The up next queue
    UpNext,
}

/// Initializes the logger facade.
///
/// Command line flags take precedence over `RUST_LOG`, which takes
/// precedence over the default of `warn`.
fn init_logger(args: &Args) {
    let mut logger = env_logger::Builder::from_env(
        env_logger::Env::default().filter_or(env_logger::DEFAULT_FILTER_ENV, "warn"),
    );

    if args.quiet || args.verbose > 0 {
        let level = match args.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        };
        logger.filter_module("pocketcasts", level);
    }

    logger.init();
}

fn spinner(quiet: bool, message: &'static str) -> Result<ProgressBar> {
    if quiet {
        return Ok(ProgressBar::hidden());
    }

    let bar = ProgressBar::new_spinner();
    bar.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    bar.set_message(message);
    bar.enable_steady_tick(Duration::from_millis(100));
    Ok(bar)
}

fn format_duration(seconds: u64) -> String {
    let (h, m, s) = (seconds / 3600, (seconds % 3600) / 60, seconds % 60);
    if h > 0 {
        format!("{h}:{m:02}:{s:02}")
    } else {
        format!("{m}:{s:02}")
    }
}

/// Show notes arrive as HTML; strip the markup for terminal output
fn notes_to_text(html: &str) -> String {
    let mut text = String::with_capacity(html.len());
    let mut in_tag = false;
    for c in html.chars() {
        match c {
            '<' => in_tag = true,
            '>' if in_tag => {
                in_tag = false;
                text.push(' ');
            }
            _ if !in_tag => text.push(c),
            _ => {}
        }
    }

    let decoded = html_escape::decode_html_entities(&text);
    decoded.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn print_podcasts(podcasts: &[Podcast]) {
    for (index, podcast) in podcasts.iter().enumerate() {
        println!(
            "{:>4}. {} {}",
            (index + 1).to_string().dimmed(),
            podcast.title.bold(),
            podcast
                .author
                .as_deref()
                .map(|author| format!("by {author}"))
                .unwrap_or_default()
                .dimmed()
        );
        println!("      {}", podcast.uuid.cyan());
    }
}

fn print_episodes(episodes: &[Episode]) {
    for episode in episodes {
        let status = match episode.playing_status {
            PlayingStatus::Unplayed => "new".green(),
            PlayingStatus::Playing => "playing".yellow(),
            PlayingStatus::Played => "played".dimmed(),
        };
        let published = episode
            .published_at
            .map(|dt| dt.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "----------".to_string());
        let progress = match episode.duration {
            Some(duration) => format!(
                "{}/{}",
                format_duration(episode.played_position),
                format_duration(duration)
            ),
            None => format_duration(episode.played_position),
        };

        println!(
            "{} {}{} [{}] {}",
            published.dimmed(),
            if episode.starred { STAR.to_string() } else { String::new() },
            episode.title.bold(),
            status,
            progress.dimmed()
        );
        println!(
            "           {} {}",
            episode.podcast.title.cyan(),
            episode.uuid.dimmed()
        );
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_logger(&args);

    if !args.quiet {
        println!(
            "\n{}{} {}\n",
            MICROPHONE,
            "pocketcasts".bold().magenta(),
            "- Pocket Casts in your terminal".dimmed()
        );
    }

    let bar = spinner(args.quiet, "Logging in")?;
    let client = Client::login(&args.email, &args.password)
        .await
        .context("Failed to log in")?;
    debug!("Running {:?}", args.command);

    bar.set_message("Fetching");
    match args.command {
        Command::Charts => {
            let podcasts = client.get_top_charts().await.context("Failed to fetch charts")?;
            bar.finish_and_clear();
            print_podcasts(&podcasts);
        }
        Command::Featured => {
            let podcasts = client
                .get_featured()
                .await
                .context("Failed to fetch featured podcasts")?;
            bar.finish_and_clear();
            print_podcasts(&podcasts);
        }
        Command::Trending => {
            let podcasts = client
                .get_trending()
                .await
                .context("Failed to fetch trending podcasts")?;
            bar.finish_and_clear();
            print_podcasts(&podcasts);
        }
        Command::Search { term } => {
            let podcasts = client
                .search_podcasts(&term)
                .await
                .with_context(|| format!("Failed to search for '{term}'"))?;
            bar.finish_and_clear();
            print_podcasts(&podcasts);
        }
        Command::Podcast { uuid } => {
            let podcast = client
                .get_podcast(&uuid)
                .await
                .with_context(|| format!("Failed to fetch podcast {uuid}"))?;
            bar.finish_and_clear();
            println!("{HEADPHONES}{}", podcast.title.bold().green());
            if let Some(author) = &podcast.author {
                println!("   {}", author.yellow());
            }
            if let Some(url) = &podcast.url {
                println!("   {}", url.as_str().cyan());
            }
            if let Some(description) = &podcast.description {
                println!("\n{description}");
            }
        }
        Command::Episodes { uuid, oldest_first } => {
            let podcast = Arc::new(
                client
                    .get_podcast(&uuid)
                    .await
                    .with_context(|| format!("Failed to fetch podcast {uuid}"))?,
            );
            let order = if oldest_first {
                SortOrder::OldestToNewest
            } else {
                SortOrder::NewestToOldest
            };
            let episodes = client
                .get_podcast_episodes(&podcast, order)
                .await
                .with_context(|| format!("Failed to fetch episodes of {uuid}"))?;
            bar.finish_and_clear();
            print_episodes(&episodes);
        }
        Command::Notes { episode } => {
            let notes = client
                .get_episode_notes(&episode)
                .await
                .with_context(|| format!("Failed to fetch notes of {episode}"))?;
            bar.finish_and_clear();
            println!("{NOTES}{}", notes_to_text(&notes));
        }
        Command::Subscriptions => {
            let podcasts = client
                .get_subscribed_podcasts()
                .await
                .context("Failed to fetch subscriptions")?;
            bar.finish_and_clear();
            print_podcasts(&podcasts);
        }
        Command::NewReleases => {
            let episodes = client
                .get_new_releases()
                .await
                .context("Failed to fetch new releases")?;
            bar.finish_and_clear();
            print_episodes(&episodes);
        }
        Command::InProgress => {
            let episodes = client
                .get_in_progress()
                .await
                .context("Failed to fetch episodes in progress")?;
            bar.finish_and_clear();
            print_episodes(&episodes);
        }
        Command::Starred => {
            let episodes = client
                .get_starred()
                .await
                .context("Failed to fetch starred episodes")?;
            bar.finish_and_clear();
            print_episodes(&episodes);
        }
        Command::UpNext => {
            let episodes = client
                .get_up_next()
                .await
                .context("Failed to fetch up next")?;
            bar.finish_and_clear();
            print_episodes(&episodes);
        }
    }

    Ok(())
}
