//! `presence` – expressive-presence hook for the Reachy Mini robot
//!
//! The binary sits behind a voice assistant.  Each invocation reads one
//! generated response on stdin and turns the directives inside it into robot
//! motion:
//!
//! - `presence mood` – the first `<!-- MOOD: … -->` directive starts a mood
//!   loop that keeps the robot moving while the reply is being spoken.
//! - `presence move` – up to two `<!-- MOVE: … -->` directives are played
//!   once each.
//! - `presence moods [name]` – list the mood table, or one mood's moves.
//! - `presence config [--write]` – show (or persist) the effective settings.
//!
//! The hook commands never fail the caller: every problem is logged to stderr
//! and the exit status stays 0.

mod config;

use std::io::Read;
use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{error, info, warn};

use presence_hal::sim::{RecordingTrigger, ScriptedPlayback};
use presence_hal::{DaemonClient, MoveTrigger, PlaybackStatusSource, TtsStatusClient};
use presence_kernel::{Clock, ManualClock, MoodCatalog, SystemClock};
use presence_runtime::{MoodLoop, MoodLoopConfig, init_tracing, mood_hook, move_hook};

use config::Config;

#[derive(Debug, Parser)]
#[command(name = "presence", version, about = "Move Reachy Mini along with what it says")]
struct Cli {
    /// Config file (default: ~/.reachy-presence/config.toml).
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run a mood loop for the MOOD directive in the response on stdin.
    Mood(MoodArgs),
    /// Play the MOVE directives in the response on stdin.
    Move(MoveArgs),
    /// List the mood table, or the candidate moves of one mood.
    Moods { name: Option<String> },
    /// Print the effective configuration.
    Config {
        /// Write it to the config file.
        #[arg(long)]
        write: bool,
    },
}

#[derive(Debug, Args)]
struct MoodArgs {
    /// Override the safety timeout, in seconds.
    #[arg(long, value_name = "SECS")]
    max_duration: Option<u64>,

    /// Seed the move and pause picker for a reproducible session.
    #[arg(long)]
    seed: Option<u64>,

    /// Use simulated speech, robot and time instead of the HTTP services.
    #[arg(long)]
    dry_run: bool,

    /// Status polls the simulated speech reports as playing.
    #[arg(long, default_value_t = 3, value_name = "N")]
    dry_run_polls: u32,
}

#[derive(Debug, Args)]
struct MoveArgs {
    /// Record moves instead of calling the robot daemon.
    #[arg(long)]
    dry_run: bool,
}

fn main() {
    let cli = Cli::parse();
    let _tracing = init_tracing("presence");

    let cfg = load_config(cli.config.as_ref());
    match cli.command {
        Command::Mood(args) => run_mood(&cfg, &args, &read_stdin()),
        Command::Move(args) => run_move(&cfg, &args, &read_stdin()),
        Command::Moods { name } => list_moods(&cfg, name.as_deref()),
        Command::Config { write } => show_config(&cfg, cli.config.as_ref(), write),
    }
}

/// Config from `path` (or the default location), falling back to defaults
/// plus environment overrides when the file is missing or unreadable.
fn load_config(path: Option<&PathBuf>) -> Config {
    let loaded = match path {
        Some(p) => config::load_from(p),
        None => config::load(),
    };
    match loaded {
        Ok(Some(cfg)) => cfg,
        Ok(None) => config::from_env(),
        Err(e) => {
            warn!(error = %e, "ignoring config file, using defaults");
            config::from_env()
        }
    }
}

fn read_stdin() -> String {
    read_response(std::io::stdin().lock())
}

/// The whole response from `input`.  Invalid UTF-8 is replaced rather than
/// discarding the text, so directives around it are still found.
fn read_response(mut input: impl Read) -> String {
    let mut raw = Vec::new();
    if let Err(e) = input.read_to_end(&mut raw) {
        warn!(error = %e, "failed to read response from stdin");
    }
    String::from_utf8_lossy(&raw).into_owned()
}

/// Loop timing from `cfg` with the CLI override applied.  An invalid pause
/// range is replaced by the default pauses; the duration is kept.
fn resolve_loop_config(cfg: &Config, max_duration: Option<u64>) -> MoodLoopConfig {
    let mut loop_cfg = cfg.loop_config();
    if let Some(secs) = max_duration {
        loop_cfg.max_duration = Duration::from_secs(secs);
    }
    if let Err(e) = loop_cfg.validate() {
        warn!(error = %e, "invalid pause range, using default pauses");
        loop_cfg = MoodLoopConfig {
            max_duration: loop_cfg.max_duration,
            ..MoodLoopConfig::default()
        };
    }
    loop_cfg
}

fn run_mood(cfg: &Config, args: &MoodArgs, text: &str) {
    let catalog = match cfg.catalog() {
        Ok(c) => c,
        Err(e) => {
            error!(error = %e, "invalid mood table, no moves will be played");
            return;
        }
    };
    let loop_cfg = resolve_loop_config(cfg, args.max_duration);
    let rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    if args.dry_run {
        let mut playback = ScriptedPlayback::playing_for(args.dry_run_polls);
        let mut daemon = RecordingTrigger::new();
        let mut clock = ManualClock::new();
        drive_mood(text, &catalog, loop_cfg, &mut playback, &mut daemon, &mut clock, rng);
        info!(played = ?daemon.played(), "dry run finished");
        return;
    }

    let mut playback = match TtsStatusClient::new(&cfg.tts_url, cfg.status_timeout()) {
        Ok(c) => c,
        Err(e) => {
            error!(error = %e, "cannot reach speech server");
            return;
        }
    };
    let mut daemon = match DaemonClient::new(&cfg.daemon_url, &cfg.dataset, cfg.trigger_timeout()) {
        Ok(c) => c,
        Err(e) => {
            error!(error = %e, "cannot reach robot daemon");
            return;
        }
    };
    let mut clock = SystemClock;
    drive_mood(text, &catalog, loop_cfg, &mut playback, &mut daemon, &mut clock, rng);
}

fn drive_mood(
    text: &str,
    catalog: &MoodCatalog,
    loop_cfg: MoodLoopConfig,
    playback: &mut dyn PlaybackStatusSource,
    daemon: &mut dyn MoveTrigger,
    clock: &mut dyn Clock,
    rng: StdRng,
) {
    let mut mood_loop = match MoodLoop::new(loop_cfg, playback, daemon, clock, rng) {
        Ok(l) => l,
        Err(e) => {
            error!(error = %e, "cannot start mood loop");
            return;
        }
    };
    if let Some(report) = mood_hook(text, catalog, &mut mood_loop) {
        info!(
            session = %report.session,
            mood = %report.mood,
            state = %report.state,
            moves_played = report.moves_played,
            moves_accepted = report.moves_accepted,
            "mood session finished"
        );
    }
}

fn run_move(cfg: &Config, args: &MoveArgs, text: &str) {
    if args.dry_run {
        let mut daemon = RecordingTrigger::new();
        move_hook(text, &mut daemon);
        info!(played = ?daemon.played(), "dry run finished");
        return;
    }
    match DaemonClient::new(&cfg.daemon_url, &cfg.dataset, cfg.trigger_timeout()) {
        Ok(mut daemon) => {
            move_hook(text, &mut daemon);
        }
        Err(e) => error!(error = %e, "cannot reach robot daemon"),
    }
}

fn list_moods(cfg: &Config, name: Option<&str>) {
    let catalog = match cfg.catalog() {
        Ok(c) => c,
        Err(e) => {
            println!("{}", format!("✗ Invalid mood table: {e}").red());
            return;
        }
    };

    match name {
        Some(name) => match catalog.lookup(name) {
            Some(moves) => {
                println!("{}", name.to_lowercase().bold());
                for m in moves {
                    println!("  {m}");
                }
            }
            None => println!(
                "{}",
                format!("✗ Unknown mood '{name}' (falls back to thoughtful)").yellow()
            ),
        },
        None => {
            println!("{}", format!("{} moods", catalog.len()).bold());
            for (mood, moves) in catalog.iter() {
                let names: Vec<&str> = moves.iter().map(|m| m.as_str()).collect();
                println!("  {:<14} {}", mood.as_str().cyan(), names.join(", ").dimmed());
            }
        }
    }
}

fn show_config(cfg: &Config, path: Option<&PathBuf>, write: bool) {
    match toml::to_string_pretty(cfg) {
        Ok(raw) => print!("{raw}"),
        Err(e) => {
            println!("{}", format!("✗ Failed to serialize config: {e}").red());
            return;
        }
    }
    if !write {
        return;
    }
    let target = path.cloned().unwrap_or_else(config::config_path);
    match config::save_to(cfg, &target) {
        Ok(()) => println!("{}", format!("✓ Config written to {}", target.display()).green()),
        Err(e) => println!("{}", format!("✗ {e}").red()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_mood_flags() {
        let cli = Cli::try_parse_from([
            "presence", "mood", "--max-duration", "5", "--seed", "7", "--dry-run",
        ])
        .unwrap();
        let Command::Mood(args) = cli.command else {
            panic!("expected mood subcommand");
        };
        assert_eq!(args.max_duration, Some(5));
        assert_eq!(args.seed, Some(7));
        assert!(args.dry_run);
        assert_eq!(args.dry_run_polls, 3);
    }

    #[test]
    fn config_flag_is_global() {
        let cli = Cli::try_parse_from(["presence", "moods", "--config", "/tmp/p.toml"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/p.toml")));
        assert!(matches!(cli.command, Command::Moods { name: None }));
    }

    #[test]
    fn max_duration_override_wins() {
        let loop_cfg = resolve_loop_config(&Config::default(), Some(5));
        assert_eq!(loop_cfg.max_duration, Duration::from_secs(5));
        assert_eq!(loop_cfg.pause_min, Duration::from_millis(1000));
    }

    #[test]
    fn inverted_pause_range_falls_back_to_defaults() {
        let mut cfg = Config::default();
        cfg.pause_min_ms = 3000;
        cfg.pause_max_ms = 1000;
        cfg.max_duration_secs = 20;

        let loop_cfg = resolve_loop_config(&cfg, None);
        assert_eq!(loop_cfg.max_duration, Duration::from_secs(20));
        assert_eq!(loop_cfg.pause_min, MoodLoopConfig::default().pause_min);
        assert_eq!(loop_cfg.pause_max, MoodLoopConfig::default().pause_max);
        assert!(loop_cfg.validate().is_ok());
    }

    #[test]
    fn invalid_utf8_keeps_the_directive() {
        let mut raw = b"caf\xe9 ".to_vec();
        raw.extend_from_slice(b"<!-- MOOD: calm -->");
        let text = read_response(raw.as_slice());
        assert!(text.contains('\u{FFFD}'));
        assert_eq!(
            presence_runtime::extract_mood(&text).map(|m| m.to_string()),
            Some("calm".to_string())
        );
    }

    #[test]
    fn missing_config_file_gives_defaults() {
        let dir = tempfile::tempdir().expect("tmp dir");
        let cfg = load_config(Some(&dir.path().join("absent.toml")));
        assert_eq!(cfg.pause_max_ms, 2000);
        assert!(cfg.moods.is_none());
    }

    #[test]
    fn unreadable_config_file_gives_defaults() {
        let dir = tempfile::tempdir().expect("tmp dir");
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "this is = = not toml").unwrap();
        let cfg = load_config(Some(&path));
        assert_eq!(cfg.pause_min_ms, 1000);
    }
}
