use clap::{Parser, Subcommand, ValueEnum};
use prompter::playback::{
    build_timeline, CompletionAction, PlaybackOutcome, SurfaceUpdate, Surfaces, Teleprompter,
};
use prompter::{
    export_project, load_project_file_with, parse_scene_with, save_project_file, segment, PrompterConfig,
    PrompterError, SceneList, SceneScript,
};
use serde::Serialize;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser, Debug)]
#[command(author, version, about = "Play scene scripts one line at a time", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// YAML configuration file
    #[arg(long, global = true, value_name = "YAML")]
    config: Option<PathBuf>,

    /// Log level
    #[arg(long, global = true, value_enum, default_value_t = LogLevel::Info)]
    log_level: LogLevel,

    /// Log format
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Pretty)]
    log_format: LogFormat,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Play a scene file or project in the terminal
    Play {
        /// Scene file, or a project ending in .json
        file: PathBuf,
        /// Scene to start from (1-based)
        #[arg(long, default_value_t = 1)]
        scene: usize,
        /// Override every scene's speed (1-100)
        #[arg(long)]
        speed: Option<i64>,
        /// Skip the lead-in countdown
        #[arg(long)]
        no_lead_in: bool,
        /// Extra times to play each scene before moving on
        #[arg(long, default_value_t = 0)]
        repeat: u32,
    },
    /// Print a scene's tokens as JSON
    Segment {
        file: PathBuf,
        #[arg(long, default_value_t = 1)]
        scene: usize,
    },
    /// Print a scene's playback schedule as JSON
    Timeline {
        file: PathBuf,
        #[arg(long, default_value_t = 1)]
        scene: usize,
        #[arg(long)]
        speed: Option<i64>,
    },
    /// Combine scene files into a project
    Export {
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Write the project here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogLevel::Error => write!(f, "error"),
            LogLevel::Warn => write!(f, "warn"),
            LogLevel::Info => write!(f, "info"),
            LogLevel::Debug => write!(f, "debug"),
            LogLevel::Trace => write!(f, "trace"),
        }
    }
}

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Debug)]
enum LogFormat {
    Pretty,
    Json,
}

/// Prints each surface change as a line on stdout
#[derive(Default)]
struct TerminalSurfaces;

impl Surfaces for TerminalSurfaces {
    fn apply(&mut self, update: SurfaceUpdate) {
        let line = match update {
            SurfaceUpdate::Reset => "----------------------------------------".to_string(),
            SurfaceUpdate::Countdown(Some(n)) => format!("   {}...", n),
            SurfaceUpdate::CurrentText(text) => format!("> {}", text),
            SurfaceUpdate::UpcomingText(text) if !text.is_empty() => format!("  next: {}", text),
            SurfaceUpdate::ShowEmotion(text) => format!("  [emotion: {}]", text),
            SurfaceUpdate::ShowNote(text) => format!("  [note: {}]", text),
            SurfaceUpdate::Countdown(None) | SurfaceUpdate::UpcomingText(_) | SurfaceUpdate::HideCues => {
                return;
            }
        };
        let mut stdout = io::stdout().lock();
        let _ = writeln!(stdout, "{}", line);
        let _ = stdout.flush();
    }
}

fn main() {
    let cli = Cli::parse();

    let filter = EnvFilter::builder()
        .with_default_directive(
            cli.log_level
                .to_string()
                .parse()
                .unwrap_or_else(|_| LevelFilter::INFO.into()),
        )
        .from_env_lossy();

    let subscriber_builder = fmt::Subscriber::builder()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false);

    match cli.log_format {
        LogFormat::Json => subscriber_builder.json().init(),
        LogFormat::Pretty => subscriber_builder.pretty().init(),
    }

    if let Err(e) = run(cli) {
        error!("{}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), PrompterError> {
    let config = match &cli.config {
        Some(path) => PrompterConfig::load(path)?,
        None => PrompterConfig::default(),
    };

    match cli.command {
        Command::Play {
            file,
            scene,
            speed,
            no_lead_in,
            repeat,
        } => {
            let scenes = load_scenes(&file, &config)?;
            play_from(&scenes, scene_index(scene)?, speed, no_lead_in, repeat, &config)
        }
        Command::Segment { file, scene } => {
            let scenes = load_scenes(&file, &config)?;
            let script = scenes.get(scene_index(scene)?)?;
            print_json(&segment(&script.content))
        }
        Command::Timeline { file, scene, speed } => {
            let scenes = load_scenes(&file, &config)?;
            let script = scenes.get(scene_index(scene)?)?;
            let tokens = segment(&script.content);
            let speed = speed.unwrap_or_else(|| script.speed_percent.into());
            let timeline = build_timeline(&tokens, speed, &config.timing)
                .with_lead_in(script.lead_in_seconds, &config.timing);
            print_json(&timeline)
        }
        Command::Export { files, output } => {
            let scenes = files
                .iter()
                .map(|path| read_scene(path, &config))
                .collect::<Result<Vec<_>, _>>()?;
            match output {
                Some(path) => {
                    save_project_file(&path, &scenes)?;
                    info!(path = %path.display(), scenes = scenes.len(), "wrote project");
                    Ok(())
                }
                None => {
                    println!("{}", export_project(&scenes)?);
                    Ok(())
                }
            }
        }
    }
}

/// Convert a 1-based scene number from the command line to an index.
fn scene_index(number: usize) -> Result<usize, PrompterError> {
    number.checked_sub(1).ok_or(PrompterError::SceneError {
        index: number,
        message: "scenes are numbered from 1".to_string(),
    })
}

fn is_project(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}

fn read_scene(path: &Path, config: &PrompterConfig) -> Result<SceneScript, PrompterError> {
    let source = fs::read_to_string(path).map_err(|source| PrompterError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_scene_with(&source, &config.scene)
}

fn load_scenes(path: &Path, config: &PrompterConfig) -> Result<SceneList, PrompterError> {
    if is_project(path) {
        load_project_file_with(path, &config.scene)
    } else {
        Ok(SceneList::from(vec![read_scene(path, config)?]))
    }
}

fn play_from(
    scenes: &SceneList,
    start: usize,
    speed: Option<i64>,
    no_lead_in: bool,
    repeat: u32,
    config: &PrompterConfig,
) -> Result<(), PrompterError> {
    scenes.get(start)?;

    let mut prompter = Teleprompter::new(TerminalSurfaces)
        .with_timing(config.timing)
        .with_cue_policy(config.cue_policy);

    let mut index = Some(start);
    while let Some(current) = index {
        let mut script = scenes.get(current)?.clone();
        if let Some(speed) = speed {
            script = script.with_speed(speed);
        }
        if no_lead_in {
            script = script.with_lead_in(0);
        }

        info!(scene = current + 1, title = %script.title, speed = script.speed_percent, "playing scene");
        let mut remaining = repeat;
        prompter.start(script, move |_| {
            if remaining > 0 {
                remaining -= 1;
                CompletionAction::Repeat
            } else {
                CompletionAction::Advance
            }
        })?;

        match prompter.wait() {
            Some(PlaybackOutcome::Advanced { title, runs }) => {
                info!(%title, runs, "scene finished");
            }
            Some(outcome @ PlaybackOutcome::Cancelled { .. }) => {
                warn!(title = outcome.title(), "playback stopped");
                return Ok(());
            }
            None => return Ok(()),
        }
        index = scenes.next_index(current);
    }
    Ok(())
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), PrompterError> {
    let mut stdout = io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, value)
        .map_err(io::Error::from)
        .and_then(|()| writeln!(stdout))
        .map_err(|source| PrompterError::Io {
            path: PathBuf::from("<stdout>"),
            source,
        })
}
