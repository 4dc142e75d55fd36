use std::path::PathBuf;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use colored::Colorize;
use timelapse::{
    FfmpegLogLevel, FramePattern, HoldFrameSource, InputProfile, TimelapseAssembler,
    TimelapseConfig, VideoCodec,
};

const CLI_AFTER_HELP: &str = "Examples:\n  timelapse assemble --root ~/Pictures/rayTracing\n  timelapse assemble --root renders --profile rendered --duration 10 --hold 2\n  timelapse assemble --input-dir frames --extension jpg --any-width --hold-last\n  timelapse completions zsh > _timelapse";

#[derive(Debug, Parser)]
#[command(
    name = "timelapse",
    version,
    about = "Assemble numbered still images into a time-lapse video",
    after_help = CLI_AFTER_HELP
)]
struct Cli {
    #[command(flatten)]
    global: GlobalOptions,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Parser, Clone, Default)]
struct GlobalOptions {
    /// Show additional logging output.
    #[arg(long)]
    verbose: bool,

    /// FFmpeg log level (quiet, panic, fatal, error, warning, info, verbose, debug, trace).
    #[arg(long)]
    log_level: Option<String>,
}

#[derive(Debug, Parser, Clone)]
struct AssembleArgs {
    /// Root directory the input profile is resolved against.
    #[arg(long, default_value = ".")]
    root: PathBuf,

    /// Input profile: shuffle (<root>/shuffle, .bmp) | rendered (<root>, .png).
    #[arg(long, default_value = "shuffle")]
    profile: String,

    /// Read frames from this directory instead of the profile's.
    #[arg(long)]
    input_dir: Option<PathBuf>,

    /// Literal prefix of frame file names.
    #[arg(long, default_value = "image_")]
    prefix: String,

    /// Width of the zero-padded sequence number.
    #[arg(long, default_value_t = 4)]
    digits: usize,

    /// Accept sequence numbers of any width.
    #[arg(long)]
    any_width: bool,

    /// Frame file extension (defaults to the profile's).
    #[arg(long)]
    extension: Option<String>,

    /// Output video path (default: <input dir>/time_lapse_video.mp4).
    #[arg(long)]
    output: Option<PathBuf>,

    /// Target length of the sequence in seconds, excluding the hold.
    #[arg(long, default_value_t = 7.0)]
    duration: f64,

    /// How long the closing frame is held, in seconds.
    #[arg(long, default_value_t = 4.0)]
    hold: f64,

    /// Closing image (default: <input dir>/image.png).
    #[arg(long, conflicts_with = "hold_last")]
    hold_image: Option<PathBuf>,

    /// Hold the last frame of the sequence instead of a separate image.
    #[arg(long)]
    hold_last: bool,

    /// Codec tag: mp4v | avc1 | hvc1.
    #[arg(long, default_value = "mp4v")]
    codec: String,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Build a video from an image sequence.
    #[command(
        about = "Assemble frames into a video",
        after_help = "Examples:\n  timelapse assemble --root ~/Pictures/rayTracing --profile shuffle\n  timelapse assemble --input-dir frames --output out.mp4 --codec avc1"
    )]
    Assemble(AssembleArgs),

    /// Generate shell completion scripts.
    #[command(about = "Generate shell completions")]
    Completions {
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn parse_profile(value: &str) -> Option<InputProfile> {
    value.parse().ok()
}

fn parse_codec(value: &str) -> Option<VideoCodec> {
    value.parse().ok()
}

fn parse_log_level(value: &str) -> Option<FfmpegLogLevel> {
    value.parse().ok()
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();
}

fn apply_global_options(global: &GlobalOptions) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(level) = &global.log_level {
        let parsed = parse_log_level(level).ok_or(format!("unsupported --log-level: {level}"))?;
        timelapse::set_ffmpeg_log_level(parsed);
    }
    Ok(())
}

fn build_config(args: &AssembleArgs) -> Result<TimelapseConfig, Box<dyn std::error::Error>> {
    let profile = parse_profile(&args.profile)
        .ok_or(format!("unsupported --profile: {}", args.profile))?;
    let codec =
        parse_codec(&args.codec).ok_or(format!("unsupported --codec: {}", args.codec))?;

    let directory = args
        .input_dir
        .clone()
        .unwrap_or_else(|| profile.directory(&args.root));
    let extension = args
        .extension
        .clone()
        .unwrap_or_else(|| profile.extension().to_string());
    let digits = if args.any_width { None } else { Some(args.digits) };
    let pattern = FramePattern::new(args.prefix.clone(), digits, extension)?;

    let mut config = TimelapseConfig::new(directory, pattern)
        .with_video_length(args.duration)
        .with_hold_seconds(args.hold)
        .with_codec(codec);

    if let Some(output) = &args.output {
        config = config.with_output(output.clone());
    }
    if args.hold_last {
        config = config.with_hold_frame(HoldFrameSource::LastInSequence);
    } else if let Some(image) = &args.hold_image {
        config = config.with_hold_frame(HoldFrameSource::Image(image.clone()));
    }

    if config.output_path().exists() {
        eprintln!(
            "{} {}",
            "warning:".yellow().bold(),
            format!("overwriting {}", config.output_path().display()).yellow()
        );
    }

    Ok(config)
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.global.verbose);
    apply_global_options(&cli.global)?;

    match cli.command {
        Commands::Assemble(args) => {
            let config = build_config(&args)?;
            let report = TimelapseAssembler::new(config).run()?;
            log::info!(
                "{:?}: {}x{} @ {} fps, {} frames",
                report.output_path, report.width, report.height, report.frame_rate,
                report.total_frames(),
            );
            println!("Video created successfully!");
        }
        Commands::Completions { shell } => {
            let mut command = Cli::command();
            clap_complete::generate(shell, &mut command, "timelapse", &mut std::io::stdout());
        }
    }

    Ok(())
}

fn main() {
    if let Err(error) = run() {
        eprintln!("{} {error}", "error:".red().bold());
        std::process::exit(1);
    }
}
