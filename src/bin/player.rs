use std::{io, path::PathBuf, process::ExitCode, time::Duration};

use anyhow::Context;
use clap::Parser;
use log::{LevelFilter, debug, info};
use myrtio_light_player::{
    ControlChannel, LoopExit, Output, PatternNode, PatternSource, RenderLoop, RunConfig, Sink,
    SinkError, SystemClock,
    config::{DEFAULT_INTENSITY, DEFAULT_PIXEL_COUNT, DEFAULT_TEMPERATURE},
    frame_scheduler::DEFAULT_FPS,
    render_loop::DEFAULT_CONTROL_SIZE,
    sink::{Apa102Sink, RetryPolicy, Retrying, TerminalSink, open_spidev},
};

static CONTROL: ControlChannel<DEFAULT_CONTROL_SIZE> = ControlChannel::new();

/// Plays an animated pattern on an APA102 strip or previews it in the terminal.
#[derive(Parser, Debug)]
#[command(name = "myrtio-light-player", version)]
struct Cli {
    /// Frames per second (1-200).
    #[arg(long, default_value_t = DEFAULT_FPS)]
    fps: u32,

    /// Number of pixels on the strip (1-10000).
    #[arg(short = 'n', long = "pixels", default_value_t = DEFAULT_PIXEL_COUNT)]
    pixels: u32,

    /// Light intensity (1-255).
    #[arg(short = 'l', long, default_value_t = DEFAULT_INTENSITY)]
    intensity: u32,

    /// Light temperature in Kelvin, 0 disables white point correction.
    #[arg(short = 't', long, default_value_t = DEFAULT_TEMPERATURE)]
    temperature: u32,

    /// SPI bus to use, e.g. `0.0` for /dev/spidev0.0.
    #[arg(long)]
    spi: Option<String>,

    /// SPI bus speed limit in Hz, 0 keeps the device default.
    #[arg(long, default_value_t = 0)]
    hz: u32,

    /// File to load the pattern document from.
    #[arg(short = 'f', long = "file")]
    file: Option<PathBuf>,

    /// Inline pattern document, e.g. '"#0101ff"'.
    #[arg(short = 'r', long = "raw")]
    raw: Option<String>,

    /// Preview the strip in the terminal instead of driving a bus.
    #[arg(long, default_value_t = false)]
    terminal: bool,

    /// Stop after this many seconds.
    #[arg(long, value_name = "SECONDS")]
    duration: Option<u64>,

    /// Enable debug logging.
    #[arg(short, long, default_value_t = false)]
    verbose: bool,
}

impl Cli {
    fn into_config(self) -> anyhow::Result<RunConfig> {
        let source = PatternSource::from_options(self.file, self.raw)?;
        Ok(RunConfig {
            fps: self.fps,
            pixel_count: self.pixels,
            intensity: self.intensity,
            temperature: self.temperature,
            bus: self.spi,
            bus_hz: self.hz,
            source,
            terminal: self.terminal,
            duration: self.duration.map(Duration::from_secs),
        })
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report(&err);
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: bool) {
    let mut builder = env_logger::builder();
    builder.filter_level(LevelFilter::Warn).parse_default_env();
    if verbose {
        builder.filter_level(LevelFilter::Debug);
    }
    builder.init();
}

#[allow(clippy::print_stderr)]
fn report(err: &anyhow::Error) {
    eprintln!("myrtio-light-player: {err}");
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let config = cli.into_config()?;
    config.validate()?;
    let output = config.output()?;
    let pattern = config.source.load()?;
    info!("playing {} pattern", pattern.kind().name());

    // Ctrl-C and SIGTERM stop the loop so the sink still gets closed.
    let sender = CONTROL.sender();
    ctrlc::set_handler(move || {
        debug!("stop requested by signal");
        sender.stop();
    })
    .context("installing signal handler")?;

    if let Some(duration) = config.duration {
        let sender = CONTROL.sender();
        std::thread::spawn(move || {
            std::thread::sleep(duration);
            sender.stop();
        });
    }

    let exit = match output {
        Output::Terminal => {
            let sink = TerminalSink::new(io::stdout().lock(), config.pixel_count());
            play(pattern, sink, &config)?
        }
        Output::Spi(bus) => {
            let bus = open_spidev(&bus, config.bus_speed())?;
            let sink = Retrying::new(
                Apa102Sink::new(bus, &config.apa102_config()),
                RetryPolicy::default(),
            );
            play(pattern, sink, &config)?
        }
    };

    info!("played {} frames", exit.frames);
    Ok(())
}

fn play<S: Sink>(
    pattern: PatternNode,
    sink: S,
    config: &RunConfig,
) -> Result<LoopExit, SinkError> {
    RenderLoop::new(pattern, sink, SystemClock::new(), config.loop_config())
        .with_control(CONTROL.receiver())
        .run()
}
