use std::path::PathBuf;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use clap::Parser;

use lens_capture_core::{
    MonitoredAudioGraph, RecordController, RecorderError, RecorderHost, RecorderSettings,
    ShareTarget, ToggleOutcome,
};
use lens_capture_headless::{
    acquire_user_media, CanvasSurface, DirectorySink, HeadlessAudioGraph, LogNotifier,
    OutboxShareTarget, SimulatedLens, TimedEncoderFactory,
};

/// How long to wait for the encoder to finalize after stopping.
const STOP_TIMEOUT: Duration = Duration::from_secs(5);

/// Record a headless lens session to disk.
#[derive(Debug, Parser)]
#[command(name = "lens-recorder", version)]
struct Args {
    /// Directory recordings are saved into.
    #[arg(long, default_value = "recordings")]
    output_dir: PathBuf,

    /// How long to record, in milliseconds.
    #[arg(long, default_value_t = 1000)]
    duration_ms: u64,

    /// Saved file name (overrides the settings file).
    #[arg(long)]
    file_name: Option<String>,

    /// JSON settings file.
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Number of sound sources the simulated lens plays.
    #[arg(long, default_value_t = 2)]
    lens_voices: usize,

    /// Portrait 1080x1920 canvas instead of 1920x1080.
    #[arg(long)]
    mobile: bool,

    /// Share the recording after saving it.
    #[arg(long)]
    share: bool,

    /// Outbox directory used as the share sheet.
    #[arg(long)]
    outbox: Option<PathBuf>,
}

fn main() {
    env_logger::init();

    let args = Args::parse();
    if let Err(e) = run(args) {
        log::error!("lens-recorder failed: {}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<(), RecorderError> {
    let mut settings = match &args.settings {
        Some(path) => RecorderSettings::load(path)?,
        None => RecorderSettings::default(),
    };
    if let Some(name) = args.file_name {
        settings.output_file_name = name;
    }

    // Monitor first, so every context the lens creates is seen.
    let graph = Arc::new(MonitoredAudioGraph::new(HeadlessAudioGraph::new()));
    let camera = acquire_user_media(true, true)?;
    SimulatedLens::apply(graph.as_ref(), args.lens_voices)?;

    let sink = DirectorySink::new(&args.output_dir);
    let host = RecorderHost {
        audio: graph.clone(),
        encoders: Arc::new(TimedEncoderFactory::default()),
        sink: Arc::new(sink.clone()),
        share: args
            .outbox
            .map(|outbox| Arc::new(OutboxShareTarget::new(outbox)) as Arc<dyn ShareTarget>),
    };

    let mut controller = RecordController::new(
        host,
        Arc::new(CanvasSurface::for_device(args.mobile)),
        graph.registry(),
        settings.clone(),
        Arc::new(LogNotifier),
    );
    controller.set_microphone(camera);

    controller.toggle()?;
    let deadline = Instant::now() + Duration::from_millis(args.duration_ms);
    while Instant::now() < deadline {
        thread::sleep(Duration::from_millis(settings.chunk_interval_ms));
        controller.process_events()?;
    }

    let mut outcome = controller.toggle()?;
    let stop_deadline = Instant::now() + STOP_TIMEOUT;
    let file_name = loop {
        match outcome {
            ToggleOutcome::Saved(name) => break name,
            ToggleOutcome::Stopping if Instant::now() < stop_deadline => {
                thread::sleep(Duration::from_millis(10));
                outcome = match controller.process_events()? {
                    Some(name) => ToggleOutcome::Saved(name),
                    None => ToggleOutcome::Stopping,
                };
            }
            _ => return Err(RecorderError::InvalidState("recording did not stop".into())),
        }
    };

    if let Some(artifact) = controller.session().and_then(|s| s.artifact()) {
        println!(
            "Saved {} ({} bytes, {} chunks, {})",
            sink.path_for(&file_name).display(),
            artifact.size_bytes(),
            artifact.chunks().len(),
            artifact.mime_type()
        );
    }

    if args.share {
        let outcome = controller.share_last(Some(&file_name))?;
        println!("Share outcome: {:?}", outcome);
    }

    Ok(())
}
