use clap::Parser;
use std::process::ExitCode;

use face_recorder::cli::{init_config, render_config, Args, Command, ConfigAction};
use face_recorder::config::{self, Config};
use face_recorder::session::{CaptureSession, SessionOptions, SystemClock};
use face_recorder::signal::ShutdownSignal;
use face_recorder::vision::{Camera, CascadeDetector, PreviewWindow, VideoFileWriter, WINDOW_NAME};
use face_recorder::RecorderError;

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let config_path = args.config.clone().unwrap_or_else(config::default_path);

    if let Some(Command::Config { action }) = &args.command {
        return match action {
            ConfigAction::Init => match init_config(&config_path) {
                Ok(path) => {
                    println!("Created config file: {}", path.display());
                    ExitCode::SUCCESS
                }
                Err(e) => {
                    eprintln!("Error: {}", e);
                    ExitCode::FAILURE
                }
            },
            ConfigAction::Show => match load_config(&args) {
                Ok(config) => {
                    print!("{}", render_config(&config, &config_path));
                    ExitCode::SUCCESS
                }
                Err(e) => {
                    eprintln!("Error: {}", e);
                    ExitCode::FAILURE
                }
            },
        };
    }

    let config = match load_config(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match record(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e @ RecorderError::CameraUnavailable { .. }) => {
            log::error!("{}", e);
            eprintln!("Cannot open camera");
            ExitCode::FAILURE
        }
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

/// Load the config file, then apply command-line overrides.
fn load_config(args: &Args) -> Result<Config, config::ConfigError> {
    let mut config = Config::load(args.config.as_deref())?;
    args.apply_to(&mut config);
    config.validate()?;
    Ok(config)
}

/// Open the camera, classifier, writer and preview, then run until the stream ends.
fn record(config: &Config) -> Result<(), RecorderError> {
    let shutdown = ShutdownSignal::new();
    if let Err(e) = shutdown.install_ctrlc_handler() {
        log::warn!("Failed to install Ctrl+C handler: {}", e);
    }

    let session_config = config.session();
    let camera = Camera::open(config.camera.device)?;
    let detector = CascadeDetector::load(&config.detector.cascade, config.detection_params())?;

    let recording = &config.recording;
    let open_writer = |size| {
        VideoFileWriter::open(
            &session_config.output_path,
            &recording.codec,
            recording.fps,
            size,
        )
    };

    let preview = if session_config.display_camera {
        Some(PreviewWindow::open(WINDOW_NAME)?)
    } else {
        log::info!("Preview disabled, press Ctrl+C to stop");
        None
    };

    let options = SessionOptions {
        timeout: config.timeout(),
        shutdown,
    };
    let session = CaptureSession::open(camera, detector, open_writer, preview, SystemClock, options)?;
    let summary = session.run()?;
    log::info!(
        "{} of {} frames had faces",
        summary.frames_with_faces,
        summary.frames_read
    );
    Ok(())
}
