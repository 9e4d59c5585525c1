use std::path::PathBuf;
use std::process;
use std::sync::Arc;

use clap::Parser;

use videoscribe_core::pipeline::run_logger::RunLogger;
use videoscribe_core::pipeline::transcription_controller::{
    RunRequest, RunStatus, TranscriptionController,
};
use videoscribe_core::recognition::infrastructure::azure_speech_service::AzureSpeechService;
use videoscribe_core::shared::credentials::Credentials;
use videoscribe_core::video::infrastructure::ffmpeg_audio_reader::FfmpegAudioReader;
use videoscribe_core::video::infrastructure::hound_wav_writer::HoundWavWriter;

mod settings;

use settings::Settings;

/// Transcribe the audio track of a video file to timestamped text.
#[derive(Parser)]
#[command(name = "videoscribe")]
struct Cli {
    /// Input video file.
    video: PathBuf,

    /// Speech service subscription key (defaults to the saved settings).
    #[arg(long)]
    key: Option<String>,

    /// Speech service region, e.g. westeurope (defaults to the saved settings).
    #[arg(long)]
    region: Option<String>,

    /// Recognition locale.
    #[arg(long, default_value = "en-US")]
    language: String,

    /// Persist --key/--region for later runs.
    #[arg(long)]
    save_settings: bool,
}

/// Prints run progress to stdout, the CLI's stand-in for a log panel.
struct StdoutRunLogger;

impl RunLogger for StdoutRunLogger {
    fn log(&self, message: &str) {
        println!("{message}");
    }
}

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if !cli.video.exists() {
        return Err(format!("Input file not found: {}", cli.video.display()).into());
    }

    let mut settings = Settings::load();
    if let Some(key) = &cli.key {
        settings.speech_key = key.clone();
    }
    if let Some(region) = &cli.region {
        settings.region = region.clone();
    }
    if cli.save_settings {
        settings.save();
        log::info!("Settings saved.");
    }

    let credentials = Credentials::new(settings.speech_key.clone(), settings.region.clone());

    let controller = TranscriptionController::new(Arc::new(StdoutRunLogger));
    let done = controller.start(RunRequest {
        video_path: cli.video,
        credentials,
        reader: Box::new(FfmpegAudioReader),
        writer: Box::new(HoundWavWriter),
        service: Box::new(AzureSpeechService::with_locale(cli.language)),
        sink: None,
    })?;

    // The worker is never joined; the completion channel carries the
    // terminal status.
    match done.recv()? {
        RunStatus::Completed => Ok(()),
        RunStatus::Cancelled => Err("run was cancelled".into()),
        status => Err(format!("run ended with status {status:?}").into()),
    }
}
