pub mod extract_audio_use_case;
pub mod run_logger;
pub mod transcription_controller;
