pub mod session_error;
pub mod session_event;
pub mod speech_service;
pub mod transcript_segment;
