pub mod file_transcript_sink;
