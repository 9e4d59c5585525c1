pub mod transcript_sink;
