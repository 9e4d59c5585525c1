pub mod azure_speech_service;
