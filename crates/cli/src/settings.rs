use std::fs;
use std::path::PathBuf;

const KEY_FIELD: &str = "SpeechKey";
const REGION_FIELD: &str = "Region";

/// Persisted speech credentials, stored as flat `Key = Value` lines in an
/// INI-style file so other front ends for the service can share it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Settings {
    pub speech_key: String,
    pub region: String,
}

impl Settings {
    fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("videoscribe").join("settings.ini"))
    }

    pub fn load() -> Self {
        Self::config_path()
            .and_then(|path| fs::read_to_string(path).ok())
            .map(|text| Self::parse(&text))
            .unwrap_or_default()
    }

    /// Best-effort: a settings file that cannot be written only costs the
    /// user a re-entry next run.
    pub fn save(&self) {
        if let Some(path) = Self::config_path() {
            if let Some(parent) = path.parent() {
                let _ = fs::create_dir_all(parent);
            }
            let _ = fs::write(path, self.render());
        }
    }

    fn parse(text: &str) -> Self {
        let mut settings = Settings::default();
        for line in text.lines() {
            let line = line.trim();
            if line.is_empty()
                || line.starts_with('[')
                || line.starts_with(';')
                || line.starts_with('#')
            {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            match key.trim() {
                KEY_FIELD => settings.speech_key = value.trim().to_string(),
                REGION_FIELD => settings.region = value.trim().to_string(),
                _ => {}
            }
        }
        settings
    }

    fn render(&self) -> String {
        format!(
            "[DEFAULT]\n{KEY_FIELD} = {}\n{REGION_FIELD} = {}\n",
            self.speech_key, self.region
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_render_round_trip() {
        let settings = Settings {
            speech_key: "abc123".to_string(),
            region: "westeurope".to_string(),
        };
        assert_eq!(Settings::parse(&settings.render()), settings);
    }

    #[test]
    fn test_parse_skips_sections_and_comments() {
        let text = "[DEFAULT]\n; a comment\n# another\nSpeechKey = k\nRegion = r\nOther = x\n";
        let settings = Settings::parse(text);
        assert_eq!(settings.speech_key, "k");
        assert_eq!(settings.region, "r");
    }

    #[test]
    fn test_parse_missing_fields_default_empty() {
        let settings = Settings::parse("[DEFAULT]\n");
        assert!(settings.speech_key.is_empty());
        assert!(settings.region.is_empty());
    }

    #[test]
    fn test_parse_tolerates_unpadded_separators() {
        let settings = Settings::parse("SpeechKey=k\nRegion=r");
        assert_eq!(settings.speech_key, "k");
        assert_eq!(settings.region, "r");
    }
}
