//! Event scripts.
//!
//! A script is a JSON-lines file with one [`SessionEvent`] per line. Blank
//! lines and lines starting with `#` are skipped.

use std::path::Path;

use huddle_shared::error::Result;
use huddle_shared::{HuddleError, SessionEvent};
use tracing::debug;

pub fn load_script(path: impl AsRef<Path>) -> Result<Vec<SessionEvent>> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)?;
    let events = parse_script(&text)?;
    debug!(path = %path.display(), events = events.len(), "Loaded event script");
    Ok(events)
}

pub fn parse_script(text: &str) -> Result<Vec<SessionEvent>> {
    let mut events = Vec::new();

    for (index, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let event = serde_json::from_str(line).map_err(|e| HuddleError::InvalidEvent {
            line: index + 1,
            reason: e.to_string(),
        })?;
        events.push(event);
    }

    Ok(events)
}

#[cfg(test)]
mod tests {
    use super::*;
    use huddle_shared::ClientId;
    use std::io::Write;

    const SCRIPT: &str = r#"
# Alice joins before her username is known
{"type":"participant_joined","client_id":"34e45b57-251f-44a0-bd78-340257e417b6"}
{"type":"participant_status_changed","client_id":"34e45b57-251f-44a0-bd78-340257e417b6","username":"Alice","video":true}

{"type":"participant_left","client_id":"34e45b57-251f-44a0-bd78-340257e417b6"}
"#;

    #[test]
    fn test_parse_skips_comments_and_blank_lines() {
        let events = parse_script(SCRIPT).unwrap();
        assert_eq!(events.len(), 3);
        assert_eq!(
            events[2],
            SessionEvent::ParticipantLeft {
                client_id: ClientId::from("34e45b57-251f-44a0-bd78-340257e417b6"),
            }
        );
    }

    #[test]
    fn test_parse_reports_line_number() {
        let text = "{\"type\":\"presenter_changed\"}\n\n{\"type\":\"dance\"}\n";
        match parse_script(text) {
            Err(HuddleError::InvalidEvent { line, .. }) => assert_eq!(line, 3),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(SCRIPT.as_bytes()).unwrap();

        let events = load_script(file.path()).unwrap();
        assert_eq!(events.len(), 3);
        assert_eq!(events[0].kind(), "participant_joined");
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_script(dir.path().join("missing.jsonl"));
        assert!(matches!(result, Err(HuddleError::Io(_))));
    }
}
