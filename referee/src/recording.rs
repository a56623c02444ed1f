use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use budget_shogi::{Action, Event};
use serde::Serialize;

/// Collects the accepted actions of a session and writes them out as one
/// JSON array.
pub struct Recorder {
    path: PathBuf,
    entries: Vec<RecordedAction>,
}

#[derive(Serialize)]
pub struct RecordedAction {
    action: Action,
    event: Event,
}

impl Recorder {
    pub fn new(path: PathBuf) -> anyhow::Result<Self> {
        let directory = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        if !directory.is_dir() {
            anyhow::bail!("Directory '{}' does not exist", directory.display());
        }
        Ok(Self {
            path,
            entries: Vec::new(),
        })
    }

    pub fn store(&mut self, action: Action, event: Event) {
        self.entries.push(RecordedAction { action, event });
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn write_recording(&mut self) -> anyhow::Result<()> {
        let mut writer = BufWriter::new(File::create(&self.path)?);
        serde_json::to_writer_pretty(&mut writer, &self.entries)?;
        writeln!(writer)?;
        writer.flush()?;
        self.entries.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn refuses_a_missing_directory() {
        let path = std::env::temp_dir().join("no-such-directory-for-recordings").join("game.json");
        let err = Recorder::new(path).err().unwrap();
        assert!(err.to_string().starts_with("Directory"));
    }

    #[test]
    fn writes_accepted_actions() {
        let path = std::env::temp_dir().join(format!("referee-recording-{}.json", std::process::id()));
        let mut recorder = Recorder::new(path.clone()).unwrap();
        recorder.store(Action::ConfirmDesign, Event::MatchStarted);
        assert_eq!(recorder.len(), 1);
        recorder.write_recording().unwrap();
        assert!(recorder.is_empty());

        let written: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(
            written,
            serde_json::json!([
                {"action": {"type": "confirm_design"}, "event": {"event": "match_started"}}
            ])
        );
        std::fs::remove_file(path).unwrap();
    }
}
