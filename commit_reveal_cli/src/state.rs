use commit_reveal::{Config, Engine, MemStore, Snapshot, SystemClock};
use std::fs;
use std::path::{Path, PathBuf};

pub const STATE_ENV: &str = "COMMIT_REVEAL_STATE";
pub const DEFAULT_STATE_PATH: &str = "./commit_reveal.json";

/// The JSON file holding a ledger between invocations
pub struct StateFile {
    path: PathBuf,
}

impl StateFile {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        StateFile {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the stored ledger, or start an empty one with `config` if there is none yet
    ///
    /// The config stored with an existing ledger always wins over `config`.
    pub fn load_or_init(&self, config: Config) -> Result<Snapshot, String> {
        if !self.path.exists() {
            return Ok(Snapshot::new(config));
        }
        let data = fs::read(&self.path).map_err(|e| format!("{}", e))?;
        let snapshot = Snapshot::from_json(&data).map_err(|e| format!("{}", e))?;
        if snapshot.config != config {
            log::debug!(
                "using stored reveal delay of {}s, ignoring {}s",
                snapshot.config.reveal_delay,
                config.reveal_delay
            );
        }
        Ok(snapshot)
    }

    /// Write the ledger atomically via a temporary file
    pub fn save(&self, snapshot: &Snapshot) -> Result<(), String> {
        let data = snapshot.to_json().map_err(|e| format!("{}", e))?;
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| format!("{}", e))?;
            }
        }
        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, data).map_err(|e| format!("{}", e))?;
        fs::rename(&tmp_path, &self.path).map_err(|e| format!("{}", e))?;
        Ok(())
    }

    /// Open an engine on the wall clock, exiting with an error message on failure
    pub fn open(&self, command: &str, config: Config) -> Engine<MemStore, SystemClock> {
        match self.load_or_init(config) {
            Ok(snapshot) => Engine::restore(snapshot, SystemClock),
            Err(e) => {
                eprintln!(
                    "commit-reveal {}: unable to read {}: {}",
                    command,
                    self.path.display(),
                    e
                );
                std::process::exit(1);
            }
        }
    }

    /// Persist an engine, exiting with an error message on failure
    pub fn persist(&self, command: &str, engine: &Engine<MemStore, SystemClock>) {
        if let Err(e) = self.save(&engine.snapshot()) {
            eprintln!(
                "commit-reveal {}: unable to write {}: {}",
                command,
                self.path.display(),
                e
            );
            std::process::exit(1);
        }
    }
}
