//! Program persistence backends.
//!
//! Storage is a seam, not a subsystem: the engine never calls it. The
//! embedder decides when to load or save (always off the render path) and
//! which backend to use - a directory of JSON files on hosts with a
//! filesystem, or the single built-in program elsewhere.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{info, warn};

use crate::patch::{Program, ProgramVoice};
use crate::synth::VoiceAllocator;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("program storage io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("program {program} is not a valid program file: {source}")]
    Format {
        program: u8,
        #[source]
        source: serde_json::Error,
    },
    #[error("saving programs is not supported by this storage backend")]
    SaveUnsupported,
}

/// Load/save seam between the embedder and a preset backend.
pub trait ProgramStorage<V: ProgramVoice> {
    /// Load `program` and apply it to the pool.
    ///
    /// `Ok(true)` means the stored program was applied; `Ok(false)` means
    /// it does not exist and the default program was applied instead. On
    /// `Err` the voices are left untouched.
    fn load(&mut self, program: u8, voices: &mut VoiceAllocator<V>) -> Result<bool, StorageError>;

    /// Capture the pool's current settings and persist them as `program`.
    fn save(&mut self, program: u8, voices: &mut VoiceAllocator<V>) -> Result<(), StorageError>;
}

/// JSON files under `<base>/bank_0/program_<n>.json`.
pub struct FilesystemProgramStorage {
    base_path: PathBuf,
}

impl FilesystemProgramStorage {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    fn program_path(&self, program: u8) -> PathBuf {
        self.base_path
            .join("bank_0")
            .join(format!("program_{program}.json"))
    }
}

impl Default for FilesystemProgramStorage {
    fn default() -> Self {
        Self::new(Path::new("patches"))
    }
}

impl<V: ProgramVoice> ProgramStorage<V> for FilesystemProgramStorage {
    fn load(&mut self, program: u8, voices: &mut VoiceAllocator<V>) -> Result<bool, StorageError> {
        let path = self.program_path(program);

        let contents = match fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(program, "program not found, using defaults");
                Program::default().apply_to(voices);
                return Ok(false);
            }
            Err(err) => return Err(err.into()),
        };

        // A corrupt file leaves the voices exactly as they were
        let data: Program =
            serde_json::from_str(&contents).map_err(|source| StorageError::Format {
                program,
                source,
            })?;

        data.apply_to(voices);
        info!(program, path = %path.display(), "loaded program");
        Ok(true)
    }

    fn save(&mut self, program: u8, voices: &mut VoiceAllocator<V>) -> Result<(), StorageError> {
        let data = Program::capture_from(voices);
        let path = self.program_path(program);

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let json = serde_json::to_string_pretty(&data).map_err(|source| StorageError::Format {
            program,
            source,
        })?;
        fs::write(&path, json)?;

        info!(program, path = %path.display(), "saved program");
        Ok(())
    }
}

/// Single built-in program for targets without a filesystem.
///
/// Every program number loads the same preset; saving is unsupported.
pub struct EmbeddedProgramStorage {
    program: Program,
}

impl EmbeddedProgramStorage {
    pub fn new(program: Program) -> Self {
        Self { program }
    }
}

impl Default for EmbeddedProgramStorage {
    fn default() -> Self {
        // Resonant sawtooth with a pronounced filter sweep
        Self::new(Program {
            waveform_shape: 0.0,
            base_cutoff: 222.053,
            filter_q: 3.937,
            filter_mode: 0,
            filter_env_amount: 0.5,
            filter_env_attack: 0.064,
            filter_env_decay: 0.246,
            filter_env_sustain: 0.0236,
            filter_env_release: 0.325,
        })
    }
}

impl<V: ProgramVoice> ProgramStorage<V> for EmbeddedProgramStorage {
    fn load(&mut self, program: u8, voices: &mut VoiceAllocator<V>) -> Result<bool, StorageError> {
        self.program.apply_to(voices);
        info!(program, "loaded embedded default program");
        Ok(true)
    }

    fn save(&mut self, program: u8, _voices: &mut VoiceAllocator<V>) -> Result<(), StorageError> {
        warn!(program, "program save not supported by embedded storage");
        Err(StorageError::SaveUnsupported)
    }
}
