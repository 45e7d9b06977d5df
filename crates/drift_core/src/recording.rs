//! Event-stream recording and deterministic playback.
//!
//! Dead reckoning is only sound if replaying the same inputs reproduces the
//! same states. A [`Recording`] captures everything a session consumes (the
//! initial entities, the transport event stream, and the tick times) plus
//! the final state hash, so any run can be recreated bit for bit and
//! verified offline.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{MotionError, Result};
use crate::kinematics::{EntityId, KinematicState, Millis};
use crate::profiles::MotionProfile;
use crate::receiver::TransportEvent;
use crate::session::Session;

/// Recording format version for compatibility.
pub const RECORDING_VERSION: u32 = 1;

/// An entity present when the recording started.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RecordedEntity {
    /// Entity id.
    pub id: EntityId,
    /// Motion profile the entity simulates under.
    pub profile: MotionProfile,
    /// State at recording start.
    pub state: KinematicState,
}

/// One item in the recorded input stream.
///
/// Entries preserve the exact interleaving of event arrival and ticking, so
/// playback drains the same events at the same ticks the original run did.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RecordEntry {
    /// A transport event was enqueued.
    Event(TransportEvent),
    /// An entity was created mid-run.
    Created(RecordedEntity),
    /// The session ticked at this time.
    Tick(Millis),
}

/// Complete capture of one session run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recording {
    /// Recording format version.
    pub version: u32,
    /// Entities tracked before the first entry.
    pub initial: Vec<RecordedEntity>,
    /// Input stream in original order.
    pub entries: Vec<RecordEntry>,
    /// Final state hash for verification.
    pub final_hash: u64,
}

impl Recording {
    /// Save the recording to a file.
    ///
    /// # Errors
    /// Returns an error if serialization or file writing fails.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let bytes = bincode::serialize(self).map_err(|e| {
            MotionError::InvalidState(format!("Failed to serialize recording: {e}"))
        })?;
        std::fs::write(path.as_ref(), bytes)
            .map_err(|e| MotionError::InvalidState(format!("Failed to write recording: {e}")))?;
        Ok(())
    }

    /// Load a recording from a file.
    ///
    /// # Errors
    /// Returns an error if reading or deserialization fails, or if the file
    /// was written by an incompatible version.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let bytes = std::fs::read(path.as_ref())
            .map_err(|e| MotionError::InvalidState(format!("Failed to read recording: {e}")))?;
        let recording: Self = bincode::deserialize(&bytes).map_err(|e| {
            MotionError::InvalidState(format!("Failed to deserialize recording: {e}"))
        })?;

        if recording.version != RECORDING_VERSION {
            return Err(MotionError::VersionMismatch {
                expected: RECORDING_VERSION,
                found: recording.version,
            });
        }

        Ok(recording)
    }

    /// Number of ticks in the recorded stream.
    #[must_use]
    pub fn tick_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| matches!(e, RecordEntry::Tick(_)))
            .count()
    }
}

/// Scoped capture handle for a session run.
///
/// The embedding layer owns exactly one recorder per captured run, mirrors
/// every input it feeds the session into the recorder, and releases it
/// exactly once with [`Recorder::finish`]; dropping it without finishing
/// discards the capture cleanly.
#[derive(Debug, Default)]
pub struct Recorder {
    initial: Vec<RecordedEntity>,
    entries: Vec<RecordEntry>,
}

impl Recorder {
    /// Start a new capture.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an entity present before the run starts.
    pub fn record_initial(&mut self, id: EntityId, profile: MotionProfile, state: KinematicState) {
        self.initial.push(RecordedEntity { id, profile, state });
    }

    /// Record an entity created mid-run.
    pub fn record_created(&mut self, id: EntityId, profile: MotionProfile, state: KinematicState) {
        self.entries
            .push(RecordEntry::Created(RecordedEntity { id, profile, state }));
    }

    /// Record a transport event as it is enqueued.
    pub fn record_event(&mut self, event: &TransportEvent) {
        self.entries.push(RecordEntry::Event(event.clone()));
    }

    /// Record a tick at the given time.
    pub fn record_tick(&mut self, now: Millis) {
        self.entries.push(RecordEntry::Tick(now));
    }

    /// Finish the capture, sealing it with the session's final hash.
    #[must_use]
    pub fn finish(self, final_hash: u64) -> Recording {
        Recording {
            version: RECORDING_VERSION,
            initial: self.initial,
            entries: self.entries,
            final_hash,
        }
    }
}

/// Plays a recording back into a fresh session.
#[derive(Debug)]
pub struct RecordingPlayer {
    recording: Recording,
    session: Session,
    entry_index: usize,
}

impl RecordingPlayer {
    /// Create a player, seeding a session with the recording's initial
    /// entities.
    ///
    /// # Errors
    /// Returns an error if the initial entity set contains duplicates.
    pub fn new(recording: Recording) -> Result<Self> {
        let mut session = Session::new();
        for entity in &recording.initial {
            session.create_entity(entity.id, entity.profile, entity.state)?;
        }

        Ok(Self {
            recording,
            session,
            entry_index: 0,
        })
    }

    /// Process entries up to and including the next tick.
    ///
    /// Returns `false` once the stream is exhausted. Dropped updates during
    /// playback are expected when the original run dropped them too; the
    /// final hash comparison is the arbiter.
    pub fn advance(&mut self) -> Result<bool> {
        while self.entry_index < self.recording.entries.len() {
            let entry = self.recording.entries[self.entry_index].clone();
            self.entry_index += 1;

            match entry {
                RecordEntry::Event(event) => self.session.enqueue(event),
                RecordEntry::Created(entity) => {
                    self.session
                        .create_entity(entity.id, entity.profile, entity.state)?;
                }
                RecordEntry::Tick(now) => {
                    let _ = self.session.tick(now);
                    return Ok(true);
                }
            }
        }

        Ok(false)
    }

    /// Run the whole stream to the end.
    ///
    /// # Errors
    /// Returns an error if an entry cannot be applied.
    pub fn run(&mut self) -> Result<()> {
        while self.advance()? {}
        Ok(())
    }

    /// Reference to the session being replayed into.
    #[must_use]
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Replay the full stream and check the final hash matches the capture.
    ///
    /// # Errors
    /// Returns an error if playback fails.
    pub fn verify(&mut self) -> Result<bool> {
        self.run()?;
        Ok(self.session.state_hash() == self.recording.final_hash)
    }
}
