//! Entity registry and per-frame tick loop.
//!
//! A [`Session`] exclusively owns the kinematic state of every remote
//! entity it tracks. It is an explicit object created per connect cycle and
//! dropped on disconnect; collaborators receive it by reference rather than
//! through any global.
//!
//! # Tick model
//!
//! The embedding layer calls [`Session::tick`] once per host frame with the
//! current local time. A tick first drains the event inbox in FIFO order
//! (applying snapshots, control changes, and removals), then advances every
//! tracked entity from its own `last_update` to `now`. All state changes
//! for an entity happen atomically within one tick; renderers never observe
//! a partial update. Nothing here blocks, and no timeouts or cancellation
//! exist at this layer.
//!
//! Entities never share mutable state, so while a single session is
//! strictly single-threaded, independent sessions parallelize freely.

use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

use crate::compensator::extrapolate;
use crate::error::{MotionError, Result};
use crate::integrator::advance_to;
use crate::kinematics::{ControlIntent, EntityId, KinematicState, Millis};
use crate::profiles::MotionProfile;
use crate::receiver::{ControlUpdate, EventInbox, RawSnapshot, TransportEvent};

/// One tracked entity: its resolved motion profile and current state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrackedEntity {
    /// Motion profile the entity simulates under.
    pub profile: MotionProfile,
    /// Current kinematic state.
    pub state: KinematicState,
}

/// Events produced by one call to [`Session::tick`], for the embedding
/// layer (entity lifecycle management, HUD counters, diagnostics).
#[derive(Debug, Default)]
pub struct TickEvents {
    /// Entities whose state was replaced by a snapshot this tick.
    pub applied: Vec<EntityId>,
    /// Entities removed this tick.
    pub removed: Vec<EntityId>,
    /// Updates dropped this tick, with the reason each was dropped.
    pub dropped: Vec<MotionError>,
}

/// Tracks remote entities and advances them between authoritative updates.
#[derive(Debug, Clone, Default)]
pub struct Session {
    entities: HashMap<EntityId, TrackedEntity>,
    inbox: EventInbox,
}

impl Session {
    /// Create an empty session.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start tracking an entity.
    ///
    /// # Errors
    ///
    /// Returns [`MotionError::DuplicateEntity`] if the id is already
    /// tracked; the existing entity is left untouched.
    pub fn create_entity(
        &mut self,
        id: EntityId,
        profile: MotionProfile,
        initial: KinematicState,
    ) -> Result<()> {
        if self.entities.contains_key(&id) {
            return Err(MotionError::DuplicateEntity(id));
        }

        tracing::debug!(entity = id, "tracking entity");
        self.entities.insert(
            id,
            TrackedEntity {
                profile,
                state: initial,
            },
        );
        Ok(())
    }

    /// Stop tracking an entity. Returns whether it was present.
    pub fn remove_entity(&mut self, id: EntityId) -> bool {
        let removed = self.entities.remove(&id).is_some();
        if removed {
            tracing::debug!(entity = id, "entity removed");
        }
        removed
    }

    /// Drop all tracked entities (session teardown).
    pub fn clear(&mut self) {
        self.entities.clear();
    }

    /// Number of tracked entities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Whether no entities are tracked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Current state of an entity, if tracked.
    #[must_use]
    pub fn state(&self, id: EntityId) -> Option<&KinematicState> {
        self.entities.get(&id).map(|e| &e.state)
    }

    /// Full tracked record of an entity, if tracked.
    #[must_use]
    pub fn entity(&self, id: EntityId) -> Option<&TrackedEntity> {
        self.entities.get(&id)
    }

    /// Tracked entity ids in sorted order.
    #[must_use]
    pub fn sorted_ids(&self) -> Vec<EntityId> {
        let mut ids: Vec<EntityId> = self.entities.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Queue a transport event for the next tick.
    pub fn enqueue(&mut self, event: TransportEvent) {
        self.inbox.push(event);
    }

    /// Number of transport events waiting for the next tick.
    #[must_use]
    pub fn pending_events(&self) -> usize {
        self.inbox.len()
    }

    /// Validate and apply a snapshot immediately.
    ///
    /// The snapshot re-seeds the entity's state and replays it forward to
    /// `now` (last snapshot wins; application is idempotent). On any error
    /// the entity's state is unchanged.
    ///
    /// # Errors
    ///
    /// [`MotionError::MalformedSnapshot`] if a required field is missing or
    /// invalid; [`MotionError::UnknownEntity`] if the entity has not been
    /// created yet.
    pub fn apply_snapshot(&mut self, raw: &RawSnapshot, now: Millis) -> Result<EntityId> {
        let snapshot = raw.validate()?;

        let entity = self
            .entities
            .get_mut(&snapshot.entity_id)
            .ok_or(MotionError::UnknownEntity(snapshot.entity_id))?;

        entity.state = extrapolate(&snapshot, &entity.profile, now);
        Ok(snapshot.entity_id)
    }

    /// Apply a validated control change immediately.
    ///
    /// The entity is first advanced to `now` under its old inputs so the
    /// change does not retroactively rewrite the interval already elapsed.
    ///
    /// # Errors
    ///
    /// [`MotionError::UnknownEntity`] if the entity has not been created.
    pub fn set_control(&mut self, id: EntityId, intent: ControlIntent, now: Millis) -> Result<()> {
        let entity = self
            .entities
            .get_mut(&id)
            .ok_or(MotionError::UnknownEntity(id))?;

        advance_to(&mut entity.state, &entity.profile, now);
        entity.state.thrust_active = intent.thrust;
        entity.state.rotation = intent.rotation;
        Ok(())
    }

    /// Apply a raw control update (partial fields) immediately.
    fn apply_control(&mut self, update: &ControlUpdate, now: Millis) -> Result<EntityId> {
        let (id, thrust, rotation) = update.validate()?;

        let entity = self
            .entities
            .get_mut(&id)
            .ok_or(MotionError::UnknownEntity(id))?;

        advance_to(&mut entity.state, &entity.profile, now);
        if let Some(thrust) = thrust {
            entity.state.thrust_active = thrust;
        }
        if let Some(rotation) = rotation {
            entity.state.rotation = rotation;
        }
        Ok(id)
    }

    /// Advance the session to `now`.
    ///
    /// Drains the inbox in FIFO order, then advances every tracked entity
    /// (in sorted id order, for reproducible iteration) from its own
    /// `last_update` to `now`. Dropped updates are logged and reported in
    /// the returned [`TickEvents`]; they never affect other entities.
    pub fn tick(&mut self, now: Millis) -> TickEvents {
        let mut events = TickEvents::default();

        while let Some(event) = self.inbox.pop() {
            match event {
                TransportEvent::Snapshot(raw) => match self.apply_snapshot(&raw, now) {
                    Ok(id) => events.applied.push(id),
                    Err(e) => {
                        tracing::warn!(error = %e, "dropped snapshot");
                        events.dropped.push(e);
                    }
                },
                TransportEvent::Control(update) => match self.apply_control(&update, now) {
                    Ok(_) => {}
                    Err(e) => {
                        tracing::warn!(error = %e, "dropped control update");
                        events.dropped.push(e);
                    }
                },
                TransportEvent::EntityRemoved(id) => {
                    if self.remove_entity(id) {
                        events.removed.push(id);
                    } else {
                        tracing::debug!(entity = id, "removal for untracked entity");
                    }
                }
            }
        }

        for id in self.sorted_ids() {
            if let Some(entity) = self.entities.get_mut(&id) {
                advance_to(&mut entity.state, &entity.profile, now);
            }
        }

        #[cfg(debug_assertions)]
        {
            let hash = self.state_hash();
            tracing::trace!(now, state_hash = hash, "session state hash");
        }

        events
    }

    /// Calculate a hash of the current session state.
    ///
    /// Two sessions fed identical inputs produce identical hashes; used by
    /// determinism tests and recording verification.
    #[must_use]
    pub fn state_hash(&self) -> u64 {
        let mut hasher = DefaultHasher::new();

        let ids = self.sorted_ids();
        ids.len().hash(&mut hasher);

        for id in ids {
            if let Some(entity) = self.entities.get(&id) {
                id.hash(&mut hasher);

                entity.state.position.x.to_bits().hash(&mut hasher);
                entity.state.position.y.to_bits().hash(&mut hasher);
                entity.state.velocity.x.to_bits().hash(&mut hasher);
                entity.state.velocity.y.to_bits().hash(&mut hasher);
                entity.state.heading.to_bits().hash(&mut hasher);
                entity.state.rotation.as_raw().hash(&mut hasher);
                entity.state.thrust_active.hash(&mut hasher);
                entity.state.last_update.hash(&mut hasher);
            }
        }

        hasher.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kinematics::RotationDir;
    use crate::math::Vec2;
    use crate::test_support::fixtures;

    fn session_with_entity(id: EntityId) -> Session {
        let mut session = Session::new();
        session
            .create_entity(
                id,
                fixtures::powered_profile(),
                KinematicState::at_rest(Vec2::ZERO, 0),
            )
            .unwrap();
        session
    }

    #[test]
    fn test_create_and_remove() {
        let mut session = session_with_entity(1);
        assert_eq!(session.len(), 1);

        assert!(matches!(
            session.create_entity(
                1,
                fixtures::powered_profile(),
                KinematicState::at_rest(Vec2::ZERO, 0)
            ),
            Err(MotionError::DuplicateEntity(1))
        ));

        assert!(session.remove_entity(1));
        assert!(!session.remove_entity(1));
        assert!(session.is_empty());
    }

    #[test]
    fn test_snapshot_for_unknown_entity_is_dropped() {
        let mut session = session_with_entity(1);
        let before = *session.state(1).unwrap();

        session.enqueue(TransportEvent::Snapshot(fixtures::raw_snapshot(99, 0)));
        let events = session.tick(0);

        assert!(events.applied.is_empty());
        assert_eq!(events.dropped.len(), 1);
        assert!(matches!(events.dropped[0], MotionError::UnknownEntity(99)));
        // The tracked entity is untouched by the bad update.
        assert_eq!(*session.state(1).unwrap(), before);
    }

    #[test]
    fn test_malformed_snapshot_leaves_state_unchanged() {
        let mut session = session_with_entity(1);
        let before = *session.state(1).unwrap();

        let mut raw = fixtures::raw_snapshot(1, 0);
        raw.vx = None;
        session.enqueue(TransportEvent::Snapshot(raw));
        let events = session.tick(0);

        assert_eq!(events.dropped.len(), 1);
        assert!(matches!(
            events.dropped[0],
            MotionError::MalformedSnapshot { field: "vx" }
        ));
        assert_eq!(*session.state(1).unwrap(), before);
    }

    #[test]
    fn test_last_snapshot_wins() {
        let mut session = session_with_entity(1);

        let mut first = fixtures::raw_snapshot(1, 100);
        first.x = Some(10.0);
        let mut second = fixtures::raw_snapshot(1, 100);
        second.x = Some(50.0);

        session.enqueue(TransportEvent::Snapshot(first));
        session.enqueue(TransportEvent::Snapshot(second));
        let events = session.tick(100);

        assert_eq!(events.applied, vec![1, 1]);
        assert!((session.state(1).unwrap().position.x - 50.0).abs() < 1e-6);
    }

    #[test]
    fn test_snapshot_extrapolates_to_tick_time() {
        let mut session = session_with_entity(1);

        // Sent at t=1000 with velocity (0.4, -0.2); applied at t=1050.
        let mut raw = fixtures::raw_snapshot(1, 1000);
        raw.x = Some(100.0);
        raw.y = Some(50.0);
        raw.vx = Some(0.4);
        raw.vy = Some(-0.2);
        session.enqueue(TransportEvent::Snapshot(raw));

        session.tick(1050);

        let state = session.state(1).unwrap();
        assert!((state.position.x - 120.0).abs() < 1e-4);
        assert!((state.position.y - 40.0).abs() < 1e-4);
        assert_eq!(state.last_update, 1050);
    }

    #[test]
    fn test_tick_advances_between_snapshots() {
        let mut session = session_with_entity(1);

        let mut raw = fixtures::raw_snapshot(1, 0);
        raw.vx = Some(1.0);
        session.enqueue(TransportEvent::Snapshot(raw));
        session.tick(0);

        // No further snapshots: the entity keeps drifting each frame.
        session.tick(16);
        session.tick(32);

        let state = session.state(1).unwrap();
        assert!((state.position.x - 32.0).abs() < 1e-4);
        assert_eq!(state.last_update, 32);
    }

    #[test]
    fn test_control_update_does_not_reseed_position() {
        let mut session = session_with_entity(1);

        let mut raw = fixtures::raw_snapshot(1, 0);
        raw.vx = Some(0.5);
        session.enqueue(TransportEvent::Snapshot(raw));
        session.tick(0);

        session.enqueue(TransportEvent::Control(ControlUpdate {
            entity_id: Some(1),
            thrust: None,
            rotation: Some(1),
        }));
        session.tick(100);

        let state = session.state(1).unwrap();
        assert_eq!(state.rotation, RotationDir::Cw);
        // Position reflects the drift, not a re-seed.
        assert!((state.position.x - 50.0).abs() < 1e-4);
    }

    #[test]
    fn test_set_control_advances_first() {
        let mut session = session_with_entity(1);

        let mut raw = fixtures::raw_snapshot(1, 0);
        raw.vx = Some(1.0);
        session.enqueue(TransportEvent::Snapshot(raw));
        session.tick(0);

        session
            .set_control(
                1,
                ControlIntent {
                    thrust: true,
                    rotation: RotationDir::Cw,
                },
                40,
            )
            .unwrap();

        let state = session.state(1).unwrap();
        assert!(state.thrust_active);
        assert_eq!(state.last_update, 40);
        assert!((state.position.x - 40.0).abs() < 1e-4);
    }

    #[test]
    fn test_removal_event() {
        let mut session = session_with_entity(1);
        session.enqueue(TransportEvent::EntityRemoved(1));
        session.enqueue(TransportEvent::EntityRemoved(2));

        let events = session.tick(0);

        assert_eq!(events.removed, vec![1]);
        assert!(session.is_empty());
    }

    #[test]
    fn test_state_hash_matches_for_identical_feeds() {
        let run = || {
            let mut session = session_with_entity(1);
            let mut raw = fixtures::raw_snapshot(1, 10);
            raw.vx = Some(0.3);
            raw.thrust = Some(true);
            session.enqueue(TransportEvent::Snapshot(raw));
            session.tick(20);
            session.tick(40);
            session.state_hash()
        };

        assert_eq!(run(), run());
    }

    #[test]
    fn test_clear() {
        let mut session = session_with_entity(1);
        session.clear();
        assert!(session.is_empty());
    }
}
