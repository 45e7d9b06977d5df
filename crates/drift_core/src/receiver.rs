//! Transport boundary: raw update validation and the event inbox.
//!
//! The external transport (out of scope) delivers already-decoded events.
//! This module is the seam between that layer and the simulation: raw
//! updates are validated field by field, and anything incomplete is dropped
//! before it can touch entity state. There is no partial state application.
//!
//! Incoming events are pushed into an [`EventInbox`] and drained exactly
//! once per tick in arrival order, replacing the callback-queue polling
//! pattern this design descends from. No reentrancy occurs during a drain:
//! the session is single-threaded and nothing pushes while it drains.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::compensator::Snapshot;
use crate::error::{MotionError, Result};
use crate::kinematics::{EntityId, Millis, RotationDir};
use crate::math::Vec2;

/// A kinematic update as delivered by the transport, before validation.
///
/// Every field is optional because the transport makes no completeness
/// guarantee; [`RawSnapshot::validate`] is the only path to a usable
/// [`Snapshot`].
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RawSnapshot {
    /// Entity the update applies to.
    pub entity_id: Option<EntityId>,
    /// Position x coordinate.
    pub x: Option<f32>,
    /// Position y coordinate.
    pub y: Option<f32>,
    /// Velocity x component, units/ms.
    pub vx: Option<f32>,
    /// Velocity y component, units/ms.
    pub vy: Option<f32>,
    /// Heading in radians.
    pub heading: Option<f32>,
    /// Whether the thruster is engaged.
    pub thrust: Option<bool>,
    /// Turn direction, wire-encoded as -1, 0, or +1.
    pub rotation: Option<i8>,
    /// Authoritative clock time of the update, in milliseconds.
    pub server_timestamp: Option<Millis>,
}

/// Require a numeric field to be present and finite.
fn numeric(value: Option<f32>, field: &'static str) -> Result<f32> {
    match value {
        Some(v) if v.is_finite() => Ok(v),
        _ => Err(MotionError::MalformedSnapshot { field }),
    }
}

impl RawSnapshot {
    /// Validate this update into a [`Snapshot`].
    ///
    /// Any missing or non-numeric required field yields
    /// [`MotionError::MalformedSnapshot`] naming the field; rotation values
    /// outside {-1, 0, +1} are rejected the same way.
    pub fn validate(&self) -> Result<Snapshot> {
        let entity_id = self
            .entity_id
            .ok_or(MotionError::MalformedSnapshot { field: "entity_id" })?;

        let x = numeric(self.x, "x")?;
        let y = numeric(self.y, "y")?;
        let vx = numeric(self.vx, "vx")?;
        let vy = numeric(self.vy, "vy")?;
        let heading = numeric(self.heading, "heading")?;

        let thrust_active = self
            .thrust
            .ok_or(MotionError::MalformedSnapshot { field: "thrust" })?;

        let rotation = self
            .rotation
            .and_then(RotationDir::from_raw)
            .ok_or(MotionError::MalformedSnapshot { field: "rotation" })?;

        let server_timestamp = self.server_timestamp.ok_or(MotionError::MalformedSnapshot {
            field: "server_timestamp",
        })?;

        Ok(Snapshot {
            entity_id,
            position: Vec2::new(x, y),
            velocity: Vec2::new(vx, vy),
            heading,
            thrust_active,
            rotation,
            server_timestamp,
        })
    }
}

/// A lightweight control change from the authoritative source.
///
/// Unlike a full snapshot this does not re-seed position or velocity; it
/// only switches an entity's thrust or turn direction going forward.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ControlUpdate {
    /// Entity the change applies to.
    pub entity_id: Option<EntityId>,
    /// New thruster state, if it changed.
    pub thrust: Option<bool>,
    /// New turn direction (wire-encoded), if it changed.
    pub rotation: Option<i8>,
}

impl ControlUpdate {
    /// Validate the update, returning the entity id and decoded fields.
    pub fn validate(&self) -> Result<(EntityId, Option<bool>, Option<RotationDir>)> {
        let entity_id = self
            .entity_id
            .ok_or(MotionError::MalformedSnapshot { field: "entity_id" })?;

        let rotation = match self.rotation {
            None => None,
            Some(raw) => Some(
                RotationDir::from_raw(raw)
                    .ok_or(MotionError::MalformedSnapshot { field: "rotation" })?,
            ),
        };

        Ok((entity_id, self.thrust, rotation))
    }
}

/// Decoded event delivered by the external transport.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TransportEvent {
    /// Full kinematic update for one entity.
    Snapshot(RawSnapshot),
    /// Thrust/rotation change without a position re-seed.
    Control(ControlUpdate),
    /// The authoritative source stopped tracking an entity.
    EntityRemoved(EntityId),
}

/// FIFO queue of transport events awaiting the next tick.
///
/// The transport glue pushes; the session drains once per [`tick`] in
/// arrival order. Events are never processed reentrantly.
///
/// [`tick`]: crate::session::Session::tick
#[derive(Debug, Clone, Default)]
pub struct EventInbox {
    queue: VecDeque<TransportEvent>,
}

impl EventInbox {
    /// Create an empty inbox.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enqueue a received event.
    pub fn push(&mut self, event: TransportEvent) {
        self.queue.push_back(event);
    }

    /// Pop the oldest pending event.
    pub(crate) fn pop(&mut self) -> Option<TransportEvent> {
        self.queue.pop_front()
    }

    /// Number of pending events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Whether the inbox has no pending events.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::fixtures;

    #[test]
    fn test_complete_snapshot_validates() {
        let raw = fixtures::raw_snapshot(42, 1000);
        let snapshot = raw.validate().unwrap();

        assert_eq!(snapshot.entity_id, 42);
        assert_eq!(snapshot.server_timestamp, 1000);
        assert_eq!(snapshot.rotation, RotationDir::None);
    }

    #[test]
    fn test_missing_fields_name_the_field() {
        let cases: &[(fn(&mut RawSnapshot), &str)] = &[
            (|r| r.entity_id = None, "entity_id"),
            (|r| r.x = None, "x"),
            (|r| r.y = None, "y"),
            (|r| r.vx = None, "vx"),
            (|r| r.vy = None, "vy"),
            (|r| r.heading = None, "heading"),
            (|r| r.thrust = None, "thrust"),
            (|r| r.rotation = None, "rotation"),
            (|r| r.server_timestamp = None, "server_timestamp"),
        ];

        for (strip, expected) in cases {
            let mut raw = fixtures::raw_snapshot(1, 0);
            strip(&mut raw);
            match raw.validate() {
                Err(MotionError::MalformedSnapshot { field }) => assert_eq!(field, *expected),
                other => panic!("expected malformed '{expected}', got {other:?}"),
            }
        }
    }

    #[test]
    fn test_non_finite_values_are_malformed() {
        let mut raw = fixtures::raw_snapshot(1, 0);
        raw.vx = Some(f32::NAN);
        assert!(matches!(
            raw.validate(),
            Err(MotionError::MalformedSnapshot { field: "vx" })
        ));

        let mut raw = fixtures::raw_snapshot(1, 0);
        raw.heading = Some(f32::INFINITY);
        assert!(matches!(
            raw.validate(),
            Err(MotionError::MalformedSnapshot { field: "heading" })
        ));
    }

    #[test]
    fn test_out_of_range_rotation_is_malformed() {
        let mut raw = fixtures::raw_snapshot(1, 0);
        raw.rotation = Some(3);
        assert!(matches!(
            raw.validate(),
            Err(MotionError::MalformedSnapshot { field: "rotation" })
        ));
    }

    #[test]
    fn test_control_update_validation() {
        let update = ControlUpdate {
            entity_id: Some(9),
            thrust: Some(true),
            rotation: Some(-1),
        };
        let (id, thrust, rotation) = update.validate().unwrap();
        assert_eq!(id, 9);
        assert_eq!(thrust, Some(true));
        assert_eq!(rotation, Some(RotationDir::Ccw));

        let missing_id = ControlUpdate::default();
        assert!(missing_id.validate().is_err());
    }

    #[test]
    fn test_inbox_is_fifo() {
        let mut inbox = EventInbox::new();
        inbox.push(TransportEvent::EntityRemoved(1));
        inbox.push(TransportEvent::EntityRemoved(2));
        inbox.push(TransportEvent::EntityRemoved(3));

        assert_eq!(inbox.len(), 3);
        assert_eq!(inbox.pop(), Some(TransportEvent::EntityRemoved(1)));
        assert_eq!(inbox.pop(), Some(TransportEvent::EntityRemoved(2)));
        assert_eq!(inbox.pop(), Some(TransportEvent::EntityRemoved(3)));
        assert!(inbox.is_empty());
    }
}
