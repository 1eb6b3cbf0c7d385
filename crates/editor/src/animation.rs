//! Animation requests and the cooperative timeline that completes them.
//!
//! The editor never interpolates anything itself. Each animated action emits an
//! [`AnimationRequest`] for the renderer and registers a ticket on the
//! [`Timeline`]; the instance stays in a transitioning state until that ticket
//! is completed, which can happen at most once.

use glam::DVec3;
use serde::{Deserialize, Serialize};
use shared::InstanceId;

use crate::state::settings::AnimationDurations;

/// Handle for one in-flight animation
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AnimationTicket(pub u64);

impl std::fmt::Display for AnimationTicket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnimationKind {
    Build,
    Unbuild,
    Move,
    Rotate,
}

/// Where one sub-element should end up
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ElementTarget {
    /// Index into the instance's element list
    pub index: usize,
    pub position: DVec3,
    pub rotation_y: f64,
}

/// Play request handed to the renderer
#[derive(Clone, Debug, PartialEq)]
pub struct AnimationRequest {
    pub ticket: AnimationTicket,
    pub instance_id: InstanceId,
    pub kind: AnimationKind,
    pub targets: Vec<ElementTarget>,
}

#[derive(Clone, Debug)]
struct Running {
    ticket: AnimationTicket,
    instance_id: InstanceId,
    kind: AnimationKind,
    elapsed: f64,
    duration: f64,
}

/// Finished animation returned by [`Timeline::finish`]
#[derive(Clone, Debug, PartialEq)]
pub struct Finished {
    pub ticket: AnimationTicket,
    pub instance_id: InstanceId,
    pub kind: AnimationKind,
}

/// Fixed-duration animations advanced by the host's frame clock
#[derive(Debug, Default)]
pub struct Timeline {
    durations: AnimationDurations,
    running: Vec<Running>,
    outbox: Vec<AnimationRequest>,
    next_ticket: u64,
}

impl Timeline {
    pub fn new(durations: AnimationDurations) -> Self {
        Self {
            durations,
            ..Default::default()
        }
    }

    /// Register a new animation and queue its request for the renderer
    pub fn start(
        &mut self,
        instance_id: InstanceId,
        kind: AnimationKind,
        targets: Vec<ElementTarget>,
    ) -> AnimationTicket {
        self.next_ticket += 1;
        let ticket = AnimationTicket(self.next_ticket);
        let duration = self.durations.for_kind(kind);

        tracing::debug!("Animation {ticket}: {kind:?} {instance_id} for {duration:.2}s");

        self.running.push(Running {
            ticket,
            instance_id: instance_id.clone(),
            kind,
            elapsed: 0.0,
            duration,
        });
        self.outbox.push(AnimationRequest {
            ticket,
            instance_id,
            kind,
            targets,
        });
        ticket
    }

    /// Advance every running animation by `dt` seconds.
    ///
    /// Returns the tickets that have reached their duration, in start order.
    /// They stay registered until [`Timeline::finish`] is called for them.
    pub fn advance(&mut self, dt: f64) -> Vec<AnimationTicket> {
        let dt = dt.max(0.0);
        for r in &mut self.running {
            r.elapsed += dt;
        }
        self.running
            .iter()
            .filter(|r| r.elapsed >= r.duration)
            .map(|r| r.ticket)
            .collect()
    }

    /// Unregister a ticket. Returns `None` if it was never issued or was
    /// already finished.
    pub fn finish(&mut self, ticket: AnimationTicket) -> Option<Finished> {
        let pos = self.running.iter().position(|r| r.ticket == ticket)?;
        let r = self.running.remove(pos);
        Some(Finished {
            ticket: r.ticket,
            instance_id: r.instance_id,
            kind: r.kind,
        })
    }

    /// Tickets still in flight, in start order
    pub fn running_tickets(&self) -> Vec<AnimationTicket> {
        self.running.iter().map(|r| r.ticket).collect()
    }

    /// Ticket currently animating `instance_id`, if any
    pub fn ticket_for(&self, instance_id: &str) -> Option<AnimationTicket> {
        self.running
            .iter()
            .find(|r| r.instance_id == instance_id)
            .map(|r| r.ticket)
    }

    pub fn is_idle(&self) -> bool {
        self.running.is_empty()
    }

    /// Take the play requests queued since the last call
    pub fn drain_requests(&mut self) -> Vec<AnimationRequest> {
        std::mem::take(&mut self.outbox)
    }
}
