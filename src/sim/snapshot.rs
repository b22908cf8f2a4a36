//! Render-facing flock snapshots and the ticker handoff
//!
//! A renderer never reads the live `World` from another thread. The ticking
//! side publishes an immutable [`FlockSnapshot`] after each step into a
//! single slot; a newer snapshot replaces an unread one, so a stalled reader
//! holds at most one.

use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use super::world::World;
use crate::{heading_to_velocity, velocity_heading};

/// What a renderer needs to draw one agent
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AgentView {
    pub position: [f32; 2],
    /// Degrees in (-180, 180]
    pub heading: f32,
    pub color: [f32; 4],
}

/// Frozen per-frame copy of the flock
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlockSnapshot {
    pub tick: u64,
    pub agents: Vec<AgentView>,
}

impl FlockSnapshot {
    pub fn capture(world: &World) -> Self {
        let agents = world
            .agents()
            .iter()
            .map(|a| AgentView {
                position: a.position.to_array(),
                heading: a.heading(),
                color: a.color().to_array(),
            })
            .collect();
        Self {
            tick: world.tick(),
            agents,
        }
    }

    /// Mean agent position; the origin for an empty snapshot
    pub fn centroid(&self) -> [f32; 2] {
        let n = self.agents.len().max(1) as f32;
        let (sx, sy) = self
            .agents
            .iter()
            .fold((0.0, 0.0), |(x, y), a| (x + a.position[0], y + a.position[1]));
        [sx / n, sy / n]
    }

    /// Mean distance from the centroid
    pub fn spread(&self) -> f32 {
        let [cx, cy] = self.centroid();
        let n = self.agents.len().max(1) as f32;
        self.agents
            .iter()
            .map(|a| {
                let dx = a.position[0] - cx;
                let dy = a.position[1] - cy;
                (dx * dx + dy * dy).sqrt()
            })
            .sum::<f32>()
            / n
    }

    /// Circular mean of headings in degrees, or `None` when they cancel out
    pub fn mean_heading(&self) -> Option<f32> {
        let sum = self
            .agents
            .iter()
            .map(|a| heading_to_velocity(a.heading, 1.0))
            .sum::<glam::Vec2>();
        if sum.length_squared() < 1e-6 {
            None
        } else {
            Some(velocity_heading(sum))
        }
    }
}

#[derive(Debug, Default)]
struct Slot {
    snapshot: Option<FlockSnapshot>,
    publisher_gone: bool,
    reader_gone: bool,
}

#[derive(Debug, Default)]
struct Shared {
    slot: Mutex<Slot>,
    ready: Condvar,
}

impl Shared {
    // Slot holds plain data; a panic mid-update cannot leave it torn
    fn lock(&self) -> MutexGuard<'_, Slot> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Sending half of the snapshot handoff
#[derive(Debug)]
pub struct SnapshotPublisher {
    shared: Arc<Shared>,
}

impl SnapshotPublisher {
    /// Replace any unread snapshot with `snapshot`.
    ///
    /// Returns false once the reader has been dropped.
    pub fn publish(&self, snapshot: FlockSnapshot) -> bool {
        let mut slot = self.shared.lock();
        if slot.reader_gone {
            return false;
        }
        slot.snapshot = Some(snapshot);
        drop(slot);
        self.shared.ready.notify_one();
        true
    }
}

impl Drop for SnapshotPublisher {
    fn drop(&mut self) {
        self.shared.lock().publisher_gone = true;
        self.shared.ready.notify_one();
    }
}

/// Receiving half; always exposes the most recent snapshot
#[derive(Debug)]
pub struct SnapshotReader {
    shared: Arc<Shared>,
    latest: Option<FlockSnapshot>,
    closed: bool,
}

impl SnapshotReader {
    /// Take the pending snapshot, if any, without blocking and return the
    /// newest seen so far
    pub fn latest(&mut self) -> Option<&FlockSnapshot> {
        let mut slot = self.shared.lock();
        if let Some(snapshot) = slot.snapshot.take() {
            self.latest = Some(snapshot);
        }
        self.closed = slot.publisher_gone;
        drop(slot);
        self.latest.as_ref()
    }

    /// Block until a new snapshot is published (or the publisher is gone),
    /// then behave like [`latest`](Self::latest).
    pub fn wait_latest(&mut self) -> Option<&FlockSnapshot> {
        let mut slot = self.shared.lock();
        while slot.snapshot.is_none() && !slot.publisher_gone {
            slot = self
                .shared
                .ready
                .wait(slot)
                .unwrap_or_else(PoisonError::into_inner);
        }
        drop(slot);
        self.latest()
    }

    /// True if a snapshot was published and not yet taken
    pub fn has_pending(&self) -> bool {
        self.shared.lock().snapshot.is_some()
    }

    /// True once the publisher has hung up and its last snapshot was taken
    pub fn is_closed(&self) -> bool {
        self.closed
    }
}

impl Drop for SnapshotReader {
    fn drop(&mut self) {
        let mut slot = self.shared.lock();
        slot.reader_gone = true;
        slot.snapshot = None;
    }
}

pub fn snapshot_channel() -> (SnapshotPublisher, SnapshotReader) {
    let shared = Arc::new(Shared::default());
    (
        SnapshotPublisher {
            shared: Arc::clone(&shared),
        },
        SnapshotReader {
            shared,
            latest: None,
            closed: false,
        },
    )
}

/// Run `world` on its own thread, one step every `period`.
///
/// Each step consumes the wall-clock time since the previous one. The thread
/// stops after `frames` steps (if given) or when the reader is dropped, and
/// hands the world back through the join handle.
pub fn spawn_ticker(
    mut world: World,
    period: Duration,
    frames: Option<u64>,
) -> (SnapshotReader, JoinHandle<World>) {
    let (publisher, reader) = snapshot_channel();
    let handle = thread::spawn(move || {
        let mut last = Instant::now();
        let mut stepped = 0u64;
        log::debug!("Ticker started: period {:?}, frames {:?}", period, frames);
        while frames.is_none_or(|limit| stepped < limit) {
            thread::sleep(period);
            let now = Instant::now();
            world.step(now - last);
            last = now;
            stepped += 1;
            if !publisher.publish(world.snapshot()) {
                log::debug!("Snapshot reader dropped after {} steps", stepped);
                break;
            }
        }
        world
    });
    (reader, handle)
}
