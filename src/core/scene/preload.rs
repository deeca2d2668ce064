//=========================================================================
// Preload Signals
//=========================================================================
//
// Completion channel for scenes that load asynchronously.
//
// Architecture:
//   Scene::preload(signal) ──> loader (any thread)
//                                  │ signal.complete()
//                                  ▼
//   crossbeam channel ──> PreloadCollector::collect() at tick start
//                                  │
//                                  ▼
//                      Scene::on_preload_complete()
//
// Draining is bounded per tick so a flood of completions cannot stall
// a frame.
//
//=========================================================================

//=== External Dependencies ===============================================

use crossbeam_channel::{unbounded, Receiver, Sender, TryRecvError};
use log::warn;
use thiserror::Error;

//=== Internal Dependencies ===============================================

use super::definition::SceneId;

//=== PreloadEvent ========================================================

/// Notification that a scene finished loading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreloadEvent {
    pub scene: SceneId,
}

//=== PreloadError ========================================================

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PreloadError {
    /// The scheduler that issued the signal no longer exists.
    #[error("scheduler for scene {0} is gone")]
    SchedulerGone(SceneId),
}

//=== PreloadSignal =======================================================

/// Handle given to a scene in [`Scene::preload`](super::Scene::preload).
///
/// Can be moved to a loader thread. Completing it activates the scene at
/// the start of the scheduler's next tick.
#[derive(Debug, Clone)]
pub struct PreloadSignal {
    scene: SceneId,
    sender: Sender<PreloadEvent>,
}

impl PreloadSignal {
    /// Scene this signal belongs to.
    pub fn scene(&self) -> SceneId {
        self.scene
    }

    /// Reports that loading is done.
    ///
    /// # Errors
    ///
    /// [`PreloadError::SchedulerGone`] if the scheduler was dropped.
    pub fn complete(self) -> Result<(), PreloadError> {
        self.sender
            .send(PreloadEvent { scene: self.scene })
            .map_err(|_| PreloadError::SchedulerGone(self.scene))
    }
}

//=== PreloadCollector ====================================================

/// Scheduler-side end of the preload channel.
pub(crate) struct PreloadCollector {
    sender: Sender<PreloadEvent>,
    receiver: Receiver<PreloadEvent>,
    max_per_tick: usize,
}

impl PreloadCollector {
    pub(crate) fn new(max_per_tick: usize) -> Self {
        let (sender, receiver) = unbounded();
        Self {
            sender,
            receiver,
            max_per_tick: max_per_tick.max(1),
        }
    }

    pub(crate) fn signal_for(&self, scene: SceneId) -> PreloadSignal {
        PreloadSignal {
            scene,
            sender: self.sender.clone(),
        }
    }

    /// Drains pending completions, at most `max_per_tick` of them.
    pub(crate) fn collect(&self) -> Vec<PreloadEvent> {
        let mut events = Vec::new();

        while events.len() < self.max_per_tick {
            match self.receiver.try_recv() {
                Ok(event) => events.push(event),
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => return events,
            }
        }

        if !self.receiver.is_empty() {
            warn!(
                "Preload backlog: {} completions deferred to the next tick",
                self.receiver.len()
            );
        }

        events
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn collect_handles_empty_queue() {
        let collector = PreloadCollector::new(8);
        assert!(collector.collect().is_empty());
    }

    #[test]
    fn completion_is_collected() {
        let collector = PreloadCollector::new(8);
        let signal = collector.signal_for(SceneId::new(3));

        assert_eq!(signal.scene(), SceneId::new(3));
        signal.complete().unwrap();

        assert_eq!(
            collector.collect(),
            vec![PreloadEvent {
                scene: SceneId::new(3)
            }]
        );
        assert!(collector.collect().is_empty());
    }

    #[test]
    fn completion_from_another_thread() {
        let collector = PreloadCollector::new(8);
        let signal = collector.signal_for(SceneId::new(1));

        thread::spawn(move || signal.complete().unwrap())
            .join()
            .unwrap();

        assert_eq!(collector.collect().len(), 1);
    }

    #[test]
    fn collect_is_bounded_per_tick() {
        let collector = PreloadCollector::new(2);
        for id in 0..5 {
            collector.signal_for(SceneId::new(id)).complete().unwrap();
        }

        assert_eq!(collector.collect().len(), 2);
        assert_eq!(collector.collect().len(), 2);
        assert_eq!(collector.collect().len(), 1);
    }

    #[test]
    fn complete_fails_once_collector_is_dropped() {
        let collector = PreloadCollector::new(8);
        let signal = collector.signal_for(SceneId::new(7));
        drop(collector);

        assert_eq!(
            signal.complete(),
            Err(PreloadError::SchedulerGone(SceneId::new(7)))
        );
    }
}
