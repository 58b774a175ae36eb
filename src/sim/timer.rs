//! Cooperative repeating timers
//!
//! Timers never run on their own thread. The host advances the scheduler by the
//! frame delta and then pops due callbacks one at a time, so a callback that
//! cancels its own timer takes effect before the next fire is considered.

use serde::{Deserialize, Serialize};

/// Repeating callbacks a session asks the host to run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimerId {
    /// 60 Hz intro ramp, self-cancels when the ground reaches full width
    IntroRamp,
    /// 10 Hz score tick, runs for the lifetime of the session
    ScoreTick,
}

#[derive(Debug, Clone)]
struct RepeatingTask {
    id: TimerId,
    delay_ms: f32,
    elapsed_ms: f32,
}

impl RepeatingTask {
    #[inline]
    fn overdue(&self) -> f32 {
        self.elapsed_ms - self.delay_ms
    }
}

/// Fixed-delay repeating task scheduler
#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    tasks: Vec<RepeatingTask>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self { tasks: Vec::new() }
    }

    /// Start (or restart) a repeating timer
    pub fn start(&mut self, id: TimerId, delay_ms: f32) {
        self.cancel(id);
        self.tasks.push(RepeatingTask {
            id,
            delay_ms: delay_ms.max(f32::EPSILON),
            elapsed_ms: 0.0,
        });
        log::trace!("Timer {:?} started ({} ms)", id, delay_ms);
    }

    /// Cancel a timer. Returns false if it was not running; cancelling twice is harmless.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != id);
        let removed = self.tasks.len() != before;
        if removed {
            log::trace!("Timer {:?} cancelled", id);
        }
        removed
    }

    pub fn is_active(&self, id: TimerId) -> bool {
        self.tasks.iter().any(|t| t.id == id)
    }

    /// Accumulate elapsed time on every active timer
    pub fn advance(&mut self, dt_ms: f32) {
        for task in &mut self.tasks {
            task.elapsed_ms += dt_ms;
        }
    }

    /// Pop the next due fire, earliest-due first (ties keep start order)
    pub fn pop_due(&mut self) -> Option<TimerId> {
        let mut due: Option<usize> = None;
        for (i, task) in self.tasks.iter().enumerate() {
            if task.overdue() < 0.0 {
                continue;
            }
            match due {
                Some(j) if self.tasks[j].overdue() >= task.overdue() => {}
                _ => due = Some(i),
            }
        }
        let task = &mut self.tasks[due?];
        task.elapsed_ms -= task.delay_ms;
        Some(task.id)
    }
}
