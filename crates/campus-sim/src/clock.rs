//! World clock: the frame cadence plus independent periodic cadences
//! (income, students, auto-save) and one-shot scheduled tasks.
//!
//! Cadences accumulate frame time rather than deriving from each other, so
//! changing one period never shifts another.

use campus_core::config::Cadences;
use campus_core::constants::FRAME_DURATION_US;
use campus_core::types::SimTime;

/// A fixed-period cadence driven by accumulated frame time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Interval {
    period_us: u64,
    accumulated_us: u64,
}

impl Interval {
    pub fn from_millis(period_ms: u64) -> Self {
        Self {
            period_us: period_ms.max(1) * 1_000,
            accumulated_us: 0,
        }
    }

    /// Add elapsed time; returns how many periods completed.
    pub fn accumulate(&mut self, dt_us: u64) -> u32 {
        self.accumulated_us += dt_us;
        let fired = self.accumulated_us / self.period_us;
        self.accumulated_us %= self.period_us;
        fired as u32
    }

    pub fn reset(&mut self) {
        self.accumulated_us = 0;
    }
}

/// Deferred work. Carries only the data needed to re-validate it when it
/// comes due; the handler checks current state before acting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intent {
    /// The engine start delay for start attempt `start_token` elapsed.
    EngineReady { start_token: u64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ScheduledTask {
    due_us: u64,
    intent: Intent,
}

/// One-shot tasks ordered by due time (insertion order on ties).
#[derive(Debug, Clone, Default)]
pub struct TaskQueue {
    tasks: Vec<ScheduledTask>,
}

impl TaskQueue {
    pub fn schedule(&mut self, due_us: u64, intent: Intent) {
        let at = self.tasks.partition_point(|t| t.due_us <= due_us);
        self.tasks.insert(at, ScheduledTask { due_us, intent });
    }

    /// Remove and return every task due at or before `now_us`.
    pub fn drain_due(&mut self, now_us: u64) -> Vec<Intent> {
        let due = self.tasks.partition_point(|t| t.due_us <= now_us);
        self.tasks.drain(..due).map(|t| t.intent).collect()
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn clear(&mut self) {
        self.tasks.clear();
    }
}

/// What happened during one frame advance.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClockTick {
    pub economy_ticks: u32,
    pub student_ticks: u32,
    pub autosave_due: bool,
    pub due: Vec<Intent>,
}

#[derive(Debug, Clone)]
pub struct WorldClock {
    time: SimTime,
    economy: Interval,
    students: Interval,
    autosave: Interval,
    tasks: TaskQueue,
}

impl WorldClock {
    pub fn new(cadences: &Cadences) -> Self {
        Self {
            time: SimTime::default(),
            economy: Interval::from_millis(cadences.economy_tick_ms),
            students: Interval::from_millis(cadences.student_tick_ms),
            autosave: Interval::from_millis(cadences.autosave_ms),
            tasks: TaskQueue::default(),
        }
    }

    pub fn time(&self) -> SimTime {
        self.time
    }

    pub fn now_ms(&self) -> u64 {
        self.time.elapsed_ms()
    }

    /// Schedule `intent` to come due `delay_ms` from now.
    pub fn schedule(&mut self, delay_ms: u64, intent: Intent) {
        self.tasks
            .schedule(self.time.elapsed_us + delay_ms * 1_000, intent);
    }

    pub fn pending_tasks(&self) -> usize {
        self.tasks.len()
    }

    /// Advance one frame and report which cadences fired.
    pub fn advance(&mut self) -> ClockTick {
        self.time.advance();
        ClockTick {
            economy_ticks: self.economy.accumulate(FRAME_DURATION_US),
            student_ticks: self.students.accumulate(FRAME_DURATION_US),
            autosave_due: self.autosave.accumulate(FRAME_DURATION_US) > 0,
            due: self.tasks.drain_due(self.time.elapsed_us),
        }
    }

    /// Stop every cadence and drop pending tasks (session end).
    pub fn halt(&mut self) {
        self.economy.reset();
        self.students.reset();
        self.autosave.reset();
        self.tasks.clear();
    }
}
