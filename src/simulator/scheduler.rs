use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::f64::INFINITY;

use serde::{Deserialize, Serialize};

use crate::utils::errors::SimulationError;

/// An event is a continuation (`process`) that resumes at `time`.  The
/// `sequence` number is the insertion order, and breaks ties between equal
/// wake times so that same-instant resumption is strictly FIFO.
#[derive(Debug, Clone)]
struct ScheduledEvent<P> {
    time: f64,
    sequence: u64,
    process: P,
}

impl<P> PartialEq for ScheduledEvent<P> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<P> Eq for ScheduledEvent<P> {}

impl<P> PartialOrd for ScheduledEvent<P> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<P> Ord for ScheduledEvent<P> {
    // Reversed, so the max-heap pops the earliest (time, sequence) first
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .time
            .total_cmp(&self.time)
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

/// What a resumed continuation asks of the scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resumption {
    Continue,
    Halt,
}

/// How a call to `run_until` ended.  A halted run keeps the clock at the
/// halt instant, which becomes the effective duration of the run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RunOutcome {
    Completed,
    Halted { at: f64 },
}

/// The scheduler owns the simulation clock and the event list.  It is
/// generic over the continuation token, which the facility simulation
/// instantiates with process identifiers.
#[derive(Debug, Clone)]
pub struct Scheduler<P> {
    global_time: f64,
    next_sequence: u64,
    event_list: BinaryHeap<ScheduledEvent<P>>,
}

impl<P> Default for Scheduler<P> {
    fn default() -> Self {
        Self {
            global_time: 0.0,
            next_sequence: 0,
            event_list: BinaryHeap::new(),
        }
    }
}

impl<P> Scheduler<P> {
    pub fn new() -> Self {
        Self::default()
    }

    /// An accessor method for the simulation global time.
    pub fn global_time(&self) -> f64 {
        self.global_time
    }

    pub fn pending_events(&self) -> usize {
        self.event_list.len()
    }

    /// Time remaining until the earliest scheduled event, or infinity for an
    /// empty event list.
    pub fn until_next_event(&self) -> f64 {
        self.event_list
            .peek()
            .map_or(INFINITY, |event| event.time - self.global_time)
    }

    /// Enqueue `process` to resume at `now + delay`.  A zero delay resumes
    /// at the same instant, after the work already scheduled for it.
    pub fn schedule_after(&mut self, delay: f64, process: P) -> Result<(), SimulationError> {
        if !(delay >= 0.0) || !delay.is_finite() {
            return Err(SimulationError::EventSchedulingError);
        }
        self.event_list.push(ScheduledEvent {
            time: self.global_time + delay,
            sequence: self.next_sequence,
            process,
        });
        self.next_sequence += 1;
        Ok(())
    }

    /// Pop the earliest event if it fires strictly before `deadline`,
    /// advancing the clock to its wake time.
    pub fn pop_due(&mut self, deadline: f64) -> Option<P> {
        match self.event_list.peek() {
            Some(event) if event.time < deadline => {}
            _ => return None,
        }
        let event = self.event_list.pop()?;
        self.global_time = event.time;
        Some(event.process)
    }

    /// Close a run that was not halted: the clock covers the full window,
    /// even when the event list drained early.
    pub fn finish_at(&mut self, deadline: f64) {
        self.global_time = f64::max(self.global_time, deadline);
    }

    /// Repeatedly pop the earliest event and resume its continuation, until
    /// the event list is empty, the next event lies at or beyond `deadline`,
    /// or a continuation halts the run.  Continuation errors abort the run.
    pub fn run_until<F>(&mut self, deadline: f64, mut resume: F) -> Result<RunOutcome, SimulationError>
    where
        F: FnMut(&mut Scheduler<P>, P) -> Result<Resumption, SimulationError>,
    {
        while let Some(process) = self.pop_due(deadline) {
            if resume(self, process)? == Resumption::Halt {
                return Ok(RunOutcome::Halted {
                    at: self.global_time,
                });
            }
        }
        self.finish_at(deadline);
        Ok(RunOutcome::Completed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_fire_in_time_order() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule_after(3.0, "c").unwrap();
        scheduler.schedule_after(1.0, "a").unwrap();
        scheduler.schedule_after(2.0, "b").unwrap();
        let mut fired = Vec::new();
        let outcome = scheduler
            .run_until(10.0, |scheduler, process| {
                fired.push((scheduler.global_time(), process));
                Ok(Resumption::Continue)
            })
            .unwrap();
        assert_eq!(RunOutcome::Completed, outcome);
        assert_eq!(vec![(1.0, "a"), (2.0, "b"), (3.0, "c")], fired);
        assert![scheduler.global_time() == 10.0];
    }

    #[test]
    fn equal_times_resume_in_schedule_order() {
        let mut scheduler = Scheduler::new();
        (0..20).for_each(|index| scheduler.schedule_after(1.0, index).unwrap());
        let mut fired = Vec::new();
        scheduler
            .run_until(2.0, |_, process| {
                fired.push(process);
                Ok(Resumption::Continue)
            })
            .unwrap();
        assert_eq!((0..20).collect::<Vec<i32>>(), fired);
    }

    #[test]
    fn zero_delay_runs_after_ready_work() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule_after(0.0, "first").unwrap();
        scheduler.schedule_after(0.0, "second").unwrap();
        let mut fired = Vec::new();
        scheduler
            .run_until(1.0, |scheduler, process| {
                fired.push(process);
                if process == "first" {
                    scheduler.schedule_after(0.0, "spawned")?;
                }
                Ok(Resumption::Continue)
            })
            .unwrap();
        assert_eq!(vec!["first", "second", "spawned"], fired);
    }

    #[test]
    fn events_at_the_deadline_do_not_fire() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule_after(5.0, ()).unwrap();
        let mut count = 0;
        scheduler
            .run_until(5.0, |_, _| {
                count += 1;
                Ok(Resumption::Continue)
            })
            .unwrap();
        assert_eq!(0, count);
        assert_eq!(1, scheduler.pending_events());
        assert![scheduler.global_time() == 5.0];
    }

    #[test]
    fn halt_stops_immediately_at_the_halt_instant() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule_after(1.0, "halt").unwrap();
        scheduler.schedule_after(1.0, "never").unwrap();
        let mut fired = Vec::new();
        let outcome = scheduler
            .run_until(100.0, |_, process| {
                fired.push(process);
                if process == "halt" {
                    Ok(Resumption::Halt)
                } else {
                    Ok(Resumption::Continue)
                }
            })
            .unwrap();
        assert_eq!(RunOutcome::Halted { at: 1.0 }, outcome);
        assert_eq!(vec!["halt"], fired);
        assert![scheduler.global_time() == 1.0];
    }

    #[test]
    fn negative_and_nan_delays_are_rejected() {
        let mut scheduler = Scheduler::new();
        assert!(scheduler.schedule_after(-1.0, ()).is_err());
        assert!(scheduler.schedule_after(f64::NAN, ()).is_err());
        assert_eq!(0, scheduler.pending_events());
    }

    #[test]
    fn continuation_errors_propagate() {
        let mut scheduler = Scheduler::new();
        scheduler.schedule_after(1.0, ()).unwrap();
        let result = scheduler.run_until(2.0, |_, _| Err(SimulationError::ProcessNotFound));
        assert!(matches!(result, Err(SimulationError::ProcessNotFound)));
    }
}
