//! Capacity-constrained placement of data halls.
//!
//! Halls are placed greedily in index order: each hall takes the first
//! candidate start (at or after its cadence floor) at which fewer than
//! `max_parallel` earlier halls are still short of RFS. Earlier halls are
//! never moved, so the result is first-fit and not makespan-optimal.

use super::calendar::{latest, WorkCalendar};
use super::domain::{DurationConfig, GateSet, HallPlan, FIRST_HALL_DELAY_DAYS};
use chrono::{Duration, NaiveDate};
use serde::Serialize;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Hall {
    /// 1-based position in creation order.
    pub index: usize,
    pub fitout_start: Option<NaiveDate>,
    pub fitout_finish: Option<NaiveDate>,
    pub l3_start: Option<NaiveDate>,
    pub l3_finish: Option<NaiveDate>,
    pub l4_start: Option<NaiveDate>,
    pub l4_finish: Option<NaiveDate>,
    pub l5_start: Option<NaiveDate>,
    pub l5_finish: Option<NaiveDate>,
    /// Ready for service; always equal to `l5_finish`.
    pub rfs: Option<NaiveDate>,
    /// Gate used for L3/L4 (temporary or permanent power).
    pub power_gate: Option<NaiveDate>,
}

impl Hall {
    /// Whether the hall occupies a capacity slot on `day`.
    pub fn in_progress_on(&self, day: NaiveDate) -> bool {
        match (self.fitout_start, self.rfs) {
            (Some(start), Some(rfs)) => start <= day && day < rfs,
            _ => false,
        }
    }
}

pub struct HallAllocator<'a> {
    calendar: &'a WorkCalendar,
    durations: &'a DurationConfig,
    plan: &'a HallPlan,
}

impl<'a> HallAllocator<'a> {
    pub fn new(
        calendar: &'a WorkCalendar,
        durations: &'a DurationConfig,
        plan: &'a HallPlan,
    ) -> Self {
        Self {
            calendar,
            durations,
            plan,
        }
    }

    pub fn allocate(&self, fitout_trigger: Option<NaiveDate>, gates: &GateSet) -> Vec<Hall> {
        let cadence = Duration::days(self.plan.effective_cadence_days());
        let capacity = self.plan.capacity();
        let mut halls: Vec<Hall> = Vec::with_capacity(self.plan.hall_count);
        let mut active: Vec<NaiveDate> = Vec::new();

        for index in 1..=self.plan.hall_count {
            let floor = match halls.last() {
                None => fitout_trigger.map(|d| d + Duration::days(FIRST_HALL_DELAY_DAYS)),
                Some(previous) => previous.fitout_start.map(|d| d + cadence),
            };

            let candidate = match (floor, capacity) {
                (Some(floor), Some(cap)) => Some(first_free_slot(floor, cap, &active)),
                (floor, _) => floor,
            };

            let hall = self.schedule_one(index, candidate, fitout_trigger, gates);
            debug!(
                hall = index,
                fitout_start = ?hall.fitout_start,
                rfs = ?hall.rfs,
                "placed hall"
            );

            if let Some(rfs) = hall.rfs {
                active.push(rfs);
            }
            if let Some(candidate) = candidate {
                active.retain(|finish| *finish >= candidate);
            }
            halls.push(hall);
        }

        halls
    }

    /// Forward chain Fitout -> L3 -> L4 -> L5 from an accepted candidate.
    pub fn schedule_one(
        &self,
        index: usize,
        candidate: Option<NaiveDate>,
        fitout_trigger: Option<NaiveDate>,
        gates: &GateSet,
    ) -> Hall {
        let cal = self.calendar;
        let d = self.durations;
        let power_gate = gates.commissioning_power(self.plan.allow_temp_power);

        let fitout_start = latest(candidate, fitout_trigger);
        let fitout_finish = cal.shift(fitout_start, i64::from(d.fitout_wd));
        let l3_start = latest(fitout_finish, power_gate);
        let l3_finish = cal.shift(l3_start, i64::from(d.l3_wd));
        let l4_start = l3_finish;
        let l4_finish = cal.shift(l4_start, i64::from(d.l4_wd));
        // L5 always waits for permanent power.
        let l5_start = latest(l4_finish, gates.perm_power);
        let l5_finish = cal.shift(l5_start, i64::from(d.l5_wd));

        Hall {
            index,
            fitout_start,
            fitout_finish,
            l3_start,
            l3_finish,
            l4_start,
            l4_finish,
            l5_start,
            l5_finish,
            rfs: l5_finish,
            power_gate,
        }
    }
}

/// Advances `floor` until fewer than `capacity` active halls are still in
/// progress. Each step moves past the earliest in-progress RFS, so the loop
/// runs at most `active.len()` times.
fn first_free_slot(floor: NaiveDate, capacity: usize, active: &[NaiveDate]) -> NaiveDate {
    let mut candidate = floor;
    loop {
        let in_progress: Vec<NaiveDate> = active
            .iter()
            .copied()
            .filter(|finish| *finish > candidate)
            .collect();
        if in_progress.len() < capacity {
            return candidate;
        }

        let Some(earliest) = in_progress.into_iter().min() else {
            return candidate;
        };
        debug!(%candidate, %earliest, "hall capacity reached; waiting for RFS");
        candidate = (earliest + Duration::days(1)).max(floor);
    }
}
