use crate::models::{DailyObservation, Measurements, Region};

/// Average post-meal increase over the morning baseline for one region.
///
/// Zero readings are "not recorded" and skipped. A day with no readings,
/// or whose readings stay below baseline, yields 0.
pub fn compute_average_increase(measurements: &Measurements, region: Region) -> f64 {
    let readings = measurements.region(region);
    let (sum, count) = readings
        .post_meal_values()
        .into_iter()
        .filter(|value| *value != 0.0)
        .fold((0.0, 0usize), |(sum, count), value| (sum + value, count + 1));

    if count == 0 {
        return 0.0;
    }

    (sum / count as f64 - readings.baseline).max(0.0)
}

/// Per-region deltas of a single day.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DayDelta {
    pub abdomen: f64,
    pub hips: f64,
}

impl DayDelta {
    pub fn of(observation: &DailyObservation) -> Self {
        Self {
            abdomen: compute_average_increase(&observation.measurements, Region::Abdomen),
            hips: compute_average_increase(&observation.measurements, Region::Hips),
        }
    }

    pub fn total(self) -> f64 {
        self.abdomen + self.hips
    }

    pub fn average(self) -> f64 {
        self.total() / 2.0
    }
}
