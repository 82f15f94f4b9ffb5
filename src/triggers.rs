use crate::config::AnalysisConfig;
use crate::delta::DayDelta;
use crate::models::{DailyObservation, TriggerFood};
use std::collections::BTreeMap;

#[derive(Default)]
struct FoodSamples {
    sum: f64,
    count: u32,
}

/// Associates each food with the average regional increase of the days it
/// was eaten on and returns the strongest triggers first.
///
/// Every occurrence counts: a food listed in two slots of the same day is
/// credited twice.
pub fn aggregate_triggers(observations: &[DailyObservation], config: &AnalysisConfig) -> Vec<TriggerFood> {
    let mut samples: BTreeMap<&str, FoodSamples> = BTreeMap::new();

    for observation in observations {
        let day_increase = DayDelta::of(observation).average();
        for food in observation.foods() {
            let entry = samples.entry(food).or_default();
            entry.sum += day_increase;
            entry.count = entry.count.saturating_add(1);
        }
    }

    let mut triggers: Vec<TriggerFood> = samples
        .into_iter()
        .map(|(food, samples)| TriggerFood {
            food_name: food.to_string(),
            average_increase_mm: samples.sum / f64::from(samples.count),
            occurrence_count: samples.count,
            confidence_score: samples
                .count
                .saturating_mul(config.confidence_per_occurrence)
                .min(config.confidence_cap),
        })
        .filter(|trigger| trigger.average_increase_mm > config.trigger_threshold_mm)
        .collect();

    // Stable sort on a name-ordered list, so ties stay alphabetical.
    triggers.sort_by(|a, b| b.average_increase_mm.total_cmp(&a.average_increase_mm));
    triggers.truncate(config.max_trigger_foods);
    triggers
}
