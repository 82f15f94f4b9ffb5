use crate::advice::synthesize;
use crate::config::AnalysisConfig;
use crate::models::{AnalysisMetrics, AnalysisResult, DailyObservation};
use crate::triggers::aggregate_triggers;
use crate::trend::{average_variability, build_weekly_trend, is_improving_trend};
use tracing::{debug, info};

/// Runs every analysis stage over observations sorted by ascending date.
///
/// Pure and total: the same input always yields the same result, and an
/// empty slice still produces a fully populated (if uninformative) result.
/// Enforcing a minimum number of days is left to the caller.
pub fn analyze_patterns(observations: &[DailyObservation], config: &AnalysisConfig) -> AnalysisResult {
    let trigger_foods = aggregate_triggers(observations, config);
    debug!(count = trigger_foods.len(), "aggregated trigger foods");

    let weekly_trend = build_weekly_trend(observations, config);
    let is_improving = is_improving_trend(observations, config);
    let variability = average_variability(observations);
    debug!(days = weekly_trend.len(), is_improving, variability, "built weekly trend");

    let synthesis = synthesize(&trigger_foods, config);
    debug!(advice = synthesis.advice.len(), "synthesized advice");

    info!(
        days = observations.len(),
        triggers = trigger_foods.len(),
        food_score = synthesis.food_score,
        "pattern analysis complete"
    );

    AnalysisResult {
        trigger_foods,
        weekly_trend,
        advice: synthesis.advice,
        metrics: AnalysisMetrics {
            days_analyzed: observations.len(),
            average_variability: variability,
            is_improving_trend: is_improving,
            food_score: synthesis.food_score,
        },
    }
}
