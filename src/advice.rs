use crate::config::AnalysisConfig;
use crate::models::{Advice, AdviceCategory, TriggerFood};

pub const DEFAULT_PREFERRED_FOOD: &str = "leafy greens";

#[derive(Debug, Clone, PartialEq)]
pub struct Synthesis {
    pub advice: Vec<Advice>,
    pub food_score: u32,
}

/// Turns sorted trigger foods into recommendations and a 0-100 score.
pub fn synthesize(triggers: &[TriggerFood], config: &AnalysisConfig) -> Synthesis {
    let mut advice: Vec<Advice> = triggers
        .iter()
        .take(config.advice_top_n)
        .filter_map(|trigger| advise(trigger, config))
        .collect();

    if advice.is_empty() {
        advice.push(Advice {
            category: AdviceCategory::Prefer,
            food: DEFAULT_PREFERRED_FOOD.to_string(),
            reason: "rich in fibre and water, rarely associated with bloating".to_string(),
            evidence: "general recommendation, no strong triggers detected".to_string(),
        });
    }

    Synthesis {
        advice,
        food_score: food_score(triggers, config),
    }
}

fn advise(trigger: &TriggerFood, config: &AnalysisConfig) -> Option<Advice> {
    let increase = trigger.average_increase_mm;
    if increase > config.avoid_threshold_mm {
        Some(Advice {
            category: AdviceCategory::Avoid,
            food: trigger.food_name.clone(),
            reason: format!("causes an average increase of {increase:.1}mm"),
            evidence: format!("observed on {} occasions", trigger.occurrence_count),
        })
    } else if increase > config.limit_threshold_mm {
        Some(Advice {
            category: AdviceCategory::Limit,
            food: trigger.food_name.clone(),
            reason: format!("causes moderate bloating (+{increase:.1}mm)"),
            evidence: format!("confidence score: {}%", trigger.confidence_score),
        })
    } else {
        None
    }
}

/// Linear penalty on the mean trigger increase, clamped to 0-100.
pub fn food_score(triggers: &[TriggerFood], config: &AnalysisConfig) -> u32 {
    if triggers.is_empty() {
        return config.default_food_score;
    }

    let mean = triggers
        .iter()
        .map(|trigger| trigger.average_increase_mm)
        .sum::<f64>()
        / triggers.len() as f64;

    (config.score_base - config.score_penalty_per_mm * mean)
        .clamp(0.0, 100.0)
        .round() as u32
}
