use encore_ports::config::{BaseScores, ComboStep};
use encore_ports::summary::Classification;
use serde::{Deserialize, Serialize};

/// Streak state. `best_streak` only ever grows.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComboState {
    pub current_streak: u32,
    pub best_streak: u32,
    pub multiplier: u32,
}

/// Deterministic classification -> score mapping. Integer arithmetic only:
/// replaying the same attempt sequence always yields the same total.
pub struct Scorer {
    base: BaseScores,
    combo_table: Vec<ComboStep>,
}

impl Scorer {
    pub fn new(base: BaseScores, mut combo_table: Vec<ComboStep>) -> Self {
        combo_table.sort_by_key(|step| step.min_streak);
        if combo_table.is_empty() {
            combo_table.push(ComboStep {
                min_streak: 0,
                multiplier: 1,
            });
        }
        Self { base, combo_table }
    }

    /// Applies one classified attempt to the combo and returns its score
    /// delta. Perfect/Good extend the streak and scale by the multiplier for
    /// the new streak length; everything else resets the streak and is never
    /// scaled.
    pub fn score(&self, classification: Classification, combo: &mut ComboState) -> i64 {
        let delta = match classification {
            Classification::Perfect | Classification::Good => {
                combo.current_streak += 1;
                combo.multiplier = self.multiplier_for(combo.current_streak);
                let base = match classification {
                    Classification::Perfect => self.base.perfect,
                    _ => self.base.good,
                };
                base * combo.multiplier as i64
            }
            Classification::Early => self.reset_with(combo, self.base.early),
            Classification::Late => self.reset_with(combo, self.base.late),
            Classification::WrongPitch => self.reset_with(combo, self.base.wrong_pitch),
            Classification::Missed => self.reset_with(combo, 0),
            Classification::Extra => self.reset_with(combo, self.base.extra_penalty),
        };

        combo.best_streak = combo.best_streak.max(combo.current_streak);
        delta
    }

    pub fn multiplier_for(&self, streak: u32) -> u32 {
        self.combo_table
            .iter()
            .take_while(|step| step.min_streak <= streak)
            .last()
            .map(|step| step.multiplier)
            .unwrap_or(1)
    }

    fn reset_with(&self, combo: &mut ComboState, base: i64) -> i64 {
        combo.current_streak = 0;
        combo.multiplier = self.multiplier_for(0);
        base
    }
}
