use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign};

/// Precision, recall and F-score of a match count.
#[derive(Debug, Copy, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Scores {
    #[serde(rename = "Precision")]
    pub precision: f64,

    #[serde(rename = "Recall")]
    pub recall: f64,

    #[serde(rename = "SMATCH")]
    pub f_score: f64,
}

impl Scores {
    /// Formats the scores with `significant` digits after the decimal point. The
    /// F-score line is labeled `label`; precision and recall lines come first
    /// when `precision_recall` is set.
    pub fn format(&self, label: &str, significant: usize, precision_recall: bool) -> String {
        let mut out = String::new();
        if precision_recall {
            out.push_str(&format!("Precision: {:.*}\n", significant, self.precision));
            out.push_str(&format!("Recall: {:.*}\n", significant, self.recall));
        }
        out.push_str(&format!("{}: {:.*}", label, significant, self.f_score));
        out
    }
}

/// Precision is `num_matches / num_test`, recall `num_matches / num_gold`, the
/// F-score their harmonic mean. All three are zero when either total is zero.
pub fn compute_f(num_matches: u64, num_test: u64, num_gold: u64) -> Scores {
    if num_test == 0 || num_gold == 0 {
        return Scores::default();
    }
    let precision = num_matches as f64 / num_test as f64;
    let recall = num_matches as f64 / num_gold as f64;
    let f_score = if precision + recall != 0.0 {
        2.0 * precision * recall / (precision + recall)
    } else {
        0.0
    };
    Scores {
        precision,
        recall,
        f_score,
    }
}

/// Match and triple counts summed over the pairs of a corpus.
///
/// Totals of independent shards can be merged with `+`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RunningTotals {
    pub num_matches: u64,
    pub num_test: u64,
    pub num_gold: u64,
}

impl RunningTotals {
    pub fn new() -> RunningTotals {
        RunningTotals::default()
    }

    pub fn add(&mut self, num_matches: u64, num_test: u64, num_gold: u64) {
        self.num_matches += num_matches;
        self.num_test += num_test;
        self.num_gold += num_gold;
    }

    pub fn merge(&mut self, other: &RunningTotals) {
        self.add(other.num_matches, other.num_test, other.num_gold);
    }

    pub fn scores(&self) -> Scores {
        compute_f(self.num_matches, self.num_test, self.num_gold)
    }

    pub fn reset(&mut self) {
        *self = RunningTotals::default();
    }
}

impl Add for RunningTotals {
    type Output = RunningTotals;

    fn add(mut self, other: RunningTotals) -> RunningTotals {
        self.merge(&other);
        self
    }
}

impl AddAssign for RunningTotals {
    fn add_assign(&mut self, other: RunningTotals) {
        self.merge(&other);
    }
}
