//! Navigation Pattern Analyzer Module
//!
//! Learns direction frequencies and action sequences from the interaction
//! history and produces ranked slice predictions. Prediction is pure per
//! call: input is the history plus the current position, output a ranked
//! list. Nothing here touches the cache store.

use std::collections::{HashMap, HashSet, VecDeque};

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

use crate::interaction::{InteractionEvent, InteractionRecorder, NavDirection, RECENT_NAV_WINDOW};

// == Constants ==
/// Nominal loader latency used for the ready-by estimate
const NOMINAL_LOAD_LATENCY_MS: i64 = 150;

/// Direction frequency above which a candidate is ranked High priority
const HIGH_PRIORITY_FREQUENCY: f64 = 0.7;

/// Length of the action sequences tracked in the n-gram histogram
const SEQUENCE_LEN: usize = 3;

// == Prediction Priority ==
/// Scheduling priority attached to a prediction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PredictionPriority {
    High,
    Medium,
    Low,
}

// == Prediction ==
/// One ranked slice prediction, produced fresh per request.
#[derive(Debug, Clone, Serialize)]
pub struct Prediction {
    /// Predicted slice index
    pub slice_index: i64,
    /// Heuristic likelihood in [0, 1] that this slice is requested next
    pub confidence: f64,
    /// Scheduling priority for the preloader
    pub priority: PredictionPriority,
    /// When a preload issued now is expected to be resident
    pub estimated_ready_by: DateTime<Utc>,
}

// == Pattern Analyzer ==
/// Maintains frequency statistics over the recorded interaction history and
/// derives predictions from them.
#[derive(Debug, Default)]
pub struct PatternAnalyzer {
    /// Bounded interaction history
    recorder: InteractionRecorder,
    /// Single-action histogram keyed by event signature
    action_counts: HashMap<String, u64>,
    /// 3-gram histogram keyed by the last three signatures joined with '>'
    sequence_counts: HashMap<String, u64>,
    /// Rolling window of the most recent signatures
    recent_signatures: VecDeque<String>,
}

impl PatternAnalyzer {
    // == Constructor ==
    /// Creates an analyzer with the given history window.
    pub fn new(history_window: usize) -> Self {
        Self {
            recorder: InteractionRecorder::new(history_window),
            ..Default::default()
        }
    }

    // == Record ==
    /// Records an event and updates both histograms incrementally, so
    /// pattern state is always consistent with the latest event.
    pub fn record(&mut self, event: InteractionEvent) {
        let signature = event.signature();
        *self.action_counts.entry(signature.clone()).or_insert(0) += 1;

        if self.recent_signatures.len() >= SEQUENCE_LEN {
            self.recent_signatures.pop_front();
        }
        self.recent_signatures.push_back(signature);
        if self.recent_signatures.len() == SEQUENCE_LEN {
            let key = self
                .recent_signatures
                .iter()
                .cloned()
                .collect::<Vec<_>>()
                .join(">");
            *self.sequence_counts.entry(key).or_insert(0) += 1;
        }

        self.recorder.record(event);
    }

    // == Predict Next ==
    /// Produces up to `limit` ranked predictions for the next slice request.
    ///
    /// Direction-frequency candidates are derived from the last
    /// [`RECENT_NAV_WINDOW`] navigation events; directions at or below
    /// `confidence_threshold` produce no candidate. Sequential fallback
    /// candidates are always appended, at half confidence and Low priority
    /// when direction candidates exist, at full strength otherwise.
    pub fn predict_next(
        &self,
        current_slice: i64,
        total_slices: i64,
        confidence_threshold: f64,
        limit: usize,
    ) -> Vec<Prediction> {
        if total_slices <= 0 || limit == 0 {
            return Vec::new();
        }

        let ready_by = Utc::now() + Duration::milliseconds(NOMINAL_LOAD_LATENCY_MS);
        let nav: Vec<&InteractionEvent> = self.recorder.navigation_events().collect();

        let mut candidates = if nav.is_empty() {
            Vec::new()
        } else {
            self.direction_candidates(&nav, current_slice, total_slices, confidence_threshold, ready_by)
        };

        let combined = !candidates.is_empty();
        candidates.extend(sequential_fallback(current_slice, total_slices, combined, ready_by));

        // Rank by confidence, keep the best candidate per target slice.
        candidates.sort_by(|a, b| {
            b.confidence
                .partial_cmp(&a.confidence)
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        let mut seen = HashSet::new();
        candidates.retain(|p| seen.insert(p.slice_index));
        candidates.truncate(limit);
        candidates
    }

    /// One candidate per direction whose recent frequency clears the threshold.
    fn direction_candidates(
        &self,
        nav: &[&InteractionEvent],
        current_slice: i64,
        total_slices: i64,
        confidence_threshold: f64,
        ready_by: DateTime<Utc>,
    ) -> Vec<Prediction> {
        let recent = &nav[nav.len().saturating_sub(RECENT_NAV_WINDOW)..];
        let total = recent.len() as f64;

        let mut direction_counts: HashMap<NavDirection, usize> = HashMap::new();
        for event in recent {
            if let Some(direction) = event.direction {
                *direction_counts.entry(direction).or_insert(0) += 1;
            }
        }

        let mut candidates = Vec::new();
        for (direction, count) in direction_counts {
            let frequency = count as f64 / total;
            if frequency <= confidence_threshold {
                continue;
            }

            let target = match direction {
                NavDirection::Next => (current_slice + 1).min(total_slices - 1),
                NavDirection::Previous => (current_slice - 1).max(0),
                NavDirection::Jump => self.jump_target(nav, current_slice, total_slices),
            };
            // A prediction for the slice already on screen is useless.
            if target == current_slice {
                continue;
            }

            let priority = match direction {
                NavDirection::Jump => PredictionPriority::Low,
                _ if frequency > HIGH_PRIORITY_FREQUENCY => PredictionPriority::High,
                _ => PredictionPriority::Medium,
            };

            candidates.push(Prediction {
                slice_index: target,
                confidence: frequency,
                priority,
                estimated_ready_by: ready_by,
            });
        }
        candidates
    }

    /// Target for a Jump candidate: current position offset by the mean
    /// historical jump distance, or the dataset midpoint with no history.
    ///
    /// The mean is taken over the whole retained history without decay, so
    /// very long sessions can converge to a stale average.
    fn jump_target(&self, nav: &[&InteractionEvent], current_slice: i64, total_slices: i64) -> i64 {
        let mut deltas = Vec::new();
        for pair in nav.windows(2) {
            if pair[1].direction != Some(NavDirection::Jump) {
                continue;
            }
            if let (Some(from), Some(to)) = (pair[0].slice_index, pair[1].slice_index) {
                let delta = to - from;
                if delta.abs() > 1 {
                    deltas.push(delta);
                }
            }
        }

        let target = if deltas.is_empty() {
            total_slices / 2
        } else {
            let mean = deltas.iter().sum::<i64>() as f64 / deltas.len() as f64;
            current_slice + mean.round() as i64
        };
        target.clamp(0, total_slices - 1)
    }

    // == Histogram Accessors ==
    /// Observed count for a single-action signature.
    pub fn action_count(&self, signature: &str) -> u64 {
        self.action_counts.get(signature).copied().unwrap_or(0)
    }

    /// The `n` most frequent 3-action sequences, most frequent first.
    pub fn top_sequences(&self, n: usize) -> Vec<(String, u64)> {
        let mut sequences: Vec<_> = self
            .sequence_counts
            .iter()
            .map(|(k, v)| (k.clone(), *v))
            .collect();
        sequences.sort_by(|a, b| b.1.cmp(&a.1));
        sequences.truncate(n);
        sequences
    }

    /// Number of events currently retained in history.
    pub fn history_len(&self) -> usize {
        self.recorder.len()
    }
}

// == Sequential Fallback ==
/// Forward/backward neighbor predictions that keep prefetching useful even
/// with no learned pattern: up to three ahead, two behind.
fn sequential_fallback(
    current_slice: i64,
    total_slices: i64,
    combined: bool,
    ready_by: DateTime<Utc>,
) -> Vec<Prediction> {
    const FORWARD: [(i64, f64); 3] = [(1, 0.8), (2, 0.6), (3, 0.4)];
    const BACKWARD: [(i64, f64); 2] = [(1, 0.6), (2, 0.4)];

    let mut predictions = Vec::new();

    for (rank, (offset, confidence)) in FORWARD.iter().enumerate() {
        let target = current_slice + offset;
        if target > total_slices - 1 {
            break;
        }
        let priority = if combined {
            PredictionPriority::Low
        } else if rank == 0 {
            PredictionPriority::High
        } else {
            PredictionPriority::Medium
        };
        predictions.push(Prediction {
            slice_index: target,
            confidence: if combined { confidence / 2.0 } else { *confidence },
            priority,
            estimated_ready_by: ready_by,
        });
    }

    for (offset, confidence) in BACKWARD.iter() {
        let target = current_slice - offset;
        if target < 0 {
            break;
        }
        predictions.push(Prediction {
            slice_index: target,
            confidence: if combined { confidence / 2.0 } else { *confidence },
            priority: PredictionPriority::Low,
            estimated_ready_by: ready_by,
        });
    }

    predictions
}
