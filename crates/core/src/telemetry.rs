//! Behavioral telemetry captured during the live session by the external
//! vision signal. Samples pass through the pipeline unmodified into the
//! persisted record; this module only summarizes them for the behavioral
//! prompt.
//!
//! Smoothing state is an explicit accumulator threaded through each step,
//! never ambient mutable state, so the summary math is testable in
//! isolation.

use serde::{Deserialize, Serialize};

/// Default smoothing factor for the per-channel EMA.
pub const SMOOTHING_ALPHA: f32 = 0.3;

/// One timestamped observation from the vision signal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TelemetrySample {
    /// Visible confidence, 0.0-1.0
    pub confidence: f32,
    /// Eye contact with the camera, 0.0-1.0
    pub eye_contact: f32,
    /// Milliseconds since the session epoch
    pub timestamp: i64,
}

/// One exponential-smoothing step. `prev` is the accumulator carried from
/// the previous step; `None` seeds it with the raw value.
pub fn smooth_step(prev: Option<f32>, raw: f32, alpha: f32) -> f32 {
    match prev {
        None => raw,
        Some(p) => p + alpha * (raw - p),
    }
}

/// Aggregate view of one session's telemetry.
#[derive(Debug, Clone, PartialEq)]
pub struct TelemetrySummary {
    pub samples: usize,
    pub mean_confidence: f32,
    pub mean_eye_contact: f32,
    /// Final EMA accumulator values; weight recent samples over early ones
    pub smoothed_confidence: f32,
    pub smoothed_eye_contact: f32,
    /// Span between first and last sample
    pub duration_ms: i64,
}

impl TelemetrySummary {
    /// `None` when nothing was captured - the caller decides how to degrade.
    pub fn from_samples(samples: &[TelemetrySample]) -> Option<Self> {
        let (first, last) = (samples.first()?, samples.last()?);

        let mut sum_confidence = 0.0f32;
        let mut sum_eye_contact = 0.0f32;
        let mut smoothed_confidence: Option<f32> = None;
        let mut smoothed_eye_contact: Option<f32> = None;

        for sample in samples {
            sum_confidence += sample.confidence;
            sum_eye_contact += sample.eye_contact;
            smoothed_confidence = Some(smooth_step(
                smoothed_confidence,
                sample.confidence,
                SMOOTHING_ALPHA,
            ));
            smoothed_eye_contact = Some(smooth_step(
                smoothed_eye_contact,
                sample.eye_contact,
                SMOOTHING_ALPHA,
            ));
        }

        let n = samples.len() as f32;
        Some(Self {
            samples: samples.len(),
            mean_confidence: sum_confidence / n,
            mean_eye_contact: sum_eye_contact / n,
            smoothed_confidence: smoothed_confidence.unwrap_or(0.0),
            smoothed_eye_contact: smoothed_eye_contact.unwrap_or(0.0),
            duration_ms: last.timestamp - first.timestamp,
        })
    }
}

/// Serialize telemetry for the behavioral prompt. An empty capture renders
/// an explicit no-signal notice so the agent degrades gracefully instead of
/// inventing ratings.
pub fn render_for_prompt(samples: &[TelemetrySample]) -> String {
    match TelemetrySummary::from_samples(samples) {
        None => "No visual telemetry was captured for this session. Treat eye contact and \
                 visible confidence as \"no signal\" rather than estimating them."
            .to_string(),
        Some(summary) => format!(
            "Samples captured: {} over {} ms\n\
             Mean confidence: {:.2} (smoothed {:.2})\n\
             Mean eye contact: {:.2} (smoothed {:.2})",
            summary.samples,
            summary.duration_ms,
            summary.mean_confidence,
            summary.smoothed_confidence,
            summary.mean_eye_contact,
            summary.smoothed_eye_contact,
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(confidence: f32, eye_contact: f32, timestamp: i64) -> TelemetrySample {
        TelemetrySample {
            confidence,
            eye_contact,
            timestamp,
        }
    }

    #[test]
    fn smooth_step_seeds_from_first_value() {
        assert_eq!(smooth_step(None, 0.8, SMOOTHING_ALPHA), 0.8);
    }

    #[test]
    fn smooth_step_moves_toward_raw() {
        let next = smooth_step(Some(0.0), 1.0, 0.5);
        assert!((next - 0.5).abs() < f32::EPSILON);
    }

    #[test]
    fn summary_of_empty_capture_is_none() {
        assert!(TelemetrySummary::from_samples(&[]).is_none());
    }

    #[test]
    fn summary_computes_means_and_span() {
        let samples = vec![
            sample(0.2, 0.4, 1_000),
            sample(0.4, 0.6, 2_000),
            sample(0.6, 0.8, 3_500),
        ];
        let summary = TelemetrySummary::from_samples(&samples).unwrap();
        assert_eq!(summary.samples, 3);
        assert!((summary.mean_confidence - 0.4).abs() < 1e-6);
        assert!((summary.mean_eye_contact - 0.6).abs() < 1e-6);
        assert_eq!(summary.duration_ms, 2_500);
    }

    #[test]
    fn empty_capture_renders_no_signal_notice() {
        let rendered = render_for_prompt(&[]);
        assert!(rendered.contains("No visual telemetry"));
    }

    #[test]
    fn populated_capture_renders_summary_block() {
        let rendered = render_for_prompt(&[sample(0.5, 0.5, 0), sample(0.7, 0.3, 900)]);
        assert!(rendered.contains("Samples captured: 2"));
        assert!(rendered.contains("Mean confidence"));
    }

    #[test]
    fn sample_serializes_with_wire_field_names() {
        let json = serde_json::to_value(sample(0.5, 0.25, 42)).unwrap();
        assert_eq!(json["eyeContact"], 0.25);
        assert_eq!(json["timestamp"], 42);
    }
}
