// src/therapy/dashboard.rs

//! Text and JSON rendering of session results.

use super::analysis::Metrics;
use crate::simulation::Counts;
use serde::Serialize;
use std::fmt;

const RULE_WIDTH: usize = 50;
const BAR: &str = "█";

/// `█` repeated `floor(ratio * 10)` times.
pub fn ratio_bar(ratio: f64) -> String {
    BAR.repeat((ratio * 10.0).max(0.0) as usize)
}

/// The coherence dashboard for one session.
///
/// Renders the rounded metrics, the same values a JSON report carries.
pub struct Dashboard {
    metrics: Metrics,
}

impl Dashboard {
    pub fn new(metrics: &Metrics) -> Self {
        Self { metrics: metrics.rounded() }
    }
}

impl fmt::Display for Dashboard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let m = &self.metrics;
        let rule = "=".repeat(RULE_WIDTH);
        writeln!(f)?;
        writeln!(f, "⚡ Quantum Consciousness Coherence Dashboard ⚡")?;
        writeln!(f, "{}", rule)?;
        writeln!(f, "Coherence Score: {:.1}%", m.coherence_score * 100.0)?;
        writeln!(f, "Groundedness: {}", ratio_bar(m.groundedness))?;
        writeln!(f, "Transcendence: {}", ratio_bar(m.transcendence))?;
        writeln!(f, "Dynamic Balance: {}", ratio_bar(m.dynamic_balance))?;
        writeln!(f)?;
        writeln!(f, "Current State: {}", m.quantum_state)?;
        writeln!(f)?;
        writeln!(f, "Therapeutic Poem:")?;
        writeln!(f, "\"{}\"", m.therapeutic_poem)?;
        writeln!(f)?;
        writeln!(f, "Recommended Action: {}", m.recommended_action)?;
        writeln!(f)?;
        writeln!(f, "{}", rule)
    }
}

/// Horizontal text histogram of the most frequent outcomes.
pub struct Histogram<'a> {
    counts: &'a Counts,
    top: usize,
    width: usize,
}

impl<'a> Histogram<'a> {
    /// Shows the `top` most frequent outcomes, longest bar `width` cells.
    pub fn new(counts: &'a Counts, top: usize) -> Self {
        Self { counts, top, width: 40 }
    }

    pub fn with_width(mut self, width: usize) -> Self {
        self.width = width;
        self
    }
}

impl fmt::Display for Histogram<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rows = self.counts.sorted_by_frequency();
        let total = self.counts.total();
        let Some(&(_, max)) = rows.first() else {
            return writeln!(f, "(no outcomes)");
        };

        writeln!(f, "Being-Seeming Oscillation Measurement")?;
        for (bits, count) in rows.iter().take(self.top) {
            let len = (count * self.width).div_ceil(max.max(1));
            writeln!(
                f,
                "{} │{:<width$} {:>5} ({:.1}%)",
                bits,
                BAR.repeat(len),
                count,
                *count as f64 * 100.0 / total as f64,
                width = self.width
            )?;
        }
        if rows.len() > self.top {
            writeln!(f, "… {} more outcomes", rows.len() - self.top)?;
        }
        Ok(())
    }
}

/// One session as written by `--json`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionReport {
    pub backend: String,
    pub shots: usize,
    pub emergency: bool,
    pub anxiety_level: f64,
    pub metrics: Metrics,
    pub counts: Counts,
}

impl SessionReport {
    /// Report with rounded metrics.
    pub fn new(backend: &str, shots: usize, emergency: bool, anxiety_level: f64, metrics: &Metrics, counts: &Counts) -> Self {
        Self {
            backend: backend.to_string(),
            shots,
            emergency,
            anxiety_level,
            metrics: metrics.rounded(),
            counts: counts.clone(),
        }
    }
}

/// Everything one invocation ran, written to stdout as a single JSON document.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RunReport {
    pub sessions: Vec<SessionReport>,
}

impl RunReport {
    pub fn push(&mut self, report: SessionReport) {
        self.sessions.push(report);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::therapy::analysis::analyze;

    fn sample_metrics() -> Metrics {
        let counts: Counts = [("00000000", 100), ("11111111", 250), ("10011000", 650)].into_iter().collect();
        analyze(&counts).unwrap()
    }

    #[test]
    fn bars_truncate_towards_zero() {
        assert_eq!(ratio_bar(0.0), "");
        assert_eq!(ratio_bar(0.19), "█");
        assert_eq!(ratio_bar(0.65), "██████");
        assert_eq!(ratio_bar(1.0), "██████████");
        assert_eq!(ratio_bar(-0.1), "");
    }

    #[test]
    fn dashboard_layout() {
        let text = Dashboard::new(&sample_metrics()).to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[1], "⚡ Quantum Consciousness Coherence Dashboard ⚡");
        assert_eq!(lines[2], "=".repeat(50));
        // 0.5*0.25 + 0.3*0.65 = 0.32
        assert_eq!(lines[3], "Coherence Score: 32.0%");
        assert_eq!(lines[4], "Groundedness: █");
        assert_eq!(lines[5], "Transcendence: ██");
        assert_eq!(lines[6], "Dynamic Balance: ██████");
        assert!(text.contains("Current State: Healthy Oscillation"));
        assert!(text.contains("\"Being dances, seeming flows / Which is real? Nobody knows\""));
        assert!(text.contains("Recommended Action: Apply golden ratio phase correction"));
        assert_eq!(*lines.last().unwrap(), "=".repeat(50));
    }

    #[test]
    fn histogram_lists_top_outcomes() {
        let counts: Counts = [("00", 10), ("01", 5), ("10", 1), ("11", 2)].into_iter().collect();
        let text = Histogram::new(&counts, 2).with_width(10).to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[1].starts_with("00 │██████████"));
        assert!(lines[2].starts_with("01 │█████ "));
        assert_eq!(lines[3], "… 2 more outcomes");
    }

    #[test]
    fn histogram_of_empty_counts() {
        assert_eq!(Histogram::new(&Counts::new(), 5).to_string(), "(no outcomes)\n");
    }

    #[test]
    fn report_serializes_rounded_metrics() {
        let counts: Counts = [("00000000", 1), ("00000001", 2)].into_iter().collect();
        let metrics = analyze(&counts).unwrap();
        let report = SessionReport::new("statevector_simulator", 3, false, 0.5, &metrics, &counts);
        let json: serde_json::Value = serde_json::to_value(&report).unwrap();
        assert_eq!(json["metrics"]["groundedness"], 0.333);
        assert_eq!(json["metrics"]["quantum_state"], "Integrated Self");
        assert_eq!(json["counts"]["00000001"], 2);
        assert_eq!(json["shots"], 3);
    }

    #[test]
    fn run_report_holds_every_session_in_one_document() {
        let counts: Counts = [("11111111", 3), ("00000001", 1)].into_iter().collect();
        let metrics = analyze(&counts).unwrap();
        let mut run = RunReport::default();
        run.push(SessionReport::new("statevector_simulator", 4, false, 0.5, &metrics, &counts));
        run.push(SessionReport::new("statevector_simulator", 4, true, 0.309, &metrics, &counts));

        let text = serde_json::to_string_pretty(&run).unwrap();
        let json: serde_json::Value = serde_json::from_str(&text).unwrap();
        let sessions = json["sessions"].as_array().unwrap();
        assert_eq!(sessions.len(), 2);
        assert_eq!(sessions[0]["emergency"], false);
        assert_eq!(sessions[1]["emergency"], true);
        assert_eq!(sessions[1]["anxiety_level"], 0.309);
        assert_eq!(sessions[1]["counts"]["11111111"], 3);
    }
}
