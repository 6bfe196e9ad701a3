use std::collections::BTreeMap;

use serde::Serialize;

use emberfx::DrawCommand;

/// Draw calls a frame may issue before it counts as over budget.
pub const DRAW_CALL_BUDGET: f64 = 2_000.0;

#[derive(Debug, Clone, Default, Serialize)]
pub struct MetricSummary {
    pub count: usize,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub p50: f64,
    pub p90: f64,
    pub p95: f64,
    pub p99: f64,
}

#[derive(Debug, Clone)]
pub struct MetricAggregator {
    samples: Vec<f64>,
    sum: f64,
    min: f64,
    max: f64,
}

impl Default for MetricAggregator {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricAggregator {
    pub fn new() -> Self {
        Self {
            samples: Vec::new(),
            sum: 0.0,
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
        }
    }

    pub fn push(&mut self, value: f64) {
        self.sum += value;
        self.min = self.min.min(value);
        self.max = self.max.max(value);
        self.samples.push(value);
    }

    /// Share of samples at or below `threshold`, in percent.
    pub fn pct_leq(&self, threshold: f64) -> f64 {
        if self.samples.is_empty() {
            return 0.0;
        }
        let hits = self.samples.iter().filter(|v| **v <= threshold).count();
        (hits as f64 / self.samples.len() as f64) * 100.0
    }

    pub fn summary(&self) -> MetricSummary {
        if self.samples.is_empty() {
            return MetricSummary::default();
        }

        let mut sorted = self.samples.clone();
        sorted.sort_by(|a, b| a.total_cmp(b));

        MetricSummary {
            count: self.samples.len(),
            min: self.min,
            max: self.max,
            mean: self.sum / self.samples.len() as f64,
            p50: percentile_nearest_rank(&sorted, 0.50),
            p90: percentile_nearest_rank(&sorted, 0.90),
            p95: percentile_nearest_rank(&sorted, 0.95),
            p99: percentile_nearest_rank(&sorted, 0.99),
        }
    }
}

fn percentile_nearest_rank(sorted: &[f64], p: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    let p = p.clamp(0.0, 1.0);
    let rank = ((p * sorted.len() as f64).ceil() as usize).saturating_sub(1);
    sorted[rank.min(sorted.len() - 1)]
}

/// Collects per-frame samples during a headless run.
#[derive(Debug, Default)]
pub struct SoakRecorder {
    frames: u64,
    triggers: u64,
    spawned: u64,
    particles: MetricAggregator,
    draw_calls: MetricAggregator,
    by_kind: BTreeMap<&'static str, u64>,
    per_effect: BTreeMap<String, u64>,
}

impl SoakRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_trigger(&mut self, effect: &str, spawned: usize) {
        self.triggers += 1;
        self.spawned += spawned as u64;
        *self.per_effect.entry(effect.to_string()).or_default() += spawned as u64;
    }

    /// Sample the state right after a frame was drawn.
    pub fn record_frame(&mut self, particle_count: usize, commands: &[DrawCommand]) {
        self.frames += 1;
        self.particles.push(particle_count as f64);
        let mut draws = 0u64;
        for command in commands {
            if matches!(command, DrawCommand::Clear(_)) {
                continue;
            }
            draws += 1;
            *self.by_kind.entry(command.kind()).or_default() += 1;
        }
        self.draw_calls.push(draws as f64);
    }

    pub fn finish(self, final_particles: usize) -> SoakReport {
        SoakReport {
            frames: self.frames,
            triggers: self.triggers,
            spawned: self.spawned,
            final_particles,
            particles: self.particles.summary(),
            frames_within_draw_budget_pct: self.draw_calls.pct_leq(DRAW_CALL_BUDGET),
            draw_calls: self.draw_calls.summary(),
            draw_calls_by_kind: self.by_kind,
            spawned_by_effect: self.per_effect,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SoakReport {
    pub frames: u64,
    pub triggers: u64,
    pub spawned: u64,
    pub final_particles: usize,
    pub particles: MetricSummary,
    pub draw_calls: MetricSummary,
    pub frames_within_draw_budget_pct: f64,
    pub draw_calls_by_kind: BTreeMap<&'static str, u64>,
    pub spawned_by_effect: BTreeMap<String, u64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use emberfx::Background;
    use macroquad::prelude::{vec2, WHITE};

    #[test]
    fn percentile_summary_is_reasonable() {
        let mut agg = MetricAggregator::new();
        for i in 1..=100 {
            agg.push(i as f64);
        }
        let s = agg.summary();
        assert_eq!(s.count, 100);
        assert_eq!(s.min, 1.0);
        assert_eq!(s.max, 100.0);
        assert!((s.mean - 50.5).abs() < 1e-6);
        assert_eq!(s.p50, 50.0);
        assert_eq!(s.p90, 90.0);
        assert_eq!(s.p95, 95.0);
        assert_eq!(s.p99, 99.0);
    }

    #[test]
    fn draw_budget_share_counts_frames_at_or_under_budget() {
        let circle = DrawCommand::Circle { center: vec2(0.0, 0.0), radius: 1.0, color: WHITE };
        let heavy = vec![circle.clone(); DRAW_CALL_BUDGET as usize + 1];
        let exact = vec![circle; DRAW_CALL_BUDGET as usize];

        assert_eq!(SoakRecorder::new().finish(0).frames_within_draw_budget_pct, 0.0);

        let mut recorder = SoakRecorder::new();
        recorder.record_frame(0, &[]);
        recorder.record_frame(0, &exact);
        recorder.record_frame(0, &heavy);
        recorder.record_frame(0, &heavy);
        let report = recorder.finish(0);
        assert_eq!(report.frames_within_draw_budget_pct, 50.0);
    }

    #[test]
    fn soak_report_skips_clears_and_groups_by_kind() {
        let mut recorder = SoakRecorder::new();
        recorder.record_trigger("burst", 14);
        recorder.record_trigger("popup", 1);
        recorder.record_frame(
            15,
            &[
                DrawCommand::Clear(Background::Transparent),
                DrawCommand::Circle { center: vec2(0.0, 0.0), radius: 2.0, color: WHITE },
                DrawCommand::Circle { center: vec2(1.0, 0.0), radius: 2.0, color: WHITE },
            ],
        );

        let report = recorder.finish(15);
        assert_eq!(report.frames, 1);
        assert_eq!(report.spawned, 15);
        assert_eq!(report.draw_calls.max, 2.0);
        assert_eq!(report.draw_calls_by_kind.get("circle"), Some(&2));
        assert_eq!(report.spawned_by_effect.get("burst"), Some(&14));

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["finalParticles"], 15);
    }
}
