//! Command payloads and their rendering on stdout.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::inference::feldman_cousins::BeltRow;
use crate::interval::{BayesianLimit, Interval, IntervalStatus};

/// Supported output formats for CLI commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Pretty-printed JSON (default)
    #[default]
    Json,

    /// One line per result for quick reading
    Summary,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Summary => write!(f, "summary"),
        }
    }
}

/// A payload with a human-readable one-line form.
pub trait Summary {
    fn summary(&self) -> String;
}

/// Serialize `payload` in the requested format.
pub fn render<T: Serialize + Summary>(
    payload: &T,
    format: OutputFormat,
) -> serde_json::Result<String> {
    match format {
        OutputFormat::Json => serde_json::to_string_pretty(payload),
        OutputFormat::Summary => Ok(payload.summary()),
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FcReport {
    pub background: f64,
    pub background_sigma: f64,
    pub observed: u64,
    pub confidence_level: f64,
    #[serde(flatten)]
    pub interval: Interval,
}

impl Summary for FcReport {
    fn summary(&self) -> String {
        let head = format!(
            "FC {:.0}% CL, n={}, b={}",
            self.confidence_level * 100.0,
            self.observed,
            self.background
        );
        match self.interval.status {
            IntervalStatus::Covered => format!(
                "{}: [{:.3}, {:.3}]",
                head, self.interval.lower, self.interval.upper
            ),
            IntervalStatus::NoCoverage => format!("{}: no coverage", head),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BeltReport {
    pub background: f64,
    pub background_sigma: f64,
    pub confidence_level: f64,
    pub max_count: u64,
    pub empty_bands: usize,
    pub rows: Vec<BeltRow>,
}

impl Summary for BeltReport {
    fn summary(&self) -> String {
        let mut out = format!(
            "# belt b={} cl={} max_count={} empty={}\n# mu n_lower n_upper coverage",
            self.background, self.confidence_level, self.max_count, self.empty_bands
        );
        for row in &self.rows {
            let coverage = row
                .coverage
                .map(|c| format!("{:.5}", c))
                .unwrap_or_else(|| "-".to_string());
            out.push_str(&format!(
                "\n{:.4} {} {} {}",
                row.mu, row.n_lower, row.n_upper, coverage
            ));
        }
        out
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct BayesReport {
    pub observed: f64,
    pub background: f64,
    pub background_sigma: f64,
    pub confidence_level: f64,
    pub limit: BayesianLimit,
}

impl Summary for BayesReport {
    fn summary(&self) -> String {
        let head = format!(
            "Bayes {:.0}% CL, n={}, b={}",
            self.confidence_level * 100.0,
            self.observed,
            self.background
        );
        match self.limit {
            BayesianLimit::UpperLimit { upper } => format!("{}: s < {:.3}", head, upper),
            BayesianLimit::Interval { lower, upper } => {
                format!("{}: [{:.3}, {:.3}]", head, lower, upper)
            }
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ZeroBackgroundReport {
    pub n_atoms: f64,
    pub live_time: f64,
    pub efficiency: f64,
    pub confidence_level: f64,
    /// Half-life limit from the zero-background formula.
    pub lifetime_limit: f64,
    /// Half-life limit for a user-supplied count limit.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lifetime_from_counts: Option<f64>,
}

impl Summary for ZeroBackgroundReport {
    fn summary(&self) -> String {
        let mut out = format!(
            "T1/2 > {:.4e} ({:.0}% CL, zero background)",
            self.lifetime_limit,
            self.confidence_level * 100.0
        );
        if let Some(t) = self.lifetime_from_counts {
            out.push_str(&format!("; from counts: T1/2 > {:.4e}", t));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fc(interval: Interval) -> FcReport {
        FcReport {
            background: 3.0,
            background_sigma: 0.0,
            observed: 3,
            confidence_level: 0.9,
            interval,
        }
    }

    #[test]
    fn fc_json_flattens_interval() {
        let json = render(&fc(Interval::covered(0.0, 4.4)), OutputFormat::Json).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["upper"], 4.4);
        assert_eq!(value["status"], "covered");
        assert_eq!(value["observed"], 3);
    }

    #[test]
    fn fc_summary_marks_no_coverage() {
        let line = fc(Interval::no_coverage()).summary();
        assert!(line.ends_with("no coverage"), "{}", line);
        let line = fc(Interval::covered(0.0, 4.4)).summary();
        assert!(line.contains("[0.000, 4.400]"), "{}", line);
    }

    #[test]
    fn belt_summary_uses_sentinel() {
        let report = BeltReport {
            background: 0.0,
            background_sigma: 0.0,
            confidence_level: 0.9,
            max_count: 3,
            empty_bands: 1,
            rows: vec![BeltRow {
                mu: 9.0,
                n_lower: -1,
                n_upper: -1,
                coverage: None,
            }],
        };
        let text = report.summary();
        assert!(text.lines().last().unwrap().ends_with("-1 -1 -"), "{}", text);
    }

    #[test]
    fn zero_background_omits_missing_conversion() {
        let report = ZeroBackgroundReport {
            n_atoms: 1.0,
            live_time: 1.0,
            efficiency: 1.0,
            confidence_level: 0.9,
            lifetime_limit: 0.301,
            lifetime_from_counts: None,
        };
        let json = render(&report, OutputFormat::Json).unwrap();
        assert!(!json.contains("lifetime_from_counts"));
    }
}
