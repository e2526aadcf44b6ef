use crate::convert::score_to_classification;
use crate::utils::jsonl_deser;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufRead, BufReader};

#[derive(Debug, Clone)]
/// Configuration for fitting priors from a labeled holdout file.
pub struct FitConfig {
    pub threshold: f64,
    pub max_rows: Option<usize>,
}

#[derive(Debug, Clone, Deserialize)]
struct HoldoutRow {
    score: f64,
    label: u8,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
/// Persisted priors estimated from a labeled holdout at a fixed threshold.
///
/// `precision_prior` is the actually-positive fraction among predicted
/// positives; `false_inclusion_rate_prior` the actually-positive fraction
/// among predicted negatives. Together they turn a hard classification back
/// into a probabilistic score.
pub struct PriorModel {
    pub threshold: f64,
    pub precision_prior: f64,
    pub false_inclusion_rate_prior: f64,
    pub n: usize,
}

impl PriorModel {
    /// Fits priors from a JSONL file of `{"score": f, "label": 0|1}` rows.
    pub fn fit_from_file(path: &str, cfg: FitConfig) -> Result<Self> {
        let reader = BufReader::new(File::open(path).with_context(|| "open holdout file")?);
        Self::fit_from_reader(reader, cfg)
    }

    /// Thresholds each holdout score and tallies confusion counts.
    pub fn fit_from_reader<R: BufRead>(reader: R, cfg: FitConfig) -> Result<Self> {
        let rows: Vec<HoldoutRow> = jsonl_deser(reader, cfg.max_rows)?;
        if rows.is_empty() { anyhow::bail!("no holdout rows"); }

        let (mut tp, mut fp, mut fneg, mut tn) = (0usize, 0usize, 0usize, 0usize);
        for r in rows.iter() {
            if r.label > 1 { anyhow::bail!("label must be 0 or 1, got {}", r.label); }
            let pred = score_to_classification(r.score, cfg.threshold)?;
            match (pred, r.label) {
                (1, 1) => tp += 1,
                (1, 0) => fp += 1,
                (0, 1) => fneg += 1,
                _ => tn += 1,
            }
        }
        if tp + fp == 0 { anyhow::bail!("no positive predictions at threshold {}", cfg.threshold); }
        if fneg + tn == 0 { anyhow::bail!("no negative predictions at threshold {}", cfg.threshold); }

        Ok(PriorModel {
            threshold: cfg.threshold,
            precision_prior: tp as f64 / (tp + fp) as f64,
            false_inclusion_rate_prior: fneg as f64 / (fneg + tn) as f64,
            n: rows.len(),
        })
    }

    pub fn save(&self, path: &str) -> Result<()> {
        let w = std::fs::File::create(path)?;
        serde_json::to_writer_pretty(w, self)?;
        Ok(())
    }

    pub fn load(path: &str) -> Result<Self> {
        let r = std::fs::File::open(path)?;
        let m: PriorModel = serde_json::from_reader(r)?;
        Ok(m)
    }
}

#[derive(Debug, Clone, Serialize)]
/// Human-readable summary of a fitted prior model.
pub struct PriorSummary {
    pub threshold: f64,
    pub precision_prior: f64,
    pub false_inclusion_rate_prior: f64,
    pub n: usize,
}

impl From<&PriorModel> for PriorSummary {
    fn from(m: &PriorModel) -> Self {
        Self {
            threshold: m.threshold,
            precision_prior: m.precision_prior,
            false_inclusion_rate_prior: m.false_inclusion_rate_prior,
            n: m.n,
        }
    }
}
