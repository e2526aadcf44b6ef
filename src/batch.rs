use crate::convert::{
    classification_to_score, precision_to_recall, recall_to_precision, score_to_classification,
};
use crate::priors::PriorModel;
use crate::utils::jsonl_ser;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::io::{BufRead, Write};

#[derive(Debug, Clone)]
pub struct BatchConfig {
    /// Classification threshold; only `classify_scores` reads it.
    pub threshold: f64,
    pub max_rows: Option<usize>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScoreRow {
    pub score: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ClassifyOut {
    pub score: f64,
    pub classification: u8,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ClassificationRow {
    pub classification: u8,
}

#[derive(Debug, Clone, Serialize)]
pub struct SoftenOut {
    pub classification: u8,
    pub score: f64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PrecisionRow {
    pub precision: f64,
    pub false_inclusion_rate: f64,
    pub classifier_positive_rate: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct RecallOut {
    #[serde(flatten)]
    pub inputs: PrecisionRow,
    pub recall: f64,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RecallRow {
    pub recall: f64,
    pub false_exclusion_rate: f64,
    pub prevalence: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct PrecisionOut {
    #[serde(flatten)]
    pub inputs: RecallRow,
    pub precision: f64,
}

/// Thresholds `{"score": f}` rows into `{"score", "classification"}` rows.
///
/// A row that fails validation aborts the run; there is no per-row recovery.
pub fn classify_scores<R: BufRead, W: Write>(reader: R, mut writer: W, cfg: BatchConfig) -> Result<()> {
    let mut count = 0usize;
    for line in reader.lines() {
        if let Some(m) = cfg.max_rows { if count >= m { break; } }
        let l = line?;
        if l.trim().is_empty() { continue; }
        count += 1;
        let r: ScoreRow = serde_json::from_str(&l)?;
        let classification = score_to_classification(r.score, cfg.threshold)?;
        jsonl_ser(&mut writer, &ClassifyOut { score: r.score, classification })?;
    }
    Ok(())
}

/// Turns `{"classification": 0|1}` rows back into scored rows using fitted priors.
pub fn soften_classifications<R: BufRead, W: Write>(
    priors: &PriorModel,
    reader: R,
    mut writer: W,
    cfg: BatchConfig,
) -> Result<()> {
    let mut count = 0usize;
    for line in reader.lines() {
        if let Some(m) = cfg.max_rows { if count >= m { break; } }
        let l = line?;
        if l.trim().is_empty() { continue; }
        count += 1;
        let r: ClassificationRow = serde_json::from_str(&l)?;
        let score = classification_to_score(
            r.classification,
            priors.precision_prior,
            priors.false_inclusion_rate_prior,
        )?;
        jsonl_ser(&mut writer, &SoftenOut { classification: r.classification, score })?;
    }
    Ok(())
}

/// Adds a `recall` field to precision/false-inclusion-rate/positive-rate rows.
pub fn recall_from_precision_rows<R: BufRead, W: Write>(
    reader: R,
    mut writer: W,
    cfg: BatchConfig,
) -> Result<()> {
    let mut count = 0usize;
    for line in reader.lines() {
        if let Some(m) = cfg.max_rows { if count >= m { break; } }
        let l = line?;
        if l.trim().is_empty() { continue; }
        count += 1;
        let r: PrecisionRow = serde_json::from_str(&l)?;
        let recall = precision_to_recall(r.precision, r.false_inclusion_rate, r.classifier_positive_rate)?;
        jsonl_ser(&mut writer, &RecallOut { inputs: r, recall })?;
    }
    Ok(())
}

/// Adds a `precision` field to recall/false-exclusion-rate/prevalence rows.
pub fn precision_from_recall_rows<R: BufRead, W: Write>(
    reader: R,
    mut writer: W,
    cfg: BatchConfig,
) -> Result<()> {
    let mut count = 0usize;
    for line in reader.lines() {
        if let Some(m) = cfg.max_rows { if count >= m { break; } }
        let l = line?;
        if l.trim().is_empty() { continue; }
        count += 1;
        let r: RecallRow = serde_json::from_str(&l)?;
        let precision = recall_to_precision(r.recall, r.false_exclusion_rate, r.prevalence)?;
        jsonl_ser(&mut writer, &PrecisionOut { inputs: r, precision })?;
    }
    Ok(())
}
