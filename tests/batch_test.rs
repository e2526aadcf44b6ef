use metriconvert_rs::batch::{
    classify_scores, precision_from_recall_rows, recall_from_precision_rows,
    soften_classifications, BatchConfig,
};
use metriconvert_rs::priors::PriorModel;
use serde::Deserialize;
use std::io::{BufReader, BufWriter, Cursor};

fn run_lines(buf: &[u8]) -> Vec<String> {
    String::from_utf8(buf.to_vec())
        .unwrap()
        .lines()
        .map(|s| s.to_string())
        .collect()
}

#[derive(Debug, Deserialize)]
struct ClassifiedRow {
    score: f64,
    classification: u8,
}

#[test]
fn test_classify_scores_stream() {
    let input = [
        serde_json::json!({"score": 0.7}),
        serde_json::json!({"score": 0.3}),
        serde_json::json!({"score": 0.5}),
    ]
    .into_iter()
    .map(|v| v.to_string())
    .collect::<Vec<_>>()
    .join("\n");

    let reader = BufReader::new(Cursor::new(input));
    let mut out_buf: Vec<u8> = Vec::new();
    {
        let writer = BufWriter::new(&mut out_buf);
        let cfg = BatchConfig { threshold: 0.5, max_rows: None };
        classify_scores(reader, writer, cfg).unwrap();
    }

    let lines = run_lines(&out_buf);
    assert_eq!(lines.len(), 3);
    let rows: Vec<ClassifiedRow> = lines
        .iter()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert_eq!(rows[0].classification, 1);
    assert_eq!(rows[1].classification, 0);
    assert_eq!(rows[2].classification, 1);
    assert!((rows[0].score - 0.7).abs() < 1e-12);
}

#[test]
fn test_classify_scores_respects_max_rows_and_blank_lines() {
    let input = format!(
        "{}\n\n{}\n{}",
        serde_json::json!({"score": 0.7}),
        serde_json::json!({"score": 0.3}),
        serde_json::json!({"score": 0.9}),
    );
    let reader = BufReader::new(Cursor::new(input));
    let mut out_buf: Vec<u8> = Vec::new();
    {
        let writer = BufWriter::new(&mut out_buf);
        let cfg = BatchConfig { threshold: 0.5, max_rows: Some(2) };
        classify_scores(reader, writer, cfg).unwrap();
    }
    assert_eq!(run_lines(&out_buf).len(), 2);
}

#[test]
fn test_classify_scores_aborts_on_invalid_row() {
    let input = format!(
        "{}\n{}",
        serde_json::json!({"score": 0.7}),
        serde_json::json!({"score": 1.0}),
    );
    let reader = BufReader::new(Cursor::new(input));
    let mut out_buf: Vec<u8> = Vec::new();
    let writer = BufWriter::new(&mut out_buf);
    let cfg = BatchConfig { threshold: 0.5, max_rows: None };
    assert!(classify_scores(reader, writer, cfg).is_err());
}

#[derive(Debug, Deserialize)]
struct SoftenedRow {
    classification: u8,
    score: f64,
}

#[test]
fn test_soften_classifications_stream() {
    let priors = PriorModel {
        threshold: 0.5,
        precision_prior: 0.9,
        false_inclusion_rate_prior: 0.2,
        n: 10,
    };
    let input = [
        serde_json::json!({"classification": 1}),
        serde_json::json!({"classification": 0}),
    ]
    .into_iter()
    .map(|v| v.to_string())
    .collect::<Vec<_>>()
    .join("\n");

    let reader = BufReader::new(Cursor::new(input));
    let mut out_buf: Vec<u8> = Vec::new();
    {
        let writer = BufWriter::new(&mut out_buf);
        let cfg = BatchConfig { threshold: 0.5, max_rows: None };
        soften_classifications(&priors, reader, writer, cfg).unwrap();
    }

    let rows: Vec<SoftenedRow> = run_lines(&out_buf)
        .iter()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].classification, 1);
    assert!((rows[0].score - 0.9).abs() < 1e-12);
    assert_eq!(rows[1].classification, 0);
    assert!((rows[1].score - 0.2).abs() < 1e-12);
}

#[test]
fn test_soften_rejects_bad_label_row() {
    let priors = PriorModel {
        threshold: 0.5,
        precision_prior: 0.9,
        false_inclusion_rate_prior: 0.2,
        n: 10,
    };
    let input = serde_json::json!({"classification": 2}).to_string();
    let reader = BufReader::new(Cursor::new(input));
    let mut out_buf: Vec<u8> = Vec::new();
    let writer = BufWriter::new(&mut out_buf);
    let cfg = BatchConfig { threshold: 0.5, max_rows: None };
    assert!(soften_classifications(&priors, reader, writer, cfg).is_err());
}

#[derive(Debug, Deserialize)]
struct RecallRowOut {
    precision: f64,
    recall: f64,
}

#[test]
fn test_recall_rows_stream() {
    let input = serde_json::json!({
        "precision": 0.8,
        "false_inclusion_rate": 0.1,
        "classifier_positive_rate": 0.5
    })
    .to_string();
    let reader = BufReader::new(Cursor::new(input));
    let mut out_buf: Vec<u8> = Vec::new();
    {
        let writer = BufWriter::new(&mut out_buf);
        let cfg = BatchConfig { threshold: 0.5, max_rows: None };
        recall_from_precision_rows(reader, writer, cfg).unwrap();
    }
    let rows: Vec<RecallRowOut> = run_lines(&out_buf)
        .iter()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert_eq!(rows.len(), 1);
    // input fields are carried through alongside the derived one
    assert!((rows[0].precision - 0.8).abs() < 1e-12);
    assert!((rows[0].recall - 0.8 / 0.9).abs() < 1e-12);
}

#[derive(Debug, Deserialize)]
struct PrecisionRowOut {
    recall: f64,
    precision: f64,
}

#[test]
fn test_precision_rows_stream() {
    let input = serde_json::json!({
        "recall": 0.6,
        "false_exclusion_rate": 0.2,
        "prevalence": 0.25
    })
    .to_string();
    let reader = BufReader::new(Cursor::new(input));
    let mut out_buf: Vec<u8> = Vec::new();
    {
        let writer = BufWriter::new(&mut out_buf);
        let cfg = BatchConfig { threshold: 0.5, max_rows: None };
        precision_from_recall_rows(reader, writer, cfg).unwrap();
    }
    let rows: Vec<PrecisionRowOut> = run_lines(&out_buf)
        .iter()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert_eq!(rows.len(), 1);
    assert!((rows[0].recall - 0.6).abs() < 1e-12);
    let expected = 0.6 / (0.6 + 0.2 * 0.25 / 0.75);
    assert!((rows[0].precision - expected).abs() < 1e-12);
}
