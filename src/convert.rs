use crate::error::{ConvertError, Result};

fn check_open_unit(name: &str, v: f64) -> Result<()> {
    // NaN fails both comparisons and is rejected with the rest.
    if v > 0.0 && v < 1.0 {
        Ok(())
    } else {
        Err(ConvertError::InvalidArgument(format!(
            "{name} must be strictly between 0 and 1, got {v}"
        )))
    }
}

/// Thresholds a continuous score into a hard 0/1 classification.
///
/// The score must lie strictly inside (0, 1). The threshold itself is not
/// range-checked; a threshold at or outside the unit interval yields a
/// constant classifier.
pub fn score_to_classification(score: f64, threshold: f64) -> Result<u8> {
    check_open_unit("score", score)?;
    Ok(u8::from(score >= threshold))
}

/// Converts a hard 0/1 classification back into a probabilistic score using
/// priors for the classifier's precision and false inclusion rate: the
/// probability of being truly positive given the predicted class.
pub fn classification_to_score(
    classification: u8,
    precision_prior: f64,
    false_inclusion_rate_prior: f64,
) -> Result<f64> {
    if classification > 1 {
        return Err(ConvertError::InvalidArgument(format!(
            "classification must be 0 or 1, got {classification}"
        )));
    }
    check_open_unit("precision prior", precision_prior)?;
    check_open_unit("false inclusion rate prior", false_inclusion_rate_prior)?;
    Ok(if classification == 1 { precision_prior } else { false_inclusion_rate_prior })
}

/// Derives recall from precision, the false inclusion rate, and the
/// classifier's positive rate (Bayes over the confusion-matrix quantities).
pub fn precision_to_recall(
    precision: f64,
    false_inclusion_rate: f64,
    classifier_positive_rate: f64,
) -> Result<f64> {
    check_open_unit("precision", precision)?;
    check_open_unit("false inclusion rate", false_inclusion_rate)?;
    check_open_unit("classifier positive rate", classifier_positive_rate)?;
    let missed = false_inclusion_rate * (1.0 - classifier_positive_rate) / classifier_positive_rate;
    Ok(precision / (precision + missed))
}

/// Derives precision from recall, the false exclusion rate, and the
/// prevalence of actual positives.
pub fn recall_to_precision(recall: f64, false_exclusion_rate: f64, prevalence: f64) -> Result<f64> {
    check_open_unit("recall", recall)?;
    check_open_unit("false exclusion rate", false_exclusion_rate)?;
    check_open_unit("prevalence", prevalence)?;
    let spurious = false_exclusion_rate * prevalence / (1.0 - prevalence);
    Ok(recall / (recall + spurious))
}

/// F-beta summary of a precision/recall pair. Beta weighs recall over
/// precision; beta = 1 gives the harmonic mean (F1).
pub fn fbeta_score(precision: f64, recall: f64, beta: f64) -> Result<f64> {
    check_open_unit("precision", precision)?;
    check_open_unit("recall", recall)?;
    if !beta.is_finite() || beta <= 0.0 {
        return Err(ConvertError::InvalidArgument(format!(
            "beta must be a positive finite number, got {beta}"
        )));
    }
    let b2 = beta * beta;
    Ok((1.0 + b2) * precision * recall / (b2 * precision + recall))
}
