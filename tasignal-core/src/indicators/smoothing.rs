//! Rolling and exponentially weighted kernels over raw `f64` series.
//!
//! Exponential kernels use span-based, bias-adjusted weights: with
//! `alpha = 2 / (span + 1)` the observation k bars back weighs `(1 - alpha)^k`
//! and the weights are normalised over the history seen so far, so there is
//! a value from the first bar on. A NaN input contributes nothing but still
//! ages the older weights.

/// Decay factor `1 - alpha` for a span.
fn decay(span: usize) -> f64 {
    1.0 - 2.0 / (span as f64 + 1.0)
}

/// Exponentially weighted mean.
pub fn ewm_mean(values: &[f64], span: usize) -> Vec<f64> {
    let d = decay(span);
    let mut num = 0.0;
    let mut den = 0.0;
    values
        .iter()
        .map(|&x| {
            num *= d;
            den *= d;
            if !x.is_nan() {
                num += x;
                den += 1.0;
            }
            if den > 0.0 {
                num / den
            } else {
                f64::NAN
            }
        })
        .collect()
}

/// Exponentially weighted standard deviation with the reliability-weights
/// bias correction. NaN until two observations have been seen.
pub fn ewm_std(values: &[f64], span: usize) -> Vec<f64> {
    let d = decay(span);
    let mut weight = 0.0;
    let mut weight_sq = 0.0;
    let mut mean = 0.0;
    let mut var = 0.0;
    values
        .iter()
        .map(|&x| {
            weight *= d;
            weight_sq *= d * d;
            if !x.is_nan() {
                if weight == 0.0 {
                    mean = x;
                    var = 0.0;
                } else {
                    let old_mean = mean;
                    mean = (weight * old_mean + x) / (weight + 1.0);
                    var = (weight * (var + (old_mean - mean).powi(2)) + (x - mean).powi(2))
                        / (weight + 1.0);
                }
                weight += 1.0;
                weight_sq += 1.0;
            }
            let total_sq = weight * weight;
            let denom = total_sq - weight_sq;
            if weight == 0.0 || denom <= 0.0 {
                f64::NAN
            } else {
                (var * total_sq / denom).max(0.0).sqrt()
            }
        })
        .collect()
}

/// Rolling mean over `period` values; NaN until the window is full or while
/// the window holds a NaN.
pub fn rolling_mean(values: &[f64], period: usize) -> Vec<f64> {
    let mut result = vec![f64::NAN; values.len()];
    if period == 0 {
        return result;
    }
    let mut sum = 0.0;
    let mut nans = 0usize;
    for i in 0..values.len() {
        let entering = values[i];
        if entering.is_nan() {
            nans += 1;
        } else {
            sum += entering;
        }
        if i >= period {
            let leaving = values[i - period];
            if leaving.is_nan() {
                nans -= 1;
            } else {
                sum -= leaving;
            }
        }
        if i + 1 >= period && nans == 0 {
            result[i] = sum / period as f64;
        }
    }
    result
}

/// Wilder RSI. Seed is the mean gain/loss over the first `period` changes;
/// values before index `period` are NaN.
pub fn wilder_rsi(closes: &[f64], period: usize) -> Vec<f64> {
    let n = closes.len();
    let mut result = vec![f64::NAN; n];
    if period == 0 || n < period + 1 {
        return result;
    }

    let change = |i: usize| closes[i] - closes[i - 1];

    let mut avg_gain = 0.0;
    let mut avg_loss = 0.0;
    for i in 1..=period {
        let ch = change(i);
        if ch.is_nan() {
            return result;
        }
        if ch > 0.0 {
            avg_gain += ch;
        } else {
            avg_loss -= ch;
        }
    }
    avg_gain /= period as f64;
    avg_loss /= period as f64;
    result[period] = rsi_value(avg_gain, avg_loss);

    let alpha = 1.0 / period as f64;
    for i in (period + 1)..n {
        let ch = change(i);
        if ch.is_nan() {
            // NaN taints everything after it
            return result;
        }
        let gain = ch.max(0.0);
        let loss = (-ch).max(0.0);
        avg_gain = alpha * gain + (1.0 - alpha) * avg_gain;
        avg_loss = alpha * loss + (1.0 - alpha) * avg_loss;
        result[i] = rsi_value(avg_gain, avg_loss);
    }
    result
}

fn rsi_value(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 && avg_gain == 0.0 {
        50.0 // no movement
    } else if avg_loss == 0.0 {
        100.0
    } else if avg_gain == 0.0 {
        0.0
    } else {
        100.0 - 100.0 / (1.0 + avg_gain / avg_loss)
    }
}
