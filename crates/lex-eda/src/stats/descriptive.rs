//! Descriptive statistics over non-missing observations.
//!
//! Conventions: sample variance uses `n - 1`, quantiles use linear
//! interpolation between order statistics (Hyndman-Fan type 7), skewness and
//! excess kurtosis are the bias-adjusted sample estimators.

/// Sorted copy of the observations.
pub fn sorted(values: &[f64]) -> Vec<f64> {
    let mut out = values.to_vec();
    out.sort_by(f64::total_cmp);
    out
}

/// Arithmetic mean, `None` when empty.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Sample variance (`n - 1` denominator), `None` below two observations.
pub fn variance(values: &[f64]) -> Option<f64> {
    if values.len() < 2 {
        return None;
    }
    let m = mean(values)?;
    let ss: f64 = values.iter().map(|v| (v - m).powi(2)).sum();
    Some(ss / (values.len() - 1) as f64)
}

/// Sample standard deviation, `None` below two observations.
pub fn std_dev(values: &[f64]) -> Option<f64> {
    variance(values).map(f64::sqrt)
}

/// Linear-interpolation quantile of already sorted values.
pub fn quantile_sorted(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }
    let pos = q.clamp(0.0, 1.0) * (sorted.len() as f64 - 1.0);
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    if lower == upper {
        return Some(sorted[lower]);
    }
    let weight = pos - lower as f64;
    Some(sorted[lower] + (sorted[upper] - sorted[lower]) * weight)
}

/// Median of already sorted values.
pub fn median(sorted: &[f64]) -> Option<f64> {
    quantile_sorted(sorted, 0.5)
}

/// Most frequent value; ties go to the smallest value.
pub fn mode(values: &[f64]) -> Option<f64> {
    let sorted = sorted(values);
    let mut best: Option<(f64, usize)> = None;
    let mut i = 0;
    while i < sorted.len() {
        let value = sorted[i];
        let run = sorted[i..].iter().take_while(|v| **v == value).count();
        if best.is_none_or(|(_, count)| run > count) {
            best = Some((value, run));
        }
        i += run;
    }
    best.map(|(value, _)| value)
}

/// Whether every observation equals the first.
pub(crate) fn is_constant(values: &[f64]) -> bool {
    values.windows(2).all(|w| w[0] == w[1])
}

/// Second, third and fourth central moments with an `n` denominator.
pub(crate) fn central_moments(values: &[f64]) -> Option<(f64, f64, f64)> {
    let m = mean(values)?;
    let n = values.len() as f64;
    let (mut m2, mut m3, mut m4) = (0.0, 0.0, 0.0);
    for v in values {
        let d = v - m;
        let d2 = d * d;
        m2 += d2;
        m3 += d2 * d;
        m4 += d2 * d2;
    }
    Some((m2 / n, m3 / n, m4 / n))
}

/// Bias-adjusted sample skewness (G1). Needs three observations.
///
/// A constant sample has skewness 0.
pub fn skewness(values: &[f64]) -> Option<f64> {
    let n = values.len();
    if n < 3 {
        return None;
    }
    let (m2, m3, _) = central_moments(values)?;
    if m2 == 0.0 || is_constant(values) {
        return Some(0.0);
    }
    let n = n as f64;
    let g1 = m3 / m2.powf(1.5);
    Some(g1 * (n * (n - 1.0)).sqrt() / (n - 2.0))
}

/// Bias-adjusted sample excess kurtosis (G2). Needs four observations.
///
/// A constant sample has kurtosis 0.
pub fn kurtosis(values: &[f64]) -> Option<f64> {
    let n = values.len();
    if n < 4 {
        return None;
    }
    let (m2, _, m4) = central_moments(values)?;
    if m2 == 0.0 || is_constant(values) {
        return Some(0.0);
    }
    let n = n as f64;
    let g2 = m4 / (m2 * m2) - 3.0;
    Some(((n + 1.0) * g2 + 6.0) * (n - 1.0) / ((n - 2.0) * (n - 3.0)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64, tol: f64) -> bool {
        (a - b).abs() < tol
    }

    #[test]
    fn test_mean_and_variance() {
        let v = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert_eq!(mean(&v), Some(5.0));
        assert!(approx(variance(&v).unwrap(), 32.0 / 7.0, 1e-12));
        assert!(approx(std_dev(&v).unwrap(), (32.0f64 / 7.0).sqrt(), 1e-12));
    }

    #[test]
    fn test_empty_and_single() {
        assert_eq!(mean(&[]), None);
        assert_eq!(variance(&[1.0]), None);
        assert_eq!(std_dev(&[]), None);
        assert_eq!(quantile_sorted(&[], 0.5), None);
        assert_eq!(mode(&[]), None);
        assert_eq!(skewness(&[1.0, 2.0]), None);
        assert_eq!(kurtosis(&[1.0, 2.0, 3.0]), None);
    }

    #[test]
    fn test_quantile_linear_interpolation() {
        let v = sorted(&[4.0, 1.0, 3.0, 2.0]);
        assert_eq!(quantile_sorted(&v, 0.0), Some(1.0));
        assert_eq!(quantile_sorted(&v, 1.0), Some(4.0));
        assert_eq!(quantile_sorted(&v, 0.25), Some(1.75));
        assert_eq!(median(&v), Some(2.5));
        assert_eq!(quantile_sorted(&v, 0.75), Some(3.25));
    }

    #[test]
    fn test_mode_ties_pick_smallest() {
        assert_eq!(mode(&[3.0, 1.0, 3.0, 1.0, 2.0]), Some(1.0));
        assert_eq!(mode(&[5.0, 2.0, 5.0]), Some(5.0));
        assert_eq!(mode(&[7.0]), Some(7.0));
    }

    #[test]
    fn test_skewness_symmetric_is_zero() {
        let v = [1.0, 2.0, 3.0, 4.0, 5.0];
        assert!(approx(skewness(&v).unwrap(), 0.0, 1e-12));
    }

    #[test]
    fn test_skewness_known_value() {
        // pandas: pd.Series([1, 2, 3, 10]).skew() == 1.7636... (bias-adjusted)
        let v = [1.0, 2.0, 3.0, 10.0];
        assert!(approx(skewness(&v).unwrap(), 1.7636, 1e-3));
    }

    #[test]
    fn test_kurtosis_known_value() {
        // pandas: pd.Series([1, 2, 3, 4, 5]).kurt() == -1.2
        let v = [1.0, 2.0, 3.0, 4.0, 5.0];
        assert!(approx(kurtosis(&v).unwrap(), -1.2, 1e-12));
    }

    #[test]
    fn test_constant_shape_is_zero() {
        let v = [3.0; 6];
        assert!(is_constant(&v));
        assert_eq!(skewness(&[0.1; 3]), Some(0.0));
        assert_eq!(skewness(&v), Some(0.0));
        assert_eq!(kurtosis(&v), Some(0.0));
        assert_eq!(variance(&v), Some(0.0));
    }
}
