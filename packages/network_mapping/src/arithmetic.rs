// Copyright (c) Microsoft Corporation.
// Licensed under the MIT license.

/// Approximates `x.exp()` by squaring `1 + x/256` eight times. Besides being
/// cheaper than the libm call, it saturates to 0 below -256 instead of
/// underflowing, which keeps the cumulative sums built on top of it finite
/// for strongly negative inputs.
pub fn approximate_exponent(x: f64) -> f64 {
    return if x < -256_f64 {
        0_f64
    } else {
        let mut result: f64 = 1_f64 + x / 256_f64;
        result *= result;
        result *= result;
        result *= result;
        result *= result;
        result *= result;
        result *= result;
        result *= result;
        result *= result;
        result
    };
}

/// Raises `base` to an integer power by repeated multiplication. The layout
/// gradient evaluates small fixed exponents in a tight loop, where this beats
/// the general `powf` path.
pub fn fast_pow(
    base: f64,
    exponent: i32,
) -> f64 {
    let mut result: f64 = 1_f64;
    if exponent > 0 {
        result = base;
        for _ in 1..exponent {
            result *= base;
        }
    } else if exponent < 0 {
        result = 1_f64 / base;
        for _ in 1..-exponent {
            result /= base;
        }
    }
    return result;
}

/// Median of the values; the average of the two middle values for an even
/// count. Returns 0 for an empty slice.
pub fn median(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0_f64;
    }
    let mut sorted: Vec<f64> = values.to_vec();
    sorted.sort_unstable_by(|a, b| a.partial_cmp(b).unwrap());
    let middle: usize = sorted.len() / 2;
    return if sorted.len() % 2 == 0 {
        (sorted[middle - 1] + sorted[middle]) / 2_f64
    } else {
        sorted[middle]
    };
}

/// Binary search over a non-decreasing cumulative array for the first index
/// whose value is at least `target`. Returns `cumulative.len()` when every
/// value is below the target.
pub fn first_index_at_least(
    cumulative: &[f64],
    target: f64,
) -> usize {
    let mut low: isize = -1;
    let mut high: isize = cumulative.len() as isize;
    while low < high - 1 {
        let middle: isize = (low + high) / 2;
        if cumulative[middle as usize] < target {
            low = middle;
        } else {
            high = middle;
        }
    }
    return high as usize;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_approximate_exponent() {
        assert_eq!(approximate_exponent(0_f64), 1_f64);
        assert_eq!(approximate_exponent(-300_f64), 0_f64);
        for x in [-4_f64, -1_f64, -0.1, 0.5, 1_f64, 3_f64].iter() {
            let approximated: f64 = approximate_exponent(*x);
            let exact: f64 = x.exp();
            assert!(
                (approximated - exact).abs() / exact < 0.05,
                "approximation of exp({}) was {} but the exact value is {}",
                x,
                approximated,
                exact
            );
        }
    }

    #[test]
    fn test_fast_pow() {
        assert_eq!(fast_pow(3_f64, 0), 1_f64);
        assert_eq!(fast_pow(3_f64, 1), 3_f64);
        assert_eq!(fast_pow(3_f64, 4), 81_f64);
        assert!((fast_pow(2_f64, -2) - 0.25).abs() < 1e-12);
        assert_eq!(fast_pow(1.5, 2), 2.25);
    }

    #[test]
    fn test_median() {
        assert_eq!(median(&[]), 0_f64);
        assert_eq!(median(&[7_f64]), 7_f64);
        assert_eq!(median(&[3_f64, 1_f64, 2_f64]), 2_f64);
        assert_eq!(median(&[4_f64, 1_f64, 3_f64, 2_f64]), 2.5);
    }

    #[test]
    fn test_first_index_at_least() {
        let cumulative: Vec<f64> = vec![0.25, 0.25, 0.75, 1.0];
        assert_eq!(first_index_at_least(&cumulative, 0.0), 0);
        assert_eq!(first_index_at_least(&cumulative, 0.25), 0);
        assert_eq!(first_index_at_least(&cumulative, 0.5), 2);
        assert_eq!(first_index_at_least(&cumulative, 1.0), 3);
        assert_eq!(first_index_at_least(&cumulative, 2.0), 4);
    }
}
