use std::fmt::Debug;

/// Convert a Vector to a printable string
///
/// # Example
///
/// ```rust
/// # use supres::misc::vec_to_string;
/// let xs: Vec<u8> = vec![0, 1, 2, 3, 4, 5];
///
/// assert_eq!(vec_to_string(&xs, 6).as_str(), "[0, 1, 2, 3, 4, 5]");
/// assert_eq!(vec_to_string(&xs, 5).as_str(), "[0, 1, 2, 3, ... , 5]");
///
/// ```
pub fn vec_to_string<T: Debug>(xs: &[T], max_entries: usize) -> String {
    let mut out = String::new();
    out += "[";
    let n = xs.len();
    xs.iter().enumerate().for_each(|(i, x)| {
        let to_push = if i < max_entries - 1 && i < n - 1 {
            format!("{:?}, ", x)
        } else if i == (max_entries - 1) && n > max_entries {
            String::from("... , ")
        } else if i == n - 1 {
            format!("{:?}]", x)
        } else {
            String::new()
        };

        out.push_str(to_push.as_str());
    });

    out
}

/// Safely compute `log(sum(exp(xs))`
///
/// Returns negative infinity for an empty slice and NaN if any entry is NaN
/// or the maximum is positive infinity.
///
/// # Example
///
/// ```rust
/// # use supres::misc::logsumexp;
/// let xs = [-1000.0, -1000.0];
/// let lse = logsumexp(&xs);
/// assert!((lse - (-1000.0 + 2.0_f64.ln())).abs() < 1E-10);
/// ```
pub fn logsumexp(xs: &[f64]) -> f64 {
    match xs {
        [] => f64::NEG_INFINITY,
        [x] => *x,
        _ => {
            let maxval = xs.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            if maxval == f64::NEG_INFINITY {
                return f64::NEG_INFINITY;
            }
            if xs.iter().any(|x| x.is_nan()) || maxval == f64::INFINITY {
                return f64::NAN;
            }
            xs.iter().fold(0.0, |acc, x| acc + (x - maxval).exp()).ln()
                + maxval
        }
    }
}
