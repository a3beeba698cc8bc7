use std::cmp::Ordering;
use std::error::Error;
use std::fmt;

/// InputValueError is used if some simulation option or parameter does not fulfill the posed
/// requirements, e.g., a time step size outside the allowed range.
#[derive(Debug, Clone)]
pub struct InputValueError;

impl fmt::Display for InputValueError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Invalid input value")
    }
}

impl Error for InputValueError {}

/// signum returns -1, 0 or 1 depending on the sign of x. Unlike `f64::signum`, zero (and NaN)
/// map to 0.
pub fn signum(x: f64) -> i32 {
    if x > 0.0 {
        1
    } else if x < 0.0 {
        -1
    } else {
        0
    }
}

/// ordinal converts a placement into its English ordinal form, e.g. 1 -> "1st", 12 -> "12th".
pub fn ordinal(n: usize) -> String {
    let suffix = match (n % 10, n % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{}{}", n, suffix)
}

#[derive(Debug, Clone, Copy)]
pub enum SortOrder {
    Ascending,
    Descending,
}

/// argsort returns the indices that would sort an array. The sort is stable, i.e. equal values
/// keep their original relative order.
pub fn argsort<T: PartialOrd>(x: &[T], order: SortOrder) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..x.len()).collect();
    let cmp = |a: &T, b: &T| a.partial_cmp(b).unwrap_or(Ordering::Equal);
    match order {
        SortOrder::Ascending => indices.sort_by(|&a, &b| cmp(&x[a], &x[b])),
        SortOrder::Descending => indices.sort_by(|&a, &b| cmp(&x[b], &x[a])),
    }
    indices
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signum_maps_zero_to_zero() {
        assert_eq!(signum(0.0), 0);
        assert_eq!(signum(-0.0), 0);
        assert_eq!(signum(3.5), 1);
        assert_eq!(signum(-0.1), -1);
    }

    #[test]
    fn ordinals() {
        assert_eq!(ordinal(1), "1st");
        assert_eq!(ordinal(2), "2nd");
        assert_eq!(ordinal(3), "3rd");
        assert_eq!(ordinal(4), "4th");
        assert_eq!(ordinal(11), "11th");
        assert_eq!(ordinal(13), "13th");
        assert_eq!(ordinal(21), "21st");
    }

    #[test]
    fn argsort_is_stable() {
        let x = [3.0, 1.0, 3.0, 0.5];
        assert_eq!(argsort(&x, SortOrder::Ascending), vec![3, 1, 0, 2]);
        assert_eq!(argsort(&x, SortOrder::Descending), vec![0, 2, 1, 3]);
    }
}
