//! Ordering, truncation and share-of-total helpers

use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    Ascending,
    #[default]
    Descending,
}

/// Stable sort by a numeric metric; equal rows keep their incoming order
pub fn rank_by<T, F>(rows: &mut [T], metric: F, direction: Direction)
where
    F: Fn(&T) -> f64,
{
    rows.sort_by(|a, b| {
        let ord = metric(a).partial_cmp(&metric(b)).unwrap_or(Ordering::Equal);
        match direction {
            Direction::Ascending => ord,
            Direction::Descending => ord.reverse(),
        }
    });
}

/// Keep the first `n` rows
pub fn top_n<T>(mut rows: Vec<T>, n: usize) -> Vec<T> {
    rows.truncate(n);
    rows
}

/// Rounded percentage of `part` in `total`; 0 when the total is empty
pub fn share_percent(part: u64, total: u64) -> u32 {
    if total == 0 {
        return 0;
    }
    (part as f64 / total as f64 * 100.0).round() as u32
}

/// Sort order selectable on the money report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MoneySort {
    #[default]
    Revenue,
    Profit,
    TripNumber,
}

impl From<&str> for MoneySort {
    fn from(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "profit" => MoneySort::Profit,
            "trip" => MoneySort::TripNumber,
            _ => MoneySort::Revenue,
        }
    }
}

impl std::str::FromStr for MoneySort {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(MoneySort::from(s))
    }
}

/// Plain string order, so route "10" sorts before route "9"
pub fn compare_labels(a: &str, b: &str) -> Ordering {
    a.cmp(b)
}
