//! Counter aggregation
//!
//! Sums counter records per kind. Pure: no I/O, no failure modes.

use crate::core::models::{AggregateResult, CounterRecord};

/// Sum covered/missed per kind across all records.
///
/// Empty input yields all-zero totals. Sums saturate at `u64::MAX`.
pub fn aggregate(records: &[CounterRecord]) -> AggregateResult {
    records.iter().collect()
}

impl<'a> FromIterator<&'a CounterRecord> for AggregateResult {
    fn from_iter<I: IntoIterator<Item = &'a CounterRecord>>(iter: I) -> Self {
        let mut result = AggregateResult::default();
        for record in iter {
            result.totals_mut(record.kind).add(record.covered, record.missed);
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::{CounterKind, KindTotals};

    #[test]
    fn test_empty_input() {
        let result = aggregate(&[]);
        assert_eq!(result, AggregateResult::default());
        for kind in CounterKind::ALL {
            assert_eq!(result.ratio(kind), 0.0);
        }
    }

    #[test]
    fn test_sums_per_kind() {
        let records = vec![
            CounterRecord::new(CounterKind::Line, 80, 20),
            CounterRecord::new(CounterKind::Line, 5, 5),
            CounterRecord::new(CounterKind::Branch, 3, 1),
            CounterRecord::new(CounterKind::Instruction, 100, 0),
        ];
        let result = aggregate(&records);
        assert_eq!(result.line, KindTotals::new(85, 25));
        assert_eq!(result.branch, KindTotals::new(3, 1));
        assert_eq!(result.instruction, KindTotals::new(100, 0));
    }

    #[test]
    fn test_totals_match_record_sums() {
        let records: Vec<CounterRecord> = (0..50u64)
            .map(|i| {
                let kind = CounterKind::ALL[(i % 3) as usize];
                CounterRecord::new(kind, i * 7 % 13, i * 3 % 11)
            })
            .collect();
        let result = aggregate(&records);

        for kind in CounterKind::ALL {
            let expected: u64 = records.iter().filter(|r| r.kind == kind).map(|r| r.total()).sum();
            assert_eq!(result.totals(kind).total(), expected);
            let ratio = result.ratio(kind);
            assert!((0.0..=1.0).contains(&ratio));
        }
    }

    #[test]
    fn test_order_independent() {
        let mut records = vec![
            CounterRecord::new(CounterKind::Line, 1, 2),
            CounterRecord::new(CounterKind::Branch, 3, 4),
            CounterRecord::new(CounterKind::Line, 5, 6),
        ];
        let forward = aggregate(&records);
        records.reverse();
        assert_eq!(aggregate(&records), forward);
    }
}
