//! Descriptive summaries of the surveyed population.

use crate::dataset::RawTable;
use serde::Serialize;
use std::collections::BTreeMap;

/// Mean development index of one group of households.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct GroupSummary {
    pub group: String,
    pub mean_index: f64,
    pub count: usize,
}

/// Mean of `index` per distinct value of `group_column`, sorted by group.
/// Rows without a group value are left out; an absent column gives no groups.
pub fn mean_index_by_group(table: &RawTable, index: &[f64], group_column: &str) -> Vec<GroupSummary> {
    let Some(groups) = table.column(group_column) else {
        return Vec::new();
    };
    let mut sums: BTreeMap<&str, (f64, usize)> = BTreeMap::new();
    for (group, value) in groups.into_iter().zip(index) {
        if let Some(group) = group {
            let entry = sums.entry(group).or_insert((0.0, 0));
            entry.0 += value;
            entry.1 += 1;
        }
    }
    sums.into_iter()
        .map(|(group, (sum, count))| GroupSummary {
            group: group.to_string(),
            mean_index: sum / count as f64,
            count,
        })
        .collect()
}

/// Percentage change from `previous` to `current`; 0 when `previous` is 0.
pub fn percent_change(current: f64, previous: f64) -> f64 {
    if previous == 0.0 {
        return 0.0;
    }
    (current - previous) / previous * 100.0
}

/// Brazilian-style number: `.` groups thousands, `,` separates decimals.
/// With `decimals == 0` the value is truncated toward zero.
pub fn format_number(value: f64, prefix: &str, suffix: &str, decimals: usize) -> String {
    let text = if decimals == 0 {
        format!("{}", value.trunc() as i64)
    } else {
        format!("{:.*}", decimals, value)
    };
    let (sign, digits) = match text.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", text.as_str()),
    };
    let (int_part, frac_part) = match digits.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (digits, None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }

    match frac_part {
        Some(frac) => format!("{}{}{},{}{}", prefix, sign, grouped, frac, suffix),
        None => format!("{}{}{}{}", prefix, sign, grouped, suffix),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_index_by_group() {
        let table = RawTable::from_records(
            &["regiao"],
            &[vec!["Sul"], vec!["Norte"], vec!["Sul"], vec![""]],
        );
        let summary = mean_index_by_group(&table, &[1.0, 0.5, 0.0, 0.9], "regiao");
        assert_eq!(
            summary,
            vec![
                GroupSummary { group: "Norte".to_string(), mean_index: 0.5, count: 1 },
                GroupSummary { group: "Sul".to_string(), mean_index: 0.5, count: 2 },
            ]
        );
        assert!(mean_index_by_group(&table, &[], "raca_cor").is_empty());
    }

    #[test]
    fn test_percent_change() {
        assert!((percent_change(110.0, 100.0) - 10.0).abs() < 1e-9);
        assert!((percent_change(50.0, 100.0) + 50.0).abs() < 1e-9);
        assert_eq!(percent_change(5.0, 0.0), 0.0);
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(1234567.0, "", "", 0), "1.234.567");
        assert_eq!(format_number(1234.567, "R$ ", "", 2), "R$ 1.234,57");
        assert_eq!(format_number(12.34, "", "%", 1), "12,3%");
        assert_eq!(format_number(-9876.5, "", "", 0), "-9.876");
        assert_eq!(format_number(999.0, "", "", 0), "999");
    }
}
