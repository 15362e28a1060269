// StashScope - core/aggregate.rs
//
// Chart aggregators. Each is a pure function from a record sequence to a
// label axis plus aligned count series. Empty field values are ordinary
// group keys.

use crate::core::model::{ChartData, Field, Record, Series};
use crate::util::constants::{DEFAULT_TIME_PART, HOURS_PER_DAY};
use std::collections::{BTreeMap, HashMap};

/// Records per `Date` value (sorted ascending as plain strings), one
/// series per `League` in first-seen order.
pub fn timeline<'a, I>(records: I) -> ChartData
where
    I: IntoIterator<Item = &'a Record>,
{
    let mut grouped: BTreeMap<&str, HashMap<&str, u64>> = BTreeMap::new();
    let mut leagues: Vec<&str> = Vec::new();

    for record in records {
        let date = record.field(Field::Date);
        let league = record.field(Field::League);
        if !leagues.contains(&league) {
            leagues.push(league);
        }
        *grouped.entry(date).or_default().entry(league).or_insert(0) += 1;
    }

    let labels: Vec<String> = grouped.keys().map(|d| d.to_string()).collect();
    let series = leagues
        .iter()
        .map(|league| Series {
            name: league.to_string(),
            values: grouped
                .values()
                .map(|per_league| per_league.get(league).copied().unwrap_or(0))
                .collect(),
        })
        .collect();

    ChartData { labels, series }
}

/// Frequency of each `Action` value, in first-seen order.
pub fn by_action<'a, I>(records: I) -> ChartData
where
    I: IntoIterator<Item = &'a Record>,
{
    count_by(records, Field::Action, "Action Frequency")
}

/// Distribution of records per `Account`, in first-seen order.
pub fn by_account<'a, I>(records: I) -> ChartData
where
    I: IntoIterator<Item = &'a Record>,
{
    count_by(records, Field::Account, "Account Distribution")
}

/// Activity per calendar day and hour of day.
///
/// The day is the text before the first space of `Date`; the hour is the
/// leading integer of the next space-separated token up to its first colon
/// (0 when absent or not a number). Produces 24 series `Hour 0`..`Hour 23`
/// over days sorted ascending. An hour outside 0-23 still registers its day
/// but is not counted.
pub fn hourly<'a, I>(records: I) -> ChartData
where
    I: IntoIterator<Item = &'a Record>,
{
    let mut daily: BTreeMap<&str, [u64; HOURS_PER_DAY]> = BTreeMap::new();

    for record in records {
        let (day, hour) = split_day_hour(record.field(Field::Date));
        let buckets = daily.entry(day).or_insert([0; HOURS_PER_DAY]);
        match usize::try_from(hour) {
            Ok(h) if h < HOURS_PER_DAY => buckets[h] += 1,
            _ => tracing::trace!(day, hour, "Hour outside 0-23 not counted"),
        }
    }

    let labels: Vec<String> = daily.keys().map(|d| d.to_string()).collect();
    let series = (0..HOURS_PER_DAY)
        .map(|h| Series {
            name: format!("Hour {h}"),
            values: daily.values().map(|buckets| buckets[h]).collect(),
        })
        .collect();

    ChartData { labels, series }
}

/// Split a `Date` value into its day part and hour of day.
pub fn split_day_hour(date: &str) -> (&str, i64) {
    let mut tokens = date.split(' ');
    let day = tokens.next().unwrap_or("");
    let time = tokens.next().unwrap_or(DEFAULT_TIME_PART);
    let hour_text = time.split(':').next().unwrap_or("");
    (day, parse_leading_int(hour_text).unwrap_or(0))
}

/// Parse an optional sign followed by leading ASCII digits, ignoring any
/// trailing text. Leading whitespace is skipped.
fn parse_leading_int(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    let digits = &digits[..end];
    if digits.is_empty() {
        return None;
    }
    // Overflow saturates so the value stays outside every valid hour.
    let value = digits.parse::<i64>().unwrap_or(i64::MAX);
    Some(if negative { -value } else { value })
}

fn count_by<'a, I>(records: I, field: Field, series_name: &str) -> ChartData
where
    I: IntoIterator<Item = &'a Record>,
{
    let mut labels: Vec<String> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut values: Vec<u64> = Vec::new();

    for record in records {
        let key = record.field(field);
        match index.get(key) {
            Some(&i) => values[i] += 1,
            None => {
                index.insert(key, labels.len());
                labels.push(key.to_string());
                values.push(1);
            }
        }
    }

    ChartData {
        labels,
        series: vec![Series {
            name: series_name.to_string(),
            values,
        }],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(date: &str, league: &str) -> Record {
        Record::from_pairs(&[("Date", date), ("League", league)])
    }

    fn rec_action_account(action: &str, account: &str) -> Record {
        Record::from_pairs(&[("Action", action), ("Account", account)])
    }

    #[test]
    fn test_timeline_fills_missing_combinations() {
        let records = vec![rec("d1", "A"), rec("d1", "B"), rec("d2", "A")];
        let chart = timeline(&records);
        assert_eq!(chart.labels, vec!["d1", "d2"]);
        assert_eq!(chart.series.len(), 2);
        assert_eq!(chart.series[0].name, "A");
        assert_eq!(chart.series[0].values, vec![1, 1]);
        assert_eq!(chart.series[1].name, "B");
        assert_eq!(chart.series[1].values, vec![1, 0]);
    }

    #[test]
    fn test_timeline_labels_sorted_as_strings() {
        let records = vec![rec("2024-01-10", "A"), rec("2024-01-02", "A"), rec("", "A")];
        let chart = timeline(&records);
        assert_eq!(chart.labels, vec!["", "2024-01-02", "2024-01-10"]);
    }

    #[test]
    fn test_empty_input_yields_empty_charts() {
        let records: Vec<Record> = Vec::new();
        assert!(timeline(&records).is_empty());
        assert!(timeline(&records).series.is_empty());
        assert!(by_action(&records).is_empty());
        let hourly_chart = hourly(&records);
        assert!(hourly_chart.is_empty());
        assert_eq!(hourly_chart.series.len(), 24);
    }

    #[test]
    fn test_action_counts_first_seen_order() {
        let records = vec![
            rec_action_account("removed", "a"),
            rec_action_account("added", "b"),
            rec_action_account("removed", "a"),
            rec_action_account("", "c"),
        ];
        let chart = by_action(&records);
        assert_eq!(chart.labels, vec!["removed", "added", ""]);
        assert_eq!(chart.series[0].values, vec![2, 1, 1]);

        let chart = by_account(&records);
        assert_eq!(chart.labels, vec!["a", "b", "c"]);
        assert_eq!(chart.series[0].values, vec![2, 1, 1]);
        assert_eq!(chart.series[0].name, "Account Distribution");
    }

    #[test]
    fn test_hourly_counts_hour_fourteen() {
        let records = vec![rec("2024-01-05 14:30", "A")];
        let chart = hourly(&records);
        assert_eq!(chart.labels, vec!["2024-01-05"]);
        assert_eq!(chart.series.len(), 24);
        assert_eq!(chart.series[14].name, "Hour 14");
        assert_eq!(chart.series[14].values, vec![1]);
        let total: u64 = chart.series.iter().map(|s| s.values[0]).sum();
        assert_eq!(total, 1);
    }

    #[test]
    fn test_hourly_defaults_and_out_of_range() {
        let records = vec![
            rec("2024-01-06", "A"),          // no time part: hour 0
            rec("2024-01-06 xx:10", "A"),    // unparseable: hour 0
            rec("2024-01-07 25:00", "A"),    // out of range: day only
            rec("2024-01-05T09:00:00", "A"), // no space: whole value is the day
        ];
        let chart = hourly(&records);
        assert_eq!(
            chart.labels,
            vec!["2024-01-05T09:00:00", "2024-01-06", "2024-01-07"]
        );
        assert_eq!(chart.series[0].values, vec![1, 2, 0]);
        assert_eq!(chart.stacked_total(2), 0);
    }

    #[test]
    fn test_hourly_overflowing_hour_registers_day_only() {
        let records = vec![rec("2024-01-08 99999999999999999999:00", "A")];
        let chart = hourly(&records);
        assert_eq!(chart.labels, vec!["2024-01-08"]);
        assert_eq!(chart.series[0].values, vec![0]);
        assert_eq!(chart.stacked_total(0), 0);
    }

    #[test]
    fn test_split_day_hour() {
        assert_eq!(split_day_hour("2024-01-05 14:30"), ("2024-01-05", 14));
        assert_eq!(split_day_hour("2024-01-05 7"), ("2024-01-05", 7));
        assert_eq!(split_day_hour("2024-01-05 08pm:00"), ("2024-01-05", 8));
        assert_eq!(split_day_hour("2024-01-05  14:30"), ("2024-01-05", 0));
        assert_eq!(split_day_hour("2024-01-05 -3:00"), ("2024-01-05", -3));
        assert_eq!(split_day_hour(""), ("", 0));
        assert_eq!(
            split_day_hour("2024-01-05 99999999999999999999:00"),
            ("2024-01-05", i64::MAX)
        );
    }
}
