//! Rolls daily progress rows up into weekly summaries and trends.
//!
//! Nothing in here fails: empty input produces zeroed summaries and every
//! division falls back to 0 when its denominator is 0.

use std::collections::HashMap;

use chrono::{Datelike, Duration, NaiveDate, Weekday};

use crate::model::progress::{DailyProgress, ProgressSummary, ProgressTrend, Trend, WeeklyProgress};

/// Rates within this distance of zero count as stable.
const TREND_THRESHOLD: f64 = 0.5;

/// Monday through Sunday of the week containing `date`.
///
/// `None` when the week runs past either end of the calendar.
pub fn week_bounds(date: NaiveDate) -> Option<(NaiveDate, NaiveDate)> {
    let start =
        date.checked_sub_signed(Duration::days(date.weekday().num_days_from_monday() as i64))?;
    let end = start.checked_add_signed(Duration::days(6))?;
    Some((start, end))
}

/// Summarizes one student's rows for one week.
///
/// `average_score` divides the score total by the number of rows, so rows
/// without a score pull the average down.
pub fn weekly_rollup(
    student_id: &str,
    daily_rows: &[DailyProgress],
    week_start: NaiveDate,
    week_end: NaiveDate,
) -> WeeklyProgress {
    let total_score: f64 = daily_rows.iter().filter_map(|r| r.score).sum();
    let average_score = ratio(total_score, daily_rows.len());
    let assignments_completed = daily_rows.iter().filter(|r| r.completed).count() as i32;
    let total_time_spent_minutes = total_minutes(daily_rows);

    let (best_day_of_week, worst_day_of_week) = best_and_worst_days(daily_rows);

    WeeklyProgress {
        student_id: student_id.to_string(),
        week_start,
        week_end,
        total_score,
        assignments_completed,
        average_score,
        best_day_of_week,
        worst_day_of_week,
        total_time_spent_minutes,
    }
}

/// Compares the first and second half of the rows by date.
///
/// With an odd number of rows the second half holds the extra one.
pub fn progress_trend(daily_rows: &[DailyProgress]) -> ProgressTrend {
    if daily_rows.len() < 2 {
        return ProgressTrend {
            improvement_rate: 0.0,
            trend: Trend::InsufficientData,
        };
    }

    let mut sorted: Vec<&DailyProgress> = daily_rows.iter().collect();
    sorted.sort_by_key(|r| r.date);
    let (first_half, second_half) = sorted.split_at(sorted.len() / 2);

    let improvement_rate = scored_average(second_half) - scored_average(first_half);
    let trend = if improvement_rate > TREND_THRESHOLD {
        Trend::Improving
    } else if improvement_rate < -TREND_THRESHOLD {
        Trend::Declining
    } else {
        Trend::Stable
    };

    ProgressTrend {
        improvement_rate,
        trend,
    }
}

/// Range summary whose average ignores rows without a score.
pub fn summarize(daily_rows: &[DailyProgress]) -> ProgressSummary {
    let completed = daily_rows.iter().filter(|r| r.completed).count();
    let rows: Vec<&DailyProgress> = daily_rows.iter().collect();

    ProgressSummary {
        total_rows: daily_rows.len(),
        completed,
        completion_rate: score_percentage(Some(completed as f64), daily_rows.len() as f64)
            .unwrap_or(0.0),
        average_score: scored_average(&rows),
        total_time_spent_minutes: total_minutes(daily_rows),
        trend: progress_trend(daily_rows),
    }
}

/// Score as a percentage of the maximum, if both make sense.
pub fn score_percentage(score: Option<f64>, max_score: f64) -> Option<f64> {
    match score {
        Some(score) if max_score > 0.0 => Some(score / max_score * 100.0),
        _ => None,
    }
}

fn best_and_worst_days(daily_rows: &[DailyProgress]) -> (Option<String>, Option<String>) {
    // Days are kept in first-seen order (by date) so ties resolve to the earlier day
    let mut sorted: Vec<&DailyProgress> = daily_rows.iter().collect();
    sorted.sort_by_key(|r| r.date);

    let mut order: Vec<Weekday> = Vec::new();
    let mut buckets: HashMap<Weekday, (f64, usize)> = HashMap::new();
    for row in sorted {
        let Some(score) = row.score else {
            continue;
        };
        let day = row.date.weekday();
        let entry = buckets.entry(day).or_insert_with(|| {
            order.push(day);
            (0.0, 0)
        });
        entry.0 += score;
        entry.1 += 1;
    }

    let mut best: Option<(Weekday, f64)> = None;
    let mut worst: Option<(Weekday, f64)> = None;
    for day in order {
        let (total, count) = buckets[&day];
        let average = ratio(total, count);
        if best.is_none_or(|(_, b)| average > b) {
            best = Some((day, average));
        }
        if worst.is_none_or(|(_, w)| average < w) {
            worst = Some((day, average));
        }
    }

    (
        best.map(|(day, _)| day_name(day).to_string()),
        worst.map(|(day, _)| day_name(day).to_string()),
    )
}

fn day_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

// Saturates at i32::MAX rather than wrapping
fn total_minutes(daily_rows: &[DailyProgress]) -> i32 {
    daily_rows
        .iter()
        .filter_map(|r| r.time_spent_minutes)
        .fold(0, i32::saturating_add)
}

fn scored_average(rows: &[&DailyProgress]) -> f64 {
    let scores: Vec<f64> = rows.iter().filter_map(|r| r.score).collect();
    ratio(scores.iter().sum(), scores.len())
}

fn ratio(total: f64, count: usize) -> f64 {
    if count == 0 { 0.0 } else { total / count as f64 }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(day: u32) -> NaiveDate {
        // 2025-09-01 is a Monday
        NaiveDate::from_ymd_opt(2025, 9, day).unwrap()
    }

    fn row(day: u32, score: Option<f64>, completed: bool) -> DailyProgress {
        DailyProgress {
            student_id: "student-1".to_string(),
            assignment_id: format!("assessment-{day}"),
            date: date(day),
            score,
            time_spent_minutes: Some(20),
            completed,
            attempts: 1,
        }
    }

    #[test]
    fn week_bounds_run_monday_to_sunday() {
        assert_eq!(week_bounds(date(3)), Some((date(1), date(7))));
        assert_eq!(week_bounds(date(1)), Some((date(1), date(7))));
        assert_eq!(week_bounds(date(7)), Some((date(1), date(7))));
        assert_eq!(week_bounds(date(8)), Some((date(8), date(14))));
    }

    #[test]
    fn week_bounds_at_the_calendar_edges_do_not_panic() {
        // Whichever weekday the extremes fall on, the result must stay in range
        for edge in [NaiveDate::MIN, NaiveDate::MAX] {
            if let Some((start, end)) = week_bounds(edge) {
                assert!(start <= edge && edge <= end);
                assert_eq!(start.weekday(), Weekday::Mon);
            }
        }
        if NaiveDate::MAX.weekday() != Weekday::Sun {
            assert_eq!(week_bounds(NaiveDate::MAX), None);
        }
        if NaiveDate::MIN.weekday() != Weekday::Mon {
            assert_eq!(week_bounds(NaiveDate::MIN), None);
        }
    }

    #[test]
    fn empty_week_is_zeroed() {
        let weekly = weekly_rollup("student-1", &[], date(1), date(7));
        assert_eq!(weekly.total_score, 0.0);
        assert_eq!(weekly.average_score, 0.0);
        assert_eq!(weekly.assignments_completed, 0);
        assert_eq!(weekly.total_time_spent_minutes, 0);
        assert_eq!(weekly.best_day_of_week, None);
        assert_eq!(weekly.worst_day_of_week, None);
    }

    #[test]
    fn weekly_average_divides_by_every_row() {
        let rows = vec![
            row(1, Some(80.0), true),
            row(2, None, false),
            row(3, Some(70.0), true),
            row(4, Some(90.0), false),
        ];
        let weekly = weekly_rollup("student-1", &rows, date(1), date(7));
        assert_eq!(weekly.total_score, 240.0);
        assert_eq!(weekly.average_score, 60.0);
        assert_eq!(weekly.assignments_completed, 2);
        assert_eq!(weekly.total_time_spent_minutes, 80);
        assert_eq!(weekly.week_start, date(1));
        assert_eq!(weekly.week_end, date(7));
    }

    #[test]
    fn best_and_worst_days_skip_unscored_days() {
        let rows = vec![
            row(1, Some(50.0), true),
            row(1, Some(70.0), true),
            row(2, None, false),
            row(3, Some(95.0), true),
            row(5, Some(40.0), true),
        ];
        let weekly = weekly_rollup("student-1", &rows, date(1), date(7));
        assert_eq!(weekly.best_day_of_week.as_deref(), Some("Wednesday"));
        assert_eq!(weekly.worst_day_of_week.as_deref(), Some("Friday"));
    }

    #[test]
    fn tied_days_resolve_to_the_earlier_date() {
        let rows = vec![row(4, Some(80.0), true), row(2, Some(80.0), true)];
        let weekly = weekly_rollup("student-1", &rows, date(1), date(7));
        assert_eq!(weekly.best_day_of_week.as_deref(), Some("Tuesday"));
        assert_eq!(weekly.worst_day_of_week.as_deref(), Some("Tuesday"));
    }

    #[test]
    fn rising_scores_are_improving() {
        let trend = progress_trend(&[row(2, Some(90.0), true), row(1, Some(60.0), true)]);
        assert_eq!(trend.improvement_rate, 30.0);
        assert_eq!(trend.trend, Trend::Improving);
    }

    #[test]
    fn falling_scores_are_declining() {
        let trend = progress_trend(&[row(1, Some(90.0), true), row(2, Some(60.0), true)]);
        assert_eq!(trend.trend, Trend::Declining);
    }

    #[test]
    fn small_changes_are_stable() {
        let trend = progress_trend(&[row(1, Some(80.0), true), row(2, Some(80.5), true)]);
        assert_eq!(trend.trend, Trend::Stable);
    }

    #[test]
    fn single_row_is_insufficient() {
        let trend = progress_trend(&[row(1, Some(80.0), true)]);
        assert_eq!(trend.trend, Trend::InsufficientData);
        assert_eq!(trend.improvement_rate, 0.0);
        assert_eq!(progress_trend(&[]).trend, Trend::InsufficientData);
    }

    #[test]
    fn odd_row_count_gives_second_half_the_extra_row() {
        // first half [60], second half [70, 100]
        let rows = vec![
            row(1, Some(60.0), true),
            row(2, Some(70.0), true),
            row(3, Some(100.0), true),
        ];
        let trend = progress_trend(&rows);
        assert_eq!(trend.improvement_rate, 25.0);
    }

    #[test]
    fn unscored_half_averages_to_zero() {
        let trend = progress_trend(&[row(1, None, false), row(2, Some(40.0), true)]);
        assert_eq!(trend.improvement_rate, 40.0);
        assert_eq!(trend.trend, Trend::Improving);
    }

    #[test]
    fn summary_average_ignores_unscored_rows() {
        let rows = vec![
            row(1, Some(80.0), true),
            row(2, None, false),
            row(3, Some(70.0), true),
            row(4, Some(90.0), false),
        ];
        let summary = summarize(&rows);
        assert_eq!(summary.total_rows, 4);
        assert_eq!(summary.completed, 2);
        assert_eq!(summary.completion_rate, 50.0);
        assert_eq!(summary.average_score, 80.0);
        assert_eq!(summary.total_time_spent_minutes, 80);
    }

    #[test]
    fn empty_summary_is_zeroed() {
        let summary = summarize(&[]);
        assert_eq!(summary.completion_rate, 0.0);
        assert_eq!(summary.average_score, 0.0);
        assert_eq!(summary.trend.trend, Trend::InsufficientData);
    }

    #[test]
    fn huge_minutes_saturate_instead_of_overflowing() {
        let mut first = row(1, Some(80.0), true);
        let mut second = row(2, Some(90.0), true);
        first.time_spent_minutes = Some(1_500_000_000);
        second.time_spent_minutes = Some(1_500_000_000);
        let rows = vec![first, second];

        let weekly = weekly_rollup("student-1", &rows, date(1), date(7));
        assert_eq!(weekly.total_time_spent_minutes, i32::MAX);
        assert_eq!(summarize(&rows).total_time_spent_minutes, i32::MAX);
    }

    #[test]
    fn weekly_and_summary_totals_agree_on_many_rows() {
        let rows: Vec<DailyProgress> = (0..70)
            .map(|i| {
                let mut r = row(1 + i % 7, Some((i % 10) as f64 * 10.0), i % 3 == 0);
                r.time_spent_minutes = if i % 5 == 0 { None } else { Some(24 * 60) };
                r
            })
            .collect();

        let weekly = weekly_rollup("student-1", &rows, date(1), date(7));
        let summary = summarize(&rows);
        assert_eq!(weekly.total_time_spent_minutes, 56 * 24 * 60);
        assert_eq!(weekly.total_time_spent_minutes, summary.total_time_spent_minutes);
        assert_eq!(weekly.assignments_completed as usize, summary.completed);
        assert_eq!(summary.total_rows, 70);
        // every row is scored, so both averages share a denominator
        assert_eq!(weekly.average_score, summary.average_score);
    }

    #[test]
    fn score_percentage_guards_missing_values() {
        assert_eq!(score_percentage(Some(15.0), 20.0), Some(75.0));
        assert_eq!(score_percentage(None, 20.0), None);
        assert_eq!(score_percentage(Some(15.0), 0.0), None);
    }
}
