mod common;

use chrono::{Datelike, Weekday};
use common::date;
use spender_core::ledger::{
    Frequency, RecurrenceEngine, RecurrenceRule, Transaction, MAX_GENERATED_OCCURRENCES,
};

fn anchor(amount: f64, on: chrono::NaiveDate, rule: &RecurrenceRule) -> Transaction {
    let mut base = Transaction::new(amount, on).with_recurrence(rule.clone());
    base.series_id = Some(base.id);
    base
}

#[test]
fn gym_membership_example_produces_three_followers() {
    let rule = RecurrenceRule::new(Frequency::Monthly, 1, Some(date(2024, 4, 15)));
    let base = anchor(-50.0, date(2024, 1, 15), &rule).with_note("Gym");

    let followers: Vec<_> = RecurrenceEngine::materialize(&base, &rule).collect();

    let dates: Vec<_> = followers.iter().map(|t| t.date).collect();
    assert_eq!(dates, [date(2024, 2, 15), date(2024, 3, 15), date(2024, 4, 15)]);
    for follower in &followers {
        assert_eq!(follower.amount, -50.0);
        assert_eq!(follower.series_id, base.series_id);
        assert_eq!(follower.note, "Gym");
        assert!(follower.is_recurring);
        assert_ne!(follower.id, base.id);
    }
}

#[test]
fn dates_strictly_increase_by_one_step() {
    for rule in [
        RecurrenceRule::weekly(),
        RecurrenceRule::biweekly(),
        RecurrenceRule::new(Frequency::Monthly, 2, None),
        RecurrenceRule::yearly(),
    ] {
        let base = anchor(-1.0, date(2024, 1, 31), &rule);
        let mut previous = base.date;
        for follower in RecurrenceEngine::materialize(&base, &rule) {
            assert!(follower.date > previous);
            assert_eq!(RecurrenceEngine::next_occurrence(previous, &rule), follower.date);
            previous = follower.date;
        }
    }
}

#[test]
fn never_past_end_or_ceiling() {
    let daily_ish = RecurrenceRule::new(Frequency::Weekly, 1, Some(date(2040, 1, 1)));
    let base = anchor(-1.0, date(2024, 1, 1), &daily_ish);
    let followers: Vec<_> = RecurrenceEngine::materialize(&base, &daily_ish).collect();
    assert_eq!(followers.len(), MAX_GENERATED_OCCURRENCES);

    let monthly = RecurrenceRule::monthly();
    let base = anchor(-1.0, date(2024, 1, 1), &monthly);
    let cap = RecurrenceEngine::horizon_cap(base.date, Frequency::Monthly);
    assert!(RecurrenceEngine::materialize(&base, &monthly).all(|t| t.date <= cap));
}

#[test]
fn biweekly_crosses_year_end_on_mondays() {
    let rule = RecurrenceRule::biweekly();
    let next = RecurrenceEngine::next_occurrence(date(2024, 12, 23), &rule);
    assert_eq!(next, date(2025, 1, 6));
    assert_eq!(next.weekday(), Weekday::Mon);
}

#[test]
fn jan_31_monthly_clamps() {
    let rule = RecurrenceRule::monthly();
    assert_eq!(
        RecurrenceEngine::next_occurrence(date(2025, 1, 31), &rule),
        date(2025, 2, 28)
    );
}

#[test]
fn regenerate_at_anchor_replaces_every_follower() {
    let rule = RecurrenceRule::new(Frequency::Monthly, 1, Some(date(2024, 6, 1)));
    let base = anchor(-20.0, date(2024, 1, 1), &rule);
    let followers: Vec<_> = RecurrenceEngine::materialize(&base, &rule).collect();
    assert_eq!(followers.len(), 5);

    let mut series = vec![base.clone()];
    series.extend(followers.iter().cloned());
    let unrelated = Transaction::new(-5.0, date(2024, 3, 3));
    series.push(unrelated.clone());

    let new_rule = RecurrenceRule::new(Frequency::Weekly, 2, Some(date(2024, 2, 26)));
    let plan = RecurrenceEngine::regenerate_future_tail(&base, &series, &new_rule);

    let expected: std::collections::BTreeSet<_> = followers.iter().map(|t| t.id).collect();
    assert_eq!(plan.to_delete, expected);
    assert!(!plan.to_delete.contains(&unrelated.id));
    let new_dates: Vec<_> = plan.to_create.iter().map(|t| t.date).collect();
    assert_eq!(
        new_dates,
        [date(2024, 1, 15), date(2024, 1, 29), date(2024, 2, 12), date(2024, 2, 26)]
    );
    assert_eq!(plan.edited.recurrence, Some(new_rule));
}

#[test]
fn regeneration_is_idempotent() {
    let rule = RecurrenceRule::monthly();
    let base = anchor(-20.0, date(2024, 1, 1), &rule);
    let series: Vec<_> = RecurrenceEngine::materialize(&base, &rule).collect();

    let first = RecurrenceEngine::regenerate_future_tail(&base, &series, &rule);
    let second = RecurrenceEngine::regenerate_future_tail(&base, &series, &rule);
    assert_eq!(first, second);
}

#[test]
fn earlier_instances_are_untouched() {
    let rule = RecurrenceRule::new(Frequency::Monthly, 1, Some(date(2024, 5, 1)));
    let base = anchor(-20.0, date(2024, 1, 1), &rule);
    let mut series = vec![base.clone()];
    series.extend(RecurrenceEngine::materialize(&base, &rule));

    let edited = series[2].clone();
    let plan = RecurrenceEngine::regenerate_future_tail(&edited, &series, &rule);

    for earlier in &series[..2] {
        assert!(!plan.to_delete.contains(&earlier.id));
    }
    assert_eq!(plan.to_delete.len(), 2);
    assert!(plan.to_create.iter().all(|t| t.date > edited.date));
}
