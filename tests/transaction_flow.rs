mod common;

use common::{date, seeded_ledger};
use spender_core::{
    config::Config,
    core::services::{EditScope, TransactionDraft, TransactionEdit, TransactionService},
    errors::SpenderError,
    ledger::{RecurrenceRule, Transaction},
    storage::{TransactionQuery, TransactionStore},
};

#[test]
fn salary_series_stays_positive_under_income_category() {
    let mut ledger = seeded_ledger("Flow");
    let income = ledger.category_by_name("Income").unwrap().id;
    let draft = TransactionDraft::new(-3000.0, date(2024, 1, 25))
        .with_category(income)
        .with_recurrence(RecurrenceRule::monthly());

    let created = TransactionService::create(&mut ledger, draft, &Config::default()).unwrap();

    assert_eq!(created.followers.len(), 12);
    let series = ledger
        .query(&TransactionQuery::series(created.anchor))
        .unwrap();
    assert_eq!(series.len(), 13);
    assert!(series.iter().all(|t| t.amount == 3000.0));
    assert_eq!(series.last().map(|t| t.date), Some(date(2025, 1, 25)));
}

#[test]
fn editing_twice_from_same_instance_is_stable() {
    let mut ledger = seeded_ledger("Flow");
    let rule = RecurrenceRule::monthly().with_end_date(Some(date(2024, 8, 1)));
    let created = TransactionService::create(
        &mut ledger,
        TransactionDraft::new(-15.0, date(2024, 1, 1)).with_recurrence(rule),
        &Config::default(),
    )
    .unwrap();
    let pivot = created.followers[2];

    for amount in [-18.0, -21.0] {
        let changes = TransactionEdit {
            amount: Some(amount),
            ..TransactionEdit::default()
        };
        TransactionService::edit(
            &mut ledger,
            pivot,
            changes,
            EditScope::ThisAndFuture,
            &Config::default(),
        )
        .unwrap();
    }

    let series = ledger
        .query(&TransactionQuery::series(created.anchor))
        .unwrap();
    assert_eq!(series.len(), 8);
    let amounts: Vec<_> = series.iter().map(|t| t.amount).collect();
    assert_eq!(amounts, [-15.0, -15.0, -15.0, -21.0, -21.0, -21.0, -21.0, -21.0]);
    assert!(ledger.warnings().is_empty());
}

#[test]
fn changing_frequency_rebuilds_the_tail() {
    let mut ledger = seeded_ledger("Flow");
    let created = TransactionService::create(
        &mut ledger,
        TransactionDraft::new(-10.0, date(2024, 3, 4))
            .with_recurrence(RecurrenceRule::weekly().with_end_date(Some(date(2024, 4, 29)))),
        &Config::default(),
    )
    .unwrap();
    assert_eq!(created.followers.len(), 8);

    let changes = TransactionEdit {
        recurrence: Some(RecurrenceRule::biweekly().with_end_date(Some(date(2024, 4, 29)))),
        ..TransactionEdit::default()
    };
    TransactionService::edit(
        &mut ledger,
        created.anchor,
        changes,
        EditScope::ThisAndFuture,
        &Config::default(),
    )
    .unwrap();

    let dates: Vec<_> = ledger
        .query(&TransactionQuery::series(created.anchor))
        .unwrap()
        .iter()
        .map(|t| t.date)
        .collect();
    assert_eq!(
        dates,
        [
            date(2024, 3, 4),
            date(2024, 3, 18),
            date(2024, 4, 1),
            date(2024, 4, 15),
            date(2024, 4, 29)
        ]
    );
}

#[test]
fn unrelated_transactions_survive_series_edits() {
    let mut ledger = seeded_ledger("Flow");
    let loose = Transaction::new(-7.0, date(2024, 2, 10));
    let loose_id = ledger.insert(loose).unwrap();
    let created = TransactionService::create(
        &mut ledger,
        TransactionDraft::new(-10.0, date(2024, 1, 10))
            .with_recurrence(RecurrenceRule::monthly().with_end_date(Some(date(2024, 4, 10)))),
        &Config::default(),
    )
    .unwrap();

    TransactionService::edit(
        &mut ledger,
        created.anchor,
        TransactionEdit {
            note: Some("Renamed".into()),
            ..TransactionEdit::default()
        },
        EditScope::ThisAndFuture,
        &Config::default(),
    )
    .unwrap();

    assert!(ledger.transaction(loose_id).is_ok());
    assert_eq!(ledger.transactions.len(), 5);
}

#[test]
fn deleted_instance_is_gone() {
    let mut ledger = seeded_ledger("Flow");
    let created = TransactionService::create(
        &mut ledger,
        TransactionDraft::new(-4.0, date(2024, 6, 1)),
        &Config::default(),
    )
    .unwrap();

    TransactionService::delete(&mut ledger, created.anchor).unwrap();
    assert!(matches!(
        ledger.transaction(created.anchor),
        Err(SpenderError::TransactionNotFound(_))
    ));
}

#[test]
fn cascade_succeeds_after_moving_a_follower_before_the_anchor() {
    let mut ledger = seeded_ledger("Flow");
    let rule = RecurrenceRule::monthly().with_end_date(Some(date(2024, 4, 15)));
    let created = TransactionService::create(
        &mut ledger,
        TransactionDraft::new(-50.0, date(2024, 1, 15)).with_recurrence(rule),
        &Config::default(),
    )
    .unwrap();
    let march = created.followers[1];

    TransactionService::edit(
        &mut ledger,
        march,
        TransactionEdit {
            date: Some(date(2024, 1, 10)),
            ..TransactionEdit::default()
        },
        EditScope::ThisOnly,
        &Config::default(),
    )
    .unwrap();

    for amount in [-65.0, -70.0] {
        TransactionService::edit(
            &mut ledger,
            created.anchor,
            TransactionEdit {
                amount: Some(amount),
                ..TransactionEdit::default()
            },
            EditScope::ThisAndFuture,
            &Config::default(),
        )
        .expect("cascade from the anchor");
    }

    let series = ledger
        .query(&TransactionQuery::series(created.anchor))
        .unwrap();
    let rows: Vec<_> = series.iter().map(|t| (t.date, t.amount)).collect();
    assert_eq!(
        rows,
        [
            (date(2024, 1, 10), -50.0),
            (date(2024, 1, 15), -70.0),
            (date(2024, 2, 15), -70.0),
            (date(2024, 3, 15), -70.0),
            (date(2024, 4, 15), -70.0)
        ]
    );
    assert_eq!(ledger.transaction(march).unwrap().date, date(2024, 1, 10));
    assert!(ledger.warnings().is_empty());
}
