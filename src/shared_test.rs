use super::*;
use crate::consts::{DEFAULT_MAX_SLOT, DEFAULT_MIN_SLOT};

fn half_full_row() -> SlotRow<String> {
    SlotRow::from_occupancy(
        DEFAULT_MIN_SLOT,
        DEFAULT_MAX_SLOT,
        (1..=5).map(|i| (i, format!("seed-{i}"))),
    )
    .unwrap()
}

#[tokio::test]
async fn insert_through_handle_updates_row() {
    let shared = SharedRow::new(half_full_row());
    let shift = shared.insert_at(1, "N".into(), Direction::Forward).await.unwrap();

    assert_eq!(shift.empty_slot, Some(6));
    assert_eq!(shift.moves.len(), 5);
    assert_eq!(shared.occupied_count().await, 6);
    let first = shared.read(|row| row.get(1).cloned()).await;
    assert_eq!(first.as_deref(), Some("N"));
}

#[tokio::test]
async fn clones_share_one_row() {
    let a = SharedRow::new(half_full_row());
    let b = a.clone();
    b.take(3).await.unwrap();
    assert!(a.read(|row| row.is_vacant(3)).await);
    a.place(3, "back".into()).await.unwrap();
    assert_eq!(b.snapshot().await.get(3).map(String::as_str), Some("back"));
}

#[tokio::test]
async fn failed_insert_leaves_shared_row_untouched() {
    let shared = SharedRow::from(half_full_row());
    let before = shared.snapshot().await;

    let err = shared.insert_at(5, "N".into(), Direction::Backward).await.unwrap_err();

    assert_eq!(err, SlotError::NoSpace { target: 5, direction: Direction::Backward });
    assert_eq!(shared.snapshot().await, before);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_inserts_never_lose_cards() {
    let shared = SharedRow::new(half_full_row());

    // Five gaps, eight callers: exactly five win.
    let handles: Vec<_> = (0..8)
        .map(|n| {
            let shared = shared.clone();
            tokio::spawn(async move { shared.insert_at(1, format!("new-{n}"), Direction::Forward).await })
        })
        .collect();

    let mut won = 0;
    let mut no_space = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => won += 1,
            Err(SlotError::NoSpace { .. }) => no_space += 1,
            Err(other) => panic!("unexpected error: {other}"),
        }
    }
    assert_eq!(won, 5);
    assert_eq!(no_space, 3);

    let row = shared.snapshot().await;
    assert_eq!(row.occupied_count(), 10);

    let mut cards: Vec<&str> = row.cards().map(String::as_str).collect();
    cards.sort_unstable();
    cards.dedup();
    assert_eq!(cards.len(), 10);

    // Seeds are pushed toward the end in their original order.
    let tail: Vec<&str> = (6..=10).filter_map(|i| row.get(i)).map(String::as_str).collect();
    assert_eq!(tail, vec!["seed-1", "seed-2", "seed-3", "seed-4", "seed-5"]);
}

#[tokio::test]
async fn move_through_handle_keeps_card_on_failure() {
    let shared = SharedRow::new(half_full_row());

    let shift = shared.move_card(5, 1, Direction::Forward).await.unwrap();
    assert_eq!(shift.empty_slot, Some(6));
    assert_eq!(shared.read(|row| row.get(1).cloned()).await.as_deref(), Some("seed-5"));
    assert!(shared.read(|row| row.is_vacant(5)).await);

    let before = shared.snapshot().await;
    let err = shared.move_card(1, 2, Direction::Backward).await.unwrap_err();
    assert_eq!(err, SlotError::NoSpace { target: 2, direction: Direction::Backward });
    assert_eq!(shared.snapshot().await, before);
}
