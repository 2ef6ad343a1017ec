//! Booking, presence and the slot board wired together over SQLite.

mod common;

use std::sync::Arc;

use futures_util::future::join_all;

use common::{booking_date, customer, hm, seeded};
use tablerez::application::booking::{NewReservation, SlotState, SLOT_TAKEN_MESSAGE};
use tablerez::application::{EndViewing, NotificationDispatcher};
use tablerez::config::AppConfig;
use tablerez::domain::{CapacityFilter, DomainError, SlotKey};
use tablerez::server::AppContext;
use tablerez::shared::system_clock;

fn context(f: &common::Fixture) -> AppContext {
    AppContext::new(
        f.repos.clone(),
        system_clock(),
        NotificationDispatcher::disabled(),
        &AppConfig::default(),
    )
}

fn request(f: &common::Fixture, name: &str) -> NewReservation {
    NewReservation {
        venue_id: f.venue.id.clone(),
        table_id: f.table.id.clone(),
        date: booking_date(),
        start_time: hm(19, 0),
        guest_count: 3,
        customer: customer(name),
    }
}

#[tokio::test]
async fn concurrent_bookings_of_one_slot_have_a_single_winner() {
    let f = seeded().await;
    let ctx = context(&f);
    let users = Arc::new([f.alice.id.clone(), f.bob.id.clone()]);

    let attempts = (0..8).map(|i| {
        let service = ctx.api.reservations.clone();
        let user = users[i % 2].clone();
        let req = request(&f, &format!("guest{i}"));
        tokio::spawn(async move { service.create_reservation(&user, req).await })
    });
    let results: Vec<_> = join_all(attempts)
        .await
        .into_iter()
        .map(|r| r.unwrap())
        .collect();

    let winners = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(winners, 1);
    for err in results.into_iter().filter_map(Result::err) {
        match err {
            DomainError::Conflict(msg) => assert_eq!(msg, SLOT_TAKEN_MESSAGE),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    let held = f
        .repos
        .reservations()
        .find_active_for_venue_on(&f.venue.id, booking_date())
        .await
        .unwrap();
    assert_eq!(held.len(), 1);
}

#[tokio::test]
async fn board_shows_bookings_and_other_viewers() {
    let f = seeded().await;
    let ctx = context(&f);

    let booked = ctx
        .api
        .reservations
        .create_reservation(&f.alice.id, request(&f, "Alice"))
        .await
        .unwrap();

    let viewed = SlotKey::new(&f.venue.id, &f.table.id, booking_date(), hm(20, 0));
    assert!(ctx
        .api
        .presence
        .begin_viewing(&f.bob.id, &viewed, None)
        .await
        .is_some());

    let board = ctx
        .api
        .availability
        .board(&f.venue.id, booking_date(), CapacityFilter::All, Some(&f.alice.id))
        .await
        .unwrap();

    assert_eq!(board.slot_times.len(), 5);
    // Natural order puts table "2" before table "4"
    assert_eq!(board.tables[0].table.id, f.small_table.id);
    let row = &board.tables[1];
    assert_eq!(row.table.id, f.table.id);

    let state_at = |h| {
        row.slots
            .iter()
            .find(|c| c.time == hm(h, 0))
            .map(|c| c.state.clone())
            .unwrap()
    };
    assert_eq!(
        state_at(19),
        SlotState::Booked {
            reservation_id: booked.id.clone(),
            guest_count: 3
        }
    );
    assert_eq!(state_at(20), SlotState::InProgress { viewers: 1 });
    assert_eq!(state_at(21), SlotState::Available);

    // Bob does not see his own presence
    let bobs_board = ctx
        .api
        .availability
        .board(&f.venue.id, booking_date(), CapacityFilter::Four, Some(&f.bob.id))
        .await
        .unwrap();
    assert_eq!(bobs_board.tables.len(), 1);
    assert!(bobs_board.tables[0]
        .slots
        .iter()
        .all(|c| !matches!(c.state, SlotState::InProgress { .. })));
}

#[tokio::test]
async fn ending_a_viewing_clears_it_for_others() {
    let f = seeded().await;
    let ctx = context(&f);
    let slot = SlotKey::new(&f.venue.id, &f.table.id, booking_date(), hm(18, 0));

    let id = ctx
        .api
        .presence
        .begin_viewing(&f.bob.id, &slot, None)
        .await
        .unwrap();
    assert_eq!(
        ctx.api
            .presence
            .list_viewers(&slot, Some(&f.alice.id))
            .await
            .len(),
        1
    );

    assert_eq!(
        ctx.api.presence.end_viewing(&id, Some(&f.alice.id)).await,
        EndViewing::NotOwner
    );
    assert_eq!(
        ctx.api.presence.end_viewing(&id, Some(&f.bob.id)).await,
        EndViewing::Removed
    );
    assert!(ctx
        .api
        .presence
        .list_viewers(&slot, Some(&f.alice.id))
        .await
        .is_empty());
}

#[tokio::test]
async fn guest_count_must_fit_the_table() {
    let f = seeded().await;
    let ctx = context(&f);

    let mut req = request(&f, "Alice");
    req.table_id = f.small_table.id.clone();
    req.guest_count = 3;

    let err = ctx
        .api
        .reservations
        .create_reservation(&f.alice.id, req)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Validation(_)));
}
