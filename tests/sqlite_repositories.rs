//! Repository behaviour against a migrated in-memory SQLite database.

mod common;

use chrono::{Duration, TimeZone, Utc};

use common::{booking_date, customer, hm, seeded};
use tablerez::domain::{
    DomainError, Member, Reservation, ReservationStatus, SlotKey, User, UserRole,
};

fn reservation_for(f: &common::Fixture, user: &User, start: chrono::NaiveTime) -> Reservation {
    Reservation::confirmed(
        &user.id,
        &f.venue.id,
        &f.table.id,
        booking_date(),
        start,
        f.venue.end_time_for(start),
        2,
        customer(&user.username),
    )
}

#[tokio::test]
async fn second_active_reservation_for_a_slot_is_a_conflict() {
    let f = seeded().await;

    f.repos
        .reservations()
        .insert(reservation_for(&f, &f.alice, hm(19, 0)))
        .await
        .unwrap();

    let err = f
        .repos
        .reservations()
        .insert(reservation_for(&f, &f.bob, hm(19, 0)))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Conflict(_)), "got {err:?}");

    // A different start time on the same table is fine
    f.repos
        .reservations()
        .insert(reservation_for(&f, &f.bob, hm(20, 0)))
        .await
        .unwrap();
}

#[tokio::test]
async fn cancelled_reservations_do_not_hold_the_slot() {
    let f = seeded().await;

    let mut cancelled = reservation_for(&f, &f.alice, hm(18, 0));
    cancelled.status = ReservationStatus::Cancelled;
    f.repos.reservations().insert(cancelled).await.unwrap();

    assert!(f
        .repos
        .reservations()
        .find_active_for_slot(&f.table.id, booking_date(), hm(18, 0))
        .await
        .unwrap()
        .is_none());

    let booked = f
        .repos
        .reservations()
        .insert(reservation_for(&f, &f.bob, hm(18, 0)))
        .await
        .unwrap();
    let held = f
        .repos
        .reservations()
        .find_active_for_slot(&f.table.id, booking_date(), hm(18, 0))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(held.id, booked.id);
    assert_eq!(held.end_time, hm(19, 0));
    assert_eq!(held.customer.name, "bob");
}

#[tokio::test]
async fn reservations_are_listed_per_user_and_per_venue_day() {
    let f = seeded().await;
    let reservations = f.repos.reservations();

    reservations
        .insert(reservation_for(&f, &f.alice, hm(17, 0)))
        .await
        .unwrap();
    reservations
        .insert(reservation_for(&f, &f.alice, hm(21, 0)))
        .await
        .unwrap();
    reservations
        .insert(reservation_for(&f, &f.bob, hm(19, 0)))
        .await
        .unwrap();

    assert_eq!(reservations.find_for_user(&f.alice.id).await.unwrap().len(), 2);
    assert_eq!(
        reservations
            .find_active_for_venue_on(&f.venue.id, booking_date())
            .await
            .unwrap()
            .len(),
        3
    );
    assert!(reservations
        .find_active_for_venue_on(&f.venue.id, booking_date().succ_opt().unwrap())
        .await
        .unwrap()
        .is_empty());
}

fn slot(f: &common::Fixture) -> SlotKey {
    SlotKey::new(&f.venue.id, &f.table.id, booking_date(), hm(19, 0))
}

#[tokio::test]
async fn presence_upsert_keeps_one_row_per_user_and_slot() {
    let f = seeded().await;
    let presence = f.repos.presence();
    let t0 = Utc.with_ymd_and_hms(2026, 11, 20, 18, 0, 0).unwrap();

    let first = presence
        .upsert(&f.alice.id, &slot(&f), t0, t0 + Duration::seconds(120))
        .await
        .unwrap();
    let later = t0 + Duration::seconds(30);
    let second = presence
        .upsert(&f.alice.id, &slot(&f), later, later + Duration::seconds(120))
        .await
        .unwrap();

    assert_eq!(first.id, second.id);
    assert_eq!(second.expires_at, later + Duration::seconds(120));

    let other = presence
        .upsert(&f.bob.id, &slot(&f), later, later + Duration::seconds(120))
        .await
        .unwrap();
    assert_ne!(other.id, first.id);

    let live = presence.find_live_for_slot(&slot(&f), later, None).await.unwrap();
    assert_eq!(live.len(), 2);
    let others = presence
        .find_live_for_slot(&slot(&f), later, Some(&f.alice.id))
        .await
        .unwrap();
    assert_eq!(others.len(), 1);
    assert_eq!(others[0].user_id, f.bob.id);
}

#[tokio::test]
async fn expired_presence_is_invisible_and_swept() {
    let f = seeded().await;
    let presence = f.repos.presence();
    let t0 = Utc.with_ymd_and_hms(2026, 11, 20, 18, 0, 0).unwrap();

    presence
        .upsert(&f.alice.id, &slot(&f), t0, t0 + Duration::seconds(120))
        .await
        .unwrap();

    let after_expiry = t0 + Duration::seconds(121);
    assert!(presence
        .find_live_for_slot(&slot(&f), after_expiry, None)
        .await
        .unwrap()
        .is_empty());
    assert!(presence
        .find_live_for_venue_on(&f.venue.id, booking_date(), after_expiry)
        .await
        .unwrap()
        .is_empty());

    assert_eq!(presence.delete_expired(after_expiry).await.unwrap(), 1);
    assert_eq!(presence.delete_expired(after_expiry).await.unwrap(), 0);
}

#[tokio::test]
async fn touch_reports_missing_rows() {
    let f = seeded().await;
    let presence = f.repos.presence();
    let key = slot(&f);
    let t0 = Utc.with_ymd_and_hms(2026, 11, 20, 18, 0, 0).unwrap();

    let row = presence
        .upsert(&f.alice.id, &key, t0, t0 + Duration::seconds(120))
        .await
        .unwrap();
    let t1 = t0 + Duration::seconds(30);
    let later = t1 + Duration::seconds(120);
    assert!(presence.touch(&row.id, &f.alice.id, &key, t1, later).await.unwrap());

    assert!(presence.delete(&row.id, &f.alice.id).await.unwrap());
    assert!(!presence.touch(&row.id, &f.alice.id, &key, t1, later).await.unwrap());
}

#[tokio::test]
async fn touch_and_delete_only_match_the_owners_row_for_its_slot() {
    let f = seeded().await;
    let presence = f.repos.presence();
    let key = slot(&f);
    let elsewhere = SlotKey::new(&f.venue.id, &f.table.id, booking_date(), hm(21, 0));
    let t0 = Utc.with_ymd_and_hms(2026, 11, 20, 18, 0, 0).unwrap();
    let expires = t0 + Duration::seconds(120);

    let row = presence.upsert(&f.alice.id, &key, t0, expires).await.unwrap();
    let t1 = t0 + Duration::seconds(60);
    let extended = t1 + Duration::seconds(120);

    assert!(!presence.touch(&row.id, &f.bob.id, &key, t1, extended).await.unwrap());
    assert!(!presence.touch(&row.id, &f.alice.id, &elsewhere, t1, extended).await.unwrap());
    assert!(!presence.delete(&row.id, &f.bob.id).await.unwrap());

    let stored = presence.find_by_id(&row.id).await.unwrap().unwrap();
    assert_eq!(stored.expires_at, expires);
    assert_eq!(stored.user_id, f.alice.id);
}

#[tokio::test]
async fn usernames_and_emails_are_unique() {
    let f = seeded().await;

    let clash = User::new("alice", "someone@example.com", "x", UserRole::Guest);
    assert!(matches!(
        f.repos.users().create(clash).await,
        Err(DomainError::Conflict(_))
    ));

    let by_email = f
        .repos
        .users()
        .find_by_login("bob@example.com")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(by_email.id, f.bob.id);
    assert_eq!(f.repos.users().count().await.unwrap(), 3);
}

#[tokio::test]
async fn tables_and_members_round_trip() {
    let f = seeded().await;

    let tables = f
        .repos
        .tables()
        .find_active_for_venue(&f.venue.id)
        .await
        .unwrap();
    assert_eq!(tables.len(), 2);

    let member = Member {
        member_number: "M-1001".into(),
        name: "Ada".into(),
        email: "ada@example.com".into(),
        phone: "+15550111".into(),
    };
    f.repos.members().save(member.clone()).await.unwrap();
    assert_eq!(
        f.repos
            .members()
            .find_by_member_number("M-1001")
            .await
            .unwrap(),
        Some(member)
    );
    assert!(f
        .repos
        .members()
        .find_by_member_number("M-9999")
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn venue_times_survive_storage() {
    let f = seeded().await;
    let stored = f
        .repos
        .venues()
        .find_by_id(&f.venue.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.opening_time, hm(17, 0));
    assert_eq!(stored.closing_time, hm(22, 0));
    assert_eq!(stored.slots().len(), 5);
}

#[tokio::test]
async fn unreadable_stored_status_reads_back_as_cancelled() {
    use sea_orm::{ConnectionTrait, DbBackend, Statement};

    let f = seeded().await;
    let stored = f
        .repos
        .reservations()
        .insert(reservation_for(&f, &f.alice, hm(20, 0)))
        .await
        .unwrap();

    f.db.execute(Statement::from_sql_and_values(
        DbBackend::Sqlite,
        "UPDATE reservations SET status = 'no_show' WHERE id = ?",
        [stored.id.clone().into()],
    ))
    .await
    .unwrap();

    let read = f.repos.reservations().find_by_id(&stored.id).await.unwrap().unwrap();
    assert_eq!(read.status, ReservationStatus::Cancelled);
}
