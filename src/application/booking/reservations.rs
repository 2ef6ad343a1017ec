//! Reservation writer and read side
//!
//! The store's unique index on active (table, date, start) is what decides
//! a race. The lookup before the insert only gives the loser a fast answer.

use std::sync::Arc;

use chrono::{NaiveDate, NaiveTime};
use tracing::{info, warn};

use crate::application::events::{Event, ReservationCreatedEvent, SharedEventBus};
use crate::application::notifications::{NotificationDispatcher, ReservationNotification};
use crate::domain::{
    CustomerDetails, DiningTable, DomainError, DomainResult, RepositoryProvider, Reservation,
    Venue,
};

/// Message shown to whoever lost a race for a slot
pub const SLOT_TAKEN_MESSAGE: &str =
    "This time slot has just been booked. Please select another slot.";

#[derive(Debug, Clone)]
pub struct NewReservation {
    pub venue_id: String,
    pub table_id: String,
    pub date: NaiveDate,
    pub start_time: NaiveTime,
    pub guest_count: u32,
    pub customer: CustomerDetails,
}

#[derive(Clone)]
pub struct ReservationService {
    repos: Arc<dyn RepositoryProvider>,
    events: SharedEventBus,
    notifier: NotificationDispatcher,
}

impl ReservationService {
    pub fn new(
        repos: Arc<dyn RepositoryProvider>,
        events: SharedEventBus,
        notifier: NotificationDispatcher,
    ) -> Self {
        Self {
            repos,
            events,
            notifier,
        }
    }

    /// Book a slot for `user_id` and send the confirmations.
    ///
    /// Errors: `Validation` for bad input, `NotFound` for an unknown venue or
    /// table, `Conflict` when the slot is already held, `Store` otherwise.
    /// Notification problems never fail the booking.
    pub async fn create_reservation(
        &self,
        user_id: &str,
        request: NewReservation,
    ) -> DomainResult<Reservation> {
        let customer = normalize(request.customer);
        let missing = customer.missing_fields();
        if !missing.is_empty() {
            return Err(DomainError::Validation(format!(
                "missing required fields: {}",
                missing.join(", ")
            )));
        }

        let (venue, table) = self.load_slot_owner(&request.venue_id, &request.table_id).await?;

        if !table.seats(request.guest_count) {
            return Err(DomainError::Validation(format!(
                "guest_count must be between 1 and {} for table {}",
                table.capacity, table.table_number
            )));
        }
        if !venue.offers_slot(request.start_time) {
            return Err(DomainError::Validation(format!(
                "{} is not a bookable slot at {}",
                request.start_time.format("%H:%M"),
                venue.name
            )));
        }

        if self
            .repos
            .reservations()
            .find_active_for_slot(&table.id, request.date, request.start_time)
            .await?
            .is_some()
        {
            metrics::counter!("reservation_conflicts_total", "stage" => "precheck").increment(1);
            return Err(DomainError::Conflict(SLOT_TAKEN_MESSAGE.into()));
        }

        let reservation = Reservation::confirmed(
            user_id,
            &venue.id,
            &table.id,
            request.date,
            request.start_time,
            venue.end_time_for(request.start_time),
            request.guest_count,
            customer,
        );

        let reservation = match self.repos.reservations().insert(reservation).await {
            Ok(r) => r,
            Err(DomainError::Conflict(_)) => {
                metrics::counter!("reservation_conflicts_total", "stage" => "insert").increment(1);
                return Err(DomainError::Conflict(SLOT_TAKEN_MESSAGE.into()));
            }
            Err(e) => return Err(e),
        };

        metrics::counter!("reservations_created_total").increment(1);
        info!(
            reservation_id = %reservation.id,
            table = %table.table_number,
            date = %reservation.reservation_date,
            time = %reservation.start_time.format("%H:%M"),
            "🍽️ Reservation confirmed"
        );

        self.events.publish(Event::ReservationCreated(ReservationCreatedEvent {
            reservation_id: reservation.id.clone(),
            venue_id: reservation.venue_id.clone(),
            table_id: reservation.table_id.clone(),
            date: reservation.reservation_date,
            start_time: reservation.start_time,
        }));

        let notification = ReservationNotification::new(&venue, &table, &reservation);
        let reports = self.notifier.dispatch(&notification).await;
        if reports.iter().any(|r| !r.outcome.is_sent()) {
            warn!(reservation_id = %reservation.id, "Not every confirmation was delivered");
        }

        Ok(reservation)
    }

    pub async fn get(&self, id: &str) -> DomainResult<Reservation> {
        self.repos
            .reservations()
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Reservation", "id", id))
    }

    pub async fn list_for_user(&self, user_id: &str) -> DomainResult<Vec<Reservation>> {
        self.repos.reservations().find_for_user(user_id).await
    }

    pub async fn list_active_for_venue_on(
        &self,
        venue_id: &str,
        date: NaiveDate,
    ) -> DomainResult<Vec<Reservation>> {
        self.repos
            .reservations()
            .find_active_for_venue_on(venue_id, date)
            .await
    }

    async fn load_slot_owner(
        &self,
        venue_id: &str,
        table_id: &str,
    ) -> DomainResult<(Venue, DiningTable)> {
        let venue = self
            .repos
            .venues()
            .find_by_id(venue_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Venue", "id", venue_id))?;

        let table = self
            .repos
            .tables()
            .find_by_id(table_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Table", "id", table_id))?;

        if table.venue_id != venue.id {
            return Err(DomainError::Validation(format!(
                "table {} does not belong to venue {}",
                table.table_number, venue.name
            )));
        }
        if !table.is_active {
            return Err(DomainError::Validation(format!(
                "table {} is not accepting reservations",
                table.table_number
            )));
        }

        Ok((venue, table))
    }
}

fn normalize(c: CustomerDetails) -> CustomerDetails {
    let optional = |v: Option<String>| v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty());
    CustomerDetails {
        name: c.name.trim().to_string(),
        email: c.email.trim().to_string(),
        phone: c.phone.trim().to_string(),
        member_number: optional(c.member_number),
        notes: optional(c.notes),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::events::create_event_bus;
    use crate::application::notifications::{Channel, DeliveryOutcome, NotificationSender};
    use crate::domain::ReservationStatus;
    use crate::infrastructure::memory::InMemoryRepositoryProvider;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Counting {
        calls: Arc<AtomicUsize>,
        outcome: DeliveryOutcome,
    }

    #[async_trait]
    impl NotificationSender for Counting {
        fn channel(&self) -> Channel {
            Channel::Email
        }

        async fn send(&self, _: &ReservationNotification) -> DeliveryOutcome {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.outcome.clone()
        }
    }

    struct Fixture {
        service: ReservationService,
        repos: Arc<InMemoryRepositoryProvider>,
        venue: Venue,
        table: DiningTable,
        sends: Arc<AtomicUsize>,
    }

    fn t(s: &str) -> NaiveTime {
        NaiveTime::parse_from_str(s, "%H:%M").unwrap()
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 11, 2).unwrap()
    }

    async fn fixture(outcome: DeliveryOutcome) -> Fixture {
        let repos = Arc::new(InMemoryRepositoryProvider::new());
        let venue = Venue::new("Harbour Club", "1 Quay St", t("17:00"), t("22:00"), 90).unwrap();
        let table = DiningTable::new(&venue.id, "7", 4).unwrap();
        repos.venues().save(venue.clone()).await.unwrap();
        repos.tables().save(table.clone()).await.unwrap();

        let sends = Arc::new(AtomicUsize::new(0));
        let notifier = NotificationDispatcher::new(vec![Arc::new(Counting {
            calls: sends.clone(),
            outcome,
        })]);

        Fixture {
            service: ReservationService::new(repos.clone(), create_event_bus(), notifier),
            repos,
            venue,
            table,
            sends,
        }
    }

    fn request(f: &Fixture, start: &str) -> NewReservation {
        NewReservation {
            venue_id: f.venue.id.clone(),
            table_id: f.table.id.clone(),
            date: date(),
            start_time: t(start),
            guest_count: 2,
            customer: CustomerDetails {
                name: " Ada ".into(),
                email: "ada@example.com".into(),
                phone: "+15550100".into(),
                member_number: Some("  ".into()),
                notes: None,
            },
        }
    }

    #[tokio::test]
    async fn books_free_slot_with_end_time_from_venue_duration() {
        let f = fixture(DeliveryOutcome::Sent { message_id: None }).await;

        let r = f.service.create_reservation("u1", request(&f, "18:30")).await.unwrap();
        assert_eq!(r.status, ReservationStatus::Confirmed);
        assert_eq!(r.end_time, t("20:00"));
        assert_eq!(r.customer.name, "Ada");
        assert_eq!(r.customer.member_number, None);

        let listed = f.service.list_active_for_venue_on(&f.venue.id, date()).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].start_time, t("18:30"));
        assert_eq!(f.sends.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn second_booking_of_same_slot_conflicts_without_second_row() {
        let f = fixture(DeliveryOutcome::Sent { message_id: None }).await;

        f.service.create_reservation("u1", request(&f, "18:30")).await.unwrap();
        let err = f
            .service
            .create_reservation("u2", request(&f, "18:30"))
            .await
            .unwrap_err();

        assert!(matches!(err, DomainError::Conflict(ref m) if m == SLOT_TAKEN_MESSAGE));
        assert_eq!(
            f.service.list_active_for_venue_on(&f.venue.id, date()).await.unwrap().len(),
            1
        );
        assert_eq!(f.sends.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn concurrent_bookings_yield_exactly_one_winner() {
        let f = fixture(DeliveryOutcome::Sent { message_id: None }).await;

        let attempts = (0..8).map(|i| {
            let service = f.service.clone();
            let req = request(&f, "20:00");
            tokio::spawn(async move { service.create_reservation(&format!("u{i}"), req).await })
        });
        let results = futures_util::future::join_all(attempts).await;

        let wins = results.iter().filter(|r| matches!(r, Ok(Ok(_)))).count();
        let conflicts = results
            .iter()
            .filter(|r| matches!(r, Ok(Err(DomainError::Conflict(_)))))
            .count();
        assert_eq!(wins, 1);
        assert_eq!(conflicts, 7);
    }

    #[tokio::test]
    async fn notification_failure_does_not_fail_booking() {
        let f = fixture(DeliveryOutcome::Failed("smtp down".into())).await;
        assert!(f.service.create_reservation("u1", request(&f, "17:00")).await.is_ok());
        assert_eq!(f.sends.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn rejects_missing_contact_details() {
        let f = fixture(DeliveryOutcome::Sent { message_id: None }).await;
        let mut req = request(&f, "17:00");
        req.customer.email = "   ".into();
        req.customer.phone = String::new();

        let err = f.service.create_reservation("u1", req).await.unwrap_err();
        assert!(
            matches!(err, DomainError::Validation(ref m) if m.contains("customer_email") && m.contains("customer_phone"))
        );
        assert_eq!(f.sends.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn rejects_off_grid_time_and_oversized_party() {
        let f = fixture(DeliveryOutcome::Sent { message_id: None }).await;

        let off_grid = f.service.create_reservation("u1", request(&f, "18:00")).await;
        assert!(matches!(off_grid, Err(DomainError::Validation(_))));

        let mut big = request(&f, "17:00");
        big.guest_count = 5;
        assert!(matches!(
            f.service.create_reservation("u1", big).await,
            Err(DomainError::Validation(_))
        ));

        let mut none = request(&f, "17:00");
        none.guest_count = 0;
        assert!(matches!(
            f.service.create_reservation("u1", none).await,
            Err(DomainError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn rejects_table_of_another_venue_or_inactive() {
        let f = fixture(DeliveryOutcome::Sent { message_id: None }).await;

        let other = Venue::new("Elsewhere", "2 Quay St", t("17:00"), t("22:00"), 90).unwrap();
        f.repos.venues().save(other.clone()).await.unwrap();
        let mut req = request(&f, "17:00");
        req.venue_id = other.id.clone();
        assert!(matches!(
            f.service.create_reservation("u1", req).await,
            Err(DomainError::Validation(_))
        ));

        let mut closed = DiningTable::new(&f.venue.id, "8", 4).unwrap();
        closed.is_active = false;
        f.repos.tables().save(closed.clone()).await.unwrap();
        let mut req = request(&f, "17:00");
        req.table_id = closed.id;
        assert!(matches!(
            f.service.create_reservation("u1", req).await,
            Err(DomainError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn store_outage_surfaces_as_store_error() {
        let f = fixture(DeliveryOutcome::Sent { message_id: None }).await;
        f.repos.set_unavailable(true);

        let err = f
            .service
            .create_reservation("u1", request(&f, "17:00"))
            .await
            .unwrap_err();
        assert!(err.is_transient());
    }

    #[tokio::test]
    async fn unknown_reservation_is_not_found() {
        let f = fixture(DeliveryOutcome::Sent { message_id: None }).await;
        assert!(matches!(
            f.service.get("nope").await,
            Err(DomainError::NotFound { .. })
        ));
    }
}
