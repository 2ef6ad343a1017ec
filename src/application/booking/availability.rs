//! Slot board: which table/slot cells are free, booked, or being booked

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chrono::{NaiveDate, NaiveTime};

use crate::domain::{
    CapacityFilter, DiningTable, DomainError, DomainResult, RepositoryProvider, Venue,
};
use crate::shared::SharedClock;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotState {
    Available,
    Booked {
        reservation_id: String,
        guest_count: u32,
    },
    /// Someone else has the booking form open
    InProgress { viewers: usize },
}

#[derive(Debug, Clone, PartialEq)]
pub struct SlotCell {
    pub time: NaiveTime,
    pub state: SlotState,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableRow {
    pub table: DiningTable,
    pub slots: Vec<SlotCell>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Board {
    pub venue: Venue,
    pub date: NaiveDate,
    pub slot_times: Vec<NaiveTime>,
    pub tables: Vec<TableRow>,
}

#[derive(Clone)]
pub struct AvailabilityService {
    repos: Arc<dyn RepositoryProvider>,
    clock: SharedClock,
}

impl AvailabilityService {
    pub fn new(repos: Arc<dyn RepositoryProvider>, clock: SharedClock) -> Self {
        Self { repos, clock }
    }

    /// Active tables of a venue matching `filter`, ordered by table number.
    pub async fn tables(
        &self,
        venue_id: &str,
        filter: CapacityFilter,
    ) -> DomainResult<Vec<DiningTable>> {
        let mut tables = self.repos.tables().find_active_for_venue(venue_id).await?;
        tables.retain(|t| filter.matches(t));
        tables.sort_by(|a, b| table_order(&a.table_number, &b.table_number));
        Ok(tables)
    }

    /// Build the board for one venue and date.
    ///
    /// A booked cell wins over an in-progress one. Presence lookups fail
    /// open: if they error the board simply shows no viewers.
    pub async fn board(
        &self,
        venue_id: &str,
        date: NaiveDate,
        filter: CapacityFilter,
        viewer: Option<&str>,
    ) -> DomainResult<Board> {
        let venue = self
            .repos
            .venues()
            .find_by_id(venue_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Venue", "id", venue_id))?;

        let tables = self.tables(venue_id, filter).await?;
        let slot_times = venue.slots();

        let booked: HashMap<(String, NaiveTime), (String, u32)> = self
            .repos
            .reservations()
            .find_active_for_venue_on(venue_id, date)
            .await?
            .into_iter()
            .map(|r| ((r.table_id, r.start_time), (r.id, r.guest_count)))
            .collect();

        let now = self.clock.now();
        let presence = self
            .repos
            .presence()
            .find_live_for_venue_on(venue_id, date, now)
            .await
            .unwrap_or_else(|e| {
                tracing::warn!(venue_id, error = %e, "Presence lookup failed, board shows none");
                Vec::new()
            });

        // Distinct users per cell, never counting the caller
        let mut viewing: HashMap<(String, NaiveTime), HashSet<String>> = HashMap::new();
        for p in presence {
            if Some(p.user_id.as_str()) == viewer {
                continue;
            }
            viewing
                .entry((p.slot.table_id, p.slot.time))
                .or_default()
                .insert(p.user_id);
        }

        let tables = tables
            .into_iter()
            .map(|table| {
                let slots = slot_times
                    .iter()
                    .map(|&time| {
                        let key = (table.id.clone(), time);
                        let state = if let Some((id, guests)) = booked.get(&key) {
                            SlotState::Booked {
                                reservation_id: id.clone(),
                                guest_count: *guests,
                            }
                        } else if let Some(users) = viewing.get(&key) {
                            SlotState::InProgress {
                                viewers: users.len(),
                            }
                        } else {
                            SlotState::Available
                        };
                        SlotCell { time, state }
                    })
                    .collect();
                TableRow { table, slots }
            })
            .collect();

        Ok(Board {
            venue,
            date,
            slot_times,
            tables,
        })
    }
}

/// Numeric labels sort numerically ("2" before "10"), others lexically after.
fn table_order(a: &str, b: &str) -> std::cmp::Ordering {
    match (a.parse::<u32>(), b.parse::<u32>()) {
        (Ok(x), Ok(y)) => x.cmp(&y),
        (Ok(_), Err(_)) => std::cmp::Ordering::Less,
        (Err(_), Ok(_)) => std::cmp::Ordering::Greater,
        (Err(_), Err(_)) => a.cmp(b),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CustomerDetails, Reservation, SlotKey};
    use crate::infrastructure::memory::InMemoryRepositoryProvider;
    use crate::shared::{Clock, ManualClock};
    use chrono::{Duration, Utc};

    fn t(s: &str) -> NaiveTime {
        NaiveTime::parse_from_str(s, "%H:%M").unwrap()
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 11, 2).unwrap()
    }

    #[test]
    fn table_numbers_sort_naturally() {
        let mut labels = vec!["10", "Patio", "2", "1", "A4"];
        labels.sort_by(|a, b| table_order(a, b));
        assert_eq!(labels, vec!["1", "2", "10", "A4", "Patio"]);
    }

    #[tokio::test]
    async fn board_marks_booked_and_in_progress_cells() {
        let repos = Arc::new(InMemoryRepositoryProvider::new());
        let clock = ManualClock::new(Utc::now());
        let service = AvailabilityService::new(repos.clone(), Arc::new(clock.clone()));

        let venue = Venue::new("Harbour Club", "1 Quay St", t("18:00"), t("20:00"), 60).unwrap();
        repos.venues().save(venue.clone()).await.unwrap();
        let two = DiningTable::new(&venue.id, "10", 2).unwrap();
        let six = DiningTable::new(&venue.id, "2", 6).unwrap();
        let mut hidden = DiningTable::new(&venue.id, "3", 4).unwrap();
        hidden.is_active = false;
        for table in [&two, &six, &hidden] {
            repos.tables().save(table.clone()).await.unwrap();
        }

        let booked = Reservation::confirmed(
            "u1",
            &venue.id,
            &two.id,
            date(),
            t("18:00"),
            t("19:00"),
            2,
            CustomerDetails {
                name: "Ada".into(),
                email: "ada@example.com".into(),
                phone: "1".into(),
                member_number: None,
                notes: None,
            },
        );
        repos.reservations().insert(booked.clone()).await.unwrap();

        let now = clock.now();
        let slot = SlotKey::new(&venue.id, &six.id, date(), t("19:00"));
        repos
            .presence()
            .upsert("u2", &slot, now, now + Duration::seconds(120))
            .await
            .unwrap();
        repos
            .presence()
            .upsert("me", &slot, now, now + Duration::seconds(120))
            .await
            .unwrap();

        let board = service
            .board(&venue.id, date(), CapacityFilter::All, Some("me"))
            .await
            .unwrap();

        assert_eq!(board.slot_times, vec![t("18:00"), t("19:00")]);
        let labels: Vec<_> = board.tables.iter().map(|r| r.table.table_number.as_str()).collect();
        assert_eq!(labels, vec!["2", "10"]);

        let six_row = &board.tables[0];
        assert_eq!(six_row.slots[0].state, SlotState::Available);
        assert_eq!(six_row.slots[1].state, SlotState::InProgress { viewers: 1 });

        let two_row = &board.tables[1];
        assert_eq!(
            two_row.slots[0].state,
            SlotState::Booked {
                reservation_id: booked.id.clone(),
                guest_count: 2
            }
        );

        // Expired presence drops out without any delete
        clock.advance(Duration::seconds(121));
        let board = service
            .board(&venue.id, date(), CapacityFilter::SixPlus, Some("me"))
            .await
            .unwrap();
        assert_eq!(board.tables.len(), 1);
        assert_eq!(board.tables[0].slots[1].state, SlotState::Available);
    }

    #[tokio::test]
    async fn unknown_venue_is_not_found() {
        let repos = Arc::new(InMemoryRepositoryProvider::new());
        let service = AvailabilityService::new(repos, crate::shared::system_clock());
        let err = service
            .board("nope", date(), CapacityFilter::All, None)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound { .. }));
    }
}
