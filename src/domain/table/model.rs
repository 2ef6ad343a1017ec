//! Dining table entity and capacity filtering

use std::str::FromStr;

use chrono::{DateTime, Utc};

use crate::shared::{DomainError, DomainResult};

#[derive(Debug, Clone, PartialEq)]
pub struct DiningTable {
    pub id: String,
    pub venue_id: String,
    /// Human facing label ("1", "A4", "Patio 2")
    pub table_number: String,
    pub capacity: u32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl DiningTable {
    pub fn new(
        venue_id: impl Into<String>,
        table_number: impl Into<String>,
        capacity: u32,
    ) -> DomainResult<Self> {
        if capacity == 0 {
            return Err(DomainError::Validation("capacity must be positive".into()));
        }
        Ok(Self {
            id: uuid::Uuid::new_v4().to_string(),
            venue_id: venue_id.into(),
            table_number: table_number.into(),
            capacity,
            is_active: true,
            created_at: Utc::now(),
        })
    }

    pub fn seats(&self, guest_count: u32) -> bool {
        (1..=self.capacity).contains(&guest_count)
    }
}

/// Party-size filter offered when browsing tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CapacityFilter {
    #[default]
    All,
    Two,
    Four,
    SixPlus,
}

impl CapacityFilter {
    pub fn matches(&self, table: &DiningTable) -> bool {
        match self {
            Self::All => true,
            Self::Two => table.capacity == 2,
            Self::Four => table.capacity == 4,
            Self::SixPlus => table.capacity >= 6,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Two => "2",
            Self::Four => "4",
            Self::SixPlus => "6+",
        }
    }
}

impl FromStr for CapacityFilter {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "" | "all" => Ok(Self::All),
            "2" => Ok(Self::Two),
            "4" => Ok(Self::Four),
            "6+" | "6" => Ok(Self::SixPlus),
            other => Err(DomainError::Validation(format!(
                "unknown capacity filter '{}', expected all, 2, 4 or 6+",
                other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(capacity: u32) -> DiningTable {
        DiningTable::new("v1", "T", capacity).unwrap()
    }

    #[test]
    fn zero_capacity_is_rejected() {
        assert!(DiningTable::new("v1", "T", 0).is_err());
    }

    #[test]
    fn seats_between_one_and_capacity() {
        let t = table(4);
        assert!(!t.seats(0));
        assert!(t.seats(1));
        assert!(t.seats(4));
        assert!(!t.seats(5));
    }

    #[test]
    fn capacity_filter_buckets() {
        let tables: Vec<_> = [2, 3, 4, 6, 8].into_iter().map(table).collect();
        let count = |f: CapacityFilter| tables.iter().filter(|t| f.matches(t)).count();

        assert_eq!(count(CapacityFilter::All), 5);
        assert_eq!(count(CapacityFilter::Two), 1);
        assert_eq!(count(CapacityFilter::Four), 1);
        assert_eq!(count(CapacityFilter::SixPlus), 2);
    }

    #[test]
    fn capacity_filter_parses_query_values() {
        assert_eq!("6+".parse::<CapacityFilter>().unwrap(), CapacityFilter::SixPlus);
        assert_eq!("".parse::<CapacityFilter>().unwrap(), CapacityFilter::All);
        assert!("3".parse::<CapacityFilter>().is_err());
    }
}
