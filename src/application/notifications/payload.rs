//! Denormalized confirmation payload and its renderings

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::slot::format_slot;
use crate::domain::{DiningTable, Reservation, Venue};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReservationNotification {
    pub venue_name: String,
    pub venue_address: String,
    pub date: NaiveDate,
    /// `HH:MM`
    pub time: String,
    pub table_number: String,
    pub guest_count: u32,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
}

impl ReservationNotification {
    pub fn new(venue: &Venue, table: &DiningTable, reservation: &Reservation) -> Self {
        Self {
            venue_name: venue.name.clone(),
            venue_address: venue.address.clone(),
            date: reservation.reservation_date,
            time: format_slot(reservation.start_time),
            table_number: table.table_number.clone(),
            guest_count: reservation.guest_count,
            customer_name: reservation.customer.name.clone(),
            customer_email: reservation.customer.email.clone(),
            customer_phone: reservation.customer.phone.clone(),
        }
    }

    /// "Monday, November 2, 2026"
    pub fn long_date(&self) -> String {
        self.date.format("%A, %B %-d, %Y").to_string()
    }

    pub fn email_subject(&self) -> String {
        format!("Reservation Confirmed - {}", self.venue_name)
    }

    pub fn email_html(&self) -> String {
        let row = |label: &str, value: &str| {
            format!(
                "<tr><td style=\"font-weight:bold;color:#64748b;padding:8px 16px 8px 0\">{label}:</td>\
                 <td style=\"color:#1e293b\">{value}</td></tr>"
            )
        };

        let rows = [
            row("Restaurant", &escape_html(&self.venue_name)),
            row("Date", &self.long_date()),
            row("Time", &self.time),
            row("Table", &escape_html(&self.table_number)),
            row("Guests", &self.guest_count.to_string()),
            row("Address", &escape_html(&self.venue_address)),
        ]
        .concat();

        format!(
            "<!DOCTYPE html><html><body style=\"font-family:Arial,sans-serif;color:#333\">\
             <h1>Reservation Confirmed!</h1>\
             <p>Hi {name},</p>\
             <p>Your reservation has been confirmed. We're looking forward to serving you!</p>\
             <h2>Reservation Details</h2><table>{rows}</table>\
             <p>If you need to make any changes or cancel your reservation, please contact us directly.</p>\
             <p>See you soon!</p>\
             <p style=\"color:#64748b;font-size:14px\">This is an automated message. Please do not reply to this email.</p>\
             </body></html>",
            name = escape_html(&self.customer_name),
        )
    }

    pub fn sms_body(&self) -> String {
        format!(
            "Reservation Confirmed!\n\nHi {},\n\nYour reservation at {} is confirmed.\n\n\
             Details:\nDate: {}\nTime: {}\nTable: {}\nGuests: {}\n\nAddress: {}\n\nSee you soon!",
            self.customer_name,
            self.venue_name,
            self.date,
            self.time,
            self.table_number,
            self.guest_count,
            self.venue_address,
        )
    }
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
pub(crate) fn sample() -> ReservationNotification {
    ReservationNotification {
        venue_name: "Harbour Club".into(),
        venue_address: "1 Quay St".into(),
        date: NaiveDate::from_ymd_opt(2026, 11, 2).unwrap(),
        time: "18:00".into(),
        table_number: "7".into(),
        guest_count: 4,
        customer_name: "Ada <Lovelace>".into(),
        customer_email: "ada@example.com".into(),
        customer_phone: "+15550100".into(),
    }
}
