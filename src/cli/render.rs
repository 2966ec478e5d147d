use cabin_config::Config;
use cabin_core::{available_actions, ReferenceData};
use cabin_domain::{Booking, BookingStatus, Cabin, Guest, Settings, TagColor};
use chrono::NaiveDate;
use colored::Colorize;

use crate::cli::output;

/// Locale-aware money and date formatting for shell output.
pub struct Formatter<'a> {
    config: &'a Config,
}

impl<'a> Formatter<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self { config }
    }

    pub fn money(&self, amount: f64) -> String {
        let code = self.config.currency.trim().to_uppercase();
        let (decimal, grouping) = separators(&self.config.locale);
        let body = format_number(amount.abs(), decimal, grouping);
        let sign = if amount < 0.0 { "-" } else { "" };
        match symbol_for(&code) {
            Some(symbol) => format!("{sign}{symbol}{body}"),
            None => format!("{sign}{code} {body}"),
        }
    }

    pub fn date(&self, date: NaiveDate) -> String {
        date.format("%d %b %Y").to_string()
    }
}

fn symbol_for(code: &str) -> Option<&'static str> {
    match code {
        "USD" => Some("$"),
        "EUR" => Some("€"),
        "GBP" => Some("£"),
        "JPY" => Some("¥"),
        _ => None,
    }
}

fn separators(locale: &str) -> (char, char) {
    if locale.starts_with("en") {
        ('.', ',')
    } else {
        (',', '.')
    }
}

fn format_number(value: f64, decimal: char, grouping: char) -> String {
    let fixed = format!("{:.2}", value);
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    let mut grouped = String::new();
    for (idx, ch) in int_part.chars().enumerate() {
        if idx != 0 && (int_part.len() - idx) % 3 == 0 {
            grouped.push(grouping);
        }
        grouped.push(ch);
    }
    format!("{grouped}{decimal}{frac_part}")
}

/// Status label in its tag color.
pub fn status_tag(status: BookingStatus) -> String {
    let label = status.label().to_uppercase();
    match status.tag_color() {
        TagColor::Blue => label.blue().to_string(),
        TagColor::Green => label.green().to_string(),
        TagColor::Silver => label.truecolor(192, 192, 192).to_string(),
    }
}

fn cabin_name(reference: &ReferenceData, id: u64) -> String {
    reference
        .cabin(id)
        .map(|cabin| cabin.name.clone())
        .unwrap_or_else(|| format!("cabin {id}"))
}

fn guest_name(reference: &ReferenceData, id: u64) -> String {
    reference
        .guest(id)
        .map(|guest| guest.full_name.clone())
        .unwrap_or_else(|| format!("guest {id}"))
}

pub fn print_bookings(rows: &[Booking], reference: &ReferenceData, fmt: &Formatter<'_>) {
    output::section("Bookings");
    if rows.is_empty() {
        output::info("No bookings found.");
        return;
    }
    for booking in rows {
        output::line(format!(
            "  #{:<4} {:<8} {:<24} {} - {} ({} nights)  {:<12} {:>12}{}",
            booking.id,
            cabin_name(reference, booking.cabin_id),
            guest_name(reference, booking.guest_id),
            fmt.date(booking.start_date),
            fmt.date(booking.end_date),
            booking.num_nights,
            status_tag(booking.status),
            fmt.money(booking.total_price),
            if booking.is_paid { "  paid" } else { "" },
        ));
    }
}

pub fn print_booking_detail(booking: &Booking, reference: &ReferenceData, fmt: &Formatter<'_>) {
    output::section(format!("Booking #{}", booking.id));
    output::line(format!("  Status     : {}", status_tag(booking.status)));
    output::line(format!(
        "  Cabin      : {}",
        cabin_name(reference, booking.cabin_id)
    ));
    output::line(format!(
        "  Guest      : {} ({} guest{})",
        guest_name(reference, booking.guest_id),
        booking.num_guests,
        if booking.num_guests == 1 { "" } else { "s" }
    ));
    output::line(format!(
        "  Stay       : {} - {} ({} nights)",
        fmt.date(booking.start_date),
        fmt.date(booking.end_date),
        booking.num_nights
    ));
    output::line(format!("  Cabin price: {}", fmt.money(booking.cabin_price)));
    output::line(format!(
        "  Extras     : {}{}",
        fmt.money(booking.extras_price),
        if booking.has_breakfast { " (breakfast)" } else { "" }
    ));
    output::line(format!("  Total      : {}", fmt.money(booking.total_price)));
    output::line(format!(
        "  Paid       : {}",
        if booking.is_paid { "yes" } else { "no" }
    ));
    if !booking.observations.is_empty() {
        output::line(format!("  Notes      : {}", booking.observations));
    }
    let actions: Vec<String> = available_actions(booking.status)
        .into_iter()
        .map(|action| action.to_string())
        .collect();
    output::line(format!("  Actions    : {}", actions.join(", ")));
}

pub fn print_cabins(cabins: &[Cabin], fmt: &Formatter<'_>) {
    output::section("Cabins");
    if cabins.is_empty() {
        output::info("No cabins found.");
        return;
    }
    for cabin in cabins {
        output::line(format!(
            "  #{:<4} {:<10} up to {:<3} {:>12}  discount {}",
            cabin.id,
            cabin.name,
            cabin.max_capacity,
            fmt.money(cabin.regular_price),
            fmt.money(cabin.discount)
        ));
    }
}

pub fn print_guests(guests: &[Guest]) {
    output::section("Guests");
    if guests.is_empty() {
        output::info("No guests found.");
        return;
    }
    for guest in guests {
        output::line(format!("  #{:<4} {:<28} {}", guest.id, guest.full_name, guest.email));
    }
}

pub fn print_settings(settings: &Settings, fmt: &Formatter<'_>) {
    output::section("Settings");
    output::line(format!("  min-nights      : {}", settings.min_booking_length));
    output::line(format!("  max-nights      : {}", settings.max_booking_length));
    output::line(format!("  max-guests      : {}", settings.max_guests_per_booking));
    output::line(format!(
        "  breakfast-price : {}",
        fmt.money(settings.breakfast_price)
    ));
}
