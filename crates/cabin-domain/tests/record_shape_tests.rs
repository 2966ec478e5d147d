use cabin_domain::{Booking, BookingPatch, BookingStatus, NewBooking};
use chrono::{NaiveDate, TimeZone, Utc};

fn sample_booking() -> Booking {
    NewBooking {
        start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        end_date: NaiveDate::from_ymd_opt(2024, 1, 4).unwrap(),
        num_nights: 3,
        num_guests: 2,
        cabin_id: 1,
        guest_id: 4,
        cabin_price: 270.0,
        extras_price: 90.0,
        total_price: 360.0,
        has_breakfast: true,
        is_paid: false,
        status: BookingStatus::Unconfirmed,
        observations: "Late arrival".into(),
    }
    .into_booking(7, Utc.with_ymd_and_hms(2024, 1, 1, 9, 30, 0).unwrap())
}

#[test]
fn booking_record_uses_camel_case_boundary_shape() {
    let json = serde_json::to_string_pretty(&sample_booking()).expect("serialize booking");
    insta::assert_snapshot!(json, @r###"
    {
      "id": 7,
      "createdAt": "2024-01-01T09:30:00Z",
      "startDate": "2024-01-01T00:00:00.000Z",
      "endDate": "2024-01-04T00:00:00.000Z",
      "numNights": 3,
      "numGuests": 2,
      "cabinId": 1,
      "guestId": 4,
      "cabinPrice": 270.0,
      "extrasPrice": 90.0,
      "totalPrice": 360.0,
      "hasBreakfast": true,
      "isPaid": false,
      "status": "unconfirmed",
      "observations": "Late arrival"
    }
    "###);
}

#[test]
fn booking_record_accepts_bare_dates_and_missing_observations() {
    let raw = r#"{
        "id": 3,
        "createdAt": "2024-02-01T12:00:00Z",
        "startDate": "2024-02-10",
        "endDate": "2024-02-12T00:00:00.000Z",
        "numNights": 2,
        "numGuests": 1,
        "cabinId": 2,
        "guestId": 9,
        "cabinPrice": 500,
        "extrasPrice": 0,
        "totalPrice": 500,
        "hasBreakfast": false,
        "isPaid": true,
        "status": "checked-in"
    }"#;

    let booking: Booking = serde_json::from_str(raw).expect("deserialize booking");
    assert_eq!(booking.start_date, NaiveDate::from_ymd_opt(2024, 2, 10).unwrap());
    assert_eq!(booking.end_date, NaiveDate::from_ymd_opt(2024, 2, 12).unwrap());
    assert_eq!(booking.status, BookingStatus::CheckedIn);
    assert!(booking.observations.is_empty());
    assert!(booking.is_total_consistent());
}

#[test]
fn empty_patch_serializes_to_empty_object() {
    let json = serde_json::to_string(&BookingPatch::default()).unwrap();
    assert_eq!(json, "{}");

    let json = serde_json::to_string(&BookingPatch::status(BookingStatus::CheckedOut)).unwrap();
    assert_eq!(json, r#"{"status":"checked-out"}"#);
}
