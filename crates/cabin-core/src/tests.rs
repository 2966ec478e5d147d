use std::{
    sync::{Arc, Barrier},
    thread,
};

use chrono::NaiveDate;

use crate::{
    action::{LifecycleAction, Notice, NoticeKind},
    delete_flow::{DeleteFlow, DeleteOutcome, DeleteState},
    form::{BookingForm, BookingInput},
    lifecycle::{CheckInOptions, LifecycleController},
    memory::MemoryDataService,
    pricing::PricingEngine,
    reference::ReferenceData,
    service::{BookingFilter, DataService},
    time::FixedClock,
    LifecycleError, ServiceError, ValidationError,
};
use cabin_domain::{
    Booking, BookingId, BookingPatch, BookingStatus, Cabin, Guest, NewBooking, Settings,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn cabin() -> Cabin {
    Cabin::new(1, "001", 4, 100.0, 10.0)
}

fn settings() -> Settings {
    Settings {
        min_booking_length: 1,
        max_booking_length: 30,
        max_guests_per_booking: 4,
        breakfast_price: 15.0,
    }
}

fn clock() -> FixedClock {
    FixedClock::on(date(2024, 1, 1))
}

fn input(has_breakfast: bool, guests: i64) -> BookingInput {
    BookingInput {
        start_date: date(2024, 1, 1),
        end_date: date(2024, 1, 4),
        num_guests: guests,
        cabin_id: 1,
        guest_id: 1,
        has_breakfast,
        is_paid: false,
        observations: String::new(),
    }
}

fn price(request: &BookingInput) -> Result<NewBooking, ValidationError> {
    PricingEngine::validate_and_price(request, Some(&cabin()), Some(&settings()), &clock())
}

fn service() -> Arc<MemoryDataService> {
    Arc::new(MemoryDataService::new(
        vec![cabin()],
        vec![Guest::new(1, "Jonas Schmedtmann", "jonas@example.com")],
        settings(),
    ))
}

fn seeded_booking(service: &MemoryDataService, status: BookingStatus) -> Booking {
    let draft = price(&input(false, 2)).expect("valid draft");
    let booking = service.insert_booking(&draft).expect("insert");
    if status == BookingStatus::Unconfirmed {
        return booking;
    }
    service
        .update_booking(booking.id, &BookingPatch::status(status))
        .expect("set status")
}

#[test]
fn scenario_a_prices_cabin_without_breakfast() {
    let draft = price(&input(false, 2)).expect("valid booking");

    assert_eq!(draft.num_nights, 3);
    assert_eq!(draft.cabin_price, 270.0);
    assert_eq!(draft.extras_price, 0.0);
    assert_eq!(draft.total_price, 270.0);
    assert_eq!(draft.status, BookingStatus::Unconfirmed);
}

#[test]
fn scenario_b_adds_breakfast_per_guest_per_night() {
    let draft = price(&input(true, 2)).expect("valid booking");

    assert_eq!(draft.extras_price, 90.0);
    assert_eq!(draft.total_price, 360.0);
    assert_eq!(draft.total_price, draft.cabin_price + draft.extras_price);
}

#[test]
fn scenario_c_too_short_issues_no_service_call() {
    let service = service();
    let policy = Settings {
        min_booking_length: 3,
        ..settings()
    };
    let reference = ReferenceData {
        cabins: Some(vec![cabin()]),
        guests: Some(vec![Guest::new(1, "Jonas Schmedtmann", "jonas@example.com")]),
        settings: Some(policy),
    };
    let controller = LifecycleController::new(service.clone());
    let form = BookingForm {
        start_date: "2024-01-01".into(),
        end_date: "2024-01-03".into(),
        num_guests: "2".into(),
        cabin_id: "1".into(),
        guest_id: "1".into(),
        ..BookingForm::default()
    };

    let err = controller
        .create_from_form(&form, &reference, &clock())
        .expect_err("two nights is below the minimum");

    assert!(matches!(
        err,
        LifecycleError::Validation(ValidationError::TooShort { min: 3, nights: 2 })
    ));
    assert_eq!(err.to_string(), "Minimum number of nights must be 3");
    assert_eq!(service.calls(), 0);
    assert!(service.list_bookings(&BookingFilter::default()).unwrap().is_empty());
}

#[test]
fn scenario_d_repeat_check_in_is_rejected_before_the_service() {
    let service = service();
    let booking = seeded_booking(&service, BookingStatus::CheckedIn);
    let calls_before = service.calls();
    let controller = LifecycleController::new(service.clone());

    let err = controller.check_in(&booking).expect_err("already checked in");

    assert!(matches!(err, LifecycleError::Transition { .. }));
    assert_eq!(service.calls(), calls_before);
}

#[test]
fn scenario_e_double_confirm_deletes_once() {
    let service = service();
    let booking = seeded_booking(&service, BookingStatus::Unconfirmed);
    let controller = LifecycleController::new(service.clone());
    let mut flow = DeleteFlow::new();

    let ticket = flow.open(booking.id);
    assert!(matches!(
        flow.confirm(ticket, &controller),
        DeleteOutcome::Deleted(id) if id == booking.id
    ));
    assert!(matches!(flow.confirm(ticket, &controller), DeleteOutcome::Ignored));
    assert_eq!(flow.state(), &DeleteState::Done { booking_id: booking.id });

    let err = controller.delete(booking.id).expect_err("already deleted");
    assert!(err.is_not_found());
}

#[test]
fn invalid_range_wins_regardless_of_other_fields() {
    let mut request = input(true, 99);
    request.end_date = request.start_date;
    let err = price(&request).unwrap_err();
    assert_eq!(err, ValidationError::InvalidRange { nights: 0 });

    request.end_date = date(2023, 12, 25);
    let err = price(&request).unwrap_err();
    assert_eq!(err, ValidationError::InvalidRange { nights: -7 });
}

#[test]
fn pricing_is_idempotent_for_identical_inputs() {
    let first = price(&input(true, 3)).unwrap();
    let second = price(&input(true, 3)).unwrap();

    assert_eq!(
        serde_json::to_vec(&first).unwrap(),
        serde_json::to_vec(&second).unwrap()
    );
}

#[test]
fn valid_requests_always_balance() {
    let policy = settings();
    for nights in 1..=policy.max_booking_length {
        for guests in 1..=policy.max_guests_per_booking {
            for breakfast in [false, true] {
                let mut request = input(breakfast, i64::from(guests));
                request.end_date = request.start_date + chrono::Duration::days(i64::from(nights));
                let draft = PricingEngine::validate_and_price(
                    &request,
                    Some(&cabin()),
                    Some(&policy),
                    &clock(),
                )
                .expect("valid request");
                assert!(draft.cabin_price >= 0.0);
                assert!(draft.extras_price >= 0.0);
                assert_eq!(draft.total_price, draft.cabin_price + draft.extras_price);
            }
        }
    }
}

#[test]
fn full_lifecycle_moves_forward_only() {
    let service = service();
    let controller = LifecycleController::new(service.clone());
    let draft = price(&input(false, 2)).unwrap();

    let created = controller.create(&draft).expect("create");
    assert_eq!(created.status, BookingStatus::Unconfirmed);

    let checked_in = controller.check_in(&created).expect("check in");
    assert_eq!(checked_in.status, BookingStatus::CheckedIn);
    assert!(matches!(
        controller.check_out(&created),
        Err(LifecycleError::Transition { from: BookingStatus::Unconfirmed, .. })
    ));

    let checked_out = controller.check_out(&checked_in).expect("check out");
    assert_eq!(checked_out.status, BookingStatus::CheckedOut);
    assert!(matches!(
        controller.check_in(&checked_out),
        Err(LifecycleError::Transition { .. })
    ));
    assert!(!checked_out.is_paid, "paid flag is never inferred");
}

#[test]
fn check_in_can_add_breakfast_and_record_payment() {
    let service = service();
    let booking = seeded_booking(&service, BookingStatus::Unconfirmed);
    let controller = LifecycleController::new(service.clone());

    let updated = controller
        .check_in_with(
            &booking,
            CheckInOptions {
                add_breakfast: true,
                confirm_paid: true,
            },
            Some(&settings()),
        )
        .expect("check in");

    assert_eq!(updated.status, BookingStatus::CheckedIn);
    assert!(updated.has_breakfast);
    assert!(updated.is_paid);
    assert_eq!(updated.extras_price, 90.0);
    assert_eq!(updated.total_price, 360.0);
}

#[test]
fn adding_breakfast_without_settings_is_not_ready() {
    let service = service();
    let booking = seeded_booking(&service, BookingStatus::Unconfirmed);
    let calls_before = service.calls();
    let controller = LifecycleController::new(service.clone());

    let err = controller
        .check_in_with(
            &booking,
            CheckInOptions {
                add_breakfast: true,
                confirm_paid: false,
            },
            None,
        )
        .unwrap_err();

    assert!(matches!(
        err,
        LifecycleError::Validation(ValidationError::NotReady("settings"))
    ));
    assert_eq!(service.calls(), calls_before);
}

#[test]
fn service_failure_names_the_action_and_clears_in_flight() {
    let service = service();
    let controller = LifecycleController::new(service.clone());
    let draft = price(&input(false, 2)).unwrap();

    service.fail_next("connection reset");
    let err = controller.create(&draft).expect_err("service down");
    assert_eq!(err.to_string(), "Booking could not be created");
    assert_eq!(Notice::from(&err).kind, NoticeKind::Error);
    assert!(!controller.is_in_flight(LifecycleAction::Create));
    assert!(service.list_bookings(&BookingFilter::default()).unwrap().is_empty());

    let created = controller.create(&draft).expect("retry by the user succeeds");
    assert_eq!(created.id, 1);
}

#[test]
fn failed_delete_keeps_the_failure_in_the_flow() {
    let service = service();
    let booking = seeded_booking(&service, BookingStatus::CheckedOut);
    let controller = LifecycleController::new(service.clone());
    let mut flow = DeleteFlow::new();

    let ticket = flow.open(booking.id);
    service.fail_next("timeout");
    let outcome = flow.confirm(ticket, &controller);

    assert!(matches!(outcome, DeleteOutcome::Failed(_)));
    assert!(matches!(
        flow.state(),
        DeleteState::Failed { message, .. } if message == "Booking could not be deleted"
    ));
    assert!(service.get_booking(booking.id).is_ok());
    assert!(!controller.is_in_flight(LifecycleAction::Delete));
}

#[test]
fn cancelled_or_stale_confirmations_do_not_delete() {
    let service = service();
    let booking = seeded_booking(&service, BookingStatus::Unconfirmed);
    let controller = LifecycleController::new(service.clone());
    let mut flow = DeleteFlow::new();

    let ticket = flow.open(booking.id);
    assert_eq!(flow.pending_booking(), Some(booking.id));
    assert!(flow.cancel());
    assert!(!flow.cancel());
    assert_eq!(flow.pending_booking(), None);
    assert!(matches!(flow.confirm(ticket, &controller), DeleteOutcome::Ignored));

    let stale = flow.open(booking.id);
    let _fresh = flow.open(booking.id);
    assert!(matches!(flow.confirm(stale, &controller), DeleteOutcome::Ignored));
    assert!(service.get_booking(booking.id).is_ok());
}

#[test]
fn reference_load_reports_each_failing_table() {
    let service = service();
    service.fail_next("offline");
    let (reference, errors) = ReferenceData::load(service.as_ref());

    assert!(reference.cabins.is_none());
    assert!(reference.guests.is_some());
    assert!(!reference.is_ready());
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].to_string(), "Cabins could not be loaded");

    let form = BookingForm {
        start_date: "2024-01-02".into(),
        end_date: "2024-01-05".into(),
        num_guests: "1".into(),
        cabin_id: "1".into(),
        guest_id: "1".into(),
        ..BookingForm::default()
    };
    assert_eq!(
        reference.price_form(&form, &clock()),
        Err(ValidationError::NotReady("cabins"))
    );
}

#[test]
fn reference_rejects_unknown_guest() {
    let (reference, errors) = ReferenceData::load(service().as_ref());
    assert!(errors.is_empty());
    let form = BookingForm {
        start_date: "2024-01-02".into(),
        end_date: "2024-01-05".into(),
        num_guests: "1".into(),
        cabin_id: "1".into(),
        guest_id: "42".into(),
        ..BookingForm::default()
    };
    assert!(matches!(
        reference.price_form(&form, &clock()),
        Err(ValidationError::InvalidReference { field: "guestId", .. })
    ));
}

#[test]
fn inconsistent_settings_are_rejected_by_provider() {
    let service = MemoryDataService::new(
        vec![cabin()],
        Vec::new(),
        Settings {
            min_booking_length: 10,
            max_booking_length: 2,
            ..settings()
        },
    );
    let err = crate::SettingsProvider::load(&service).unwrap_err();
    assert!(err.to_string().contains("exceeds maximum"));
}

#[test]
fn bookings_filter_by_status_and_sort() {
    let service = service();
    let first = seeded_booking(&service, BookingStatus::CheckedIn);
    let second = seeded_booking(&service, BookingStatus::Unconfirmed);
    let controller = LifecycleController::new(service.clone());

    let checked_in = controller
        .bookings(&BookingFilter::with_status(BookingStatus::CheckedIn))
        .unwrap();
    assert_eq!(checked_in.len(), 1);
    assert_eq!(checked_in[0].id, first.id);

    let all = controller.bookings(&BookingFilter::default()).unwrap();
    let ids: Vec<_> = all.iter().map(|b| b.id).collect();
    assert_eq!(ids, vec![second.id, first.id]);
}

#[test]
fn range_is_reported_before_unknown_cabin() {
    let (reference, _) = ReferenceData::load(service().as_ref());
    let form = BookingForm {
        start_date: "2024-01-02".into(),
        end_date: "2024-01-02".into(),
        num_guests: "1".into(),
        cabin_id: "99".into(),
        guest_id: "1".into(),
        ..BookingForm::default()
    };
    assert_eq!(
        reference.price_form(&form, &clock()),
        Err(ValidationError::InvalidRange { nights: 0 })
    );
}

/// Holds `insert_booking` open until the test releases it.
struct GatedService {
    inner: MemoryDataService,
    entered: Barrier,
    release: Barrier,
}

impl DataService for GatedService {
    fn list_bookings(&self, filter: &BookingFilter) -> Result<Vec<Booking>, ServiceError> {
        self.inner.list_bookings(filter)
    }

    fn get_booking(&self, id: BookingId) -> Result<Booking, ServiceError> {
        self.inner.get_booking(id)
    }

    fn insert_booking(&self, draft: &NewBooking) -> Result<Booking, ServiceError> {
        self.entered.wait();
        self.release.wait();
        self.inner.insert_booking(draft)
    }

    fn update_booking(&self, id: BookingId, patch: &BookingPatch) -> Result<Booking, ServiceError> {
        self.inner.update_booking(id, patch)
    }

    fn delete_booking(&self, id: BookingId) -> Result<(), ServiceError> {
        self.inner.delete_booking(id)
    }

    fn list_guests(&self) -> Result<Vec<Guest>, ServiceError> {
        self.inner.list_guests()
    }

    fn list_cabins(&self) -> Result<Vec<Cabin>, ServiceError> {
        self.inner.list_cabins()
    }

    fn settings(&self) -> Result<Settings, ServiceError> {
        self.inner.settings()
    }
}

#[test]
fn second_create_is_rejected_while_first_is_in_flight() {
    let gated = Arc::new(GatedService {
        inner: MemoryDataService::new(vec![cabin()], Vec::new(), settings()),
        entered: Barrier::new(2),
        release: Barrier::new(2),
    });
    let controller = Arc::new(LifecycleController::new(gated.clone()));
    let draft = price(&input(false, 2)).unwrap();

    let worker = {
        let controller = Arc::clone(&controller);
        let draft = draft.clone();
        thread::spawn(move || controller.create(&draft))
    };

    gated.entered.wait();
    assert!(controller.is_in_flight(LifecycleAction::Create));
    assert!(matches!(
        controller.create(&draft),
        Err(LifecycleError::InFlight(LifecycleAction::Create))
    ));
    assert_eq!(gated.inner.calls(), 0);
    gated.release.wait();

    let created = worker.join().unwrap().unwrap();
    assert_eq!(created.id, 1);
    assert!(!controller.is_in_flight(LifecycleAction::Create));
    assert_eq!(gated.inner.calls(), 1);
}
