use std::sync::Arc;

use cabin_core::{
    BookingFilter, BookingInput, BookingSort, DataService, FixedClock, MemoryDataService,
    PricingEngine,
};
use cabin_domain::{BookingPatch, BookingStatus, Cabin, Guest, Settings};
use chrono::{Duration, NaiveDate};
use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};

fn sample_cabins(count: u64) -> Vec<Cabin> {
    (1..=count)
        .map(|id| Cabin::new(id, format!("{id:03}"), 6, 150.0 + id as f64, (id % 4) as f64 * 10.0))
        .collect()
}

fn seeded_service(booking_count: usize) -> Arc<MemoryDataService> {
    let cabins = sample_cabins(8);
    let service = Arc::new(MemoryDataService::new(
        cabins.clone(),
        vec![Guest::new(1, "Bench Guest", "bench@example.com")],
        Settings::default(),
    ));
    let clock = FixedClock::on(NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());
    let today = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
    let settings = Settings::default();

    for idx in 0..booking_count {
        let cabin = &cabins[idx % cabins.len()];
        let start = today + Duration::days((idx % 365) as i64);
        let input = BookingInput {
            start_date: start,
            end_date: start + Duration::days(3 + (idx % 10) as i64),
            num_guests: 1 + (idx % 6) as i64,
            cabin_id: cabin.id,
            guest_id: 1,
            has_breakfast: idx % 2 == 0,
            is_paid: false,
            observations: String::new(),
        };
        let draft = PricingEngine::validate_and_price(&input, Some(cabin), Some(&settings), &clock)
            .expect("valid draft");
        let booking = service.insert_booking(&draft).expect("insert");
        if idx % 3 == 0 {
            service
                .update_booking(booking.id, &BookingPatch::status(BookingStatus::CheckedIn))
                .expect("check in");
        }
    }
    service
}

fn bench_validate_and_price(c: &mut Criterion) {
    let cabins = sample_cabins(50);
    let settings = Settings::default();
    let clock = FixedClock::on(NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());
    let start = NaiveDate::from_ymd_opt(2025, 2, 1).unwrap();
    let input = BookingInput {
        start_date: start,
        end_date: start + Duration::days(7),
        num_guests: 4,
        cabin_id: 42,
        guest_id: 1,
        has_breakfast: true,
        is_paid: false,
        observations: String::new(),
    };

    c.bench_function("validate_and_price", |b| {
        b.iter(|| {
            let cabin = PricingEngine::resolve_cabin(&cabins, input.cabin_id);
            let draft = PricingEngine::validate_and_price(
                black_box(&input),
                cabin,
                Some(&settings),
                &clock,
            );
            black_box(draft)
        })
    });
}

fn bench_booking_queries(c: &mut Criterion) {
    let service = seeded_service(black_box(10_000));
    let by_price = BookingFilter {
        status: Some(BookingStatus::CheckedIn),
        sort: BookingSort::parse("totalPrice-asc").unwrap_or_default(),
        ..BookingFilter::default()
    };

    c.bench_function("list_bookings_10k", |b| {
        b.iter(|| {
            let rows = service.list_bookings(&BookingFilter::default()).expect("list");
            black_box(rows);
        })
    });

    c.bench_function("list_checked_in_by_price", |b| {
        b.iter_batched(
            || by_price.clone(),
            |filter| {
                let rows = service.list_bookings(&filter).expect("list");
                black_box(rows);
            },
            BatchSize::SmallInput,
        );
    });
}

criterion_group!(benches, bench_validate_and_price, bench_booking_queries);
criterion_main!(benches);
