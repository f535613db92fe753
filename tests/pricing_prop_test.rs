//! Property tests for the pricing arithmetic

use chrono::{NaiveDate, Utc};
use proptest::prelude::*;
use tourbook::models::departure::TourDeparture;
use tourbook::models::tour::{Tour, TourAddon};
use tourbook::services::PricingService;

fn tour(base: i64, kitty: i64) -> Tour {
    Tour {
        id: 1,
        slug: "t".into(),
        title: "T".into(),
        summary: None,
        description: None,
        destination_id: None,
        base_price_cents: base,
        kitty_cents: kitty,
        duration_days: 7,
        hero_image_url: None,
        is_published: true,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

fn departure(price: Option<i64>) -> TourDeparture {
    TourDeparture {
        id: 7,
        tour_id: 1,
        start_date: NaiveDate::from_ymd_opt(2026, 10, 1).unwrap(),
        end_date: NaiveDate::from_ymd_opt(2026, 10, 8).unwrap(),
        price_cents: price,
        total_spaces: 16,
        available_spaces: 16,
        status: "open".into(),
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

fn addon(id: i64, unit: i64) -> TourAddon {
    TourAddon {
        id,
        tour_id: 1,
        name: format!("a{}", id),
        description: None,
        unit_price_cents: unit,
        max_quantity: 10,
        is_active: true,
        created_at: Utc::now(),
    }
}

proptest! {
    /// The total is exactly the sum of its itemized parts.
    #[test]
    fn total_matches_itemization(
        base in 0i64..5_000_000,
        kitty in 0i64..100_000,
        departure_price in proptest::option::of(0i64..5_000_000),
        travelers in 1i32..=8,
        addon_units in proptest::collection::vec((0i64..100_000, 1i32..=10), 0..4),
        donation in 0i64..1_000_000,
    ) {
        let service = PricingService::new("USD".into());
        let addons: Vec<_> = addon_units
            .iter()
            .enumerate()
            .map(|(i, (unit, qty))| (addon(i as i64 + 1, *unit), *qty))
            .collect();

        let quote = service
            .quote(&tour(base, kitty), &departure(departure_price), travelers, None, &addons, donation)
            .unwrap();

        let expected_per_person = departure_price.unwrap_or(base);
        prop_assert_eq!(quote.per_person_cents, expected_per_person);

        let addons_sum: i64 = quote.addon_lines.iter().map(|l| l.line_total_cents).sum();
        prop_assert_eq!(quote.addons_cents, addons_sum);

        let travelers_i64 = travelers as i64;
        prop_assert_eq!(
            quote.total_cents,
            expected_per_person * travelers_i64 + kitty * travelers_i64 + addons_sum + donation
        );
    }

    /// With non-negative inputs the total never goes negative.
    #[test]
    fn total_is_nonnegative(
        base in 0i64..5_000_000,
        kitty in 0i64..100_000,
        travelers in 1i32..=8,
        donation in 0i64..1_000_000,
    ) {
        let service = PricingService::new("USD".into());
        let quote = service
            .quote(&tour(base, kitty), &departure(None), travelers, None, &[], donation)
            .unwrap();
        prop_assert!(quote.total_cents >= 0);
    }

    /// Adding a traveler never decreases the total.
    #[test]
    fn total_monotonic_in_travelers(
        base in 0i64..5_000_000,
        kitty in 0i64..100_000,
        travelers in 1i32..=7,
    ) {
        let service = PricingService::new("USD".into());
        let smaller = service
            .quote(&tour(base, kitty), &departure(None), travelers, None, &[], 0)
            .unwrap();
        let larger = service
            .quote(&tour(base, kitty), &departure(None), travelers + 1, None, &[], 0)
            .unwrap();
        prop_assert!(larger.total_cents >= smaller.total_cents);
    }
}
