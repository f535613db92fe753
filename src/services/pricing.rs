//! Booking price aggregation
//!
//! Pure arithmetic over the selected departure, room option, add-ons, and
//! donation. All amounts are integer minor units; display-currency
//! conversion happens elsewhere and never feeds back into these totals.

use serde::{Deserialize, Serialize};

use crate::models::departure::{RoomOption, TourDeparture};
use crate::models::tour::{Tour, TourAddon};
use crate::utils::errors::{Result, TourbookError};

/// One priced add-on line in a quote
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddonLine {
    pub addon_id: i64,
    pub name: String,
    pub unit_price_cents: i64,
    pub quantity: i32,
    pub line_total_cents: i64,
}

/// Itemized price breakdown for a prospective booking
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceQuote {
    pub travelers: i32,
    /// Departure price, or the tour base price when the departure has none
    pub per_person_cents: i64,
    /// Flat per-traveler room supplement
    pub room_supplement_cents: i64,
    /// Mandatory per-traveler kitty
    pub kitty_cents: i64,
    pub addon_lines: Vec<AddonLine>,
    pub addons_cents: i64,
    pub donation_cents: i64,
    pub total_cents: i64,
    pub currency: String,
}

/// Stateless pricing computations
#[derive(Debug, Clone)]
pub struct PricingService {
    currency: String,
}

impl PricingService {
    pub fn new(currency: String) -> Self {
        Self { currency }
    }

    /// Build the itemized quote for a traveler party.
    ///
    /// total = per_person * travelers
    ///       + room_supplement * travelers
    ///       + kitty * travelers
    ///       + sum(addon unit price * quantity)
    ///       + donation
    pub fn quote(
        &self,
        tour: &Tour,
        departure: &TourDeparture,
        travelers: i32,
        room_option: Option<&RoomOption>,
        addons: &[(TourAddon, i32)],
        donation_cents: i64,
    ) -> Result<PriceQuote> {
        if travelers <= 0 {
            return Err(TourbookError::InvalidInput(
                "At least one traveler is required".to_string(),
            ));
        }
        if donation_cents < 0 {
            return Err(TourbookError::InvalidInput(
                "Donation cannot be negative".to_string(),
            ));
        }

        let per_person_cents = departure.effective_price_cents(tour.base_price_cents);
        let room_supplement_cents = room_option.map(|r| r.supplement_cents).unwrap_or(0);
        let kitty_cents = tour.kitty_cents;

        let mut addon_lines = Vec::with_capacity(addons.len());
        let mut addons_cents: i64 = 0;
        for (addon, quantity) in addons {
            if *quantity <= 0 {
                return Err(TourbookError::InvalidInput(format!(
                    "Add-on '{}' has non-positive quantity",
                    addon.name
                )));
            }
            if *quantity > addon.max_quantity {
                return Err(TourbookError::InvalidInput(format!(
                    "Add-on '{}' exceeds max quantity {}",
                    addon.name, addon.max_quantity
                )));
            }
            let line_total_cents = addon
                .unit_price_cents
                .checked_mul(*quantity as i64)
                .ok_or_else(Self::amount_overflow)?;
            addons_cents = addons_cents
                .checked_add(line_total_cents)
                .ok_or_else(Self::amount_overflow)?;
            addon_lines.push(AddonLine {
                addon_id: addon.id,
                name: addon.name.clone(),
                unit_price_cents: addon.unit_price_cents,
                quantity: *quantity,
                line_total_cents,
            });
        }

        let per_traveler_cents = per_person_cents
            .checked_add(room_supplement_cents)
            .and_then(|v| v.checked_add(kitty_cents))
            .ok_or_else(Self::amount_overflow)?;
        let total_cents = per_traveler_cents
            .checked_mul(travelers as i64)
            .and_then(|v| v.checked_add(addons_cents))
            .and_then(|v| v.checked_add(donation_cents))
            .ok_or_else(Self::amount_overflow)?;

        Ok(PriceQuote {
            travelers,
            per_person_cents,
            room_supplement_cents,
            kitty_cents,
            addon_lines,
            addons_cents,
            donation_cents,
            total_cents,
            currency: self.currency.clone(),
        })
    }

    /// Display-only conversion of a quoted amount; never used for charging
    pub fn display_amount(&self, cents: i64, rate: f64) -> f64 {
        (cents as f64 / 100.0) * rate
    }

    fn amount_overflow() -> TourbookError {
        TourbookError::InvalidInput("Quote amount is out of range".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};

    fn tour(base: i64, kitty: i64) -> Tour {
        Tour {
            id: 1,
            slug: "annapurna".into(),
            title: "Annapurna".into(),
            summary: None,
            description: None,
            destination_id: None,
            base_price_cents: base,
            kitty_cents: kitty,
            duration_days: 10,
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
            end_date: NaiveDate::from_ymd_opt(2026, 10, 11).unwrap(),
            price_cents: price,
            total_spaces: 12,
            available_spaces: 12,
            status: "open".into(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn room(supplement: i64) -> RoomOption {
        RoomOption {
            id: 3,
            tour_id: 1,
            name: "Single".into(),
            description: None,
            supplement_cents: supplement,
            is_active: true,
            created_at: Utc::now(),
        }
    }

    fn addon(id: i64, unit: i64, max: i32) -> TourAddon {
        TourAddon {
            id,
            tour_id: 1,
            name: format!("addon-{}", id),
            description: None,
            unit_price_cents: unit,
            max_quantity: max,
            is_active: true,
            created_at: Utc::now(),
        }
    }

    fn service() -> PricingService {
        PricingService::new("USD".into())
    }

    #[test]
    fn test_base_only_quote() {
        let quote = service()
            .quote(&tour(100_000, 0), &departure(None), 2, None, &[], 0)
            .unwrap();
        assert_eq!(quote.per_person_cents, 100_000);
        assert_eq!(quote.total_cents, 200_000);
        assert!(quote.addon_lines.is_empty());
    }

    #[test]
    fn test_departure_price_overrides_base() {
        let quote = service()
            .quote(&tour(100_000, 0), &departure(Some(120_000)), 1, None, &[], 0)
            .unwrap();
        assert_eq!(quote.per_person_cents, 120_000);
        assert_eq!(quote.total_cents, 120_000);
    }

    #[test]
    fn test_full_aggregation() {
        let addons = vec![(addon(1, 5_000, 5), 2), (addon(2, 1_500, 5), 1)];
        let quote = service()
            .quote(
                &tour(100_000, 2_500),
                &departure(None),
                3,
                Some(&room(10_000)),
                &addons,
                7_700,
            )
            .unwrap();

        // 3*(100000 + 10000 + 2500) + (2*5000 + 1500) + 7700
        assert_eq!(quote.addons_cents, 11_500);
        assert_eq!(quote.total_cents, 3 * 112_500 + 11_500 + 7_700);
        assert_eq!(quote.addon_lines.len(), 2);
        assert_eq!(quote.addon_lines[0].line_total_cents, 10_000);
    }

    #[test]
    fn test_zero_travelers_rejected() {
        let err = service()
            .quote(&tour(100_000, 0), &departure(None), 0, None, &[], 0)
            .unwrap_err();
        assert!(matches!(err, TourbookError::InvalidInput(_)));
    }

    #[test]
    fn test_negative_donation_rejected() {
        let err = service()
            .quote(&tour(100_000, 0), &departure(None), 1, None, &[], -1)
            .unwrap_err();
        assert!(matches!(err, TourbookError::InvalidInput(_)));
    }

    #[test]
    fn test_addon_over_max_quantity_rejected() {
        let addons = vec![(addon(1, 5_000, 2), 3)];
        let err = service()
            .quote(&tour(100_000, 0), &departure(None), 1, None, &addons, 0)
            .unwrap_err();
        assert!(matches!(err, TourbookError::InvalidInput(_)));
    }

    #[test]
    fn test_overflowing_total_rejected() {
        let err = service()
            .quote(&tour(i64::MAX, 0), &departure(None), 2, None, &[], 0)
            .unwrap_err();
        assert!(matches!(err, TourbookError::InvalidInput(_)));
    }

    #[test]
    fn test_overflowing_addon_line_rejected() {
        let addons = vec![(addon(1, i64::MAX, 5), 2)];
        let err = service()
            .quote(&tour(100_000, 0), &departure(None), 1, None, &addons, 0)
            .unwrap_err();
        assert!(matches!(err, TourbookError::InvalidInput(_)));
    }

    #[test]
    fn test_display_conversion_does_not_touch_totals() {
        let svc = service();
        let quote = svc
            .quote(&tour(100_000, 0), &departure(None), 1, None, &[], 0)
            .unwrap();
        let display = svc.display_amount(quote.total_cents, 0.92);
        assert!((display - 920.0).abs() < 1e-9);
        assert_eq!(quote.total_cents, 100_000);
    }
}
