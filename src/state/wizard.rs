//! Checkout wizard state machine
//!
//! The wizard walks a linear set of steps: travelers -> extras -> review ->
//! payment. Each transition is gated on the data the step needs being
//! present and valid; the server is the authority on step order, so a
//! client cannot jump to payment with an empty traveler list.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::booking::{AddonSelection, ContactDetails, TravelerDetails};
use crate::utils::errors::{Result, TourbookError};
use crate::utils::helpers::{is_valid_email, is_valid_phone};

/// Steps of the checkout wizard, in order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckoutStep {
    Travelers,
    Extras,
    Review,
    Payment,
}

impl CheckoutStep {
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckoutStep::Travelers => "travelers",
            CheckoutStep::Extras => "extras",
            CheckoutStep::Review => "review",
            CheckoutStep::Payment => "payment",
        }
    }

    fn ordinal(&self) -> u8 {
        match self {
            CheckoutStep::Travelers => 0,
            CheckoutStep::Extras => 1,
            CheckoutStep::Review => 2,
            CheckoutStep::Payment => 3,
        }
    }
}

impl std::fmt::Display for CheckoutStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Server-side state of one checkout in progress
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutSession {
    pub id: Uuid,
    pub tour_id: i64,
    pub departure_id: i64,
    pub user_id: Option<i64>,
    pub step: CheckoutStep,
    pub travelers: Vec<TravelerDetails>,
    pub contact: Option<ContactDetails>,
    pub room_option_id: Option<i64>,
    pub addons: Vec<AddonSelection>,
    pub donation_cents: i64,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl CheckoutSession {
    pub fn is_expired(&self) -> bool {
        self.expires_at < Utc::now()
    }
}

/// Rules of the checkout wizard
#[derive(Debug, Clone)]
pub struct CheckoutWizard {
    max_travelers: i32,
    session_ttl_seconds: u64,
}

impl CheckoutWizard {
    pub fn new(max_travelers: i32, session_ttl_seconds: u64) -> Self {
        Self {
            max_travelers,
            session_ttl_seconds,
        }
    }

    /// Start a new session at the travelers step
    pub fn start(
        &self,
        tour_id: i64,
        departure_id: i64,
        user_id: Option<i64>,
    ) -> CheckoutSession {
        let now = Utc::now();
        CheckoutSession {
            id: Uuid::new_v4(),
            tour_id,
            departure_id,
            user_id,
            step: CheckoutStep::Travelers,
            travelers: Vec::new(),
            contact: None,
            room_option_id: None,
            addons: Vec::new(),
            donation_cents: 0,
            created_at: now,
            expires_at: now + Duration::seconds(self.session_ttl_seconds as i64),
        }
    }

    /// Record travelers and contact details, advancing to extras.
    ///
    /// Allowed from the travelers step or any later step (going back to
    /// edit names restarts validation from there).
    pub fn set_travelers(
        &self,
        session: &mut CheckoutSession,
        travelers: Vec<TravelerDetails>,
        contact: ContactDetails,
    ) -> Result<()> {
        if travelers.is_empty() {
            return Err(TourbookError::InvalidInput(
                "At least one traveler is required".to_string(),
            ));
        }
        if travelers.len() as i32 > self.max_travelers {
            return Err(TourbookError::InvalidInput(format!(
                "At most {} travelers per booking",
                self.max_travelers
            )));
        }
        if travelers.iter().any(|t| t.full_name.trim().is_empty()) {
            return Err(TourbookError::InvalidInput(
                "Traveler names cannot be empty".to_string(),
            ));
        }
        if contact.full_name.trim().is_empty() {
            return Err(TourbookError::InvalidInput(
                "Contact name is required".to_string(),
            ));
        }
        if !is_valid_email(&contact.email) {
            return Err(TourbookError::InvalidInput(
                "Contact email is invalid".to_string(),
            ));
        }
        if let Some(phone) = contact.phone.as_deref() {
            if !is_valid_phone(phone) {
                return Err(TourbookError::InvalidInput(
                    "Contact phone is invalid".to_string(),
                ));
            }
        }

        session.travelers = travelers;
        session.contact = Some(contact);
        session.step = CheckoutStep::Extras;
        Ok(())
    }

    /// Record extras (room option, add-ons, donation), advancing to review.
    ///
    /// Requires the travelers step to be complete.
    pub fn set_extras(
        &self,
        session: &mut CheckoutSession,
        room_option_id: Option<i64>,
        addons: Vec<AddonSelection>,
        donation_cents: i64,
    ) -> Result<()> {
        self.require_reached(session, CheckoutStep::Extras)?;

        if donation_cents < 0 {
            return Err(TourbookError::InvalidInput(
                "Donation cannot be negative".to_string(),
            ));
        }
        if addons.iter().any(|a| a.quantity <= 0) {
            return Err(TourbookError::InvalidInput(
                "Add-on quantities must be positive".to_string(),
            ));
        }
        let mut seen = std::collections::HashSet::new();
        if !addons.iter().all(|a| seen.insert(a.addon_id)) {
            return Err(TourbookError::InvalidInput(
                "Duplicate add-on selection".to_string(),
            ));
        }

        session.room_option_id = room_option_id;
        session.addons = addons;
        session.donation_cents = donation_cents;
        session.step = CheckoutStep::Review;
        Ok(())
    }

    /// Advance from review to payment; all prior steps must be complete
    pub fn confirm_review(&self, session: &mut CheckoutSession) -> Result<()> {
        self.require_reached(session, CheckoutStep::Review)?;
        session.step = CheckoutStep::Payment;
        Ok(())
    }

    /// Guard that the session is eligible for payment-order creation
    pub fn require_payment_ready(&self, session: &CheckoutSession) -> Result<()> {
        if session.step != CheckoutStep::Payment {
            return Err(TourbookError::InvalidStateTransition {
                from: session.step.to_string(),
                to: CheckoutStep::Payment.to_string(),
            });
        }
        Ok(())
    }

    /// Session TTL for the redis store
    pub fn session_ttl_seconds(&self) -> u64 {
        self.session_ttl_seconds
    }

    fn require_reached(&self, session: &CheckoutSession, step: CheckoutStep) -> Result<()> {
        if session.step.ordinal() < step.ordinal() {
            return Err(TourbookError::InvalidStateTransition {
                from: session.step.to_string(),
                to: step.to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wizard() -> CheckoutWizard {
        CheckoutWizard::new(8, 3600)
    }

    fn traveler(name: &str) -> TravelerDetails {
        TravelerDetails {
            full_name: name.to_string(),
            date_of_birth: None,
            passport_number: None,
        }
    }

    fn contact() -> ContactDetails {
        ContactDetails {
            full_name: "Lead Traveler".to_string(),
            email: "lead@example.com".to_string(),
            phone: None,
        }
    }

    #[test]
    fn test_happy_path_reaches_payment() {
        let wizard = wizard();
        let mut session = wizard.start(1, 7, None);
        assert_eq!(session.step, CheckoutStep::Travelers);

        wizard
            .set_travelers(&mut session, vec![traveler("A"), traveler("B")], contact())
            .unwrap();
        assert_eq!(session.step, CheckoutStep::Extras);

        wizard
            .set_extras(&mut session, Some(3), vec![AddonSelection { addon_id: 1, quantity: 2 }], 500)
            .unwrap();
        assert_eq!(session.step, CheckoutStep::Review);

        wizard.confirm_review(&mut session).unwrap();
        assert_eq!(session.step, CheckoutStep::Payment);
        assert!(wizard.require_payment_ready(&session).is_ok());
    }

    #[test]
    fn test_cannot_skip_travelers() {
        let wizard = wizard();
        let mut session = wizard.start(1, 7, None);

        match wizard.set_extras(&mut session, None, vec![], 0).unwrap_err() {
            TourbookError::InvalidStateTransition { from, to } => {
                assert_eq!(from, "travelers");
                assert_eq!(to, "extras");
            }
            other => panic!("unexpected error: {other}"),
        }

        match wizard.confirm_review(&mut session).unwrap_err() {
            TourbookError::InvalidStateTransition { from, to } => {
                assert_eq!(from, "travelers");
                assert_eq!(to, "review");
            }
            other => panic!("unexpected error: {other}"),
        }

        assert!(wizard.require_payment_ready(&session).is_err());
    }

    #[test]
    fn test_empty_travelers_rejected() {
        let wizard = wizard();
        let mut session = wizard.start(1, 7, None);
        let err = wizard.set_travelers(&mut session, vec![], contact()).unwrap_err();
        assert!(matches!(err, TourbookError::InvalidInput(_)));
        assert_eq!(session.step, CheckoutStep::Travelers);
    }

    #[test]
    fn test_too_many_travelers_rejected() {
        let wizard = CheckoutWizard::new(2, 3600);
        let mut session = wizard.start(1, 7, None);
        let travelers = vec![traveler("A"), traveler("B"), traveler("C")];
        let err = wizard.set_travelers(&mut session, travelers, contact()).unwrap_err();
        assert!(matches!(err, TourbookError::InvalidInput(_)));
    }

    #[test]
    fn test_bad_contact_email_rejected() {
        let wizard = wizard();
        let mut session = wizard.start(1, 7, None);
        let mut bad_contact = contact();
        bad_contact.email = "not-an-email".to_string();
        let err = wizard
            .set_travelers(&mut session, vec![traveler("A")], bad_contact)
            .unwrap_err();
        assert!(matches!(err, TourbookError::InvalidInput(_)));
    }

    #[test]
    fn test_duplicate_addons_rejected() {
        let wizard = wizard();
        let mut session = wizard.start(1, 7, None);
        wizard
            .set_travelers(&mut session, vec![traveler("A")], contact())
            .unwrap();
        let addons = vec![
            AddonSelection { addon_id: 1, quantity: 1 },
            AddonSelection { addon_id: 1, quantity: 2 },
        ];
        let err = wizard.set_extras(&mut session, None, addons, 0).unwrap_err();
        assert!(matches!(err, TourbookError::InvalidInput(_)));
    }

    #[test]
    fn test_going_back_to_edit_travelers_is_allowed() {
        let wizard = wizard();
        let mut session = wizard.start(1, 7, None);
        wizard
            .set_travelers(&mut session, vec![traveler("A")], contact())
            .unwrap();
        wizard.set_extras(&mut session, None, vec![], 0).unwrap();

        // Editing travelers after extras lands back on the extras step.
        wizard
            .set_travelers(&mut session, vec![traveler("A"), traveler("B")], contact())
            .unwrap();
        assert_eq!(session.step, CheckoutStep::Extras);
        assert_eq!(session.travelers.len(), 2);
    }
}
