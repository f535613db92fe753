//! Checkout state management
//!
//! The multi-step checkout wizard keeps its state server-side in Redis.
//! `wizard` defines the step machine and validation rules; `storage`
//! persists sessions with a TTL.

pub mod storage;
pub mod wizard;

pub use storage::SessionStore;
pub use wizard::{CheckoutSession, CheckoutStep, CheckoutWizard};
