//! guia-core: shared primitives for the guia announcement pipeline
//!
//! Provides the pieces every other crate builds on:
//! - Error taxonomy
//! - Position and address snapshot types
//! - Generic observer fan-out (NotificationBus)

pub mod address;
pub mod bus;
pub mod error;
pub mod position;

pub use address::{AddressField, AddressSnapshot};
pub use bus::{NotificationBus, Subscription};
pub use error::{Error, Result};
pub use position::Position;
