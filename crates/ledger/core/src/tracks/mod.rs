//! Reputation tracks owned by characters and social clubs.
//!
//! Both tracks wrap a [`ClampedCounter`](crate::ClampedCounter) with fixed
//! domain bounds. Adjustments saturate at the bounds and report the new value.

mod renown;
mod standing;

pub use renown::{AcquisitionDecision, RenownTrack};
pub use standing::{SocialStandingTrack, Standing, StandingDelta, StandingReading, classify};
