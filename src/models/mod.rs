pub mod location;
pub mod trip;

pub use location::{NewLocation, SavedLocation};
pub use trip::{FishingTrip, NewTrip};
