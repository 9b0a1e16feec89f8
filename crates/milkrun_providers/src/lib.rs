pub mod directions;
pub mod google_api;
pub mod travel_mode;
