//! Example roster loaded into an empty directory at startup.

mod roster;
mod startup;

pub use roster::{ROSTER, roster_records};
pub use startup::{SeedOutcome, StartupSeedingError, seed_directory_on_startup};
