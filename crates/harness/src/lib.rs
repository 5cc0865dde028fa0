pub mod catalogue;
pub mod faults;
pub mod fixtures;

pub use catalogue::TestCatalogue;
pub use faults::{FaultSwitch, FaultyStorage};
