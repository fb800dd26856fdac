/// Distance derivation and the diesel baseline.
pub mod diesel;
pub mod emissions;
/// Charging energy and tariff blending.
pub mod energy;
pub mod fleet;
pub mod inputs;
/// Site load and grid connection check.
pub mod load;
pub mod profile;
/// Reference curves and physical constants.
pub mod reference;
pub mod result;

pub use fleet::evaluate;
pub use inputs::{InputNotice, ModelInputs, RawInputs};
pub use result::ModelResult;
