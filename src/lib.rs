pub mod batch;
pub mod body;
pub mod collision;
pub mod constants;
pub mod frame;
pub mod geometry;
pub mod integrator;
pub mod kepler;
pub mod orbit;
pub mod pipeline;
pub mod reduction;
pub mod setup;
pub mod stability_errors;
pub mod system;
pub mod units;
pub mod validation;
