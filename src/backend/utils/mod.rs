pub mod guards;
pub mod ids;
pub mod logging;
pub mod rng;
pub mod time;
