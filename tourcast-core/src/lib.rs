pub mod linking;
pub mod model;
pub mod ranking;
pub mod tour;
pub mod util;
