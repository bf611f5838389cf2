pub mod band;

pub use band::{Band, CreateBand};
