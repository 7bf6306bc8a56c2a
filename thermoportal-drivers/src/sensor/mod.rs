//! Temperature sensor drivers

pub mod adt7410;

pub use adt7410::Adt7410;
