//! Hardware driver implementations for Thermoportal
//!
//! This crate provides implementations of the traits defined in
//! `thermoportal-core` for specific hardware components.

#![no_std]
#![deny(unsafe_code)]

#[cfg(test)]
extern crate std;

pub mod sensor;
