//! HTTP request handlers for the SmartCar API
//!
//! Handlers only extract path/body values and delegate to the translator;
//! they hold no state of their own.

pub mod vehicles;
