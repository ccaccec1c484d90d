// SPDX-License-Identifier: MIT

//! External API adapters.
//!
//! One service per third-party capability. Each builds the outbound
//! request from typed parameters, calls the external endpoint, and
//! reshapes the reply, or fails with a safe user-facing error while the
//! detail goes to the log.

pub mod currency;
pub mod generation;
pub mod places;
pub mod translation;
pub mod weather;

pub use currency::CurrencyService;
pub use generation::{GenAiClient, GenerationService};
pub use places::PlacesService;
pub use translation::TranslationService;
pub use weather::WeatherService;
