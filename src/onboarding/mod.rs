//! The scripted first-contact dialogue.
//!
//! A fixed sequence of questions collects a `CaregiverProfile`. Each answer
//! is applied by `OnboardingController::next`, a pure function of the current
//! step and the raw input. Once the concern question is answered the session
//! switches to free chat for good.

pub mod controller;
pub mod model;
pub mod prompts;
pub mod state;

pub use controller::{OnboardingController, OnboardingEffect, Transition};
pub use model::{CaregiverProfile, Persona, RoleClass, classify_persona, classify_role};
pub use state::{OnboardingStep, Progress};
