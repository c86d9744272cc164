// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod credentials;
pub mod fitbit;
pub mod report;
pub mod tokens;

pub use credentials::Credentials;
pub use fitbit::{DailySummary, FitbitError};
pub use report::{InvocationResponse, StepsReport, UserSteps};
pub use tokens::{TokenDocument, TokenPair};
