// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod fitbit;
pub mod secrets;
pub mod steps;
pub mod token_store;

pub use fitbit::FitbitClient;
pub use secrets::{EnvSecretProvider, SecretProvider, StaticSecretProvider};
pub use steps::StepsService;
pub use token_store::TokenStore;
