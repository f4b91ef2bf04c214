// ABOUTME: Error types for the recipe decision engine
// ABOUTME: Re-exports the foundation error taxonomy from pantry-core
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Error Handling
//!
//! `AppError` is what the engine facade returns. Inside the pipeline,
//! collaborator failures are `CollaboratorError` values and candidate-level
//! problems are `EngineError` values; neither aborts a request.

pub use pantry_core::errors::{AppError, AppResult, CollaboratorError, EngineError, ErrorCode};
