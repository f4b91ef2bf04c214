// ABOUTME: Core types and constants for the PantryChef recipe decision engine
// ABOUTME: Foundation crate with error handling, domain models, and constants
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![deny(unsafe_code)]

//! # Pantry Core
//!
//! Foundation crate providing shared types and constants for the `PantryChef`
//! recipe decision engine. This crate is designed to change infrequently, enabling
//! incremental compilation benefits in the workspace.
//!
//! ## Modules
//!
//! - **errors**: Unified error handling with `AppError`, `ErrorCode`, and the engine error taxonomy
//! - **constants**: Engine-wide constants organized by domain
//! - **models**: Request-scoped domain models (candidates, verdicts, tiers, constraints, quota)

/// Unified error handling system with standard error codes
pub mod errors;

/// Engine constants organized by domain
pub mod constants;

/// Core data models (`Candidate`, `SafetyOutcome`, `ConfidenceTier`, `UserConstraints`, etc.)
pub mod models;
