// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Domain
//!
//! # Architecture
//!
//! - **Layer:** Domain Layer
//! - **Purpose:** Grid model, solver rules and repository contracts

pub mod grid;
pub mod task;
pub mod transform;
pub mod solver;
pub mod submission;
pub mod scoring;
pub mod analysis;
pub mod attribution;
pub mod events;
pub mod solver_config;
pub mod repository;
