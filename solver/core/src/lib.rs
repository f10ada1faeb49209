// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! arcsmith core
//!
//! Grid model, transformation heuristics, ARC Prize submission schema and
//! scoring, plus the file-backed dataset loader used by the CLI.
//!
//! # Architecture
//!
//! - **Layer:** Core System
//! - **Purpose:** Domain types in [`domain`], orchestration in [`application`],
//!   I/O in [`infrastructure`]

pub mod domain;
pub mod application;
pub mod infrastructure;

pub use domain::*;
