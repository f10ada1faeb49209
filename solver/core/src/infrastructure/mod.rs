// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0
//! Infrastructure
//!
//! # Architecture
//!
//! - **Layer:** Infrastructure Layer
//! - **Purpose:** Dataset files, submission output and in-process event streaming

pub mod dataset;
pub mod event_bus;
