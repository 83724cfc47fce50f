// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Command Processor (spec §4.6): idempotent, lease-aware dispatch of
//! inbound commands to a [`context::CommandContext`] implementation.

pub mod context;
pub mod legacy;
pub mod processor;

#[cfg(any(test, feature = "test-support"))]
pub mod fake;

pub use context::{CommandContext, CommandError, CommandOutcome};
pub use legacy::{translate_legacy, LegacyEnvelope};
pub use processor::{local_command, CommandProcessor, HandleOutcome};

#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeCommandContext;
