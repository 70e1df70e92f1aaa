// /////////////////////////////////////////////////////////////////////////////
// Canvas Reactive Pipeline Framework
// SPDX-License-Identifier: BSD-3-Clause
// /////////////////////////////////////////////////////////////////////////////

//! # Canvas Bootstrap
//!
//! Process entry point for the `canvas` binary: the thin `compile`/`run`
//! CLI surface, signal handling and graceful shutdown, and exit-code
//! mapping. The spec treats CLI entry points as an external, contract-only
//! collaborator — this crate satisfies that contract
//! without growing UX beyond it.
//!
//! ## Module Structure
//!
//! - [`cli`] — `clap`-based parsing plus security validation of every
//!   path/string argument before it reaches compiler or runtime code.
//! - [`logger`] — global `tracing` subscriber initialization.
//! - [`shutdown`] — `SIGTERM`/`SIGINT`/`SIGHUP` → cancellation token wiring.
//! - [`exit_code`] — `CanvasError` category → process exit code mapping.

pub mod cli;
pub mod exit_code;
pub mod logger;
pub mod shutdown;
