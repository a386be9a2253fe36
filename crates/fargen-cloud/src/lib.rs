//! Shell toolchain invocation for fargen.
//!
//! The generation pipeline only writes files; actually building images and
//! provisioning infrastructure happens through the tools the generated
//! files target: `docker-compose`, `terraform`, and `make`. This crate
//! wraps those invocations behind an executor trait so command plumbing
//! stays testable without the tools installed.

pub mod client;
pub mod command;
pub mod executor;

pub use client::ToolchainClient;
pub use command::CommandError;
pub use executor::{RealExecutor, ShellExecutor};
