//! Core types and configuration for fargen.
//!
//! This crate defines the deployment topology ([`ProjectConfig`],
//! [`EcsTask`], [`ContainerDeployment`], [`DockerImage`]), the
//! `fargen.toml` manifest schema ([`Manifest`]), and shared error types.

pub mod config;
pub mod error;
pub mod model;

pub use config::{ContainerManifest, Manifest, ProjectManifest, TaskManifest};
pub use error::{Error, Result};
pub use model::{
    CicdPipeline, ContainerDeployment, DockerImage, EcsTask, ProjectConfig, TaskKind,
};
