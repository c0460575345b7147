//! `guardpost-deployments` — guard-to-branch shift assignments.

pub mod deployment;

pub use deployment::{
    Deployment, DeploymentChange, DeploymentId, DeploymentRepository, NewDeployment, Shift,
    ShiftMatrixRow,
};
