use std::collections::HashMap;

use chrono::NaiveDate;

use guardpost_clients::BranchId;
use guardpost_core::{DomainError, DomainResult, OrgId, RecordId};
use guardpost_deployments::{
    Deployment, DeploymentId, DeploymentRepository, NewDeployment, Shift, ShiftMatrixRow,
};

use crate::tenant_store::{InMemoryTenantStore, TenantStore};

/// In-memory deployment roster.
#[derive(Debug, Default)]
pub struct InMemoryDeploymentRepository {
    store: InMemoryTenantStore<DeploymentId, Deployment>,
}

impl InMemoryDeploymentRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DeploymentRepository for InMemoryDeploymentRepository {
    fn create(&self, org_id: OrgId, new: NewDeployment) -> DomainResult<Deployment> {
        let deployment = Deployment {
            id: DeploymentId::new(RecordId::new()),
            org_id,
            guard_id: new.guard_id,
            branch_id: new.branch_id,
            shift: new.shift,
            starts_on: new.starts_on,
            ends_on: new.ends_on,
            deleted: false,
        };
        self.store.upsert(org_id, deployment.id, deployment.clone());
        Ok(deployment)
    }

    fn update(&self, org_id: OrgId, deployment: Deployment) -> DomainResult<Deployment> {
        if self.store.get(org_id, &deployment.id).is_none() {
            return Err(DomainError::NotFound);
        }
        self.store.upsert(org_id, deployment.id, deployment.clone());
        Ok(deployment)
    }

    fn get(&self, org_id: OrgId, id: DeploymentId) -> DomainResult<Deployment> {
        match self.store.get(org_id, &id) {
            Some(deployment) if !deployment.deleted => Ok(deployment),
            _ => Err(DomainError::NotFound),
        }
    }

    fn list(&self, org_id: OrgId) -> DomainResult<Vec<Deployment>> {
        let mut deployments: Vec<Deployment> = self
            .store
            .list(org_id)
            .into_iter()
            .filter(|d| !d.deleted)
            .collect();
        deployments.sort_by_key(|d| d.starts_on);
        Ok(deployments)
    }

    fn shift_counts(&self, org_id: OrgId, date: NaiveDate) -> DomainResult<Vec<ShiftMatrixRow>> {
        // One grouped pass over the active roster.
        let mut by_branch: HashMap<BranchId, ShiftMatrixRow> = HashMap::new();

        for deployment in self.store.list(org_id) {
            if !deployment.covers(date) {
                continue;
            }
            let row = by_branch
                .entry(deployment.branch_id)
                .or_insert_with(|| ShiftMatrixRow {
                    branch_id: deployment.branch_id,
                    day: 0,
                    night: 0,
                    relief: 0,
                });
            match deployment.shift {
                Shift::Day => row.day += 1,
                Shift::Night => row.night += 1,
                Shift::Relief => row.relief += 1,
            }
        }

        let mut rows: Vec<ShiftMatrixRow> = by_branch.into_values().collect();
        rows.sort_by_key(|r| r.branch_id.to_string());
        Ok(rows)
    }
}
