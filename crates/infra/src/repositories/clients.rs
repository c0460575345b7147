use guardpost_clients::{
    Branch, BranchId, BranchRepository, Client, ClientId, ClientRepository, ClientStatus,
    NewBranch, NewClient,
};
use guardpost_core::{DomainError, DomainResult, OrgId, RecordId};

use crate::tenant_store::{InMemoryTenantStore, TenantStore};

/// In-memory client register.
#[derive(Debug, Default)]
pub struct InMemoryClientRepository {
    store: InMemoryTenantStore<ClientId, Client>,
}

impl InMemoryClientRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ClientRepository for InMemoryClientRepository {
    fn create(&self, org_id: OrgId, new: NewClient) -> DomainResult<Client> {
        let duplicate = self
            .store
            .list(org_id)
            .into_iter()
            .any(|c| !c.deleted && c.name.eq_ignore_ascii_case(&new.name));
        if duplicate {
            return Err(DomainError::conflict(format!(
                "client '{}' already exists",
                new.name
            )));
        }

        let client = Client {
            id: ClientId::new(RecordId::new()),
            org_id,
            name: new.name,
            contact_person: new.contact_person,
            email: new.email,
            phone: new.phone,
            status: ClientStatus::Active,
            deleted: false,
        };
        self.store.upsert(org_id, client.id, client.clone());
        Ok(client)
    }

    fn update(&self, org_id: OrgId, client: Client) -> DomainResult<Client> {
        if self.store.get(org_id, &client.id).is_none() {
            return Err(DomainError::NotFound);
        }
        self.store.upsert(org_id, client.id, client.clone());
        Ok(client)
    }

    fn get(&self, org_id: OrgId, id: ClientId) -> DomainResult<Client> {
        match self.store.get(org_id, &id) {
            Some(client) if !client.deleted => Ok(client),
            _ => Err(DomainError::NotFound),
        }
    }

    fn list(&self, org_id: OrgId) -> DomainResult<Vec<Client>> {
        let mut clients: Vec<Client> = self
            .store
            .list(org_id)
            .into_iter()
            .filter(|c| !c.deleted)
            .collect();
        clients.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(clients)
    }
}

/// In-memory branch register.
#[derive(Debug, Default)]
pub struct InMemoryBranchRepository {
    store: InMemoryTenantStore<BranchId, Branch>,
}

impl InMemoryBranchRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BranchRepository for InMemoryBranchRepository {
    fn create(&self, org_id: OrgId, new: NewBranch) -> DomainResult<Branch> {
        let branch = Branch {
            id: BranchId::new(RecordId::new()),
            org_id,
            client_id: new.client_id,
            name: new.name,
            location: new.location,
            deleted: false,
        };
        self.store.upsert(org_id, branch.id, branch.clone());
        Ok(branch)
    }

    fn update(&self, org_id: OrgId, branch: Branch) -> DomainResult<Branch> {
        if self.store.get(org_id, &branch.id).is_none() {
            return Err(DomainError::NotFound);
        }
        self.store.upsert(org_id, branch.id, branch.clone());
        Ok(branch)
    }

    fn get(&self, org_id: OrgId, id: BranchId) -> DomainResult<Branch> {
        match self.store.get(org_id, &id) {
            Some(branch) if !branch.deleted => Ok(branch),
            _ => Err(DomainError::NotFound),
        }
    }

    fn list(&self, org_id: OrgId) -> DomainResult<Vec<Branch>> {
        let mut branches: Vec<Branch> = self
            .store
            .list(org_id)
            .into_iter()
            .filter(|b| !b.deleted)
            .collect();
        branches.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(branches)
    }

    fn list_for_client(&self, org_id: OrgId, client_id: ClientId) -> DomainResult<Vec<Branch>> {
        let mut branches = self.list(org_id)?;
        branches.retain(|b| b.client_id == client_id);
        Ok(branches)
    }
}
