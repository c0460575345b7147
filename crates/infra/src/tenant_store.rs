use std::collections::HashMap;
use std::hash::Hash;
use std::sync::Arc;
use std::sync::RwLock;

use guardpost_core::OrgId;

/// Org-isolated key/value store abstraction backing the entity repositories.
///
/// Isolation is structural: every key is paired with the org id, so a read or
/// write for one org can never touch another org's rows.
pub trait TenantStore<K, V>: Send + Sync {
    fn get(&self, org_id: OrgId, key: &K) -> Option<V>;
    fn upsert(&self, org_id: OrgId, key: K, value: V);
    fn list(&self, org_id: OrgId) -> Vec<V>;
    /// Drop all records for one org (tenant offboarding, test resets).
    fn clear_org(&self, org_id: OrgId);
}

impl<K, V, S> TenantStore<K, V> for Arc<S>
where
    S: TenantStore<K, V> + ?Sized,
{
    fn get(&self, org_id: OrgId, key: &K) -> Option<V> {
        (**self).get(org_id, key)
    }

    fn upsert(&self, org_id: OrgId, key: K, value: V) {
        (**self).upsert(org_id, key, value)
    }

    fn list(&self, org_id: OrgId) -> Vec<V> {
        (**self).list(org_id)
    }

    fn clear_org(&self, org_id: OrgId) {
        (**self).clear_org(org_id)
    }
}

/// In-memory org-isolated store.
#[derive(Debug)]
pub struct InMemoryTenantStore<K, V> {
    inner: RwLock<HashMap<(OrgId, K), V>>,
}

impl<K, V> InMemoryTenantStore<K, V> {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(HashMap::new()),
        }
    }
}

impl<K, V> Default for InMemoryTenantStore<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> TenantStore<K, V> for InMemoryTenantStore<K, V>
where
    K: Clone + Eq + Hash + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    fn get(&self, org_id: OrgId, key: &K) -> Option<V> {
        let map = self.inner.read().ok()?;
        map.get(&(org_id, key.clone())).cloned()
    }

    fn upsert(&self, org_id: OrgId, key: K, value: V) {
        if let Ok(mut map) = self.inner.write() {
            map.insert((org_id, key), value);
        }
    }

    fn list(&self, org_id: OrgId) -> Vec<V> {
        let map = match self.inner.read() {
            Ok(m) => m,
            Err(_) => return vec![],
        };

        map.iter()
            .filter_map(|((o, _k), v)| if *o == org_id { Some(v.clone()) } else { None })
            .collect()
    }

    fn clear_org(&self, org_id: OrgId) {
        if let Ok(mut map) = self.inner.write() {
            map.retain(|(o, _k), _v| *o != org_id);
        }
    }
}
