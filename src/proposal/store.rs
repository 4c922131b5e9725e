//! Proposal storage
//!
//! In-memory store for proposal working copies.

use crate::error::{not_found_error, AppError};
use crate::proposal::{Proposal, ProposalSummary};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Thread-safe proposal store
pub struct ProposalStore {
    proposals: Arc<RwLock<HashMap<Uuid, Proposal>>>,
}

impl ProposalStore {
    pub fn new() -> Self {
        Self {
            proposals: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Insert a new proposal
    pub async fn create(&self, mut proposal: Proposal) -> Result<Proposal, AppError> {
        let mut proposals = self.proposals.write().await;
        if proposals.contains_key(&proposal.id) {
            return Err(AppError::Conflict(format!("Proposal {} already exists", proposal.id)));
        }
        proposal.normalize_order();
        proposals.insert(proposal.id, proposal.clone());
        Ok(proposal)
    }

    /// Get a proposal by ID
    pub async fn get(&self, id: Uuid) -> Result<Proposal, AppError> {
        let proposals = self.proposals.read().await;
        proposals
            .get(&id)
            .cloned()
            .ok_or_else(|| not_found_error(format!("Proposal {} not found", id)))
    }

    /// Dashboard listing, most recently updated first
    pub async fn list(&self) -> Vec<ProposalSummary> {
        let proposals = self.proposals.read().await;
        let mut summaries: Vec<ProposalSummary> = proposals.values().map(Proposal::summary).collect();
        summaries.sort_by(|a, b| b.updated_at.cmp(&a.updated_at).then_with(|| a.title.cmp(&b.title)));
        summaries
    }

    /// Mutate a proposal in place under the write lock
    pub async fn update<F, T>(&self, id: Uuid, mutate: F) -> Result<(Proposal, T), AppError>
    where
        F: FnOnce(&mut Proposal) -> Result<T, AppError>,
    {
        let mut proposals = self.proposals.write().await;
        let proposal = proposals
            .get_mut(&id)
            .ok_or_else(|| not_found_error(format!("Proposal {} not found", id)))?;

        let mut draft = proposal.clone();
        let value = mutate(&mut draft)?;
        draft.touch();
        *proposal = draft;
        Ok((proposal.clone(), value))
    }

    /// Delete a proposal
    pub async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        let mut proposals = self.proposals.write().await;
        proposals
            .remove(&id)
            .map(|_| ())
            .ok_or_else(|| not_found_error(format!("Proposal {} not found", id)))
    }

    /// Get proposal count
    pub async fn count(&self) -> usize {
        let proposals = self.proposals.read().await;
        proposals.len()
    }
}

impl Default for ProposalStore {
    fn default() -> Self {
        Self::new()
    }
}
