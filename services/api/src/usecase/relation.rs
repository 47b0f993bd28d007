use crate::domain::relation::Relation;
use crate::domain::repository::RelationRepository;
use crate::error::ApiError;

// ── AddRelation ──────────────────────────────────────────────────────────────

pub struct AddRelationUseCase<R: RelationRepository> {
    pub repo: R,
}

impl<R: RelationRepository> AddRelationUseCase<R> {
    pub async fn execute(&self, relation: Relation) -> Result<(), ApiError> {
        if relation.is_self_subscription() {
            return Err(ApiError::SelfSubscription);
        }
        if !self.repo.target_exists(&relation).await? {
            return Err(relation.missing_target_error());
        }
        let inserted = self.repo.insert(&relation).await?;
        if !inserted {
            return Err(ApiError::DuplicateRelation(relation.kind()));
        }
        tracing::debug!(kind = %relation.kind(), "relation added");
        Ok(())
    }
}

// ── RemoveRelation ───────────────────────────────────────────────────────────

pub struct RemoveRelationUseCase<R: RelationRepository> {
    pub repo: R,
}

impl<R: RelationRepository> RemoveRelationUseCase<R> {
    pub async fn execute(&self, relation: Relation) -> Result<(), ApiError> {
        if !self.repo.target_exists(&relation).await? {
            return Err(relation.missing_target_error());
        }
        let deleted = self.repo.delete(&relation).await?;
        if !deleted {
            return Err(ApiError::RelationNotFound(relation.kind()));
        }
        tracing::debug!(kind = %relation.kind(), "relation removed");
        Ok(())
    }
}
