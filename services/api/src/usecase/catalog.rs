use crate::domain::repository::{CatalogImportRepository, CatalogRepository};
use crate::domain::types::{Ingredient, NewIngredient, NewTag, Tag, validate_color};
use crate::error::ApiError;

// ── Tags ─────────────────────────────────────────────────────────────────────

pub struct GetTagsUseCase<R: CatalogRepository> {
    pub repo: R,
}

impl<R: CatalogRepository> GetTagsUseCase<R> {
    pub async fn execute(&self) -> Result<Vec<Tag>, ApiError> {
        self.repo.list_tags().await
    }
}

pub struct GetTagUseCase<R: CatalogRepository> {
    pub repo: R,
}

impl<R: CatalogRepository> GetTagUseCase<R> {
    pub async fn execute(&self, id: i32) -> Result<Tag, ApiError> {
        self.repo.find_tag(id).await?.ok_or(ApiError::TagNotFound)
    }
}

// ── Ingredients ──────────────────────────────────────────────────────────────

pub struct GetIngredientsUseCase<R: CatalogRepository> {
    pub repo: R,
}

impl<R: CatalogRepository> GetIngredientsUseCase<R> {
    pub async fn execute(&self, name_prefix: Option<&str>) -> Result<Vec<Ingredient>, ApiError> {
        self.repo.list_ingredients(name_prefix.map(str::trim)).await
    }
}

pub struct GetIngredientUseCase<R: CatalogRepository> {
    pub repo: R,
}

impl<R: CatalogRepository> GetIngredientUseCase<R> {
    pub async fn execute(&self, id: i32) -> Result<Ingredient, ApiError> {
        self.repo
            .find_ingredient(id)
            .await?
            .ok_or(ApiError::IngredientNotFound)
    }
}

// ── Import ───────────────────────────────────────────────────────────────────

/// Outcome of a catalog import run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportReport {
    pub inserted: usize,
    pub skipped: usize,
}

impl ImportReport {
    fn record(&mut self, inserted: bool) {
        if inserted {
            self.inserted += 1;
        } else {
            self.skipped += 1;
        }
    }
}

pub struct ImportTagsUseCase<R: CatalogImportRepository> {
    pub repo: R,
}

impl<R: CatalogImportRepository> ImportTagsUseCase<R> {
    /// Every row is validated before the first insert; existing tags are skipped.
    pub async fn execute(&self, tags: Vec<NewTag>) -> Result<ImportReport, ApiError> {
        for tag in &tags {
            if tag.name.trim().is_empty() {
                return Err(ApiError::validation("name", "tag name must not be empty"));
            }
            if tag.slug.trim().is_empty() {
                return Err(ApiError::validation(
                    "slug",
                    format!("tag {:?} has an empty slug", tag.name),
                ));
            }
            if !validate_color(&tag.color) {
                return Err(ApiError::validation(
                    "color",
                    format!("tag {:?} has invalid color {:?}", tag.name, tag.color),
                ));
            }
        }

        let mut report = ImportReport::default();
        for tag in &tags {
            report.record(self.repo.insert_tag(tag).await?);
        }
        Ok(report)
    }
}

pub struct ImportIngredientsUseCase<R: CatalogImportRepository> {
    pub repo: R,
}

impl<R: CatalogImportRepository> ImportIngredientsUseCase<R> {
    /// Every row is validated before the first insert; existing
    /// (name, unit) pairs are skipped.
    pub async fn execute(
        &self,
        ingredients: Vec<NewIngredient>,
    ) -> Result<ImportReport, ApiError> {
        for ingredient in &ingredients {
            if ingredient.name.trim().is_empty() {
                return Err(ApiError::validation(
                    "name",
                    "ingredient name must not be empty",
                ));
            }
            if ingredient.measurement_unit.trim().is_empty() {
                return Err(ApiError::validation(
                    "measurement_unit",
                    format!("ingredient {:?} has no measurement unit", ingredient.name),
                ));
            }
        }

        let mut report = ImportReport::default();
        for ingredient in &ingredients {
            report.record(self.repo.insert_ingredient(ingredient).await?);
        }
        Ok(report)
    }
}
