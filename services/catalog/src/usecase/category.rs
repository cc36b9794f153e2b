use chrono::Utc;

use shelf_domain::id::{CategoryId, UserId};
use shelf_domain::kind::EntityKind;
use shelf_domain::lifecycle::Visibility;

use crate::domain::repository::{
    CategoryRepository, ProductRepository, SequencePort, UserRepository,
};
use crate::domain::types::{normalize_name, Category, CategoryDetail, CategoryPatch};
use crate::error::CatalogError;
use crate::usecase::sequence::next_id;

/// Resolve `creator_id` to a visible user.
pub(crate) async fn require_visible_user<U: UserRepository>(
    users: &U,
    creator_id: UserId,
) -> Result<(), CatalogError> {
    match users.find_by_id(creator_id).await? {
        Some(u) if u.visibility.is_visible() => Ok(()),
        _ => Err(CatalogError::InvalidReference(EntityKind::User)),
    }
}

// ── CreateCategory ───────────────────────────────────────────────────────────

pub struct CreateCategoryInput {
    pub name: String,
    pub description: Option<String>,
    pub creator_id: UserId,
}

pub struct CreateCategoryUseCase<C: CategoryRepository, U: UserRepository, S: SequencePort> {
    pub categories: C,
    pub users: U,
    pub sequence: S,
}

impl<C: CategoryRepository, U: UserRepository, S: SequencePort> CreateCategoryUseCase<C, U, S> {
    pub async fn execute(&self, input: CreateCategoryInput) -> Result<Category, CatalogError> {
        let name = normalize_name(&input.name)?;
        if self.categories.find_visible_by_name(&name).await?.is_some() {
            return Err(CatalogError::Conflict(EntityKind::Category));
        }
        require_visible_user(&self.users, input.creator_id).await?;

        let category = Category {
            id: next_id(&self.sequence).await?,
            name,
            description: input.description,
            product_ids: vec![],
            creator_id: input.creator_id,
            created_at: Utc::now(),
            visibility: Visibility::Visible,
        };
        self.categories.insert(&category).await?;
        tracing::info!(category_id = %category.id, creator_id = %category.creator_id, "category created");
        Ok(category)
    }
}

// ── GetCategoryDetail ────────────────────────────────────────────────────────

pub struct GetCategoryDetailUseCase<C: CategoryRepository, P: ProductRepository, U: UserRepository>
{
    pub categories: C,
    pub products: P,
    pub users: U,
}

impl<C: CategoryRepository, P: ProductRepository, U: UserRepository>
    GetCategoryDetailUseCase<C, P, U>
{
    /// Category with its creator and the visible products of its list, in list order.
    pub async fn execute(&self, id: CategoryId) -> Result<CategoryDetail, CatalogError> {
        let category = self
            .categories
            .find_by_id(id)
            .await?
            .ok_or(CatalogError::NotFound(EntityKind::Category))?;
        let creator = self.users.find_by_id(category.creator_id).await?;
        let products = self
            .products
            .find_by_ids(&category.product_ids)
            .await?
            .into_iter()
            .filter(|p| p.visibility.is_visible() && p.category_id == category.id)
            .collect();
        Ok(CategoryDetail {
            category,
            creator,
            products,
        })
    }
}

// ── UpdateCategory ───────────────────────────────────────────────────────────

pub struct UpdateCategoryUseCase<C: CategoryRepository> {
    pub categories: C,
}

impl<C: CategoryRepository> UpdateCategoryUseCase<C> {
    pub async fn execute(
        &self,
        id: CategoryId,
        mut patch: CategoryPatch,
    ) -> Result<Category, CatalogError> {
        if patch.is_empty() {
            return Err(CatalogError::InvalidInput("no fields to update"));
        }
        let mut category = self
            .categories
            .find_by_id(id)
            .await?
            .ok_or(CatalogError::NotFound(EntityKind::Category))?;
        if !category.visibility.accepts_updates() {
            return Err(CatalogError::Archived(EntityKind::Category));
        }

        if let Some(raw) = patch.name.take() {
            let name = normalize_name(&raw)?;
            if name != category.name {
                if let Some(holder) = self.categories.find_visible_by_name(&name).await? {
                    if holder.id != id {
                        return Err(CatalogError::Conflict(EntityKind::Category));
                    }
                }
            }
            patch.name = Some(name);
        }
        patch.apply_to(&mut category);

        // Archived between read and write.
        if !self.categories.update(&category).await? {
            return Err(CatalogError::Archived(EntityKind::Category));
        }
        tracing::info!(category_id = %id, "category updated");
        Ok(category)
    }
}
