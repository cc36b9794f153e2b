use chrono::Utc;

use shelf_domain::id::{CategoryId, ProductId, UserId};
use shelf_domain::kind::EntityKind;
use shelf_domain::lifecycle::Visibility;

use crate::domain::repository::{
    CategoryRepository, ProductRepository, SequencePort, UserRepository,
};
use crate::domain::types::{
    normalize_name, validate_price, Product, ProductDetail, ProductPatch,
};
use crate::error::CatalogError;
use crate::usecase::category::require_visible_user;
use crate::usecase::integrity::link_product;
use crate::usecase::sequence::next_id;

// ── CreateProduct ────────────────────────────────────────────────────────────

pub struct CreateProductInput {
    pub name: String,
    pub description: Option<String>,
    pub image_ref: Option<String>,
    pub price: Option<f64>,
    pub category_id: CategoryId,
    pub creator_id: UserId,
}

pub struct CreateProductUseCase<
    P: ProductRepository,
    C: CategoryRepository,
    U: UserRepository,
    S: SequencePort,
> {
    pub products: P,
    pub categories: C,
    pub users: U,
    pub sequence: S,
}

impl<P, C, U, S> CreateProductUseCase<P, C, U, S>
where
    P: ProductRepository,
    C: CategoryRepository,
    U: UserRepository,
    S: SequencePort,
{
    /// Insert the product, then append it to its category's list.
    ///
    /// Succeeds once the product row is stored; a failed list append is
    /// logged and left for reconciliation.
    pub async fn execute(&self, input: CreateProductInput) -> Result<Product, CatalogError> {
        let name = normalize_name(&input.name)?;
        validate_price(input.price)?;
        if self.products.find_visible_by_name(&name).await?.is_some() {
            return Err(CatalogError::Conflict(EntityKind::Product));
        }
        match self.categories.find_by_id(input.category_id).await? {
            Some(c) if c.visibility.is_visible() => {}
            _ => return Err(CatalogError::InvalidReference(EntityKind::Category)),
        }
        require_visible_user(&self.users, input.creator_id).await?;

        let product = Product {
            id: next_id(&self.sequence).await?,
            name,
            description: input.description,
            image_ref: input.image_ref,
            price: input.price,
            category_id: input.category_id,
            creator_id: input.creator_id,
            created_at: Utc::now(),
            visibility: Visibility::Visible,
        };
        self.products.insert(&product).await?;
        let linked = link_product(&self.categories, &product).await;
        tracing::info!(
            product_id = %product.id,
            category_id = %product.category_id,
            linked,
            "product created"
        );
        Ok(product)
    }
}

// ── GetProductDetail ─────────────────────────────────────────────────────────

pub struct GetProductDetailUseCase<P: ProductRepository, C: CategoryRepository, U: UserRepository> {
    pub products: P,
    pub categories: C,
    pub users: U,
}

impl<P: ProductRepository, C: CategoryRepository, U: UserRepository>
    GetProductDetailUseCase<P, C, U>
{
    pub async fn execute(&self, id: ProductId) -> Result<ProductDetail, CatalogError> {
        let product = self
            .products
            .find_by_id(id)
            .await?
            .ok_or(CatalogError::NotFound(EntityKind::Product))?;
        let category = self.categories.find_by_id(product.category_id).await?;
        let creator = self.users.find_by_id(product.creator_id).await?;
        Ok(ProductDetail {
            product,
            category,
            creator,
        })
    }
}

// ── UpdateProduct ────────────────────────────────────────────────────────────

pub struct UpdateProductUseCase<P: ProductRepository> {
    pub products: P,
}

impl<P: ProductRepository> UpdateProductUseCase<P> {
    pub async fn execute(
        &self,
        id: ProductId,
        mut patch: ProductPatch,
    ) -> Result<Product, CatalogError> {
        if patch.is_empty() {
            return Err(CatalogError::InvalidInput("no fields to update"));
        }
        validate_price(patch.price)?;
        let mut product = self
            .products
            .find_by_id(id)
            .await?
            .ok_or(CatalogError::NotFound(EntityKind::Product))?;
        if !product.visibility.accepts_updates() {
            return Err(CatalogError::Archived(EntityKind::Product));
        }

        if let Some(raw) = patch.name.take() {
            let name = normalize_name(&raw)?;
            if name != product.name {
                if let Some(holder) = self.products.find_visible_by_name(&name).await? {
                    if holder.id != id {
                        return Err(CatalogError::Conflict(EntityKind::Product));
                    }
                }
            }
            patch.name = Some(name);
        }
        patch.apply_to(&mut product);

        if !self.products.update(&product).await? {
            return Err(CatalogError::Archived(EntityKind::Product));
        }
        tracing::info!(product_id = %id, "product updated");
        Ok(product)
    }
}
