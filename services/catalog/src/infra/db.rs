use std::collections::HashMap;

use anyhow::Context as _;
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr,
    EntityTrait, FromQueryResult, Order, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
    Select, SqlErr, Statement,
    sea_query::Expr,
};

use shelf_core::sea_ext::contains_ignore_case;
use shelf_domain::id::{CategoryId, ProductId, UserId};
use shelf_domain::kind::EntityKind;
use shelf_domain::lifecycle::Visibility;
use shelf_domain::pagination::Sort;
use shelf_domain::query::ListQuery;
use shelf_domain::user::UserRole;
use shelf_catalog_schema::{categories, counters, products, users};

use crate::domain::repository::{
    CategoryRepository, ListRepository, ProductRepository, SequencePort, UserRepository,
};
use crate::domain::types::{
    Category, CategorySortField, Product, ProductSortField, User, UserSortField,
};
use crate::error::CatalogError;

// ── Shared helpers ───────────────────────────────────────────────────────────

fn order(sort: Sort) -> Order {
    match sort {
        Sort::Asc => Order::Asc,
        Sort::Desc => Order::Desc,
    }
}

/// Order by `primary` then by `id` in the same direction.
fn ordered<E: EntityTrait>(
    select: Select<E>,
    primary: Option<E::Column>,
    id: E::Column,
    sort: Sort,
) -> Select<E> {
    let select = match primary {
        Some(col) => select.order_by(col, order(sort)),
        None => select,
    };
    select.order_by(id, order(sort))
}

/// Map a write failure: unique-index violations become `Conflict`, the rest storage errors.
fn write_error(err: DbErr, kind: EntityKind, what: &'static str) -> CatalogError {
    if let Some(SqlErr::UniqueConstraintViolation(_)) = err.sql_err() {
        return CatalogError::Conflict(kind);
    }
    CatalogError::StorageUnavailable(anyhow::Error::new(err).context(what))
}

fn decode_visibility(raw: &str) -> anyhow::Result<Visibility> {
    raw.parse()
        .with_context(|| format!("decode stored visibility {raw:?}"))
}

fn db_id(seq: u64) -> i64 {
    seq as i64
}

const VISIBLE: &str = "visible";
const ARCHIVED: &str = "archived";

// ── Sequence ─────────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbSequence {
    pub db: DatabaseConnection,
}

#[derive(Debug, FromQueryResult)]
struct SeqRow {
    seq: i64,
}

impl SequencePort for DbSequence {
    async fn next(&self, kind: EntityKind) -> Result<u64, CatalogError> {
        // Single statement: creates the counter at 1 or increments it, under the row lock.
        let row = SeqRow::find_by_statement(Statement::from_sql_and_values(
            self.db.get_database_backend(),
            r#"
            INSERT INTO counters (kind, seq) VALUES ($1, 1)
            ON CONFLICT (kind) DO UPDATE SET seq = counters.seq + 1
            RETURNING seq
            "#,
            [kind.as_str().into()],
        ))
        .one(&self.db)
        .await
        .context("increment counter")?
        .context("counter upsert returned no row")?;
        Ok(row.seq as u64)
    }

    async fn current(&self, kind: EntityKind) -> Result<u64, CatalogError> {
        let model = counters::Entity::find_by_id(kind.as_str())
            .one(&self.db)
            .await
            .context("read counter")?;
        Ok(model.map_or(0, |m| m.seq as u64))
    }
}

// ── User repository ──────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbUserRepository {
    pub db: DatabaseConnection,
}

impl DbUserRepository {
    fn visible(search: Option<&str>) -> Select<users::Entity> {
        let mut select = users::Entity::find().filter(users::Column::Visibility.eq(VISIBLE));
        if let Some(needle) = search {
            select = select.filter(contains_ignore_case(users::Column::Username, needle));
        }
        select
    }
}

impl ListRepository<UserSortField> for DbUserRepository {
    type Item = User;

    async fn list_visible(
        &self,
        query: &ListQuery<UserSortField>,
    ) -> Result<Vec<User>, CatalogError> {
        let primary = match query.sort_field {
            UserSortField::CreatedAt => Some(users::Column::CreatedAt),
            UserSortField::Username => Some(users::Column::Username),
            UserSortField::Id => None,
        };
        let models = ordered(
            Self::visible(query.search.as_deref()),
            primary,
            users::Column::Id,
            query.sort,
        )
        .offset(query.page.offset())
        .limit(query.page.limit())
        .all(&self.db)
        .await
        .context("list users")?;
        models.into_iter().map(user_from_model).collect()
    }

    async fn count_visible(&self, search: Option<&str>) -> Result<u64, CatalogError> {
        let count = Self::visible(search)
            .count(&self.db)
            .await
            .context("count users")?;
        Ok(count)
    }
}

impl UserRepository for DbUserRepository {
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, CatalogError> {
        let model = users::Entity::find_by_id(db_id(id.0))
            .one(&self.db)
            .await
            .context("find user by id")?;
        model.map(user_from_model).transpose()
    }

    async fn find_visible_by_username(
        &self,
        username: &str,
    ) -> Result<Option<User>, CatalogError> {
        let model = users::Entity::find()
            .filter(users::Column::Username.eq(username))
            .filter(users::Column::Visibility.eq(VISIBLE))
            .one(&self.db)
            .await
            .context("find user by username")?;
        model.map(user_from_model).transpose()
    }

    async fn insert(&self, user: &User) -> Result<(), CatalogError> {
        users::ActiveModel {
            id: Set(db_id(user.id.0)),
            username: Set(user.username.clone()),
            email: Set(user.email.clone()),
            avatar: Set(user.avatar.clone()),
            password_hash: Set(user.password_hash.clone()),
            role: Set(user.role.as_str().to_owned()),
            visibility: Set(user.visibility.as_str().to_owned()),
            created_at: Set(user.created_at),
        }
        .insert(&self.db)
        .await
        .map_err(|e| write_error(e, EntityKind::User, "insert user"))?;
        Ok(())
    }

    async fn mark_archived(&self, id: UserId) -> Result<bool, CatalogError> {
        let result = users::Entity::update_many()
            .col_expr(users::Column::Visibility, Expr::value(ARCHIVED))
            .filter(users::Column::Id.eq(db_id(id.0)))
            .filter(users::Column::Visibility.eq(VISIBLE))
            .exec(&self.db)
            .await
            .context("archive user")?;
        Ok(result.rows_affected > 0)
    }
}

fn user_from_model(model: users::Model) -> Result<User, CatalogError> {
    Ok(User {
        id: UserId(model.id as u64),
        username: model.username,
        email: model.email,
        avatar: model.avatar,
        password_hash: model.password_hash,
        role: model
            .role
            .parse::<UserRole>()
            .context("decode stored user role")?,
        created_at: model.created_at,
        visibility: decode_visibility(&model.visibility)?,
    })
}

// ── Category repository ──────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbCategoryRepository {
    pub db: DatabaseConnection,
}

impl DbCategoryRepository {
    fn visible(search: Option<&str>) -> Select<categories::Entity> {
        let mut select =
            categories::Entity::find().filter(categories::Column::Visibility.eq(VISIBLE));
        if let Some(needle) = search {
            select = select.filter(contains_ignore_case(categories::Column::Name, needle));
        }
        select
    }

    async fn execute_list_edit(
        &self,
        sql: &str,
        id: CategoryId,
        product_id: ProductId,
        what: &'static str,
    ) -> Result<(), CatalogError> {
        self.db
            .execute(Statement::from_sql_and_values(
                self.db.get_database_backend(),
                sql,
                [db_id(product_id.0).into(), db_id(id.0).into()],
            ))
            .await
            .context(what)?;
        Ok(())
    }
}

impl ListRepository<CategorySortField> for DbCategoryRepository {
    type Item = Category;

    async fn list_visible(
        &self,
        query: &ListQuery<CategorySortField>,
    ) -> Result<Vec<Category>, CatalogError> {
        let primary = match query.sort_field {
            CategorySortField::CreatedAt => Some(categories::Column::CreatedAt),
            CategorySortField::Name => Some(categories::Column::Name),
            CategorySortField::Id => None,
        };
        let models = ordered(
            Self::visible(query.search.as_deref()),
            primary,
            categories::Column::Id,
            query.sort,
        )
        .offset(query.page.offset())
        .limit(query.page.limit())
        .all(&self.db)
        .await
        .context("list categories")?;
        models.into_iter().map(category_from_model).collect()
    }

    async fn count_visible(&self, search: Option<&str>) -> Result<u64, CatalogError> {
        let count = Self::visible(search)
            .count(&self.db)
            .await
            .context("count categories")?;
        Ok(count)
    }
}

impl CategoryRepository for DbCategoryRepository {
    async fn find_by_id(&self, id: CategoryId) -> Result<Option<Category>, CatalogError> {
        let model = categories::Entity::find_by_id(db_id(id.0))
            .one(&self.db)
            .await
            .context("find category by id")?;
        model.map(category_from_model).transpose()
    }

    async fn find_visible_by_name(&self, name: &str) -> Result<Option<Category>, CatalogError> {
        let model = categories::Entity::find()
            .filter(categories::Column::Name.eq(name))
            .filter(categories::Column::Visibility.eq(VISIBLE))
            .one(&self.db)
            .await
            .context("find category by name")?;
        model.map(category_from_model).transpose()
    }

    async fn list_all(&self) -> Result<Vec<Category>, CatalogError> {
        let models = categories::Entity::find()
            .order_by_asc(categories::Column::Id)
            .all(&self.db)
            .await
            .context("list all categories")?;
        models.into_iter().map(category_from_model).collect()
    }

    async fn insert(&self, category: &Category) -> Result<(), CatalogError> {
        categories::ActiveModel {
            id: Set(db_id(category.id.0)),
            name: Set(category.name.clone()),
            description: Set(category.description.clone()),
            product_ids: Set(category.product_ids.iter().map(|p| db_id(p.0)).collect()),
            creator_id: Set(db_id(category.creator_id.0)),
            visibility: Set(category.visibility.as_str().to_owned()),
            created_at: Set(category.created_at),
        }
        .insert(&self.db)
        .await
        .map_err(|e| write_error(e, EntityKind::Category, "insert category"))?;
        Ok(())
    }

    async fn update(&self, category: &Category) -> Result<bool, CatalogError> {
        let result = categories::Entity::update_many()
            .col_expr(categories::Column::Name, Expr::value(category.name.clone()))
            .col_expr(
                categories::Column::Description,
                Expr::value(category.description.clone()),
            )
            .filter(categories::Column::Id.eq(db_id(category.id.0)))
            .filter(categories::Column::Visibility.eq(VISIBLE))
            .exec(&self.db)
            .await
            .map_err(|e| write_error(e, EntityKind::Category, "update category"))?;
        Ok(result.rows_affected > 0)
    }

    async fn mark_archived(&self, id: CategoryId) -> Result<bool, CatalogError> {
        let result = categories::Entity::update_many()
            .col_expr(categories::Column::Visibility, Expr::value(ARCHIVED))
            .filter(categories::Column::Id.eq(db_id(id.0)))
            .filter(categories::Column::Visibility.eq(VISIBLE))
            .exec(&self.db)
            .await
            .context("archive category")?;
        Ok(result.rows_affected > 0)
    }

    async fn add_product_id(
        &self,
        id: CategoryId,
        product_id: ProductId,
    ) -> Result<(), CatalogError> {
        self.execute_list_edit(
            r#"
            UPDATE categories SET product_ids = array_append(product_ids, $1)
            WHERE id = $2 AND NOT ($1 = ANY(product_ids))
            "#,
            id,
            product_id,
            "append category product id",
        )
        .await
    }

    async fn remove_product_id(
        &self,
        id: CategoryId,
        product_id: ProductId,
    ) -> Result<(), CatalogError> {
        self.execute_list_edit(
            "UPDATE categories SET product_ids = array_remove(product_ids, $1) WHERE id = $2",
            id,
            product_id,
            "remove category product id",
        )
        .await
    }

    async fn replace_product_ids(
        &self,
        id: CategoryId,
        product_ids: &[ProductId],
    ) -> Result<(), CatalogError> {
        let ids: Vec<i64> = product_ids.iter().map(|p| db_id(p.0)).collect();
        categories::Entity::update_many()
            .col_expr(categories::Column::ProductIds, Expr::value(ids))
            .filter(categories::Column::Id.eq(db_id(id.0)))
            .exec(&self.db)
            .await
            .context("replace category product ids")?;
        Ok(())
    }
}

fn category_from_model(model: categories::Model) -> Result<Category, CatalogError> {
    Ok(Category {
        id: CategoryId(model.id as u64),
        name: model.name,
        description: model.description,
        product_ids: model
            .product_ids
            .into_iter()
            .map(|p| ProductId(p as u64))
            .collect(),
        creator_id: UserId(model.creator_id as u64),
        created_at: model.created_at,
        visibility: decode_visibility(&model.visibility)?,
    })
}

// ── Product repository ───────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbProductRepository {
    pub db: DatabaseConnection,
}

impl DbProductRepository {
    fn visible(search: Option<&str>) -> Select<products::Entity> {
        let mut select = products::Entity::find().filter(products::Column::Visibility.eq(VISIBLE));
        if let Some(needle) = search {
            select = select.filter(contains_ignore_case(products::Column::Name, needle));
        }
        select
    }
}

impl ListRepository<ProductSortField> for DbProductRepository {
    type Item = Product;

    async fn list_visible(
        &self,
        query: &ListQuery<ProductSortField>,
    ) -> Result<Vec<Product>, CatalogError> {
        let primary = match query.sort_field {
            ProductSortField::CreatedAt => Some(products::Column::CreatedAt),
            ProductSortField::Name => Some(products::Column::Name),
            ProductSortField::Price => Some(products::Column::Price),
            ProductSortField::Id => None,
        };
        let models = ordered(
            Self::visible(query.search.as_deref()),
            primary,
            products::Column::Id,
            query.sort,
        )
        .offset(query.page.offset())
        .limit(query.page.limit())
        .all(&self.db)
        .await
        .context("list products")?;
        models.into_iter().map(product_from_model).collect()
    }

    async fn count_visible(&self, search: Option<&str>) -> Result<u64, CatalogError> {
        let count = Self::visible(search)
            .count(&self.db)
            .await
            .context("count products")?;
        Ok(count)
    }
}

impl ProductRepository for DbProductRepository {
    async fn find_by_id(&self, id: ProductId) -> Result<Option<Product>, CatalogError> {
        let model = products::Entity::find_by_id(db_id(id.0))
            .one(&self.db)
            .await
            .context("find product by id")?;
        model.map(product_from_model).transpose()
    }

    async fn find_visible_by_name(&self, name: &str) -> Result<Option<Product>, CatalogError> {
        let model = products::Entity::find()
            .filter(products::Column::Name.eq(name))
            .filter(products::Column::Visibility.eq(VISIBLE))
            .one(&self.db)
            .await
            .context("find product by name")?;
        model.map(product_from_model).transpose()
    }

    async fn find_by_ids(&self, ids: &[ProductId]) -> Result<Vec<Product>, CatalogError> {
        if ids.is_empty() {
            return Ok(vec![]);
        }
        let models = products::Entity::find()
            .filter(products::Column::Id.is_in(ids.iter().map(|p| db_id(p.0))))
            .all(&self.db)
            .await
            .context("find products by ids")?;
        let mut by_id: HashMap<i64, products::Model> =
            models.into_iter().map(|m| (m.id, m)).collect();
        ids.iter()
            .filter_map(|p| by_id.remove(&db_id(p.0)))
            .map(product_from_model)
            .collect()
    }

    async fn list_visible_ids_by_category(
        &self,
        category_id: CategoryId,
    ) -> Result<Vec<ProductId>, CatalogError> {
        let ids: Vec<i64> = products::Entity::find()
            .select_only()
            .column(products::Column::Id)
            .filter(products::Column::CategoryId.eq(db_id(category_id.0)))
            .filter(products::Column::Visibility.eq(VISIBLE))
            .order_by_asc(products::Column::Id)
            .into_tuple()
            .all(&self.db)
            .await
            .context("list product ids by category")?;
        Ok(ids.into_iter().map(|id| ProductId(id as u64)).collect())
    }

    async fn list_visible_links(&self) -> Result<Vec<(ProductId, CategoryId)>, CatalogError> {
        let rows: Vec<(i64, i64)> = products::Entity::find()
            .select_only()
            .column(products::Column::Id)
            .column(products::Column::CategoryId)
            .filter(products::Column::Visibility.eq(VISIBLE))
            .order_by_asc(products::Column::Id)
            .into_tuple()
            .all(&self.db)
            .await
            .context("list product links")?;
        Ok(rows
            .into_iter()
            .map(|(p, c)| (ProductId(p as u64), CategoryId(c as u64)))
            .collect())
    }

    async fn insert(&self, product: &Product) -> Result<(), CatalogError> {
        products::ActiveModel {
            id: Set(db_id(product.id.0)),
            name: Set(product.name.clone()),
            description: Set(product.description.clone()),
            image_ref: Set(product.image_ref.clone()),
            price: Set(product.price),
            category_id: Set(db_id(product.category_id.0)),
            creator_id: Set(db_id(product.creator_id.0)),
            visibility: Set(product.visibility.as_str().to_owned()),
            created_at: Set(product.created_at),
        }
        .insert(&self.db)
        .await
        .map_err(|e| write_error(e, EntityKind::Product, "insert product"))?;
        Ok(())
    }

    async fn update(&self, product: &Product) -> Result<bool, CatalogError> {
        let result = products::Entity::update_many()
            .col_expr(products::Column::Name, Expr::value(product.name.clone()))
            .col_expr(
                products::Column::Description,
                Expr::value(product.description.clone()),
            )
            .col_expr(
                products::Column::ImageRef,
                Expr::value(product.image_ref.clone()),
            )
            .col_expr(products::Column::Price, Expr::value(product.price))
            .filter(products::Column::Id.eq(db_id(product.id.0)))
            .filter(products::Column::Visibility.eq(VISIBLE))
            .exec(&self.db)
            .await
            .map_err(|e| write_error(e, EntityKind::Product, "update product"))?;
        Ok(result.rows_affected > 0)
    }

    async fn mark_archived(&self, id: ProductId) -> Result<bool, CatalogError> {
        let result = products::Entity::update_many()
            .col_expr(products::Column::Visibility, Expr::value(ARCHIVED))
            .filter(products::Column::Id.eq(db_id(id.0)))
            .filter(products::Column::Visibility.eq(VISIBLE))
            .exec(&self.db)
            .await
            .context("archive product")?;
        Ok(result.rows_affected > 0)
    }
}

fn product_from_model(model: products::Model) -> Result<Product, CatalogError> {
    Ok(Product {
        id: ProductId(model.id as u64),
        name: model.name,
        description: model.description,
        image_ref: model.image_ref,
        price: model.price,
        category_id: CategoryId(model.category_id as u64),
        creator_id: UserId(model.creator_id as u64),
        created_at: model.created_at,
        visibility: decode_visibility(&model.visibility)?,
    })
}
