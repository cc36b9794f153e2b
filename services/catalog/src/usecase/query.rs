use shelf_domain::pagination::Page;
use shelf_domain::query::{ListCriteria, ListQuery, SortField};

use crate::domain::repository::ListRepository;
use crate::error::CatalogError;

pub struct ListUseCase<R> {
    pub repo: R,
}

impl<R> ListUseCase<R> {
    /// One page of visible records plus the size of the filtered set.
    pub async fn execute<F>(
        &self,
        criteria: &ListCriteria,
    ) -> Result<Page<<R as ListRepository<F>>::Item>, CatalogError>
    where
        F: SortField,
        R: ListRepository<F>,
    {
        let query = ListQuery::<F>::from_criteria(criteria);
        let total = self.repo.count_visible(query.search.as_deref()).await?;
        let items = if query.page.offset() >= total {
            vec![]
        } else {
            self.repo.list_visible(&query).await?
        };
        Ok(Page::new(items, total, query.page))
    }
}
