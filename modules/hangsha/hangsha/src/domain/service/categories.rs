use std::collections::HashMap;

use hangsha_sdk::{Category, CategoryGroup, CategoryGroupWithCategories};

use super::Service;
use crate::domain::error::DomainError;
use crate::infra::storage::category_repo::CategoryRepo;

impl Service {
    /// All category groups with their categories, both in `sort_order`.
    pub async fn list_categories(&self) -> Result<Vec<CategoryGroupWithCategories>, DomainError> {
        let groups = CategoryRepo::list_groups(&self.db).await?;
        let mut by_group: HashMap<i64, Vec<Category>> = HashMap::new();
        for category in CategoryRepo::list(&self.db).await? {
            by_group
                .entry(category.group_id)
                .or_default()
                .push(category.into());
        }
        Ok(groups
            .into_iter()
            .map(|g| CategoryGroupWithCategories {
                categories: by_group.remove(&g.id).unwrap_or_default(),
                group: CategoryGroup::from(g),
            })
            .collect())
    }
}
