use tracing::info;
use uuid::Uuid;

use crate::config::Config;
use crate::errors::SpenderError;
use crate::ledger::Category;
use crate::storage::TransactionStore;

use super::{ServiceError, ServiceResult};

pub struct CategoryService;

impl CategoryService {
    /// Inserts the default categories when the store has none. Returns how
    /// many were created.
    pub fn seed_defaults<S: TransactionStore>(store: &mut S) -> ServiceResult<usize> {
        if !store.categories().is_empty() {
            return Ok(0);
        }
        let defaults = Category::defaults();
        let count = defaults.len();
        for category in defaults {
            store.insert_category(category)?;
        }
        info!(count, "seeded default categories");
        Ok(count)
    }

    /// Adds a category, appending it after the existing ones when its sort
    /// index is left at zero.
    pub fn add<S: TransactionStore>(store: &mut S, mut category: Category) -> ServiceResult<Uuid> {
        Self::validate_name(store, None, &category.name)?;
        category.name = category.name.trim().to_string();
        let existing = store.categories();
        if category.sort_index == 0 && !existing.is_empty() {
            category.sort_index = existing.iter().map(|c| c.sort_index).max().unwrap_or(0) + 1;
        }
        Ok(store.insert_category(category)?)
    }

    pub fn rename<S: TransactionStore>(store: &mut S, id: Uuid, name: &str) -> ServiceResult<()> {
        Self::validate_name(store, Some(id), name)?;
        let mut category = Self::require(store, id)?;
        category.name = name.trim().to_string();
        store.update_category(category)?;
        Ok(())
    }

    /// Assigns sort indices following `ordered`. Categories missing from the
    /// list keep their relative order after the listed ones.
    pub fn reorder<S: TransactionStore>(store: &mut S, ordered: &[Uuid]) -> ServiceResult<()> {
        for id in ordered {
            Self::require(store, *id)?;
        }
        let unlisted: Vec<Category> = store
            .categories()
            .into_iter()
            .filter(|c| !ordered.contains(&c.id))
            .collect();
        let mut next_index = 0;
        for id in ordered {
            let mut category = Self::require(store, *id)?;
            category.sort_index = next_index;
            store.update_category(category)?;
            next_index += 1;
        }
        for mut category in unlisted {
            category.sort_index = next_index;
            store.update_category(category)?;
            next_index += 1;
        }
        Ok(())
    }

    /// Applies the category's sign rule to `amount` when enabled in `config`.
    pub fn normalize_amount<S: TransactionStore>(
        store: &S,
        category_id: Option<Uuid>,
        amount: f64,
        config: &Config,
    ) -> ServiceResult<f64> {
        let Some(id) = category_id else {
            return Ok(amount);
        };
        let category = Self::require(store, id)?;
        if config.enforce_category_sign {
            Ok(category.kind.normalize_amount(amount))
        } else {
            Ok(amount)
        }
    }

    pub fn require<S: TransactionStore>(store: &S, id: Uuid) -> ServiceResult<Category> {
        store
            .category(id)
            .ok_or_else(|| SpenderError::CategoryNotFound(id).into())
    }

    fn validate_name<S: TransactionStore>(
        store: &S,
        current: Option<Uuid>,
        name: &str,
    ) -> ServiceResult<()> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ServiceError::Invalid("Category name cannot be empty".into()));
        }
        let taken = store
            .categories()
            .iter()
            .any(|c| Some(c.id) != current && c.name.eq_ignore_ascii_case(name));
        if taken {
            return Err(ServiceError::Invalid(format!(
                "Category `{}` already exists",
                name
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::{CategoryKind, Ledger};

    #[test]
    fn seeding_is_a_no_op_once_categories_exist() {
        let mut ledger = Ledger::new("Seed");
        assert_eq!(CategoryService::seed_defaults(&mut ledger).unwrap(), 6);
        assert_eq!(CategoryService::seed_defaults(&mut ledger).unwrap(), 0);
        assert_eq!(ledger.categories.len(), 6);
    }

    #[test]
    fn duplicate_names_are_rejected_case_insensitively() {
        let mut ledger = Ledger::new("Names");
        CategoryService::seed_defaults(&mut ledger).unwrap();
        let err = CategoryService::add(&mut ledger, Category::new(" dining ", CategoryKind::Expense))
            .expect_err("duplicate name");
        assert!(matches!(err, ServiceError::Invalid(ref msg) if msg.contains("already exists")));
    }

    #[test]
    fn added_category_goes_last() {
        let mut ledger = Ledger::new("Append");
        CategoryService::seed_defaults(&mut ledger).unwrap();
        let id = CategoryService::add(&mut ledger, Category::new("Pets", CategoryKind::Expense))
            .unwrap();
        let ordered = ledger.categories();
        assert_eq!(ordered.last().map(|c| c.id), Some(id));
    }

    #[test]
    fn reorder_moves_listed_first() {
        let mut ledger = Ledger::new("Order");
        CategoryService::seed_defaults(&mut ledger).unwrap();
        let shopping = ledger.category_by_name("Shopping").unwrap().id;
        let bills = ledger.category_by_name("Bills").unwrap().id;

        CategoryService::reorder(&mut ledger, &[shopping, bills]).unwrap();

        let names: Vec<_> = ledger.categories().into_iter().map(|c| c.name).collect();
        assert_eq!(
            names,
            ["Shopping", "Bills", "Dining", "Transport", "Income", "Entertainment"]
        );
    }

    #[test]
    fn sign_rule_can_be_disabled() {
        let mut ledger = Ledger::new("Signs");
        CategoryService::seed_defaults(&mut ledger).unwrap();
        let dining = ledger.category_by_name("Dining").map(|c| c.id);
        let mut config = Config::default();

        let forced = CategoryService::normalize_amount(&ledger, dining, 12.0, &config).unwrap();
        assert_eq!(forced, -12.0);

        config.enforce_category_sign = false;
        let kept = CategoryService::normalize_amount(&ledger, dining, 12.0, &config).unwrap();
        assert_eq!(kept, 12.0);
    }
}
