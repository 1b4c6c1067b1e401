//! Category workflows. Every operation is scoped to the caller.

use serde_json::json;

use crate::domain::category::{Category, UpdateCategory};
use crate::domain::search::Collection;
use crate::domain::types::CategoryId;
use crate::forms::category::{AddCategoryForm, AddCategoryPayload, EditCategoryForm};
use crate::models::auth::AuthenticatedUser;
use crate::repository::{CategoryReader, CategoryWriter, DocumentStore};
use crate::search::{self, PageResult, RawQuery, SearchRequest};
use crate::services::{ServiceError, ServiceResult, current_user_id};

/// Validates the form and stores a category owned by `user`.
pub fn create_category<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: AddCategoryForm,
) -> ServiceResult<Category>
where
    R: CategoryWriter + ?Sized,
{
    let owner = current_user_id(user)?;
    let payload = AddCategoryPayload::try_from(form)?;

    let category = repo
        .create_category(&payload.into_domain(owner))
        .map_err(|err| {
            log::error!("Failed to create category: {err}");
            err
        })?;

    Ok(category)
}

pub fn get_category<R>(
    repo: &R,
    user: &AuthenticatedUser,
    category_id: i32,
) -> ServiceResult<Category>
where
    R: CategoryReader + ?Sized,
{
    let owner = current_user_id(user)?;

    repo.get_category_by_id(CategoryId::new(category_id)?, owner)?
        .ok_or(ServiceError::NotFound)
}

pub fn update_category<R>(
    repo: &R,
    user: &AuthenticatedUser,
    category_id: i32,
    form: EditCategoryForm,
) -> ServiceResult<Category>
where
    R: CategoryWriter + ?Sized,
{
    let owner = current_user_id(user)?;
    let category_id = CategoryId::new(category_id)?;
    let updates = UpdateCategory::try_from(form)?;

    Ok(repo.update_category(category_id, owner, &updates)?)
}

/// Deletes the category and returns it as it was before deletion.
pub fn delete_category<R>(
    repo: &R,
    user: &AuthenticatedUser,
    category_id: i32,
) -> ServiceResult<Category>
where
    R: CategoryWriter + ?Sized,
{
    let owner = current_user_id(user)?;

    Ok(repo.delete_category(CategoryId::new(category_id)?, owner)?)
}

/// Runs a search over the caller's categories. Any `user` condition in the
/// query is replaced by the caller's id.
pub fn search_categories<R>(
    repo: &R,
    user: &AuthenticatedUser,
    raw: RawQuery,
) -> ServiceResult<PageResult>
where
    R: DocumentStore + ?Sized,
{
    let owner = current_user_id(user)?;
    let request = SearchRequest::from_raw(raw)?.scoped_to("user", json!(owner.get()));

    Ok(search::execute(repo, Collection::Categories, &request)?)
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};

    use super::*;
    use crate::domain::search::HardQuery;
    use crate::repository::errors::RepositoryError;
    use crate::repository::mock::MockRepository;
    use crate::services::test_support::{category, token_user};

    #[test]
    fn create_assigns_the_caller_as_owner() {
        let mut repo = MockRepository::new();
        repo.expect_create_category()
            .withf(|new| new.user.get() == 4 && new.name.as_str() == "Work")
            .times(1)
            .returning(|_| Ok(category(1, 4)));

        let form = AddCategoryForm {
            name: "Work".to_string(),
            color: "#ff0000".to_string(),
        };

        let created = create_category(&repo, &token_user(4), form).unwrap();

        assert_eq!(created.id.get(), 1);
    }

    #[test]
    fn create_rejects_blank_name_without_touching_the_store() {
        let mut repo = MockRepository::new();
        repo.expect_create_category().never();

        let form = AddCategoryForm {
            name: String::new(),
            color: "#ff0000".to_string(),
        };

        assert!(matches!(
            create_category(&repo, &token_user(4), form),
            Err(ServiceError::Validation(_))
        ));
    }

    #[test]
    fn missing_category_is_not_found() {
        let mut repo = MockRepository::new();
        repo.expect_get_category_by_id().returning(|_, _| Ok(None));

        assert!(matches!(
            get_category(&repo, &token_user(4), 9),
            Err(ServiceError::NotFound)
        ));
    }

    #[test]
    fn non_positive_id_is_rejected() {
        let repo = MockRepository::new();

        assert!(matches!(
            get_category(&repo, &token_user(4), 0),
            Err(ServiceError::Validation(_))
        ));
    }

    #[test]
    fn delete_of_foreign_category_is_not_found() {
        let mut repo = MockRepository::new();
        repo.expect_delete_category()
            .withf(|id, owner| id.get() == 2 && owner.get() == 4)
            .returning(|_, _| Err(RepositoryError::NotFound));

        assert!(matches!(
            delete_category(&repo, &token_user(4), 2),
            Err(ServiceError::NotFound)
        ));
    }

    #[test]
    fn search_is_scoped_to_the_caller() {
        let mut repo = MockRepository::new();
        repo.expect_find_documents()
            .withf(|collection, query: &HardQuery| {
                *collection == Collection::Categories
                    && query.equals == vec![("user".to_string(), json!(4))]
            })
            .times(1)
            .returning(|_, _| Ok(vec![json!({"id": 1, "name": "Work"})]));

        let raw = match json!({"constant": {"user": 99}}) {
            Value::Object(map) => map,
            _ => unreachable!(),
        };

        let result = search_categories(&repo, &token_user(4), raw).unwrap();

        assert_eq!(result.page_data.total_items, 1);
    }
}
