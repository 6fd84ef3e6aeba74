use std::collections::{HashMap, HashSet};

use itertools::Itertools;
use sqlx::PgPool;

use crate::{
    error::{AppError, Result},
    models::{CombinationDetail, VariantTypeWithOptions},
    queries::variant_type_queries,
};

/// Canonical form of an option selection: sorted, so two combinations with the
/// same options compare equal regardless of insertion order.
pub fn selection_key(option_ids: &[i32]) -> Vec<i32> {
    let mut key = option_ids.to_vec();
    key.sort_unstable();
    key
}

pub fn selections_of(combinations: &[CombinationDetail]) -> HashSet<Vec<i32>> {
    combinations
        .iter()
        .map(|c| {
            let ids: Vec<i32> = c.options.iter().map(|o| o.id).collect();
            selection_key(&ids)
        })
        .collect()
}

/// Canonical selections of every combination the product already has.
pub async fn existing_selections(pool: &PgPool, product_id: i32) -> Result<HashSet<Vec<i32>>> {
    let combinations = variant_type_queries::get_combinations(pool, product_id).await?;
    Ok(selections_of(&combinations))
}

/// Every selection taking one option from each variant type, in type order.
pub fn all_selections(types: &[VariantTypeWithOptions]) -> Result<Vec<Vec<i32>>> {
    if types.is_empty() {
        return Err(AppError::BadRequest(
            "Product has no variant types to combine".to_string(),
        ));
    }

    if let Some(empty) = types.iter().find(|t| t.options.is_empty()) {
        return Err(AppError::BadRequest(format!(
            "Variant type '{}' has no options",
            empty.variant_type.name
        )));
    }

    let selections = types
        .iter()
        .map(|t| t.options.iter().map(|o| o.id))
        .multi_cartesian_product()
        .collect();

    Ok(selections)
}

/// Selections from [`all_selections`] that are not in `existing`.
pub fn missing_selections(
    types: &[VariantTypeWithOptions],
    existing: &HashSet<Vec<i32>>,
) -> Result<Vec<Vec<i32>>> {
    Ok(all_selections(types)?
        .into_iter()
        .filter(|selection| !existing.contains(&selection_key(selection)))
        .collect())
}

/// Checks that `option_ids` picks exactly one option of every variant type of
/// the product and returns the canonical selection.
pub fn validate_selection(types: &[VariantTypeWithOptions], option_ids: &[i32]) -> Result<Vec<i32>> {
    if types.is_empty() {
        return Err(AppError::BadRequest(
            "Product has no variant types".to_string(),
        ));
    }

    let owner: HashMap<i32, i32> = types
        .iter()
        .flat_map(|t| t.options.iter().map(|o| (o.id, o.variant_type_id)))
        .collect();

    let mut picked_types = HashSet::new();

    for option_id in option_ids {
        let type_id = owner.get(option_id).ok_or_else(|| {
            AppError::BadRequest(format!(
                "Option {} does not belong to this product",
                option_id
            ))
        })?;

        if !picked_types.insert(*type_id) {
            return Err(AppError::BadRequest(
                "Only one option per variant type may be selected".to_string(),
            ));
        }
    }

    if let Some(missing) = types
        .iter()
        .find(|t| !picked_types.contains(&t.variant_type.id))
    {
        return Err(AppError::BadRequest(format!(
            "An option for '{}' is required",
            missing.variant_type.name
        )));
    }

    Ok(selection_key(option_ids))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{VariantCombination, VariantOption, VariantType};
    use rust_decimal::Decimal;

    fn variant_type(id: i32, name: &str, option_ids: &[i32]) -> VariantTypeWithOptions {
        VariantTypeWithOptions {
            variant_type: VariantType {
                id,
                product_id: 1,
                name: name.to_string(),
                created_at: chrono::Utc::now(),
            },
            options: option_ids
                .iter()
                .map(|&oid| VariantOption {
                    id: oid,
                    variant_type_id: id,
                    value: format!("opt-{}", oid),
                })
                .collect(),
        }
    }

    fn colour_and_size() -> Vec<VariantTypeWithOptions> {
        vec![
            variant_type(1, "Colour", &[10, 11]),
            variant_type(2, "Size", &[20, 21, 22]),
        ]
    }

    #[test]
    fn cartesian_product_of_options() {
        let selections = all_selections(&colour_and_size()).unwrap();

        assert_eq!(selections.len(), 6);
        assert_eq!(selections[0], vec![10, 20]);
        assert_eq!(selections[5], vec![11, 22]);
    }

    #[test]
    fn generation_needs_types_with_options() {
        assert!(all_selections(&[]).is_err());
        let types = vec![variant_type(1, "Colour", &[10]), variant_type(2, "Size", &[])];
        assert!(all_selections(&types).is_err());
    }

    #[test]
    fn stored_combinations_become_canonical_selections() {
        let detail = |id: i32, option_ids: &[(i32, i32)]| CombinationDetail {
            combination: VariantCombination {
                id,
                product_id: 1,
                price: Decimal::new(1000, 2),
                stock: 3,
                sku: None,
                image_url: None,
                created_at: chrono::Utc::now(),
            },
            options: option_ids
                .iter()
                .map(|&(oid, type_id)| VariantOption {
                    id: oid,
                    variant_type_id: type_id,
                    value: format!("opt-{}", oid),
                })
                .collect(),
        };

        let selections = selections_of(&[
            detail(1, &[(21, 2), (10, 1)]),
            detail(2, &[(11, 1), (22, 2)]),
        ]);

        assert_eq!(selections.len(), 2);
        assert!(selections.contains(&vec![10, 21]));
        assert!(selections.contains(&vec![11, 22]));
    }

    #[test]
    fn existing_selections_are_skipped() {
        let existing: HashSet<Vec<i32>> =
            [vec![10, 20], selection_key(&[21, 11])].into_iter().collect();

        let missing = missing_selections(&colour_and_size(), &existing).unwrap();

        assert_eq!(missing.len(), 4);
        assert!(!missing.contains(&vec![10, 20]));
        assert!(!missing.contains(&vec![11, 21]));
    }

    #[test]
    fn valid_selection_is_canonicalised() {
        assert_eq!(
            validate_selection(&colour_and_size(), &[21, 10]).unwrap(),
            vec![10, 21]
        );
    }

    #[test]
    fn selection_rejects_foreign_duplicate_and_incomplete_picks() {
        let types = colour_and_size();

        assert!(validate_selection(&types, &[10, 99]).is_err());
        assert!(validate_selection(&types, &[10, 11, 20]).is_err());
        assert!(validate_selection(&types, &[10]).is_err());
        assert!(validate_selection(&[], &[10]).is_err());
    }
}
