use tracing::debug;

use crate::errors::AppError;
use crate::registry::{self, ALL_MODELS_ID};
use crate::store::ChatStore;

/// Toggles one model (or [`ALL_MODELS_ID`]) in the store's selection.
///
/// * Expert-tier models are rejected for non-premium users.
/// * `all-models` collapses to the default model when the whole eligible set
///   is already selected, and expands to it otherwise.
/// * Removing the last selected model is rejected; the selection never
///   becomes empty.
///
/// Returns the resulting selection.
pub fn toggle_model(
    store: &ChatStore,
    model_id: &str,
    is_premium: bool,
) -> Result<Vec<String>, AppError> {
    let current = store.selected_models();

    let next = if model_id == ALL_MODELS_ID {
        let eligible = registry::eligible_ids(is_premium);
        if same_set(&current, &eligible) {
            vec![registry::default_model(is_premium).id.to_string()]
        } else {
            eligible
        }
    } else {
        let model = registry::find(model_id)
            .ok_or_else(|| AppError::UnknownModel { model_id: model_id.to_string() })?;
        if !model.is_available_to(is_premium) {
            return Err(AppError::premium_required(model.display_name));
        }
        if current.iter().any(|id| id == model_id) {
            if current.len() == 1 {
                return Err(AppError::LastModelSelected);
            }
            current.into_iter().filter(|id| id != model_id).collect()
        } else {
            let mut next = current;
            next.push(model_id.to_string());
            next
        }
    };

    debug!("Model selection is now {next:?}");
    store.set_selected_models(next.clone());
    Ok(next)
}

/// Replaces the selection wholesale, validating every id against the
/// registry and the user's tier. `all-models` expands to the eligible set.
pub fn select_models(
    store: &ChatStore,
    model_ids: &[String],
    is_premium: bool,
) -> Result<Vec<String>, AppError> {
    let mut next: Vec<String> = Vec::new();
    for id in model_ids {
        if id == ALL_MODELS_ID {
            next = registry::eligible_ids(is_premium);
            break;
        }
        let model = registry::find(id)
            .ok_or_else(|| AppError::UnknownModel { model_id: id.clone() })?;
        if !model.is_available_to(is_premium) {
            return Err(AppError::premium_required(model.display_name));
        }
        if !next.contains(id) {
            next.push(id.clone());
        }
    }
    if next.is_empty() {
        return Err(AppError::NoModelSelected);
    }
    store.set_selected_models(next.clone());
    Ok(next)
}

/// Drops expert-tier models from the selection after a downgrade or logout,
/// falling back to the default model if nothing eligible remains.
pub fn prune_ineligible(store: &ChatStore, is_premium: bool) -> Vec<String> {
    let current = store.selected_models();
    let mut next: Vec<String> = current
        .iter()
        .filter(|id| registry::find(id).is_some_and(|m| m.is_available_to(is_premium)))
        .cloned()
        .collect();
    if next.is_empty() {
        next.push(registry::default_model(is_premium).id.to_string());
    }
    if next != current {
        store.set_selected_models(next.clone());
    }
    next
}

fn same_set(a: &[String], b: &[String]) -> bool {
    a.len() == b.len() && b.iter().all(|id| a.contains(id))
}
