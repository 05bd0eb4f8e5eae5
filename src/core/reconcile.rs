use crate::core::inventory::Inventory;
use crate::domain::model::{ModelResponse, SearchResult};
use std::collections::HashSet;

/// Intersect the model's claims with the inventory.
///
/// Claims for unknown ids are dropped. Surviving records come back in inventory
/// order, not claim order. Repeated claims for one id are not collapsed; each
/// copy yields a result carrying the reasoning of the first claim for that id.
pub fn reconcile(response: &ModelResponse, inventory: &Inventory) -> Vec<SearchResult> {
    let (mut surviving, dropped): (Vec<i64>, Vec<i64>) = response
        .matches
        .iter()
        .map(|claim| claim.id)
        .partition(|&id| inventory.contains(id));

    if !dropped.is_empty() {
        tracing::warn!(
            "Model referenced {} id(s) outside the inventory: {:?}",
            dropped.len(),
            dropped
        );
    }

    let mut seen = HashSet::new();
    let repeated: Vec<i64> = surviving
        .iter()
        .copied()
        .filter(|&id| !seen.insert(id))
        .collect();
    if !repeated.is_empty() {
        tracing::warn!("Model repeated id(s) in its matches: {:?}", repeated);
    }

    // stable: repeated ids stay adjacent
    surviving.sort_by_key(|&id| inventory.position(id));

    inventory
        .get_by_ids(&surviving)
        .into_iter()
        .filter_map(|record| {
            let reasoning = response
                .matches
                .iter()
                .find(|claim| claim.id == record.id)?
                .reasoning
                .clone();
            Some(SearchResult::from_record(record, reasoning))
        })
        .collect()
}
