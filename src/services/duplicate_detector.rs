// src/services/duplicate_detector.rs

use std::collections::HashSet;

use uuid::Uuid;

use crate::models::{billing::BillingEntry, load::LoadSnapshot};

/// Cargas já presas a algum lançamento não excluído, exceto `exclude_entry_id`.
fn claimed_load_ids(existing: &[BillingEntry], exclude_entry_id: Option<Uuid>) -> HashSet<Uuid> {
    existing
        .iter()
        .filter(|entry| !entry.deleted && Some(entry.id) != exclude_entry_id)
        .flat_map(|entry| entry.loads.iter().map(|load| load.load_id))
        .collect()
}

/// Indica se alguma carga candidata já está em outro lançamento ativo.
pub fn find_conflicts(
    candidates: &[LoadSnapshot],
    existing: &[BillingEntry],
    exclude_entry_id: Option<Uuid>,
) -> bool {
    !conflicting_loads(candidates, existing, exclude_entry_id).is_empty()
}

/// As cargas candidatas que já estão em outro lançamento ativo, na ordem recebida.
pub fn conflicting_loads(
    candidates: &[LoadSnapshot],
    existing: &[BillingEntry],
    exclude_entry_id: Option<Uuid>,
) -> Vec<LoadSnapshot> {
    let claimed = claimed_load_ids(existing, exclude_entry_id);

    candidates
        .iter()
        .filter(|load| claimed.contains(&load.load_id))
        .cloned()
        .collect()
}
