//! Per-car completion and unlock status for every mod in the catalog.

use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};

use crate::features::car_mods::models::{CarModEntry, ModStatus};
use crate::features::mods::models::Mod;

/// Annotate every catalog mod with one car's progress.
///
/// Returns exactly one status per input mod, in catalog order. A mod is
/// completed when its ledger row has `completed_at` set, and unlocked when it
/// is a root or its parent is both present in the catalog and completed.
pub fn resolve_statuses(all_mods: Vec<Mod>, car_entries: Vec<CarModEntry>) -> Vec<ModStatus> {
    let entries = coalesce_entries(car_entries);

    let completed: HashSet<String> = entries
        .values()
        .filter(|e| e.is_completed())
        .map(|e| e.mod_id.clone())
        .collect();

    let catalog_ids: HashSet<String> = all_mods.iter().map(|m| m.id.clone()).collect();

    all_mods
        .into_iter()
        .map(|m| {
            let car_mod = entries.get(&m.id).cloned();
            let is_completed = car_mod.as_ref().is_some_and(CarModEntry::is_completed);
            let is_unlocked = match m.parent_mod_id.as_deref() {
                None => true,
                Some(parent_id) if !catalog_ids.contains(parent_id) => {
                    tracing::debug!(
                        "Mod {} is locked: parent {} is not in the catalog",
                        m.id,
                        parent_id
                    );
                    false
                }
                Some(parent_id) => completed.contains(parent_id),
            };

            ModStatus {
                modification: m,
                car_mod,
                is_completed,
                is_unlocked,
            }
        })
        .collect()
}

/// Index ledger rows by mod id, keeping one row per mod.
///
/// Duplicates should not exist; when they do, the most recently written row
/// wins and ties go to the row seen last.
fn coalesce_entries(car_entries: Vec<CarModEntry>) -> HashMap<String, CarModEntry> {
    let mut by_mod: HashMap<String, CarModEntry> = HashMap::with_capacity(car_entries.len());

    for entry in car_entries {
        match by_mod.entry(entry.mod_id.clone()) {
            Entry::Vacant(slot) => {
                slot.insert(entry);
            }
            Entry::Occupied(mut slot) => {
                tracing::warn!(
                    "Duplicate ledger rows for car {} mod {}: {} and {}",
                    entry.car_id,
                    entry.mod_id,
                    slot.get().id,
                    entry.id
                );
                if entry.last_written_at() >= slot.get().last_written_at() {
                    slot.insert(entry);
                }
            }
        }
    }

    by_mod
}
