use std::collections::BTreeSet;

use derive_more::Deref;
use log::debug;

use crate::{Equipment, Exercise, Property};

/// Equipment available for a session. An empty set means bodyweight only.
#[derive(Deref, Debug, Default, Clone, PartialEq, Eq)]
pub struct EquipmentSet(BTreeSet<Equipment>);

impl EquipmentSet {
    #[must_use]
    pub fn bodyweight() -> Self {
        Self::default()
    }

    /// Unknown identifiers are ignored, they can never satisfy a requirement.
    #[must_use]
    pub fn from_ids<'a>(ids: impl IntoIterator<Item = &'a str>) -> Self {
        ids.into_iter()
            .filter_map(|id| {
                let equipment = Equipment::parse(id);
                if equipment.is_none() {
                    debug!("ignoring unknown equipment \"{id}\"");
                }
                equipment
            })
            .collect()
    }

    #[must_use]
    pub fn admits(&self, exercise: &Exercise) -> bool {
        exercise.equipment.is_subset(&self.0)
    }
}

impl FromIterator<Equipment> for EquipmentSet {
    fn from_iter<T: IntoIterator<Item = Equipment>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<const N: usize> From<[Equipment; N]> for EquipmentSet {
    fn from(value: [Equipment; N]) -> Self {
        Self(BTreeSet::from(value))
    }
}

/// Keeps the exercises whose required equipment is available, preserving their order.
#[must_use]
pub fn filter<'a>(
    exercises: impl IntoIterator<Item = &'a Exercise>,
    available: &EquipmentSet,
) -> Vec<&'a Exercise> {
    exercises
        .into_iter()
        .filter(|e| available.admits(e))
        .collect()
}
