use std::collections::{BTreeMap, BTreeSet};

use chrono::{Duration, NaiveDate};
use log::debug;

use crate::{
    Catalog, EquipmentSet, Exercise, ExerciseID, Focus, InvalidInputError, Property, ReadError,
    Role, Schedule, ScheduleEntry, ScheduleService, SessionType, SettingsService, equipment,
    estimate_duration, last_completed, next_focus, next_focus_in,
};

#[allow(async_fn_in_trait)]
pub trait PlanService: ScheduleService + SettingsService {
    /// Plans the next workout of the rotation for the given date.
    ///
    /// Without an explicit session type the configured default is used. The focus is derived
    /// from the schedule entries within the rotation window around the date. Exercises of the
    /// last completed workout with that focus are avoided if variety is enabled.
    async fn plan_workout(
        &self,
        date: NaiveDate,
        session_type: Option<SessionType>,
        available: &EquipmentSet,
        catalog: &Catalog,
    ) -> Result<WorkoutPlan, PlanError> {
        let settings = self.get_settings().await?;
        let schedule = Schedule::new(self.get_schedule().await?);
        let window = schedule.entries_in_window(settings.rotation_window(date));
        let focus = next_focus_in(&settings.rotation, &window)
            .unwrap_or_else(|| next_focus(&window));
        let history: &[ScheduleEntry] = if settings.variety {
            schedule.entries()
        } else {
            &[]
        };
        generate_plan(
            session_type.unwrap_or(settings.default_session_type),
            focus,
            available,
            catalog,
            history,
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanSlot {
    pub role: Role,
    pub exercise: Exercise,
    pub sets: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkoutPlan {
    pub session_type: SessionType,
    pub focus: Focus,
    pub slots: Vec<PlanSlot>,
    pub total_sets: u32,
    pub estimated_duration_minutes: u32,
}

impl WorkoutPlan {
    #[must_use]
    pub fn exercises(&self) -> Vec<ExerciseID> {
        self.slots.iter().map(|s| s.exercise.id.clone()).collect()
    }

    #[must_use]
    pub fn sets_per_role(&self) -> BTreeMap<Role, u32> {
        let mut result = BTreeMap::new();
        for slot in &self.slots {
            *result.entry(slot.role).or_insert(0) += slot.sets;
        }
        result
    }

    #[must_use]
    pub fn duration(&self) -> Duration {
        Duration::minutes(i64::from(self.estimated_duration_minutes))
    }
}

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error(
    "Not enough exercises for the {} slot of a {} workout with the available equipment",
    .role.name(),
    .focus.name()
)]
pub struct InsufficientExercisesError {
    pub focus: Focus,
    pub role: Role,
}

#[derive(thiserror::Error, Debug)]
pub enum PlanError {
    #[error(transparent)]
    InsufficientExercises(#[from] InsufficientExercisesError),
    #[error(transparent)]
    InvalidInput(#[from] InvalidInputError),
    #[error(transparent)]
    Read(#[from] ReadError),
}

/// Fills the slots of the session type with exercises for the given focus.
///
/// Candidates of a slot are the exercises tagged with the focus that are eligible for the slot's
/// role and usable with the available equipment. They are tried in ascending order of their ID,
/// exercises of the last completed session with the same focus after all others. An exercise
/// is never used twice in one plan.
pub fn generate_plan(
    session_type: SessionType,
    focus: Focus,
    available: &EquipmentSet,
    catalog: &Catalog,
    history: &[ScheduleEntry],
) -> Result<WorkoutPlan, PlanError> {
    let slots = session_type.slots();
    let recent: BTreeSet<&ExerciseID> = last_completed(history, focus)
        .map(|entry| entry.exercises.iter().collect())
        .unwrap_or_default();

    let pools = slots
        .iter()
        .map(|slot| {
            let pool = equipment::filter(
                catalog
                    .by_body_part(focus)
                    .into_iter()
                    .filter(|e| e.is_eligible(slot.role)),
                available,
            );
            if pool.is_empty() {
                return Err(InsufficientExercisesError {
                    focus,
                    role: slot.role,
                });
            }
            let (fresh, used): (Vec<&Exercise>, Vec<&Exercise>) =
                pool.into_iter().partition(|e| !recent.contains(&e.id));
            Ok(fresh.into_iter().chain(used).collect::<Vec<_>>())
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut chosen = Vec::with_capacity(slots.len());
    if let Err(slot) = select(&pools, &mut chosen) {
        return Err(InsufficientExercisesError {
            focus,
            role: slots[slot].role,
        }
        .into());
    }

    for exercise in chosen.iter().filter(|e| recent.contains(&e.id)) {
        debug!(
            "reusing {} from the previous {} workout",
            exercise.id,
            focus.name()
        );
    }

    let total_sets = slots.iter().map(|s| s.sets).sum::<u32>();
    let plan = WorkoutPlan {
        session_type,
        focus,
        slots: slots
            .iter()
            .zip(chosen)
            .map(|(slot, exercise)| PlanSlot {
                role: slot.role,
                exercise: exercise.clone(),
                sets: slot.sets,
            })
            .collect(),
        total_sets,
        estimated_duration_minutes: estimate_duration(i64::from(total_sets))?,
    };

    debug!(
        "generated {} {} workout: {}",
        session_type.name(),
        focus.name(),
        plan.exercises()
            .iter()
            .map(|id| id.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    );

    Ok(plan)
}

/// Depth-first search for distinct exercises, one per pool. On failure the index of the
/// deepest slot that could not be filled is returned.
fn select<'a>(pools: &[Vec<&'a Exercise>], chosen: &mut Vec<&'a Exercise>) -> Result<(), usize> {
    let Some(pool) = pools.get(chosen.len()) else {
        return Ok(());
    };
    let mut deepest = chosen.len();
    for candidate in pool {
        if chosen.iter().any(|c| c.id == candidate.id) {
            continue;
        }
        chosen.push(candidate);
        match select(pools, chosen) {
            Ok(()) => return Ok(()),
            Err(slot) => deepest = deepest.max(slot),
        }
        chosen.pop();
    }
    Err(deepest)
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use crate::{BodyPart, Equipment, Name, ScheduleEntryID};

    use super::*;

    static BUILTIN: std::sync::LazyLock<Catalog> =
        std::sync::LazyLock::new(|| Catalog::builtin().unwrap());

    fn exercise(id: &str, equipment: &[Equipment], roles: &[Role]) -> Exercise {
        Exercise {
            id: ExerciseID::new(id).unwrap(),
            name: Name::new(id).unwrap(),
            body_parts: BTreeSet::from([BodyPart::UpperBody]),
            equipment: equipment.iter().copied().collect(),
            roles: roles.iter().copied().collect(),
        }
    }

    fn entry(day: u32, focus: Focus, exercises: &[&str], completed: bool) -> ScheduleEntry {
        ScheduleEntry {
            id: ScheduleEntryID::from(u128::from(day)),
            date: NaiveDate::from_ymd_opt(2024, 3, day).unwrap(),
            focus,
            session_type: SessionType::Standard,
            exercises: exercises
                .iter()
                .map(|id| ExerciseID::new(id).unwrap())
                .collect(),
            completed,
        }
    }

    fn ids(plan: &WorkoutPlan) -> Vec<String> {
        plan.exercises().iter().map(ToString::to_string).collect()
    }

    #[rstest]
    #[case::standard(
        SessionType::Standard,
        &[(Role::Major, 3), (Role::Minor, 2), (Role::Tertiary, 1)],
        6,
        34,
        &["barbell-bench-press", "barbell-overhead-press", "barbell-curl"]
    )]
    #[case::express(
        SessionType::Express,
        &[(Role::Major, 3), (Role::Minor, 2)],
        5,
        28,
        &["barbell-bench-press", "barbell-overhead-press"]
    )]
    #[case::maintenance(
        SessionType::Maintenance,
        &[(Role::Major, 2), (Role::Minor, 2)],
        4,
        22,
        &["barbell-bench-press", "barbell-overhead-press"]
    )]
    fn test_generate_plan_upper_body_with_barbell_and_bench(
        #[case] session_type: SessionType,
        #[case] sets_per_role: &[(Role, u32)],
        #[case] total_sets: u32,
        #[case] duration: u32,
        #[case] exercises: &[&str],
    ) {
        let plan = generate_plan(
            session_type,
            BodyPart::UpperBody,
            &EquipmentSet::from([Equipment::Barbell, Equipment::Bench]),
            &BUILTIN,
            &[],
        )
        .unwrap();

        assert_eq!(plan.session_type, session_type);
        assert_eq!(plan.focus, BodyPart::UpperBody);
        assert_eq!(plan.slots.len(), sets_per_role.len());
        assert_eq!(
            plan.sets_per_role(),
            sets_per_role.iter().copied().collect::<BTreeMap<_, _>>()
        );
        assert_eq!(plan.total_sets, total_sets);
        assert_eq!(plan.estimated_duration_minutes, duration);
        assert_eq!(plan.duration(), Duration::minutes(i64::from(duration)));
        assert_eq!(ids(&plan), exercises);
    }

    #[test]
    fn test_generate_plan_is_deterministic() {
        let available = EquipmentSet::from([Equipment::Dumbbell, Equipment::Kettlebell]);
        let history = [entry(4, BodyPart::Legs, &["goblet-squat"], true)];
        let plans = (0..3)
            .map(|_| {
                generate_plan(
                    SessionType::Standard,
                    BodyPart::Legs,
                    &available,
                    &BUILTIN,
                    &history,
                )
                .unwrap()
            })
            .collect::<Vec<_>>();
        assert_eq!(plans[0], plans[1]);
        assert_eq!(plans[1], plans[2]);
    }

    #[rstest]
    fn test_generate_plan_invariants(
        #[values(SessionType::Standard, SessionType::Express, SessionType::Maintenance)]
        session_type: SessionType,
        #[values(BodyPart::UpperBody, BodyPart::Legs, BodyPart::Core, BodyPart::FullBody)]
        focus: Focus,
        #[values(
            EquipmentSet::bodyweight(),
            EquipmentSet::from([Equipment::Barbell, Equipment::Bench]),
            EquipmentSet::from([Equipment::Dumbbell, Equipment::PullUpBar, Equipment::Cable])
        )]
        available: EquipmentSet,
    ) {
        let plan = generate_plan(session_type, focus, &available, &BUILTIN, &[]).unwrap();

        let exercises = plan.exercises();
        assert_eq!(
            exercises.iter().collect::<BTreeSet<_>>().len(),
            exercises.len(),
            "duplicate exercise"
        );
        for slot in &plan.slots {
            assert!(available.admits(&slot.exercise));
            assert!(slot.exercise.targets(focus));
            assert!(slot.exercise.is_eligible(slot.role));
        }
        assert_eq!(plan.total_sets, session_type.total_sets());
        assert_eq!(
            plan.estimated_duration_minutes,
            estimate_duration(i64::from(plan.total_sets)).unwrap()
        );
    }

    #[test]
    fn test_generate_plan_bodyweight_only() {
        let plan = generate_plan(
            SessionType::Standard,
            BodyPart::UpperBody,
            &EquipmentSet::bodyweight(),
            &BUILTIN,
            &[],
        )
        .unwrap();

        assert!(plan.slots.iter().all(|s| s.exercise.is_bodyweight()));
        assert_eq!(
            ids(&plan),
            vec!["push-up", "diamond-push-up", "plank-shoulder-tap"]
        );
    }

    #[test]
    fn test_generate_plan_avoids_exercises_of_previous_session() {
        let history = [
            entry(
                1,
                BodyPart::UpperBody,
                &["barbell-row", "bench-dip", "diamond-push-up"],
                true,
            ),
            entry(
                3,
                BodyPart::UpperBody,
                &["barbell-bench-press", "barbell-overhead-press", "barbell-curl"],
                true,
            ),
            entry(5, BodyPart::UpperBody, &["push-up"], false),
            entry(6, BodyPart::Legs, &["barbell-row"], true),
        ];
        let plan = generate_plan(
            SessionType::Standard,
            BodyPart::UpperBody,
            &EquipmentSet::from([Equipment::Barbell, Equipment::Bench]),
            &BUILTIN,
            &history,
        )
        .unwrap();

        assert_eq!(ids(&plan), vec!["barbell-row", "bench-dip", "diamond-push-up"]);
    }

    #[test]
    fn test_generate_plan_reuses_exercises_of_previous_session_if_unavoidable() {
        let catalog = Catalog::new(vec![
            exercise("a", &[], &[Role::Major]),
            exercise("b", &[], &[Role::Major]),
            exercise("c", &[], &[Role::Minor]),
        ])
        .unwrap();
        let history = [entry(1, BodyPart::UpperBody, &["a", "c"], true)];

        let plan = generate_plan(
            SessionType::Express,
            BodyPart::UpperBody,
            &EquipmentSet::bodyweight(),
            &catalog,
            &history,
        )
        .unwrap();

        assert_eq!(ids(&plan), vec!["b", "c"]);
    }

    #[test]
    fn test_generate_plan_backtracks_to_avoid_duplicates() {
        let catalog = Catalog::new(vec![
            exercise("a", &[], &[Role::Major, Role::Minor]),
            exercise("b", &[], &[Role::Major]),
        ])
        .unwrap();

        let plan = generate_plan(
            SessionType::Maintenance,
            BodyPart::UpperBody,
            &EquipmentSet::bodyweight(),
            &catalog,
            &[],
        )
        .unwrap();

        assert_eq!(ids(&plan), vec!["b", "a"]);
    }

    #[test]
    fn test_generate_plan_unavoidable_duplicate() {
        let catalog = Catalog::new(vec![exercise("a", &[], &[Role::Major, Role::Minor])]).unwrap();

        assert!(matches!(
            generate_plan(
                SessionType::Express,
                BodyPart::UpperBody,
                &EquipmentSet::bodyweight(),
                &catalog,
                &[],
            ),
            Err(PlanError::InsufficientExercises(InsufficientExercisesError {
                focus: BodyPart::UpperBody,
                role: Role::Minor
            }))
        ));
    }

    #[test]
    fn test_generate_plan_insufficient_equipment_for_major_slot() {
        let catalog = Catalog::new(vec![
            exercise(
                "barbell-bench-press",
                &[Equipment::Barbell, Equipment::Bench],
                &[Role::Major],
            ),
            exercise("push-up", &[], &[Role::Minor, Role::Tertiary]),
            exercise("diamond-push-up", &[], &[Role::Minor, Role::Tertiary]),
        ])
        .unwrap();

        assert!(matches!(
            generate_plan(
                SessionType::Standard,
                BodyPart::UpperBody,
                &EquipmentSet::from([Equipment::Barbell]),
                &catalog,
                &[],
            ),
            Err(PlanError::InsufficientExercises(InsufficientExercisesError {
                focus: BodyPart::UpperBody,
                role: Role::Major
            }))
        ));
    }

    #[test]
    fn test_generate_plan_no_exercises_for_focus() {
        assert!(matches!(
            generate_plan(
                SessionType::Standard,
                BodyPart::Legs,
                &EquipmentSet::bodyweight(),
                &Catalog::new(vec![exercise("push-up", &[], &[Role::Major])]).unwrap(),
                &[],
            ),
            Err(PlanError::InsufficientExercises(InsufficientExercisesError {
                focus: BodyPart::Legs,
                role: Role::Major
            }))
        ));
    }

    #[test]
    fn test_insufficient_exercises_error_display() {
        assert_eq!(
            InsufficientExercisesError {
                focus: BodyPart::Legs,
                role: Role::Major
            }
            .to_string(),
            "Not enough exercises for the Major slot of a Legs workout with the available equipment"
        );
    }
}
