use std::{collections::BTreeSet, slice::Iter};

use derive_more::{Deref, Display};

use crate::Name;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Exercise {
    pub id: ExerciseID,
    pub name: Name,
    pub body_parts: BTreeSet<BodyPart>,
    pub equipment: BTreeSet<Equipment>,
    pub roles: BTreeSet<Role>,
}

impl Exercise {
    #[must_use]
    pub fn is_bodyweight(&self) -> bool {
        self.equipment.is_empty()
    }

    #[must_use]
    pub fn targets(&self, body_part: BodyPart) -> bool {
        self.body_parts.contains(&body_part)
    }

    #[must_use]
    pub fn is_eligible(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }
}

#[derive(Deref, Display, Debug, Clone, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct ExerciseID(String);

impl ExerciseID {
    pub fn new(id: &str) -> Result<Self, ExerciseIDError> {
        if id.is_empty() {
            return Err(ExerciseIDError::Empty);
        }

        if let Some(c) = id
            .chars()
            .find(|c| !(c.is_ascii_lowercase() || c.is_ascii_digit() || *c == '-'))
        {
            return Err(ExerciseIDError::InvalidCharacter(c));
        }

        if id.starts_with('-') || id.ends_with('-') || id.contains("--") {
            return Err(ExerciseIDError::MisplacedHyphen);
        }

        Ok(Self(id.to_string()))
    }
}

/// Derives the ID from the slug of the name. Names without ASCII letters or digits have no slug.
impl TryFrom<&Name> for ExerciseID {
    type Error = ExerciseIDError;

    fn try_from(value: &Name) -> Result<Self, Self::Error> {
        let slug = value.slug();
        if slug.is_empty() {
            return Err(ExerciseIDError::NotDerivable(value.to_string()));
        }
        Ok(Self(slug))
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum ExerciseIDError {
    #[error("Exercise ID must not be empty")]
    Empty,
    #[error("Exercise ID must only contain lowercase letters, digits and hyphens ('{0}')")]
    InvalidCharacter(char),
    #[error("Exercise ID must not start or end with a hyphen or contain consecutive hyphens")]
    MisplacedHyphen,
    #[error("Exercise ID cannot be derived from \"{0}\"")]
    NotDerivable(String),
}

pub trait Property: Clone + Copy + Sized + 'static {
    fn iter() -> Iter<'static, Self>;
    fn name(self) -> &'static str;
    fn id(self) -> &'static str;

    fn from_id(id: &str) -> Option<Self> {
        Self::iter().find(|p| p.id() == id).copied()
    }

    /// Accepts the identifier or the display name, ignoring case and surrounding whitespace.
    fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        Self::iter()
            .find(|p| p.id().eq_ignore_ascii_case(value) || p.name().eq_ignore_ascii_case(value))
            .copied()
    }
}

/// Body part an exercise trains. Doubles as the focus of a workout.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, PartialOrd, Ord)]
pub enum BodyPart {
    UpperBody,
    Legs,
    Core,
    FullBody,
}

pub type Focus = BodyPart;

impl Property for BodyPart {
    fn iter() -> Iter<'static, BodyPart> {
        static BODY_PARTS: [BodyPart; 4] = [
            BodyPart::UpperBody,
            BodyPart::Legs,
            BodyPart::Core,
            BodyPart::FullBody,
        ];
        BODY_PARTS.iter()
    }

    fn name(self) -> &'static str {
        match self {
            BodyPart::UpperBody => "Upper Body",
            BodyPart::Legs => "Legs",
            BodyPart::Core => "Core",
            BodyPart::FullBody => "Full Body",
        }
    }

    fn id(self) -> &'static str {
        match self {
            BodyPart::UpperBody => "upper_body",
            BodyPart::Legs => "legs",
            BodyPart::Core => "core",
            BodyPart::FullBody => "full_body",
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, PartialOrd, Ord)]
pub enum Equipment {
    Barbell,
    Bench,
    Box,
    Cable,
    Dumbbell,
    ExerciseBall,
    GymnasticRings,
    Kettlebell,
    Machine,
    ParallelBars,
    PullUpBar,
    ResistanceBand,
    Sliders,
    TrapBar,
}

impl Property for Equipment {
    fn iter() -> Iter<'static, Equipment> {
        static EQUIPMENT: [Equipment; 14] = [
            Equipment::Barbell,
            Equipment::Bench,
            Equipment::Box,
            Equipment::Cable,
            Equipment::Dumbbell,
            Equipment::ExerciseBall,
            Equipment::GymnasticRings,
            Equipment::Kettlebell,
            Equipment::Machine,
            Equipment::ParallelBars,
            Equipment::PullUpBar,
            Equipment::ResistanceBand,
            Equipment::Sliders,
            Equipment::TrapBar,
        ];
        EQUIPMENT.iter()
    }

    fn name(self) -> &'static str {
        match self {
            Equipment::Barbell => "Barbell",
            Equipment::Bench => "Bench",
            Equipment::Box => "Box",
            Equipment::Cable => "Cable",
            Equipment::Dumbbell => "Dumbbell",
            Equipment::ExerciseBall => "Exercise Ball",
            Equipment::GymnasticRings => "Gymnastic Rings",
            Equipment::Kettlebell => "Kettlebell",
            Equipment::Machine => "Machine",
            Equipment::ParallelBars => "Parallel Bars",
            Equipment::PullUpBar => "Pull Up Bar",
            Equipment::ResistanceBand => "Resistance Band",
            Equipment::Sliders => "Sliders",
            Equipment::TrapBar => "Trap Bar",
        }
    }

    fn id(self) -> &'static str {
        match self {
            Equipment::Barbell => "barbell",
            Equipment::Bench => "bench",
            Equipment::Box => "box",
            Equipment::Cable => "cable",
            Equipment::Dumbbell => "dumbbell",
            Equipment::ExerciseBall => "exercise_ball",
            Equipment::GymnasticRings => "gymnastic_rings",
            Equipment::Kettlebell => "kettlebell",
            Equipment::Machine => "machine",
            Equipment::ParallelBars => "parallel_bars",
            Equipment::PullUpBar => "pull_up_bar",
            Equipment::ResistanceBand => "resistance_band",
            Equipment::Sliders => "sliders",
            Equipment::TrapBar => "trap_bar",
        }
    }
}

/// Position of an exercise within a workout.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, PartialOrd, Ord)]
pub enum Role {
    Major,
    Minor,
    Tertiary,
}

impl Property for Role {
    fn iter() -> Iter<'static, Role> {
        static ROLES: [Role; 3] = [Role::Major, Role::Minor, Role::Tertiary];
        ROLES.iter()
    }

    fn name(self) -> &'static str {
        match self {
            Role::Major => "Major",
            Role::Minor => "Minor",
            Role::Tertiary => "Tertiary",
        }
    }

    fn id(self) -> &'static str {
        match self {
            Role::Major => "major",
            Role::Minor => "minor",
            Role::Tertiary => "tertiary",
        }
    }
}
