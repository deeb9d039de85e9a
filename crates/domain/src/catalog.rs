use std::collections::{BTreeMap, BTreeSet};

use log::debug;

use crate::{
    BodyPart, Equipment, Exercise, ExerciseID, ExerciseIDError, Name, NameError, Property,
    ReadError, Role,
};

#[allow(async_fn_in_trait)]
pub trait CatalogService {
    async fn load_catalog(&self) -> Result<Catalog, CatalogLoadError>;
}

#[allow(async_fn_in_trait)]
pub trait CatalogRepository {
    async fn read_catalog(&self) -> Result<Vec<ExerciseRecord>, CatalogLoadError>;
}

/// Exercise as it appears in a dataset, before validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExerciseRecord {
    pub id: Option<String>,
    pub name: Option<String>,
    pub body_parts: Option<Vec<String>>,
    pub equipment: Option<Vec<String>>,
    pub roles: Option<Vec<String>>,
}

impl TryFrom<ExerciseRecord> for Exercise {
    type Error = RecordError;

    fn try_from(value: ExerciseRecord) -> Result<Self, Self::Error> {
        let name = Name::new(&value.name.ok_or(RecordError::MissingField("name"))?)?;
        let id = match value.id {
            Some(id) => ExerciseID::new(&id)?,
            None => ExerciseID::try_from(&name)?,
        };
        Ok(Self {
            id,
            name,
            body_parts: parse_properties(
                value
                    .body_parts
                    .ok_or(RecordError::MissingField("body_parts"))?,
                RecordError::UnknownBodyPart,
            )?,
            equipment: parse_properties(
                value.equipment.unwrap_or_default(),
                RecordError::UnknownEquipment,
            )?,
            roles: parse_properties(
                value.roles.ok_or(RecordError::MissingField("roles"))?,
                RecordError::UnknownRole,
            )?,
        })
    }
}

fn parse_properties<P: Property + Ord>(
    ids: Vec<String>,
    unknown: fn(String) -> RecordError,
) -> Result<BTreeSet<P>, RecordError> {
    ids.into_iter()
        .map(|id| P::from_id(&id).ok_or_else(|| unknown(id)))
        .collect()
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum RecordError {
    #[error("missing field \"{0}\"")]
    MissingField(&'static str),
    #[error(transparent)]
    InvalidID(#[from] ExerciseIDError),
    #[error(transparent)]
    InvalidName(#[from] NameError),
    #[error("unknown body part \"{0}\"")]
    UnknownBodyPart(String),
    #[error("unknown equipment \"{0}\"")]
    UnknownEquipment(String),
    #[error("unknown role \"{0}\"")]
    UnknownRole(String),
}

#[derive(thiserror::Error, Debug)]
pub enum CatalogLoadError {
    #[error("catalog not found: {0}")]
    Missing(String),
    #[error("malformed catalog: {0}")]
    Malformed(String),
    #[error("invalid exercise at index {index}: {error}")]
    InvalidRecord { index: usize, error: RecordError },
    #[error("catalog contains no exercises")]
    Empty,
    #[error("duplicate exercise ID \"{0}\"")]
    DuplicateID(ExerciseID),
    #[error("exercise \"{0}\" has no body parts")]
    NoBodyParts(ExerciseID),
    #[error("exercise \"{0}\" has no roles")]
    NoRoles(ExerciseID),
    #[error(transparent)]
    Unavailable(#[from] ReadError),
}

/// Read-only exercise collection indexed by body part, role and equipment.
///
/// Exercises are kept in ascending order of their ID, and every lookup returns them in that
/// order.
#[derive(Debug, Clone)]
pub struct Catalog {
    exercises: Vec<Exercise>,
    by_id: BTreeMap<ExerciseID, usize>,
    by_body_part: BTreeMap<BodyPart, Vec<usize>>,
    by_role: BTreeMap<Role, Vec<usize>>,
    by_equipment: BTreeMap<Equipment, Vec<usize>>,
}

impl Catalog {
    pub fn new(mut exercises: Vec<Exercise>) -> Result<Self, CatalogLoadError> {
        if exercises.is_empty() {
            return Err(CatalogLoadError::Empty);
        }

        exercises.sort_by(|a, b| a.id.cmp(&b.id));

        let mut by_id = BTreeMap::new();
        let mut by_body_part: BTreeMap<BodyPart, Vec<usize>> = BTreeMap::new();
        let mut by_role: BTreeMap<Role, Vec<usize>> = BTreeMap::new();
        let mut by_equipment: BTreeMap<Equipment, Vec<usize>> = BTreeMap::new();

        for (index, exercise) in exercises.iter().enumerate() {
            if by_id.insert(exercise.id.clone(), index).is_some() {
                return Err(CatalogLoadError::DuplicateID(exercise.id.clone()));
            }
            if exercise.body_parts.is_empty() {
                return Err(CatalogLoadError::NoBodyParts(exercise.id.clone()));
            }
            if exercise.roles.is_empty() {
                return Err(CatalogLoadError::NoRoles(exercise.id.clone()));
            }
            for body_part in &exercise.body_parts {
                by_body_part.entry(*body_part).or_default().push(index);
            }
            for role in &exercise.roles {
                by_role.entry(*role).or_default().push(index);
            }
            for equipment in &exercise.equipment {
                by_equipment.entry(*equipment).or_default().push(index);
            }
        }

        debug!("indexed catalog of {} exercises", exercises.len());

        Ok(Self {
            exercises,
            by_id,
            by_body_part,
            by_role,
            by_equipment,
        })
    }

    /// Validates the records of a dataset and builds the catalog from them.
    pub fn load(records: Vec<ExerciseRecord>) -> Result<Self, CatalogLoadError> {
        let exercises = records
            .into_iter()
            .enumerate()
            .map(|(index, record)| {
                Exercise::try_from(record)
                    .map_err(|error| CatalogLoadError::InvalidRecord { index, error })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(exercises)
    }

    pub fn builtin() -> Result<Self, CatalogLoadError> {
        Self::load(
            EXERCISE_VARIANTS
                .iter()
                .flat_map(|e| {
                    std::iter::once(e.record()).chain(e.variants.iter().map(move |v| v.record(e)))
                })
                .collect(),
        )
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.exercises.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.exercises.is_empty()
    }

    #[must_use]
    pub fn exercises(&self) -> &[Exercise] {
        &self.exercises
    }

    #[must_use]
    pub fn get(&self, id: &ExerciseID) -> Option<&Exercise> {
        self.by_id.get(id).map(|index| &self.exercises[*index])
    }

    #[must_use]
    pub fn by_body_part(&self, body_part: BodyPart) -> Vec<&Exercise> {
        self.lookup(self.by_body_part.get(&body_part))
    }

    #[must_use]
    pub fn by_role(&self, role: Role) -> Vec<&Exercise> {
        self.lookup(self.by_role.get(&role))
    }

    #[must_use]
    pub fn by_equipment(&self, equipment: Equipment) -> Vec<&Exercise> {
        self.lookup(self.by_equipment.get(&equipment))
    }

    fn lookup(&self, indices: Option<&Vec<usize>>) -> Vec<&Exercise> {
        indices
            .map(|indices| indices.iter().map(|i| &self.exercises[*i]).collect())
            .unwrap_or_default()
    }
}

struct BaseExercise {
    name: &'static str,
    body_parts: &'static [BodyPart],
    equipment: &'static [Equipment],
    roles: &'static [Role],
    variants: &'static [ExerciseVariant],
}

impl BaseExercise {
    fn record(&self) -> ExerciseRecord {
        ExerciseRecord {
            id: None,
            name: Some(self.name.to_string()),
            body_parts: Some(ids(self.body_parts)),
            equipment: Some(ids(self.equipment)),
            roles: Some(ids(self.roles)),
        }
    }
}

#[cfg_attr(test, derive(Debug, PartialEq))]
struct ExerciseVariant {
    name: &'static str,
    body_parts: Option<&'static [BodyPart]>,
    equipment: Option<&'static [Equipment]>,
    roles: Option<&'static [Role]>,
}

impl ExerciseVariant {
    const fn default() -> Self {
        Self {
            name: "",
            body_parts: None,
            equipment: None,
            roles: None,
        }
    }

    fn record(&self, base: &BaseExercise) -> ExerciseRecord {
        ExerciseRecord {
            id: None,
            name: Some(self.name.to_string()),
            body_parts: Some(ids(self.body_parts.unwrap_or(base.body_parts))),
            equipment: Some(ids(self.equipment.unwrap_or(base.equipment))),
            roles: Some(ids(self.roles.unwrap_or(base.roles))),
        }
    }
}

fn ids<P: Property>(properties: &[P]) -> Vec<String> {
    properties.iter().map(|p| p.id().to_string()).collect()
}

const EXERCISE_VARIANTS: [BaseExercise; 36] = [
    BaseExercise {
        name: "Barbell Ab Rollout",
        body_parts: &[BodyPart::Core],
        equipment: &[Equipment::Barbell],
        roles: &[Role::Major, Role::Minor],
        variants: &[ExerciseVariant {
            name: "Kneeling Barbell Ab Rollout",
            roles: Some(&[Role::Minor, Role::Tertiary]),
            ..ExerciseVariant::default()
        }],
    },
    BaseExercise {
        name: "Barbell Back Squat",
        body_parts: &[BodyPart::Legs],
        equipment: &[Equipment::Barbell],
        roles: &[Role::Major],
        variants: &[ExerciseVariant {
            name: "Barbell Front Squat",
            roles: Some(&[Role::Major, Role::Minor]),
            ..ExerciseVariant::default()
        }],
    },
    BaseExercise {
        name: "Barbell Bench Press",
        body_parts: &[BodyPart::UpperBody],
        equipment: &[Equipment::Barbell, Equipment::Bench],
        roles: &[Role::Major],
        variants: &[ExerciseVariant {
            name: "Close-Grip Barbell Bench Press",
            roles: Some(&[Role::Minor]),
            ..ExerciseVariant::default()
        }],
    },
    BaseExercise {
        name: "Barbell Curl",
        body_parts: &[BodyPart::UpperBody],
        equipment: &[Equipment::Barbell],
        roles: &[Role::Tertiary],
        variants: &[],
    },
    BaseExercise {
        name: "Barbell Deadlift",
        body_parts: &[BodyPart::FullBody, BodyPart::Legs],
        equipment: &[Equipment::Barbell],
        roles: &[Role::Major],
        variants: &[ExerciseVariant {
            name: "Barbell Romanian Deadlift",
            body_parts: Some(&[BodyPart::Legs]),
            roles: Some(&[Role::Major, Role::Minor]),
            ..ExerciseVariant::default()
        }],
    },
    BaseExercise {
        name: "Barbell Overhead Press",
        body_parts: &[BodyPart::UpperBody],
        equipment: &[Equipment::Barbell],
        roles: &[Role::Major, Role::Minor],
        variants: &[],
    },
    BaseExercise {
        name: "Barbell Row",
        body_parts: &[BodyPart::UpperBody],
        equipment: &[Equipment::Barbell],
        roles: &[Role::Major, Role::Minor],
        variants: &[],
    },
    BaseExercise {
        name: "Bear Crawl",
        body_parts: &[BodyPart::FullBody, BodyPart::Core],
        equipment: &[],
        roles: &[Role::Minor, Role::Tertiary],
        variants: &[],
    },
    BaseExercise {
        name: "Bench Dip",
        body_parts: &[BodyPart::UpperBody],
        equipment: &[Equipment::Bench],
        roles: &[Role::Minor, Role::Tertiary],
        variants: &[],
    },
    BaseExercise {
        name: "Bodyweight Squat",
        body_parts: &[BodyPart::Legs],
        equipment: &[],
        roles: &[Role::Major, Role::Minor],
        variants: &[ExerciseVariant {
            name: "Jump Squat",
            body_parts: Some(&[BodyPart::Legs, BodyPart::FullBody]),
            roles: Some(&[Role::Minor]),
            ..ExerciseVariant::default()
        }],
    },
    BaseExercise {
        name: "Box Jump",
        body_parts: &[BodyPart::Legs, BodyPart::FullBody],
        equipment: &[Equipment::Box],
        roles: &[Role::Minor],
        variants: &[],
    },
    BaseExercise {
        name: "Bulgarian Split Squat",
        body_parts: &[BodyPart::Legs],
        equipment: &[Equipment::Bench],
        roles: &[Role::Major, Role::Minor],
        variants: &[],
    },
    BaseExercise {
        name: "Burpee",
        body_parts: &[BodyPart::FullBody],
        equipment: &[],
        roles: &[Role::Major, Role::Minor],
        variants: &[],
    },
    BaseExercise {
        name: "Cable Crunch",
        body_parts: &[BodyPart::Core],
        equipment: &[Equipment::Cable],
        roles: &[Role::Major, Role::Minor],
        variants: &[],
    },
    BaseExercise {
        name: "Cable Fly",
        body_parts: &[BodyPart::UpperBody],
        equipment: &[Equipment::Cable],
        roles: &[Role::Tertiary],
        variants: &[],
    },
    BaseExercise {
        name: "Calf Raise",
        body_parts: &[BodyPart::Legs],
        equipment: &[],
        roles: &[Role::Tertiary],
        variants: &[],
    },
    BaseExercise {
        name: "Chin Up",
        body_parts: &[BodyPart::UpperBody],
        equipment: &[Equipment::PullUpBar],
        roles: &[Role::Major],
        variants: &[ExerciseVariant {
            name: "Pull Up",
            ..ExerciseVariant::default()
        }],
    },
    BaseExercise {
        name: "Dead Bug",
        body_parts: &[BodyPart::Core],
        equipment: &[],
        roles: &[Role::Minor, Role::Tertiary],
        variants: &[],
    },
    BaseExercise {
        name: "Dumbbell Bench Press",
        body_parts: &[BodyPart::UpperBody],
        equipment: &[Equipment::Dumbbell, Equipment::Bench],
        roles: &[Role::Major],
        variants: &[ExerciseVariant {
            name: "Incline Dumbbell Bench Press",
            roles: Some(&[Role::Minor]),
            ..ExerciseVariant::default()
        }],
    },
    BaseExercise {
        name: "Dumbbell Lateral Raise",
        body_parts: &[BodyPart::UpperBody],
        equipment: &[Equipment::Dumbbell],
        roles: &[Role::Tertiary],
        variants: &[],
    },
    BaseExercise {
        name: "Dumbbell Thruster",
        body_parts: &[BodyPart::FullBody],
        equipment: &[Equipment::Dumbbell],
        roles: &[Role::Major],
        variants: &[],
    },
    BaseExercise {
        name: "Glute Bridge",
        body_parts: &[BodyPart::Legs],
        equipment: &[],
        roles: &[Role::Minor, Role::Tertiary],
        variants: &[],
    },
    BaseExercise {
        name: "Goblet Squat",
        body_parts: &[BodyPart::Legs],
        equipment: &[Equipment::Kettlebell],
        roles: &[Role::Major, Role::Minor],
        variants: &[],
    },
    BaseExercise {
        name: "Hanging Leg Raise",
        body_parts: &[BodyPart::Core],
        equipment: &[Equipment::PullUpBar],
        roles: &[Role::Major],
        variants: &[],
    },
    BaseExercise {
        name: "Jumping Jack",
        body_parts: &[BodyPart::FullBody],
        equipment: &[],
        roles: &[Role::Tertiary],
        variants: &[],
    },
    BaseExercise {
        name: "Kettlebell Swing",
        body_parts: &[BodyPart::FullBody, BodyPart::Legs],
        equipment: &[Equipment::Kettlebell],
        roles: &[Role::Major, Role::Minor],
        variants: &[],
    },
    BaseExercise {
        name: "Leg Curl",
        body_parts: &[BodyPart::Legs],
        equipment: &[Equipment::Machine],
        roles: &[Role::Tertiary],
        variants: &[],
    },
    BaseExercise {
        name: "Leg Extension",
        body_parts: &[BodyPart::Legs],
        equipment: &[Equipment::Machine],
        roles: &[Role::Tertiary],
        variants: &[],
    },
    BaseExercise {
        name: "Mountain Climber",
        body_parts: &[BodyPart::FullBody, BodyPart::Core],
        equipment: &[],
        roles: &[Role::Minor, Role::Tertiary],
        variants: &[],
    },
    BaseExercise {
        name: "Plank",
        body_parts: &[BodyPart::Core],
        equipment: &[],
        roles: &[Role::Minor, Role::Tertiary],
        variants: &[ExerciseVariant {
            name: "Side Plank",
            roles: Some(&[Role::Tertiary]),
            ..ExerciseVariant::default()
        }],
    },
    BaseExercise {
        name: "Plank Shoulder Tap",
        body_parts: &[BodyPart::UpperBody, BodyPart::Core],
        equipment: &[],
        roles: &[Role::Tertiary],
        variants: &[],
    },
    BaseExercise {
        name: "Push Up",
        body_parts: &[BodyPart::UpperBody],
        equipment: &[],
        roles: &[Role::Major, Role::Minor],
        variants: &[
            ExerciseVariant {
                name: "Diamond Push Up",
                roles: Some(&[Role::Minor, Role::Tertiary]),
                ..ExerciseVariant::default()
            },
            ExerciseVariant {
                name: "Pike Push Up",
                roles: Some(&[Role::Minor]),
                ..ExerciseVariant::default()
            },
        ],
    },
    BaseExercise {
        name: "Ring Row",
        body_parts: &[BodyPart::UpperBody],
        equipment: &[Equipment::GymnasticRings],
        roles: &[Role::Minor],
        variants: &[],
    },
    BaseExercise {
        name: "Russian Twist",
        body_parts: &[BodyPart::Core],
        equipment: &[],
        roles: &[Role::Minor],
        variants: &[],
    },
    BaseExercise {
        name: "V-Up",
        body_parts: &[BodyPart::Core],
        equipment: &[],
        roles: &[Role::Major, Role::Minor],
        variants: &[],
    },
    BaseExercise {
        name: "Walking Lunge",
        body_parts: &[BodyPart::Legs],
        equipment: &[],
        roles: &[Role::Major, Role::Minor],
        variants: &[],
    },
];
