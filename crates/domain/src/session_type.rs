use std::slice::Iter;

use crate::{Property, Role};

#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub enum SessionType {
    #[default]
    Standard = 1,
    Express = 2,
    Maintenance = 3,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SlotSpec {
    pub role: Role,
    pub sets: u32,
}

const STANDARD: [SlotSpec; 3] = [
    SlotSpec {
        role: Role::Major,
        sets: 3,
    },
    SlotSpec {
        role: Role::Minor,
        sets: 2,
    },
    SlotSpec {
        role: Role::Tertiary,
        sets: 1,
    },
];

const EXPRESS: [SlotSpec; 2] = [
    SlotSpec {
        role: Role::Major,
        sets: 3,
    },
    SlotSpec {
        role: Role::Minor,
        sets: 2,
    },
];

const MAINTENANCE: [SlotSpec; 2] = [
    SlotSpec {
        role: Role::Major,
        sets: 2,
    },
    SlotSpec {
        role: Role::Minor,
        sets: 2,
    },
];

impl SessionType {
    #[must_use]
    pub fn slots(self) -> &'static [SlotSpec] {
        match self {
            SessionType::Standard => &STANDARD,
            SessionType::Express => &EXPRESS,
            SessionType::Maintenance => &MAINTENANCE,
        }
    }

    #[must_use]
    pub fn total_sets(self) -> u32 {
        self.slots().iter().map(|s| s.sets).sum()
    }
}

impl Property for SessionType {
    fn iter() -> Iter<'static, SessionType> {
        static SESSION_TYPES: [SessionType; 3] = [
            SessionType::Standard,
            SessionType::Express,
            SessionType::Maintenance,
        ];
        SESSION_TYPES.iter()
    }

    fn name(self) -> &'static str {
        match self {
            SessionType::Standard => "Standard",
            SessionType::Express => "Express",
            SessionType::Maintenance => "Maintenance",
        }
    }

    fn id(self) -> &'static str {
        match self {
            SessionType::Standard => "standard",
            SessionType::Express => "express",
            SessionType::Maintenance => "maintenance",
        }
    }
}

impl TryFrom<&str> for SessionType {
    type Error = UnsupportedSessionTypeError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        SessionType::parse(value).ok_or_else(|| UnsupportedSessionTypeError(value.to_string()))
    }
}

impl TryFrom<u8> for SessionType {
    type Error = UnsupportedSessionTypeError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            x if x == SessionType::Standard as u8 => Ok(SessionType::Standard),
            x if x == SessionType::Express as u8 => Ok(SessionType::Express),
            x if x == SessionType::Maintenance as u8 => Ok(SessionType::Maintenance),
            _ => Err(UnsupportedSessionTypeError(value.to_string())),
        }
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
#[error("Unsupported session type \"{0}\"")]
pub struct UnsupportedSessionTypeError(pub String);
