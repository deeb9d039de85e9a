use std::{collections::BTreeSet, ops::Range};

use chrono::{Days, NaiveDate};

use crate::{BodyPart, Focus, Property, ReadError, SessionType, UpdateError};

#[allow(async_fn_in_trait)]
pub trait SettingsService {
    async fn get_settings(&self) -> Result<Settings, ReadError>;
    async fn set_settings(&self, settings: Settings) -> Result<Settings, UpdateError>;
}

#[allow(async_fn_in_trait)]
pub trait SettingsRepository {
    async fn read_settings(&self) -> Result<Settings, ReadError>;
    async fn write_settings(&self, settings: Settings) -> Result<Settings, UpdateError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub default_session_type: SessionType,
    pub rotation: Vec<Focus>,
    pub rotation_window_days: u32,
    pub variety: bool,
}

impl Settings {
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.rotation.is_empty() {
            return Err(SettingsError::EmptyRotation);
        }

        let mut seen = BTreeSet::new();
        for focus in &self.rotation {
            if !seen.insert(focus) {
                return Err(SettingsError::DuplicateFocus(*focus));
            }
        }

        if self.rotation_window_days == 0 {
            return Err(SettingsError::EmptyWindow);
        }

        Ok(())
    }

    /// Dates within the rotation window before and after the given date, clamped to the range
    /// of representable dates.
    #[must_use]
    pub fn rotation_window(&self, date: NaiveDate) -> Range<NaiveDate> {
        let days = Days::new(u64::from(self.rotation_window_days));
        date.checked_sub_days(days).unwrap_or(NaiveDate::MIN)
            ..date.checked_add_days(days).unwrap_or(NaiveDate::MAX)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_session_type: SessionType::Standard,
            rotation: BodyPart::iter().copied().collect(),
            rotation_window_days: 7,
            variety: true,
        }
    }
}

#[derive(thiserror::Error, Debug, PartialEq)]
pub enum SettingsError {
    #[error("Rotation must contain at least one focus")]
    EmptyRotation,
    #[error("Rotation must not contain {} more than once", .0.name())]
    DuplicateFocus(Focus),
    #[error("Rotation window must be at least one day")]
    EmptyWindow,
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    #[test]
    fn test_settings_default() {
        assert_eq!(
            Settings::default(),
            Settings {
                default_session_type: SessionType::Standard,
                rotation: vec![
                    BodyPart::UpperBody,
                    BodyPart::Legs,
                    BodyPart::Core,
                    BodyPart::FullBody
                ],
                rotation_window_days: 7,
                variety: true,
            }
        );
        assert_eq!(Settings::default().validate(), Ok(()));
    }

    #[rstest]
    #[case::empty_rotation(
        Settings { rotation: vec![], ..Settings::default() },
        Err(SettingsError::EmptyRotation)
    )]
    #[case::duplicate_focus(
        Settings { rotation: vec![BodyPart::Legs, BodyPart::Core, BodyPart::Legs], ..Settings::default() },
        Err(SettingsError::DuplicateFocus(BodyPart::Legs))
    )]
    #[case::empty_window(
        Settings { rotation_window_days: 0, ..Settings::default() },
        Err(SettingsError::EmptyWindow)
    )]
    #[case::partial_rotation(
        Settings { rotation: vec![BodyPart::Core], ..Settings::default() },
        Ok(())
    )]
    fn test_settings_validate(
        #[case] settings: Settings,
        #[case] expected: Result<(), SettingsError>,
    ) {
        assert_eq!(settings.validate(), expected);
    }

    #[test]
    fn test_settings_rotation_window() {
        let settings = Settings {
            rotation_window_days: 3,
            ..Settings::default()
        };
        assert_eq!(
            settings.rotation_window(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()),
            NaiveDate::from_ymd_opt(2024, 2, 27).unwrap()
                ..NaiveDate::from_ymd_opt(2024, 3, 4).unwrap()
        );
    }

    #[test]
    fn test_settings_rotation_window_clamped() {
        let settings = Settings {
            rotation_window_days: u32::MAX,
            ..Settings::default()
        };
        assert_eq!(settings.validate(), Ok(()));
        assert_eq!(
            settings.rotation_window(NaiveDate::from_ymd_opt(2024, 3, 4).unwrap()),
            NaiveDate::MIN..NaiveDate::MAX
        );
        assert_eq!(
            Settings::default().rotation_window(NaiveDate::MAX),
            NaiveDate::MAX - Days::new(7)..NaiveDate::MAX
        );
    }

    #[test]
    fn test_settings_error_display() {
        assert_eq!(
            SettingsError::DuplicateFocus(BodyPart::UpperBody).to_string(),
            "Rotation must not contain Upper Body more than once"
        );
    }
}
