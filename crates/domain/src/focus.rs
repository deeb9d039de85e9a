use log::debug;

use crate::{BodyPart, Focus, Property, ScheduleEntry};

/// Focus that is due next in the canonical rotation of body parts.
#[must_use]
pub fn next_focus(history: &[ScheduleEntry]) -> Focus {
    next_focus_in(BodyPart::iter().as_slice(), history).unwrap_or(BodyPart::UpperBody)
}

/// Focus of the rotation that was scheduled least recently.
///
/// Focuses without any entry come first. Otherwise the focus whose latest entry is the oldest is
/// chosen. Ties go to the focus listed first in the rotation. Planned and completed entries
/// count alike.
#[must_use]
pub fn next_focus_in(rotation: &[Focus], history: &[ScheduleEntry]) -> Option<Focus> {
    let focus = rotation.iter().copied().min_by_key(|focus| {
        history
            .iter()
            .filter(|e| e.focus == *focus)
            .map(|e| e.date)
            .max()
    });
    if let Some(focus) = focus {
        debug!(
            "next focus is {} ({} entries in history)",
            focus.name(),
            history.len()
        );
    }
    focus
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use crate::{ScheduleEntryID, SessionType};

    use super::*;

    fn entry(day: u32, focus: Focus, completed: bool) -> ScheduleEntry {
        ScheduleEntry {
            id: ScheduleEntryID::from(u128::from(day)),
            date: NaiveDate::from_ymd_opt(2024, 3, day).unwrap(),
            focus,
            session_type: SessionType::Standard,
            exercises: vec![],
            completed,
        }
    }

    #[rstest]
    #[case::empty_history(vec![], BodyPart::UpperBody)]
    #[case::first_unscheduled(vec![entry(1, BodyPart::UpperBody, true)], BodyPart::Legs)]
    #[case::planned_counts_as_scheduled(
        vec![entry(1, BodyPart::UpperBody, true), entry(2, BodyPart::Legs, false)],
        BodyPart::Core
    )]
    #[case::unscheduled_before_older(
        vec![
            entry(1, BodyPart::UpperBody, true),
            entry(2, BodyPart::Legs, true),
            entry(3, BodyPart::FullBody, true),
        ],
        BodyPart::Core
    )]
    #[case::least_recent(
        vec![
            entry(1, BodyPart::UpperBody, true),
            entry(2, BodyPart::Legs, true),
            entry(3, BodyPart::Core, true),
            entry(4, BodyPart::FullBody, true),
            entry(5, BodyPart::UpperBody, true),
        ],
        BodyPart::Legs
    )]
    #[case::latest_entry_per_focus_decides(
        vec![
            entry(1, BodyPart::Legs, true),
            entry(2, BodyPart::UpperBody, true),
            entry(3, BodyPart::Core, true),
            entry(4, BodyPart::FullBody, true),
            entry(5, BodyPart::Legs, true),
        ],
        BodyPart::UpperBody
    )]
    #[case::tie_resolved_by_canonical_order(
        vec![
            entry(2, BodyPart::FullBody, true),
            entry(2, BodyPart::Core, true),
            entry(2, BodyPart::Legs, true),
            entry(2, BodyPart::UpperBody, true),
        ],
        BodyPart::UpperBody
    )]
    #[case::unordered_history(
        vec![
            entry(9, BodyPart::UpperBody, true),
            entry(3, BodyPart::Core, true),
            entry(7, BodyPart::Legs, true),
            entry(5, BodyPart::FullBody, true),
        ],
        BodyPart::Core
    )]
    fn test_next_focus(#[case] history: Vec<ScheduleEntry>, #[case] expected: Focus) {
        assert_eq!(next_focus(&history), expected);
    }

    #[test]
    fn test_next_focus_in() {
        let history = [entry(1, BodyPart::Legs, true), entry(2, BodyPart::Core, true)];
        assert_eq!(
            next_focus_in(&[BodyPart::Core, BodyPart::Legs], &history),
            Some(BodyPart::Legs)
        );
        assert_eq!(
            next_focus_in(&[BodyPart::Core, BodyPart::UpperBody], &history),
            Some(BodyPart::UpperBody)
        );
        assert_eq!(next_focus_in(&[], &history), None);
    }

    #[test]
    fn test_next_focus_never_repeats_while_focus_unscheduled() {
        let mut history = vec![];
        for day in 1..=4 {
            let focus = next_focus(&history);
            assert!(history.iter().all(|e: &ScheduleEntry| e.focus != focus));
            history.push(entry(day, focus, false));
        }
        assert_eq!(
            history.iter().map(|e| e.focus).collect::<Vec<_>>(),
            BodyPart::iter().copied().collect::<Vec<_>>()
        );
        assert_eq!(next_focus(&history), BodyPart::UpperBody);
    }
}
