//! Composite ordering for race classification: every running car
//! ranks ahead of every DNF, then score decides within each group.

use super::race::RaceOutcome;
use std::cmp::Ordering;

/// Classification order for two outcomes. Finished before out, higher
/// score first. DNFs compare equal here; the caller keeps their
/// incident order stable.
pub fn race_order(a: &RaceOutcome, b: &RaceOutcome) -> Ordering {
    match (a, b) {
        (RaceOutcome::Finished(sa), RaceOutcome::Finished(sb)) => sb.total_cmp(sa),
        (RaceOutcome::Finished(_), RaceOutcome::Out(_)) => Ordering::Less,
        (RaceOutcome::Out(_), RaceOutcome::Finished(_)) => Ordering::Greater,
        (RaceOutcome::Out(_), RaceOutcome::Out(_)) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DnfReason;

    #[test]
    fn zero_score_finisher_ranks_above_every_dnf() {
        let mut field = vec![
            RaceOutcome::Out(DnfReason::Crash),
            RaceOutcome::Finished(0.0),
            RaceOutcome::Out(DnfReason::Retirement),
            RaceOutcome::Finished(-12.0),
        ];
        field.sort_by(race_order);
        assert_eq!(field[0], RaceOutcome::Finished(0.0));
        assert_eq!(field[1], RaceOutcome::Finished(-12.0));
        assert!(!field[2].is_finished());
        assert!(!field[3].is_finished());
    }

    #[test]
    fn finishers_sort_by_score_descending() {
        let mut field = vec![
            RaceOutcome::Finished(10.0),
            RaceOutcome::Finished(160.0),
            RaceOutcome::Finished(90.0),
        ];
        field.sort_by(race_order);
        assert_eq!(
            field,
            vec![
                RaceOutcome::Finished(160.0),
                RaceOutcome::Finished(90.0),
                RaceOutcome::Finished(10.0),
            ]
        );
    }

    #[test]
    fn dnf_order_is_stable() {
        let mut field = vec![
            RaceOutcome::Out(DnfReason::Crash),
            RaceOutcome::Out(DnfReason::Collision),
        ];
        field.sort_by(race_order);
        assert_eq!(field[0], RaceOutcome::Out(DnfReason::Crash));
    }
}
