// src/records/ability.rs
use crate::types::ValidationError;

pub const ABILITY_SCORE_MIN: i64 = 1;
pub const ABILITY_SCORE_MAX: i64 = 30;

/// The modifier for an ability score in `1..=30`.
///
/// Each pair of scores shares a modifier: 1 is -5, 2-3 is -4, 10-11 is +0,
/// and so on up to 30 at +10. Scores outside the table are rejected.
pub fn ability_modifier(score: i64) -> Result<i64, ValidationError> {
    if !(ABILITY_SCORE_MIN..=ABILITY_SCORE_MAX).contains(&score) {
        return Err(ValidationError::OutOfRange {
            value: score,
            min: ABILITY_SCORE_MIN,
            max: ABILITY_SCORE_MAX,
        });
    }
    Ok(score.div_euclid(2) - 5)
}

/// `"+3"`, `"+0"`, `"-1"`, or `"?"` when the score is outside the table.
pub fn modifier_label(score: i64) -> String {
    match ability_modifier(score) {
        Ok(modifier) if modifier >= 0 => format!("+{}", modifier),
        Ok(modifier) => modifier.to_string(),
        Err(_) => "?".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_modifier_table() {
        let table = [
            (1, -5),
            (2, -4),
            (3, -4),
            (4, -3),
            (5, -3),
            (6, -2),
            (7, -2),
            (8, -1),
            (9, -1),
            (10, 0),
            (11, 0),
            (12, 1),
            (13, 1),
            (14, 2),
            (15, 2),
            (16, 3),
            (17, 3),
            (18, 4),
            (19, 4),
            (20, 5),
            (21, 5),
            (22, 6),
            (23, 6),
            (24, 7),
            (25, 7),
            (26, 8),
            (27, 8),
            (28, 9),
            (29, 9),
            (30, 10),
        ];
        for (score, expected) in table {
            assert_eq!(ability_modifier(score), Ok(expected), "score {}", score);
        }
    }

    #[test]
    fn test_scores_outside_table_are_rejected() {
        for score in [0, -3, 31, 99] {
            assert_eq!(
                ability_modifier(score),
                Err(ValidationError::OutOfRange {
                    value: score,
                    min: 1,
                    max: 30
                })
            );
        }
    }

    #[test]
    fn test_modifier_labels() {
        assert_eq!(modifier_label(10), "+0");
        assert_eq!(modifier_label(17), "+3");
        assert_eq!(modifier_label(8), "-1");
        assert_eq!(modifier_label(0), "?");
    }
}
