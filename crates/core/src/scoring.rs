use std::fmt;

use chrono::NaiveDate;

use crate::model::{MemoryScore, Rating, WordId};

/// Same-day positive rating deltas shrink once the score reaches this value.
const DIMINISH_THRESHOLD: f64 = 50.0;

//
// ─── STRATEGY ──────────────────────────────────────────────────────────────────
//

/// One study event's effect on a word's memory score.
///
/// The flashcard rule and the typing-test rule are deliberately different
/// and stay behind this one seam as two named strategies. Storage applies a
/// strategy inside its atomic read-modify-write, so implementations must be
/// pure: same inputs, same output, no side effects.
pub trait ScoreUpdateStrategy: fmt::Debug + Send + Sync {
    /// Short mode name used in logs.
    fn mode(&self) -> &'static str;

    /// Next score given the current one and whether the word was already
    /// studied today. Implementations clamp into `[0, 100]`.
    fn next_score(&self, current: MemoryScore, studied_today: bool) -> MemoryScore;
}

//
// ─── FLASHCARD RATING ──────────────────────────────────────────────────────────
//

/// Flashcard-mode update from a `1..=4` self-assessment.
///
/// First study of the day applies the full delta. A same-day repeat applies
/// the full delta while the word is still below 50, and the diminished
/// positive delta once it is at or above 50; penalties are never diminished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RatingUpdate {
    rating: Rating,
}

impl RatingUpdate {
    #[must_use]
    pub fn new(rating: Rating) -> Self {
        Self { rating }
    }

    #[must_use]
    pub fn rating(self) -> Rating {
        self.rating
    }
}

impl ScoreUpdateStrategy for RatingUpdate {
    fn mode(&self) -> &'static str {
        "flashcard"
    }

    fn next_score(&self, current: MemoryScore, studied_today: bool) -> MemoryScore {
        let diminished = studied_today && current.value() >= DIMINISH_THRESHOLD;
        let delta = if diminished {
            self.rating.diminished_delta()
        } else {
            self.rating.full_delta()
        };
        current.offset(delta)
    }
}

//
// ─── TYPING TEST ───────────────────────────────────────────────────────────────
//

/// Typing-test update from a plain correct/incorrect outcome.
///
/// A correct answer earns +25 on the first study of the day and +2.5 on any
/// same-day repeat, regardless of the current score. An incorrect answer
/// always costs the full -25. This rule is simpler than the flashcard one
/// and the two are kept separate; tests pin the difference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TestAnswerUpdate {
    correct: bool,
}

/// Delta for a correct answer on the first study of the day.
const CORRECT_DELTA: f64 = 25.0;
/// Delta for a correct answer on a same-day repeat.
const CORRECT_REPEAT_DELTA: f64 = 2.5;
/// Delta for an incorrect answer, same-day or not.
const INCORRECT_DELTA: f64 = -25.0;

impl TestAnswerUpdate {
    #[must_use]
    pub fn new(correct: bool) -> Self {
        Self { correct }
    }

    #[must_use]
    pub fn is_correct(self) -> bool {
        self.correct
    }
}

impl ScoreUpdateStrategy for TestAnswerUpdate {
    fn mode(&self) -> &'static str {
        "typing-test"
    }

    fn next_score(&self, current: MemoryScore, studied_today: bool) -> MemoryScore {
        let delta = if self.correct {
            if studied_today {
                CORRECT_REPEAT_DELTA
            } else {
                CORRECT_DELTA
            }
        } else {
            INCORRECT_DELTA
        };
        current.offset(delta)
    }
}

//
// ─── CHANGE RECORD ─────────────────────────────────────────────────────────────
//

/// Committed result of one score update.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreChange {
    pub word_id: WordId,
    pub previous: MemoryScore,
    pub new_score: MemoryScore,
    /// The study date the update stamped onto the word.
    pub last_studied: NaiveDate,
}

impl ScoreChange {
    /// Signed difference actually applied, after clamping.
    #[must_use]
    pub fn applied_delta(&self) -> f64 {
        self.new_score.value() - self.previous.value()
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    fn score(value: f64) -> MemoryScore {
        MemoryScore::new(value).unwrap()
    }

    #[test]
    fn test_first_rating_of_day_uses_full_delta() {
        let update = RatingUpdate::new(Rating::Good);
        let next = update.next_score(score(50.0), false);
        assert_eq!(next.value(), 62.5);
    }

    #[test]
    fn test_same_day_repeat_on_strong_word_is_diminished() {
        let update = RatingUpdate::new(Rating::Easy);
        assert_eq!(update.next_score(score(62.5), true).value(), 65.0);
        assert_eq!(update.next_score(score(75.0), true).value(), 77.5);
    }

    #[test]
    fn test_same_day_repeat_on_weak_word_keeps_full_delta() {
        let update = RatingUpdate::new(Rating::Good);
        let next = update.next_score(score(40.0), true);
        assert_eq!(next.value(), 52.5);
    }

    #[test]
    fn test_threshold_is_inclusive() {
        let update = RatingUpdate::new(Rating::Good);
        assert_eq!(update.next_score(score(50.0), true).value(), 51.25);
        assert_eq!(update.next_score(score(49.9), true).value(), 62.4);
    }

    #[test]
    fn test_penalties_are_never_diminished() {
        let update = RatingUpdate::new(Rating::Again);
        assert_eq!(update.next_score(score(80.0), true).value(), 55.0);
        assert_eq!(update.next_score(score(80.0), false).value(), 55.0);
    }

    #[test]
    fn test_rating_clamps_at_bounds() {
        assert_eq!(
            RatingUpdate::new(Rating::Again)
                .next_score(score(10.0), false)
                .value(),
            0.0
        );
        assert_eq!(
            RatingUpdate::new(Rating::Easy)
                .next_score(score(90.0), false)
                .value(),
            100.0
        );
    }

    #[test]
    fn test_repeated_same_day_ratings_crawl_instead_of_jumping() {
        let update = RatingUpdate::new(Rating::Easy);
        let mut current = score(80.0);
        let expected = [82.5, 85.0, 87.5];
        for step in expected {
            current = update.next_score(current, true);
            assert_eq!(current.value(), step);
        }
    }

    #[test]
    fn test_correct_answer_full_on_first_study_of_day() {
        let update = TestAnswerUpdate::new(true);
        assert_eq!(update.next_score(score(50.0), false).value(), 75.0);
    }

    #[test]
    fn test_correct_answer_diminished_on_any_same_day_repeat() {
        // no 50-point threshold here, unlike the flashcard rule
        let update = TestAnswerUpdate::new(true);
        assert_eq!(update.next_score(score(40.0), true).value(), 42.5);
        assert_eq!(update.next_score(score(90.0), true).value(), 92.5);
    }

    #[test]
    fn test_incorrect_answer_always_costs_full_penalty() {
        let update = TestAnswerUpdate::new(false);
        assert_eq!(update.next_score(score(90.0), true).value(), 65.0);
        assert_eq!(update.next_score(score(90.0), false).value(), 65.0);
        assert_eq!(update.next_score(score(10.0), false).value(), 0.0);
    }

    #[test]
    fn test_flashcard_and_test_rules_disagree_on_weak_same_day_words() {
        let current = score(40.0);
        let rated = RatingUpdate::new(Rating::Good).next_score(current, true);
        let graded = TestAnswerUpdate::new(true).next_score(current, true);
        assert_eq!(rated.value(), 52.5);
        assert_eq!(graded.value(), 42.5);
    }

    #[test]
    fn test_every_event_sequence_stays_in_range() {
        let events: Vec<Box<dyn ScoreUpdateStrategy>> = vec![
            Box::new(RatingUpdate::new(Rating::Again)),
            Box::new(RatingUpdate::new(Rating::Hard)),
            Box::new(RatingUpdate::new(Rating::Good)),
            Box::new(RatingUpdate::new(Rating::Easy)),
            Box::new(TestAnswerUpdate::new(true)),
            Box::new(TestAnswerUpdate::new(false)),
        ];
        for start in [0.0, 12.5, 50.0, 77.5, 100.0] {
            let mut current = score(start);
            for round in 0..events.len() * 4 {
                let event = &events[round % events.len()];
                current = event.next_score(current, round % 2 == 0);
                assert!(
                    (0.0..=100.0).contains(&current.value()),
                    "score escaped range: {current}"
                );
            }
        }
    }

    #[test]
    fn test_applied_delta_reflects_clamping() {
        let change = ScoreChange {
            word_id: WordId::new(7),
            previous: score(90.0),
            new_score: RatingUpdate::new(Rating::Easy).next_score(score(90.0), false),
            last_studied: NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
        };
        assert_eq!(change.applied_delta(), 10.0);
    }
}
