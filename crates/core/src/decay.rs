use chrono::NaiveDate;

use crate::calendar::StudyCalendar;
use crate::model::{MemoryScore, Word, WordId};

/// Score at or above which decay switches to the slow linear branch.
const STRONG_THRESHOLD: f64 = 80.0;

/// Applies `elapsed_days` sequential decay steps to a score.
///
/// Step `n` (1-based) subtracts 1 while the score is at or above 80 and
/// otherwise multiplies by `(n + 4) / (n + 5)`, so weak scores fall fast at
/// first and level off over longer gaps. The branch is re-chosen every
/// step, which lets a strong score slide into the multiplicative regime
/// mid-sequence. The result is clamped into `[0, 100]`.
#[must_use]
pub fn decayed_score(score: MemoryScore, elapsed_days: i64) -> MemoryScore {
    let mut value = score.value();
    for n in 1..=elapsed_days {
        if value >= STRONG_THRESHOLD {
            value -= 1.0;
        } else {
            // NOTE: day counts are tiny, so the i64 -> f64 conversion is exact
            #[allow(clippy::cast_precision_loss)]
            let day = n as f64;
            value = value * (day + 4.0) / (day + 5.0);
        }
    }
    MemoryScore::clamped(value)
}

/// The date decay counts from: the last studied date, or the creation date
/// in the study zone for a word that has never been studied.
#[must_use]
pub fn decay_base(word: &Word, calendar: &StudyCalendar) -> NaiveDate {
    word.last_studied()
        .unwrap_or_else(|| calendar.date_of(word.created_at()))
}

/// One word's planned decay write.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecayUpdate {
    pub word_id: WordId,
    /// Final clamped score after all elapsed steps.
    pub score: MemoryScore,
}

/// Plans the decay pass for `today` over a full word list.
///
/// Words whose base date is `today` or later are skipped; every other word
/// gets one step per elapsed day. Committing the plan is the store's job
/// and must not advance `last_studied`: decay is forgetting, not studying.
#[must_use]
pub fn plan_decay(words: &[Word], today: NaiveDate, calendar: &StudyCalendar) -> Vec<DecayUpdate> {
    let mut updates = Vec::new();
    for word in words {
        let base = decay_base(word, calendar);
        let elapsed = StudyCalendar::days_between(base, today);
        if elapsed <= 0 {
            continue;
        }
        updates.push(DecayUpdate {
            word_id: word.id(),
            score: decayed_score(word.score(), elapsed),
        });
    }
    updates
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::fixed_now;

    fn score(value: f64) -> MemoryScore {
        MemoryScore::new(value).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn word_with(id: u64, value: f64, last_studied: Option<NaiveDate>) -> Word {
        Word::from_persisted(
            WordId::new(id),
            format!("word-{id}"),
            vec![],
            score(value),
            last_studied,
            fixed_now(),
        )
    }

    #[test]
    fn test_three_day_decay_from_sixty() {
        assert_eq!(decayed_score(score(60.0), 1).value(), 50.0);
        let two = decayed_score(score(60.0), 2).value();
        assert!((two - 300.0 / 7.0).abs() < 1e-9, "got {two}");
        let three = decayed_score(score(60.0), 3).value();
        assert!((three - 37.5).abs() < 1e-9, "got {three}");
    }

    #[test]
    fn test_one_day_decay_above_eighty_is_linear() {
        assert_eq!(decayed_score(score(85.0), 1).value(), 84.0);
        assert_eq!(decayed_score(score(100.0), 1).value(), 99.0);
    }

    #[test]
    fn test_decay_crosses_into_multiplicative_branch() {
        // 81 -> 80 -> 79 stays linear; the third step multiplies
        assert_eq!(decayed_score(score(81.0), 2).value(), 79.0);
        let third = decayed_score(score(81.0), 3).value();
        assert!((third - 79.0 * 7.0 / 8.0).abs() < 1e-9, "got {third}");
    }

    #[test]
    fn test_decay_never_increases_a_score() {
        for start in [0.0, 5.0, 30.0, 50.0, 79.9, 80.0, 95.0, 100.0] {
            let mut previous = score(start);
            for days in 1..=30 {
                let next = decayed_score(score(start), days);
                assert!(
                    next.value() <= previous.value() + 1e-12,
                    "decay increased {start} at day {days}"
                );
                assert!(next.value() >= 0.0);
                previous = next;
            }
        }
    }

    #[test]
    fn test_zero_elapsed_days_is_identity() {
        assert_eq!(decayed_score(score(42.0), 0).value(), 42.0);
    }

    #[test]
    fn test_plan_skips_words_studied_today() {
        let today = date(2025, 3, 4);
        let words = vec![
            word_with(1, 60.0, Some(today)),
            word_with(2, 60.0, Some(date(2025, 3, 3))),
        ];
        let plan = plan_decay(&words, today, &StudyCalendar::default());
        assert_eq!(plan.len(), 1);
        assert_eq!(plan[0].word_id, WordId::new(2));
        assert_eq!(plan[0].score.value(), 50.0);
    }

    #[test]
    fn test_plan_skips_future_base_dates() {
        let today = date(2025, 3, 4);
        let words = vec![word_with(1, 60.0, Some(date(2025, 3, 10)))];
        assert!(plan_decay(&words, today, &StudyCalendar::default()).is_empty());
    }

    #[test]
    fn test_plan_counts_from_creation_for_unstudied_words() {
        // created_at is fixed_now(), 2025-03-01 in the default zone
        let words = vec![word_with(1, 50.0, None)];
        let plan = plan_decay(&words, date(2025, 3, 3), &StudyCalendar::default());
        assert_eq!(plan.len(), 1);
        let expected = 50.0 * 5.0 / 6.0 * 6.0 / 7.0;
        assert!((plan[0].score.value() - expected).abs() < 1e-9);
    }

    #[test]
    fn test_plan_applies_one_step_per_elapsed_day() {
        let words = vec![word_with(1, 60.0, Some(date(2025, 3, 1)))];
        let plan = plan_decay(&words, date(2025, 3, 4), &StudyCalendar::default());
        assert!((plan[0].score.value() - 37.5).abs() < 1e-9);
    }
}
