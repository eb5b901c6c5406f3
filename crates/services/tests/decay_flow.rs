use chrono::{Duration, NaiveDate};

use services::{DecayService, StudyService};
use storage::repository::Storage;
use tango_core::model::{MemoryScore, Rating, Word, WordId};
use tango_core::time::fixed_now;
use tango_core::Clock;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn word(id: u64, score: f64, last_studied: Option<NaiveDate>) -> Word {
    Word::from_persisted(
        WordId::new(id),
        format!("word-{id:02}"),
        vec![],
        MemoryScore::new(score).unwrap(),
        last_studied,
        fixed_now(),
    )
}

async fn seed(storage: &Storage, words: &[Word]) {
    for w in words {
        storage.words.upsert_word(w).await.unwrap();
    }
}

#[tokio::test]
async fn decay_fades_each_word_by_its_own_elapsed_days() {
    let storage = Storage::in_memory();
    seed(
        &storage,
        &[
            word(1, 60.0, Some(date(2025, 3, 1))), // three days out, multiplicative
            word(2, 85.0, Some(date(2025, 3, 3))), // one day out, strong
            word(3, 42.0, Some(date(2025, 3, 4))), // studied today
            word(4, 50.0, None),                   // never studied, created 2025-03-01
        ],
    )
    .await;

    let clock = Clock::fixed(fixed_now() + Duration::days(3));
    let service = DecayService::new(storage.clone()).with_clock(clock);
    assert_eq!(service.today(), date(2025, 3, 4));

    let outcome = service.run_if_needed().await.unwrap();
    assert!(outcome.processed);
    assert_eq!(outcome.words_updated, 3);

    let one = storage.words.get_word(WordId::new(1)).await.unwrap();
    assert!((one.score().value() - 37.5).abs() < 1e-9);
    // fading is not a study event
    assert_eq!(one.last_studied(), Some(date(2025, 3, 1)));

    let two = storage.words.get_word(WordId::new(2)).await.unwrap();
    assert_eq!(two.score().value(), 84.0);

    let three = storage.words.get_word(WordId::new(3)).await.unwrap();
    assert_eq!(three.score().value(), 42.0);

    let four = storage.words.get_word(WordId::new(4)).await.unwrap();
    assert!((four.score().value() - 31.25).abs() < 1e-9);
    assert_eq!(four.last_studied(), None);
}

#[tokio::test]
async fn decay_runs_at_most_once_per_date() {
    let storage = Storage::in_memory();
    seed(&storage, &[word(1, 60.0, Some(date(2025, 3, 1)))]).await;

    let clock = Clock::fixed(fixed_now() + Duration::days(1));
    let service = DecayService::new(storage.clone()).with_clock(clock);

    let first = service.run_if_needed().await.unwrap();
    assert!(first.processed);
    assert_eq!(first.words_updated, 1);
    let after_first = storage.words.get_word(WordId::new(1)).await.unwrap();
    assert_eq!(after_first.score().value(), 50.0);

    let second = service.run_if_needed().await.unwrap();
    assert!(!second.processed);
    assert_eq!(second.words_updated, 0);
    let after_second = storage.words.get_word(WordId::new(1)).await.unwrap();
    assert_eq!(after_second.score().value(), 50.0);
}

#[tokio::test]
async fn concurrent_decay_callers_claim_exactly_once() {
    let storage = Storage::in_memory();
    let words: Vec<Word> = (1..=5)
        .map(|id| word(id, 60.0, Some(date(2025, 3, 1))))
        .collect();
    seed(&storage, &words).await;

    let clock = Clock::fixed(fixed_now() + Duration::days(1));
    let service = DecayService::new(storage.clone()).with_clock(clock);

    let mut handles = Vec::new();
    for _ in 0..8 {
        let service = service.clone();
        handles.push(tokio::spawn(
            async move { service.run_if_needed().await },
        ));
    }
    let mut processed = 0;
    for handle in handles {
        if handle.await.unwrap().unwrap().processed {
            processed += 1;
        }
    }
    assert_eq!(processed, 1);

    // a single application, not eight
    for id in 1..=5u64 {
        let w = storage.words.get_word(WordId::new(id)).await.unwrap();
        assert_eq!(w.score().value(), 50.0);
    }
}

#[tokio::test]
async fn studying_after_decay_restarts_the_fade_base() {
    let storage = Storage::in_memory();
    seed(&storage, &[word(1, 60.0, Some(date(2025, 3, 1)))]).await;

    let clock = Clock::fixed(fixed_now() + Duration::days(3));
    let decay = DecayService::new(storage.clone()).with_clock(clock);
    decay.run_if_needed().await.unwrap();

    // the word faded for three days, then gets a first rating of the day
    let study = StudyService::new(storage.clone()).with_clock(clock);
    let update = study.rate_word(WordId::new(1), Rating::Good).await.unwrap();
    assert!((update.change.previous.value() - 37.5).abs() < 1e-9);
    assert!((update.change.new_score.value() - 50.0).abs() < 1e-9);
    assert_eq!(update.change.last_studied, date(2025, 3, 4));

    // the next day only one elapsed day applies
    let next_day = decay.run_for_date(date(2025, 3, 5)).await.unwrap();
    assert!(next_day.processed);
    let w = storage.words.get_word(WordId::new(1)).await.unwrap();
    let expected = update.change.new_score.value() * 5.0 / 6.0;
    assert!((w.score().value() - expected).abs() < 1e-9);
}

#[tokio::test]
async fn unstudied_words_compound_across_daily_runs() {
    let storage = Storage::in_memory();
    seed(&storage, &[word(1, 90.0, Some(date(2025, 3, 1)))]).await;

    // the base date never moves while the word goes unstudied, so each
    // day's pass applies one more step than the last, on the faded score
    let mut clock = Clock::fixed(fixed_now() + Duration::days(1));
    for expected in [89.0, 87.0, 84.0] {
        let service = DecayService::new(storage.clone()).with_clock(clock);
        let outcome = service.run_if_needed().await.unwrap();
        assert!(outcome.processed);
        let w = storage.words.get_word(WordId::new(1)).await.unwrap();
        assert_eq!(w.score().value(), expected);
        clock.advance(Duration::days(1));
    }
}
