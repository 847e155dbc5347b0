//! Quiz state machine
//!
//! Loops `Loading → Ready → (answer) → Loading(next) → …` with no terminal
//! state. While one question is in play its successor's asset is already
//! being pre-fetched, so the transition after a correct answer usually
//! skips straight to `Ready`. A user answering before the pre-fetch lands
//! simply re-enters `Loading` until it does.

use std::collections::{HashMap, HashSet};
use std::path::PathBuf;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::ar::SessionDriver;
use crate::assets::loader::{AssetLoader, ResolveResult};
use crate::assets::store::RemoteStore;
use crate::assets::catalog;
use crate::scene::{InstancePool, SceneGraph};

/// One quiz question: the label to guess and the model shown for it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Question {
    /// Correct answer label.
    pub letter: &'static str,
    /// Bucket filename of the question's model.
    pub key: &'static str,
}

impl Question {
    fn random(rng: &mut StdRng) -> Self {
        let (letter, key) = catalog::random_entry(rng);
        Self { letter, key }
    }
}

/// Where the controller currently is.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum QuizPhase {
    /// The current question's model is still resolving.
    Loading,
    /// Model resolved; answer buttons are live.
    Ready,
    /// Resolution failed. Static: no retry is scheduled.
    Failed,
}

/// Result of submitting an answer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnswerOutcome {
    Correct,
    /// Wrong label: no state change, no penalty.
    Incorrect,
    /// Answers are not live (still loading or failed).
    NotReady,
}

/// Drives question sequencing, answer sets, and the score.
pub struct QuizController {
    rng: StdRng,
    current: Question,
    next: Question,
    phase: QuizPhase,
    /// The four answer labels shown while `Ready`.
    answers: Vec<&'static str>,
    score: u32,
    /// Resolved file for the current question, while `Ready`.
    asset_path: Option<PathBuf>,
    /// Every identifier resolved so far this session (cache-backed, so a
    /// path stays valid once seen).
    resolved: HashMap<String, PathBuf>,
    failed: HashSet<String>,
}

impl QuizController {
    /// Start a quiz with an OS-seeded RNG.
    pub fn new<S: RemoteStore>(loader: &mut AssetLoader<S>) -> Self {
        Self::with_rng(StdRng::from_entropy(), loader)
    }

    /// Start a quiz with a caller-supplied RNG (deterministic in tests).
    ///
    /// Requests the first question's asset and immediately pre-fetches the
    /// second's.
    pub fn with_rng<S: RemoteStore>(mut rng: StdRng, loader: &mut AssetLoader<S>) -> Self {
        let current = Question::random(&mut rng);
        let next = Question::random(&mut rng);

        loader.request(current.letter);
        loader.request(next.letter);

        log::info!("quiz started, first question: {}", current.letter);

        Self {
            rng,
            current,
            next,
            phase: QuizPhase::Loading,
            answers: Vec::new(),
            score: 0,
            asset_path: None,
            resolved: HashMap::new(),
            failed: HashSet::new(),
        }
    }

    pub fn phase(&self) -> QuizPhase {
        self.phase
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn current_question(&self) -> &Question {
        &self.current
    }

    /// The answer labels to display, populated while `Ready`.
    pub fn answers(&self) -> &[&'static str] {
        &self.answers
    }

    /// The current question's resolved model file, while `Ready`.
    pub fn asset_path(&self) -> Option<&PathBuf> {
        self.asset_path.as_ref()
    }

    /// Drain completed resolutions from the loader and advance the phase.
    ///
    /// Call once per frame. Results for questions the user has already
    /// moved past are kept (the cache makes them free) but trigger no
    /// transition.
    pub fn poll<S: RemoteStore>(&mut self, loader: &mut AssetLoader<S>) {
        for result in loader.poll_results() {
            match result {
                ResolveResult::Resolved { id, path } => {
                    self.resolved.insert(id, path);
                }
                ResolveResult::Failed { id, error } => {
                    log::warn!("asset resolution failed for {}: {}", id, error);
                    self.failed.insert(id);
                }
            }
        }

        if self.phase == QuizPhase::Loading {
            if let Some(path) = self.resolved.get(self.current.letter) {
                self.asset_path = Some(path.clone());
                self.enter_ready();
            } else if self.failed.contains(self.current.letter) {
                self.phase = QuizPhase::Failed;
            }
        }
    }

    /// Submit an answer label.
    ///
    /// A correct answer bumps the score, resets the scene through the
    /// driver, advances to the pre-fetched question, and starts
    /// pre-fetching a fresh successor. An incorrect answer changes nothing.
    pub fn answer<S: RemoteStore>(
        &mut self,
        label: &str,
        loader: &mut AssetLoader<S>,
        driver: &mut SessionDriver,
        graph: &mut SceneGraph,
        pool: &mut InstancePool,
    ) -> AnswerOutcome {
        if self.phase != QuizPhase::Ready {
            return AnswerOutcome::NotReady;
        }

        if label != self.current.letter {
            return AnswerOutcome::Incorrect;
        }

        self.score += 1;
        log::info!("correct answer {}, score now {}", label, self.score);

        driver.reset(graph, pool);
        self.advance(loader);

        AnswerOutcome::Correct
    }

    /// Move to the pre-fetched question and pre-fetch a new successor.
    fn advance<S: RemoteStore>(&mut self, loader: &mut AssetLoader<S>) {
        self.current = self.next;
        self.next = Question::random(&mut self.rng);
        self.asset_path = None;
        self.answers.clear();

        loader.request(self.next.letter);

        if let Some(path) = self.resolved.get(self.current.letter) {
            self.asset_path = Some(path.clone());
            self.enter_ready();
        } else if self.failed.contains(self.current.letter) {
            self.phase = QuizPhase::Failed;
        } else {
            // Pre-fetch still in flight; wait for it in poll()
            self.phase = QuizPhase::Loading;
            loader.request(self.current.letter);
        }
    }

    fn enter_ready(&mut self) {
        self.answers = build_answer_set(&mut self.rng, self.current.letter);
        self.phase = QuizPhase::Ready;
    }
}

/// Build the 4-choice answer set: the correct label plus three distractors
/// drawn independently at random from the full label set, shuffled.
/// Distractors may duplicate each other, but never the correct label, so
/// the set always contains the correct answer exactly once.
pub fn build_answer_set(rng: &mut StdRng, correct: &'static str) -> Vec<&'static str> {
    let labels: Vec<&'static str> = catalog::letters().collect();

    let mut answers = vec![correct];
    while answers.len() < 4 {
        let candidate = labels[rng.gen_range(0..labels.len())];
        if candidate == correct {
            continue;
        }
        answers.push(candidate);
    }

    answers.shuffle(rng);
    answers
}
