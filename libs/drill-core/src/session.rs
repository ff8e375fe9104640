//! Session state machine: lives, score, hints, countdown and word sequence.
//!
//! Phases move `active -> checking -> (active | completed)`; `completed` is
//! terminal until [`SessionMachine::restart`]. Leaving `checking` is a
//! delayed transition: the machine hands out an [`AdvanceTicket`] and the
//! caller redeems it once the verdict has been on screen long enough. A
//! ticket issued before a restart is void afterwards.

use crate::timer::{SessionTimer, Tick};
use crate::types::{SessionConfig, ValidationResult, Word};
use crate::validation::Validator;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Active,
    Checking,
    Completed,
}

/// What the learner did with a word.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "input", rename_all = "snake_case")]
pub enum Response {
    Typed(String),
    Skipped,
    TimedOut,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub word: Word,
    pub accepted: bool,
    pub response: Response,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<ValidationResult>,
    pub answered_at: DateTime<Utc>,
}

/// Snapshot of a session, handed to observers after every change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    pub phase: Phase,
    pub word_index: usize,
    pub word_count: usize,
    pub score: u32,
    pub lives: u32,
    pub hints_used: u32,
    pub hints_remaining: u32,
    /// Letters of the current word revealed so far. `hints_used` spans the
    /// whole session and only feeds the cap.
    pub hint_letters: u32,
    pub hint_visible: bool,
    /// `None` for untimed sessions.
    pub time_remaining_secs: Option<u32>,
    pub history: Vec<HistoryEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_result: Option<ValidationResult>,
    pub started_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl SessionState {
    fn initial(config: &SessionConfig, word_count: usize) -> Self {
        let now = Utc::now();
        let empty = word_count == 0;
        Self {
            phase: if empty { Phase::Completed } else { Phase::Active },
            word_index: 0,
            word_count,
            score: 0,
            lives: config.initial_lives,
            hints_used: 0,
            hints_remaining: config.max_hints,
            hint_letters: 0,
            hint_visible: false,
            time_remaining_secs: config.time_limit_secs,
            history: Vec::new(),
            last_result: None,
            started_at: now,
            completed_at: empty.then_some(now),
        }
    }

    pub fn is_completed(&self) -> bool {
        self.phase == Phase::Completed
    }

    pub fn correct_words(&self) -> impl Iterator<Item = &Word> {
        self.history.iter().filter(|e| e.accepted).map(|e| &e.word)
    }

    /// Missed words paired with what the learner did, for later review.
    pub fn incorrect_entries(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.history.iter().filter(|e| !e.accepted)
    }

    /// Time from start to completion, or to now while still running.
    pub fn elapsed(&self) -> chrono::Duration {
        self.completed_at.unwrap_or_else(Utc::now) - self.started_at
    }
}

/// Proof that a verdict is waiting to be advanced past.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AdvanceTicket {
    epoch: u64,
    word_index: usize,
}

pub type Subscriber = Box<dyn Fn(&SessionState) + Send + Sync>;

pub struct SessionMachine {
    words: Vec<Word>,
    config: SessionConfig,
    validator: Validator,
    state: SessionState,
    timer: SessionTimer,
    epoch: u64,
    pending: Option<AdvanceTicket>,
    subscribers: Vec<Subscriber>,
}

impl fmt::Debug for SessionMachine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionMachine")
            .field("words", &self.words.len())
            .field("state", &self.state)
            .field("epoch", &self.epoch)
            .field("pending", &self.pending)
            .finish_non_exhaustive()
    }
}

impl SessionMachine {
    /// Create a session over `words`. An empty list yields a session that
    /// is already completed.
    pub fn new(words: Vec<Word>, config: SessionConfig, validator: Validator) -> Self {
        let state = SessionState::initial(&config, words.len());
        let timer = SessionTimer::new(
            config.time_limit_secs.unwrap_or(0),
            Duration::from_millis(config.tick_ms),
        );
        let mut machine = Self {
            words,
            config,
            validator,
            state,
            timer,
            epoch: 0,
            pending: None,
            subscribers: Vec::new(),
        };
        if machine.words.is_empty() {
            tracing::warn!("session created with an empty word list");
        } else {
            machine.start_word_timer();
        }
        machine
    }

    /// Register an observer called with the new state after every change.
    pub fn subscribe<F>(&mut self, callback: F)
    where
        F: Fn(&SessionState) + Send + Sync + 'static,
    {
        self.subscribers.push(Box::new(callback));
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    pub fn score(&self) -> u32 {
        self.state.score
    }

    pub fn lives(&self) -> u32 {
        self.state.lives
    }

    pub fn hints_used(&self) -> u32 {
        self.state.hints_used
    }

    pub fn hints_remaining(&self) -> u32 {
        self.state.hints_remaining
    }

    pub fn time_remaining(&self) -> Option<Duration> {
        self.config.time_limit_secs.map(|_| self.timer.remaining())
    }

    pub fn elapsed(&self) -> chrono::Duration {
        self.state.elapsed()
    }

    pub fn current_word(&self) -> Option<&Word> {
        if self.state.is_completed() {
            return None;
        }
        self.words.get(self.state.word_index)
    }

    /// Delay between a verdict and the transition past it.
    pub fn result_display_delay(&self) -> Duration {
        Duration::from_millis(self.config.result_display_ms)
    }

    /// Ticket for the transition out of `checking`, if one is due.
    pub fn pending_advance(&self) -> Option<AdvanceTicket> {
        self.pending
    }

    /// Reveal the letters of the current word hinted so far. Combining
    /// marks stay attached to the letter they follow.
    pub fn current_hint(&self) -> Option<String> {
        if !self.state.hint_visible {
            return None;
        }
        let word = self.current_word()?;
        let mut revealed = String::new();
        let mut letters = 0;
        for c in word.text.trim().chars() {
            let is_mark = unicode_normalization::char::is_combining_mark(c);
            if !is_mark {
                if letters == self.state.hint_letters {
                    break;
                }
                letters += 1;
            }
            revealed.push(c);
        }
        Some(revealed)
    }

    /// Submit a typed answer for the current word.
    pub fn submit(&mut self, input: &str) -> &SessionState {
        let Some(word) = self.begin_check("submit") else {
            return &self.state;
        };
        let result = self
            .validator
            .validate(input, &word, self.config.language.as_ref());
        tracing::debug!(
            word = %word.id,
            accepted = result.accepted,
            matched_via = ?result.matched_via,
            "submission checked"
        );
        let accepted = result.accepted;
        self.record(word, accepted, Response::Typed(input.to_string()), Some(result))
    }

    /// Give up on the current word. Costs a life like a wrong answer.
    pub fn skip(&mut self) -> &SessionState {
        let Some(word) = self.begin_check("skip") else {
            return &self.state;
        };
        self.record(word, false, Response::Skipped, None)
    }

    /// The countdown ran out: an implicit wrong answer.
    pub fn on_timer_expire(&mut self) -> &SessionState {
        let Some(word) = self.begin_check("timer expiry") else {
            return &self.state;
        };
        self.record(word, false, Response::TimedOut, None)
    }

    pub fn request_hint(&mut self) -> &SessionState {
        if self.state.phase != Phase::Active {
            tracing::debug!(phase = ?self.state.phase, "hint ignored");
            return &self.state;
        }
        if self.state.hints_used >= self.config.max_hints {
            tracing::debug!(hints_used = self.state.hints_used, "hint cap reached");
            return &self.state;
        }
        self.state.hints_used += 1;
        self.state.hints_remaining = self.config.max_hints - self.state.hints_used;
        self.state.hint_letters += 1;
        self.state.hint_visible = true;
        self.notify();
        &self.state
    }

    /// Advance the countdown by one step; expiry counts as a wrong answer.
    pub fn tick(&mut self) -> &SessionState {
        if self.state.phase != Phase::Active {
            return &self.state;
        }
        match self.timer.tick() {
            Tick::Idle => &self.state,
            Tick::Running { .. } => {
                self.state.time_remaining_secs = Some(self.timer.remaining_secs());
                self.notify();
                &self.state
            }
            Tick::Expired => {
                self.state.time_remaining_secs = Some(0);
                tracing::debug!(word_index = self.state.word_index, "timer expired");
                self.on_timer_expire()
            }
        }
    }

    /// Leave `checking` for the next word or for completion. Tickets that
    /// no longer match the session are ignored.
    pub fn advance(&mut self, ticket: AdvanceTicket) -> &SessionState {
        if self.state.phase != Phase::Checking || self.pending != Some(ticket) {
            tracing::debug!(?ticket, "stale advance discarded");
            return &self.state;
        }
        self.pending = None;

        if self.state.word_index + 1 >= self.words.len() {
            self.complete();
        } else {
            self.state.word_index += 1;
            self.state.phase = Phase::Active;
            self.state.hint_letters = 0;
            self.state.hint_visible = false;
            self.state.last_result = None;
            self.start_word_timer();
        }
        self.notify();
        &self.state
    }

    /// Back to the first word with the configured lives, valid from any
    /// phase. Voids any pending advance.
    pub fn restart(&mut self) -> &SessionState {
        self.epoch += 1;
        self.pending = None;
        self.timer.pause();
        self.state = SessionState::initial(&self.config, self.words.len());
        if !self.words.is_empty() {
            self.start_word_timer();
        }
        tracing::info!(epoch = self.epoch, "session restarted");
        self.notify();
        &self.state
    }

    fn begin_check(&mut self, event: &'static str) -> Option<Word> {
        if self.state.phase != Phase::Active {
            tracing::debug!(event, phase = ?self.state.phase, "event ignored outside active phase");
            return None;
        }
        let word = self.words.get(self.state.word_index)?.clone();
        self.state.phase = Phase::Checking;
        self.timer.pause();
        Some(word)
    }

    fn record(
        &mut self,
        word: Word,
        accepted: bool,
        response: Response,
        result: Option<ValidationResult>,
    ) -> &SessionState {
        if accepted {
            self.state.score = self.state.score.saturating_add(self.config.points_per_correct);
        } else {
            self.state.lives = self.state.lives.saturating_sub(1);
        }
        self.state.history.push(HistoryEntry {
            word,
            accepted,
            response,
            result: result.clone(),
            answered_at: Utc::now(),
        });
        self.state.last_result = result;

        if !accepted && self.state.lives == 0 {
            self.complete();
        } else {
            self.pending = Some(AdvanceTicket {
                epoch: self.epoch,
                word_index: self.state.word_index,
            });
        }
        self.notify();
        &self.state
    }

    fn complete(&mut self) {
        self.pending = None;
        self.timer.pause();
        self.state.phase = Phase::Completed;
        self.state.completed_at = Some(Utc::now());
        tracing::info!(
            score = self.state.score,
            lives = self.state.lives,
            answered = self.state.history.len(),
            "session completed"
        );
    }

    fn start_word_timer(&mut self) {
        if let Some(secs) = self.config.time_limit_secs {
            self.timer.reset(secs);
            self.timer.start();
            self.state.time_remaining_secs = Some(secs);
        }
    }

    fn notify(&self) {
        for subscriber in &self.subscribers {
            subscriber(&self.state);
        }
    }
}
