//! Target values
//!
//! Sets, reps and weight are entered as free text. Reps may be given as a range (`8-10`), of
//! which only the lower bound is stored. Weight may carry a unit suffix (`30 kg`), which is
//! dropped before parsing. Anything that does not parse becomes zero.

use std::fmt;

use log::debug;

use crate::{ExerciseList, Keyed, UpdateError};

#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Targets {
    pub sets: u32,
    pub reps: u32,
    pub weight: f32,
}

impl Targets {
    #[must_use]
    pub fn parse(input: &TargetInput) -> Self {
        Self {
            sets: parse_sets(&input.sets),
            reps: parse_reps(&input.reps),
            weight: parse_weight(&input.weight),
        }
    }

    /// Reps as entered in the form, if the entered range still matches the stored lower bound.
    #[must_use]
    pub fn reps_label(&self, entered: &str) -> String {
        match parse_reps_range(entered) {
            Some((lower, upper)) if lower == self.reps && upper > lower => {
                format!("{lower}-{upper}")
            }
            _ => self.reps.to_string(),
        }
    }
}

impl fmt::Display for Targets {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} × {}", self.sets, self.reps)?;
        if self.weight > 0.0 {
            write!(f, " @ {} kg", self.weight)?;
        }
        Ok(())
    }
}

/// Raw text of the target fields as shown in the edit form.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct TargetInput {
    pub sets: String,
    pub reps: String,
    pub weight: String,
}

impl From<Targets> for TargetInput {
    fn from(value: Targets) -> Self {
        Self {
            sets: value.sets.to_string(),
            reps: value.reps.to_string(),
            weight: if value.weight > 0.0 {
                value.weight.to_string()
            } else {
                String::new()
            },
        }
    }
}

#[must_use]
pub fn parse_sets(value: &str) -> u32 {
    value.trim().parse::<u32>().unwrap_or(0)
}

#[must_use]
pub fn parse_reps(value: &str) -> u32 {
    value
        .trim()
        .split('-')
        .next()
        .and_then(|lower| lower.trim().parse::<u32>().ok())
        .unwrap_or(0)
}

fn parse_reps_range(value: &str) -> Option<(u32, u32)> {
    let (lower, upper) = value.trim().split_once('-')?;
    Some((lower.trim().parse().ok()?, upper.trim().parse().ok()?))
}

#[must_use]
pub fn parse_weight(value: &str) -> f32 {
    let number = value
        .trim()
        .trim_end_matches(|c: char| c.is_alphabetic())
        .trim()
        .replace(',', ".");
    match number.parse::<f32>() {
        Ok(weight) if weight.is_finite() && weight >= 0.0 => weight,
        _ => 0.0,
    }
}

/// Form state for editing the targets of one list entry.
///
/// The form stays open until the update has been confirmed by the server. A failed update keeps
/// the entered values and the error message, so that the user can retry.
#[derive(Debug, Clone, PartialEq)]
pub struct TargetEdit<K> {
    pub key: K,
    pub input: TargetInput,
    pub open: bool,
    pub saving: bool,
    pub error: Option<String>,
}

impl<K: Clone> TargetEdit<K> {
    #[must_use]
    pub fn open(key: K, targets: Targets) -> Self {
        Self {
            key,
            input: TargetInput::from(targets),
            open: true,
            saving: false,
            error: None,
        }
    }

    pub fn cancel(&mut self) {
        self.open = false;
        self.error = None;
    }

    /// Issues exactly one update with the normalized targets.
    pub async fn save<L>(&mut self, list: &L) -> Result<Targets, String>
    where
        L: ExerciseList,
        L::Entry: Keyed<Key = K>,
    {
        if self.saving {
            return Err("update already in progress".to_string());
        }
        let targets = Targets::parse(&self.input);
        self.saving = true;
        self.error = None;
        let result = list.update(self.key.clone(), targets).await;
        self.saving = false;
        match result {
            Ok(()) => {
                self.open = false;
                Ok(targets)
            }
            Err(err) => {
                debug!("failed to update targets: {err}");
                let message = update_error_message(&err);
                self.error = Some(message.clone());
                Err(message)
            }
        }
    }
}

fn update_error_message(err: &UpdateError) -> String {
    match err {
        UpdateError::NotFound => "The exercise no longer exists".to_string(),
        _ => err.to_string(),
    }
}
