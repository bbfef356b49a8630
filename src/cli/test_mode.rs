//! Scripted prompt answers for non-interactive runs.
//!
//! `RECIPE_EDITOR_TEST_DECISIONS` holds `|`-separated answers, one per
//! prompt: `skip`, or `<portion>,<quantity>` where either side may be blank.

use once_cell::sync::Lazy;
use std::{collections::VecDeque, env, sync::Mutex};

use crate::core::services::PromptDecision;

pub const DECISIONS_ENV: &str = "RECIPE_EDITOR_TEST_DECISIONS";

struct DecisionQueue {
    enabled: bool,
    decisions: VecDeque<PromptDecision>,
}

impl DecisionQueue {
    fn from_env() -> Self {
        match env::var(DECISIONS_ENV) {
            Ok(raw) => Self {
                enabled: true,
                decisions: parse_decisions(&raw),
            },
            Err(_) => Self {
                enabled: false,
                decisions: VecDeque::new(),
            },
        }
    }
}

static DECISIONS: Lazy<Mutex<DecisionQueue>> = Lazy::new(|| Mutex::new(DecisionQueue::from_env()));

/// Next scripted answer. An exhausted queue answers `Skip`.
pub fn next_decision() -> Option<PromptDecision> {
    let mut queue = DECISIONS.lock().ok()?;
    if !queue.enabled {
        return None;
    }
    Some(queue.decisions.pop_front().unwrap_or(PromptDecision::Skip))
}

fn parse_decision(token: &str) -> PromptDecision {
    if token.eq_ignore_ascii_case("skip") {
        return PromptDecision::Skip;
    }
    let (portion, quantity) = token.split_once(',').unwrap_or((token, ""));
    PromptDecision::Accept {
        portion: Some(portion.trim().to_string()),
        quantity: Some(quantity.trim().to_string()),
    }
}

fn parse_decisions(raw: &str) -> VecDeque<PromptDecision> {
    raw.split('|')
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .map(parse_decision)
        .collect()
}
