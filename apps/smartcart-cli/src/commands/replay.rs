//! # Replay
//!
//! Applies a scripted sequence of storefront intents to named carts.
//!
//! ## Script Format
//! ```json
//! [
//!   { "action": "add", "id": 1, "quantity": 3 },
//!   { "action": "customer", "tier": "gold" },
//!   { "session": "bob", "action": "add", "id": 6 },
//!   { "session": "bob", "action": "update", "id": 6, "quantity": 4 },
//!   { "session": "bob", "action": "remove", "id": 6 },
//!   { "action": "clear" }
//! ]
//! ```
//!
//! `session` defaults to `"default"` and `quantity` on `add` defaults to 1.
//!
//! ## Execution
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  steps ──► group by session (script order kept within a session)       │
//! │                 │                                                       │
//! │     ┌───────────┼───────────┐                                           │
//! │     ▼           ▼           ▼                                           │
//! │  thread      thread      thread      one per session, scoped            │
//! │  "default"   "alice"     "bob"                                          │
//! │     │           │           │                                           │
//! │     └───────────┼───────────┘                                           │
//! │                 ▼                                                       │
//! │  tally applied / ignored / rejected, report every session               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A rejected intent (unknown product, bad quantity) is logged and skipped;
//! the cart keeps its previous state and the replay goes on.

use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::path::Path;

use serde::{Deserialize, Serialize};
use smartcart_core::{
    Catalog, CatalogId, CoreResult, CustomerProfile, LoyaltyTier, PricingBreakdown,
};
use tracing::{debug, info, warn};

use super::CommandContext;
use crate::config::{deserialize_tier, OutputFormat};
use crate::error::{AppError, AppResult};
use crate::render::BreakdownView;
use crate::state::{CartState, SessionRegistry, DEFAULT_SESSION};

// =============================================================================
// Script Types
// =============================================================================

/// A user action against one cart.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum CartIntent {
    Add {
        id: CatalogId,
        #[serde(default = "default_quantity")]
        quantity: i64,
    },
    Remove {
        id: CatalogId,
    },
    Update {
        id: CatalogId,
        quantity: i64,
    },
    Customer {
        #[serde(deserialize_with = "deserialize_tier")]
        tier: LoyaltyTier,
    },
    Clear,
}

fn default_quantity() -> i64 {
    1
}

/// One script entry: an intent and the session it targets.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ScriptStep {
    #[serde(default = "default_session")]
    pub session: String,

    #[serde(flatten)]
    pub intent: CartIntent,
}

fn default_session() -> String {
    DEFAULT_SESSION.to_string()
}

/// Parses a script from JSON text.
pub fn parse_script(json: &str) -> AppResult<Vec<ScriptStep>> {
    Ok(serde_json::from_str(json)?)
}

// =============================================================================
// Outcome
// =============================================================================

/// What happened to one intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The cart accepted the intent (it may already have been in that state).
    Applied,
    /// Valid, but targeted an item not in the cart.
    Ignored,
    /// The cart refused the intent and is unchanged.
    Rejected,
}

/// Intent counts for a replay.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Tally {
    pub applied: usize,
    pub ignored: usize,
    pub rejected: usize,
}

impl Tally {
    fn record(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Applied => self.applied += 1,
            Outcome::Ignored => self.ignored += 1,
            Outcome::Rejected => self.rejected += 1,
        }
    }

    fn merge(&mut self, other: Tally) {
        self.applied += other.applied;
        self.ignored += other.ignored;
        self.rejected += other.rejected;
    }

    pub fn total(&self) -> usize {
        self.applied + self.ignored + self.rejected
    }
}

/// Applies one intent to one cart.
///
/// Lookup failures surface as errors here; the caller decides whether they
/// stop anything.
pub fn apply_intent(state: &CartState, catalog: &Catalog, intent: &CartIntent) -> CoreResult<Outcome> {
    let found = match *intent {
        CartIntent::Add { id, quantity } => {
            let item = catalog.require(id)?;
            state.with_cart_mut(|cart| cart.add_item(item, quantity))?;
            true
        }
        CartIntent::Remove { id } => state.with_cart_mut(|cart| cart.remove_item(id)),
        CartIntent::Update { id, quantity } => {
            state.with_cart_mut(|cart| cart.update_quantity(id, quantity))?
        }
        CartIntent::Customer { tier } => {
            state.with_cart_mut(|cart| cart.update_customer(CustomerProfile::new(tier)));
            true
        }
        CartIntent::Clear => {
            state.with_cart_mut(|cart| cart.clear());
            true
        }
    };

    Ok(if found { Outcome::Applied } else { Outcome::Ignored })
}

// =============================================================================
// Replay
// =============================================================================

/// Runs every step against `registry`, each session on its own thread.
pub fn replay(registry: &SessionRegistry, catalog: &Catalog, steps: &[ScriptStep]) -> Tally {
    let mut by_session: BTreeMap<&str, Vec<(usize, &CartIntent)>> = BTreeMap::new();
    for (index, step) in steps.iter().enumerate() {
        by_session
            .entry(step.session.as_str())
            .or_default()
            .push((index, &step.intent));
    }

    let mut tally = Tally::default();
    std::thread::scope(|s| {
        let handles: Vec<_> = by_session
            .into_iter()
            .map(|(session, intents)| {
                let state = registry.open(session);
                s.spawn(move || replay_session(session, &state, catalog, &intents))
            })
            .collect();

        for handle in handles {
            match handle.join() {
                Ok(session_tally) => tally.merge(session_tally),
                Err(panic) => std::panic::resume_unwind(panic),
            }
        }
    });
    tally
}

fn replay_session(
    session: &str,
    state: &CartState,
    catalog: &Catalog,
    intents: &[(usize, &CartIntent)],
) -> Tally {
    let mut tally = Tally::default();
    for &(step, intent) in intents {
        let outcome = match apply_intent(state, catalog, intent) {
            Ok(outcome) => outcome,
            Err(error) => {
                warn!(session, step, ?intent, %error, "intent rejected");
                Outcome::Rejected
            }
        };
        debug!(session, step, ?outcome, "intent replayed");
        tally.record(outcome);
    }
    tally
}

// =============================================================================
// Command
// =============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SessionReport {
    session: String,
    customer: CustomerProfile,
    version: u64,
    item_count: i64,
    breakdown: PricingBreakdown,
}

impl SessionReport {
    fn new(session: String, state: &CartState) -> Self {
        state.with_cart(|cart| SessionReport {
            session,
            customer: *cart.customer(),
            version: cart.version(),
            item_count: cart.item_count(),
            breakdown: cart.breakdown().clone(),
        })
    }
}

#[derive(Debug, Serialize)]
struct ReplayReport {
    intents: Tally,
    sessions: Vec<SessionReport>,
}

/// `smartcart replay <script>`
pub fn run(
    ctx: &CommandContext,
    script: &Path,
    tier: Option<LoyaltyTier>,
    only_session: Option<&str>,
) -> AppResult<String> {
    let json = std::fs::read_to_string(script).map_err(|e| AppError::io(script, e))?;
    let steps = parse_script(&json)?;

    let registry = SessionRegistry::new(ctx.customer(tier), ctx.rules.clone());
    let tally = replay(&registry, &ctx.catalog, &steps);
    info!(
        sessions = registry.len(),
        names = ?registry.names(),
        applied = tally.applied,
        ignored = tally.ignored,
        rejected = tally.rejected,
        "replay finished"
    );

    let sessions = match only_session {
        Some(name) => vec![(name.to_string(), registry.get(name)?)],
        None => registry.sessions(),
    };

    match ctx.format {
        OutputFormat::Json => {
            let report = ReplayReport {
                intents: tally,
                sessions: sessions
                    .into_iter()
                    .map(|(name, state)| SessionReport::new(name, &state))
                    .collect(),
            };
            ctx.to_json(&report)
        }
        OutputFormat::Text => Ok(render_text(&sessions, tally)),
    }
}

fn render_text(sessions: &[(String, CartState)], tally: Tally) -> String {
    let mut out = String::new();
    for (name, state) in sessions {
        state.with_cart(|cart| {
            let _ = writeln!(
                out,
                "== Session {} (version {}, {} items) ==",
                name,
                cart.version(),
                cart.item_count()
            );
            let _ = writeln!(
                out,
                "{}",
                BreakdownView {
                    breakdown: cart.breakdown(),
                    customer: cart.customer(),
                    rules: cart.rules(),
                }
            );
        });
    }
    let _ = writeln!(
        out,
        "Replayed {} intents: {} applied, {} ignored, {} rejected",
        tally.total(),
        tally.applied,
        tally.ignored,
        tally.rejected
    );
    out
}
