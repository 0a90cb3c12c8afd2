//! Board with one lock per position.
//!
//! Lock discipline:
//! - a position's `tokio::sync::Mutex` guards the card on it and every claim
//!   marker (of any player) that points at it; every mutation of either takes
//!   that lock first;
//! - a player's claim array sits behind a `parking_lot::Mutex` that is only
//!   ever taken *after* a position lock (or alone, for reads) and never held
//!   across an await;
//! - nothing locks two positions at once.
//!
//! Position locks are held across the artificial table delay, so a slow
//! placement on one position never stalls claims on another.

use std::sync::Arc;
use std::time::Duration;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tokio::sync::Mutex;
use tracing::{trace, warn};

use crate::display::DisplaySink;
use crate::domain::{CardId, PlayerId, Position};

type ClaimSlots = parking_lot::Mutex<Vec<Option<Position>>>;

pub struct Board {
    positions: Vec<Mutex<Option<CardId>>>,
    card_positions: DashMap<CardId, Position>,
    claims: Vec<ClaimSlots>,
    delay: Duration,
    display: Arc<dyn DisplaySink>,
}

/// A player's claim as seen by the dealer.
///
/// One entry per claim slot: the claimed position and the card on it, or
/// `None` where the marker has been cleared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimSnapshot {
    slots: Vec<Option<(Position, CardId)>>,
}

impl ClaimSnapshot {
    pub fn slots(&self) -> &[Option<(Position, CardId)>] {
        &self.slots
    }

    /// False when any slot was cleared, i.e. the claim was broken by a
    /// concurrent removal.
    pub fn is_intact(&self) -> bool {
        !self.slots.is_empty() && self.slots.iter().all(Option::is_some)
    }

    pub fn cards(&self) -> Vec<CardId> {
        self.slots.iter().flatten().map(|&(_, card)| card).collect()
    }

    pub fn positions(&self) -> Vec<Position> {
        self.slots
            .iter()
            .flatten()
            .map(|&(position, _)| position)
            .collect()
    }
}

impl Board {
    pub fn new(
        table_size: usize,
        players: usize,
        claim_capacity: usize,
        delay: Duration,
        display: Arc<dyn DisplaySink>,
    ) -> Self {
        Self {
            positions: (0..table_size).map(|_| Mutex::new(None)).collect(),
            card_positions: DashMap::new(),
            claims: (0..players)
                .map(|_| parking_lot::Mutex::new(vec![None; claim_capacity]))
                .collect(),
            delay,
            display,
        }
    }

    pub fn table_size(&self) -> usize {
        self.positions.len()
    }

    pub fn players(&self) -> usize {
        self.claims.len()
    }

    /// Put `card` on an empty position.
    ///
    /// Returns false, leaving the board untouched, when the position is out
    /// of range or occupied, or the card already lies elsewhere.
    pub async fn place_card(&self, card: CardId, position: Position) -> bool {
        let Some(cell) = self.positions.get(position) else {
            warn!(card, position, "place_card on a position outside the board");
            return false;
        };
        let mut slot = cell.lock().await;
        if let Some(existing) = *slot {
            warn!(card, position, existing, "place_card on an occupied position");
            return false;
        }
        // claim the card index entry first so two positions cannot race for one card
        match self.card_positions.entry(card) {
            Entry::Occupied(entry) => {
                let elsewhere = *entry.get();
                warn!(card, position, elsewhere, "place_card of a card already on the board");
                return false;
            }
            Entry::Vacant(entry) => {
                entry.insert(position);
            }
        }

        self.simulate_latency().await;
        *slot = Some(card);
        self.display.on_card_placed(card, position);
        trace!(card, position, "card placed");
        true
    }

    /// Take the card off `position`, clearing every claim marker on it.
    ///
    /// Returns the removed card, or `None` if the position was empty.
    pub async fn remove_card(&self, position: Position) -> Option<CardId> {
        let cell = self.positions.get(position)?;
        let mut slot = cell.lock().await;
        let card = (*slot)?;

        self.simulate_latency().await;
        for (player, claim) in self.claims.iter().enumerate() {
            let mut claim = claim.lock();
            for marker in claim.iter_mut().filter(|m| **m == Some(position)) {
                *marker = None;
                self.display.on_token_removed(player, position);
            }
        }
        self.display.on_card_removed(position);
        self.card_positions.remove(&card);
        *slot = None;
        trace!(card, position, "card removed");
        Some(card)
    }

    /// Mark `position` in the first free slot of `player`'s claim.
    ///
    /// No-op (returns false) if the position is empty, already marked by
    /// this player, or the claim is full.
    pub async fn place_claim(&self, player: PlayerId, position: Position) -> bool {
        let (Some(cell), Some(claim)) = (self.positions.get(position), self.claims.get(player))
        else {
            return false;
        };
        let slot = cell.lock().await;
        if slot.is_none() {
            return false;
        }

        let mut claim = claim.lock();
        if claim.contains(&Some(position)) {
            return false;
        }
        let Some(free) = claim.iter_mut().find(|m| m.is_none()) else {
            return false;
        };
        *free = Some(position);
        self.display.on_token_placed(player, position);
        true
    }

    /// Clear `player`'s marker on `position`; true iff one was there.
    pub async fn remove_claim(&self, player: PlayerId, position: Position) -> bool {
        let (Some(cell), Some(claim)) = (self.positions.get(position), self.claims.get(player))
        else {
            return false;
        };
        let _slot = cell.lock().await;

        let mut claim = claim.lock();
        let Some(marker) = claim.iter_mut().find(|m| **m == Some(position)) else {
            return false;
        };
        *marker = None;
        self.display.on_token_removed(player, position);
        true
    }

    pub fn has_claim(&self, player: PlayerId, position: Position) -> bool {
        self.claims
            .get(player)
            .is_some_and(|claim| claim.lock().contains(&Some(position)))
    }

    pub fn claim_is_full(&self, player: PlayerId) -> bool {
        self.claims
            .get(player)
            .is_some_and(|claim| claim.lock().iter().all(Option::is_some))
    }

    /// Positions `player` currently marks, in slot order.
    pub fn claimed_positions(&self, player: PlayerId) -> Vec<Position> {
        self.claims
            .get(player)
            .map(|claim| claim.lock().iter().flatten().copied().collect())
            .unwrap_or_default()
    }

    /// Positions currently holding no card, ascending.
    pub async fn free_positions(&self) -> Vec<Position> {
        let mut free = Vec::new();
        for (position, cell) in self.positions.iter().enumerate() {
            if cell.lock().await.is_none() {
                free.push(position);
            }
        }
        free
    }

    pub async fn card_at(&self, position: Position) -> Option<CardId> {
        let cell = self.positions.get(position)?;
        let card = *cell.lock().await;
        card
    }

    pub fn position_of(&self, card: CardId) -> Option<Position> {
        self.card_positions.get(&card).map(|p| *p)
    }

    /// Occupied positions with their cards, ascending by position.
    pub async fn cards(&self) -> Vec<(Position, CardId)> {
        let mut cards = Vec::new();
        for (position, cell) in self.positions.iter().enumerate() {
            if let Some(card) = *cell.lock().await {
                cards.push((position, card));
            }
        }
        cards
    }

    pub async fn count_cards(&self) -> usize {
        self.cards().await.len()
    }

    /// Best-effort view without waiting: a position whose lock is held right
    /// now (mid placement or removal) reads as empty.
    pub fn peek_cards(&self) -> Vec<Option<CardId>> {
        self.positions
            .iter()
            .map(|cell| cell.try_lock().ok().and_then(|slot| *slot))
            .collect()
    }

    /// The player's claim with the card under each marker.
    pub async fn export_claim(&self, player: PlayerId) -> ClaimSnapshot {
        let markers: Vec<Option<Position>> = match self.claims.get(player) {
            Some(claim) => claim.lock().clone(),
            None => Vec::new(),
        };

        let mut slots = Vec::with_capacity(markers.len());
        for marker in markers {
            let entry = match marker {
                Some(position) => self.card_at(position).await.map(|card| (position, card)),
                None => None,
            };
            slots.push(entry);
        }
        ClaimSnapshot { slots }
    }

    async fn simulate_latency(&self) {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
    }
}
