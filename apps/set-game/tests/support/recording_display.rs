use std::time::Duration;

use parking_lot::Mutex;
use set_game::display::DisplaySink;
use set_game::domain::{CardId, PlayerId, Position};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayEvent {
    CardPlaced(CardId, Position),
    CardRemoved(Position),
    TokenPlaced(PlayerId, Position),
    TokenRemoved(PlayerId, Position),
    Score(PlayerId, u32),
    Freeze(PlayerId, Duration),
    Countdown(Duration, bool),
    GameOver(Vec<PlayerId>),
}

/// Display sink that keeps every notification for later assertions.
#[derive(Default)]
pub struct RecordingDisplay {
    events: Mutex<Vec<DisplayEvent>>,
}

impl RecordingDisplay {
    pub fn events(&self) -> Vec<DisplayEvent> {
        self.events.lock().clone()
    }

    pub fn count(&self, matches: impl Fn(&DisplayEvent) -> bool) -> usize {
        self.events.lock().iter().filter(|e| matches(e)).count()
    }

    pub fn any(&self, matches: impl Fn(&DisplayEvent) -> bool) -> bool {
        self.count(matches) > 0
    }

    fn push(&self, event: DisplayEvent) {
        self.events.lock().push(event);
    }
}

impl DisplaySink for RecordingDisplay {
    fn on_card_placed(&self, card: CardId, position: Position) {
        self.push(DisplayEvent::CardPlaced(card, position));
    }

    fn on_card_removed(&self, position: Position) {
        self.push(DisplayEvent::CardRemoved(position));
    }

    fn on_token_placed(&self, player: PlayerId, position: Position) {
        self.push(DisplayEvent::TokenPlaced(player, position));
    }

    fn on_token_removed(&self, player: PlayerId, position: Position) {
        self.push(DisplayEvent::TokenRemoved(player, position));
    }

    fn on_score_changed(&self, player: PlayerId, score: u32) {
        self.push(DisplayEvent::Score(player, score));
    }

    fn on_freeze(&self, player: PlayerId, remaining: Duration) {
        self.push(DisplayEvent::Freeze(player, remaining));
    }

    fn on_countdown(&self, remaining: Duration, warning: bool) {
        self.push(DisplayEvent::Countdown(remaining, warning));
    }

    fn on_game_over(&self, winners: &[PlayerId]) {
        self.push(DisplayEvent::GameOver(winners.to_vec()));
    }
}
