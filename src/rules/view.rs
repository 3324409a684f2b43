//! Per-player redacted views.
//!
//! A view is an ordinary `GameState`, so bots and clients run the same rules
//! code against it. What the viewer may not know is replaced by `Hidden`
//! placeholders that keep their instance ids:
//! - other players' hands
//! - the deck and the discard pile (counts stay visible)
//! - another player's design-office reveal
//!
//! The random stream is swapped for one derived from the version, so a view
//! cannot be used to predict future shuffles.

use crate::core::{GameRng, GameState, PlayerId, SubState};

impl GameState {
    /// The state as `viewer` is allowed to see it.
    #[must_use]
    pub fn view_for(&self, viewer: PlayerId) -> GameState {
        let mut view = self.clone();

        for (player, me) in view.players.iter_mut() {
            if player != viewer {
                for card in &mut me.hand {
                    *card = card.hidden();
                }
            }
        }
        view.deck = view.deck.iter().map(|c| c.hidden()).collect();
        view.discard = view.discard.iter().map(|c| c.hidden()).collect();

        if let Some(SubState::DesignOffice(pick)) = &mut view.sub_state {
            if pick.player != viewer {
                for card in &mut pick.revealed {
                    *card = card.hidden();
                }
            }
        }

        view.rng = GameRng::new(self.version);
        view
    }
}
