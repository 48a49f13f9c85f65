//! Headless player: clicks and buys so runs can be simulated unattended.
//!
//! Each turn: collect coins `clicks_per_turn` times, occasionally attract
//! a settler, then buy one random entry the session can afford right now.

use crate::{
    error::SimResult,
    event::SimEvent,
    rng::BotRng,
    session::Session,
};

pub struct AutoPlayer {
    rng:             BotRng,
    clicks_per_turn: u32,
    /// Probability of attracting one settler per turn.
    attract_chance:  f64,
    /// Probability of attempting a purchase per turn.
    buy_chance:      f64,
}

impl AutoPlayer {
    pub fn new(seed: u64, clicks_per_turn: u32) -> Self {
        Self {
            rng: BotRng::new(seed),
            clicks_per_turn,
            attract_chance: 0.2,
            buy_chance: 0.5,
        }
    }

    pub fn take_turn(&mut self, session: &mut Session) -> SimResult<Vec<SimEvent>> {
        let mut events = Vec::new();
        for _ in 0..self.clicks_per_turn {
            events.extend(session.collect_coins(1.0)?);
        }
        if self.rng.chance(self.attract_chance) {
            events.extend(session.attract_population(1.0)?);
        }
        if self.rng.chance(self.buy_chance) {
            let affordable: Vec<String> = session
                .catalog()
                .entries()
                .iter()
                .filter(|e| session.can_purchase(&e.id))
                .map(|e| e.id.clone())
                .collect();
            if let Some(id) = self.rng.pick(&affordable) {
                events.extend(session.purchase(id)?);
            }
        }
        Ok(events)
    }
}
