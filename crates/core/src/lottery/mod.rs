//! Lottery ticket generation.
//!
//! Pure uniform sampling with input validation; no I/O and no shared state.

use crate::Error;
use rand::seq::index;

struct GameSpec {
    name: &'static str,
    display: &'static str,
    /// Smallest and largest playable ticket size.
    picks: (usize, usize),
    /// Inclusive range the numbers are drawn from.
    range: (u16, u16),
}

const GAMES: &[GameSpec] = &[
    GameSpec { name: "quina", display: "Quina", picks: (5, 80), range: (1, 80) },
    GameSpec { name: "megasena", display: "Mega-Sena", picks: (6, 60), range: (1, 60) },
];

/// Name aliases accepted alongside canonical game names.
const ALIASES: &[(&str, &str)] = &[("sena", "megasena")];

/// A supported lottery game.
#[derive(Debug, Clone)]
pub struct Lottery {
    display: &'static str,
    min_picks: usize,
    max_picks: usize,
    low: u16,
    high: u16,
}

impl Lottery {
    /// Resolve a game by canonical name or alias.
    pub fn new(name: &str) -> Result<Self, Error> {
        let canonical = ALIASES
            .iter()
            .find(|(alias, _)| *alias == name)
            .map_or(name, |(_, target)| *target);

        let spec = GAMES
            .iter()
            .find(|game| game.name == canonical)
            .ok_or_else(|| Error::UnknownLottery(name.to_string()))?;

        Ok(Self {
            display: spec.display,
            min_picks: spec.picks.0,
            max_picks: spec.picks.1,
            low: spec.range.0,
            high: spec.range.1,
        })
    }

    pub fn display_name(&self) -> &str {
        self.display
    }

    /// Draw one ticket: `count` distinct numbers, sorted ascending.
    ///
    /// `None` plays the game's minimum ticket size. Sizes outside the
    /// game's valid range fail with [`Error::InvalidPickCount`].
    pub fn ticket(&self, count: Option<usize>) -> Result<Vec<u16>, Error> {
        let count = count.unwrap_or(self.min_picks);
        if count < self.min_picks || count > self.max_picks {
            return Err(Error::InvalidPickCount(count));
        }

        let span = (self.high - self.low + 1) as usize;
        let mut rng = rand::rng();
        let mut numbers: Vec<u16> = index::sample(&mut rng, span, count)
            .into_iter()
            .map(|offset| self.low + offset as u16)
            .collect();
        numbers.sort_unstable();
        Ok(numbers)
    }
}
