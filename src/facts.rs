//! Fun-facts deck: short space-weather facts drawn at random without
//! repeating until every fact has been seen.

use std::fmt;

use log::debug;
use rand::Rng;
use serde::Serialize;

use crate::i18n::{interpolate, Translator};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }

    /// Key of the "N easy facts" style label.
    pub fn stats_key(self) -> String {
        format!("facts.stats.{}", self.as_str())
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Fact {
    pub category: &'static str,
    pub text: &'static str,
    pub difficulty: Difficulty,
}

const fn fact(category: &'static str, text: &'static str, difficulty: Difficulty) -> Fact {
    Fact {
        category,
        text,
        difficulty,
    }
}

use Difficulty::{Easy, Hard, Medium};

pub static FACTS: [Fact; 20] = [
    fact("Solar Flares", "The biggest solar flare ever recorded happened in 2003 and was so powerful it overloaded the sensors measuring it!", Easy),
    fact("The Sun", "The Sun is so big that you could fit more than 1 million Earths inside it!", Easy),
    fact("Auroras", "Auroras also happen on other planets! Jupiter and Saturn have auroras that are even bigger and brighter than Earth's.", Medium),
    fact("Speed", "Solar wind travels at about 1 million miles per hour - that's fast enough to go from Earth to the Moon in just 15 minutes!", Medium),
    fact("History", "In 1859, a massive solar storm called the Carrington Event made telegraph wires spark and catch fire. If it happened today, it could damage satellites and power grids worldwide!", Hard),
    fact("Protection", "Earth's magnetic field protects us from most solar radiation. Without it, solar wind would strip away our atmosphere like it did on Mars!", Medium),
    fact("CMEs", "A Coronal Mass Ejection can contain up to 10 billion tons of particles - that's heavier than 10,000 aircraft carriers!", Hard),
    fact("Auroras", "The colors of auroras depend on which gas particles are hit: oxygen creates green and red, while nitrogen creates blue and purple.", Easy),
    fact("Technology", "GPS satellites can become less accurate during solar storms because the radiation affects radio signals traveling through the atmosphere.", Medium),
    fact("The Sun", "The Sun's surface temperature is about 10,000°F, but its outer atmosphere (corona) is mysteriously much hotter at over 2 million°F!", Hard),
    fact("History", "In 1989, a geomagnetic storm caused a 9-hour blackout in Quebec, Canada, affecting 6 million people. The same storm made auroras visible as far south as Texas!", Medium),
    fact("Space Travel", "Astronauts on the International Space Station can receive as much radiation in one day during a solar storm as you'd get from 100 chest X-rays!", Hard),
    fact("Solar Cycle", "The Sun goes through an 11-year cycle of activity. During solar maximum, there are many more solar flares and CMEs than during solar minimum.", Medium),
    fact("Auroras", "The best places to see auroras are near the Arctic and Antarctic circles, in places like Alaska, Canada, Iceland, Norway, and Antarctica.", Easy),
    fact("Speed", "Light from a solar flare reaches Earth in just 8 minutes, but the particles from a CME take 1-3 days to arrive.", Medium),
    fact("Animals", "Some scientists think that whales, sea turtles, and birds use Earth's magnetic field to navigate. Solar storms might confuse them!", Hard),
    fact("Technology", "Airlines sometimes have to reroute flights during solar storms to avoid radiation exposure and communication problems at high altitudes.", Medium),
    fact("The Sun", "The Sun converts 4 million tons of matter into energy every second through nuclear fusion!", Hard),
    fact("Auroras", "Auroras make sounds! Some people report hearing crackling or whooshing noises during very strong aurora displays.", Hard),
    fact("Prediction", "Scientists use special satellites positioned between Earth and the Sun to give us about 15-60 minutes warning before a solar storm hits!", Medium),
];

/// How many facts of `difficulty` the table holds.
pub fn count_by_difficulty(facts: &[Fact], difficulty: Difficulty) -> usize {
    facts.iter().filter(|f| f.difficulty == difficulty).count()
}

/// Draws facts at random. Each fact shows once per pass; when every fact
/// has been shown the pass starts over.
#[derive(Debug, Clone)]
pub struct FactDeck<'a> {
    facts: &'a [Fact],
    /// Indices shown in the current pass, in draw order.
    shown: Vec<usize>,
}

impl Default for FactDeck<'static> {
    fn default() -> Self {
        Self::new(&FACTS)
    }
}

impl<'a> FactDeck<'a> {
    pub fn new(facts: &'a [Fact]) -> Self {
        Self {
            facts,
            shown: Vec::new(),
        }
    }

    pub fn total(&self) -> usize {
        self.facts.len()
    }

    /// Facts drawn in the current pass.
    pub fn shown(&self) -> usize {
        self.shown.len()
    }

    pub fn current(&self) -> Option<&'a Fact> {
        self.shown.last().map(|&i| &self.facts[i])
    }

    /// Draw a fact not yet shown in this pass. `None` only for an empty deck.
    pub fn next_fact<R: Rng>(&mut self, rng: &mut R) -> Option<&'a Fact> {
        if self.facts.is_empty() {
            return None;
        }

        if self.shown.len() == self.facts.len() {
            debug!("All {} facts shown, starting a new pass", self.facts.len());
            self.shown.clear();
        }

        let available: Vec<usize> = (0..self.facts.len())
            .filter(|i| !self.shown.contains(i))
            .collect();
        let index = available[rng.gen_range(0..available.len())];
        self.shown.push(index);
        Some(&self.facts[index])
    }

    /// "You've discovered {current} of {total} facts", translated.
    pub fn progress_label(&self, t: &dyn Translator) -> String {
        interpolate(
            &t.translate("facts.progress"),
            &[("current", &self.shown()), ("total", &self.total())],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use crate::i18n::{capitalize, Dictionary, Language};

    #[test]
    fn test_table_shape() {
        assert_eq!(FACTS.len(), 20);
        assert_eq!(count_by_difficulty(&FACTS, Difficulty::Easy), 4);
        assert_eq!(count_by_difficulty(&FACTS, Difficulty::Medium), 9);
        assert_eq!(count_by_difficulty(&FACTS, Difficulty::Hard), 7);

        let categories: HashSet<_> = FACTS.iter().map(|f| f.category).collect();
        assert_eq!(categories.len(), 12);
        assert!(categories.contains("Auroras"));
    }

    #[test]
    fn test_full_pass_has_no_repeats() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut deck = FactDeck::default();

        let mut seen = HashSet::new();
        for drawn in 1..=FACTS.len() {
            let fact = deck.next_fact(&mut rng).unwrap();
            assert!(seen.insert(fact.text), "repeated: {}", fact.text);
            assert_eq!(deck.shown(), drawn);
        }
        assert_eq!(seen.len(), deck.total());
    }

    #[test]
    fn test_exhausted_deck_starts_over() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut deck = FactDeck::new(&FACTS[..3]);
        for _ in 0..3 {
            deck.next_fact(&mut rng);
        }
        assert_eq!(deck.shown(), 3);

        let fact = deck.next_fact(&mut rng).unwrap();
        assert_eq!(deck.shown(), 1);
        assert_eq!(deck.current(), Some(fact));
    }

    #[test]
    fn test_single_fact_deck_repeats_itself() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut deck = FactDeck::new(&FACTS[..1]);
        assert_eq!(deck.next_fact(&mut rng), Some(&FACTS[0]));
        assert_eq!(deck.next_fact(&mut rng), Some(&FACTS[0]));
        assert_eq!(deck.shown(), 1);
    }

    #[test]
    fn test_empty_deck() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut deck = FactDeck::new(&[]);
        assert_eq!(deck.next_fact(&mut rng), None);
        assert_eq!(deck.current(), None);
    }

    #[test]
    fn test_progress_label() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut deck = FactDeck::default();
        deck.next_fact(&mut rng);
        deck.next_fact(&mut rng);

        let en = Dictionary::bundled(Language::En).unwrap();
        assert_eq!(deck.progress_label(&en), "You've discovered 2 of 20 facts");
        let es = Dictionary::bundled(Language::Es).unwrap();
        assert_eq!(deck.progress_label(&es), "Has descubierto 2 de 20 datos");
    }

    #[test]
    fn test_difficulty_display() {
        assert_eq!(capitalize(Difficulty::Medium.as_str()), "Medium");
        assert_eq!(Difficulty::Hard.to_string(), "hard");
        assert_eq!(Difficulty::Easy.stats_key(), "facts.stats.easy");
    }
}
