//! Seeded name generation for named world features.

use rand::Rng;

use crate::seed::scoped_rng;

/// What is being named; each kind draws from its own tables and seed scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameKind {
    Continent,
    Island,
    River,
    Lake,
    Civilization,
    Settlement,
}

impl NameKind {
    fn tag(self) -> &'static str {
        match self {
            NameKind::Continent => "name-continent",
            NameKind::Island => "name-island",
            NameKind::River => "name-river",
            NameKind::Lake => "name-lake",
            NameKind::Civilization => "name-civilization",
            NameKind::Settlement => "name-settlement",
        }
    }
}

const ROOTS: &[&str] = &[
    "Ar", "Bel", "Cor", "Dun", "El", "Fen", "Gal", "Hal", "Ith", "Kar", "Lor", "Mar", "Nor", "Or",
    "Pel", "Quel", "Ros", "Sar", "Tor", "Ul", "Val", "Wen", "Yr", "Zan",
];

const MIDDLES: &[&str] = &["a", "e", "i", "o", "an", "en", "or", "ir", "al", "un"];

fn pick<'a, R: Rng>(rng: &mut R, table: &[&'a str]) -> &'a str {
    table[rng.random_range(0..table.len())]
}

fn stem<R: Rng>(rng: &mut R) -> String {
    format!("{}{}", pick(rng, ROOTS), pick(rng, MIDDLES))
}

/// Generates a name for the `index`-th feature of `kind`.
pub fn generate_name(seed: u64, kind: NameKind, index: i64) -> String {
    let mut rng = scoped_rng(seed, kind.tag(), &[index]);

    match kind {
        NameKind::Continent => {
            let suffix = pick(&mut rng, &["ria", "land", "mark", "thia", "dor", "gard"]);
            format!("{}{}", stem(&mut rng), suffix)
        }
        NameKind::Island => {
            let suffix = pick(&mut rng, &["Isle", "Key", "Holm", "Atoll", "Rock"]);
            format!("{} {}", stem(&mut rng), suffix)
        }
        NameKind::River => {
            let prefix = pick(
                &mut rng,
                &["Silver", "Black", "Winding", "Swift", "Golden", "Crystal", "Serpent", "Iron"],
            );
            let suffix = pick(&mut rng, &["River", "Stream", "Run", "Waters", "Flow", "Brook"]);
            format!("{prefix} {suffix}")
        }
        NameKind::Lake => {
            let prefix = pick(&mut rng, &["Lake", "Mere", "Loch", "Tarn"]);
            format!("{} {}", prefix, stem(&mut rng))
        }
        NameKind::Civilization => {
            let form = pick(&mut rng, &["Kingdom of", "Republic of", "Tribes of", "Dominion of", "League of"]);
            format!("{} {}", form, stem(&mut rng))
        }
        NameKind::Settlement => {
            let suffix = pick(
                &mut rng,
                &["hold", "haven", "ford", "stead", "gate", "bury", "well", "ton", "march", "dale"],
            );
            format!("{}{}", stem(&mut rng), suffix)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_are_deterministic() {
        assert_eq!(
            generate_name(5, NameKind::Settlement, 3),
            generate_name(5, NameKind::Settlement, 3)
        );
    }

    #[test]
    fn names_are_non_empty_for_every_kind() {
        for kind in [
            NameKind::Continent,
            NameKind::Island,
            NameKind::River,
            NameKind::Lake,
            NameKind::Civilization,
            NameKind::Settlement,
        ] {
            assert!(!generate_name(1, kind, 0).is_empty());
        }
    }

    #[test]
    fn kinds_use_separate_scopes() {
        let river = generate_name(9, NameKind::River, 0);
        let lake = generate_name(9, NameKind::Lake, 0);
        assert_ne!(river, lake);
    }
}
