//! Deck construction.
//!
//! Building a deck is two independent shuffles: one over the symbol pool
//! to pick which symbols appear, one over the expanded token sequence so
//! pair positions carry no construction bias. Both go through
//! [`GameRng::shuffle`], which is an unbiased Fisher-Yates permutation.

use crate::cards::{CardToken, SymbolDef};
use crate::error::EngineError;
use crate::rng::GameRng;

/// Build a shuffled deck of `2 * pair_count` tokens.
///
/// Draws `pair_count` distinct symbols uniformly from `pool`, expands each
/// into a pair of tokens, and returns the pair-expanded sequence in
/// uniformly random order.
///
/// Fails with [`EngineError::PoolTooSmall`] when the pool cannot supply
/// the requested pairs. The fixed level catalog always satisfies this;
/// the check guards custom pools.
pub fn build(
    pair_count: usize,
    pool: &[SymbolDef],
    rng: &mut GameRng,
) -> Result<Vec<CardToken>, EngineError> {
    if pair_count > pool.len() {
        return Err(EngineError::PoolTooSmall {
            requested: pair_count,
            available: pool.len(),
        });
    }

    let mut symbols: Vec<&SymbolDef> = pool.iter().collect();
    rng.shuffle(&mut symbols);

    let mut deck: Vec<CardToken> = symbols[..pair_count]
        .iter()
        .flat_map(|symbol| CardToken::pair_from(symbol))
        .collect();
    rng.shuffle(&mut deck);

    Ok(deck)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::SYMBOL_POOL;
    use rustc_hash::FxHashMap;

    #[test]
    fn test_deck_length() {
        let mut rng = GameRng::new(42);
        for pairs in 1..=SYMBOL_POOL.len() {
            let deck = build(pairs, SYMBOL_POOL, &mut rng).unwrap();
            assert_eq!(deck.len(), 2 * pairs);
        }
    }

    #[test]
    fn test_every_symbol_twice() {
        let mut rng = GameRng::new(7);
        let deck = build(8, SYMBOL_POOL, &mut rng).unwrap();

        let mut counts: FxHashMap<&str, usize> = FxHashMap::default();
        for token in &deck {
            *counts.entry(token.symbol_key.as_str()).or_default() += 1;
        }

        assert_eq!(counts.len(), 8);
        assert!(counts.values().all(|&n| n == 2));
    }

    #[test]
    fn test_token_ids_unique() {
        let mut rng = GameRng::new(3);
        let deck = build(12, SYMBOL_POOL, &mut rng).unwrap();

        for (i, a) in deck.iter().enumerate() {
            for b in &deck[i + 1..] {
                assert_ne!(a.id, b.id);
            }
        }
    }

    #[test]
    fn test_pool_too_small() {
        let mut rng = GameRng::new(42);
        let result = build(SYMBOL_POOL.len() + 1, SYMBOL_POOL, &mut rng);

        assert_eq!(
            result,
            Err(EngineError::PoolTooSmall {
                requested: SYMBOL_POOL.len() + 1,
                available: SYMBOL_POOL.len(),
            })
        );
    }

    #[test]
    fn test_empty_request() {
        let mut rng = GameRng::new(42);
        let deck = build(0, SYMBOL_POOL, &mut rng).unwrap();
        assert!(deck.is_empty());
    }

    #[test]
    fn test_same_seed_same_deck() {
        let mut rng1 = GameRng::new(99);
        let mut rng2 = GameRng::new(99);

        let deck1 = build(6, SYMBOL_POOL, &mut rng1).unwrap();
        let deck2 = build(6, SYMBOL_POOL, &mut rng2).unwrap();

        assert_eq!(deck1, deck2);
    }
}
