//! Transform flat spreadsheet rows into per-profession trade documents.
//!
//! This is the critical step of the pipeline: each row is classified by its
//! trade type and appended (as one or two trades) to the right tier of its
//! profession's document.
//!
//! ```text
//! Sheet input (flat rows)              →  Grouped output (one doc per profession)
//! ┌───────────────────────────────┐       ┌────────────────────────────────┐
//! │ Blacksmith, lvl 1, Buy        │       │ createengineers:Blacksmith     │
//! │ Blacksmith, lvl 2, Buy/Sell   │  →    │ novice: [buy]                  │
//! │ Chef,       lvl 1, Process    │       │ apprentice: [buy, sell]        │
//! └───────────────────────────────┘       ├────────────────────────────────┤
//!                                         │ createengineers:Chef           │
//!                                         │ novice: [process]              │
//!                                         └────────────────────────────────┘
//! ```
//!
//! Rows whose `Trade Type` is unrecognized emit no trade but still create the
//! profession document. The Process shape takes its `priceIn` count from
//! `Buy Amount`, not `Sell Amount` - the consuming game schema expects this.

use std::collections::BTreeMap;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::{TransformError, TransformResult};
use crate::models::{
    BuyTrade, ItemStack, ProcessTrade, ProfessionDocument, ProfessionKey, SellTrade, Tier, Trade,
    TradeRow, TradeType, FALLBACK_CONVERTIBLE,
};
use crate::parser::columns;

// =============================================================================
// Randomized Fallbacks
// =============================================================================

/// Source of fallback values for rows that leave `Max` or `XP` blank.
///
/// Injectable so tests (and the `--seed` CLI flag) can make defaulted output
/// deterministic. Rows that fill both cells never consult this.
pub trait DefaultsSource {
    /// An integer in `[lo, hi]`, both inclusive.
    fn roll(&mut self, lo: u32, hi: u32) -> u32;
}

/// Production source backed by the thread-local RNG (not seeded).
#[derive(Debug, Default)]
pub struct ThreadRngDefaults;

impl DefaultsSource for ThreadRngDefaults {
    fn roll(&mut self, lo: u32, hi: u32) -> u32 {
        rand::thread_rng().gen_range(lo..=hi)
    }
}

/// Deterministic source for reproducible runs.
#[derive(Debug)]
pub struct SeededDefaults(StdRng);

impl SeededDefaults {
    pub fn new(seed: u64) -> Self {
        Self(StdRng::seed_from_u64(seed))
    }
}

impl DefaultsSource for SeededDefaults {
    fn roll(&mut self, lo: u32, hi: u32) -> u32 {
        self.0.gen_range(lo..=hi)
    }
}

// =============================================================================
// Transformer
// =============================================================================

/// Transform rows into a map of profession documents.
///
/// Processing is single-pass and strictly in input order; within a
/// `Buy/Sell` row the buy trade is appended before the sell trade.
///
/// # Errors
///
/// Fails fast on the first row whose price/amount cells cannot be coerced
/// to integers ([`TransformError::TypeCoercion`]) or whose trade level is
/// unknown ([`TransformError::InvalidLevel`]). Partial results are discarded.
pub fn transform_rows(
    rows: &[TradeRow],
    profession_prefix: &str,
    trade_type_prefix: &str,
    defaults: &mut dyn DefaultsSource,
) -> TransformResult<BTreeMap<ProfessionKey, ProfessionDocument>> {
    let mut documents: BTreeMap<ProfessionKey, ProfessionDocument> = BTreeMap::new();

    for row in rows {
        // Coercion first, so a bad price cell is reported even when the
        // level cell is also bad (the original tool coerced whole columns
        // before iterating).
        let buy_price = coerce(columns::BUY_PRICE, &row.buy_price)?;
        let buy_amount = coerce(columns::BUY_AMOUNT, &row.buy_amount)?;
        let sell_price = coerce(columns::SELL_PRICE, &row.sell_price)?;
        let sell_amount = coerce(columns::SELL_AMOUNT, &row.sell_amount)?;

        let tier = Tier::from_level(&row.trade_level).ok_or_else(|| {
            TransformError::InvalidLevel {
                value: row.trade_level.clone(),
            }
        })?;

        let key = ProfessionKey::new(profession_prefix, &row.profession);
        let doc = documents
            .entry(key.clone())
            .or_insert_with(|| ProfessionDocument::new(&key));

        // Unrecognized trade types are skipped, not errors. The document
        // above is still created, matching the original tool.
        let Some(trade_type) = TradeType::from_cell(&row.trade_type) else {
            continue;
        };

        match trade_type {
            TradeType::Buy => {
                doc.push_trade(tier, buy_trade(row, trade_type_prefix, buy_price, buy_amount, defaults));
            }
            TradeType::Sell => {
                doc.push_trade(tier, sell_trade(row, trade_type_prefix, sell_price, sell_amount, defaults));
            }
            TradeType::BuySell => {
                doc.push_trade(tier, buy_trade(row, trade_type_prefix, buy_price, buy_amount, defaults));
                doc.push_trade(tier, sell_trade(row, trade_type_prefix, sell_price, sell_amount, defaults));
            }
            TradeType::Process => {
                doc.push_trade(tier, process_trade(row, trade_type_prefix, sell_price, buy_amount, defaults));
            }
        }
    }

    Ok(documents)
}

fn coerce(column: &str, cell: &str) -> TransformResult<u32> {
    cell.trim()
        .parse::<u32>()
        .map_err(|_| TransformError::TypeCoercion {
            column: column.to_string(),
            value: cell.to_string(),
        })
}

fn buy_trade(
    row: &TradeRow,
    prefix: &str,
    buy_price: u32,
    buy_amount: u32,
    defaults: &mut dyn DefaultsSource,
) -> Trade {
    Trade::Buy(BuyTrade {
        kind: format!("{}:buy_item", prefix),
        buy: ItemStack::emeralds(buy_price),
        reward: ItemStack::new(row.item_id.clone(), buy_amount),
        max_uses: row.max_uses.unwrap_or_else(|| defaults.roll(2, 8)),
        villager_experience: row.xp.unwrap_or_else(|| defaults.roll(2, 5)),
    })
}

fn sell_trade(
    row: &TradeRow,
    prefix: &str,
    sell_price: u32,
    sell_amount: u32,
    defaults: &mut dyn DefaultsSource,
) -> Trade {
    Trade::Sell(SellTrade {
        kind: format!("{}:sell_item", prefix),
        sell: ItemStack::emeralds(sell_price),
        price_in: ItemStack::new(row.item_id.clone(), sell_amount),
        max_uses: row.max_uses.unwrap_or_else(|| defaults.roll(4, 12)),
        villager_experience: row.xp.unwrap_or_else(|| defaults.roll(2, 8)),
    })
}

/// Process trades price in `Buy Amount`, not `Sell Amount`.
fn process_trade(
    row: &TradeRow,
    prefix: &str,
    sell_price: u32,
    buy_amount: u32,
    defaults: &mut dyn DefaultsSource,
) -> Trade {
    Trade::Process(ProcessTrade {
        kind: format!("{}:process_item", prefix),
        sell: ItemStack::emeralds(sell_price),
        price_in: ItemStack::new(row.item_id.clone(), buy_amount),
        convertible: ItemStack::new(
            row.convert_item_id
                .clone()
                .unwrap_or_else(|| FALLBACK_CONVERTIBLE.to_string()),
            row.convert_item_amount.unwrap_or(1),
        ),
        max_uses: row.max_uses.unwrap_or_else(|| defaults.roll(4, 12)),
        villager_experience: row.xp.unwrap_or_else(|| defaults.roll(2, 8)),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    /// Replays a fixed script of values; panics if the transformer rolls
    /// more often than expected.
    struct ScriptedDefaults(Vec<u32>);

    impl DefaultsSource for ScriptedDefaults {
        fn roll(&mut self, lo: u32, hi: u32) -> u32 {
            let v = self.0.remove(0);
            assert!(v >= lo && v <= hi, "scripted value {} outside [{}, {}]", v, lo, hi);
            v
        }
    }

    /// Panics on any roll; for rows that fill every optional cell.
    struct NoDefaults;

    impl DefaultsSource for NoDefaults {
        fn roll(&mut self, _: u32, _: u32) -> u32 {
            panic!("no fallback expected");
        }
    }

    fn row(trade_type: &str) -> TradeRow {
        TradeRow {
            item_id: "iron_ingot".into(),
            profession: "Blacksmith".into(),
            trade_level: "1".into(),
            buy_price: "5".into(),
            buy_amount: "3".into(),
            trade_type: trade_type.into(),
            sell_price: "2".into(),
            sell_amount: "7".into(),
            convert_item_id: None,
            convert_item_amount: None,
            max_uses: Some(12),
            xp: Some(4),
        }
    }

    fn transform_one(row: TradeRow) -> ProfessionDocument {
        let docs = transform_rows(&[row], "createengineers", "createengineers", &mut NoDefaults)
            .unwrap();
        docs.into_values().next().unwrap()
    }

    #[test]
    fn test_buy_row_example() {
        let mut r = row("Buy");
        r.sell_price = "0".into();
        r.sell_amount = "0".into();
        let doc = transform_one(r);

        assert_eq!(doc.profession, "createengineers:Blacksmith");
        let value = serde_json::to_value(&doc.trades.novice).unwrap();
        assert_eq!(
            value,
            json!([{
                "type": "createengineers:buy_item",
                "buy": {"item": "emerald", "count": 5},
                "reward": {"item": "iron_ingot", "count": 3},
                "max_uses": 12,
                "villager_experience": 4
            }])
        );
    }

    #[test]
    fn test_buy_sell_emits_pair_in_order() {
        let doc = transform_one(row("Buy/Sell"));

        let trades = &doc.trades.novice;
        assert_eq!(trades.len(), 2);
        assert!(matches!(trades[0], Trade::Buy(_)));
        assert!(matches!(trades[1], Trade::Sell(_)));
    }

    #[test]
    fn test_process_uses_buy_amount_for_price_in() {
        let doc = transform_one(row("Process"));

        let Trade::Process(ref p) = doc.trades.novice[0] else {
            panic!("expected a process trade");
        };
        // buy_amount is 3, sell_amount is 7
        assert_eq!(p.price_in.count, 3);
        assert_eq!(p.price_in.item, "iron_ingot");
        assert_eq!(p.sell.count, 2);
        assert_eq!(p.convertible.item, "dead_tube_coral");
        assert_eq!(p.convertible.count, 1);
    }

    #[test]
    fn test_process_with_explicit_convertible() {
        let mut r = row("Process");
        r.convert_item_id = Some("sponge".into());
        r.convert_item_amount = Some(2);
        let doc = transform_one(r);

        let Trade::Process(ref p) = doc.trades.novice[0] else {
            panic!("expected a process trade");
        };
        assert_eq!(p.convertible, ItemStack::new("sponge", 2));
    }

    #[test]
    fn test_level_three_is_journeyman() {
        let mut r = row("Sell");
        r.trade_level = "3".into();
        let doc = transform_one(r);

        assert!(doc.trades.novice.is_empty());
        assert_eq!(doc.trades.journeyman.len(), 1);
    }

    #[test]
    fn test_invalid_level_aborts() {
        let mut r = row("Buy");
        r.trade_level = "7".into();
        let err = transform_rows(&[r], "p", "p", &mut NoDefaults).unwrap_err();

        assert!(matches!(err, TransformError::InvalidLevel { ref value } if value == "7"));
    }

    #[test]
    fn test_coercion_failure_aborts_whole_run() {
        let good = row("Buy");
        let mut bad = row("Buy");
        bad.buy_price = "five".into();

        let err = transform_rows(&[good, bad], "p", "p", &mut NoDefaults).unwrap_err();
        assert!(matches!(
            err,
            TransformError::TypeCoercion { ref column, .. } if column == "Buy Price"
        ));
    }

    #[test]
    fn test_coercion_reported_before_bad_level() {
        let mut r = row("Buy");
        r.trade_level = "9".into();
        r.sell_amount = "x".into();

        let err = transform_rows(&[r], "p", "p", &mut NoDefaults).unwrap_err();
        assert!(matches!(err, TransformError::TypeCoercion { .. }));
    }

    #[test]
    fn test_unknown_trade_type_skipped_but_document_created() {
        let docs = transform_rows(&[row("Foo")], "createengineers", "createengineers", &mut NoDefaults)
            .unwrap();

        // No trade emitted, but the profession document exists with all
        // tiers empty - matching the original tool's output files.
        assert_eq!(docs.len(), 1);
        let doc = docs.values().next().unwrap();
        assert!(doc.trades.is_empty());
    }

    #[test]
    fn test_rows_accumulate_per_profession() {
        let mut chef = row("Sell");
        chef.profession = "Chef".into();
        chef.trade_level = "2".into();

        let docs = transform_rows(
            &[row("Buy"), row("Sell"), chef],
            "delightfulchefs",
            "delightfulchefs",
            &mut NoDefaults,
        )
        .unwrap();

        assert_eq!(docs.len(), 2);
        let blacksmith = &docs[&ProfessionKey::new("delightfulchefs", "Blacksmith")];
        assert_eq!(blacksmith.trades.novice.len(), 2);
        let chef = &docs[&ProfessionKey::new("delightfulchefs", "Chef")];
        assert_eq!(chef.trades.apprentice.len(), 1);
    }

    #[test]
    fn test_fallback_ranges_per_trade_shape() {
        let mut r = row("Buy/Sell");
        r.max_uses = None;
        r.xp = None;

        // buy: max [2,8], xp [2,5]; sell: max [4,12], xp [2,8]
        let mut defaults = ScriptedDefaults(vec![8, 5, 12, 8]);
        let docs = transform_rows(&[r], "p", "p", &mut defaults).unwrap();
        let doc = docs.values().next().unwrap();

        let Trade::Buy(ref buy) = doc.trades.novice[0] else {
            panic!("expected buy");
        };
        assert_eq!((buy.max_uses, buy.villager_experience), (8, 5));

        let Trade::Sell(ref sell) = doc.trades.novice[1] else {
            panic!("expected sell");
        };
        assert_eq!((sell.max_uses, sell.villager_experience), (12, 8));
    }

    #[test]
    fn test_seeded_defaults_are_deterministic() {
        let mut r = row("Process");
        r.max_uses = None;
        r.xp = None;

        let run = |seed| {
            let mut defaults = SeededDefaults::new(seed);
            transform_rows(&[r.clone()], "p", "p", &mut defaults).unwrap()
        };

        assert_eq!(run(42), run(42));
    }

    #[test]
    fn test_explicit_cells_bypass_defaults() {
        // NoDefaults panics if consulted; row fills Max and XP
        let doc = transform_one(row("Buy"));
        let Trade::Buy(ref buy) = doc.trades.novice[0] else {
            panic!("expected buy");
        };
        assert_eq!(buy.max_uses, 12);
        assert_eq!(buy.villager_experience, 4);
    }

    #[test]
    fn test_trade_type_prefix_in_kind() {
        let docs = transform_rows(&[row("Buy")], "minecraft", "createengineers", &mut NoDefaults)
            .unwrap();
        let doc = docs.values().next().unwrap();

        assert_eq!(doc.profession, "minecraft:Blacksmith");
        let Trade::Buy(ref buy) = doc.trades.novice[0] else {
            panic!("expected buy");
        };
        assert_eq!(buy.kind, "createengineers:buy_item");
    }
}
