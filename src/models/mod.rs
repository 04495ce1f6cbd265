//! Domain models for the tradegen pipeline.
//!
//! This module contains the core data structures used throughout the pipeline:
//!
//! - [`TradeRow`] - typed input record (one spreadsheet row)
//! - [`Tier`] - named trade difficulty level (novice..master)
//! - [`TradeType`] - row classification (Buy, Sell, Buy/Sell, Process)
//! - [`Trade`] - one emitted trade in its final JSON shape
//! - [`ProfessionDocument`] - per-profession output document
//! - [`ProfessionKey`] - prefixed profession identifier used as map key

use serde::{Deserialize, Serialize};

/// Currency item used on the emerald side of every trade.
pub const CURRENCY_ITEM: &str = "emerald";

/// Convertible item used when a Process row leaves `Convert Item ID` blank.
pub const FALLBACK_CONVERTIBLE: &str = "dead_tube_coral";

// =============================================================================
// Input Row
// =============================================================================

/// One spreadsheet row, typed at the parser boundary.
///
/// The four price/amount cells stay raw strings: coercing them to integers
/// is the transformer's job and failing there aborts the whole run. Optional
/// cells are `None` when blank.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeRow {
    pub item_id: String,
    pub profession: String,
    pub trade_level: String,
    pub buy_price: String,
    pub buy_amount: String,
    pub trade_type: String,
    pub sell_price: String,
    pub sell_amount: String,
    pub convert_item_id: Option<String>,
    pub convert_item_amount: Option<u32>,
    pub max_uses: Option<u32>,
    pub xp: Option<u32>,
}

// =============================================================================
// Tier
// =============================================================================

/// Named trade difficulty level, mapped from integer levels 1-5.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    Novice,
    Apprentice,
    Journeyman,
    Expert,
    Master,
}

impl Tier {
    /// All tiers, in output order.
    pub const ALL: [Tier; 5] = [
        Tier::Novice,
        Tier::Apprentice,
        Tier::Journeyman,
        Tier::Expert,
        Tier::Master,
    ];

    /// Resolve a raw `Trade Level` cell ("1".."5") to a tier.
    pub fn from_level(cell: &str) -> Option<Self> {
        match cell.trim().parse::<i64>().ok()? {
            1 => Some(Self::Novice),
            2 => Some(Self::Apprentice),
            3 => Some(Self::Journeyman),
            4 => Some(Self::Expert),
            5 => Some(Self::Master),
            _ => None,
        }
    }

    /// Numeric level (1-5).
    pub fn level(&self) -> u8 {
        match self {
            Self::Novice => 1,
            Self::Apprentice => 2,
            Self::Journeyman => 3,
            Self::Expert => 4,
            Self::Master => 5,
        }
    }

    /// Tier name as used in the output JSON.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Novice => "novice",
            Self::Apprentice => "apprentice",
            Self::Journeyman => "journeyman",
            Self::Expert => "expert",
            Self::Master => "master",
        }
    }
}

// =============================================================================
// Trade Type
// =============================================================================

/// Classification of a spreadsheet row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TradeType {
    Buy,
    Sell,
    /// Emits a buy trade immediately followed by a sell trade.
    BuySell,
    Process,
}

impl TradeType {
    /// Parse a raw `Trade Type` cell. Exact, case-sensitive match.
    ///
    /// Returns `None` for anything else; unrecognized types are skipped by
    /// the transformer rather than treated as errors.
    pub fn from_cell(cell: &str) -> Option<Self> {
        match cell {
            "Buy" => Some(Self::Buy),
            "Sell" => Some(Self::Sell),
            "Buy/Sell" => Some(Self::BuySell),
            "Process" => Some(Self::Process),
            _ => None,
        }
    }
}

// =============================================================================
// Trades
// =============================================================================

/// An item with a count, e.g. `{"item": "emerald", "count": 5}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ItemStack {
    pub item: String,
    pub count: u32,
}

impl ItemStack {
    pub fn new(item: impl Into<String>, count: u32) -> Self {
        Self {
            item: item.into(),
            count,
        }
    }

    /// An emerald stack of the given count.
    pub fn emeralds(count: u32) -> Self {
        Self::new(CURRENCY_ITEM, count)
    }
}

/// The villager buys `reward` worth of items for `buy` emeralds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BuyTrade {
    #[serde(rename = "type")]
    pub kind: String,
    pub buy: ItemStack,
    pub reward: ItemStack,
    pub max_uses: u32,
    pub villager_experience: u32,
}

/// The villager sells emeralds for `priceIn` items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SellTrade {
    #[serde(rename = "type")]
    pub kind: String,
    pub sell: ItemStack,
    #[serde(rename = "priceIn")]
    pub price_in: ItemStack,
    pub max_uses: u32,
    pub villager_experience: u32,
}

/// Like a sell trade, but also consumes a secondary `convertible` item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProcessTrade {
    #[serde(rename = "type")]
    pub kind: String,
    pub sell: ItemStack,
    #[serde(rename = "priceIn")]
    pub price_in: ItemStack,
    pub convertible: ItemStack,
    pub max_uses: u32,
    pub villager_experience: u32,
}

/// One emitted trade.
///
/// Serialized untagged: the trade registry reads the shape, not a tag.
/// `Process` must come before `Sell` so its extra `convertible` field
/// disambiguates deserialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Trade {
    Buy(BuyTrade),
    Process(ProcessTrade),
    Sell(SellTrade),
}

// =============================================================================
// Profession Key
// =============================================================================

/// Prefixed profession identifier, e.g. `createengineers:Blacksmith`.
///
/// A value type so the document map can key on it directly; `Ord` gives
/// deterministic iteration without relying on hash order.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProfessionKey(String);

impl ProfessionKey {
    /// Compose `prefix:profession`.
    pub fn new(prefix: &str, profession: &str) -> Self {
        Self(format!("{}:{}", prefix, profession))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Profession name with `prefix:` stripped, used for the output file name.
    pub fn file_stem(&self, prefix: &str) -> &str {
        self.0
            .strip_prefix(prefix)
            .and_then(|rest| rest.strip_prefix(':'))
            .unwrap_or(&self.0)
    }
}

impl std::fmt::Display for ProfessionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

// =============================================================================
// Profession Document
// =============================================================================

/// Trade lists for all five tiers.
///
/// All tiers are always serialized, empty ones as `[]`, in novice..master
/// order (field declaration order).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TierTrades {
    pub novice: Vec<Trade>,
    pub apprentice: Vec<Trade>,
    pub journeyman: Vec<Trade>,
    pub expert: Vec<Trade>,
    pub master: Vec<Trade>,
}

impl TierTrades {
    pub fn tier(&self, tier: Tier) -> &Vec<Trade> {
        match tier {
            Tier::Novice => &self.novice,
            Tier::Apprentice => &self.apprentice,
            Tier::Journeyman => &self.journeyman,
            Tier::Expert => &self.expert,
            Tier::Master => &self.master,
        }
    }

    pub fn tier_mut(&mut self, tier: Tier) -> &mut Vec<Trade> {
        match tier {
            Tier::Novice => &mut self.novice,
            Tier::Apprentice => &mut self.apprentice,
            Tier::Journeyman => &mut self.journeyman,
            Tier::Expert => &mut self.expert,
            Tier::Master => &mut self.master,
        }
    }

    /// Total trades across all tiers.
    pub fn len(&self) -> usize {
        Tier::ALL.iter().map(|t| self.tier(*t).len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// One per-profession output document: `{profession, trades}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfessionDocument {
    /// Prefixed profession name, e.g. `createengineers:Blacksmith`.
    pub profession: String,
    pub trades: TierTrades,
}

impl ProfessionDocument {
    /// Create an empty document for a profession (all tiers empty).
    pub fn new(key: &ProfessionKey) -> Self {
        Self {
            profession: key.as_str().to_string(),
            trades: TierTrades::default(),
        }
    }

    /// Append a trade to the given tier, preserving insertion order.
    pub fn push_trade(&mut self, tier: Tier, trade: Trade) {
        self.trades.tier_mut(tier).push(trade);
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_tier_from_level() {
        assert_eq!(Tier::from_level("1"), Some(Tier::Novice));
        assert_eq!(Tier::from_level("3"), Some(Tier::Journeyman));
        assert_eq!(Tier::from_level(" 5 "), Some(Tier::Master));
        assert_eq!(Tier::from_level("6"), None);
        assert_eq!(Tier::from_level("0"), None);
        assert_eq!(Tier::from_level("novice"), None);
        assert_eq!(Tier::from_level(""), None);
    }

    #[test]
    fn test_trade_type_exact_match() {
        assert_eq!(TradeType::from_cell("Buy"), Some(TradeType::Buy));
        assert_eq!(TradeType::from_cell("Buy/Sell"), Some(TradeType::BuySell));
        // case-sensitive: lowercase does not match
        assert_eq!(TradeType::from_cell("buy"), None);
        assert_eq!(TradeType::from_cell("Foo"), None);
    }

    #[test]
    fn test_profession_key_file_stem() {
        let key = ProfessionKey::new("createengineers", "Blacksmith");
        assert_eq!(key.as_str(), "createengineers:Blacksmith");
        assert_eq!(key.file_stem("createengineers"), "Blacksmith");
    }

    #[test]
    fn test_buy_trade_serialization() {
        let trade = Trade::Buy(BuyTrade {
            kind: "createengineers:buy_item".into(),
            buy: ItemStack::emeralds(5),
            reward: ItemStack::new("iron_ingot", 3),
            max_uses: 12,
            villager_experience: 4,
        });

        let value = serde_json::to_value(&trade).unwrap();
        assert_eq!(
            value,
            json!({
                "type": "createengineers:buy_item",
                "buy": {"item": "emerald", "count": 5},
                "reward": {"item": "iron_ingot", "count": 3},
                "max_uses": 12,
                "villager_experience": 4
            })
        );
    }

    #[test]
    fn test_untagged_trade_roundtrip() {
        let process = json!({
            "type": "delightfulchefs:process_item",
            "sell": {"item": "emerald", "count": 2},
            "priceIn": {"item": "milk_bucket", "count": 1},
            "convertible": {"item": "dead_tube_coral", "count": 1},
            "max_uses": 8,
            "villager_experience": 3
        });
        let trade: Trade = serde_json::from_value(process).unwrap();
        assert!(matches!(trade, Trade::Process(_)));

        let sell = json!({
            "type": "delightfulchefs:sell_item",
            "sell": {"item": "emerald", "count": 2},
            "priceIn": {"item": "milk_bucket", "count": 1},
            "max_uses": 8,
            "villager_experience": 3
        });
        let trade: Trade = serde_json::from_value(sell).unwrap();
        assert!(matches!(trade, Trade::Sell(_)));
    }

    #[test]
    fn test_empty_tiers_serialize_as_arrays() {
        let key = ProfessionKey::new("createengineers", "Mason");
        let doc = ProfessionDocument::new(&key);
        let value = serde_json::to_value(&doc).unwrap();

        assert_eq!(value["profession"], "createengineers:Mason");
        for tier in Tier::ALL {
            assert_eq!(value["trades"][tier.as_str()], json!([]));
        }
    }

    #[test]
    fn test_tier_order_in_output() {
        let doc = ProfessionDocument::new(&ProfessionKey::new("p", "Farmer"));
        let json = serde_json::to_string(&doc).unwrap();
        let novice = json.find("novice").unwrap();
        let apprentice = json.find("apprentice").unwrap();
        let master = json.find("master").unwrap();
        assert!(novice < apprentice);
        assert!(apprentice < master);
    }
}
