//! The per-user game state document and its nested value types.
//!
//! `GameState` is the root aggregate: it is loaded once per session,
//! mutated exclusively through the transition functions in the operation
//! modules, and persisted as a whole document after every mutation.

use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, VecDeque};
use std::fmt;
use std::str::FromStr;

use crate::constants::{
    CROP_HEALTH_MAX, CROP_HEALTH_MIN, GROWING_LAST_DAY, PRICE_HISTORY_CAP, REPUTATION_MAX,
    REPUTATION_MIN, SCORE_MAX, SCORE_MIN, SOWING_LAST_DAY,
};

/// One of the three fixed 120-day growing seasons, cycling in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Season {
    #[default]
    Rabi,
    Kharif,
    Zaid,
}

impl Season {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Rabi => "rabi",
            Self::Kharif => "kharif",
            Self::Zaid => "zaid",
        }
    }

    /// Next season in the fixed round-robin order.
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::Rabi => Self::Kharif,
            Self::Kharif => Self::Zaid,
            Self::Zaid => Self::Rabi,
        }
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Season {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "rabi" => Ok(Self::Rabi),
            "kharif" => Ok(Self::Kharif),
            "zaid" => Ok(Self::Zaid),
            _ => Err(()),
        }
    }
}

/// Sub-phase of a season, always derivable from the day-within-season.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SeasonStage {
    #[default]
    Sowing,
    Growing,
    Harvest,
}

impl SeasonStage {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Sowing => "sowing",
            Self::Growing => "growing",
            Self::Harvest => "harvest",
        }
    }

    /// Stage for a given day-within-season. Days 1..=30 are sowing,
    /// 31..=90 growing, everything above harvest.
    #[must_use]
    pub const fn for_day(day: u32) -> Self {
        if day <= SOWING_LAST_DAY {
            Self::Sowing
        } else if day <= GROWING_LAST_DAY {
            Self::Growing
        } else {
            Self::Harvest
        }
    }
}

impl fmt::Display for SeasonStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Crops available in the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CropKind {
    #[default]
    Rice,
    Wheat,
    Vegetables,
    Cotton,
    Pulses,
    Other,
}

impl CropKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Rice => "rice",
            Self::Wheat => "wheat",
            Self::Vegetables => "vegetables",
            Self::Cotton => "cotton",
            Self::Pulses => "pulses",
            Self::Other => "other",
        }
    }

    pub const ALL: [Self; 6] = [
        Self::Rice,
        Self::Wheat,
        Self::Vegetables,
        Self::Cotton,
        Self::Pulses,
        Self::Other,
    ];
}

impl fmt::Display for CropKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CropKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "rice" => Ok(Self::Rice),
            "wheat" => Ok(Self::Wheat),
            "vegetables" => Ok(Self::Vegetables),
            "cotton" => Ok(Self::Cotton),
            "pulses" => Ok(Self::Pulses),
            "other" => Ok(Self::Other),
            _ => Err(()),
        }
    }
}

/// Where outstanding debt was borrowed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CreditSource {
    Bank,
    Moneylender,
    Cooperative,
}

impl CreditSource {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Bank => "bank",
            Self::Moneylender => "moneylender",
            Self::Cooperative => "cooperative",
        }
    }

    pub const ALL: [Self; 3] = [Self::Bank, Self::Moneylender, Self::Cooperative];
}

impl fmt::Display for CreditSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CreditSource {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "bank" => Ok(Self::Bank),
            "moneylender" => Ok(Self::Moneylender),
            "cooperative" => Ok(Self::Cooperative),
            _ => Err(()),
        }
    }
}

/// How a sale was settled. Digital settlement earns a small premium and
/// feeds the digital-adoption score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMode {
    #[default]
    Cash,
    Digital,
}

impl PaymentMode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Cash => "cash",
            Self::Digital => "digital",
        }
    }

    #[must_use]
    pub const fn is_digital(self) -> bool {
        matches!(self, Self::Digital)
    }
}

/// Categories of ledger expenses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpenseKind {
    Daily,
    Seeds,
    Fertilizer,
    Insurance,
    LoanRepayment,
}

impl ExpenseKind {
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Seeds => "seeds",
            Self::Fertilizer => "fertilizer",
            Self::Insurance => "insurance",
            Self::LoanRepayment => "loan_repayment",
        }
    }
}

/// Categories of ledger income.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IncomeKind {
    HarvestSale,
    Loan,
}

impl IncomeKind {
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::HarvestSale => "harvest_sale",
            Self::Loan => "loan",
        }
    }
}

/// One expense entry, scoped to the season it occurred in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpenseEntry {
    pub kind: ExpenseKind,
    pub amount: i64,
    pub day: u32,
    pub season_id: String,
}

/// One income entry, scoped to the season it occurred in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncomeEntry {
    pub kind: IncomeKind,
    pub amount: i64,
    pub day: u32,
    pub payment: PaymentMode,
    pub season_id: String,
}

/// Cash, savings, and outstanding debt for the player household.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wallet {
    /// Spending money in rupees. May dip below zero transiently (daily
    /// maintenance), but operations reject before debiting past zero.
    pub cash: i64,
    /// Independent savings pool; never auto-spent by the engine.
    pub savings: i64,
    /// Mirror of the cooperative savings balance for wallet display.
    #[serde(default)]
    pub coop_balance: i64,
    /// Outstanding principal, floored at zero.
    pub debt: i64,
    /// Present iff `debt > 0`.
    pub debt_source: Option<CreditSource>,
    /// Annual rate in percent of the active debt source; 0 when debt-free.
    pub interest_rate: f64,
}

impl Default for Wallet {
    fn default() -> Self {
        Self {
            cash: 10_000,
            savings: 5_000,
            coop_balance: 0,
            debt: 0,
            debt_source: None,
            interest_rate: 0.0,
        }
    }
}

/// The planted crop and its condition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Farm {
    pub crop: CropKind,
    /// Coarse growth index 0..=3 derived from `growth_percent`.
    pub crop_stage: u8,
    /// Clamped to `[0, 100]` on every adjustment.
    pub crop_health: f64,
    /// Clamped to `[0, 100]`; only advances during the growing stage.
    pub growth_percent: f64,
    /// Quintals expected at full health, scaled by fertilizer.
    pub expected_harvest: f64,
    pub insured: bool,
    #[serde(default)]
    pub insurance_cost: i64,
    #[serde(default)]
    pub insurance_coverage: f64,
}

impl Default for Farm {
    fn default() -> Self {
        Self {
            crop: CropKind::Rice,
            crop_stage: 0,
            crop_health: 100.0,
            growth_percent: 0.0,
            expected_harvest: 50.0,
            insured: false,
            insurance_cost: 0,
            insurance_coverage: 0.0,
        }
    }
}

impl Farm {
    pub(crate) fn adjust_health(&mut self, delta: f64) {
        self.crop_health = (self.crop_health + delta).clamp(CROP_HEALTH_MIN, CROP_HEALTH_MAX);
    }
}

/// A single point in the bounded price history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricePoint {
    pub day: u32,
    pub price: i64,
}

/// Market-facing state: current price, trend history, and produce on hand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Market {
    pub current_price: i64,
    /// Last 30 daily prices, oldest evicted first. Display-only.
    pub price_history: VecDeque<PricePoint>,
    /// Freshly harvested quintals, sold before stored stock.
    pub harvest_quantity: f64,
    /// Stored quintals, subject to daily spoilage.
    pub stored_quantity: f64,
    pub days_stored: u32,
    #[serde(default)]
    pub storage_cost: i64,
    /// Cumulative spoilage display value maintained by the day tick.
    #[serde(default)]
    pub spoilage_percent: f64,
}

impl Default for Market {
    fn default() -> Self {
        Self {
            current_price: 520,
            price_history: VecDeque::with_capacity(PRICE_HISTORY_CAP + 1),
            harvest_quantity: 0.0,
            stored_quantity: 0.0,
            days_stored: 0,
            storage_cost: 50,
            spoilage_percent: 0.0,
        }
    }
}

impl Market {
    /// Append a price point, evicting the oldest beyond the 30-entry cap.
    pub(crate) fn push_price(&mut self, day: u32, price: i64) {
        self.price_history.push_back(PricePoint { day, price });
        while self.price_history.len() > PRICE_HISTORY_CAP {
            self.price_history.pop_front();
        }
    }
}

/// An outstanding cooperative loan. At most one may be active at a time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActiveLoan {
    pub amount: i64,
    pub interest_rate: f64,
    pub days_remaining: u32,
    pub issued: SeasonStamp,
}

/// In-game point in time: season, day within it, and how many seasons
/// have completed. Used instead of wall-clock dates so replays are
/// deterministic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct SeasonStamp {
    pub season: Season,
    pub season_day: u32,
    pub seasons_played: u32,
}

/// A settled cooperative loan, kept for history display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanRecord {
    pub amount: i64,
    pub repaid_on_time: bool,
    pub settled: SeasonStamp,
}

/// Cooperative membership: pooled savings, standing, and loan records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cooperative {
    pub coop_id: String,
    /// Pooled savings in rupees; grows only through contributions.
    pub savings_balance: i64,
    #[serde(default)]
    pub weekly_contribution: i64,
    pub total_contributed: i64,
    /// Standing within the cooperative, clamped to `[1, 5]`.
    pub reputation: f64,
    pub active_loan: Option<ActiveLoan>,
    pub loan_history: Vec<LoanRecord>,
}

impl Default for Cooperative {
    fn default() -> Self {
        Self {
            coop_id: String::from("default_coop"),
            savings_balance: 0,
            weekly_contribution: 100,
            total_contributed: 0,
            reputation: 3.0,
            active_loan: None,
            loan_history: Vec::new(),
        }
    }
}

impl Cooperative {
    pub(crate) fn adjust_reputation(&mut self, delta: f64) {
        self.reputation = (self.reputation + delta).clamp(REPUTATION_MIN, REPUTATION_MAX);
    }
}

/// Bounded progress metrics surfaced in end-of-season feedback.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scores {
    pub resilience_score: f64,
    pub financial_literacy_score: f64,
    pub digital_adoption_score: f64,
    #[serde(default)]
    pub savings_buffer: f64,
}

impl Default for Scores {
    fn default() -> Self {
        Self {
            resilience_score: 50.0,
            financial_literacy_score: 30.0,
            digital_adoption_score: 20.0,
            savings_buffer: 0.0,
        }
    }
}

impl Scores {
    pub(crate) fn adjust_resilience(&mut self, delta: f64) {
        self.resilience_score = (self.resilience_score + delta).clamp(SCORE_MIN, SCORE_MAX);
    }

    pub(crate) fn adjust_literacy(&mut self, delta: f64) {
        self.financial_literacy_score =
            (self.financial_literacy_score + delta).clamp(SCORE_MIN, SCORE_MAX);
    }

    pub(crate) fn adjust_digital(&mut self, delta: f64) {
        self.digital_adoption_score =
            (self.digital_adoption_score + delta).clamp(SCORE_MIN, SCORE_MAX);
    }
}

/// The complete per-user game document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    pub current_season: Season,
    /// Day within the current season, 1..=120.
    pub season_day: u32,
    pub season_stage: SeasonStage,
    pub total_seasons_played: u32,
    pub wallet: Wallet,
    pub farm: Farm,
    pub market: Market,
    pub cooperative: Cooperative,
    pub expenses: Vec<ExpenseEntry>,
    pub income: Vec<IncomeEntry>,
    pub scores: Scores,
    pub achievements: BTreeSet<String>,
    /// Seed for the deterministic event stream.
    #[serde(default)]
    pub seed: u64,
    #[serde(skip)]
    pub rng: Option<ChaCha20Rng>,
}

impl Default for GameState {
    fn default() -> Self {
        Self {
            current_season: Season::Rabi,
            season_day: 1,
            season_stage: SeasonStage::Sowing,
            total_seasons_played: 0,
            wallet: Wallet::default(),
            farm: Farm::default(),
            market: Market::default(),
            cooperative: Cooperative::default(),
            expenses: Vec::new(),
            income: Vec::new(),
            scores: Scores::default(),
            achievements: BTreeSet::new(),
            seed: 0,
            rng: None,
        }
    }
}

impl GameState {
    /// Attach a deterministic RNG derived from `seed`.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self.rng = Some(ChaCha20Rng::seed_from_u64(seed));
        self
    }

    /// Restore the skipped RNG after deserialization.
    #[must_use]
    pub fn rehydrate(mut self) -> Self {
        self.rng = Some(ChaCha20Rng::seed_from_u64(self.seed));
        self
    }

    /// Season scope tag used to bucket ledger entries, e.g. `rabi_0`.
    #[must_use]
    pub fn season_id(&self) -> String {
        format!("{}_{}", self.current_season, self.total_seasons_played)
    }

    /// Current in-game timestamp.
    #[must_use]
    pub const fn stamp(&self) -> SeasonStamp {
        SeasonStamp {
            season: self.current_season,
            season_day: self.season_day,
            seasons_played: self.total_seasons_played,
        }
    }

    pub(crate) fn record_expense(&mut self, kind: ExpenseKind, amount: i64) {
        let entry = ExpenseEntry {
            kind,
            amount,
            day: self.season_day,
            season_id: self.season_id(),
        };
        self.expenses.push(entry);
    }

    pub(crate) fn record_income(&mut self, kind: IncomeKind, amount: i64, payment: PaymentMode) {
        let entry = IncomeEntry {
            kind,
            amount,
            day: self.season_day,
            payment,
            season_id: self.season_id(),
        };
        self.income.push(entry);
    }
}
