use serde::{Deserialize, Serialize};

/// Lifecycle state of a company. The backend is the only writer; the
/// dashboard branches its entire company view on this value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompanyState {
    WaitingFunds,
    Distributed,
}

impl CompanyState {
    pub fn is_distributed(self) -> bool {
        matches!(self, CompanyState::Distributed)
    }

    pub fn label(self) -> &'static str {
        match self {
            CompanyState::WaitingFunds => "Waiting for Funds",
            CompanyState::Distributed => "Distributed",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Company {
    pub id: String,
    pub name: String,
    pub symbol: String,
    pub total_supply: f64,
    pub total_valuation_usd: f64,
    pub liquidity_percent: f64,
    pub issuing_address: String,
    pub state: CompanyState,
}

/// Derived pricing figures, computed server-side from valuation and supply.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanyStats {
    pub price_per_token_usd: f64,
    pub market_cap_usd: f64,
    pub liquidity_usd: f64,
    pub liquidity_token_amount: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Stakeholder {
    pub wallet_address: String,
    pub required_rlusd: f64,
    pub has_paid: bool,
    pub has_trustline: bool,
    pub tokens_distributed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl Stakeholder {
    pub fn is_ready(&self) -> bool {
        self.has_paid && self.has_trustline
    }

    /// Status text in backend precedence order: distribution beats missing
    /// flags, missing both beats missing one.
    pub fn status_label(&self) -> &'static str {
        if self.tokens_distributed {
            "Completed"
        } else if !self.has_paid && !self.has_trustline {
            "Missing Payment & Trustline"
        } else if !self.has_paid {
            "Missing Payment"
        } else if !self.has_trustline {
            "Missing Trustline"
        } else {
            "Ready for Distribution"
        }
    }
}

/// On-chain holder snapshot, read-only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenHolder {
    pub wallet_address: String,
    pub balance: f64,
}

/// An issued-asset amount as the ledger reports it: the value arrives as a
/// decimal string.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetAmount {
    pub currency: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issuer: Option<String>,
    pub value: String,
}

impl AssetAmount {
    pub fn value_f64(&self) -> f64 {
        self.value.parse().unwrap_or(0.0)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuctionSlot {
    pub account: String,
    pub discounted_fee: u32,
    pub expiration: String,
    pub price: AssetAmount,
    pub time_interval: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoteSlot {
    pub account: String,
    pub trading_fee: u32,
    pub vote_weight: u32,
}

/// AMM pool object. Fee and weight fields are basis points.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmmPool {
    pub account: String,
    pub amount: AssetAmount,
    pub amount2: AssetAmount,
    pub trading_fee: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset_frozen: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset2_frozen: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auction_slot: Option<AuctionSlot>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lp_token: Option<AssetAmount>,
    #[serde(default)]
    pub vote_slots: Vec<VoteSlot>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmmInfo {
    pub amm: AmmPool,
    #[serde(default)]
    pub ledger_current_index: Option<u64>,
    #[serde(default)]
    pub validated: Option<bool>,
}

/// Aggregate payload behind `GET /companies/{id}/full_info`, consumed by
/// every company page. A company that has not yet created its pool has no
/// `amm_info`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanyFullInfo {
    pub company: Company,
    pub stats: CompanyStats,
    pub stakeholders: Vec<Stakeholder>,
    #[serde(default)]
    pub token_holders: Vec<TokenHolder>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amm_info: Option<AmmInfo>,
}

/// Marketplace listing card.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Opportunity {
    pub id: String,
    pub name: String,
    pub symbol: String,
    pub description: String,
    pub valuation: f64,
    pub token_supply: f64,
    pub liquidity_percent: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Investor {
    pub id: String,
    pub name: String,
    pub investor_type: String,
    #[serde(default)]
    pub preferred_industries: Vec<String>,
    #[serde(default)]
    pub preferred_stages: Vec<String>,
    #[serde(default)]
    pub preferred_locations: Vec<String>,
    pub min_investment_usd: f64,
    pub max_investment_usd: f64,
    #[serde(default)]
    pub profile_summary: String,
    #[serde(default)]
    pub preferred_founder_types: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MatchDetails {
    #[serde(default)]
    pub industry: String,
    #[serde(default)]
    pub sub_industries: Vec<String>,
    #[serde(default)]
    pub stage: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub valuation: String,
    #[serde(default)]
    pub revenue_stage: String,
    #[serde(default)]
    pub business_model: String,
    #[serde(default)]
    pub esg_focus: String,
    #[serde(default)]
    pub exit_strategy: String,
}

/// Server-scored pairing of an investor to a company.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Match {
    pub entity_id: String,
    pub name: String,
    pub score: f64,
    #[serde(default)]
    pub details: MatchDetails,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvestorsResponse {
    pub investors: Vec<Investor>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchesResponse {
    pub matches: Vec<Match>,
    #[serde(default)]
    pub count: Option<usize>,
}

// ---- request/receipt bodies ----

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShareholderInput {
    pub wallet_address: String,
    pub percent: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterCompany {
    pub name: String,
    pub symbol: String,
    pub total_supply: f64,
    pub total_valuation_usd: f64,
    pub liquidity_percent: f64,
    pub shareholders: Vec<ShareholderInput>,
}

impl RegisterCompany {
    /// Shareholder percents plus the liquidity allocation; registration is
    /// valid only when this lands on 100 within 0.01.
    pub fn total_percent(&self) -> f64 {
        self.shareholders.iter().map(|s| s.percent).sum::<f64>() + self.liquidity_percent
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterReceipt {
    pub message: String,
    pub company_id: String,
    pub issuing_address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TxResult {
    pub engine_result: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DistributionEntry {
    pub shareholder: String,
    pub tokens_sent: f64,
    pub tx_result: TxResult,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DistributeReceipt {
    pub message: String,
    #[serde(default)]
    pub distribution: Vec<DistributionEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amm_result: Option<TxResult>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckReceipt {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn company_state_round_trips_snake_case() {
        let s: CompanyState = serde_json::from_str("\"waiting_funds\"").unwrap();
        assert_eq!(s, CompanyState::WaitingFunds);
        assert_eq!(
            serde_json::to_string(&CompanyState::Distributed).unwrap(),
            "\"distributed\""
        );
    }

    #[test]
    fn stakeholder_status_precedence() {
        let mut sh = Stakeholder {
            wallet_address: "rDrr8Lh4hgPu8yqrJ7x7ZMW74HzJvKsNS7".into(),
            required_rlusd: 2_500_000.0,
            has_paid: false,
            has_trustline: false,
            tokens_distributed: false,
            status: None,
        };
        assert_eq!(sh.status_label(), "Missing Payment & Trustline");
        sh.has_paid = true;
        assert_eq!(sh.status_label(), "Missing Trustline");
        sh.has_trustline = true;
        assert_eq!(sh.status_label(), "Ready for Distribution");
        sh.tokens_distributed = true;
        assert_eq!(sh.status_label(), "Completed");
    }

    #[test]
    fn full_info_parses_without_amm() {
        let raw = serde_json::json!({
            "company": {
                "id": "1",
                "name": "TechVenture Inc.",
                "symbol": "TECH",
                "total_supply": 10_000_000.0,
                "total_valuation_usd": 12_500_000.0,
                "liquidity_percent": 15.0,
                "issuing_address": "rHb9CJAWyB4rj91VRWn96DkukG4bwdtyTh",
                "state": "waiting_funds"
            },
            "stats": {
                "price_per_token_usd": 1.25,
                "market_cap_usd": 12_500_000.0,
                "liquidity_usd": 1_875_000.0,
                "liquidity_token_amount": 1_500_000.0
            },
            "stakeholders": []
        });
        let info: CompanyFullInfo = serde_json::from_value(raw).unwrap();
        assert!(info.amm_info.is_none());
        assert!(info.token_holders.is_empty());
        assert!(!info.company.state.is_distributed());
    }

    #[test]
    fn register_total_percent_includes_liquidity() {
        let req = RegisterCompany {
            name: "MyCo".into(),
            symbol: "MYCO".into(),
            total_supply: 1_000_000.0,
            total_valuation_usd: 1_000_000.0,
            liquidity_percent: 10.0,
            shareholders: vec![
                ShareholderInput { wallet_address: "r".repeat(25), percent: 60.0 },
                ShareholderInput { wallet_address: "r".repeat(25), percent: 30.0 },
            ],
        };
        assert!((req.total_percent() - 100.0).abs() < 0.01);
    }
}
