//! In-memory marketplace state.
//!
//! Seeded with demo companies, investors, and matches so every dashboard
//! page has something to show. Check and distribute actually advance the
//! lifecycle (`waiting_funds` -> `distributed`) so the funding flow can be
//! exercised end to end against the mock.

use ledgerwatch_core::model::{
    AmmInfo, AmmPool, AssetAmount, AuctionSlot, CheckReceipt, Company, CompanyFullInfo,
    CompanyState, CompanyStats, DistributeReceipt, DistributionEntry, Investor, Match,
    MatchDetails, Opportunity, RegisterCompany, RegisterReceipt, Stakeholder, TokenHolder,
    TxResult, VoteSlot,
};

/// RLUSD as the ledger encodes it: a 160-bit hex currency code.
pub const RLUSD_HEX: &str = "524C555344000000000000000000000000000000";
pub const RLUSD_ISSUER: &str = "rMxCKbgQ6Jwmr9Cy1fjCoFmYV9ac3mAQhV";

const ISSUER_POOL: [&str; 4] = [
    "rHb9CJAWyB4rj91VRWn96DkukG4bwdtyTh",
    "rLNaPoKeeBjZe2qs6x52yVPZpZ8td4dc6w",
    "rPT1Sjq2YGrBMTttX4GZHjKu9dyfzbpAYe",
    "rKLpjpCoXgLQQYQyj13zgay73rsgmzNH13",
];

const STAKEHOLDER_WALLETS: [&str; 3] = [
    "rDrr8Lh4hgPu8yqrJ7x7ZMW74HzJvKsNS7",
    "rJRi8WW24gt9X85PHAxfWNPCizMMhqUQwg",
    "rLDYrujdKUfVx28T9vRDAbyJ7G2WVXKo4K",
];

/// A rejected request: HTTP status plus the message the client surfaces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection {
    pub status: u16,
    pub message: String,
}

impl Rejection {
    fn bad_request(message: &str) -> Self {
        Rejection {
            status: 400,
            message: message.to_string(),
        }
    }

    fn not_found(message: &str) -> Self {
        Rejection {
            status: 404,
            message: message.to_string(),
        }
    }
}

pub struct CompanyRecord {
    pub company: Company,
    pub description: String,
    pub stakeholders: Vec<Stakeholder>,
    /// Registration-time ownership percents, parallel to `stakeholders`.
    pub percents: Vec<f64>,
}

impl CompanyRecord {
    fn stats(&self) -> CompanyStats {
        let c = &self.company;
        let price = if c.total_supply > 0.0 {
            c.total_valuation_usd / c.total_supply
        } else {
            0.0
        };
        CompanyStats {
            price_per_token_usd: price,
            market_cap_usd: c.total_valuation_usd,
            liquidity_usd: c.total_valuation_usd * c.liquidity_percent / 100.0,
            liquidity_token_amount: c.total_supply * c.liquidity_percent / 100.0,
        }
    }

    fn token_holders(&self) -> Vec<TokenHolder> {
        if !self.company.state.is_distributed() {
            return Vec::new();
        }
        self.stakeholders
            .iter()
            .zip(&self.percents)
            .map(|(sh, percent)| TokenHolder {
                wallet_address: sh.wallet_address.clone(),
                balance: self.company.total_supply * percent / 100.0,
            })
            .collect()
    }

    fn amm_info(&self, viewer: Option<&str>) -> Option<AmmInfo> {
        if !self.company.state.is_distributed() {
            return None;
        }
        let c = &self.company;
        let stats = self.stats();
        let pool_account = format!("rP{}AMMPoolXXXXXXXXXXXXXXXXXXXXXXX", &c.symbol);
        let lp_value = (stats.liquidity_token_amount * stats.liquidity_usd).sqrt();
        let auction_account = viewer.unwrap_or(&c.issuing_address).to_string();
        Some(AmmInfo {
            amm: AmmPool {
                account: pool_account.clone(),
                amount: AssetAmount {
                    currency: c.symbol.clone(),
                    issuer: Some(c.issuing_address.clone()),
                    value: format!("{}", stats.liquidity_token_amount),
                },
                amount2: AssetAmount {
                    currency: RLUSD_HEX.to_string(),
                    issuer: Some(RLUSD_ISSUER.to_string()),
                    value: format!("{}", stats.liquidity_usd),
                },
                trading_fee: 500,
                asset_frozen: Some(false),
                asset2_frozen: Some(false),
                auction_slot: Some(AuctionSlot {
                    account: auction_account,
                    discounted_fee: 50,
                    expiration: "2026-09-15T00:00:00Z".to_string(),
                    price: AssetAmount {
                        currency: lp_currency_code(&c.symbol),
                        issuer: Some(pool_account.clone()),
                        value: "125".to_string(),
                    },
                    time_interval: 24,
                }),
                lp_token: Some(AssetAmount {
                    currency: lp_currency_code(&c.symbol),
                    issuer: Some(pool_account),
                    value: format!("{lp_value:.0}"),
                }),
                vote_slots: vec![
                    VoteSlot {
                        account: c.issuing_address.clone(),
                        trading_fee: 500,
                        vote_weight: 7_500,
                    },
                    VoteSlot {
                        account: STAKEHOLDER_WALLETS[0].to_string(),
                        trading_fee: 450,
                        vote_weight: 2_500,
                    },
                ],
            },
            ledger_current_index: Some(93_412_870),
            validated: Some(true),
        })
    }
}

/// 40-hex LP token code in the ledger's 0x03 namespace, padded from the
/// company symbol.
fn lp_currency_code(symbol: &str) -> String {
    let mut code = String::from("03");
    for byte in symbol.bytes().take(19) {
        code.push_str(&format!("{byte:02X}"));
    }
    while code.len() < 40 {
        code.push('0');
    }
    code
}

pub struct MockState {
    pub companies: Vec<CompanyRecord>,
    pub investors: Vec<Investor>,
    next_id: u32,
}

impl MockState {
    pub fn seed() -> Self {
        let mut state = MockState {
            companies: Vec::new(),
            investors: seed_investors(),
            next_id: 7,
        };

        // The canonical waiting_funds demo: paid+trustlined, paid only,
        // neither.
        state.companies.push(seed_company(
            "1",
            "TechVenture Inc.",
            "TECH",
            "Next-generation AI solutions for enterprise customers",
            10_000_000.0,
            12_500_000.0,
            15.0,
            CompanyState::WaitingFunds,
            &[(20.0, true, true), (30.0, true, false), (35.0, false, false)],
        ));
        state.companies.push(seed_company(
            "2",
            "GreenEnergy Solutions",
            "GREEN",
            "Sustainable energy technology and carbon offset marketplace",
            5_000_000.0,
            8_750_000.0,
            20.0,
            CompanyState::Distributed,
            &[(45.0, true, true), (35.0, true, true)],
        ));
        state.companies.push(seed_company(
            "3",
            "HealthTech Innovations",
            "HLTH",
            "Revolutionary healthcare data management and analytics",
            7_500_000.0,
            15_000_000.0,
            12.0,
            CompanyState::WaitingFunds,
            &[(50.0, true, true), (38.0, false, true)],
        ));
        state.companies.push(seed_company(
            "4",
            "FinBlock Solutions",
            "FBS",
            "Decentralized financial infrastructure for global markets",
            12_000_000.0,
            20_000_000.0,
            18.0,
            CompanyState::Distributed,
            &[(40.0, true, true), (25.0, true, true), (17.0, true, true)],
        ));
        state.companies.push(seed_company(
            "5",
            "LogisticChain",
            "LOGX",
            "Blockchain-based supply chain management and tracking",
            8_000_000.0,
            6_500_000.0,
            25.0,
            CompanyState::Distributed,
            &[(45.0, true, true), (30.0, true, true)],
        ));
        // Fully ready but not yet distributed, so the distribute action has
        // a live target out of the box.
        state.companies.push(seed_company(
            "6",
            "MetaVerse Realms",
            "MVR",
            "Virtual reality experiences and digital asset marketplace",
            20_000_000.0,
            18_000_000.0,
            22.0,
            CompanyState::WaitingFunds,
            &[(48.0, true, true), (30.0, true, true)],
        ));
        state
    }

    fn record(&self, id: &str) -> Option<&CompanyRecord> {
        self.companies.iter().find(|r| r.company.id == id)
    }

    fn record_mut(&mut self, id: &str) -> Option<&mut CompanyRecord> {
        self.companies.iter_mut().find(|r| r.company.id == id)
    }

    pub fn opportunities(&self) -> Vec<Opportunity> {
        self.companies
            .iter()
            .map(|r| Opportunity {
                id: r.company.id.clone(),
                name: r.company.name.clone(),
                symbol: r.company.symbol.clone(),
                description: r.description.clone(),
                valuation: r.company.total_valuation_usd,
                token_supply: r.company.total_supply,
                liquidity_percent: r.company.liquidity_percent,
            })
            .collect()
    }

    pub fn full_info(&self, id: &str) -> Result<CompanyFullInfo, Rejection> {
        let record = self
            .record(id)
            .ok_or_else(|| Rejection::not_found("Company not found."))?;
        Ok(CompanyFullInfo {
            company: record.company.clone(),
            stats: record.stats(),
            stakeholders: record.stakeholders.clone(),
            token_holders: record.token_holders(),
            amm_info: record.amm_info(None),
        })
    }

    pub fn amm_info(&self, id: &str, account: Option<&str>) -> Result<AmmInfo, Rejection> {
        let record = self
            .record(id)
            .ok_or_else(|| Rejection::not_found("Company not found."))?;
        record
            .amm_info(account)
            .ok_or_else(|| Rejection::not_found("AMM not available for this company."))
    }

    pub fn register(&mut self, request: &RegisterCompany) -> Result<RegisterReceipt, Rejection> {
        if request.name.trim().is_empty()
            || request.symbol.trim().is_empty()
            || request.total_supply <= 0.0
            || request.total_valuation_usd <= 0.0
            || request.liquidity_percent <= 0.0
        {
            return Err(Rejection::bad_request("Missing required fields"));
        }
        if request.shareholders.is_empty() {
            return Err(Rejection::bad_request("At least one shareholder is required"));
        }
        if request
            .shareholders
            .iter()
            .any(|s| s.wallet_address.len() < 20)
        {
            return Err(Rejection::bad_request(
                "Enter a valid wallet address for every shareholder",
            ));
        }
        if request.shareholders.iter().any(|s| s.percent <= 0.0) {
            return Err(Rejection::bad_request(
                "Every shareholder percentage must be positive",
            ));
        }
        if (request.total_percent() - 100.0).abs() > 0.01 {
            return Err(Rejection::bad_request(
                "Total percentage (shareholders + liquidity) must equal 100%",
            ));
        }

        let id = format!("co-{:04}", self.next_id);
        let issuing_address = ISSUER_POOL[self.next_id as usize % ISSUER_POOL.len()].to_string();
        self.next_id += 1;

        let stakeholders = request
            .shareholders
            .iter()
            .map(|s| Stakeholder {
                wallet_address: s.wallet_address.clone(),
                required_rlusd: request.total_valuation_usd * s.percent / 100.0,
                has_paid: false,
                has_trustline: false,
                tokens_distributed: false,
                status: None,
            })
            .collect();

        self.companies.push(CompanyRecord {
            company: Company {
                id: id.clone(),
                name: request.name.clone(),
                symbol: request.symbol.clone(),
                total_supply: request.total_supply,
                total_valuation_usd: request.total_valuation_usd,
                liquidity_percent: request.liquidity_percent,
                issuing_address: issuing_address.clone(),
                state: CompanyState::WaitingFunds,
            },
            description: String::new(),
            stakeholders,
            percents: request.shareholders.iter().map(|s| s.percent).collect(),
        });

        Ok(RegisterReceipt {
            message: "Company created successfully!".to_string(),
            company_id: id,
            issuing_address,
            note: Some(
                "Shareholders must now send their required RLUSD to this address".to_string(),
            ),
        })
    }

    /// Re-check payment/trustline state. The mock advances one missing flag
    /// per call so repeated checks show progress.
    pub fn check_stakeholders(&mut self, id: &str) -> Result<CheckReceipt, Rejection> {
        let record = self
            .record_mut(id)
            .ok_or_else(|| Rejection::not_found("Company not found."))?;

        if let Some(sh) = record.stakeholders.iter_mut().find(|s| !s.has_paid) {
            let wallet = sh.wallet_address.clone();
            sh.has_paid = true;
            return Ok(CheckReceipt {
                message: format!("Payment confirmed for {wallet}."),
            });
        }
        if let Some(sh) = record.stakeholders.iter_mut().find(|s| !s.has_trustline) {
            let wallet = sh.wallet_address.clone();
            sh.has_trustline = true;
            return Ok(CheckReceipt {
                message: format!("Trustline confirmed for {wallet}."),
            });
        }
        Ok(CheckReceipt {
            message: "All stakeholders are ready.".to_string(),
        })
    }

    pub fn check_and_distribute(&mut self, id: &str) -> Result<DistributeReceipt, Rejection> {
        let record = self
            .record_mut(id)
            .ok_or_else(|| Rejection::not_found("Company not found."))?;

        if record.company.state.is_distributed() {
            return Err(Rejection::bad_request("Tokens were already distributed."));
        }
        if record.stakeholders.is_empty()
            || !record.stakeholders.iter().all(Stakeholder::is_ready)
        {
            return Err(Rejection::bad_request(
                "Not all stakeholders have paid and established trustlines.",
            ));
        }

        let supply = record.company.total_supply;
        let distribution = record
            .stakeholders
            .iter_mut()
            .zip(&record.percents)
            .map(|(sh, percent)| {
                sh.tokens_distributed = true;
                DistributionEntry {
                    shareholder: sh.wallet_address.clone(),
                    tokens_sent: supply * percent / 100.0,
                    tx_result: TxResult {
                        engine_result: "tesSUCCESS".to_string(),
                    },
                }
            })
            .collect();
        record.company.state = CompanyState::Distributed;

        Ok(DistributeReceipt {
            message: "All shareholders paid & trustlined. Tokens distributed + AMM created!"
                .to_string(),
            distribution,
            amm_result: Some(TxResult {
                engine_result: "tesSUCCESS".to_string(),
            }),
        })
    }

    pub fn investors(&self) -> Vec<Investor> {
        self.investors.clone()
    }

    pub fn investor_matches(&self, investor_id: &str) -> Result<Vec<Match>, Rejection> {
        let position = self
            .investors
            .iter()
            .position(|i| i.id == investor_id)
            .ok_or_else(|| Rejection::not_found("Investor not found."))?;

        // Deterministic per-investor scoring over the seeded companies.
        let scores = [78.5, 62.0, 51.5, 44.0];
        let matches = self
            .companies
            .iter()
            .enumerate()
            .take(scores.len())
            .map(|(i, record)| {
                let score = scores[(i + position) % scores.len()];
                Match {
                    entity_id: record.company.id.clone(),
                    name: record.company.name.clone(),
                    score,
                    details: MatchDetails {
                        industry: industry_for(&record.company.symbol).to_string(),
                        sub_industries: vec!["B2B SaaS".to_string()],
                        stage: "Series A".to_string(),
                        location: "Remote".to_string(),
                        valuation: format!("${:.0}", record.company.total_valuation_usd),
                        revenue_stage: "Early revenue".to_string(),
                        business_model: "Subscription".to_string(),
                        esg_focus: "None".to_string(),
                        exit_strategy: "Acquisition".to_string(),
                    },
                }
            })
            .collect();
        Ok(matches)
    }
}

fn industry_for(symbol: &str) -> &'static str {
    match symbol {
        "TECH" => "Enterprise AI",
        "GREEN" => "Clean Energy",
        "HLTH" => "Healthcare",
        "FBS" => "Fintech",
        "LOGX" => "Logistics",
        _ => "Consumer Tech",
    }
}

#[allow(clippy::too_many_arguments)]
fn seed_company(
    id: &str,
    name: &str,
    symbol: &str,
    description: &str,
    total_supply: f64,
    total_valuation_usd: f64,
    liquidity_percent: f64,
    state: CompanyState,
    holders: &[(f64, bool, bool)],
) -> CompanyRecord {
    let issuing_address = ISSUER_POOL[id.as_bytes()[0] as usize % ISSUER_POOL.len()].to_string();
    let distributed = state.is_distributed();
    let stakeholders = holders
        .iter()
        .enumerate()
        .map(|(i, (percent, paid, trustline))| Stakeholder {
            wallet_address: STAKEHOLDER_WALLETS[i % STAKEHOLDER_WALLETS.len()].to_string(),
            required_rlusd: total_valuation_usd * percent / 100.0,
            has_paid: *paid || distributed,
            has_trustline: *trustline || distributed,
            tokens_distributed: distributed,
            status: None,
        })
        .collect();
    CompanyRecord {
        company: Company {
            id: id.to_string(),
            name: name.to_string(),
            symbol: symbol.to_string(),
            total_supply,
            total_valuation_usd,
            liquidity_percent,
            issuing_address,
            state,
        },
        description: description.to_string(),
        stakeholders,
        percents: holders.iter().map(|(p, _, _)| *p).collect(),
    }
}

fn seed_investors() -> Vec<Investor> {
    vec![
        Investor {
            id: "inv-1".to_string(),
            name: "Meridian Growth Partners".to_string(),
            investor_type: "Venture Capital".to_string(),
            preferred_industries: vec!["Enterprise AI".into(), "Fintech".into()],
            preferred_stages: vec!["Seed".into(), "Series A".into()],
            preferred_locations: vec!["North America".into(), "Remote".into()],
            min_investment_usd: 250_000.0,
            max_investment_usd: 5_000_000.0,
            profile_summary: "Thesis-driven fund backing infrastructure for tokenized markets."
                .to_string(),
            preferred_founder_types: vec!["Technical".into(), "Repeat".into()],
        },
        Investor {
            id: "inv-2".to_string(),
            name: "Atlas Angel Syndicate".to_string(),
            investor_type: "Angel Syndicate".to_string(),
            preferred_industries: vec!["Clean Energy".into(), "Logistics".into()],
            preferred_stages: vec!["Pre-seed".into(), "Seed".into()],
            preferred_locations: vec!["Europe".into()],
            min_investment_usd: 25_000.0,
            max_investment_usd: 500_000.0,
            profile_summary: "Operator angels writing first checks into climate and supply chain."
                .to_string(),
            preferred_founder_types: vec!["Domain expert".into()],
        },
        Investor {
            id: "inv-3".to_string(),
            name: "Horizon Impact Fund".to_string(),
            investor_type: "Impact Fund".to_string(),
            preferred_industries: vec!["Healthcare".into(), "Clean Energy".into()],
            preferred_stages: vec!["Series A".into(), "Series B".into()],
            preferred_locations: vec!["Global".into()],
            min_investment_usd: 1_000_000.0,
            max_investment_usd: 10_000_000.0,
            profile_summary: "ESG-screened growth capital with measurable-impact mandates."
                .to_string(),
            preferred_founder_types: vec!["Mission-driven".into()],
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use ledgerwatch_core::model::ShareholderInput;

    fn valid_request() -> RegisterCompany {
        RegisterCompany {
            name: "MyCo".into(),
            symbol: "MYCO".into(),
            total_supply: 1_000_000.0,
            total_valuation_usd: 2_000_000.0,
            liquidity_percent: 10.0,
            shareholders: vec![
                ShareholderInput {
                    wallet_address: "rDrr8Lh4hgPu8yqrJ7x7ZMW74HzJvKsNS7".into(),
                    percent: 60.0,
                },
                ShareholderInput {
                    wallet_address: "rJRi8WW24gt9X85PHAxfWNPCizMMhqUQwg".into(),
                    percent: 30.0,
                },
            ],
        }
    }

    #[test]
    fn register_rejects_bad_totals() {
        let mut state = MockState::seed();
        let mut request = valid_request();
        request.liquidity_percent = 25.0; // 60 + 30 + 25 != 100
        let err = state.register(&request).unwrap_err();
        assert_eq!(err.status, 400);
        assert!(err.message.contains("must equal 100%"));
    }

    #[test]
    fn register_rejects_empty_shareholders_and_bad_wallets() {
        let mut state = MockState::seed();
        let mut request = valid_request();
        request.shareholders.clear();
        assert_eq!(state.register(&request).unwrap_err().status, 400);

        let mut request = valid_request();
        request.shareholders[0].wallet_address = "tooshort".into();
        let err = state.register(&request).unwrap_err();
        assert!(err.message.contains("wallet address"));
    }

    #[test]
    fn register_creates_waiting_funds_company() {
        let mut state = MockState::seed();
        let receipt = state.register(&valid_request()).unwrap();
        let info = state.full_info(&receipt.company_id).unwrap();
        assert_eq!(info.company.state, CompanyState::WaitingFunds);
        assert_eq!(info.stakeholders.len(), 2);
        // required_rlusd follows the ownership percent of the valuation.
        assert_eq!(info.stakeholders[0].required_rlusd, 1_200_000.0);
        assert!(info.token_holders.is_empty());
        assert!(info.amm_info.is_none());
    }

    #[test]
    fn distribute_rejected_until_all_ready_then_transitions() {
        let mut state = MockState::seed();
        let err = state.check_and_distribute("1").unwrap_err();
        assert_eq!(err.status, 400);
        assert!(err.message.contains("Not all stakeholders"));

        // TECH has one unpaid, two missing trustlines; three checks flip
        // them all.
        for _ in 0..3 {
            state.check_stakeholders("1").unwrap();
        }
        let receipt = state.check_and_distribute("1").unwrap();
        assert_eq!(receipt.distribution.len(), 3);
        assert!(receipt
            .distribution
            .iter()
            .all(|d| d.tx_result.engine_result == "tesSUCCESS"));

        let info = state.full_info("1").unwrap();
        assert!(info.company.state.is_distributed());
        assert_eq!(info.token_holders.len(), 3);
        assert!(info.amm_info.is_some());

        // A second attempt is rejected.
        assert_eq!(state.check_and_distribute("1").unwrap_err().status, 400);
    }

    #[test]
    fn check_reports_ready_when_nothing_missing() {
        let mut state = MockState::seed();
        // Company 6 is seeded fully ready.
        let receipt = state.check_stakeholders("6").unwrap();
        assert_eq!(receipt.message, "All stakeholders are ready.");
    }

    #[test]
    fn amm_info_unavailable_before_distribution() {
        let state = MockState::seed();
        let err = state.amm_info("1", None).unwrap_err();
        assert_eq!(err.status, 404);
        assert!(err.message.contains("not available"));
    }

    #[test]
    fn amm_info_echoes_viewer_account() {
        let state = MockState::seed();
        let info = state.amm_info("2", Some("rViewerAccountXXXXXXXXXXXXXXX")).unwrap();
        let slot = info.amm.auction_slot.unwrap();
        assert_eq!(slot.account, "rViewerAccountXXXXXXXXXXXXXXX");
        assert_eq!(info.amm.amount2.currency, RLUSD_HEX);
    }

    #[test]
    fn unknown_ids_are_not_found() {
        let mut state = MockState::seed();
        assert_eq!(state.full_info("nope").unwrap_err().status, 404);
        assert_eq!(state.check_stakeholders("nope").unwrap_err().status, 404);
        assert_eq!(state.investor_matches("nope").unwrap_err().status, 404);
    }

    #[test]
    fn matches_cover_score_tiers() {
        let state = MockState::seed();
        let matches = state.investor_matches("inv-1").unwrap();
        assert!(!matches.is_empty());
        assert!(matches.iter().any(|m| m.score >= 70.0));
        assert!(matches.iter().any(|m| m.score < 55.0));
    }
}
