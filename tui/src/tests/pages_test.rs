//! Per-page state machines and form validation.

use crate::app::LoadState;
use crate::pages::amm::AmmPage;
use crate::pages::company::{CompanyPage, CompanyTab};
use crate::pages::marketplace::MarketplacePage;
use crate::pages::matching::MatchingPage;
use crate::pages::register::RegisterPage;
use crate::pages::trade::TradePage;
use ledgerwatch_core::model::{
    AmmInfo, AmmPool, AssetAmount, Company, CompanyFullInfo, CompanyState, CompanyStats, Investor,
    Opportunity, Stakeholder,
};

fn stakeholder(paid: bool, trustline: bool) -> Stakeholder {
    Stakeholder {
        wallet_address: "rDrr8Lh4hgPu8yqrJ7x7ZMW74HzJvKsNS7".to_string(),
        required_rlusd: 2_500_000.0,
        has_paid: paid,
        has_trustline: trustline,
        tokens_distributed: false,
        status: None,
    }
}

fn full_info(state: CompanyState, stakeholders: Vec<Stakeholder>) -> CompanyFullInfo {
    CompanyFullInfo {
        company: Company {
            id: "1".to_string(),
            name: "TechVenture Inc.".to_string(),
            symbol: "TECH".to_string(),
            total_supply: 10_000_000.0,
            total_valuation_usd: 12_500_000.0,
            liquidity_percent: 15.0,
            issuing_address: "rHb9CJAWyB4rj91VRWn96DkukG4bwdtyTh".to_string(),
            state,
        },
        stats: CompanyStats {
            price_per_token_usd: 1.25,
            market_cap_usd: 12_500_000.0,
            liquidity_usd: 1_875_000.0,
            liquidity_token_amount: 1_500_000.0,
        },
        stakeholders,
        token_holders: vec![],
        amm_info: None,
    }
}

fn amm_info() -> AmmInfo {
    AmmInfo {
        amm: AmmPool {
            account: "rAmmPoolAccountXXXXXXXXXXXXXXXXXXX".to_string(),
            amount: AssetAmount {
                currency: "TECH".to_string(),
                issuer: Some("rHb9CJAWyB4rj91VRWn96DkukG4bwdtyTh".to_string()),
                value: "1500000".to_string(),
            },
            amount2: AssetAmount {
                currency: "524C555344000000000000000000000000000000".to_string(),
                issuer: Some("rMxCKbgjk7KcZRMzdZ5FoGHdJNSWzfhB2r".to_string()),
                value: "1875000".to_string(),
            },
            trading_fee: 500,
            asset_frozen: None,
            asset2_frozen: None,
            auction_slot: None,
            lp_token: None,
            vote_slots: vec![],
        },
        ledger_current_index: Some(1234),
        validated: Some(true),
    }
}

// ---- company page ----

#[test]
fn test_company_default_tab_follows_state() {
    let mut page = CompanyPage::default();
    page.open("1".to_string());
    page.apply_info(full_info(CompanyState::WaitingFunds, vec![stakeholder(true, true)]));
    assert_eq!(page.tab, CompanyTab::Stakeholders);

    page.apply_info(full_info(CompanyState::Distributed, vec![]));
    assert_eq!(page.tab, CompanyTab::Overview);
}

#[test]
fn test_company_tab_cycles() {
    let mut page = CompanyPage::default();
    assert_eq!(page.tab, CompanyTab::Stakeholders);
    page.next_tab();
    assert_eq!(page.tab, CompanyTab::Overview);
    page.next_tab();
    assert_eq!(page.tab, CompanyTab::Holdings);
    page.next_tab();
    assert_eq!(page.tab, CompanyTab::Stakeholders);
}

#[test]
fn test_distribute_requires_all_ready() {
    let mut page = CompanyPage::default();
    page.open("1".to_string());

    page.apply_info(full_info(
        CompanyState::WaitingFunds,
        vec![stakeholder(true, true), stakeholder(true, false)],
    ));
    assert!(!page.distribute_enabled());

    page.apply_info(full_info(
        CompanyState::WaitingFunds,
        vec![stakeholder(true, true), stakeholder(true, true)],
    ));
    assert!(page.distribute_enabled());
}

#[test]
fn test_distribute_disabled_without_stakeholders() {
    let mut page = CompanyPage::default();
    page.apply_info(full_info(CompanyState::WaitingFunds, vec![]));
    assert!(!page.distribute_enabled());
}

#[test]
fn test_distribute_disabled_while_in_flight_or_done() {
    let mut page = CompanyPage::default();
    page.apply_info(full_info(CompanyState::WaitingFunds, vec![stakeholder(true, true)]));
    page.distributing = true;
    assert!(!page.distribute_enabled());
    page.distributing = false;

    page.apply_info(full_info(CompanyState::Distributed, vec![stakeholder(true, true)]));
    assert!(!page.distribute_enabled());
}

#[test]
fn test_company_selection_clamps() {
    let mut page = CompanyPage::default();
    page.apply_info(full_info(
        CompanyState::WaitingFunds,
        vec![stakeholder(false, false), stakeholder(true, true)],
    ));
    page.move_selection(-5);
    assert_eq!(page.selected, 0);
    page.move_selection(10);
    assert_eq!(page.selected, 1);
}

// ---- trade page ----

#[test]
fn test_trade_unavailable_until_distributed() {
    let mut page = TradePage::default();
    page.open("1".to_string());
    page.apply_info(full_info(CompanyState::WaitingFunds, vec![stakeholder(true, true)]));
    assert!(page.snapshot.is_none());
    page.quantity = "100".to_string();
    let err = page.submit_order().unwrap_err();
    assert!(err.contains("not available"));
}

#[test]
fn test_trade_seeds_from_server_price() {
    let mut page = TradePage::default();
    page.open("2".to_string());
    page.apply_info(full_info(CompanyState::Distributed, vec![]));
    assert!(page.snapshot.is_some());
    assert_eq!(page.price, "1.25");
}

#[test]
fn test_trade_submit_validates_quantity() {
    let mut page = TradePage::default();
    page.open("2".to_string());
    page.apply_info(full_info(CompanyState::Distributed, vec![]));

    page.quantity = "abc".to_string();
    assert_eq!(page.submit_order(), Err("Enter a numeric quantity".to_string()));

    page.quantity = "0".to_string();
    assert!(page.submit_order().is_err());

    page.quantity = "250".to_string();
    let confirmation = page.submit_order().unwrap();
    assert!(confirmation.contains("TECH"));
    assert!(confirmation.contains("demo"));
    // Quantity resets for the next ticket.
    assert!(page.quantity.is_empty());
}

// ---- amm page ----

#[test]
fn test_amm_account_override_trims() {
    let mut page = AmmPage::default();
    assert_eq!(page.account_override(), None);
    page.account_input = "   ".to_string();
    assert_eq!(page.account_override(), None);
    page.account_input = " rJRi8WW24gt9X85PHAxfWNPCizMMhqUQwg ".to_string();
    assert_eq!(
        page.account_override().as_deref(),
        Some("rJRi8WW24gt9X85PHAxfWNPCizMMhqUQwg")
    );
}

#[test]
fn test_amm_absent_pool_reads_as_error() {
    let mut page = AmmPage::default();
    page.open("1".to_string(), None);
    page.apply_full_info(full_info(CompanyState::WaitingFunds, vec![]));
    assert!(page.info.error().unwrap().contains("No AMM pool"));
    assert_eq!(page.symbol.as_deref(), Some("TECH"));
}

#[test]
fn test_amm_present_pool_loads() {
    let mut page = AmmPage::default();
    page.open("2".to_string(), Some("TECH".to_string()));
    let mut info = full_info(CompanyState::Distributed, vec![]);
    info.amm_info = Some(amm_info());
    page.apply_full_info(info);
    assert!(page.info.as_loaded().is_some());
}

// ---- marketplace page ----

#[test]
fn test_marketplace_selection_and_id() {
    let mut page = MarketplacePage::default();
    assert_eq!(page.selected_id(), None);
    page.apply(vec![
        Opportunity {
            id: "1".to_string(),
            name: "TechVenture Inc.".to_string(),
            symbol: "TECH".to_string(),
            description: "AI".to_string(),
            valuation: 12_500_000.0,
            token_supply: 10_000_000.0,
            liquidity_percent: 15.0,
        },
        Opportunity {
            id: "2".to_string(),
            name: "GreenEnergy Corp.".to_string(),
            symbol: "GREEN".to_string(),
            description: "Solar".to_string(),
            valuation: 8_000_000.0,
            token_supply: 5_000_000.0,
            liquidity_percent: 20.0,
        },
    ]);
    page.move_selection(1);
    assert_eq!(page.selected_id().as_deref(), Some("2"));
    page.move_selection(5);
    assert_eq!(page.selected_id().as_deref(), Some("2"));
}

#[test]
fn test_marketplace_shrinking_list_clamps_selection() {
    let mut page = MarketplacePage::default();
    page.selected = 4;
    page.apply(vec![Opportunity {
        id: "1".to_string(),
        name: "Solo".to_string(),
        symbol: "SOLO".to_string(),
        description: String::new(),
        valuation: 1.0,
        token_supply: 1.0,
        liquidity_percent: 100.0,
    }]);
    assert_eq!(page.selected, 0);
}

// ---- matching page ----

fn investor(id: &str) -> Investor {
    Investor {
        id: id.to_string(),
        name: format!("Investor {id}"),
        investor_type: "VC".to_string(),
        preferred_industries: vec!["Technology".to_string()],
        preferred_stages: vec![],
        preferred_locations: vec![],
        min_investment_usd: 100_000.0,
        max_investment_usd: 5_000_000.0,
        profile_summary: String::new(),
        preferred_founder_types: vec![],
    }
}

#[test]
fn test_matching_selection_invalidates_matches() {
    let mut page = MatchingPage::default();
    page.apply_investors(vec![investor("inv-1"), investor("inv-2")]);
    page.matches = LoadState::Loaded(vec![]);

    page.move_selection(1);
    assert!(matches!(page.matches, LoadState::NotLoaded));
    assert_eq!(page.selected_investor_id().as_deref(), Some("inv-2"));

    // Clamped moves that land on the same investor keep the matches.
    page.matches = LoadState::Loaded(vec![]);
    page.move_selection(1);
    assert!(matches!(page.matches, LoadState::Loaded(_)));
}

// ---- register page ----

fn filled_form() -> RegisterPage {
    let mut page = RegisterPage::default();
    page.name = "MyStartup Inc.".to_string();
    page.symbol = "MYST".to_string();
    page.supply = "1000000".to_string();
    page.valuation = "5000000".to_string();
    page.liquidity = "10".to_string();
    page.shareholders[0].wallet = "rDrr8Lh4hgPu8yqrJ7x7ZMW74HzJvKsNS7".to_string();
    page.shareholders[0].percent = "90".to_string();
    page
}

#[test]
fn test_register_valid_form_passes() {
    let page = filled_form();
    let request = page.validate().unwrap();
    assert_eq!(request.symbol, "MYST");
    assert_eq!(request.shareholders.len(), 1);
    assert!((request.total_percent() - 100.0).abs() < 0.01);
}

#[test]
fn test_register_requires_name_and_symbol() {
    let mut page = filled_form();
    page.name.clear();
    assert!(page.validate().unwrap_err().contains("required"));
}

#[test]
fn test_register_symbol_length_limit() {
    let mut page = filled_form();
    page.symbol = "WAYTOOLONGSYM".to_string();
    assert!(page.validate().unwrap_err().contains("10 characters"));
}

#[test]
fn test_register_rejects_short_wallet() {
    let mut page = filled_form();
    page.shareholders[0].wallet = "rShort".to_string();
    assert!(page.validate().unwrap_err().contains("invalid"));
}

#[test]
fn test_register_rejects_bad_total() {
    let mut page = filled_form();
    page.shareholders[0].percent = "50".to_string();
    let err = page.validate().unwrap_err();
    assert!(err.contains("total 100"));
}

#[test]
fn test_register_skips_blank_rows() {
    let mut page = filled_form();
    page.add_shareholder();
    let request = page.validate().unwrap();
    assert_eq!(request.shareholders.len(), 1);
}

#[test]
fn test_register_symbol_uppercased() {
    let mut page = filled_form();
    page.symbol = "myst".to_string();
    assert_eq!(page.validate().unwrap().symbol, "MYST");
}

#[test]
fn test_register_focus_cycles_through_shareholders() {
    let mut page = RegisterPage::default();
    for _ in 0..7 {
        page.focus_next();
    }
    // 5 scalar fields + wallet + percent of the single row wraps to the top.
    assert_eq!(page.focus, crate::pages::register::Focus::Name);
    page.focus_prev();
    assert_eq!(page.focus, crate::pages::register::Focus::ShareholderPercent(0));
}

#[test]
fn test_register_keeps_at_least_one_row() {
    let mut page = RegisterPage::default();
    page.remove_shareholder();
    assert_eq!(page.shareholders.len(), 1);
    page.add_shareholder();
    assert_eq!(page.shareholders.len(), 2);
    page.remove_shareholder();
    assert_eq!(page.shareholders.len(), 1);
}

#[test]
fn test_register_live_total_tracks_edits() {
    let mut page = filled_form();
    assert!((page.total_percent() - 100.0).abs() < 0.01);
    page.shareholders[0].percent = "not a number".to_string();
    assert!((page.total_percent() - 10.0).abs() < 0.01);
}
