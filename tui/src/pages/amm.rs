//! AMM pool inspector.
//!
//! Shows the raw pool object for a company's token/RLUSD pair: composition,
//! trading fee, auction slot, LP token and fee votes. A viewer account can
//! be entered to see the auction-slot pricing from that account's side.

use crate::app::LoadState;
use crate::widgets;
use ledgerwatch_core::format::{bps_to_percent, format_address, format_currency_code, group_thousands};
use ledgerwatch_core::model::{AmmInfo, AssetAmount, CompanyFullInfo};
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Style, Stylize};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Row, Table};
use ratatui::Frame;

#[derive(Default)]
pub struct AmmPage {
    pub company_id: String,
    pub symbol: Option<String>,
    pub info: LoadState<AmmInfo>,
    pub account_input: String,
    pub editing: bool,
    generation: u64,
}

impl AmmPage {
    pub fn open(&mut self, company_id: String, symbol: Option<String>) {
        if company_id != self.company_id {
            self.account_input.clear();
        }
        self.company_id = company_id;
        self.symbol = symbol;
        self.info = LoadState::NotLoaded;
        self.editing = false;
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn bump(&mut self) -> u64 {
        self.generation += 1;
        self.generation
    }

    /// A whitespace-only input means no override.
    pub fn account_override(&self) -> Option<String> {
        let trimmed = self.account_input.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }

    pub fn apply_full_info(&mut self, info: CompanyFullInfo) {
        self.symbol = Some(info.company.symbol);
        self.info = match info.amm_info {
            Some(amm) => LoadState::Loaded(amm),
            None => LoadState::Error(
                "No AMM pool exists for this company yet. Pools are created at distribution."
                    .to_string(),
            ),
        };
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let [header, body] =
            Layout::vertical([Constraint::Length(1), Constraint::Min(4)]).areas(area);
        self.render_header(frame, header);

        let info = match &self.info {
            LoadState::Loaded(info) => info,
            LoadState::Loading | LoadState::NotLoaded => {
                return widgets::render_notice(frame, body, "Loading AMM information...");
            }
            LoadState::Error(message) => {
                return widgets::render_notice(frame, body, message);
            }
        };

        let [top, votes] =
            Layout::vertical([Constraint::Length(9), Constraint::Min(4)]).areas(body);
        let [composition, slot] =
            Layout::horizontal([Constraint::Ratio(1, 2), Constraint::Ratio(1, 2)]).areas(top);
        render_composition(frame, composition, info);
        render_auction_slot(frame, slot, info);
        render_vote_slots(frame, votes, info);
    }

    fn render_header(&self, frame: &mut Frame, area: Rect) {
        let pair = match &self.symbol {
            Some(symbol) => format!("{symbol}/RLUSD"),
            None => "AMM".to_string(),
        };
        let viewer = if self.editing {
            Span::styled(
                format!("view as: {}_", self.account_input),
                Style::new().fg(Color::Yellow),
            )
        } else {
            match self.account_override() {
                Some(account) => Span::styled(
                    format!("viewing as {}", format_address(&account)),
                    Style::new().fg(Color::Cyan),
                ),
                None => Span::raw("").dim(),
            }
        };
        frame.render_widget(
            Paragraph::new(Line::from(vec![
                Span::styled(format!("AMM Pool  {pair}"), Style::new().bold()),
                Span::raw("  "),
                viewer,
            ])),
            area,
        );
    }
}

fn asset_line(label: &str, amount: &AssetAmount) -> Line<'static> {
    Line::from(vec![
        Span::raw(format!("{label:<10}")),
        Span::styled(
            group_thousands(amount.value_f64()),
            Style::new().fg(Color::Cyan),
        ),
        Span::raw(" "),
        Span::raw(format_currency_code(&amount.currency)),
    ])
}

fn render_composition(frame: &mut Frame, area: Rect, info: &AmmInfo) {
    let block = widgets::card("Pool Composition");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let pool = &info.amm;
    let mut lines = vec![
        asset_line("Asset", &pool.amount),
        asset_line("Asset 2", &pool.amount2),
        Line::from(format!(
            "Trading fee  {:.3}%",
            bps_to_percent(pool.trading_fee)
        )),
        Line::from(format!("Pool account {}", format_address(&pool.account))),
    ];
    if let Some(lp) = &pool.lp_token {
        lines.push(Line::from(format!(
            "LP token     {} {}",
            group_thousands(lp.value_f64()),
            format_currency_code(&lp.currency)
        )));
    }
    if pool.asset_frozen == Some(true) || pool.asset2_frozen == Some(true) {
        lines.push(Line::from(Span::styled(
            "One or both assets are frozen",
            Style::new().fg(Color::Red),
        )));
    }
    if let Some(ledger) = info.ledger_current_index {
        lines.push(Line::from(format!("Ledger       {ledger}")).dim());
    }
    frame.render_widget(Paragraph::new(lines), inner);
}

fn render_auction_slot(frame: &mut Frame, area: Rect, info: &AmmInfo) {
    let block = widgets::card("Auction Slot");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let Some(slot) = &info.amm.auction_slot else {
        return widgets::render_notice(frame, inner, "No active auction slot");
    };
    let lines = vec![
        Line::from(format!("Holder       {}", format_address(&slot.account))),
        Line::from(format!(
            "Discounted   {:.3}%",
            bps_to_percent(slot.discounted_fee)
        )),
        Line::from(format!(
            "Slot price   {} {}",
            slot.price.value,
            format_currency_code(&slot.price.currency)
        )),
        Line::from(format!("Expires      {}", slot.expiration)),
        Line::from(format!("Interval     {}", slot.time_interval)),
    ];
    frame.render_widget(Paragraph::new(lines), inner);
}

fn render_vote_slots(frame: &mut Frame, area: Rect, info: &AmmInfo) {
    let block = widgets::card("Fee Votes");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if info.amm.vote_slots.is_empty() {
        return widgets::render_notice(frame, inner, "No fee votes recorded");
    }
    let rows = info.amm.vote_slots.iter().map(|slot| {
        Row::new(vec![
            Line::from(format_address(&slot.account)),
            Line::from(format!("{:.3}%", bps_to_percent(slot.trading_fee))),
            Line::from(format!("{:.2}%", bps_to_percent(slot.vote_weight))),
        ])
    });
    let table = Table::new(
        rows,
        [
            Constraint::Length(18),
            Constraint::Length(12),
            Constraint::Length(12),
        ],
    )
    .header(Row::new(vec!["Voter", "Proposed Fee", "Weight"]).dim());
    frame.render_widget(table, inner);
}
