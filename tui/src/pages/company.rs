//! Company detail page.
//!
//! The whole layout branches on the company lifecycle state: while
//! `waiting_funds` the funding-status view leads (progress gauges,
//! stakeholder table, check/distribute actions); once `distributed` the
//! overview and token-holdings views lead.

use crate::app::LoadState;
use crate::widgets;
use ledgerwatch_core::format::{format_address, format_usd, group_thousands};
use ledgerwatch_core::funding::FundingSummary;
use ledgerwatch_core::model::{CompanyFullInfo, DistributeReceipt};
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Style, Stylize};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Gauge, Paragraph, Row, Table, Tabs};
use ratatui::Frame;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CompanyTab {
    #[default]
    Stakeholders,
    Overview,
    Holdings,
}

impl CompanyTab {
    fn next(self) -> Self {
        match self {
            CompanyTab::Stakeholders => CompanyTab::Overview,
            CompanyTab::Overview => CompanyTab::Holdings,
            CompanyTab::Holdings => CompanyTab::Stakeholders,
        }
    }

    fn index(self) -> usize {
        match self {
            CompanyTab::Stakeholders => 0,
            CompanyTab::Overview => 1,
            CompanyTab::Holdings => 2,
        }
    }
}

#[derive(Default)]
pub struct CompanyPage {
    pub company_id: String,
    pub info: LoadState<CompanyFullInfo>,
    pub tab: CompanyTab,
    pub selected: usize,
    pub checking: bool,
    pub distributing: bool,
    pub last_distribution: Option<DistributeReceipt>,
    generation: u64,
}

impl CompanyPage {
    pub fn open(&mut self, company_id: String) {
        if company_id != self.company_id {
            self.last_distribution = None;
            self.selected = 0;
        }
        self.company_id = company_id;
        self.info = LoadState::NotLoaded;
        self.tab = CompanyTab::Stakeholders;
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn bump(&mut self) -> u64 {
        self.generation += 1;
        self.generation
    }

    /// Default view follows the lifecycle: funding status while waiting,
    /// overview once distributed.
    pub fn apply_info(&mut self, info: CompanyFullInfo) {
        self.tab = if info.company.state.is_distributed() {
            CompanyTab::Overview
        } else {
            CompanyTab::Stakeholders
        };
        if self.selected >= info.stakeholders.len() {
            self.selected = info.stakeholders.len().saturating_sub(1);
        }
        self.info = LoadState::Loaded(info);
    }

    pub fn next_tab(&mut self) {
        self.tab = self.tab.next();
    }

    pub fn move_selection(&mut self, delta: i64) {
        let len = self.info.as_loaded().map_or(0, |i| i.stakeholders.len());
        if len == 0 {
            return;
        }
        let next = self.selected as i64 + delta;
        self.selected = next.clamp(0, len as i64 - 1) as usize;
    }

    /// The distribute action is offered only when every stakeholder in a
    /// non-empty list is paid and trustlined, and no attempt is in flight.
    pub fn distribute_enabled(&self) -> bool {
        if self.distributing {
            return false;
        }
        match self.info.as_loaded() {
            Some(info) => {
                !info.company.state.is_distributed()
                    && FundingSummary::from_stakeholders(&info.stakeholders).can_distribute()
            }
            None => false,
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let info = match &self.info {
            LoadState::Loaded(info) => info,
            LoadState::Loading | LoadState::NotLoaded => {
                return widgets::render_notice(frame, area, "Loading company data...");
            }
            LoadState::Error(_) => {
                return widgets::render_notice(
                    frame,
                    area,
                    "Company not found or failed to load data (esc: marketplace)",
                );
            }
        };

        if info.company.state.is_distributed() {
            self.render_distributed(frame, area, info);
        } else {
            self.render_waiting_funds(frame, area, info);
        }
    }

    fn header_line(&self, info: &CompanyFullInfo) -> Line<'static> {
        let company = &info.company;
        let state_color = if company.state.is_distributed() {
            Color::Green
        } else {
            Color::Yellow
        };
        Line::from(vec![
            Span::styled(company.name.clone(), Style::new().bold()),
            Span::raw("  "),
            Span::styled(format!("[{}]", company.symbol), Style::new().fg(Color::Cyan)),
            Span::raw("  "),
            Span::styled(company.state.label().to_string(), Style::new().fg(state_color)),
            Span::raw(if self.checking { "  checking..." } else { "" }),
        ])
    }

    fn render_waiting_funds(&self, frame: &mut Frame, area: Rect, info: &CompanyFullInfo) {
        let summary = FundingSummary::from_stakeholders(&info.stakeholders);
        let [header, gauges, actions, table] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(5),
            Constraint::Length(1),
            Constraint::Min(4),
        ])
        .areas(area);

        frame.render_widget(Paragraph::new(self.header_line(info)), header);

        let [paid, trustline, ready] = Layout::horizontal([
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
            Constraint::Ratio(1, 3),
        ])
        .areas(gauges);
        render_gauge(frame, paid, "Paid", summary.paid, summary.total, summary.paid_percent);
        render_gauge(
            frame,
            trustline,
            "Trustlines",
            summary.trustlined,
            summary.total,
            summary.trustline_percent,
        );
        render_gauge(frame, ready, "Ready", summary.ready, summary.total, summary.ready_percent);

        let distribute = if self.distributing {
            Span::styled("Distributing...", Style::new().fg(Color::Yellow))
        } else if self.distribute_enabled() {
            Span::styled("d: distribute tokens", Style::new().fg(Color::Green).bold())
        } else {
            Span::styled("distribute unavailable until all are ready", Style::new().dim())
        };
        frame.render_widget(
            Paragraph::new(Line::from(vec![
                Span::raw("c: check stakeholders   "),
                distribute,
                Span::raw("   p: pay selected"),
            ])),
            actions,
        );

        match &self.last_distribution {
            Some(receipt) => {
                let [table_area, receipt_area] =
                    Layout::vertical([Constraint::Min(4), Constraint::Length(6)]).areas(table);
                self.render_stakeholder_table(frame, table_area, info);
                render_distribution_receipt(frame, receipt_area, receipt);
            }
            None => self.render_stakeholder_table(frame, table, info),
        }
    }

    fn render_stakeholder_table(&self, frame: &mut Frame, area: Rect, info: &CompanyFullInfo) {
        let block = widgets::card("Stakeholder Status");
        let inner = block.inner(area);
        frame.render_widget(block, area);

        if info.stakeholders.is_empty() {
            return widgets::render_notice(frame, inner, "No stakeholders registered");
        }

        let rows = info.stakeholders.iter().enumerate().map(|(i, sh)| {
            let row = Row::new(vec![
                Line::from(format_address(&sh.wallet_address)),
                Line::from(format_usd(sh.required_rlusd)),
                Line::from(widgets::yes_no(sh.has_paid)),
                Line::from(widgets::yes_no(sh.has_trustline)),
                Line::from(widgets::stakeholder_badge(sh)),
            ]);
            if i == self.selected {
                row.style(Style::new().bg(Color::DarkGray))
            } else {
                row
            }
        });
        let table = Table::new(
            rows,
            [
                Constraint::Length(18),
                Constraint::Length(16),
                Constraint::Length(6),
                Constraint::Length(10),
                Constraint::Min(20),
            ],
        )
        .header(Row::new(vec!["Wallet", "Required RLUSD", "Paid", "Trustline", "Status"]).dim());
        frame.render_widget(table, inner);
    }

    fn render_distributed(&self, frame: &mut Frame, area: Rect, info: &CompanyFullInfo) {
        let [header, tabs_area, body] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(4),
        ])
        .areas(area);

        frame.render_widget(Paragraph::new(self.header_line(info)), header);
        let tabs = Tabs::new(vec!["Stakeholders", "Overview", "Token Holdings"])
            .select(self.tab.index())
            .highlight_style(Style::new().bold().fg(Color::Cyan));
        frame.render_widget(tabs, tabs_area);

        match self.tab {
            CompanyTab::Stakeholders => self.render_stakeholder_table(frame, body, info),
            CompanyTab::Overview => render_overview(frame, body, info),
            CompanyTab::Holdings => render_holdings(frame, body, info),
        }
    }
}

fn render_gauge(frame: &mut Frame, area: Rect, label: &str, count: usize, total: usize, percent: f64) {
    let block = widgets::card(&format!("{label} {count}/{total}"));
    let inner = block.inner(area);
    frame.render_widget(block, area);
    let gauge = Gauge::default()
        .ratio((percent / 100.0).clamp(0.0, 1.0))
        .label(format!("{percent:.0}%"))
        .gauge_style(Style::new().fg(Color::Cyan));
    frame.render_widget(gauge, inner);
}

fn render_distribution_receipt(frame: &mut Frame, area: Rect, receipt: &DistributeReceipt) {
    let block = widgets::card("Distribution Result");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut lines: Vec<Line> = receipt
        .distribution
        .iter()
        .map(|entry| {
            Line::from(vec![
                Span::raw(format_address(&entry.shareholder)),
                Span::raw("  "),
                Span::raw(group_thousands(entry.tokens_sent)),
                Span::raw(" tokens  "),
                Span::styled(
                    entry.tx_result.engine_result.clone(),
                    Style::new().fg(Color::Green),
                ),
            ])
        })
        .collect();
    if let Some(amm) = &receipt.amm_result {
        lines.push(Line::from(vec![
            Span::raw("AMM creation  "),
            Span::styled(amm.engine_result.clone(), Style::new().fg(Color::Green)),
        ]));
    }
    frame.render_widget(Paragraph::new(lines), inner);
}

fn render_overview(frame: &mut Frame, area: Rect, info: &CompanyFullInfo) {
    let block = widgets::card("Overview");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let company = &info.company;
    let stats = &info.stats;
    let lines = vec![
        Line::from(format!("Price per token   {}", format_usd(stats.price_per_token_usd))),
        Line::from(format!("Market cap        {}", format_usd(stats.market_cap_usd))),
        Line::from(format!(
            "Token supply      {} {}",
            group_thousands(company.total_supply),
            company.symbol
        )),
        Line::from(format!(
            "Pool liquidity    {} ({} {})",
            format_usd(stats.liquidity_usd),
            group_thousands(stats.liquidity_token_amount),
            company.symbol
        )),
        Line::from(format!("Issuing address   {}", company.issuing_address)),
        Line::from(""),
        Line::from("a: AMM pool details   t: trade").dim(),
    ];
    frame.render_widget(Paragraph::new(lines), inner);
}

fn render_holdings(frame: &mut Frame, area: Rect, info: &CompanyFullInfo) {
    let block = widgets::card("Token Holdings");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if info.token_holders.is_empty() {
        return widgets::render_notice(frame, inner, "No on-chain holdings yet");
    }

    let total: f64 = info.token_holders.iter().map(|h| h.balance).sum();
    let rows = info.token_holders.iter().map(|holder| {
        let share = if total > 0.0 {
            100.0 * holder.balance / total
        } else {
            0.0
        };
        let bar_width = (share / 100.0 * 24.0).round() as usize;
        Row::new(vec![
            Line::from(format_address(&holder.wallet_address)),
            Line::from(group_thousands(holder.balance)),
            Line::from(format!("{share:.1}%")),
            Line::from(Span::styled("█".repeat(bar_width), Style::new().fg(Color::Cyan))),
        ])
    });
    let table = Table::new(
        rows,
        [
            Constraint::Length(18),
            Constraint::Length(14),
            Constraint::Length(8),
            Constraint::Min(10),
        ],
    )
    .header(Row::new(vec!["Wallet", "Balance", "Share", ""]).dim());
    frame.render_widget(table, inner);
}
