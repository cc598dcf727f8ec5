//! Demo trading view for a distributed company.
//!
//! Price history, order book and recent trades are synthesized locally from
//! the server-side price; the order ticket validates and confirms but places
//! nothing.

use crate::app::LoadState;
use crate::market::{self, MarketSnapshot};
use crate::widgets;
use ledgerwatch_core::format::format_usd;
use ledgerwatch_core::model::CompanyFullInfo;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Style, Stylize};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Row, Sparkline, Table};
use ratatui::Frame;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OrderSide {
    #[default]
    Buy,
    Sell,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TicketField {
    #[default]
    Quantity,
    Price,
}

#[derive(Default)]
pub struct TradePage {
    pub company_id: String,
    pub info: LoadState<CompanyFullInfo>,
    pub snapshot: Option<MarketSnapshot>,
    pub side: OrderSide,
    pub field: TicketField,
    pub quantity: String,
    pub price: String,
    generation: u64,
}

impl TradePage {
    pub fn open(&mut self, company_id: String) {
        self.company_id = company_id;
        self.info = LoadState::NotLoaded;
        self.snapshot = None;
        self.side = OrderSide::Buy;
        self.field = TicketField::Quantity;
        self.quantity.clear();
        self.price.clear();
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn bump(&mut self) -> u64 {
        self.generation += 1;
        self.generation
    }

    /// Market data only exists for distributed companies; anything else gets
    /// the unavailable notice at render time.
    pub fn apply_info(&mut self, info: CompanyFullInfo) {
        if info.company.state.is_distributed() {
            let price = info.stats.price_per_token_usd;
            self.snapshot = Some(market::synthesize(price));
            self.price = format!("{price:.2}");
        } else {
            self.snapshot = None;
        }
        self.info = LoadState::Loaded(info);
    }

    pub fn set_buy(&mut self) {
        self.side = OrderSide::Buy;
    }

    pub fn set_sell(&mut self) {
        self.side = OrderSide::Sell;
    }

    pub fn next_field(&mut self) {
        self.field = match self.field {
            TicketField::Quantity => TicketField::Price,
            TicketField::Price => TicketField::Quantity,
        };
    }

    pub fn backspace(&mut self) {
        match self.field {
            TicketField::Quantity => {
                self.quantity.pop();
            }
            TicketField::Price => {
                self.price.pop();
            }
        }
    }

    pub fn insert(&mut self, c: char) {
        match self.field {
            TicketField::Quantity => self.quantity.push(c),
            TicketField::Price => self.price.push(c),
        }
    }

    /// Validate the ticket and hand back a confirmation line. Nothing is
    /// placed anywhere.
    pub fn submit_order(&mut self) -> Result<String, String> {
        let info = self
            .info
            .as_loaded()
            .ok_or_else(|| "Company data is still loading".to_string())?;
        if !info.company.state.is_distributed() {
            return Err("Trading is not available until tokens are distributed".to_string());
        }
        let quantity = market::validate_quantity(&self.quantity)?;
        let side = match self.side {
            OrderSide::Buy => "Buy",
            OrderSide::Sell => "Sell",
        };
        let symbol = info.company.symbol.clone();
        self.quantity.clear();
        Ok(format!(
            "{side} order for {quantity} {symbol} placed (demo only, no funds moved)"
        ))
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let info = match &self.info {
            LoadState::Loaded(info) => info,
            LoadState::Loading | LoadState::NotLoaded => {
                return widgets::render_notice(frame, area, "Loading market data...");
            }
            LoadState::Error(message) => {
                return widgets::render_notice(frame, area, message);
            }
        };

        if !info.company.state.is_distributed() {
            let block = widgets::card("Trading Not Available");
            let inner = block.inner(area);
            frame.render_widget(block, area);
            let lines = vec![
                Line::from(""),
                Line::from(Span::styled(
                    format!(
                        "{} is still collecting stakeholder funds.",
                        info.company.name
                    ),
                    Style::new().fg(Color::Yellow),
                ))
                .centered(),
                Line::from("Trading opens once tokens are distributed and the AMM pool exists.")
                    .dim()
                    .centered(),
            ];
            frame.render_widget(Paragraph::new(lines), inner);
            return;
        }

        let Some(snapshot) = &self.snapshot else {
            return widgets::render_notice(frame, area, "Preparing market data...");
        };

        let [header, body] =
            Layout::vertical([Constraint::Length(1), Constraint::Min(6)]).areas(area);
        let price = info.stats.price_per_token_usd;
        frame.render_widget(
            Paragraph::new(Line::from(vec![
                Span::styled(
                    format!("{} [{}]", info.company.name, info.company.symbol),
                    Style::new().bold(),
                ),
                Span::raw("  "),
                Span::styled(format_usd(price), Style::new().fg(Color::Cyan)),
                Span::raw("  market cap "),
                Span::raw(format_usd(info.stats.market_cap_usd)),
            ])),
            header,
        );

        let [left, right] =
            Layout::horizontal([Constraint::Ratio(2, 3), Constraint::Ratio(1, 3)]).areas(body);
        let [chart, trades] =
            Layout::vertical([Constraint::Length(9), Constraint::Min(4)]).areas(left);
        render_price_chart(frame, chart, snapshot);
        render_recent_trades(frame, trades, snapshot);

        let [book, ticket] =
            Layout::vertical([Constraint::Min(6), Constraint::Length(7)]).areas(right);
        render_order_book(frame, book, snapshot);
        self.render_ticket(frame, ticket, &info.company.symbol);
    }

    fn render_ticket(&self, frame: &mut Frame, area: Rect, symbol: &str) {
        let block = widgets::card("Order Ticket (demo)");
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let (buy_style, sell_style) = match self.side {
            OrderSide::Buy => (Style::new().fg(Color::Green).bold(), Style::new().dim()),
            OrderSide::Sell => (Style::new().dim(), Style::new().fg(Color::Red).bold()),
        };
        let field_style = |field: TicketField| {
            if field == self.field {
                Style::new().fg(Color::Yellow)
            } else {
                Style::new()
            }
        };
        let estimate = match (
            self.quantity.trim().parse::<f64>(),
            self.price.trim().parse::<f64>(),
        ) {
            (Ok(q), Ok(p)) if q > 0.0 => format_usd(q * p),
            _ => "-".to_string(),
        };
        let lines = vec![
            Line::from(vec![
                Span::styled(" BUY ", buy_style),
                Span::raw(" "),
                Span::styled(" SELL ", sell_style),
                Span::raw(format!("  {symbol}")),
            ]),
            Line::from(vec![
                Span::raw("Quantity  "),
                Span::styled(
                    format!("{}_", self.quantity),
                    field_style(TicketField::Quantity),
                ),
            ]),
            Line::from(vec![
                Span::raw("Price     "),
                Span::styled(format!("{}_", self.price), field_style(TicketField::Price)),
            ]),
            Line::from(format!("Estimated total  {estimate}")).dim(),
        ];
        frame.render_widget(Paragraph::new(lines), inner);
    }
}

fn render_price_chart(frame: &mut Frame, area: Rect, snapshot: &MarketSnapshot) {
    let block = widgets::card("Price, last 31 days");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    // Sparkline wants u64 samples; rescale so the day-to-day shape survives.
    let data: Vec<u64> = snapshot
        .history
        .iter()
        .map(|p| (p * 1000.0).max(0.0) as u64)
        .collect();
    let sparkline = Sparkline::default()
        .data(&data)
        .style(Style::new().fg(Color::Cyan));
    frame.render_widget(sparkline, inner);
}

fn render_order_book(frame: &mut Frame, area: Rect, snapshot: &MarketSnapshot) {
    let block = widgets::card("Order Book");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut lines: Vec<Line> = Vec::new();
    for level in snapshot.asks.iter().rev() {
        lines.push(Line::from(Span::styled(
            format!("{:>10.4}  {:>6}", level.price, level.size),
            Style::new().fg(Color::Red),
        )));
    }
    lines.push(Line::from("──────────────────").dim());
    for level in &snapshot.bids {
        lines.push(Line::from(Span::styled(
            format!("{:>10.4}  {:>6}", level.price, level.size),
            Style::new().fg(Color::Green),
        )));
    }
    frame.render_widget(Paragraph::new(lines), inner);
}

fn render_recent_trades(frame: &mut Frame, area: Rect, snapshot: &MarketSnapshot) {
    let block = widgets::card("Recent Trades");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows = snapshot.trades.iter().map(|trade| {
        let side = if trade.is_buy {
            Span::styled("buy", Style::new().fg(Color::Green))
        } else {
            Span::styled("sell", Style::new().fg(Color::Red))
        };
        Row::new(vec![
            Line::from(format!("{}m ago", trade.minutes_ago)),
            Line::from(side),
            Line::from(format!("{:.4}", trade.price)),
            Line::from(trade.size.to_string()),
            Line::from(format_usd(trade.value)),
        ])
    });
    let table = Table::new(
        rows,
        [
            Constraint::Length(8),
            Constraint::Length(5),
            Constraint::Length(10),
            Constraint::Length(7),
            Constraint::Min(10),
        ],
    )
    .header(Row::new(vec!["When", "Side", "Price", "Size", "Value"]).dim());
    frame.render_widget(table, inner);
}
