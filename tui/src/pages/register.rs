//! Company registration form.
//!
//! Client-side validation mirrors what the backend enforces so most errors
//! surface before the request goes out: required fields, positive numbers,
//! plausible wallet addresses and the shareholder-plus-liquidity percent
//! total landing on 100.

use ledgerwatch_core::model::{RegisterCompany, ShareholderInput};
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Style, Stylize};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::widgets;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Name,
    Symbol,
    Supply,
    Valuation,
    Liquidity,
    ShareholderWallet(usize),
    ShareholderPercent(usize),
}

#[derive(Debug, Clone, Default)]
pub struct ShareholderRow {
    pub wallet: String,
    pub percent: String,
}

pub struct RegisterPage {
    pub name: String,
    pub symbol: String,
    pub supply: String,
    pub valuation: String,
    pub liquidity: String,
    pub shareholders: Vec<ShareholderRow>,
    pub focus: Focus,
    pub uploading: bool,
    pub document_uploaded: bool,
    pub submitting: bool,
}

impl Default for RegisterPage {
    fn default() -> Self {
        Self {
            name: String::new(),
            symbol: String::new(),
            supply: String::new(),
            valuation: String::new(),
            liquidity: String::new(),
            shareholders: vec![ShareholderRow::default()],
            focus: Focus::Name,
            uploading: false,
            document_uploaded: false,
            submitting: false,
        }
    }
}

impl RegisterPage {
    pub fn add_shareholder(&mut self) {
        self.shareholders.push(ShareholderRow::default());
        self.focus = Focus::ShareholderWallet(self.shareholders.len() - 1);
    }

    /// Remove the focused row; the form always keeps at least one.
    pub fn remove_shareholder(&mut self) {
        if self.shareholders.len() <= 1 {
            return;
        }
        let index = match self.focus {
            Focus::ShareholderWallet(i) | Focus::ShareholderPercent(i) => i,
            _ => self.shareholders.len() - 1,
        };
        self.shareholders.remove(index.min(self.shareholders.len() - 1));
        self.focus = Focus::ShareholderWallet(index.min(self.shareholders.len() - 1));
    }

    fn focus_order(&self) -> Vec<Focus> {
        let mut order = vec![
            Focus::Name,
            Focus::Symbol,
            Focus::Supply,
            Focus::Valuation,
            Focus::Liquidity,
        ];
        for i in 0..self.shareholders.len() {
            order.push(Focus::ShareholderWallet(i));
            order.push(Focus::ShareholderPercent(i));
        }
        order
    }

    pub fn focus_next(&mut self) {
        let order = self.focus_order();
        let at = order.iter().position(|f| *f == self.focus).unwrap_or(0);
        self.focus = order[(at + 1) % order.len()];
    }

    pub fn focus_prev(&mut self) {
        let order = self.focus_order();
        let at = order.iter().position(|f| *f == self.focus).unwrap_or(0);
        self.focus = order[(at + order.len() - 1) % order.len()];
    }

    fn field_mut(&mut self) -> Option<&mut String> {
        match self.focus {
            Focus::Name => Some(&mut self.name),
            Focus::Symbol => Some(&mut self.symbol),
            Focus::Supply => Some(&mut self.supply),
            Focus::Valuation => Some(&mut self.valuation),
            Focus::Liquidity => Some(&mut self.liquidity),
            Focus::ShareholderWallet(i) => self.shareholders.get_mut(i).map(|r| &mut r.wallet),
            Focus::ShareholderPercent(i) => self.shareholders.get_mut(i).map(|r| &mut r.percent),
        }
    }

    pub fn insert(&mut self, c: char) {
        if c.is_control() {
            return;
        }
        if let Some(field) = self.field_mut() {
            field.push(c);
        }
    }

    pub fn backspace(&mut self) {
        if let Some(field) = self.field_mut() {
            field.pop();
        }
    }

    /// Running percent total shown live while the form is edited.
    pub fn total_percent(&self) -> f64 {
        let liquidity = self.liquidity.trim().parse::<f64>().unwrap_or(0.0);
        self.shareholders
            .iter()
            .map(|row| row.percent.trim().parse::<f64>().unwrap_or(0.0))
            .sum::<f64>()
            + liquidity
    }

    pub fn validate(&self) -> Result<RegisterCompany, String> {
        let name = self.name.trim();
        let symbol = self.symbol.trim().to_uppercase();
        if name.is_empty() || symbol.is_empty() {
            return Err("Company name and symbol are required".to_string());
        }
        if symbol.len() > 10 {
            return Err("Symbol must be 10 characters or fewer".to_string());
        }
        let total_supply = parse_positive(&self.supply, "Token supply")?;
        let total_valuation_usd = parse_positive(&self.valuation, "Valuation")?;
        let liquidity_percent = parse_positive(&self.liquidity, "Liquidity percent")?;

        let mut shareholders = Vec::with_capacity(self.shareholders.len());
        for (i, row) in self.shareholders.iter().enumerate() {
            let wallet = row.wallet.trim();
            if wallet.is_empty() && row.percent.trim().is_empty() {
                continue;
            }
            if wallet.len() < 20 {
                return Err(format!("Shareholder {} wallet address looks invalid", i + 1));
            }
            let percent = parse_positive(&row.percent, "Shareholder percent")?;
            shareholders.push(ShareholderInput {
                wallet_address: wallet.to_string(),
                percent,
            });
        }
        if shareholders.is_empty() {
            return Err("At least one shareholder is required".to_string());
        }

        let request = RegisterCompany {
            name: name.to_string(),
            symbol,
            total_supply,
            total_valuation_usd,
            liquidity_percent,
            shareholders,
        };
        let total = request.total_percent();
        if (total - 100.0).abs() > 0.01 {
            return Err(format!(
                "Shareholder + liquidity percents must total 100 (currently {total:.2})"
            ));
        }
        Ok(request)
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let block = widgets::card("Register Company");
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let shareholder_height = self.shareholders.len() as u16 + 1;
        let [fields, holders, footer] = Layout::vertical([
            Constraint::Length(6),
            Constraint::Length(shareholder_height.min(inner.height.saturating_sub(9))),
            Constraint::Length(3),
        ])
        .areas(inner);

        let lines = vec![
            self.field_line("Company name", &self.name, Focus::Name),
            self.field_line("Symbol", &self.symbol, Focus::Symbol),
            self.field_line("Token supply", &self.supply, Focus::Supply),
            self.field_line("Valuation USD", &self.valuation, Focus::Valuation),
            self.field_line("Liquidity %", &self.liquidity, Focus::Liquidity),
            Line::from("Shareholders").bold(),
        ];
        frame.render_widget(Paragraph::new(lines), fields);

        let rows: Vec<Line> = self
            .shareholders
            .iter()
            .enumerate()
            .map(|(i, row)| {
                Line::from(vec![
                    Span::raw(format!("  {}. wallet ", i + 1)),
                    self.value_span(&row.wallet, Focus::ShareholderWallet(i)),
                    Span::raw("  percent "),
                    self.value_span(&row.percent, Focus::ShareholderPercent(i)),
                ])
            })
            .collect();
        frame.render_widget(Paragraph::new(rows), holders);

        let total = self.total_percent();
        let total_style = if (total - 100.0).abs() <= 0.01 {
            Style::new().fg(Color::Green)
        } else {
            Style::new().fg(Color::Yellow)
        };
        let document = if self.document_uploaded {
            Span::styled("document uploaded", Style::new().fg(Color::Green))
        } else if self.uploading {
            Span::styled("uploading document...", Style::new().fg(Color::Yellow))
        } else {
            Span::styled("document required (ctrl-u to upload)", Style::new().fg(Color::Red))
        };
        let footer_lines = vec![
            Line::from(vec![
                Span::raw("Total allocation (shareholders + liquidity): "),
                Span::styled(format!("{total:.2}%"), total_style),
            ]),
            Line::from(document),
            Line::from(if self.submitting {
                "Submitting registration..."
            } else {
                "ctrl-s submit   ctrl-n add shareholder   ctrl-d remove   esc cancel"
            })
            .dim(),
        ];
        frame.render_widget(Paragraph::new(footer_lines), footer);
    }

    fn field_line(&self, label: &str, value: &str, focus: Focus) -> Line<'static> {
        Line::from(vec![
            Span::raw(format!("{label:<15}")),
            self.value_span(value, focus),
        ])
    }

    fn value_span(&self, value: &str, focus: Focus) -> Span<'static> {
        if self.focus == focus {
            Span::styled(format!("{value}_"), Style::new().fg(Color::Yellow))
        } else if value.is_empty() {
            Span::styled("(empty)".to_string(), Style::new().dim())
        } else {
            Span::raw(value.to_string())
        }
    }
}

fn parse_positive(input: &str, label: &str) -> Result<f64, String> {
    match input.trim().parse::<f64>() {
        Ok(value) if value > 0.0 => Ok(value),
        Ok(_) => Err(format!("{label} must be greater than zero")),
        Err(_) => Err(format!("{label} must be a number")),
    }
}
