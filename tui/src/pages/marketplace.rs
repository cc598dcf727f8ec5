//! Marketplace page: browse investment opportunities.

use crate::app::LoadState;
use crate::widgets;
use ledgerwatch_core::format::{format_usd, group_thousands};
use ledgerwatch_core::model::Opportunity;
use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Color, Style, Stylize};
use ratatui::text::Line;
use ratatui::widgets::{Row, Table};
use ratatui::Frame;

#[derive(Default)]
pub struct MarketplacePage {
    pub list: LoadState<Vec<Opportunity>>,
    pub selected: usize,
    generation: u64,
}

impl MarketplacePage {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn bump(&mut self) -> u64 {
        self.generation += 1;
        self.generation
    }

    pub fn apply(&mut self, list: Vec<Opportunity>) {
        if self.selected >= list.len() {
            self.selected = list.len().saturating_sub(1);
        }
        self.list = LoadState::Loaded(list);
    }

    pub fn move_selection(&mut self, delta: i64) {
        let len = self.list.as_loaded().map_or(0, Vec::len);
        if len == 0 {
            return;
        }
        let next = self.selected as i64 + delta;
        self.selected = next.clamp(0, len as i64 - 1) as usize;
    }

    pub fn selected_id(&self) -> Option<String> {
        self.list
            .as_loaded()
            .and_then(|list| list.get(self.selected))
            .map(|o| o.id.clone())
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let block = widgets::card("Marketplace - tokenized companies");
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let list = match &self.list {
            LoadState::Loaded(list) if !list.is_empty() => list,
            LoadState::Loaded(_) => {
                return widgets::render_notice(frame, inner, "No opportunities listed yet");
            }
            LoadState::Loading | LoadState::NotLoaded => {
                return widgets::render_notice(frame, inner, "Loading opportunities...");
            }
            LoadState::Error(message) => {
                return widgets::render_notice(frame, inner, message);
            }
        };

        let rows = list.iter().enumerate().map(|(i, o)| {
            let row = Row::new(vec![
                Line::from(o.name.clone()),
                Line::from(o.symbol.clone()).bold(),
                Line::from(o.description.clone()).dim(),
                Line::from(format_usd(o.valuation)),
                Line::from(group_thousands(o.token_supply)),
                Line::from(format!("{:.0}%", o.liquidity_percent)),
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
                Constraint::Length(24),
                Constraint::Length(8),
                Constraint::Min(20),
                Constraint::Length(15),
                Constraint::Length(13),
                Constraint::Length(10),
            ],
        )
        .header(
            Row::new(vec!["Company", "Symbol", "Description", "Valuation", "Supply", "Liquidity"])
                .dim(),
        );
        frame.render_widget(table, inner);
    }
}
