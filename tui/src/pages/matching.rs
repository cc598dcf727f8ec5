//! Investor matching: browse investor profiles and the companies the
//! backend scored for each.

use crate::app::LoadState;
use crate::widgets;
use ledgerwatch_core::format::format_usd;
use ledgerwatch_core::model::{Investor, Match};
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Style, Stylize};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

/// Score tiers for a match badge.
fn score_tier(score: f64) -> (&'static str, Color) {
    if score >= 70.0 {
        ("Excellent", Color::Green)
    } else if score >= 55.0 {
        ("Good", Color::Cyan)
    } else {
        ("Potential", Color::Yellow)
    }
}

#[derive(Default)]
pub struct MatchingPage {
    pub investors: LoadState<Vec<Investor>>,
    pub matches: LoadState<Vec<Match>>,
    pub selected: usize,
    investors_generation: u64,
    matches_generation: u64,
}

impl MatchingPage {
    pub fn investors_generation(&self) -> u64 {
        self.investors_generation
    }

    pub fn bump_investors(&mut self) -> u64 {
        self.investors_generation += 1;
        self.investors_generation
    }

    pub fn matches_generation(&self) -> u64 {
        self.matches_generation
    }

    pub fn bump_matches(&mut self) -> u64 {
        self.matches_generation += 1;
        self.matches_generation
    }

    pub fn apply_investors(&mut self, investors: Vec<Investor>) {
        if self.selected >= investors.len() {
            self.selected = investors.len().saturating_sub(1);
        }
        self.investors = LoadState::Loaded(investors);
    }

    /// Changing the highlighted investor invalidates any loaded matches.
    pub fn move_selection(&mut self, delta: i64) {
        let len = self.investors.as_loaded().map_or(0, Vec::len);
        if len == 0 {
            return;
        }
        let next = (self.selected as i64 + delta).clamp(0, len as i64 - 1) as usize;
        if next != self.selected {
            self.selected = next;
            self.matches = LoadState::NotLoaded;
        }
    }

    pub fn selected_investor_id(&self) -> Option<String> {
        self.investors
            .as_loaded()
            .and_then(|list| list.get(self.selected))
            .map(|i| i.id.clone())
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let investors = match &self.investors {
            LoadState::Loaded(list) if !list.is_empty() => list,
            LoadState::Loaded(_) => {
                return widgets::render_notice(frame, area, "No investors registered");
            }
            LoadState::Loading | LoadState::NotLoaded => {
                return widgets::render_notice(frame, area, "Loading investors...");
            }
            LoadState::Error(message) => {
                return widgets::render_notice(frame, area, message);
            }
        };

        let [left, right] =
            Layout::horizontal([Constraint::Length(30), Constraint::Min(30)]).areas(area);
        self.render_investor_list(frame, left, investors);

        let [profile, matches] =
            Layout::vertical([Constraint::Length(9), Constraint::Min(4)]).areas(right);
        if let Some(investor) = investors.get(self.selected) {
            render_profile(frame, profile, investor);
        }
        self.render_matches(frame, matches);
    }

    fn render_investor_list(&self, frame: &mut Frame, area: Rect, investors: &[Investor]) {
        let block = widgets::card("Investors");
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let lines: Vec<Line> = investors
            .iter()
            .enumerate()
            .map(|(i, investor)| {
                let line = Line::from(vec![
                    Span::raw(investor.name.clone()),
                    Span::raw("  "),
                    Span::styled(investor.investor_type.clone(), Style::new().dim()),
                ]);
                if i == self.selected {
                    line.style(Style::new().bg(Color::DarkGray))
                } else {
                    line
                }
            })
            .collect();
        frame.render_widget(Paragraph::new(lines), inner);
    }

    fn render_matches(&self, frame: &mut Frame, area: Rect) {
        let block = widgets::card("Matched Companies");
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let matches = match &self.matches {
            LoadState::Loaded(list) if !list.is_empty() => list,
            LoadState::Loaded(_) => {
                return widgets::render_notice(frame, inner, "No matches scored for this investor");
            }
            LoadState::NotLoaded => {
                return widgets::render_notice(frame, inner, "Press enter to score matches");
            }
            LoadState::Loading => {
                return widgets::render_notice(frame, inner, "Scoring matches...");
            }
            LoadState::Error(message) => {
                return widgets::render_notice(frame, inner, message);
            }
        };

        let mut lines: Vec<Line> = Vec::new();
        for m in matches {
            let (tier, color) = score_tier(m.score);
            lines.push(Line::from(vec![
                Span::styled(format!("{:>5.1}", m.score), Style::new().fg(color).bold()),
                Span::raw("  "),
                Span::styled(format!("[{tier}]"), Style::new().fg(color)),
                Span::raw("  "),
                Span::raw(m.name.clone()),
            ]));
            let mut details: Vec<String> = Vec::new();
            if !m.details.industry.is_empty() {
                details.push(m.details.industry.clone());
            }
            if !m.details.stage.is_empty() {
                details.push(m.details.stage.clone());
            }
            if !m.details.location.is_empty() {
                details.push(m.details.location.clone());
            }
            if !details.is_empty() {
                lines.push(Line::from(format!("       {}", details.join(" / "))).dim());
            }
        }
        frame.render_widget(Paragraph::new(lines), inner);
    }
}

fn render_profile(frame: &mut Frame, area: Rect, investor: &Investor) {
    let block = widgets::card("Investor Profile");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut lines = vec![
        Line::from(vec![
            Span::styled(investor.name.clone(), Style::new().bold()),
            Span::raw("  "),
            Span::styled(investor.investor_type.clone(), Style::new().fg(Color::Cyan)),
        ]),
        Line::from(format!(
            "Check size   {} to {}",
            format_usd(investor.min_investment_usd),
            format_usd(investor.max_investment_usd)
        )),
    ];
    if !investor.preferred_industries.is_empty() {
        lines.push(Line::from(format!(
            "Industries   {}",
            investor.preferred_industries.join(", ")
        )));
    }
    if !investor.preferred_stages.is_empty() {
        lines.push(Line::from(format!(
            "Stages       {}",
            investor.preferred_stages.join(", ")
        )));
    }
    if !investor.preferred_locations.is_empty() {
        lines.push(Line::from(format!(
            "Locations    {}",
            investor.preferred_locations.join(", ")
        )));
    }
    if !investor.profile_summary.is_empty() {
        lines.push(Line::from(investor.profile_summary.clone()).dim());
    }
    frame.render_widget(Paragraph::new(lines), inner);
}
