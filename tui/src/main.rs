//! LedgerWatch TUI - terminal dashboard for the tokenized-company
//! marketplace: browse opportunities, register a company, track shareholder
//! funding, inspect AMM pools, and run the demo trading view.

mod app;
mod market;
mod pages;
mod widgets;

#[cfg(test)]
mod tests;

use app::App;
use ledgerwatch_core::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load_or_default();
    let mut terminal = ratatui::init();

    let mut app = App::new(config);
    let app_result = app.run(&mut terminal).await;

    ratatui::restore();
    app_result
}
