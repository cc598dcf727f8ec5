//! Application state and event loop.
//!
//! Pages fetch through spawned tasks that report back over an mpsc channel.
//! Every fetch carries the refresh generation that issued it; responses from
//! a superseded generation are dropped instead of clobbering newer state.
//! In-flight requests are never cancelled.

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ledgerwatch_client::wallet::{Payment, SimulatedWallet, WalletSigner};
use ledgerwatch_client::{ApiClient, ApiError};
use ledgerwatch_core::config::Config;
use ledgerwatch_core::model::{
    AmmInfo, AssetAmount, CheckReceipt, CompanyFullInfo, DistributeReceipt, Investor, Match,
    Opportunity, RegisterReceipt,
};
use ratatui::layout::{Constraint, Layout};
use ratatui::{DefaultTerminal, Frame};
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

use crate::pages::amm::AmmPage;
use crate::pages::company::CompanyPage;
use crate::pages::marketplace::MarketplacePage;
use crate::pages::matching::MatchingPage;
use crate::pages::register::RegisterPage;
use crate::pages::trade::TradePage;
use crate::widgets;

const TOAST_TTL: Duration = Duration::from_secs(6);

/// Loading state for async data.
#[derive(Debug, Clone, Default)]
pub enum LoadState<T> {
    #[default]
    NotLoaded,
    Loading,
    Loaded(T),
    Error(String),
}

impl<T> LoadState<T> {
    pub fn is_loading(&self) -> bool {
        matches!(self, LoadState::Loading)
    }

    pub fn as_loaded(&self) -> Option<&T> {
        match self {
            LoadState::Loaded(data) => Some(data),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            LoadState::Error(msg) => Some(msg),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Info,
    Error,
}

#[derive(Debug, Clone)]
pub struct Toast {
    pub kind: ToastKind,
    pub text: String,
    pub at: Instant,
}

/// Active route. One page renders at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Marketplace,
    Company,
    Amm,
    Trade,
    Register,
    Matching,
}

/// Completed network calls, tagged with the generation that issued them
/// where staleness matters.
pub enum Net {
    Opportunities(u64, Result<Vec<Opportunity>, ApiError>),
    FullInfo(u64, Result<CompanyFullInfo, ApiError>),
    TradeInfo(u64, Result<CompanyFullInfo, ApiError>),
    AmmFull(u64, Result<CompanyFullInfo, ApiError>),
    AmmView(u64, Result<AmmInfo, ApiError>),
    Check(Result<CheckReceipt, ApiError>),
    Distribute(Result<DistributeReceipt, ApiError>),
    Register(Result<RegisterReceipt, ApiError>),
    Investors(u64, Result<Vec<Investor>, ApiError>),
    Matches(u64, Result<Vec<Match>, ApiError>),
    UploadDone(String),
}

pub struct App {
    pub api: ApiClient,
    pub wallet: SimulatedWallet,
    tx: mpsc::UnboundedSender<Net>,
    rx: mpsc::UnboundedReceiver<Net>,
    pub page: Page,
    pub marketplace: MarketplacePage,
    pub company: CompanyPage,
    pub amm: AmmPage,
    pub trade: TradePage,
    pub register: RegisterPage,
    pub matching: MatchingPage,
    pub toasts: Vec<Toast>,
    pub exit: bool,
}

impl App {
    pub fn new(config: Config) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            api: ApiClient::from_config(&config),
            wallet: SimulatedWallet::default(),
            tx,
            rx,
            page: Page::Marketplace,
            marketplace: MarketplacePage::default(),
            company: CompanyPage::default(),
            amm: AmmPage::default(),
            trade: TradePage::default(),
            register: RegisterPage::default(),
            matching: MatchingPage::default(),
            toasts: Vec::new(),
            exit: false,
        }
    }

    pub async fn run(&mut self, terminal: &mut DefaultTerminal) -> anyhow::Result<()> {
        self.open_marketplace();
        while !self.exit {
            terminal.draw(|frame| self.draw(frame))?;
            while let Ok(msg) = self.rx.try_recv() {
                self.on_net(msg);
            }
            self.expire_toasts();
            if event::poll(Duration::from_millis(100))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.on_key(key);
                    }
                }
            }
        }
        Ok(())
    }

    pub fn draw(&self, frame: &mut Frame) {
        let [content, status] =
            Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(frame.area());
        match self.page {
            Page::Marketplace => self.marketplace.render(frame, content),
            Page::Company => self.company.render(frame, content),
            Page::Amm => self.amm.render(frame, content),
            Page::Trade => self.trade.render(frame, content),
            Page::Register => self.register.render(frame, content),
            Page::Matching => self.matching.render(frame, content),
        }
        widgets::render_status_line(frame, status, self.toasts.last(), self.help_line());
    }

    fn help_line(&self) -> &'static str {
        match self.page {
            Page::Marketplace => "enter open  R refresh  r register  i matching  q quit",
            Page::Company => {
                "tab views  R refresh  c check  d distribute  p pay  a amm  t trade  esc back"
            }
            Page::Amm => "/ view as account  R refresh  esc back",
            Page::Trade => "b buy  s sell  tab field  enter submit  R refresh  esc back",
            Page::Register => "tab field  ctrl-n/+shareholder  ctrl-u upload  ctrl-s submit  esc back",
            Page::Matching => "enter matches  R refresh  esc back",
        }
    }

    // ---- toasts ----

    pub fn toast_info(&mut self, text: impl Into<String>) {
        self.toasts.push(Toast {
            kind: ToastKind::Info,
            text: text.into(),
            at: Instant::now(),
        });
    }

    pub fn toast_error(&mut self, text: impl Into<String>) {
        self.toasts.push(Toast {
            kind: ToastKind::Error,
            text: text.into(),
            at: Instant::now(),
        });
    }

    fn expire_toasts(&mut self) {
        let now = Instant::now();
        self.toasts.retain(|t| now.duration_since(t.at) < TOAST_TTL);
    }

    // ---- navigation + fetch ----

    pub fn open_marketplace(&mut self) {
        self.page = Page::Marketplace;
        self.fetch_opportunities();
    }

    fn fetch_opportunities(&mut self) {
        let generation = self.marketplace.bump();
        self.marketplace.list = LoadState::Loading;
        let api = self.api.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let _ = tx.send(Net::Opportunities(generation, api.opportunities().await));
        });
    }

    pub fn open_company(&mut self, company_id: String) {
        self.company.open(company_id);
        self.page = Page::Company;
        self.fetch_company();
    }

    fn fetch_company(&mut self) {
        let generation = self.company.bump();
        self.company.info = LoadState::Loading;
        let api = self.api.clone();
        let tx = self.tx.clone();
        let id = self.company.company_id.clone();
        tokio::spawn(async move {
            let _ = tx.send(Net::FullInfo(generation, api.company_full_info(&id).await));
        });
    }

    fn open_amm(&mut self) {
        let symbol = self
            .company
            .info
            .as_loaded()
            .map(|i| i.company.symbol.clone());
        self.amm.open(self.company.company_id.clone(), symbol);
        self.page = Page::Amm;
        self.fetch_amm();
    }

    /// Without an account override the AMM arrives inside full_info; with
    /// one, the dedicated endpoint is re-issued with the query parameter.
    fn fetch_amm(&mut self) {
        let generation = self.amm.bump();
        self.amm.info = LoadState::Loading;
        let api = self.api.clone();
        let tx = self.tx.clone();
        let id = self.amm.company_id.clone();
        let account = self.amm.account_override();
        tokio::spawn(async move {
            match account {
                None => {
                    let _ = tx.send(Net::AmmFull(generation, api.company_full_info(&id).await));
                }
                Some(account) => {
                    let _ = tx.send(Net::AmmView(
                        generation,
                        api.amm_info(&id, Some(&account)).await,
                    ));
                }
            }
        });
    }

    fn open_trade(&mut self) {
        self.trade.open(self.company.company_id.clone());
        self.page = Page::Trade;
        self.fetch_trade();
    }

    fn fetch_trade(&mut self) {
        let generation = self.trade.bump();
        self.trade.info = LoadState::Loading;
        let api = self.api.clone();
        let tx = self.tx.clone();
        let id = self.trade.company_id.clone();
        tokio::spawn(async move {
            let _ = tx.send(Net::TradeInfo(generation, api.company_full_info(&id).await));
        });
    }

    fn open_register(&mut self) {
        self.register = RegisterPage::default();
        self.page = Page::Register;
    }

    fn open_matching(&mut self) {
        self.page = Page::Matching;
        self.fetch_investors();
    }

    fn fetch_investors(&mut self) {
        let generation = self.matching.bump_investors();
        self.matching.investors = LoadState::Loading;
        let api = self.api.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = api.investors().await.map(|r| r.investors);
            let _ = tx.send(Net::Investors(generation, result));
        });
    }

    fn fetch_matches(&mut self) {
        let Some(investor_id) = self.matching.selected_investor_id() else {
            return;
        };
        let generation = self.matching.bump_matches();
        self.matching.matches = LoadState::Loading;
        let api = self.api.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = api.investor_matches(&investor_id).await.map(|r| r.matches);
            let _ = tx.send(Net::Matches(generation, result));
        });
    }

    // ---- actions ----

    fn run_check(&mut self) {
        if self.company.checking {
            return;
        }
        self.company.checking = true;
        let api = self.api.clone();
        let tx = self.tx.clone();
        let id = self.company.company_id.clone();
        tokio::spawn(async move {
            let _ = tx.send(Net::Check(api.check_stakeholders(&id).await));
        });
    }

    /// One attempt per click; the action stays disabled until the request
    /// completes, success or failure.
    fn run_distribute(&mut self) {
        if !self.company.distribute_enabled() {
            return;
        }
        self.company.distributing = true;
        let api = self.api.clone();
        let tx = self.tx.clone();
        let id = self.company.company_id.clone();
        tokio::spawn(async move {
            let _ = tx.send(Net::Distribute(api.check_and_distribute(&id).await));
        });
    }

    fn run_register(&mut self) {
        if self.register.submitting {
            return;
        }
        if !self.register.document_uploaded {
            self.toast_error("Upload the due diligence document before registering");
            return;
        }
        let request = match self.register.validate() {
            Ok(request) => request,
            Err(message) => {
                self.toast_error(message);
                return;
            }
        };
        self.register.submitting = true;
        let api = self.api.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let _ = tx.send(Net::Register(api.register_company(&request).await));
        });
    }

    /// Simulated document upload: a fixed delay standing in for the real
    /// transfer.
    fn run_upload(&mut self) {
        if self.register.uploading || self.register.document_uploaded {
            return;
        }
        self.register.uploading = true;
        let tx = self.tx.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_secs(3)).await;
            let _ = tx.send(Net::UploadDone("due-diligence.pdf".to_string()));
        });
    }

    /// Pay the selected stakeholder's required RLUSD to the issuing address
    /// through the wallet seam.
    fn run_pay(&mut self) {
        let Some(info) = self.company.info.as_loaded() else {
            return;
        };
        let Some(stakeholder) = info.stakeholders.get(self.company.selected) else {
            return;
        };
        let payment = Payment::new(
            String::new(),
            info.company.issuing_address.clone(),
            AssetAmount {
                currency: "RLUSD".to_string(),
                issuer: None,
                value: format!("{}", stakeholder.required_rlusd),
            },
        );
        let signed = self.wallet.sign_in().and_then(|account| {
            let payment = Payment { account, ..payment };
            self.wallet.sign_and_submit(&payment)
        });
        match signed {
            Ok(hash) => self.toast_info(format!("Transaction sent: {hash}")),
            Err(err) => self.toast_error(format!("Payment failed: {err}")),
        }
    }

    // ---- events ----

    fn on_key(&mut self, key: KeyEvent) {
        // Text-entry pages own the keyboard while editing.
        match self.page {
            Page::Register => return self.on_register_key(key),
            Page::Amm if self.amm.editing => return self.on_amm_edit_key(key),
            _ => {}
        }

        match key.code {
            KeyCode::Char('q') => {
                self.exit = true;
                return;
            }
            KeyCode::Char('x') => {
                self.toasts.pop();
                return;
            }
            _ => {}
        }

        match self.page {
            Page::Marketplace => self.on_marketplace_key(key),
            Page::Company => self.on_company_key(key),
            Page::Amm => self.on_amm_key(key),
            Page::Trade => self.on_trade_key(key),
            Page::Matching => self.on_matching_key(key),
            Page::Register => unreachable!("handled above"),
        }
    }

    fn on_marketplace_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Up => self.marketplace.move_selection(-1),
            KeyCode::Down => self.marketplace.move_selection(1),
            KeyCode::Enter => {
                if let Some(id) = self.marketplace.selected_id() {
                    self.open_company(id);
                }
            }
            KeyCode::Char('R') => self.fetch_opportunities(),
            KeyCode::Char('r') => self.open_register(),
            KeyCode::Char('i') => self.open_matching(),
            _ => {}
        }
    }

    fn on_company_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.open_marketplace(),
            KeyCode::Char('R') => self.fetch_company(),
            KeyCode::Tab => self.company.next_tab(),
            KeyCode::Up => self.company.move_selection(-1),
            KeyCode::Down => self.company.move_selection(1),
            KeyCode::Char('c') => self.run_check(),
            KeyCode::Char('d') => self.run_distribute(),
            KeyCode::Char('p') => self.run_pay(),
            KeyCode::Char('a') => self.open_amm(),
            KeyCode::Char('t') => self.open_trade(),
            _ => {}
        }
    }

    fn on_amm_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.page = Page::Company,
            KeyCode::Char('R') => self.fetch_amm(),
            KeyCode::Char('/') => self.amm.editing = true,
            _ => {}
        }
    }

    fn on_amm_edit_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.amm.editing = false,
            KeyCode::Enter => {
                self.amm.editing = false;
                self.fetch_amm();
            }
            KeyCode::Backspace => {
                self.amm.account_input.pop();
            }
            KeyCode::Char(c) if !c.is_whitespace() => self.amm.account_input.push(c),
            _ => {}
        }
    }

    fn on_trade_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.page = Page::Company,
            KeyCode::Char('R') => self.fetch_trade(),
            KeyCode::Char('b') => self.trade.set_buy(),
            KeyCode::Char('s') => self.trade.set_sell(),
            KeyCode::Tab => self.trade.next_field(),
            KeyCode::Backspace => self.trade.backspace(),
            KeyCode::Char(c) if c.is_ascii_digit() || c == '.' => self.trade.insert(c),
            KeyCode::Enter => match self.trade.submit_order() {
                Ok(message) => self.toast_info(message),
                Err(message) => self.toast_error(message),
            },
            _ => {}
        }
    }

    fn on_matching_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.open_marketplace(),
            KeyCode::Char('R') => self.fetch_investors(),
            KeyCode::Up => self.matching.move_selection(-1),
            KeyCode::Down => self.matching.move_selection(1),
            KeyCode::Enter => self.fetch_matches(),
            _ => {}
        }
    }

    fn on_register_key(&mut self, key: KeyEvent) {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('n') => self.register.add_shareholder(),
                KeyCode::Char('d') => self.register.remove_shareholder(),
                KeyCode::Char('u') => self.run_upload(),
                KeyCode::Char('s') => self.run_register(),
                _ => {}
            }
            return;
        }
        match key.code {
            KeyCode::Esc => self.open_marketplace(),
            KeyCode::Tab => self.register.focus_next(),
            KeyCode::BackTab => self.register.focus_prev(),
            KeyCode::Backspace => self.register.backspace(),
            KeyCode::Enter => self.run_register(),
            KeyCode::Char(c) => self.register.insert(c),
            _ => {}
        }
    }

    pub fn on_net(&mut self, msg: Net) {
        match msg {
            Net::Opportunities(generation, result) => {
                if generation != self.marketplace.generation() {
                    return;
                }
                match result {
                    Ok(list) => self.marketplace.apply(list),
                    Err(err) => {
                        self.marketplace.list = LoadState::Error(err.user_message());
                        self.toast_error(err.user_message());
                    }
                }
            }
            Net::FullInfo(generation, result) => {
                if generation != self.company.generation() {
                    return;
                }
                match result {
                    Ok(info) => self.company.apply_info(info),
                    Err(err) => {
                        self.company.info = LoadState::Error(err.user_message());
                        self.toast_error("Failed to load company data");
                    }
                }
            }
            Net::TradeInfo(generation, result) => {
                if generation != self.trade.generation() {
                    return;
                }
                match result {
                    Ok(info) => self.trade.apply_info(info),
                    Err(err) => {
                        self.trade.info = LoadState::Error(err.user_message());
                        self.toast_error("Failed to load company data");
                    }
                }
            }
            Net::AmmFull(generation, result) => {
                if generation != self.amm.generation() {
                    return;
                }
                match result {
                    Ok(info) => self.amm.apply_full_info(info),
                    Err(err) => {
                        self.amm.info = LoadState::Error(err.user_message());
                        self.toast_error("Failed to load AMM information");
                    }
                }
            }
            Net::AmmView(generation, result) => {
                if generation != self.amm.generation() {
                    return;
                }
                match result {
                    Ok(info) => self.amm.info = LoadState::Loaded(info),
                    Err(err) => {
                        self.amm.info = LoadState::Error(err.user_message());
                        self.toast_error("Failed to load AMM information");
                    }
                }
            }
            Net::Check(result) => {
                self.company.checking = false;
                match result {
                    Ok(receipt) => {
                        self.toast_info(receipt.message);
                        self.fetch_company();
                    }
                    Err(err) => self.toast_error(format!("Check failed: {}", err.user_message())),
                }
            }
            Net::Distribute(result) => {
                self.company.distributing = false;
                match result {
                    Ok(receipt) => {
                        self.toast_info(receipt.message.clone());
                        self.company.last_distribution = Some(receipt);
                        self.fetch_company();
                    }
                    Err(err) => {
                        self.toast_error(format!("Distribution failed: {}", err.user_message()))
                    }
                }
            }
            Net::Register(result) => {
                self.register.submitting = false;
                match result {
                    Ok(receipt) => {
                        self.toast_info(format!("Company registered: {}", receipt.company_id));
                        self.open_company(receipt.company_id);
                    }
                    Err(err) => {
                        self.toast_error(format!("Registration failed: {}", err.user_message()))
                    }
                }
            }
            Net::Investors(generation, result) => {
                if generation != self.matching.investors_generation() {
                    return;
                }
                match result {
                    Ok(investors) => self.matching.apply_investors(investors),
                    Err(err) => {
                        self.matching.investors = LoadState::Error(err.user_message());
                        self.toast_error(err.user_message());
                    }
                }
            }
            Net::Matches(generation, result) => {
                if generation != self.matching.matches_generation() {
                    return;
                }
                match result {
                    Ok(matches) => self.matching.matches = LoadState::Loaded(matches),
                    Err(err) => {
                        self.matching.matches = LoadState::Error(err.user_message());
                        self.toast_error(err.user_message());
                    }
                }
            }
            Net::UploadDone(file) => {
                self.register.uploading = false;
                self.register.document_uploaded = true;
                self.toast_info(format!("Document uploaded: {file}"));
            }
        }
    }
}
