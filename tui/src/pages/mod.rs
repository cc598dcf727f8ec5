pub mod amm;
pub mod company;
pub mod marketplace;
pub mod matching;
pub mod register;
pub mod trade;
