//! Wallet-signing seam.
//!
//! The real signing flow belongs to an external browser-wallet SDK: sign in
//! to learn the account address, then sign and submit a payment-shaped
//! transaction and get back a hash. [`SimulatedWallet`] stands in for it so
//! the pay action works in demos and tests.

use ledgerwatch_core::model::AssetAmount;
use std::fmt;

/// Payment-shaped transaction as the wallet SDK expects it.
#[derive(Debug, Clone, serde::Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Payment {
    pub transaction_type: String,
    pub account: String,
    pub destination: String,
    pub amount: AssetAmount,
}

impl Payment {
    pub fn new(account: String, destination: String, amount: AssetAmount) -> Self {
        Self {
            transaction_type: "Payment".to_string(),
            account,
            destination,
            amount,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalletError(pub String);

impl fmt::Display for WalletError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "wallet error: {}", self.0)
    }
}

impl std::error::Error for WalletError {}

pub trait WalletSigner {
    /// Sign in and return the user's account address.
    fn sign_in(&self) -> Result<String, WalletError>;

    /// Sign and submit a payment, returning the transaction hash.
    fn sign_and_submit(&self, payment: &Payment) -> Result<String, WalletError>;
}

/// Deterministic stand-in for the wallet SDK.
#[derive(Debug, Clone)]
pub struct SimulatedWallet {
    account: String,
}

impl SimulatedWallet {
    pub fn new(account: impl Into<String>) -> Self {
        Self {
            account: account.into(),
        }
    }
}

impl Default for SimulatedWallet {
    fn default() -> Self {
        Self::new("rDrr8Lh4hgPu8yqrJ7x7ZMW74HzJvKsNS7")
    }
}

impl WalletSigner for SimulatedWallet {
    fn sign_in(&self) -> Result<String, WalletError> {
        Ok(self.account.clone())
    }

    fn sign_and_submit(&self, payment: &Payment) -> Result<String, WalletError> {
        let body = serde_json::to_string(payment)
            .map_err(|e| WalletError(format!("could not encode payment: {e}")))?;
        Ok(pseudo_hash(&body))
    }
}

/// 64-hex-digit digest from an FNV-1a fold. Stable per payment, no crypto
/// claim attached.
fn pseudo_hash(input: &str) -> String {
    let mut state: u64 = 0xcbf2_9ce4_8422_2325;
    let mut out = String::with_capacity(64);
    for chunk in 0..4 {
        for byte in input.bytes().chain([chunk]) {
            state ^= byte as u64;
            state = state.wrapping_mul(0x0000_0100_0000_01b3);
        }
        out.push_str(&format!("{state:016X}"));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payment() -> Payment {
        Payment::new(
            "rDrr8Lh4hgPu8yqrJ7x7ZMW74HzJvKsNS7".into(),
            "rHb9CJAWyB4rj91VRWn96DkukG4bwdtyTh".into(),
            AssetAmount {
                currency: "RLUSD".into(),
                issuer: Some("rHb9CJAWyB4rj91VRWn96DkukG4bwdtyTh".into()),
                value: "2500000".into(),
            },
        )
    }

    #[test]
    fn payment_serializes_in_sdk_shape() {
        let json = serde_json::to_value(payment()).unwrap();
        assert_eq!(json["TransactionType"], "Payment");
        assert_eq!(json["Destination"], "rHb9CJAWyB4rj91VRWn96DkukG4bwdtyTh");
        assert_eq!(json["Amount"]["currency"], "RLUSD");
        assert_eq!(json["Amount"]["value"], "2500000");
    }

    #[test]
    fn simulated_wallet_signs_in_with_its_account() {
        let wallet = SimulatedWallet::new("rJRi8WW24gt9X85PHAxfWNPCizMMhqUQwg");
        assert_eq!(
            wallet.sign_in().unwrap(),
            "rJRi8WW24gt9X85PHAxfWNPCizMMhqUQwg"
        );
    }

    #[test]
    fn submit_hash_is_stable_and_hex() {
        let wallet = SimulatedWallet::default();
        let a = wallet.sign_and_submit(&payment()).unwrap();
        let b = wallet.sign_and_submit(&payment()).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
