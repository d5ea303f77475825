//! Tracked-wallet configuration.
//!
//! Tracked wallets are the entities that always appear in entity rollups,
//! even with no activity. They are loaded from the embedded seed file, a
//! user-supplied YAML file, or the upstream `/config/wallets` endpoint, and
//! passed explicitly into the aggregators.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::AnalyticsError;

/// Colors assigned by slot to wallets that do not specify one.
pub const PALETTE: [&str; 5] = ["#6366f1", "#10b981", "#ef4444", "#f59e0b", "#8b5cf6"];

/// Upper bound on configured wallets, matching the on-chain config account.
pub const MAX_TRACKED_WALLETS: usize = 10;

const SEED_YAML: &str = include_str!("../../seed_data/tracked_wallets.yml");

/// Palette color for the entity in position `slot`, cycling.
pub fn palette_color(slot: usize) -> &'static str {
    PALETTE[slot % PALETTE.len()]
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackedWallet {
    pub address: String,
    pub label: String,
    pub color: String,
}

/// A wallet as written in a config file; label and color may be omitted.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WalletEntry {
    pub address: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub color: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WalletFile {
    #[serde(default)]
    wallets: Vec<WalletEntry>,
}

/// Ordered, validated set of tracked wallets.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct TrackedWallets {
    wallets: Vec<TrackedWallet>,
}

impl TrackedWallets {
    /// Builds the set from fully specified wallets.
    ///
    /// Rejects empty addresses, duplicates, and more than
    /// [`MAX_TRACKED_WALLETS`] entries.
    pub fn new(wallets: Vec<TrackedWallet>) -> Result<Self, AnalyticsError> {
        if wallets.len() > MAX_TRACKED_WALLETS {
            return Err(AnalyticsError::Config(format!(
                "at most {} tracked wallets are supported, got {}",
                MAX_TRACKED_WALLETS,
                wallets.len()
            )));
        }
        let mut seen = HashSet::new();
        for wallet in &wallets {
            if wallet.address.trim().is_empty() {
                return Err(AnalyticsError::Config(
                    "tracked wallet address cannot be empty".to_string(),
                ));
            }
            if !seen.insert(wallet.address.as_str()) {
                return Err(AnalyticsError::Config(format!(
                    "duplicate tracked wallet {}",
                    wallet.address
                )));
            }
        }
        Ok(Self { wallets })
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Builds the set from partial entries, filling `Wallet {n}` labels and
    /// palette colors by position.
    pub fn from_entries(entries: Vec<WalletEntry>) -> Result<Self, AnalyticsError> {
        let wallets = entries
            .into_iter()
            .enumerate()
            .map(|(i, entry)| TrackedWallet {
                address: entry.address.trim().to_string(),
                label: entry
                    .label
                    .filter(|l| !l.trim().is_empty())
                    .unwrap_or_else(|| format!("Wallet {}", i + 1)),
                color: entry
                    .color
                    .filter(|c| !c.trim().is_empty())
                    .unwrap_or_else(|| palette_color(i).to_string()),
            })
            .collect();
        Self::new(wallets)
    }

    /// Parses the `wallets: [{address, label, color}]` YAML format.
    pub fn from_yaml(yaml: &str) -> Result<Self, AnalyticsError> {
        let file: WalletFile = serde_yml::from_str(yaml)
            .map_err(|e| AnalyticsError::Config(format!("invalid wallet config: {}", e)))?;
        Self::from_entries(file.wallets)
    }

    pub fn from_file(path: &Path) -> Result<Self, AnalyticsError> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            AnalyticsError::Config(format!("failed to read {}: {}", path.display(), e))
        })?;
        Self::from_yaml(&contents)
    }

    /// The wallets bundled with the crate.
    pub fn builtin() -> Result<Self, AnalyticsError> {
        Self::from_yaml(SEED_YAML)
    }

    pub fn get(&self, address: &str) -> Option<&TrackedWallet> {
        self.wallets.iter().find(|w| w.address == address)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TrackedWallet> {
        self.wallets.iter()
    }

    pub fn len(&self) -> usize {
        self.wallets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.wallets.is_empty()
    }

    pub fn addresses(&self) -> Vec<&str> {
        self.wallets.iter().map(|w| w.address.as_str()).collect()
    }
}

impl<'a> IntoIterator for &'a TrackedWallets {
    type Item = &'a TrackedWallet;
    type IntoIter = std::slice::Iter<'a, TrackedWallet>;

    fn into_iter(self) -> Self::IntoIter {
        self.wallets.iter()
    }
}
