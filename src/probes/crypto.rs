// src/probes/crypto.rs
use crate::classifier::{is_bitcoin_address, is_ethereum_address};
use crate::probes::{Probe, ProbeContext};
use crate::types::{OsintError, ProbeInfo, ProbeResult, QueryType};
use async_trait::async_trait;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressKind {
    BitcoinP2pkh,
    BitcoinP2sh,
    Ethereum,
}

impl AddressKind {
    pub fn detect(address: &str) -> Option<Self> {
        if is_ethereum_address(address) {
            Some(AddressKind::Ethereum)
        } else if is_bitcoin_address(address) {
            if address.starts_with('1') {
                Some(AddressKind::BitcoinP2pkh)
            } else {
                Some(AddressKind::BitcoinP2sh)
            }
        } else {
            None
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AddressKind::BitcoinP2pkh => "Bitcoin (P2PKH, legacy)",
            AddressKind::BitcoinP2sh => "Bitcoin (P2SH, script)",
            AddressKind::Ethereum => "Ethereum",
        }
    }

    pub fn explorer_url(&self, address: &str) -> String {
        match self {
            AddressKind::BitcoinP2pkh | AddressKind::BitcoinP2sh => {
                format!("https://www.blockchain.com/explorer/addresses/btc/{}", address)
            }
            AddressKind::Ethereum => format!("https://etherscan.io/address/{}", address),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AddressFormatProbe {
    name: String,
}

impl AddressFormatProbe {
    pub fn new() -> Self {
        Self {
            name: "Address Format".to_string(),
        }
    }
}

#[async_trait]
impl Probe for AddressFormatProbe {
    fn name(&self) -> &str {
        &self.name
    }

    fn info(&self) -> ProbeInfo {
        ProbeInfo {
            name: self.name.clone(),
            query_type: QueryType::Crypto,
            uses_network: false,
        }
    }

    async fn run(&self, address: &str, _ctx: &ProbeContext) -> Result<ProbeResult, OsintError> {
        match AddressKind::detect(address) {
            Some(kind) => Ok(ProbeResult::success(
                &self.name,
                format!("{} address, {} characters", kind.label(), address.len()),
                None,
            )),
            None => Ok(ProbeResult::error(&self.name, "Unrecognized address format", None)),
        }
    }
}

/// Link to a public block explorer; no request is made.
#[derive(Debug, Clone)]
pub struct ExplorerProbe {
    name: String,
}

impl ExplorerProbe {
    pub fn new() -> Self {
        Self {
            name: "Block Explorer".to_string(),
        }
    }
}

#[async_trait]
impl Probe for ExplorerProbe {
    fn name(&self) -> &str {
        &self.name
    }

    fn info(&self) -> ProbeInfo {
        ProbeInfo {
            name: self.name.clone(),
            query_type: QueryType::Crypto,
            uses_network: false,
        }
    }

    async fn run(&self, address: &str, _ctx: &ProbeContext) -> Result<ProbeResult, OsintError> {
        let kind = AddressKind::detect(address).ok_or_else(|| {
            OsintError::ValidationError(format!("Not a known address format: {}", address))
        })?;
        Ok(ProbeResult::info(
            &self.name,
            "Transaction history is public on-chain",
            Some(kind.explorer_url(address)),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::probes::tests_support::offline_context;
    use crate::types::ProbeStatus;

    #[test]
    fn test_detect() {
        assert_eq!(
            AddressKind::detect("1A1zP1eP5QGefi2DMPTfTL5SLmv7DivfNa"),
            Some(AddressKind::BitcoinP2pkh)
        );
        assert_eq!(
            AddressKind::detect("3J98t1WpEZ73CNmQviecrnyiWrnqRhWNLy"),
            Some(AddressKind::BitcoinP2sh)
        );
        assert_eq!(
            AddressKind::detect("0x52908400098527886E0F7030069857D2E4169EE7"),
            Some(AddressKind::Ethereum)
        );
        // 0, O, I and l are outside base58
        assert_eq!(AddressKind::detect("1OOOOOOOOOOOOOOOOOOOOOOOOOOO"), None);
        assert_eq!(AddressKind::detect("johndoe"), None);
    }

    #[tokio::test]
    async fn test_probes() {
        let ctx = offline_context();
        let address = "1A1zP1eP5QGefi2DMPTfTL5SLmv7DivfNa";

        let format = AddressFormatProbe::new().run(address, &ctx).await.unwrap();
        assert_eq!(format.status, ProbeStatus::Success);
        assert!(format.data.starts_with("Bitcoin (P2PKH"));

        let explorer = ExplorerProbe::new().run(address, &ctx).await.unwrap();
        assert_eq!(explorer.status, ProbeStatus::Info);
        assert_eq!(
            explorer.url.as_deref(),
            Some("https://www.blockchain.com/explorer/addresses/btc/1A1zP1eP5QGefi2DMPTfTL5SLmv7DivfNa")
        );

        let bad = AddressFormatProbe::new().run("johndoe", &ctx).await.unwrap();
        assert_eq!(bad.status, ProbeStatus::Error);
    }
}
