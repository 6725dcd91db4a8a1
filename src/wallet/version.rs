use serde::{Deserialize, Serialize};

/// On-chain wallet contract templates, in probing order.
///
/// The order is the enumeration order of the contract table and is
/// part of the import contract: probing stops at the first funded version.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WalletVersion {
    #[serde(rename = "simpleR1")]
    SimpleR1,
    #[serde(rename = "simpleR2")]
    SimpleR2,
    #[serde(rename = "simpleR3")]
    SimpleR3,
    #[serde(rename = "v2R1")]
    V2R1,
    #[serde(rename = "v2R2")]
    V2R2,
    #[serde(rename = "v3R1")]
    V3R1,
    #[serde(rename = "v3R2")]
    V3R2,
    #[serde(rename = "v4R1")]
    V4R1,
    #[serde(rename = "v4R2")]
    V4R2,
}

impl WalletVersion {
    pub const ALL: [WalletVersion; 9] = [
        WalletVersion::SimpleR1,
        WalletVersion::SimpleR2,
        WalletVersion::SimpleR3,
        WalletVersion::V2R1,
        WalletVersion::V2R2,
        WalletVersion::V3R1,
        WalletVersion::V3R2,
        WalletVersion::V4R1,
        WalletVersion::V4R2,
    ];

    /// Version used for new wallets and as the import fallback.
    pub const LATEST: WalletVersion = WalletVersion::V4R2;

    pub fn as_str(&self) -> &'static str {
        match self {
            WalletVersion::SimpleR1 => "simpleR1",
            WalletVersion::SimpleR2 => "simpleR2",
            WalletVersion::SimpleR3 => "simpleR3",
            WalletVersion::V2R1 => "v2R1",
            WalletVersion::V2R2 => "v2R2",
            WalletVersion::V3R1 => "v3R1",
            WalletVersion::V3R2 => "v3R2",
            WalletVersion::V4R1 => "v4R1",
            WalletVersion::V4R2 => "v4R2",
        }
    }
}

impl std::fmt::Display for WalletVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for WalletVersion {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        WalletVersion::ALL
            .iter()
            .find(|v| v.as_str() == s)
            .copied()
            .ok_or_else(|| format!("Invalid wallet version: {}", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_round_trip() {
        for version in WalletVersion::ALL {
            assert_eq!(version.as_str().parse::<WalletVersion>().unwrap(), version);
            let json = serde_json::to_string(&version).unwrap();
            assert_eq!(json, format!("\"{}\"", version));
        }
        assert!("v5R1".parse::<WalletVersion>().is_err());
    }

    #[test]
    fn test_latest_is_last() {
        assert_eq!(WalletVersion::ALL.last(), Some(&WalletVersion::LATEST));
    }
}
