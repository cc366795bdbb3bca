//! The closed set of asset types the factory can build.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Asset-type tag, the second token of an asset identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[allow(missing_docs)]
pub enum AssetType {
    // Cash and FRAs
    Deposit,
    SpreadDeposit,
    XccyDepo,
    BankBill,
    Repo,
    RepoSpread,
    SimpleFra,
    Fra,
    BillFra,
    SpreadFra,
    // Caps and floors
    Caplet,
    Floorlet,
    BillCaplet,
    BillFloorlet,
    IRCap,
    IRFloor,
    // Swaps
    IRSwap,
    XccySwap,
    BasisSwap,
    XccyBasisSwap,
    ResettableXccyBasisSwap,
    OISSwap,
    ClearedIRSwap,
    CPISwap,
    ZCCPISwap,
    // Rate indices
    Xibor,
    OIS,
    CPIndex,
    ZeroRate,
    // Futures
    IRFuture,
    IRFutureOption,
    IRPutFutureOption,
    IRCallFutureOption,
    CommodityFuture,
    CommodityFutureSpread,
    // Bonds
    Bond,
    BondSpot,
    BondForward,
    // FX
    FxSpot,
    FxForward,
    // Commodities
    CommoditySpot,
    CommodityForward,
    CommodityAverageForward,
    CommoditySpread,
    // Equities
    Equity,
    EquityForward,
}

/// Construction family an asset type belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AssetFamily {
    /// Deposits, repos, bills and FRAs.
    CashFra,
    /// Caplets, floorlets, caps and floors.
    CapFloor,
    /// Vanilla, basis, cross-currency and inflation swaps.
    Swap,
    /// Interest rate indices and zero rates.
    Index,
    /// Rate and commodity futures, and options on rate futures.
    Future,
    /// Bonds, bond spot and bond forwards.
    Bond,
    /// FX spot and forwards.
    Fx,
    /// Commodity spot, forwards and spreads.
    Commodity,
    /// Equity spot and forwards.
    Equity,
}

/// Put or call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OptionType {
    /// Right to sell.
    Put,
    /// Right to buy.
    Call,
}

impl OptionType {
    /// Property value spelling.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            OptionType::Put => "Put",
            OptionType::Call => "Call",
        }
    }

    /// Parses `Put`/`Call` case-insensitively.
    #[must_use]
    pub fn from_name(name: &str) -> Option<OptionType> {
        if name.eq_ignore_ascii_case("put") {
            Some(OptionType::Put)
        } else if name.eq_ignore_ascii_case("call") {
            Some(OptionType::Call)
        } else {
            None
        }
    }
}

impl AssetType {
    /// Every asset type, in declaration order.
    pub const ALL: [AssetType; 46] = [
        AssetType::Deposit,
        AssetType::SpreadDeposit,
        AssetType::XccyDepo,
        AssetType::BankBill,
        AssetType::Repo,
        AssetType::RepoSpread,
        AssetType::SimpleFra,
        AssetType::Fra,
        AssetType::BillFra,
        AssetType::SpreadFra,
        AssetType::Caplet,
        AssetType::Floorlet,
        AssetType::BillCaplet,
        AssetType::BillFloorlet,
        AssetType::IRCap,
        AssetType::IRFloor,
        AssetType::IRSwap,
        AssetType::XccySwap,
        AssetType::BasisSwap,
        AssetType::XccyBasisSwap,
        AssetType::ResettableXccyBasisSwap,
        AssetType::OISSwap,
        AssetType::ClearedIRSwap,
        AssetType::CPISwap,
        AssetType::ZCCPISwap,
        AssetType::Xibor,
        AssetType::OIS,
        AssetType::CPIndex,
        AssetType::ZeroRate,
        AssetType::IRFuture,
        AssetType::IRFutureOption,
        AssetType::IRPutFutureOption,
        AssetType::IRCallFutureOption,
        AssetType::CommodityFuture,
        AssetType::CommodityFutureSpread,
        AssetType::Bond,
        AssetType::BondSpot,
        AssetType::BondForward,
        AssetType::FxSpot,
        AssetType::FxForward,
        AssetType::CommoditySpot,
        AssetType::CommodityForward,
        AssetType::CommodityAverageForward,
        AssetType::CommoditySpread,
        AssetType::Equity,
        AssetType::EquityForward,
    ];

    /// Canonical tag as written in identifiers.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            AssetType::Deposit => "Deposit",
            AssetType::SpreadDeposit => "SpreadDeposit",
            AssetType::XccyDepo => "XccyDepo",
            AssetType::BankBill => "BankBill",
            AssetType::Repo => "Repo",
            AssetType::RepoSpread => "RepoSpread",
            AssetType::SimpleFra => "SimpleFra",
            AssetType::Fra => "Fra",
            AssetType::BillFra => "BillFra",
            AssetType::SpreadFra => "SpreadFra",
            AssetType::Caplet => "Caplet",
            AssetType::Floorlet => "Floorlet",
            AssetType::BillCaplet => "BillCaplet",
            AssetType::BillFloorlet => "BillFloorlet",
            AssetType::IRCap => "IRCap",
            AssetType::IRFloor => "IRFloor",
            AssetType::IRSwap => "IRSwap",
            AssetType::XccySwap => "XccySwap",
            AssetType::BasisSwap => "BasisSwap",
            AssetType::XccyBasisSwap => "XccyBasisSwap",
            AssetType::ResettableXccyBasisSwap => "ResettableXccyBasisSwap",
            AssetType::OISSwap => "OISSwap",
            AssetType::ClearedIRSwap => "ClearedIRSwap",
            AssetType::CPISwap => "CPISwap",
            AssetType::ZCCPISwap => "ZCCPISwap",
            AssetType::Xibor => "Xibor",
            AssetType::OIS => "OIS",
            AssetType::CPIndex => "CPIndex",
            AssetType::ZeroRate => "ZeroRate",
            AssetType::IRFuture => "IRFuture",
            AssetType::IRFutureOption => "IRFutureOption",
            AssetType::IRPutFutureOption => "IRPutFutureOption",
            AssetType::IRCallFutureOption => "IRCallFutureOption",
            AssetType::CommodityFuture => "CommodityFuture",
            AssetType::CommodityFutureSpread => "CommodityFutureSpread",
            AssetType::Bond => "Bond",
            AssetType::BondSpot => "BondSpot",
            AssetType::BondForward => "BondForward",
            AssetType::FxSpot => "FxSpot",
            AssetType::FxForward => "FxForward",
            AssetType::CommoditySpot => "CommoditySpot",
            AssetType::CommodityForward => "CommodityForward",
            AssetType::CommodityAverageForward => "CommodityAverageForward",
            AssetType::CommoditySpread => "CommoditySpread",
            AssetType::Equity => "Equity",
            AssetType::EquityForward => "EquityForward",
        }
    }

    /// Family used to group construction recipes.
    #[must_use]
    pub fn family(&self) -> AssetFamily {
        use AssetType::*;
        match self {
            Deposit | SpreadDeposit | XccyDepo | BankBill | Repo | RepoSpread | SimpleFra | Fra
            | BillFra | SpreadFra => AssetFamily::CashFra,
            Caplet | Floorlet | BillCaplet | BillFloorlet | IRCap | IRFloor => AssetFamily::CapFloor,
            IRSwap | XccySwap | BasisSwap | XccyBasisSwap | ResettableXccyBasisSwap | OISSwap
            | ClearedIRSwap | CPISwap | ZCCPISwap => AssetFamily::Swap,
            Xibor | OIS | CPIndex | ZeroRate => AssetFamily::Index,
            IRFuture | IRFutureOption | IRPutFutureOption | IRCallFutureOption | CommodityFuture
            | CommodityFutureSpread => AssetFamily::Future,
            Bond | BondSpot | BondForward => AssetFamily::Bond,
            FxSpot | FxForward => AssetFamily::Fx,
            CommoditySpot | CommodityForward | CommodityAverageForward | CommoditySpread => {
                AssetFamily::Commodity
            }
            Equity | EquityForward => AssetFamily::Equity,
        }
    }

    /// Looks up a tag case-insensitively. Accepts the alternative spellings
    /// `SpreadRepo`, `EquitySpot` and `InflationXibor`.
    #[must_use]
    pub fn from_tag(tag: &str) -> Option<AssetType> {
        let tag = tag.trim();
        if let Some(found) = AssetType::ALL
            .iter()
            .copied()
            .find(|t| t.as_str().eq_ignore_ascii_case(tag))
        {
            return Some(found);
        }
        match tag.to_ascii_lowercase().as_str() {
            "spreadrepo" => Some(AssetType::RepoSpread),
            "equityspot" => Some(AssetType::Equity),
            "inflationxibor" => Some(AssetType::CPIndex),
            _ => None,
        }
    }
}

impl fmt::Display for AssetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for AssetType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AssetType::from_tag(s).ok_or_else(|| s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_tags_unique_and_roundtrip() {
        let tags: HashSet<_> = AssetType::ALL.iter().map(AssetType::as_str).collect();
        assert_eq!(tags.len(), AssetType::ALL.len());
        for t in AssetType::ALL {
            assert_eq!(AssetType::from_tag(t.as_str()), Some(t));
        }
    }

    #[test]
    fn test_case_insensitive_and_aliases() {
        assert_eq!(AssetType::from_tag("irswap"), Some(AssetType::IRSwap));
        assert_eq!(AssetType::from_tag("SpreadRepo"), Some(AssetType::RepoSpread));
        assert_eq!(AssetType::from_tag("EquitySpot"), Some(AssetType::Equity));
        assert_eq!(AssetType::from_tag("InflationXibor"), Some(AssetType::CPIndex));
        assert_eq!(AssetType::from_tag("Unknown"), None);
    }

    #[test]
    fn test_families() {
        assert_eq!(AssetType::BillFra.family(), AssetFamily::CashFra);
        assert_eq!(AssetType::IRFloor.family(), AssetFamily::CapFloor);
        assert_eq!(AssetType::ZCCPISwap.family(), AssetFamily::Swap);
        assert_eq!(AssetType::CPIndex.family(), AssetFamily::Index);
        assert_eq!(AssetType::IRCallFutureOption.family(), AssetFamily::Future);
    }
}
