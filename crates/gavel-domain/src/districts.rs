//! Hong Kong districts and sub-districts
//!
//! Fixed lookup table: the model extracts the sub-district named in the
//! judgment; the district is derived, never independently settable.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// One of the 18 Hong Kong administrative districts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum District {
    /// Central and Western District
    #[serde(rename = "Central and Western")]
    CentralAndWestern,
    /// Wan Chai District
    #[serde(rename = "Wan Chai")]
    WanChai,
    /// Eastern District
    #[serde(rename = "Eastern")]
    Eastern,
    /// Southern District
    #[serde(rename = "Southern")]
    Southern,
    /// Yau Tsim Mong District
    #[serde(rename = "Yau Tsim Mong")]
    YauTsimMong,
    /// Sham Shui Po District
    #[serde(rename = "Sham Shui Po")]
    ShamShuiPo,
    /// Kowloon City District
    #[serde(rename = "Kowloon City")]
    KowloonCity,
    /// Wong Tai Sin District
    #[serde(rename = "Wong Tai Sin")]
    WongTaiSin,
    /// Kwun Tong District
    #[serde(rename = "Kwun Tong")]
    KwunTong,
    /// Kwai Tsing District
    #[serde(rename = "Kwai Tsing")]
    KwaiTsing,
    /// Tsuen Wan District
    #[serde(rename = "Tsuen Wan")]
    TsuenWan,
    /// Tuen Mun District
    #[serde(rename = "Tuen Mun")]
    TuenMun,
    /// Yuen Long District
    #[serde(rename = "Yuen Long")]
    YuenLong,
    /// North District
    #[serde(rename = "North")]
    North,
    /// Tai Po District
    #[serde(rename = "Tai Po")]
    TaiPo,
    /// Sha Tin District
    #[serde(rename = "Sha Tin")]
    ShaTin,
    /// Sai Kung District
    #[serde(rename = "Sai Kung")]
    SaiKung,
    /// Islands District
    #[serde(rename = "Islands")]
    Islands,
}

/// Sub-district where an offence took place, as named in judgments.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub enum SubDistrict {
    #[serde(rename = "Central")]
    Central,
    #[serde(rename = "Sheung Wan")]
    SheungWan,
    #[serde(rename = "Sai Ying Pun")]
    SaiYingPun,
    #[serde(rename = "Mid-Levels")]
    MidLevels,
    #[serde(rename = "Admiralty")]
    Admiralty,
    #[serde(rename = "Kennedy Town")]
    KennedyTown,
    #[serde(rename = "Wan Chai")]
    WanChai,
    #[serde(rename = "Causeway Bay")]
    CausewayBay,
    #[serde(rename = "Happy Valley")]
    HappyValley,
    #[serde(rename = "North Point")]
    NorthPoint,
    #[serde(rename = "Quarry Bay")]
    QuarryBay,
    #[serde(rename = "Sai Wan Ho")]
    SaiWanHo,
    #[serde(rename = "Shau Kei Wan")]
    ShauKeiWan,
    #[serde(rename = "Chai Wan")]
    ChaiWan,
    #[serde(rename = "Aberdeen")]
    Aberdeen,
    #[serde(rename = "Ap Lei Chau")]
    ApLeiChau,
    #[serde(rename = "Pok Fu Lam")]
    PokFuLam,
    #[serde(rename = "Stanley")]
    Stanley,
    #[serde(rename = "Tsim Sha Tsui")]
    TsimShaTsui,
    #[serde(rename = "Yau Ma Tei")]
    YauMaTei,
    #[serde(rename = "Mong Kok")]
    MongKok,
    #[serde(rename = "Jordan")]
    Jordan,
    #[serde(rename = "Tai Kok Tsui")]
    TaiKokTsui,
    #[serde(rename = "Sham Shui Po")]
    ShamShuiPo,
    #[serde(rename = "Cheung Sha Wan")]
    CheungShaWan,
    #[serde(rename = "Lai Chi Kok")]
    LaiChiKok,
    #[serde(rename = "Shek Kip Mei")]
    ShekKipMei,
    #[serde(rename = "Hung Hom")]
    HungHom,
    #[serde(rename = "To Kwa Wan")]
    ToKwaWan,
    #[serde(rename = "Kowloon Tong")]
    KowloonTong,
    #[serde(rename = "Ho Man Tin")]
    HoManTin,
    #[serde(rename = "Kai Tak")]
    KaiTak,
    #[serde(rename = "Wong Tai Sin")]
    WongTaiSin,
    #[serde(rename = "Diamond Hill")]
    DiamondHill,
    #[serde(rename = "San Po Kong")]
    SanPoKong,
    #[serde(rename = "Lok Fu")]
    LokFu,
    #[serde(rename = "Ngau Chi Wan")]
    NgauChiWan,
    #[serde(rename = "Kwun Tong")]
    KwunTong,
    #[serde(rename = "Ngau Tau Kok")]
    NgauTauKok,
    #[serde(rename = "Kowloon Bay")]
    KowloonBay,
    #[serde(rename = "Lam Tin")]
    LamTin,
    #[serde(rename = "Yau Tong")]
    YauTong,
    #[serde(rename = "Kwai Chung")]
    KwaiChung,
    #[serde(rename = "Tsing Yi")]
    TsingYi,
    #[serde(rename = "Tsuen Wan")]
    TsuenWan,
    #[serde(rename = "Sham Tseng")]
    ShamTseng,
    #[serde(rename = "Tuen Mun")]
    TuenMun,
    #[serde(rename = "Yuen Long")]
    YuenLong,
    #[serde(rename = "Tin Shui Wai")]
    TinShuiWai,
    #[serde(rename = "Kam Tin")]
    KamTin,
    #[serde(rename = "Lok Ma Chau")]
    LokMaChau,
    #[serde(rename = "Sheung Shui")]
    SheungShui,
    #[serde(rename = "Fanling")]
    Fanling,
    #[serde(rename = "Lo Wu")]
    LoWu,
    #[serde(rename = "Sha Tau Kok")]
    ShaTauKok,
    #[serde(rename = "Tai Po")]
    TaiPo,
    #[serde(rename = "Sha Tin")]
    ShaTin,
    #[serde(rename = "Ma On Shan")]
    MaOnShan,
    #[serde(rename = "Fo Tan")]
    FoTan,
    #[serde(rename = "Sai Kung")]
    SaiKung,
    #[serde(rename = "Tseung Kwan O")]
    TseungKwanO,
    #[serde(rename = "Clear Water Bay")]
    ClearWaterBay,
    #[serde(rename = "Tung Chung")]
    TungChung,
    #[serde(rename = "Hong Kong International Airport")]
    HongKongInternationalAirport,
    #[serde(rename = "Discovery Bay")]
    DiscoveryBay,
    #[serde(rename = "Mui Wo")]
    MuiWo,
    #[serde(rename = "Tai O")]
    TaiO,
    #[serde(rename = "Cheung Chau")]
    CheungChau,
    #[serde(rename = "Lamma Island")]
    LammaIsland,
}

impl SubDistrict {
    /// District containing this sub-district.
    pub fn district(&self) -> District {
        use SubDistrict::*;
        match self {
            Central | SheungWan | SaiYingPun | MidLevels | Admiralty | KennedyTown => {
                District::CentralAndWestern
            }
            WanChai | CausewayBay | HappyValley => District::WanChai,
            NorthPoint | QuarryBay | SaiWanHo | ShauKeiWan | ChaiWan => District::Eastern,
            Aberdeen | ApLeiChau | PokFuLam | Stanley => District::Southern,
            TsimShaTsui | YauMaTei | MongKok | Jordan | TaiKokTsui => District::YauTsimMong,
            ShamShuiPo | CheungShaWan | LaiChiKok | ShekKipMei => District::ShamShuiPo,
            HungHom | ToKwaWan | KowloonTong | HoManTin | KaiTak => District::KowloonCity,
            WongTaiSin | DiamondHill | SanPoKong | LokFu | NgauChiWan => District::WongTaiSin,
            KwunTong | NgauTauKok | KowloonBay | LamTin | YauTong => District::KwunTong,
            KwaiChung | TsingYi => District::KwaiTsing,
            TsuenWan | ShamTseng => District::TsuenWan,
            TuenMun => District::TuenMun,
            YuenLong | TinShuiWai | KamTin | LokMaChau => District::YuenLong,
            SheungShui | Fanling | LoWu | ShaTauKok => District::North,
            TaiPo => District::TaiPo,
            ShaTin | MaOnShan | FoTan => District::ShaTin,
            SaiKung | TseungKwanO | ClearWaterBay => District::SaiKung,
            TungChung | HongKongInternationalAirport | DiscoveryBay | MuiWo | TaiO | CheungChau
            | LammaIsland => District::Islands,
        }
    }
}
