use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "kebab-case")]
pub enum Condition {
    ChronicPain,
    Anxiety,
    Insomnia,
    Ptsd,
    Epilepsy,
    MultipleSclerosis,
    Migraine,
    Other,
}

impl Condition {
    pub const ALL: [Condition; 8] = [
        Condition::ChronicPain,
        Condition::Anxiety,
        Condition::Insomnia,
        Condition::Ptsd,
        Condition::Epilepsy,
        Condition::MultipleSclerosis,
        Condition::Migraine,
        Condition::Other,
    ];

    pub fn as_slug(&self) -> &'static str {
        match self {
            Self::ChronicPain => "chronic-pain",
            Self::Anxiety => "anxiety",
            Self::Insomnia => "insomnia",
            Self::Ptsd => "ptsd",
            Self::Epilepsy => "epilepsy",
            Self::MultipleSclerosis => "multiple-sclerosis",
            Self::Migraine => "migraine",
            Self::Other => "other",
        }
    }
}

impl Display for Condition {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let display = match self {
            Self::ChronicPain => "chronic pain",
            Self::Anxiety => "anxiety",
            Self::Insomnia => "insomnia",
            Self::Ptsd => "PTSD",
            Self::Epilepsy => "epilepsy",
            Self::MultipleSclerosis => "multiple sclerosis",
            Self::Migraine => "migraine",
            Self::Other => "your condition",
        };
        write!(f, "{display}")
    }
}

#[derive(Debug, Error)]
#[error("unknown condition token: {0}")]
pub struct ConditionParseError(pub String);

impl FromStr for Condition {
    type Err = ConditionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "chronic-pain" | "chronic_pain" | "pain" => Ok(Self::ChronicPain),
            "anxiety" | "anxiety-depression" => Ok(Self::Anxiety),
            "insomnia" | "sleep" => Ok(Self::Insomnia),
            "ptsd" => Ok(Self::Ptsd),
            "epilepsy" => Ok(Self::Epilepsy),
            "multiple-sclerosis" | "multiple_sclerosis" | "ms" => Ok(Self::MultipleSclerosis),
            "migraine" | "migraines" => Ok(Self::Migraine),
            "other" => Ok(Self::Other),
            _ => Err(ConditionParseError(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BudgetBand {
    #[serde(rename = "under-150")]
    Under150,
    #[serde(rename = "150-250")]
    From150To250,
    #[serde(rename = "250-350")]
    From250To350,
    #[serde(rename = "350-500")]
    From350To500,
    #[serde(rename = "500-plus")]
    Above500,
    #[serde(rename = "not-sure")]
    NotSure,
}

impl BudgetBand {
    pub const ALL: [BudgetBand; 6] = [
        BudgetBand::Under150,
        BudgetBand::From150To250,
        BudgetBand::From250To350,
        BudgetBand::From350To500,
        BudgetBand::Above500,
        BudgetBand::NotSure,
    ];

    pub fn as_slug(&self) -> &'static str {
        match self {
            Self::Under150 => "under-150",
            Self::From150To250 => "150-250",
            Self::From250To350 => "250-350",
            Self::From350To500 => "350-500",
            Self::Above500 => "500-plus",
            Self::NotSure => "not-sure",
        }
    }
}

impl Display for BudgetBand {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let display = match self {
            Self::Under150 => "under £150/month",
            Self::From150To250 => "£150-250/month",
            Self::From250To350 => "£250-350/month",
            Self::From350To500 => "£350-500/month",
            Self::Above500 => "over £500/month",
            Self::NotSure => "not sure yet",
        };
        write!(f, "{display}")
    }
}

#[derive(Debug, Error)]
#[error("unknown budget token: {0}")]
pub struct BudgetParseError(pub String);

impl FromStr for BudgetBand {
    type Err = BudgetParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "under-150" | "under150" | "0-150" => Ok(Self::Under150),
            "150-250" => Ok(Self::From150To250),
            "250-350" => Ok(Self::From250To350),
            "350-500" => Ok(Self::From350To500),
            "500-plus" | "500+" | "over-500" => Ok(Self::Above500),
            "not-sure" | "unsure" | "need-more-info" => Ok(Self::NotSure),
            _ => Err(BudgetParseError(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "kebab-case")]
pub enum Region {
    London,
    SouthEast,
    SouthWest,
    Midlands,
    NorthWest,
    NorthEast,
    Scotland,
    Wales,
    NorthernIreland,
    Virtual,
}

impl Region {
    pub const ALL: [Region; 10] = [
        Region::London,
        Region::SouthEast,
        Region::SouthWest,
        Region::Midlands,
        Region::NorthWest,
        Region::NorthEast,
        Region::Scotland,
        Region::Wales,
        Region::NorthernIreland,
        Region::Virtual,
    ];

    pub fn as_slug(&self) -> &'static str {
        match self {
            Self::London => "london",
            Self::SouthEast => "south-east",
            Self::SouthWest => "south-west",
            Self::Midlands => "midlands",
            Self::NorthWest => "north-west",
            Self::NorthEast => "north-east",
            Self::Scotland => "scotland",
            Self::Wales => "wales",
            Self::NorthernIreland => "northern-ireland",
            Self::Virtual => "virtual",
        }
    }
}

impl Display for Region {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let display = match self {
            Self::London => "London",
            Self::SouthEast => "South East",
            Self::SouthWest => "South West",
            Self::Midlands => "Midlands",
            Self::NorthWest => "North West",
            Self::NorthEast => "North East",
            Self::Scotland => "Scotland",
            Self::Wales => "Wales",
            Self::NorthernIreland => "Northern Ireland",
            Self::Virtual => "Online only",
        };
        write!(f, "{display}")
    }
}

#[derive(Debug, Error)]
#[error("unknown region token: {0}")]
pub struct RegionParseError(pub String);

impl FromStr for Region {
    type Err = RegionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('_', "-");
        match normalized.as_str() {
            "london" => Ok(Self::London),
            "south-east" | "southeast" => Ok(Self::SouthEast),
            "south-west" | "southwest" => Ok(Self::SouthWest),
            "midlands" | "east-midlands" | "west-midlands" => Ok(Self::Midlands),
            "north-west" | "northwest" => Ok(Self::NorthWest),
            "north-east" | "northeast" | "yorkshire" => Ok(Self::NorthEast),
            "scotland" => Ok(Self::Scotland),
            "wales" => Ok(Self::Wales),
            "northern-ireland" => Ok(Self::NorthernIreland),
            "virtual" | "online" | "remote" => Ok(Self::Virtual),
            _ => Err(RegionParseError(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "kebab-case")]
pub enum Urgency {
    ThisWeek,
    TwoWeeks,
    WithinMonth,
    Researching,
}

impl Urgency {
    pub const ALL: [Urgency; 4] = [
        Urgency::ThisWeek,
        Urgency::TwoWeeks,
        Urgency::WithinMonth,
        Urgency::Researching,
    ];

    pub fn as_slug(&self) -> &'static str {
        match self {
            Self::ThisWeek => "this-week",
            Self::TwoWeeks => "two-weeks",
            Self::WithinMonth => "within-month",
            Self::Researching => "researching",
        }
    }
}

impl Display for Urgency {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let display = match self {
            Self::ThisWeek => "this week",
            Self::TwoWeeks => "within two weeks",
            Self::WithinMonth => "within a month",
            Self::Researching => "just researching",
        };
        write!(f, "{display}")
    }
}

#[derive(Debug, Error)]
#[error("unknown urgency token: {0}")]
pub struct UrgencyParseError(pub String);

impl FromStr for Urgency {
    type Err = UrgencyParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('_', "-");
        match normalized.as_str() {
            "this-week" | "asap" => Ok(Self::ThisWeek),
            "two-weeks" | "2-weeks" => Ok(Self::TwoWeeks),
            "within-month" | "month" | "this-month" => Ok(Self::WithinMonth),
            "researching" | "no-rush" => Ok(Self::Researching),
            _ => Err(UrgencyParseError(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "kebab-case")]
pub enum Priority {
    Specialization,
    Cost,
    Speed,
    Support,
    Variety,
    Discretion,
    Location,
}

impl Priority {
    pub const ALL: [Priority; 7] = [
        Priority::Specialization,
        Priority::Cost,
        Priority::Speed,
        Priority::Support,
        Priority::Variety,
        Priority::Discretion,
        Priority::Location,
    ];

    pub fn as_slug(&self) -> &'static str {
        match self {
            Self::Specialization => "specialization",
            Self::Cost => "cost",
            Self::Speed => "speed",
            Self::Support => "support",
            Self::Variety => "variety",
            Self::Discretion => "discretion",
            Self::Location => "location",
        }
    }
}

impl Display for Priority {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let display = match self {
            Self::Specialization => "condition expertise",
            Self::Cost => "affordability",
            Self::Speed => "appointment speed",
            Self::Support => "ongoing support",
            Self::Variety => "treatment variety",
            Self::Discretion => "discretion",
            Self::Location => "location",
        };
        write!(f, "{display}")
    }
}

#[derive(Debug, Error)]
#[error("unknown priority token: {0}")]
pub struct PriorityParseError(pub String);

impl FromStr for Priority {
    type Err = PriorityParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "specialization" | "specialisation" | "expertise" => Ok(Self::Specialization),
            "cost" | "price" | "affordability" => Ok(Self::Cost),
            "speed" | "availability" => Ok(Self::Speed),
            "support" | "aftercare" => Ok(Self::Support),
            "variety" | "product-range" => Ok(Self::Variety),
            "discretion" | "privacy" => Ok(Self::Discretion),
            "location" | "proximity" => Ok(Self::Location),
            _ => Err(PriorityParseError(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugs_round_trip_through_from_str() {
        for condition in Condition::ALL {
            assert_eq!(condition.as_slug().parse::<Condition>().unwrap(), condition);
        }
        for band in BudgetBand::ALL {
            assert_eq!(band.as_slug().parse::<BudgetBand>().unwrap(), band);
        }
        for region in Region::ALL {
            assert_eq!(region.as_slug().parse::<Region>().unwrap(), region);
        }
        for urgency in Urgency::ALL {
            assert_eq!(urgency.as_slug().parse::<Urgency>().unwrap(), urgency);
        }
        for priority in Priority::ALL {
            assert_eq!(priority.as_slug().parse::<Priority>().unwrap(), priority);
        }
    }

    #[test]
    fn accepts_common_aliases() {
        assert_eq!("ms".parse::<Condition>().unwrap(), Condition::MultipleSclerosis);
        assert_eq!("500+".parse::<BudgetBand>().unwrap(), BudgetBand::Above500);
        assert_eq!("online".parse::<Region>().unwrap(), Region::Virtual);
        assert_eq!("month".parse::<Urgency>().unwrap(), Urgency::WithinMonth);
        assert_eq!("price".parse::<Priority>().unwrap(), Priority::Cost);
    }

    #[test]
    fn rejects_unknown_tokens() {
        assert!("glaucoma".parse::<Condition>().is_err());
        assert!("".parse::<Region>().is_err());
    }
}
