//! Topics and cantons
//!
//! A topic is one geodata product published per canton on geodienste.ch.
//! The set of base topics is fixed; identifiers and titles come from the
//! provider and cannot be changed.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The base topic names of the harvested geodata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BaseTopic {
    #[serde(rename = "lwb_perimeter_ln_sf")]
    PerimeterLnSf,
    #[serde(rename = "lwb_rebbaukataster")]
    Rebbaukataster,
    #[serde(rename = "lwb_perimeter_terrassenreben")]
    PerimeterTerrassenreben,
    #[serde(rename = "lwb_biodiversitaetsfoerderflaechen")]
    Biodiversitaetsfoerderflaechen,
    #[serde(rename = "lwb_bewirtschaftungseinheit")]
    Bewirtschaftungseinheit,
    #[serde(rename = "lwb_nutzungsflaechen")]
    Nutzungsflaechen,
}

impl BaseTopic {
    /// All base topics, in the order the provider query lists them.
    pub const ALL: [BaseTopic; 6] = [
        BaseTopic::PerimeterLnSf,
        BaseTopic::Rebbaukataster,
        BaseTopic::PerimeterTerrassenreben,
        BaseTopic::Biodiversitaetsfoerderflaechen,
        BaseTopic::Bewirtschaftungseinheit,
        BaseTopic::Nutzungsflaechen,
    ];

    /// Provider identifier of the topic (also the scratch directory name).
    pub fn id(self) -> &'static str {
        match self {
            BaseTopic::PerimeterLnSf => "lwb_perimeter_ln_sf",
            BaseTopic::Rebbaukataster => "lwb_rebbaukataster",
            BaseTopic::PerimeterTerrassenreben => "lwb_perimeter_terrassenreben",
            BaseTopic::Biodiversitaetsfoerderflaechen => "lwb_biodiversitaetsfoerderflaechen",
            BaseTopic::Bewirtschaftungseinheit => "lwb_bewirtschaftungseinheit",
            BaseTopic::Nutzungsflaechen => "lwb_nutzungsflaechen",
        }
    }

    /// Versioned topic name used by the provider query interface.
    pub fn topic_name(self) -> String {
        format!("{}_v2_0", self.id())
    }

    /// Human-readable title as published by the provider.
    pub fn title(self) -> &'static str {
        match self {
            BaseTopic::PerimeterLnSf => "Perimeter LN- und Sömmerungsflächen",
            BaseTopic::Rebbaukataster => "Rebbaukataster",
            BaseTopic::PerimeterTerrassenreben => "Perimeter Terrassenreben",
            BaseTopic::Biodiversitaetsfoerderflaechen => "Biodiversitätsförderflächen",
            BaseTopic::Bewirtschaftungseinheit => "Bewirtschaftungseinheit",
            BaseTopic::Nutzungsflaechen => "Nutzungsflächen",
        }
    }
}

impl fmt::Display for BaseTopic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for BaseTopic {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BaseTopic::ALL
            .into_iter()
            .find(|topic| topic.id() == s)
            .ok_or_else(|| format!("Unknown base topic: {s}"))
    }
}

/// The cantons for which geodata is processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[allow(clippy::upper_case_acronyms)]
pub enum Canton {
    AG,
    AI,
    AR,
    BE,
    BL,
    BS,
    FR,
    GE,
    GL,
    GR,
    JU,
    LU,
    NE,
    NW,
    OW,
    SG,
    SH,
    SO,
    SZ,
    TG,
    TI,
    UR,
    VD,
    VS,
    ZG,
    ZH,
}

impl Canton {
    /// All cantons, in provider query order.
    pub const ALL: [Canton; 26] = [
        Canton::AG,
        Canton::AI,
        Canton::AR,
        Canton::BE,
        Canton::BL,
        Canton::BS,
        Canton::FR,
        Canton::GE,
        Canton::GL,
        Canton::GR,
        Canton::JU,
        Canton::LU,
        Canton::NE,
        Canton::NW,
        Canton::OW,
        Canton::SG,
        Canton::SH,
        Canton::SO,
        Canton::SZ,
        Canton::TG,
        Canton::TI,
        Canton::UR,
        Canton::VD,
        Canton::VS,
        Canton::ZG,
        Canton::ZH,
    ];

    /// Two-letter canton code.
    pub fn code(self) -> &'static str {
        match self {
            Canton::AG => "AG",
            Canton::AI => "AI",
            Canton::AR => "AR",
            Canton::BE => "BE",
            Canton::BL => "BL",
            Canton::BS => "BS",
            Canton::FR => "FR",
            Canton::GE => "GE",
            Canton::GL => "GL",
            Canton::GR => "GR",
            Canton::JU => "JU",
            Canton::LU => "LU",
            Canton::NE => "NE",
            Canton::NW => "NW",
            Canton::OW => "OW",
            Canton::SG => "SG",
            Canton::SH => "SH",
            Canton::SO => "SO",
            Canton::SZ => "SZ",
            Canton::TG => "TG",
            Canton::TI => "TI",
            Canton::UR => "UR",
            Canton::VD => "VD",
            Canton::VS => "VS",
            Canton::ZG => "ZG",
            Canton::ZH => "ZH",
        }
    }
}

impl fmt::Display for Canton {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Canton {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Canton::ALL
            .into_iter()
            .find(|canton| canton.code() == s)
            .ok_or_else(|| format!("Unknown canton: {s}"))
    }
}

/// One geodata product published per canton, as listed by the provider's
/// `info/services.json` endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Topic {
    /// Base topic identifier.
    #[serde(rename = "base_topic")]
    pub base_topic: BaseTopic,

    /// Versioned topic name (e.g. `lwb_rebbaukataster_v2_0`).
    #[serde(rename = "topic")]
    pub topic_name: String,

    /// Human-readable topic title.
    pub topic_title: String,

    /// Canton publishing this topic.
    pub canton: Canton,

    /// When the canton last updated the data; `None` if the topic is not
    /// available for the canton.
    #[serde(default)]
    pub updated_at: Option<NaiveDateTime>,
}

impl Topic {
    /// Builds a topic for `base_topic` in `canton` without provider
    /// metadata. Used for auxiliary topic exports, which are not taken
    /// from the services listing.
    pub fn derived(base_topic: BaseTopic, canton: Canton) -> Self {
        Self {
            base_topic,
            topic_name: base_topic.topic_name(),
            topic_title: base_topic.title().to_string(),
            canton,
            updated_at: None,
        }
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.topic_title, self.canton)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_topic_roundtrip() {
        for topic in BaseTopic::ALL {
            assert_eq!(BaseTopic::from_str(topic.id()).unwrap(), topic);
        }
        assert!(BaseTopic::from_str("lwb_unknown").is_err());
    }

    #[test]
    fn test_topic_name_is_versioned() {
        assert_eq!(
            BaseTopic::Rebbaukataster.topic_name(),
            "lwb_rebbaukataster_v2_0"
        );
    }

    #[test]
    fn test_canton_parse() {
        assert_eq!(Canton::from_str("BE").unwrap(), Canton::BE);
        assert!(Canton::from_str("XX").is_err());
    }

    #[test]
    fn test_topic_deserialization() {
        let json = r#"{
            "base_topic": "lwb_rebbaukataster",
            "topic": "lwb_rebbaukataster_v2_0",
            "topic_title": "Rebbaukataster",
            "canton": "SH",
            "updated_at": "2024-03-31T14:23:49"
        }"#;

        let topic: Topic = serde_json::from_str(json).unwrap();
        assert_eq!(topic.base_topic, BaseTopic::Rebbaukataster);
        assert_eq!(topic.canton, Canton::SH);
        assert!(topic.updated_at.is_some());
    }

    #[test]
    fn test_topic_deserialization_without_updated_at() {
        let json = r#"{
            "base_topic": "lwb_nutzungsflaechen",
            "topic": "lwb_nutzungsflaechen_v2_0",
            "topic_title": "Nutzungsflächen",
            "canton": "ZG",
            "updated_at": null
        }"#;

        let topic: Topic = serde_json::from_str(json).unwrap();
        assert!(topic.updated_at.is_none());
    }

    #[test]
    fn test_derived_topic() {
        let topic = Topic::derived(BaseTopic::Bewirtschaftungseinheit, Canton::NE);
        assert_eq!(topic.topic_name, "lwb_bewirtschaftungseinheit_v2_0");
        assert_eq!(topic.to_string(), "Bewirtschaftungseinheit (NE)");
        assert!(topic.updated_at.is_none());
    }
}
