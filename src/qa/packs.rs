//! @acp:module "Domain Packs"
//! @acp:summary "Opt-in domain validation packs"
//! @acp:domain qa
//! @acp:layer service

use std::fmt;
use std::str::FromStr;

use super::{Document, QaCheck};

/// @acp:summary "Named domain validation pack"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DomainPack {
    WaterStandards,
}

impl DomainPack {
    pub fn as_str(&self) -> &'static str {
        match self {
            DomainPack::WaterStandards => "water_standards",
        }
    }

    pub fn all() -> &'static [DomainPack] {
        &[DomainPack::WaterStandards]
    }

    pub fn check(&self) -> Box<dyn QaCheck> {
        match self {
            DomainPack::WaterStandards => Box::new(WaterStandardsPack),
        }
    }
}

impl FromStr for DomainPack {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "water_standards" => Ok(DomainPack::WaterStandards),
            _ => Err(format!("Unknown validation pack: {}", s)),
        }
    }
}

impl fmt::Display for DomainPack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Resolve pack names, skipping unknown ones with a warning
pub fn resolve_packs<S: AsRef<str>>(names: &[S]) -> Vec<DomainPack> {
    let mut packs = Vec::new();
    for name in names {
        match name.as_ref().parse::<DomainPack>() {
            Ok(pack) if !packs.contains(&pack) => packs.push(pack),
            Ok(_) => {}
            Err(e) => tracing::warn!("{}", e),
        }
    }
    packs
}

/// PFAS claims need an NSF/ANSI 53 or 401 reference
#[derive(Debug, Clone, Default)]
pub struct WaterStandardsPack;

impl QaCheck for WaterStandardsPack {
    fn name(&self) -> &'static str {
        "water_standards"
    }

    fn check(&self, doc: &Document<'_>) -> Vec<String> {
        let upper = doc.text.to_uppercase();
        let mentions_pfas = upper.contains("PFAS");
        let mentions_cert = upper.contains("NSF/ANSI 53") || upper.contains("NSF/ANSI 401");
        if mentions_pfas && !mentions_cert {
            vec!["PFAS claim present but missing NSF/ANSI 53 or 401 reference.".to_string()]
        } else {
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pfas_without_cert() {
        let doc = Document::parse("This filter removes pfas.");
        assert_eq!(WaterStandardsPack.check(&doc).len(), 1);
    }

    #[test]
    fn test_pfas_with_cert() {
        let doc = Document::parse("Certified to nsf/ansi 53 for PFAS reduction.");
        assert!(WaterStandardsPack.check(&doc).is_empty());
    }

    #[test]
    fn test_resolve_packs() {
        let packs = resolve_packs(&["water-standards", "unknown", "water_standards"]);
        assert_eq!(packs, vec![DomainPack::WaterStandards]);
    }
}
