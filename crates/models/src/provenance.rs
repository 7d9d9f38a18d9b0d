use serde::{Deserialize, Serialize};

/// Provenance records the origin of the last change to a provisioned resource.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Provenance {
    /// The resource carries no recorded origin.
    #[default]
    None,
    /// The resource was last changed through the provisioning API.
    Api,
    /// The resource was last changed by file provisioning.
    File,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
#[error("unrecognized provenance {0:?} (expected one of \"\", \"api\", or \"file\")")]
pub struct UnknownProvenance(pub String);

impl Provenance {
    pub fn name(&self) -> &'static str {
        match self {
            Provenance::None => "",
            Provenance::Api => "api",
            Provenance::File => "file",
        }
    }

    pub fn all() -> &'static [Provenance] {
        &[Provenance::None, Provenance::Api, Provenance::File]
    }
}

impl std::fmt::Display for Provenance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Provenance::None => f.write_str("none"),
            other => f.write_str(other.name()),
        }
    }
}

impl std::str::FromStr for Provenance {
    type Err = UnknownProvenance;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name {
            // "none" is accepted as an explicit spelling of the empty provenance.
            "" | "none" => Ok(Provenance::None),
            "api" => Ok(Provenance::Api),
            "file" => Ok(Provenance::File),
            other => Err(UnknownProvenance(other.to_string())),
        }
    }
}

impl TryFrom<String> for Provenance {
    type Error = UnknownProvenance;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Provenance> for String {
    fn from(value: Provenance) -> Self {
        value.name().to_string()
    }
}

/// ResourceKind is a kind of provisioned resource to which a Provenance is attached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ResourceKind {
    /// The notification policy tree of an organization.
    PolicyTree,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
#[error("unrecognized resource kind {0:?}")]
pub struct UnknownResourceKind(pub String);

impl ResourceKind {
    pub fn name(&self) -> &'static str {
        match self {
            ResourceKind::PolicyTree => "route",
        }
    }
}

impl std::str::FromStr for ResourceKind {
    type Err = UnknownResourceKind;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name {
            "route" => Ok(ResourceKind::PolicyTree),
            other => Err(UnknownResourceKind(other.to_string())),
        }
    }
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod test {
    use super::{Provenance, ResourceKind};

    #[test]
    fn test_provenance_names_round_trip() {
        for p in Provenance::all() {
            assert_eq!(p.name().parse::<Provenance>().unwrap(), *p);
            let json = serde_json::to_string(p).unwrap();
            assert_eq!(serde_json::from_str::<Provenance>(&json).unwrap(), *p);
        }
        assert_eq!("none".parse::<Provenance>().unwrap(), Provenance::None);
        assert_eq!(Provenance::default(), Provenance::None);
    }

    #[test]
    fn test_unrecognized_provenance_is_an_error() {
        let err = "API".parse::<Provenance>().unwrap_err();
        insta::assert_snapshot!(err, @r###"unrecognized provenance "API" (expected one of "", "api", or "file")"###);

        assert!(serde_json::from_str::<Provenance>(r#""converted_prometheus""#).is_err());
    }

    #[test]
    fn test_resource_kinds() {
        assert_eq!("route".parse::<ResourceKind>().unwrap(), ResourceKind::PolicyTree);
        assert!("contact_point".parse::<ResourceKind>().is_err());
    }
}
