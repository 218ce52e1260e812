//! Fully qualified resource references (`package:type/name`)

use std::{fmt, str::FromStr, sync::LazyLock};

use regex::Regex;
use thiserror::Error;

static RESOURCE_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(.*?):(.*?)/(.*?)$").expect("resource name pattern is valid")
});

/// A resource reference such as `com.example.app:string/title`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResourceName {
    package: String,
    resource_type: String,
    name: String,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResourceNameError {
    #[error("bad resource name, doesn't match package:type/name")]
    Malformed(String),
}

impl ResourceName {
    #[must_use]
    pub fn package(&self) -> &str {
        &self.package
    }

    #[must_use]
    pub fn resource_type(&self) -> &str {
        &self.resource_type
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The `type/name` part, which is how resource tables key their entries
    #[must_use]
    pub fn entry(&self) -> String {
        format!("{}/{}", self.resource_type, self.name)
    }
}

impl FromStr for ResourceName {
    type Err = ResourceNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let captures = RESOURCE_NAME
            .captures(s)
            .ok_or_else(|| ResourceNameError::Malformed(s.to_string()))?;

        Ok(Self {
            package: captures[1].to_string(),
            resource_type: captures[2].to_string(),
            name: captures[3].to_string(),
        })
    }
}

impl fmt::Display for ResourceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}/{}", self.package, self.resource_type, self.name)
    }
}
