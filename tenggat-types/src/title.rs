use std::{fmt::Display, str::FromStr};

use anyhow::bail;
use serde::{Deserialize, Serialize};

/// Task title, never empty after trimming.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Title(String);

impl Title {
    pub fn validate(s: &str) -> anyhow::Result<()> {
        if s.trim().is_empty() {
            bail!("title is empty")
        }

        Ok(())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl FromStr for Title {
    type Err = anyhow::Error;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::validate(s).map(|_| Self(s.trim().to_string()))
    }
}

impl Display for Title {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for Title {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Title {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let title = String::deserialize(deserializer)?;
        Self::from_str(&title).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_titles_are_rejected() {
        assert!("".parse::<Title>().is_err());
        assert!("   \t".parse::<Title>().is_err());
    }

    #[test]
    fn titles_are_trimmed() {
        let title: Title = "  Pay rent ".parse().unwrap();
        assert_eq!(title.as_str(), "Pay rent");
    }

    #[test]
    fn deserializing_validates() {
        assert!(serde_json::from_str::<Title>("\" \"").is_err());
        let title: Title = serde_json::from_str("\"Buy milk\"").unwrap();
        assert_eq!(title.to_string(), "Buy milk");
    }
}
