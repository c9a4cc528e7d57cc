// src/services/gate.rs
//! Landing-page check of a display name against a registration code. This
//! is a static lookup table for the demo, not an authentication system.

use thiserror::Error;

use crate::views::View;

pub const INVALID_CREDENTIALS: &str = "Invalid Name or Registration Number";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum GateError {
    #[error("Invalid Name or Registration Number")]
    InvalidCredentials,

    #[error("malformed allow-list entry: {0}")]
    MalformedEntry(String),
}

#[derive(Debug, Clone)]
pub struct SessionGate {
    allow_list: Vec<(String, String)>,
}

impl Default for SessionGate {
    fn default() -> Self {
        Self::new([("Demo Maker", "12300001"), ("Guest Builder", "12300002")])
    }
}

impl SessionGate {
    pub fn new<I, N, C>(entries: I) -> Self
    where
        I: IntoIterator<Item = (N, C)>,
        N: Into<String>,
        C: Into<String>,
    {
        Self {
            allow_list: entries
                .into_iter()
                .map(|(n, c)| (n.into(), c.into()))
                .collect(),
        }
    }

    /// Parses `Name=code;Other Name=code`. Empty segments are skipped.
    pub fn parse(spec: &str) -> Result<Self, GateError> {
        let mut entries = Vec::new();
        for segment in spec.split(';').map(str::trim).filter(|s| !s.is_empty()) {
            let (name, code) = segment
                .split_once('=')
                .ok_or_else(|| GateError::MalformedEntry(segment.to_string()))?;
            let (name, code) = (name.trim(), code.trim());
            if name.is_empty() || code.is_empty() {
                return Err(GateError::MalformedEntry(segment.to_string()));
            }
            entries.push((name.to_string(), code.to_string()));
        }
        Ok(Self::new(entries))
    }

    /// Exact, case-sensitive match on both fields.
    pub fn verify(&self, name: &str, code: &str) -> Result<View, GateError> {
        if self.allow_list.iter().any(|(n, c)| n == name && c == code) {
            Ok(View::Home)
        } else {
            Err(GateError::InvalidCredentials)
        }
    }

    pub fn len(&self) -> usize {
        self.allow_list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.allow_list.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matching_pair_goes_home() {
        let gate = SessionGate::new([("Umang", "12305833")]);
        assert_eq!(gate.verify("Umang", "12305833"), Ok(View::Home));
        assert_eq!(gate.verify("umang", "12305833"), Err(GateError::InvalidCredentials));
        assert_eq!(gate.verify("Umang", "1"), Err(GateError::InvalidCredentials));
    }

    #[test]
    fn parses_env_format() {
        let gate = SessionGate::parse(" Ada Lovelace=1 ; Alan=2;").unwrap();
        assert_eq!(gate.len(), 2);
        assert!(gate.verify("Ada Lovelace", "1").is_ok());
        assert_eq!(
            SessionGate::parse("nobody").unwrap_err(),
            GateError::MalformedEntry("nobody".to_string())
        );
    }

    #[test]
    fn error_text_matches_login_form() {
        assert_eq!(GateError::InvalidCredentials.to_string(), INVALID_CREDENTIALS);
    }
}
