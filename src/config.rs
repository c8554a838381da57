use std::fmt;

use crate::error::Error;

pub const DEFAULT_FONT: &str = "FangSong";

/// Environment variable consulted by the CLI when `--font` is not given.
pub const FONT_ENV_VAR: &str = "DOCX_CJK_FONT";

/// East Asian font family to assign, written exactly as given.
/// Never empty or whitespace-only.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FontName(String);

impl FontName {
    pub fn new(name: &str) -> Result<Self, Error> {
        if name.trim().is_empty() {
            return Err(Error::EmptyFontName);
        }
        Ok(FontName(name.to_string()))
    }

    /// An explicit name wins and must be valid. Otherwise a usable
    /// environment value is taken, then the default.
    pub fn resolve(explicit: Option<&str>, env_value: Option<&str>) -> Result<Self, Error> {
        if let Some(name) = explicit {
            return FontName::new(name);
        }
        Ok(env_value
            .and_then(|val| FontName::new(val).ok())
            .unwrap_or_default())
    }

    /// [`FontName::resolve`] against `DOCX_CJK_FONT`.
    pub fn resolve_with_env(explicit: Option<&str>) -> Result<Self, Error> {
        let env_value = std::env::var(FONT_ENV_VAR).ok();
        FontName::resolve(explicit, env_value.as_deref())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for FontName {
    fn default() -> Self {
        FontName(DEFAULT_FONT.to_string())
    }
}

impl fmt::Display for FontName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for FontName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FontName::new(s)
    }
}
