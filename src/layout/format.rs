use std::{fmt, str::FromStr};

use crate::foundation::{
    core::Canvas,
    error::{PostcompError, PostcompResult},
};

/// Named output format of a post image.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Format {
    /// 1080 x 1080 feed post.
    #[default]
    Square,
    /// 1080 x 1920 vertical story.
    Story,
    /// 1200 x 630 link-preview / landscape post.
    Landscape,
}

impl Format {
    /// Every supported format, in display order.
    pub const ALL: [Format; 3] = [Format::Square, Format::Story, Format::Landscape];

    /// Parse a format tag, failing with [`PostcompError::InvalidFormat`] for unknown tags.
    pub fn parse(tag: &str) -> PostcompResult<Self> {
        match tag {
            "square" => Ok(Self::Square),
            "story" => Ok(Self::Story),
            "landscape" => Ok(Self::Landscape),
            other => Err(PostcompError::InvalidFormat(other.to_string())),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Square => "square",
            Self::Story => "story",
            Self::Landscape => "landscape",
        }
    }

    /// Fixed pixel dimensions of this format.
    pub fn canvas(self) -> Canvas {
        match self {
            Self::Square => Canvas::new(1080, 1080),
            Self::Story => Canvas::new(1080, 1920),
            Self::Landscape => Canvas::new(1200, 630),
        }
    }
}

/// Resolve a format tag straight to its canvas dimensions.
pub fn resolve_format(tag: &str) -> PostcompResult<Canvas> {
    Format::parse(tag).map(Format::canvas)
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Format {
    type Err = PostcompError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Format {
    type Error = PostcompError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Format> for String {
    fn from(value: Format) -> Self {
        value.as_str().to_string()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layout/format.rs"]
mod tests;
