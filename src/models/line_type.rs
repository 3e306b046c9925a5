use serde::{Deserialize, Serialize};
use std::fmt;

/// The game segment a quote applies to.
///
/// Codes the feed sends that we don't know about are kept as `Unknown(n)` so
/// they still round-trip and render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "i32", into = "i32")]
pub enum LineType {
    FullGame,
    FirstHalf,
    SecondHalf,
    Period1,
    Period2,
    Period3,
    Period4,
    Unknown(i32),
}

impl LineType {
    pub fn code(self) -> i32 {
        match self {
            LineType::FullGame => 1,
            LineType::FirstHalf => 2,
            LineType::SecondHalf => 3,
            LineType::Period1 => 4,
            LineType::Period2 => 5,
            LineType::Period3 => 6,
            LineType::Period4 => 7,
            LineType::Unknown(code) => code,
        }
    }

    pub fn label(self) -> String {
        match self {
            LineType::FullGame => "Full Game".to_string(),
            LineType::FirstHalf => "1st Half".to_string(),
            LineType::SecondHalf => "2nd Half".to_string(),
            LineType::Period1 => "1st Period".to_string(),
            LineType::Period2 => "2nd Period".to_string(),
            LineType::Period3 => "3rd Period".to_string(),
            LineType::Period4 => "4th Period".to_string(),
            LineType::Unknown(code) => format!("Unknown({})", code),
        }
    }
}

impl From<i32> for LineType {
    fn from(code: i32) -> Self {
        match code {
            1 => LineType::FullGame,
            2 => LineType::FirstHalf,
            3 => LineType::SecondHalf,
            4 => LineType::Period1,
            5 => LineType::Period2,
            6 => LineType::Period3,
            7 => LineType::Period4,
            other => LineType::Unknown(other),
        }
    }
}

impl From<LineType> for i32 {
    fn from(line_type: LineType) -> Self {
        line_type.code()
    }
}

impl fmt::Display for LineType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_codes_round_trip() {
        for code in 1..=7 {
            assert_eq!(LineType::from(code).code(), code);
        }
        assert_eq!(LineType::from(1), LineType::FullGame);
        assert_eq!(LineType::from(3).label(), "2nd Half");
    }

    #[test]
    fn test_unknown_code_label() {
        let line_type = LineType::from(42);
        assert_eq!(line_type, LineType::Unknown(42));
        assert_eq!(line_type.label(), "Unknown(42)");
        assert_eq!(line_type.code(), 42);
    }

    #[test]
    fn test_serde_uses_numeric_code() {
        let json = serde_json::to_string(&LineType::Period2).unwrap();
        assert_eq!(json, "5");
        let parsed: LineType = serde_json::from_str("99").unwrap();
        assert_eq!(parsed, LineType::Unknown(99));
    }
}
