use std::fmt;

/// Direction of the move since the previous observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PercentChangeType {
    Increased,
    Decreased,
    /// Equal price, or no prior observation.
    #[default]
    Default,
}

impl PercentChangeType {
    pub fn sign(self) -> &'static str {
        match self {
            Self::Increased => "+",
            Self::Decreased => "-",
            Self::Default => "",
        }
    }
}

impl fmt::Display for PercentChangeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Increased => write!(f, "increased"),
            Self::Decreased => write!(f, "decreased"),
            Self::Default => write!(f, "default"),
        }
    }
}

/// Per-symbol record produced by one completed fetch cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceSnapshot {
    pub symbol: String,
    pub price: f64,
    pub change_type: PercentChangeType,
    /// Unsigned magnitude, already formatted for display.
    pub change: String,
    pub label: Option<String>,
}

impl PriceSnapshot {
    /// Zero-state record shown for a tracked symbol missing from the store.
    pub fn fallback(symbol: &str, label: Option<&str>) -> Self {
        Self {
            symbol: symbol.to_string(),
            price: 0.0,
            change_type: PercentChangeType::Default,
            change: "0".to_string(),
            label: label.map(str::to_string),
        }
    }

    /// `+1.2345%`, `-1.2345%` or `0.0000%`.
    pub fn signed_change(&self) -> String {
        format!("{}{}%", self.change_type.sign(), self.change)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signed_change_prefixes_direction() {
        let mut snap = PriceSnapshot::fallback("BTCBUSD", Some("BTC/BUSD"));
        assert_eq!(snap.signed_change(), "0%");

        snap.change = "10.0000".to_string();
        snap.change_type = PercentChangeType::Increased;
        assert_eq!(snap.signed_change(), "+10.0000%");

        snap.change_type = PercentChangeType::Decreased;
        assert_eq!(snap.signed_change(), "-10.0000%");
    }

    #[test]
    fn fallback_is_zero_state() {
        let snap = PriceSnapshot::fallback("ETHBUSD", None);
        assert_eq!(snap.price, 0.0);
        assert_eq!(snap.change_type, PercentChangeType::Default);
        assert_eq!(snap.change, "0");
        assert!(snap.label.is_none());
    }
}
