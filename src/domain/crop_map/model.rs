use serde::Deserialize;

/// One (State, Crop) pair of the reference table.
///
/// Deserializes from the export format `{"State": "...", "Crop": "..."}`;
/// lowercase keys are accepted too.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StateCrop {
    #[serde(rename = "State", alias = "state")]
    pub state: String,
    #[serde(rename = "Crop", alias = "crop")]
    pub crop: String,
}

impl StateCrop {
    pub fn new(state: impl Into<String>, crop: impl Into<String>) -> Self {
        Self {
            state: state.into(),
            crop: crop.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_export_and_lowercase_keys() {
        let raw = r#"[{"State": "Punjab", "Crop": "Wheat"}, {"state": "Kerala", "crop": "Rice"}]"#;
        let records: Vec<StateCrop> = serde_json::from_str(raw).unwrap();
        assert_eq!(
            records,
            vec![StateCrop::new("Punjab", "Wheat"), StateCrop::new("Kerala", "Rice")]
        );
    }
}
