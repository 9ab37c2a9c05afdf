/// The four inference routes of the ML service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PredictionKind {
    Yield,
    Recommendation,
    Price,
    PestRisk,
}

impl PredictionKind {
    pub const ALL: [PredictionKind; 4] = [
        PredictionKind::Yield,
        PredictionKind::Recommendation,
        PredictionKind::Price,
        PredictionKind::PestRisk,
    ];

    /// Path on the ML service, relative to its base URL.
    pub fn upstream_path(&self) -> &'static str {
        match self {
            PredictionKind::Yield => "/predict",
            PredictionKind::Recommendation => "/recommend",
            PredictionKind::Price => "/predict-price",
            PredictionKind::PestRisk => "/pest-risk",
        }
    }

    /// The single message every upstream failure is flattened to.
    pub fn failure_message(&self) -> &'static str {
        match self {
            PredictionKind::Yield => "Prediction failed",
            PredictionKind::Recommendation => "Recommendation failed",
            PredictionKind::Price => "Price prediction failed",
            PredictionKind::PestRisk => "Pest risk prediction failed",
        }
    }

    /// Metrics / log label
    pub fn as_str(&self) -> &'static str {
        match self {
            PredictionKind::Yield => "yield",
            PredictionKind::Recommendation => "recommend",
            PredictionKind::Price => "price",
            PredictionKind::PestRisk => "pest_risk",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upstream_paths_are_distinct() {
        let mut paths: Vec<_> = PredictionKind::ALL.iter().map(|k| k.upstream_path()).collect();
        paths.sort();
        paths.dedup();
        assert_eq!(paths.len(), 4);
        assert_eq!(PredictionKind::Yield.upstream_path(), "/predict");
    }
}
