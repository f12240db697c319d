/// One of the JSON datasets produced by the flood-visuals notebook.
///
/// Every artifact lives at a fixed path in the data directory and is served
/// verbatim. Nothing here knows what the documents contain; the notebook owns
/// their shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Artifact {
    /// Observed water levels at the Waikane tide gauge.
    WaikaneTides,
    /// Stream height readings for Waikane stream.
    WaikaneStream,
    /// Stream height readings for Waiahole stream.
    WaiaholeStream,
    /// Predicted tide curve derived from the Waikane observations.
    WaikaneTideCurve,
}

impl Artifact {
    pub const ALL: [Artifact; 4] = [
        Self::WaikaneTides,
        Self::WaikaneStream,
        Self::WaiaholeStream,
        Self::WaikaneTideCurve,
    ];

    /// Route segment under `/api`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::WaikaneTides => "waikane_tides",
            Self::WaikaneStream => "waikane_stream",
            Self::WaiaholeStream => "waiahole_stream",
            Self::WaikaneTideCurve => "waikane_tide_curve",
        }
    }

    /// File name the notebook writes this artifact to.
    pub fn file_name(&self) -> &'static str {
        match self {
            Self::WaikaneTides => "Waikane_Tide_Data.json",
            Self::WaikaneStream => "Waikane_Stream_data.json",
            Self::WaiaholeStream => "Waiahole_Stream_data.json",
            Self::WaikaneTideCurve => "Waikane_Tide_Curve.json",
        }
    }

    pub fn route(&self) -> String {
        format!("/api/{}", self.as_str())
    }
}

impl std::fmt::Display for Artifact {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn routes_live_under_api() {
        assert_eq!(Artifact::WaikaneTides.route(), "/api/waikane_tides");
        assert_eq!(Artifact::WaikaneTideCurve.route(), "/api/waikane_tide_curve");
    }

    #[test]
    fn file_names_are_distinct() {
        let mut names: Vec<_> = Artifact::ALL.iter().map(|a| a.file_name()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), 4);
    }
}
