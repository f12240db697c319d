//! Startup configuration: where the artifacts live and how to regenerate them.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::models::Artifact;

/// Default program used to run the notebook.
pub const DEFAULT_PROGRAM: &str = "python";

/// Default script handed to [`DEFAULT_PROGRAM`].
pub const DEFAULT_SCRIPT: &str = "run_notebook.py";

/// Fixed locations of the four artifacts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    pub tide_file: PathBuf,
    pub waikane_stream_file: PathBuf,
    pub waiahole_stream_file: PathBuf,
    pub tide_curve_file: PathBuf,
}

impl ArtifactPaths {
    /// Lay out all artifacts under `dir` using the file names the notebook writes.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            tide_file: dir.join(Artifact::WaikaneTides.file_name()),
            waikane_stream_file: dir.join(Artifact::WaikaneStream.file_name()),
            waiahole_stream_file: dir.join(Artifact::WaiaholeStream.file_name()),
            tide_curve_file: dir.join(Artifact::WaikaneTideCurve.file_name()),
        }
    }

    pub fn path_for(&self, artifact: Artifact) -> &Path {
        match artifact {
            Artifact::WaikaneTides => &self.tide_file,
            Artifact::WaikaneStream => &self.waikane_stream_file,
            Artifact::WaiaholeStream => &self.waiahole_stream_file,
            Artifact::WaikaneTideCurve => &self.tide_curve_file,
        }
    }
}

/// How to launch the external computation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotebookConfig {
    pub program: String,
    pub args: Vec<String>,
    /// Directory the program runs in. The notebook reads its inputs and
    /// writes the artifacts relative to this.
    pub working_dir: PathBuf,
    /// Kill the run after this long. `None` waits indefinitely.
    pub timeout: Option<Duration>,
}

impl NotebookConfig {
    pub fn new(program: impl Into<String>, working_dir: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            working_dir: working_dir.into(),
            timeout: None,
        }
    }

    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// `python run_notebook.py` in `working_dir`.
    pub fn python_default(working_dir: impl Into<PathBuf>) -> Self {
        Self::new(DEFAULT_PROGRAM, working_dir).with_args([DEFAULT_SCRIPT])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_dir_places_every_artifact_under_the_directory() {
        let paths = ArtifactPaths::in_dir("/srv/flood");
        for artifact in Artifact::ALL {
            let path = paths.path_for(artifact);
            assert_eq!(path.parent(), Some(Path::new("/srv/flood")));
            assert_eq!(
                path.file_name().and_then(|n| n.to_str()),
                Some(artifact.file_name())
            );
        }
    }

    #[test]
    fn python_default_runs_the_notebook_script() {
        let config = NotebookConfig::python_default("/srv/flood");
        assert_eq!(config.program, "python");
        assert_eq!(config.args, vec!["run_notebook.py".to_string()]);
        assert_eq!(config.working_dir, PathBuf::from("/srv/flood"));
        assert!(config.timeout.is_none());
    }
}
