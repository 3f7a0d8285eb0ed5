//! One run of the acknowledgement pipeline: load, classify, verify,
//! transform, populate, persist.

use std::fmt;
use std::path::{Path, PathBuf};

use tracing::{debug, error, info, warn};

use crate::acknowledgement::{populate, BuildError, TemplateTransform, TransformError};
use crate::document::{XmlDocument, XmlError};
use crate::missive::{Missive, MissiveError, MissiveKind};
use crate::verification::{
    MissiveVerifier, VerificationClient, VerificationError, VerificationOutcome,
};

/// Stages a run moves through. `Ineligible` and `Persisted` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineState {
    Loaded,
    Classified,
    Ineligible,
    Verified,
    Transformed,
    Populated,
    Persisted,
}

impl PipelineState {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Loaded => "loaded",
            Self::Classified => "classified",
            Self::Ineligible => "ineligible",
            Self::Verified => "verified",
            Self::Transformed => "transformed",
            Self::Populated => "populated",
            Self::Persisted => "persisted",
        }
    }
}

impl fmt::Display for PipelineState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a successful run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunReport {
    Ineligible {
        kind: MissiveKind,
    },
    Persisted {
        outcome: VerificationOutcome,
        output: PathBuf,
    },
}

impl RunReport {
    pub fn state(&self) -> PipelineState {
        match self {
            Self::Ineligible { .. } => PipelineState::Ineligible,
            Self::Persisted { .. } => PipelineState::Persisted,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("unable to load missive: {0}")]
    Load(#[source] XmlError),
    #[error("invalid missive: {0}")]
    Missive(#[from] MissiveError),
    #[error("verification failed: {0}")]
    Verify(#[from] VerificationError),
    #[error("template transform failed: {0}")]
    Transform(#[from] TransformError),
    #[error("unable to populate acknowledgement: {0}")]
    Populate(#[from] BuildError),
    #[error("unable to persist acknowledgement: {0}")]
    Persist(#[source] XmlError),
}

impl PipelineError {
    /// Last state reached before the failure.
    pub fn stage(&self) -> Option<PipelineState> {
        match self {
            Self::Load(_) => None,
            Self::Missive(_) | Self::Verify(_) => Some(PipelineState::Classified),
            Self::Transform(_) => Some(PipelineState::Verified),
            Self::Populate(_) => Some(PipelineState::Transformed),
            Self::Persist(_) => Some(PipelineState::Populated),
        }
    }
}

pub struct PipelineCoordinator<C, T> {
    verifier: MissiveVerifier<C>,
    transform: T,
    template_name: String,
}

impl<C, T> PipelineCoordinator<C, T>
where
    C: VerificationClient,
    T: TemplateTransform,
{
    pub fn new(
        verifier: MissiveVerifier<C>,
        transform: T,
        template_name: impl Into<String>,
    ) -> Self {
        Self {
            verifier,
            transform,
            template_name: template_name.into(),
        }
    }

    pub fn verifier(&self) -> &MissiveVerifier<C> {
        &self.verifier
    }

    /// Nothing is written to `output` unless every stage succeeds.
    pub fn run(&self, input: &Path, output: &Path) -> Result<RunReport, PipelineError> {
        let result = self.execute(input, output);
        if let Err(err) = &result {
            let stage = err.stage().map(PipelineState::as_str).unwrap_or("start");
            error!(input = %input.display(), stage, error = %err, "acknowledgement run aborted");
        }
        result
    }

    fn execute(&self, input: &Path, output: &Path) -> Result<RunReport, PipelineError> {
        let source = XmlDocument::from_path(input).map_err(PipelineError::Load)?;
        transition(PipelineState::Loaded);

        let kind = MissiveKind::classify(&source);
        transition(PipelineState::Classified);
        if !kind.is_eligible() {
            warn!(
                message_type = kind.label(),
                "missive type is not eligible for acknowledgement"
            );
            transition(PipelineState::Ineligible);
            return Ok(RunReport::Ineligible { kind });
        }

        let missive = Missive::from_document(&source)?;
        let outcome = self.verifier.verify(&missive)?;
        info!(
            missive_id = missive.id().unwrap_or("-"),
            outcome = %outcome.summary(),
            "missive verified"
        );
        transition(PipelineState::Verified);

        let shell = self.transform.transform(&source, &self.template_name)?;
        transition(PipelineState::Transformed);

        let acknowledgement = populate(shell, &outcome)?;
        transition(PipelineState::Populated);

        acknowledgement
            .write_to(output)
            .map_err(PipelineError::Persist)?;
        info!(output = %output.display(), "acknowledgement written");
        transition(PipelineState::Persisted);

        Ok(RunReport::Persisted {
            outcome,
            output: output.to_path_buf(),
        })
    }
}

fn transition(state: PipelineState) {
    debug!(state = state.as_str(), "pipeline state");
}
