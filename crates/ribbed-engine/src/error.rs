//! Error types for the sculpture pipeline

use thiserror::Error;

/// Result type alias using the engine's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while resolving parameters and building sculptures
#[derive(Error, Debug)]
pub enum Error {
    /// A geometry step failed; `stage` names the rail, sweep or rib set
    #[error("{stage}: {source}")]
    Geometry {
        stage: String,
        #[source]
        source: ribbed_core::Error,
    },

    /// A parameter was unknown, missing, of the wrong kind or out of range
    #[error("Parameter '{name}': {reason}")]
    Parameter { name: String, reason: String },

    /// No built-in sculpture has this name
    #[error("Unknown sculpture '{0}'")]
    UnknownSculpture(String),

    /// Building a sculpture failed
    #[error("Sculpture '{name}' failed: {source}")]
    Sculpture {
        name: String,
        #[source]
        source: Box<Error>,
    },
}

impl Error {
    pub fn parameter(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::Parameter {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// The geometry error underneath any context, if there is one
    pub fn geometry_cause(&self) -> Option<&ribbed_core::Error> {
        match self {
            Error::Geometry { source, .. } => Some(source.root_cause()),
            Error::Sculpture { source, .. } => source.geometry_cause(),
            Error::Parameter { .. } | Error::UnknownSculpture(_) => None,
        }
    }
}

/// Attach the name of the build stage to geometry errors
pub trait GeometryContext<T> {
    fn stage(self, stage: impl Into<String>) -> Result<T>;
}

impl<T> GeometryContext<T> for ribbed_core::Result<T> {
    fn stage(self, stage: impl Into<String>) -> Result<T> {
        self.map_err(|source| Error::Geometry {
            stage: stage.into(),
            source,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn stage_wraps_core_errors() {
        let result: ribbed_core::Result<()> =
            Err(ribbed_core::Error::InvalidInterval("bad".into()).in_rib(4));
        let err = result.stage("rib set 2").unwrap_err();

        assert_eq!(
            err.to_string(),
            "rib set 2: Rib 4 failed: Invalid interval: bad"
        );
        assert!(matches!(
            err.geometry_cause(),
            Some(ribbed_core::Error::InvalidInterval(_))
        ));
    }

    #[test]
    fn sculpture_context_keeps_cause() {
        let inner = Error::Geometry {
            stage: "rail".into(),
            source: ribbed_core::Error::DegenerateCurve {
                curve: "polyline",
                t: 0.0,
            },
        };
        let err = Error::Sculpture {
            name: "arch".into(),
            source: Box::new(inner),
        };
        assert!(err.to_string().starts_with("Sculpture 'arch' failed: rail:"));
        assert!(err.geometry_cause().is_some());
    }
}
