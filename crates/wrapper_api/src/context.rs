use std::fmt;

/// Identity of a single build execution.
///
/// The display identifier is what wrappers should show to humans; it is the
/// only part of the build the core components depend on.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct BuildContext {
    job_name: String,
    build_number: u32,
}

impl BuildContext {
    pub fn new(job_name: impl Into<String>, build_number: u32) -> Self {
        Self {
            job_name: job_name.into(),
            build_number,
        }
    }

    pub fn job_name(&self) -> &str {
        &self.job_name
    }

    pub fn build_number(&self) -> u32 {
        self.build_number
    }

    /// Identifier used to prefix mirrored log records, e.g. `deploy#42`.
    pub fn display_id(&self) -> String {
        format!("{}#{}", self.job_name, self.build_number)
    }
}

impl fmt::Display for BuildContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.job_name, self.build_number)
    }
}
