use serde::{Deserialize, Serialize};
use wrapper_api::{
    BoxWriter, BuildContext, BuildWrapper, WrapperDescriptor, WrapperError, WrapperFactory,
    WrapperRegistry,
};

use crate::sink::{LineLoggingSink, RecordSink, TracingRecordSink};
use crate::tee::TeeWriter;

pub static DESCRIPTOR: WrapperDescriptor = WrapperDescriptor {
    id: "job-log-tee",
    display_name: "Mirror console output to the host log",
    description: "Tees each build's console output into the tracing subscriber, \
                  prefixed with the build id.",
};

/// Host-persisted settings for the job log tee wrapper.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JobLogSettings {
    /// Drop records that are empty after trimming instead of logging the
    /// bare prefix.
    pub suppress_empty: bool,
}

impl Default for JobLogSettings {
    fn default() -> Self {
        Self {
            suppress_empty: true,
        }
    }
}

/// The tee installer: at build setup it splices a fresh [`LineLoggingSink`]
/// into the build's output stream. One sink per build execution, owned by
/// the tee and dropped with it when the build's writer closes.
pub struct JobLogWrapper<S = TracingRecordSink> {
    suppress_empty: bool,
    records: S,
}

impl JobLogWrapper {
    pub fn new(settings: JobLogSettings) -> Self {
        Self::with_record_sink(settings, TracingRecordSink)
    }
}

impl<S> JobLogWrapper<S>
where
    S: RecordSink + Clone + Sync + 'static,
{
    /// Route records into an explicit sink instead of the process-wide
    /// `tracing` subscriber. Each decorated build receives its own clone.
    pub fn with_record_sink(settings: JobLogSettings, records: S) -> Self {
        Self {
            suppress_empty: settings.suppress_empty,
            records,
        }
    }

    pub fn suppress_empty(&self) -> bool {
        self.suppress_empty
    }
}

impl<S> BuildWrapper for JobLogWrapper<S>
where
    S: RecordSink + Clone + Sync + 'static,
{
    fn descriptor(&self) -> &'static WrapperDescriptor {
        &DESCRIPTOR
    }

    fn decorate_writer(
        &self,
        build: &BuildContext,
        writer: BoxWriter,
    ) -> Result<BoxWriter, WrapperError> {
        let sink = LineLoggingSink::with_suppress_empty(
            &build.display_id(),
            self.suppress_empty,
            self.records.clone(),
        );
        Ok(Box::new(TeeWriter::new(writer, sink)))
    }
}

pub struct JobLogWrapperFactory;

impl WrapperFactory for JobLogWrapperFactory {
    fn descriptor(&self) -> &'static WrapperDescriptor {
        &DESCRIPTOR
    }

    fn build(&self, settings: Option<&toml::Value>) -> Result<Box<dyn BuildWrapper>, WrapperError> {
        let settings = match settings {
            Some(value) => {
                value
                    .clone()
                    .try_into::<JobLogSettings>()
                    .map_err(|err| WrapperError::InvalidSettings {
                        id: DESCRIPTOR.id.to_string(),
                        message: err.to_string(),
                    })?
            }
            None => JobLogSettings::default(),
        };
        Ok(Box::new(JobLogWrapper::new(settings)))
    }
}

/// Install the wrapper into the host registry at startup.
pub fn register(registry: &mut WrapperRegistry) -> Result<(), WrapperError> {
    registry.register(JobLogWrapperFactory)
}
