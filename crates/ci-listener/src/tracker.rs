use std::collections::HashMap;
use std::io::Write;
use std::sync::Mutex;

use tracing::{debug, warn};

use crate::error::{ListenerError, ListenerResult};
use crate::job::{JobId, JobKind};
use crate::progress::{Marker, ProgressSink};

/// Thread-safe map of live jobs to their kind.
///
/// Lookups that emit a marker hold the job lock across the emit, so a
/// marker is always written while its job is still present.
#[derive(Debug, Default)]
pub struct JobTracker {
    jobs: Mutex<HashMap<JobId, JobKind>>,
}

impl JobTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a job. Emits nothing.
    pub fn register(&self, id: JobId, kind: JobKind) -> ListenerResult<()> {
        let mut jobs = self.jobs.lock().map_err(|_| ListenerError::LockPoisoned)?;
        debug!(job = %id, kind = ?kind, "job registered");
        if let Some(prev) = jobs.insert(id.clone(), kind) {
            warn!(job = %id, previous = ?prev, "job id re-registered while live");
        }
        Ok(())
    }

    pub fn activate<W: Write>(&self, id: &JobId, sink: &ProgressSink<W>) -> ListenerResult<()> {
        let jobs = self.jobs.lock().map_err(|_| ListenerError::LockPoisoned)?;
        let kind = *jobs
            .get(id)
            .ok_or_else(|| ListenerError::UnknownJob { id: id.clone() })?;
        sink.emit(Marker::Open(kind))
    }

    /// Progress carries no lookup; the payload is ignored.
    pub fn tick<W: Write>(&self, _id: &JobId, sink: &ProgressSink<W>) -> ListenerResult<()> {
        sink.emit(Marker::Tick)
    }

    /// Emit the close marker, then drop the job.
    pub fn remove<W: Write>(&self, id: &JobId, sink: &ProgressSink<W>) -> ListenerResult<()> {
        let mut jobs = self.jobs.lock().map_err(|_| ListenerError::LockPoisoned)?;
        sink.emit(Marker::Close)?;
        match jobs.remove(id) {
            Some(kind) => {
                debug!(job = %id, kind = ?kind, "job removed");
                Ok(())
            }
            None => Err(ListenerError::UnknownJob { id: id.clone() }),
        }
    }

    pub fn kind_of(&self, id: &JobId) -> ListenerResult<Option<JobKind>> {
        let jobs = self.jobs.lock().map_err(|_| ListenerError::LockPoisoned)?;
        Ok(jobs.get(id).copied())
    }

    pub fn len(&self) -> ListenerResult<usize> {
        let jobs = self.jobs.lock().map_err(|_| ListenerError::LockPoisoned)?;
        Ok(jobs.len())
    }

    pub fn is_empty(&self) -> ListenerResult<bool> {
        Ok(self.len()? == 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn output(sink: ProgressSink<Vec<u8>>) -> String {
        String::from_utf8(sink.into_inner().unwrap()).unwrap()
    }

    #[test]
    fn register_is_silent() {
        let tracker = JobTracker::new();
        let sink = ProgressSink::new(Vec::new());
        tracker.register("j1".into(), JobKind::Update).unwrap();
        assert_eq!(tracker.kind_of(&"j1".into()).unwrap(), Some(JobKind::Update));
        assert_eq!(output(sink), "");
    }

    #[test]
    fn activate_unknown_job_fails_without_output() {
        let tracker = JobTracker::new();
        let sink = ProgressSink::new(Vec::new());
        let err = tracker.activate(&"ghost".into(), &sink).unwrap_err();
        assert!(matches!(err, ListenerError::UnknownJob { ref id } if id.as_str() == "ghost"));
        assert_eq!(output(sink), "");
    }

    #[test]
    fn remove_emits_then_forgets() {
        let tracker = JobTracker::new();
        let sink = ProgressSink::new(Vec::new());
        let id = JobId::from("j1");
        tracker.register(id.clone(), JobKind::Validate).unwrap();
        tracker.remove(&id, &sink).unwrap();
        assert!(tracker.is_empty().unwrap());
        assert!(tracker.activate(&id, &sink).is_err());
        assert_eq!(output(sink), ")");
    }

    #[test]
    fn remove_unknown_job_still_emits_close() {
        let tracker = JobTracker::new();
        let sink = ProgressSink::new(Vec::new());
        let err = tracker.remove(&"ghost".into(), &sink).unwrap_err();
        assert!(matches!(err, ListenerError::UnknownJob { .. }));
        assert_eq!(output(sink), ")");
    }

    #[test]
    fn reregistering_keeps_single_entry() {
        let tracker = JobTracker::new();
        tracker.register("j1".into(), JobKind::Fuzz).unwrap();
        tracker.register("j1".into(), JobKind::Reduce).unwrap();
        assert_eq!(tracker.len().unwrap(), 1);
        assert_eq!(tracker.kind_of(&"j1".into()).unwrap(), Some(JobKind::Reduce));
    }

    #[test]
    fn id_is_reusable_after_removal() {
        let tracker = JobTracker::new();
        let sink = ProgressSink::new(Vec::new());
        let id = JobId::from("j1");
        tracker.register(id.clone(), JobKind::Fuzz).unwrap();
        tracker.remove(&id, &sink).unwrap();
        tracker.register(id.clone(), JobKind::Update).unwrap();
        tracker.activate(&id, &sink).unwrap();
        assert_eq!(output(sink), ")(u");
    }
}
