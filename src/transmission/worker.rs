use super::transmitter::Transmitter;
use crate::device::RadioSink;
use crate::error::{EncodeError, TxError};
use crate::protocol::Command;
use crate::utils::dump::TransmissionReport;
use crossbeam_channel::{Receiver, Sender, unbounded};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::JoinHandle;
use tracing::{debug, error};

#[derive(Debug, Clone)]
pub enum WorkerEvent {
    Started(Command),
    Finished(TransmissionReport),
    Failed { command: Command, error: String },
}

/// Runs transmissions on a background thread so a UI stays responsive.
///
/// Only one command may be outstanding; [`submit`](Self::submit) refuses a
/// second one until the first has finished or failed.
pub struct RadioWorker {
    requests: Option<Sender<Command>>,
    events: Receiver<WorkerEvent>,
    pending: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl RadioWorker {
    pub fn spawn<S: RadioSink + 'static>(transmitter: Arc<Transmitter<S>>) -> Self {
        let (req_tx, req_rx) = unbounded::<Command>();
        let (evt_tx, evt_rx) = unbounded::<WorkerEvent>();
        let pending = Arc::new(AtomicBool::new(false));
        let pending_worker = Arc::clone(&pending);

        let handle = std::thread::spawn(move || {
            for command in req_rx.iter() {
                let _ = evt_tx.send(WorkerEvent::Started(command));
                let event = match transmitter.request_transmit(command) {
                    Ok(report) => WorkerEvent::Finished(report),
                    Err(e) => {
                        error!("Transmission of {} failed: {}", command, e);
                        WorkerEvent::Failed {
                            command,
                            error: e.to_string(),
                        }
                    }
                };
                pending_worker.store(false, Ordering::Release);
                if evt_tx.send(event).is_err() {
                    break;
                }
            }
            debug!("Radio worker exiting");
        });

        Self {
            requests: Some(req_tx),
            events: evt_rx,
            pending,
            handle: Some(handle),
        }
    }

    pub fn submit(&self, command: Command) -> Result<(), TxError> {
        if self
            .pending
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            return Err(EncodeError::TransmissionInProgress.into());
        }

        let sent = self
            .requests
            .as_ref()
            .map(|tx| tx.send(command).is_ok())
            .unwrap_or(false);
        if !sent {
            self.pending.store(false, Ordering::Release);
            return Err(TxError::WorkerStopped);
        }
        Ok(())
    }

    pub fn is_busy(&self) -> bool {
        self.pending.load(Ordering::Acquire)
    }

    pub fn events(&self) -> &Receiver<WorkerEvent> {
        &self.events
    }

    /// Stop accepting commands and wait for the current one to finish.
    pub fn shutdown(mut self) {
        self.stop();
    }

    fn stop(&mut self) {
        self.requests.take();
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                error!("Radio worker panicked");
            }
        }
    }
}

impl Drop for RadioWorker {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::{MemorySink, RadioConfig};
    use crate::protocol::DeviceAddress;
    use crate::transmission::{TransmitSession, TxConfig};
    use std::time::Duration;

    fn worker(sink: MemorySink) -> RadioWorker {
        let mut session = TransmitSession::new(TxConfig {
            sample_rate: 10_000,
            baud_rate: 2500,
        })
        .unwrap();
        session
            .bind_address(DeviceAddress::parse("111000001111100001101110000111111110011").unwrap())
            .unwrap();
        let tx = Transmitter::new(
            session,
            sink,
            RadioConfig::default().with_sample_rate(10_000),
        )
        .unwrap();
        RadioWorker::spawn(Arc::new(tx))
    }

    fn wait_done(worker: &RadioWorker) -> WorkerEvent {
        loop {
            match worker
                .events()
                .recv_timeout(Duration::from_secs(5))
                .unwrap()
            {
                WorkerEvent::Started(_) => continue,
                other => return other,
            }
        }
    }

    #[test]
    fn test_submit_and_finish() {
        let sink = MemorySink::new();
        let worker = worker(sink.clone());

        worker.submit(Command::FanSpeed0).unwrap();
        match wait_done(&worker) {
            WorkerEvent::Finished(report) => {
                assert_eq!(report.command, Command::FanSpeed0);
                assert_eq!(report.frames, 4);
            }
            other => panic!("unexpected event {:?}", other),
        }
        assert!(!worker.is_busy());
        assert_eq!(sink.count(), 1);
        worker.shutdown();
    }

    #[test]
    fn test_second_submit_refused_while_busy() {
        let sink = MemorySink::new().with_air_time(Duration::from_millis(200));
        let worker = worker(sink.clone());

        worker.submit(Command::FanSpeed1).unwrap();
        let err = worker.submit(Command::FanSpeed3).unwrap_err();
        assert!(err.is_busy());

        assert!(matches!(wait_done(&worker), WorkerEvent::Finished(_)));
        worker.submit(Command::FanSpeed3).unwrap();
        assert!(matches!(wait_done(&worker), WorkerEvent::Finished(_)));

        let sent = sink.transmissions();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[1].command(), Command::FanSpeed3);
    }

    #[test]
    fn test_failure_is_reported() {
        let worker = worker(MemorySink::new());

        worker.submit(Command::Pair).unwrap();
        match wait_done(&worker) {
            WorkerEvent::Failed { command, .. } => assert_eq!(command, Command::Pair),
            other => panic!("unexpected event {:?}", other),
        }
        assert!(!worker.is_busy());
    }
}
