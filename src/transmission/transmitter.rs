use super::session::TransmitSession;
use crate::device::{RadioConfig, RadioSink};
use crate::error::{EncodeError, TxError};
use crate::protocol::{Command, DeviceAddress};
use crate::utils::dump::TransmissionReport;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::{info, warn};

/// Marks a transmission in flight until dropped
struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    fn acquire(flag: &'a AtomicBool) -> Result<Self, EncodeError> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map(|_| InFlight(flag))
            .map_err(|_| EncodeError::TransmissionInProgress)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    // session and sink hold no invariants a panicking holder could break
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Encodes a command and hands the buffer to the sink, one request at a time.
///
/// A request arriving while another one is in flight fails immediately with
/// [`EncodeError::TransmissionInProgress`] instead of queueing.
pub struct Transmitter<S: RadioSink> {
    session: Mutex<TransmitSession>,
    sink: Mutex<S>,
    radio: RadioConfig,
    in_flight: AtomicBool,
}

impl<S: RadioSink> Transmitter<S> {
    /// Configure `sink` and take ownership of an already bound `session`.
    pub fn new(
        session: TransmitSession,
        mut sink: S,
        radio: RadioConfig,
    ) -> Result<Self, TxError> {
        if session.address().is_none() {
            return Err(EncodeError::MissingAddress.into());
        }
        if session.config().sample_rate != radio.sample_rate {
            warn!(
                "Session encodes at {} S/s, radio configured for {} S/s",
                session.config().sample_rate,
                radio.sample_rate
            );
        }
        sink.configure(&radio)?;

        Ok(Self {
            session: Mutex::new(session),
            sink: Mutex::new(sink),
            radio,
            in_flight: AtomicBool::new(false),
        })
    }

    pub fn radio_config(&self) -> &RadioConfig {
        &self.radio
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    pub fn address(&self) -> Option<DeviceAddress> {
        lock(&self.session).address().cloned()
    }

    /// Encode `command` and transmit it. Returns once the sink is done.
    pub fn request_transmit(&self, command: Command) -> Result<TransmissionReport, TxError> {
        let _in_flight = InFlight::acquire(&self.in_flight)?;

        let (buffer, address) = {
            let mut session = lock(&self.session);
            session.encode(command)?;
            let address = session
                .address()
                .map(|a| a.to_string())
                .unwrap_or_default();
            (session.take_buffer()?, address)
        };
        let report = TransmissionReport::from_buffer(&buffer, address);

        info!("TX start: {}", command);
        lock(&self.sink).transmit(&buffer)?;
        info!("TX end: {} ({:.3} s of air time)", command, report.duration_secs);

        Ok(report)
    }

    /// Switch to another receiver. Refused while a transmission is in flight.
    pub fn rebind(&self, address: DeviceAddress) -> Result<(), TxError> {
        let _in_flight = InFlight::acquire(&self.in_flight)?;
        lock(&self.session).rebind_address(address)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::MemorySink;
    use crate::transmission::TxConfig;
    use std::sync::Arc;
    use std::time::Duration;

    fn config() -> TxConfig {
        TxConfig {
            sample_rate: 10_000,
            baud_rate: 2500,
        }
    }

    fn transmitter(sink: MemorySink) -> Transmitter<MemorySink> {
        let mut session = TransmitSession::new(config()).unwrap();
        session
            .bind_address(DeviceAddress::parse("1110000011111").unwrap())
            .unwrap();
        Transmitter::new(
            session,
            sink,
            RadioConfig::default().with_sample_rate(10_000),
        )
        .unwrap()
    }

    #[test]
    fn test_request_reaches_sink() {
        let sink = MemorySink::new();
        let tx = transmitter(sink.clone());

        let report = tx.request_transmit(Command::FanSpeed1).unwrap();
        assert_eq!(report.frames, 2);
        assert_eq!(report.address, "1110000011111");

        let report = tx.request_transmit(Command::PowerToggle).unwrap();
        assert_eq!(report.frames, 4);

        let sent = sink.transmissions();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0].command(), Command::FanSpeed1);
        assert_eq!(sent[1].command(), Command::PowerToggle);
        assert!(!tx.is_busy());
    }

    #[test]
    fn test_unbound_session_rejected() {
        let session = TransmitSession::new(config()).unwrap();
        let err = Transmitter::new(session, MemorySink::new(), RadioConfig::default())
            .err()
            .unwrap();
        assert!(matches!(err, TxError::Encode(EncodeError::MissingAddress)));
    }

    #[test]
    fn test_pair_never_reaches_sink() {
        let sink = MemorySink::new();
        let tx = transmitter(sink.clone());

        let err = tx.request_transmit(Command::Pair).unwrap_err();
        assert!(matches!(
            err,
            TxError::Encode(EncodeError::UnsupportedCommand(Command::Pair))
        ));
        assert_eq!(sink.count(), 0);
        assert!(!tx.is_busy());

        // session is still usable
        tx.request_transmit(Command::FanSpeed2).unwrap();
        assert_eq!(sink.count(), 1);
    }

    #[test]
    fn test_rate_mismatch_surfaces() {
        let sink = MemorySink::new();
        let mut session = TransmitSession::new(config()).unwrap();
        session
            .bind_address(DeviceAddress::parse("1011").unwrap())
            .unwrap();
        let tx = Transmitter::new(session, sink.clone(), RadioConfig::default()).unwrap();

        let err = tx.request_transmit(Command::FanSpeed3).unwrap_err();
        assert!(matches!(
            err,
            TxError::Sink(crate::error::SinkError::RateMismatch { .. })
        ));
        assert_eq!(sink.count(), 0);
    }

    #[test]
    fn test_concurrent_request_fails_fast() {
        let sink = MemorySink::new().with_air_time(Duration::from_millis(300));
        let tx = Arc::new(transmitter(sink.clone()));

        let tx2 = Arc::clone(&tx);
        let first = std::thread::spawn(move || tx2.request_transmit(Command::FanSpeed1));

        // wait for the first request to claim the transmitter
        let mut waited = 0;
        while !tx.is_busy() && waited < 200 {
            std::thread::sleep(Duration::from_millis(1));
            waited += 1;
        }
        assert!(tx.is_busy());

        let err = tx.request_transmit(Command::FanSpeed2).unwrap_err();
        assert!(err.is_busy());
        assert!(tx.rebind(DeviceAddress::parse("1").unwrap()).unwrap_err().is_busy());

        first.join().unwrap().unwrap();
        assert_eq!(sink.count(), 1);
        assert!(!tx.is_busy());
    }
}
