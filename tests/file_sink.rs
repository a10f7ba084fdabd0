use huntertx_rs::device::{FileSink, RadioConfig, RadioSink, SampleFormat};
use huntertx_rs::protocol::{Command, DeviceAddress};
use huntertx_rs::transmission::{TransmitSession, Transmitter, TxConfig};
use huntertx_rs::{SinkError, TxError};
use std::path::PathBuf;

const RATE: u32 = 10_000;

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("huntertx-{}-{}", std::process::id(), name))
}

fn session() -> TransmitSession {
    let mut session = TransmitSession::new(TxConfig {
        sample_rate: RATE,
        baud_rate: 2500,
    })
    .unwrap();
    session
        .bind_address(DeviceAddress::parse("111110011101011011111010010011000011110").unwrap())
        .unwrap();
    session
}

#[test]
fn cf32_file_holds_every_sample() {
    let path = temp_path("fan1.cf32");
    let tx = Transmitter::new(
        session(),
        FileSink::new(&path, SampleFormat::Cf32),
        RadioConfig::default().with_sample_rate(RATE),
    )
    .unwrap();

    let report = tx.request_transmit(Command::FanSpeed1).unwrap();
    let bytes = std::fs::read(&path).unwrap();
    std::fs::remove_file(&path).ok();

    assert_eq!(bytes.len(), report.samples * 8);
    // first chip of the preamble is on
    assert_eq!(&bytes[..4], &1.0f32.to_le_bytes());
    // imaginary parts are all zero
    assert!(bytes.chunks(8).all(|iq| iq[4..] == [0, 0, 0, 0]));
}

#[test]
fn appending_sink_accumulates_transmissions() {
    let path = temp_path("append.cs8");
    std::fs::remove_file(&path).ok();
    let tx = Transmitter::new(
        session(),
        FileSink::new(&path, SampleFormat::Cs8).with_append(true),
        RadioConfig::default().with_sample_rate(RATE),
    )
    .unwrap();

    let a = tx.request_transmit(Command::FanSpeed2).unwrap();
    let b = tx.request_transmit(Command::FanSpeed0).unwrap();
    let bytes = std::fs::read(&path).unwrap();
    std::fs::remove_file(&path).ok();

    assert_eq!(bytes.len(), 2 * (a.samples + b.samples));
}

#[test]
fn wav_output_is_stereo_float() {
    let path = temp_path("power.wav");
    let tx = Transmitter::new(
        session(),
        FileSink::new(&path, SampleFormat::Wav),
        RadioConfig::default().with_sample_rate(RATE),
    )
    .unwrap();

    let report = tx.request_transmit(Command::PowerToggle).unwrap();
    let reader = hound::WavReader::open(&path).unwrap();
    let spec = reader.spec();
    let len = reader.len() as usize;
    std::fs::remove_file(&path).ok();

    assert_eq!(spec.channels, 2);
    assert_eq!(spec.sample_rate, RATE);
    assert_eq!(spec.sample_format, hound::SampleFormat::Float);
    assert_eq!(len, 2 * report.samples);
}

#[test]
fn unconfigured_sink_refuses_buffers() {
    let mut session = session();
    session.encode(Command::FanSpeed3).unwrap();
    let buffer = session.take_buffer().unwrap();

    let mut sink = FileSink::new(temp_path("never.cf32"), SampleFormat::Cf32);
    assert!(matches!(
        sink.transmit(&buffer),
        Err(SinkError::NotConfigured)
    ));
}

#[test]
fn sink_io_errors_surface_unchanged() {
    // a directory cannot be opened as a file
    let dir = std::env::temp_dir();
    let tx = Transmitter::new(
        session(),
        FileSink::new(&dir, SampleFormat::Cf32),
        RadioConfig::default().with_sample_rate(RATE),
    )
    .unwrap();

    let err = tx.request_transmit(Command::FanSpeed1).unwrap_err();
    assert!(matches!(err, TxError::Sink(SinkError::Io(_))));
    assert!(!tx.is_busy());
}
