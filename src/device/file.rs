use super::{RadioConfig, RadioSink, check_rate, print_radio_config};
use crate::error::SinkError;
use crate::transmission::SampleBuffer;
use byteorder::{LittleEndian, WriteBytesExt};
use indicatif::ProgressBar;
use num_complex::Complex32;
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::info;

/// Samples written per progress update
const CHUNK_SAMPLES: usize = 1 << 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SampleFormat {
    /// Interleaved little-endian f32 I/Q (GNU Radio file source)
    Cf32,
    /// Interleaved signed 8-bit I/Q (hackrf_transfer -t)
    Cs8,
    /// Two-channel 32-bit float WAV, I left and Q right
    Wav,
}

/// Writes each transmission to a file, or to stdout when the path is `-`.
pub struct FileSink {
    path: PathBuf,
    format: SampleFormat,
    append: bool,
    config: Option<RadioConfig>,
    progress: Option<ProgressBar>,
}

impl FileSink {
    pub fn new(path: impl Into<PathBuf>, format: SampleFormat) -> Self {
        Self {
            path: path.into(),
            format,
            append: false,
            config: None,
            progress: None,
        }
    }

    /// Append raw transmissions instead of truncating. WAV output is always
    /// rewritten.
    pub fn with_append(mut self, append: bool) -> Self {
        self.append = append;
        self
    }

    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = Some(progress);
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn is_stdout(&self) -> bool {
        self.path.as_os_str() == "-"
    }

    fn open_raw(&self) -> io::Result<Box<dyn Write>> {
        if self.is_stdout() {
            return Ok(Box::new(io::stdout().lock()));
        }
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let file = if self.append {
            OpenOptions::new()
                .append(true)
                .create(true)
                .open(&self.path)?
        } else {
            File::create(&self.path)?
        };
        Ok(Box::new(BufWriter::new(file)))
    }

    fn write_raw(&self, samples: &[Complex32]) -> Result<(), SinkError> {
        let write: fn(&mut Box<dyn Write>, &[Complex32]) -> io::Result<()> = match self.format {
            SampleFormat::Cs8 => write_cs8,
            _ => write_cf32,
        };
        let mut writer = self.open_raw()?;
        for chunk in samples.chunks(CHUNK_SAMPLES) {
            write(&mut writer, chunk)?;
            self.tick(chunk.len());
        }
        writer.flush()?;
        Ok(())
    }

    fn write_wav(&self, samples: &[Complex32], sample_rate: u32) -> Result<(), SinkError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let spec = hound::WavSpec {
            channels: 2,
            sample_rate,
            bits_per_sample: 32,
            sample_format: hound::SampleFormat::Float,
        };
        let mut writer = hound::WavWriter::create(&self.path, spec)?;
        for chunk in samples.chunks(CHUNK_SAMPLES) {
            for s in chunk {
                writer.write_sample(s.re)?;
                writer.write_sample(s.im)?;
            }
            self.tick(chunk.len());
        }
        writer.finalize()?;
        Ok(())
    }

    fn tick(&self, n: usize) {
        if let Some(pb) = &self.progress {
            pb.inc(n as u64);
        }
    }
}

impl RadioSink for FileSink {
    fn configure(&mut self, config: &RadioConfig) -> Result<(), SinkError> {
        print_radio_config(config);
        info!("  Output: {} ({:?})", self.path.display(), self.format);
        self.config = Some(*config);
        Ok(())
    }

    fn transmit(&mut self, buffer: &SampleBuffer) -> Result<(), SinkError> {
        check_rate(self.config.as_ref(), buffer)?;

        if let Some(pb) = &self.progress {
            pb.set_length(buffer.len() as u64);
            pb.set_position(0);
        }

        match self.format {
            SampleFormat::Wav => {
                if self.is_stdout() {
                    return Err(SinkError::Io(io::Error::new(
                        io::ErrorKind::InvalidInput,
                        "WAV output needs a seekable file",
                    )));
                }
                self.write_wav(buffer.samples(), buffer.sample_rate())?
            }
            _ => self.write_raw(buffer.samples())?,
        }

        info!(
            "Wrote {} samples for {} to {}",
            buffer.len(),
            buffer.command(),
            self.path.display()
        );
        Ok(())
    }
}

fn write_cf32<W: Write>(writer: &mut W, samples: &[Complex32]) -> io::Result<()> {
    for s in samples {
        writer.write_f32::<LittleEndian>(s.re)?;
        writer.write_f32::<LittleEndian>(s.im)?;
    }
    Ok(())
}

fn write_cs8<W: Write>(writer: &mut W, samples: &[Complex32]) -> io::Result<()> {
    for s in samples {
        writer.write_i8(to_i8(s.re))?;
        writer.write_i8(to_i8(s.im))?;
    }
    Ok(())
}

fn to_i8(x: f32) -> i8 {
    (x.clamp(-1.0, 1.0) * i8::MAX as f32).round() as i8
}
