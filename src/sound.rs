use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{FromSample, SizedSample};
use thiserror::Error;

use crate::timer::BeepSink;

const BEEP_HZ: f32 = 440.0;

/// Tone length per beep request, in fractions of a second. The sound timer
/// re-beeps every audible tick, so back-to-back requests run together into
/// one continuous tone.
const BEEP_SECS: f32 = 2.0 / 60.0;

/// Audio setup failures are not machine faults; the front-end logs them and
/// falls back to the stdout sink.
#[derive(Debug, Error)]
pub enum AudioError {
    #[error("no audio output device")]
    NoDevice,
    #[error("unsupported sample format {0}")]
    UnsupportedFormat(cpal::SampleFormat),
    #[error(transparent)]
    Config(#[from] cpal::DefaultStreamConfigError),
    #[error(transparent)]
    Build(#[from] cpal::BuildStreamError),
    #[error(transparent)]
    Play(#[from] cpal::PlayStreamError),
}

/// Owns the cpal output stream. Lives on the front-end thread (streams are
/// not `Send`); the machine only ever sees the [`AudioBeep`] handle.
pub struct Audio {
    _stream: cpal::Stream,
    remaining: Arc<AtomicU32>,
    samples_per_beep: u32,
}

impl Audio {
    pub fn new() -> Result<Self, AudioError> {
        let host = cpal::default_host();
        let device = host.default_output_device().ok_or(AudioError::NoDevice)?;
        let config = device.default_output_config()?;

        let remaining = Arc::new(AtomicU32::new(0));
        let samples_per_beep = (config.sample_rate().0 as f32 * BEEP_SECS) as u32;

        let stream = match config.sample_format() {
            cpal::SampleFormat::F32 => Self::build::<f32>(&device, &config.into(), &remaining)?,
            cpal::SampleFormat::I16 => Self::build::<i16>(&device, &config.into(), &remaining)?,
            cpal::SampleFormat::U16 => Self::build::<u16>(&device, &config.into(), &remaining)?,
            other => return Err(AudioError::UnsupportedFormat(other)),
        };
        stream.play()?;

        Ok(Audio {
            _stream: stream,
            remaining,
            samples_per_beep,
        })
    }

    /// A `Send` handle for the sound timer. Beeping just arms an atomic
    /// countdown the stream callback drains; it never blocks.
    pub fn handle(&self) -> AudioBeep {
        AudioBeep {
            remaining: self.remaining.clone(),
            samples_per_beep: self.samples_per_beep,
        }
    }

    fn build<T>(
        device: &cpal::Device,
        config: &cpal::StreamConfig,
        remaining: &Arc<AtomicU32>,
    ) -> Result<cpal::Stream, cpal::BuildStreamError>
    where
        T: SizedSample + FromSample<f32>,
    {
        let sample_rate = config.sample_rate.0 as f32;
        let channels = config.channels as usize;
        let remaining = remaining.clone();
        let mut clock = 0f32;

        device.build_output_stream(
            config,
            move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
                for frame in data.chunks_mut(channels) {
                    let value = if remaining.load(Ordering::Relaxed) > 0 {
                        remaining.fetch_sub(1, Ordering::Relaxed);
                        clock = (clock + 1.0) % sample_rate;
                        (clock * BEEP_HZ * 2.0 * std::f32::consts::PI / sample_rate).sin()
                    } else {
                        0.0
                    };
                    let value = T::from_sample(value);
                    for sample in frame.iter_mut() {
                        *sample = value;
                    }
                }
            },
            |err| log::warn!("audio stream error: {err}"),
            None,
        )
    }
}

pub struct AudioBeep {
    remaining: Arc<AtomicU32>,
    samples_per_beep: u32,
}

impl BeepSink for AudioBeep {
    fn beep(&mut self) {
        self.remaining.store(self.samples_per_beep, Ordering::Relaxed);
    }
}
