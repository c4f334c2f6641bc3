/// Sound engine: procedural chip-style effects via rodio.
///
/// All sounds are generated as in-memory WAV buffers at init time.
/// Playback is fire-and-forget (non-blocking) via rodio's Sink.
///
/// Compile without the "sound" feature to disable audio entirely
/// (the stub SoundEngine does nothing).

#[cfg(feature = "sound")]
mod inner {
    use std::io::Cursor;
    use std::sync::Arc;

    use rodio::{OutputStream, OutputStreamHandle, Sink};

    const SAMPLE_RATE: u32 = 22050;
    const TAU: f32 = std::f32::consts::TAU;

    /// Pre-generated WAV buffers for each sound effect.
    pub struct SoundEngine {
        _stream: OutputStream,
        handle: OutputStreamHandle,
        sfx_gem: Arc<Vec<u8>>,
        sfx_artifact: Arc<Vec<u8>>,
        sfx_checkpoint: Arc<Vec<u8>>,
        sfx_hurt: Arc<Vec<u8>>,
        sfx_shield_break: Arc<Vec<u8>>,
        sfx_die: Arc<Vec<u8>>,
        sfx_respawn: Arc<Vec<u8>>,
        sfx_circuit: Arc<Vec<u8>>,
    }

    impl SoundEngine {
        pub fn new() -> Option<Self> {
            let (stream, handle) = OutputStream::try_default().ok()?;

            Some(SoundEngine {
                _stream: stream,
                handle,
                sfx_gem: Arc::new(make_wav(&gen_gem())),
                sfx_artifact: Arc::new(make_wav(&gen_artifact())),
                sfx_checkpoint: Arc::new(make_wav(&gen_checkpoint())),
                sfx_hurt: Arc::new(make_wav(&gen_hurt())),
                sfx_shield_break: Arc::new(make_wav(&gen_shield_break())),
                sfx_die: Arc::new(make_wav(&gen_die())),
                sfx_respawn: Arc::new(make_wav(&gen_respawn())),
                sfx_circuit: Arc::new(make_wav(&gen_circuit())),
            })
        }

        fn play(&self, buf: &Arc<Vec<u8>>) {
            if let Ok(sink) = Sink::try_new(&self.handle) {
                let cursor = Cursor::new(buf.as_ref().clone());
                if let Ok(src) = rodio::Decoder::new(cursor) {
                    sink.append(src);
                    sink.detach(); // fire-and-forget
                }
            }
        }

        pub fn play_gem(&self) { self.play(&self.sfx_gem); }
        pub fn play_artifact(&self) { self.play(&self.sfx_artifact); }
        pub fn play_checkpoint(&self) { self.play(&self.sfx_checkpoint); }
        pub fn play_hurt(&self) { self.play(&self.sfx_hurt); }
        pub fn play_shield_break(&self) { self.play(&self.sfx_shield_break); }
        pub fn play_die(&self) { self.play(&self.sfx_die); }
        pub fn play_respawn(&self) { self.play(&self.sfx_respawn); }
        pub fn play_circuit(&self) { self.play(&self.sfx_circuit); }
    }

    // ════════════════════════════════════════════════════════════
    //  Waveform generators — all produce Vec<f32> mono samples
    // ════════════════════════════════════════════════════════════

    fn tone(freq: f32, duration: f32, volume: f32) -> Vec<f32> {
        let n = (SAMPLE_RATE as f32 * duration) as usize;
        (0..n)
            .map(|i| {
                let t = i as f32 / SAMPLE_RATE as f32;
                let env = 1.0 - (i as f32 / n as f32);
                (t * freq * TAU).sin() * env * volume
            })
            .collect()
    }

    /// Gem pickup: two quick rising notes.
    fn gen_gem() -> Vec<f32> {
        let mut s = tone(1175.0, 0.05, 0.25);
        s.extend(tone(1568.0, 0.07, 0.25));
        s
    }

    /// Artifact: slow four-note fanfare with harmonics.
    fn gen_artifact() -> Vec<f32> {
        let notes = [523.0_f32, 659.0, 784.0, 1047.0];
        let mut samples = Vec::new();
        for &freq in &notes {
            let n = (SAMPLE_RATE as f32 * 0.11) as usize;
            for i in 0..n {
                let t = i as f32 / SAMPLE_RATE as f32;
                let env = 1.0 - (i as f32 / n as f32) * 0.4;
                let wave = (t * freq * TAU).sin() * 0.6 + (t * freq * 2.0 * TAU).sin() * 0.3;
                samples.push(wave * env * 0.3);
            }
        }
        samples
    }

    /// Checkpoint chime: one pure high note with a long fade.
    fn gen_checkpoint() -> Vec<f32> {
        tone(988.0, 0.3, 0.25)
    }

    /// Hurt: short low thud with noise.
    fn gen_hurt() -> Vec<f32> {
        let duration = 0.09;
        let n = (SAMPLE_RATE as f32 * duration) as usize;
        let mut rng: u32 = 77777;
        (0..n)
            .map(|i| {
                let t = i as f32 / n as f32;
                let ti = i as f32 / SAMPLE_RATE as f32;
                let thud = (ti * 110.0 * TAU).sin();
                rng = rng.wrapping_mul(1103515245).wrapping_add(12345);
                let noise = (rng as f32 / u32::MAX as f32) * 2.0 - 1.0;
                (thud * 0.7 + noise * 0.3) * (1.0 - t) * 0.35
            })
            .collect()
    }

    /// Shield break: glassy descending sweep.
    fn gen_shield_break() -> Vec<f32> {
        let duration = 0.18;
        let n = (SAMPLE_RATE as f32 * duration) as usize;
        (0..n)
            .map(|i| {
                let t = i as f32 / n as f32;
                let freq = 1400.0 - t * 900.0;
                let ti = i as f32 / SAMPLE_RATE as f32;
                (ti * freq * TAU).sin() * (1.0 - t).powf(0.7) * 0.3
            })
            .collect()
    }

    /// Death: sad descending tone.
    fn gen_die() -> Vec<f32> {
        let notes = [440.0_f32, 370.0, 311.0, 261.0];
        let mut samples = Vec::new();
        for &freq in &notes {
            let n = (SAMPLE_RATE as f32 * 0.12) as usize;
            for i in 0..n {
                let t = i as f32 / SAMPLE_RATE as f32;
                let env = 1.0 - (i as f32 / n as f32) * 0.3;
                samples.push((t * freq * TAU).sin() * env * 0.3);
            }
        }
        let fade = samples.len() / 4;
        let total = samples.len();
        for i in (total - fade)..total {
            samples[i] *= (total - i) as f32 / fade as f32;
        }
        samples
    }

    /// Respawn: rising sweep back to life.
    fn gen_respawn() -> Vec<f32> {
        let duration = 0.2;
        let n = (SAMPLE_RATE as f32 * duration) as usize;
        (0..n)
            .map(|i| {
                let t = i as f32 / n as f32;
                let freq = 300.0 + t * 600.0;
                let ti = i as f32 / SAMPLE_RATE as f32;
                (ti * freq * TAU).sin() * (1.0 - t * 0.5) * 0.25
            })
            .collect()
    }

    /// Circuit release: crackling burst, pitch falling with decay.
    fn gen_circuit() -> Vec<f32> {
        let duration = 0.16;
        let n = (SAMPLE_RATE as f32 * duration) as usize;
        let mut rng: u32 = 424242;
        (0..n)
            .map(|i| {
                let t = i as f32 / n as f32;
                let ti = i as f32 / SAMPLE_RATE as f32;
                let buzz = (ti * (880.0 - t * 500.0) * TAU).sin();
                rng = rng.wrapping_mul(1103515245).wrapping_add(12345);
                let noise = (rng as f32 / u32::MAX as f32) * 2.0 - 1.0;
                (buzz * 0.5 + noise * 0.5) * (1.0 - t).powf(0.9) * 0.3
            })
            .collect()
    }

    // ════════════════════════════════════════════════════════════
    //  WAV encoder — wraps f32 samples into a valid WAV buffer
    // ════════════════════════════════════════════════════════════

    fn make_wav(samples: &[f32]) -> Vec<u8> {
        let num_channels: u16 = 1;
        let bits_per_sample: u16 = 16;
        let byte_rate = SAMPLE_RATE * (num_channels as u32) * (bits_per_sample as u32) / 8;
        let block_align = num_channels * bits_per_sample / 8;
        let data_size = samples.len() as u32 * 2;
        let file_size = 36 + data_size;

        let mut buf = Vec::with_capacity(44 + data_size as usize);

        buf.extend_from_slice(b"RIFF");
        buf.extend_from_slice(&file_size.to_le_bytes());
        buf.extend_from_slice(b"WAVE");

        buf.extend_from_slice(b"fmt ");
        buf.extend_from_slice(&16u32.to_le_bytes());
        buf.extend_from_slice(&1u16.to_le_bytes());
        buf.extend_from_slice(&num_channels.to_le_bytes());
        buf.extend_from_slice(&SAMPLE_RATE.to_le_bytes());
        buf.extend_from_slice(&byte_rate.to_le_bytes());
        buf.extend_from_slice(&block_align.to_le_bytes());
        buf.extend_from_slice(&bits_per_sample.to_le_bytes());

        buf.extend_from_slice(b"data");
        buf.extend_from_slice(&data_size.to_le_bytes());

        for &s in samples {
            let clamped = s.max(-1.0).min(1.0);
            let val = (clamped * 32767.0) as i16;
            buf.extend_from_slice(&val.to_le_bytes());
        }

        buf
    }
}

// ════════════════════════════════════════════════════════════
//  Public API — compiles to no-ops when sound feature is off
// ════════════════════════════════════════════════════════════

#[cfg(feature = "sound")]
pub use inner::SoundEngine;

#[cfg(not(feature = "sound"))]
pub struct SoundEngine;

#[cfg(not(feature = "sound"))]
impl SoundEngine {
    pub fn new() -> Option<Self> { Some(SoundEngine) }
    pub fn play_gem(&self) {}
    pub fn play_artifact(&self) {}
    pub fn play_checkpoint(&self) {}
    pub fn play_hurt(&self) {}
    pub fn play_shield_break(&self) {}
    pub fn play_die(&self) {}
    pub fn play_respawn(&self) {}
    pub fn play_circuit(&self) {}
}
