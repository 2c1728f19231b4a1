use std::io::{self, Write};

/// Receives one beep per audible sound-timer tick. Implementations must not
/// block; the executor fires and forgets.
pub trait BeepSink: Send + Sync {
    fn beep(&mut self);
}

/// Default sink: a single BEL byte to stdout.
pub struct StdoutBeep;

impl BeepSink for StdoutBeep {
    fn beep(&mut self) {
        let mut out = io::stdout();
        let _ = out.write_all(&[0x07]);
        let _ = out.flush();
    }
}

/// Sink that swallows beeps.
pub struct NullBeep;

impl BeepSink for NullBeep {
    fn beep(&mut self) {}
}

/// The delay and sound timers: two byte counters decremented once per 60 Hz
/// tick. While the sound decrement leaves the counter non-zero a beep goes
/// to the sink; the final 1 -> 0 transition is silent.
pub struct Timers {
    delay: u8,
    sound: u8,
    sink: Box<dyn BeepSink>,
}

impl Timers {
    pub fn new(sink: Box<dyn BeepSink>) -> Self {
        Timers {
            delay: 0,
            sound: 0,
            sink,
        }
    }

    pub fn reset(&mut self) {
        self.delay = 0;
        self.sound = 0;
    }

    pub fn tick(&mut self) {
        if self.delay > 0 {
            self.delay -= 1;
        }
        if self.sound > 0 {
            self.sound -= 1;
            if self.sound > 0 {
                self.sink.beep();
            }
        }
    }

    pub fn set_delay(&mut self, v: u8) {
        self.delay = v;
    }

    pub fn set_sound(&mut self, v: u8) {
        self.sound = v;
    }

    pub fn delay(&self) -> u8 {
        self.delay
    }

    pub fn sound(&self) -> u8 {
        self.sound
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    struct CountingBeep(Arc<AtomicU32>);

    impl BeepSink for CountingBeep {
        fn beep(&mut self) {
            self.0.fetch_add(1, Ordering::Relaxed);
        }
    }

    fn timers_with_counter() -> (Timers, Arc<AtomicU32>) {
        let beeps = Arc::new(AtomicU32::new(0));
        let t = Timers::new(Box::new(CountingBeep(beeps.clone())));
        (t, beeps)
    }

    #[test]
    fn delay_counts_down_and_stops_at_zero() {
        let (mut t, _) = timers_with_counter();
        t.set_delay(2);
        t.tick();
        assert_eq!(t.delay(), 1);
        t.tick();
        t.tick();
        t.tick();
        assert_eq!(t.delay(), 0);
    }

    #[test]
    fn delay_ticks_at_most_its_initial_value() {
        let (mut t, _) = timers_with_counter();
        t.set_delay(3);
        for _ in 0..10 {
            t.tick();
        }
        assert_eq!(t.delay(), 0);
    }

    #[test]
    fn sound_beeps_while_audible_but_not_into_silence() {
        let (mut t, beeps) = timers_with_counter();
        t.set_sound(3);
        t.tick(); // 3 -> 2, beep
        t.tick(); // 2 -> 1, beep
        t.tick(); // 1 -> 0, silent
        t.tick(); // already silent
        assert_eq!(t.sound(), 0);
        assert_eq!(beeps.load(Ordering::Relaxed), 2);
    }

    #[test]
    fn reset_silences_both_counters() {
        let (mut t, beeps) = timers_with_counter();
        t.set_delay(10);
        t.set_sound(10);
        t.reset();
        t.tick();
        assert_eq!(t.delay(), 0);
        assert_eq!(t.sound(), 0);
        assert_eq!(beeps.load(Ordering::Relaxed), 0);
    }
}
