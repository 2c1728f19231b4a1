/// The most-recently-observed keypress (0x0..0xF), or nothing.
///
/// The keypad is edge-sampled: the driver clears it at every tick boundary,
/// so an input source must re-assert a held key each frame. At most one key
/// is representable; combinations collapse to the latest write.
#[derive(Default)]
pub struct Keypad {
    state: Option<u8>,
}

impl Keypad {
    pub fn new() -> Self {
        Keypad { state: None }
    }

    pub fn set(&mut self, key: u8) {
        self.state = Some(key & 0xF);
    }

    pub fn reset(&mut self) {
        self.state = None;
    }

    pub fn has_state(&self) -> bool {
        self.state.is_some()
    }

    pub fn state(&self) -> u8 {
        self.state.unwrap_or(0)
    }

    pub fn pressed(&self, key: u8) -> bool {
        self.state == Some(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_keypad_reports_nothing() {
        let k = Keypad::new();
        assert!(!k.has_state());
        assert_eq!(k.state(), 0);
        assert!(!k.pressed(0));
    }

    #[test]
    fn set_then_reset_is_an_edge() {
        let mut k = Keypad::new();
        k.set(0xA);
        assert!(k.has_state());
        assert!(k.pressed(0xA));
        assert!(!k.pressed(0xB));
        k.reset();
        assert!(!k.has_state());
        assert!(!k.pressed(0xA));
    }

    #[test]
    fn latest_write_wins() {
        let mut k = Keypad::new();
        k.set(0x1);
        k.set(0x2);
        assert_eq!(k.state(), 0x2);
        assert!(!k.pressed(0x1));
    }

    #[test]
    fn key_code_is_masked_to_a_nibble() {
        let mut k = Keypad::new();
        k.set(0x12);
        assert_eq!(k.state(), 0x2);
    }
}
