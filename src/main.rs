use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::mpsc;
use std::sync::{Arc, Mutex, RwLock};
use std::thread;
use std::time::Duration;

use clap::Parser;
use log::{debug, error, info, warn};
use minifb::{Key, KeyRepeat, Scale, Window, WindowOptions};

use octo8::display::{Display, DISPLAY_HEIGHT, DISPLAY_WIDTH};
use octo8::emulator::{self, Emulator, FrameSink, OsRandom, SharedEmulator, DEFAULT_SPEED};
use octo8::sound::Audio;
use octo8::timer::StdoutBeep;

const PIXEL_ON: u32 = 0x007FFF; // same blue the framebuffer has always been
const PIXEL_OFF: u32 = 0;

#[derive(Parser)]
#[command(name = "octo8", about = "A CHIP-8 interpreter", version)]
struct Args {
    /// ROM file to load at 0x200
    #[arg(long)]
    rom: PathBuf,

    /// Start with execution paused (press P to resume, Space to single-step)
    #[arg(long)]
    pause: bool,

    /// Log every executed instruction
    #[arg(long)]
    debug: bool,
}

/// Frame sink the driver writes and the window loop reads. Copies the 32
/// display rows under a mutex; the driver never waits on the renderer.
struct SharedFrame(Arc<Mutex<[u64; DISPLAY_HEIGHT]>>);

impl FrameSink for SharedFrame {
    fn frame(&mut self, display: &Display) {
        let mut rows = self.0.lock().expect("frame buffer lock poisoned");
        for (y, row) in rows.iter_mut().enumerate() {
            *row = display.line(y as u8);
        }
    }
}

/// The conventional 4x4 grid: 1234/QWER/ASDF/ZXCV onto 0x0..0xF.
fn keymap(key: Key) -> Option<u8> {
    match key {
        Key::Key1 => Some(0x1),
        Key::Key2 => Some(0x2),
        Key::Key3 => Some(0x3),
        Key::Key4 => Some(0xC),
        Key::Q => Some(0x4),
        Key::W => Some(0x5),
        Key::E => Some(0x6),
        Key::R => Some(0xD),
        Key::A => Some(0x7),
        Key::S => Some(0x8),
        Key::D => Some(0x9),
        Key::F => Some(0xE),
        Key::Z => Some(0xA),
        Key::X => Some(0x0),
        Key::C => Some(0xB),
        Key::V => Some(0xF),
        _ => None,
    }
}

fn render(rows: &[u64; DISPLAY_HEIGHT], buffer: &mut [u32]) {
    for (y, row) in rows.iter().enumerate() {
        for x in 0..DISPLAY_WIDTH {
            let lit = row & (1u64 << (63 - x)) != 0;
            buffer[y * DISPLAY_WIDTH + x] = if lit { PIXEL_ON } else { PIXEL_OFF };
        }
    }
}

fn title(paused: bool) -> &'static str {
    if paused {
        "octo8 - paused"
    } else {
        "octo8"
    }
}

fn main() -> ExitCode {
    let args = Args::parse();
    let filter = if args.debug { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter)).init();

    // keep the audio stream alive on this thread; the machine gets a handle
    let audio = match Audio::new() {
        Ok(audio) => Some(audio),
        Err(err) => {
            warn!("audio unavailable, beeping to stdout: {err}");
            None
        }
    };
    let beep = match &audio {
        Some(audio) => Box::new(audio.handle()) as Box<dyn octo8::BeepSink>,
        None => Box::new(StdoutBeep),
    };

    let mut machine = Emulator::with_parts(beep, Box::new(OsRandom));
    match machine.load_rom_file(&args.rom) {
        Ok(len) => info!("loaded {len} byte ROM from {}", args.rom.display()),
        Err(err) => {
            error!("loading ROM {}: {err}", args.rom.display());
            return ExitCode::FAILURE;
        }
    }
    let mut paused = args.pause;
    if paused {
        machine.set_speed(0);
    }

    let emu: SharedEmulator = Arc::new(RwLock::new(machine));
    let rows = Arc::new(Mutex::new([0u64; DISPLAY_HEIGHT]));
    let mut sink = SharedFrame(rows.clone());
    let (stop_tx, stop_rx) = mpsc::channel();

    let vm = emu.clone();
    let driver = thread::spawn(move || emulator::run(&vm, &mut sink, &stop_rx));

    let mut window = match Window::new(
        title(paused),
        DISPLAY_WIDTH,
        DISPLAY_HEIGHT,
        WindowOptions {
            scale: Scale::X16,
            ..WindowOptions::default()
        },
    ) {
        Ok(window) => window,
        Err(err) => {
            error!("opening window: {err}");
            let _ = stop_tx.send(());
            let _ = driver.join();
            return ExitCode::FAILURE;
        }
    };
    window.limit_update_rate(Some(Duration::from_micros(16_600)));

    let mut buffer = vec![PIXEL_OFF; DISPLAY_WIDTH * DISPLAY_HEIGHT];
    while window.is_open() && !window.is_key_down(Key::Escape) && !driver.is_finished() {
        // the driver clears the keypad every tick, so assert held keys anew
        for key in window.get_keys() {
            if let Some(k) = keymap(key) {
                emu.write().expect("vm lock poisoned").keys.set(k);
            }
        }

        if window.is_key_pressed(Key::P, KeyRepeat::No) {
            paused = !paused;
            emu.write()
                .expect("vm lock poisoned")
                .set_speed(if paused { 0 } else { DEFAULT_SPEED });
            window.set_title(title(paused));
        }
        if paused && window.is_key_pressed(Key::Space, KeyRepeat::Yes) {
            if let Err(fault) = emu.write().expect("vm lock poisoned").step() {
                error!("machine fault while stepping: {fault}");
                break;
            }
        }

        render(&rows.lock().expect("frame buffer lock poisoned"), &mut buffer);
        if let Err(err) = window.update_with_buffer(&buffer, DISPLAY_WIDTH, DISPLAY_HEIGHT) {
            error!("window update: {err}");
            break;
        }
    }

    let _ = stop_tx.send(());
    match driver.join() {
        Ok(Ok(())) => ExitCode::SUCCESS,
        Ok(Err(fault)) => {
            error!("machine fault: {fault}");
            let vm = emu.read().expect("vm lock poisoned");
            for line in vm.mem.dump(vm.pc & !0xF).lines().take(8) {
                debug!("{line}");
            }
            ExitCode::FAILURE
        }
        Err(_) => {
            error!("driver thread panicked");
            ExitCode::FAILURE
        }
    }
}
