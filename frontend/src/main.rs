mod blank;
mod event;
mod level;
mod runner;

use crate::blank::BlankHandler;
use crate::event::{BlankEvent, ControlEvent};
use crate::runner::Runner;
use cart_core::game::GameContext;
use cart_core::player::GameMode;
use cart_core::video::ppu::Ppu;
use cart_core::video::registers::Mirroring;
use cart_core::vram::nmi::Nmi;
use cart_core::vram::{self, VramConfig};
use clap::Parser;
use crossbeam_channel::{self, Receiver, Sender};
use log::{info, LevelFilter};
use simple_logger::SimpleLogger;

#[derive(Parser, Debug)]
struct Args {
    /// Enable trace-level logging (every VRAM write and sprite contact)
    #[arg(long)]
    trace: bool,

    /// Enable debug-level logging (mode, gravity and trigger changes)
    #[arg(long)]
    debug: bool,

    /// Number of game frames to run
    #[arg(long, default_value_t = 600)]
    frames: usize,

    /// Encoded VRAM bytes written per vertical blank
    #[arg(long, default_value_t = 128)]
    budget: usize,

    /// Encoded VRAM bytes the update buffer may hold
    #[arg(long, default_value_t = 128)]
    capacity: usize,

    /// Start with the small hitbox
    #[arg(long)]
    mini: bool,

    /// Starting game mode (0 cube, 1 ship, 2 ball, 3 ufo)
    #[arg(long, default_value_t = 0, value_parser = clap::value_parser!(u8).range(0..4))]
    mode: u8,
}

fn main() {
    let args = Args::parse();

    let log_level = if args.trace {
        LevelFilter::Trace
    } else if args.debug {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    SimpleLogger::new()
        .with_level(LevelFilter::Off)
        .with_module_level(module_path!(), log_level)
        .with_module_level("cart_core", log_level)
        .init()
        .unwrap();

    let (mut vram, flusher) = vram::channel(VramConfig {
        capacity: args.capacity,
        frame_budget: args.budget,
    });
    let mut nmi = Nmi::new(Ppu::new(Mirroring::Horizontal), flusher);

    let mut ctx = GameContext::new();
    ctx.player.mini = args.mini;
    ctx.load_level(level::SPRITES, &mut vram);
    let mode = GameMode::try_from(args.mode).unwrap_or_default();
    ctx.player.mode = mode;

    // first screen is drawn with rendering off, before the blank handler starts
    level::draw_background(&mut vram).expect("Demo level background is malformed");
    let report = nmi.flush_screen_off();
    info!("Background drawn: {} entries, {} bytes", report.entries, report.bytes);

    vram.set_vram_buffer();
    nmi.ppu.ppu_on_all();

    let (blank_tx, blank_rx): (Sender<BlankEvent>, Receiver<BlankEvent>) = crossbeam_channel::bounded(1);
    let (control_tx, control_rx) = crossbeam_channel::bounded(1);

    let blank_handler = BlankHandler::new(nmi, blank_tx, control_rx);
    let blanks = std::thread::spawn(move || blank_handler.run());

    let runner = Runner::new(ctx, vram, blank_rx, args.frames);
    let game = std::thread::spawn(move || runner.run());

    let run = game.join().expect("Game loop panicked");
    let _ = control_tx.send(ControlEvent::Stop);
    let blank = blanks.join().expect("Blank handler panicked");

    info!(
        "Ran {} frames as {}: {} contacts, {} coins, state {:?}",
        run.frames,
        mode,
        run.contacts,
        run.coins,
        run.state
    );
    info!(
        "{} blanks: {} entries, {} bytes, {} discarded, {} over budget, {} still queued",
        blank.blanks, blank.entries, blank.bytes, blank.discarded, blank.deferred, blank.pending
    );
    info!(
        "{} entries dropped for room, {} missed blanks, {} corrupted writes",
        run.dropped, run.missed_blanks, blank.corrupted_writes
    );
}
