//! End-to-end tests driving the device through the host command protocol
//! against simulated hardware, the way a real host would.

use lumitape::engine::Device;
use lumitape::hal::sim::{PanelBuffer, SimClock, SimFlash};
use lumitape::hal::Rgb;
use lumitape::memory::Symbol;

/// A device wired to simulated hardware.
struct Bench {
    device: Device,
    clock: SimClock,
    flash: SimFlash,
    panel: PanelBuffer,
}

impl Bench {
    fn new() -> Self {
        let mut bench = Bench {
            device: Device::new(),
            clock: SimClock::new(),
            flash: SimFlash::new(),
            panel: PanelBuffer::new(),
        };
        bench.device.power_on(&bench.flash, &mut bench.panel);
        bench
    }

    /// Deliver one raw command buffer.
    fn send(&mut self, buffer: &[u8]) {
        self.device
            .process(buffer, &mut self.clock, &mut self.flash, &mut self.panel);
    }

    /// RESET, then deliver program text in link-sized LOAD chunks.
    fn load(&mut self, source: &str) {
        self.send(&[1]);
        for chunk in source.as_bytes().chunks(63) {
            let mut buffer = vec![2];
            buffer.extend_from_slice(chunk);
            self.send(&buffer);
        }
    }

    fn run(&mut self, source: &str) {
        self.load(source);
        self.send(&[3]);
    }

    /// Advance the clock one millisecond at a time, polling the device
    /// after each tick.
    fn tick(&mut self, ms: u32) {
        for _ in 0..ms {
            self.clock.advance(1);
            self.device.exec(&mut self.clock, &mut self.panel);
        }
    }
}

#[test]
fn test_run_executes_at_clock_rate() {
    let mut bench = Bench::new();
    bench.send(&[5, 5]); // 5 instructions per second
    bench.run("> > > > > > > >");

    bench.tick(199);
    assert_eq!(bench.device.machine().tape().head(), 0);

    bench.tick(1);
    assert_eq!(bench.device.machine().tape().head(), 1);

    // one instruction per 200 elapsed milliseconds
    bench.tick(800);
    assert_eq!(bench.device.machine().tape().head(), 5);
}

#[test]
fn test_step_command_ignores_scheduler() {
    let mut bench = Bench::new();
    bench.load("R>G");

    // no RUN, no ticks: STEP drives the machine by itself
    bench.send(&[4]);
    assert_eq!(bench.device.machine().tape().cell(0), Symbol::Red);
    bench.send(&[4]);
    assert_eq!(bench.device.machine().tape().head(), 1);
    bench.send(&[4]);
    assert_eq!(bench.device.machine().tape().cell(1), Symbol::Green);
    assert!(!bench.device.is_running());
}

#[test]
fn test_step_stops_a_running_machine() {
    let mut bench = Bench::new();
    bench.send(&[5, 40]);
    bench.run("#spin R ^spin");
    bench.tick(100);
    assert!(bench.device.is_running());

    bench.send(&[4]);
    assert!(!bench.device.is_running());

    // further ticks do nothing once stopped
    let head = bench.device.machine().tape().head();
    bench.tick(1000);
    assert_eq!(bench.device.machine().tape().head(), head);
}

#[test]
fn test_wait_zero_halts_until_reset() {
    let mut bench = Bench::new();
    bench.send(&[5, 40]);
    bench.run("%0 R");

    bench.tick(5000);
    assert!(bench.device.machine().is_halted());
    assert_eq!(bench.device.machine().tape().cell(0), Symbol::Black);

    // STEP can't wake a halted machine either
    bench.send(&[4]);
    assert_eq!(bench.device.machine().tape().cell(0), Symbol::Black);

    // RUN starts over from a full reset
    bench.send(&[3]);
    bench.tick(5000);
    assert!(bench.device.machine().is_halted());
    assert_eq!(bench.device.machine().tape().cell(0), Symbol::Black);
}

#[test]
fn test_wait_paces_execution() {
    let mut bench = Bench::new();
    bench.send(&[5, 10]); // 100ms per step
    bench.run("R %3 G");

    bench.tick(100); // R
    assert_eq!(bench.device.machine().tape().cell(0), Symbol::Red);
    bench.tick(100); // %3 (one period consumed on execution)
    bench.tick(200); // two more idle periods
    assert_eq!(bench.device.machine().tape().cell(0), Symbol::Red);
    bench.tick(100); // G
    assert_eq!(bench.device.machine().tape().cell(0), Symbol::Green);
}

#[test]
fn test_error_halts_and_blinks() {
    let mut bench = Bench::new();
    bench.send(&[5, 40]);
    bench.run("^nowhere R");
    bench.tick(25);

    // label-not-found blinks six times and forces the cursor to the end
    assert_eq!(bench.panel.last_blinks(), Some(6));
    assert!(!bench.device.is_running());
    let machine = bench.device.machine();
    assert_eq!(machine.pos(), machine.program().len());

    // a later STEP is a no-op until RESET
    bench.send(&[4]);
    assert_eq!(bench.device.machine().tape().cell(0), Symbol::Black);
}

#[test]
fn test_eleventh_variable_is_an_error() {
    let mut bench = Bench::new();
    bench.send(&[5, 40]);
    bench.run("$a=1 $b=1 $c=1 $d=1 $e=1 $f=1 $g=1 $h=1 $i=1 $j=1 $k=1");
    bench.tick(1000);

    assert_eq!(bench.panel.last_blinks(), Some(4));
    assert_eq!(bench.device.machine().variables().len(), 10);
    assert_eq!(bench.device.machine().variables().get("j"), Some(1));
    assert_eq!(bench.device.machine().variables().get("k"), None);
}

#[test]
fn test_tapehead_highlighting() {
    let mut bench = Bench::new();
    bench.load("R>G");

    bench.send(&[4]);
    // highlighting defaults on: the head cell is driven bright
    assert_eq!(bench.panel.led(0), Rgb::new(0x60, 0, 0));

    bench.send(&[6, 0]);
    bench.send(&[4]); // '>' moves the head off cell 0
    assert_eq!(bench.panel.led(0), Rgb::new(0x20, 0, 0));
    assert_eq!(bench.panel.led(1), Rgb::OFF);
}

#[test]
fn test_empty_program_stops_scheduler() {
    let mut bench = Bench::new();
    bench.send(&[5, 40]);
    bench.send(&[3]); // RUN with nothing loaded
    assert!(bench.device.is_running());
    bench.tick(50);
    assert!(!bench.device.is_running());
}

#[test]
fn test_load_overflow_is_dropped() {
    let mut bench = Bench::new();
    let long = "R".repeat(300);
    bench.load(&long);
    assert_eq!(bench.device.machine().program().len(), 256);
}

#[test]
fn test_unknown_opcodes_are_ignored() {
    let mut bench = Bench::new();
    bench.run("R");
    bench.send(&[0]);
    bench.send(&[42, 1, 2, 3]);
    bench.send(&[]);
    assert!(bench.device.is_running());
}

#[test]
fn test_demo_binary_counter() {
    let mut bench = Bench::new();
    bench.load("#tick\n>>\n#carry\n?K\n^set\nK <\n^carry\n#set\nW %1\n^tick\n");

    // single-step through three increments: 1, 10, 11 in white-on-black
    for _ in 0..21 {
        bench.send(&[4]);
    }
    let tape = bench.device.machine().tape();
    assert_eq!(tape.cell(25), Symbol::White);
    assert_eq!(tape.cell(26), Symbol::White);
    assert!(tape
        .cells()
        .iter()
        .take(25)
        .all(|&s| s == Symbol::Black));
}
