// Lumitape: light-tape Turing machine simulator

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use lumitape::engine::Device;
use lumitape::hal::sim::{PanelBuffer, SimFlash, SystemClock};
use lumitape::ui::App;

/// Host file backing the simulated non-volatile region.
const FLASH_IMAGE: &str = "lumitape.flash";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = std::env::args().collect();

    let source_path: Option<PathBuf> = match args.len() {
        1 => None,
        2 => {
            let path = PathBuf::from(&args[1]);
            if !path.exists() {
                eprintln!("Error: File '{}' not found", path.display());
                eprintln!(
                    "Usage: {} [program.lt]",
                    args.first().map(|s| s.as_str()).unwrap_or("lumitape")
                );
                std::process::exit(1);
            }
            Some(path)
        }
        _ => {
            eprintln!(
                "Usage: {} [program.lt]",
                args.first().map(|s| s.as_str()).unwrap_or("lumitape")
            );
            eprintln!();
            eprintln!("Examples:");
            eprintln!("  lumitape demos/scanner.lt   # load and run a demo program");
            eprintln!("  lumitape                    # power on from the stored flash image");
            std::process::exit(1);
        }
    };

    // power the device on against the saved flash image, if there is one
    let flash = match fs::read(FLASH_IMAGE) {
        Ok(image) => SimFlash::from_image(&image),
        Err(_) => SimFlash::new(),
    };

    let clock = SystemClock::new();
    let mut panel = PanelBuffer::new();
    let mut device = Device::new();
    device.power_on(&flash, &mut panel);

    let mut app = App::new(device, clock, flash, panel, source_path);

    // a program given on the command line replaces whatever was restored
    if app.source_path.is_some() {
        app.load_program_file();
        app.send(&[3]);
    }

    // Set up terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = app.run(&mut terminal);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    // keep the non-volatile region across simulator runs
    if let Err(e) = fs::write(Path::new(FLASH_IMAGE), app.flash.image()) {
        eprintln!("Warning: could not save flash image: {}", e);
    }

    if let Err(err) = res {
        eprintln!("Error: {:?}", err);
    }

    Ok(())
}
