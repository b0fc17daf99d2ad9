//! Store/restore round-trips across simulated power loss.

use lumitape::engine::Device;
use lumitape::hal::sim::{PanelBuffer, SimClock, SimFlash};
use lumitape::memory::Symbol;
use lumitape::storage::Settings;

fn send(device: &mut Device, flash: &mut SimFlash, buffer: &[u8]) {
    let mut clock = SimClock::new();
    let mut panel = PanelBuffer::new();
    device.process(buffer, &mut clock, flash, &mut panel);
}

fn load(device: &mut Device, flash: &mut SimFlash, source: &str) {
    send(device, flash, &[1]);
    for chunk in source.as_bytes().chunks(63) {
        let mut buffer = vec![2];
        buffer.extend_from_slice(chunk);
        send(device, flash, &buffer);
    }
}

#[test]
fn test_store_round_trips_across_power_loss() {
    let mut flash = SimFlash::new();
    let mut device = Device::new();

    load(&mut device, &mut flash, "R>G>B %0");
    send(&mut device, &mut flash, &[5, 10]);
    send(&mut device, &mut flash, &[6, 0]);
    send(&mut device, &mut flash, &[7]);

    // power loss: a brand-new device against the same flash
    let mut device = Device::new();
    let mut panel = PanelBuffer::new();
    device.power_on(&flash, &mut panel);

    assert_eq!(
        *device.settings(),
        Settings {
            clock_speed: 10,
            tapehead_highlighting: false,
        }
    );
    assert_eq!(device.machine().program().as_str(), "R>G>B %0");

    // a stored program runs by itself after power-on
    assert!(device.is_running());
    let mut clock = SimClock::new();
    for _ in 0..500 {
        clock.advance(1);
        device.exec(&mut clock, &mut panel);
    }
    assert_eq!(device.machine().tape().cell(0), Symbol::Red);
}

#[test]
fn test_store_confirmation_blink() {
    let mut flash = SimFlash::new();
    let mut device = Device::new();
    let mut clock = SimClock::new();
    let mut panel = PanelBuffer::new();

    device.process(&[7], &mut clock, &mut flash, &mut panel);
    assert_eq!(panel.last_blinks(), Some(1));
    // the storage critical section suspended the tick source exactly once
    assert_eq!(clock.suspend_count(), 1);
}

#[test]
fn test_erased_flash_powers_on_with_defaults() {
    let flash = SimFlash::new();
    let mut device = Device::new();
    let mut panel = PanelBuffer::new();
    device.power_on(&flash, &mut panel);

    assert_eq!(*device.settings(), Settings::default());
    assert!(device.machine().program().is_empty());
    assert!(!device.is_running());
}

#[test]
fn test_zeroed_flash_powers_on_with_defaults() {
    let mut flash = SimFlash::new();
    flash.fill(0x00);
    let mut device = Device::new();
    let mut panel = PanelBuffer::new();
    device.power_on(&flash, &mut panel);

    assert_eq!(*device.settings(), Settings::default());
    assert!(device.machine().program().is_empty());
    assert!(!device.is_running());
}

#[test]
fn test_settings_survive_without_a_program() {
    let mut flash = SimFlash::new();
    let mut device = Device::new();

    send(&mut device, &mut flash, &[5, 20]);
    send(&mut device, &mut flash, &[7]);

    let mut device = Device::new();
    let mut panel = PanelBuffer::new();
    device.power_on(&flash, &mut panel);

    // the empty program record reads as unformatted, so no autorun,
    // but the settings record is real
    assert_eq!(device.settings().clock_speed, 20);
    assert!(!device.is_running());
    assert!(device.machine().program().is_empty());
}

#[test]
fn test_restore_replaces_previous_program_wholesale() {
    let mut flash = SimFlash::new();
    let mut device = Device::new();

    load(&mut device, &mut flash, "W>W>W>W>W>W>W>W>W>W>W>W>");
    send(&mut device, &mut flash, &[7]);

    load(&mut device, &mut flash, "K<");
    send(&mut device, &mut flash, &[7]);

    let mut device = Device::new();
    let mut panel = PanelBuffer::new();
    device.power_on(&flash, &mut panel);
    assert_eq!(device.machine().program().as_str(), "K<");
}
