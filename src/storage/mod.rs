//! Non-volatile persistence
//!
//! Two fixed-size records live at fixed offsets in the reserved
//! non-volatile region: the program image at [`PROGRAM_BASE`] and the
//! [`Settings`] record at [`SETTINGS_BASE`], each padded up to the erase
//! row granularity.
//!
//! # Write protocol
//!
//! The tick source is suspended for the whole operation, then every row
//! spanned by the target range is erased and reprogrammed by streaming
//! bytes through a row-sized buffer, committing each time the buffer
//! fills or the range ends. Reads are direct addressed bytes.
//!
//! # Sentinel convention
//!
//! A freshly erased region reads `0xff`, and an all-zero record is the
//! other "never formatted" state. Restore checks the leading byte of each
//! record against both sentinels before trusting it, falling back to
//! defaults (speed 1, highlighting on, empty program) otherwise.

use crate::hal::{Clock, NonVolatileStore, ROW_SIZE};
use crate::memory::{ProgramBuffer, MAX_PROGRAM};

/// Byte value of freshly erased storage.
pub const ERASED: u8 = 0xff;

/// The other unformatted sentinel.
pub const BLANK: u8 = 0x00;

/// Base address of the program record.
pub const PROGRAM_BASE: u16 = 0x1e00;

/// Bytes reserved for the program record, row-padded.
pub const PROGRAM_REGION: usize = row_pad(MAX_PROGRAM + 1);

/// Base address of the settings record, directly after the program
/// region.
pub const SETTINGS_BASE: u16 = PROGRAM_BASE + PROGRAM_REGION as u16;

const SETTINGS_LEN: usize = 2;

const fn row_pad(len: usize) -> usize {
    (len / ROW_SIZE + 1) * ROW_SIZE
}

/// Persisted device settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settings {
    /// Instructions per second; one of 1, 2, 5, 10, 20, 40 on a stock
    /// host.
    pub clock_speed: u8,

    /// Whether the cell under the head is shown brighter.
    pub tapehead_highlighting: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            clock_speed: 1,
            tapehead_highlighting: true,
        }
    }
}

impl Settings {
    fn encode(&self) -> [u8; SETTINGS_LEN] {
        [self.clock_speed, self.tapehead_highlighting as u8]
    }

    fn decode(raw: &[u8; SETTINGS_LEN]) -> Self {
        Settings {
            clock_speed: raw[0],
            tapehead_highlighting: raw[1] != 0,
        }
    }
}

/// Read a byte range.
pub fn read_bytes<N: NonVolatileStore>(nvm: &N, addr: u16, out: &mut [u8]) {
    for (i, byte) in out.iter_mut().enumerate() {
        *byte = nvm.read_byte(addr + i as u16);
    }
}

/// Write a byte range, erasing each row it touches first. Bytes of a row
/// outside the range are left erased.
pub fn write_bytes<N: NonVolatileStore>(nvm: &mut N, addr: u16, data: &[u8]) {
    let mut buf = [ERASED; ROW_SIZE];
    let mut written = 0usize;

    while written < data.len() {
        let row_base = (addr as usize + written) / ROW_SIZE * ROW_SIZE;
        let offset = addr as usize + written - row_base;
        let take = (ROW_SIZE - offset).min(data.len() - written);

        nvm.erase_row(row_base as u16);

        buf.fill(ERASED);
        buf[offset..offset + take].copy_from_slice(&data[written..written + take]);
        nvm.program_row(row_base as u16, &buf);

        written += take;
    }
}

/// Persist both records. The tick source is held off for the full
/// erase/program sequence: a tick-driven step must never see a
/// half-written record, and the storage hardware forbids access during
/// erase/program cycles.
pub fn store<C, N>(clock: &mut C, nvm: &mut N, settings: &Settings, program: &ProgramBuffer)
where
    C: Clock,
    N: NonVolatileStore,
{
    clock.suspend_ticks();
    write_bytes(nvm, SETTINGS_BASE, &settings.encode());
    write_bytes(nvm, PROGRAM_BASE, program.raw());
    clock.resume_ticks();
}

/// Restore the settings record, or defaults if the record reads as
/// unformatted.
pub fn load_settings<N: NonVolatileStore>(nvm: &N) -> Settings {
    let lead = nvm.read_byte(SETTINGS_BASE);
    if lead == ERASED || lead == BLANK {
        return Settings::default();
    }

    let mut raw = [0u8; SETTINGS_LEN];
    read_bytes(nvm, SETTINGS_BASE, &mut raw);
    Settings::decode(&raw)
}

/// Restore the program record into `program`. Returns false, leaving the
/// buffer empty, if the record reads as unformatted.
pub fn load_program<N: NonVolatileStore>(nvm: &N, program: &mut ProgramBuffer) -> bool {
    let lead = nvm.read_byte(PROGRAM_BASE);
    if lead == ERASED || lead == BLANK {
        program.clear();
        return false;
    }

    let mut raw = [0u8; MAX_PROGRAM + 1];
    read_bytes(nvm, PROGRAM_BASE, &mut raw);
    program.restore(&raw);
    true
}
