use crate::frame_table::FrameTable;
use crate::ram::PhysicalRam;
use core::fmt;
use simos_info::memory::PAGE_SIZE;

/// Display adapter listing occupied frames and their nonzero bytes.
pub(crate) struct FrameDump<'a> {
    frames: &'a FrameTable,
    ram: &'a PhysicalRam,
}

impl<'a> FrameDump<'a> {
    pub(crate) const fn new(frames: &'a FrameTable, ram: &'a PhysicalRam) -> Self {
        Self { frames, ram }
    }
}

impl fmt::Display for FrameDump<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (frame, info) in self.frames.used() {
            let start = frame.base().as_u32();
            let end = start + (PAGE_SIZE - 1);
            let owner = info.owner.map_or(0, simos_info::Pid::as_u32);
            // A missing successor prints as -1.
            let next = info.next.map_or(-1, |n| i64::from(n.as_u32()));
            writeln!(
                f,
                "{:03}: {start:05x}-{end:05x} - PID: {owner:02} (idx {:03}, nxt: {next:03})",
                frame.as_u32(),
                info.index,
            )?;
            for (pa, value) in self.ram.frame_bytes(frame).filter(|&(_, v)| v != 0) {
                writeln!(f, "\t{:05x}: {value:02x}", pa.as_u32())?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::address::FrameNumber;
    use simos_info::Pid;

    #[test]
    fn lists_frames_with_their_nonzero_bytes() {
        let mut frames = FrameTable::new(4);
        let ram = PhysicalRam::new(4 * PAGE_SIZE as usize);
        let pid = Pid::new(1).unwrap();
        frames.claim(Pid::new(2).unwrap(), 1).unwrap();
        frames.claim(pid, 2).unwrap();
        ram.write(FrameNumber::new(1).with_offset(0x14), 0x64);

        let text = FrameDump::new(&frames, &ram).to_string();
        assert_eq!(
            text,
            "000: 00000-003ff - PID: 02 (idx 000, nxt: -01)\n\
             001: 00400-007ff - PID: 01 (idx 000, nxt: 002)\n\
             \t00414: 64\n\
             002: 00800-00bff - PID: 01 (idx 001, nxt: -01)\n"
        );
    }

    #[test]
    fn empty_table_dumps_nothing() {
        let frames = FrameTable::new(2);
        let ram = PhysicalRam::new(2 * PAGE_SIZE as usize);
        assert!(FrameDump::new(&frames, &ram).to_string().is_empty());
    }
}
